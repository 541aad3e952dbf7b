//! String utility functions
//!
//! Label text arrives in many spellings ("populationTotal", "Population
//! (total)", "population_total"). These helpers bring it to one form before
//! comparison and keep long values readable in debug output.

/// String utility functions
#[derive(Debug)]
pub struct StringUtils;

impl StringUtils {
    /// Truncate a string to a maximum number of characters with ellipsis
    pub fn truncate(s: &str, max_length: usize) -> String {
        if s.chars().count() <= max_length {
            s.to_string()
        } else {
            let mut result: String = s.chars().take(max_length).collect();
            result.push_str("...");
            result
        }
    }

    /// Split camelCase words apart: "populationTotal" becomes "population Total"
    pub fn split_camel_case(s: &str) -> String {
        let mut result = String::with_capacity(s.len() + 4);
        let mut previous: Option<char> = None;

        for c in s.chars() {
            if let Some(p) = previous {
                if c.is_uppercase() && p.is_lowercase() {
                    result.push(' ');
                }
            }
            result.push(c);
            previous = Some(c);
        }

        result
    }

    /// Normalize label text for comparison
    ///
    /// Splits camelCase, lowercases, turns every non-alphanumeric run into a
    /// single space and trims the ends.
    pub fn normalize_label(s: &str) -> String {
        let split = Self::split_camel_case(s);
        let mut result = String::with_capacity(split.len());
        let mut pending_space = false;

        for c in split.chars() {
            if c.is_alphanumeric() {
                if pending_space && !result.is_empty() {
                    result.push(' ');
                }
                pending_space = false;
                result.extend(c.to_lowercase());
            } else {
                pending_space = true;
            }
        }

        result
    }

    /// Local part of a URI: the text after the last '/', '#' or ':'
    pub fn uri_local_name(uri: &str) -> &str {
        uri.rsplit(|c| c == '/' || c == '#' || c == ':')
            .next()
            .unwrap_or(uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(StringUtils::truncate("Hello", 10), "Hello");
        assert_eq!(StringUtils::truncate("Hello, world!", 5), "Hello...");
        assert_eq!(StringUtils::truncate("", 5), "");
        assert_eq!(StringUtils::truncate("Zürich Zürich", 6), "Zürich...");
    }

    #[test]
    fn test_split_camel_case() {
        assert_eq!(StringUtils::split_camel_case("populationTotal"), "population Total");
        assert_eq!(StringUtils::split_camel_case("ABC"), "ABC");
        assert_eq!(StringUtils::split_camel_case("simple"), "simple");
    }

    #[test]
    fn test_normalize_label() {
        assert_eq!(StringUtils::normalize_label("populationTotal"), "population total");
        assert_eq!(StringUtils::normalize_label("Population (total)"), "population total");
        assert_eq!(StringUtils::normalize_label("population_total"), "population total");
        assert_eq!(StringUtils::normalize_label("  Area km²  "), "area km²");
        assert_eq!(StringUtils::normalize_label("---"), "");
    }

    #[test]
    fn test_uri_local_name() {
        assert_eq!(StringUtils::uri_local_name("http://dbpedia.org/ontology/population"), "population");
        assert_eq!(StringUtils::uri_local_name("dbo:populationTotal"), "populationTotal");
        assert_eq!(StringUtils::uri_local_name("http://example.org/ns#height"), "height");
        assert_eq!(StringUtils::uri_local_name("plain"), "plain");
    }
}
