//! Column labels, attributes and declared knowledge-base entities

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::hash::{Hash, Hasher};
use serde::{Serialize, Deserialize};
use uuid::Uuid;

use crate::utils::generate_uuid;

/// Where a column came from, kept for display and debugging
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    /// Source file or table name
    pub file: Option<String>,

    /// Column index within the source table
    pub column: usize,

    /// First values of the column, as text
    pub sample_values: Vec<String>,

    /// Headers of the source table
    pub sample_headers: Vec<String>,

    /// First rows of the source table, as text
    pub sample_rows: Vec<Vec<String>>,
}

/// Identity of a table column
///
/// Two labels are the same label only if they share an id; equal text is
/// not enough, since "Population" in two tables are different columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    /// Stable unique id
    id: Uuid,

    /// Display text (usually the column header)
    text: String,

    /// Created by the system rather than read from a header
    synthetic: bool,

    /// Origin of the column
    provenance: Provenance,
}

impl Label {
    /// Create a label for a column read from a table
    pub fn new(text: impl Into<String>, provenance: Provenance) -> Self {
        Label {
            id: generate_uuid(),
            text: text.into(),
            synthetic: false,
            provenance,
        }
    }

    /// Create a label that did not come from a table header
    pub fn synthetic(text: impl Into<String>) -> Self {
        Label {
            id: generate_uuid(),
            text: text.into(),
            synthetic: true,
            provenance: Provenance::default(),
        }
    }

    /// Unique id
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Display text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the label was created by the system
    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    /// Origin of the column
    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }
}

impl PartialEq for Label {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Label {}

impl Hash for Label {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for Label {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Label {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.text)
    }
}

/// Name of a context column
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Attribute(pub String);

impl Attribute {
    /// Create an attribute
    pub fn new(name: impl Into<String>) -> Self {
        Attribute(name.into())
    }

    /// Attribute name
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Display for Attribute {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

/// One context constraint: a context column and the value it takes
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AttributeValuePair {
    /// Context column
    pub attribute: Attribute,

    /// Context value, as text
    pub value: String,
}

impl AttributeValuePair {
    /// Create a pair
    pub fn new(attribute: Attribute, value: impl Into<String>) -> Self {
        AttributeValuePair {
            attribute,
            value: value.into(),
        }
    }
}

impl Display for AttributeValuePair {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}={}", self.attribute, self.value)
    }
}

/// Reference to a knowledge-base property or class
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeclaredEntity {
    /// URI, when known
    pub uri: Option<String>,

    /// Human-readable labels
    pub labels: BTreeSet<String>,
}

impl DeclaredEntity {
    /// Entity identified by URI
    pub fn with_uri(uri: impl Into<String>) -> Self {
        DeclaredEntity {
            uri: Some(uri.into()),
            labels: BTreeSet::new(),
        }
    }

    /// Add a label
    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.labels.insert(label.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_identity() {
        let a = Label::synthetic("Population");
        let b = Label::synthetic("Population");

        assert_ne!(a, b);
        assert_eq!(a, a.clone());
        assert_eq!(a.cmp(&b), a.id().cmp(&b.id()));
        assert!(a.is_synthetic());
        assert_eq!(a.to_string(), "Population");
    }

    #[test]
    fn test_label_provenance() {
        let provenance = Provenance {
            file: Some("cities.csv".to_string()),
            column: 2,
            ..Provenance::default()
        };
        let label = Label::new("Population", provenance.clone());

        assert!(!label.is_synthetic());
        assert_eq!(label.provenance(), &provenance);
    }

    #[test]
    fn test_pairs() {
        let pair = AttributeValuePair::new(Attribute::new("Country"), "France");
        assert_eq!(pair.to_string(), "Country=France");
        assert_eq!(pair, AttributeValuePair::new(Attribute::new("Country"), "France"));
        assert!(pair < AttributeValuePair::new(Attribute::new("Country"), "Germany"));
    }

    #[test]
    fn test_declared_entity() {
        let entity = DeclaredEntity::with_uri("dbo:population").labeled("population");
        assert_eq!(entity.uri.as_deref(), Some("dbo:population"));
        assert!(entity.labels.contains("population"));
    }
}
