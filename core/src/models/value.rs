//! Cell values
//!
//! Values arrive already typed: type inference from raw cells happens
//! upstream. The core only needs to know whether a value carries a figure
//! (numeric columns) or a text key (context columns).

use std::fmt::{Debug, Formatter, Result as FmtResult};
use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};

use crate::utils::StringUtils;

/// Type of a cell value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    /// Plain number
    Numeric,

    /// Free text
    Text,

    /// Reference to a knowledge-base entity
    Entity,

    /// Identifier (codes, keys)
    Id,

    /// Number with a unit of measurement
    Unit,

    /// Point in time
    Instant,

    /// Missing value
    Empty,
}

/// Value of one table cell
#[derive(Clone, Serialize, Deserialize)]
pub enum Value {
    /// Plain number
    Numeric(f64),

    /// Free text
    Text(String),

    /// Reference to a knowledge-base entity
    Entity {
        /// Entity URI, when linked
        uri: Option<String>,
        /// Surface text in the cell
        text: String,
    },

    /// Identifier
    Id(String),

    /// Number with a unit of measurement
    Unit {
        /// Scalar part
        figure: f64,
        /// Unit symbol or name
        unit: String,
    },

    /// Point in time
    Instant(DateTime<Utc>),

    /// Missing value
    Empty,
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Value::Numeric(v) => write!(f, "Numeric({})", v),
            Value::Text(v) => write!(f, "Text(\"{}\")", StringUtils::truncate(v, 20)),
            Value::Entity { uri, text } => match uri {
                Some(uri) => write!(f, "Entity(\"{}\" <{}>)", StringUtils::truncate(text, 20), uri),
                None => write!(f, "Entity(\"{}\")", StringUtils::truncate(text, 20)),
            },
            Value::Id(v) => write!(f, "Id({})", v),
            Value::Unit { figure, unit } => write!(f, "Unit({} {})", figure, unit),
            Value::Instant(v) => write!(f, "Instant({})", v.to_rfc3339()),
            Value::Empty => write!(f, "Empty"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Numeric(a), Value::Numeric(b)) => {
                // NaN equals NaN so values stay usable as keys
                (a.is_nan() && b.is_nan()) || a == b
            }
            (Value::Text(a), Value::Text(b)) => a == b,
            (
                Value::Entity { uri: ua, text: ta },
                Value::Entity { uri: ub, text: tb },
            ) => ua == ub && ta == tb,
            (Value::Id(a), Value::Id(b)) => a == b,
            (
                Value::Unit { figure: fa, unit: ua },
                Value::Unit { figure: fb, unit: ub },
            ) => ua == ub && ((fa.is_nan() && fb.is_nan()) || fa == fb),
            (Value::Instant(a), Value::Instant(b)) => a == b,
            (Value::Empty, Value::Empty) => true,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Value {
    /// Get the type of the value
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Numeric(_) => ValueType::Numeric,
            Value::Text(_) => ValueType::Text,
            Value::Entity { .. } => ValueType::Entity,
            Value::Id(_) => ValueType::Id,
            Value::Unit { .. } => ValueType::Unit,
            Value::Instant(_) => ValueType::Instant,
            Value::Empty => ValueType::Empty,
        }
    }

    /// Plain number
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Numeric(_))
    }

    /// Carries a scalar figure (plain number or number with unit)
    pub fn is_numeric_like(&self) -> bool {
        matches!(self, Value::Numeric(_) | Value::Unit { .. })
    }

    /// Free text, entity surface text or identifier
    pub fn is_textual(&self) -> bool {
        matches!(self, Value::Text(_) | Value::Entity { .. } | Value::Id(_))
    }

    /// Entity reference
    pub fn is_entity(&self) -> bool {
        matches!(self, Value::Entity { .. })
    }

    /// Identifier
    pub fn is_id(&self) -> bool {
        matches!(self, Value::Id(_))
    }

    /// Number with unit
    pub fn is_unit(&self) -> bool {
        matches!(self, Value::Unit { .. })
    }

    /// Point in time
    pub fn is_instant(&self) -> bool {
        matches!(self, Value::Instant(_))
    }

    /// Missing value
    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    /// Scalar figure of a numeric-like value; non-finite figures yield `None`
    pub fn figure(&self) -> Option<f64> {
        let figure = match self {
            Value::Numeric(v) => *v,
            Value::Unit { figure, .. } => *figure,
            _ => return None,
        };
        figure.is_finite().then_some(figure)
    }

    /// Text this value contributes as a context constraint
    pub fn context_key(&self) -> Option<String> {
        match self {
            Value::Numeric(v) => Some(v.to_string()),
            Value::Text(v) | Value::Id(v) => {
                let trimmed = v.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Value::Entity { uri, text } => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    uri.clone()
                } else {
                    Some(trimmed.to_string())
                }
            }
            Value::Unit { figure, unit } => Some(format!("{} {}", figure, unit)),
            Value::Instant(v) => Some(v.to_rfc3339()),
            Value::Empty => None,
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Numeric(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        if v.trim().is_empty() {
            Value::Empty
        } else {
            Value::Text(v.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_predicates() {
        let values = vec![
            Value::Numeric(42.0),
            Value::Text("Berlin".to_string()),
            Value::Entity { uri: Some("dbr:Berlin".to_string()), text: "Berlin".to_string() },
            Value::Id("DE-BE".to_string()),
            Value::Unit { figure: 891.8, unit: "km2".to_string() },
            Value::Instant(Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap()),
            Value::Empty,
        ];

        for value in &values {
            assert_eq!(value.value_type(), match value {
                Value::Numeric(_) => ValueType::Numeric,
                Value::Text(_) => ValueType::Text,
                Value::Entity { .. } => ValueType::Entity,
                Value::Id(_) => ValueType::Id,
                Value::Unit { .. } => ValueType::Unit,
                Value::Instant(_) => ValueType::Instant,
                Value::Empty => ValueType::Empty,
            });
        }

        let numeric_like: Vec<bool> = values.iter().map(Value::is_numeric_like).collect();
        assert_eq!(numeric_like, vec![true, false, false, false, true, false, false]);

        let textual: Vec<bool> = values.iter().map(Value::is_textual).collect();
        assert_eq!(textual, vec![false, true, true, true, false, false, false]);

        assert!(values[0].is_numeric());
        assert!(values[2].is_entity());
        assert!(values[3].is_id());
        assert!(values[4].is_unit());
        assert!(values[5].is_instant());
        assert!(values[6].is_empty());
    }

    #[test]
    fn test_figure() {
        assert_eq!(Value::Numeric(3.5).figure(), Some(3.5));
        assert_eq!(Value::Unit { figure: 2.0, unit: "m".to_string() }.figure(), Some(2.0));
        assert_eq!(Value::Numeric(f64::NAN).figure(), None);
        assert_eq!(Value::Numeric(f64::INFINITY).figure(), None);
        assert_eq!(Value::Text("12".to_string()).figure(), None);
        assert_eq!(Value::Empty.figure(), None);
    }

    #[test]
    fn test_context_key() {
        assert_eq!(Value::Text("  Germany ".to_string()).context_key(), Some("Germany".to_string()));
        assert_eq!(Value::Text("   ".to_string()).context_key(), None);
        assert_eq!(
            Value::Entity { uri: Some("dbr:France".to_string()), text: String::new() }.context_key(),
            Some("dbr:France".to_string())
        );
        assert_eq!(Value::Empty.context_key(), None);
    }

    #[test]
    fn test_equality_and_conversion() {
        assert_eq!(Value::Numeric(f64::NAN), Value::Numeric(f64::NAN));
        assert_ne!(Value::Numeric(1.0), Value::Unit { figure: 1.0, unit: "m".to_string() });
        assert_eq!(Value::from(2.0), Value::Numeric(2.0));
        assert_eq!(Value::from("Paris"), Value::Text("Paris".to_string()));
        assert_eq!(Value::from(" "), Value::Empty);
        assert_eq!(format!("{:?}", Value::Text("a".repeat(30))), format!("Text(\"{}...\")", "a".repeat(20)));
    }
}
