//! Immutable multisets of numeric values

use serde::{Serialize, Deserialize};

use crate::models::Table;

/// The numeric values at one tree node, with the rows they came from
///
/// Rows are kept so that a partition can be split again by any context
/// column; the values alone are what distances are computed on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Partition {
    rows: Vec<usize>,
    values: Vec<f64>,
}

impl Partition {
    /// Build a partition from (row, value) entries
    pub fn from_entries(entries: impl IntoIterator<Item = (usize, f64)>) -> Self {
        let (rows, values) = entries.into_iter().unzip();
        Partition { rows, values }
    }

    /// Build a partition from values with no row information
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        Self::from_entries(values.into_iter().enumerate())
    }

    /// Every finite figure of a column, paired with its row
    pub fn from_column(table: &Table, column: usize) -> Self {
        match table.column(column) {
            Some(c) => Self::from_entries(
                c.values
                    .iter()
                    .enumerate()
                    .filter_map(|(row, value)| value.figure().map(|f| (row, f))),
            ),
            None => Self::default(),
        }
    }

    /// Number of values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the partition holds no value
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values, in row order
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Source rows, parallel to `values`
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// (row, value) entries
    pub fn entries(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.rows.iter().copied().zip(self.values.iter().copied())
    }

    /// Arithmetic mean, `None` when empty
    pub fn mean(&self) -> Option<f64> {
        crate::utils::mean(&self.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Metadata, Value};

    #[test]
    fn test_from_column_skips_non_figures() {
        let table = Table::new(
            None,
            vec!["Population".to_string()],
            vec![vec![
                Value::Numeric(10.0),
                Value::Empty,
                Value::Unit { figure: 30.0, unit: "k".to_string() },
                Value::Numeric(f64::NAN),
            ]],
            Metadata::default(),
        )
        .unwrap();

        let partition = Partition::from_column(&table, 0);
        assert_eq!(partition.len(), 2);
        assert_eq!(partition.values(), &[10.0, 30.0]);
        assert_eq!(partition.rows(), &[0, 2]);
        assert_eq!(partition.mean(), Some(20.0));

        assert!(Partition::from_column(&table, 5).is_empty());
    }

    #[test]
    fn test_from_values() {
        let partition = Partition::from_values([1.0, 2.0]);
        assert_eq!(partition.entries().collect::<Vec<_>>(), vec![(0, 1.0), (1, 2.0)]);
    }
}
