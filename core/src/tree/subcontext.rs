//! Candidate splits of a partition by one context column
//!
//! Proposing candidate splits and picking the winner are separate,
//! pluggable steps. The defaults here group rows by a context column's
//! values and pick the split that best separates the numeric values.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;
use log::debug;

use crate::config::TreeConfig;
use crate::models::{Attribute, Table};
use super::partition::Partition;

/// A partition split by the values of one context column
#[derive(Debug, Clone, PartialEq)]
pub struct Subcontext {
    /// Index of the context column
    pub column: usize,

    /// Header of the context column
    pub attribute: Attribute,

    /// Context value -> sub-partition of the rows carrying it
    pub parts: BTreeMap<String, Partition>,
}

impl Subcontext {
    /// Parts that satisfy the size bounds relative to `parent_size`
    pub fn accepted_parts<'a>(
        &'a self,
        parent_size: usize,
        bounds: &'a TreeConfig,
    ) -> impl Iterator<Item = (&'a String, &'a Partition)> + 'a {
        self.parts
            .iter()
            .filter(move |(_, part)| bounds.accepts(part.len(), parent_size))
    }
}

/// Proposes candidate splits of a partition
pub trait SubcontextCompiler: Debug + Send + Sync {
    /// One candidate per usable column among `available`
    fn compile(
        &self,
        partition: &Partition,
        available: &BTreeSet<usize>,
        table: &Table,
        bounds: &TreeConfig,
    ) -> Vec<Subcontext>;
}

/// Picks the winning split among candidates
pub trait SubcontextMatcher: Debug + Send + Sync {
    /// The winner, or `None` to stop splitting
    fn select(
        &self,
        candidates: Vec<Subcontext>,
        partition: &Partition,
        bounds: &TreeConfig,
    ) -> Option<Subcontext>;
}

/// Groups the partition's rows by each available column's values
///
/// Rows whose context value is empty are left out of the split. A column is
/// a candidate when it yields at least two distinct values and at least one
/// group within the size bounds.
#[derive(Debug, Clone, Default)]
pub struct ColumnValueCompiler;

impl SubcontextCompiler for ColumnValueCompiler {
    fn compile(
        &self,
        partition: &Partition,
        available: &BTreeSet<usize>,
        table: &Table,
        bounds: &TreeConfig,
    ) -> Vec<Subcontext> {
        let mut candidates = Vec::new();

        for &column in available {
            let Some(source) = table.column(column) else {
                continue;
            };

            let mut groups: BTreeMap<String, Vec<(usize, f64)>> = BTreeMap::new();
            for (row, value) in partition.entries() {
                if let Some(key) = source.values.get(row).and_then(|v| v.context_key()) {
                    groups.entry(key).or_default().push((row, value));
                }
            }

            if groups.len() < 2 {
                continue;
            }

            let parts: BTreeMap<String, Partition> = groups
                .into_iter()
                .map(|(key, entries)| (key, Partition::from_entries(entries)))
                .collect();

            let subcontext = Subcontext {
                column,
                attribute: Attribute::new(source.label.text()),
                parts,
            };

            if subcontext.accepted_parts(partition.len(), bounds).next().is_some() {
                candidates.push(subcontext);
            }
        }

        candidates
    }
}

/// Picks the split with the highest correlation ratio
///
/// The correlation ratio (eta squared) is the share of the variance of the
/// accepted branches' values explained by the branch means. Splits with
/// fewer than two accepted branches score zero. Equal scores go to the
/// lower column index.
#[derive(Debug, Clone)]
pub struct CorrelationRatioMatcher {
    /// Scores at or below this value never win
    pub min_separation: f64,
}

impl CorrelationRatioMatcher {
    /// Create a matcher with a minimum score
    pub fn new(min_separation: f64) -> Self {
        CorrelationRatioMatcher { min_separation }
    }

    /// Correlation ratio of the accepted parts of a candidate, in [0, 1]
    pub fn score(candidate: &Subcontext, parent_size: usize, bounds: &TreeConfig) -> f64 {
        let groups: Vec<&[f64]> = candidate
            .accepted_parts(parent_size, bounds)
            .map(|(_, part)| part.values())
            .collect();
        if groups.len() < 2 {
            return 0.0;
        }

        let count: usize = groups.iter().map(|g| g.len()).sum();
        let grand_mean = groups.iter().flat_map(|g| g.iter()).sum::<f64>() / count as f64;

        let total: f64 = groups
            .iter()
            .flat_map(|g| g.iter())
            .map(|v| (v - grand_mean).powi(2))
            .sum();
        if total <= 0.0 {
            return 0.0;
        }

        let between: f64 = groups
            .iter()
            .map(|g| {
                let mean = g.iter().sum::<f64>() / g.len() as f64;
                g.len() as f64 * (mean - grand_mean).powi(2)
            })
            .sum();

        (between / total).clamp(0.0, 1.0)
    }
}

impl Default for CorrelationRatioMatcher {
    fn default() -> Self {
        Self::new(TreeConfig::default().min_separation)
    }
}

impl SubcontextMatcher for CorrelationRatioMatcher {
    fn select(
        &self,
        candidates: Vec<Subcontext>,
        partition: &Partition,
        bounds: &TreeConfig,
    ) -> Option<Subcontext> {
        let mut best: Option<(f64, Subcontext)> = None;

        for candidate in candidates {
            let score = Self::score(&candidate, partition.len(), bounds);
            debug!("split on {} scores {:.4}", candidate.attribute, score);

            if score <= self.min_separation {
                continue;
            }
            let better = match &best {
                None => true,
                Some((best_score, current)) => {
                    score > *best_score
                        || (score == *best_score && candidate.column < current.column)
                }
            };
            if better {
                best = Some((score, candidate));
            }
        }

        best.map(|(_, winner)| winner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Metadata, Value};

    fn table() -> Table {
        // Country separates the populations; Initial does not
        Table::from_rows(
            None,
            vec!["Country".to_string(), "Initial".to_string(), "Population".to_string()],
            vec![
                vec!["France".into(), "A".into(), Value::Numeric(10.0)],
                vec!["France".into(), "B".into(), Value::Numeric(12.0)],
                vec!["France".into(), "A".into(), Value::Numeric(11.0)],
                vec!["Germany".into(), "B".into(), Value::Numeric(100.0)],
                vec!["Germany".into(), "A".into(), Value::Numeric(102.0)],
                vec!["Germany".into(), Value::Empty, Value::Numeric(101.0)],
            ],
            Metadata::default(),
        )
        .unwrap()
    }

    fn bounds() -> TreeConfig {
        TreeConfig {
            min_relative_size: 0.0,
            ..TreeConfig::default()
        }
    }

    #[test]
    fn test_compile_one_candidate_per_column() {
        let table = table();
        let partition = Partition::from_column(&table, 2);
        let candidates = ColumnValueCompiler.compile(&partition, &BTreeSet::from([0, 1]), &table, &bounds());

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].attribute, Attribute::new("Country"));
        assert_eq!(candidates[0].parts["France"].values(), &[10.0, 12.0, 11.0]);
        assert_eq!(candidates[0].parts["Germany"].rows(), &[3, 4, 5]);

        // The empty Initial value in the last row is not part of the split
        let initials: usize = candidates[1].parts.values().map(Partition::len).sum();
        assert_eq!(initials, 5);
    }

    #[test]
    fn test_compile_skips_single_valued_columns() {
        let table = table();
        let france = Partition::from_entries([(0, 10.0), (1, 12.0), (2, 11.0)]);
        let candidates = ColumnValueCompiler.compile(&france, &BTreeSet::from([0]), &table, &bounds());
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_select_prefers_separating_column() {
        let table = table();
        let partition = Partition::from_column(&table, 2);
        let candidates = ColumnValueCompiler.compile(&partition, &BTreeSet::from([0, 1]), &table, &bounds());

        let country = CorrelationRatioMatcher::score(&candidates[0], partition.len(), &bounds());
        let initial = CorrelationRatioMatcher::score(&candidates[1], partition.len(), &bounds());
        assert!(country > 0.99);
        assert!(initial < country);

        let winner = CorrelationRatioMatcher::default()
            .select(candidates, &partition, &bounds())
            .unwrap();
        assert_eq!(winner.column, 0);
    }

    #[test]
    fn test_select_rejects_constant_values() {
        let table = table();
        let partition = Partition::from_entries([(0, 5.0), (1, 5.0), (3, 5.0), (4, 5.0)]);
        let candidates = ColumnValueCompiler.compile(&partition, &BTreeSet::from([0]), &table, &bounds());
        assert_eq!(candidates.len(), 1);

        assert!(CorrelationRatioMatcher::default()
            .select(candidates, &partition, &bounds())
            .is_none());
    }
}
