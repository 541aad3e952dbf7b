//! Ranking grouped matches

use std::fmt::Debug;
use std::sync::Arc;

use crate::config::AggregationKind;
use crate::matching::MeasuredNode;
use crate::utils::mean;

/// Scores a group of matches; lower scores rank first
pub trait ResultAggregator: Debug + Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Score of one group
    fn score(&self, group: &[MeasuredNode]) -> f64;
}

/// Ranks groups by the mean distance of their members
#[derive(Debug, Clone, Copy, Default)]
pub struct AverageDistance;

impl ResultAggregator for AverageDistance {
    fn name(&self) -> &'static str {
        "average_distance"
    }

    fn score(&self, group: &[MeasuredNode]) -> f64 {
        let distances: Vec<f64> = group.iter().map(|m| m.distance).collect();
        mean(&distances).unwrap_or(f64::INFINITY)
    }
}

/// Ranks groups by how many matches they received
#[derive(Debug, Clone, Copy, Default)]
pub struct MajorityVote;

impl ResultAggregator for MajorityVote {
    fn name(&self) -> &'static str {
        "majority_vote"
    }

    fn score(&self, group: &[MeasuredNode]) -> f64 {
        -(group.len() as f64)
    }
}

/// Build the aggregator named by the configuration
pub fn from_kind(kind: AggregationKind) -> Arc<dyn ResultAggregator> {
    match kind {
        AggregationKind::AverageDistance => Arc::new(AverageDistance),
        AggregationKind::MajorityVote => Arc::new(MajorityVote),
    }
}

/// Keys of `groups`, best first
///
/// The sort is stable: groups with equal scores keep their input order, so
/// ranking an already ranked grouping changes nothing.
pub fn rank<K: Clone>(aggregator: &dyn ResultAggregator, groups: &[(K, Vec<MeasuredNode>)]) -> Vec<K> {
    let mut scored: Vec<(f64, &K)> = groups
        .iter()
        .map(|(key, group)| (aggregator.score(group), key))
        .collect();
    scored.sort_by(|a, b| a.0.total_cmp(&b.0));
    scored.into_iter().map(|(_, key)| key.clone()).collect()
}
