//! Scores attached to ranked candidates

use serde::{Serialize, Deserialize};

use crate::matching::MeasuredNode;
use crate::utils::{mean, median};

/// How strongly one candidate is supported by the matches of a column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Mean distance of the candidate's matches
    pub mean_distance: f64,

    /// Median distance of the candidate's matches
    pub median_distance: f64,

    /// Number of matches of the candidate
    pub occurrence: usize,

    /// Share of all matches of the column that belong to the candidate
    pub relative_occurrence: f64,
}

impl Statistics {
    /// Statistics of `group` among `total` matches
    pub fn compute(group: &[MeasuredNode], total: usize) -> Self {
        let distances: Vec<f64> = group.iter().map(|m| m.distance).collect();
        let relative_occurrence = if total == 0 {
            0.0
        } else {
            group.len() as f64 / total as f64
        };

        Statistics {
            mean_distance: mean(&distances).unwrap_or(f64::INFINITY),
            median_distance: median(&distances).unwrap_or(f64::INFINITY),
            occurrence: group.len(),
            relative_occurrence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeRef;
    use crate::tree::NodeId;

    fn measured(distance: f64) -> MeasuredNode {
        MeasuredNode::new(NodeRef { property: 0, instance: 0, node: NodeId::ROOT }, distance)
    }

    #[test]
    fn test_compute() {
        let group = vec![measured(0.1), measured(0.2), measured(0.6)];
        let stats = Statistics::compute(&group, 6);

        assert!((stats.mean_distance - 0.3).abs() < 1e-12);
        assert_eq!(stats.median_distance, 0.2);
        assert_eq!(stats.occurrence, 3);
        assert_eq!(stats.relative_occurrence, 0.5);
    }

    #[test]
    fn test_empty_group() {
        let stats = Statistics::compute(&[], 0);
        assert_eq!(stats.occurrence, 0);
        assert_eq!(stats.relative_occurrence, 0.0);
        assert!(stats.mean_distance.is_infinite());
    }
}
