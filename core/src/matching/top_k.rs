//! Bounded nearest-first selection

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use serde::{Serialize, Deserialize};

use crate::graph::NodeRef;

/// A graph node together with its distance to the query
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MeasuredNode {
    /// Address of the node
    pub node: NodeRef,

    /// Distance to the query, never negative
    pub distance: f64,
}

impl MeasuredNode {
    /// Pair a node with its distance
    pub fn new(node: NodeRef, distance: f64) -> Self {
        MeasuredNode { node, distance }
    }
}

impl PartialEq for MeasuredNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MeasuredNode {}

impl PartialOrd for MeasuredNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Nearer first; equal distances fall back to graph scan order
impl Ord for MeasuredNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.node.cmp(&other.node))
    }
}

/// Keeps the `k` nearest nodes offered to it
///
/// The heap root is the worst kept node. A new node replaces it only when
/// strictly better under the full ordering, so the final set does not depend
/// on the order nodes are offered in.
#[derive(Debug)]
pub struct BoundedTopK {
    k: usize,
    heap: BinaryHeap<MeasuredNode>,
}

impl BoundedTopK {
    /// Collector of at most `k` nodes
    ///
    /// Storage grows with the nodes actually kept, so any `k` is accepted.
    pub fn new(k: usize) -> Self {
        BoundedTopK {
            k,
            heap: BinaryHeap::new(),
        }
    }

    /// Collector of at most `k` nodes out of about `candidates` offers
    pub fn with_candidates(k: usize, candidates: usize) -> Self {
        BoundedTopK {
            k,
            heap: BinaryHeap::with_capacity(k.min(candidates)),
        }
    }

    /// Offer a node; returns whether it was kept
    pub fn offer(&mut self, candidate: MeasuredNode) -> bool {
        if self.k == 0 {
            return false;
        }
        if self.heap.len() < self.k {
            self.heap.push(candidate);
            return true;
        }
        match self.heap.peek() {
            Some(worst) if candidate < *worst => {
                self.heap.pop();
                self.heap.push(candidate);
                true
            }
            _ => false,
        }
    }

    /// Number of kept nodes
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether nothing has been kept
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Kept nodes, nearest first
    pub fn into_sorted_vec(self) -> Vec<MeasuredNode> {
        self.heap.into_sorted_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeId;
    use proptest::prelude::*;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn measured(property: usize, node: usize, distance: f64) -> MeasuredNode {
        MeasuredNode::new(
            NodeRef {
                property,
                instance: 0,
                node: NodeId(node),
            },
            distance,
        )
    }

    #[test]
    fn test_keeps_nearest() {
        let mut top = BoundedTopK::new(2);
        assert!(top.offer(measured(0, 0, 0.5)));
        assert!(top.offer(measured(0, 1, 0.9)));
        assert!(top.offer(measured(0, 2, 0.1)));
        assert!(!top.offer(measured(0, 3, 0.7)));
        assert_eq!(top.len(), 2);

        let kept = top.into_sorted_vec();
        assert_eq!(kept, vec![measured(0, 2, 0.1), measured(0, 0, 0.5)]);
    }

    #[test]
    fn test_ties_keep_scan_order() {
        let mut top = BoundedTopK::new(1);
        top.offer(measured(3, 0, 0.2));
        assert!(top.offer(measured(1, 0, 0.2)));
        assert!(!top.offer(measured(2, 0, 0.2)));
        assert_eq!(top.into_sorted_vec(), vec![measured(1, 0, 0.2)]);
    }

    #[test]
    fn test_zero_capacity() {
        let mut top = BoundedTopK::new(0);
        assert!(!top.offer(measured(0, 0, 0.0)));
        assert!(top.is_empty());
    }

    #[test]
    fn test_unbounded_k() {
        let mut top = BoundedTopK::new(usize::MAX);
        for i in 0..5 {
            assert!(top.offer(measured(0, i, (5 - i) as f64)));
        }
        assert_eq!(top.len(), 5);

        let mut hinted = BoundedTopK::with_candidates(1usize << 40, 3);
        for i in 0..3 {
            assert!(hinted.offer(measured(i, 0, 1.0)));
        }
        let kept = hinted.into_sorted_vec();
        assert_eq!(kept.len(), 3);
        assert_eq!(kept[0], measured(0, 0, 1.0));
    }

    #[test]
    fn test_shuffled_feed() {
        let nodes: Vec<MeasuredNode> = (0..40).map(|i| measured(i % 7, i, (i % 5) as f64 / 4.0)).collect();
        let mut expected = nodes.clone();
        expected.sort();
        expected.truncate(6);

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10 {
            let mut feed = nodes.clone();
            feed.shuffle(&mut rng);
            let mut top = BoundedTopK::new(6);
            for node in feed {
                top.offer(node);
            }
            assert_eq!(top.into_sorted_vec(), expected);
        }
    }

    proptest! {
        #[test]
        fn prop_feed_order_does_not_matter(
            distances in prop::collection::vec(0u8..8, 1..60),
            k in 1usize..10,
            seed in any::<u64>(),
        ) {
            let nodes: Vec<MeasuredNode> = distances
                .iter()
                .enumerate()
                .map(|(i, d)| measured(i, i, *d as f64 / 8.0))
                .collect();

            let mut forward = BoundedTopK::new(k);
            for node in &nodes {
                forward.offer(*node);
            }

            let mut shuffled = nodes.clone();
            shuffled.shuffle(&mut StdRng::seed_from_u64(seed));
            let mut other = BoundedTopK::new(k);
            for node in shuffled {
                other.offer(node);
            }

            let forward = forward.into_sorted_vec();
            prop_assert_eq!(forward.len(), k.min(nodes.len()));
            prop_assert!(forward.windows(2).all(|w| w[0] <= w[1]));
            prop_assert_eq!(forward, other.into_sorted_vec());
        }
    }
}
