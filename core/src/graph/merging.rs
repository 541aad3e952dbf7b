//! Deciding which property a newly learned tree belongs to

use std::fmt::Debug;
use std::sync::Arc;
use log::debug;

use crate::config::{MergingConfig, MergingKind};
use crate::tree::PropertyTree;
use crate::utils::StringUtils;
use super::knowledge_graph::BackgroundKnowledgeGraph;

/// Outcome of a merging decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeDecision {
    /// Append the tree to the property at this index
    Extend(usize),

    /// Start a new property
    Create {
        /// URI of the new property
        uri: Option<String>,
    },
}

/// Strategy grouping learned trees into properties
pub trait PropertyMerging: Debug + Send + Sync {
    /// Where `tree` goes, given the current graph
    fn resolve(&self, graph: &BackgroundKnowledgeGraph, tree: &PropertyTree) -> MergeDecision;
}

/// Build the strategy named by the configuration
pub fn from_config(config: &MergingConfig) -> Arc<dyn PropertyMerging> {
    match config.strategy {
        MergingKind::DeclaredUri => Arc::new(DeclaredUriMerging::new(config.label_similarity_threshold)),
        MergingKind::Isolated => Arc::new(IsolatedMerging),
    }
}

/// Merge by declared property URI, falling back to label similarity
///
/// A tree whose column declares a URI joins the property with that URI, or
/// starts one. A tree without a URI joins the property whose instance
/// labels (or URI local name) are most similar to its own label, when the
/// normalized Levenshtein similarity reaches the threshold.
#[derive(Debug, Clone)]
pub struct DeclaredUriMerging {
    threshold: f64,
}

impl DeclaredUriMerging {
    /// Create the strategy with a label similarity threshold in [0, 1]
    pub fn new(threshold: f64) -> Self {
        DeclaredUriMerging { threshold }
    }

    fn most_similar(&self, graph: &BackgroundKnowledgeGraph, label: &str) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;

        for (index, property) in graph.properties().iter().enumerate() {
            let uri_name = property
                .uri()
                .map(|uri| StringUtils::normalize_label(StringUtils::uri_local_name(uri)));
            let names = property
                .labels()
                .map(|l| StringUtils::normalize_label(l.text()))
                .chain(uri_name);

            for name in names {
                let similarity = strsim::normalized_levenshtein(label, &name);
                if best.map_or(true, |(_, s)| similarity > s) {
                    best = Some((index, similarity));
                }
            }
        }

        best
    }
}

impl Default for DeclaredUriMerging {
    fn default() -> Self {
        Self::new(MergingConfig::default().label_similarity_threshold)
    }
}

impl PropertyMerging for DeclaredUriMerging {
    fn resolve(&self, graph: &BackgroundKnowledgeGraph, tree: &PropertyTree) -> MergeDecision {
        if let Some(uri) = tree.context().property_uri() {
            return match graph.position_by_uri(uri) {
                Some(index) => MergeDecision::Extend(index),
                None => MergeDecision::Create { uri: Some(uri.to_string()) },
            };
        }

        let label = StringUtils::normalize_label(tree.label().text());
        if label.is_empty() {
            return MergeDecision::Create { uri: None };
        }

        match self.most_similar(graph, &label) {
            Some((index, similarity)) if similarity >= self.threshold => {
                debug!(
                    "merging '{}' into property {} (similarity {:.3})",
                    tree.label(),
                    index,
                    similarity
                );
                MergeDecision::Extend(index)
            }
            _ => MergeDecision::Create { uri: None },
        }
    }
}

/// Every tree becomes a property of its own
#[derive(Debug, Clone, Default)]
pub struct IsolatedMerging;

impl PropertyMerging for IsolatedMerging {
    fn resolve(&self, _graph: &BackgroundKnowledgeGraph, tree: &PropertyTree) -> MergeDecision {
        MergeDecision::Create {
            uri: tree.context().property_uri().map(str::to_string),
        }
    }
}
