//! Top-K nearest node search over a background knowledge graph

use std::collections::BTreeSet;
use std::sync::Arc;
use log::debug;

use crate::config::MatcherConfig;
use crate::error::{CoreError, Result};
use crate::graph::{BackgroundKnowledgeGraph, NodeRef};
use super::distance::{jaccard_dissimilarity, KolmogorovSmirnov, NumericDistance};
use super::top_k::{BoundedTopK, MeasuredNode};

/// Relative importance of the three distance components
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchWeights {
    /// Weight of the numeric distance
    pub values: f64,
    /// Weight of the context-property dissimilarity
    pub properties: f64,
    /// Weight of the context-class dissimilarity
    pub classes: f64,
}

impl MatchWeights {
    /// Weights of the given components
    pub fn new(values: f64, properties: f64, classes: f64) -> Self {
        MatchWeights {
            values,
            properties,
            classes,
        }
    }

    /// Numeric distance only
    pub fn distance_only() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }

    /// The same weights scaled to sum to one
    pub fn normalized(&self) -> Result<Self> {
        let weights = [self.values, self.properties, self.classes];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(CoreError::InvalidArgument(format!(
                "weights must be non-negative numbers, got {:?}",
                weights
            )));
        }
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return Err(CoreError::InvalidArgument("weights must not all be zero".to_string()));
        }
        Ok(Self::new(self.values / total, self.properties / total, self.classes / total))
    }
}

impl From<&MatcherConfig> for MatchWeights {
    fn from(config: &MatcherConfig) -> Self {
        Self::new(config.values_weight, config.properties_weight, config.classes_weight)
    }
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self::from(&MatcherConfig::default())
    }
}

/// What a node is matched against
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchQuery {
    /// Values of the query node
    pub values: Vec<f64>,
    /// Property URIs of the query's context columns
    pub properties: BTreeSet<String>,
    /// Class URIs of the query's context columns
    pub classes: BTreeSet<String>,
}

impl MatchQuery {
    /// Query made of values alone
    pub fn from_values(values: Vec<f64>) -> Self {
        MatchQuery {
            values,
            ..Self::default()
        }
    }

    /// Whether the query carries any context URI
    pub fn has_context(&self) -> bool {
        !self.properties.is_empty() || !self.classes.is_empty()
    }
}

/// Finds the graph nodes nearest to a query
#[derive(Debug, Clone)]
pub struct TopKNodesMatcher {
    distance: Arc<dyn NumericDistance>,
}

impl TopKNodesMatcher {
    /// Matcher using the given numeric distance
    pub fn new(distance: Arc<dyn NumericDistance>) -> Self {
        TopKNodesMatcher { distance }
    }

    /// Up to `k` nodes nearest to `values` by numeric distance alone
    pub fn match_values(
        &self,
        graph: &BackgroundKnowledgeGraph,
        values: &[f64],
        k: usize,
    ) -> Result<Vec<MeasuredNode>> {
        let query = MatchQuery::from_values(values.to_vec());
        self.match_weighted(graph, &query, MatchWeights::distance_only(), k)
    }

    /// Up to `k` nodes nearest to `query` under the weighted distance, nearest first
    pub fn match_weighted(
        &self,
        graph: &BackgroundKnowledgeGraph,
        query: &MatchQuery,
        weights: MatchWeights,
        k: usize,
    ) -> Result<Vec<MeasuredNode>> {
        if k < 1 {
            return Err(CoreError::InvalidArgument("k must be at least 1".to_string()));
        }
        if query.values.is_empty() {
            return Err(CoreError::InvalidArgument("query has no values".to_string()));
        }
        let weights = weights.normalized()?;

        let mut top = BoundedTopK::with_candidates(k, graph.node_count());
        let mut scanned = 0usize;

        for (p, property) in graph.properties().iter().enumerate() {
            for (i, tree) in property.instances().iter().enumerate() {
                let context = tree.context();
                let properties = if weights.properties > 0.0 {
                    jaccard_dissimilarity(&query.properties, &context.property_uris())
                } else {
                    0.0
                };
                let classes = if weights.classes > 0.0 {
                    jaccard_dissimilarity(&query.classes, &context.class_uris())
                } else {
                    0.0
                };
                let context_part = weights.properties * properties + weights.classes * classes;

                for (id, node) in tree.iter() {
                    let numeric = self.distance.compute(&query.values, node.partition.values());
                    let node_ref = NodeRef {
                        property: p,
                        instance: i,
                        node: id,
                    };
                    top.offer(MeasuredNode::new(node_ref, weights.values * numeric + context_part));
                    scanned += 1;
                }
            }
        }

        debug!(
            "matched {} values against {} nodes of '{}', kept {}",
            query.values.len(),
            scanned,
            graph.name(),
            top.len()
        );
        Ok(top.into_sorted_vec())
    }
}

impl Default for TopKNodesMatcher {
    fn default() -> Self {
        Self::new(Arc::new(KolmogorovSmirnov))
    }
}
