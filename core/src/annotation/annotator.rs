//! Column annotation
//!
//! For every numeric column of a table the annotator builds a property tree,
//! matches each of its nodes against the graph and ranks what the matches
//! point at: the labels of the learned columns, the properties they belong
//! to and the context constraints of the matched nodes.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use log::{debug, info, warn};
use serde::{Serialize, Deserialize};
use uuid::Uuid;

use crate::config::CoreConfig;
use crate::error::Result;
use crate::graph::{BackgroundKnowledgeGraph, GraphRegistry, NodeRef, Property};
use crate::matching::{MatchQuery, MatchWeights, MeasuredNode, TopKNodesMatcher};
use crate::models::{AttributeValuePair, DeclaredEntity, Label, Table};
use crate::tree::PropertyTreeBuilder;
use crate::utils::Timer;
use super::aggregate::{self, ResultAggregator};
use super::statistics::Statistics;

/// A ranked candidate and the statistics of its matches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ranked<T> {
    /// The candidate
    pub item: T,

    /// Support among the column's matches
    pub statistics: Statistics,
}

/// Identity of a property in an annotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySummary {
    /// Index of the property in its graph
    pub index: usize,

    /// Property id
    pub id: Uuid,

    /// Knowledge-base URI, when known
    pub uri: Option<String>,

    /// Human-readable name
    pub name: String,
}

impl PropertySummary {
    fn of(index: usize, property: &Property) -> Self {
        PropertySummary {
            index,
            id: property.id(),
            uri: property.uri().map(str::to_string),
            name: property.display_name(),
        }
    }
}

/// Ranked annotation candidates of one column, best first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Annotation {
    /// Index of the annotated column
    pub column: usize,

    /// Label of the annotated column
    pub label: Label,

    /// Most likely properties
    pub properties: Vec<Ranked<PropertySummary>>,

    /// Most likely learned column labels
    pub labels: Vec<Ranked<Label>>,

    /// Most likely context constraints
    pub pairs: Vec<Ranked<Vec<AttributeValuePair>>>,

    /// Number of matches over all nodes of the column's tree
    pub matches: usize,
}

impl Annotation {
    /// Best ranked property
    pub fn best_property(&self) -> Option<&PropertySummary> {
        self.properties.first().map(|r| &r.item)
    }
}

/// Annotates numeric columns against a background knowledge graph
#[derive(Debug, Clone)]
pub struct Annotator {
    builder: PropertyTreeBuilder,
    matcher: TopKNodesMatcher,
    aggregator: Arc<dyn ResultAggregator>,
    weights: MatchWeights,
    nodes_per_query: usize,
    k: usize,
    include_collected: bool,
}

impl Annotator {
    /// Create an annotator from a validated configuration
    pub fn new(config: &CoreConfig) -> Result<Self> {
        config.validate()?;
        Ok(Annotator {
            builder: PropertyTreeBuilder::new(config.tree.clone()),
            matcher: TopKNodesMatcher::default(),
            aggregator: aggregate::from_kind(config.annotation.aggregation),
            weights: MatchWeights::from(&config.matcher),
            nodes_per_query: config.matcher.k,
            k: config.annotation.k,
            include_collected: config.annotation.include_collected,
        })
    }

    /// Replace the node matcher
    pub fn with_matcher(mut self, matcher: TopKNodesMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Replace the ranking function
    pub fn with_aggregator(mut self, aggregator: Arc<dyn ResultAggregator>) -> Self {
        self.aggregator = aggregator;
        self
    }

    /// Replace the tree builder
    pub fn with_builder(mut self, builder: PropertyTreeBuilder) -> Self {
        self.builder = builder;
        self
    }

    /// Number of ranked entries kept per grouping
    pub fn k(&self) -> usize {
        self.k
    }

    /// Annotate every numeric column of `table`
    ///
    /// Columns without a tree, or whose matching fails, are left out.
    pub fn annotate(&self, graph: &BackgroundKnowledgeGraph, table: &Table) -> BTreeMap<usize, Annotation> {
        let mut timer = Timer::new(format!("annotate against '{}'", graph.name()))
            .with_info_threshold(Duration::from_secs(1))
            .with_warn_threshold(Duration::from_secs(30));

        let properties = table.metadata().properties(self.include_collected);
        let classes = table.metadata().classes(self.include_collected);
        let mut annotations = BTreeMap::new();

        for column in table.numeric_columns() {
            match self.annotate_column(graph, table, column, &properties, &classes) {
                Ok(Some(annotation)) => {
                    timer.add_items(1);
                    annotations.insert(column, annotation);
                }
                Ok(None) => debug!("column {} has no tree, skipped", column),
                Err(e) => warn!("column {} skipped: {}", column, e),
            }
        }

        info!(
            "Annotated {} of {} numeric columns of '{}' using {}",
            annotations.len(),
            table.numeric_columns().len(),
            table.source().unwrap_or("table"),
            self.aggregator.name()
        );
        annotations
    }

    /// Annotate against a registered graph, holding its read lock throughout
    pub fn annotate_graph(
        &self,
        registry: &GraphRegistry,
        name: &str,
        table: &Table,
    ) -> Result<BTreeMap<usize, Annotation>> {
        registry.read(name, |graph| self.annotate(graph, table))
    }

    fn annotate_column(
        &self,
        graph: &BackgroundKnowledgeGraph,
        table: &Table,
        column: usize,
        properties: &BTreeMap<usize, DeclaredEntity>,
        classes: &BTreeMap<usize, DeclaredEntity>,
    ) -> Result<Option<Annotation>> {
        let Some(tree) = self.builder.build(table, column, properties, classes, false) else {
            return Ok(None);
        };

        let mut query = MatchQuery {
            values: Vec::new(),
            properties: tree.context().property_uris(),
            classes: tree.context().class_uris(),
        };
        let weights = if query.has_context() {
            self.weights
        } else {
            MatchWeights::distance_only()
        };

        let mut matches = Vec::new();
        for (_, node) in tree.iter() {
            query.values = node.partition.values().to_vec();
            matches.extend(self.matcher.match_weighted(graph, &query, weights, self.nodes_per_query)?);
        }
        debug!(
            "column {} ({}): {} nodes, {} matches",
            column,
            tree.label(),
            tree.len(),
            matches.len()
        );

        let labels = group_by(&matches, |node| {
            graph.resolve(node).map(|(_, tree, _)| tree.label().clone())
        });
        let by_property = group_by(&matches, |node| Some(node.property));
        let pairs = group_by(&matches, |node| graph.resolve(node).map(|(_, _, n)| n.pairs.clone()));

        let properties = self
            .top(&by_property, matches.len())
            .into_iter()
            .filter_map(|ranked| {
                let property = graph.property(ranked.item)?;
                Some(Ranked {
                    item: PropertySummary::of(ranked.item, property),
                    statistics: ranked.statistics,
                })
            })
            .collect();

        Ok(Some(Annotation {
            column,
            label: tree.label().clone(),
            properties,
            labels: self.top(&labels, matches.len()),
            pairs: self.top(&pairs, matches.len()),
            matches: matches.len(),
        }))
    }

    fn top<K: Clone + PartialEq>(&self, groups: &[(K, Vec<MeasuredNode>)], total: usize) -> Vec<Ranked<K>> {
        aggregate::rank(self.aggregator.as_ref(), groups)
            .into_iter()
            .take(self.k)
            .filter_map(|key| {
                let (_, group) = groups.iter().find(|(k, _)| *k == key)?;
                Some(Ranked {
                    item: key,
                    statistics: Statistics::compute(group, total),
                })
            })
            .collect()
    }
}

impl Default for Annotator {
    fn default() -> Self {
        let config = CoreConfig::default();
        Annotator {
            builder: PropertyTreeBuilder::new(config.tree),
            matcher: TopKNodesMatcher::default(),
            aggregator: aggregate::from_kind(config.annotation.aggregation),
            weights: MatchWeights::from(&config.matcher),
            nodes_per_query: config.matcher.k,
            k: config.annotation.k,
            include_collected: config.annotation.include_collected,
        }
    }
}

/// Group matches by key, groups in order of first appearance
fn group_by<K: Ord + Clone>(
    matches: &[MeasuredNode],
    key: impl Fn(NodeRef) -> Option<K>,
) -> Vec<(K, Vec<MeasuredNode>)> {
    let mut position: BTreeMap<K, usize> = BTreeMap::new();
    let mut groups: Vec<(K, Vec<MeasuredNode>)> = Vec::new();

    for measured in matches {
        let Some(k) = key(measured.node) else {
            continue;
        };
        match position.get(&k) {
            Some(&index) => groups[index].1.push(*measured),
            None => {
                position.insert(k.clone(), groups.len());
                groups.push((k, vec![*measured]));
            }
        }
    }

    groups
}
