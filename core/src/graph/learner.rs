//! Learning property trees from tables into a graph

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use log::info;
use serde::{Serialize, Deserialize};

use crate::config::CoreConfig;
use crate::error::Result;
use crate::models::Table;
use crate::tree::{PropertyTree, PropertyTreeBuilder};
use crate::utils::Timer;
use super::knowledge_graph::BackgroundKnowledgeGraph;
use super::merging::{self, PropertyMerging};
use super::registry::GraphRegistry;

/// Where one learned column ended up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnedColumn {
    /// Column index in the source table
    pub column: usize,

    /// Column header
    pub label: String,

    /// Index of the property the tree joined
    pub property: usize,

    /// Whether this column started the property
    pub created: bool,
}

/// Summary of one learn call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnReport {
    /// Learned columns in column order
    pub columns: Vec<LearnedColumn>,

    /// Number of properties in the graph after learning
    pub properties: usize,
}

impl LearnReport {
    /// Number of properties this call created
    pub fn created(&self) -> usize {
        self.columns.iter().filter(|c| c.created).count()
    }
}

/// Builds trees for a table's declared numeric columns and adds them to a graph
#[derive(Debug, Clone)]
pub struct Learner {
    builder: PropertyTreeBuilder,
    merging: Arc<dyn PropertyMerging>,
    only_with_properties: bool,
}

impl Learner {
    /// Create a learner from its parts
    pub fn new(
        builder: PropertyTreeBuilder,
        merging: Arc<dyn PropertyMerging>,
        only_with_properties: bool,
    ) -> Self {
        Learner {
            builder,
            merging,
            only_with_properties,
        }
    }

    /// Create a learner with the configured tree bounds and merging strategy
    pub fn from_config(config: &CoreConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(
            PropertyTreeBuilder::new(config.tree.clone()),
            merging::from_config(&config.merging),
            config.learning.only_with_properties,
        ))
    }

    /// Trees of every numeric column, using declared metadata only
    pub fn collect_trees(&self, table: &Table) -> Vec<(usize, PropertyTree)> {
        let properties = table.metadata().properties(false);
        let classes = table.metadata().classes(false);

        table
            .numeric_columns()
            .into_iter()
            .filter_map(|column| {
                self.builder
                    .build(table, column, &properties, &classes, self.only_with_properties)
                    .map(|tree| (column, tree))
            })
            .collect()
    }

    /// Learn `table` into the registered graph `name`
    ///
    /// Trees are built before the graph is locked; the additions of one call
    /// then become visible all at once.
    pub fn learn(&self, registry: &GraphRegistry, name: &str, table: &Table) -> Result<LearnReport> {
        let trees = self.collect_trees(table);
        registry.write(name, |graph| self.add(graph, table, trees))
    }

    /// Learn `table` into a graph held directly
    pub fn learn_into(&self, graph: &mut BackgroundKnowledgeGraph, table: &Table) -> LearnReport {
        let trees = self.collect_trees(table);
        self.add(graph, table, trees)
    }

    fn add(
        &self,
        graph: &mut BackgroundKnowledgeGraph,
        table: &Table,
        trees: Vec<(usize, PropertyTree)>,
    ) -> LearnReport {
        let mut timer = Timer::new(format!("learn '{}'", graph.name()))
            .with_info_threshold(Duration::from_secs(1))
            .with_warn_threshold(Duration::from_secs(10));
        timer.add_items(trees.len() as u64);

        let before = graph.len();
        let (columns, trees): (Vec<usize>, Vec<PropertyTree>) = trees.into_iter().unzip();
        let placed = graph.add_property_trees(trees, self.merging.as_ref());

        let mut seen = BTreeSet::new();
        let columns: Vec<LearnedColumn> = columns
            .into_iter()
            .zip(placed)
            .map(|(column, property)| LearnedColumn {
                column,
                label: table
                    .column(column)
                    .map(|c| c.label.text().to_string())
                    .unwrap_or_default(),
                property,
                created: property >= before && seen.insert(property),
            })
            .collect();

        let report = LearnReport {
            columns,
            properties: graph.len(),
        };
        info!(
            "Learned {} columns of '{}' into graph '{}' ({} new properties, {} total)",
            report.columns.len(),
            table.source().unwrap_or("table"),
            graph.name(),
            report.created(),
            report.properties
        );
        report
    }
}

impl Default for Learner {
    fn default() -> Self {
        let config = CoreConfig::default();
        Self::new(
            PropertyTreeBuilder::new(config.tree.clone()),
            merging::from_config(&config.merging),
            config.learning.only_with_properties,
        )
    }
}
