//! Property tree builder
//!
//! Splits a column's values recursively by context columns. Every level
//! consumes one context column, so the depth of a tree never exceeds the
//! number of context columns of its table and recursion always ends.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use log::debug;

use crate::config::TreeConfig;
use crate::models::{AttributeValuePair, Context, DeclaredEntity, Table};
use super::partition::Partition;
use super::property_tree::{NodeId, PropertyTree};
use super::subcontext::{
    ColumnValueCompiler, CorrelationRatioMatcher, SubcontextCompiler, SubcontextMatcher,
};

/// Builds property trees from table columns
#[derive(Debug, Clone)]
pub struct PropertyTreeBuilder {
    config: TreeConfig,
    compiler: Arc<dyn SubcontextCompiler>,
    matcher: Arc<dyn SubcontextMatcher>,
}

impl PropertyTreeBuilder {
    /// Builder with the default split strategies
    pub fn new(config: TreeConfig) -> Self {
        let matcher = CorrelationRatioMatcher::new(config.min_separation);
        Self::with_strategies(config, Arc::new(ColumnValueCompiler), Arc::new(matcher))
    }

    /// Builder with custom split strategies
    pub fn with_strategies(
        config: TreeConfig,
        compiler: Arc<dyn SubcontextCompiler>,
        matcher: Arc<dyn SubcontextMatcher>,
    ) -> Self {
        PropertyTreeBuilder {
            config,
            compiler,
            matcher,
        }
    }

    /// Size thresholds in use
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Build the tree of one numeric column
    ///
    /// Returns `None` when the column is not numeric, has fewer values than
    /// the absolute minimum, or (with `only_with_properties`) declares no
    /// property.
    pub fn build(
        &self,
        table: &Table,
        column: usize,
        declared_properties: &BTreeMap<usize, DeclaredEntity>,
        declared_classes: &BTreeMap<usize, DeclaredEntity>,
        only_with_properties: bool,
    ) -> Option<PropertyTree> {
        let source = table.column(column)?;
        if !source.is_numeric() {
            debug!("column {} is not numeric", column);
            return None;
        }
        if only_with_properties && !declared_properties.contains_key(&column) {
            debug!("column {} ({}) declares no property", column, source.label);
            return None;
        }

        let partition = Partition::from_column(table, column);
        if partition.len() < self.config.min_absolute_size {
            debug!(
                "column {} ({}) has {} values, fewer than {}",
                column,
                source.label,
                partition.len(),
                self.config.min_absolute_size
            );
            return None;
        }

        let context = Context::capture(table, column, declared_properties, declared_classes);
        let available = context.context_columns.clone();
        let mut tree = PropertyTree::new(source.label.clone(), partition, context);
        self.grow(&mut tree, NodeId::ROOT, &available, table);

        debug!(
            "built tree for column {} ({}): {} nodes, depth {}",
            column,
            source.label,
            tree.len(),
            tree.depth()
        );
        Some(tree)
    }

    fn grow(&self, tree: &mut PropertyTree, node: NodeId, available: &BTreeSet<usize>, table: &Table) {
        if available.is_empty() {
            return;
        }

        let partition = match tree.node(node) {
            Some(n) => n.partition.clone(),
            None => return,
        };

        let candidates = self.compiler.compile(&partition, available, table, &self.config);
        if candidates.is_empty() {
            return;
        }

        let Some(winner) = self.matcher.select(candidates, &partition, &self.config) else {
            return;
        };

        let mut remaining = available.clone();
        remaining.remove(&winner.column);

        let parent_size = partition.len();
        let branches: Vec<(AttributeValuePair, Partition)> = winner
            .accepted_parts(parent_size, &self.config)
            .map(|(value, part)| {
                (AttributeValuePair::new(winner.attribute.clone(), value.clone()), part.clone())
            })
            .collect();

        for (pair, part) in branches {
            let child = tree.attach(node, pair, part);
            self.grow(tree, child, &remaining, table);
        }
    }
}

impl Default for PropertyTreeBuilder {
    fn default() -> Self {
        Self::new(TreeConfig::default())
    }
}
