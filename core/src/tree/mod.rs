//! Property trees
//!
//! This module provides the recursive split of a numeric column by its
//! context columns: partitions, candidate splits, the arena tree and the
//! builder that grows it.

mod partition;
mod subcontext;
mod property_tree;
mod builder;

pub use partition::Partition;
pub use subcontext::{
    ColumnValueCompiler, CorrelationRatioMatcher, Subcontext, SubcontextCompiler,
    SubcontextMatcher,
};
pub use property_tree::{Node, NodeId, NodeKind, PreOrder, PropertyTree};
pub use builder::PropertyTreeBuilder;
