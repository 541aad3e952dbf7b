//! Background knowledge
//!
//! Learned property trees are grouped into properties inside named graphs.
//! Graphs live in a [`GraphRegistry`]; a [`Learner`] fills them from tables.

mod property;
mod knowledge_graph;
pub mod merging;
mod registry;
mod learner;

pub use property::Property;
pub use knowledge_graph::{BackgroundKnowledgeGraph, NodeRef};
pub use merging::{DeclaredUriMerging, IsolatedMerging, MergeDecision, PropertyMerging};
pub use registry::{GraphRegistry, SharedGraph};
pub use learner::{LearnReport, LearnedColumn, Learner};
