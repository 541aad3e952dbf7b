//! # Numeric Annotation Core
//!
//! Core data structures and algorithms for annotating numeric table columns
//! from background knowledge. Learned columns are split recursively by their
//! context columns into property trees, grouped into properties inside a
//! background knowledge graph, and later matched against the trees of unseen
//! columns to rank the properties those columns most likely represent.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod annotation;
pub mod config;
pub mod error;
pub mod graph;
pub mod matching;
pub mod models;
pub mod tree;
pub mod utils;

/// Re-export common types for ease of use
pub use annotation::{Annotation, Annotator, Statistics};
pub use config::CoreConfig;
pub use error::CoreError;
pub use graph::{BackgroundKnowledgeGraph, GraphRegistry, Learner, Property};
pub use matching::{MeasuredNode, TopKNodesMatcher};
pub use models::{Label, Table, Value};
pub use tree::{PropertyTree, PropertyTreeBuilder};

/// Result type for the core crate
pub type Result<T> = error::Result<T>;

/// Version of the core crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
