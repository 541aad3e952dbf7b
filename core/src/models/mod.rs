//! Data models for tables and their columns
//!
//! This module provides the typed table the core consumes: cell values,
//! column labels, table metadata and the per-column context snapshot taken
//! when a property tree is built.

mod value;
mod label;
mod table;
mod context;

pub use value::{Value, ValueType};
pub use label::{Attribute, AttributeValuePair, DeclaredEntity, Label, Provenance};
pub use table::{Column, Metadata, Table};
pub use context::Context;
