//! Annotation of numeric columns
//!
//! Matches of every node of a column's tree are grouped by learned label,
//! by property and by context constraints, then ranked by a
//! [`ResultAggregator`] and scored with [`Statistics`].

pub mod aggregate;
mod statistics;
mod annotator;

pub use aggregate::{AverageDistance, MajorityVote, ResultAggregator};
pub use statistics::Statistics;
pub use annotator::{Annotation, Annotator, PropertySummary, Ranked};
