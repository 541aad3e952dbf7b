//! Nearest-node search
//!
//! Every node of every tree in a graph is compared with a query under a
//! weighted distance: a numeric distance between value distributions plus
//! Jaccard dissimilarities between the context URIs of both sides.

mod distance;
mod top_k;
mod matcher;

pub use distance::{jaccard_dissimilarity, KolmogorovSmirnov, NumericDistance};
pub use top_k::{BoundedTopK, MeasuredNode};
pub use matcher::{MatchQuery, MatchWeights, TopKNodesMatcher};
