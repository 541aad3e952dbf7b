//! Error types for the core crate
//!
//! This module provides a consolidated error type for the core crate.
//! Insufficient data (a column too small to build a tree, a node with no
//! acceptable split) is never an error: builders return `None` or a leaf.

use thiserror::Error;
use std::io;

/// Core error type
#[derive(Error, Debug)]
pub enum CoreError {
    /// Argument rejected before any mutation took place
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No graph is registered under the given name
    #[error("Unknown graph: {0}")]
    UnknownGraph(String),

    /// A graph with the given name is already registered
    #[error("Graph already exists: {0}")]
    GraphExists(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Shared state could not be accessed (poisoned lock)
    #[error("State management error: {0}")]
    StateError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type for the core crate
pub type Result<T> = std::result::Result<T, CoreError>;

/// Convert a displayable error to an InvalidArgument
pub fn to_invalid_argument<E: std::fmt::Display>(err: E) -> CoreError {
    CoreError::InvalidArgument(err.to_string())
}

/// Convert a displayable error to a StateError
pub fn to_state_error<E: std::fmt::Display>(err: E) -> CoreError {
    CoreError::StateError(err.to_string())
}

/// Convert a displayable error to a ConfigError
pub fn to_config_error<E: std::fmt::Display>(err: E) -> CoreError {
    CoreError::ConfigError(err.to_string())
}
