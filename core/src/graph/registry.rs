//! Registry of named background knowledge graphs
//!
//! Each graph sits behind its own lock, so learning into one graph never
//! blocks annotation against another. Readers of one graph proceed in
//! parallel; a learn call holds the graph's write lock once.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use log::info;

use crate::error::{to_state_error, CoreError, Result};
use super::knowledge_graph::BackgroundKnowledgeGraph;

/// A graph shared between readers and writers
pub type SharedGraph = Arc<RwLock<BackgroundKnowledgeGraph>>;

/// Named graphs
#[derive(Debug, Default)]
pub struct GraphRegistry {
    graphs: RwLock<HashMap<String, SharedGraph>>,
}

impl GraphRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an empty graph under `name`
    pub fn create(&self, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(CoreError::InvalidArgument("Graph name must not be empty".to_string()));
        }

        let mut graphs = self.graphs.write()
            .map_err(|e| CoreError::StateError(format!("Failed to write graph registry: {}", e)))?;
        if graphs.contains_key(name) {
            return Err(CoreError::GraphExists(name.to_string()));
        }

        graphs.insert(name.to_string(), Arc::new(RwLock::new(BackgroundKnowledgeGraph::new(name))));
        info!("Created graph '{}'", name);
        Ok(())
    }

    /// Drop the graph registered under `name`
    pub fn delete(&self, name: &str) -> Result<()> {
        let mut graphs = self.graphs.write()
            .map_err(|e| CoreError::StateError(format!("Failed to write graph registry: {}", e)))?;
        graphs
            .remove(name)
            .ok_or_else(|| CoreError::UnknownGraph(name.to_string()))?;

        info!("Deleted graph '{}'", name);
        Ok(())
    }

    /// Whether a graph is registered under `name`
    pub fn exists(&self, name: &str) -> Result<bool> {
        let graphs = self.graphs.read()
            .map_err(|e| CoreError::StateError(format!("Failed to read graph registry: {}", e)))?;
        Ok(graphs.contains_key(name))
    }

    /// Registered names, sorted
    pub fn names(&self) -> Result<Vec<String>> {
        let graphs = self.graphs.read()
            .map_err(|e| CoreError::StateError(format!("Failed to read graph registry: {}", e)))?;
        let mut names: Vec<String> = graphs.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    /// Shared handle to a graph
    pub fn get(&self, name: &str) -> Result<SharedGraph> {
        let graphs = self.graphs.read()
            .map_err(|e| CoreError::StateError(format!("Failed to read graph registry: {}", e)))?;
        graphs
            .get(name)
            .cloned()
            .ok_or_else(|| CoreError::UnknownGraph(name.to_string()))
    }

    /// Run `f` under the graph's read lock
    pub fn read<T>(&self, name: &str, f: impl FnOnce(&BackgroundKnowledgeGraph) -> T) -> Result<T> {
        let graph = self.get(name)?;
        let guard = graph.read().map_err(to_state_error)?;
        Ok(f(&guard))
    }

    /// Run `f` under the graph's write lock
    pub fn write<T>(&self, name: &str, f: impl FnOnce(&mut BackgroundKnowledgeGraph) -> T) -> Result<T> {
        let graph = self.get(name)?;
        let mut guard = graph.write().map_err(to_state_error)?;
        Ok(f(&mut guard))
    }
}
