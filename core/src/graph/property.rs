//! Properties: groups of trees that describe the same real-world attribute

use serde::{Serialize, Deserialize};
use uuid::Uuid;

use crate::models::Label;
use crate::tree::PropertyTree;
use crate::utils::generate_uuid;

/// Semantic equivalence class of property trees
///
/// Membership only grows: trees are appended, never removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    id: Uuid,
    uri: Option<String>,
    instances: Vec<PropertyTree>,
}

impl Property {
    /// Create an empty property
    pub fn new(uri: Option<String>) -> Self {
        Property {
            id: generate_uuid(),
            uri,
            instances: Vec::new(),
        }
    }

    /// Unique id
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Knowledge-base URI, when known
    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    /// Learned trees
    pub fn instances(&self) -> &[PropertyTree] {
        &self.instances
    }

    /// Labels of the learned columns
    pub fn labels(&self) -> impl Iterator<Item = &Label> + '_ {
        self.instances.iter().map(PropertyTree::label)
    }

    /// Total number of nodes over all instances
    pub fn node_count(&self) -> usize {
        self.instances.iter().map(PropertyTree::len).sum()
    }

    pub(crate) fn add_instance(&mut self, tree: PropertyTree) {
        self.instances.push(tree);
    }

    /// Human-readable name: the URI, else the first instance label
    pub fn display_name(&self) -> String {
        match (&self.uri, self.instances.first()) {
            (Some(uri), _) => uri.clone(),
            (None, Some(tree)) => tree.label().text().to_string(),
            (None, None) => self.id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Context;
    use crate::tree::Partition;

    #[test]
    fn test_instances_grow() {
        let mut property = Property::new(None);
        let fallback = property.id().to_string();
        assert_eq!(property.display_name(), fallback);

        property.add_instance(PropertyTree::new(
            Label::synthetic("Population"),
            Partition::from_values([1.0, 2.0]),
            Context::default(),
        ));
        property.add_instance(PropertyTree::new(
            Label::synthetic("Inhabitants"),
            Partition::from_values([3.0, 4.0]),
            Context::default(),
        ));

        assert_eq!(property.instances().len(), 2);
        assert_eq!(property.node_count(), 2);
        assert_eq!(property.display_name(), "Population");
        let labels: Vec<&str> = property.labels().map(Label::text).collect();
        assert_eq!(labels, vec!["Population", "Inhabitants"]);

        let with_uri = Property::new(Some("dbo:population".to_string()));
        assert_eq!(with_uri.display_name(), "dbo:population");
        assert_eq!(with_uri.uri(), Some("dbo:population"));
    }
}
