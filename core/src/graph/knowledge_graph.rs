//! Background knowledge graph

use chrono::{DateTime, Utc};
use log::debug;
use regex::{Regex, RegexBuilder};
use serde::{Serialize, Deserialize};

use crate::error::{to_invalid_argument, CoreError, Result};
use crate::tree::{Node, NodeId, PropertyTree};
use super::merging::{MergeDecision, PropertyMerging};
use super::property::Property;

/// Address of a node inside a graph
///
/// Storage is append-only, so a reference stays valid for the lifetime of
/// the graph. The derived ordering is the graph's scan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeRef {
    /// Index of the property
    pub property: usize,
    /// Index of the instance tree within the property
    pub instance: usize,
    /// Node within the tree
    pub node: NodeId,
}

/// Named store of learned properties
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackgroundKnowledgeGraph {
    name: String,
    created_at: DateTime<Utc>,
    properties: Vec<Property>,
}

impl BackgroundKnowledgeGraph {
    /// Create an empty graph
    pub fn new(name: impl Into<String>) -> Self {
        BackgroundKnowledgeGraph {
            name: name.into(),
            created_at: Utc::now(),
            properties: Vec::new(),
        }
    }

    /// Graph name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Creation time
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Properties in insertion order
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Property by index
    pub fn property(&self, index: usize) -> Option<&Property> {
        self.properties.get(index)
    }

    /// Number of properties
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether nothing has been learned yet
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Total number of nodes over every tree of every property
    pub fn node_count(&self) -> usize {
        self.properties.iter().map(Property::node_count).sum()
    }

    /// Index of the property carrying `uri`
    pub fn position_by_uri(&self, uri: &str) -> Option<usize> {
        self.properties.iter().position(|p| p.uri() == Some(uri))
    }

    /// Add learned trees, letting `merging` decide where each one goes
    ///
    /// Trees are placed one after another, so a tree sees the properties
    /// created by earlier trees of the same batch. Returns the property
    /// index of every tree, in input order.
    pub fn add_property_trees(
        &mut self,
        trees: Vec<PropertyTree>,
        merging: &dyn PropertyMerging,
    ) -> Vec<usize> {
        let mut placed = Vec::with_capacity(trees.len());

        for tree in trees {
            let index = match merging.resolve(self, &tree) {
                MergeDecision::Extend(index) if index < self.properties.len() => index,
                MergeDecision::Extend(index) => {
                    debug!("merge target {} out of range, creating a new property", index);
                    self.create_property(tree.context().property_uri().map(str::to_string))
                }
                MergeDecision::Create { uri } => self.create_property(uri),
            };

            debug!(
                "graph '{}': tree '{}' added to property {}",
                self.name,
                tree.label(),
                index
            );
            self.properties[index].add_instance(tree);
            placed.push(index);
        }

        placed
    }

    fn create_property(&mut self, uri: Option<String>) -> usize {
        self.properties.push(Property::new(uri));
        self.properties.len() - 1
    }

    /// Properties whose URI or instance label matches `pattern`
    ///
    /// `flags` may combine `i` (case-insensitive), `m` (multi-line), `s`
    /// (dot matches newline) and `x` (ignore whitespace). Returns at most
    /// `limit` properties in graph order.
    pub fn search(&self, pattern: &str, flags: &str, limit: usize) -> Result<Vec<&Property>> {
        let regex = build_regex(pattern, flags)?;

        let found = self
            .properties
            .iter()
            .filter(|property| {
                property.uri().map_or(false, |uri| regex.is_match(uri))
                    || property.labels().any(|label| regex.is_match(label.text()))
            })
            .take(limit)
            .collect();

        Ok(found)
    }

    /// Property, tree and node addressed by `node_ref`
    pub fn resolve(&self, node_ref: NodeRef) -> Option<(&Property, &PropertyTree, &Node)> {
        let property = self.properties.get(node_ref.property)?;
        let tree = property.instances().get(node_ref.instance)?;
        let node = tree.node(node_ref.node)?;
        Some((property, tree, node))
    }

    /// Every node of the graph in scan order: properties, then instances, then pre-order
    pub fn nodes(&self) -> impl Iterator<Item = (NodeRef, &PropertyTree, &Node)> + '_ {
        self.properties.iter().enumerate().flat_map(|(p, property)| {
            property.instances().iter().enumerate().flat_map(move |(i, tree)| {
                tree.iter().map(move |(id, node)| {
                    let node_ref = NodeRef {
                        property: p,
                        instance: i,
                        node: id,
                    };
                    (node_ref, tree, node)
                })
            })
        })
    }
}

fn build_regex(pattern: &str, flags: &str) -> Result<Regex> {
    let mut builder = RegexBuilder::new(pattern);
    for flag in flags.chars() {
        match flag {
            'i' => {
                builder.case_insensitive(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            'x' => {
                builder.ignore_whitespace(true);
            }
            c => {
                return Err(CoreError::InvalidArgument(format!("Unknown regex flag: '{}'", c)));
            }
        }
    }
    builder.build().map_err(to_invalid_argument)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::merging::{DeclaredUriMerging, IsolatedMerging};
    use crate::models::{Attribute, AttributeValuePair, Context, DeclaredEntity, Label};
    use crate::tree::Partition;

    fn tree(label: &str, uri: Option<&str>) -> PropertyTree {
        let context = Context {
            property: uri.map(DeclaredEntity::with_uri),
            ..Context::default()
        };
        PropertyTree::new(Label::synthetic(label), Partition::from_values([1.0, 2.0, 3.0]), context)
    }

    fn sample_graph() -> BackgroundKnowledgeGraph {
        let mut graph = BackgroundKnowledgeGraph::new("cities");
        graph.add_property_trees(
            vec![
                tree("Population", Some("http://dbpedia.org/ontology/populationTotal")),
                tree("Elevation", None),
                tree("Inhabitants", Some("http://dbpedia.org/ontology/populationTotal")),
                tree("Area km2", Some("http://dbpedia.org/ontology/areaTotal")),
            ],
            &DeclaredUriMerging::default(),
        );
        graph
    }

    #[test]
    fn test_batch_sees_earlier_trees() {
        let mut graph = BackgroundKnowledgeGraph::new("cities");
        let placed = graph.add_property_trees(
            vec![
                tree("Population", Some("dbo:population")),
                tree("Inhabitants", Some("dbo:population")),
                tree("Area", Some("dbo:area")),
            ],
            &DeclaredUriMerging::default(),
        );

        assert_eq!(placed, vec![0, 0, 1]);
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.property(0).unwrap().instances().len(), 2);
        assert_eq!(graph.position_by_uri("dbo:area"), Some(1));
        assert_eq!(graph.node_count(), 3);

        let isolated = graph.add_property_trees(
            vec![tree("Population", Some("dbo:population"))],
            &IsolatedMerging,
        );
        assert_eq!(isolated, vec![2]);
    }

    #[test]
    fn test_search_matches_uri_and_labels() {
        let graph = sample_graph();

        let found = graph.search("population", "", 10).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].instances().len(), 2);

        assert!(graph.search("^elevation$", "", 10).unwrap().is_empty());
        let found = graph.search("^elevation$", "i", 10).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].uri(), None);

        let all = graph.search(".", "", 10).unwrap();
        assert_eq!(all.len(), 3);
        let limited = graph.search(".", "", 2).unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].id(), all[0].id());
        assert_eq!(limited[1].id(), all[1].id());

        let spaced = graph.search("area \\s km2", "x", 10).unwrap();
        assert!(spaced.is_empty());
        let spaced = graph.search("area \\s km2", "ix", 10).unwrap();
        assert_eq!(spaced.len(), 1);
    }

    #[test]
    fn test_search_rejects_bad_input() {
        let graph = sample_graph();

        assert!(matches!(graph.search("population", "q", 10), Err(CoreError::InvalidArgument(_))));
        assert!(matches!(graph.search("(unclosed", "", 10), Err(CoreError::InvalidArgument(_))));
    }

    #[test]
    fn test_resolve_and_scan_order() {
        let mut graph = BackgroundKnowledgeGraph::new("cities");
        let mut split = tree("Population", Some("dbo:population"));
        split.attach(
            NodeId::ROOT,
            AttributeValuePair::new(Attribute::new("Country"), "France"),
            Partition::from_values([1.0, 2.0]),
        );
        graph.add_property_trees(vec![split, tree("Area", None)], &DeclaredUriMerging::default());

        let refs: Vec<NodeRef> = graph.nodes().map(|(r, _, _)| r).collect();
        assert_eq!(refs.len(), 3);
        let mut sorted = refs.clone();
        sorted.sort();
        assert_eq!(refs, sorted);

        let (property, tree, node) = graph.resolve(refs[1]).unwrap();
        assert_eq!(property.uri(), Some("dbo:population"));
        assert_eq!(tree.label().text(), "Population");
        assert_eq!(node.pairs.len(), 1);

        let missing = NodeRef { property: 5, instance: 0, node: NodeId::ROOT };
        assert!(graph.resolve(missing).is_none());
    }
}
