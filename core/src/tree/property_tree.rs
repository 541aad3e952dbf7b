//! Property tree structure
//!
//! A property tree stores its nodes in one arena. Children are referenced
//! by [`NodeId`], and the owning tree of a node is simply the arena it lives
//! in, so no node holds a pointer back to its tree.

use std::fmt::{Display, Formatter, Result as FmtResult};
use serde::{Serialize, Deserialize};

use crate::error::CoreError;
use crate::models::{AttributeValuePair, Context, Label};
use super::partition::Partition;

/// Index of a node inside its tree's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root of every tree
    pub const ROOT: NodeId = NodeId(0);

    /// Arena index
    pub fn index(self) -> usize {
        self.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "#{}", self.0)
    }
}

/// Role of a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Tree root, carrying the column label
    Root(Label),

    /// Split node, carrying the constraint that selected its values
    Pair(AttributeValuePair),
}

/// One vertex of a property tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Root or split node
    pub kind: NodeKind,

    /// Values selected by the path from the root
    pub partition: Partition,

    /// Constraints accumulated from the root, root first
    pub pairs: Vec<AttributeValuePair>,

    /// Child nodes
    pub children: Vec<NodeId>,
}

impl Node {
    /// Whether the node has no children
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of constraints on the path from the root
    pub fn depth(&self) -> usize {
        self.pairs.len()
    }

    /// The constraint this node added, `None` for the root
    pub fn pair(&self) -> Option<&AttributeValuePair> {
        match &self.kind {
            NodeKind::Root(_) => None,
            NodeKind::Pair(pair) => Some(pair),
        }
    }
}

/// The recursively split values of one numeric column
///
/// Deserialization checks the arena shape: a root at index 0, split nodes
/// everywhere else, and every split node the child of exactly one earlier
/// node whose path it extends.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "TreeArena")]
pub struct PropertyTree {
    nodes: Vec<Node>,
    context: Context,
}

#[derive(Deserialize)]
struct TreeArena {
    nodes: Vec<Node>,
    context: Context,
}

impl TryFrom<TreeArena> for PropertyTree {
    type Error = CoreError;

    fn try_from(arena: TreeArena) -> Result<Self, Self::Error> {
        let invalid = |reason: String| CoreError::InvalidArgument(format!("malformed property tree: {}", reason));

        let Some(root) = arena.nodes.first() else {
            return Err(invalid("no root node".to_string()));
        };
        if !matches!(root.kind, NodeKind::Root(_)) || !root.pairs.is_empty() {
            return Err(invalid("node #0 is not a root".to_string()));
        }

        let mut parents: Vec<Option<usize>> = vec![None; arena.nodes.len()];
        for (index, node) in arena.nodes.iter().enumerate() {
            if index > 0 && !matches!(node.kind, NodeKind::Pair(_)) {
                return Err(invalid(format!("node #{} is a second root", index)));
            }
            for child in &node.children {
                if child.0 <= index || child.0 >= arena.nodes.len() {
                    return Err(invalid(format!("node #{} has child {} out of order", index, child)));
                }
                if parents[child.0].replace(index).is_some() {
                    return Err(invalid(format!("node {} has two parents", child)));
                }
            }
        }

        for (index, node) in arena.nodes.iter().enumerate().skip(1) {
            let Some(parent) = parents[index] else {
                return Err(invalid(format!("node #{} is unreachable", index)));
            };
            let extends = match (node.pairs.split_last(), node.pair()) {
                (Some((last, prefix)), Some(pair)) => last == pair && prefix == arena.nodes[parent].pairs.as_slice(),
                _ => false,
            };
            if !extends {
                return Err(invalid(format!("path of node #{} does not extend its parent's", index)));
            }
        }

        Ok(PropertyTree {
            nodes: arena.nodes,
            context: arena.context,
        })
    }
}

impl PropertyTree {
    /// Create a tree holding only its root
    pub fn new(label: Label, partition: Partition, context: Context) -> Self {
        PropertyTree {
            nodes: vec![Node {
                kind: NodeKind::Root(label),
                partition,
                pairs: Vec::new(),
                children: Vec::new(),
            }],
            context,
        }
    }

    /// Attach a split node under `parent`; its path extends the parent's path
    ///
    /// Panics if `parent` is not a node of this tree.
    pub(crate) fn attach(
        &mut self,
        parent: NodeId,
        pair: AttributeValuePair,
        partition: Partition,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        let mut pairs = self.nodes[parent.0].pairs.clone();
        pairs.push(pair.clone());

        self.nodes.push(Node {
            kind: NodeKind::Pair(pair),
            partition,
            pairs,
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Root node
    pub fn root(&self) -> &Node {
        &self.nodes[0]
    }

    /// Label of the column the tree was built from
    pub fn label(&self) -> &Label {
        match &self.root().kind {
            NodeKind::Root(label) => label,
            NodeKind::Pair(_) => unreachable!("arena index 0 always holds the root"),
        }
    }

    /// Context snapshot taken when the tree was built
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Node by id
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree has at least its root
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Length of the longest root-to-leaf path, in constraints
    pub fn depth(&self) -> usize {
        self.nodes.iter().map(Node::depth).max().unwrap_or(0)
    }

    /// Root followed by all descendants, in pre-order
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder {
            tree: self,
            stack: vec![NodeId::ROOT],
        }
    }

    /// Nodes without children
    pub fn leaves(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.iter().filter(|(_, node)| node.is_leaf())
    }
}

/// Pre-order traversal of a property tree
#[derive(Debug)]
pub struct PreOrder<'a> {
    tree: &'a PropertyTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = &self.tree.nodes[id.0];
        self.stack.extend(node.children.iter().rev().copied());
        Some((id, node))
    }
}
