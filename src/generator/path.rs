//! Traversal path
//!
//! The chain of schema nodes from the root element down to the node being
//! visited. It drives the recursion cutoff and answers "which element or
//! complex type encloses this node" questions.

use std::sync::Arc;

use crate::namespaces::QName;
use crate::schema::{ComplexType, Compositor, ElementDecl, Wildcard};

/// One step of the traversal
#[derive(Debug, Clone)]
pub enum PathNode {
    /// An element being generated
    Element(Arc<ElementDecl>),
    /// The complex type of the enclosing element, with its effective
    /// attribute wildcard
    ComplexType {
        /// Type definition
        definition: Arc<ComplexType>,
        /// Attribute wildcard in effect for the type
        attribute_wildcard: Option<Arc<Wildcard>>,
    },
    /// A model group
    ModelGroup(Compositor),
    /// An attribute being generated
    Attribute(QName),
    /// A wildcard being generated
    Wildcard(Arc<Wildcard>),
}

/// Ancestor chain of the current node, root first
#[derive(Debug, Clone, Default)]
pub struct RecursionPath {
    nodes: Vec<PathNode>,
}

impl RecursionPath {
    /// Create an empty path
    pub fn new() -> Self {
        Self::default()
    }

    /// Descend into a node
    pub fn push(&mut self, node: PathNode) {
        self.nodes.push(node);
    }

    /// Return from the current node
    pub fn pop(&mut self) -> Option<PathNode> {
        self.nodes.pop()
    }

    /// Number of nodes on the path
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the path is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The current node
    pub fn current(&self) -> Option<&PathNode> {
        self.nodes.last()
    }

    /// The parent of the current node
    pub fn parent(&self) -> Option<&PathNode> {
        self.nodes.len().checked_sub(2).and_then(|i| self.nodes.get(i))
    }

    /// How many times `decl` already occurs among the elements on the path
    pub fn recursion_depth(&self, decl: &Arc<ElementDecl>) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, PathNode::Element(e) if Arc::ptr_eq(e, decl)))
            .count()
    }

    /// Number of elements on the path
    pub fn element_depth(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, PathNode::Element(_)))
            .count()
    }

    /// Innermost element on the path
    pub fn nearest_element(&self) -> Option<&Arc<ElementDecl>> {
        self.nodes.iter().rev().find_map(|node| match node {
            PathNode::Element(decl) => Some(decl),
            _ => None,
        })
    }

    /// Whether the current wildcard node is the attribute wildcard of the
    /// complex type directly above it
    pub fn is_attribute_wildcard(&self) -> bool {
        match (self.current(), self.parent()) {
            (
                Some(PathNode::Wildcard(wildcard)),
                Some(PathNode::ComplexType {
                    attribute_wildcard: Some(attribute_wildcard),
                    ..
                }),
            ) => Arc::ptr_eq(wildcard, attribute_wildcard),
            _ => false,
        }
    }
}
