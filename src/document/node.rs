//! YAML node representation.
//!
//! This module provides the tree type that the rest of yamlscout queries.
//! Every vertex of a parsed document is a `Node` carrying its kind, the
//! string form of its scalar content, its resolved YAML tag, and its
//! children in declared order. Mapping children are interleaved: even
//! indices hold key nodes, odd indices hold the paired value nodes. That
//! layout keeps key nodes addressable, which property-name queries
//! (`.name~`) and route-based mutation both rely on.
//!
//! # Example
//!
//! ```
//! use yamlscout::document::node::{Node, NodeKind};
//!
//! let root = Node::mapping(vec![
//!     (Node::string("name"), Node::string("yamlscout")),
//!     (Node::string("stars"), Node::int(3)),
//! ]);
//! assert_eq!(root.kind(), NodeKind::Mapping);
//! assert_eq!(root.content().len(), 4);
//! assert_eq!(root.content()[2].value(), "stars");
//! ```

use std::fmt;

/// The kind of a YAML tree vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A document wrapper; `content[0]` is the root value.
    Document,
    /// A mapping; `content` interleaves key and value nodes.
    Mapping,
    /// A sequence; `content` is the element list.
    Sequence,
    /// A scalar; `value` holds its string form.
    Scalar,
    /// An alias reference, treated as an opaque leaf.
    Alias,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Document => "document",
            NodeKind::Mapping => "mapping",
            NodeKind::Sequence => "sequence",
            NodeKind::Scalar => "scalar",
            NodeKind::Alias => "alias",
        };
        write!(f, "{}", name)
    }
}

/// A vertex in a YAML document tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) value: String,
    pub(crate) tag: String,
    pub(crate) content: Vec<Node>,
}

impl Node {
    /// Creates a document node wrapping `root`.
    pub fn document(root: Node) -> Self {
        Node {
            kind: NodeKind::Document,
            value: String::new(),
            tag: String::new(),
            content: vec![root],
        }
    }

    /// Creates a mapping node from key/value pairs, interleaving them.
    pub fn mapping(pairs: Vec<(Node, Node)>) -> Self {
        let mut content = Vec::with_capacity(pairs.len() * 2);
        for (key, value) in pairs {
            content.push(key);
            content.push(value);
        }
        Node {
            kind: NodeKind::Mapping,
            value: String::new(),
            tag: "!!map".to_string(),
            content,
        }
    }

    /// Creates a sequence node from its elements.
    pub fn sequence(elements: Vec<Node>) -> Self {
        Node {
            kind: NodeKind::Sequence,
            value: String::new(),
            tag: "!!seq".to_string(),
            content: elements,
        }
    }

    /// Creates a scalar node with an explicit tag.
    pub fn scalar(value: impl Into<String>, tag: impl Into<String>) -> Self {
        Node {
            kind: NodeKind::Scalar,
            value: value.into(),
            tag: tag.into(),
            content: Vec::new(),
        }
    }

    /// Creates a string scalar.
    pub fn string(value: impl Into<String>) -> Self {
        Node::scalar(value, "!!str")
    }

    /// Creates an integer scalar.
    pub fn int(value: i64) -> Self {
        Node::scalar(value.to_string(), "!!int")
    }

    /// Creates a float scalar.
    pub fn float(value: f64) -> Self {
        Node::scalar(value.to_string(), "!!float")
    }

    /// Creates a boolean scalar.
    pub fn bool(value: bool) -> Self {
        Node::scalar(value.to_string(), "!!bool")
    }

    /// Creates a null scalar.
    pub fn null() -> Self {
        Node::scalar("null", "!!null")
    }

    /// Creates an alias leaf referring to `anchor`.
    pub fn alias(anchor: impl Into<String>) -> Self {
        Node {
            kind: NodeKind::Alias,
            value: anchor.into(),
            tag: String::new(),
            content: Vec::new(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// The string form of scalar content; the key spelling for key nodes.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The resolved YAML tag, e.g. `!!int` or an application tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Children in declared order. Mapping children interleave keys and
    /// values at even/odd indices.
    pub fn content(&self) -> &[Node] {
        &self.content
    }

    /// Mutable access to the children.
    pub fn content_mut(&mut self) -> &mut Vec<Node> {
        &mut self.content
    }

    /// Replaces the scalar value in place.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Iterates over a mapping's `(key, value)` node pairs. Empty for any
    /// other kind; a trailing key without a value is skipped.
    pub fn entries(&self) -> impl Iterator<Item = (&Node, &Node)> {
        let pairs: &[Node] = match self.kind {
            NodeKind::Mapping => &self.content,
            _ => &[],
        };
        pairs.chunks_exact(2).map(|pair| (&pair[0], &pair[1]))
    }

    /// Follows a route of content indices down the tree.
    ///
    /// Routes are what [`Path::find_routes`](crate::yamlpath::Path::find_routes)
    /// returns; an empty route resolves to `self`.
    pub fn descend(&self, route: &[usize]) -> Option<&Node> {
        let mut node = self;
        for &step in route {
            node = node.content.get(step)?;
        }
        Some(node)
    }

    /// Mutable counterpart of [`descend`](Node::descend).
    pub fn descend_mut(&mut self, route: &[usize]) -> Option<&mut Node> {
        let mut node = self;
        for &step in route {
            node = node.content.get_mut(step)?;
        }
        Some(node)
    }
}
