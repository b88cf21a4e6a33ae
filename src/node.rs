//! Node and edge types for the compressed prefix tree.
//!
//! A `Node` owns its outgoing edges and each `Edge` owns the node it leads
//! to, so the whole structure is a plain tree of owned values. Mutation only
//! ever happens through a `&mut Node` handed down from the root.

use std::fmt;

/// A labeled transition between two nodes.
///
/// The label is the slice of a key consumed when this edge is traversed. The
/// endpoint of the edge is terminal when some inserted key ends exactly at
/// the end of the label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge<V> {
    pub(crate) label: Vec<u8>,
    pub(crate) count: usize,
    pub(crate) terminal: bool,
    pub(crate) value: Option<V>,
    pub(crate) child: Node<V>,
}

impl<V> Edge<V> {
    /// Creates a terminal edge for a freshly inserted key remainder.
    pub(crate) fn leaf(label: Vec<u8>, value: V) -> Self {
        Edge {
            label,
            count: 1,
            terminal: true,
            value: Some(value),
            child: Node::new(),
        }
    }

    /// Creates the non-terminal edge introduced by a split.
    pub(crate) fn branch(label: Vec<u8>, count: usize) -> Self {
        Edge {
            label,
            count,
            terminal: false,
            value: None,
            child: Node::new(),
        }
    }

    /// The bytes consumed when traversing this edge.
    pub fn label(&self) -> &[u8] {
        &self.label
    }

    /// Number of inserts that passed through or ended at this edge's endpoint.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Whether an inserted key ends exactly at this edge's endpoint.
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// The value stored with the key ending here, if the edge is terminal.
    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// The node this edge leads to.
    pub fn child(&self) -> &Node<V> {
        &self.child
    }

    pub(crate) fn first(&self) -> Option<u8> {
        self.label.first().copied()
    }
}

impl<V> fmt::Display for Edge<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", String::from_utf8_lossy(&self.label), self.count)?;
        if self.terminal {
            write!(f, "$")?;
        }
        Ok(())
    }
}

/// An unordered set of outgoing edges.
///
/// No two edges of a node start with the same byte, which is what lets
/// lookups dispatch on the first byte of the remaining key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<V> {
    pub(crate) edges: Vec<Edge<V>>,
}

impl<V> Node<V> {
    /// Creates a new node without edges.
    pub fn new() -> Self {
        Node { edges: Vec::new() }
    }

    /// Returns whether this node is a leaf node (has no edges)
    pub fn is_leaf(&self) -> bool {
        self.edges.is_empty()
    }

    /// The outgoing edges, in insertion order.
    pub fn edges(&self) -> &[Edge<V>] {
        &self.edges
    }

    /// Index of the edge whose label starts with `byte`.
    pub(crate) fn position(&self, byte: u8) -> Option<usize> {
        self.edges.iter().position(|edge| edge.first() == Some(byte))
    }

    /// The edge that shares its first byte with `key`, if any.
    pub fn edge_for(&self, key: &[u8]) -> Option<&Edge<V>> {
        let first = *key.first()?;
        self.position(first).map(|pos| &self.edges[pos])
    }

    /// Number of terminal endpoints in the subtree below this node.
    pub fn subtree_size(&self) -> usize {
        self.edges
            .iter()
            .map(|edge| usize::from(edge.terminal) + edge.child.subtree_size())
            .sum()
    }

    /// Number of edges in the subtree below this node.
    pub fn edge_count(&self) -> usize {
        self.edges
            .iter()
            .map(|edge| 1 + edge.child.edge_count())
            .sum()
    }

    /// Walks the subtree and reports the first structural violation found.
    ///
    /// Checked per edge: a non-empty label, a count of at least one, a
    /// terminal flag that agrees with the presence of a value, and a count
    /// no smaller than the number of keys ending at or beneath it. Per node,
    /// edge labels must start with pairwise distinct bytes.
    pub fn check_invariants(&self) -> Result<(), String> {
        self.check_subtree().map(|_| ())
    }

    // Returns the number of terminal endpoints below this node.
    fn check_subtree(&self) -> Result<usize, String> {
        if !self.is_dispatchable() {
            return Err(match self.edges.iter().find(|edge| edge.label.is_empty()) {
                Some(_) => "edge with an empty label".to_string(),
                None => format!("two edges start with the same byte below {:?}", self.labels()),
            });
        }

        let mut total = 0;
        for edge in &self.edges {
            if edge.count == 0 {
                return Err(format!("edge {:?} has a zero count", edge.to_string()));
            }
            if edge.terminal != edge.value.is_some() {
                return Err(format!(
                    "edge {:?} terminal flag disagrees with its value",
                    edge.to_string()
                ));
            }

            let keys = usize::from(edge.terminal) + edge.child.check_subtree()?;
            if edge.count < keys {
                return Err(format!(
                    "edge {:?} counts {} inserts but leads to {} keys",
                    edge.to_string(),
                    edge.count,
                    keys
                ));
            }
            total += keys;
        }

        Ok(total)
    }

    /// Shallow check: every label is non-empty and first bytes are distinct.
    pub(crate) fn is_dispatchable(&self) -> bool {
        let mut seen = [false; 256];
        for edge in &self.edges {
            match edge.first() {
                Some(byte) if !seen[byte as usize] => seen[byte as usize] = true,
                _ => return false,
            }
        }
        true
    }

    fn labels(&self) -> Vec<String> {
        self.edges
            .iter()
            .map(|edge| String::from_utf8_lossy(&edge.label).into_owned())
            .collect()
    }

    pub(crate) fn fmt_depth(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        for edge in &self.edges {
            writeln!(f, "{:width$}{}", "", edge, width = depth * 2)?;
            edge.child.fmt_depth(f, depth + 1)?;
        }
        Ok(())
    }
}

impl<V> Default for Node<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_node() {
        let node: Node<()> = Node::new();

        assert!(node.is_leaf());
        assert!(node.edges().is_empty());
        assert_eq!(node.subtree_size(), 0);
        assert_eq!(node.edge_count(), 0);
    }

    #[test]
    fn test_leaf_edge() {
        let edge = Edge::leaf(b"hello".to_vec(), 42u32);

        assert_eq!(edge.label(), b"hello");
        assert_eq!(edge.count(), 1);
        assert!(edge.is_terminal());
        assert_eq!(edge.value(), Some(&42));
        assert!(edge.child().is_leaf());
        assert_eq!(edge.to_string(), "hello:1$");
    }

    #[test]
    fn test_branch_edge() {
        let edge: Edge<u32> = Edge::branch(b"j".to_vec(), 2);

        assert!(!edge.is_terminal());
        assert_eq!(edge.value(), None);
        assert_eq!(edge.to_string(), "j:2");
    }

    #[test]
    fn test_edge_for() {
        let mut node = Node::new();
        node.edges.push(Edge::leaf(b"cat".to_vec(), ()));
        node.edges.push(Edge::leaf(b"dog".to_vec(), ()));

        assert_eq!(node.edge_for(b"dot").map(Edge::label), Some(&b"dog"[..]));
        assert_eq!(node.edge_for(b"c").map(Edge::label), Some(&b"cat"[..]));
        assert!(node.edge_for(b"emu").is_none());
        assert!(node.edge_for(b"").is_none());
    }

    #[test]
    fn test_subtree_size() {
        let mut mid = Edge::branch(b"j".to_vec(), 2);
        mid.child.edges.push(Edge::leaf(b"ohn".to_vec(), ()));
        mid.child.edges.push(Edge::leaf(b"ane".to_vec(), ()));

        let mut root = Node::new();
        root.edges.push(mid);

        assert_eq!(root.subtree_size(), 2);
        assert_eq!(root.edge_count(), 3);
        assert!(root.check_invariants().is_ok());
    }

    #[test]
    fn test_check_invariants_duplicate_first_byte() {
        let mut root = Node::new();
        root.edges.push(Edge::leaf(b"car".to_vec(), ()));
        root.edges.push(Edge::leaf(b"cat".to_vec(), ()));

        let err = root.check_invariants().unwrap_err();
        assert!(err.contains("same byte"), "{}", err);
        assert!(!root.is_dispatchable());
    }

    #[test]
    fn test_check_invariants_terminal_mismatch() {
        let mut edge = Edge::leaf(b"car".to_vec(), ());
        edge.value = None;

        let mut root = Node::new();
        root.edges.push(edge);

        assert!(root.check_invariants().is_err());
    }

    #[test]
    fn test_check_invariants_nested() {
        let mut mid = Edge::branch(b"ca".to_vec(), 1);
        mid.child.edges.push(Edge::leaf(Vec::new(), ()));

        let mut root = Node::new();
        root.edges.push(mid);

        let err = root.check_invariants().unwrap_err();
        assert!(err.contains("empty label"));
    }
}
