//! Prefix descent shared by `find`, `complete` and prefix views.

use crate::node::{Edge, Node};
use crate::util::overlaps;

/// Where a query prefix ends inside the tree.
#[derive(Debug)]
pub(crate) enum Position<'a, V> {
    /// The query ends exactly at a node boundary. `via` is the edge that was
    /// traversed last, or `None` for the root.
    Node {
        node: &'a Node<V>,
        via: Option<&'a Edge<V>>,
    },
    /// The query ends inside `edge`, after `matched` bytes of its label.
    MidEdge { edge: &'a Edge<V>, matched: usize },
}

impl<'a, V> Position<'a, V> {
    /// The node whose subtree holds every completion of the query.
    pub(crate) fn subtree(&self) -> &'a Node<V> {
        match *self {
            Position::Node { node, .. } => node,
            Position::MidEdge { edge, .. } => &edge.child,
        }
    }

    /// The edge whose endpoint is the first candidate completion, if any.
    pub(crate) fn endpoint(&self) -> Option<&'a Edge<V>> {
        match *self {
            Position::Node { via, .. } => via,
            Position::MidEdge { edge, .. } => Some(edge),
        }
    }

    /// Bytes still to be appended to the query to reach `endpoint`.
    pub(crate) fn pending(&self) -> &'a [u8] {
        match *self {
            Position::Node { .. } => &[],
            Position::MidEdge { edge, matched } => &edge.label[matched..],
        }
    }
}

/// Locates the position reached by spelling `query` from `root`.
///
/// At each node the edge sharing the query's next byte is taken if its label
/// and the unconsumed query overlap (one is a prefix of the other). A label
/// longer than the remainder means the query stops inside that edge. Returns
/// `None` when the prefix is not present in the tree.
pub(crate) fn descend<'a, V>(root: &'a Node<V>, query: &[u8]) -> Option<Position<'a, V>> {
    let mut node = root;
    let mut via = None;
    let mut consumed = 0;

    while consumed < query.len() {
        let remaining = &query[consumed..];
        let edge = node.edge_for(remaining)?;

        if !overlaps(remaining, &edge.label) {
            return None;
        }
        if edge.label.len() > remaining.len() {
            return Some(Position::MidEdge {
                edge,
                matched: remaining.len(),
            });
        }

        consumed += edge.label.len();
        node = &edge.child;
        via = Some(edge);
    }

    Some(Position::Node { node, via })
}
