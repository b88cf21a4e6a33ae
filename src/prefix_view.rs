//! Prefix view into a tree.
//!
//! This module provides the `PrefixView` type, which locates the subtree for
//! a key prefix once and then answers completion queries against it.

use std::fmt;

use once_cell::unsync::OnceCell;

use crate::descent::{descend, Position};
use crate::node::{Edge, Node};

/// A lightweight view into the subtree reached by a key prefix.
///
/// The prefix may stop in the middle of an edge label; the view then starts
/// at that edge's endpoint. Completions are gathered depth-first on first use
/// and cached for the lifetime of the view.
///
/// # Examples
///
/// ```
/// use typeahead::Tree;
///
/// let mut tree = Tree::new();
/// tree.insert("hello", 1);
/// tree.insert("help", 2);
/// tree.insert("world", 3);
///
/// let view = tree.view("hel");
/// assert!(view.exists());
/// assert!(view.contains_key("hello"));
/// assert!(!view.contains_key("world"));
/// assert_eq!(view.get("help"), Some(&2));
/// ```
pub struct PrefixView<'a, V> {
    root: &'a Node<V>,

    /// The key prefix defining this view
    prefix: Vec<u8>,

    /// Where the prefix ends, if it exists in the tree
    position: Option<Position<'a, V>>,

    completions: OnceCell<Vec<Vec<u8>>>,
}

impl<'a, V> PrefixView<'a, V> {
    pub(crate) fn new(root: &'a Node<V>, prefix: &[u8]) -> Self {
        PrefixView {
            root,
            prefix: prefix.to_vec(),
            position: descend(root, prefix),
            completions: OnceCell::new(),
        }
    }

    /// Returns the key prefix for this view.
    pub fn prefix(&self) -> &[u8] {
        &self.prefix
    }

    /// Returns whether the prefix exists in the tree.
    pub fn exists(&self) -> bool {
        self.position.is_some()
    }

    /// Returns the number of stored keys starting with the prefix.
    pub fn len(&self) -> usize {
        if let Some(completions) = self.completions.get() {
            return completions.len();
        }
        match &self.position {
            Some(position) => {
                let endpoint = position.endpoint().map_or(false, Edge::is_terminal);
                usize::from(endpoint) + position.subtree().subtree_size()
            }
            None => 0,
        }
    }

    /// Returns whether no stored key starts with the prefix.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every stored key starting with the prefix, in depth-first order.
    pub fn completions(&self) -> &[Vec<u8>] {
        self.completions.get_or_init(|| {
            let mut out = Vec::new();
            if let Some(position) = &self.position {
                let mut acc = self.prefix.clone();
                acc.extend_from_slice(position.pending());
                if position.endpoint().map_or(false, Edge::is_terminal) {
                    out.push(acc.clone());
                }
                complete_into(position.subtree(), &mut acc, &mut out);
            }
            out
        })
    }

    /// Checks if the view contains a key.
    ///
    /// Only returns true if the key is stored and starts with the prefix.
    pub fn contains_key<K: AsRef<[u8]>>(&self, key: K) -> bool {
        self.terminal_edge(key.as_ref()).is_some()
    }

    /// Gets the value for a key if it exists in this prefix view.
    pub fn get<K: AsRef<[u8]>>(&self, key: K) -> Option<&'a V> {
        self.terminal_edge(key.as_ref()).and_then(Edge::value)
    }

    fn terminal_edge(&self, key: &[u8]) -> Option<&'a Edge<V>> {
        if self.position.is_none() || !key.starts_with(&self.prefix) {
            return None;
        }
        match descend(self.root, key)? {
            Position::Node { via: Some(edge), .. } if edge.terminal => Some(edge),
            _ => None,
        }
    }

    /// Returns an iterator over the keys in the view and their terminating
    /// edges.
    ///
    /// The iterator walks the subtree depth-first with an explicit stack and
    /// yields keys in the same order as [`PrefixView::completions`].
    pub fn iter(&self) -> Iter<'a, V> {
        match &self.position {
            Some(position) => {
                let mut path = self.prefix.clone();
                path.extend_from_slice(position.pending());
                Iter::new(position.subtree(), path, position.endpoint())
            }
            None => Iter::empty(),
        }
    }
}

// Appends every terminal endpoint below `node` to `out`, each spelled as
// `acc` followed by the labels on the way down.
fn complete_into<V>(node: &Node<V>, acc: &mut Vec<u8>, out: &mut Vec<Vec<u8>>) {
    for edge in &node.edges {
        let len = acc.len();
        acc.extend_from_slice(&edge.label);
        if edge.terminal {
            out.push(acc.clone());
        }
        complete_into(&edge.child, acc, out);
        acc.truncate(len);
    }
}

impl<'a, V> fmt::Debug for PrefixView<'a, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrefixView")
            .field("prefix", &String::from_utf8_lossy(&self.prefix))
            .field("exists", &self.exists())
            .finish()
    }
}

impl<'v, 'a, V> IntoIterator for &'v PrefixView<'a, V> {
    type Item = (Vec<u8>, &'a Edge<V>);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A depth-first iterator over stored keys and their terminating edges.
pub struct Iter<'a, V> {
    /// Edges still to visit, each with the key spelled up to its endpoint
    stack: Vec<(Vec<u8>, &'a Edge<V>)>,
}

impl<'a, V> Iter<'a, V> {
    /// Starts at `node`, whose position is spelled by `path`. A given
    /// `endpoint` is the edge leading into `node` and is visited first.
    pub(crate) fn new(node: &'a Node<V>, path: Vec<u8>, endpoint: Option<&'a Edge<V>>) -> Self {
        let mut iter = Iter { stack: Vec::new() };
        match endpoint {
            Some(edge) => iter.stack.push((path, edge)),
            None => iter.push_children(node, &path),
        }
        iter
    }

    fn empty() -> Self {
        Iter { stack: Vec::new() }
    }

    fn push_children(&mut self, node: &'a Node<V>, path: &[u8]) {
        for edge in node.edges.iter().rev() {
            let mut key = path.to_vec();
            key.extend_from_slice(&edge.label);
            self.stack.push((key, edge));
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (Vec<u8>, &'a Edge<V>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((key, edge)) = self.stack.pop() {
            self.push_children(&edge.child, &key);
            if edge.terminal {
                return Some((key, edge));
            }
        }

        None
    }
}
