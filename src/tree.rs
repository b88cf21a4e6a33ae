//! The compressed prefix tree.
//!
//! This module contains the `Tree` type, which provides the primary API for
//! building and querying the autocomplete index.

use std::collections::{HashMap, VecDeque};
use std::fmt;

use tracing::trace;

use crate::descent::{descend, Position};
use crate::node::{Edge, Node};
use crate::prefix_view::{Iter, PrefixView};
use crate::util::shared_prefix;

/// A mutable radix tree over byte keys.
///
/// Each edge carries a run of bytes, so memory grows with the number of
/// branching points rather than with total key length. Keys can be anything
/// that dereferences to bytes (`&str`, `String`, `&[u8]`, `Vec<u8>`); they
/// are compared byte for byte with no case folding.
///
/// Inserting requires `&mut self`. Queries only borrow the tree and may run
/// in parallel from several threads once the tree is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree<V> {
    pub(crate) root: Node<V>,

    /// The number of distinct keys stored in the tree
    pub(crate) size: usize,
}

impl<V> Tree<V> {
    /// Creates a new, empty tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use typeahead::Tree;
    ///
    /// let tree = Tree::<()>::new();
    /// assert!(tree.is_empty());
    /// ```
    pub fn new() -> Self {
        Tree {
            root: Node::new(),
            size: 0,
        }
    }

    /// Returns the number of distinct keys stored in the tree.
    ///
    /// Inserting a key again bumps its count but not the length.
    ///
    /// # Examples
    ///
    /// ```
    /// use typeahead::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert("hello", ());
    /// tree.insert("hello", ());
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// The root node. It has no incoming edge and is never terminal.
    pub fn root(&self) -> &Node<V> {
        &self.root
    }

    /// Total number of edges in the tree.
    pub fn edge_count(&self) -> usize {
        self.root.edge_count()
    }

    /// Inserts `key` with an associated `value`.
    ///
    /// Returns the value previously stored under `key`, or `None` if the key
    /// is new. Inserting an existing key increments its count and replaces
    /// its value. An empty key is ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use typeahead::Tree;
    ///
    /// let mut tree = Tree::new();
    /// assert_eq!(tree.insert("john", 1), None);
    /// assert_eq!(tree.insert("john", 2), Some(1));
    /// assert_eq!(tree.count("john"), Some(2));
    /// ```
    pub fn insert<K: AsRef<[u8]>>(&mut self, key: K, value: V) -> Option<V> {
        let key = key.as_ref();
        if key.is_empty() {
            return None;
        }

        let replaced = insert_at(&mut self.root, key, value);
        if replaced.is_none() {
            self.size += 1;
        }
        replaced
    }

    /// Returns the value stored for exactly `key`.
    pub fn get<K: AsRef<[u8]>>(&self, key: K) -> Option<&V> {
        self.terminal_edge(key.as_ref()).and_then(Edge::value)
    }

    /// Returns `true` if `key` was inserted.
    pub fn contains_key<K: AsRef<[u8]>>(&self, key: K) -> bool {
        self.terminal_edge(key.as_ref()).is_some()
    }

    /// Returns how many times a path through `key`'s endpoint was inserted.
    ///
    /// Only stored keys report a count; a prefix that is not itself a key
    /// returns `None`.
    pub fn count<K: AsRef<[u8]>>(&self, key: K) -> Option<usize> {
        self.terminal_edge(key.as_ref()).map(Edge::count)
    }

    fn terminal_edge(&self, key: &[u8]) -> Option<&Edge<V>> {
        match descend(&self.root, key)? {
            Position::Node { via: Some(edge), .. } if edge.terminal => Some(edge),
            _ => None,
        }
    }

    /// Creates a view of the subtree reached by `prefix`.
    ///
    /// The view supports repeated lookups and iteration without repeating
    /// the descent. An empty prefix views the whole tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use typeahead::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert("hello", 1);
    /// tree.insert("help", 2);
    ///
    /// let view = tree.view("hel");
    /// assert_eq!(view.len(), 2);
    /// assert!(view.contains_key("help"));
    /// ```
    pub fn view<K: AsRef<[u8]>>(&self, prefix: K) -> PrefixView<'_, V> {
        PrefixView::new(&self.root, prefix.as_ref())
    }

    /// Returns every stored key starting with `prefix`, depth-first.
    ///
    /// The prefix may end in the middle of an edge label. The order follows
    /// edge insertion order and is not sorted. An empty or unmatched prefix
    /// yields an empty list.
    ///
    /// # Examples
    ///
    /// ```
    /// use typeahead::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert("alexander", ());
    /// assert_eq!(tree.complete("alex"), vec![b"alexander".to_vec()]);
    /// ```
    pub fn complete<K: AsRef<[u8]>>(&self, prefix: K) -> Vec<Vec<u8>> {
        let prefix = prefix.as_ref();
        if prefix.is_empty() {
            return Vec::new();
        }
        self.view(prefix).completions().to_vec()
    }

    /// Returns every stored key starting with `prefix`, mapped to the edge
    /// that terminates it.
    ///
    /// Candidates are expanded breadth-first. Each candidate is located by a
    /// fresh descent from the root, so the cost grows with the square of the
    /// key length; that is fine for dictionary words. The result holds the
    /// same keys as [`Tree::complete`].
    ///
    /// # Examples
    ///
    /// ```
    /// use typeahead::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert("john", ());
    /// tree.insert("jane", ());
    ///
    /// let found = tree.find("j");
    /// assert_eq!(found.len(), 2);
    /// assert_eq!(found[&b"jane".to_vec()].count(), 1);
    /// ```
    pub fn find<K: AsRef<[u8]>>(&self, prefix: K) -> HashMap<Vec<u8>, &Edge<V>> {
        let prefix = prefix.as_ref();
        let mut found: HashMap<Vec<u8>, &Edge<V>> = HashMap::new();
        if prefix.is_empty() {
            return found;
        }

        let mut queue = VecDeque::new();
        queue.push_back(prefix.to_vec());

        while let Some(candidate) = queue.pop_front() {
            // Terminal leaves have nothing left to expand
            if let Some(edge) = found.get(&candidate) {
                if edge.terminal && edge.child.is_leaf() {
                    continue;
                }
            }

            match descend(&self.root, &candidate) {
                None => continue,
                Some(Position::MidEdge { edge, matched }) => {
                    let mut next = candidate;
                    next.extend_from_slice(&edge.label[matched..]);
                    found.insert(next.clone(), edge);
                    queue.push_back(next);
                }
                Some(Position::Node { node, via }) => {
                    if let Some(edge) = via {
                        found.entry(candidate.clone()).or_insert(edge);
                    }
                    for edge in &node.edges {
                        let mut next = candidate.clone();
                        next.extend_from_slice(&edge.label);
                        found.insert(next.clone(), edge);
                        queue.push_back(next);
                    }
                }
            }
        }

        found.retain(|_, edge| edge.terminal);
        found
    }

    /// Returns up to `limit` completions of `prefix` ranked by popularity.
    ///
    /// Keys with a higher count come first; ties are broken by byte order.
    /// The count of a key also includes inserts of longer keys passing
    /// through its endpoint.
    ///
    /// # Examples
    ///
    /// ```
    /// use typeahead::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert("cart", ());
    /// tree.insert("car", ());
    /// tree.insert("cat", ());
    /// tree.insert("cat", ());
    ///
    /// let ranked = tree.suggest("ca", 2);
    /// assert_eq!(ranked, vec![(b"car".to_vec(), 2), (b"cat".to_vec(), 2)]);
    /// ```
    pub fn suggest<K: AsRef<[u8]>>(&self, prefix: K, limit: usize) -> Vec<(Vec<u8>, usize)> {
        let mut ranked: Vec<(Vec<u8>, usize)> = self
            .find(prefix)
            .into_iter()
            .map(|(key, edge)| (key, edge.count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(limit);
        ranked
    }

    /// Iterates over every stored key together with its terminating edge.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(&self.root, Vec::new(), None)
    }
}

// Inserts `key` below `node`, returning the replaced value of a duplicate.
fn insert_at<V>(node: &mut Node<V>, key: &[u8], value: V) -> Option<V> {
    let pos = match key.first().and_then(|&byte| node.position(byte)) {
        Some(pos) => pos,
        None => {
            node.edges.push(Edge::leaf(key.to_vec(), value));
            return None;
        }
    };

    let edge = &mut node.edges[pos];
    let p = shared_prefix(&edge.label, key);

    if edge.label == key {
        edge.count += 1;
        edge.terminal = true;
        return edge.value.replace(value);
    }

    if p == edge.label.len() {
        edge.count += 1;
        return insert_at(&mut edge.child, &key[p..], value);
    }

    split(node, pos, key, p, value)
}

// Replaces the edge at `pos` with a new edge carrying the first `p` bytes of
// its label. The old edge keeps the rest of its label and its subtree and
// hangs below the new one, next to the remainder of `key`.
fn split<V>(node: &mut Node<V>, pos: usize, key: &[u8], p: usize, value: V) -> Option<V> {
    let old = &mut node.edges[pos];
    trace!(
        label = %String::from_utf8_lossy(&old.label),
        key = %String::from_utf8_lossy(key),
        at = p,
        "splitting edge"
    );

    let tail = old.label.split_off(p);
    let shared = std::mem::replace(&mut old.label, tail);
    let mid = Edge::branch(shared, old.count + 1);

    let old = std::mem::replace(&mut node.edges[pos], mid);
    let mid = &mut node.edges[pos];
    mid.child.edges.push(old);

    let rest = &key[p..];
    if rest.is_empty() {
        mid.terminal = true;
        mid.value = Some(value);
    } else {
        let replaced = insert_at(&mut mid.child, rest, value);
        debug_assert!(replaced.is_none());
    }

    debug_assert!(node.is_dispatchable());
    debug_assert!(node.edges[pos].child.is_dispatchable());
    None
}

impl<V> Default for Tree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Display for Tree<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root.fmt_depth(f, 0)
    }
}

impl<K: AsRef<[u8]>, V> Extend<(K, V)> for Tree<V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: AsRef<[u8]>, V> std::iter::FromIterator<(K, V)> for Tree<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Tree::new();
        tree.extend(iter);
        tree
    }
}
