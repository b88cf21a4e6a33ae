//! A ternary search tree backend.
//!
//! Each node holds a single byte and three children: keys whose byte at this
//! position is smaller go left, larger go right, and equal keys continue with
//! the next byte in the center. It needs no edge splitting but spends one node
//! per byte of every distinct suffix.

use std::cmp::Ordering;

use crate::index::PrefixIndex;

type Link<V> = Option<Box<TernaryNode<V>>>;

#[derive(Debug, Clone)]
struct TernaryNode<V> {
    byte: u8,
    left: Link<V>,
    center: Link<V>,
    right: Link<V>,
    /// Set when a key ends at this node
    value: Option<V>,
}

impl<V> TernaryNode<V> {
    fn new(byte: u8) -> Self {
        TernaryNode {
            byte,
            left: None,
            center: None,
            right: None,
            value: None,
        }
    }
}

/// Ternary search tree keyed on single bytes.
///
/// Completions come out in ascending byte order.
///
/// # Examples
///
/// ```
/// use typeahead::TernaryTree;
///
/// let mut tree = TernaryTree::new();
/// tree.insert(b"hello", ());
/// tree.insert(b"hallo", ());
/// tree.insert(b"hi", ());
///
/// assert_eq!(tree.complete(b"h"), vec![b"hallo".to_vec(), b"hello".to_vec(), b"hi".to_vec()]);
/// ```
#[derive(Debug, Clone)]
pub struct TernaryTree<V> {
    root: Link<V>,
    size: usize,
}

impl<V> TernaryTree<V> {
    /// Creates an empty tree.
    pub fn new() -> Self {
        TernaryTree {
            root: None,
            size: 0,
        }
    }

    /// Number of distinct keys stored.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Stores `key` with `value`, returning the value it replaces.
    pub fn insert(&mut self, key: &[u8], value: V) -> Option<V> {
        if key.is_empty() {
            return None;
        }

        let mut slot = &mut self.root;
        let mut pos = 0;
        loop {
            let node = slot.get_or_insert_with(|| Box::new(TernaryNode::new(key[pos])));
            match key[pos].cmp(&node.byte) {
                Ordering::Less => slot = &mut node.left,
                Ordering::Greater => slot = &mut node.right,
                Ordering::Equal => {
                    pos += 1;
                    if pos == key.len() {
                        let replaced = node.value.replace(value);
                        if replaced.is_none() {
                            self.size += 1;
                        }
                        return replaced;
                    }
                    slot = &mut node.center;
                }
            }
        }
    }

    /// Returns the value stored for exactly `key`.
    pub fn get(&self, key: &[u8]) -> Option<&V> {
        self.locate(key).and_then(|node| node.value.as_ref())
    }

    /// Returns `true` if `key` was inserted.
    pub fn contains(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }

    /// Returns every stored key starting with `prefix`, sorted.
    pub fn complete(&self, prefix: &[u8]) -> Vec<Vec<u8>> {
        let mut out = Vec::new();
        if let Some(node) = self.locate(prefix) {
            let mut acc = prefix.to_vec();
            if node.value.is_some() {
                out.push(acc.clone());
            }
            collect(&node.center, &mut acc, &mut out);
        }
        out
    }

    // The node holding the last byte of `key`.
    fn locate(&self, key: &[u8]) -> Option<&TernaryNode<V>> {
        let mut link = &self.root;
        let mut pos = 0;
        while let Some(node) = link {
            match key.get(pos)?.cmp(&node.byte) {
                Ordering::Less => link = &node.left,
                Ordering::Greater => link = &node.right,
                Ordering::Equal => {
                    pos += 1;
                    if pos == key.len() {
                        return Some(&**node);
                    }
                    link = &node.center;
                }
            }
        }
        None
    }
}

// In-order walk: smaller bytes, this byte and its continuations, larger bytes.
fn collect<V>(link: &Link<V>, acc: &mut Vec<u8>, out: &mut Vec<Vec<u8>>) {
    if let Some(node) = link {
        collect(&node.left, acc, out);

        acc.push(node.byte);
        if node.value.is_some() {
            out.push(acc.clone());
        }
        collect(&node.center, acc, out);
        acc.pop();

        collect(&node.right, acc, out);
    }
}

impl<V> Default for TernaryTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> PrefixIndex<V> for TernaryTree<V> {
    fn insert(&mut self, key: &[u8], value: V) {
        TernaryTree::insert(self, key, value);
    }

    fn contains(&self, key: &[u8]) -> bool {
        TernaryTree::contains(self, key)
    }

    fn complete(&self, prefix: &[u8]) -> Vec<Vec<u8>> {
        TernaryTree::complete(self, prefix)
    }

    fn len(&self) -> usize {
        self.size
    }
}
