//! The autocomplete capability shared by every backend.

use crate::Tree;

/// A structure that stores keys and completes prefixes.
///
/// Backends make different time and space trade-offs but must agree on the
/// set of completions for the same sequence of inserts. Completion order is
/// backend-defined.
pub trait PrefixIndex<V> {
    /// Stores `key` with `value`. Empty keys are ignored.
    fn insert(&mut self, key: &[u8], value: V);

    /// Returns `true` if `key` was inserted.
    fn contains(&self, key: &[u8]) -> bool;

    /// Returns every stored key starting with a non-empty `prefix`.
    fn complete(&self, prefix: &[u8]) -> Vec<Vec<u8>>;

    /// Number of distinct keys stored.
    fn len(&self) -> usize;

    /// Returns `true` if nothing has been stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V> PrefixIndex<V> for Tree<V> {
    fn insert(&mut self, key: &[u8], value: V) {
        Tree::insert(self, key, value);
    }

    fn contains(&self, key: &[u8]) -> bool {
        self.contains_key(key)
    }

    fn complete(&self, prefix: &[u8]) -> Vec<Vec<u8>> {
        Tree::complete(self, prefix)
    }

    fn len(&self) -> usize {
        Tree::len(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TernaryTree;
    use std::collections::BTreeSet;

    fn fill<I: PrefixIndex<usize>>(index: &mut I, words: &[&str]) {
        for (i, word) in words.iter().enumerate() {
            index.insert(word.as_bytes(), i);
        }
    }

    fn sorted<I: PrefixIndex<usize>>(index: &I, prefix: &str) -> BTreeSet<Vec<u8>> {
        index.complete(prefix.as_bytes()).into_iter().collect()
    }

    #[test]
    fn test_backends_agree() {
        let words = [
            "hello", "helsinki", "dobby", "sell", "hallo", "hi", "car", "cart", "hello",
        ];

        let mut radix = Tree::new();
        let mut ternary = TernaryTree::new();
        fill(&mut radix, &words);
        fill(&mut ternary, &words);

        assert_eq!(PrefixIndex::len(&radix), 8);
        assert_eq!(PrefixIndex::len(&ternary), 8);

        for prefix in &["h", "he", "hel", "hello", "c", "car", "d", "s", "x", "helloo"] {
            assert_eq!(sorted(&radix, prefix), sorted(&ternary, prefix), "prefix {}", prefix);
        }

        for word in &words {
            assert!(PrefixIndex::contains(&radix, word.as_bytes()));
            assert!(ternary.contains(word.as_bytes()));
        }
        assert!(!PrefixIndex::contains(&radix, b"hel"));
        assert!(!ternary.contains(b"hel"));
    }

    #[test]
    fn test_trait_object() {
        let mut backends: Vec<Box<dyn PrefixIndex<()>>> =
            vec![Box::new(Tree::new()), Box::new(TernaryTree::new())];

        for backend in backends.iter_mut() {
            assert!(backend.is_empty());
            backend.insert(b"john", ());
            backend.insert(b"jane", ());
            backend.insert(b"", ());

            let found: BTreeSet<Vec<u8>> = backend.complete(b"j").into_iter().collect();
            assert_eq!(found.len(), 2);
            assert_eq!(backend.len(), 2);
        }
    }
}
