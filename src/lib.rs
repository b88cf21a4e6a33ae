//! # Typeahead
//!
//! An in-memory autocomplete index built on a compressed prefix tree.
//!
//! Keys are byte sequences. Each edge of the tree carries a whole run of
//! bytes, so memory is proportional to the number of branching points
//! rather than to the total length of the stored keys.
//!
//! ## Features
//!
//! - **Prefix queries that stop mid-edge**: `complete("alex")` finds
//!   `"alexander"` even when both live on one compressed edge
//! - **Two traversals**: depth-first [`Tree::complete`] and breadth-first
//!   [`Tree::find`], which also reports the terminating edge of each key
//! - **Popularity counts**: every edge counts the inserts that reached it
//! - **Prefix views**: locate a subtree once and query it repeatedly
//! - **Snapshots**: save a tree to disk and load it back
//!
//! ## Example
//!
//! ```rust
//! use typeahead::Tree;
//!
//! let mut tree = Tree::new();
//! tree.insert("john", ());
//! tree.insert("jane", ());
//!
//! let mut found = tree.complete("j");
//! found.sort();
//! assert_eq!(found, vec![b"jane".to_vec(), b"john".to_vec()]);
//! ```

mod descent;
pub mod dictionary;
mod index;
pub mod node;
mod prefix_view;
mod snapshot;
mod ternary;
mod tree;
mod util;

// Re-export public types
pub use crate::dictionary::LoadStats;
pub use crate::index::PrefixIndex;
pub use crate::node::{Edge, Node};
pub use crate::prefix_view::{Iter, PrefixView};
pub use crate::snapshot::{FORMAT_VERSION, MAX_DEPTH};
pub use crate::ternary::TernaryTree;
pub use crate::tree::Tree;

/// Errors that can occur while persisting or loading an index.
///
/// Query misses and empty-key inserts are not errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading or writing a file or stream failed
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot payload could not be encoded or decoded
    #[error("snapshot codec error: {0}")]
    Codec(#[from] bincode::Error),

    /// The data ends before the snapshot header is complete
    #[error("snapshot is truncated")]
    Truncated,

    /// The data does not start with the snapshot magic number
    #[error("not a typeahead snapshot")]
    InvalidMagic,

    /// The snapshot was written by an incompatible format version
    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u32),

    /// The decoded tree breaks a structural invariant
    #[error("corrupt snapshot: {0}")]
    Corrupt(String),

    /// The tree nests more edges than a snapshot may hold
    #[error("tree is nested deeper than {0} edges")]
    TooDeep(usize),
}

/// Result type used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
