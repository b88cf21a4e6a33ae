//! Binary snapshots of a tree.
//!
//! Layout: the 8-byte magic `TYPEAHD\0`, the format version as a
//! little-endian `u32`, then the bincode payload. The payload holds the key
//! count, the number of root edges and every edge as a flat record in
//! pre-order, each record naming how many child records follow it. Nothing
//! is nested, so decoding never recurses. A snapshot either loads into a
//! complete, valid tree or fails.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use bincode::Options;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::node::{Edge, Node};
use crate::{Error, Result, Tree};

const MAGIC: &[u8; 8] = b"TYPEAHD\0";

/// Version written into every snapshot header.
pub const FORMAT_VERSION: u32 = 1;

/// Deepest path, in edges, that a snapshot may encode.
pub const MAX_DEPTH: usize = 1024;

const HEADER_LEN: usize = 12;

#[derive(Serialize)]
struct PayloadRef<'a, V> {
    size: usize,
    roots: usize,
    records: Vec<RecordRef<'a, V>>,
}

#[derive(Serialize)]
struct RecordRef<'a, V> {
    children: usize,
    label: &'a [u8],
    count: usize,
    terminal: bool,
    value: Option<&'a V>,
}

#[derive(Deserialize)]
struct Payload<V> {
    size: usize,
    roots: usize,
    records: Vec<Record<V>>,
}

#[derive(Deserialize)]
struct Record<V> {
    children: usize,
    label: Vec<u8>,
    count: usize,
    terminal: bool,
    value: Option<V>,
}

// Fixed-width integers, and the payload must end where the input ends.
fn codec() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

// Lists the edges below `root` in pre-order.
fn flatten<V>(root: &Node<V>) -> Result<Vec<RecordRef<'_, V>>> {
    let mut records = Vec::new();
    let mut stack: Vec<(&Edge<V>, usize)> = root.edges.iter().rev().map(|edge| (edge, 1)).collect();

    while let Some((edge, depth)) = stack.pop() {
        if depth > MAX_DEPTH {
            return Err(Error::TooDeep(MAX_DEPTH));
        }
        records.push(RecordRef {
            children: edge.child.edges.len(),
            label: &edge.label,
            count: edge.count,
            terminal: edge.terminal,
            value: edge.value.as_ref(),
        });
        stack.extend(edge.child.edges.iter().rev().map(|child| (child, depth + 1)));
    }

    Ok(records)
}

// Rebuilds the tree from pre-order records. The stack holds the open edges
// along the current path together with the number of children each one is
// still waiting for.
fn unflatten<V>(roots: usize, records: Vec<Record<V>>) -> Result<Node<V>> {
    let mut root = Node::new();
    let mut pending_roots = roots;
    let mut stack: Vec<(Edge<V>, usize)> = Vec::new();

    for record in records {
        match stack.last_mut() {
            Some((_, waiting)) => *waiting -= 1,
            None if pending_roots > 0 => pending_roots -= 1,
            None => return Err(Error::Corrupt("records after the last root edge".to_string())),
        }
        if stack.len() == MAX_DEPTH {
            return Err(Error::TooDeep(MAX_DEPTH));
        }

        let edge = Edge {
            label: record.label,
            count: record.count,
            terminal: record.terminal,
            value: record.value,
            child: Node::new(),
        };
        stack.push((edge, record.children));

        while let Some((_, 0)) = stack.last() {
            let (edge, _) = match stack.pop() {
                Some(done) => done,
                None => break,
            };
            match stack.last_mut() {
                Some((parent, _)) => parent.child.edges.push(edge),
                None => root.edges.push(edge),
            }
        }
    }

    if !stack.is_empty() || pending_roots > 0 {
        return Err(Error::Corrupt(
            "records end before every edge has its children".to_string(),
        ));
    }
    Ok(root)
}

impl<V: Serialize> Tree<V> {
    /// Encodes the tree into a self-describing byte buffer.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(HEADER_LEN);
        self.write_to(&mut out)?;
        Ok(out)
    }

    /// Writes a snapshot of the tree to `writer`.
    ///
    /// Fails with [`Error::TooDeep`] when a path holds more than
    /// [`MAX_DEPTH`] edges.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        let payload = PayloadRef {
            size: self.size,
            roots: self.root.edges.len(),
            records: flatten(&self.root)?,
        };

        writer.write_all(MAGIC)?;
        writer.write_all(&FORMAT_VERSION.to_le_bytes())?;
        codec().serialize_into(&mut writer, &payload)?;
        debug!(keys = self.size, edges = payload.records.len(), "wrote snapshot");
        Ok(())
    }

    /// Writes a snapshot of the tree to the file at `path`, replacing it.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        debug!(path = %path.as_ref().display(), "saved snapshot");
        Ok(())
    }
}

impl<V: DeserializeOwned> Tree<V> {
    /// Decodes a tree from bytes produced by [`Tree::to_bytes`].
    ///
    /// The decoded tree is checked against every structural invariant and
    /// its recorded key count before it is returned.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(Error::Truncated);
        }
        let (magic, rest) = bytes.split_at(MAGIC.len());
        if magic != MAGIC {
            return Err(Error::InvalidMagic);
        }

        let mut version = [0u8; 4];
        version.copy_from_slice(&rest[..4]);
        let version = u32::from_le_bytes(version);
        if version != FORMAT_VERSION {
            return Err(Error::UnsupportedVersion(version));
        }

        let payload: Payload<V> = codec().deserialize(&rest[4..])?;
        let root = unflatten(payload.roots, payload.records)?;
        root.check_invariants().map_err(Error::Corrupt)?;

        let keys = root.subtree_size();
        if keys != payload.size {
            return Err(Error::Corrupt(format!(
                "header records {} keys but the tree holds {}",
                payload.size, keys
            )));
        }

        debug!(keys, bytes = bytes.len(), "decoded snapshot");
        Ok(Tree {
            root,
            size: payload.size,
        })
    }

    /// Reads a complete snapshot from `reader`.
    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes)
    }

    /// Loads a snapshot from the file at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_bytes(&bytes)
    }
}
