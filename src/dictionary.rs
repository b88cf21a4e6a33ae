//! Loading word lists into an index.
//!
//! A word list holds one key per line. Lines are trimmed, lowercased (ASCII
//! only) and inserted with a unit value; blank lines are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::info;

use crate::index::PrefixIndex;
use crate::Result;

/// Totals gathered while loading a word list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Lines read, blank ones included
    pub lines: usize,
    /// Keys handed to the index, duplicates included
    pub words: usize,
    /// Bytes across all inserted keys
    pub bytes: usize,
}

/// Reads one key per line from `reader` into `index`.
///
/// Lines need not be valid UTF-8.
///
/// # Examples
///
/// ```
/// use typeahead::{dictionary, Tree};
///
/// let mut tree = Tree::new();
/// let stats = dictionary::load("Apple\nbanana\n\napricot\n".as_bytes(), &mut tree).unwrap();
///
/// assert_eq!(stats.words, 3);
/// assert!(tree.contains_key("apple"));
/// ```
pub fn load<R, I>(reader: R, index: &mut I) -> Result<LoadStats>
where
    R: BufRead,
    I: PrefixIndex<()> + ?Sized,
{
    let mut stats = LoadStats::default();

    for line in reader.split(b'\n') {
        let mut line = line?;
        stats.lines += 1;

        let word = normalize(&mut line);
        if word.is_empty() {
            continue;
        }
        stats.words += 1;
        stats.bytes += word.len();
        index.insert(word, ());
    }

    info!(
        lines = stats.lines,
        words = stats.words,
        bytes = stats.bytes,
        "loaded word list"
    );
    Ok(stats)
}

/// Opens the file at `path` and loads it with [`load`].
pub fn load_path<P, I>(path: P, index: &mut I) -> Result<LoadStats>
where
    P: AsRef<Path>,
    I: PrefixIndex<()> + ?Sized,
{
    let file = File::open(path.as_ref())?;
    load(BufReader::new(file), index)
}

/// Lowercases ASCII letters in place and returns the line without
/// surrounding whitespace. Queries should go through the same step as the
/// loaded words.
pub fn normalize(line: &mut [u8]) -> &[u8] {
    line.make_ascii_lowercase();

    let start = line
        .iter()
        .position(|byte| !byte.is_ascii_whitespace())
        .unwrap_or(line.len());
    let end = line
        .iter()
        .rposition(|byte| !byte.is_ascii_whitespace())
        .map_or(start, |pos| pos + 1);

    &line[start..end]
}
