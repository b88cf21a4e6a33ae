use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use typeahead::{dictionary, Tree};

/// Prefix search over a word list.
#[derive(Parser, Debug)]
#[command(version, about = "Autocomplete queries against a compressed prefix tree.")]
struct Cli {
    /// Word list to load, one key per line
    #[arg(short, long, value_name = "FILE")]
    source: Option<PathBuf>,

    /// Snapshot to restore before loading the word list
    #[arg(long = "in", value_name = "SNAPSHOT")]
    input: Option<PathBuf>,

    /// Where to write the snapshot of the loaded tree
    #[arg(long = "out", value_name = "SNAPSHOT")]
    output: Option<PathBuf>,

    /// Read queries from stdin, one per line
    #[arg(short, long)]
    interactive: bool,

    /// How completions are gathered
    #[arg(short, long, value_enum, default_value_t = Mode::Complete)]
    mode: Mode,

    /// Print at most this many completions per query
    #[arg(short, long)]
    limit: Option<usize>,

    #[arg(name = "QUERY")]
    queries: Vec<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    /// Depth-first enumeration, in tree order
    Complete,
    /// Breadth-first search, sorted by key
    Find,
    /// Ranked by insert count
    Suggest,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut tree: Tree<()> = match &cli.input {
        Some(path) => Tree::load(path)
            .with_context(|| format!("failed to read snapshot {}", path.display()))?,
        None => Tree::new(),
    };

    if let Some(path) = &cli.source {
        let start = Instant::now();
        let stats = dictionary::load_path(path, &mut tree)
            .with_context(|| format!("failed to load word list {}", path.display()))?;
        println!(
            "inserted {} words {} characters in {:?} ({} distinct keys, {} edges)",
            stats.words,
            stats.bytes,
            start.elapsed(),
            tree.len(),
            tree.edge_count()
        );
    }

    if let Some(path) = &cli.output {
        tree.save(path)
            .with_context(|| format!("failed to write snapshot {}", path.display()))?;
        info!(path = %path.display(), "stored snapshot");
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    for query in &cli.queries {
        let mut query = query.as_bytes().to_vec();
        answer(&tree, dictionary::normalize(&mut query), cli.mode, cli.limit, &mut out)?;
    }

    if cli.interactive {
        writeln!(out, "Enter a search keyword:")?;
        out.flush()?;

        let stdin = io::stdin();
        for line in stdin.lock().split(b'\n') {
            let mut line = line.context("failed to read query")?;
            let query = dictionary::normalize(&mut line);
            if query.is_empty() {
                continue;
            }
            answer(&tree, query, cli.mode, cli.limit, &mut out)?;
            out.flush()?;
        }
    }

    Ok(())
}

// Prints the results for one query, capped at `limit`, followed by the total
// and the time spent searching.
fn answer<W: Write>(
    tree: &Tree<()>,
    query: &[u8],
    mode: Mode,
    limit: Option<usize>,
    out: &mut W,
) -> io::Result<()> {
    writeln!(out, "searching for {}:", String::from_utf8_lossy(query))?;

    let start = Instant::now();
    let results: Vec<(Vec<u8>, Option<usize>)> = match mode {
        Mode::Complete => tree
            .complete(query)
            .into_iter()
            .map(|key| (key, None))
            .collect(),
        Mode::Find => {
            let mut found: Vec<_> = tree
                .find(query)
                .into_iter()
                .map(|(key, edge)| (key, Some(edge.count())))
                .collect();
            found.sort();
            found
        }
        Mode::Suggest => tree
            .suggest(query, usize::MAX)
            .into_iter()
            .map(|(key, count)| (key, Some(count)))
            .collect(),
    };
    let elapsed = start.elapsed();

    let shown = limit.unwrap_or(usize::MAX);
    for (key, count) in results.iter().take(shown) {
        match count {
            Some(count) => writeln!(out, "{} ({})", String::from_utf8_lossy(key), count)?,
            None => writeln!(out, "{}", String::from_utf8_lossy(key))?,
        }
    }
    writeln!(out, "found {} results in {:?}", results.len(), elapsed)?;
    writeln!(out)
}
