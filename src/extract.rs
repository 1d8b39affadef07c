//! Motif enumeration driver and reporting.
//!
//! [`extract_motifs`] builds the annotated suffix tree of the input
//! sequence, walks the search space trie depth-first and emits every valid
//! motif in postorder: a pattern is tested only once the walker has finished
//! its subtree and is about to leave it upward, so longer motifs always
//! precede their prefixes in the output.

use std::io::{self, BufRead, Write};

use log::debug;

use crate::cast::Search;
use crate::distance::DistanceMeasure;
use crate::suffix_tree::SuffixTree;

/// What an extraction run writes to its output sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportMode {
    /// No output at all.
    Silent,
    /// Only the length histogram.
    Statistics,
    /// Every valid motif record, then the length histogram.
    Motif,
}

/// Extraction parameters.
#[derive(Debug, Clone)]
pub struct MotifConfig {
    /// Minimum length of a reported motif.
    pub min_length: usize,
    /// Maximum length of a reported motif.
    pub max_length: usize,
    /// Minimum number of approximate occurrences of a reported motif.
    pub min_frequency: usize,
    /// Maximum accumulated distance between a motif and an occurrence
    /// (inclusive).
    pub max_distance: f64,
    pub mode: ReportMode,
}

impl Default for MotifConfig {
    fn default() -> Self {
        MotifConfig {
            min_length: 1,
            max_length: 20,
            min_frequency: 2,
            max_distance: 0.0,
            mode: ReportMode::Motif,
        }
    }
}

/// Count of valid motifs per length. Lengths of 100 or more share the last
/// bucket.
#[derive(Debug, Clone)]
pub struct LengthHistogram {
    buckets: [u64; 101],
}

impl LengthHistogram {
    fn new() -> Self {
        LengthHistogram { buckets: [0; 101] }
    }

    fn record(&mut self, length: usize) {
        self.buckets[length.min(100)] += 1;
    }

    /// Number of motifs of exactly `length` (lengths ≥ 100 are pooled).
    pub fn count(&self, length: usize) -> u64 {
        self.buckets[length.min(100)]
    }

    /// Total number of recorded motifs.
    pub fn total(&self) -> u64 {
        self.buckets.iter().sum()
    }

    /// Non-empty buckets in ascending length order.
    pub fn non_zero(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.buckets
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count != 0)
            .map(|(length, &count)| (length, count))
    }
}

/// Read an input sequence: whitespace-separated tokens concatenated in
/// order, with no separator inserted between them.
pub fn read_sequence<R: BufRead>(mut reader: R) -> io::Result<Vec<u8>> {
    let mut raw = String::new();
    reader.read_to_string(&mut raw)?;
    let mut sequence = Vec::with_capacity(raw.len());
    for token in raw.split_whitespace() {
        sequence.extend_from_slice(token.as_bytes());
    }
    Ok(sequence)
}

/// Extract every motif of `sequence` admitted by `config`, writing records
/// to `out` according to the report mode.
///
/// The length histogram is collected and returned for every mode, including
/// `Silent`.
pub fn extract_motifs<W: Write>(
    sequence: &[u8],
    config: &MotifConfig,
    measure: &DistanceMeasure,
    out: &mut W,
) -> io::Result<LengthHistogram> {
    let tree = SuffixTree::build(sequence.to_vec());
    debug!(
        "suffix tree has {} nodes over {} symbols",
        tree.node_count(),
        sequence.len()
    );
    let mut search = Search::new(&tree, config.max_distance, measure);
    let mut histogram = LengthHistogram::new();

    if config.mode == ReportMode::Motif {
        writeln!(out, "# Motif Models (motif : frequency : [list of occurrences]):")?;
    }

    // postorder DFS: descend while a branch can still produce valid motifs,
    // otherwise sweep right, emitting each node when leaving it upward
    loop {
        if is_promising(&search, config) {
            search.go_down();
            continue;
        }
        while !search.go_right() {
            if !search.go_up() {
                print_histogram(&histogram, config.mode, out)?;
                return Ok(histogram);
            }
            if is_valid(&search, config) {
                if config.mode == ReportMode::Motif {
                    print_motif(&search, out)?;
                }
                histogram.record(search.length());
            }
        }
    }
}

/// A branch can still produce valid motifs: frequent enough, and not yet
/// past the maximum length. Minimum length plays no part here, since longer
/// patterns still need their shorter prefixes traversed.
fn is_promising(search: &Search, config: &MotifConfig) -> bool {
    search.frequency() >= config.min_frequency && search.length() <= config.max_length
}

/// The current pattern is itself a valid motif.
fn is_valid(search: &Search, config: &MotifConfig) -> bool {
    search.length() >= config.min_length
        && search.length() <= config.max_length
        && search.frequency() >= config.min_frequency
}

fn print_motif<W: Write>(search: &Search, out: &mut W) -> io::Result<()> {
    out.write_all(&search.motif())?;
    write!(out, " {} [", search.frequency())?;
    for position in search.occurrences() {
        write!(out, " {position}")?;
    }
    writeln!(out, " ]")
}

fn print_histogram<W: Write>(
    histogram: &LengthHistogram,
    mode: ReportMode,
    out: &mut W,
) -> io::Result<()> {
    if mode == ReportMode::Silent {
        return Ok(());
    }
    writeln!(out, "# Statistics (motif length : number of motifs): ")?;
    for (length, count) in histogram.non_zero() {
        writeln!(out, "# {length} : {count}")?;
    }
    writeln!(out, "# total number of motifs: {}", histogram.total())
}
