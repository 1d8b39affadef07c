//! Approximate repeated motif extraction from a single long sequence.
//!
//! Given a sequence, the crate enumerates every pattern over the sequence's
//! alphabet whose length lies in a configured range and which occurs
//! approximately — within a distance threshold under Hamming or SAX MINDIST —
//! at least a configured number of times, reporting each such motif with its
//! frequency and the positions of all approximate occurrences.
//!
//! Candidate patterns are walked as a virtual trie in postorder while a
//! frontier of annotated suffix-tree positions is extended one character at
//! a time: the cache-aware search space traversal of Sahli, Mansour and
//! Kalnis, "ACME: a scalable parallel system for extracting frequent
//! patterns from a very long sequence" (The VLDB Journal 23.6, 2014),
//! without the left/right-maximality filtering of the original system.

pub mod cast;
pub mod distance;
pub mod extract;
pub mod suffix_tree;

pub use cast::Search;
pub use distance::{DistanceError, DistanceMeasure};
pub use extract::{extract_motifs, read_sequence, LengthHistogram, MotifConfig, ReportMode};
pub use suffix_tree::SuffixTree;
