//! Cache-aware traversal of the search space of candidate motifs.
//!
//! Candidate motifs form a virtual trie over the sequence alphabet. The trie
//! is never materialised: [`Search`] keeps a stack of branch elements, one
//! per pattern character, and moves between trie nodes with
//! [`go_down`](Search::go_down), [`go_right`](Search::go_right) and
//! [`go_up`](Search::go_up). Each branch element carries a frontier of
//! suffix-tree positions together with accumulated distances, so extending
//! the pattern by one character advances into the suffix tree instead of
//! rescanning the sequence. Frames are plain values in one contiguous
//! vector, the cache-aware layout described by Sahli, Mansour and Kalnis in
//! "ACME: a scalable parallel system for extracting frequent patterns from a
//! very long sequence" (The VLDB Journal 23.6, 2014).

use crate::distance::DistanceMeasure;
use crate::suffix_tree::{NodeId, SuffixTree, Sym};

/// One entry of a frontier: a suffix-tree node whose represented string
/// matches the current pattern prefix within the distance threshold, and the
/// distance accumulated so far.
#[derive(Debug, Clone)]
struct OccurrenceElement {
    node: NodeId,
    distance: f64,
}

/// A node of the search space trie: the alphabet index of the character it
/// appended to its parent pattern, the aggregated approximate frequency and
/// length of the pattern, and the frontier of matching suffix-tree
/// positions.
#[derive(Debug, Clone)]
struct BranchElement {
    alphabet_index: usize,
    frequency: usize,
    length: usize,
    occurrences: Vec<OccurrenceElement>,
}

/// Walker over the virtual trie of candidate motifs.
///
/// The walker starts at the root (the empty pattern). The root frame carries
/// the sentinel alphabet index `alphabet.len()`, which is what makes
/// [`go_right`](Search::go_right) fail at the root and terminate a
/// depth-first sweep.
pub struct Search<'a> {
    tree: &'a SuffixTree,
    measure: &'a DistanceMeasure,
    max_distance: f64,
    alphabet: Vec<u8>,
    branches: Vec<BranchElement>,
}

impl<'a> Search<'a> {
    /// Create a walker positioned at the empty pattern.
    pub fn new(tree: &'a SuffixTree, max_distance: f64, measure: &'a DistanceMeasure) -> Self {
        // the search alphabet is the set of first characters of the edges
        // leaving the root, in the tree's child enumeration order
        let alphabet: Vec<u8> = tree
            .children(tree.root())
            .iter()
            .filter_map(|&child| match tree.edge_first_sym(child) {
                Sym::Byte(b) => Some(b),
                Sym::Term => None,
            })
            .collect();
        let root_frame = BranchElement {
            alphabet_index: alphabet.len(),
            frequency: tree.frequency(tree.root()),
            length: 0,
            occurrences: vec![OccurrenceElement {
                node: tree.root(),
                distance: 0.0,
            }],
        };
        Search {
            tree,
            measure,
            max_distance,
            alphabet,
            branches: vec![root_frame],
        }
    }

    /// Append the first alphabet character to the pattern. Always succeeds.
    pub fn go_down(&mut self) -> bool {
        self.extend(0);
        true
    }

    /// Replace the last pattern character with the next alphabet character.
    /// Fails at the root and on the last alphabet character.
    pub fn go_right(&mut self) -> bool {
        let index = self.top().alphabet_index;
        if index + 1 < self.alphabet.len() {
            self.branches.pop();
            self.extend(index + 1);
            true
        } else {
            false
        }
    }

    /// Remove the last pattern character. Fails at the root.
    pub fn go_up(&mut self) -> bool {
        if self.top().length != 0 {
            self.branches.pop();
            true
        } else {
            false
        }
    }

    /// Length of the current pattern.
    pub fn length(&self) -> usize {
        self.top().length
    }

    /// Approximate frequency of the current pattern.
    pub fn frequency(&self) -> usize {
        self.top().frequency
    }

    /// The current pattern. The root frame contributes no character.
    pub fn motif(&self) -> Vec<u8> {
        self.branches[1..]
            .iter()
            .map(|branch| self.alphabet[branch.alphabet_index])
            .collect()
    }

    /// Starting positions of every approximate occurrence of the current
    /// pattern, in frontier order and then leaf order. Positions are not
    /// deduplicated.
    pub fn occurrences(&self) -> Vec<usize> {
        let mut out = Vec::new();
        for element in &self.top().occurrences {
            self.tree.collect_occurrences(element.node, &mut out);
        }
        out
    }

    /// The search alphabet: first characters of the edges leaving the root.
    pub fn alphabet(&self) -> &[u8] {
        &self.alphabet
    }

    fn top(&self) -> &BranchElement {
        self.branches.last().expect("branch stack is never empty")
    }

    /// Push the child frame reached by appending `alphabet[alphabet_index]`
    /// to the current pattern.
    fn extend(&mut self, alphabet_index: usize) {
        if self.alphabet.is_empty() {
            // empty sequence: the trie has no children anywhere
            let length = self.top().length + 1;
            self.branches.push(BranchElement {
                alphabet_index,
                frequency: 0,
                length,
                occurrences: Vec::new(),
            });
            return;
        }
        let target = self.alphabet[alphabet_index];
        let parent = self.branches.last().expect("branch stack is never empty");
        let mut frequency = 0;
        let mut occurrences = Vec::with_capacity(parent.occurrences.len());

        for element in &parent.occurrences {
            if self.tree.rep_len(element.node) == parent.length {
                // the pattern ends exactly at this node: branch into its children
                if self.tree.is_leaf(element.node) {
                    continue;
                }
                for &child in self.tree.children(element.node) {
                    let sym = self.tree.edge_first_sym(child);
                    if let Some(distance) = self.advance(element.distance, sym, target) {
                        frequency += self.tree.frequency(child);
                        occurrences.push(OccurrenceElement {
                            node: child,
                            distance,
                        });
                    }
                }
            } else {
                // the pattern is still inside the edge entering this node
                let k = parent.length - self.tree.parent_rep_len(element.node);
                let sym = self.tree.edge_sym_at(element.node, k);
                if let Some(distance) = self.advance(element.distance, sym, target) {
                    frequency += self.tree.frequency(element.node);
                    occurrences.push(OccurrenceElement {
                        node: element.node,
                        distance,
                    });
                }
            }
        }

        let length = parent.length + 1;
        self.branches.push(BranchElement {
            alphabet_index,
            frequency,
            length,
            occurrences,
        });
    }

    /// Accumulated distance after matching the edge symbol `sym` against the
    /// pattern character `target`, or `None` once it exceeds the threshold.
    /// The terminator closing each suffix can never match.
    fn advance(&self, distance: f64, sym: Sym, target: u8) -> Option<f64> {
        let next = match sym {
            Sym::Term => return None,
            Sym::Byte(b) if b == target => distance,
            Sym::Byte(b) => distance + self.measure.dist(b, target),
        };
        (next <= self.max_distance).then_some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static HAMMING: DistanceMeasure = DistanceMeasure::Hamming;

    fn search_over(tree: &SuffixTree, max_distance: f64) -> Search<'_> {
        Search::new(tree, max_distance, &HAMMING)
    }

    #[test]
    fn root_state() {
        let tree = SuffixTree::build(b"ABAB".to_vec());
        let search = search_over(&tree, 0.0);
        assert_eq!(search.alphabet(), b"AB");
        assert_eq!(search.length(), 0);
        assert_eq!(search.frequency(), 4);
        assert!(search.motif().is_empty());
    }

    #[test]
    fn go_right_and_go_up_fail_at_the_root() {
        let tree = SuffixTree::build(b"ABAB".to_vec());
        let mut search = search_over(&tree, 0.0);
        assert!(!search.go_right());
        assert!(!search.go_up());
        assert_eq!(search.length(), 0);
    }

    #[test]
    fn go_down_builds_exact_frontiers() {
        let tree = SuffixTree::build(b"ABAB".to_vec());
        let mut search = search_over(&tree, 0.0);

        assert!(search.go_down());
        assert_eq!(search.motif(), b"A");
        assert_eq!(search.frequency(), 2);
        let mut positions = search.occurrences();
        positions.sort_unstable();
        assert_eq!(positions, vec![0, 2]);

        assert!(search.go_right());
        assert_eq!(search.motif(), b"B");
        assert_eq!(search.frequency(), 2);
        let mut positions = search.occurrences();
        positions.sort_unstable();
        assert_eq!(positions, vec![1, 3]);

        assert!(!search.go_right());
        assert!(search.go_up());
        assert_eq!(search.length(), 0);
    }

    #[test]
    fn hamming_radius_widens_the_frontier() {
        let tree = SuffixTree::build(b"ABAB".to_vec());
        let mut search = search_over(&tree, 1.0);
        search.go_down();
        // within distance 1, "A" matches every length-1 substring
        assert_eq!(search.frequency(), 4);
        let mut positions = search.occurrences();
        positions.sort_unstable();
        assert_eq!(positions, vec![0, 1, 2, 3]);
    }

    #[test]
    fn stack_length_tracks_pattern_length() {
        let tree = SuffixTree::build(b"ABCABC".to_vec());
        let mut search = search_over(&tree, 1.0);
        for _ in 0..4 {
            search.go_down();
            assert_eq!(search.branches.len() - 1, search.length());
        }
        while search.go_right() || search.go_up() {
            assert_eq!(search.branches.len() - 1, search.length());
        }
        assert_eq!(search.length(), 0);
    }

    #[test]
    fn frontier_invariants_hold_during_a_full_sweep() {
        let tree = SuffixTree::build(b"MISSISSIPPI".to_vec());
        let mut search = search_over(&tree, 1.0);
        let max_length = 4;

        // exhaustive sweep checking distance bounds, depth bounds and
        // frequency consistency on every visited frame
        loop {
            let top = search.top();
            let mut total = 0;
            for element in &top.occurrences {
                assert!(element.distance >= 0.0 && element.distance <= 1.0);
                assert!(search.tree.rep_len(element.node) >= top.length);
                total += search.tree.frequency(element.node);
            }
            assert_eq!(total, top.frequency);

            if search.length() < max_length && search.frequency() > 0 {
                search.go_down();
                continue;
            }
            loop {
                if search.go_right() {
                    break;
                }
                if !search.go_up() {
                    return;
                }
            }
        }
    }

    #[test]
    fn leaf_entries_are_dropped_when_the_suffix_runs_out() {
        // "BAB" cannot extend to length 4 anywhere in ABAB
        let tree = SuffixTree::build(b"ABAB".to_vec());
        let mut search = search_over(&tree, 0.0);
        search.go_down(); // A
        search.go_right(); // B
        search.go_down(); // BA
        assert_eq!(search.frequency(), 1);
        search.go_down(); // BAA
        assert_eq!(search.frequency(), 0);
        search.go_right(); // BAB
        assert_eq!(search.frequency(), 1);
        search.go_down(); // BABA
        assert_eq!(search.frequency(), 0);
        assert!(search.occurrences().is_empty());
    }

    #[test]
    fn empty_sequence_yields_an_empty_alphabet() {
        let tree = SuffixTree::build(Vec::new());
        let mut search = search_over(&tree, 0.0);
        assert!(search.alphabet().is_empty());
        assert_eq!(search.frequency(), 0);
        assert!(!search.go_right());
        assert!(!search.go_up());
    }
}
