use std::mem;

use crate::Element;

/// Tournament tree of losers over the cached heads of `k` runs.
///
/// Leaves are ordered by `(exhausted, value, run index)`, so among equal
/// values the lowest-indexed run always wins and an exhausted run never
/// beats a live one.
pub struct LoserTree {
    // Index 0 holds the overall winner; 1..capacity hold the loser of each match.
    nodes: Vec<usize>,
    keys: Vec<Option<Element>>,
    // The number of leaves, rounded up to a power of two.
    capacity: usize,
}

impl LoserTree {
    pub fn new(heads: Vec<Option<Element>>) -> Self {
        if heads.is_empty() {
            return Self {
                nodes: vec![],
                keys: vec![],
                capacity: 0,
            };
        }

        let capacity = heads.len().next_power_of_two();
        let mut keys = heads;
        // Padding leaves behave like exhausted runs.
        keys.resize(capacity, None);

        let mut tree = LoserTree {
            nodes: vec![0; capacity],
            keys,
            capacity,
        };
        tree.nodes[0] = tree.build(1);
        tree
    }

    fn build(&mut self, node: usize) -> usize {
        if node >= self.capacity {
            return node - self.capacity;
        }
        let left = self.build(2 * node);
        let right = self.build(2 * node + 1);
        let (winner, loser) = if self.beats(left, right) {
            (left, right)
        } else {
            (right, left)
        };
        self.nodes[node] = loser;
        winner
    }

    fn beats(&self, a: usize, b: usize) -> bool {
        let rank = |i: usize| (self.keys[i].is_none(), self.keys[i], i);
        rank(a) < rank(b)
    }

    /// The smallest live head and the index of its run.
    pub fn peek(&self) -> Option<(Element, usize)> {
        let winner = *self.nodes.first()?;
        self.keys[winner].map(|key| (key, winner))
    }

    /// Replaces the current winner's head (`None` once its run is exhausted)
    /// and replays its path to the root.
    pub fn replace_winner(&mut self, key: Option<Element>) {
        let Some(&leaf) = self.nodes.first() else {
            return;
        };
        self.keys[leaf] = key;

        let mut winner = leaf;
        let mut node = (leaf + self.capacity) / 2;
        while node > 0 {
            if self.beats(self.nodes[node], winner) {
                mem::swap(&mut self.nodes[node], &mut winner);
            }
            node /= 2;
        }
        self.nodes[0] = winner;
    }
}
