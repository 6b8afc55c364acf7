//! Merkle round trees and proof recombination
//!
//! The wire format carries a proof as a bare ordered list of sibling
//! hashes, with no left/right markers. Trees therefore combine children in
//! canonical order: the byte-lexicographically lesser digest is hashed
//! first. Construction and recombination share this one convention, so a
//! flagless proof recombines unambiguously.

use costamp_types::{Digest, Suite};

/// Combine two child digests into their parent: suite hash of the
/// canonical-order concatenation.
pub fn combine(suite: Suite, a: &Digest, b: &Digest) -> Digest {
    let (first, second) = if a.as_bytes() <= b.as_bytes() {
        (a, b)
    } else {
        (b, a)
    };
    let mut hasher = suite.hasher();
    hasher.update(first.as_bytes());
    hasher.update(second.as_bytes());
    Digest::new(*hasher.finalize().as_bytes())
}

/// Recombine a leaf digest with an ordered (leaf-to-root) sibling path.
///
/// An empty proof means the leaf is the root itself: the candidate is the
/// digest unchanged.
pub fn compute_root(suite: Suite, leaf: &Digest, proof: &[Digest]) -> Digest {
    let mut candidate = *leaf;
    for step in proof {
        candidate = combine(suite, &candidate, step);
    }
    candidate
}

/// A complete aggregation-round tree over leaf digests.
#[derive(Debug)]
pub struct RoundTree {
    suite: Suite,
    /// Nodes organized by level; `levels[0]` holds the leaves, the last
    /// level holds only the root.
    levels: Vec<Vec<Digest>>,
}

impl RoundTree {
    /// Root of the tree.
    pub fn root(&self) -> &Digest {
        // levels is non-empty by construction
        &self.levels[self.levels.len() - 1][0]
    }

    pub fn leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    pub fn leaf(&self, index: usize) -> Option<&Digest> {
        self.levels[0].get(index)
    }

    /// Flagless sibling path (leaf-to-root) for one leaf.
    ///
    /// A node with no sibling at some level pairs with itself, mirroring
    /// how `RoundTreeBuilder::build` duplicates the odd node out.
    pub fn path(&self, leaf_index: usize) -> Option<Vec<Digest>> {
        if leaf_index >= self.leaf_count() {
            return None;
        }

        let mut siblings = Vec::new();
        let mut index = leaf_index;

        for level in 0..self.levels.len() - 1 {
            let nodes = &self.levels[level];
            let sibling_index = if index % 2 == 0 { index + 1 } else { index - 1 };
            let sibling = nodes.get(sibling_index).unwrap_or(&nodes[index]);
            siblings.push(*sibling);
            index /= 2;
        }

        Some(siblings)
    }

    pub fn suite(&self) -> Suite {
        self.suite
    }
}

/// Builder collecting one round's leaf digests.
pub struct RoundTreeBuilder {
    suite: Suite,
    leaves: Vec<Digest>,
}

impl RoundTreeBuilder {
    pub fn new(suite: Suite) -> Self {
        Self {
            suite,
            leaves: Vec::new(),
        }
    }

    pub fn add_leaf(&mut self, digest: Digest) {
        self.leaves.push(digest);
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    /// Build the tree. An empty round yields a single all-zero root so the
    /// tree shape stays total; authorities never sign an empty round.
    pub fn build(self) -> RoundTree {
        let suite = self.suite;

        if self.leaves.is_empty() {
            return RoundTree {
                suite,
                levels: vec![vec![Digest::new([0u8; 32])]],
            };
        }

        let mut levels = vec![self.leaves];

        while levels[levels.len() - 1].len() > 1 {
            let prev = &levels[levels.len() - 1];
            let mut next = Vec::with_capacity(prev.len().div_ceil(2));

            for pair in prev.chunks(2) {
                let left = &pair[0];
                // Odd node out pairs with itself.
                let right = pair.get(1).unwrap_or(left);
                next.push(combine(suite, left, right));
            }

            levels.push(next);
        }

        RoundTree { suite, levels }
    }
}
