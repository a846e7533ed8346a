use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tracks the votes received by each candidate target during one phase,
/// along with the running no-lynch count.
///
/// A fresh tally is built on every phase transition: the candidate set is
/// the players currently alive, and `num_voters` is the number of players
/// eligible to vote this phase (everyone alive by day, the living mafia
/// by night).
#[derive(Clone, Serialize, Deserialize, Default, Debug)]
pub struct VoteTally {
    counts: HashMap<usize, usize>,
    no_lynch: usize,
    num_voters: usize,
}

impl VoteTally {
    /// Creates a new `VoteTally` over the given candidate player indices.
    pub fn new(targets: impl IntoIterator<Item = usize>, num_voters: usize) -> Self {
        Self {
            counts: targets.into_iter().map(|target| (target, 0)).collect(),
            no_lynch: 0,
            num_voters,
        }
    }

    /// Records one vote against `target`.
    pub fn cast_vote(&mut self, target: usize) {
        if let Some(count) = self.counts.get_mut(&target) {
            *count += 1;
        }
    }

    /// Takes back a previously recorded vote against `target`.
    pub fn retract_vote(&mut self, target: usize) {
        if let Some(count) = self.counts.get_mut(&target) {
            *count = count.saturating_sub(1);
        }
    }

    pub fn cast_no_lynch(&mut self) {
        self.no_lynch += 1;
    }

    pub fn retract_no_lynch(&mut self) {
        self.no_lynch = self.no_lynch.saturating_sub(1);
    }

    /// Gets the number of votes currently against `target`.
    pub fn count(&self, target: usize) -> usize {
        self.counts.get(&target).copied().unwrap_or(0)
    }

    /// Gets the current no-lynch count.
    pub fn no_lynch(&self) -> usize {
        self.no_lynch
    }

    /// Returns whether `target` is a candidate in this tally.
    pub fn is_candidate(&self, target: usize) -> bool {
        self.counts.contains_key(&target)
    }

    /// Gets the number of candidate targets.
    pub fn num_candidates(&self) -> usize {
        self.counts.len()
    }

    /// The sum of all per-target counts.
    pub fn total_votes(&self) -> usize {
        self.counts.values().sum()
    }

    /// Returns `true` iff `target` has reached a decisive majority:
    /// strictly more than half of the eligible voters.
    pub fn has_lynch_majority(&self, target: usize) -> bool {
        self.count(target) >= self.num_voters / 2 + 1
    }

    /// Returns `true` iff the no-lynch count has reached at least half of
    /// the eligible voters, rounded up.
    pub fn has_no_lynch_majority(&self) -> bool {
        self.no_lynch >= self.num_voters.div_ceil(2)
    }
}
