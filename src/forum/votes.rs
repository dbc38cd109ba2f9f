//! Per-voter vote tracking.
//!
//! The ledger remembers each voter's current [`VoteState`] on each post, so a
//! change of mind can be turned into exact counter deltas: switching from
//! like to dislike moves one vote across, clicking the same direction again
//! retracts it. Only voters with an active vote are kept.

use crate::forum::types::{PostId, VoteState, VoterId};
use std::collections::HashMap;

/// A vote change for one voter on one post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteTransition {
    /// State before the change.
    pub from: VoteState,
    /// State after the change.
    pub to: VoteState,
}

impl VoteTransition {
    /// Creates a transition.
    pub fn new(from: VoteState, to: VoteState) -> Self {
        Self { from, to }
    }

    /// Signed (likes, dislikes) counter deltas for this transition.
    pub fn delta(&self) -> (i64, i64) {
        let (from_likes, from_dislikes) = self.from.weights();
        let (to_likes, to_dislikes) = self.to.weights();
        (to_likes - from_likes, to_dislikes - from_dislikes)
    }

    /// Returns true if nothing changes.
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }
}

/// Current vote of every voter on every post.
#[derive(Debug, Clone, Default)]
pub struct VoteLedger {
    votes: HashMap<PostId, HashMap<VoterId, VoteState>>,
}

impl VoteLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a voter's current state on a post.
    pub fn state(&self, post: PostId, voter: &VoterId) -> VoteState {
        self.votes
            .get(&post)
            .and_then(|voters| voters.get(voter))
            .copied()
            .unwrap_or_default()
    }

    /// Builds the transition from the voter's current state to `to`.
    pub fn transition(&self, post: PostId, voter: &VoterId, to: VoteState) -> VoteTransition {
        VoteTransition::new(self.state(post, voter), to)
    }

    /// Records a voter's new state.
    pub fn record(&mut self, post: PostId, voter: &VoterId, state: VoteState) {
        if state == VoteState::None {
            if let Some(voters) = self.votes.get_mut(&post) {
                voters.remove(voter);
                if voters.is_empty() {
                    self.votes.remove(&post);
                }
            }
        } else {
            self.votes
                .entry(post)
                .or_default()
                .insert(voter.clone(), state);
        }
    }

    /// Number of tracked (likes, dislikes) on a post.
    pub fn tally(&self, post: PostId) -> (u64, u64) {
        self.votes
            .get(&post)
            .map(|voters| {
                voters.values().fold((0, 0), |(likes, dislikes), state| match state {
                    VoteState::Liked => (likes + 1, dislikes),
                    VoteState::Disliked => (likes, dislikes + 1),
                    VoteState::None => (likes, dislikes),
                })
            })
            .unwrap_or((0, 0))
    }
}
