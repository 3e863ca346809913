//! Vote ledger over the up/down voter sets embedded in threads and replies.
//!
//! One vote per user per entity. Repeating a vote retracts it, voting the
//! other way moves the voter across. The score is never cached.

use uuid::Uuid;

use crate::models::{VoteType, Votes};

/// What a single `apply` did to the sets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteTransition {
    /// Voter had no vote; one was added
    Added,
    /// Voter repeated an existing vote; it was removed
    Retracted,
    /// Voter moved from one side to the other
    Switched,
}

impl Votes {
    /// Signed tally: up-voters minus down-voters
    pub fn score(&self) -> i64 {
        self.upvotes.len() as i64 - self.downvotes.len() as i64
    }

    /// Current vote of `voter`, if any
    pub fn vote_of(&self, voter: &Uuid) -> Option<VoteType> {
        if self.upvotes.contains(voter) {
            Some(VoteType::Up)
        } else if self.downvotes.contains(voter) {
            Some(VoteType::Down)
        } else {
            None
        }
    }

    /// Apply one vote from `voter`, keeping the two sets disjoint
    pub fn apply(&mut self, voter: Uuid, vote: VoteType) -> VoteTransition {
        let (same, opposite) = match vote {
            VoteType::Up => (&mut self.upvotes, &mut self.downvotes),
            VoteType::Down => (&mut self.downvotes, &mut self.upvotes),
        };

        if let Some(idx) = same.iter().position(|id| *id == voter) {
            same.remove(idx);
            return VoteTransition::Retracted;
        }

        same.push(voter);
        match opposite.iter().position(|id| *id == voter) {
            Some(idx) => {
                opposite.remove(idx);
                VoteTransition::Switched
            }
            None => VoteTransition::Added,
        }
    }
}
