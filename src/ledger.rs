// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Threat Index Engine - Sentiment Ledger
//
// Two-counter tally with at most one live vote per client. A first vote adds
// one unit; a switch moves one unit between counters; a repeat is a no-op.

use serde::{Deserialize, Serialize};

use crate::types::{LedgerTally, Vote, VoteOutcome};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SentimentLedger {
    tally: LedgerTally,
    current: Option<Vote>,
}

impl Default for SentimentLedger {
    fn default() -> Self {
        Self::new(LedgerTally::default())
    }
}

impl SentimentLedger {
    pub fn new(seed: LedgerTally) -> Self {
        Self { tally: seed, current: None }
    }

    pub fn tally(&self) -> LedgerTally {
        self.tally
    }

    pub fn current_vote(&self) -> Option<Vote> {
        self.current
    }

    pub fn total(&self) -> u64 {
        self.tally.total()
    }

    /// Cast or change this client's vote.
    ///
    /// The new tally is computed in full before it replaces the old one, so
    /// a switch is a single transition.
    pub fn cast_vote(&mut self, vote: Vote) -> VoteOutcome {
        let outcome = match self.current {
            Some(current) if current == vote => return VoteOutcome::Unchanged { vote },
            Some(from) => VoteOutcome::Switched { from, to: vote },
            None => VoteOutcome::Recorded { vote },
        };

        let mut next = self.tally;
        *counter_mut(&mut next, vote) += 1;
        if let VoteOutcome::Switched { from, .. } = outcome {
            // The old counter holds at least this client's own earlier unit.
            let old = counter_mut(&mut next, from);
            *old = old.saturating_sub(1);
        }
        debug_assert!(LedgerTally::conserves(
            &self.tally,
            &next,
            matches!(outcome, VoteOutcome::Recorded { .. })
        ));

        self.tally = next;
        self.current = Some(vote);
        outcome
    }

    /// Percentage of the tally held by `vote`. An empty tally splits evenly.
    pub fn share(&self, vote: Vote) -> f64 {
        let total = self.tally.total();
        if total == 0 {
            return 50.0;
        }
        self.tally.count(vote) as f64 / total as f64 * 100.0
    }
}

fn counter_mut(tally: &mut LedgerTally, vote: Vote) -> &mut u64 {
    match vote {
        Vote::Escalate => &mut tally.escalate,
        Vote::DeEscalate => &mut tally.deescalate,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_switch_scenario() {
        let mut ledger = SentimentLedger::new(LedgerTally::new(1420, 890));
        assert_eq!(ledger.current_vote(), None);

        let out = ledger.cast_vote(Vote::Escalate);
        assert_eq!(out, VoteOutcome::Recorded { vote: Vote::Escalate });
        assert_eq!(ledger.tally(), LedgerTally::new(1421, 890));
        assert_eq!(ledger.current_vote(), Some(Vote::Escalate));

        let out = ledger.cast_vote(Vote::DeEscalate);
        assert_eq!(
            out,
            VoteOutcome::Switched { from: Vote::Escalate, to: Vote::DeEscalate }
        );
        assert_eq!(ledger.tally(), LedgerTally::new(1420, 891));
        assert_eq!(ledger.current_vote(), Some(Vote::DeEscalate));

        let out = ledger.cast_vote(Vote::DeEscalate);
        assert_eq!(out, VoteOutcome::Unchanged { vote: Vote::DeEscalate });
        assert_eq!(ledger.tally(), LedgerTally::new(1420, 891));
    }

    #[test]
    fn test_repeat_first_vote_counts_once() {
        let mut ledger = SentimentLedger::default();
        ledger.cast_vote(Vote::Escalate);
        ledger.cast_vote(Vote::Escalate);
        assert_eq!(ledger.tally(), LedgerTally::new(1421, 890));
    }

    #[test]
    fn test_many_switches_conserve_total() {
        let mut ledger = SentimentLedger::default();
        let initial = ledger.total();
        for i in 0..101 {
            let vote = if i % 2 == 0 { Vote::Escalate } else { Vote::DeEscalate };
            ledger.cast_vote(vote);
            assert_eq!(ledger.total(), initial + 1);
        }
        assert_eq!(ledger.current_vote(), Some(Vote::Escalate));
        assert_eq!(ledger.tally(), LedgerTally::new(1421, 890));
    }

    #[test]
    fn test_switch_from_zero_seed_never_underflows() {
        let mut ledger = SentimentLedger::new(LedgerTally::new(0, 0));
        ledger.cast_vote(Vote::DeEscalate);
        ledger.cast_vote(Vote::Escalate);
        assert_eq!(ledger.tally(), LedgerTally::new(1, 0));
    }

    #[test]
    fn test_shares() {
        let ledger = SentimentLedger::new(LedgerTally::new(3, 1));
        assert_eq!(ledger.share(Vote::Escalate), 75.0);
        assert_eq!(ledger.share(Vote::DeEscalate), 25.0);
        let empty = SentimentLedger::new(LedgerTally::new(0, 0));
        assert_eq!(empty.share(Vote::Escalate), 50.0);
    }
}
