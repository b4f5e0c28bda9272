// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Threat Index Engine - Type Definitions

use serde::{Deserialize, Serialize};

// ─── Sample ─────────────────────────────────────────────────────────────────

/// One point of the index history. Immutable once admitted to the window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Sample {
    pub sequence: u64,
    pub value: f64,
}

impl Sample {
    pub fn new(sequence: u64, value: f64) -> Self {
        Self { sequence, value }
    }
}

// ─── Vote ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Vote {
    Escalate = 0,
    DeEscalate = 1,
}

impl Vote {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Escalate => "escalate",
            Self::DeEscalate => "deescalate",
        }
    }

    /// Parse the dashboard's button identifiers.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "escalate" => Some(Self::Escalate),
            "deescalate" | "de-escalate" | "de_escalate" => Some(Self::DeEscalate),
            _ => None,
        }
    }
}

// ─── Ledger Tally ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LedgerTally {
    pub escalate: u64,
    pub deescalate: u64,
}

impl Default for LedgerTally {
    fn default() -> Self {
        Self { escalate: 1420, deescalate: 890 }
    }
}

impl LedgerTally {
    pub fn new(escalate: u64, deescalate: u64) -> Self {
        Self { escalate, deescalate }
    }

    pub fn total(&self) -> u64 {
        self.escalate + self.deescalate
    }

    pub fn count(&self, vote: Vote) -> u64 {
        match vote {
            Vote::Escalate => self.escalate,
            Vote::DeEscalate => self.deescalate,
        }
    }

    /// Total is conserved across a vote, except a client's first vote adds one unit.
    pub fn conserves(before: &LedgerTally, after: &LedgerTally, first_vote: bool) -> bool {
        let expected = if first_vote { before.total() + 1 } else { before.total() };
        after.total() == expected
    }
}

/// Result of a single `cast_vote` call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VoteOutcome {
    /// First vote from this client.
    Recorded { vote: Vote },
    /// One unit moved from `from` to `to`.
    Switched { from: Vote, to: Vote },
    /// Re-vote for the current choice; tally untouched.
    Unchanged { vote: Vote },
}

impl VoteOutcome {
    pub fn changed_tally(&self) -> bool {
        !matches!(self, Self::Unchanged { .. })
    }
}

// ─── Risk Level ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Elevated = 0,
    High = 1,
}

impl RiskLevel {
    pub fn classify(index: f64, high_threshold: f64) -> Self {
        if index > high_threshold {
            Self::High
        } else {
            Self::Elevated
        }
    }
}

// ─── Snapshots ──────────────────────────────────────────────────────────────

/// Everything the presentation layer reads, captured between ticks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineSnapshot {
    pub tick: u64,
    pub window: Vec<Sample>,
    pub index: f64,
    pub risk: RiskLevel,
    pub price: f64,
    pub ledger: LedgerTally,
    pub current_vote: Option<Vote>,
    pub escalate_share: f64,
    pub deescalate_share: f64,
    /// Newest samples first, for the update feed.
    pub recent: Vec<Sample>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TickResult {
    pub tick: u64,
    pub admitted: Sample,
    pub evicted: Sample,
    pub previous_price: f64,
    pub price: f64,
    pub snapshot: EngineSnapshot,
}

/// Pushed to subscribers after each completed tick or vote.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    Ticked { snapshot: EngineSnapshot },
    Voted { outcome: VoteOutcome, snapshot: EngineSnapshot },
}

impl EngineEvent {
    pub fn snapshot(&self) -> &EngineSnapshot {
        match self {
            Self::Ticked { snapshot } | Self::Voted { snapshot, .. } => snapshot,
        }
    }
}
