// Per-Tick JSONL Time Series Recorder
// One JSON line per tick for offline inspection of the feed

use serde::Serialize;
use std::io::Write;
use threat_index_engine::{LedgerTally, RiskLevel, TickResult, Vote};

#[derive(Debug, Serialize)]
pub struct TickSnapshot {
    pub tick: u64,
    pub sequence: u64,
    pub index: f64,
    pub evicted: f64,
    pub risk: RiskLevel,
    pub price: f64,
    pub price_change_pct: f64,
    pub ledger: LedgerTally,
    pub current_vote: Option<Vote>,
    pub escalate_share: f64,
    pub window_min: f64,
    pub window_max: f64,
}

impl TickSnapshot {
    pub fn from_result(result: &TickResult) -> Self {
        let snapshot = &result.snapshot;
        let (window_min, window_max) = snapshot
            .window
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
                (lo.min(s.value), hi.max(s.value))
            });
        let price_change_pct = if result.previous_price > 0.0 {
            (result.price / result.previous_price - 1.0) * 100.0
        } else {
            0.0
        };

        Self {
            tick: result.tick,
            sequence: result.admitted.sequence,
            index: result.admitted.value,
            evicted: result.evicted.value,
            risk: snapshot.risk,
            price: result.price,
            price_change_pct,
            ledger: snapshot.ledger,
            current_vote: snapshot.current_vote,
            escalate_share: snapshot.escalate_share,
            window_min,
            window_max,
        }
    }
}

/// Accumulates tick snapshots and writes them as JSONL
pub struct TimeSeriesRecorder {
    snapshots: Vec<TickSnapshot>,
}

impl TimeSeriesRecorder {
    pub fn new() -> Self {
        Self { snapshots: Vec::new() }
    }

    pub fn record(&mut self, result: &TickResult) {
        self.snapshots.push(TickSnapshot::from_result(result));
    }

    pub fn write_jsonl(&self, path: &std::path::Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut file = std::fs::File::create(path)?;
        for snapshot in &self.snapshots {
            let line = serde_json::to_string(snapshot)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
            writeln!(file, "{}", line)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }
}
