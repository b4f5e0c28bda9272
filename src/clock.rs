// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Threat Index Engine - Time Sources

use std::sync::atomic::{AtomicU64, Ordering};

/// Millisecond wall-clock reading used to drive the tick scheduler.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Unix-epoch milliseconds from the host. Not available in the browser
/// build, where the page passes `Date.now()` to `poll` instead.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

#[cfg(not(target_arch = "wasm32"))]
impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Hand-driven clock for deterministic tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: AtomicU64,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self { now_ms: AtomicU64::new(start_ms) }
    }

    pub fn advance(&self, ms: u64) {
        self.now_ms.fetch_add(ms, Ordering::Relaxed);
    }

    pub fn set(&self, ms: u64) {
        self.now_ms.store(ms, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::new(1_000);
        clock.advance(2_000);
        assert_eq!(clock.now_ms(), 3_000);
        clock.set(10);
        assert_eq!(clock.now_ms(), 10);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_system_clock_is_past_epoch() {
        assert!(SystemClock.now_ms() > 1_600_000_000_000);
    }
}
