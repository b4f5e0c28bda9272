// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Threat Index Engine - Tick Scheduler
//
// Two-state machine (Idle / Running) over an injected millisecond clock. The
// caller polls with the current time; a poll reports at most one due tick.
// Missed periods are dropped: after a late poll the next deadline is one
// period from that poll, never a backlog.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running { next_due_ms: u64 },
}

/// What a single poll decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Idle,
    NotDue,
    Due {
        /// Whole periods that elapsed past the deadline and were dropped.
        skipped: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickScheduler {
    period_ms: u64,
    state: SchedulerState,
}

impl TickScheduler {
    /// `period_ms` must be positive; `EngineParams::validate` guarantees it.
    pub fn new(period_ms: u64) -> Self {
        Self { period_ms: period_ms.max(1), state: SchedulerState::Idle }
    }

    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, SchedulerState::Running { .. })
    }

    pub fn next_due_ms(&self) -> Option<u64> {
        match self.state {
            SchedulerState::Running { next_due_ms } => Some(next_due_ms),
            SchedulerState::Idle => None,
        }
    }

    /// Idle -> Running. The first tick is due one period after `now_ms`.
    /// Returns `false` if already running (the existing deadline is kept).
    pub fn start(&mut self, now_ms: u64) -> bool {
        if self.is_running() {
            return false;
        }
        self.state = SchedulerState::Running { next_due_ms: now_ms.saturating_add(self.period_ms) };
        true
    }

    /// Running -> Idle. Idempotent. Returns whether a transition happened.
    pub fn stop(&mut self) -> bool {
        let was_running = self.is_running();
        self.state = SchedulerState::Idle;
        was_running
    }

    pub fn poll(&mut self, now_ms: u64) -> PollOutcome {
        let next_due_ms = match self.state {
            SchedulerState::Idle => return PollOutcome::Idle,
            SchedulerState::Running { next_due_ms } => next_due_ms,
        };
        if now_ms < next_due_ms {
            return PollOutcome::NotDue;
        }
        let skipped = (now_ms - next_due_ms) / self.period_ms;
        let next = if skipped == 0 {
            next_due_ms.saturating_add(self.period_ms)
        } else {
            now_ms.saturating_add(self.period_ms)
        };
        self.state = SchedulerState::Running { next_due_ms: next };
        PollOutcome::Due { skipped }
    }

    /// Milliseconds until the next tick, `None` when idle.
    pub fn time_until_due(&self, now_ms: u64) -> Option<u64> {
        self.next_due_ms().map(|due| due.saturating_sub(now_ms))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_never_fires() {
        let mut sched = TickScheduler::new(2000);
        assert_eq!(sched.poll(1_000_000), PollOutcome::Idle);
        assert!(!sched.is_running());
    }

    #[test]
    fn test_fires_on_period() {
        let mut sched = TickScheduler::new(2000);
        assert!(sched.start(0));
        assert_eq!(sched.poll(1999), PollOutcome::NotDue);
        assert_eq!(sched.poll(2000), PollOutcome::Due { skipped: 0 });
        assert_eq!(sched.next_due_ms(), Some(4000));
        assert_eq!(sched.poll(2500), PollOutcome::NotDue);
        assert_eq!(sched.poll(4100), PollOutcome::Due { skipped: 0 });
        // Small jitter does not drift the cadence.
        assert_eq!(sched.next_due_ms(), Some(6000));
    }

    #[test]
    fn test_no_catch_up_after_suspension() {
        let mut sched = TickScheduler::new(2000);
        sched.start(0);
        // Suspended for ~10 periods.
        assert_eq!(sched.poll(21_000), PollOutcome::Due { skipped: 9 });
        assert_eq!(sched.poll(21_000), PollOutcome::NotDue);
        assert_eq!(sched.next_due_ms(), Some(23_000));
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut sched = TickScheduler::new(2000);
        assert!(!sched.stop());
        sched.start(0);
        assert!(sched.stop());
        assert!(!sched.stop());
        assert_eq!(sched.state(), SchedulerState::Idle);
        assert_eq!(sched.poll(10_000), PollOutcome::Idle);
    }

    #[test]
    fn test_double_start_keeps_deadline() {
        let mut sched = TickScheduler::new(2000);
        sched.start(0);
        assert!(!sched.start(1500));
        assert_eq!(sched.next_due_ms(), Some(2000));
    }

    #[test]
    fn test_deadline_saturates_at_clock_ceiling() {
        let mut sched = TickScheduler::new(2000);
        sched.start(u64::MAX - 10);
        assert_eq!(sched.next_due_ms(), Some(u64::MAX));
        assert_eq!(sched.poll(u64::MAX), PollOutcome::Due { skipped: 0 });
        assert_eq!(sched.next_due_ms(), Some(u64::MAX));
        assert!(sched.is_running());
    }

    #[test]
    fn test_restart_begins_from_now() {
        let mut sched = TickScheduler::new(2000);
        sched.start(0);
        sched.stop();
        sched.start(50_000);
        assert_eq!(sched.time_until_due(50_000), Some(2000));
    }
}
