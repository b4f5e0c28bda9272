// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Threat Index Engine - Simulation Core

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};
use wasm_bindgen::prelude::*;

use crate::clock::Clock;
use crate::ledger::SentimentLedger;
use crate::oscillator;
use crate::params::{ConfigError, EngineParams};
use crate::projection::{self, ChartPath, ProjectionError, ValueDomain, Viewport};
use crate::random_walk;
use crate::scheduler::{PollOutcome, TickScheduler};
use crate::types::*;
use crate::window::{SlidingWindow, WindowError};

// ─── Errors ──────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid engine parameters: {0}")]
    Config(#[from] ConfigError),

    #[error("window invariant violated: {0}")]
    Window(#[from] WindowError),

    #[error("chart projection failed: {0}")]
    Projection(#[from] ProjectionError),
}

// ─── Subscriptions ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub fn raw(&self) -> u64 {
        self.0
    }

    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

pub type Subscriber = Box<dyn FnMut(&EngineEvent)>;

// ─── ThreatEngine struct ─────────────────────────────────────────────────────

#[wasm_bindgen]
pub struct ThreatEngine {
    pub(crate) params: EngineParams,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) window: SlidingWindow,
    pub(crate) price: f64,
    pub(crate) ledger: SentimentLedger,
    pub(crate) scheduler: TickScheduler,
    pub(crate) tick_count: u64,

    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

// ─── Internal Logic (Testable, pure Rust) ────────────────────────────────────

impl ThreatEngine {
    /// Validate `params`, seed the RNG and build the initial window.
    pub fn with_params(params: EngineParams, seed: u64) -> Result<Self, EngineError> {
        params.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let window = SlidingWindow::seeded(
            params.seed_index,
            params.window_size,
            &mut rng,
            &params.seed_walk,
        )?;
        let latest = window.latest().value;
        debug!(seed, window = params.window_size, index = latest, "engine seeded");

        Ok(Self {
            price: params.seed_price,
            ledger: SentimentLedger::new(params.seed_tally),
            scheduler: TickScheduler::new(params.tick_period_ms),
            rng,
            window,
            params,
            tick_count: 0,
            subscribers: Vec::new(),
            next_subscription: 0,
        })
    }

    pub fn with_defaults(seed: u64) -> Self {
        // Default parameters always validate and always yield a full window.
        match Self::with_params(EngineParams::default(), seed) {
            Ok(engine) => engine,
            Err(e) => unreachable!("default parameters rejected: {e}"),
        }
    }

    // ── Lifecycle ──

    pub fn start_at(&mut self, now_ms: u64) {
        if self.scheduler.start(now_ms) {
            info!(period_ms = self.scheduler.period_ms(), "feed started");
        }
    }

    pub fn stop_feed(&mut self) {
        if self.scheduler.stop() {
            info!(ticks = self.tick_count, "feed stopped");
        }
    }

    pub fn running(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn scheduler(&self) -> &TickScheduler {
        &self.scheduler
    }

    /// Fire a tick if one is due at `now_ms`.
    pub fn poll_at(&mut self, now_ms: u64) -> Result<Option<TickResult>, EngineError> {
        match self.scheduler.poll(now_ms) {
            PollOutcome::Due { skipped } => {
                if skipped > 0 {
                    warn!(skipped, "feed resumed late, missed ticks dropped");
                }
                self.tick_with(Some(now_ms)).map(Some)
            }
            PollOutcome::Idle | PollOutcome::NotDue => Ok(None),
        }
    }

    pub fn poll_clock(&mut self, clock: &dyn Clock) -> Result<Option<TickResult>, EngineError> {
        self.poll_at(clock.now_ms())
    }

    // ── Tick ──

    /// Run one tick immediately, independent of the scheduler.
    pub fn tick_core(&mut self) -> Result<TickResult, EngineError> {
        self.tick_with(None)
    }

    /// Generator, window admit and oscillator are evaluated against local
    /// copies and committed together; readers never see a partial tick.
    fn tick_with(&mut self, now_ms: Option<u64>) -> Result<TickResult, EngineError> {
        let previous = self.window.latest();
        let value =
            random_walk::next_value(previous.value, &mut self.rng, &self.params.steady_walk);
        let admitted = Sample::new(next_sequence(previous.sequence, now_ms), value);
        let (window, evicted) = self.window.admitted(admitted)?;
        let previous_price = self.price;
        let price = oscillator::next_price(previous_price, &mut self.rng, &self.params.oscillator);

        self.window = window;
        self.price = price;
        self.tick_count += 1;

        debug!(tick = self.tick_count, index = value, price, "tick");

        let snapshot = self.snapshot();
        self.notify(&EngineEvent::Ticked { snapshot: snapshot.clone() });

        Ok(TickResult {
            tick: self.tick_count,
            admitted,
            evicted,
            previous_price,
            price,
            snapshot,
        })
    }

    // ── Votes ──

    pub fn cast(&mut self, vote: Vote) -> VoteOutcome {
        let outcome = self.ledger.cast_vote(vote);
        match outcome {
            VoteOutcome::Switched { from, to } => {
                info!(from = from.as_str(), to = to.as_str(), "vote switched")
            }
            VoteOutcome::Recorded { vote } => info!(vote = vote.as_str(), "vote recorded"),
            VoteOutcome::Unchanged { .. } => {}
        }
        let snapshot = self.snapshot();
        self.notify(&EngineEvent::Voted { outcome, snapshot });
        outcome
    }

    // ── Readers ──

    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    pub fn window(&self) -> &SlidingWindow {
        &self.window
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn ledger(&self) -> LedgerTally {
        self.ledger.tally()
    }

    pub fn current_vote(&self) -> Option<Vote> {
        self.ledger.current_vote()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn index(&self) -> f64 {
        self.window.latest().value
    }

    pub fn risk(&self) -> RiskLevel {
        RiskLevel::classify(self.index(), self.params.high_risk_threshold)
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            tick: self.tick_count,
            window: self.window.to_vec(),
            index: self.index(),
            risk: self.risk(),
            price: self.price,
            ledger: self.ledger.tally(),
            current_vote: self.ledger.current_vote(),
            escalate_share: self.ledger.share(Vote::Escalate),
            deescalate_share: self.ledger.share(Vote::DeEscalate),
            recent: self.window.recent(self.params.recent_len),
        }
    }

    /// Project the window onto the configured chart viewport.
    pub fn chart_path(&self) -> Result<ChartPath, EngineError> {
        let chart = &self.params.chart;
        self.chart_path_in(Viewport::from(chart))
    }

    pub fn chart_path_in(&self, viewport: Viewport) -> Result<ChartPath, EngineError> {
        let domain = ValueDomain::from(&self.params.chart);
        Ok(projection::project(&self.window.values(), viewport, domain)?)
    }

    // ── Subscribers ──

    pub fn subscribe(&mut self, subscriber: Subscriber) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, subscriber));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    fn notify(&mut self, event: &EngineEvent) {
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(event);
        }
    }
}

/// Clock-derived sequence when available, forced strictly past the last one.
fn next_sequence(last: u64, now_ms: Option<u64>) -> u64 {
    let floor = last + 1;
    now_ms.map_or(floor, |now| now.max(floor))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
