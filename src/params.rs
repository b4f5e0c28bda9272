// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Threat Index Engine - Engine Parameters
//
// Every tunable of the feed lives here with its production default. The
// dashboard may pass a JSON override; anything omitted keeps its default.

use serde::{Deserialize, Serialize};

use crate::types::LedgerTally;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_WINDOW_SIZE: usize = 50;
pub const DEFAULT_TICK_PERIOD_MS: u64 = 2000;
pub const DEFAULT_SEED_INDEX: f64 = 40.0;
pub const DEFAULT_SEED_PRICE: f64 = 0.0042069;
pub const DEFAULT_HIGH_RISK_THRESHOLD: f64 = 75.0;
pub const INDEX_LOW: f64 = 10.0;
pub const INDEX_HIGH: f64 = 99.0;

/// Seed-phase walk: stronger upward drift while the initial window is built.
pub const SEED_WALK: WalkParams = WalkParams {
    bias: 0.40,
    amplitude: 5.0,
    low: INDEX_LOW,
    high: INDEX_HIGH,
};

/// Steady-state walk applied on every live tick.
pub const STEADY_WALK: WalkParams = WalkParams {
    bias: 0.45,
    amplitude: 4.0,
    low: INDEX_LOW,
    high: INDEX_HIGH,
};

pub const DEFAULT_OSCILLATOR: OscillatorParams = OscillatorParams {
    bias: 0.48,
    amplitude: 0.05,
};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Rejected parameter sets. Raised before any engine state exists.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("window size must be at least 2, got {0}")]
    WindowTooSmall(usize),

    #[error("tick period must be positive")]
    ZeroTickPeriod,

    #[error("{walk} walk bounds are empty: low {low} >= high {high}")]
    EmptyBounds { walk: &'static str, low: f64, high: f64 },

    #[error("{walk} walk amplitude must be finite and positive, got {amplitude}")]
    BadAmplitude { walk: &'static str, amplitude: f64 },

    #[error("{walk} walk bias must lie in [0, 1], got {bias}")]
    BadBias { walk: &'static str, bias: f64 },

    #[error("oscillator bias {bias} / amplitude {amplitude} can drive the price non-positive")]
    UnstableOscillator { bias: f64, amplitude: f64 },

    #[error("seed index {seed} outside [{low}, {high}]")]
    SeedOutOfRange { seed: f64, low: f64, high: f64 },

    #[error("seed price must be finite and positive, got {0}")]
    BadSeedPrice(f64),

    #[error("value domain is empty: min {min} >= max {max}")]
    EmptyDomain { min: f64, max: f64 },

    #[error("viewport must have positive size, got {width}x{height}")]
    EmptyViewport { width: f64, height: f64 },

    #[error("malformed parameter JSON: {0}")]
    Parse(String),
}

// ---------------------------------------------------------------------------
// WalkParams
// ---------------------------------------------------------------------------

/// Bounded random walk: `step = (d - bias) * amplitude`, clamped to `[low, high]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WalkParams {
    pub bias: f64,
    pub amplitude: f64,
    pub low: f64,
    pub high: f64,
}

impl Default for WalkParams {
    fn default() -> Self {
        STEADY_WALK
    }
}

impl WalkParams {
    fn validate(&self, walk: &'static str) -> Result<(), ConfigError> {
        if !(self.low < self.high) {
            return Err(ConfigError::EmptyBounds { walk, low: self.low, high: self.high });
        }
        if !self.amplitude.is_finite() || self.amplitude <= 0.0 {
            return Err(ConfigError::BadAmplitude { walk, amplitude: self.amplitude });
        }
        if !(0.0..=1.0).contains(&self.bias) {
            return Err(ConfigError::BadBias { walk, bias: self.bias });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// OscillatorParams
// ---------------------------------------------------------------------------

/// Multiplicative walk: `next = previous * (1 + (d - bias) * amplitude)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OscillatorParams {
    pub bias: f64,
    pub amplitude: f64,
}

impl Default for OscillatorParams {
    fn default() -> Self {
        DEFAULT_OSCILLATOR
    }
}

impl OscillatorParams {
    /// The multiplier `1 + (d - bias) * amplitude` must stay positive for every
    /// draw `d` in `[0, 1)`.
    fn validate(&self) -> Result<(), ConfigError> {
        let unstable = ConfigError::UnstableOscillator {
            bias: self.bias,
            amplitude: self.amplitude,
        };
        if !(0.0..=1.0).contains(&self.bias) {
            return Err(unstable);
        }
        let ceiling = 1.0 / self.bias.max(1.0 - self.bias);
        if !self.amplitude.is_finite() || self.amplitude <= 0.0 || self.amplitude >= ceiling {
            return Err(unstable);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ChartParams
// ---------------------------------------------------------------------------

/// Logical chart viewport and the value domain projected onto it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChartParams {
    pub width: f64,
    pub height: f64,
    pub domain_min: f64,
    pub domain_max: f64,
}

impl Default for ChartParams {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 300.0,
            domain_min: 0.0,
            domain_max: 100.0,
        }
    }
}

// ---------------------------------------------------------------------------
// EngineParams
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineParams {
    pub window_size: usize,
    pub tick_period_ms: u64,
    pub seed_index: f64,
    pub seed_walk: WalkParams,
    pub steady_walk: WalkParams,
    pub oscillator: OscillatorParams,
    pub seed_price: f64,
    pub seed_tally: LedgerTally,
    pub high_risk_threshold: f64,
    pub chart: ChartParams,
    /// Samples kept in the snapshot's update feed.
    pub recent_len: usize,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            tick_period_ms: DEFAULT_TICK_PERIOD_MS,
            seed_index: DEFAULT_SEED_INDEX,
            seed_walk: SEED_WALK,
            steady_walk: STEADY_WALK,
            oscillator: DEFAULT_OSCILLATOR,
            seed_price: DEFAULT_SEED_PRICE,
            seed_tally: LedgerTally::default(),
            high_risk_threshold: DEFAULT_HIGH_RISK_THRESHOLD,
            chart: ChartParams::default(),
            recent_len: 3,
        }
    }
}

impl EngineParams {
    /// Parse a JSON override. Missing fields keep their defaults.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let params: Self =
            serde_json::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size < 2 {
            return Err(ConfigError::WindowTooSmall(self.window_size));
        }
        if self.tick_period_ms == 0 {
            return Err(ConfigError::ZeroTickPeriod);
        }
        self.seed_walk.validate("seed")?;
        self.steady_walk.validate("steady")?;
        self.oscillator.validate()?;
        if !(self.seed_walk.low..=self.seed_walk.high).contains(&self.seed_index) {
            return Err(ConfigError::SeedOutOfRange {
                seed: self.seed_index,
                low: self.seed_walk.low,
                high: self.seed_walk.high,
            });
        }
        if !self.seed_price.is_finite() || self.seed_price <= 0.0 {
            return Err(ConfigError::BadSeedPrice(self.seed_price));
        }
        if !(self.chart.domain_min < self.chart.domain_max) {
            return Err(ConfigError::EmptyDomain {
                min: self.chart.domain_min,
                max: self.chart.domain_max,
            });
        }
        if !(self.chart.width > 0.0 && self.chart.height > 0.0) {
            return Err(ConfigError::EmptyViewport {
                width: self.chart.width,
                height: self.chart.height,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let params = EngineParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.window_size, 50);
        assert_eq!(params.tick_period_ms, 2000);
        assert_eq!(params.seed_price, 0.0042069);
    }

    #[test]
    fn test_seed_and_steady_walks_stay_distinct() {
        let params = EngineParams::default();
        assert_eq!(params.seed_walk.bias, 0.40);
        assert_eq!(params.seed_walk.amplitude, 5.0);
        assert_eq!(params.steady_walk.bias, 0.45);
        assert_eq!(params.steady_walk.amplitude, 4.0);
    }

    #[test]
    fn test_window_of_one_rejected() {
        let params = EngineParams { window_size: 1, ..Default::default() };
        assert_eq!(params.validate(), Err(ConfigError::WindowTooSmall(1)));
    }

    #[test]
    fn test_zero_period_rejected() {
        let params = EngineParams { tick_period_ms: 0, ..Default::default() };
        assert_eq!(params.validate(), Err(ConfigError::ZeroTickPeriod));
    }

    #[test]
    fn test_seed_outside_bounds_rejected() {
        let params = EngineParams { seed_index: 5.0, ..Default::default() };
        assert!(matches!(params.validate(), Err(ConfigError::SeedOutOfRange { .. })));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let mut params = EngineParams::default();
        params.steady_walk.low = 99.0;
        params.steady_walk.high = 10.0;
        assert!(matches!(
            params.validate(),
            Err(ConfigError::EmptyBounds { walk: "steady", .. })
        ));
    }

    #[test]
    fn test_runaway_oscillator_rejected() {
        let mut params = EngineParams::default();
        params.oscillator.amplitude = 100.0;
        assert!(matches!(
            params.validate(),
            Err(ConfigError::UnstableOscillator { .. })
        ));

        params.oscillator = OscillatorParams { bias: 1.5, amplitude: 0.05 };
        assert!(matches!(
            params.validate(),
            Err(ConfigError::UnstableOscillator { .. })
        ));

        params.oscillator = OscillatorParams { bias: 0.5, amplitude: 1.9 };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_json_override_keeps_other_defaults() {
        let params = EngineParams::from_json(r#"{"tick_period_ms": 500}"#).unwrap();
        assert_eq!(params.tick_period_ms, 500);
        assert_eq!(params.window_size, 50);
        assert_eq!(params.seed_tally, LedgerTally::default());
    }

    #[test]
    fn test_json_partial_nested_override() {
        let params = EngineParams::from_json(
            r#"{"steady_walk": {"bias": 0.5}, "oscillator": {"amplitude": 0.1}, "seed_tally": {"escalate": 7}}"#,
        )
        .unwrap();
        assert_eq!(params.steady_walk.bias, 0.5);
        assert_eq!(params.steady_walk.amplitude, STEADY_WALK.amplitude);
        assert_eq!(params.steady_walk.low, INDEX_LOW);
        assert_eq!(params.steady_walk.high, INDEX_HIGH);
        assert_eq!(params.oscillator.bias, DEFAULT_OSCILLATOR.bias);
        assert_eq!(params.oscillator.amplitude, 0.1);
        assert_eq!(params.seed_tally, LedgerTally::new(7, 890));
    }

    #[test]
    fn test_json_oscillator_override_is_validated() {
        let err = EngineParams::from_json(r#"{"oscillator": {"bias": 0.48, "amplitude": 100.0}}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnstableOscillator { .. }));
    }

    #[test]
    fn test_json_override_is_validated() {
        let err = EngineParams::from_json(r#"{"window_size": 1}"#).unwrap_err();
        assert_eq!(err, ConfigError::WindowTooSmall(1));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            EngineParams::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
