// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Threat Index Engine - Price Oscillator

use rand::Rng;

use crate::params::OscillatorParams;

/// Multiplicative step for an explicit draw `d` in `[0, 1)`. Unbounded.
pub fn step(previous: f64, d: f64, params: &OscillatorParams) -> f64 {
    previous * (1.0 + (d - params.bias) * params.amplitude)
}

pub fn next_price<R: Rng + ?Sized>(previous: f64, rng: &mut R, params: &OscillatorParams) -> f64 {
    step(previous, rng.gen::<f64>(), params)
}
