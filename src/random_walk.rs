// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Threat Index Engine - Bounded Random Walk

use rand::Rng;

use crate::params::WalkParams;

/// Apply one walk step for an explicit draw `d` in `[0, 1)`.
///
/// The result is saturated into `[params.low, params.high]`, so the range
/// invariant holds by induction for any in-range `previous`.
pub fn step(previous: f64, d: f64, params: &WalkParams) -> f64 {
    let next = previous + (d - params.bias) * params.amplitude;
    if next > params.high {
        params.high
    } else if next < params.low {
        params.low
    } else {
        next
    }
}

/// Draw `d` from `rng` and apply one step.
pub fn next_value<R: Rng + ?Sized>(previous: f64, rng: &mut R, params: &WalkParams) -> f64 {
    step(previous, rng.gen::<f64>(), params)
}

/// Build the initial history: `n` successive steps starting from `seed`.
///
/// The seed itself is not part of the output; the first value is one step
/// away from it.
pub fn seed_series<R: Rng + ?Sized>(
    seed: f64,
    n: usize,
    rng: &mut R,
    params: &WalkParams,
) -> Vec<f64> {
    let mut values = Vec::with_capacity(n);
    let mut current = seed;
    for _ in 0..n {
        current = next_value(current, rng, params);
        values.push(current);
    }
    values
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{SEED_WALK, STEADY_WALK};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_steady_step_from_ceiling() {
        // 99 + (0.0 - 0.45) * 4.0 = 97.2
        let next = step(99.0, 0.0, &STEADY_WALK);
        assert!((next - 97.2).abs() < 1e-9, "got {}", next);
    }

    #[test]
    fn test_clamps_at_high() {
        assert_eq!(step(98.5, 0.99, &STEADY_WALK), 99.0);
    }

    #[test]
    fn test_clamps_at_low() {
        assert_eq!(step(10.5, 0.0, &STEADY_WALK), 10.0);
    }

    #[test]
    fn test_neutral_draw_is_identity() {
        assert_eq!(step(55.0, 0.45, &STEADY_WALK), 55.0);
        assert_eq!(step(55.0, 0.40, &SEED_WALK), 55.0);
    }

    #[test]
    fn test_seed_series_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let values = seed_series(40.0, 50, &mut rng, &SEED_WALK);
        assert_eq!(values.len(), 50);
        for v in &values {
            assert!((10.0..=99.0).contains(v), "value {} out of range", v);
        }
    }

    #[test]
    fn test_seed_series_deterministic_per_seed() {
        let a = seed_series(40.0, 50, &mut ChaCha8Rng::seed_from_u64(3), &SEED_WALK);
        let b = seed_series(40.0, 50, &mut ChaCha8Rng::seed_from_u64(3), &SEED_WALK);
        assert_eq!(a, b);
    }

    #[test]
    fn test_seed_walk_drifts_upward_on_average() {
        // Mean step of the seed walk is (0.5 - 0.40) * 5.0 = +0.5 per sample.
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let runs = 200;
        let mut total = 0.0;
        for _ in 0..runs {
            let values = seed_series(40.0, 50, &mut rng, &SEED_WALK);
            total += values[49];
        }
        let mean_end = total / runs as f64;
        assert!(mean_end > 55.0, "expected upward drift, mean end {}", mean_end);
    }
}
