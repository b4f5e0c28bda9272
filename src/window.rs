// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Threat Index Engine - Sliding Window
//
// Fixed-capacity FIFO of index samples feeding the chart. Every admit evicts
// exactly one sample from the front and appends one at the back; the length
// never changes after construction.

use std::collections::VecDeque;

use rand::Rng;
use serde::Serialize;

use crate::params::WalkParams;
use crate::random_walk;
use crate::types::Sample;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WindowError {
    #[error("window capacity must be at least 2, got {0}")]
    TooSmall(usize),

    #[error("window holds {actual} samples, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },
}

// ---------------------------------------------------------------------------
// SlidingWindow
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlidingWindow {
    samples: VecDeque<Sample>,
    capacity: usize,
}

impl SlidingWindow {
    /// Wrap an existing history. Its length becomes the fixed capacity.
    pub fn from_samples(samples: Vec<Sample>) -> Result<Self, WindowError> {
        let capacity = samples.len();
        if capacity < 2 {
            return Err(WindowError::TooSmall(capacity));
        }
        Ok(Self { samples: samples.into(), capacity })
    }

    /// Build the initial window by walking `capacity` steps away from `seed`.
    /// Samples are numbered `0..capacity`.
    pub fn seeded<R: Rng + ?Sized>(
        seed: f64,
        capacity: usize,
        rng: &mut R,
        params: &WalkParams,
    ) -> Result<Self, WindowError> {
        let samples = random_walk::seed_series(seed, capacity, rng, params)
            .into_iter()
            .enumerate()
            .map(|(i, value)| Sample::new(i as u64, value))
            .collect();
        Self::from_samples(samples)
    }

    /// Evict the oldest sample and append `sample`. Returns the evicted one.
    pub fn admit(&mut self, sample: Sample) -> Result<Sample, WindowError> {
        self.check_len()?;
        let evicted = self
            .samples
            .pop_front()
            .ok_or(WindowError::LengthMismatch { expected: self.capacity, actual: 0 })?;
        self.samples.push_back(sample);
        Ok(evicted)
    }

    /// Non-mutating admit: the shifted window, leaving `self` untouched.
    pub fn admitted(&self, sample: Sample) -> Result<(Self, Sample), WindowError> {
        let mut next = self.clone();
        let evicted = next.admit(sample)?;
        Ok((next, evicted))
    }

    fn check_len(&self) -> Result<(), WindowError> {
        if self.samples.len() != self.capacity {
            return Err(WindowError::LengthMismatch {
                expected: self.capacity,
                actual: self.samples.len(),
            });
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Newest sample. Always present: the window is never empty.
    pub fn latest(&self) -> Sample {
        self.samples[self.samples.len() - 1]
    }

    pub fn oldest(&self) -> Sample {
        self.samples[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> + '_ {
        self.samples.iter()
    }

    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.value).collect()
    }

    pub fn to_vec(&self) -> Vec<Sample> {
        self.samples.iter().copied().collect()
    }

    /// The last `k` samples (fewer if the window is shorter), oldest first.
    pub fn recent(&self, k: usize) -> Vec<Sample> {
        let skip = self.samples.len().saturating_sub(k);
        self.samples.iter().skip(skip).copied().collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
