// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Threat Index Engine - Chart Projection
//
// Maps the window onto a logical viewport. x spreads samples evenly across
// the width; y is inverted so larger values sit higher on screen. The area
// region closes the polyline against the bottom edge.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::params::ChartParams;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProjectionError {
    #[error("need at least 2 samples to project, got {0}")]
    TooFewSamples(usize),

    #[error("value domain is empty: min {min} >= max {max}")]
    EmptyDomain { min: f64, max: f64 },

    #[error("viewport must have positive size, got {width}x{height}")]
    EmptyViewport { width: f64, height: f64 },
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ValueDomain {
    pub min: f64,
    pub max: f64,
}

impl Default for ValueDomain {
    fn default() -> Self {
        Self { min: 0.0, max: 100.0 }
    }
}

impl From<&ChartParams> for Viewport {
    fn from(chart: &ChartParams) -> Self {
        Self { width: chart.width, height: chart.height }
    }
}

impl From<&ChartParams> for ValueDomain {
    fn from(chart: &ChartParams) -> Self {
        Self { min: chart.domain_min, max: chart.domain_max }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
}

/// Projected chart geometry.
///
/// `line` is the open polyline in sample order. `area` is the closed fill
/// region: bottom-left corner, the polyline, then bottom-right corner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartPath {
    pub viewport: Viewport,
    pub line: Vec<ChartPoint>,
    pub area: Vec<ChartPoint>,
}

impl ChartPath {
    /// SVG `points` attribute for a `<polyline>`: `"x,y x,y ..."`.
    pub fn polyline_points(&self) -> String {
        let mut out = String::with_capacity(self.line.len() * 12);
        for (i, p) in self.line.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            let _ = write!(out, "{},{}", p.x, p.y);
        }
        out
    }

    /// SVG path data for the shaded area, closed with `Z`.
    pub fn area_path(&self) -> String {
        let mut out = String::with_capacity(self.area.len() * 14);
        for (i, p) in self.area.iter().enumerate() {
            let cmd = if i == 0 { 'M' } else { 'L' };
            if i > 0 {
                out.push(' ');
            }
            let _ = write!(out, "{}{},{}", cmd, p.x, p.y);
        }
        out.push_str(" Z");
        out
    }
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

pub fn project(
    values: &[f64],
    viewport: Viewport,
    domain: ValueDomain,
) -> Result<ChartPath, ProjectionError> {
    let n = values.len();
    if n < 2 {
        return Err(ProjectionError::TooFewSamples(n));
    }
    if !(domain.min < domain.max) {
        return Err(ProjectionError::EmptyDomain { min: domain.min, max: domain.max });
    }
    if !(viewport.width > 0.0 && viewport.height > 0.0) {
        return Err(ProjectionError::EmptyViewport {
            width: viewport.width,
            height: viewport.height,
        });
    }

    let span = domain.max - domain.min;
    let last = (n - 1) as f64;
    let line: Vec<ChartPoint> = values
        .iter()
        .enumerate()
        .map(|(i, v)| ChartPoint {
            x: (i as f64 / last) * viewport.width,
            y: viewport.height - ((v - domain.min) / span) * viewport.height,
        })
        .collect();

    let mut area = Vec::with_capacity(n + 2);
    area.push(ChartPoint { x: 0.0, y: viewport.height });
    area.extend_from_slice(&line);
    area.push(ChartPoint { x: viewport.width, y: viewport.height });

    Ok(ChartPath { viewport, line, area })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
