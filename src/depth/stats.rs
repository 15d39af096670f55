// SPDX-License-Identifier: GPL-3.0-only

//! Depth statistics over a frame region
//!
//! Samples outside the valid range are dropped before aggregation. When nothing
//! is left, every depth output is NaN: that is the "no signal" value callers
//! check for, not an error.

use super::frame::DepthFrame;
use super::roi::RoiBounds;
use serde::{Deserialize, Serialize};

/// Inclusive range of depths considered valid (millimeters)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthRange {
    pub low: u16,
    pub high: u16,
}

impl DepthRange {
    pub fn new(low: u16, high: u16) -> Self {
        Self { low, high }
    }

    #[inline]
    pub fn contains(&self, depth: u16) -> bool {
        self.low <= depth && depth <= self.high
    }
}

impl Default for DepthRange {
    fn default() -> Self {
        Self {
            low: crate::constants::depth::THRESH_LOW_MM,
            high: crate::constants::depth::THRESH_HIGH_MM,
        }
    }
}

/// Aggregated depth over a region
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionStats {
    /// Aggregated depth (mean by default), NaN without valid samples
    pub average: f32,
    /// NaN without valid samples
    pub min: f32,
    /// NaN without valid samples
    pub max: f32,
    pub valid_count: usize,
    pub total_count: usize,
}

/// Collect the in-range samples of `bounds`
pub fn valid_samples(frame: &DepthFrame, bounds: &RoiBounds, range: DepthRange) -> Vec<u16> {
    let mut valid = Vec::with_capacity(bounds.area());
    for y in bounds.ymin..bounds.ymax {
        let row = &frame.row(y)[bounds.xmin as usize..bounds.xmax as usize];
        valid.extend(row.iter().copied().filter(|&d| range.contains(d)));
    }
    valid
}

/// Compute statistics of `bounds` with a caller-supplied aggregation
///
/// `averaging` only ever sees a non-empty slice.
pub fn region_stats<F>(
    frame: &DepthFrame,
    bounds: &RoiBounds,
    range: DepthRange,
    averaging: F,
) -> RegionStats
where
    F: Fn(&[u16]) -> f32,
{
    let valid = valid_samples(frame, bounds, range);
    let total_count = bounds.area();

    let (Some(&min), Some(&max)) = (valid.iter().min(), valid.iter().max()) else {
        return RegionStats {
            average: f32::NAN,
            min: f32::NAN,
            max: f32::NAN,
            valid_count: 0,
            total_count,
        };
    };

    RegionStats {
        average: averaging(&valid),
        min: min as f32,
        max: max as f32,
        valid_count: valid.len(),
        total_count,
    }
}

/// Arithmetic mean, NaN for an empty slice
pub fn mean(samples: &[u16]) -> f32 {
    if samples.is_empty() {
        return f32::NAN;
    }
    let sum: u64 = samples.iter().map(|&d| d as u64).sum();
    (sum as f64 / samples.len() as f64) as f32
}

/// Median (midpoint of the two central values for even counts), NaN for an empty slice
pub fn median(samples: &[u16]) -> f32 {
    if samples.is_empty() {
        return f32::NAN;
    }
    let mut sorted = samples.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] as f32 + sorted[mid] as f32) / 2.0
    } else {
        sorted[mid] as f32
    }
}
