// SPDX-License-Identifier: GPL-3.0-only

//! Host-side spatial coordinates for a depth region
//!
//! Averages the region's depth and back-projects the region centroid through
//! a pinhole model with the principal point at the frame center:
//!
//! ```text
//! angle = atan(tan(HFOV / 2) * offset_px / (frame_width / 2))
//! x     =  z * tan(angle_x)
//! y     = -z * tan(angle_y)
//! ```
//!
//! Both axes use the frame width as half extent (square pixels), and no lens
//! distortion correction is applied.

use crate::constants::{self, AveragingMethod};
use crate::depth::{Centroid, DepthFrame, DepthRange, RegionOfInterest, region_stats};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Spatial measurement of one region, in millimeters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpatialResult {
    /// Aggregated depth, NaN without valid samples
    pub z: f32,
    pub min_z: f32,
    pub max_z: f32,
    /// Lateral offset from the optical axis (right is positive)
    pub x: f32,
    /// Vertical offset from the optical axis (up is positive)
    pub y: f32,
    pub valid_points: usize,
    pub total_points: usize,
}

impl SpatialResult {
    /// Whether the region produced a depth
    pub fn has_depth(&self) -> bool {
        !self.z.is_nan()
    }
}

/// Angle of a pixel offset from the optical axis
///
/// `offset_px` is measured from the frame center, `frame_width` gives the
/// half extent used for normalisation.
pub fn calc_angle(frame_width: u32, offset_px: f32, hfov_rad: f32) -> f32 {
    ((hfov_rad / 2.0).tan() * offset_px / (frame_width as f32 / 2.0)).atan()
}

/// Real-world offset at depth `z` for a pixel offset from the frame center
pub fn back_project(z: f32, frame_width: u32, offset_px: f32, hfov_rad: f32) -> f32 {
    z * calc_angle(frame_width, offset_px, hfov_rad).tan()
}

/// Spatial calculator configured with thresholds and a field of view
#[derive(Debug, Clone)]
pub struct SpatialCalculator {
    range: DepthRange,
    delta: u32,
    hfov_deg: f32,
    averaging: AveragingMethod,
}

impl Default for SpatialCalculator {
    fn default() -> Self {
        Self::new(constants::camera::DEFAULT_HFOV_DEG)
    }
}

impl SpatialCalculator {
    pub fn new(hfov_deg: f32) -> Self {
        Self {
            range: DepthRange::default(),
            delta: constants::roi::POINT_DELTA,
            hfov_deg,
            averaging: AveragingMethod::default(),
        }
    }

    /// Build from the user configuration
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self {
            range: DepthRange::new(config.thresh_low_mm, config.thresh_high_mm),
            delta: config.point_delta,
            hfov_deg: config.hfov_deg,
            averaging: config.averaging,
        }
    }

    pub fn set_lower_threshold(&mut self, low_mm: u16) {
        self.range.low = low_mm;
    }

    pub fn set_upper_threshold(&mut self, high_mm: u16) {
        self.range.high = high_mm;
    }

    /// Half-width of the square built around point regions
    pub fn set_delta_roi(&mut self, delta: u32) {
        self.delta = delta;
    }

    pub fn set_hfov_deg(&mut self, hfov_deg: f32) {
        self.hfov_deg = hfov_deg;
    }

    pub fn set_averaging(&mut self, averaging: AveragingMethod) {
        self.averaging = averaging;
    }

    pub fn range(&self) -> DepthRange {
        self.range
    }

    pub fn delta(&self) -> u32 {
        self.delta
    }

    pub fn hfov_deg(&self) -> f32 {
        self.hfov_deg
    }

    pub fn averaging(&self) -> AveragingMethod {
        self.averaging
    }

    /// Measure a region with the configured averaging method
    pub fn calc_spatials(
        &self,
        frame: &DepthFrame,
        roi: &RegionOfInterest,
    ) -> (SpatialResult, Centroid) {
        let averaging = self.averaging;
        self.calc_spatials_with(frame, roi, |samples| averaging.apply(samples))
    }

    /// Measure a region with a caller-supplied aggregation
    ///
    /// The frame's own FOV hint wins over the configured one.
    pub fn calc_spatials_with<F>(
        &self,
        frame: &DepthFrame,
        roi: &RegionOfInterest,
        averaging: F,
    ) -> (SpatialResult, Centroid)
    where
        F: Fn(&[u16]) -> f32,
    {
        let bounds = roi.resolve(frame.width, frame.height, self.delta);
        let stats = region_stats(frame, &bounds, self.range, averaging);

        let hfov_rad = frame.hfov_deg.unwrap_or(self.hfov_deg).to_radians();
        let centroid = bounds.centroid();

        let offset_x = centroid.x as f32 - (frame.width / 2) as f32;
        let offset_y = centroid.y as f32 - (frame.height / 2) as f32;

        let z = stats.average;
        let result = SpatialResult {
            z,
            min_z: stats.min,
            max_z: stats.max,
            x: back_project(z, frame.width, offset_x, hfov_rad),
            // Image rows grow downward
            y: -back_project(z, frame.width, offset_y, hfov_rad),
            valid_points: stats.valid_count,
            total_points: stats.total_count,
        };

        debug!(
            %roi,
            ?bounds,
            z = result.z,
            valid = result.valid_points,
            total = result.total_points,
            "Calculated spatials"
        );

        (result, centroid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_has_zero_offset() {
        let frame = DepthFrame::filled(640, 400, 1500);
        let calc = SpatialCalculator::default();
        let (result, centroid) = calc.calc_spatials(&frame, &RegionOfInterest::point(320, 200));
        assert_eq!(centroid, Centroid { x: 320, y: 200 });
        assert_eq!(result.z, 1500.0);
        assert!(result.x.abs() < 1e-3);
        assert!(result.y.abs() < 1e-3);
    }

    #[test]
    fn test_edge_of_frame_reaches_half_fov() {
        // At offset = width / 2 the angle equals HFOV / 2
        let hfov = 90f32.to_radians();
        let angle = calc_angle(640, 320.0, hfov);
        assert!((angle - hfov / 2.0).abs() < 1e-5);
        // tan(45deg) = 1, so x equals z
        assert!((back_project(1000.0, 640, 320.0, hfov) - 1000.0).abs() < 1e-2);
    }

    #[test]
    fn test_offsets_match_back_projection() {
        let frame = DepthFrame::filled(640, 400, 1800);
        let calc = SpatialCalculator::new(80.0);
        let (r, centroid) = calc.calc_spatials(&frame, &RegionOfInterest::rect(400, 50, 420, 70));
        assert_eq!(centroid, Centroid { x: 410, y: 60 });

        let hfov = 80f32.to_radians();
        assert_eq!(r.x, back_project(1800.0, 640, 90.0, hfov));
        assert_eq!(r.y, -back_project(1800.0, 640, -140.0, hfov));
    }

    #[test]
    fn test_quadrant_signs() {
        let frame = DepthFrame::filled(640, 400, 2000);
        let calc = SpatialCalculator::new(72.0);
        // Right of and above center: x > 0, y > 0
        let (r, _) = calc.calc_spatials(&frame, &RegionOfInterest::rect(500, 20, 520, 40));
        assert!(r.x > 0.0);
        assert!(r.y > 0.0);
        // Left of and below center: x < 0, y < 0
        let (r, _) = calc.calc_spatials(&frame, &RegionOfInterest::rect(20, 300, 40, 320));
        assert!(r.x < 0.0);
        assert!(r.y < 0.0);
    }

    #[test]
    fn test_nan_propagates_to_offsets() {
        let frame = DepthFrame::filled(64, 48, 0);
        let calc = SpatialCalculator::default();
        let (r, _) = calc.calc_spatials(&frame, &RegionOfInterest::rect(0, 0, 10, 10));
        assert!(!r.has_depth());
        assert!(r.x.is_nan());
        assert!(r.y.is_nan());
        assert_eq!(r.valid_points, 0);
        assert_eq!(r.total_points, 100);
    }

    #[test]
    fn test_frame_hfov_overrides_configured() {
        let calc = SpatialCalculator::new(40.0);
        let roi = RegionOfInterest::rect(600, 190, 640, 210);
        let narrow = DepthFrame::filled(640, 400, 1000);
        let wide = DepthFrame::filled(640, 400, 1000).with_hfov(100.0);
        let (a, _) = calc.calc_spatials(&narrow, &roi);
        let (b, _) = calc.calc_spatials(&wide, &roi);
        assert!(b.x > a.x);
    }

    #[test]
    fn test_delta_setter_changes_point_window() {
        let frame = DepthFrame::filled(100, 100, 1000);
        let mut calc = SpatialCalculator::default();
        calc.set_delta_roi(2);
        let (r, _) = calc.calc_spatials(&frame, &RegionOfInterest::point(50, 50));
        assert_eq!(r.total_points, 16);
    }
}
