// SPDX-License-Identifier: GPL-3.0-only

//! Interactive measurement session
//!
//! Ties the region selection, spatial calculator and fullness estimator
//! together: each frame produces one [`Measurement`], and calibration actions
//! sample the current region of that frame.

use crate::config::Config;
use crate::depth::{Centroid, DepthFrame, RegionOfInterest};
use crate::errors::{AppResult, CalibrationError};
use crate::fullness::BoxAnalyzer;
use crate::roi_selector::RoiSelector;
use crate::spatial::{SpatialCalculator, SpatialResult};
use serde::Serialize;

/// Everything measured for the selected region in one frame
#[derive(Debug, Clone, Serialize)]
pub struct Measurement {
    pub roi: RegionOfInterest,
    pub centroid: Centroid,
    pub spatials: SpatialResult,
    /// Empty-box reference, once calibrated
    pub ground_mm: Option<f32>,
    /// Full-box reference, once calibrated
    pub full_mm: Option<f32>,
    /// Fill percentage, when fully calibrated
    pub fullness: Option<f32>,
    pub fill_level_mm: Option<f32>,
}

impl Measurement {
    /// Overlay text lines, `None` values omitted
    pub fn report_lines(&self) -> Vec<String> {
        let s = &self.spatials;
        let mut lines = vec![
            format!("Current Depth: {}", format_mm(s.z)),
            format!("Avg Z: {}", format_meters(s.z)),
            format!("Min Z: {}", format_meters(s.min_z)),
            format!("Max Z: {}", format_meters(s.max_z)),
            format!("X: {}  Y: {}", format_mm(s.x), format_mm(s.y)),
            format!("Valid: {}/{}", s.valid_points, s.total_points),
        ];
        if let Some(ground) = self.ground_mm {
            lines.push(format!("Empty Box: {:.0}mm", ground));
        }
        if let Some(full) = self.full_mm {
            lines.push(format!("Full Box: {:.0}mm", full));
        }
        if let Some(fullness) = self.fullness {
            lines.push(format!("Fullness: {:.1}%", fullness));
        }
        lines
    }
}

/// Depth in meters with one decimal, "--" without signal
pub fn format_meters(mm: f32) -> String {
    if mm.is_nan() {
        "--".to_string()
    } else {
        format!("{:.1}m", mm / 1000.0)
    }
}

/// Depth in whole millimeters, "--" without signal
pub fn format_mm(mm: f32) -> String {
    if mm.is_nan() {
        "--".to_string()
    } else {
        format!("{:.0}mm", mm)
    }
}

/// Calibration target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationTarget {
    /// Empty box
    Ground,
    /// Full box
    Full,
}

pub struct Session {
    pub calculator: SpatialCalculator,
    pub analyzer: BoxAnalyzer,
    pub selector: RoiSelector,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        Self {
            calculator: SpatialCalculator::from_config(config),
            analyzer: BoxAnalyzer::new(config.box_height_mm),
            selector: RoiSelector::new(),
        }
    }

    /// Measure the committed region in `frame`, `None` without a region
    pub fn measure(&self, frame: &DepthFrame) -> Option<Measurement> {
        let roi = self.selector.roi()?;
        Some(self.measure_roi(frame, roi))
    }

    /// Measure an explicit region
    pub fn measure_roi(&self, frame: &DepthFrame, roi: RegionOfInterest) -> Measurement {
        let (spatials, centroid) = self.calculator.calc_spatials(frame, &roi);
        Measurement {
            roi,
            centroid,
            spatials,
            ground_mm: self.analyzer.ground_distance(),
            full_mm: self.analyzer.full_box_depth(),
            fullness: self.analyzer.calculate_fullness(spatials.z),
            fill_level_mm: self.analyzer.fill_level_mm(spatials.z),
        }
    }

    /// Record the current region depth as a calibration reading
    ///
    /// Returns the recorded depth. Without a region nothing happens and
    /// `Ok(None)` is returned; a region with no valid depth is an error.
    pub fn calibrate(
        &mut self,
        frame: &DepthFrame,
        target: CalibrationTarget,
    ) -> AppResult<Option<f32>> {
        let Some(roi) = self.selector.roi() else {
            return Ok(None);
        };
        let (spatials, _) = self.calculator.calc_spatials(frame, &roi);
        if !spatials.has_depth() {
            return Err(CalibrationError::InvalidReading(spatials.z).into());
        }
        match target {
            CalibrationTarget::Ground => self.analyzer.calibrate_ground(spatials.z)?,
            CalibrationTarget::Full => self.analyzer.calibrate_full_box(spatials.z)?,
        }
        Ok(Some(spatials.z))
    }
}
