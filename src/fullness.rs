// SPDX-License-Identifier: GPL-3.0-only

//! Container fullness from calibrated depth readings
//!
//! The camera looks down into a box. An empty box reads the distance to its
//! floor ("ground"), a full box reads the distance to the content surface.
//! Any live reading in between is linearly interpolated:
//!
//! ```text
//! fullness = clamp((ground - current) / (ground - full) * 100, 0, 100)
//! ```

use crate::constants::fullness::{DEFAULT_BOX_HEIGHT_MM, MIN_CALIBRATION_SPAN_MM};
use crate::errors::CalibrationError;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Calibration progress
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CalibrationState {
    Uncalibrated,
    /// Empty-box distance recorded
    GroundCalibrated { ground_mm: f32 },
    /// Both empty-box and full-box distances recorded
    FullyCalibrated { ground_mm: f32, full_mm: f32 },
}

/// Fullness estimator for a single container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxAnalyzer {
    box_height_mm: f32,
    state: CalibrationState,
}

impl Default for BoxAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_BOX_HEIGHT_MM)
    }
}

impl BoxAnalyzer {
    pub fn new(box_height_mm: f32) -> Self {
        Self {
            box_height_mm,
            state: CalibrationState::Uncalibrated,
        }
    }

    pub fn state(&self) -> CalibrationState {
        self.state
    }

    pub fn box_height_mm(&self) -> f32 {
        self.box_height_mm
    }

    /// Recorded empty-box distance
    pub fn ground_distance(&self) -> Option<f32> {
        match self.state {
            CalibrationState::Uncalibrated => None,
            CalibrationState::GroundCalibrated { ground_mm }
            | CalibrationState::FullyCalibrated { ground_mm, .. } => Some(ground_mm),
        }
    }

    /// Recorded full-box distance
    pub fn full_box_depth(&self) -> Option<f32> {
        match self.state {
            CalibrationState::FullyCalibrated { full_mm, .. } => Some(full_mm),
            _ => None,
        }
    }

    /// Record the empty-box distance
    ///
    /// Re-calibrating ground keeps an existing full-box reading.
    pub fn calibrate_ground(&mut self, depth_mm: f32) -> Result<(), CalibrationError> {
        if !depth_mm.is_finite() {
            return Err(CalibrationError::InvalidReading(depth_mm));
        }

        self.state = match self.state {
            CalibrationState::FullyCalibrated { full_mm, .. } => CalibrationState::FullyCalibrated {
                ground_mm: depth_mm,
                full_mm,
            },
            _ => CalibrationState::GroundCalibrated {
                ground_mm: depth_mm,
            },
        };
        info!(ground_mm = depth_mm, "Empty box distance calibrated");
        self.warn_on_degenerate_span();
        Ok(())
    }

    /// Record the full-box distance, requires the empty-box distance
    pub fn calibrate_full_box(&mut self, depth_mm: f32) -> Result<(), CalibrationError> {
        if !depth_mm.is_finite() {
            return Err(CalibrationError::InvalidReading(depth_mm));
        }
        let ground_mm = self
            .ground_distance()
            .ok_or(CalibrationError::GroundNotCalibrated)?;

        self.state = CalibrationState::FullyCalibrated {
            ground_mm,
            full_mm: depth_mm,
        };
        info!(full_mm = depth_mm, "Full box depth calibrated");
        self.warn_on_degenerate_span();
        Ok(())
    }

    /// Forget both readings
    pub fn reset(&mut self) {
        self.state = CalibrationState::Uncalibrated;
        info!("Box calibration reset");
    }

    /// Fill percentage in [0, 100]
    ///
    /// `None` until fully calibrated, for a non-finite reading, or when the
    /// two calibration readings are too close to tell apart.
    pub fn calculate_fullness(&self, current_mm: f32) -> Option<f32> {
        let CalibrationState::FullyCalibrated { ground_mm, full_mm } = self.state else {
            return None;
        };
        if !current_mm.is_finite() {
            return None;
        }

        let total_range = ground_mm - full_mm;
        if total_range.abs() < MIN_CALIBRATION_SPAN_MM {
            return None;
        }

        let current_range = ground_mm - current_mm;
        Some((current_range / total_range * 100.0).clamp(0.0, 100.0))
    }

    /// Estimated content height inside the box (mm)
    pub fn fill_level_mm(&self, current_mm: f32) -> Option<f32> {
        self.calculate_fullness(current_mm)
            .map(|pct| pct / 100.0 * self.box_height_mm)
    }

    fn warn_on_degenerate_span(&self) {
        if let CalibrationState::FullyCalibrated { ground_mm, full_mm } = self.state
            && (ground_mm - full_mm).abs() < MIN_CALIBRATION_SPAN_MM
        {
            warn!(
                ground_mm,
                full_mm, "Empty and full readings coincide, fullness unavailable"
            );
        }
    }
}
