// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use serde::{Deserialize, Serialize};

/// Depth validity thresholds (millimeters)
pub mod depth {
    /// Samples closer than this are discarded (20 cm)
    pub const THRESH_LOW_MM: u16 = 200;
    /// Samples farther than this are discarded (30 m)
    pub const THRESH_HIGH_MM: u16 = 30_000;
    /// Invalid depth marker written by stereo matchers
    pub const INVALID_MM: u16 = 0;
}

/// Region of interest defaults
pub mod roi {
    /// Half-width of the square built around a single point (10x10 window)
    pub const POINT_DELTA: u32 = 5;
}

/// Camera defaults
pub mod camera {
    /// Horizontal FOV of the mono sensors on common stereo modules (degrees)
    pub const DEFAULT_HFOV_DEG: f32 = 71.86;
}

/// Fullness estimator defaults
pub mod fullness {
    /// Nominal box height used for the fill-level estimate (mm)
    pub const DEFAULT_BOX_HEIGHT_MM: f32 = 730.0;
    /// Calibration spans smaller than this are treated as degenerate (mm)
    pub const MIN_CALIBRATION_SPAN_MM: f32 = 1.0;
}

/// Terminal viewer timing
pub mod timing {
    /// Input poll timeout per frame
    pub const INPUT_POLL_MS: u64 = 16;
    /// Default pause between frames in `watch` mode
    pub const WATCH_INTERVAL_MS: u64 = 100;
}

/// Depth file formats
pub mod file_formats {
    /// Image extensions that can carry 16-bit depth
    pub const DEPTH_IMAGE_EXTENSIONS: &[&str] = &["png", "tif", "tiff", "pgm"];

    /// Check if an extension is a supported depth image
    pub fn is_depth_image_extension(ext: &str) -> bool {
        DEPTH_IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str())
    }
}

/// Depth aggregation used for the region's representative depth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AveragingMethod {
    /// Arithmetic mean of valid samples (default)
    #[default]
    Mean,
    /// Median of valid samples, robust against speckle
    Median,
}

impl AveragingMethod {
    /// All methods for iteration
    pub const ALL: [AveragingMethod; 2] = [AveragingMethod::Mean, AveragingMethod::Median];

    /// Display name
    pub fn display_name(&self) -> &'static str {
        match self {
            AveragingMethod::Mean => "Mean",
            AveragingMethod::Median => "Median",
        }
    }

    /// Parse a method name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "mean" | "average" | "avg" => Some(AveragingMethod::Mean),
            "median" => Some(AveragingMethod::Median),
            _ => None,
        }
    }

    /// Aggregate a non-empty slice of valid samples
    pub fn apply(&self, samples: &[u16]) -> f32 {
        match self {
            AveragingMethod::Mean => crate::depth::stats::mean(samples),
            AveragingMethod::Median => crate::depth::stats::median(samples),
        }
    }
}

impl std::fmt::Display for AveragingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Application information utilities
pub mod app_info {
    /// Get the application version from build-time environment
    pub fn version() -> &'static str {
        env!("GIT_VERSION")
    }
}
