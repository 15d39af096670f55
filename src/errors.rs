// SPDX-License-Identifier: GPL-3.0-only

//! Error types for depth measurement and calibration

use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Region of interest errors
    Roi(RoiError),
    /// Fullness calibration errors
    Calibration(CalibrationError),
    /// Depth source errors
    Source(SourceError),
    /// Configuration errors
    Config(String),
    /// Storage/filesystem errors
    Storage(String),
    /// Generic error with message
    Other(String),
}

/// Region of interest errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoiError {
    /// Neither a point (2 values) nor a box (4 values)
    InvalidShape(usize),
}

/// Fullness calibration errors
#[derive(Debug, Clone, PartialEq)]
pub enum CalibrationError {
    /// Reading was NaN or infinite (no valid depth in the region)
    InvalidReading(f32),
    /// Full-box reading attempted before the empty-box reading
    GroundNotCalibrated,
}

/// Depth source errors
#[derive(Debug, Clone)]
pub enum SourceError {
    /// Nothing to read from (empty directory, missing file)
    NoFrames(String),
    /// Frame could not be decoded as depth data
    Decode(String),
    /// Frame dimensions do not match the sample buffer
    InvalidDimensions { width: u32, height: u32, len: usize },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Roi(e) => write!(f, "ROI error: {}", e),
            AppError::Calibration(e) => write!(f, "Calibration error: {}", e),
            AppError::Source(e) => write!(f, "Depth source error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for RoiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoiError::InvalidShape(n) => write!(
                f,
                "expected either a ROI (4 values) or a point (2 values), got {} values",
                n
            ),
        }
    }
}

impl fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalibrationError::InvalidReading(v) => write!(f, "Invalid depth reading: {}", v),
            CalibrationError::GroundNotCalibrated => {
                write!(f, "Empty box distance must be calibrated first")
            }
        }
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::NoFrames(msg) => write!(f, "No frames available: {}", msg),
            SourceError::Decode(msg) => write!(f, "Failed to decode depth frame: {}", msg),
            SourceError::InvalidDimensions { width, height, len } => write!(
                f,
                "Frame {}x{} does not match {} samples",
                width, height, len
            ),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for RoiError {}
impl std::error::Error for CalibrationError {}
impl std::error::Error for SourceError {}

impl From<RoiError> for AppError {
    fn from(err: RoiError) -> Self {
        AppError::Roi(err)
    }
}

impl From<CalibrationError> for AppError {
    fn from(err: CalibrationError) -> Self {
        AppError::Calibration(err)
    }
}

impl From<SourceError> for AppError {
    fn from(err: SourceError) -> Self {
        AppError::Source(err)
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<image::ImageError> for AppError {
    fn from(err: image::ImageError) -> Self {
        AppError::Source(SourceError::Decode(err.to_string()))
    }
}
