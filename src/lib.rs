// SPDX-License-Identifier: GPL-3.0-only

//! boxfill - depth-camera region spatials and container fill estimation
//!
//! Measures the depth of a selected region of a stereo depth frame, turns the
//! region centroid into x/y/z coordinates, and estimates how full a container
//! is from calibrated empty and full readings.
//!
//! # Architecture
//!
//! - [`depth`]: Depth frames, regions of interest and region statistics
//! - [`spatial`]: Back-projection of a region into camera coordinates
//! - [`fullness`]: Calibration state machine and fill percentage
//! - [`session`]: Per-frame measurement with calibration actions
//! - [`backends`]: Depth frame sources (files, synthetic scene)
//! - [`terminal`]: Interactive terminal viewer
//! - [`config`]: User configuration
//! - [`storage`]: Snapshot saving
//!
//! # Example
//!
//! ```
//! use boxfill::depth::{DepthFrame, RegionOfInterest};
//! use boxfill::spatial::SpatialCalculator;
//!
//! let frame = DepthFrame::filled(640, 400, 1500);
//! let calc = SpatialCalculator::default();
//! let (spatials, centroid) = calc.calc_spatials(&frame, &RegionOfInterest::point(320, 200));
//! assert_eq!(spatials.z, 1500.0);
//! assert_eq!((centroid.x, centroid.y), (320, 200));
//! ```

pub mod backends;
pub mod config;
pub mod constants;
pub mod depth;
pub mod errors;
pub mod fullness;
pub mod roi_selector;
pub mod session;
pub mod spatial;
pub mod storage;
pub mod terminal;
pub mod visualization;

// Re-export commonly used types
pub use config::Config;
pub use constants::AveragingMethod;
pub use depth::{DepthFrame, RegionOfInterest};
pub use errors::{AppError, AppResult};
pub use fullness::{BoxAnalyzer, CalibrationState};
pub use spatial::{SpatialCalculator, SpatialResult};
