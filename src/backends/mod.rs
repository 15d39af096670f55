// SPDX-License-Identifier: GPL-3.0-only

//! Depth frame sources
//!
//! ```text
//! ┌─────────────────────┐
//! │  session / cli      │
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │  DepthSource trait  │  ← Common interface
//! └──────────┬──────────┘
//!            │
//!       ┌────┴──────┐
//!       ▼           ▼
//!  ┌────────┐ ┌───────────┐
//!  │ Files  │ │ Synthetic │
//!  └────────┘ └───────────┘
//! ```
//!
//! Hardware SDKs plug in behind the same trait.

pub mod file_source;
pub mod synthetic;

pub use file_source::FileSource;
pub use synthetic::{SyntheticScene, SyntheticSource};

use crate::config::Config;
use crate::depth::DepthFrame;
use crate::errors::AppResult;
use std::path::Path;

/// Anything that produces depth frames one at a time
pub trait DepthSource {
    /// Human readable source name
    fn name(&self) -> &str;

    /// Block until the next frame is available
    fn next_frame(&mut self) -> AppResult<DepthFrame>;

    /// Horizontal field of view reported by the source, if it knows it
    fn hfov_degrees(&self) -> Option<f32> {
        None
    }
}

/// Open a file/directory source, or the synthetic scene when no path is given
///
/// The synthetic scene takes its field of view and box height from `config`.
pub fn open_source(path: Option<&Path>, config: &Config) -> AppResult<Box<dyn DepthSource>> {
    match path {
        Some(path) => Ok(Box::new(FileSource::open(path)?)),
        None => {
            let scene = SyntheticScene {
                hfov_deg: config.hfov_deg,
                box_height_mm: config.box_height_mm,
                ..SyntheticScene::default()
            };
            Ok(Box::new(SyntheticSource::new(scene)))
        }
    }
}
