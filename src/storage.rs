// SPDX-License-Identifier: GPL-3.0-only

//! Snapshot storage
//!
//! A snapshot is a colourised depth PNG plus a JSON report of the current
//! measurement, written side by side with a shared timestamped stem.

use crate::constants::app_info;
use crate::depth::DepthFrame;
use crate::errors::{AppResult, SourceError};
use crate::session::Measurement;
use crate::visualization::DepthColorizer;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Default snapshot directory under the user's pictures folder
pub fn snapshot_directory(folder_name: &str) -> PathBuf {
    dirs::picture_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
        .join(folder_name)
}

#[derive(Debug, Serialize)]
struct SnapshotReport<'a> {
    version: &'static str,
    captured_at: String,
    source: &'a str,
    width: u32,
    height: u32,
    measurement: Option<&'a Measurement>,
}

/// Paths written by [`save_snapshot`]
#[derive(Debug, Clone)]
pub struct SnapshotPaths {
    pub image: PathBuf,
    pub report: PathBuf,
}

/// Save a colourised frame and its measurement report into `dir`
pub fn save_snapshot(
    dir: &Path,
    source: &str,
    frame: &DepthFrame,
    colorizer: &DepthColorizer,
    measurement: Option<&Measurement>,
) -> AppResult<SnapshotPaths> {
    std::fs::create_dir_all(dir)?;

    let now = chrono::Local::now();
    let stem = format!("DEPTH_{}", now.format("%Y%m%d_%H%M%S"));
    let image_path = dir.join(format!("{}.png", stem));
    let report_path = dir.join(format!("{}.json", stem));

    let img: image::RgbaImage =
        image::ImageBuffer::from_raw(frame.width, frame.height, colorizer.frame_to_rgba(frame))
            .ok_or(SourceError::InvalidDimensions {
                width: frame.width,
                height: frame.height,
                len: frame.samples().len(),
            })?;
    img.save(&image_path)?;

    let report = SnapshotReport {
        version: app_info::version(),
        captured_at: now.to_rfc3339(),
        source,
        width: frame.width,
        height: frame.height,
        measurement,
    };
    std::fs::write(&report_path, serde_json::to_string_pretty(&report)?)?;

    info!(image = %image_path.display(), report = %report_path.display(), "Snapshot saved");
    Ok(SnapshotPaths {
        image: image_path,
        report: report_path,
    })
}
