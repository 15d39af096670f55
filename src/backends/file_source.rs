// SPDX-License-Identifier: GPL-3.0-only

//! Depth frames from image files
//!
//! Reads 16-bit grayscale images where each sample is a depth in millimeters.
//! A directory is played back in file-name order and loops.

use super::DepthSource;
use crate::constants::file_formats;
use crate::depth::DepthFrame;
use crate::errors::{AppResult, SourceError};
use image::{DynamicImage, ImageBuffer, Luma};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Load a single depth image
///
/// 16-bit grayscale is used as-is. 8-bit grayscale is widened sample by
/// sample without rescaling.
pub fn load_depth_image(path: &Path) -> AppResult<DepthFrame> {
    let img = image::open(path)?;
    let (width, height) = (img.width(), img.height());

    let data = match img {
        DynamicImage::ImageLuma16(buf) => buf.into_raw(),
        DynamicImage::ImageLuma8(buf) => buf.into_raw().into_iter().map(u16::from).collect(),
        other => {
            return Err(SourceError::Decode(format!(
                "{}: expected grayscale depth image, got {:?}",
                path.display(),
                other.color()
            ))
            .into());
        }
    };

    debug!(path = %path.display(), width, height, "Loaded depth image");
    DepthFrame::new(width, height, data)
}

/// Write a frame as a 16-bit grayscale image (format from the extension)
pub fn write_depth_image(frame: &DepthFrame, path: &Path) -> AppResult<()> {
    let buf: ImageBuffer<Luma<u16>, Vec<u16>> =
        ImageBuffer::from_raw(frame.width, frame.height, frame.samples().to_vec()).ok_or(
            SourceError::InvalidDimensions {
                width: frame.width,
                height: frame.height,
                len: frame.samples().len(),
            },
        )?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    buf.save(path)?;
    Ok(())
}

/// Collect depth images in a directory, sorted by file name
pub fn collect_depth_paths(dir: &Path) -> AppResult<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if is_depth_image(&path) {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths)
}

fn is_depth_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(file_formats::is_depth_image_extension)
        .unwrap_or(false)
}

/// Plays back one file or a directory of files
pub struct FileSource {
    name: String,
    paths: Vec<PathBuf>,
    next_index: usize,
    /// Single-file sources decode once
    cached: Option<DepthFrame>,
}

impl FileSource {
    pub fn open(path: &Path) -> AppResult<Self> {
        let paths = if path.is_dir() {
            collect_depth_paths(path)?
        } else if path.is_file() {
            vec![path.to_path_buf()]
        } else {
            return Err(SourceError::NoFrames(format!("{} does not exist", path.display())).into());
        };

        if paths.is_empty() {
            return Err(SourceError::NoFrames(format!(
                "no depth images in {}",
                path.display()
            ))
            .into());
        }

        info!(path = %path.display(), frames = paths.len(), "Opened file depth source");
        Ok(Self {
            name: path.display().to_string(),
            paths,
            next_index: 0,
            cached: None,
        })
    }

    pub fn frame_count(&self) -> usize {
        self.paths.len()
    }
}

impl DepthSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn next_frame(&mut self) -> AppResult<DepthFrame> {
        if self.paths.len() == 1
            && let Some(frame) = &self.cached
        {
            return Ok(frame.clone());
        }

        let path = &self.paths[self.next_index];
        self.next_index = (self.next_index + 1) % self.paths.len();

        let frame = load_depth_image(path)?;
        if self.paths.len() == 1 {
            self.cached = Some(frame.clone());
        }
        Ok(frame)
    }
}
