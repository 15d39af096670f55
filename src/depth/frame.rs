// SPDX-License-Identifier: GPL-3.0-only

//! Depth frame container

use crate::errors::{AppResult, SourceError};
use std::sync::Arc;
use std::time::Instant;

/// A single depth frame in millimeters
///
/// Samples are stored row-major, one `u16` per pixel. A value of 0 marks a
/// pixel the stereo matcher could not resolve. The sample buffer is shared, so
/// cloning a frame does not copy pixel data.
#[derive(Clone)]
pub struct DepthFrame {
    pub width: u32,
    pub height: u32,
    data: Arc<[u16]>,
    /// Horizontal FOV reported by the source for this frame, if known
    pub hfov_deg: Option<f32>,
    pub captured_at: Instant,
}

impl DepthFrame {
    /// Create a frame, checking that the buffer matches the dimensions
    pub fn new(width: u32, height: u32, data: Vec<u16>) -> AppResult<Self> {
        if data.len() != width as usize * height as usize {
            return Err(SourceError::InvalidDimensions {
                width,
                height,
                len: data.len(),
            }
            .into());
        }
        Ok(Self {
            width,
            height,
            data: Arc::from(data.into_boxed_slice()),
            hfov_deg: None,
            captured_at: Instant::now(),
        })
    }

    /// Create a frame filled with a single depth value
    pub fn filled(width: u32, height: u32, depth_mm: u16) -> Self {
        Self {
            width,
            height,
            data: Arc::from(vec![depth_mm; width as usize * height as usize].into_boxed_slice()),
            hfov_deg: None,
            captured_at: Instant::now(),
        }
    }

    /// Attach the source's field of view
    pub fn with_hfov(mut self, hfov_deg: f32) -> Self {
        self.hfov_deg = Some(hfov_deg);
        self
    }

    /// All samples, row-major
    pub fn samples(&self) -> &[u16] {
        &self.data
    }

    /// One row of samples
    pub fn row(&self, y: u32) -> &[u16] {
        let start = y as usize * self.width as usize;
        &self.data[start..start + self.width as usize]
    }

    /// Sample at (x, y), `None` outside the frame
    pub fn get(&self, x: u32, y: u32) -> Option<u16> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[y as usize * self.width as usize + x as usize])
    }
}

impl std::fmt::Debug for DepthFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "DepthFrame({}x{}, {} samples)",
            self.width,
            self.height,
            self.data.len()
        )
    }
}
