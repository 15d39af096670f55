// SPDX-License-Identifier: GPL-3.0-only

//! User configuration
//!
//! Stored as JSON under the platform config directory. Missing fields take
//! their defaults so older files keep loading.

use crate::constants::{self, AveragingMethod};
use crate::errors::AppResult;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Directory name under the platform config dir
const CONFIG_DIR_NAME: &str = "boxfill";
/// Config file name
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Samples closer than this are ignored (mm)
    pub thresh_low_mm: u16,
    /// Samples farther than this are ignored (mm)
    pub thresh_high_mm: u16,
    /// Half-width of the square averaged around a point
    pub point_delta: u32,
    /// Horizontal field of view of the depth sensor (degrees)
    pub hfov_deg: f32,
    /// How region depth is aggregated
    pub averaging: AveragingMethod,
    /// Nominal box height for the fill-level estimate (mm)
    pub box_height_mm: f32,
    /// Render depth in grayscale instead of the turbo colormap
    pub grayscale: bool,
    /// Folder under the pictures directory for snapshots
    pub save_folder: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thresh_low_mm: constants::depth::THRESH_LOW_MM,
            thresh_high_mm: constants::depth::THRESH_HIGH_MM,
            point_delta: constants::roi::POINT_DELTA,
            hfov_deg: constants::camera::DEFAULT_HFOV_DEG,
            averaging: AveragingMethod::default(),
            box_height_mm: constants::fullness::DEFAULT_BOX_HEIGHT_MM,
            grayscale: false,
            save_folder: "BoxFill".to_string(),
        }
    }
}

impl Config {
    /// Default config file location
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Load from the default location, falling back to defaults
    pub fn load() -> Self {
        Self::load_or_default(&Self::default_path())
    }

    /// Load from `path`; a missing or malformed file yields defaults
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                if path.exists() {
                    warn!(path = %path.display(), error = %e, "Failed to load config, using defaults");
                } else {
                    debug!(path = %path.display(), "No config file, using defaults");
                }
                Self::default()
            }
        }
    }

    /// Load from `path`, reporting read and parse errors
    pub fn load_from(path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Write to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        info!(path = %path.display(), "Config saved");
        Ok(())
    }

    /// Reject settings the measurement cannot work with
    pub fn validate(&self) -> AppResult<()> {
        if self.thresh_low_mm > self.thresh_high_mm {
            return Err(crate::errors::AppError::Config(format!(
                "thresh_low_mm ({}) is above thresh_high_mm ({})",
                self.thresh_low_mm, self.thresh_high_mm
            )));
        }
        if !(self.hfov_deg > 0.0 && self.hfov_deg < 180.0) {
            return Err(crate::errors::AppError::Config(format!(
                "hfov_deg must be in (0, 180), got {}",
                self.hfov_deg
            )));
        }
        if self.point_delta == 0 {
            return Err(crate::errors::AppError::Config(
                "point_delta must be at least 1".to_string(),
            ));
        }
        if !(self.box_height_mm.is_finite() && self.box_height_mm > 0.0) {
            return Err(crate::errors::AppError::Config(format!(
                "box_height_mm must be positive, got {}",
                self.box_height_mm
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{ "hfov_deg": 50.0 }"#).unwrap();
        assert_eq!(config.hfov_deg, 50.0);
        assert_eq!(config.thresh_low_mm, constants::depth::THRESH_LOW_MM);
        assert_eq!(config.averaging, AveragingMethod::Mean);
    }

    #[test]
    fn test_validate() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());
        config.thresh_low_mm = 5000;
        config.thresh_high_mm = 1000;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.hfov_deg = 180.0;
        assert!(config.validate().is_err());
    }
}
