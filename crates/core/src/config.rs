//! Engine configuration.
//!
//! Configuration is read from a JSON file. Every field has a default, so a
//! file only needs to mention the values it overrides:
//!
//! ```
//! use orrery_core::EngineConfig;
//!
//! let config = EngineConfig::from_json_str(r#"{ "target_fps": 30 }"#).unwrap();
//! assert_eq!(config.target_fps, 30);
//! assert_eq!(config.camera.fov_deg, 65.0);
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{Error, Result};

/// Top-level engine settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Frame rate the loop paces itself to. Zero disables pacing.
    pub target_fps: u32,
    /// Directory containing `shaders/`, `models/` and `textures/`.
    pub asset_root: PathBuf,
    /// Viewport width over height.
    pub aspect_ratio: f64,
    pub camera: CameraConfig,
    pub controller: ControllerConfig,
}

/// Perspective projection settings for the scene camera.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_deg: f64,
    pub near: f64,
    pub far: f64,
}

/// Tuning for the free-fly controller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Units per second.
    pub move_speed: f64,
    /// Degrees of rotation per unit of cursor movement.
    pub look_speed_deg: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            asset_root: PathBuf::from("assets"),
            aspect_ratio: 16.0 / 9.0,
            camera: CameraConfig::default(),
            controller: ControllerConfig::default(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_deg: 65.0,
            near: 0.1,
            far: 10_000.0,
        }
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            look_speed_deg: 0.1,
        }
    }
}

impl EngineConfig {
    /// Load and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a config from a JSON string.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).map_err(|source| Error::Json {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would produce a degenerate projection.
    pub fn validate(&self) -> Result<()> {
        let camera = &self.camera;
        if camera.near <= 0.0 || camera.far <= 0.0 {
            return Err(Error::Config(format!(
                "clip planes must be positive (near = {}, far = {})",
                camera.near, camera.far
            )));
        }
        if camera.far <= camera.near {
            return Err(Error::Config(format!(
                "far plane {} must lie beyond near plane {}",
                camera.far, camera.near
            )));
        }
        if !(camera.fov_deg > 0.0 && camera.fov_deg < 180.0) {
            return Err(Error::Config(format!(
                "field of view must be within (0, 180) degrees, got {}",
                camera.fov_deg
            )));
        }
        if self.aspect_ratio <= 0.0 {
            return Err(Error::Config(format!(
                "aspect ratio must be positive, got {}",
                self.aspect_ratio
            )));
        }
        Ok(())
    }

    /// Frame budget derived from `target_fps`, or `None` when unpaced.
    pub fn frame_interval(&self) -> Option<Duration> {
        (self.target_fps > 0).then(|| Duration::from_secs_f64(1.0 / f64::from(self.target_fps)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.target_fps, 60);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config =
            EngineConfig::from_json_str(r#"{ "camera": { "fov_deg": 90.0 } }"#).unwrap();

        assert_eq!(config.camera.fov_deg, 90.0);
        assert_eq!(config.camera.near, CameraConfig::default().near);
        assert_eq!(config.controller, ControllerConfig::default());
    }

    #[test]
    fn test_rejects_inverted_clip_planes() {
        let result = EngineConfig::from_json_str(r#"{ "camera": { "near": 10.0, "far": 1.0 } }"#);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let result = EngineConfig::from_json_str("{ target_fps: }");
        assert!(matches!(result, Err(Error::Json { .. })));
    }

    #[test]
    fn test_frame_interval() {
        let mut config = EngineConfig::default();
        config.target_fps = 50;
        assert_eq!(config.frame_interval(), Some(Duration::from_millis(20)));

        config.target_fps = 0;
        assert_eq!(config.frame_interval(), None);
    }

    #[test]
    fn test_load_missing_file() {
        let result = EngineConfig::load("definitely/not/here.json");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
