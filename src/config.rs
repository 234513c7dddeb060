//! Viewer configuration.
//!
//! All tunables live in [`ViewerConfig`], which can be loaded from a TOML file
//! and falls back to defaults matching the reference scene (a teapot under the
//! Spree bank environment). Every field is optional in the file; unspecified
//! values keep their defaults.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Asset paths, all relative to the working directory.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    pub model: String,
    pub environment: String,
    pub lut: String,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            model: "assets/gltf/pot.glb".to_string(),
            environment: "assets/hdr/spree_bank_1k.hdr".to_string(),
            lut: "assets/lut_v2.3dl".to_string(),
        }
    }
}

/// Camera and orbit-control constants.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Height of both the camera and the orbit target.
    pub eye_height: f32,
    /// Initial distance from the orbit target.
    pub distance: f32,
    pub min_distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 40.0,
            near: 0.01,
            far: 250.0,
            eye_height: 8.75,
            distance: 25.0,
            min_distance: 5.0,
        }
    }
}

/// Canonical bounding box the loaded model is scaled to fit.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct FitTarget {
    pub width: f32,
    pub height: f32,
}

impl Default for FitTarget {
    fn default() -> Self {
        Self {
            width: 45.0,
            height: 15.0,
        }
    }
}

/// Per-effect enable switches. The chain order itself is fixed.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EffectToggles {
    pub ssgi: bool,
    pub traa: bool,
    pub sharpen: bool,
    pub bloom_lut: bool,
    /// Constructed but disabled by default, matching the reference viewer.
    pub motion_blur: bool,
    /// Constructed but disabled by default, matching the reference viewer.
    pub lens_distortion: bool,
    /// Constructed but disabled by default, matching the reference viewer.
    pub vignette: bool,
}

impl Default for EffectToggles {
    fn default() -> Self {
        Self {
            ssgi: true,
            traa: true,
            sharpen: true,
            bloom_lut: true,
            motion_blur: false,
            lens_distortion: false,
            vignette: false,
        }
    }
}

/// Top-level viewer configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub assets: AssetPaths,
    pub camera: CameraConfig,
    pub fit: FitTarget,
    pub effects: EffectToggles,
    pub tone_mapping_exposure: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            assets: AssetPaths::default(),
            camera: CameraConfig::default(),
            fit: FitTarget::default(),
            effects: EffectToggles::default(),
            tone_mapping_exposure: 1.5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Lustre".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

impl ViewerConfig {
    /// Load configuration from a TOML file, merging over the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&text)?;
        if config.tone_mapping_exposure <= 0.0 {
            config.tone_mapping_exposure = Self::default().tone_mapping_exposure;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_constants() {
        let config = ViewerConfig::default();
        assert_eq!(config.camera.fov_degrees, 40.0);
        assert_eq!(config.camera.eye_height, 8.75);
        assert_eq!(config.camera.min_distance, 5.0);
        assert_eq!(config.fit.width, 45.0);
        assert_eq!(config.fit.height, 15.0);
        assert!(config.effects.ssgi);
        assert!(!config.effects.motion_blur);
        assert!(!config.effects.lens_distortion);
        assert!(!config.effects.vignette);
    }

    #[test]
    fn toml_overrides_merge_over_defaults() {
        let text = r#"
            tone_mapping_exposure = 2.0

            [camera]
            distance = 30.0

            [effects]
            motion_blur = true
        "#;
        let config: ViewerConfig = toml::from_str(text).unwrap();
        assert_eq!(config.camera.distance, 30.0);
        assert_eq!(config.camera.fov_degrees, 40.0);
        assert!(config.effects.motion_blur);
        assert!(config.effects.bloom_lut);
        assert_eq!(config.tone_mapping_exposure, 2.0);
    }
}
