//! Compositor and application configuration.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::foundation::{
    core::Dimensions,
    error::{PhotomaskError, PhotomaskResult},
};

/// Tunables for [`crate::Compositor`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositorConfig {
    /// JPEG quality, 1..=100.
    pub quality: u8,
    /// Overlay width as a fraction of canvas width when the asset does not specify one.
    pub default_scale: f64,
    /// Source width assumed when the header cannot be read.
    pub fallback_width: u32,
    /// Source height assumed when the header cannot be read.
    pub fallback_height: u32,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            quality: 95,
            default_scale: 0.8,
            fallback_width: 800,
            fallback_height: 800,
        }
    }
}

impl CompositorConfig {
    /// Check value ranges.
    pub fn validate(&self) -> PhotomaskResult<()> {
        if !(1..=100).contains(&self.quality) {
            return Err(PhotomaskError::config(format!(
                "quality must be within 1..=100, got {}",
                self.quality
            )));
        }
        if !self.default_scale.is_finite() || self.default_scale <= 0.0 {
            return Err(PhotomaskError::config(format!(
                "default_scale must be > 0, got {}",
                self.default_scale
            )));
        }
        if self.fallback_width == 0 || self.fallback_height == 0 {
            return Err(PhotomaskError::config(format!(
                "fallback dimensions must be positive, got {}x{}",
                self.fallback_width, self.fallback_height
            )));
        }
        Ok(())
    }

    /// Fallback source size.
    pub fn fallback_dimensions(&self) -> Dimensions {
        Dimensions::new(self.fallback_width, self.fallback_height)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (e.g. `"info"`, `"photomask=debug,warn"`). `RUST_LOG` wins when set.
    pub level: String,
    /// Emit structured JSON lines instead of human-readable text.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Top-level configuration file for the `photomask` binary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Compositor tunables.
    pub compositor: CompositorConfig,
    /// Directory holding the built-in `masks/1.png`.
    pub assets_dir: Option<PathBuf>,
    /// Optional JSON manifest listing masks; overrides the built-in registry.
    pub mask_manifest: Option<PathBuf>,
    /// Logging setup.
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: &Path) -> PhotomaskResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| PhotomaskError::config(format!("parse '{}': {e}", path.display())))?;
        config.compositor.validate()?;
        Ok(config)
    }

    /// Load `path` if given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> PhotomaskResult<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Directory the built-in mask registry resolves against.
    pub fn assets_dir(&self) -> PathBuf {
        self.assets_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("assets"))
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
