//! Optimizer configuration.
//!
//! The library never reads configuration on its own. Hosts either use
//! [`OptimizerConfig::default`] or load a sparse TOML file over the stock
//! defaults with [`load_config`] / [`OptimizerConfig::from_toml_str`].
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [canvas]
//! background = [255, 255, 255, 0]  # RGBA fill used when a crop needs padding
//!
//! [resize]
//! filter = "auto"                  # auto | nearest | triangle | catmull-rom | gaussian | lanczos3
//!
//! [attention]
//! analysis_size = 256              # Longest edge of the interest map
//!
//! [fetch]
//! # timeout_secs = 30              # Omit for no timeout
//! user_agent = "image-optimizer/<version>"
//!
//! [limits]
//! max_pixels = 100000000           # Largest raster any resize or canvas may allocate
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::ResampleFilter;
use crate::types::Rgba;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Smallest interest map the attention crop will analyse.
pub const MIN_ANALYSIS_SIZE: u32 = 16;

/// Default ceiling on the pixel count of any raster the backend allocates.
pub const DEFAULT_MAX_PIXELS: u64 = 100_000_000;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptimizerConfig {
    /// Canvas expansion settings.
    pub canvas: CanvasConfig,
    /// Resampling settings shared by every resize.
    pub resize: ResizeConfig,
    /// Attention crop tuning.
    pub attention: AttentionConfig,
    /// Remote source retrieval.
    pub fetch: FetchConfig,
    /// Allocation ceilings.
    pub limits: LimitsConfig,
}

impl OptimizerConfig {
    /// Parse a sparse TOML document over the stock defaults, then validate.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: OptimizerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.attention.analysis_size < MIN_ANALYSIS_SIZE {
            return Err(ConfigError::Validation(format!(
                "attention.analysis_size must be at least {MIN_ANALYSIS_SIZE}"
            )));
        }
        if self.fetch.timeout_secs == Some(0) {
            return Err(ConfigError::Validation(
                "fetch.timeout_secs must be greater than zero (omit it to disable)".into(),
            ));
        }
        if self.limits.max_pixels == 0 {
            return Err(ConfigError::Validation(
                "limits.max_pixels must be greater than zero".into(),
            ));
        }
        if self.fetch.user_agent.trim().is_empty() {
            return Err(ConfigError::Validation(
                "fetch.user_agent must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanvasConfig {
    /// Fill color for pixels added around the source before a crop.
    pub background: Rgba,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeConfig {
    pub filter: ResampleFilter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AttentionConfig {
    /// The source is downsampled so its longer edge is at most this many
    /// pixels before scoring crop windows.
    pub analysis_size: u32,
}

impl Default for AttentionConfig {
    fn default() -> Self {
        Self { analysis_size: 256 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    /// Whole-request timeout. `None` leaves requests unbounded.
    pub timeout_secs: Option<u64>,
    pub user_agent: String,
}

impl FetchConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            user_agent: concat!("image-optimizer/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsConfig {
    /// Resizes and canvas expansions whose output would hold more pixels
    /// than this fail instead of allocating.
    pub max_pixels: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_pixels: DEFAULT_MAX_PIXELS,
        }
    }
}

/// Load config from a TOML file, merging its values over stock defaults.
pub fn load_config(path: &Path) -> Result<OptimizerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    OptimizerConfig::from_toml_str(&content)
}
