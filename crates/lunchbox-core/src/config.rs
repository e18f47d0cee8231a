//! Canvas configuration.
//!
//! Layout constants and interaction thresholds are collected here and passed
//! into the components that need them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while reading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Parse(String),
    #[error("Invalid scale range: min {min} must be positive and not above max {max}")]
    ScaleRange { min: f64, max: f64 },
}

/// Configuration shared by the layout engine and the interaction layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Vertical distance kept between groups sharing a column.
    pub group_spacing: f64,
    /// Groups cannot be resized narrower than this.
    pub min_group_width: f64,
    /// Spacing between consecutive blocks inside a group.
    pub block_spacing: f64,
    /// Margin added at the top and bottom of multi-block groups.
    pub side_margins: f64,
    /// Floor for computed group heights.
    pub min_group_height: f64,
    /// Default height of a freshly created spacer block.
    pub spacer_height: f64,
    /// Edge length of a resize handle.
    pub handle_size: f64,
    /// Maximum screen distance from a handle that still counts as a hit.
    pub handle_hit_threshold: f64,
    /// Edge length of the square searched for drop targets while dragging.
    pub drop_target_size: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    /// Number of undo entries retained.
    pub max_undo_history: usize,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            group_spacing: 32.0,
            min_group_width: 274.0,
            block_spacing: 8.0,
            side_margins: 10.0,
            min_group_height: 69.0,
            spacer_height: 20.0,
            handle_size: 10.0,
            handle_hit_threshold: 22.0,
            drop_target_size: 44.0,
            min_scale: 1.0 / 8.0,
            max_scale: 1.0,
            max_undo_history: 50,
        }
    }
}

impl CanvasConfig {
    /// Create a configuration with the default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Check that the zoom range is usable. Configurations built in code skip
    /// this unless the caller runs it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = self.min_scale.is_finite() && self.max_scale.is_finite();
        if !finite || self.min_scale <= 0.0 || self.min_scale > self.max_scale {
            return Err(ConfigError::ScaleRange {
                min: self.min_scale,
                max: self.max_scale,
            });
        }
        Ok(())
    }
}
