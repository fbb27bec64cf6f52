// SPDX-License-Identifier: MIT OR Apache-2.0
//! Flowchart display settings, stored as RON.

use crate::geometry::{GeometryParams, DEFAULT_LINE_MARGIN, DEFAULT_MIN_STUB_LENGTH};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default spacing between two reciprocal arrows
pub const DEFAULT_INTERCONNECTION_SPACING: f32 = 10.0;

/// Default arrow head size
pub const DEFAULT_ARROW_SIZE: f32 = 8.0;

/// Flowchart display settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowchartConfig {
    /// Offset applied to both edges of a reciprocal pair
    pub interconnection_spacing: f32,
    /// Extension at both ends of every drawn line
    pub line_margin: f32,
    /// Length of the stub drawn for fully overlapped nodes
    pub min_stub_length: f32,
    /// Arrow head size in canvas units
    pub arrow_size: f32,
}

impl Default for FlowchartConfig {
    fn default() -> Self {
        Self {
            interconnection_spacing: DEFAULT_INTERCONNECTION_SPACING,
            line_margin: DEFAULT_LINE_MARGIN,
            min_stub_length: DEFAULT_MIN_STUB_LENGTH,
            arrow_size: DEFAULT_ARROW_SIZE,
        }
    }
}

impl FlowchartConfig {
    /// Geometry tunables derived from these settings
    pub fn geometry(&self) -> GeometryParams {
        GeometryParams {
            margin: self.line_margin,
            min_stub_length: self.min_stub_length,
        }
    }

    /// Builder-style spacing override
    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.interconnection_spacing = spacing;
        self
    }

    /// Check that every value is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("interconnection_spacing", self.interconnection_spacing),
            ("line_margin", self.line_margin),
            ("arrow_size", self.arrow_size),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be non-negative, got {value}")));
            }
        }
        if !(self.min_stub_length.is_finite() && self.min_stub_length > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "min_stub_length must be positive, got {}",
                self.min_stub_length
            )));
        }
        Ok(())
    }

    /// Parse and validate settings from RON text
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty RON
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        let pretty = ron::ser::PrettyConfig::default().struct_names(true);
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_ron(&content)?;
        tracing::info!("Loaded flowchart settings from {:?}", path);
        Ok(config)
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_ron()?)?;
        Ok(())
    }
}

/// Error loading or saving settings
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// RON syntax or shape error
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// RON serialization error
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),

    /// A value is out of range
    #[error("Invalid setting: {0}")]
    Invalid(String),
}
