//! Sketchpad configuration.
//!
//! Every field has a default, so a config file only needs to mention what it
//! changes. Colours are `#rrggbb` strings.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::export::{ExportConfig, ExportError};
use crate::paper::{resolve_dimensions, PaperError, PaperSize, Pattern};
use crate::settings::{
    parse_hex_color, DEFAULT_COLOR_HEX, DEFAULT_DRAW_WIDTH, DEFAULT_ERASE_WIDTH, MAX_WIDTH,
    MIN_WIDTH,
};
use sketch_core::{vec2, DEFAULT_MAX_STATES};

/// File extension recommended for config files.
pub const CONFIG_FILE_EXT: &str = "sketchpad.json";

/// Stroke widths and colours offered by the tool panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushConfig {
    pub draw_width: f32,
    pub erase_width: f32,
    pub min_width: f32,
    pub max_width: f32,
    pub default_color: String,
    pub swatches: Vec<String>,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            draw_width: DEFAULT_DRAW_WIDTH,
            erase_width: DEFAULT_ERASE_WIDTH,
            min_width: MIN_WIDTH,
            max_width: MAX_WIDTH,
            default_color: DEFAULT_COLOR_HEX.into(),
            swatches: vec![
                "#000000".into(), // Black
                "#e03131".into(), // Red
                "#2f9e44".into(), // Green
                "#1971c2".into(), // Blue
                "#f08c00".into(), // Orange
                "#9c36b5".into(), // Purple
            ],
        }
    }
}

impl BrushConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_width.is_finite() && self.max_width.is_finite())
            || self.min_width <= 0.0
            || self.min_width > self.max_width
        {
            tracing::error!(
                min_width = self.min_width,
                max_width = self.max_width,
                "invalid width bounds"
            );
            return Err(ConfigError::InvalidWidthBounds {
                min: self.min_width,
                max: self.max_width,
            });
        }

        let widths = [
            ("draw_width", self.draw_width),
            ("erase_width", self.erase_width),
        ];
        for (field, value) in widths {
            if !(self.min_width..=self.max_width).contains(&value) {
                tracing::error!(field, value, "default width outside bounds");
                return Err(ConfigError::WidthOutOfBounds {
                    field: field.to_string(),
                    value,
                    min: self.min_width,
                    max: self.max_width,
                });
            }
        }

        parse_hex_color(&self.default_color)?;
        for swatch in &self.swatches {
            parse_hex_color(swatch)?;
        }

        Ok(())
    }
}

/// Paper the sketchpad opens with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaperConfig {
    pub initial_size: PaperSize,
    pub pattern: Pattern,
    /// Pixels kept free around a `fit` page.
    pub fit_margin: u32,
    /// Area available to the page before the host reports a real window size.
    pub available_width: f32,
    pub available_height: f32,
}

impl Default for PaperConfig {
    fn default() -> Self {
        Self {
            initial_size: PaperSize::Fit,
            pattern: Pattern::Blank,
            fit_margin: 40,
            available_width: 1024.0,
            available_height: 768.0,
        }
    }
}

impl PaperConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        resolve_dimensions(
            self.initial_size,
            vec2(self.available_width, self.available_height),
            self.fit_margin,
        )?;
        Ok(())
    }
}

/// Complete sketchpad configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchpadConfig {
    /// Snapshots kept per page, baseline included.
    pub history_capacity: usize,
    pub brush: BrushConfig,
    pub paper: PaperConfig,
    pub export: ExportConfig,
}

impl Default for SketchpadConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_MAX_STATES,
            brush: BrushConfig::default(),
            paper: PaperConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl SketchpadConfig {
    /// Validate the entire configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        tracing::debug!("validating sketchpad configuration");

        if self.history_capacity == 0 {
            tracing::error!("history capacity must be at least one");
            return Err(ConfigError::ZeroHistoryCapacity);
        }

        self.brush.validate()?;
        self.paper.validate()?;
        self.export.validate()?;
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("history capacity must be at least 1")]
    ZeroHistoryCapacity,

    #[error("invalid width bounds: min={min} max={max}")]
    InvalidWidthBounds { min: f32, max: f32 },

    #[error("{field} = {value} is outside [{min}, {max}]")]
    WidthOutOfBounds {
        field: String,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("invalid colour: {value:?}")]
    InvalidColor { value: String },

    #[error(transparent)]
    Paper(#[from] PaperError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Save a config to disk as pretty JSON.
pub fn save_config(path: impl AsRef<Path>, config: &SketchpadConfig) -> anyhow::Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create parent dir: {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(config).context("serialize config to json")?;
    fs::write(path, json).with_context(|| format!("write config file: {}", path.display()))?;
    Ok(())
}

/// Load and validate a config from disk.
pub fn load_config(path: impl AsRef<Path>) -> anyhow::Result<SketchpadConfig> {
    let path = path.as_ref();
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config file: {}", path.display()))?;
    let config: SketchpadConfig = serde_json::from_str(&data).context("parse config json")?;
    config
        .validate()
        .with_context(|| format!("validate config file: {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SketchpadConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = SketchpadConfig {
            history_capacity: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroHistoryCapacity)
        ));
    }

    #[test]
    fn test_width_outside_bounds_rejected() {
        let brush = BrushConfig {
            erase_width: 80.0,
            ..Default::default()
        };
        assert!(matches!(
            brush.validate(),
            Err(ConfigError::WidthOutOfBounds { .. })
        ));

        let inverted = BrushConfig {
            min_width: 10.0,
            max_width: 2.0,
            ..Default::default()
        };
        assert!(matches!(
            inverted.validate(),
            Err(ConfigError::InvalidWidthBounds { .. })
        ));
    }

    #[test]
    fn test_bad_swatch_rejected() {
        let brush = BrushConfig {
            swatches: vec!["#000000".into(), "teal".into()],
            ..Default::default()
        };
        assert!(matches!(
            brush.validate(),
            Err(ConfigError::InvalidColor { .. })
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SketchpadConfig =
            serde_json::from_str(r#"{ "history_capacity": 5, "paper": { "initial_size": "a4" } }"#)
                .unwrap();
        assert_eq!(config.history_capacity, 5);
        assert_eq!(config.paper.initial_size, PaperSize::A4);
        assert_eq!(config.paper.fit_margin, 40);
        assert_eq!(config.brush, BrushConfig::default());
    }

    #[test]
    fn test_fit_paper_without_room_rejected() {
        let paper = PaperConfig {
            available_width: 30.0,
            available_height: 30.0,
            ..Default::default()
        };
        assert!(matches!(paper.validate(), Err(ConfigError::Paper(_))));
    }

    #[test]
    fn test_oversized_fit_paper_rejected() {
        let paper = PaperConfig {
            available_width: 1e9,
            available_height: 600.0,
            ..Default::default()
        };
        assert!(matches!(
            paper.validate(),
            Err(ConfigError::Paper(PaperError::TooLarge { .. }))
        ));
    }
}
