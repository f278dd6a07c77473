//! Page export.
//!
//! Exports are PNGs flattened onto an opaque background, unlike snapshots
//! which keep erased regions transparent. Files are named by 1-based page
//! number.

use serde::{Deserialize, Serialize};
use sketch_core::snapshot::encode_png;
use sketch_core::{Canvas, Color32, SnapshotError};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::settings::parse_hex_color;

/// Export file naming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    pub prefix: String,
    pub separator: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            prefix: "sketch-page".into(),
            separator: "-".into(),
        }
    }
}

impl NamingConfig {
    /// File name for the page at zero-based `page_index`.
    pub fn generate_filename(&self, page_index: usize) -> String {
        let number = page_index + 1;
        if self.prefix.is_empty() {
            format!("{}.png", number)
        } else {
            format!("{}{}{}.png", self.prefix, self.separator, number)
        }
    }

    /// Validate naming configuration (checks for invalid filename characters).
    pub fn validate(&self) -> Result<(), ExportError> {
        let invalid_chars = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];
        for ch in invalid_chars {
            if self.prefix.contains(ch) || self.separator.contains(ch) {
                tracing::error!(
                    prefix = %self.prefix,
                    separator = %self.separator,
                    invalid_char = %ch,
                    "export name contains invalid filename character"
                );
                return Err(ExportError::InvalidNaming {
                    reason: format!("contains invalid character '{}'", ch),
                });
            }
        }

        if self.separator.len() > 5 {
            tracing::warn!(
                separator = %self.separator,
                "unusually long separator (recommended: 1-2 chars)"
            );
        }

        Ok(())
    }
}

/// Export pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Colour transparent regions are flattened onto. Must be opaque.
    pub background: String,
    pub naming: NamingConfig,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            background: "#ffffff".into(),
            naming: NamingConfig::default(),
        }
    }
}

impl ExportConfig {
    pub fn background_color(&self) -> Result<Color32, ExportError> {
        let color =
            parse_hex_color(&self.background).map_err(|_| ExportError::InvalidBackground {
                value: self.background.clone(),
            })?;
        if color.a() != 255 {
            return Err(ExportError::TranslucentBackground {
                value: self.background.clone(),
            });
        }
        Ok(color)
    }

    pub fn validate(&self) -> Result<(), ExportError> {
        self.background_color()?;
        self.naming.validate()?;
        Ok(())
    }
}

/// One exported page, ready to be written out.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedPage {
    /// 1-based.
    pub page_number: usize,
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

impl ExportedPage {
    pub fn output_path(&self, base_dir: impl AsRef<Path>) -> PathBuf {
        base_dir.as_ref().join(&self.file_name)
    }
}

/// Flatten `canvas` onto the configured background and encode it.
pub fn export_canvas(
    canvas: &Canvas,
    page_index: usize,
    config: &ExportConfig,
) -> Result<ExportedPage, ExportError> {
    let background = config.background_color()?;
    let flat = canvas.flattened_onto(background);
    let png = encode_png(&flat)?;
    let file_name = config.naming.generate_filename(page_index);

    tracing::info!(
        file_name = %file_name,
        width = flat.width(),
        height = flat.height(),
        bytes = png.len(),
        "exported page"
    );

    Ok(ExportedPage {
        page_number: page_index + 1,
        file_name,
        width: flat.width(),
        height: flat.height(),
        png,
    })
}

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("invalid naming configuration: {reason}")]
    InvalidNaming { reason: String },

    #[error("invalid export background colour: {value:?}")]
    InvalidBackground { value: String },

    #[error("export background must be opaque, got {value:?}")]
    TranslucentBackground { value: String },

    #[error("failed to encode export: {0}")]
    Encode(#[from] SnapshotError),
}
