//! sketch-notebook: multi-page notebook, drawing settings, paper and export
//! on top of `sketch-core`.
//!
//! Design rules:
//! - Pages are only ever appended; the current index is always valid.
//! - Each page change starts a fresh history with exactly one baseline entry.
//! - Page, resize and history operations run one at a time, to completion.
//! - Exports are opaque; snapshots keep transparency.

use thiserror::Error;

pub mod config;
pub mod export;
pub mod notebook;
pub mod paper;
pub mod settings;
pub mod sketchpad;

pub use config::{
    load_config, save_config, BrushConfig, ConfigError, PaperConfig, SketchpadConfig,
    CONFIG_FILE_EXT,
};
pub use export::{export_canvas, ExportConfig, ExportError, ExportedPage, NamingConfig};
pub use notebook::Notebook;
pub use paper::{resolve_dimensions, Paper, PaperError, PaperSize, Pattern, MAX_SURFACE_SIDE};
pub use settings::{parse_hex_color, width_label, DrawingSettings, ToolKind};
pub use sketchpad::{Operation, Outcome, Sketchpad};

/// Errors surfaced by sketchpad operations. None of them are fatal; the
/// canvas keeps its last good state.
#[derive(Debug, Error)]
pub enum SketchError {
    #[error(transparent)]
    Snapshot(#[from] sketch_core::SnapshotError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Paper(#[from] PaperError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("page {index} does not exist (notebook has {count} pages)")]
    PageOutOfRange { index: usize, count: usize },

    #[error("swatch {index} does not exist (palette has {count} colours)")]
    SwatchOutOfRange { index: usize, count: usize },
}
