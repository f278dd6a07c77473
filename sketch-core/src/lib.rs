//! sketch-core: raster surface, stroke tools, bounded undo history and the
//! PNG snapshot codec used by the sketchpad.
//!
//! Design rules:
//! - The canvas is the only pixel store; everything else holds encoded snapshots.
//! - History is linear and bounded; recording after an undo drops the redo branch.
//! - A failed decode never touches the canvas.

pub mod editor;
pub mod snapshot;

pub use editor::{
    Brush, Canvas, Composite, Eraser, History, StrokeRecorder, StrokeStyle, Tool,
    DEFAULT_MAX_STATES,
};
pub use snapshot::{Snapshot, SnapshotError, PNG_DATA_URL_PREFIX};

/// Re-exported so downstream crates name colours and positions with the same types.
pub use egui::{pos2, vec2, Color32, Pos2, Vec2};
