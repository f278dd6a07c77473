//! Session scripts: recorded pointer events and UI actions replayed against a
//! [`Sketchpad`].
//!
//! ```json
//! {
//!   "viewport": { "x": 40, "y": 40 },
//!   "actions": [
//!     { "pointer": "down", "id": 1, "x": 60, "y": 60 },
//!     { "pointer": "move", "id": 1, "x": 120, "y": 80 },
//!     { "pointer": "up", "id": 1 },
//!     { "op": "add_page" },
//!     { "op": "export" }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use sketch_core::pos2;
use sketch_notebook::{ExportedPage, Operation, Outcome, SketchError, Sketchpad};
use tracing::{debug, warn};

use crate::input::Viewport;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    #[serde(default)]
    pub viewport: Viewport,
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Action {
    Pointer(PointerEvent),
    Op(Operation),
}

/// Pointer events in device coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "pointer", rename_all = "snake_case", deny_unknown_fields)]
pub enum PointerEvent {
    Down { id: u64, x: f32, y: f32 },
    Move { id: u64, x: f32, y: f32 },
    Up { id: u64 },
    Cancel { id: u64 },
}

pub fn load_script(path: impl AsRef<Path>) -> anyhow::Result<Script> {
    let path = path.as_ref();
    let data = fs::read_to_string(path)
        .with_context(|| format!("read script: {}", path.display()))?;
    let script: Script = serde_json::from_str(&data)
        .with_context(|| format!("parse script json: {}", path.display()))?;
    Ok(script)
}

/// Tally of a replay.
#[derive(Debug, Default)]
pub struct ReplayReport {
    pub strokes: usize,
    pub applied: usize,
    pub ignored: usize,
    pub failed: usize,
    pub exports: Vec<ExportedPage>,
}

impl ReplayReport {
    fn absorb(&mut self, results: Vec<Result<Outcome, SketchError>>) {
        for result in results {
            match result {
                Ok(Outcome::Ignored) => self.ignored += 1,
                Ok(Outcome::Exported(page)) => {
                    self.applied += 1;
                    self.exports.push(page);
                }
                Ok(_) => self.applied += 1,
                Err(_) => self.failed += 1,
            }
        }
    }

    fn stroke_committed(&mut self, committed: Result<bool, SketchError>) {
        match committed {
            Ok(true) => self.strokes += 1,
            Ok(false) => {}
            Err(err) => {
                warn!(%err, "failed to commit stroke");
                self.failed += 1;
            }
        }
    }
}

/// Replay `script` in order. UI actions are queued and flushed before the
/// next pointer event so a stroke never overlaps a page change or restore.
pub fn replay(pad: &mut Sketchpad, script: &Script) -> ReplayReport {
    let mut report = ReplayReport::default();
    let viewport = script.viewport;

    for action in &script.actions {
        match action {
            Action::Op(op) => pad.enqueue(op.clone()),
            Action::Pointer(event) => {
                report.absorb(pad.run_pending());
                let surface = (pad.canvas().width(), pad.canvas().height());
                match *event {
                    PointerEvent::Down { id, x, y } => {
                        let at = viewport.to_surface(pos2(x, y), surface);
                        if !pad.pointer_down(id, at) {
                            debug!(pointer_id = id, ?at, "pointer down ignored");
                        }
                    }
                    PointerEvent::Move { id, x, y } => {
                        pad.pointer_move(id, viewport.to_surface(pos2(x, y), surface));
                    }
                    PointerEvent::Up { id } => report.stroke_committed(pad.pointer_up(id)),
                    PointerEvent::Cancel { id } => {
                        report.stroke_committed(pad.pointer_cancel(id))
                    }
                }
            }
        }
    }
    report.absorb(pad.run_pending());
    report
}
