//! The sketchpad controller.
//!
//! Owns the live canvas, the notebook of page snapshots, the active page's
//! history and the drawing settings. All state changes go through its
//! methods, and page navigation, resizing and history restores can be queued
//! so they run strictly one after another.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use sketch_core::{Canvas, Color32, History, Pos2, Snapshot, StrokeRecorder, Vec2};
use tracing::{debug, info, warn};

use crate::config::SketchpadConfig;
use crate::export::{export_canvas, ExportConfig, ExportedPage};
use crate::notebook::Notebook;
use crate::paper::{resolve_dimensions, Paper, PaperSize, Pattern};
use crate::settings::{DrawingSettings, ToolKind};
use crate::SketchError;

/// A UI action that touches pages, history, paper or settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case", deny_unknown_fields)]
pub enum Operation {
    AddPage,
    PreviousPage,
    NextPage,
    GoToPage { index: usize },
    Undo,
    Redo,
    SetPaperSize { size: PaperSize },
    SetPattern { pattern: Pattern },
    WindowResized { width: f32, height: f32 },
    SetTool { tool: ToolKind },
    SetColor { color: String },
    SelectSwatch { index: usize },
    SetDrawWidth { width: f32 },
    SetEraseWidth { width: f32 },
    Export,
}

/// What a completed operation did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The operation ran and changed state.
    Applied,
    /// The operation was a boundary no-op (nothing to undo, no next page, ...).
    Ignored,
    PageChanged { index: usize },
    Resized { width: u32, height: u32 },
    Exported(ExportedPage),
}

impl From<bool> for Outcome {
    fn from(changed: bool) -> Self {
        if changed {
            Outcome::Applied
        } else {
            Outcome::Ignored
        }
    }
}

#[derive(Debug)]
pub struct Sketchpad {
    canvas: Canvas,
    notebook: Notebook,
    history: History<Snapshot>,
    settings: DrawingSettings,
    paper: Paper,
    recorder: StrokeRecorder,
    available: Vec2,
    fit_margin: u32,
    export: ExportConfig,
    queue: VecDeque<Operation>,
}

impl Sketchpad {
    /// A notebook with one blank page, sized per `config.paper`.
    pub fn new(config: &SketchpadConfig) -> Result<Self, SketchError> {
        config.validate()?;

        let available = Vec2::new(config.paper.available_width, config.paper.available_height);
        let paper = Paper::new(
            config.paper.initial_size,
            config.paper.pattern,
            available,
            config.paper.fit_margin,
        )?;
        let (width, height) = paper.dimensions();

        let canvas = Canvas::blank(width, height);
        let blank = Snapshot::encode(&canvas)?;
        let notebook = Notebook::new(blank.clone());
        let mut history = History::new(config.history_capacity);
        history.reset(blank);

        info!(
            notebook_id = %notebook.notebook_id(),
            width,
            height,
            history_capacity = config.history_capacity,
            "sketchpad ready"
        );

        Ok(Self {
            canvas,
            notebook,
            history,
            settings: DrawingSettings::from_config(&config.brush)?,
            paper,
            recorder: StrokeRecorder::new(),
            available,
            fit_margin: config.paper.fit_margin,
            export: config.export.clone(),
            queue: VecDeque::new(),
        })
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn notebook(&self) -> &Notebook {
        &self.notebook
    }

    pub fn history(&self) -> &History<Snapshot> {
        &self.history
    }

    pub fn settings(&self) -> &DrawingSettings {
        &self.settings
    }

    pub fn paper(&self) -> &Paper {
        &self.paper
    }

    pub fn current_page(&self) -> usize {
        self.notebook.current_index()
    }

    pub fn page_count(&self) -> usize {
        self.notebook.page_count()
    }

    pub fn page_indicator(&self) -> String {
        self.notebook.page_indicator()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn is_drawing(&self) -> bool {
        self.recorder.is_active()
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        self.settings.set_tool(tool);
    }

    pub fn set_color(&mut self, color: Color32) {
        self.settings.set_color(color);
    }

    pub fn set_color_hex(&mut self, hex: &str) -> Result<(), SketchError> {
        self.settings.set_color_hex(hex)?;
        Ok(())
    }

    /// Pick a colour from the configured palette.
    pub fn select_swatch(&mut self, index: usize) -> Result<Color32, SketchError> {
        self.settings.select_swatch(index).ok_or_else(|| {
            let count = self.settings.swatches().len();
            warn!(index, count, "swatch does not exist");
            SketchError::SwatchOutOfRange { index, count }
        })
    }

    pub fn set_draw_width(&mut self, width: f32) -> f32 {
        self.settings.set_draw_width(width)
    }

    pub fn set_erase_width(&mut self, width: f32) -> f32 {
        self.settings.set_erase_width(width)
    }

    pub fn set_pattern(&mut self, pattern: Pattern) {
        debug!(pattern = pattern.css_class(), "pattern changed");
        self.paper.set_pattern(pattern);
    }

    /// `pos` is in surface pixels.
    pub fn pointer_down(&mut self, pointer_id: u64, pos: Pos2) -> bool {
        let tool = self.settings.active_tool();
        self.recorder
            .pointer_down(&mut self.canvas, tool.as_ref(), pointer_id, pos)
    }

    pub fn pointer_move(&mut self, pointer_id: u64, pos: Pos2) -> bool {
        self.recorder.pointer_move(&mut self.canvas, pointer_id, pos)
    }

    /// Finish the gesture and record one history entry for it.
    pub fn pointer_up(&mut self, pointer_id: u64) -> Result<bool, SketchError> {
        if !self.recorder.pointer_up(pointer_id) {
            return Ok(false);
        }
        self.record_state()?;
        Ok(true)
    }

    pub fn pointer_cancel(&mut self, pointer_id: u64) -> Result<bool, SketchError> {
        if !self.recorder.pointer_cancel(pointer_id) {
            return Ok(false);
        }
        self.record_state()?;
        Ok(true)
    }

    /// Snapshot the canvas into the active page's history.
    pub fn record_state(&mut self) -> Result<(), SketchError> {
        let snapshot = Snapshot::encode(&self.canvas)?;
        self.history.record(snapshot);
        Ok(())
    }

    /// Drop an in-progress stroke along with its partial pixels, returning
    /// the canvas to the entry under the history cursor.
    fn discard_stroke(&mut self) -> Result<(), SketchError> {
        if !self.recorder.is_active() {
            return Ok(());
        }
        if let Some(current) = self.history.current() {
            let image = current.decode()?;
            self.canvas.restore_from(&image);
        }
        self.recorder.abandon();
        Ok(())
    }

    pub fn undo(&mut self) -> Result<bool, SketchError> {
        self.discard_stroke()?;
        let canvas = &mut self.canvas;
        let undone = self.history.undo(|snapshot| restore(canvas, snapshot))?;
        Ok(undone)
    }

    pub fn redo(&mut self) -> Result<bool, SketchError> {
        self.discard_stroke()?;
        let canvas = &mut self.canvas;
        let redone = self.history.redo(|snapshot| restore(canvas, snapshot))?;
        Ok(redone)
    }

    fn reset_history(&mut self) -> Result<(), SketchError> {
        let baseline = Snapshot::encode(&self.canvas)?;
        self.history.reset(baseline);
        Ok(())
    }

    /// Store the live canvas as the current page's snapshot.
    pub fn save_page_snapshot(&mut self) -> Result<(), SketchError> {
        let snapshot = Snapshot::encode(&self.canvas)?;
        self.notebook.save_current(snapshot);
        Ok(())
    }

    /// Append a blank page of the current surface size and switch to it.
    pub fn add_page(&mut self) -> Result<usize, SketchError> {
        self.discard_stroke()?;
        self.save_page_snapshot()?;

        self.canvas.clear();
        let blank = Snapshot::encode(&self.canvas)?;
        let index = self.notebook.push_page(blank);
        self.reset_history()?;

        info!(page = index + 1, total = self.page_count(), "added page");
        Ok(index)
    }

    pub fn previous_page(&mut self) -> Result<bool, SketchError> {
        if !self.notebook.has_previous() {
            return Ok(false);
        }
        self.switch_to(self.current_page() - 1)?;
        Ok(true)
    }

    pub fn next_page(&mut self) -> Result<bool, SketchError> {
        if !self.notebook.has_next() {
            return Ok(false);
        }
        self.switch_to(self.current_page() + 1)?;
        Ok(true)
    }

    /// Jump to an arbitrary page. Unlike previous/next, a missing page is an
    /// error, since the caller asked for it by number.
    pub fn go_to_page(&mut self, index: usize) -> Result<bool, SketchError> {
        if index >= self.page_count() {
            warn!(index, count = self.page_count(), "page does not exist");
            return Err(SketchError::PageOutOfRange {
                index,
                count: self.page_count(),
            });
        }
        if index == self.current_page() {
            return Ok(false);
        }
        self.switch_to(index)?;
        Ok(true)
    }

    fn switch_to(&mut self, index: usize) -> Result<(), SketchError> {
        self.discard_stroke()?;
        self.save_page_snapshot()?;
        self.load_page(index)?;
        info!(page = index + 1, total = self.page_count(), "switched page");
        Ok(())
    }

    /// Decode page `index` onto the canvas and start a fresh history for it.
    ///
    /// The history baseline is taken only after the decoded image is on the
    /// canvas. If decoding fails, the canvas, current page and history are
    /// left as they were.
    pub fn load_page(&mut self, index: usize) -> Result<(), SketchError> {
        let count = self.page_count();
        let snapshot = self
            .notebook
            .page(index)
            .ok_or(SketchError::PageOutOfRange { index, count })?;
        let image = snapshot.decode()?;

        self.notebook.set_current(index);
        self.canvas.restore_from(&image);
        self.reset_history()?;
        Ok(())
    }

    /// Change the paper size, keeping existing content at the origin clipped
    /// to the new bounds. The resize is recorded as one history entry; undo
    /// restores pixels but not the old dimensions.
    pub fn set_paper_size(&mut self, size: PaperSize) -> Result<(u32, u32), SketchError> {
        let (width, height) = resolve_dimensions(size, self.available, self.fit_margin)?;

        self.discard_stroke()?;
        self.save_page_snapshot()?;

        self.canvas = self.canvas.resized(width, height);
        self.paper = self.paper.with_size(size, width, height);

        self.record_state()?;
        self.save_page_snapshot()?;

        info!(size = size.label(), width, height, "paper resized");
        Ok((width, height))
    }

    /// Host window changed size. Only a `Fit` page follows it.
    /// A rejected size leaves the page and the remembered window area as
    /// they were.
    pub fn window_resized(&mut self, available: Vec2) -> Result<Option<(u32, u32)>, SketchError> {
        if self.paper.size().is_fixed() {
            self.available = available;
            return Ok(None);
        }
        let dimensions = resolve_dimensions(PaperSize::Fit, available, self.fit_margin)?;
        self.available = available;
        if dimensions == self.paper.dimensions() {
            return Ok(None);
        }
        self.set_paper_size(PaperSize::Fit).map(Some)
    }

    /// Export the live canvas of the current page.
    pub fn export_current(&self) -> Result<ExportedPage, SketchError> {
        Ok(export_canvas(&self.canvas, self.current_page(), &self.export)?)
    }

    pub fn enqueue(&mut self, op: Operation) {
        debug!(?op, pending = self.queue.len(), "queued operation");
        self.queue.push_back(op);
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Run every queued operation in order, each to completion before the
    /// next starts. A failing operation is reported and the rest still run.
    pub fn run_pending(&mut self) -> Vec<Result<Outcome, SketchError>> {
        let mut results = Vec::with_capacity(self.queue.len());
        while let Some(op) = self.queue.pop_front() {
            let result = self.apply(op);
            if let Err(err) = &result {
                warn!(%err, "operation failed");
            }
            results.push(result);
        }
        results
    }

    /// Run one operation immediately.
    pub fn apply(&mut self, op: Operation) -> Result<Outcome, SketchError> {
        match op {
            Operation::AddPage => {
                let index = self.add_page()?;
                Ok(Outcome::PageChanged { index })
            }
            Operation::PreviousPage => self.page_outcome(Self::previous_page),
            Operation::NextPage => self.page_outcome(Self::next_page),
            Operation::GoToPage { index } => {
                self.page_outcome(|pad: &mut Self| pad.go_to_page(index))
            }
            Operation::Undo => Ok(self.undo()?.into()),
            Operation::Redo => Ok(self.redo()?.into()),
            Operation::SetPaperSize { size } => {
                let (width, height) = self.set_paper_size(size)?;
                Ok(Outcome::Resized { width, height })
            }
            Operation::SetPattern { pattern } => {
                self.set_pattern(pattern);
                Ok(Outcome::Applied)
            }
            Operation::WindowResized { width, height } => {
                match self.window_resized(Vec2::new(width, height))? {
                    Some((width, height)) => Ok(Outcome::Resized { width, height }),
                    None => Ok(Outcome::Ignored),
                }
            }
            Operation::SetTool { tool } => {
                self.set_tool(tool);
                Ok(Outcome::Applied)
            }
            Operation::SetColor { color } => {
                self.set_color_hex(&color)?;
                Ok(Outcome::Applied)
            }
            Operation::SelectSwatch { index } => {
                self.select_swatch(index)?;
                Ok(Outcome::Applied)
            }
            Operation::SetDrawWidth { width } => {
                self.set_draw_width(width);
                Ok(Outcome::Applied)
            }
            Operation::SetEraseWidth { width } => {
                self.set_erase_width(width);
                Ok(Outcome::Applied)
            }
            Operation::Export => Ok(Outcome::Exported(self.export_current()?)),
        }
    }

    fn page_outcome(
        &mut self,
        navigate: impl FnOnce(&mut Self) -> Result<bool, SketchError>,
    ) -> Result<Outcome, SketchError> {
        if navigate(self)? {
            Ok(Outcome::PageChanged {
                index: self.current_page(),
            })
        } else {
            Ok(Outcome::Ignored)
        }
    }
}

// Decode first so a bad snapshot leaves the canvas untouched.
fn restore(canvas: &mut Canvas, snapshot: &Snapshot) -> Result<(), SketchError> {
    let image = snapshot.decode()?;
    canvas.restore_from(&image);
    Ok(())
}
