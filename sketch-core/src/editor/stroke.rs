// Turns a pointer down/move/up sequence into strokes on the canvas.

use crate::editor::canvas::Canvas;
use crate::editor::tools::{StrokeStyle, Tool};
use egui::Pos2;
use tracing::{debug, trace};

#[derive(Debug, Clone)]
struct ActiveStroke {
    pointer_id: u64,
    style: StrokeStyle,
    last: Pos2,
    segments: usize,
}

/// Tracks at most one in-progress gesture. The style is captured at pointer
/// down, so changing settings mid-stroke does not affect the stroke.
#[derive(Debug, Clone, Default)]
pub struct StrokeRecorder {
    active: Option<ActiveStroke>,
}

impl StrokeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Starts a stroke if `pos` lies on the canvas and no other stroke is in
    /// progress. Returns whether a stroke was started.
    pub fn pointer_down(
        &mut self,
        canvas: &mut Canvas,
        tool: &dyn Tool,
        pointer_id: u64,
        pos: Pos2,
    ) -> bool {
        if let Some(active) = &self.active {
            trace!(
                pointer_id,
                active = active.pointer_id,
                "Ignoring pointer down during active stroke"
            );
            return false;
        }

        let inside = pos.x >= 0.0
            && pos.y >= 0.0
            && pos.x < canvas.width() as f32
            && pos.y < canvas.height() as f32;
        if !inside {
            trace!("Pointer down at {:?} is outside the canvas", pos);
            return false;
        }

        tool.apply(canvas, pos);
        let style = tool.style();
        self.active = Some(ActiveStroke {
            pointer_id,
            style,
            last: pos,
            segments: 0,
        });
        debug!(
            pointer_id,
            tool = tool.name(),
            cursor_size = tool.cursor_size(),
            "Stroke started"
        );
        true
    }

    /// Extends the active stroke. Moves from other pointers, or with no stroke
    /// in progress, are ignored.
    pub fn pointer_move(&mut self, canvas: &mut Canvas, pointer_id: u64, pos: Pos2) -> bool {
        match &mut self.active {
            Some(active) if active.pointer_id == pointer_id => {
                active.style.stamp_segment(canvas, active.last, pos);
                active.last = pos;
                active.segments += 1;
                true
            }
            _ => false,
        }
    }

    /// Ends the active stroke. Returns true when a stroke was finished and
    /// should be committed to history.
    pub fn pointer_up(&mut self, pointer_id: u64) -> bool {
        let owns_stroke = matches!(&self.active, Some(active) if active.pointer_id == pointer_id);
        if !owns_stroke {
            return false;
        }
        if let Some(active) = self.active.take() {
            debug!(pointer_id, segments = active.segments, "Stroke finished");
        }
        true
    }

    /// Cancel finishes the stroke the same way as pointer up; the pixels
    /// already drawn stay on the canvas.
    pub fn pointer_cancel(&mut self, pointer_id: u64) -> bool {
        self.pointer_up(pointer_id)
    }

    /// Drop any in-progress stroke without committing, e.g. when the surface
    /// is replaced underneath it.
    pub fn abandon(&mut self) {
        if self.active.take().is_some() {
            debug!("Abandoned in-progress stroke");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::tools::Brush;
    use egui::{pos2, Color32};

    fn pen() -> Brush {
        Brush::new(1.0, Color32::RED)
    }

    #[test]
    fn test_gesture_commits_once_on_up() {
        let mut canvas = Canvas::blank(10, 10);
        let mut recorder = StrokeRecorder::new();

        assert!(recorder.pointer_down(&mut canvas, &pen(), 1, pos2(1.5, 1.5)));
        assert!(recorder.pointer_move(&mut canvas, 1, pos2(5.5, 1.5)));
        assert!(recorder.pointer_move(&mut canvas, 1, pos2(5.5, 5.5)));
        assert!(recorder.pointer_up(1));
        assert!(!recorder.pointer_up(1));

        assert_eq!(canvas.get_pixel(3, 1), Some(Color32::RED));
        assert_eq!(canvas.get_pixel(5, 3), Some(Color32::RED));
    }

    #[test]
    fn test_press_outside_canvas_starts_nothing() {
        let mut canvas = Canvas::blank(10, 10);
        let mut recorder = StrokeRecorder::new();

        assert!(!recorder.pointer_down(&mut canvas, &pen(), 1, pos2(12.0, 3.0)));
        assert!(!recorder.pointer_move(&mut canvas, 1, pos2(5.0, 5.0)));
        assert!(!recorder.pointer_up(1));
        assert!(canvas.is_blank());
    }

    #[test]
    fn test_second_pointer_is_ignored() {
        let mut canvas = Canvas::blank(10, 10);
        let mut recorder = StrokeRecorder::new();

        assert!(recorder.pointer_down(&mut canvas, &pen(), 1, pos2(1.5, 1.5)));
        assert!(!recorder.pointer_down(&mut canvas, &pen(), 2, pos2(8.5, 8.5)));
        assert!(!recorder.pointer_move(&mut canvas, 2, pos2(8.5, 2.5)));
        assert!(!recorder.pointer_up(2));
        assert_eq!(canvas.get_pixel(8, 8), Some(Color32::TRANSPARENT));
        assert!(recorder.pointer_cancel(1));
        assert!(!recorder.is_active());
    }
}
