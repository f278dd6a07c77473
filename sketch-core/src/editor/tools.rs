// Drawing tools for the canvas editor.

use crate::editor::canvas::{Canvas, Composite};
use egui::{Color32, Pos2};
use tracing::{debug, trace};

/// Everything a stroke needs to rasterize itself: compositing mode, colour
/// and width in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub composite: Composite,
    pub color: Color32,
    pub width: f32,
}

impl StrokeStyle {
    /// Round-capped segment from `from` to `to`. A zero-length segment is a dot.
    pub fn stamp_segment(&self, canvas: &mut Canvas, from: Pos2, to: Pos2) -> usize {
        // Always cover at least the pixel under the pointer.
        let radius = (self.width / 2.0).max(0.5);

        let min_x = (from.x.min(to.x) - radius).floor().max(0.0);
        let min_y = (from.y.min(to.y) - radius).floor().max(0.0);
        let max_x = (from.x.max(to.x) + radius).ceil().min(canvas.width() as f32);
        let max_y = (from.y.max(to.y) + radius).ceil().min(canvas.height() as f32);
        if min_x >= max_x || min_y >= max_y {
            return 0;
        }

        let mut touched = 0;
        for py in min_y as u32..max_y as u32 {
            for px in min_x as u32..max_x as u32 {
                let center = Pos2::new(px as f32 + 0.5, py as f32 + 0.5);
                if distance_to_segment(center, from, to) <= radius
                    && canvas.composite_pixel(px, py, self.color, self.composite)
                {
                    touched += 1;
                }
            }
        }

        trace!(
            "Stamped segment {:?} -> {:?} width {} ({} pixels)",
            from,
            to,
            self.width,
            touched
        );
        touched
    }
}

fn distance_to_segment(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

pub trait Tool {
    fn style(&self) -> StrokeStyle;

    fn name(&self) -> &str;

    fn cursor_size(&self) -> u32 {
        1
    }

    fn apply(&self, canvas: &mut Canvas, at: Pos2) -> usize {
        self.style().stamp_segment(canvas, at, at)
    }
}

#[derive(Debug, Clone)]
pub struct Brush {
    pub size: f32,
    pub color: Color32,
}

impl Brush {
    pub fn new(size: f32, color: Color32) -> Self {
        Self { size, color }
    }
}

impl Tool for Brush {
    fn style(&self) -> StrokeStyle {
        StrokeStyle {
            composite: Composite::SourceOver,
            color: self.color,
            width: self.size,
        }
    }

    fn name(&self) -> &str {
        "Brush"
    }

    fn cursor_size(&self) -> u32 {
        self.size.round().max(1.0) as u32
    }
}

/// Removes pixels rather than painting them.
#[derive(Debug, Clone)]
pub struct Eraser {
    pub size: f32,
}

impl Eraser {
    pub fn new(size: f32) -> Self {
        debug!("Creating Eraser tool with size {}", size);
        Self { size }
    }
}

impl Tool for Eraser {
    fn style(&self) -> StrokeStyle {
        StrokeStyle {
            composite: Composite::DestinationOut,
            // Only the alpha of the source matters for destination-out.
            color: Color32::BLACK,
            width: self.size,
        }
    }

    fn name(&self) -> &str {
        "Eraser"
    }

    fn cursor_size(&self) -> u32 {
        self.size.round().max(1.0) as u32
    }
}
