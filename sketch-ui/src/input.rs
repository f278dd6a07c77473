//! Pointer input mapping.
//!
//! Device coordinates (where the pointer is on screen) are mapped to surface
//! pixels through the rectangle the page is displayed in. The displayed size
//! may differ from the bitmap size when the page is scaled to fit.

use serde::Deserialize;
use sketch_core::{pos2, Pos2, Vec2};

/// Where the page is shown, in device coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Viewport {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    /// Displayed width. Unset means the page is shown at 1:1.
    #[serde(default)]
    pub width: Option<f32>,
    #[serde(default)]
    pub height: Option<f32>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::identity()
    }
}

impl Viewport {
    /// Page drawn at the device origin, unscaled.
    pub fn identity() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: None,
            height: None,
        }
    }

    pub fn origin(&self) -> Pos2 {
        pos2(self.x, self.y)
    }

    /// Surface pixels per device pixel along each axis.
    pub fn scale(&self, surface: (u32, u32)) -> Vec2 {
        let axis = |displayed: Option<f32>, pixels: u32| match displayed {
            Some(d) if d.is_finite() && d > 0.0 => pixels as f32 / d,
            _ => 1.0,
        };
        Vec2::new(axis(self.width, surface.0), axis(self.height, surface.1))
    }

    /// Map a device position onto the surface. Points outside the displayed
    /// rectangle map outside the surface; clipping is the canvas's job.
    pub fn to_surface(&self, device: Pos2, surface: (u32, u32)) -> Pos2 {
        let offset = device - self.origin();
        let scale = self.scale(surface);
        pos2(offset.x * scale.x, offset.y * scale.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_passes_through() {
        let viewport = Viewport::identity();
        assert_eq!(viewport.to_surface(pos2(12.5, 7.0), (100, 100)), pos2(12.5, 7.0));
    }

    #[test]
    fn test_offset_and_scale() {
        // An 800x600 page shown at half size, 40px from the left and top.
        let viewport = Viewport {
            x: 40.0,
            y: 40.0,
            width: Some(400.0),
            height: Some(300.0),
        };
        assert_eq!(viewport.scale((800, 600)), Vec2::new(2.0, 2.0));
        assert_eq!(viewport.to_surface(pos2(40.0, 40.0), (800, 600)), pos2(0.0, 0.0));
        assert_eq!(viewport.to_surface(pos2(240.0, 90.0), (800, 600)), pos2(400.0, 100.0));
    }

    #[test]
    fn test_outside_maps_outside() {
        let viewport = Viewport {
            x: 10.0,
            y: 10.0,
            ..Viewport::identity()
        };
        let p = viewport.to_surface(pos2(5.0, 5.0), (50, 50));
        assert!(p.x < 0.0 && p.y < 0.0);
    }

    #[test]
    fn test_degenerate_display_size_is_unscaled() {
        let viewport = Viewport {
            width: Some(0.0),
            height: Some(f32::NAN),
            ..Viewport::identity()
        };
        assert_eq!(viewport.scale((640, 480)), Vec2::new(1.0, 1.0));
    }
}
