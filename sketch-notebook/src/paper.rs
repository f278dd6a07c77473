//! Paper sizes and background patterns.
//!
//! The size decides the pixel dimensions of the drawing surface. The pattern
//! is purely cosmetic and never ends up in a snapshot or export.

use serde::{Deserialize, Serialize};
use sketch_core::Vec2;
use thiserror::Error;

/// A4 portrait at 96 dpi.
pub const A4_PIXELS: (u32, u32) = (794, 1123);
/// US Letter portrait at 96 dpi.
pub const LETTER_PIXELS: (u32, u32) = (816, 1056);
/// Largest surface side accepted for a `Fit` page.
pub const MAX_SURFACE_SIDE: u32 = 16384;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaperSize {
    /// Fill the area the host window makes available.
    #[default]
    Fit,
    A4,
    Letter,
}

impl PaperSize {
    pub fn label(&self) -> &'static str {
        match self {
            PaperSize::Fit => "Fit to window",
            PaperSize::A4 => "A4",
            PaperSize::Letter => "Letter",
        }
    }

    pub fn is_fixed(&self) -> bool {
        !matches!(self, PaperSize::Fit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    #[default]
    Blank,
    Lined,
    Grid,
    Dotted,
}

impl Pattern {
    /// Stable identifier for styling the page background.
    pub fn css_class(&self) -> &'static str {
        match self {
            Pattern::Blank => "paper-blank",
            Pattern::Lined => "paper-lined",
            Pattern::Grid => "paper-grid",
            Pattern::Dotted => "paper-dotted",
        }
    }
}

/// Pixel dimensions for `size`. `available` is only consulted for
/// [`PaperSize::Fit`], which keeps `margin` pixels free on each axis.
pub fn resolve_dimensions(
    size: PaperSize,
    available: Vec2,
    margin: u32,
) -> Result<(u32, u32), PaperError> {
    match size {
        PaperSize::A4 => Ok(A4_PIXELS),
        PaperSize::Letter => Ok(LETTER_PIXELS),
        PaperSize::Fit => {
            if !(available.x.is_finite() && available.y.is_finite()) {
                return Err(PaperError::InvalidArea {
                    width: available.x,
                    height: available.y,
                });
            }
            let width = (available.x - margin as f32).floor();
            let height = (available.y - margin as f32).floor();
            if width < 1.0 || height < 1.0 {
                tracing::warn!(
                    available_width = available.x,
                    available_height = available.y,
                    margin,
                    "no room left for the page"
                );
                return Err(PaperError::NoRoom {
                    width: available.x,
                    height: available.y,
                    margin,
                });
            }
            let max = MAX_SURFACE_SIDE as f32;
            if width > max || height > max {
                tracing::warn!(
                    available_width = available.x,
                    available_height = available.y,
                    max_side = MAX_SURFACE_SIDE,
                    "page would exceed the largest surface"
                );
                return Err(PaperError::TooLarge {
                    width,
                    height,
                    max: MAX_SURFACE_SIDE,
                });
            }
            Ok((width as u32, height as u32))
        }
    }
}

/// The logical page: size mode, pattern and the resolved surface dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paper {
    size: PaperSize,
    pattern: Pattern,
    width: u32,
    height: u32,
}

impl Paper {
    pub fn new(
        size: PaperSize,
        pattern: Pattern,
        available: Vec2,
        margin: u32,
    ) -> Result<Self, PaperError> {
        let (width, height) = resolve_dimensions(size, available, margin)?;
        Ok(Self {
            size,
            pattern,
            width,
            height,
        })
    }

    /// Same pattern, new size mode and dimensions.
    pub fn with_size(self, size: PaperSize, width: u32, height: u32) -> Self {
        Self {
            size,
            width,
            height,
            ..self
        }
    }

    pub fn size(&self) -> PaperSize {
        self.size
    }

    pub fn pattern(&self) -> Pattern {
        self.pattern
    }

    pub fn set_pattern(&mut self, pattern: Pattern) {
        self.pattern = pattern;
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[derive(Debug, Error)]
pub enum PaperError {
    #[error("available area {width}x{height} leaves no room with a {margin}px margin")]
    NoRoom { width: f32, height: f32, margin: u32 },

    #[error("available area {width}x{height} is not a finite size")]
    InvalidArea { width: f32, height: f32 },

    #[error("page {width}x{height} exceeds the {max}px surface limit")]
    TooLarge { width: f32, height: f32, max: u32 },
}
