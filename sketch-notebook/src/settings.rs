//! Drawing settings shared by every stroke: active tool, colour and the two
//! independent widths for drawing and erasing.

use serde::{Deserialize, Serialize};
use sketch_core::{Brush, Color32, Eraser, Tool};

use crate::config::{BrushConfig, ConfigError};

pub const DEFAULT_DRAW_WIDTH: f32 = 5.0;
pub const DEFAULT_ERASE_WIDTH: f32 = 20.0;
pub const MIN_WIDTH: f32 = 1.0;
pub const MAX_WIDTH: f32 = 50.0;
pub const DEFAULT_COLOR_HEX: &str = "#000000";

/// The closed set of stroke modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    #[default]
    Draw,
    Erase,
}

/// Parse a `#rgb`, `#rrggbb` or `#rrggbbaa` colour.
pub fn parse_hex_color(value: &str) -> Result<Color32, ConfigError> {
    Color32::from_hex(value.trim()).map_err(|_| ConfigError::InvalidColor {
        value: value.to_string(),
    })
}

/// Slider label for a width, e.g. `"5px"`.
pub fn width_label(width: f32) -> String {
    format!("{}px", width.round() as u32)
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawingSettings {
    tool: ToolKind,
    color: Color32,
    draw_width: f32,
    erase_width: f32,
    min_width: f32,
    max_width: f32,
    swatches: Vec<Color32>,
}

impl Default for DrawingSettings {
    fn default() -> Self {
        Self {
            tool: ToolKind::Draw,
            color: Color32::BLACK,
            draw_width: DEFAULT_DRAW_WIDTH,
            erase_width: DEFAULT_ERASE_WIDTH,
            min_width: MIN_WIDTH,
            max_width: MAX_WIDTH,
            swatches: BrushConfig::default()
                .swatches
                .iter()
                .filter_map(|hex| parse_hex_color(hex).ok())
                .collect(),
        }
    }
}

impl DrawingSettings {
    pub fn from_config(config: &BrushConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            tool: ToolKind::Draw,
            color: parse_hex_color(&config.default_color)?,
            draw_width: config.draw_width,
            erase_width: config.erase_width,
            min_width: config.min_width,
            max_width: config.max_width,
            swatches: config
                .swatches
                .iter()
                .map(|hex| parse_hex_color(hex))
                .collect::<Result<_, _>>()?,
        })
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        if self.tool != tool {
            tracing::debug!(from = ?self.tool, to = ?tool, "tool changed");
            self.tool = tool;
        }
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn set_color(&mut self, color: Color32) {
        self.color = color;
    }

    pub fn set_color_hex(&mut self, hex: &str) -> Result<(), ConfigError> {
        self.color = parse_hex_color(hex)?;
        Ok(())
    }

    /// The palette offered next to the colour picker.
    pub fn swatches(&self) -> &[Color32] {
        &self.swatches
    }

    /// Make swatch `index` the stroke colour. Returns `None`, leaving the
    /// colour unchanged, if there is no such swatch.
    pub fn select_swatch(&mut self, index: usize) -> Option<Color32> {
        let color = *self.swatches.get(index)?;
        self.color = color;
        Some(color)
    }

    pub fn draw_width(&self) -> f32 {
        self.draw_width
    }

    pub fn erase_width(&self) -> f32 {
        self.erase_width
    }

    /// Set the draw width, clamped to the configured bounds. Returns the width
    /// actually applied.
    pub fn set_draw_width(&mut self, width: f32) -> f32 {
        self.draw_width = self.clamp_width(width, self.draw_width);
        self.draw_width
    }

    /// Set the erase width, clamped to the configured bounds.
    pub fn set_erase_width(&mut self, width: f32) -> f32 {
        self.erase_width = self.clamp_width(width, self.erase_width);
        self.erase_width
    }

    fn clamp_width(&self, width: f32, current: f32) -> f32 {
        if !width.is_finite() {
            tracing::warn!(width, "ignoring non-finite width");
            return current;
        }
        width.clamp(self.min_width, self.max_width)
    }

    /// Width of whichever tool is active.
    pub fn active_width(&self) -> f32 {
        match self.tool {
            ToolKind::Draw => self.draw_width,
            ToolKind::Erase => self.erase_width,
        }
    }

    /// The tool the next stroke is drawn with.
    pub fn active_tool(&self) -> Box<dyn Tool> {
        match self.tool {
            ToolKind::Draw => Box::new(Brush::new(self.draw_width, self.color)),
            ToolKind::Erase => Box::new(Eraser::new(self.erase_width)),
        }
    }

    pub fn draw_width_label(&self) -> String {
        width_label(self.draw_width)
    }

    pub fn erase_width_label(&self) -> String {
        width_label(self.erase_width)
    }
}
