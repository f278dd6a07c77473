// Editor module: the raster surface and everything that draws on it.

pub mod canvas;
pub mod history;
pub mod stroke;
pub mod tools;

pub use canvas::{Canvas, Composite};
pub use history::{History, DEFAULT_MAX_STATES};
pub use stroke::StrokeRecorder;
pub use tools::{Brush, Eraser, StrokeStyle, Tool};
