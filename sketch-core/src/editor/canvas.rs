// Raster drawing surface for the sketchpad.
// Pixels are stored as egui's premultiplied `Color32`, row-major.

use egui::Color32;
use tracing::{debug, info, trace, warn};

/// How a source pixel is combined with the pixel already on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Composite {
    /// Paint on top of existing content.
    SourceOver,
    /// Remove existing content where the source is opaque.
    DestinationOut,
}

// Multiply an 8-bit channel by an 8-bit factor, rounding to nearest.
fn scale(channel: u8, factor: u8) -> u8 {
    ((channel as u16 * factor as u16 + 127) / 255) as u8
}

/// Premultiplied `src` over `dst`.
pub fn source_over(src: Color32, dst: Color32) -> Color32 {
    let inv = 255 - src.a();
    Color32::from_rgba_premultiplied(
        src.r().saturating_add(scale(dst.r(), inv)),
        src.g().saturating_add(scale(dst.g(), inv)),
        src.b().saturating_add(scale(dst.b(), inv)),
        src.a().saturating_add(scale(dst.a(), inv)),
    )
}

/// `dst` with `src`'s coverage punched out of it.
pub fn destination_out(src: Color32, dst: Color32) -> Color32 {
    let inv = 255 - src.a();
    Color32::from_rgba_premultiplied(
        scale(dst.r(), inv),
        scale(dst.g(), inv),
        scale(dst.b(), inv),
        scale(dst.a(), inv),
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Color32>,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Color32) -> Self {
        debug!(
            "Creating canvas of size {}x{} with background {:?}",
            width, height, background
        );

        let total_pixels = width as usize * height as usize;
        Self {
            width,
            height,
            pixels: vec![background; total_pixels],
        }
    }

    /// A fully transparent canvas, the state of a freshly sized surface.
    pub fn blank(width: u32, height: u32) -> Self {
        Self::new(width, height, Color32::TRANSPARENT)
    }

    /// Build a canvas from unmultiplied RGBA8 bytes. Returns `None` if the
    /// buffer length does not match the dimensions.
    pub fn from_rgba_unmultiplied(width: u32, height: u32, bytes: &[u8]) -> Option<Self> {
        let expected = width as usize * height as usize * 4;
        if bytes.len() != expected {
            warn!(
                expected,
                actual = bytes.len(),
                "RGBA buffer does not match canvas dimensions"
            );
            return None;
        }

        let pixels = bytes
            .chunks_exact(4)
            .map(|p| Color32::from_rgba_unmultiplied(p[0], p[1], p[2], p[3]))
            .collect();

        Some(Self {
            width,
            height,
            pixels,
        })
    }

    /// Unmultiplied RGBA8 bytes, row-major.
    pub fn to_rgba_unmultiplied(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|p| p.to_srgba_unmultiplied())
            .collect()
    }

    // Check if coordinates are within canvas bounds
    fn is_valid_coordinate(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    // Convert 2d coordinates to 1d index
    fn coord_to_index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    // Get the color of a pixel at (x, y)
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Color32> {
        if !self.is_valid_coordinate(x, y) {
            return None;
        }
        Some(self.pixels[self.coord_to_index(x, y)])
    }

    // Set the color of a pixel at (x, y)
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color32) -> bool {
        if !self.is_valid_coordinate(x, y) {
            return false;
        }
        let index = self.coord_to_index(x, y);
        self.pixels[index] = color;
        true
    }

    /// Combine `color` into the pixel at (x, y). Out-of-bounds writes are dropped.
    pub fn composite_pixel(&mut self, x: u32, y: u32, color: Color32, op: Composite) -> bool {
        if !self.is_valid_coordinate(x, y) {
            return false;
        }
        let index = self.coord_to_index(x, y);
        let dst = self.pixels[index];
        self.pixels[index] = match op {
            Composite::SourceOver => source_over(color, dst),
            Composite::DestinationOut => destination_out(color, dst),
        };
        true
    }

    // Fill entire canvas with a color
    pub fn fill(&mut self, color: Color32) {
        trace!("Filling canvas {:?}", color);
        self.pixels.fill(color);
    }

    // Clear canvas back to transparent
    pub fn clear(&mut self) {
        self.fill(Color32::TRANSPARENT);
    }

    /// Draw `image` with its top-left corner at the canvas origin, source-over,
    /// clipped to this canvas.
    pub fn draw_image(&mut self, image: &Canvas) {
        let w = self.width.min(image.width);
        let h = self.height.min(image.height);
        if image.width > self.width || image.height > self.height {
            debug!(
                "Clipping {}x{} image to {}x{} canvas",
                image.width, image.height, self.width, self.height
            );
        }

        for y in 0..h {
            for x in 0..w {
                let src = image.pixels[image.coord_to_index(x, y)];
                let index = self.coord_to_index(x, y);
                self.pixels[index] = source_over(src, self.pixels[index]);
            }
        }
    }

    /// Replace the visible content with `image`: clear, then draw.
    pub fn restore_from(&mut self, image: &Canvas) {
        self.clear();
        self.draw_image(image);
    }

    /// A new canvas of the given size holding this canvas' content at the
    /// origin. Content beyond the new bounds is lost.
    pub fn resized(&self, width: u32, height: u32) -> Canvas {
        info!(
            "Resizing canvas {}x{} -> {}x{}",
            self.width, self.height, width, height
        );
        let mut resized = Canvas::blank(width, height);
        resized.draw_image(self);
        resized
    }

    /// This canvas composited over a solid background. The result carries no
    /// transparency when `background` is opaque.
    pub fn flattened_onto(&self, background: Color32) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
            pixels: self
                .pixels
                .iter()
                .map(|&p| source_over(p, background))
                .collect(),
        }
    }

    pub fn is_opaque(&self) -> bool {
        self.pixels.iter().all(|p| p.a() == 255)
    }

    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|p| *p == Color32::TRANSPARENT)
    }

    pub fn pixels(&self) -> &[Color32] {
        &self.pixels
    }

    // Get canvas dimensions
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

// Create a default canvas
impl Default for Canvas {
    fn default() -> Self {
        Canvas::blank(512, 512)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_canvas_is_filled() {
        let canvas = Canvas::new(4, 3, Color32::WHITE);
        assert_eq!(canvas.pixels().len(), 12);
        assert!(canvas.is_opaque());
        assert_eq!(canvas.get_pixel(3, 2), Some(Color32::WHITE));
        assert_eq!(canvas.get_pixel(4, 0), None);
    }

    #[test]
    fn test_destination_out_removes_alpha() {
        let mut canvas = Canvas::new(2, 2, Color32::RED);
        canvas.composite_pixel(0, 0, Color32::BLACK, Composite::DestinationOut);
        assert_eq!(canvas.get_pixel(0, 0), Some(Color32::TRANSPARENT));
        assert_eq!(canvas.get_pixel(1, 0), Some(Color32::RED));
    }

    #[test]
    fn test_source_over_opaque_replaces() {
        let mut canvas = Canvas::blank(2, 2);
        canvas.composite_pixel(1, 1, Color32::BLUE, Composite::SourceOver);
        assert_eq!(canvas.get_pixel(1, 1), Some(Color32::BLUE));
        assert!(!canvas.composite_pixel(2, 2, Color32::BLUE, Composite::SourceOver));
    }

    #[test]
    fn test_resize_keeps_content_within_bounds() {
        let mut canvas = Canvas::blank(10, 10);
        canvas.set_pixel(1, 1, Color32::GREEN);
        canvas.set_pixel(8, 8, Color32::GREEN);

        let smaller = canvas.resized(5, 5);
        assert_eq!(smaller.width(), 5);
        assert_eq!(smaller.get_pixel(1, 1), Some(Color32::GREEN));
        assert_eq!(smaller.pixels().iter().filter(|p| **p == Color32::GREEN).count(), 1);

        let larger = canvas.resized(20, 12);
        assert_eq!(larger.get_pixel(8, 8), Some(Color32::GREEN));
        assert_eq!(larger.get_pixel(19, 11), Some(Color32::TRANSPARENT));
    }

    #[test]
    fn test_flatten_onto_white_is_opaque() {
        let mut canvas = Canvas::new(3, 3, Color32::BLACK);
        canvas.set_pixel(1, 1, Color32::TRANSPARENT);

        let flat = canvas.flattened_onto(Color32::WHITE);
        assert!(flat.is_opaque());
        assert_eq!(flat.get_pixel(1, 1), Some(Color32::WHITE));
        assert_eq!(flat.get_pixel(0, 0), Some(Color32::BLACK));
    }

    #[test]
    fn test_restore_replaces_content() {
        let mut canvas = Canvas::new(4, 4, Color32::RED);
        let mut image = Canvas::blank(2, 2);
        image.set_pixel(0, 0, Color32::BLUE);

        canvas.restore_from(&image);
        assert_eq!(canvas.get_pixel(0, 0), Some(Color32::BLUE));
        assert_eq!(canvas.get_pixel(1, 1), Some(Color32::TRANSPARENT));
        assert_eq!(canvas.get_pixel(3, 3), Some(Color32::TRANSPARENT));
    }

    #[test]
    fn test_rgba_roundtrip_for_opaque_and_clear() {
        let mut canvas = Canvas::new(2, 1, Color32::from_rgb(10, 20, 30));
        canvas.set_pixel(1, 0, Color32::TRANSPARENT);

        let bytes = canvas.to_rgba_unmultiplied();
        assert_eq!(bytes, vec![10, 20, 30, 255, 0, 0, 0, 0]);
        assert_eq!(Canvas::from_rgba_unmultiplied(2, 1, &bytes), Some(canvas));
        assert!(Canvas::from_rgba_unmultiplied(3, 1, &bytes).is_none());
    }
}
