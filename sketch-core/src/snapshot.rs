//! Encoded page snapshots.
//!
//! A snapshot is the whole canvas as a PNG, carried around as a
//! `data:image/png;base64,...` string. Snapshots keep transparency; only
//! export flattens it away.

use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::editor::Canvas;

/// Prefix of every snapshot produced by [`Snapshot::encode`].
pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(String);

impl Snapshot {
    /// Encode the full canvas.
    pub fn encode(canvas: &Canvas) -> Result<Self, SnapshotError> {
        let png = encode_png(canvas)?;
        let url = format!("{}{}", PNG_DATA_URL_PREFIX, STANDARD.encode(&png));
        trace!(bytes = url.len(), "Encoded snapshot");
        Ok(Self(url))
    }

    /// A blank (fully transparent) page of the given size.
    pub fn blank(width: u32, height: u32) -> Result<Self, SnapshotError> {
        Self::encode(&Canvas::blank(width, height))
    }

    /// Wrap an existing data URL. It is only validated when decoded.
    pub fn from_data_url(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_data_url(&self) -> &str {
        &self.0
    }

    /// Decode back into pixels.
    pub fn decode(&self) -> Result<Canvas, SnapshotError> {
        let payload = self
            .0
            .strip_prefix(PNG_DATA_URL_PREFIX)
            .ok_or(SnapshotError::NotPngDataUrl)?;
        let bytes = STANDARD.decode(payload)?;
        decode_png(&bytes)
    }
}

/// PNG-encode a canvas, keeping its alpha channel.
pub fn encode_png(canvas: &Canvas) -> Result<Vec<u8>, SnapshotError> {
    if canvas.width() == 0 || canvas.height() == 0 {
        return Err(SnapshotError::EmptySurface);
    }

    let image = image::RgbaImage::from_raw(
        canvas.width(),
        canvas.height(),
        canvas.to_rgba_unmultiplied(),
    )
    .ok_or(SnapshotError::EmptySurface)?;

    let mut png = Vec::new();
    image.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)?;
    debug!(
        width = canvas.width(),
        height = canvas.height(),
        bytes = png.len(),
        "Encoded PNG"
    );
    Ok(png)
}

/// Decode PNG bytes into a canvas.
pub fn decode_png(bytes: &[u8]) -> Result<Canvas, SnapshotError> {
    let decoded = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
        .map_err(|err| {
            warn!(%err, "Snapshot decode failed");
            SnapshotError::Image(err)
        })?
        .to_rgba8();

    let (width, height) = decoded.dimensions();
    if width == 0 || height == 0 {
        return Err(SnapshotError::EmptySurface);
    }
    Canvas::from_rgba_unmultiplied(width, height, decoded.as_raw())
        .ok_or(SnapshotError::EmptySurface)
}

/// Snapshot encode/decode failures. None of these are fatal: the caller keeps
/// whatever is currently on the canvas.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot is not a PNG data URL")]
    NotPngDataUrl,

    #[error("snapshot payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("snapshot image could not be processed: {0}")]
    Image(#[from] image::ImageError),

    #[error("surface has no pixels")]
    EmptySurface,
}
