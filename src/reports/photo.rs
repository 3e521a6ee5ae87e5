use std::io::Cursor;

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{codecs::jpeg::JpegEncoder, imageops::FilterType};

pub const DEFAULT_MAX_EDGE: u32 = 1024;
pub const DEFAULT_JPEG_QUALITY: u8 = 85;

/// Shrinks attached photos before they are sent with a report.
#[derive(Debug, Clone, Copy)]
pub struct PhotoEncoder {
    max_edge: u32,
    quality: u8,
}

impl Default for PhotoEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_EDGE, DEFAULT_JPEG_QUALITY)
    }
}

impl PhotoEncoder {
    pub fn new(max_edge: u32, quality: u8) -> Self {
        Self {
            max_edge: max_edge.max(1),
            quality: quality.clamp(1, 100),
        }
    }

    /// Decode, cap the longer edge at `max_edge` (never upscaling), re-encode
    /// as JPEG and base64 the result.
    pub fn encode(&self, bytes: &[u8]) -> Result<String> {
        let image = image::load_from_memory(bytes).context("failed to decode photo")?;

        let image = if image.width() > self.max_edge || image.height() > self.max_edge {
            image.resize(self.max_edge, self.max_edge, FilterType::Triangle)
        } else {
            image
        };

        let mut jpeg = Cursor::new(Vec::new());
        image
            .to_rgb8()
            .write_with_encoder(JpegEncoder::new_with_quality(&mut jpeg, self.quality))
            .context("failed to encode photo as JPEG")?;

        Ok(STANDARD.encode(jpeg.into_inner()))
    }
}
