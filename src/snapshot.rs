//! Still-frame capture and JPEG encoding.
//!
//! A [`Snapshot`] is one frame drawn into an off-screen raster. Both the
//! preview and the upload payload are encoded from that same raster, so they
//! always depict the same instant.

use std::io::Cursor;
use std::sync::Arc;

use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, RgbImage};
use thiserror::Error;

use crate::camera::Frame;

/// JPEG quality used when nothing else is configured (0.5 on a 0-1 scale).
pub const DEFAULT_JPEG_QUALITY: u8 = 50;

/// Errors that can occur while capturing or encoding a still.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("camera has not produced a frame yet")]
    NoFrame,

    #[error("frame has no dimensions ({width}x{height})")]
    EmptyFrame { width: u32, height: u32 },

    #[error("frame buffer holds {actual} bytes, expected {expected}")]
    MalformedFrame { expected: usize, actual: usize },

    #[error("JPEG encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("encoder task failed: {0}")]
    Task(String),
}

/// JPEG bytes shown to the user while the confirmation view is open.
#[derive(Debug, Clone)]
pub struct PreviewImage {
    pub jpeg: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl PreviewImage {
    pub fn is_empty(&self) -> bool {
        self.jpeg.is_empty()
    }

    /// Decode the preview back into pixels for display.
    pub fn decode(&self) -> Result<RgbImage, image::ImageError> {
        Ok(image::load_from_memory_with_format(&self.jpeg, ImageFormat::Jpeg)?.to_rgb8())
    }
}

/// Compressed bytes of a captured frame, ready for upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload(Vec<u8>);

impl Payload {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One captured frame, drawn once and shared by both encoders.
#[derive(Debug, Clone)]
pub struct Snapshot {
    raster: Arc<RgbImage>,
}

impl Snapshot {
    /// Draw the given frame into a raster sized to its natural dimensions.
    ///
    /// Rejects the trigger when the feed has not produced a frame or the
    /// frame has zero width or height.
    pub fn take(frame: Option<Frame>) -> Result<Self, CaptureError> {
        let frame = frame.ok_or(CaptureError::NoFrame)?;
        if !frame.has_dimensions() {
            return Err(CaptureError::EmptyFrame {
                width: frame.width,
                height: frame.height,
            });
        }

        let expected = frame.expected_len();
        let actual = frame.data.len();
        let raster = RgbImage::from_raw(frame.width, frame.height, frame.data)
            .ok_or(CaptureError::MalformedFrame { expected, actual })?;

        Ok(Self {
            raster: Arc::new(raster),
        })
    }

    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    /// Encode the displayable preview.
    pub fn encode_preview(&self, quality: u8) -> Result<PreviewImage, CaptureError> {
        Ok(PreviewImage {
            jpeg: encode_jpeg(&self.raster, quality)?,
            width: self.width(),
            height: self.height(),
        })
    }

    /// Encode the upload payload.
    pub fn encode_payload(&self, quality: u8) -> Result<Payload, CaptureError> {
        Ok(Payload(encode_jpeg(&self.raster, quality)?))
    }
}

/// Encode a raster as baseline JPEG. `quality` is clamped to 1-100.
pub fn encode_jpeg(raster: &RgbImage, quality: u8) -> Result<Vec<u8>, CaptureError> {
    let mut out = Cursor::new(Vec::new());
    {
        let mut encoder = JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100));
        encoder.encode_image(raster)?;
    }
    Ok(out.into_inner())
}
