//! Terminal rendering of a captured preview.
//!
//! The preview JPEG is decoded, reduced to luminance, averaged down to a
//! character grid that keeps the image's aspect ratio, and mapped onto a
//! character ramp.

mod charset;
mod mapping;
mod raster;

pub use charset::{CharSet, BLOCKS_CHARSET, MINIMAL_CHARSET, STANDARD_CHARSET};
pub use mapping::{gamma_correct, map_to_chars};
pub use raster::{downsample, fit_grid, luminance, CHAR_ASPECT_RATIO};

use crate::snapshot::PreviewImage;

/// How a preview is drawn in the terminal.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub columns: u16,
    pub max_rows: u16,
    pub charset: CharSet,
    pub invert: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            columns: 60,
            max_rows: 30,
            charset: CharSet::Standard,
            invert: false,
        }
    }
}

/// Render a preview as lines of text.
///
/// Decodes the preview's own JPEG bytes, so what is shown is exactly what
/// was encoded.
pub fn render_ascii(
    preview: &PreviewImage,
    options: &RenderOptions,
) -> Result<Vec<String>, image::ImageError> {
    let image = preview.decode()?;
    let (cols, rows) = fit_grid(image.width(), image.height(), options.columns, options.max_rows);
    if cols == 0 || rows == 0 {
        return Ok(Vec::new());
    }

    let gray = luminance(&image);
    let cells = downsample(&gray, image.width(), image.height(), cols, rows);
    let chars = map_to_chars(&cells, options.charset.chars(), options.invert);

    Ok(chars
        .chunks(cols as usize)
        .map(|row| row.iter().collect())
        .collect())
}
