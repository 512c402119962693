//! Luminance extraction and downsampling of a decoded preview.

use image::RgbImage;

/// Terminal cells are roughly twice as tall as they are wide.
pub const CHAR_ASPECT_RATIO: f32 = 2.0;

/// Convert RGB pixels to luminance using ITU-R BT.601 weights.
///
/// Integer math, coefficients scaled by 1000 (299 + 587 + 114 = 1000).
pub fn luminance(image: &RgbImage) -> Vec<u8> {
    image
        .as_raw()
        .chunks_exact(3)
        .map(|rgb| {
            let (r, g, b) = (rgb[0] as u32, rgb[1] as u32, rgb[2] as u32);
            ((299 * r + 587 * g + 114 * b) / 1000) as u8
        })
        .collect()
}

/// Character grid size that keeps the image's aspect ratio on screen.
///
/// Fits to `max_cols` first and falls back to `max_rows` when the image is
/// too tall. Returns `(0, 0)` for empty input.
pub fn fit_grid(img_width: u32, img_height: u32, max_cols: u16, max_rows: u16) -> (u16, u16) {
    if img_width == 0 || img_height == 0 || max_cols == 0 || max_rows == 0 {
        return (0, 0);
    }

    let target = (img_width as f32 / img_height as f32) * CHAR_ASPECT_RATIO;

    let rows = (max_cols as f32 / target).round() as u16;
    if rows > 0 && rows <= max_rows {
        return (max_cols, rows);
    }

    let cols = ((max_rows as f32 * target).round() as u16).min(max_cols);
    (cols.max(1), max_rows)
}

/// Average luminance over each cell of a `cols` x `rows` grid.
pub fn downsample(gray: &[u8], img_width: u32, img_height: u32, cols: u16, rows: u16) -> Vec<u8> {
    if cols == 0 || rows == 0 || img_width == 0 || img_height == 0 || gray.is_empty() {
        return Vec::new();
    }

    let cell_w = img_width as f32 / cols as f32;
    let cell_h = img_height as f32 / rows as f32;
    let mut cells = Vec::with_capacity(cols as usize * rows as usize);

    for cy in 0..rows {
        let y0 = (cy as f32 * cell_h) as u32;
        let y1 = (((cy + 1) as f32 * cell_h) as u32).max(y0 + 1).min(img_height);
        for cx in 0..cols {
            let x0 = (cx as f32 * cell_w) as u32;
            let x1 = (((cx + 1) as f32 * cell_w) as u32).max(x0 + 1).min(img_width);

            let mut sum = 0u32;
            let mut count = 0u32;
            for py in y0..y1 {
                let row = (py * img_width) as usize;
                for px in x0..x1 {
                    if let Some(v) = gray.get(row + px as usize) {
                        sum += *v as u32;
                        count += 1;
                    }
                }
            }
            cells.push(if count > 0 { (sum / count) as u8 } else { 0 });
        }
    }

    cells
}
