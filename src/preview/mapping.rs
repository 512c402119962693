//! Brightness to character mapping.

/// Gamma-correct a linear brightness value (display gamma 2.2).
pub fn gamma_correct(linear: u8) -> u8 {
    ((linear as f32 / 255.0).powf(1.0 / 2.2) * 255.0).round() as u8
}

/// Map cell brightness to characters from `charset` (darkest first).
///
/// `invert` flips the ramp for light terminal backgrounds.
pub fn map_to_chars(brightness: &[u8], charset: &[char], invert: bool) -> Vec<char> {
    if charset.is_empty() {
        return vec![' '; brightness.len()];
    }

    let levels = charset.len();
    brightness
        .iter()
        .map(|&b| {
            let b = gamma_correct(if invert { 255 - b } else { b });
            charset[(b as usize * (levels - 1)) / 255]
        })
        .collect()
}
