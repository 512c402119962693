//! Character ramps for terminal previews.

use serde::Deserialize;

/// Standard ASCII density ramp (10 levels), darkest first.
pub const STANDARD_CHARSET: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Unicode block ramp (5 levels), darkest first.
pub const BLOCKS_CHARSET: &[char] = &[' ', '░', '▒', '▓', '█'];

/// Minimal ramp (4 levels) for terminals without good Unicode fonts.
pub const MINIMAL_CHARSET: &[char] = &[' ', '.', ':', '#'];

/// Character ramp used to draw the preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharSet {
    #[default]
    Standard,
    Blocks,
    Minimal,
}

impl CharSet {
    pub fn chars(&self) -> &'static [char] {
        match self {
            CharSet::Standard => STANDARD_CHARSET,
            CharSet::Blocks => BLOCKS_CHARSET,
            CharSet::Minimal => MINIMAL_CHARSET,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CharSet::Standard => "standard",
            CharSet::Blocks => "blocks",
            CharSet::Minimal => "minimal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramps_start_dark() {
        for set in [CharSet::Standard, CharSet::Blocks, CharSet::Minimal] {
            assert_eq!(set.chars()[0], ' ', "{} should start with space", set.name());
        }
    }

    #[test]
    fn test_charset_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            charset: CharSet,
        }
        let parsed: Wrapper = toml::from_str("charset = \"blocks\"").unwrap();
        assert_eq!(parsed.charset, CharSet::Blocks);
    }
}
