//! Binary form of a plan's accent color.
//!
//! Layout: `b"TC"`, format version, channel count, then one byte per channel
//! (RGB or RGBA). Decoding falls back to the theme preset, then the default
//! color, so callers always get something to draw with.

use tabi_domain::{Plan, ThemeColor, ThemePreset, DEFAULT_THEME_COLOR};
use thiserror::Error;
use tracing::warn;

const MAGIC: [u8; 2] = *b"TC";
const FORMAT_VERSION: u8 = 1;
const HEADER_LEN: usize = 4;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ThemeDecodeError {
    #[error("blob is {0} bytes, too short for a color")]
    Truncated(usize),
    #[error("missing color marker")]
    BadMagic,
    #[error("unsupported color format version {0}")]
    UnsupportedVersion(u8),
    #[error("unsupported channel count {0}")]
    BadChannelCount(u8),
    #[error("expected {expected} bytes, found {found}")]
    LengthMismatch { expected: usize, found: usize },
}

pub struct ThemeColorCodec;

impl ThemeColorCodec {
    pub fn encode(color: ThemeColor) -> Vec<u8> {
        let mut blob = Vec::with_capacity(HEADER_LEN + 4);
        blob.extend_from_slice(&MAGIC);
        blob.push(FORMAT_VERSION);
        blob.push(4);
        blob.extend_from_slice(&[color.r, color.g, color.b, color.a]);
        blob
    }

    pub fn try_decode(blob: &[u8]) -> Result<ThemeColor, ThemeDecodeError> {
        if blob.len() < HEADER_LEN {
            return Err(ThemeDecodeError::Truncated(blob.len()));
        }
        if blob[..2] != MAGIC {
            return Err(ThemeDecodeError::BadMagic);
        }
        if blob[2] != FORMAT_VERSION {
            return Err(ThemeDecodeError::UnsupportedVersion(blob[2]));
        }
        let channels = blob[3];
        if channels != 3 && channels != 4 {
            return Err(ThemeDecodeError::BadChannelCount(channels));
        }
        let expected = HEADER_LEN + channels as usize;
        if blob.len() != expected {
            return Err(ThemeDecodeError::LengthMismatch {
                expected,
                found: blob.len(),
            });
        }
        let body = &blob[HEADER_LEN..];
        let alpha = body.get(3).copied().unwrap_or(255);
        Ok(ThemeColor::rgba(body[0], body[1], body[2], alpha))
    }

    /// Resolves a usable color. Never fails: a corrupt blob is logged and
    /// treated as absent.
    pub fn decode(blob: Option<&[u8]>, theme_name: &str) -> ThemeColor {
        if let Some(bytes) = blob {
            match Self::try_decode(bytes) {
                Ok(color) => return color,
                Err(err) => warn!(theme = theme_name, error = %err, "theme color blob unreadable"),
            }
        }
        Self::fallback(theme_name)
    }

    /// Preset color for `theme_name`, or the default accent.
    pub fn fallback(theme_name: &str) -> ThemeColor {
        ThemePreset::find(theme_name)
            .map(|preset| preset.color)
            .unwrap_or(DEFAULT_THEME_COLOR)
    }

    pub fn resolve(plan: &Plan) -> ThemeColor {
        Self::decode(plan.theme_color.as_deref(), &plan.theme_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabi_domain::{BLUE, GREEN};

    #[test]
    fn rejects_malformed_blobs() {
        assert_eq!(
            ThemeColorCodec::try_decode(&[1, 2]),
            Err(ThemeDecodeError::Truncated(2))
        );
        assert_eq!(
            ThemeColorCodec::try_decode(b"XX\x01\x04abcd"),
            Err(ThemeDecodeError::BadMagic)
        );
        assert_eq!(
            ThemeColorCodec::try_decode(b"TC\x09\x04abcd"),
            Err(ThemeDecodeError::UnsupportedVersion(9))
        );
        assert_eq!(
            ThemeColorCodec::try_decode(b"TC\x01\x04ab"),
            Err(ThemeDecodeError::LengthMismatch {
                expected: 8,
                found: 6
            })
        );
    }

    #[test]
    fn three_channel_blob_is_opaque() {
        let color = ThemeColorCodec::try_decode(&[b'T', b'C', 1, 3, 52, 199, 89]).unwrap();
        assert_eq!(color, GREEN);
        assert_eq!(color.a, 255);
    }

    #[test]
    fn theme_names_match_exactly() {
        assert_eq!(ThemeColorCodec::fallback("Sea"), BLUE);
        assert_eq!(ThemeColorCodec::fallback("sea"), DEFAULT_THEME_COLOR);
    }
}
