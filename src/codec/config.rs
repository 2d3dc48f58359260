//! Decoder/encoder configuration.
//!
//! A [`LengthFieldConfig`] describes where the length field sits inside a
//! frame and how the raw value maps to the number of bytes that follow it:
//!
//! ```text
//! ┌─────────────────┬──────────────────────┬─────────────────────┐
//! │ header bytes    │ length field         │ payload             │
//! │ length_field_   │ length_field_length  │ frame length minus  │
//! │ offset bytes    │ ∈ {1, 2, 4, 8}, BE   │ the header portion  │
//! └─────────────────┴──────────────────────┴─────────────────────┘
//! ```
//!
//! The same config drives both decoders and the encoder, so the field
//! width/offset arithmetic is interpreted exactly once, here.
//!
//! # Example
//!
//! ```
//! use framewire::codec::LengthFieldConfig;
//!
//! let config = LengthFieldConfig::builder()
//!     .max_frame_length(65536)
//!     .length_field_length(4)
//!     .initial_bytes_to_strip(4)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.length_field_end_offset(), 4);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{FrameError, Result};

/// Default maximum frame length (8 MB).
pub const DEFAULT_MAX_FRAME_LENGTH: usize = 8 * 1024 * 1024;

/// Default length field width in bytes.
pub const DEFAULT_LENGTH_FIELD_LENGTH: usize = 4;

/// Immutable parsing parameters for length-field based framing.
///
/// Built once per decoder instance via [`LengthFieldConfig::builder`].
/// All fields have serde defaults so a config can be loaded from a JSON
/// document that only overrides what it needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LengthFieldConfig {
    /// Largest allowed adjusted frame size in bytes.
    pub max_frame_length: usize,
    /// Byte offset of the length field from the start of the frame.
    pub length_field_offset: usize,
    /// Width of the length field in bytes (1, 2, 4 or 8).
    pub length_field_length: usize,
    /// Signed correction added to the raw length value to obtain the true
    /// remaining-bytes count after the length field.
    pub length_adjustment: isize,
    /// Bytes removed from the front of the reconstructed frame before
    /// delivery.
    pub initial_bytes_to_strip: usize,
    /// Whether an oversized frame is reported at first detection (`true`)
    /// or only once the whole oversized frame has been skipped (`false`).
    pub fail_fast: bool,
}

impl Default for LengthFieldConfig {
    fn default() -> Self {
        Self {
            max_frame_length: DEFAULT_MAX_FRAME_LENGTH,
            length_field_offset: 0,
            length_field_length: DEFAULT_LENGTH_FIELD_LENGTH,
            length_adjustment: 0,
            initial_bytes_to_strip: 0,
            fail_fast: true,
        }
    }
}

impl LengthFieldConfig {
    /// Start building a config from the defaults.
    pub fn builder() -> LengthFieldConfigBuilder {
        LengthFieldConfigBuilder::new()
    }

    /// Load a config from a JSON document.
    ///
    /// Missing fields fall back to their defaults. The result is validated
    /// the same way [`LengthFieldConfigBuilder::build`] validates.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Offset of the first byte after the length field.
    #[inline]
    pub fn length_field_end_offset(&self) -> usize {
        self.length_field_offset + self.length_field_length
    }

    /// Check the construction-time constraints.
    pub(crate) fn validate(&self) -> Result<()> {
        match self.length_field_length {
            1 | 2 | 4 | 8 => {}
            n => {
                return Err(FrameError::Config(format!(
                    "Unsupported length field width: {} (expected 1, 2, 4 or 8)",
                    n
                )));
            }
        }

        if self.max_frame_length == 0 {
            return Err(FrameError::Config(
                "max_frame_length must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Read the raw length field from `src`, where `src` starts at the
    /// frame boundary. Unsigned big-endian.
    ///
    /// Both decoding modes go through this helper so `length_field_offset`
    /// and the field width are interpreted identically.
    ///
    /// # Panics
    ///
    /// Panics if `src` is shorter than [`Self::length_field_end_offset`];
    /// callers check availability first.
    pub(crate) fn read_length(&self, src: &[u8]) -> u64 {
        let start = self.length_field_offset;
        let field = &src[start..start + self.length_field_length];
        match self.length_field_length {
            1 => u64::from(field[0]),
            2 => u64::from(u16::from_be_bytes([field[0], field[1]])),
            4 => u64::from(u32::from_be_bytes([field[0], field[1], field[2], field[3]])),
            8 => u64::from_be_bytes([
                field[0], field[1], field[2], field[3], field[4], field[5], field[6], field[7],
            ]),
            // Width is validated at construction.
            n => unreachable!("unvalidated length field width: {}", n),
        }
    }
}

/// Builder for [`LengthFieldConfig`].
#[derive(Debug, Clone)]
pub struct LengthFieldConfigBuilder {
    config: LengthFieldConfig,
}

impl LengthFieldConfigBuilder {
    fn new() -> Self {
        Self {
            config: LengthFieldConfig::default(),
        }
    }

    /// Set the largest allowed adjusted frame size.
    pub fn max_frame_length(mut self, max: usize) -> Self {
        self.config.max_frame_length = max;
        self
    }

    /// Set the byte offset of the length field.
    pub fn length_field_offset(mut self, offset: usize) -> Self {
        self.config.length_field_offset = offset;
        self
    }

    /// Set the width of the length field (1, 2, 4 or 8 bytes).
    pub fn length_field_length(mut self, length: usize) -> Self {
        self.config.length_field_length = length;
        self
    }

    /// Set the signed correction applied to the raw length value.
    pub fn length_adjustment(mut self, adjustment: isize) -> Self {
        self.config.length_adjustment = adjustment;
        self
    }

    /// Set the number of bytes stripped from the front of each delivered
    /// frame.
    pub fn initial_bytes_to_strip(mut self, strip: usize) -> Self {
        self.config.initial_bytes_to_strip = strip;
        self
    }

    /// Set the oversized-frame error timing.
    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.config.fail_fast = fail_fast;
        self
    }

    /// Validate and return the config.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::Config`] for an unsupported length field width
    /// or a zero `max_frame_length`.
    pub fn build(self) -> Result<LengthFieldConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = LengthFieldConfig::default();
        assert_eq!(config.max_frame_length, DEFAULT_MAX_FRAME_LENGTH);
        assert_eq!(config.length_field_offset, 0);
        assert_eq!(config.length_field_length, 4);
        assert_eq!(config.length_adjustment, 0);
        assert_eq!(config.initial_bytes_to_strip, 0);
        assert!(config.fail_fast);
    }

    #[test]
    fn test_builder_sets_all_fields() {
        let config = LengthFieldConfig::builder()
            .max_frame_length(1024)
            .length_field_offset(2)
            .length_field_length(2)
            .length_adjustment(-4)
            .initial_bytes_to_strip(4)
            .fail_fast(false)
            .build()
            .unwrap();

        assert_eq!(config.max_frame_length, 1024);
        assert_eq!(config.length_field_offset, 2);
        assert_eq!(config.length_field_length, 2);
        assert_eq!(config.length_adjustment, -4);
        assert_eq!(config.initial_bytes_to_strip, 4);
        assert!(!config.fail_fast);
        assert_eq!(config.length_field_end_offset(), 4);
    }

    #[test]
    fn test_unsupported_width_rejected() {
        for width in [0, 3, 5, 16] {
            let result = LengthFieldConfig::builder()
                .length_field_length(width)
                .build();
            assert!(result.is_err(), "width {} should be rejected", width);
            assert!(result
                .unwrap_err()
                .to_string()
                .contains("Unsupported length field width"));
        }
    }

    #[test]
    fn test_zero_max_frame_length_rejected() {
        let result = LengthFieldConfig::builder().max_frame_length(0).build();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("max_frame_length"));
    }

    #[test]
    fn test_read_length_all_widths() {
        let bytes = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];

        let cases: [(usize, u64); 4] = [
            (1, 0x01),
            (2, 0x0102),
            (4, 0x0102_0304),
            (8, 0x0102_0304_0506_0708),
        ];

        for (width, expected) in cases {
            let config = LengthFieldConfig::builder()
                .length_field_length(width)
                .build()
                .unwrap();
            assert_eq!(config.read_length(&bytes), expected, "width {}", width);
        }
    }

    #[test]
    fn test_read_length_honors_offset() {
        let bytes = [0xFF, 0xFF, 0x00, 0x2A];
        let config = LengthFieldConfig::builder()
            .length_field_offset(2)
            .length_field_length(2)
            .build()
            .unwrap();
        assert_eq!(config.read_length(&bytes), 42);
    }

    #[test]
    fn test_from_json_with_defaults() {
        let config =
            LengthFieldConfig::from_json(r#"{"max_frame_length": 512, "fail_fast": false}"#)
                .unwrap();
        assert_eq!(config.max_frame_length, 512);
        assert!(!config.fail_fast);
        assert_eq!(config.length_field_length, 4);
    }

    #[test]
    fn test_from_json_validates() {
        let result = LengthFieldConfig::from_json(r#"{"length_field_length": 3}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = LengthFieldConfig::builder()
            .length_field_offset(1)
            .length_field_length(2)
            .length_adjustment(1)
            .build()
            .unwrap();
        let json = serde_json::to_string(&config).unwrap();
        let back = LengthFieldConfig::from_json(&json).unwrap();
        assert_eq!(config, back);
    }
}
