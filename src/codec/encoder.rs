//! Length-prefix frame encoder.
//!
//! The write-side counterpart of [`LengthFieldDecoder`]: prepends a
//! big-endian length field of the configured width to each payload. The
//! field value is `payload.len() + length_adjustment`, so the same config
//! describes both directions of a connection (for layouts where the field
//! counts more or less than the bare payload).
//!
//! [`LengthFieldDecoder`]: super::LengthFieldDecoder
//!
//! # Example
//!
//! ```
//! use bytes::BytesMut;
//! use framewire::codec::{LengthFieldConfig, LengthFieldEncoder};
//!
//! let config = LengthFieldConfig::builder()
//!     .length_field_length(2)
//!     .build()
//!     .unwrap();
//! let encoder = LengthFieldEncoder::new(config).unwrap();
//!
//! let mut dst = BytesMut::new();
//! encoder.encode(b"hi", &mut dst).unwrap();
//! assert_eq!(&dst[..], &[0, 2, b'h', b'i']);
//! ```

use bytes::{BufMut, BytesMut};

use super::config::LengthFieldConfig;
use crate::error::{FrameError, Result};

/// Stateless length-prefix encoder.
#[derive(Debug)]
pub struct LengthFieldEncoder {
    config: LengthFieldConfig,
}

impl LengthFieldEncoder {
    /// Create an encoder from a validated config.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::Config`] if `length_field_offset` is nonzero:
    /// prefixing always writes the length field first, so layouts with
    /// leading header bytes belong to the caller.
    pub fn new(config: LengthFieldConfig) -> Result<Self> {
        if config.length_field_offset != 0 {
            return Err(FrameError::Config(
                "Encoder requires length_field_offset == 0".to_string(),
            ));
        }
        Ok(Self { config })
    }

    /// Get the encoder's config.
    pub fn config(&self) -> &LengthFieldConfig {
        &self.config
    }

    /// Append one length-prefixed frame to `dst`.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::TooLongFrame`] if the payload exceeds
    /// `max_frame_length`, and [`FrameError::Config`] if the adjusted
    /// length is negative or does not fit the configured field width.
    pub fn encode(&self, payload: &[u8], dst: &mut BytesMut) -> Result<()> {
        if payload.len() > self.config.max_frame_length {
            return Err(FrameError::TooLongFrame {
                length: payload.len() as u64,
                max: self.config.max_frame_length as u64,
            });
        }

        let value = payload.len() as i128 + self.config.length_adjustment as i128;
        if value < 0 {
            return Err(FrameError::Config(format!(
                "Adjusted length field value is negative: {}",
                value
            )));
        }

        let width = self.config.length_field_length;
        let max_value = if width >= 8 {
            u64::MAX as i128
        } else {
            (1i128 << (width * 8)) - 1
        };
        if value > max_value {
            return Err(FrameError::Config(format!(
                "Length {} does not fit in a {}-byte field",
                value, width
            )));
        }

        dst.reserve(width + payload.len());
        dst.put_uint(value as u64, width);
        dst.put_slice(payload);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::LengthFieldDecoder;

    fn encoder(width: usize, adjustment: isize) -> LengthFieldEncoder {
        let config = LengthFieldConfig::builder()
            .max_frame_length(1024)
            .length_field_length(width)
            .length_adjustment(adjustment)
            .build()
            .unwrap();
        LengthFieldEncoder::new(config).unwrap()
    }

    #[test]
    fn test_encode_prefixes_length() {
        let mut dst = BytesMut::new();
        encoder(4, 0).encode(b"hello", &mut dst).unwrap();
        assert_eq!(&dst[..], &[0, 0, 0, 5, b'h', b'e', b'l', b'l', b'o']);
    }

    #[test]
    fn test_encode_applies_adjustment() {
        // Field counts the whole frame including itself.
        let mut dst = BytesMut::new();
        encoder(2, 2).encode(b"abc", &mut dst).unwrap();
        assert_eq!(&dst[..], &[0, 5, b'a', b'b', b'c']);
    }

    #[test]
    fn test_encode_rejects_field_overflow() {
        let mut dst = BytesMut::new();
        let payload = vec![0u8; 300];
        let err = encoder(1, 0).encode(&payload, &mut dst).unwrap_err();
        assert!(matches!(err, FrameError::Config(_)));
        assert!(err.to_string().contains("does not fit"));
    }

    #[test]
    fn test_encode_rejects_oversized_payload() {
        let config = LengthFieldConfig::builder()
            .max_frame_length(4)
            .length_field_length(4)
            .build()
            .unwrap();
        let encoder = LengthFieldEncoder::new(config).unwrap();

        let mut dst = BytesMut::new();
        let err = encoder.encode(b"too big", &mut dst).unwrap_err();
        assert!(matches!(err, FrameError::TooLongFrame { length: 7, max: 4 }));
    }

    #[test]
    fn test_encode_rejects_negative_adjusted_value() {
        let mut dst = BytesMut::new();
        let err = encoder(4, -10).encode(b"abc", &mut dst).unwrap_err();
        assert!(matches!(err, FrameError::Config(_)));
    }

    #[test]
    fn test_encoder_rejects_nonzero_offset() {
        let config = LengthFieldConfig::builder()
            .length_field_offset(2)
            .build()
            .unwrap();
        assert!(matches!(
            LengthFieldEncoder::new(config),
            Err(FrameError::Config(_))
        ));
    }

    #[test]
    fn test_roundtrip_through_decoder() {
        let config = LengthFieldConfig::builder()
            .max_frame_length(1024)
            .length_field_length(4)
            .initial_bytes_to_strip(4)
            .build()
            .unwrap();
        let encoder = LengthFieldEncoder::new(config.clone()).unwrap();
        let mut decoder = LengthFieldDecoder::new(config);

        let mut wire = BytesMut::new();
        encoder.encode(b"first", &mut wire).unwrap();
        encoder.encode(b"second", &mut wire).unwrap();

        let mut frames = Vec::new();
        decoder.decode_into(&mut wire, &mut frames).unwrap();

        assert_eq!(frames.len(), 2);
        assert_eq!(&frames[0][..], b"first");
        assert_eq!(&frames[1][..], b"second");
    }
}
