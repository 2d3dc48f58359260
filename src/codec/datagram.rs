//! Datagram-mode frame decoding.
//!
//! A [`Datagram`] is one received packet: an immutable, address-tagged byte
//! block. Unlike stream mode there is no persistent buffer and no discard
//! state machine: every record is a self-contained unit assumed to hold
//! one or more complete frames. A trailing partial frame is dropped, never
//! carried over to the next record.
//!
//! The raw length field value is used as-is in this mode; no
//! `length_adjustment` is applied.
//!
//! # Example
//!
//! ```
//! use bytes::Bytes;
//! use framewire::codec::{Datagram, DatagramFrameDecoder, LengthFieldConfig};
//!
//! let config = LengthFieldConfig::builder()
//!     .length_field_length(2)
//!     .build()
//!     .unwrap();
//! let decoder = DatagramFrameDecoder::new(config);
//!
//! let addr = "127.0.0.1:9000".parse().unwrap();
//! let record = Datagram::new(Bytes::from_static(&[0, 2, 0xAA, 0xBB]), addr);
//! let frames = decoder.decode(&record).unwrap();
//! assert_eq!(frames.len(), 1);
//! assert_eq!(&frames[0].data()[..], &[0xAA, 0xBB]);
//! ```

use std::net::SocketAddr;

use bytes::Bytes;

use super::config::LengthFieldConfig;
use crate::error::{FrameError, Result};

/// One received packet: immutable payload plus sender address.
///
/// Extracted frames are returned as new `Datagram` values tagged with the
/// sender of the record they came from. `Bytes` makes the sub-range
/// extraction cheap while keeping each frame independently owned.
#[derive(Debug, Clone)]
pub struct Datagram {
    data: Bytes,
    addr: SocketAddr,
}

impl Datagram {
    /// Create a record from its payload and sender address.
    pub fn new(data: Bytes, addr: SocketAddr) -> Self {
        Self { data, addr }
    }

    /// The raw bytes of this record.
    #[inline]
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// The sender address.
    #[inline]
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// The record length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the record is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Stateless datagram-mode frame decoder.
///
/// Shares the length-field arithmetic with the stream decoder through
/// [`LengthFieldConfig`], but resolves oversized and trailing-partial
/// frames within a single call since records are independent units.
#[derive(Debug)]
pub struct DatagramFrameDecoder {
    config: LengthFieldConfig,
}

impl DatagramFrameDecoder {
    /// Create a decoder from a validated config.
    pub fn new(config: LengthFieldConfig) -> Self {
        Self { config }
    }

    /// Get the decoder's config.
    pub fn config(&self) -> &LengthFieldConfig {
        &self.config
    }

    /// Extract every complete frame from one record.
    ///
    /// The local cursor starts at 0 and is not persisted across records; a
    /// trailing partial frame is dropped. An over-limit raw length is fatal
    /// to the call with `fail_fast`, and silently ends it otherwise.
    pub fn decode(&self, datagram: &Datagram) -> Result<Vec<Datagram>> {
        let mut frames = Vec::new();
        let mut offset = 0;

        while let Some((frame, next)) = self.decode_one(datagram, offset)? {
            frames.push(frame);
            offset = next;
        }

        Ok(frames)
    }

    /// Attempt to extract one frame starting at `offset`.
    ///
    /// Returns the frame and the offset just past its consumed region, or
    /// `None` once no further complete frame fits in the record.
    fn decode_one(&self, datagram: &Datagram, offset: usize) -> Result<Option<(Datagram, usize)>> {
        let data = datagram.data();
        let end_offset = self.config.length_field_end_offset();

        // Not enough room left for another header.
        if data.len() - offset < end_offset {
            return Ok(None);
        }

        let raw = self.config.read_length(&data[offset..]);

        if raw > self.config.max_frame_length as u64 {
            if self.config.fail_fast {
                return Err(FrameError::TooLongFrame {
                    length: raw,
                    max: self.config.max_frame_length as u64,
                });
            }
            // Drop the remainder of the record; the next one starts fresh.
            return Ok(None);
        }
        let frame_length = raw as usize;

        let field_end = offset + end_offset;
        if data.len() - field_end < frame_length {
            // Partial frame at the end of the record: dropped, not retried.
            return Ok(None);
        }

        let strip = self.config.initial_bytes_to_strip;
        if strip > frame_length {
            return Err(FrameError::CorruptedFrame(format!(
                "Strip length ({}) exceeds frame length ({})",
                strip, frame_length
            )));
        }

        let frame = data.slice(field_end + strip..field_end + frame_length);
        Ok(Some((
            Datagram::new(frame, datagram.addr()),
            field_end + frame_length,
        )))
    }
}
