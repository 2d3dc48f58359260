//! Stream-mode length-field frame decoder.
//!
//! Reconstructs discrete frames from an arbitrarily fragmented byte stream.
//! The caller owns a `BytesMut` that accumulates socket reads; the decoder
//! consumes complete frames from its front and leaves any trailing partial
//! frame untouched for the next call.
//!
//! A frame looks like this on the wire (offsets relative to frame start):
//!
//! ```text
//! ┌──────────────────────┬──────────────────────┬─────────────────┐
//! │ header bytes         │ length field (BE)    │ payload         │
//! │ 0..length_field_     │ ..length_field_      │ ..frame_length  │
//! │ offset               │ end_offset           │                 │
//! └──────────────────────┴──────────────────────┴─────────────────┘
//! ```
//!
//! where `frame_length = raw + length_adjustment + length_field_end_offset`.
//! The delivered frame is `[initial_bytes_to_strip..frame_length)`.
//!
//! # Example
//!
//! ```
//! use bytes::BytesMut;
//! use framewire::codec::{LengthFieldConfig, LengthFieldDecoder};
//!
//! let config = LengthFieldConfig::builder()
//!     .length_field_length(4)
//!     .initial_bytes_to_strip(4)
//!     .build()
//!     .unwrap();
//! let mut decoder = LengthFieldDecoder::new(config);
//!
//! let mut buf = BytesMut::from(&[0, 0, 0, 5, b'h', b'e', b'l', b'l', b'o'][..]);
//! let frame = decoder.decode(&mut buf).unwrap().unwrap();
//! assert_eq!(&frame[..], b"hello");
//! ```

use bytes::{Buf, Bytes, BytesMut};

use super::config::LengthFieldConfig;
use crate::error::{FrameError, Result};

/// Decoder state across calls.
///
/// The decoder never emits a frame while `Discarding`; `remaining` tracks
/// the skip in progress and `frame_length` is kept so the oversized length
/// can be reported once the discard completes (fail-slow mode).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    /// Normal parsing.
    Reading,
    /// Skipping the remainder of a frame that exceeded `max_frame_length`.
    Discarding { remaining: u64, frame_length: u64 },
}

/// Stateful stream-mode frame decoder, one instance per connection.
///
/// Callers serialize invocations per connection (`&mut self` enforces this
/// for a single instance); no operation blocks. "Need more data" is the
/// `Ok(None)` outcome, never an error.
///
/// Exactly one [`FrameError::TooLongFrame`] is reported per oversized frame:
/// at first detection with `fail_fast`, or once the whole oversized frame
/// has been skipped without it. Either way the decoder discards the frame
/// and resumes, so a single oversized frame can never wedge it.
#[derive(Debug)]
pub struct LengthFieldDecoder {
    config: LengthFieldConfig,
    state: DecodeState,
}

impl LengthFieldDecoder {
    /// Create a decoder from a validated config.
    pub fn new(config: LengthFieldConfig) -> Self {
        Self {
            config,
            state: DecodeState::Reading,
        }
    }

    /// Get the decoder's config.
    pub fn config(&self) -> &LengthFieldConfig {
        &self.config
    }

    /// Whether the decoder is currently skipping an oversized frame.
    pub fn is_discarding(&self) -> bool {
        matches!(self.state, DecodeState::Discarding { .. })
    }

    /// Attempt to extract a single frame from the front of `src`.
    ///
    /// Returns:
    /// - `Ok(Some(frame))` if a complete frame was extracted
    /// - `Ok(None)` if more data is needed (nothing consumed beyond what
    ///   the discard/resync rules require)
    /// - `Err(...)` for corrupted or oversized frames; the offending bytes
    ///   have been skipped and the decoder is ready for the next call
    pub fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Bytes>> {
        if let DecodeState::Discarding { .. } = self.state {
            if !self.resume_discard(src)? {
                return Ok(None);
            }
        }

        let end_offset = self.config.length_field_end_offset();
        if src.len() < end_offset {
            return Ok(None);
        }

        let raw = self.config.read_length(&src[..]);

        // Only an 8-byte field can carry a negative value; narrower widths
        // are zero-extended and always pass.
        if (raw as i64) < 0 {
            src.advance(end_offset);
            return Err(FrameError::CorruptedFrame(format!(
                "Negative length field: {}",
                raw as i64
            )));
        }

        let frame_length =
            raw as i128 + self.config.length_adjustment as i128 + end_offset as i128;
        if frame_length < end_offset as i128 {
            src.advance(end_offset);
            return Err(FrameError::CorruptedFrame(format!(
                "Adjusted frame length ({}) is below header size ({})",
                frame_length, end_offset
            )));
        }
        let frame_length = frame_length as u64;

        if frame_length > self.config.max_frame_length as u64 {
            return self.exceeded_frame_length(src, frame_length);
        }

        // Fits in usize: frame_length <= max_frame_length.
        let frame_length = frame_length as usize;
        if src.len() < frame_length {
            // Partial frame: consume nothing, resumable byte-for-byte.
            return Ok(None);
        }

        let strip = self.config.initial_bytes_to_strip;
        if strip > frame_length {
            src.advance(frame_length);
            return Err(FrameError::CorruptedFrame(format!(
                "Strip length ({}) exceeds frame length ({})",
                strip, frame_length
            )));
        }

        src.advance(strip);
        Ok(Some(src.split_to(frame_length - strip).freeze()))
    }

    /// Extract every currently complete frame from `src` into `out`.
    ///
    /// Frames appended before an error survive the `Err` return; the caller
    /// may report the error and call again once more bytes arrive.
    pub fn decode_into(&mut self, src: &mut BytesMut, out: &mut Vec<Bytes>) -> Result<()> {
        while let Some(frame) = self.decode(src)? {
            out.push(frame);
        }
        Ok(())
    }

    /// Handle a frame whose adjusted length exceeds `max_frame_length`.
    ///
    /// If the whole oversized frame is already buffered it is skipped in
    /// one go and reported. Otherwise everything available is skipped and
    /// the decoder enters discard mode; with `fail_fast` the error is
    /// reported now and the remaining discard proceeds silently, without it
    /// the error waits until the discard completes.
    fn exceeded_frame_length(
        &mut self,
        src: &mut BytesMut,
        frame_length: u64,
    ) -> Result<Option<Bytes>> {
        let readable = src.len() as u64;

        if frame_length < readable {
            src.advance(frame_length as usize);
            return Err(self.too_long(frame_length));
        }

        let remaining = frame_length - readable;
        src.advance(src.len());

        if remaining == 0 {
            return Err(self.too_long(frame_length));
        }

        self.state = DecodeState::Discarding {
            remaining,
            frame_length,
        };
        if self.config.fail_fast {
            return Err(self.too_long(frame_length));
        }
        Ok(None)
    }

    /// Skip buffered bytes belonging to an oversized frame.
    ///
    /// Returns `Ok(true)` once the discard is complete and normal parsing
    /// may resume within this call. Returns the deferred too-long-frame
    /// error on completion when `fail_fast` is off (it was already reported
    /// at detection otherwise).
    fn resume_discard(&mut self, src: &mut BytesMut) -> Result<bool> {
        let DecodeState::Discarding {
            remaining,
            frame_length,
        } = self.state
        else {
            return Ok(true);
        };

        let skip = remaining.min(src.len() as u64);
        src.advance(skip as usize);
        let remaining = remaining - skip;

        if remaining > 0 {
            self.state = DecodeState::Discarding {
                remaining,
                frame_length,
            };
            return Ok(false);
        }

        self.state = DecodeState::Reading;
        if !self.config.fail_fast {
            return Err(self.too_long(frame_length));
        }
        Ok(true)
    }

    fn too_long(&self, frame_length: u64) -> FrameError {
        FrameError::TooLongFrame {
            length: frame_length,
            max: self.config.max_frame_length as u64,
        }
    }
}
