//! Codec module - length-field based framing.
//!
//! This module provides the frame codecs:
//!
//! - [`LengthFieldConfig`] - where the length field sits and how it maps to
//!   the frame size
//! - [`LengthFieldDecoder`] - stateful stream-mode decoder (persistent
//!   buffer, discard state machine)
//! - [`DatagramFrameDecoder`] - stateless datagram-mode decoder
//!   (self-contained records)
//! - [`LengthFieldEncoder`] - length-prefix writer
//!
//! # Design
//!
//! Both decoding modes share the length-field arithmetic through
//! [`LengthFieldConfig`], so `length_field_offset` and the field width are
//! interpreted exactly once. They differ in continuation semantics: stream
//! mode suspends on partial data and resumes byte-for-byte, datagram mode
//! drops a trailing partial frame because records are independent units.

mod config;
mod datagram;
mod encoder;
mod length_field;

pub use config::{
    LengthFieldConfig, LengthFieldConfigBuilder, DEFAULT_LENGTH_FIELD_LENGTH,
    DEFAULT_MAX_FRAME_LENGTH,
};
pub use datagram::{Datagram, DatagramFrameDecoder};
pub use encoder::LengthFieldEncoder;
pub use length_field::LengthFieldDecoder;
