//! Transport module - framed adapters over async byte streams.
//!
//! Wraps any `AsyncRead`/`AsyncWrite` pair with the length-field codecs so
//! callers work with whole frames instead of raw reads.

mod framed;

pub use framed::{FramedReader, FramedWriter};
