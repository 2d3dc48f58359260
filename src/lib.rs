//! # framewire
//!
//! Length-field based framing for stream and datagram transports.
//!
//! Connections deliver raw byte buffers; this crate turns them into
//! discrete frames and back. The core is a stateful length-field frame
//! decoder that handles partial data, adversarial length fields and
//! oversized frames without ever corrupting its cursor state across calls.
//!
//! ## Architecture
//!
//! - **Stream mode**: a persistent `BytesMut` accumulates socket reads;
//!   [`LengthFieldDecoder`](codec::LengthFieldDecoder) extracts every
//!   complete frame and leaves a trailing partial frame buffered for the
//!   next call. Oversized frames are discarded through an explicit state
//!   machine with configurable error timing (fail-fast vs fail-slow).
//! - **Datagram mode**: each
//!   [`Datagram`](codec::Datagram) is a self-contained, address-tagged
//!   record; [`DatagramFrameDecoder`](codec::DatagramFrameDecoder) extracts
//!   its complete frames and drops a trailing partial one.
//!
//! ## Example
//!
//! ```
//! use bytes::BytesMut;
//! use framewire::codec::{LengthFieldConfig, LengthFieldDecoder};
//!
//! let config = LengthFieldConfig::builder()
//!     .max_frame_length(65536)
//!     .length_field_length(4)
//!     .initial_bytes_to_strip(4)
//!     .build()
//!     .unwrap();
//! let mut decoder = LengthFieldDecoder::new(config);
//!
//! // 4-byte big-endian length prefix, then the payload.
//! let mut buf = BytesMut::from(&[0, 0, 0, 5, b'h', b'e', b'l', b'l', b'o'][..]);
//! let frame = decoder.decode(&mut buf).unwrap().unwrap();
//! assert_eq!(&frame[..], b"hello");
//! ```

pub mod codec;
pub mod error;
pub mod transport;

pub use codec::{
    Datagram, DatagramFrameDecoder, LengthFieldConfig, LengthFieldDecoder, LengthFieldEncoder,
};
pub use error::{FrameError, Result};
pub use transport::{FramedReader, FramedWriter};
