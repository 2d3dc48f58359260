//! Framed adapters over async byte streams.
//!
//! [`FramedReader`] turns any `AsyncRead` into a sequence of decoded
//! frames, owning the accumulation buffer and the decoder for one
//! connection. [`FramedWriter`] is the matching write side.
//!
//! ```text
//! socket ─► read_buf ─► BytesMut ─► LengthFieldDecoder ─► Bytes frames
//! ```
//!
//! A decode error does not tear the reader down: the decoder has already
//! skipped the offending bytes, so the caller may report the error and keep
//! calling [`FramedReader::next_frame`].

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::codec::{LengthFieldConfig, LengthFieldDecoder, LengthFieldEncoder};
use crate::error::{FrameError, Result};

/// Initial capacity of the read accumulation buffer.
const READ_BUFFER_CAPACITY: usize = 64 * 1024;

/// Reads length-prefixed frames from an async byte stream.
pub struct FramedReader<R> {
    reader: R,
    decoder: LengthFieldDecoder,
    buffer: BytesMut,
}

impl<R: AsyncRead + Unpin> FramedReader<R> {
    /// Wrap a reader with a decoder built from `config`.
    pub fn new(reader: R, config: LengthFieldConfig) -> Self {
        Self {
            reader,
            decoder: LengthFieldDecoder::new(config),
            buffer: BytesMut::with_capacity(READ_BUFFER_CAPACITY),
        }
    }

    /// Read until the next complete frame is available.
    ///
    /// Returns:
    /// - `Ok(Some(frame))` for each decoded frame
    /// - `Ok(None)` on clean EOF (no buffered bytes left)
    /// - `Err(FrameError::ConnectionClosed)` on EOF mid-frame
    /// - any decode error; the stream has been resynchronized and
    ///   `next_frame` may be called again
    pub async fn next_frame(&mut self) -> Result<Option<Bytes>> {
        loop {
            if let Some(frame) = self.decoder.decode(&mut self.buffer)? {
                return Ok(Some(frame));
            }

            let n = self.reader.read_buf(&mut self.buffer).await?;
            if n == 0 {
                if self.buffer.is_empty() && !self.decoder.is_discarding() {
                    return Ok(None);
                }
                tracing::warn!(
                    buffered = self.buffer.len(),
                    "connection closed mid-frame"
                );
                return Err(FrameError::ConnectionClosed);
            }
        }
    }

    /// Number of bytes buffered but not yet decoded.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Consume the adapter, returning the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

/// Writes length-prefixed frames to an async byte stream.
pub struct FramedWriter<W> {
    writer: W,
    encoder: LengthFieldEncoder,
    buffer: BytesMut,
}

impl<W: AsyncWrite + Unpin> FramedWriter<W> {
    /// Wrap a writer with an encoder built from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::Config`] if the config is not encodable
    /// (nonzero `length_field_offset`).
    pub fn new(writer: W, config: LengthFieldConfig) -> Result<Self> {
        Ok(Self {
            writer,
            encoder: LengthFieldEncoder::new(config)?,
            buffer: BytesMut::new(),
        })
    }

    /// Encode `payload` as one frame, write it and flush.
    pub async fn send(&mut self, payload: &[u8]) -> Result<()> {
        self.encoder.encode(payload, &mut self.buffer)?;
        self.writer.write_all_buf(&mut self.buffer).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Flush and shut down the underlying writer.
    pub async fn shutdown(&mut self) -> Result<()> {
        self.writer.shutdown().await?;
        Ok(())
    }

    /// Consume the adapter, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stripped_config() -> LengthFieldConfig {
        LengthFieldConfig::builder()
            .max_frame_length(1024)
            .length_field_length(4)
            .initial_bytes_to_strip(4)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_reader_decodes_written_frames() {
        let (client, server) = tokio::io::duplex(256);
        let mut writer = FramedWriter::new(client, stripped_config()).unwrap();
        let mut reader = FramedReader::new(server, stripped_config());

        writer.send(b"hello").await.unwrap();
        writer.send(b"world").await.unwrap();

        let first = reader.next_frame().await.unwrap().unwrap();
        let second = reader.next_frame().await.unwrap().unwrap();
        assert_eq!(&first[..], b"hello");
        assert_eq!(&second[..], b"world");
    }

    #[tokio::test]
    async fn test_reader_clean_eof() {
        let (client, server) = tokio::io::duplex(256);
        let mut writer = FramedWriter::new(client, stripped_config()).unwrap();
        let mut reader = FramedReader::new(server, stripped_config());

        writer.send(b"bye").await.unwrap();
        writer.shutdown().await.unwrap();
        drop(writer);

        assert_eq!(&reader.next_frame().await.unwrap().unwrap()[..], b"bye");
        assert!(reader.next_frame().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reader_dirty_eof() {
        let (mut client, server) = tokio::io::duplex(256);
        let mut reader = FramedReader::new(server, stripped_config());

        // Header promising 100 payload bytes, then EOF.
        client.write_all(&100u32.to_be_bytes()).await.unwrap();
        client.shutdown().await.unwrap();
        drop(client);

        let err = reader.next_frame().await.unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }

    #[tokio::test]
    async fn test_reader_survives_oversized_frame() {
        let config = LengthFieldConfig::builder()
            .max_frame_length(8)
            .length_field_length(4)
            .initial_bytes_to_strip(4)
            .build()
            .unwrap();

        let (mut client, server) = tokio::io::duplex(1024);
        let mut reader = FramedReader::new(server, config);

        let mut bytes = 100u32.to_be_bytes().to_vec();
        bytes.extend_from_slice(&[0u8; 100]);
        bytes.extend_from_slice(&4u32.to_be_bytes());
        bytes.extend_from_slice(b"good");
        client.write_all(&bytes).await.unwrap();

        let err = reader.next_frame().await.unwrap_err();
        assert!(matches!(err, FrameError::TooLongFrame { .. }));

        let frame = reader.next_frame().await.unwrap().unwrap();
        assert_eq!(&frame[..], b"good");
    }
}
