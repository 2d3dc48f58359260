//! Error types for framewire.

use thiserror::Error;

/// Main error type for all framing operations.
#[derive(Debug, Error)]
pub enum FrameError {
    /// I/O error from the underlying transport.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error while loading decoder configuration.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid decoder/encoder configuration (programmer error, not data).
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Frame header values are self-inconsistent (negative length,
    /// adjusted length below header size, strip exceeds frame length).
    /// The offending bytes have already been skipped so decoding can
    /// resume on the next call.
    #[error("Corrupted frame: {0}")]
    CorruptedFrame(String),

    /// A frame's declared length exceeds the configured maximum.
    /// The decoder keeps making forward progress: the oversized frame is
    /// discarded and decoding resumes after it.
    #[error("Frame length {length} exceeds maximum {max}")]
    TooLongFrame {
        /// The computed (adjusted) frame length.
        length: u64,
        /// The configured `max_frame_length`.
        max: u64,
    },

    /// Connection closed mid-frame (EOF with unparsed bytes buffered).
    #[error("Connection closed")]
    ConnectionClosed,
}

/// Result type alias using FrameError.
pub type Result<T> = std::result::Result<T, FrameError>;
