//! Error types for stream decoding

use thiserror::Error;

/// A recoverable problem with a single frame; decoding continues with the
/// next frame
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// The data payload is not a JSON object of the expected shape
    #[error("Malformed JSON frame: {message}")]
    MalformedJson {
        /// Payload text after the data prefix
        payload: String,
        message: String,
    },

    /// A completed line is not valid UTF-8
    #[error("Frame of {len} bytes is not valid UTF-8")]
    InvalidUtf8 { len: usize },
}

impl FrameError {
    /// The frame payload, when one was decoded
    pub fn payload(&self) -> Option<&str> {
        match self {
            FrameError::MalformedJson { payload, .. } => Some(payload),
            FrameError::InvalidUtf8 { .. } => None,
        }
    }
}
