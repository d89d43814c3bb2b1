//! Stream frame decoding
//!
//! A streaming chat-completion response is a sequence of newline-delimited
//! frames:
//!
//! ```text
//! data: {"choices":[{"delta":{"content":"Hel"}}]}
//! data: {"choices":[{"delta":{"content":"lo"}}]}
//! : keep-alive
//! data: [DONE]
//! ```
//!
//! Transport chunks do not respect frame or character boundaries, so the
//! decoder carries incomplete bytes over to the next [`FrameDecoder::feed`].
//! Lines are only decoded once their terminating newline has arrived, which
//! also keeps multi-byte characters split across chunks intact.

use super::error::FrameError;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, trace, warn};

/// Protocol constants recognized by the decoder
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StreamProtocol {
    /// Prefix marking a data line; the remainder is trimmed before use
    pub data_prefix: String,
    /// Payload marking the end of the stream
    pub sentinel: String,
}

impl Default for StreamProtocol {
    fn default() -> Self {
        Self {
            data_prefix: "data:".to_string(),
            sentinel: "[DONE]".to_string(),
        }
    }
}

impl StreamProtocol {
    pub fn new(data_prefix: impl Into<String>, sentinel: impl Into<String>) -> Self {
        Self {
            data_prefix: data_prefix.into(),
            sentinel: sentinel.into(),
        }
    }
}

/// How a finished stream ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The sentinel frame arrived
    Sentinel,
    /// Input ran out without a sentinel
    EndOfInput,
}

/// Decoder state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderState {
    Streaming,
    Done(Termination),
}

/// Token accounting reported by the final frame of a stream
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

/// A decoded item of the stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Incremental text of the first choice
    Delta(String),
    /// Usage statistics
    Usage(Usage),
}

/// Outcome of decoding one frame
pub type FrameResult = Result<StreamEvent, FrameError>;

#[derive(Debug, Deserialize)]
struct ChunkPayload {
    #[serde(default)]
    choices: Option<Vec<ChoicePayload>>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ChoicePayload {
    #[serde(default)]
    delta: Option<DeltaPayload>,
}

#[derive(Debug, Deserialize)]
struct DeltaPayload {
    #[serde(default)]
    content: Option<String>,
}

/// Incremental decoder from byte chunks to [`StreamEvent`]s
///
/// Decoded events queue up inside the decoder and are taken with
/// [`next_event`](Self::next_event). Once the sentinel is seen the decoder
/// is done and ignores further input, including the rest of the chunk that
/// carried the sentinel.
#[derive(Debug)]
pub struct FrameDecoder {
    protocol: StreamProtocol,
    state: DecoderState,
    carry: Vec<u8>,
    events: VecDeque<FrameResult>,
    frames: usize,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new(StreamProtocol::default())
    }
}

impl FrameDecoder {
    pub fn new(protocol: StreamProtocol) -> Self {
        Self {
            protocol,
            state: DecoderState::Streaming,
            carry: Vec::new(),
            events: VecDeque::new(),
            frames: 0,
        }
    }

    pub fn protocol(&self) -> &StreamProtocol {
        &self.protocol
    }

    pub fn state(&self) -> DecoderState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        matches!(self.state, DecoderState::Done(_))
    }

    /// Number of data frames parsed so far
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Decode every complete line of `chunk`, keeping the incomplete tail
    pub fn feed(&mut self, chunk: &[u8]) {
        if self.is_done() {
            trace!("Ignoring {} bytes after end of stream", chunk.len());
            return;
        }

        // Carried bytes were already searched for a newline.
        let mut search_from = self.carry.len();
        self.carry.extend_from_slice(chunk);
        let mut buffer = std::mem::take(&mut self.carry);
        let mut consumed = 0;

        while let Some(offset) = buffer[search_from..].iter().position(|&b| b == b'\n') {
            let line_end = search_from + offset;
            self.decode_line(&buffer[consumed..line_end]);
            consumed = line_end + 1;
            search_from = consumed;
            if self.is_done() {
                return;
            }
        }

        buffer.drain(..consumed);
        self.carry = buffer;
    }

    /// Signal the end of input
    ///
    /// A trailing line without a newline is decoded, then the decoder is
    /// done. Calling `finish` after the sentinel has no effect.
    pub fn finish(&mut self) {
        if self.is_done() {
            return;
        }
        let tail = std::mem::take(&mut self.carry);
        if !tail.is_empty() {
            self.decode_line(&tail);
        }
        if !self.is_done() {
            debug!("Stream ended without sentinel after {} frames", self.frames);
            self.state = DecoderState::Done(Termination::EndOfInput);
        }
    }

    /// Take the oldest decoded event
    pub fn next_event(&mut self) -> Option<FrameResult> {
        self.events.pop_front()
    }

    /// Number of decoded events not yet taken
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    fn decode_line(&mut self, raw: &[u8]) {
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        let Some(rest) = raw.strip_prefix(self.protocol.data_prefix.as_bytes()) else {
            if !raw.is_empty() {
                trace!("Ignoring non-data line of {} bytes", raw.len());
            }
            return;
        };

        let payload = match std::str::from_utf8(rest) {
            Ok(text) => text.trim(),
            Err(_) => {
                warn!("Skipping frame that is not valid UTF-8 ({} bytes)", raw.len());
                self.events
                    .push_back(Err(FrameError::InvalidUtf8 { len: raw.len() }));
                return;
            }
        };

        if payload == self.protocol.sentinel {
            debug!("Stream sentinel received after {} frames", self.frames);
            self.state = DecoderState::Done(Termination::Sentinel);
            self.carry.clear();
            return;
        }
        if payload.is_empty() {
            return;
        }

        match serde_json::from_str::<ChunkPayload>(payload) {
            Ok(chunk) => {
                self.frames += 1;
                let content = chunk
                    .choices
                    .and_then(|choices| choices.into_iter().next())
                    .and_then(|choice| choice.delta)
                    .and_then(|delta| delta.content);
                if let Some(content) = content {
                    self.events.push_back(Ok(StreamEvent::Delta(content)));
                }
                if let Some(usage) = chunk.usage {
                    self.events.push_back(Ok(StreamEvent::Usage(usage)));
                }
            }
            Err(e) => {
                warn!("Skipping malformed frame: {}", e);
                self.events.push_back(Err(FrameError::MalformedJson {
                    payload: payload.to_string(),
                    message: e.to_string(),
                }));
            }
        }
    }
}
