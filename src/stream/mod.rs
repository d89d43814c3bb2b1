//! Streaming completion decoding
//!
//! Turns the raw byte chunks of a streamed chat-completion response into
//! text deltas:
//!
//! - [`FrameDecoder`]: incremental, push-based frame decoder
//! - [`DeltaStream`] / [`AsyncDeltaStream`]: pull-based streams over chunk sources
//! - [`Accumulator`]: ordered fragments plus malformed-frame warnings
//! - [`collect`]: drain a source with a per-fragment callback and cancellation

pub mod accumulator;
pub mod error;
pub mod frame;
pub mod source;

pub use accumulator::{Accumulating, Accumulator};
pub use error::FrameError;
pub use frame::{
    DecoderState, FrameDecoder, FrameResult, StreamEvent, StreamProtocol, Termination, Usage,
};
pub use source::{
    collect, AsyncDeltaStream, CancellationToken, ChunkSource, Completion, DeltaStream,
    IterSource, Outcome,
};
