//! Chunk sources and delta streams
//!
//! A [`ChunkSource`] hands out transport chunks one at a time. Wrapping one
//! in a delta stream turns it into a pull-based sequence of decoded events
//! that stops at the sentinel, at end of input, or when the consumer cancels.

use super::accumulator::Accumulator;
use super::frame::{DecoderState, FrameDecoder, FrameResult, StreamProtocol, Termination};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

/// Producer of raw transport chunks
#[async_trait]
pub trait ChunkSource: Send {
    /// The next chunk, or `None` once the transport is exhausted
    async fn next_chunk(&mut self) -> Option<Vec<u8>>;
}

#[async_trait]
impl ChunkSource for mpsc::Receiver<Vec<u8>> {
    async fn next_chunk(&mut self) -> Option<Vec<u8>> {
        self.recv().await
    }
}

/// Chunk source over an in-memory sequence of chunks
#[derive(Debug)]
pub struct IterSource<I> {
    chunks: I,
}

impl<I: Iterator> IterSource<I> {
    pub fn new<T>(chunks: T) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        Self {
            chunks: chunks.into_iter(),
        }
    }
}

#[async_trait]
impl<I> ChunkSource for IterSource<I>
where
    I: Iterator + Send,
    I::Item: Into<Vec<u8>>,
{
    async fn next_chunk(&mut self) -> Option<Vec<u8>> {
        self.chunks.next().map(Into::into)
    }
}

/// Cancellation token shared between a stream consumer and its reader
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: Arc<watch::Sender<bool>>,
}

impl CancellationToken {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            cancelled: Arc::new(sender),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.borrow()
    }

    /// Resolves once [`cancel`](Self::cancel) has been called on any clone
    pub async fn cancelled(&self) {
        let mut receiver = self.cancelled.subscribe();
        // The sender lives in `self`, so waiting cannot fail.
        let _ = receiver.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Blocking delta stream over an iterator of chunks
///
/// Chunks are pulled only when no decoded event is pending, and none are
/// pulled after the sentinel.
///
/// ```rust
/// use tmdl_er_sdk::stream::{DeltaStream, StreamEvent, StreamProtocol};
///
/// let chunks = [
///     "data: {\"choices\":[{\"delta\":{\"content\":\"Hi\"}}]}\n",
///     "data: [DONE]\n",
/// ];
/// let events: Vec<_> = DeltaStream::new(chunks.iter(), StreamProtocol::default()).collect();
///
/// assert_eq!(events, vec![Ok(StreamEvent::Delta("Hi".to_string()))]);
/// ```
#[derive(Debug)]
pub struct DeltaStream<I> {
    chunks: I,
    decoder: FrameDecoder,
}

impl<I> DeltaStream<I>
where
    I: Iterator,
    I::Item: AsRef<[u8]>,
{
    pub fn new(chunks: I, protocol: StreamProtocol) -> Self {
        Self {
            chunks,
            decoder: FrameDecoder::new(protocol),
        }
    }

    pub fn state(&self) -> DecoderState {
        self.decoder.state()
    }
}

impl<I> Iterator for DeltaStream<I>
where
    I: Iterator,
    I::Item: AsRef<[u8]>,
{
    type Item = FrameResult;

    fn next(&mut self) -> Option<FrameResult> {
        loop {
            if let Some(event) = self.decoder.next_event() {
                return Some(event);
            }
            if self.decoder.is_done() {
                return None;
            }
            match self.chunks.next() {
                Some(chunk) => self.decoder.feed(chunk.as_ref()),
                None => self.decoder.finish(),
            }
        }
    }
}

/// Cancellable delta stream over a [`ChunkSource`]
#[derive(Debug)]
pub struct AsyncDeltaStream<S> {
    source: S,
    decoder: FrameDecoder,
    cancel: CancellationToken,
    cancelled: bool,
}

impl<S: ChunkSource> AsyncDeltaStream<S> {
    pub fn new(source: S, protocol: StreamProtocol, cancel: CancellationToken) -> Self {
        Self {
            source,
            decoder: FrameDecoder::new(protocol),
            cancel,
            cancelled: false,
        }
    }

    /// The next decoded event
    ///
    /// Returns `None` once the stream is done or cancelled. A pending read
    /// on the source is abandoned as soon as the token is cancelled.
    pub async fn next(&mut self) -> Option<FrameResult> {
        loop {
            if self.cancelled {
                return None;
            }
            if self.cancel.is_cancelled() {
                self.mark_cancelled();
                return None;
            }
            if let Some(event) = self.decoder.next_event() {
                return Some(event);
            }
            if self.decoder.is_done() {
                return None;
            }

            let cancel = &self.cancel;
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                chunk = self.source.next_chunk() => Some(chunk),
            };
            match next {
                None => {
                    self.mark_cancelled();
                    return None;
                }
                Some(Some(chunk)) => self.decoder.feed(&chunk),
                Some(None) => self.decoder.finish(),
            }
        }
    }

    pub fn state(&self) -> DecoderState {
        self.decoder.state()
    }

    pub fn was_cancelled(&self) -> bool {
        self.cancelled
    }

    fn mark_cancelled(&mut self) {
        debug!(
            "Stream cancelled after {} frames, {} events dropped",
            self.decoder.frames(),
            self.decoder.pending_events()
        );
        self.cancelled = true;
    }
}

/// How a collected stream ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The sentinel arrived
    Done,
    /// The source ran dry without a sentinel
    Exhausted,
    /// The consumer cancelled
    Cancelled,
}

/// Result of [`collect`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub accumulator: Accumulator,
    pub outcome: Outcome,
}

impl Completion {
    pub fn text(&self) -> String {
        self.accumulator.text()
    }
}

/// Drain `source`, reporting each fragment to `on_delta` as it arrives
///
/// Malformed frames end up in the accumulator's warnings. Cancelling `cancel`
/// stops the read loop; whatever was received until then is kept.
pub async fn collect<S, F>(
    source: S,
    protocol: StreamProtocol,
    cancel: &CancellationToken,
    mut on_delta: F,
) -> Completion
where
    S: ChunkSource,
    F: FnMut(&str),
{
    let mut stream = AsyncDeltaStream::new(source, protocol, cancel.clone());
    let mut accumulator = Accumulator::new();

    while let Some(item) = stream.next().await {
        if let Some(fragment) = accumulator.record(item) {
            on_delta(fragment);
        }
    }

    let outcome = if stream.was_cancelled() {
        Outcome::Cancelled
    } else if stream.state() == DecoderState::Done(Termination::Sentinel) {
        Outcome::Done
    } else {
        Outcome::Exhausted
    };

    info!(
        "Stream {:?}: {} fragments, {} malformed frames",
        outcome,
        accumulator.fragments().len(),
        accumulator.warnings().len()
    );
    Completion {
        accumulator,
        outcome,
    }
}
