//! Frame processor: drives a byte source through the deframer
//!
//! The processor owns the [`ByteSource`] and a [`Deframer`]. It asks the
//! source for more bytes only when the buffered data cannot yield another
//! frame, and awaits between requests. Decode errors are absorbed by the
//! deframer; a transport error ends the stream.
//!
//! Four ways to consume frames:
//!
//! - [`FrameProcessor::next_frame`] - pull one frame at a time
//! - [`FrameProcessor::into_stream`] - a `Stream` of `Result<FrameRecord>`
//! - [`FrameProcessor::subscribe`] - invoke a callback per frame
//! - [`FrameProcessor::spawn`] - run on a tokio task and receive [`FrameEvents`]

use futures::Stream;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace};

use crate::Result;
use crate::config::ProcessorConfig;
use crate::deframer::{DeframeStats, Deframer};
use crate::source::ByteSource;
use crate::stream::{FrameEvent, FrameEvents};
use crate::types::{FrameRecord, ProcessorState};

/// Orchestrates reading, synchronization and decoding for one byte source
#[derive(Debug)]
pub struct FrameProcessor<S> {
    source: S,
    deframer: Deframer,
    config: ProcessorConfig,
    state: ProcessorState,
    chunks: u64,
}

impl<S> FrameProcessor<S>
where
    S: ByteSource,
{
    /// Create a processor with default thresholds
    pub fn new(source: S) -> Self {
        let config = ProcessorConfig::default();
        Self {
            source,
            deframer: Deframer::new(config.deframer.clone()),
            config,
            state: ProcessorState::AwaitingData,
            chunks: 0,
        }
    }

    /// Create a processor with validated configuration
    pub fn with_config(source: S, config: ProcessorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            source,
            deframer: Deframer::new(config.deframer.clone()),
            config,
            state: ProcessorState::AwaitingData,
            chunks: 0,
        })
    }

    pub fn state(&self) -> ProcessorState {
        self.state
    }

    pub fn stats(&self) -> &DeframeStats {
        self.deframer.stats()
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Get the next decoded frame
    ///
    /// Returns:
    /// - `Ok(Some(frame))` - A frame was decoded
    /// - `Ok(None)` - The source completed (or had already terminated)
    /// - `Err(e)` - The source failed; buffered bytes were discarded
    pub async fn next_frame(&mut self) -> Result<Option<FrameRecord>> {
        loop {
            if self.state.is_terminal() {
                return Ok(None);
            }

            if let Some(frame) = self.deframer.poll_frame() {
                self.state = self.deframer.state();
                return Ok(Some(frame));
            }

            self.state = ProcessorState::AwaitingData;
            match self.source.next_chunk().await {
                Ok(Some(chunk)) => {
                    self.chunks += 1;
                    trace!("Chunk {}: {} bytes", self.chunks, chunk.len());
                    self.deframer.feed(&chunk);
                    self.state = self.deframer.state();
                }
                Ok(None) => {
                    let tail = self.deframer.finish();
                    self.state = ProcessorState::Completed;
                    let stats = self.deframer.stats();
                    info!(
                        "Byte source completed after {} chunks: {} frames ({} bad checks, {} truncated, {} ambiguous)",
                        self.chunks,
                        stats.frames,
                        stats.checksum_mismatches,
                        stats.truncated,
                        stats.ambiguous
                    );
                    return Ok(tail);
                }
                Err(e) => {
                    error!("Byte source failed after {} chunks: {}", self.chunks, e);
                    if self.deframer.buffered() > 0 {
                        debug!("Discarding {} buffered bytes", self.deframer.buffered());
                    }
                    self.deframer.reset();
                    self.state = ProcessorState::Failed;
                    return Err(e);
                }
            }
        }
    }

    /// Consume the processor as a stream of frames
    ///
    /// The stream yields at most one error, after which it ends.
    pub fn into_stream(self) -> impl Stream<Item = Result<FrameRecord>> + Send + 'static {
        futures::stream::unfold(Some(self), |processor| async move {
            let mut processor = processor?;
            match processor.next_frame().await {
                Ok(Some(frame)) => Some((Ok(frame), Some(processor))),
                Ok(None) => None,
                Err(e) => Some((Err(e), None)),
            }
        })
    }

    /// Run to completion, handing each frame to `on_frame`
    ///
    /// Returns the number of frames delivered, or the transport error.
    pub async fn subscribe<F>(mut self, mut on_frame: F) -> Result<u64>
    where
        F: FnMut(FrameRecord),
    {
        let mut delivered = 0;
        while let Some(frame) = self.next_frame().await? {
            delivered += 1;
            on_frame(frame);
        }
        Ok(delivered)
    }

    /// Spawn the processor on the current tokio runtime
    ///
    /// Frames are delivered through a bounded channel of `event_capacity`
    /// events, so a slow consumer pauses reading from the source. Dropping
    /// the returned [`FrameEvents`] cancels the task.
    pub fn spawn(self) -> FrameEvents {
        let (tx, rx) = mpsc::channel(self.config.event_capacity);
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();

        tokio::spawn(async move {
            self.run_task(tx, task_cancel).await;
        });

        FrameEvents::new(rx, cancel)
    }

    async fn run_task(mut self, tx: mpsc::Sender<FrameEvent>, cancel: CancellationToken) {
        info!("Frame processor task started");

        loop {
            let result = tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Frame processor cancelled");
                    break;
                }
                result = self.next_frame() => result,
            };

            let event = match result {
                Ok(Some(frame)) => FrameEvent::Frame(frame),
                Ok(None) => FrameEvent::Completed,
                Err(e) => FrameEvent::Failed(e),
            };
            let terminal = !matches!(event, FrameEvent::Frame(_));

            if tx.send(event).await.is_err() {
                debug!("Event receiver dropped, shutting down");
                break;
            }
            if terminal {
                break;
            }
        }

        info!("Frame processor task ended ({} frames, state {})", self.stats().frames, self.state);
    }
}
