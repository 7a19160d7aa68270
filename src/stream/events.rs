//! Event channel between a spawned processor task and its consumer

use futures::{Stream, StreamExt, ready};
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::Result;
use crate::StreamError;
use crate::types::FrameRecord;

/// Notification sent by a spawned processor
#[derive(Debug)]
pub enum FrameEvent {
    /// A decoded frame
    Frame(FrameRecord),
    /// The source ended; no further events follow
    Completed,
    /// The source failed; no further events follow
    Failed(StreamError),
}

pin_project! {
    /// Receiving half of a spawned processor
    ///
    /// Yields `Ok(frame)` for each frame, then ends after completion. A source
    /// failure, or a task that stops without a final event and was not
    /// cancelled, yields a single `Err` instead. Dropping it cancels the
    /// processor task.
    pub struct FrameEvents {
        #[pin]
        inner: ReceiverStream<FrameEvent>,
        done: bool,
        cancel: CancellationToken,
        _guard: DropGuard,
    }
}

impl FrameEvents {
    pub(crate) fn new(rx: mpsc::Receiver<FrameEvent>, cancel: CancellationToken) -> Self {
        let guard = cancel.clone().drop_guard();
        Self { inner: ReceiverStream::new(rx), done: false, cancel, _guard: guard }
    }

    /// Stop the processor task; the stream ends once buffered events drain
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Receive the next raw event
    pub async fn recv_event(&mut self) -> Option<FrameEvent> {
        if self.done {
            return None;
        }
        let event = self.inner.next().await;
        if !matches!(event, Some(FrameEvent::Frame(_))) {
            self.done = true;
        }
        event
    }
}

impl std::fmt::Debug for FrameEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameEvents")
            .field("done", &self.done)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}

impl Stream for FrameEvents {
    type Item = Result<FrameRecord>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        if *this.done {
            return Poll::Ready(None);
        }

        match ready!(this.inner.poll_next(cx)) {
            Some(FrameEvent::Frame(frame)) => Poll::Ready(Some(Ok(frame))),
            Some(FrameEvent::Failed(error)) => {
                *this.done = true;
                Poll::Ready(Some(Err(error)))
            }
            Some(FrameEvent::Completed) => {
                *this.done = true;
                Poll::Ready(None)
            }
            // Without a terminal event the task either was cancelled or died
            None => {
                *this.done = true;
                if this.cancel.is_cancelled() {
                    Poll::Ready(None)
                } else {
                    Poll::Ready(Some(Err(StreamError::transport(
                        "frame processor task ended without a final event",
                    ))))
                }
            }
        }
    }
}
