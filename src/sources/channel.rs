//! In-process byte source fed through a channel

use bytes::Bytes;
use tokio::sync::mpsc;
use tracing::debug;

use crate::source::ByteSource;
use crate::{Result, StreamError};

/// Create a connected sender/source pair
///
/// `capacity` bounds the number of undelivered chunks; [`ChunkSender::send`]
/// waits when the processor falls behind.
pub fn channel_source(capacity: usize) -> (ChunkSender, ChannelSource) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (ChunkSender { tx }, ChannelSource { rx, finished: false })
}

/// Writing half of a [`ChannelSource`]
///
/// Dropping or [closing](Self::close) the sender ends the stream; [`fail`](Self::fail)
/// ends it with a transport error. Both consume the sender, so the stream
/// terminates exactly once.
#[derive(Debug)]
pub struct ChunkSender {
    tx: mpsc::Sender<Result<Bytes>>,
}

impl ChunkSender {
    /// Deliver a chunk to the source
    pub async fn send(&self, chunk: impl Into<Bytes>) -> Result<()> {
        self.tx
            .send(Ok(chunk.into()))
            .await
            .map_err(|_| StreamError::transport("byte source receiver dropped"))
    }

    /// Terminate the stream with a transport error
    pub async fn fail(self, error: StreamError) {
        if self.tx.send(Err(error)).await.is_err() {
            debug!("Byte source receiver dropped before failure was delivered");
        }
    }

    /// Terminate the stream normally
    pub fn close(self) {}
}

/// Reading half, consumed by the processor
#[derive(Debug)]
pub struct ChannelSource {
    rx: mpsc::Receiver<Result<Bytes>>,
    finished: bool,
}

#[async_trait::async_trait]
impl ByteSource for ChannelSource {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>> {
        if self.finished {
            return Ok(None);
        }

        match self.rx.recv().await {
            Some(Ok(chunk)) => Ok(Some(chunk)),
            Some(Err(error)) => {
                self.finished = true;
                Err(error)
            }
            None => {
                self.finished = true;
                Ok(None)
            }
        }
    }
}
