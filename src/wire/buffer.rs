//! Byte accumulator fed by the source

use bytes::{Buf, Bytes, BytesMut};

/// Append-only byte sequence consumed from the front
///
/// Chunks are appended as they arrive; bytes leave either as noise
/// ([`consume`](Self::consume)) or as a frame run ([`split_frame`](Self::split_frame)).
/// There is no upper bound on the buffered length.
#[derive(Debug, Default)]
pub struct ByteRun {
    buf: BytesMut,
}

impl ByteRun {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { buf: BytesMut::with_capacity(capacity) }
    }

    /// Append a chunk to the tail
    pub fn append(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// View up to `n` bytes from the head without consuming them
    pub fn peek(&self, n: usize) -> &[u8] {
        &self.buf[..n.min(self.buf.len())]
    }

    /// All buffered bytes
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Discard up to `n` bytes from the head, returning how many were dropped
    pub fn consume(&mut self, n: usize) -> usize {
        let n = n.min(self.buf.len());
        self.buf.advance(n);
        n
    }

    /// Detach the first `n` bytes as an immutable run
    pub fn split_frame(&mut self, n: usize) -> Bytes {
        let n = n.min(self.buf.len());
        self.buf.split_to(n).freeze()
    }

    pub fn available(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Drop everything buffered
    pub fn clear(&mut self) {
        self.buf.clear();
    }
}
