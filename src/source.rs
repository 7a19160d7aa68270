//! Byte source trait

use bytes::Bytes;

use crate::Result;

/// Trait for raw octet stream sources
///
/// Sources abstract over the transport (socket, capture device, file, test
/// double) and deliver chunks of arbitrary, non-deterministic size. The
/// processor only ever awaits one chunk at a time and never polls in a loop,
/// so pacing is entirely up to the source.
#[async_trait::async_trait]
pub trait ByteSource: Send + 'static {
    /// Get the next chunk of bytes
    ///
    /// Returns:
    /// - `Ok(Some(chunk))` - More bytes available (may be empty)
    /// - `Ok(None)` - End of stream (normal termination)
    /// - `Err(e)` - Transport error; the stream is over
    async fn next_chunk(&mut self) -> Result<Option<Bytes>>;
}

#[async_trait::async_trait]
impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>> {
        (**self).next_chunk().await
    }
}
