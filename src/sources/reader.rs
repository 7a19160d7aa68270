//! Byte source over any async reader (sockets, pipes, capture files)

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, trace};

use crate::source::ByteSource;
use crate::{Result, StreamError};

/// Default read size
pub const DEFAULT_READ_SIZE: usize = 4096;

/// Byte source reading from an [`AsyncRead`]
///
/// A zero-length read is end of stream; an I/O error is a transport error.
pub struct ReaderSource<R> {
    reader: R,
    read_size: usize,
    total: u64,
}

impl<R> ReaderSource<R>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    pub fn new(reader: R) -> Self {
        Self::with_read_size(reader, DEFAULT_READ_SIZE)
    }

    /// Create a source that reads at most `read_size` bytes per chunk
    pub fn with_read_size(reader: R, read_size: usize) -> Self {
        Self { reader, read_size: read_size.max(1), total: 0 }
    }

    /// Bytes delivered so far
    pub fn total_read(&self) -> u64 {
        self.total
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

#[async_trait::async_trait]
impl<R> ByteSource for ReaderSource<R>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    async fn next_chunk(&mut self) -> Result<Option<Bytes>> {
        let mut buf = BytesMut::zeroed(self.read_size);
        let read = self.reader.read(&mut buf[..]).await.map_err(|e| {
            StreamError::transport_with_source(
                format!("read failed after {} bytes", self.total),
                Box::new(e),
            )
        })?;

        if read == 0 {
            debug!("Reader reached end of stream after {} bytes", self.total);
            return Ok(None);
        }

        buf.truncate(read);
        self.total += read as u64;
        trace!("Read {} bytes ({} total)", read, self.total);
        Ok(Some(buf.freeze()))
    }
}
