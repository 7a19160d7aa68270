//! All-or-nothing aggregation of a byte source into its frames
//!
//! The collector spawns a [`FrameProcessor`] and gathers every frame it
//! emits. The result resolves once the source ends: either every frame in
//! arrival order, or the transport error that ended the stream. Frames seen
//! before a failure are not returned.

use futures::TryStreamExt;
use tracing::debug;

use crate::Result;
use crate::config::ProcessorConfig;
use crate::processor::FrameProcessor;
use crate::source::ByteSource;
use crate::types::FrameRecord;


/// Collect every frame from `source` with default configuration
///
/// ```rust
/// use etherstream::collect_frames;
/// use etherstream::sources::channel_source;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> etherstream::Result<()> {
/// let (sender, source) = channel_source(4);
/// sender.send(vec![0x00u8; 40]).await?;
/// sender.close();
///
/// let frames = collect_frames(source).await?;
/// assert!(frames.is_empty());
/// # Ok(())
/// # }
/// ```
pub async fn collect_frames<S>(source: S) -> Result<Vec<FrameRecord>>
where
    S: ByteSource,
{
    FrameCollector::new().collect(source).await
}

/// Reusable collector holding a validated configuration
#[derive(Debug, Clone, Default)]
pub struct FrameCollector {
    config: ProcessorConfig,
}

impl FrameCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ProcessorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Run `source` to completion on a spawned task and gather its frames
    pub async fn collect<S>(&self, source: S) -> Result<Vec<FrameRecord>>
    where
        S: ByteSource,
    {
        let processor = FrameProcessor::with_config(source, self.config.clone())?;
        let frames: Vec<FrameRecord> = processor.spawn().try_collect().await?;
        debug!("Collected {} frames", frames.len());
        Ok(frames)
    }
}
