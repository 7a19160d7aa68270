//! Byte source implementations

pub mod channel;
pub mod reader;

pub use channel::{ChannelSource, ChunkSender, channel_source};
pub use reader::ReaderSource;
