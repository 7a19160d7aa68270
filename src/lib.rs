//! Async deframer for raw Ethernet II and IEEE 802.3 byte streams.
//!
//! Etherstream turns an unframed octet stream (idle line, preambles, frames,
//! interframe gaps) into typed [`FrameRecord`]s with checksum status. Data may
//! arrive in chunks of any size; frame boundaries are found by preamble
//! synchronization and idle-gap detection alone.
//!
//! # Features
//!
//! - **Protocol disambiguation**: Ethernet II vs IEEE 802.3 from the type/length field
//! - **LLC/SNAP**: sub-headers parsed, SNAP embedded type surfaced as the frame type
//! - **Integrity**: CRC-32 recomputed and compared for every frame
//! - **Async**: pull, `Stream`, callback or spawned-task consumption on tokio
//!
//! # Quick Start
//!
//! ```rust
//! use etherstream::{ProtocolVariant, collect_frames};
//! use etherstream::sources::channel_source;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> etherstream::Result<()> {
//!     let (sender, source) = channel_source(8);
//!
//!     let mut wire = vec![0xff; 12];
//!     wire.extend_from_slice(&[0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xab]);
//!     wire.extend_from_slice(&[0xff; 6]); // broadcast destination
//!     wire.extend_from_slice(&[0x02, 0x00, 0x00, 0x00, 0x00, 0x01]);
//!     wire.extend_from_slice(&[0x08, 0x06]); // ARP
//!     wire.extend_from_slice(b"payload");
//!     wire.extend_from_slice(&[0, 0, 0, 0]); // not a valid check
//!     wire.extend_from_slice(&[0xff; 12]);
//!
//!     sender.send(wire).await?;
//!     sender.close();
//!
//!     let frames = collect_frames(source).await?;
//!     assert_eq!(frames.len(), 1);
//!     assert_eq!(frames[0].protocol, ProtocolVariant::EthernetII);
//!     assert_eq!(frames[0].header.ether_type, 0x0806);
//!     assert!(!frames[0].frame_check_valid);
//!     Ok(())
//! }
//! ```

// Core types and error handling
pub mod config;
mod error;
#[cfg_attr(any(test, feature = "benchmark"), path = "test_utils.rs")]
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;
pub mod wire;

// Byte sources
pub mod source;
pub mod sources;

// Deframing pipeline
pub mod collector;
pub mod deframer;
pub mod processor;
pub mod stream;

// Core exports
pub use error::*;
pub use types::*;

pub use config::{
    DEFAULT_EVENT_CAPACITY, DEFAULT_GAP_LEN, DEFAULT_PREAMBLE_LEN, DeframerConfig, PreambleMode,
    ProcessorConfig,
};

// Main API exports
pub use collector::{FrameCollector, collect_frames};
pub use deframer::{DeframeStats, Deframer};
pub use processor::FrameProcessor;
pub use source::ByteSource;
pub use stream::{FrameEvent, FrameEvents};
