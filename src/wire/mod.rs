//! Wire-level building blocks of the deframer.
//!
//! Defines the line constants of an IEEE 802.3 octet stream and the
//! components that operate on it:
//!
//! ## Frame Layout
//!
//! ```text
//! idle (0xFF x >=12) | preamble (0xAA x >=7) | SFD (0xAB)
//!   | destination (6) | source (6) | type/length (2)
//!   | [LLC dsap, ssap, control (3) | [SNAP OUI (3) | type (2)]]
//!   | payload | FCS (4, big-endian CRC-32)
//! ```
//!
//! - [`buffer::ByteRun`] accumulates chunks and hands out zero-copy frame runs
//! - [`sync::Synchronizer`] finds the preamble and delimiter
//! - [`gap::GapDetector`] finds the interframe gap that ends a capture
//! - [`decoder::decode_frame`] turns a bounded run into a [`FrameRecord`](crate::FrameRecord)
//! - [`checksum::crc32`] computes the frame check sequence

pub mod buffer;
pub mod checksum;
pub mod decoder;
pub mod gap;
pub mod sync;

/// Idle line marker
pub const IDLE_BYTE: u8 = 0xFF;

/// Preamble byte (10101010)
pub const PREAMBLE_BYTE: u8 = 0xAA;

/// Start-of-frame delimiter (10101011)
pub const SFD_BYTE: u8 = 0xAB;

/// Destination + source + type/length
pub const ETHER_HEADER_LEN: usize = 14;

/// DSAP + SSAP + control
pub const LLC_HEADER_LEN: usize = 3;

/// OUI + embedded type
pub const SNAP_EXTENSION_LEN: usize = 5;

/// Trailing frame check sequence
pub const FCS_LEN: usize = 4;

/// Largest value read as an IEEE 802.3 length
pub const MAX_LENGTH_FIELD: u16 = 1500;

/// Smallest value read as an Ethernet II EtherType
pub const MIN_ETHER_TYPE: u16 = 1536;

/// DSAP/SSAP value announcing a SNAP extension
pub const SNAP_SAP: u8 = 0xAA;

pub use buffer::ByteRun;
pub use checksum::crc32;
pub use decoder::decode_frame;
pub use gap::GapDetector;
pub use sync::{SyncOutcome, Synchronizer};
