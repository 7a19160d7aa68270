//! Core types for decoded link-layer frames.
//!
//! ## Architecture
//!
//! - [`FrameRecord`] is the unit emitted by the processor, one per synchronized frame
//! - [`FrameHeader`] holds addresses, the type/length interpretation and optional LLC/SNAP fields
//! - [`ProtocolVariant`] distinguishes DIX Ethernet II from IEEE 802.3
//! - [`MacAddress`] is a fixed six-octet address with colon-hex rendering
//! - [`ProcessorState`] names the stages of the processor state machine
//!
//! ## Usage Example
//!
//! ```rust
//! use etherstream::types::{FrameHeader, FrameRecord, MacAddress, ProtocolVariant};
//! use bytes::Bytes;
//!
//! let destination_mac = MacAddress([0x00, 0xd0, 0xb7, 0x1f, 0xfe, 0xe6]);
//! let source_mac = MacAddress([0x00, 0x05, 0x85, 0x88, 0xcc, 0xdb]);
//!
//! let record = FrameRecord {
//!     protocol: ProtocolVariant::EthernetII,
//!     header: FrameHeader {
//!         destination_mac,
//!         destination: destination_mac.to_string(),
//!         source_mac,
//!         source: source_mac.to_string(),
//!         ether_type: 0x0800,
//!         length: 2,
//!         llc: None,
//!         snap_oui: None,
//!     },
//!     payload: Bytes::from_static(b"hi"),
//!     frame_check: 0,
//!     frame_check_valid: false,
//! };
//!
//! assert_eq!(record.header.destination, "00:d0:b7:1f:fe:e6");
//! assert_eq!(record.protocol.to_string(), "Ethernet II");
//! ```

mod frame;
mod mac;
mod state;

pub use frame::{FrameHeader, FrameRecord, LlcHeader, ProtocolVariant};
pub use mac::{MAC_ADDRESS_LEN, MacAddress};
pub use state::ProcessorState;
