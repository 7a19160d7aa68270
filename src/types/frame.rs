//! Decoded frame records

use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::MacAddress;

/// Link-layer encapsulation of a decoded frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProtocolVariant {
    /// DIX Ethernet II, type field >= 1536
    EthernetII,

    /// IEEE 802.3 with LLC, length field <= 1500
    IEEE8023,
}

impl fmt::Display for ProtocolVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolVariant::EthernetII => f.write_str("Ethernet II"),
            ProtocolVariant::IEEE8023 => f.write_str("IEEE 802.3"),
        }
    }
}

/// IEEE 802.2 logical link control header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LlcHeader {
    pub dsap: u8,
    pub ssap: u8,
    pub control: u8,
}

/// Header fields of a decoded frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameHeader {
    pub destination_mac: MacAddress,

    /// `destination_mac` in colon-hex form
    pub destination: String,

    pub source_mac: MacAddress,

    /// `source_mac` in colon-hex form
    pub source: String,

    /// EtherType, the SNAP embedded type, or the raw length field for plain LLC
    #[serde(rename = "type")]
    pub ether_type: u16,

    /// Number of payload bytes captured
    pub length: u32,

    /// Present only for IEEE 802.3 frames
    pub llc: Option<LlcHeader>,

    /// Present only when the LLC header announces SNAP
    pub snap_oui: Option<[u8; 3]>,
}

/// A fully decoded frame
///
/// Records are immutable once constructed and are emitted exactly once, in
/// the order their start-of-frame delimiters appeared on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub protocol: ProtocolVariant,
    pub header: FrameHeader,

    /// Opaque network-layer payload (zero-copy slice of the captured run)
    pub payload: Bytes,

    /// Trailing frame check sequence, big-endian
    pub frame_check: u32,

    /// Whether the recomputed CRC-32 equals `frame_check`
    pub frame_check_valid: bool,
}

impl FrameRecord {
    pub fn is_ethernet_ii(&self) -> bool {
        self.protocol == ProtocolVariant::EthernetII
    }

    /// Whether the frame carries a SNAP extension
    pub fn has_snap(&self) -> bool {
        self.header.snap_oui.is_some()
    }
}
