//! Six-octet hardware addresses

use std::fmt;

use serde::{Deserialize, Serialize};

/// Length of a MAC address in bytes
pub const MAC_ADDRESS_LEN: usize = 6;

/// A six-octet IEEE 802 MAC address
#[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MacAddress(pub [u8; MAC_ADDRESS_LEN]);

impl MacAddress {
    /// The broadcast address
    pub const BROADCAST: MacAddress = MacAddress([0xff; MAC_ADDRESS_LEN]);

    /// Read an address from the first six bytes of `data`
    ///
    /// Returns `None` when fewer than six bytes are available.
    pub fn from_slice(data: &[u8]) -> Option<Self> {
        let bytes: [u8; MAC_ADDRESS_LEN] = data.get(..MAC_ADDRESS_LEN)?.try_into().ok()?;
        Some(MacAddress(bytes))
    }

    pub const fn as_bytes(&self) -> &[u8; MAC_ADDRESS_LEN] {
        &self.0
    }

    pub fn is_broadcast(&self) -> bool {
        *self == Self::BROADCAST
    }

    /// Query whether the group bit in the first octet is set
    pub const fn is_multicast(&self) -> bool {
        self.0[0] & 0x01 != 0
    }
}

impl From<[u8; MAC_ADDRESS_LEN]> for MacAddress {
    fn from(bytes: [u8; MAC_ADDRESS_LEN]) -> Self {
        MacAddress(bytes)
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = self.0;
        write!(f, "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}", b[0], b[1], b[2], b[3], b[4], b[5])
    }
}
