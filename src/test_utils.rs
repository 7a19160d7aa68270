//! Test utilities: wire fixtures, a wire builder and a scripted byte source
//!
//! This module provides byte-level test doubles shared by the unit tests and
//! benchmarks. Nothing here is part of the decoding path.

#![cfg(any(test, feature = "benchmark"))]

use std::collections::VecDeque;

use bytes::Bytes;

use crate::source::ByteSource;
use crate::types::{FrameHeader, FrameRecord, LlcHeader, MacAddress, ProtocolVariant};
use crate::wire::{IDLE_BYTE, PREAMBLE_BYTE, SFD_BYTE, crc32, decode_frame};
use crate::{Result, StreamError};

/// Payload carried by both fixtures
pub const FIXTURE_PAYLOAD: &[u8] = b"Can you parse this frame?";

/// Ethernet II frame: `00:d0:b7:1f:fe:e6` <- `00:05:85:88:cc:db`, IPv4, valid FCS
pub const ETHERNET_II_FIXTURE: &[u8] = &[
    0x00, 0xd0, 0xb7, 0x1f, 0xfe, 0xe6, 0x00, 0x05, 0x85, 0x88, 0xcc, 0xdb, 0x08, 0x00, 0x43, 0x61,
    0x6e, 0x20, 0x79, 0x6f, 0x75, 0x20, 0x70, 0x61, 0x72, 0x73, 0x65, 0x20, 0x74, 0x68, 0x69, 0x73,
    0x20, 0x66, 0x72, 0x61, 0x6d, 0x65, 0x3f, 0xa4, 0x38, 0xc4, 0xb7,
];

/// The same addresses and payload as IEEE 802.3 with LLC/SNAP, valid FCS
pub const IEEE_802_3_FIXTURE: &[u8] = &[
    0x00, 0xd0, 0xb7, 0x1f, 0xfe, 0xe6, 0x00, 0x05, 0x85, 0x88, 0xcc, 0xdb, 0x00, 0x19, 0xaa, 0xaa,
    0x03, 0x00, 0x00, 0x00, 0x08, 0x00, 0x43, 0x61, 0x6e, 0x20, 0x79, 0x6f, 0x75, 0x20, 0x70, 0x61,
    0x72, 0x73, 0x65, 0x20, 0x74, 0x68, 0x69, 0x73, 0x20, 0x66, 0x72, 0x61, 0x6d, 0x65, 0x3f, 0x62,
    0x63, 0xab, 0xd5,
];

const FIXTURE_DESTINATION: MacAddress = MacAddress([0x00, 0xd0, 0xb7, 0x1f, 0xfe, 0xe6]);
const FIXTURE_SOURCE: MacAddress = MacAddress([0x00, 0x05, 0x85, 0x88, 0xcc, 0xdb]);

/// Expected record for [`ETHERNET_II_FIXTURE`], built by hand
pub fn ethernet_ii_record() -> FrameRecord {
    FrameRecord {
        protocol: ProtocolVariant::EthernetII,
        header: FrameHeader {
            destination_mac: FIXTURE_DESTINATION,
            destination: "00:d0:b7:1f:fe:e6".to_string(),
            source_mac: FIXTURE_SOURCE,
            source: "00:05:85:88:cc:db".to_string(),
            ether_type: 0x0800,
            length: 25,
            llc: None,
            snap_oui: None,
        },
        payload: Bytes::from_static(FIXTURE_PAYLOAD),
        frame_check: 2_755_183_799,
        frame_check_valid: true,
    }
}

/// Expected record for [`IEEE_802_3_FIXTURE`], built by hand
pub fn ieee_802_3_record() -> FrameRecord {
    FrameRecord {
        protocol: ProtocolVariant::IEEE8023,
        header: FrameHeader {
            destination_mac: FIXTURE_DESTINATION,
            destination: "00:d0:b7:1f:fe:e6".to_string(),
            source_mac: FIXTURE_SOURCE,
            source: "00:05:85:88:cc:db".to_string(),
            ether_type: 0x0800,
            length: 25,
            llc: Some(LlcHeader { dsap: 0xaa, ssap: 0xaa, control: 0x03 }),
            snap_oui: Some([0x00, 0x00, 0x00]),
        },
        payload: Bytes::from_static(FIXTURE_PAYLOAD),
        frame_check: 1_650_699_221,
        frame_check_valid: true,
    }
}

/// Append the big-endian CRC-32 of `body` to it
pub fn seal(body: &[u8]) -> Bytes {
    let mut frame = body.to_vec();
    frame.extend_from_slice(&crc32(body).to_be_bytes());
    Bytes::from(frame)
}

/// Builder for raw line bytes together with the records they should decode to
#[derive(Debug, Default, Clone)]
pub struct WireBuilder {
    bytes: Vec<u8>,
    expected: Vec<FrameRecord>,
}

impl WireBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idle line state for `n` bytes
    pub fn idle(mut self, n: usize) -> Self {
        self.bytes.extend(std::iter::repeat_n(IDLE_BYTE, n));
        self
    }

    /// Minimum interframe gap plus `extra` idle bytes
    pub fn gap(self, extra: usize) -> Self {
        self.idle(crate::DEFAULT_GAP_LEN + extra)
    }

    /// Seven preamble bytes and the start-of-frame delimiter
    pub fn preamble(mut self) -> Self {
        self.bytes.extend(std::iter::repeat_n(PREAMBLE_BYTE, crate::DEFAULT_PREAMBLE_LEN));
        self.bytes.push(SFD_BYTE);
        self
    }

    /// Bytes that are expected to decode to nothing on their own
    pub fn noise(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    /// Arbitrary bytes with no expectation attached
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    /// Leading idle, preamble, the Ethernet II fixture and a gap of `12 + tail`
    pub fn ethernet_ii(mut self, lead: usize, tail: usize) -> Self {
        self = self.idle(lead).preamble().raw(ETHERNET_II_FIXTURE).gap(tail);
        self.expected.push(ethernet_ii_record());
        self
    }

    /// Leading idle, preamble, the IEEE 802.3 fixture and a gap of `12 + tail`
    pub fn ieee_802_3(mut self, lead: usize, tail: usize) -> Self {
        self = self.idle(lead).preamble().raw(IEEE_802_3_FIXTURE).gap(tail);
        self.expected.push(ieee_802_3_record());
        self
    }

    /// Preamble, `body` sealed with a valid FCS, and a minimum gap
    ///
    /// # Panics
    ///
    /// Panics if `body` does not decode on its own.
    pub fn frame(mut self, body: &[u8]) -> Self {
        let sealed = seal(body);
        let record = decode_frame(sealed.clone()).expect("test frame body must decode");
        self = self.preamble().raw(&sealed).gap(0);
        self.expected.push(record);
        self
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn expected(&self) -> &[FrameRecord] {
        &self.expected
    }

    pub fn build(self) -> (Bytes, Vec<FrameRecord>) {
        (Bytes::from(self.bytes), self.expected)
    }
}

/// Byte source replaying prepared chunks, optionally ending in a transport error
#[derive(Debug, Default)]
pub struct ScriptedSource {
    chunks: VecDeque<Bytes>,
    failure: Option<StreamError>,
    delivered: usize,
}

impl ScriptedSource {
    /// Deliver `data` as a single chunk
    pub fn whole(data: impl Into<Bytes>) -> Self {
        Self { chunks: VecDeque::from([data.into()]), ..Self::default() }
    }

    /// Deliver `data` in chunks whose sizes cycle through `sizes`
    pub fn chunked(data: &[u8], sizes: &[usize]) -> Self {
        let mut chunks = VecDeque::new();
        let mut sizes = sizes.iter().copied().map(|s| s.max(1)).cycle();
        let mut rest = data;
        while !rest.is_empty() {
            let size = sizes.next().unwrap_or(1).min(rest.len());
            let (head, tail) = rest.split_at(size);
            chunks.push_back(Bytes::copy_from_slice(head));
            rest = tail;
        }
        Self { chunks, ..Self::default() }
    }

    /// Deliver `data` one byte at a time
    pub fn bytewise(data: &[u8]) -> Self {
        Self::chunked(data, &[1])
    }

    /// Report `error` after the last chunk instead of end of stream
    pub fn failing_with(mut self, error: StreamError) -> Self {
        self.failure = Some(error);
        self
    }

    /// Chunks handed out so far
    pub fn delivered(&self) -> usize {
        self.delivered
    }
}

#[async_trait::async_trait]
impl ByteSource for ScriptedSource {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>> {
        // Suspend like a real transport between deliveries
        tokio::task::yield_now().await;

        if let Some(chunk) = self.chunks.pop_front() {
            self.delivered += 1;
            return Ok(Some(chunk));
        }
        match self.failure.take() {
            Some(error) => Err(error),
            None => Ok(None),
        }
    }
}
