//! Frame decoding: protocol disambiguation, LLC/SNAP and frame check
//!
//! A bounded run (everything between the start-of-frame delimiter and the
//! interframe gap) is split as follows:
//!
//! | Field            | Ethernet II | IEEE 802.3        | IEEE 802.3 + SNAP  |
//! |------------------|-------------|-------------------|--------------------|
//! | MAC addresses    | 12          | 12                | 12                 |
//! | type/length      | 2 (>= 1536) | 2 (<= 1500)       | 2 (<= 1500)        |
//! | LLC              | -           | 3                 | 3 (`0xAA 0xAA ..`) |
//! | SNAP OUI + type  | -           | -                 | 5                  |
//! | payload          | rest        | rest              | rest               |
//! | frame check      | 4           | 4                 | 4                  |

use bytes::Bytes;
use tracing::trace;

use super::checksum::crc32;
use super::{
    ETHER_HEADER_LEN, FCS_LEN, LLC_HEADER_LEN, MAX_LENGTH_FIELD, MIN_ETHER_TYPE,
    SNAP_EXTENSION_LEN, SNAP_SAP,
};
use crate::types::{FrameHeader, FrameRecord, LlcHeader, MAC_ADDRESS_LEN, MacAddress, ProtocolVariant};
use crate::{Result, StreamError};

/// Classify the type/length field that follows the source address
///
/// Values in `1501..=1535` are defined by neither standard and are rejected.
pub fn classify_type_field(field: u16) -> Result<ProtocolVariant> {
    match field {
        f if f >= MIN_ETHER_TYPE => Ok(ProtocolVariant::EthernetII),
        f if f <= MAX_LENGTH_FIELD => Ok(ProtocolVariant::IEEE8023),
        value => Err(StreamError::AmbiguousLengthField { value }),
    }
}

/// Decode one bounded run into a [`FrameRecord`]
///
/// A checksum mismatch is reported through `frame_check_valid`; only runs
/// that cannot hold a complete header and check field, or whose
/// type/length field is undefined, are errors.
pub fn decode_frame(run: Bytes) -> Result<FrameRecord> {
    if run.len() < ETHER_HEADER_LEN {
        return Err(StreamError::truncated(run.len(), ETHER_HEADER_LEN));
    }

    let destination_mac = read_mac(&run, 0)?;
    let source_mac = read_mac(&run, MAC_ADDRESS_LEN)?;
    let field = read_u16_be(&run, 2 * MAC_ADDRESS_LEN)?;
    let protocol = classify_type_field(field)?;

    let mut header_len = ETHER_HEADER_LEN;
    let mut ether_type = field;
    let mut llc = None;
    let mut snap_oui = None;

    if protocol == ProtocolVariant::IEEE8023 {
        let sub = run
            .get(header_len..header_len + LLC_HEADER_LEN)
            .ok_or_else(|| truncated(&run, header_len + LLC_HEADER_LEN))?;
        let header = LlcHeader { dsap: sub[0], ssap: sub[1], control: sub[2] };
        header_len += LLC_HEADER_LEN;

        if header.dsap == SNAP_SAP && header.ssap == SNAP_SAP {
            let snap = run
                .get(header_len..header_len + SNAP_EXTENSION_LEN)
                .ok_or_else(|| truncated(&run, header_len + SNAP_EXTENSION_LEN))?;
            snap_oui = Some([snap[0], snap[1], snap[2]]);
            ether_type = u16::from_be_bytes([snap[3], snap[4]]);
            header_len += SNAP_EXTENSION_LEN;
        }
        llc = Some(header);
    }

    if run.len() < header_len + FCS_LEN {
        return Err(truncated(&run, header_len));
    }

    let fcs_start = run.len() - FCS_LEN;
    let frame_check = read_u32_be(&run, fcs_start)?;
    let computed = crc32(&run[..fcs_start]);
    let payload = run.slice(header_len..fcs_start);

    trace!(
        "Decoded {} frame: {} bytes payload, fcs={:#010x}, computed={:#010x}",
        protocol,
        payload.len(),
        frame_check,
        computed
    );

    Ok(FrameRecord {
        protocol,
        header: FrameHeader {
            destination_mac,
            destination: destination_mac.to_string(),
            source_mac,
            source: source_mac.to_string(),
            ether_type,
            length: payload.len() as u32,
            llc,
            snap_oui,
        },
        payload,
        frame_check,
        frame_check_valid: computed == frame_check,
    })
}

// Truncation is always reported against header + check field.
fn truncated(run: &[u8], header_len: usize) -> StreamError {
    StreamError::truncated(run.len(), header_len + FCS_LEN)
}

fn read_mac(data: &[u8], offset: usize) -> Result<MacAddress> {
    data.get(offset..)
        .and_then(MacAddress::from_slice)
        .ok_or_else(|| StreamError::truncated(data.len(), offset + MAC_ADDRESS_LEN))
}

fn read_u16_be(data: &[u8], offset: usize) -> Result<u16> {
    let bytes = data
        .get(offset..offset + 2)
        .ok_or_else(|| StreamError::truncated(data.len(), offset + 2))?;
    Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
}

fn read_u32_be(data: &[u8], offset: usize) -> Result<u32> {
    let bytes = data
        .get(offset..offset + 4)
        .ok_or_else(|| StreamError::truncated(data.len(), offset + 4))?;
    Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}
