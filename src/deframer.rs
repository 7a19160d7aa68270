//! Transport-free deframing state machine
//!
//! The [`Deframer`] owns the byte accumulator and moves between
//! synchronizing (preamble search) and capturing (gap search). Every
//! bounded run it captures is decoded immediately; decode errors drop the
//! run and synchronization resumes right after it.
//!
//! ```rust
//! use etherstream::{Deframer, DeframerConfig};
//!
//! let mut deframer = Deframer::new(DeframerConfig::default());
//! let frames = deframer.push(&[0xff; 40]);
//! assert!(frames.is_empty());
//! ```

use tracing::{debug, trace, warn};

use crate::StreamError;
use crate::config::DeframerConfig;
use crate::types::{FrameRecord, ProcessorState};
use crate::wire::{ByteRun, GapDetector, SyncOutcome, Synchronizer, decode_frame};

/// Running counters for one stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeframeStats {
    /// Frames emitted, including those with a bad frame check
    pub frames: u64,

    /// Emitted frames whose frame check did not match
    pub checksum_mismatches: u64,

    /// Runs dropped for being too short, including unterminated captures at end of stream
    pub truncated: u64,

    /// Runs dropped for an undefined type/length field
    pub ambiguous: u64,

    /// Bytes outside any captured run: idle, noise, preambles and interframe gaps
    pub discarded_bytes: u64,
}

/// Synchronous frame synchronizer and decoder
#[derive(Debug)]
pub struct Deframer {
    config: DeframerConfig,
    buffer: ByteRun,
    sync: Synchronizer,
    gap: GapDetector,
    state: ProcessorState,
    stats: DeframeStats,
}

impl Deframer {
    pub fn new(config: DeframerConfig) -> Self {
        Self {
            sync: Synchronizer::new(config.preamble_min, config.preamble_mode),
            gap: GapDetector::new(config.gap_min),
            buffer: ByteRun::with_capacity(2048),
            state: ProcessorState::Synchronizing,
            stats: DeframeStats::default(),
            config,
        }
    }

    /// Append a chunk without decoding
    pub fn feed(&mut self, chunk: &[u8]) {
        self.buffer.append(chunk);
    }

    /// Advance over buffered bytes until a frame is decoded or more data is needed
    pub fn poll_frame(&mut self) -> Option<FrameRecord> {
        loop {
            match self.state {
                ProcessorState::Capturing => {
                    let len = self.gap.scan(self.buffer.as_slice())?;
                    let run = self.buffer.split_frame(len);
                    self.stats.discarded_bytes += self.buffer.consume(self.gap.gap_min()) as u64;
                    self.gap.reset();

                    if let Some(record) = self.decode(run) {
                        return Some(record);
                    }
                }
                _ => {
                    if self.buffer.is_empty() {
                        return None;
                    }

                    let outcome = self.sync.scan(self.buffer.as_slice());
                    self.buffer.consume(outcome.consumed());
                    self.stats.discarded_bytes += outcome.consumed() as u64;
                    match outcome {
                        SyncOutcome::Locked { consumed } => {
                            trace!("Synchronized after discarding {} bytes", consumed);
                            self.state = ProcessorState::Capturing;
                        }
                        SyncOutcome::NeedMore { .. } => return None,
                    }
                }
            }
        }
    }

    /// Feed a chunk and drain every frame it completes
    pub fn push(&mut self, chunk: &[u8]) -> Vec<FrameRecord> {
        self.feed(chunk);
        std::iter::from_fn(|| self.poll_frame()).collect()
    }

    /// Handle end of stream
    ///
    /// Call after [`poll_frame`](Self::poll_frame) has returned `None`. A
    /// capture without a closing gap is dropped unless `flush_on_end` is set,
    /// in which case it is decoded as if the stream end were a gap.
    pub fn finish(&mut self) -> Option<FrameRecord> {
        let pending = self.state == ProcessorState::Capturing && !self.buffer.is_empty();
        let mut record = None;

        if pending && self.config.flush_on_end {
            let run = self.buffer.split_frame(self.buffer.available());
            record = self.decode(run);
        } else if pending {
            debug!("Dropping {} bytes of unterminated frame at end of stream", self.buffer.available());
            self.stats.truncated += 1;
        }

        self.reset();
        record
    }

    /// Discard all buffered bytes and return to synchronizing
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.sync.reset();
        self.gap.reset();
        self.state = ProcessorState::Synchronizing;
    }

    pub fn state(&self) -> ProcessorState {
        self.state
    }

    pub fn stats(&self) -> &DeframeStats {
        &self.stats
    }

    /// Bytes held in the accumulator
    pub fn buffered(&self) -> usize {
        self.buffer.available()
    }

    pub fn config(&self) -> &DeframerConfig {
        &self.config
    }

    fn decode(&mut self, run: bytes::Bytes) -> Option<FrameRecord> {
        self.state = ProcessorState::Decoding;
        let captured = run.len();
        let result = decode_frame(run);
        self.state = ProcessorState::Synchronizing;

        match result {
            Ok(record) => {
                self.stats.frames += 1;
                if !record.frame_check_valid {
                    self.stats.checksum_mismatches += 1;
                    warn!(
                        "Frame check mismatch on {} frame from {} (fcs={:#010x})",
                        record.protocol, record.header.source, record.frame_check
                    );
                }
                trace!("Emitting {} frame #{} ({} bytes)", record.protocol, self.stats.frames, captured);
                Some(record)
            }
            Err(error) => {
                if matches!(error, StreamError::AmbiguousLengthField { .. }) {
                    self.stats.ambiguous += 1;
                } else {
                    self.stats.truncated += 1;
                }
                debug!("Dropping {}-byte run: {}", captured, error);
                None
            }
        }
    }
}

impl Default for Deframer {
    fn default() -> Self {
        Self::new(DeframerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PreambleMode;
    use crate::test_utils::{
        ETHERNET_II_FIXTURE, IEEE_802_3_FIXTURE, WireBuilder, ethernet_ii_record,
        ieee_802_3_record, seal,
    };
    use crate::types::ProtocolVariant;
    use proptest::prelude::*;

    fn deframe(data: &[u8], chunk: usize) -> (Vec<FrameRecord>, DeframeStats) {
        let mut deframer = Deframer::default();
        let mut frames = Vec::new();
        for piece in data.chunks(chunk.max(1)) {
            frames.extend(deframer.push(piece));
        }
        frames.extend(deframer.finish());
        (frames, *deframer.stats())
    }

    fn decode_all(data: &[u8], chunk: usize) -> Vec<FrameRecord> {
        deframe(data, chunk).0
    }

    #[test]
    fn idle_and_noise_produce_nothing() {
        assert!(decode_all(&[0xff; 35], 35).is_empty());
        let noise = [
            0x43, 0x06, 0x10, 0x16, 0x17, 0x86, 0xa5, 0x80, 0xaa, 0x27, 0x66, 0x87, 0x6c, 0xbb,
            0x45, 0xe7, 0x3f, 0x98, 0xed, 0x10, 0xb3, 0x34, 0x47, 0xb0, 0x4c, 0xf0, 0x69, 0x4b,
            0x79, 0x39, 0xd9, 0x0a, 0x26, 0x9b, 0xed, 0xc8, 0x84, 0x1d, 0x81, 0xed,
        ];
        assert!(decode_all(&noise, 7).is_empty());
    }

    #[test]
    fn single_frame_between_gaps() {
        let (wire, expected) = WireBuilder::new().ethernet_ii(6, 3).build();
        let frames = decode_all(&wire, wire.len());
        assert_eq!(frames, expected);
        assert_eq!(frames[0], ethernet_ii_record());
    }

    #[test]
    fn state_follows_capture() {
        let mut deframer = Deframer::default();
        assert_eq!(deframer.state(), ProcessorState::Synchronizing);

        let mut head = vec![0xff; 4];
        head.extend_from_slice(&[0xaa; 7]);
        head.push(0xab);
        head.extend_from_slice(&ETHERNET_II_FIXTURE[..10]);
        assert!(deframer.push(&head).is_empty());
        assert_eq!(deframer.state(), ProcessorState::Capturing);
        assert_eq!(deframer.buffered(), 10);

        let mut tail = ETHERNET_II_FIXTURE[10..].to_vec();
        tail.extend_from_slice(&[0xff; 12]);
        let frames = deframer.push(&tail);
        assert_eq!(frames.len(), 1);
        assert_eq!(deframer.state(), ProcessorState::Synchronizing);
        assert_eq!(deframer.buffered(), 0);
    }

    #[test]
    fn unterminated_capture_is_dropped_at_end() {
        let mut deframer = Deframer::default();
        let mut wire = vec![0xaa; 7];
        wire.push(0xab);
        wire.extend_from_slice(ETHERNET_II_FIXTURE);
        wire.extend_from_slice(&[0xff; 11]);

        assert!(deframer.push(&wire).is_empty());
        assert!(deframer.finish().is_none());
        assert_eq!(deframer.stats().truncated, 1);
        assert_eq!(deframer.buffered(), 0);
    }

    #[test]
    fn flush_on_end_decodes_pending_capture() {
        let config = DeframerConfig { flush_on_end: true, ..DeframerConfig::default() };
        let mut deframer = Deframer::new(config);
        let mut wire = vec![0xaa; 7];
        wire.push(0xab);
        wire.extend_from_slice(IEEE_802_3_FIXTURE);

        assert!(deframer.push(&wire).is_empty());
        assert_eq!(deframer.finish(), Some(ieee_802_3_record()));
    }

    #[test]
    fn short_run_is_dropped_and_scanning_resumes() {
        let (wire, expected) = WireBuilder::new()
            .preamble()
            .raw(&[0x01, 0x02, 0x03])
            .gap(0)
            .ieee_802_3(2, 0)
            .build();

        let mut deframer = Deframer::default();
        let frames = deframer.push(&wire);
        assert_eq!(frames, expected);
        assert_eq!(deframer.stats().truncated, 1);
        assert_eq!(deframer.stats().frames, 1);
    }

    #[test]
    fn ambiguous_run_is_dropped_and_scanning_resumes() {
        let mut body = ETHERNET_II_FIXTURE[..12].to_vec();
        body.extend_from_slice(&1520u16.to_be_bytes());
        body.extend_from_slice(b"undefined");

        let (wire, expected) = WireBuilder::new()
            .preamble()
            .raw(&seal(&body))
            .gap(4)
            .ethernet_ii(0, 0)
            .build();

        let mut deframer = Deframer::default();
        assert_eq!(deframer.push(&wire), expected);
        assert_eq!(deframer.stats().ambiguous, 1);
    }

    #[test]
    fn preamble_bytes_inside_frame_are_data() {
        // SNAP marker 0xAA 0xAA must not resynchronize mid-frame
        let mut body = ETHERNET_II_FIXTURE[..12].to_vec();
        body.extend_from_slice(&[0x00, 0x20, 0xaa, 0xaa, 0x03, 0x00, 0x00, 0x00, 0x88, 0xb5]);
        body.extend_from_slice(&[0xaa; 9]);
        body.push(0xab);
        body.extend_from_slice(&[0xaa; 4]);

        let (wire, expected) = WireBuilder::new().frame(&body).build();
        let frames = decode_all(&wire, 3);
        assert_eq!(frames, expected);
        assert_eq!(frames[0].header.ether_type, 0x88b5);
        assert_eq!(frames[0].header.length, 14);
    }

    #[test]
    fn short_idle_runs_inside_payload_are_kept() {
        let mut body = ETHERNET_II_FIXTURE[..14].to_vec();
        body.extend_from_slice(&[0x01; 10]);
        body.extend_from_slice(&[0xff; 11]);
        body.extend_from_slice(&[0x02; 10]);

        let (wire, _) = WireBuilder::new().frame(&body).build();
        let frames = decode_all(&wire, 1);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].header.length, 31);
        assert!(frames[0].frame_check_valid);
    }

    #[test]
    fn dix_lead_in_is_accepted_in_dix_mode() {
        let mut wire = vec![0xff; 6];
        wire.extend_from_slice(&[0xaa; 8]);
        wire.extend_from_slice(ETHERNET_II_FIXTURE);
        wire.extend_from_slice(&[0xff; 15]);

        assert!(decode_all(&wire, wire.len()).is_empty());

        let config = DeframerConfig { preamble_mode: PreambleMode::Dix, ..DeframerConfig::default() };
        let mut deframer = Deframer::new(config);
        assert_eq!(deframer.push(&wire), vec![ethernet_ii_record()]);
    }

    #[test]
    fn custom_gap_threshold() {
        let config = DeframerConfig { gap_min: 4, ..DeframerConfig::default() };
        let mut deframer = Deframer::new(config);
        let mut wire = vec![0xaa; 7];
        wire.push(0xab);
        wire.extend_from_slice(ETHERNET_II_FIXTURE);
        wire.extend_from_slice(&[0xff; 4]);

        let frames = deframer.push(&wire);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].protocol, ProtocolVariant::EthernetII);
    }

    #[test]
    fn discarded_bytes_do_not_depend_on_chunking() {
        let (wire, _) = WireBuilder::new().noise(&[0x13, 0x37, 0x42]).idle(6).ethernet_ii(0, 0).build();

        let (_, whole) = deframe(&wire, wire.len());
        let (_, bytewise) = deframe(&wire, 1);
        // noise + idle + preamble and SFD + gap
        assert_eq!(whole.discarded_bytes, 3 + 6 + 8 + 12);
        assert_eq!(whole, bytewise);
    }

    #[test]
    fn reset_discards_buffered_bytes() {
        let mut deframer = Deframer::default();
        let mut wire = vec![0xaa; 7];
        wire.push(0xab);
        wire.extend_from_slice(&ETHERNET_II_FIXTURE[..20]);
        deframer.push(&wire);
        deframer.reset();

        assert_eq!(deframer.buffered(), 0);
        assert_eq!(deframer.state(), ProcessorState::Synchronizing);
        assert!(deframer.push(&ETHERNET_II_FIXTURE[20..]).is_empty());
    }

    fn arb_wire() -> impl Strategy<Value = (Vec<u8>, Vec<FrameRecord>)> {
        prop::collection::vec((0usize..3, 0usize..20, 0usize..20), 0..6).prop_map(|specs| {
            let mut builder = WireBuilder::new().noise(&[0x13, 0x37, 0xaa, 0xab]);
            for (kind, lead, tail) in specs {
                builder = match kind {
                    0 => builder.ethernet_ii(lead, tail),
                    1 => builder.ieee_802_3(lead, tail),
                    _ => builder.noise(&[0x55; 3]).idle(lead).frame(&ETHERNET_II_FIXTURE[..14]).idle(tail),
                };
            }
            let (wire, expected) = builder.build();
            (wire.to_vec(), expected)
        })
    }

    proptest! {
        #[test]
        fn chunking_does_not_change_output(
            (wire, expected) in arb_wire(),
            chunk in 1usize..70
        ) {
            let (whole, whole_stats) = deframe(&wire, wire.len());
            let (chunked, chunked_stats) = deframe(&wire, chunk);
            prop_assert_eq!(&whole, &expected);
            prop_assert_eq!(&chunked, &expected);
            prop_assert_eq!(whole_stats, chunked_stats);
        }

        #[test]
        fn no_delimiter_means_no_frames(
            data in prop::collection::vec(any::<u8>(), 0..2048),
            chunk in 1usize..64
        ) {
            let data: Vec<u8> = data.into_iter().filter(|&b| b != 0xab).collect();
            let (frames, stats) = deframe(&data, chunk);
            prop_assert!(frames.is_empty());
            prop_assert_eq!(stats.discarded_bytes, data.len() as u64);
        }

        #[test]
        fn idle_line_means_no_frames(len in 0usize..4096, chunk in 1usize..64) {
            let idle = vec![0xff; len];
            prop_assert!(decode_all(&idle, chunk).is_empty());
        }

        #[test]
        fn flipped_payload_bit_only_clears_frame_check(
            index in 0usize..25,
            bit in 0u8..8
        ) {
            let (wire, expected) = WireBuilder::new().ethernet_ii(0, 0).build();
            let mut wire = wire.to_vec();
            // preamble (7) + SFD (1) + header (14)
            wire[22 + index] ^= 1 << bit;

            let frames = decode_all(&wire, wire.len());
            prop_assert_eq!(frames.len(), 1);
            let frame = &frames[0];
            prop_assert!(!frame.frame_check_valid);
            prop_assert_eq!(frame.protocol, expected[0].protocol);
            prop_assert_eq!(&frame.header, &expected[0].header);
            prop_assert_eq!(frame.frame_check, expected[0].frame_check);
            prop_assert_ne!(&frame.payload, &expected[0].payload);
        }
    }
}
