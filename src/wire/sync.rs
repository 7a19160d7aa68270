//! Preamble and start-of-frame delimiter search

use tracing::trace;

use super::{PREAMBLE_BYTE, SFD_BYTE};
use crate::config::PreambleMode;

/// Result of scanning buffered bytes for a frame start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Frame data begins after the first `consumed` bytes
    Locked { consumed: usize },

    /// No frame start yet; the first `consumed` bytes can be discarded
    NeedMore { consumed: usize },
}

impl SyncOutcome {
    pub fn consumed(self) -> usize {
        match self {
            SyncOutcome::Locked { consumed } | SyncOutcome::NeedMore { consumed } => consumed,
        }
    }
}

/// Resumable preamble detector
///
/// The length of the current `0xAA` run is carried between calls, so a
/// preamble split across any number of chunks is still recognized and no
/// byte is ever examined twice. Idle and noise bytes ahead of the preamble
/// simply reset the run.
#[derive(Debug, Clone)]
pub struct Synchronizer {
    preamble_min: usize,
    mode: PreambleMode,
    run: usize,
}

impl Synchronizer {
    pub fn new(preamble_min: usize, mode: PreambleMode) -> Self {
        Self { preamble_min, mode, run: 0 }
    }

    /// Scan newly available bytes for the end of a preamble
    pub fn scan(&mut self, data: &[u8]) -> SyncOutcome {
        for (index, &byte) in data.iter().enumerate() {
            if byte == PREAMBLE_BYTE {
                self.run += 1;
                continue;
            }

            let run = std::mem::take(&mut self.run);
            if byte == SFD_BYTE && run >= self.preamble_min {
                trace!("Start-of-frame delimiter after {} preamble bytes", run);
                return SyncOutcome::Locked { consumed: index + 1 };
            }
            if self.mode == PreambleMode::Dix && run > self.preamble_min {
                trace!("DIX preamble of {} bytes without delimiter", run);
                return SyncOutcome::Locked { consumed: index };
            }
        }

        SyncOutcome::NeedMore { consumed: data.len() }
    }

    /// Length of the preamble run carried over from previous scans
    pub fn pending_run(&self) -> usize {
        self.run
    }

    pub fn reset(&mut self) {
        self.run = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strict() -> Synchronizer {
        Synchronizer::new(7, PreambleMode::Strict)
    }

    #[test]
    fn locks_after_preamble_and_delimiter() {
        let mut sync = strict();
        let data = [0xff, 0x12, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xab, 0x00];
        assert_eq!(sync.scan(&data), SyncOutcome::Locked { consumed: 10 });
    }

    #[test]
    fn longer_preamble_is_accepted() {
        let mut sync = strict();
        let mut data = vec![0xaa; 20];
        data.push(0xab);
        assert_eq!(sync.scan(&data), SyncOutcome::Locked { consumed: 21 });
    }

    #[test]
    fn short_preamble_is_noise() {
        let mut sync = strict();
        let data = [0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xab, 0x00];
        assert_eq!(sync.scan(&data), SyncOutcome::NeedMore { consumed: 8 });
        assert_eq!(sync.pending_run(), 0);
    }

    #[test]
    fn interrupted_run_resynchronizes() {
        let mut sync = strict();
        let mut data = vec![0xaa; 5];
        data.push(0x01);
        data.extend_from_slice(&[0xaa; 7]);
        data.push(0xab);
        assert_eq!(sync.scan(&data), SyncOutcome::Locked { consumed: data.len() });
    }

    #[test]
    fn run_survives_chunk_boundaries() {
        let mut sync = strict();
        assert_eq!(sync.scan(&[0x00, 0xaa, 0xaa, 0xaa]), SyncOutcome::NeedMore { consumed: 4 });
        assert_eq!(sync.pending_run(), 3);
        assert_eq!(sync.scan(&[0xaa, 0xaa]), SyncOutcome::NeedMore { consumed: 2 });
        assert_eq!(sync.scan(&[0xaa, 0xaa, 0xab, 0x42]), SyncOutcome::Locked { consumed: 3 });
        assert_eq!(sync.pending_run(), 0);
    }

    #[test]
    fn strict_mode_ignores_dix_lead_in() {
        let mut sync = strict();
        let mut data = vec![0xaa; 8];
        data.push(0x00);
        assert_eq!(sync.scan(&data), SyncOutcome::NeedMore { consumed: 9 });
    }

    #[test]
    fn dix_mode_accepts_undelimited_preamble() {
        let mut sync = Synchronizer::new(7, PreambleMode::Dix);
        let mut data = vec![0xaa; 8];
        data.push(0x00);
        assert_eq!(sync.scan(&data), SyncOutcome::Locked { consumed: 8 });

        let mut data = vec![0xaa; 7];
        data.push(0xab);
        assert_eq!(sync.scan(&data), SyncOutcome::Locked { consumed: 8 });

        let mut data = vec![0xaa; 7];
        data.push(0x00);
        assert_eq!(sync.scan(&data), SyncOutcome::NeedMore { consumed: 8 });
    }
}
