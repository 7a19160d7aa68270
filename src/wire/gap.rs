//! Interframe gap detection

use super::IDLE_BYTE;

/// Incremental search for a run of idle bytes long enough to end a frame
///
/// The detector remembers how far into the current capture it has scanned
/// and how long the trailing idle run is, so each byte of a capture is
/// inspected once no matter how the capture was chunked. Idle runs shorter
/// than `gap_min` are ordinary frame data.
#[derive(Debug, Clone)]
pub struct GapDetector {
    gap_min: usize,
    idle_run: usize,
    scanned: usize,
}

impl GapDetector {
    pub fn new(gap_min: usize) -> Self {
        Self { gap_min, idle_run: 0, scanned: 0 }
    }

    /// Scan a capture (always starting at the first frame byte) for a gap
    ///
    /// Returns the offset of the first gap byte, which is also the length of
    /// the frame run.
    pub fn scan(&mut self, capture: &[u8]) -> Option<usize> {
        let fresh = capture.get(self.scanned..).unwrap_or_default();

        for &byte in fresh {
            self.scanned += 1;
            if byte != IDLE_BYTE {
                self.idle_run = 0;
                continue;
            }

            self.idle_run += 1;
            if self.idle_run >= self.gap_min {
                return Some(self.scanned - self.gap_min);
            }
        }

        None
    }

    /// Whether `bytes` is on its own a qualifying gap
    pub fn is_gap(&self, bytes: &[u8]) -> bool {
        bytes.len() >= self.gap_min && bytes.iter().all(|&b| b == IDLE_BYTE)
    }

    pub fn gap_min(&self) -> usize {
        self.gap_min
    }

    /// Forget the current capture
    pub fn reset(&mut self) {
        self.idle_run = 0;
        self.scanned = 0;
    }
}
