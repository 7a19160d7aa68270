//! Tunable thresholds for synchronization, gap detection and event delivery.
//!
//! Defaults follow IEEE 802.3 line conventions. Configuration can be built in
//! code or loaded from YAML:
//!
//! ```rust
//! use etherstream::{PreambleMode, ProcessorConfig};
//!
//! let config = ProcessorConfig::from_yaml_str(
//!     "deframer:\n  gap_min: 16\n  preamble_mode: dix\nevent_capacity: 8\n",
//! )
//! .unwrap();
//! assert_eq!(config.deframer.gap_min, 16);
//! assert_eq!(config.deframer.preamble_min, 7);
//! assert_eq!(config.deframer.preamble_mode, PreambleMode::Dix);
//! ```

use serde::{Deserialize, Serialize};

use crate::{Result, StreamError};

/// Minimum number of `0xAA` bytes forming a preamble
pub const DEFAULT_PREAMBLE_LEN: usize = 7;

/// Minimum number of idle bytes forming an interframe gap
pub const DEFAULT_GAP_LEN: usize = 12;

/// Default capacity of the spawned processor's event channel
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// How a preamble is terminated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreambleMode {
    /// Preamble must end in the `0xAB` start-of-frame delimiter
    #[default]
    Strict,

    /// Also accept a DIX lead-in of at least `preamble_min + 1` `0xAA` bytes
    /// followed directly by frame data
    Dix,
}

/// Thresholds used by the [`Deframer`](crate::Deframer)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeframerConfig {
    /// Minimum preamble run length
    pub preamble_min: usize,

    /// Minimum idle run that closes a frame
    pub gap_min: usize,

    /// Delimiter handling
    pub preamble_mode: PreambleMode,

    /// Decode a pending capture at end of stream instead of dropping it
    pub flush_on_end: bool,
}

impl Default for DeframerConfig {
    fn default() -> Self {
        Self {
            preamble_min: DEFAULT_PREAMBLE_LEN,
            gap_min: DEFAULT_GAP_LEN,
            preamble_mode: PreambleMode::Strict,
            flush_on_end: false,
        }
    }
}

impl DeframerConfig {
    /// Reject thresholds that would make synchronization meaningless
    pub fn validate(&self) -> Result<()> {
        if self.preamble_min == 0 {
            return Err(StreamError::config("preamble_min must be at least 1"));
        }
        if self.gap_min == 0 {
            return Err(StreamError::config("gap_min must be at least 1"));
        }
        Ok(())
    }
}

/// Configuration for a [`FrameProcessor`](crate::FrameProcessor)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    pub deframer: DeframerConfig,

    /// Bound on undelivered events when the processor runs as a task
    pub event_capacity: usize,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self { deframer: DeframerConfig::default(), event_capacity: DEFAULT_EVENT_CAPACITY }
    }
}

impl ProcessorConfig {
    /// Parse and validate a YAML configuration document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: ProcessorConfig = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.deframer.validate()?;
        if self.event_capacity == 0 {
            return Err(StreamError::config("event_capacity must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_line_conventions() {
        let config = ProcessorConfig::default();
        assert_eq!(config.deframer.preamble_min, 7);
        assert_eq!(config.deframer.gap_min, 12);
        assert_eq!(config.deframer.preamble_mode, PreambleMode::Strict);
        assert!(!config.deframer.flush_on_end);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_yaml_yields_defaults() {
        let config = ProcessorConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, ProcessorConfig::default());
    }

    #[test]
    fn zero_thresholds_are_rejected() {
        let err = ProcessorConfig::from_yaml_str("deframer:\n  gap_min: 0\n").unwrap_err();
        assert!(matches!(err, StreamError::Config { .. }));

        let err = ProcessorConfig::from_yaml_str("event_capacity: 0\n").unwrap_err();
        assert!(err.to_string().contains("event_capacity"));
    }

    #[test]
    fn malformed_yaml_is_a_config_error() {
        let err = ProcessorConfig::from_yaml_str("deframer: [1, 2").unwrap_err();
        assert!(matches!(err, StreamError::Config { .. }));
    }
}
