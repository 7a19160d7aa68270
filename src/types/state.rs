//! Processor lifecycle states

use std::fmt;

use serde::{Deserialize, Serialize};

/// Position of the processor in its read/synchronize/decode cycle
///
/// ```text
/// AwaitingData -> Synchronizing -> Capturing -> Decoding -> Synchronizing ...
///                                                     \-> Completed | Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcessorState {
    /// Suspended until the source delivers another chunk
    AwaitingData,

    /// Looking for a preamble and start-of-frame delimiter
    Synchronizing,

    /// Inside a frame, looking for the interframe gap
    Capturing,

    /// A bounded run is being split into header, payload and check field
    Decoding,

    /// Source reached end of stream
    Completed,

    /// Source reported a transport error
    Failed,
}

impl ProcessorState {
    pub fn is_terminal(self) -> bool {
        matches!(self, ProcessorState::Completed | ProcessorState::Failed)
    }
}

impl fmt::Display for ProcessorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProcessorState::AwaitingData => "awaiting-data",
            ProcessorState::Synchronizing => "synchronizing",
            ProcessorState::Capturing => "capturing",
            ProcessorState::Decoding => "decoding",
            ProcessorState::Completed => "completed",
            ProcessorState::Failed => "failed",
        };
        f.write_str(name)
    }
}
