//! Stream types for consuming frames from a spawned processor

mod events;

pub use events::{FrameEvent, FrameEvents};
