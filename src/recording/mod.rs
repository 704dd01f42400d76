//! Microphone recording workflow and its one-second timer.

pub mod ticker;
pub mod workflow;

pub use ticker::SecondTicker;
pub use workflow::{ActiveRecording, RecordingError, RecordingPhase, RecordingWorkflow};
