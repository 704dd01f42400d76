//! Recording workflow: one microphone capture-and-transcribe attempt.
//!
//! [`RecordingPhase`] is the state machine the recording modal renders.
//!
//! ```text
//! Idle ──start──▶ Recording ──stop──▶ Transcribing ──complete──▶ (closed)
//!   │                 │
//!   └─────cancel──────┴──▶ (closed)
//! ```
//!
//! The open device and the second ticker live inside the `Recording`
//! variant.  Leaving that variant, by any path, drops both: the microphone
//! is released and the timer stops.

use std::fmt;
use std::time::Instant;

use thiserror::Error;

use crate::audio::{ActiveCapture, AudioClip, CaptureError, ClipBuffer, InputDevice, WaveformData};
use crate::chat::Composer;
use crate::transport::TransportError;

use super::ticker::SecondTicker;

// ---------------------------------------------------------------------------
// RecordingError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum RecordingError {
    /// The input device could not be opened, or the clip could not be encoded.
    #[error("microphone unavailable: {0}")]
    Device(#[from] CaptureError),

    #[error("transcription failed: {0}")]
    Transcription(#[from] TransportError),

    #[error("cannot {action} while {phase}")]
    InvalidTransition {
        phase: &'static str,
        action: &'static str,
    },
}

// ---------------------------------------------------------------------------
// RecordingPhase
// ---------------------------------------------------------------------------

/// Live state of an open microphone.
pub struct ActiveRecording {
    elapsed_secs: u32,
    buffer: ClipBuffer,
    capture: Box<dyn ActiveCapture>,
    ticker: SecondTicker,
}

impl fmt::Debug for ActiveRecording {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveRecording")
            .field("elapsed_secs", &self.elapsed_secs)
            .field("buffered_samples", &self.buffer.len())
            .field("ticker", &self.ticker)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub enum RecordingPhase {
    /// Modal open, microphone closed.
    Idle,
    /// Microphone open; audio is being buffered.
    Recording(ActiveRecording),
    /// Clip handed off; waiting for the transcript.
    Transcribing { elapsed_secs: u32 },
}

impl RecordingPhase {
    pub fn label(&self) -> &'static str {
        match self {
            RecordingPhase::Idle => "idle",
            RecordingPhase::Recording(_) => "recording",
            RecordingPhase::Transcribing { .. } => "transcribing",
        }
    }
}

// ---------------------------------------------------------------------------
// RecordingWorkflow
// ---------------------------------------------------------------------------

/// One recording session, from modal open to transcript (or cancel).
///
/// The owner keeps it in an `Option`; `None` means no session.  Methods
/// that end the session tell the owner to drop it.
#[derive(Debug)]
pub struct RecordingWorkflow {
    phase: RecordingPhase,
    sample_rate: u32,
    max_secs: u32,
}

impl RecordingWorkflow {
    /// `max_secs == 0` disables the automatic stop.
    pub fn new(sample_rate: u32, max_secs: u32) -> Self {
        Self {
            phase: RecordingPhase::Idle,
            sample_rate,
            max_secs,
        }
    }

    pub fn phase(&self) -> &RecordingPhase {
        &self.phase
    }

    /// Seconds recorded so far; frozen once transcription starts.
    pub fn elapsed_secs(&self) -> u32 {
        match &self.phase {
            RecordingPhase::Idle => 0,
            RecordingPhase::Recording(active) => active.elapsed_secs,
            RecordingPhase::Transcribing { elapsed_secs } => *elapsed_secs,
        }
    }

    /// Whether the input device is currently open.
    pub fn holds_device(&self) -> bool {
        matches!(self.phase, RecordingPhase::Recording(_))
    }

    pub fn max_secs(&self) -> u32 {
        self.max_secs
    }

    /// `Idle → Recording`.
    ///
    /// On failure the phase stays `Idle` and nothing is held; the caller
    /// closes the session.
    pub fn start(&mut self, device: &dyn InputDevice, now: Instant) -> Result<(), RecordingError> {
        if !matches!(self.phase, RecordingPhase::Idle) {
            return Err(self.invalid("start"));
        }

        let capture = device.acquire().map_err(|e| {
            log::error!("recording: microphone access failed: {e}");
            RecordingError::Device(e)
        })?;

        self.phase = RecordingPhase::Recording(ActiveRecording {
            elapsed_secs: 0,
            buffer: ClipBuffer::new(self.sample_rate),
            capture,
            ticker: SecondTicker::start(now),
        });
        log::debug!("recording: idle -> recording");
        Ok(())
    }

    /// Pull captured audio and advance the timer.
    ///
    /// Returns `true` once the recording has reached its length limit; the
    /// caller should then [`stop`](Self::stop).
    pub fn poll(&mut self, now: Instant) -> bool {
        let RecordingPhase::Recording(active) = &mut self.phase else {
            return false;
        };

        for chunk in active.capture.drain_chunks() {
            active.buffer.push_chunk(&chunk);
        }
        active.elapsed_secs = active.elapsed_secs.saturating_add(active.ticker.due(now));

        self.max_secs > 0 && active.elapsed_secs >= self.max_secs
    }

    /// Recent input level for the modal's bar chart.
    pub fn waveform(&self, num_bars: usize) -> WaveformData {
        match &self.phase {
            RecordingPhase::Recording(active) => {
                WaveformData::tail(active.buffer.samples(), self.sample_rate as usize, num_bars)
            }
            _ => WaveformData {
                bars: vec![0.0; num_bars],
            },
        }
    }

    /// `Recording → Transcribing`: release the device and return the clip.
    ///
    /// An encoding failure closes the session like a device failure.
    pub fn stop(&mut self) -> Result<AudioClip, RecordingError> {
        let active = match std::mem::replace(&mut self.phase, RecordingPhase::Idle) {
            RecordingPhase::Recording(active) => active,
            other => {
                self.phase = other;
                return Err(self.invalid("stop"));
            }
        };

        let ActiveRecording {
            elapsed_secs,
            mut buffer,
            mut capture,
            ..
        } = active;

        for chunk in capture.drain_chunks() {
            buffer.push_chunk(&chunk);
        }
        drop(capture);

        let clip = AudioClip::encode(buffer.samples(), buffer.target_rate())?;
        log::debug!(
            "recording: recording -> transcribing ({:.1}s, {} bytes)",
            clip.duration_secs,
            clip.wav.len()
        );
        self.phase = RecordingPhase::Transcribing { elapsed_secs };
        Ok(clip)
    }

    /// Abort without transcribing.  Rejected once the clip has been sent.
    ///
    /// On success the session is over and should be dropped.
    pub fn cancel(&mut self) -> Result<(), RecordingError> {
        if matches!(self.phase, RecordingPhase::Transcribing { .. }) {
            return Err(self.invalid("cancel"));
        }
        log::debug!("recording: {} -> cancelled", self.phase.label());
        self.phase = RecordingPhase::Idle;
        Ok(())
    }

    /// Finish the session with the transcription result.
    ///
    /// A transcript is merged into the composer draft; a failure leaves the
    /// draft untouched and is returned for display.
    pub fn complete(
        self,
        result: Result<String, TransportError>,
        composer: &mut Composer,
    ) -> Result<(), RecordingError> {
        if !matches!(self.phase, RecordingPhase::Transcribing { .. }) {
            log::warn!(
                "recording: transcript arrived while {}, ignoring",
                self.phase.label()
            );
            return Err(self.invalid("complete"));
        }

        let transcript = result?;
        log::debug!("recording: transcript received ({} chars)", transcript.chars().count());
        composer.merge_transcript(&transcript);
        Ok(())
    }

    fn invalid(&self, action: &'static str) -> RecordingError {
        RecordingError::InvalidTransition {
            phase: self.phase.label(),
            action,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
