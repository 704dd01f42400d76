//! Audio side of voice input: microphone capture → mono clip → WAV.
//!
//! # Pipeline
//!
//! ```text
//! Microphone → cpal callback → AudioChunk (mpsc) → ClipBuffer
//!            (downmix + streaming resample) → AudioClip::encode (WAV)
//! ```
//!
//! The recording workflow owns the [`ActiveCapture`] returned by
//! [`InputDevice::acquire`]; dropping it releases the microphone.

pub mod buffer;
pub mod capture;
pub mod clip;
pub mod resample;
pub mod waveform;

pub use buffer::ClipBuffer;
pub use capture::{ActiveCapture, AudioChunk, CaptureError, InputDevice, Microphone};
pub use clip::AudioClip;
pub use resample::{downmix, Resampler};
pub use waveform::WaveformData;
