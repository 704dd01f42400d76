//! Microphone capture via `cpal`.
//!
//! [`InputDevice`] is the seam the recording workflow talks to: acquiring it
//! opens the hardware stream and hands back an [`ActiveCapture`].  Dropping
//! the capture closes the stream and releases the device, so every exit path
//! of a recording session releases the microphone without extra bookkeeping.
//!
//! [`Microphone`] is the production implementation.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::mpsc;
use thiserror::Error;

// ---------------------------------------------------------------------------
// AudioChunk
// ---------------------------------------------------------------------------

/// A single buffer of raw audio as delivered by the cpal callback.
///
/// Samples are interleaved `f32` in the range `[-1.0, 1.0]`.
#[derive(Debug, Clone)]
pub struct AudioChunk {
    /// Interleaved PCM samples in `[-1.0, 1.0]`.
    pub samples: Vec<f32>,
    /// Sample rate of this chunk in Hz (e.g. 44100, 48000).
    pub sample_rate: u32,
    /// Number of interleaved channels.
    pub channels: u16,
}

// ---------------------------------------------------------------------------
// CaptureError
// ---------------------------------------------------------------------------

/// Errors that can occur while opening the microphone or packaging a clip.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no input device found on the default audio host")]
    NoDevice,

    #[error("input device `{0}` not found")]
    DeviceNotFound(String),

    #[error("failed to enumerate input devices: {0}")]
    Devices(#[from] cpal::DevicesError),

    #[error("failed to query default input config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("unsupported sample format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to build input stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("failed to encode recording: {0}")]
    Encode(#[from] hound::Error),
}

// ---------------------------------------------------------------------------
// InputDevice / ActiveCapture
// ---------------------------------------------------------------------------

/// Something that can grant exclusive access to an audio input.
pub trait InputDevice {
    /// Open the input and start delivering audio.
    ///
    /// # Errors
    ///
    /// Any [`CaptureError`]; a denied OS permission surfaces here as a
    /// stream build/play error.
    fn acquire(&self) -> Result<Box<dyn ActiveCapture>, CaptureError>;
}

/// A live, exclusively held input stream.  Dropping it releases the device.
pub trait ActiveCapture {
    /// Take every chunk delivered since the previous call, oldest first.
    fn drain_chunks(&mut self) -> Vec<AudioChunk>;
}

// ---------------------------------------------------------------------------
// Microphone
// ---------------------------------------------------------------------------

/// The system microphone, opened through the default cpal host.
#[derive(Debug, Clone, Default)]
pub struct Microphone {
    /// Exact device name to open; `None` picks the host default.
    device_name: Option<String>,
}

impl Microphone {
    pub fn new(device_name: Option<String>) -> Self {
        Self { device_name }
    }

    fn find_device(&self) -> Result<cpal::Device, CaptureError> {
        let host = cpal::default_host();
        match &self.device_name {
            None => host.default_input_device().ok_or(CaptureError::NoDevice),
            Some(wanted) => host
                .input_devices()?
                .find(|d| d.name().is_ok_and(|n| &n == wanted))
                .ok_or_else(|| CaptureError::DeviceNotFound(wanted.clone())),
        }
    }
}

impl InputDevice for Microphone {
    fn acquire(&self) -> Result<Box<dyn ActiveCapture>, CaptureError> {
        let device = self.find_device()?;
        let supported = device.default_input_config()?;

        let sample_rate = supported.sample_rate().0;
        let channels = supported.channels();
        let format = supported.sample_format();
        let config: cpal::StreamConfig = supported.into();

        let (tx, rx) = mpsc::channel::<AudioChunk>();
        let on_error = |err: cpal::StreamError| log::error!("cpal stream error: {err}");

        // Receiver may be gone while the stream winds down; send errors are ignored.
        let stream = match format {
            cpal::SampleFormat::F32 => device.build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let _ = tx.send(AudioChunk {
                        samples: data.to_vec(),
                        sample_rate,
                        channels,
                    });
                },
                on_error,
                None,
            )?,
            cpal::SampleFormat::I16 => device.build_input_stream(
                &config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    let _ = tx.send(AudioChunk {
                        samples: data.iter().map(|&s| s as f32 / i16::MAX as f32).collect(),
                        sample_rate,
                        channels,
                    });
                },
                on_error,
                None,
            )?,
            other => return Err(CaptureError::UnsupportedFormat(format!("{other:?}"))),
        };

        stream.play()?;
        log::info!("microphone acquired ({sample_rate} Hz, {channels} ch)");

        Ok(Box::new(CpalCapture {
            _stream: stream,
            rx,
        }))
    }
}

/// Keeps the cpal stream alive; dropping it stops the hardware stream.
struct CpalCapture {
    _stream: cpal::Stream,
    rx: mpsc::Receiver<AudioChunk>,
}

impl ActiveCapture for CpalCapture {
    fn drain_chunks(&mut self) -> Vec<AudioChunk> {
        self.rx.try_iter().collect()
    }
}

impl Drop for CpalCapture {
    fn drop(&mut self) {
        log::info!("microphone released");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// `AudioChunk` must be `Send` so it can cross from the cpal thread.
    #[test]
    fn audio_chunk_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<AudioChunk>();
    }

    #[test]
    fn input_device_is_object_safe() {
        let mic: Box<dyn InputDevice> = Box::new(Microphone::new(None));
        drop(mic);
    }

    #[test]
    fn unknown_device_name_is_reported() {
        let err = CaptureError::DeviceNotFound("Studio Mic".into());
        assert_eq!(err.to_string(), "input device `Studio Mic` not found");
    }
}
