//! Finished recordings, packaged for upload.

use std::io::Cursor;

use super::capture::CaptureError;

/// One finished recording as a mono 16-bit PCM WAV file.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    /// Complete WAV file bytes (header included).
    pub wav: Vec<u8>,
    pub sample_rate: u32,
    pub duration_secs: f32,
}

impl AudioClip {
    /// Multipart file name used for the upload.
    pub const FILE_NAME: &'static str = "recording.wav";
    pub const MIME: &'static str = "audio/wav";

    /// Encode mono `samples` in `[-1.0, 1.0]` as a WAV clip.
    ///
    /// Out-of-range samples are clamped rather than wrapped.
    pub fn encode(samples: &[f32], sample_rate: u32) -> Result<Self, CaptureError> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut cursor = Cursor::new(Vec::new());
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        for &s in samples {
            writer.write_sample((s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)?;
        }
        writer.finalize()?;

        let duration_secs = if sample_rate == 0 {
            0.0
        } else {
            samples.len() as f32 / sample_rate as f32
        };

        Ok(Self {
            wav: cursor.into_inner(),
            sample_rate,
            duration_secs,
        })
    }
}
