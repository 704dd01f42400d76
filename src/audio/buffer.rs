//! Growing buffer that turns raw capture chunks into one mono clip.
//!
//! Every chunk is downmixed and resampled to the target rate as it arrives,
//! so the buffer always holds audio that is ready to encode.  Nothing is
//! ever overwritten: a recording keeps everything from the first chunk to
//! the last.

use super::capture::AudioChunk;
use super::resample::{downmix, Resampler};

/// Ordered accumulation of captured audio for one recording.
#[derive(Debug, Clone)]
pub struct ClipBuffer {
    samples: Vec<f32>,
    resampler: Resampler,
}

impl ClipBuffer {
    /// Create an empty buffer producing mono audio at `target_rate` Hz.
    pub fn new(target_rate: u32) -> Self {
        Self {
            samples: Vec::new(),
            resampler: Resampler::new(target_rate),
        }
    }

    /// Append one capture chunk in arrival order.
    pub fn push_chunk(&mut self, chunk: &AudioChunk) {
        let mono = downmix(&chunk.samples, chunk.channels);
        let converted = self.resampler.process(&mono, chunk.sample_rate);
        self.samples.extend_from_slice(&converted);
    }

    /// Mono samples at [`target_rate`](Self::target_rate).
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn target_rate(&self) -> u32 {
        self.resampler.target_rate()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(samples: Vec<f32>, sample_rate: u32, channels: u16) -> AudioChunk {
        AudioChunk {
            samples,
            sample_rate,
            channels,
        }
    }

    #[test]
    fn chunks_are_kept_in_arrival_order() {
        let mut buf = ClipBuffer::new(16_000);
        buf.push_chunk(&chunk(vec![0.1, 0.2], 16_000, 1));
        buf.push_chunk(&chunk(vec![0.3], 16_000, 1));

        assert_eq!(buf.samples(), &[0.1, 0.2, 0.3]);
    }

    #[test]
    fn stereo_48k_becomes_mono_16k() {
        let mut buf = ClipBuffer::new(16_000);
        // 10 ms of 48 kHz stereo = 480 frames = 960 interleaved samples
        buf.push_chunk(&chunk(vec![0.25; 960], 48_000, 2));

        assert_eq!(buf.len(), 160);
        assert!(buf.samples().iter().all(|s| (s - 0.25).abs() < 1e-5));
    }

    /// Small callbacks must not stretch the clip: two seconds of 44.1 kHz
    /// stereo in 512-frame chunks stays two seconds long.
    #[test]
    fn many_small_chunks_keep_real_time_length() {
        let mut buf = ClipBuffer::new(16_000);
        let frames = vec![0.0_f32; 2 * 44_100 * 2];
        for part in frames.chunks(512 * 2) {
            buf.push_chunk(&chunk(part.to_vec(), 44_100, 2));
        }

        assert!(buf.len().abs_diff(32_000) <= 1, "got {}", buf.len());
    }

    #[test]
    fn new_buffer_is_empty() {
        let buf = ClipBuffer::new(16_000);
        assert!(buf.is_empty());
        assert_eq!(buf.target_rate(), 16_000);
    }
}
