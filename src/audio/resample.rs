//! Channel mixing and sample-rate conversion for captured audio.
//!
//! Microphones usually deliver 44.1 or 48 kHz stereo; the transcription
//! endpoint gets a mono clip at the configured rate (16 kHz by default).
//!
//! 1. [`downmix`] averages interleaved channels into mono.
//! 2. [`Resampler`] converts between rates with linear interpolation,
//!    one capture chunk at a time.

/// Mix interleaved multi-channel audio down to mono by averaging each frame.
///
/// Output length is `samples.len() / channels`; a trailing partial frame is
/// dropped.  Zero channels yields an empty vector.
///
/// ```rust
/// use panya_chat::audio::downmix;
///
/// let stereo = vec![0.5_f32, -0.5, 0.2, 0.4]; // L R L R
/// let mono = downmix(&stereo, 2);
/// assert_eq!(mono.len(), 2);
/// assert!((mono[1] - 0.3).abs() < 1e-6);
/// ```
pub fn downmix(samples: &[f32], channels: u16) -> Vec<f32> {
    match channels {
        0 => Vec::new(),
        1 => samples.to_vec(),
        n => {
            let n = n as usize;
            samples
                .chunks_exact(n)
                .map(|frame| frame.iter().sum::<f32>() / n as f32)
                .collect()
        }
    }
}

/// Streaming linear resampler for mono audio arriving in chunks.
///
/// The read position and the last input sample carry over from one chunk to
/// the next, so interpolation runs across chunk boundaries and the output
/// length tracks real time instead of rounding up per chunk.
///
/// ```rust
/// use panya_chat::audio::Resampler;
///
/// let mut rs = Resampler::new(16_000);
/// let mut out = Vec::new();
/// for _ in 0..100 {
///     out.extend(rs.process(&[0.5_f32; 480], 48_000)); // 10 ms @ 48 kHz
/// }
/// assert_eq!(out.len(), 16_000);                       // 1 s @ 16 kHz
/// ```
#[derive(Debug, Clone)]
pub struct Resampler {
    target_rate: u32,
    /// Next output position in input samples, relative to the start of the
    /// next chunk.  Negative values fall between `prev` and that chunk.
    pos: f64,
    prev: Option<f32>,
}

impl Resampler {
    pub fn new(target_rate: u32) -> Self {
        Self {
            target_rate,
            pos: 0.0,
            prev: None,
        }
    }

    pub fn target_rate(&self) -> u32 {
        self.target_rate
    }

    /// Convert one chunk from `source_rate` to the target rate.
    ///
    /// Equal rates pass the chunk through unchanged, as does a zero source
    /// rate.
    pub fn process(&mut self, samples: &[f32], source_rate: u32) -> Vec<f32> {
        if source_rate == self.target_rate || source_rate == 0 || self.target_rate == 0 {
            self.prev = samples.last().copied().or(self.prev);
            return samples.to_vec();
        }
        let Some(&last_sample) = samples.last() else {
            return Vec::new();
        };

        let step = source_rate as f64 / self.target_rate as f64;
        let last = (samples.len() - 1) as f64;
        let prev = self.prev.unwrap_or(samples[0]);
        let mut out = Vec::with_capacity((samples.len() as f64 / step) as usize + 1);

        while self.pos <= last {
            let value = if self.pos < 0.0 {
                let frac = (self.pos + 1.0) as f32;
                prev + (samples[0] - prev) * frac
            } else {
                let idx = self.pos as usize;
                let next = (idx + 1).min(samples.len() - 1);
                let frac = (self.pos - idx as f64) as f32;
                samples[idx] + (samples[next] - samples[idx]) * frac
            };
            out.push(value);
            self.pos += step;
        }

        self.pos -= samples.len() as f64;
        self.prev = Some(last_sample);
        out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downmix_mono_is_identity() {
        let input = vec![0.1_f32, 0.2, 0.3];
        assert_eq!(downmix(&input, 1), input);
    }

    #[test]
    fn downmix_two_channel_averages_frames() {
        let out = downmix(&[1.0_f32, -1.0, 0.5, 0.5], 2);
        assert_eq!(out.len(), 2);
        assert!(out[0].abs() < 1e-6);
        assert!((out[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn downmix_drops_partial_frame() {
        let out = downmix(&[0.2_f32, 0.4, 0.9], 2);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn downmix_zero_channels() {
        assert!(downmix(&[1.0_f32, 2.0], 0).is_empty());
    }

    #[test]
    fn same_rate_is_passthrough() {
        let input: Vec<f32> = (0..160).map(|i| i as f32 / 160.0).collect();
        let mut rs = Resampler::new(16_000);
        assert_eq!(rs.process(&input, 16_000), input);
    }

    #[test]
    fn empty_chunk_yields_nothing() {
        let mut rs = Resampler::new(16_000);
        assert!(rs.process(&[], 48_000).is_empty());
    }

    #[test]
    fn one_second_of_44100_in_512_frame_chunks() {
        let input = vec![0.0_f32; 44_100];
        let mut rs = Resampler::new(16_000);
        let total: usize = input.chunks(512).map(|c| rs.process(c, 44_100).len()).sum();
        assert!(total.abs_diff(16_000) <= 1, "got {total}");
    }

    #[test]
    fn preserves_dc_level() {
        let mut rs = Resampler::new(16_000);
        let out = rs.process(&[0.5_f32; 480], 48_000);
        assert_eq!(out.len(), 160);
        assert!(out.iter().all(|s| (s - 0.5).abs() < 1e-5));
    }

    /// A ramp split into chunks comes out exactly as if it had been one
    /// chunk: linear interpolation reproduces a linear signal.
    #[test]
    fn interpolates_across_chunk_boundaries() {
        let ramp: Vec<f32> = (0..1_000).map(|i| i as f32 / 1_000.0).collect();
        let mut rs = Resampler::new(16_000);
        let out: Vec<f32> = ramp
            .chunks(100)
            .flat_map(|c| rs.process(c, 44_100))
            .collect();

        let step = 44_100.0 / 16_000.0;
        assert_eq!(out.len(), 363);
        for (k, s) in out.iter().enumerate() {
            let expected = (k as f64 * step / 1_000.0) as f32;
            assert!((s - expected).abs() < 1e-4, "sample {k}: {s} vs {expected}");
        }
    }

    #[test]
    fn upsampling_carries_the_half_step_into_the_next_chunk() {
        let mut rs = Resampler::new(16_000);
        let first = rs.process(&[0.0_f32; 80], 8_000);
        let second = rs.process(&[1.0_f32; 80], 8_000);

        assert_eq!(first.len(), 159);
        assert_eq!(second.len(), 160);
        // Halfway between the last sample of the first chunk and the first
        // sample of the second.
        assert!((second[0] - 0.5).abs() < 1e-6);
    }
}
