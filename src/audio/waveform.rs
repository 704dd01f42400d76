//! Level bars for the recording modal.
//!
//! The modal redraws a small bar chart a few times per second while the
//! microphone is open.  Only the most recent slice of audio is summarised so
//! the bars react to what the user is saying now, not to the whole clip.

/// RMS amplitude per bar, each in `[0.0, 1.0]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaveformData {
    pub bars: Vec<f32>,
}

impl WaveformData {
    /// Summarise the last `window` samples of `audio` into `num_bars` bars.
    ///
    /// Audio shorter than the window is left-padded with silent bars so the
    /// newest sound always sits on the right edge.
    ///
    /// ```rust
    /// use panya_chat::audio::WaveformData;
    ///
    /// let audio = vec![0.5_f32; 32_000];
    /// let w = WaveformData::tail(&audio, 16_000, 24);
    /// assert_eq!(w.bars.len(), 24);
    /// assert!(w.bars.iter().all(|&b| (b - 0.5).abs() < 1e-4));
    /// ```
    pub fn tail(audio: &[f32], window: usize, num_bars: usize) -> Self {
        if num_bars == 0 || window == 0 {
            return Self::default();
        }

        let start = audio.len().saturating_sub(window);
        let recent = &audio[start..];
        let per_bar = (window / num_bars).max(1);

        let filled: Vec<f32> = recent.chunks(per_bar).map(rms).collect();
        let filled = &filled[filled.len().saturating_sub(num_bars)..];

        let mut bars = vec![0.0; num_bars - filled.len()];
        bars.extend_from_slice(filled);
        Self { bars }
    }

    /// Loudest bar, or `0.0` when empty.
    pub fn peak(&self) -> f32 {
        self.bars.iter().copied().fold(0.0_f32, f32::max)
    }
}

fn rms(chunk: &[f32]) -> f32 {
    if chunk.is_empty() {
        return 0.0;
    }
    let mean_sq = chunk.iter().map(|s| s * s).sum::<f32>() / chunk.len() as f32;
    mean_sq.sqrt().min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_audio_is_right_aligned() {
        // One bar's worth of sound in a 10-bar window.
        let audio = vec![0.5_f32; 100];
        let w = WaveformData::tail(&audio, 1_000, 10);

        assert_eq!(w.bars.len(), 10);
        assert!(w.bars[..9].iter().all(|&b| b == 0.0));
        assert!((w.bars[9] - 0.5).abs() < 1e-4);
    }

    #[test]
    fn only_the_tail_is_summarised() {
        let mut audio = vec![1.0_f32; 5_000];
        audio.extend(vec![0.0_f32; 1_000]);
        let w = WaveformData::tail(&audio, 1_000, 10);
        assert_eq!(w.peak(), 0.0);
    }

    #[test]
    fn full_scale_is_clamped() {
        let w = WaveformData::tail(&vec![1.0_f32; 2_000], 1_000, 10);
        assert!(w.bars.iter().all(|&b| (0.0..=1.0).contains(&b)));
    }

    #[test]
    fn empty_audio_is_silent() {
        let w = WaveformData::tail(&[], 1_000, 8);
        assert_eq!(w.bars, vec![0.0; 8]);
    }

    #[test]
    fn zero_bars_is_empty() {
        assert!(WaveformData::tail(&[0.3; 50], 1_000, 0).bars.is_empty());
    }
}
