use crate::audio::constants::linear_to_decibels;

/// Running maximum of `|sample|` over a single block.
///
/// This is an instantaneous per-block peak: there is no attack, release or hold, so the value
/// only ever describes the block it was accumulated over.
#[derive(Debug, Default, Clone, Copy)]
pub struct PeakDetector {
    peak: f32,
}

impl PeakDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous block.
    #[inline]
    pub fn reset(&mut self) {
        self.peak = 0.0;
    }

    #[inline]
    pub fn accumulate(&mut self, sample: f32) {
        // `f32::max` ignores a NaN operand, so a NaN sample can't poison the meter
        self.peak = self.peak.max(sample.abs());
    }

    #[cfg(test)]
    fn peak_linear(&self) -> f32 {
        self.peak
    }

    /// Peak in dB, or the silence floor when nothing but zeroes went through.
    pub fn peak_decibels(&self) -> f32 {
        linear_to_decibels(self.peak)
    }
}

/// Calculate the peak level in dB across every channel of a block.
pub fn calculate_peak_level<C: AsRef<[f32]>>(channels: &[C]) -> f32 {
    let mut detector = PeakDetector::new();
    for channel in channels {
        for &sample in channel.as_ref() {
            detector.accumulate(sample);
        }
    }

    detector.peak_decibels()
}
