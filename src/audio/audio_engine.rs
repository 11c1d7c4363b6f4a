use crate::audio::constants::{decibels_to_linear, DEFAULT_RAMP_SECONDS};
use crate::audio::gain_parameter::GainParameter;
use crate::audio::meter_communication::{create_level_channel, PeakLevelPublisher, PeakLevelReader};
use crate::audio::peak_detector::PeakDetector;
use crate::audio::smoother::GainSmoother;
use std::sync::Arc;

/// Settings that only take effect on the next `prepare()`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// How long a gain change takes to complete
    pub ramp_seconds: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ramp_seconds: DEFAULT_RAMP_SECONDS,
        }
    }
}

/// Gain and peak metering for one plugin instance.
///
/// `process_block()` runs on the audio thread and only touches atomics and plain fields. The
/// gain parameter and the level reader are shared with the host and the observers through
/// `Arc`s handed out by [`AudioEngine::gain_parameter()`] and [`AudioEngine::level_reader()`].
pub struct AudioEngine {
    config: EngineConfig,
    gain: Arc<GainParameter>,
    smoother: GainSmoother,
    peak: PeakDetector,
    publisher: PeakLevelPublisher,

    sample_rate: f32,
    max_block_size: usize,
}

impl Default for AudioEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl AudioEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_gain_parameter(config, Arc::new(GainParameter::default()))
    }

    /// Build an engine around a gain parameter that already lives somewhere else
    pub fn with_gain_parameter(config: EngineConfig, gain: Arc<GainParameter>) -> Self {
        let (publisher, _) = create_level_channel();
        let smoother = GainSmoother::new(decibels_to_linear(gain.decibels()));

        Self {
            config,
            gain,
            smoother,
            peak: PeakDetector::new(),
            publisher,
            sample_rate: 0.0,
            max_block_size: 0,
        }
    }

    /// Session setup. Must not run concurrently with `process_block()`.
    pub fn prepare(&mut self, sample_rate: f32, max_block_size: usize) {
        self.sample_rate = sample_rate;
        self.max_block_size = max_block_size;
        self.smoother.reset(sample_rate, self.config.ramp_seconds);
        self.reset();

        nih_plug::nih_log!(
            "Engine prepared: {} Hz, {} samples per block, {} sample gain ramp",
            sample_rate,
            max_block_size,
            self.smoother.ramp_length()
        );
    }

    /// Drop any ramp in progress and sit at the current parameter value. Real-time safe.
    pub fn reset(&mut self) {
        self.smoother
            .set_current_and_target(decibels_to_linear(self.gain.decibels()));
        self.peak.reset();
    }

    /// Change the ramp length. Applied on the next `prepare()`.
    pub fn set_config(&mut self, config: EngineConfig) {
        self.config = config;
    }

    /// Apply the smoothed gain to every sample in place and publish the block's peak.
    ///
    /// Channels are processed one after the other and the smoother advances once per sample
    /// of every channel. Never allocates, locks or logs.
    pub fn process_block<C: AsMut<[f32]>>(&mut self, channels: &mut [C]) {
        self.smoother
            .set_target(decibels_to_linear(self.gain.decibels()));
        self.peak.reset();

        for channel in channels.iter_mut() {
            for sample in channel.as_mut() {
                let gain = self.smoother.next_value();
                *sample *= gain;
                self.peak.accumulate(*sample);
            }
        }

        self.publisher.publish(self.peak.peak_decibels());
    }

    /// Clamped to -60..=12 dB
    pub fn set_gain_decibels(&self, db: f32) {
        self.gain.set_decibels(db);
    }

    pub fn gain_decibels(&self) -> f32 {
        self.gain.decibels()
    }

    /// Peak of the last processed block. Never blocks.
    pub fn peak_level_decibels(&self) -> f32 {
        self.publisher.reader().query()
    }

    pub fn gain_parameter(&self) -> Arc<GainParameter> {
        self.gain.clone()
    }

    pub fn level_reader(&self) -> PeakLevelReader {
        self.publisher.reader()
    }

    pub fn smoother(&self) -> &GainSmoother {
        &self.smoother
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn max_block_size(&self) -> usize {
        self.max_block_size
    }
}
