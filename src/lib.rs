pub mod audio;
pub mod state;

use audio::audio_engine::{AudioEngine, EngineConfig};
use audio::constants::{DEFAULT_GAIN_DB, GAIN_MAX_DB, GAIN_MIN_DB, GAIN_STEP_DB};
use audio::gain_parameter::GainParameter;
use audio::meter_engine::MeterEngine;
use nih_plug::prelude::*;
use nih_plug::wrapper::state::PluginState;
use std::sync::Arc;

pub use audio::meter_communication::PeakLevelReader;
pub use state::GainState;

/// Smoothed gain with a per-block peak meter
pub struct GainMeter {
    params: Arc<GainMeterParams>,
    engine: AudioEngine,
}

#[derive(Params)]
pub struct GainMeterParams {
    /// The parameter's ID is used to identify the parameter in the wrapped plugin API. As long as
    /// these IDs remain constant, you can rename and reorder these fields as you wish. The ID
    /// also keys the saved state, see [`state::GAIN_PARAM_ID`].
    #[id = "gain"]
    pub gain: FloatParam,
}

impl Default for GainMeter {
    fn default() -> Self {
        let params = Arc::new(GainMeterParams::default());
        let gain = Arc::new(GainParameter::new(params.gain.value()));

        Self {
            params,
            engine: AudioEngine::with_gain_parameter(EngineConfig::default(), gain),
        }
    }
}

impl Default for GainMeterParams {
    fn default() -> Self {
        Self {
            // Stored directly as decibels. The engine does its own linear ramp on the converted
            // value, so the parameter itself is left unsmoothed.
            gain: FloatParam::new(
                "Gain",
                DEFAULT_GAIN_DB,
                FloatRange::Linear {
                    min: GAIN_MIN_DB,
                    max: GAIN_MAX_DB,
                },
            )
            .with_step_size(GAIN_STEP_DB)
            .with_unit(" dB")
            .with_value_to_string(formatters::v2s_f32_rounded(1)),
        }
    }
}

impl GainMeter {
    /// Observer for the peak meter, safe to poll from any thread
    pub fn meter(&self) -> MeterEngine {
        MeterEngine::new(self.engine.level_reader())
    }

    /// The gain the engine currently works towards. Changes go through the `gain` parameter,
    /// which is copied into the engine at the start of every block.
    pub fn gain_decibels(&self) -> f32 {
        self.engine.gain_decibels()
    }
}

impl Plugin for GainMeter {
    const NAME: &'static str = "Gain Meter";
    const VENDOR: &'static str = "Cmdv";
    const URL: &'static str = env!("CARGO_PKG_HOMEPAGE");
    const EMAIL: &'static str = "info@cmdv.me";

    const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    // The first audio IO layout is used as the default. Input and output channel counts always
    // match, there is no up or down mixing.
    const AUDIO_IO_LAYOUTS: &'static [AudioIOLayout] = &[
        AudioIOLayout {
            main_input_channels: NonZeroU32::new(2),
            main_output_channels: NonZeroU32::new(2),

            aux_input_ports: &[],
            aux_output_ports: &[],

            names: PortNames::const_default(),
        },
        AudioIOLayout {
            main_input_channels: NonZeroU32::new(1),
            main_output_channels: NonZeroU32::new(1),
            ..AudioIOLayout::const_default()
        },
    ];

    const MIDI_INPUT: MidiConfig = MidiConfig::None;
    const MIDI_OUTPUT: MidiConfig = MidiConfig::None;

    // The engine picks up the gain once per block and publishes one peak per block, so the host
    // must not split blocks at automation points
    const SAMPLE_ACCURATE_AUTOMATION: bool = false;

    type SysExMessage = ();
    type BackgroundTask = ();

    fn params(&self) -> Arc<dyn Params> {
        self.params.clone()
    }

    fn filter_state(state: &mut PluginState) {
        crate::state::sanitize_plugin_state(state);
    }

    fn initialize(
        &mut self,
        audio_io_layout: &AudioIOLayout,
        buffer_config: &BufferConfig,
        _context: &mut impl InitContext<Self>,
    ) -> bool {
        nih_plug::nih_log!(
            "Plugin initialize called, {} channels, buffer_size: {}",
            audio_io_layout
                .main_output_channels
                .map(NonZeroU32::get)
                .unwrap_or(0),
            buffer_config.max_buffer_size
        );

        if !buffer_config.sample_rate.is_finite() || buffer_config.sample_rate <= 0.0 {
            nih_plug::nih_error!(
                "Refusing to run at a sample rate of {}",
                buffer_config.sample_rate
            );
            return false;
        }

        // The host may have restored a saved gain before we got here
        self.engine.set_gain_decibels(self.params.gain.value());
        self.engine.prepare(
            buffer_config.sample_rate,
            buffer_config.max_buffer_size as usize,
        );

        true
    }

    fn reset(&mut self) {
        // Can be called from the audio thread, `AudioEngine::reset()` doesn't allocate
        self.engine.set_gain_decibels(self.params.gain.value());
        self.engine.reset();
    }

    fn process(
        &mut self,
        buffer: &mut Buffer,
        _aux: &mut AuxiliaryBuffers,
        _context: &mut impl ProcessContext<Self>,
    ) -> ProcessStatus {
        self.engine.set_gain_decibels(self.params.gain.value());
        self.engine.process_block(buffer.as_slice());

        ProcessStatus::Normal
    }
}

impl ClapPlugin for GainMeter {
    const CLAP_ID: &'static str = "me.cmdv.gain-meter";
    const CLAP_DESCRIPTION: Option<&'static str> =
        Some("Smoothed gain control with a lock-free peak level meter");
    const CLAP_MANUAL_URL: Option<&'static str> = Some(Self::URL);
    const CLAP_SUPPORT_URL: Option<&'static str> = None;

    const CLAP_FEATURES: &'static [ClapFeature] = &[
        ClapFeature::AudioEffect,
        ClapFeature::Stereo,
        ClapFeature::Mono,
        ClapFeature::Utility,
    ];
}

impl Vst3Plugin for GainMeter {
    const VST3_CLASS_ID: [u8; 16] = *b"CmdvGainMeter001";

    const VST3_SUBCATEGORIES: &'static [Vst3SubCategory] =
        &[Vst3SubCategory::Fx, Vst3SubCategory::Tools];
}

nih_export_clap!(GainMeter);
nih_export_vst3!(GainMeter);
