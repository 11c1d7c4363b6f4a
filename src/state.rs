//! Saving and restoring the gain across sessions.
//!
//! Nothing in here is allowed to fail outwards: anything that cannot be read back turns into
//! unity gain before it gets near the engine.

use crate::audio::constants::{clamp_gain_db, DEFAULT_GAIN_DB};
use nih_plug::wrapper::state::{ParamValue, PluginState};
use serde::{Deserialize, Serialize};

/// ID of the gain parameter in the host's saved state
pub const GAIN_PARAM_ID: &str = "gain";

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Could not parse the saved gain state: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Saved gain is not a finite number: {0}")]
    NonFinite(f32),
    #[error("Saved state does not contain a gain value")]
    Missing,
    #[error("Saved gain has the wrong type, expected a float")]
    WrongType,
}

/// Everything that gets persisted: a single gain in dB
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainState {
    gain_db: f32,
}

/// On-disk form. The `type` tag is checked on the way back in, anything other than
/// `GainMeterState` is rejected.
#[derive(Serialize, Deserialize)]
#[serde(tag = "type")]
enum SavedState {
    GainMeterState { gain: f32 },
}

impl Default for GainState {
    fn default() -> Self {
        Self {
            gain_db: DEFAULT_GAIN_DB,
        }
    }
}

impl GainState {
    /// Clamped to the gain parameter's range
    pub fn new(gain_db: f32) -> Self {
        Self {
            gain_db: clamp_gain_db(gain_db),
        }
    }

    pub fn gain_db(&self) -> f32 {
        self.gain_db
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, StateError> {
        Ok(serde_json::to_vec(&SavedState::GainMeterState {
            gain: self.gain_db,
        })?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StateError> {
        let SavedState::GainMeterState { gain } = serde_json::from_slice(bytes)?;
        Self::checked(gain)
    }

    /// Restore from bytes, falling back to unity gain on anything unreadable.
    pub fn from_bytes_or_default(bytes: &[u8]) -> Self {
        Self::from_bytes(bytes).unwrap_or_else(|err| {
            nih_plug::nih_warn!("{err}, restoring the default gain");
            Self::default()
        })
    }

    /// Pull the gain out of the state nih_plug saved for the host
    pub fn from_plugin_state(state: &PluginState) -> Result<Self, StateError> {
        match state.params.get(GAIN_PARAM_ID) {
            Some(ParamValue::F32(gain_db)) => Self::checked(*gain_db),
            Some(_) => Err(StateError::WrongType),
            None => Err(StateError::Missing),
        }
    }

    pub fn write_to(&self, state: &mut PluginState) {
        state
            .params
            .insert(GAIN_PARAM_ID.to_string(), ParamValue::F32(self.gain_db));
    }

    fn checked(gain_db: f32) -> Result<Self, StateError> {
        if gain_db.is_finite() {
            Ok(Self::new(gain_db))
        } else {
            Err(StateError::NonFinite(gain_db))
        }
    }
}

/// Make sure a restored plugin state always carries a usable gain value.
pub fn sanitize_plugin_state(state: &mut PluginState) {
    let gain = GainState::from_plugin_state(state).unwrap_or_else(|err| {
        nih_plug::nih_warn!("{err}, restoring the default gain");
        GainState::default()
    });
    gain.write_to(state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn plugin_state(gain: Option<ParamValue>) -> PluginState {
        let mut params = BTreeMap::new();
        if let Some(gain) = gain {
            params.insert(GAIN_PARAM_ID.to_string(), gain);
        }

        PluginState {
            version: String::from("0.1.0"),
            params,
            fields: BTreeMap::new(),
        }
    }

    fn restored_gain(state: &PluginState) -> Option<f32> {
        match state.params.get(GAIN_PARAM_ID) {
            Some(ParamValue::F32(gain_db)) => Some(*gain_db),
            _ => None,
        }
    }

    #[test]
    fn bytes_round_trip() {
        let bytes = GainState::new(-7.5).to_bytes().unwrap();
        assert_eq!(GainState::from_bytes(&bytes).unwrap().gain_db(), -7.5);
    }

    #[test]
    fn encoded_form_is_tagged() {
        let bytes = GainState::new(3.0).to_bytes().unwrap();
        let json = String::from_utf8(bytes).unwrap();
        assert_eq!(json, r#"{"type":"GainMeterState","gain":3.0}"#);
    }

    #[test]
    fn out_of_range_gain_is_clamped_on_restore() {
        let state = GainState::from_bytes(br#"{"type":"GainMeterState","gain":40.0}"#).unwrap();
        assert_eq!(state.gain_db(), 12.0);
    }

    #[test]
    fn malformed_bytes_fall_back_to_unity() {
        let cases: [&[u8]; 7] = [
            b"",
            b"not json",
            br#"{"type":"GainMeterState"}"#,
            br#"{"type":"SomethingElse","gain":-3.0}"#,
            br#"{"gain":-3.0}"#,
            br#"{"type":"GainMeterState","gain":"loud"}"#,
            br#"{"type":"GainMeterState","gain":null}"#,
        ];
        for bytes in cases {
            assert!(GainState::from_bytes(bytes).is_err());
            assert_eq!(GainState::from_bytes_or_default(bytes), GainState::default());
        }
    }

    #[test]
    fn valid_plugin_state_is_kept() {
        let mut state = plugin_state(Some(ParamValue::F32(-18.0)));
        sanitize_plugin_state(&mut state);
        assert_eq!(restored_gain(&state), Some(-18.0));
    }

    #[test]
    fn missing_gain_gets_default() {
        let mut state = plugin_state(None);
        assert!(matches!(
            GainState::from_plugin_state(&state),
            Err(StateError::Missing)
        ));

        sanitize_plugin_state(&mut state);
        assert_eq!(restored_gain(&state), Some(DEFAULT_GAIN_DB));
    }

    #[test]
    fn mistyped_or_non_finite_gain_gets_default() {
        for value in [
            ParamValue::Bool(true),
            ParamValue::String(String::from("-6")),
            ParamValue::F32(f32::NAN),
            ParamValue::F32(f32::INFINITY),
        ] {
            let mut state = plugin_state(Some(value));
            sanitize_plugin_state(&mut state);
            assert_eq!(restored_gain(&state), Some(DEFAULT_GAIN_DB));
        }
    }

    #[test]
    fn out_of_range_plugin_state_is_clamped() {
        let mut state = plugin_state(Some(ParamValue::F32(-75.0)));
        sanitize_plugin_state(&mut state);
        assert_eq!(restored_gain(&state), Some(-60.0));
    }
}
