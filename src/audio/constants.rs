/// Audio processing constants and helper functions
/// Separated from the plugin wrapper so the engine can be used without a host
use nih_plug::util;
use std::time::Duration;

/// Gain parameter range (the same window the level meter shows)
pub const GAIN_MIN_DB: f32 = -60.0;
pub const GAIN_MAX_DB: f32 = 12.0;
pub const GAIN_RANGE_DB: f32 = GAIN_MAX_DB - GAIN_MIN_DB; // 72dB range

/// Parameter resolution as exposed to the host
pub const GAIN_STEP_DB: f32 = 0.1;

/// Unity gain
pub const DEFAULT_GAIN_DB: f32 = 0.0;

/// Level reported for a block with no signal at all
pub const SILENCE_FLOOR_DB: f32 = -60.0;

/// Length of a gain ramp, independent of how far the gain moves
pub const DEFAULT_RAMP_SECONDS: f32 = 0.05;

/// Observer cadence (roughly what an editor repaint timer uses)
pub const METER_POLL_HZ: u64 = 30;
pub const POLL_INTERVAL: Duration = Duration::from_micros(1_000_000 / METER_POLL_HZ);

/// Meter colour zones
pub const METER_CAUTION_DB: f32 = -12.0;
pub const METER_HOT_DB: f32 = -3.0;

// === HELPER FUNCTIONS ===

/// Clamp a decibel value into the gain parameter range.
///
/// NaN has no meaningful position in the range, so it falls back to unity gain.
pub fn clamp_gain_db(db: f32) -> f32 {
    if db.is_nan() {
        DEFAULT_GAIN_DB
    } else {
        db.clamp(GAIN_MIN_DB, GAIN_MAX_DB)
    }
}

/// `linear = 10^(dB / 20)`
#[inline]
pub fn decibels_to_linear(db: f32) -> f32 {
    util::db_to_gain(db)
}

/// `dB = 20 * log10(linear)`, never reporting anything below the silence floor.
#[inline]
pub fn linear_to_decibels(linear: f32) -> f32 {
    if linear > 0.0 {
        util::gain_to_db(linear).max(SILENCE_FLOOR_DB)
    } else {
        SILENCE_FLOOR_DB
    }
}

/// Convert a level in dB to a normalized meter position (0.0 to 1.0)
pub fn level_to_normalized(level_db: f32) -> f32 {
    ((level_db - GAIN_MIN_DB) / GAIN_RANGE_DB).clamp(0.0, 1.0)
}
