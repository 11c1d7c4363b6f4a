use crate::audio::constants::{clamp_gain_db, DEFAULT_GAIN_DB};
use atomic_float::AtomicF32;
use std::sync::atomic::Ordering;

/// The user facing gain in decibels.
///
/// Written by the host or the editor, read once per block by the audio thread. The value is
/// stored in a single atomic so neither side can observe a torn write, and it is clamped on the
/// way in so the audio thread never has to validate it.
pub struct GainParameter {
    db: AtomicF32,
}

impl Default for GainParameter {
    fn default() -> Self {
        Self::new(DEFAULT_GAIN_DB)
    }
}

impl GainParameter {
    pub fn new(db: f32) -> Self {
        Self {
            db: AtomicF32::new(clamp_gain_db(db)),
        }
    }

    /// Store a new gain, clamped to -60..=12 dB.
    pub fn set_decibels(&self, db: f32) {
        self.db.store(clamp_gain_db(db), Ordering::Relaxed);
    }

    pub fn decibels(&self) -> f32 {
        self.db.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::constants::{GAIN_MAX_DB, GAIN_MIN_DB};
    use quickcheck::quickcheck;
    use rstest::rstest;

    #[test]
    fn defaults_to_unity() {
        assert_eq!(GainParameter::default().decibels(), 0.0);
    }

    #[rstest]
    #[case(-90.0, -60.0)]
    #[case(-60.0, -60.0)]
    #[case(-6.0, -6.0)]
    #[case(12.0, 12.0)]
    #[case(24.5, 12.0)]
    fn set_decibels_clamps(#[case] input: f32, #[case] expected: f32) {
        let param = GainParameter::default();
        param.set_decibels(input);
        assert_eq!(param.decibels(), expected);
    }

    #[test]
    fn new_clamps_too() {
        assert_eq!(GainParameter::new(100.0).decibels(), GAIN_MAX_DB);
    }

    quickcheck! {
        fn always_within_range(db: f32) -> bool {
            let param = GainParameter::default();
            param.set_decibels(db);
            let stored = param.decibels();
            (GAIN_MIN_DB..=GAIN_MAX_DB).contains(&stored)
        }
    }
}
