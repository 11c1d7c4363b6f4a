use crate::audio::constants::{level_to_normalized, METER_CAUTION_DB, METER_HOT_DB};
use crate::audio::meter_communication::PeakLevelReader;

/// Colour band a level falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeterZone {
    /// Below -12 dB
    Safe,
    /// -12 dB up to -3 dB
    Caution,
    /// -3 dB and above, approaching or past full scale
    Hot,
}

impl MeterZone {
    pub fn for_level(level_db: f32) -> Self {
        if level_db < METER_CAUTION_DB {
            MeterZone::Safe
        } else if level_db < METER_HOT_DB {
            MeterZone::Caution
        } else {
            MeterZone::Hot
        }
    }
}

/// Everything a meter needs to draw one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeterReading {
    pub level_db: f32,
    /// Position on the -60..=12 dB scale, 0.0 to 1.0
    pub normalized: f32,
    pub zone: MeterZone,
}

impl MeterReading {
    pub fn from_level(level_db: f32) -> Self {
        Self {
            level_db,
            normalized: level_to_normalized(level_db),
            zone: MeterZone::for_level(level_db),
        }
    }
}

/// Observer side of the peak meter, polled from the UI or a telemetry loop.
///
/// Readings are passed through as-is, without ballistics, so the display tracks the audio
/// thread's per-block peak exactly. Poll at [`POLL_INTERVAL`](crate::audio::constants::POLL_INTERVAL).
#[derive(Clone)]
pub struct MeterEngine {
    reader: PeakLevelReader,
}

impl MeterEngine {
    pub fn new(reader: PeakLevelReader) -> Self {
        Self { reader }
    }

    /// Read the latest level. Never blocks on the audio thread.
    pub fn poll(&self) -> MeterReading {
        MeterReading::from_level(self.reader.query())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::constants::SILENCE_FLOOR_DB;
    use crate::audio::meter_communication::create_level_channel;
    use rstest::rstest;

    #[rstest]
    #[case(-60.0, MeterZone::Safe)]
    #[case(-12.1, MeterZone::Safe)]
    #[case(-12.0, MeterZone::Caution)]
    #[case(-3.1, MeterZone::Caution)]
    #[case(-3.0, MeterZone::Hot)]
    #[case(6.0, MeterZone::Hot)]
    fn zones(#[case] level_db: f32, #[case] zone: MeterZone) {
        assert_eq!(MeterZone::for_level(level_db), zone);
    }

    #[test]
    fn poll_reflects_latest_publish() {
        let (publisher, reader) = create_level_channel();
        let meter = MeterEngine::new(reader);

        let idle = meter.poll();
        assert_eq!(idle.level_db, SILENCE_FLOOR_DB);
        assert_eq!(idle.normalized, 0.0);
        assert_eq!(idle.zone, MeterZone::Safe);

        publisher.publish(12.0);
        let hot = meter.poll();
        assert_eq!(hot.normalized, 1.0);
        assert_eq!(hot.zone, MeterZone::Hot);
        assert_eq!(meter.poll(), hot);
    }
}
