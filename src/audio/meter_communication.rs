use crate::audio::constants::SILENCE_FLOOR_DB;
use atomic_float::AtomicF32;
use std::sync::{atomic::Ordering, Arc};

/// Peak level sent from the audio thread to the observers.
///
/// There is a single slot: every publish overwrites the previous value whether or not anybody
/// read it. Observers only care about the current level, so losing intermediate blocks is fine.
pub struct PeakLevelPublisher {
    level_db: Arc<AtomicF32>,
}

impl PeakLevelPublisher {
    /// Store the latest block's peak (called from audio thread)
    /// Must be real-time safe - no allocations or locks
    #[inline]
    pub fn publish(&self, level_db: f32) {
        self.level_db.store(level_db, Ordering::Relaxed);
    }

    /// Create another reader for the same slot
    pub fn reader(&self) -> PeakLevelReader {
        PeakLevelReader {
            level_db: self.level_db.clone(),
        }
    }
}

/// Read side of the peak level slot. Cheap to clone, one per observer.
#[derive(Clone)]
pub struct PeakLevelReader {
    level_db: Arc<AtomicF32>,
}

impl PeakLevelReader {
    /// Most recently published level. Never blocks, and reading does not consume the value.
    pub fn query(&self) -> f32 {
        self.level_db.load(Ordering::Relaxed)
    }
}

/// Factory function to create the level slot
/// Returns (publisher for audio thread, reader for observers)
pub fn create_level_channel() -> (PeakLevelPublisher, PeakLevelReader) {
    let publisher = PeakLevelPublisher {
        level_db: Arc::new(AtomicF32::new(SILENCE_FLOOR_DB)),
    };
    let reader = publisher.reader();

    (publisher, reader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn starts_at_silence() {
        let (_publisher, reader) = create_level_channel();
        assert_eq!(reader.query(), SILENCE_FLOOR_DB);
    }

    #[test]
    fn last_publish_wins() {
        let (publisher, reader) = create_level_channel();
        publisher.publish(-20.0);
        publisher.publish(-3.5);
        assert_eq!(reader.query(), -3.5);
    }

    #[test]
    fn query_is_idempotent() {
        let (publisher, reader) = create_level_channel();
        publisher.publish(-12.0);
        let second = reader.clone();
        for _ in 0..5 {
            assert_eq!(reader.query(), -12.0);
            assert_eq!(second.query(), -12.0);
        }
    }

    #[test]
    fn visible_from_another_thread() {
        let (publisher, reader) = create_level_channel();
        let writer = thread::spawn(move || {
            for i in 0..1000 {
                publisher.publish(-(i % 60) as f32);
            }
            publisher.publish(-1.0);
        });
        writer.join().unwrap();

        assert_eq!(reader.query(), -1.0);
    }
}
