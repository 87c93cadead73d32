use std::sync::Mutex;

use crate::reading::SensorReading;

/// Fixed set of shared scalar slots, one per sensor value, guarded by a
/// single coarse lock. Each slot has exactly one writer (its sampling task);
/// the dispatcher only ever reads. The bank lives in a `static` for the whole
/// process lifetime.
///
/// Writers hold the lock only for the assignment itself — sensor I/O happens
/// before `publish` is called. The dispatcher holds it only for the copy-out
/// in `snapshot`, which is therefore a single point-in-time view of all
/// slots.
pub struct SlotBank<const N: usize> {
    values: Mutex<[f32; N]>,
}

impl<const N: usize> SlotBank<N> {
    pub const fn new() -> Self {
        Self {
            values: Mutex::new([0.0; N]),
        }
    }

    /// Stores a sample set, or rejects it wholesale when any value is the
    /// not-a-number fault sentinel. Returns whether the set was stored; a
    /// rejected set leaves every slot at its previous value.
    pub fn publish(&self, samples: &[SensorReading]) -> bool {
        if samples.iter().any(|s| !s.value.is_finite()) {
            return false;
        }
        self.write_all(samples);
        true
    }

    pub fn write(&self, slot: usize, value: f32) {
        let mut values = self.values.lock().unwrap();
        values[slot] = value;
    }

    /// Stores several readings under one lock acquisition, for sensors that
    /// yield more than one value per read (temperature + humidity).
    pub fn write_all(&self, samples: &[SensorReading]) {
        let mut values = self.values.lock().unwrap();
        for sample in samples {
            values[sample.slot] = sample.value;
        }
    }

    /// Copies all slots out under one lock acquisition.
    pub fn snapshot(&self) -> [f32; N] {
        *self.values.lock().unwrap()
    }
}

impl<const N: usize> Default for SlotBank<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn publish_stores_finite_samples() {
        let bank = SlotBank::<3>::new();
        assert!(bank.publish(&[SensorReading::new(0, 21.5), SensorReading::new(2, 63.0)]));
        assert_eq!(bank.snapshot(), [21.5, 0.0, 63.0]);
    }

    #[test]
    fn nan_read_leaves_slot_unchanged_and_lock_usable() {
        let bank = SlotBank::<2>::new();
        bank.write(0, 42.0);

        assert!(!bank.publish(&[SensorReading::new(0, f32::NAN)]));
        assert_eq!(bank.snapshot()[0], 42.0);

        // The lock must still be usable after the rejected cycle.
        bank.write(0, 43.0);
        assert_eq!(bank.snapshot()[0], 43.0);
    }

    #[test]
    fn mixed_sample_set_with_nan_is_rejected_wholesale() {
        let bank = SlotBank::<2>::new();
        bank.write_all(&[SensorReading::new(0, 1.0), SensorReading::new(1, 2.0)]);

        assert!(!bank.publish(&[
            SensorReading::new(0, 5.0),
            SensorReading::new(1, f32::NAN),
        ]));
        assert_eq!(bank.snapshot(), [1.0, 2.0]);
    }

    // A writer keeps a slot pair equal under one lock acquisition; every
    // snapshot must observe the pair equal — no torn reads across slots.
    #[test]
    fn snapshot_is_not_torn_across_slots() {
        static BANK: SlotBank<2> = SlotBank::new();

        let stop = Arc::new(AtomicBool::new(false));
        let writer_stop = stop.clone();
        let writer = std::thread::spawn(move || {
            let mut v = 0.0f32;
            while !writer_stop.load(Ordering::Relaxed) {
                v += 1.0;
                BANK.write_all(&[SensorReading::new(0, v), SensorReading::new(1, v)]);
            }
        });

        for _ in 0..10_000 {
            let snap = BANK.snapshot();
            assert_eq!(snap[0], snap[1], "snapshot saw a half-written pair");
        }

        stop.store(true, Ordering::Relaxed);
        writer.join().unwrap();
    }
}
