use log::warn;

use crate::backend::ValueStore;
use crate::reading::SlotDef;
use crate::slots::SlotBank;
use crate::upload::{plan_writes, PathScheme};

/// One dispatcher cycle: snapshot all slots under a single lock acquisition,
/// release the lock, then issue one fire-and-forget write per planned target.
/// Returns the number of writes issued. The dispatcher never waits for an
/// acknowledgement — a failed write surfaces later through its completion
/// callback, is logged, and the next cycle simply runs again.
pub fn dispatch_cycle<const N: usize, S: ValueStore>(
    bank: &SlotBank<N>,
    defs: &[SlotDef],
    scheme: &PathScheme,
    timestamp: Option<u64>,
    store: &mut S,
) -> usize {
    let snapshot = bank.snapshot();
    let targets = plan_writes(defs, &snapshot, scheme, timestamp);
    let issued = targets.len();

    for target in targets {
        let path = target.path.clone();
        store.set(
            target,
            Box::new(move |result| {
                if let Err(err) = result {
                    warn!("remote write to {path} failed: {err}");
                }
            }),
        );
    }

    issued
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Completion, RemoteError};
    use crate::reading::{Quantity, SensorReading, SlotDef};
    use crate::upload::{UploadTarget, Value};

    const DEFS: &[SlotDef] = &[
        SlotDef::new("soil_sensor1/moisture", Quantity::MoisturePct),
        SlotDef::new("soil_sensor2/moisture", Quantity::MoisturePct),
    ];

    #[derive(Default)]
    struct FakeStore {
        issued: Vec<UploadTarget>,
        pending: Vec<Completion>,
    }

    impl ValueStore for FakeStore {
        fn set(&mut self, target: UploadTarget, done: Completion) {
            self.issued.push(target);
            self.pending.push(done);
        }
    }

    impl FakeStore {
        fn fail_all(&mut self) {
            for done in self.pending.drain(..) {
                done(Err(RemoteError::Status(503)));
            }
        }
    }

    #[test]
    fn cycle_issues_one_write_per_slot_from_one_snapshot() {
        let bank = SlotBank::<2>::new();
        bank.write_all(&[SensorReading::new(0, 40.0), SensorReading::new(1, 80.0)]);

        let mut store = FakeStore::default();
        let scheme = PathScheme::latest("UsersData/u1");
        let issued = dispatch_cycle(&bank, DEFS, &scheme, None, &mut store);

        assert_eq!(issued, 2);
        assert_eq!(store.issued[0].path, "UsersData/u1/soil_sensor1/moisture");
        assert_eq!(store.issued[0].value, Value::Int(40));
        assert_eq!(store.issued[1].value, Value::Int(80));
    }

    #[test]
    fn failed_writes_are_not_retried_on_the_next_cycle() {
        let bank = SlotBank::<2>::new();
        let mut store = FakeStore::default();
        let scheme = PathScheme::latest("UsersData/u1");

        dispatch_cycle(&bank, DEFS, &scheme, None, &mut store);
        store.fail_all();

        // Next cycle issues exactly the regular writes again — nothing queued
        // up from the failures.
        dispatch_cycle(&bank, DEFS, &scheme, None, &mut store);
        assert_eq!(store.issued.len(), 4);
    }

    #[test]
    fn dispatched_values_are_the_last_written_per_slot() {
        let bank = SlotBank::<2>::new();
        bank.write(0, 10.0);
        bank.write(0, 30.0);
        bank.write(1, 70.0);

        let mut store = FakeStore::default();
        let scheme = PathScheme::latest("UsersData/u1");
        dispatch_cycle(&bank, DEFS, &scheme, None, &mut store);

        assert_eq!(store.issued[0].value, Value::Int(30));
        assert_eq!(store.issued[1].value, Value::Int(70));
    }
}
