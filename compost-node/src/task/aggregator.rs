use embassy_time::Timer;
use log::*;

use compost_core::aggregate::mean;
use compost_core::SlotBank;

use crate::settings::AGGREGATE_INTERVAL;

/// Named slot groups to average, e.g. all temperature slots of the climate
/// node.
pub type AggregateGroups = &'static [(&'static str, &'static [usize])];

/// Reports the arithmetic mean of each slot group on its own timer. Purely
/// derived diagnostics; nothing feeds back into sampling or dispatch.
pub async fn aggregate<const N: usize>(bank: &'static SlotBank<N>, groups: AggregateGroups) {
    loop {
        Timer::after(AGGREGATE_INTERVAL).await;

        let snapshot = bank.snapshot();
        for (label, slots) in groups {
            let values: Vec<f32> = slots.iter().map(|&slot| snapshot[slot]).collect();
            info!("mean {label} over {} sensors: {:.1}", values.len(), mean(&values));
        }
    }
}
