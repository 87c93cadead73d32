use embassy_time::Timer;
use log::*;

use compost_core::SlotBank;

use crate::sensor::SensorSource;
use crate::settings::SAMPLE_INTERVAL;

/// Polls every source once per sampling interval and publishes the readings.
/// A failed or unreadable sample is logged and skipped; the slots keep their
/// previous values and the task simply waits for the next cycle.
///
/// The delay runs after the loop body, so the effective cadence drifts by the
/// cost of the sensor reads.
pub async fn sample<const N: usize>(
    bank: &'static SlotBank<N>,
    mut sources: Vec<Box<dyn SensorSource>>,
) {
    loop {
        for source in sources.iter_mut() {
            match source.acquire() {
                Ok(readings) => {
                    if !bank.publish(&readings) {
                        warn!("sample rejected, sensor answered with NaN");
                    }
                }
                Err(err) => warn!("sensor read failed: {err}"),
            }
        }

        Timer::after(SAMPLE_INTERVAL).await;
    }
}
