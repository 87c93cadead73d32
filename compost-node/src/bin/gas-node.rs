//! Gas node: three MQ-4 methane heads and three MQ-135 CO2 heads on ADC1.
//! Writes a fixed session root plus a log mirror keyed by epoch seconds, so
//! the clock is SNTP-synced before anything is dispatched.

use std::rc::Rc;

use esp_idf_hal::adc::oneshot::AdcDriver;
use esp_idf_hal::cpu::Core;
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use log::*;

use compost_core::{Quantity, SlotBank, SlotDef};
use compost_node::configuration::{
    GAS_LATEST_ROOT, GAS_LOG_ROOT, MQ135_PPM_WINDOW, MQ135_RLOAD, MQ135_RZERO, MQ4_CALIBRATION,
};
use compost_node::errors::InitError;
use compost_node::sensor::{analog_percent_probe, mq135_probe, Mq135};
use compost_node::settings::GAS_DISPATCH_INTERVAL;
use compost_node::task::dispatcher::{self, DatabaseRoot};
use compost_node::task::{keepalive, sampler, sender, session};
use compost_node::{
    schedule, services, TASK_HIGH_PRIORITY, TASK_LOW_PRIORITY, TASK_MID_PRIORITY,
};

static BANK: SlotBank<6> = SlotBank::new();

const DEFS: &[SlotDef] = &[
    SlotDef::new("sensor1/methane", Quantity::MethanePct),
    SlotDef::new("sensor2/methane", Quantity::MethanePct),
    SlotDef::new("sensor3/methane", Quantity::MethanePct),
    SlotDef::new("sensor1/co2", Quantity::Co2Pct),
    SlotDef::new("sensor2/co2", Quantity::Co2Pct),
    SlotDef::new("sensor3/co2", Quantity::Co2Pct),
];

fn main() -> Result<(), InitError> {
    esp_idf_sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();
    info!("gas node starting");

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    let wifi = services::wifi(peripherals.modem, sysloop, Some(nvs))?;
    // The log mirror is keyed by epoch seconds; block until the clock is real.
    let _sntp = services::sntp_sync()?;

    let adc1 = peripherals.adc1;
    let (mq4_1, mq4_2, mq4_3) = (
        peripherals.pins.gpio32,
        peripherals.pins.gpio33,
        peripherals.pins.gpio34,
    );
    let (mq135_1, mq135_2, mq135_3) = (
        peripherals.pins.gpio35,
        peripherals.pins.gpio36,
        peripherals.pins.gpio39,
    );

    let sensors = schedule(
        b"sensors\0",
        8192,
        TASK_MID_PRIORITY,
        Some(Core::Core1),
        move |executor| {
            let adc = Rc::new(AdcDriver::new(adc1)?);
            let curve = Mq135::new(MQ135_RZERO, MQ135_RLOAD);
            let sources = vec![
                analog_percent_probe(&adc, mq4_1, 0, MQ4_CALIBRATION)?,
                analog_percent_probe(&adc, mq4_2, 1, MQ4_CALIBRATION)?,
                analog_percent_probe(&adc, mq4_3, 2, MQ4_CALIBRATION)?,
                mq135_probe(&adc, mq135_1, 3, curve, MQ135_PPM_WINDOW)?,
                mq135_probe(&adc, mq135_2, 4, curve, MQ135_PPM_WINDOW)?,
                mq135_probe(&adc, mq135_3, 5, curve, MQ135_PPM_WINDOW)?,
            ];
            executor.spawn(sampler::sample(&BANK, sources)).detach();
            Ok(())
        },
    )?;

    let backend = schedule(
        b"backend\0",
        12288,
        TASK_HIGH_PRIORITY,
        Some(Core::Core0),
        |executor| {
            executor.spawn(session::keep_session()).detach();
            Ok(())
        },
    )?;

    let uplink = schedule(
        b"uplink\0",
        16384,
        TASK_LOW_PRIORITY,
        Some(Core::Core0),
        move |executor| {
            executor.spawn(keepalive::supervise_wifi(wifi)).detach();
            executor
                .spawn(dispatcher::dispatch(
                    &BANK,
                    DEFS,
                    DatabaseRoot::Fixed {
                        latest: GAS_LATEST_ROOT,
                        log: Some(GAS_LOG_ROOT),
                    },
                    GAS_DISPATCH_INTERVAL,
                    true,
                ))
                .detach();
            executor.spawn(sender::send_writes()).detach();
            Ok(())
        },
    )?;

    for handle in [sensors, backend, uplink] {
        handle.join().unwrap();
    }

    unreachable!();
}
