//! Soil node: three capacitive moisture probes on ADC1, reported as integer
//! percentages under the authenticated user's database tree.

use std::rc::Rc;

use esp_idf_hal::adc::oneshot::AdcDriver;
use esp_idf_hal::cpu::Core;
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use log::*;

use compost_core::{Quantity, SlotBank, SlotDef};
use compost_node::configuration::{SOIL_CALIBRATION, USERS_ROOT};
use compost_node::errors::InitError;
use compost_node::sensor::analog_percent_probe;
use compost_node::settings::DISPATCH_INTERVAL;
use compost_node::task::dispatcher::{self, DatabaseRoot};
use compost_node::task::{keepalive, sampler, sender, session};
use compost_node::{
    schedule, services, TASK_HIGH_PRIORITY, TASK_LOW_PRIORITY, TASK_MID_PRIORITY,
};

static BANK: SlotBank<3> = SlotBank::new();

const DEFS: &[SlotDef] = &[
    SlotDef::new("soil_sensor1/moisture", Quantity::MoisturePct),
    SlotDef::new("soil_sensor2/moisture", Quantity::MoisturePct),
    SlotDef::new("soil_sensor3/moisture", Quantity::MoisturePct),
];

fn main() -> Result<(), InitError> {
    esp_idf_sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();
    info!("soil node starting");

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    let wifi = services::wifi(peripherals.modem, sysloop, Some(nvs))?;

    let adc1 = peripherals.adc1;
    let (probe1, probe2, probe3) = (
        peripherals.pins.gpio32,
        peripherals.pins.gpio33,
        peripherals.pins.gpio34,
    );

    let sensors = schedule(
        b"sensors\0",
        8192,
        TASK_MID_PRIORITY,
        Some(Core::Core1),
        move |executor| {
            // The ADC unit and its channels are not Send; they live on this
            // thread for the whole process lifetime.
            let adc = Rc::new(AdcDriver::new(adc1)?);
            let sources = vec![
                analog_percent_probe(&adc, probe1, 0, SOIL_CALIBRATION)?,
                analog_percent_probe(&adc, probe2, 1, SOIL_CALIBRATION)?,
                analog_percent_probe(&adc, probe3, 2, SOIL_CALIBRATION)?,
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
                    DatabaseRoot::PerUser { root: USERS_ROOT },
                    DISPATCH_INTERVAL,
                    false,
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
