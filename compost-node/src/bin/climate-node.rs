//! Climate node: three DHT22 probes, each feeding a temperature and a
//! humidity slot, with a 5 s aggregator reporting the mean across probes.

use esp_idf_hal::cpu::Core;
use esp_idf_hal::gpio::IOPin;
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use log::*;

use compost_core::{Quantity, SlotBank, SlotDef};
use compost_node::configuration::USERS_ROOT;
use compost_node::errors::InitError;
use compost_node::sensor::{climate_slots, DhtKind, DhtSource, SensorSource};
use compost_node::settings::DISPATCH_INTERVAL;
use compost_node::task::dispatcher::{self, DatabaseRoot};
use compost_node::task::{aggregator, keepalive, sampler, sender, session};
use compost_node::{
    schedule, services, TASK_HIGH_PRIORITY, TASK_LOW_PRIORITY, TASK_MID_PRIORITY,
};

static BANK: SlotBank<6> = SlotBank::new();

const DEFS: &[SlotDef] = &[
    SlotDef::new("sensor1/temperature", Quantity::TemperatureC),
    SlotDef::new("sensor1/humidity", Quantity::HumidityPct),
    SlotDef::new("sensor2/temperature", Quantity::TemperatureC),
    SlotDef::new("sensor2/humidity", Quantity::HumidityPct),
    SlotDef::new("sensor3/temperature", Quantity::TemperatureC),
    SlotDef::new("sensor3/humidity", Quantity::HumidityPct),
];

static AGGREGATES: [(&str, &[usize]); 2] =
    [("temperature", &[0, 2, 4]), ("humidity", &[1, 3, 5])];

fn main() -> Result<(), InitError> {
    esp_idf_sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();
    info!("climate node starting");

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    let wifi = services::wifi(peripherals.modem, sysloop, Some(nvs))?;

    let (dht1, dht2, dht3) = (
        peripherals.pins.gpio21.downgrade(),
        peripherals.pins.gpio22.downgrade(),
        peripherals.pins.gpio23.downgrade(),
    );

    let sensors = schedule(
        b"sensors\0",
        8192,
        TASK_MID_PRIORITY,
        Some(Core::Core1),
        move |executor| {
            let mut sources: Vec<Box<dyn SensorSource>> = Vec::with_capacity(3);
            for (index, pin) in [dht1, dht2, dht3].into_iter().enumerate() {
                let (temperature_slot, humidity_slot) = climate_slots(index);
                sources.push(Box::new(DhtSource::new(
                    DhtKind::Dht22,
                    pin,
                    temperature_slot,
                    humidity_slot,
                )?));
            }
            executor.spawn(sampler::sample(&BANK, sources)).detach();
            executor.spawn(aggregator::aggregate(&BANK, &AGGREGATES)).detach();
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
