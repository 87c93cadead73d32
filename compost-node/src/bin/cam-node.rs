//! Camera node: AI-Thinker ESP32-CAM. Captures a JPEG every 3 s onto the
//! mounted flash filesystem and uploads it to a fixed object path, one upload
//! in flight at a time. A failed filesystem mount or camera init restarts the
//! chip; there is nothing useful the node can do without either.

use esp_idf_hal::cpu::Core;
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use log::*;

use compost_core::UploadGate;
use compost_node::camera::Camera;
use compost_node::configuration::SPIFFS_BASE_PATH;
use compost_node::errors::InitError;
use compost_node::task::{capture, keepalive, sender, session};
use compost_node::{
    schedule, services, TASK_HIGH_PRIORITY, TASK_LOW_PRIORITY, TASK_MID_PRIORITY,
};

static GATE: UploadGate = UploadGate::new();

fn restart() -> ! {
    unsafe { esp_idf_sys::esp_restart() };
    unreachable!()
}

fn main() -> Result<(), InitError> {
    esp_idf_sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();
    info!("camera node starting");

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    let wifi = services::wifi(peripherals.modem, sysloop, Some(nvs))?;

    if let Err(err) = services::mount_spiffs(SPIFFS_BASE_PATH) {
        error!("filesystem mount failed: {err}");
        restart();
    }

    let camera = match Camera::init() {
        Ok(camera) => camera,
        Err(err) => {
            error!("camera init failed: {err}");
            restart();
        }
    };

    let camera_thread = schedule(
        b"camera\0",
        12288,
        TASK_MID_PRIORITY,
        Some(Core::Core1),
        move |executor| {
            executor
                .spawn(capture::capture_and_upload(camera, &GATE))
                .detach();
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
        20480,
        TASK_LOW_PRIORITY,
        Some(Core::Core0),
        move |executor| {
            executor.spawn(keepalive::supervise_wifi(wifi)).detach();
            executor.spawn(sender::send_uploads()).detach();
            Ok(())
        },
    )?;

    for handle in [camera_thread, backend, uplink] {
        handle.join().unwrap();
    }

    unreachable!();
}
