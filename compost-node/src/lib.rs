//! Shared plumbing for the compost box node binaries.
//!
//! Each binary under `src/bin/` is one deployed node (soil, climate, gas,
//! camera). They differ only in their sensor set and database paths; the task
//! implementations, backend session handling and Wi-Fi services all live
//! here, with the hardware-independent pipeline in `compost-core`.

use edge_executor::LocalExecutor;
use esp_idf_hal::cpu::Core;
use esp_idf_hal::task::thread::ThreadSpawnConfiguration;
use log::info;

use crate::errors::InitError;

pub mod backend;
pub mod camera;
pub mod configuration;
pub mod errors;
pub mod sensor;
pub mod services;
pub mod settings;
pub mod state;
pub mod task;

pub const TASK_HIGH_PRIORITY: u8 = 40;
pub const TASK_MID_PRIORITY: u8 = 30;
pub const TASK_LOW_PRIORITY: u8 = 20;

pub const EXECUTOR_TASKS: usize = 8;

/// Spawns a named FreeRTOS thread running a local executor, with the given
/// priority and core pinning. The spawner closure populates the executor;
/// spawned tasks are expected to run forever.
pub fn schedule<F>(
    name: &'static [u8],
    stack_size: usize,
    priority: u8,
    core: Option<Core>,
    spawner: F,
) -> Result<std::thread::JoinHandle<()>, InitError>
where
    F: FnOnce(&LocalExecutor<'_, EXECUTOR_TASKS>) -> Result<(), InitError> + Send + 'static,
{
    ThreadSpawnConfiguration {
        name: Some(name),
        priority,
        pin_to_core: core,
        ..Default::default()
    }
    .set()?;

    let handle = std::thread::Builder::new()
        .stack_size(stack_size)
        .spawn(move || {
            let executor: LocalExecutor<EXECUTOR_TASKS> = Default::default();

            spawner(&executor).unwrap();
            info!("executor running");

            esp_idf_hal::task::block_on(executor.run(core::future::pending::<()>()));
        })?;

    Ok(handle)
}
