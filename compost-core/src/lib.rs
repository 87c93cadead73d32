//! Hardware-independent core of the compost box node family.
//!
//! Every node follows the same shape: per-sensor sampling tasks publish the
//! latest reading into a fixed set of shared slots, and an upload dispatcher
//! periodically snapshots all slots under one lock acquisition and issues
//! fire-and-forget writes to the cloud backend. This crate holds that
//! pipeline — slot bank, calibration, upload planning, dispatch, and the
//! single-flight gate used by the camera node — without any ESP-IDF
//! dependency, so it can be exercised on the host.

pub mod aggregate;
pub mod backend;
pub mod calibration;
pub mod dispatch;
pub mod flight;
pub mod reading;
pub mod slots;
pub mod upload;

pub use calibration::Calibration;
pub use flight::UploadGate;
pub use reading::{Quantity, SensorReading, SlotDef};
pub use slots::SlotBank;
pub use upload::{PathScheme, UploadTarget, Value};
