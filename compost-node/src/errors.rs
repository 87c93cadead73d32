use esp_idf_svc::errors::EspIOError;
use esp_idf_sys::EspError;

use compost_core::backend::RemoteError;

use crate::sensor::SensorError;

#[derive(Debug)]
pub enum InitError {
    EspError(EspError),
    ThreadSpawn(std::io::Error),
    Backend(RemoteError),
    Sensor(SensorError),
}

impl From<EspError> for InitError {
    fn from(e: EspError) -> Self {
        Self::EspError(e)
    }
}

impl From<EspIOError> for InitError {
    fn from(e: EspIOError) -> Self {
        Self::EspError(e.0)
    }
}

impl From<std::io::Error> for InitError {
    fn from(e: std::io::Error) -> Self {
        Self::ThreadSpawn(e)
    }
}

impl From<RemoteError> for InitError {
    fn from(e: RemoteError) -> Self {
        Self::Backend(e)
    }
}

impl From<SensorError> for InitError {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}
