//! Remote thermostat client
//!
//! Each operation issues exactly one request to the device endpoint and
//! reduces the outcome to a [`DeviceActionResult`]. Transport and status
//! failures never escape as errors: the dispatcher turns them into speech.

mod http;

use async_trait::async_trait;

pub use http::HttpThermostat;

/// Outcome of a single device action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceActionResult {
    /// The setter's request reached the device
    Success,
    /// The getter returned a reading
    Value(String),
    /// The request failed; the reason is for logs, not speech
    Failure(String),
}

/// Operations supported by the remote thermostat
#[async_trait]
pub trait Thermostat: Send + Sync {
    /// Set the target temperature; yields `Success` or `Failure`
    async fn set_temperature(&self, value: &str) -> DeviceActionResult;

    /// Set the thermostat mode (e.g. "heat"); yields `Success` or `Failure`
    async fn set_mode(&self, value: &str) -> DeviceActionResult;

    /// Read the current temperature; yields `Value` or `Failure`
    async fn get_temperature(&self) -> DeviceActionResult;
}
