// src/plugin/mod.rs - Temperature plugin contract

#[cfg(test)]
mod contract_tests;

use async_trait::async_trait;
use thiserror::Error;

use crate::comms::{CommandChannel, CommsError};
use crate::config::{ConfigError, PluginConfiguration};

/// Failure raised by a plugin, keeping the three concerns apart: bad
/// configuration at construction, channel trouble while talking to the
/// machine, and driver-side precondition violations.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("communication error: {0}")]
    Comms(#[from] CommsError),
    #[error("validation error: {0}")]
    Validation(String),
}

impl PluginError {
    pub fn validation(message: impl Into<String>) -> Self {
        PluginError::Validation(message.into())
    }
}

/// Driver contract for one temperature actuator device family.
///
/// A driver is built once from its configuration, with no channel in sight,
/// and is then invoked any number of times, in any order, each call
/// borrowing the channel the host currently holds for the device. A driver
/// must not stash a channel away between calls; the host may reconnect and
/// hand over a different one next time.
///
/// Channel failures propagate to the host as [`PluginError::Comms`] without
/// local retry or suppression. Whether a driver checks the target against a
/// device working range is its own business; when it does, the rejection is
/// a [`PluginError::Validation`], raised before anything is sent.
#[async_trait]
pub trait TemperaturePlugin: Send {
    /// Validate `config` and build the driver. No device communication
    /// happens here.
    fn from_config(config: &PluginConfiguration) -> Result<Self, PluginError>
    where
        Self: Sized;

    /// Send the instructions that drive the device toward `kelvin`.
    ///
    /// May assume nothing about the machine's synchronization state beyond
    /// what a `synch()` call of its own establishes.
    async fn apply_temperature(
        &mut self,
        channel: &mut dyn CommandChannel,
        kelvin: f64,
    ) -> Result<(), PluginError>;

    /// Send the instructions that deactivate the actuator.
    ///
    /// Must be safe to call regardless of prior call history; turning off
    /// an already-off device stays off.
    async fn turn_off(&mut self, channel: &mut dyn CommandChannel) -> Result<(), PluginError>;
}

/// The form the host holds driver variants in.
pub type BoxedTemperaturePlugin = Box<dyn TemperaturePlugin>;

pub const ZERO_CELSIUS_K: f64 = 273.15;

/// Unit conversion for drivers whose firmware speaks Celsius.
pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - ZERO_CELSIUS_K
}

pub fn celsius_to_kelvin(celsius: f64) -> f64 {
    celsius + ZERO_CELSIUS_K
}
