// wetbench-plugins: device plugin contracts for the Wetbench lab-automation host

//! Driver-side contracts for temperature actuators.
//!
//! The host opens and owns the link to each physical machine; a driver only
//! ever sees it as a [`CommandChannel`], the four-primitive capability it
//! uses to push commands and read replies. Concrete device families
//! implement [`TemperaturePlugin`], are built from a [`PluginConfiguration`]
//! with no channel in sight, and are then driven by the host with a borrowed
//! channel per call.
//!
//! Transports, plugin discovery, and control loops live elsewhere in the
//! host. What lives here is the contract between them, an in-memory
//! [`RecordingChannel`] for testing drivers without hardware, and the error
//! taxonomy that keeps construction, communication, and validation failures
//! apart.

pub mod comms;
pub mod config;
pub mod plugin;

pub use comms::{ChannelOp, CommandChannel, CommsError, RecordingChannel};
pub use config::{ConfigError, PluginConfiguration};
pub use plugin::{
    BoxedTemperaturePlugin, PluginError, TemperaturePlugin, celsius_to_kelvin, kelvin_to_celsius,
};
