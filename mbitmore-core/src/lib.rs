//! Board-side logic for the Mbit More sensor bridge
//!
//! This crate holds everything between the wire format and the hardware:
//!
//! - Collaborator traits (pins, sensors, display, transport)
//! - Pin table with per-pin mode, pull and event listener state
//! - Labelled message registry
//! - Sensor snapshot and interrupt latches
//! - Telemetry encoding with change detection
//! - Command dispatch and the periodic notify cycle
//!
//! A board integration implements the traits, keeps an [`EventLatches`] in a
//! `static` for its interrupt handlers, and drives a [`Service`] from the
//! transport's write, read and idle hooks.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod config;
pub mod device;
pub mod messages;
pub mod pin_table;
pub mod sensors;
pub mod service;
pub mod telemetry;
pub mod traits;

#[cfg(test)]
mod mock;

#[cfg(test)]
use critical_section as _;

pub use config::BoardConfig;
pub use device::Device;
pub use messages::{MessageId, MessageRegistry, RegistryError, DEFAULT_REGISTRY_CAPACITY};
pub use pin_table::{PinEntry, PinTable};
pub use sensors::{EventLatches, Latch, SensorSnapshot};
pub use service::Service;
pub use telemetry::{ChannelValue, Changes, TelemetryEncoder};
