#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod channel;
mod client;
pub mod command;
pub mod config;
pub mod error;
pub mod framer;
mod info;
pub mod logger;
mod module_timing;
mod network;
mod power;
mod registration;
mod socket;
mod state;
pub mod watchdog;

#[cfg(test)]
mod test_helpers;

pub use channel::AtChannel;
pub use client::Device;
pub use command::general::types::{FirmwareVersion, Iccid, Imei, Imsi};
pub use command::ip_transport_layer::types::{SocketHandle, TlsEncryption};
pub use command::network_service::types::{NetworkRegistrationState, OperatorId};
pub use config::{Apn, CellularConfig, NoPin, PinConfig};
pub use error::{Error, Hardware};
pub use framer::{FrameError, Reply};
pub use logger::{FacadeLogger, Logger, NoopLogger};
pub use state::ModemLifecycleState;
pub use watchdog::{NoWatchdog, Watchdog};
