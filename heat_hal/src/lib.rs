//! # Heater HAL Library
//!
//! Sensor-side hardware abstraction for the heater control core.
//!
//! # Module Structure
//!
//! - [`bus`] - `SensorBus` trait, bus errors, 7-bit addresses
//! - [`as5048b`] - AS5048B register model and driver context
//! - [`drivers`] - Bus implementations (simulation, `embedded-hal`)
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                           heat_hal                           │
//! │  ┌──────────────────┐    ┌──────────────┐    ┌─────────────┐ │
//! │  │  As5048bDriver   │───►│  SensorBus   │◄───│ SimulatedBus│ │
//! │  │ (slots+snapshots)│    │   (trait)    │◄───│ EmbeddedI2c │ │
//! │  └──────────────────┘    └──────────────┘    └─────────────┘ │
//! └──────────────────────────────────────────────────────────────┘
//! ```

#![deny(missing_docs)]

pub mod as5048b;
pub mod bus;
pub mod drivers;

// Re-export key types for convenience
pub use crate::as5048b::{As5048bDriver, SensorError};
pub use crate::bus::{BusAddress, BusError, SensorBus};
pub use crate::drivers::simulation::{SimulatedBus, SimulatedSensor};
