//! Simulation driver module.
//!
//! Software stand-ins for the sensor bus, for development and testing
//! without physical hardware.

mod bus;
mod sensor;

pub use bus::{SimulatedBus, Transaction};
pub use sensor::SimulatedSensor;
