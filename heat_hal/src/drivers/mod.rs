//! Bus implementations.
//!
//! - [`simulation`] - In-memory bus with simulated sensors and fault injection
//! - [`embedded`] - Adapter for any `embedded-hal` I²C peripheral
//!
//! # Adding New Transports
//!
//! 1. Create a new submodule under `drivers/`
//! 2. Implement the `SensorBus` trait from [`crate::bus`]
//! 3. Add export and documentation

pub mod embedded;
pub mod simulation;
