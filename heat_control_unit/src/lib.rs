//! # Heater Control Unit Library
//!
//! Turns AS5048B angle feedback into actuator commands. Provides a discrete
//! PID engine, its cascaded update, and a control pass that reads every
//! zone's sensor and steps the cascade once.
//!
//! ## Layers
//!
//! 1. **`control::pid`**: single PID stage (trapezoidal integrator,
//!    filtered derivative-on-measurement, clamps)
//! 2. **`control::cascade`**: stages chained through a coupling factor
//! 3. **`cycle`**: sensor driver + cascade, one pass per call
//! 4. **`config`**: TOML → validated zones → cascade
//!
//! Timing is the caller's job: nothing here sleeps or spawns.

pub mod config;
pub mod control;
pub mod cycle;
pub mod error;

pub use cycle::{ControlCycle, CycleOutput, CycleStats, ZoneBinding};
pub use error::CycleError;
