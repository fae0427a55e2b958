//! AS5048B magnetic rotary position sensor.
//!
//! The host initiates all transfers. The 7-bit device address is set by
//! OTP register 0x15 bits 0-4 plus two address selection pins.

mod driver;
mod error;
pub mod register;

pub use driver::{As5048bDriver, ProbeStatus, RefreshStatus, ScanReport, SensorDevice};
pub use error::{CalibrationStep, SensorError};
pub use register::{Angle, Diagnostics, RefreshSpan, Register, RegisterSnapshot};
