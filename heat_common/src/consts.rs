//! System-wide constants for the heater control workspace.
//!
//! Single source of truth for all numeric limits and defaults.
//! Imported by all crates; no duplication permitted.

use static_assertions::const_assert;

/// Maximum number of position sensors managed by one driver context.
pub const MAX_SENSORS: usize = 2;

/// Highest 7-bit bus address probed during a bus scan.
pub const MAX_I2C_ADDR: u8 = 127;

/// Factory-default 7-bit address of an AS5048B.
pub const DEFAULT_SENSOR_ADDR: u8 = 0x40;

/// Maximum number of cascaded control zones.
pub const MAX_ZONES: usize = 8;

/// Default control sample period [s] (10 Hz).
pub const DEFAULT_SAMPLE_PERIOD_S: f64 = 0.1;

/// Sample period bounds [s].
pub const SAMPLE_PERIOD_S_MIN: f64 = 0.000_1;
pub const SAMPLE_PERIOD_S_MAX: f64 = 60.0;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/heat/heater.toml";

const_assert!(MAX_SENSORS > 0);
const_assert!(MAX_ZONES >= MAX_SENSORS);
const_assert!(DEFAULT_SENSOR_ADDR <= MAX_I2C_ADDR);
