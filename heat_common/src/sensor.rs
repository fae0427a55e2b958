//! Sensor bus layout shared by the HAL and the control unit.

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_SENSOR_ADDR;

/// Static sensor addressing.
///
/// Position in `addresses` is the driver slot. With `auto_discover` set the
/// addresses are placeholders: the slot count is kept and the bus scan
/// replaces each address with the live devices it finds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorConfig {
    /// 7-bit bus addresses, one per slot.
    #[serde(default = "default_addresses")]
    pub addresses: Vec<u8>,

    /// Replace configured addresses by a bus scan at startup.
    #[serde(default)]
    pub auto_discover: bool,

    /// Zero-calibrate every sensor at startup.
    #[serde(default)]
    pub calibrate_on_start: bool,
}

fn default_addresses() -> Vec<u8> {
    vec![DEFAULT_SENSOR_ADDR]
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            addresses: default_addresses(),
            auto_discover: false,
            calibrate_on_start: false,
        }
    }
}
