//! Control zone configuration.
//!
//! One zone = one PID stage fed by one sensor slot. Zones are cascaded in
//! declaration order.

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_SAMPLE_PERIOD_S;

/// Loop timing, coupling and zone list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlConfig {
    /// Sample period T shared by every zone [s].
    #[serde(default = "default_sample_period")]
    pub sample_period_s: f64,

    /// Fraction of each zone's output added to the next zone's setpoint.
    #[serde(default)]
    pub coupling_factor: f64,

    /// Zones in cascade order.
    pub zones: Vec<ZoneConfig>,
}

fn default_sample_period() -> f64 {
    DEFAULT_SAMPLE_PERIOD_S
}

/// Per-zone PID tuning.
///
/// Zero gain disables a term; omitted limits are unbounded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneConfig {
    /// Zone label used in logs.
    pub name: String,
    /// Driver slot of the feedback sensor.
    pub sensor_slot: usize,
    /// Target value in sensor units [deg].
    pub setpoint: f64,

    /// Proportional gain.
    #[serde(default)]
    pub kp: f64,
    /// Integral gain.
    #[serde(default)]
    pub ki: f64,
    /// Derivative gain.
    #[serde(default)]
    pub kd: f64,
    /// Derivative low-pass time constant [s].
    pub tau: f64,

    /// Output lower bound.
    #[serde(default = "neg_inf")]
    pub out_min: f64,
    /// Output upper bound.
    #[serde(default = "pos_inf")]
    pub out_max: f64,
    /// Integrator lower bound.
    #[serde(default = "neg_inf")]
    pub int_min: f64,
    /// Integrator upper bound.
    #[serde(default = "pos_inf")]
    pub int_max: f64,
}

fn neg_inf() -> f64 {
    f64::NEG_INFINITY
}

fn pos_inf() -> f64 {
    f64::INFINITY
}
