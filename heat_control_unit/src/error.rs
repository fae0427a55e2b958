//! Control unit error type.
//!
//! Sensor faults are propagated untouched so callers can tell a refresh
//! failure from a calibration failure.

use heat_common::config::ConfigError;
use heat_hal::as5048b::SensorError;
use thiserror::Error;

use crate::control::{CascadeError, PidConfigError};

/// Errors raised while building or stepping a control cycle.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CycleError {
    /// Sensor driver failure.
    #[error("sensor: {0}")]
    Sensor(#[from] SensorError),

    /// Cascade shape error.
    #[error("cascade: {0}")]
    Cascade(#[from] CascadeError),

    /// Invalid controller parameters for a zone.
    #[error("zone '{zone}': {source}")]
    Pid {
        /// Zone name.
        zone: String,
        /// Rejection reason.
        source: PidConfigError,
    },

    /// Configuration loading or validation failure.
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    /// No zone with the given index.
    #[error("no zone at index {0}")]
    UnknownZone(usize),
}
