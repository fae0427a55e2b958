//! Prelude module for common re-exports.
//!
//! ```rust
//! use heat_common::prelude::*;
//! ```

use std::time::Duration;

// ─── Logging ────────────────────────────────────────────────────────
pub use crate::config::LogLevel;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, HeaterConfig, SharedConfig};
pub use crate::control::{ControlConfig, ZoneConfig};
pub use crate::sensor::SensorConfig;

// ─── System Constants ───────────────────────────────────────────────
pub use crate::consts::{DEFAULT_SAMPLE_PERIOD_S, MAX_SENSORS, MAX_ZONES};

/// Default sample period as Duration.
pub const DEFAULT_SAMPLE_PERIOD: Duration = Duration::from_millis(100);
