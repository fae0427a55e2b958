//! Configuration loading traits and types.
//!
//! This module provides a standardized way to load TOML configuration files
//! across the heater control applications.
//!
//! # Usage
//!
//! ```rust,no_run
//! use heat_common::config::{ConfigError, ConfigLoader, HeaterConfig};
//! use std::path::Path;
//!
//! fn main() -> Result<(), ConfigError> {
//!     let config = HeaterConfig::load(Path::new("heater.toml"))?;
//!     config.validate()?;
//!     println!("Service: {}", config.shared.service_name);
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use crate::consts::{MAX_I2C_ADDR, MAX_SENSORS, MAX_ZONES, SAMPLE_PERIOD_S_MAX, SAMPLE_PERIOD_S_MIN};
use crate::control::ControlConfig;
use crate::sensor::SensorConfig;

/// Error type for configuration loading operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Log level for application logging.
///
/// Uses lowercase serde values for TOML compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most verbose, detailed tracing information.
    Trace,
    /// Debug information useful during development.
    Debug,
    /// General information about application operation.
    #[default]
    Info,
    /// Warning messages for potentially problematic situations.
    Warn,
    /// Error messages for serious problems.
    Error,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`.
    pub fn as_directive(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Common configuration fields shared across applications.
///
/// # TOML Example
///
/// ```toml
/// [shared]
/// log_level = "debug"
/// service_name = "heater-bench-01"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedConfig {
    /// Logging verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Application instance identifier.
    pub service_name: String,
}

impl SharedConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if `service_name` is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "service_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Complete heater configuration: sensors, control zones and shared fields.
///
/// # TOML Example
///
/// ```toml
/// [shared]
/// service_name = "heater-bench-01"
///
/// [sensors]
/// addresses = [0x40, 0x41]
///
/// [control]
/// sample_period_s = 0.1
/// coupling_factor = 0.05
///
/// [[control.zones]]
/// name = "inner"
/// sensor_slot = 0
/// setpoint = 90.0
/// kp = 2.0
/// ki = 0.5
/// kd = 0.25
/// tau = 0.02
/// out_min = -10.0
/// out_max = 10.0
/// int_min = -5.0
/// int_max = 5.0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaterConfig {
    /// Shared application fields.
    pub shared: SharedConfig,
    /// Sensor bus layout.
    #[serde(default)]
    pub sensors: SensorConfig,
    /// Control zones and loop timing.
    pub control: ControlConfig,
}

impl HeaterConfig {
    /// Validate structural constraints across sections.
    ///
    /// Controller numeric preconditions (τ, limits) are enforced again when
    /// the controllers are built; this pass catches them early with the zone
    /// name in the message.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        validate_sensors(&self.sensors)?;
        validate_control(&self.control, self.sensors.addresses.len())?;
        Ok(())
    }
}

fn validate_sensors(sensors: &SensorConfig) -> Result<(), ConfigError> {
    if sensors.addresses.len() > MAX_SENSORS {
        return Err(ConfigError::ValidationError(format!(
            "{} sensor addresses configured, at most {} supported",
            sensors.addresses.len(),
            MAX_SENSORS
        )));
    }
    let mut seen = HashSet::new();
    for &addr in &sensors.addresses {
        if addr > MAX_I2C_ADDR {
            return Err(ConfigError::ValidationError(format!(
                "sensor address {addr:#04x} exceeds 7 bits"
            )));
        }
        if !seen.insert(addr) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate sensor address {addr:#04x}"
            )));
        }
    }
    Ok(())
}

fn validate_control(control: &ControlConfig, sensor_count: usize) -> Result<(), ConfigError> {
    if !(SAMPLE_PERIOD_S_MIN..=SAMPLE_PERIOD_S_MAX).contains(&control.sample_period_s) {
        return Err(ConfigError::ValidationError(format!(
            "sample_period_s {} out of range [{}, {}]",
            control.sample_period_s, SAMPLE_PERIOD_S_MIN, SAMPLE_PERIOD_S_MAX
        )));
    }
    if !control.coupling_factor.is_finite() {
        return Err(ConfigError::ValidationError(
            "coupling_factor must be finite".to_string(),
        ));
    }
    if control.zones.is_empty() || control.zones.len() > MAX_ZONES {
        return Err(ConfigError::ValidationError(format!(
            "zone count {} out of range [1, {}]",
            control.zones.len(),
            MAX_ZONES
        )));
    }
    for zone in &control.zones {
        if zone.sensor_slot >= sensor_count {
            return Err(ConfigError::ValidationError(format!(
                "zone '{}': sensor_slot {} has no configured sensor",
                zone.name, zone.sensor_slot
            )));
        }
        if !(zone.tau.is_finite() && zone.tau > 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "zone '{}': tau must be finite and > 0",
                zone.name
            )));
        }
        if zone.out_min.is_nan() || zone.out_max.is_nan() || zone.out_min > zone.out_max {
            return Err(ConfigError::ValidationError(format!(
                "zone '{}': out_min {} > out_max {}",
                zone.name, zone.out_min, zone.out_max
            )));
        }
        if zone.int_min.is_nan() || zone.int_max.is_nan() || zone.int_min > zone.int_max {
            return Err(ConfigError::ValidationError(format!(
                "zone '{}': int_min {} > int_max {}",
                zone.name, zone.int_min, zone.int_max
            )));
        }
    }
    Ok(())
}

/// Trait for loading configuration from TOML files.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax is invalid
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

// Blanket implementation: any serde-deserializable struct can be loaded.
impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}
