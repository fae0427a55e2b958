//! Configuration loading and translation into controller parameters.
//!
//! Loads a `HeaterConfig` from TOML, validates it, and maps each zone onto
//! `PidParams` so the cascade is built from the same source of truth the
//! validator checked.

use std::path::Path;

use tracing::debug;

use heat_common::config::{ConfigError, ConfigLoader, HeaterConfig};
use heat_common::control::{ControlConfig, ZoneConfig};

use crate::control::{PidCascade, PidController, PidGains, PidParams};
use crate::error::CycleError;

/// Load and validate a configuration file.
pub fn load_config(path: &Path) -> Result<HeaterConfig, ConfigError> {
    let config = HeaterConfig::load(path)?;
    config.validate()?;
    debug!(
        "loaded {} ({} zones)",
        path.display(),
        config.control.zones.len()
    );
    Ok(config)
}

/// Parse and validate configuration text.
pub fn load_config_from_str(content: &str) -> Result<HeaterConfig, ConfigError> {
    let config = HeaterConfig::from_toml(content)?;
    config.validate()?;
    Ok(config)
}

/// Controller parameters for one zone at sample period `sample_period` [s].
pub fn zone_params(zone: &ZoneConfig, sample_period: f64) -> PidParams {
    PidParams::new(
        PidGains {
            kp: zone.kp,
            ki: zone.ki,
            kd: zone.kd,
        },
        zone.tau,
        sample_period,
    )
    .with_output_limits(zone.out_min, zone.out_max)
    .with_integrator_limits(zone.int_min, zone.int_max)
}

/// Build one stage per zone, in declaration order.
pub fn build_cascade(control: &ControlConfig) -> Result<PidCascade, CycleError> {
    let mut cascade = PidCascade::new(control.coupling_factor);
    for zone in &control.zones {
        let stage = PidController::new(zone_params(zone, control.sample_period_s)).map_err(
            |source| CycleError::Pid {
                zone: zone.name.clone(),
                source,
            },
        )?;
        cascade.push(stage)?;
    }
    Ok(cascade)
}
