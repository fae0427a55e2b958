//! One control pass: read feedback → cascade → outputs.
//!
//! `ControlCycle` owns the sensor driver and the PID cascade and binds each
//! zone to a sensor slot. It does not own timing: the caller invokes
//! [`ControlCycle::step`] once per sample period.
//!
//! ## Cycle body
//! 1. Read the angle [deg] of every sensor slot used by a zone, once per slot.
//! 2. Copy the zone base setpoints; the cascade perturbs the copy only.
//! 3. Run the cascaded update and return setpoints, feedback and outputs.
//!
//! A sensor read failure aborts the pass before any controller is touched.

use heapless::Vec;
use tracing::{debug, info, warn};

use heat_common::config::HeaterConfig;
use heat_common::consts::{MAX_SENSORS, MAX_ZONES};
use heat_hal::as5048b::As5048bDriver;
use heat_hal::bus::SensorBus;

use crate::config::build_cascade;
use crate::control::{CascadeError, PidCascade};
use crate::error::CycleError;

// ─── Cycle Statistics ───────────────────────────────────────────────

/// Per-cycle counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleStats {
    /// Passes that produced outputs.
    pub completed: u64,
    /// Passes aborted by a sensor failure.
    pub sensor_failures: u64,
}

// ─── Zone binding ───────────────────────────────────────────────────

/// A zone's name, feedback slot and base setpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneBinding {
    /// Zone label.
    pub name: String,
    /// Driver slot supplying feedback.
    pub sensor_slot: usize,
    /// Setpoint before cascade coupling [deg].
    pub setpoint: f64,
}

/// Result of one pass, indexed by zone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleOutput {
    /// Effective setpoints after coupling.
    pub setpoints: Vec<f64, MAX_ZONES>,
    /// Feedback [deg].
    pub feedback: Vec<f64, MAX_ZONES>,
    /// Controller outputs.
    pub outputs: Vec<f64, MAX_ZONES>,
}

// ─── Control cycle ──────────────────────────────────────────────────

/// Sensor driver, zone bindings and cascade stepped together.
pub struct ControlCycle<B: SensorBus> {
    driver: As5048bDriver<B>,
    cascade: PidCascade,
    zones: Vec<ZoneBinding, MAX_ZONES>,
    stats: CycleStats,
}

impl<B: SensorBus> ControlCycle<B> {
    /// Assemble from parts.
    ///
    /// `zones` must match the cascade stage for stage and name registered
    /// slots of `driver`.
    pub fn new(
        driver: As5048bDriver<B>,
        cascade: PidCascade,
        zones: &[ZoneBinding],
    ) -> Result<Self, CycleError> {
        if zones.len() != cascade.len() {
            return Err(CascadeError::LengthMismatch {
                stages: cascade.len(),
                setpoints: zones.len(),
                feedback: zones.len(),
                outputs: zones.len(),
            }
            .into());
        }
        let mut bound = Vec::new();
        for zone in zones {
            driver.device(zone.sensor_slot)?;
            bound
                .push(zone.clone())
                .map_err(|_| CascadeError::TooManyStages(MAX_ZONES))?;
        }
        Ok(Self {
            driver,
            cascade,
            zones: bound,
            stats: CycleStats::default(),
        })
    }

    /// Bring up sensors on `bus` and build the cascade from `config`.
    ///
    /// Registers every configured address in slot order, rescans when
    /// `auto_discover` is set, and zero-calibrates each sensor when
    /// `calibrate_on_start` is set. `config` is expected to be validated.
    pub fn from_config(bus: B, config: &HeaterConfig) -> Result<Self, CycleError> {
        let mut driver = As5048bDriver::new(bus);
        for (slot, &address) in config.sensors.addresses.iter().enumerate() {
            let status = driver.add_device(slot, address)?;
            debug!("slot {slot} -> {address:#04x}: {status:?}");
        }

        if config.sensors.auto_discover {
            let report = driver.scan()?;
            info!(
                "bus scan: {} sensors after {} probes",
                report.found, report.probed
            );
        }

        if config.sensors.calibrate_on_start {
            for slot in 0..driver.device_count() {
                let zero = driver.calibrate_zero(slot)?;
                info!("slot {slot} zero set at raw {}", zero.raw());
            }
        }

        let cascade = build_cascade(&config.control)?;
        let zones: std::vec::Vec<ZoneBinding> = config
            .control
            .zones
            .iter()
            .map(|z| ZoneBinding {
                name: z.name.clone(),
                sensor_slot: z.sensor_slot,
                setpoint: z.setpoint,
            })
            .collect();
        Self::new(driver, cascade, &zones)
    }

    /// Run one pass.
    pub fn step(&mut self) -> Result<CycleOutput, CycleError> {
        let mut by_slot = [None::<f64>; MAX_SENSORS];
        let mut out = CycleOutput::default();

        for zone in &self.zones {
            let cached = by_slot.get(zone.sensor_slot).copied().flatten();
            let angle = match cached {
                Some(angle) => angle,
                None => match self.driver.angle_degrees(zone.sensor_slot) {
                    Ok(angle) => {
                        if let Some(entry) = by_slot.get_mut(zone.sensor_slot) {
                            *entry = Some(angle);
                        }
                        angle
                    }
                    Err(e) => {
                        self.stats.sensor_failures += 1;
                        warn!("zone '{}': feedback read failed: {e}", zone.name);
                        return Err(e.into());
                    }
                },
            };
            let full = |_| CascadeError::TooManyStages(MAX_ZONES);
            out.feedback.push(angle).map_err(full)?;
            out.setpoints.push(zone.setpoint).map_err(full)?;
            out.outputs.push(0.0).map_err(full)?;
        }

        self.cascade
            .update(&mut out.setpoints, &out.feedback, &mut out.outputs)?;
        self.stats.completed += 1;
        debug!("cycle {}: outputs {:?}", self.stats.completed, out.outputs);
        Ok(out)
    }

    /// Change a zone's base setpoint.
    pub fn set_setpoint(&mut self, zone: usize, setpoint: f64) -> Result<(), CycleError> {
        let binding = self
            .zones
            .get_mut(zone)
            .ok_or(CycleError::UnknownZone(zone))?;
        binding.setpoint = setpoint;
        Ok(())
    }

    /// Reset every controller.
    pub fn reset(&mut self) {
        self.cascade.reset_all();
    }

    /// Zone bindings in cascade order.
    pub fn zones(&self) -> &[ZoneBinding] {
        &self.zones
    }

    /// Pass counters.
    pub fn stats(&self) -> CycleStats {
        self.stats
    }

    /// The PID cascade.
    pub fn cascade(&self) -> &PidCascade {
        &self.cascade
    }

    /// Mutable PID cascade, e.g. for retuning.
    pub fn cascade_mut(&mut self) -> &mut PidCascade {
        &mut self.cascade
    }

    /// The sensor driver.
    pub fn driver(&self) -> &As5048bDriver<B> {
        &self.driver
    }

    /// Mutable sensor driver.
    pub fn driver_mut(&mut self) -> &mut As5048bDriver<B> {
        &mut self.driver
    }
}
