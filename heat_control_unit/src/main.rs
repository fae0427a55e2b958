//! # Heater Control Unit dry run
//!
//! Loads a heater configuration, brings the configured AS5048B sensors up on
//! a simulated bus, and steps the control cascade a fixed number of times
//! against a first-order plant: each zone's output moves its sensor's
//! mechanical angle by `output * plant_gain * T` degrees per cycle.
//!
//! Useful for checking zone tuning and coupling before touching hardware.

use clap::Parser;
use heat_common::config::{HeaterConfig, LogLevel};
use heat_common::consts::{DEFAULT_CONFIG_PATH, MAX_SENSORS};
use heat_control_unit::ControlCycle;
use heat_control_unit::config::load_config;
use heat_hal::drivers::simulation::{SimulatedBus, SimulatedSensor};
use std::path::PathBuf;
use std::process;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Heater control unit: PID cascade dry run on simulated sensors
#[derive(Parser, Debug)]
#[command(name = "heat_cu")]
#[command(version)]
#[command(about = "Run the heater PID cascade against simulated AS5048B sensors")]
struct Args {
    /// Path to the heater configuration TOML.
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Number of control cycles to run.
    #[arg(short = 'n', long, default_value_t = 50)]
    cycles: u64,

    /// Plant gain [deg per output unit per second].
    #[arg(long, default_value_t = 1.0)]
    plant_gain: f64,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    let config = load_config(&args.config);
    let level = config
        .as_ref()
        .map(|c| c.shared.log_level)
        .unwrap_or_default();
    setup_tracing(&args, level);

    info!("heat_cu v{} starting...", env!("CARGO_PKG_VERSION"));

    let result = config
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
        .and_then(|config| run(&args, &config));
    if let Err(e) = result {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("heat_cu finished");
}

fn run(args: &Args, config: &HeaterConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        "Config OK: service={}, zones={}, T={}s, coupling={}",
        config.shared.service_name,
        config.control.zones.len(),
        config.control.sample_period_s,
        config.control.coupling_factor,
    );

    let mut bus = SimulatedBus::new();
    for &address in &config.sensors.addresses {
        bus.attach(address, SimulatedSensor::new());
    }

    let mut cycle = ControlCycle::from_config(bus, config)?;
    let period = config.control.sample_period_s;
    let mut positions = [0.0_f64; MAX_SENSORS];

    for n in 1..=args.cycles {
        let out = cycle.step()?;

        for (i, zone) in cycle.zones().iter().enumerate() {
            info!(
                "cycle {n} zone '{}': sp={:.3} fb={:.3} u={:.3}",
                zone.name, out.setpoints[i], out.feedback[i], out.outputs[i]
            );
        }

        // Integrate each zone's output into its sensor's plant position.
        for (zone, &u) in cycle.zones().iter().zip(out.outputs.iter()) {
            if let Some(p) = positions.get_mut(zone.sensor_slot) {
                *p += u * args.plant_gain * period;
            }
        }
        for (slot, &position) in positions.iter().enumerate().take(cycle.driver().device_count()) {
            let address = cycle.driver().device(slot)?.address().get();
            if let Some(sensor) = cycle.driver_mut().bus_mut().sensor_mut(address) {
                sensor.set_angle_degrees(position);
            }
        }
    }

    let stats = cycle.stats();
    info!(
        "{} cycles completed, {} sensor failures",
        stats.completed, stats.sensor_failures
    );
    Ok(())
}

/// Setup tracing subscriber from CLI arguments and the configured level.
///
/// `RUST_LOG` overrides both.
fn setup_tracing(args: &Args, level: LogLevel) {
    let directive = if args.verbose {
        "debug"
    } else {
        level.as_directive()
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
