//! Control passes over the simulated AS5048B bus.

use heat_common::config::HeaterConfig;
use heat_control_unit::config::load_config_from_str;
use heat_control_unit::{ControlCycle, CycleError};
use heat_hal::as5048b::{Register, SensorError};
use heat_hal::drivers::simulation::{SimulatedBus, SimulatedSensor};

const TWO_ZONES: &str = r#"
[shared]
service_name = "cycle-test"

[sensors]
addresses = [0x40, 0x41]

[control]
sample_period_s = 0.01
coupling_factor = 0.0

[[control.zones]]
name = "inner"
sensor_slot = 0
setpoint = 90.0
kp = 2.0
ki = 1.0
tau = 0.05

[[control.zones]]
name = "outer"
sensor_slot = 1
setpoint = 45.0
kp = 2.0
ki = 1.0
tau = 0.05
"#;

fn config(text: &str) -> HeaterConfig {
    load_config_from_str(text).unwrap()
}

fn bus_with(sensors: &[(u8, u16)]) -> SimulatedBus {
    let mut bus = SimulatedBus::new();
    for &(address, raw) in sensors {
        bus.attach(address, SimulatedSensor::new().with_angle_raw(raw));
    }
    bus
}

#[test]
fn from_config_binds_zones_to_slots() {
    let cfg = config(TWO_ZONES);
    let mut cycle =
        ControlCycle::from_config(bus_with(&[(0x40, 4096), (0x41, 2048)]), &cfg).unwrap();
    assert_eq!(cycle.zones().len(), 2);
    assert_eq!(cycle.driver().device_count(), 2);

    let out = cycle.step().unwrap();
    assert_eq!(out.feedback.as_slice(), &[90.0, 45.0]);
    // Both zones on target: no error, no output.
    assert_eq!(out.outputs.as_slice(), &[0.0, 0.0]);
}

#[test]
fn calibrate_on_start_zeroes_feedback() {
    let text = TWO_ZONES.replace(
        "addresses = [0x40, 0x41]",
        "addresses = [0x40, 0x41]\ncalibrate_on_start = true",
    );
    let cfg = config(&text);
    let mut cycle =
        ControlCycle::from_config(bus_with(&[(0x40, 4096), (0x41, 9000)]), &cfg).unwrap();
    let out = cycle.step().unwrap();
    assert_eq!(out.feedback.as_slice(), &[0.0, 0.0]);
    assert_eq!(cycle.driver().bus().sensor(0x41).unwrap().zero_position(), 9000);
}

#[test]
fn auto_discover_replaces_placeholder_addresses() {
    let text = TWO_ZONES.replace(
        "addresses = [0x40, 0x41]",
        "addresses = [0x40, 0x41]\nauto_discover = true",
    );
    let cfg = config(&text);
    let mut cycle =
        ControlCycle::from_config(bus_with(&[(0x22, 4096), (0x60, 8192)]), &cfg).unwrap();
    assert_eq!(cycle.driver().device(0).unwrap().address().get(), 0x22);
    assert_eq!(cycle.driver().device(1).unwrap().address().get(), 0x60);
    let out = cycle.step().unwrap();
    assert_eq!(out.feedback.as_slice(), &[90.0, 180.0]);
}

#[test]
fn auto_discover_with_missing_sensor_fails_startup() {
    let text = TWO_ZONES.replace(
        "addresses = [0x40, 0x41]",
        "addresses = [0x40, 0x41]\nauto_discover = true",
    );
    let cfg = config(&text);
    let err = ControlCycle::from_config(bus_with(&[(0x22, 0)]), &cfg)
        .err()
        .unwrap();
    assert_eq!(
        err,
        CycleError::Sensor(SensorError::ScanIncomplete {
            found: 1,
            expected: 2
        })
    );
}

#[test]
fn sensor_failure_aborts_pass_without_touching_controllers() {
    let cfg = config(TWO_ZONES);
    let mut cycle =
        ControlCycle::from_config(bus_with(&[(0x40, 0), (0x41, 0)]), &cfg).unwrap();
    cycle.driver_mut().bus_mut().fail_register(Register::AngleHigh);

    let err = cycle.step().unwrap_err();
    assert!(matches!(err, CycleError::Sensor(SensorError::Bus { .. })));
    assert_eq!(cycle.stats().sensor_failures, 1);
    assert_eq!(cycle.stats().completed, 0);
    assert!(cycle.cascade().stages().iter().all(|s| s.integrator() == 0.0));

    cycle.driver_mut().bus_mut().clear_faults();
    assert!(cycle.step().is_ok());
    assert_eq!(cycle.stats().completed, 1);
}

#[test]
fn coupling_perturbs_only_this_cycle() {
    let text = TWO_ZONES.replace("coupling_factor = 0.0", "coupling_factor = 0.5");
    let cfg = config(&text);
    let mut cycle =
        ControlCycle::from_config(bus_with(&[(0x40, 0), (0x41, 0)]), &cfg).unwrap();

    let first = cycle.step().unwrap();
    assert_eq!(first.setpoints[1], 45.0 + first.outputs[0] * 0.5);
    let second = cycle.step().unwrap();
    // Base setpoint is reapplied every pass.
    assert_eq!(second.setpoints[1], 45.0 + second.outputs[0] * 0.5);
    assert_eq!(cycle.zones()[1].setpoint, 45.0);
}

#[test]
fn closed_loop_reaches_setpoints() {
    let cfg = config(TWO_ZONES);
    let mut cycle =
        ControlCycle::from_config(bus_with(&[(0x40, 0), (0x41, 0)]), &cfg).unwrap();
    let period = cfg.control.sample_period_s;
    let mut positions = [0.0_f64; 2];

    for _ in 0..3_000 {
        let out = cycle.step().unwrap();
        for (slot, p) in positions.iter_mut().enumerate() {
            *p += out.outputs[slot] * period;
        }
        let bus = cycle.driver_mut().bus_mut();
        bus.sensor_mut(0x40).unwrap().set_angle_degrees(positions[0]);
        bus.sensor_mut(0x41).unwrap().set_angle_degrees(positions[1]);
    }

    let out = cycle.step().unwrap();
    // One LSB is 360 / 16384 deg.
    assert!((out.feedback[0] - 90.0).abs() < 0.05, "{}", out.feedback[0]);
    assert!((out.feedback[1] - 45.0).abs() < 0.05, "{}", out.feedback[1]);
}

#[test]
fn setpoint_change_takes_effect_next_pass() {
    let cfg = config(TWO_ZONES);
    let mut cycle =
        ControlCycle::from_config(bus_with(&[(0x40, 4096), (0x41, 2048)]), &cfg).unwrap();
    cycle.set_setpoint(0, 100.0).unwrap();
    let out = cycle.step().unwrap();
    assert_eq!(out.setpoints[0], 100.0);
    assert!(out.outputs[0] > 0.0);
    assert!(matches!(cycle.set_setpoint(5, 0.0), Err(CycleError::UnknownZone(5))));
}
