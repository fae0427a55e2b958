//! PID engine micro-benchmark.
//!
//! Measures throughput of:
//! - a single `PidController::update`
//! - a full `MAX_ZONES`-stage cascaded update
//! - one control pass over the simulated sensor bus (2 zones)

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use heat_common::consts::MAX_ZONES;
use heat_control_unit::control::{PidCascade, PidController, PidGains, PidParams};
use heat_control_unit::{ControlCycle, ZoneBinding};
use heat_hal::as5048b::As5048bDriver;
use heat_hal::drivers::simulation::{SimulatedBus, SimulatedSensor};

const T: f64 = 0.01; // 100 Hz

fn reference_controller() -> PidController {
    let params = PidParams::new(
        PidGains {
            kp: 2.0,
            ki: 0.5,
            kd: 0.25,
        },
        0.02,
        T,
    )
    .with_output_limits(-10.0, 10.0)
    .with_integrator_limits(-5.0, 5.0);
    // Parameters are constant and valid.
    PidController::new(params).unwrap()
}

fn bench_pid_update(c: &mut Criterion) {
    let mut pid = reference_controller();
    let mut cycle = 0u64;

    c.bench_function("pid_update", |b| {
        b.iter(|| {
            cycle += 1;
            let t = cycle as f64 * T;
            let measurement = 90.0 + 0.5 * t.sin(); // oscillating feedback
            pid.update(black_box(90.0), black_box(measurement))
        });
    });
}

fn bench_cascade_update(c: &mut Criterion) {
    let mut cascade = PidCascade::new(0.1);
    for _ in 0..MAX_ZONES {
        cascade.push(reference_controller()).unwrap();
    }
    let base = [45.0; MAX_ZONES];
    let mut outputs = [0.0; MAX_ZONES];
    let mut cycle = 0u64;

    c.bench_function("cascade_update_max_zones", |b| {
        b.iter(|| {
            cycle += 1;
            let t = cycle as f64 * T;
            let feedback = [45.0 + t.sin(); MAX_ZONES];
            let mut setpoints = base;
            cascade
                .update(&mut setpoints, black_box(&feedback), &mut outputs)
                .unwrap();
            outputs[MAX_ZONES - 1]
        });
    });
}

fn bench_control_pass(c: &mut Criterion) {
    let mut bus = SimulatedBus::new();
    bus.attach(0x40, SimulatedSensor::new().with_angle_raw(4096));
    bus.attach(0x41, SimulatedSensor::new().with_angle_raw(2048));
    let mut driver = As5048bDriver::new(bus);
    driver.add_device(0, 0x40).unwrap();
    driver.add_device(1, 0x41).unwrap();

    let mut cascade = PidCascade::new(0.0);
    cascade.push(reference_controller()).unwrap();
    cascade.push(reference_controller()).unwrap();
    let zones = [
        ZoneBinding {
            name: "inner".into(),
            sensor_slot: 0,
            setpoint: 90.0,
        },
        ZoneBinding {
            name: "outer".into(),
            sensor_slot: 1,
            setpoint: 45.0,
        },
    ];
    let mut cycle = ControlCycle::new(driver, cascade, &zones).unwrap();

    c.bench_function("control_pass_2_zones", |b| {
        b.iter(|| {
            cycle.driver_mut().bus_mut().clear_log();
            black_box(cycle.step().unwrap())
        });
    });
}

criterion_group!(
    benches,
    bench_pid_update,
    bench_cascade_update,
    bench_control_pass,
);
criterion_main!(benches);
