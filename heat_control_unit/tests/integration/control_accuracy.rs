//! Closed-loop accuracy of a single PID stage.
//!
//! Plant: pure integrator `y += u * T`, the shape of a heater zone whose
//! sensor angle follows the actuator command.

use heat_control_unit::control::{PidController, PidGains, PidParams};

const T: f64 = 0.01;

/// Run `cycles` steps toward `setpoint` from 0; return every plant value.
fn run_step_response(pid: &mut PidController, setpoint: f64, cycles: usize) -> Vec<f64> {
    let mut y = 0.0;
    let mut trace = Vec::with_capacity(cycles);
    for _ in 0..cycles {
        let u = pid.update(setpoint, y);
        y += u * T;
        trace.push(y);
    }
    trace
}

fn pi_params() -> PidParams {
    PidParams::new(
        PidGains {
            kp: 2.0,
            ki: 1.0,
            kd: 0.0,
        },
        0.05,
        T,
    )
}

#[test]
fn pi_step_response_settles() {
    let mut pid = PidController::new(pi_params()).unwrap();
    let trace = run_step_response(&mut pid, 10.0, 5_000);
    let last = *trace.last().unwrap();
    assert!((last - 10.0).abs() < 1e-3, "final value {last}");
}

#[test]
fn derivative_on_measurement_still_settles() {
    let mut params = pi_params();
    params.gains.kd = 0.1;
    let mut pid = PidController::new(params).unwrap();
    let trace = run_step_response(&mut pid, 10.0, 5_000);
    let last = *trace.last().unwrap();
    assert!((last - 10.0).abs() < 1e-3, "final value {last}");
}

#[test]
fn integrator_clamp_limits_overshoot_after_saturation() {
    let saturated = pi_params().with_output_limits(-5.0, 5.0);

    let mut clamped =
        PidController::new(saturated.with_integrator_limits(-2.0, 2.0)).unwrap();
    let mut unclamped = PidController::new(saturated).unwrap();

    let mut y = 0.0;
    let mut peak_clamped = f64::MIN;
    for _ in 0..10_000 {
        let u = clamped.update(100.0, y);
        assert!((-5.0..=5.0).contains(&u));
        assert!((-2.0..=2.0).contains(&clamped.integrator()));
        y += u * T;
        peak_clamped = peak_clamped.max(y);
    }
    assert!((y - 100.0).abs() < 1e-3, "final value {y}");

    let trace = run_step_response(&mut unclamped, 100.0, 10_000);
    let peak_unclamped = trace.iter().copied().fold(f64::MIN, f64::max);

    let overshoot_clamped = peak_clamped - 100.0;
    let overshoot_unclamped = peak_unclamped - 100.0;
    assert!(overshoot_clamped < 5.0, "overshoot {overshoot_clamped}");
    assert!(
        overshoot_unclamped > 10.0 * overshoot_clamped,
        "clamped {overshoot_clamped}, unclamped {overshoot_unclamped}"
    );
}

#[test]
fn settled_loop_holds_output_through_gain_change() {
    let mut pid = PidController::new(pi_params()).unwrap();
    let trace = run_step_response(&mut pid, 10.0, 5_000);
    let y = *trace.last().unwrap();
    let integrator = pid.integrator();

    pid.set_gains(PidGains {
        kp: 4.0,
        ki: 1.0,
        kd: 0.0,
    })
    .unwrap();
    // Error is ~0, so the new Kp barely moves the output.
    let u = pid.update(10.0, y);
    assert!((u - integrator).abs() < 1e-2);
}
