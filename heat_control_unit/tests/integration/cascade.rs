//! Cascade properties over many cycles.

use heat_control_unit::control::{
    CascadeError, PidCascade, PidController, PidGains, PidParams, cascade_update,
};

const T: f64 = 0.1;

fn stage(kp: f64, ki: f64, kd: f64) -> PidController {
    let params = PidParams::new(PidGains { kp, ki, kd }, 0.2, T)
        .with_output_limits(-20.0, 20.0)
        .with_integrator_limits(-8.0, 8.0);
    PidController::new(params).unwrap()
}

fn three_stages() -> [PidController; 3] {
    [stage(1.0, 0.4, 0.05), stage(0.6, 0.2, 0.0), stage(2.0, 0.0, 0.1)]
}

/// Feedback that wanders so every term stays active.
fn feedback_at(k: usize) -> [f64; 3] {
    let k = k as f64;
    [k * 0.3, 5.0 - k * 0.1, (k % 7.0) * 1.5]
}

#[test]
fn zero_coupling_matches_independent_loops_over_time() {
    let mut chained = three_stages();
    let mut alone = three_stages();
    let base = [12.0, -4.0, 30.0];

    for k in 0..200 {
        let fb = feedback_at(k);
        let mut sp = base;
        let mut out = [0.0; 3];
        cascade_update(&mut chained, &mut sp, &fb, &mut out, 0.0).unwrap();
        for i in 0..3 {
            assert_eq!(out[i], alone[i].update(base[i], fb[i]), "cycle {k} stage {i}");
        }
    }
}

#[test]
fn coupling_is_strictly_sequential() {
    let mut chained = three_stages();
    let mut manual = three_stages();
    let base = [12.0, -4.0, 30.0];
    let c = -0.35;

    for k in 0..200 {
        let fb = feedback_at(k);
        let mut sp = base;
        let mut out = [0.0; 3];
        cascade_update(&mut chained, &mut sp, &fb, &mut out, c).unwrap();

        // Stage i+1 sees stage i's output of this same cycle.
        let u0 = manual[0].update(base[0], fb[0]);
        let u1 = manual[1].update(base[1] + u0 * c, fb[1]);
        let u2 = manual[2].update(base[2] + u1 * c, fb[2]);
        assert_eq!(out, [u0, u1, u2], "cycle {k}");
        assert_eq!(sp, [base[0], base[1] + u0 * c, base[2] + u1 * c]);
    }
}

#[test]
fn owned_cascade_matches_free_function() {
    let mut owned = PidCascade::new(0.5);
    for s in three_stages() {
        owned.push(s).unwrap();
    }
    let mut free = three_stages();

    for k in 0..50 {
        let fb = feedback_at(k);
        let (mut sp_a, mut sp_b) = ([1.0, 2.0, 3.0], [1.0, 2.0, 3.0]);
        let (mut out_a, mut out_b) = ([0.0; 3], [0.0; 3]);
        owned.update(&mut sp_a, &fb, &mut out_a).unwrap();
        cascade_update(&mut free, &mut sp_b, &fb, &mut out_b, 0.5).unwrap();
        assert_eq!(out_a, out_b);
    }
}

#[test]
fn outputs_stay_within_limits_under_coupling() {
    let mut stages = three_stages();
    for k in 0..500 {
        let fb = feedback_at(k);
        let mut sp = [100.0, -100.0, 50.0];
        let mut out = [0.0; 3];
        cascade_update(&mut stages, &mut sp, &fb, &mut out, 3.0).unwrap();
        for (i, s) in stages.iter().enumerate() {
            assert!((-20.0..=20.0).contains(&out[i]));
            assert!((-8.0..=8.0).contains(&s.integrator()));
        }
    }
}

#[test]
fn mismatched_feedback_is_rejected() {
    let mut stages = three_stages();
    let mut sp = [0.0; 3];
    let mut out = [0.0; 3];
    let err = cascade_update(&mut stages, &mut sp, &[1.0, 2.0], &mut out, 0.1).unwrap_err();
    assert_eq!(
        err,
        CascadeError::LengthMismatch {
            stages: 3,
            setpoints: 3,
            feedback: 2,
            outputs: 3,
        }
    );
    assert!(stages.iter().all(|s| s.output() == 0.0));
}
