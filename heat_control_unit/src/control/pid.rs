//! Discrete PID controller with trapezoidal integration, clamped integrator
//! (anti-windup), band-limited derivative-on-measurement and output
//! saturation.
//!
//! Zero Ki disables integral; zero Kd disables derivative.

use thiserror::Error;

/// PID gains, replaceable at runtime via [`PidController::set_gains`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PidGains {
    /// Proportional gain.
    pub kp: f64,
    /// Integral gain (0 = disabled).
    pub ki: f64,
    /// Derivative gain (0 = disabled).
    pub kd: f64,
}

/// Construction-time controller parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidParams {
    /// Initial gains.
    pub gains: PidGains,
    /// Derivative low-pass time constant τ [s].
    pub tau: f64,
    /// Output lower bound.
    pub out_min: f64,
    /// Output upper bound.
    pub out_max: f64,
    /// Integrator lower bound.
    pub int_min: f64,
    /// Integrator upper bound.
    pub int_max: f64,
    /// Sample period T [s].
    pub sample_period: f64,
}

impl PidParams {
    /// Unbounded parameters with the given gains, τ and T.
    pub fn new(gains: PidGains, tau: f64, sample_period: f64) -> Self {
        Self {
            gains,
            tau,
            out_min: f64::NEG_INFINITY,
            out_max: f64::INFINITY,
            int_min: f64::NEG_INFINITY,
            int_max: f64::INFINITY,
            sample_period,
        }
    }

    /// Builder: output limits.
    pub fn with_output_limits(mut self, min: f64, max: f64) -> Self {
        self.out_min = min;
        self.out_max = max;
        self
    }

    /// Builder: integrator limits.
    pub fn with_integrator_limits(mut self, min: f64, max: f64) -> Self {
        self.int_min = min;
        self.int_max = max;
        self
    }

    /// Check the preconditions of [`PidController::new`].
    pub fn validate(&self) -> Result<(), PidConfigError> {
        validate_gains(&self.gains)?;
        if !(self.tau.is_finite() && self.tau > 0.0) {
            return Err(PidConfigError::NonPositiveTau(self.tau));
        }
        if !(self.sample_period.is_finite() && self.sample_period > 0.0) {
            return Err(PidConfigError::NonPositivePeriod(self.sample_period));
        }
        for (field, value) in [
            ("out_min", self.out_min),
            ("out_max", self.out_max),
            ("int_min", self.int_min),
            ("int_max", self.int_max),
        ] {
            if value.is_nan() {
                return Err(PidConfigError::NanLimit(field));
            }
        }
        if self.out_min > self.out_max {
            return Err(PidConfigError::InvertedOutputLimits {
                min: self.out_min,
                max: self.out_max,
            });
        }
        if self.int_min > self.int_max {
            return Err(PidConfigError::InvertedIntegratorLimits {
                min: self.int_min,
                max: self.int_max,
            });
        }
        Ok(())
    }
}

fn validate_gains(gains: &PidGains) -> Result<(), PidConfigError> {
    for (field, value) in [("kp", gains.kp), ("ki", gains.ki), ("kd", gains.kd)] {
        if !value.is_finite() {
            return Err(PidConfigError::NotFinite { field, value });
        }
    }
    Ok(())
}

/// Rejected controller parameters.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum PidConfigError {
    /// Gain is NaN or infinite.
    #[error("{field} must be finite, got {value}")]
    NotFinite {
        /// Offending field.
        field: &'static str,
        /// Offending value.
        value: f64,
    },
    /// τ ≤ 0 or not finite.
    #[error("derivative time constant must be finite and > 0, got {0}")]
    NonPositiveTau(f64),
    /// T ≤ 0 or not finite.
    #[error("sample period must be finite and > 0, got {0}")]
    NonPositivePeriod(f64),
    /// A limit is NaN.
    #[error("{0} is NaN")]
    NanLimit(&'static str),
    /// `out_min > out_max`.
    #[error("output limits inverted: {min} > {max}")]
    InvertedOutputLimits {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
    /// `int_min > int_max`.
    #[error("integrator limits inverted: {min} > {max}")]
    InvertedIntegratorLimits {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
}

/// Runtime state of the controller.
///
/// Preserves the integrator and filtered derivative across updates. Zeroed
/// by [`PidState::reset`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PidState {
    /// Integrator accumulator.
    pub integrator: f64,
    /// Previous error.
    pub prev_error: f64,
    /// Filtered derivative term.
    pub differentiator: f64,
    /// Previous measurement (derivative acts on measurement).
    pub prev_measurement: f64,
    /// Last clamped output.
    pub output: f64,
}

impl PidState {
    /// Reset all internal state to zero.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// One PID loop: parameters plus state.
#[derive(Debug, Clone)]
pub struct PidController {
    params: PidParams,
    state: PidState,
}

impl PidController {
    /// Validate `params` and start from a zeroed state.
    pub fn new(params: PidParams) -> Result<Self, PidConfigError> {
        params.validate()?;
        Ok(Self {
            params,
            state: PidState::default(),
        })
    }

    /// Zero the runtime state. Gains and limits are kept.
    #[inline]
    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Compute one sample and return the clamped output.
    #[inline]
    pub fn update(&mut self, setpoint: f64, measurement: f64) -> f64 {
        let p = &self.params;
        let s = &mut self.state;
        let t = p.sample_period;

        let error = setpoint - measurement;

        // ── P term ──────────────────────────────────────────────
        let proportional = p.gains.kp * error;

        // ── I term (trapezoidal, clamped) ───────────────────────
        s.integrator += 0.5 * p.gains.ki * t * (error + s.prev_error);
        s.integrator = s.integrator.clamp(p.int_min, p.int_max);

        // ── D term (on measurement, band-limited) ───────────────
        s.differentiator = -(2.0 * p.gains.kd * (measurement - s.prev_measurement)
            + (2.0 * p.tau - t) * s.differentiator)
            / (2.0 * p.tau + t);

        let output = (proportional + s.integrator + s.differentiator).clamp(p.out_min, p.out_max);

        s.prev_error = error;
        s.prev_measurement = measurement;
        s.output = output;
        output
    }

    /// Replace the gains; integrator and derivative history are kept.
    ///
    /// Non-finite gains are rejected and the old gains stay in place.
    pub fn set_gains(&mut self, gains: PidGains) -> Result<(), PidConfigError> {
        validate_gains(&gains)?;
        self.params.gains = gains;
        Ok(())
    }

    /// Proportional gain.
    pub fn kp(&self) -> f64 {
        self.params.gains.kp
    }

    /// Integral gain.
    pub fn ki(&self) -> f64 {
        self.params.gains.ki
    }

    /// Derivative gain.
    pub fn kd(&self) -> f64 {
        self.params.gains.kd
    }

    /// Active gains.
    pub fn gains(&self) -> PidGains {
        self.params.gains
    }

    /// Construction parameters with the active gains.
    pub fn params(&self) -> &PidParams {
        &self.params
    }

    /// Runtime state.
    pub fn state(&self) -> &PidState {
        &self.state
    }

    /// Current integrator value.
    pub fn integrator(&self) -> f64 {
        self.state.integrator
    }

    /// Output of the last update (0 before the first).
    pub fn output(&self) -> f64 {
        self.state.output
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
