//! Cascaded PID update.
//!
//! Stages run strictly in order; each stage's output, scaled by the
//! coupling factor, is added to the next stage's setpoint before that stage
//! is updated.

use heapless::Vec;
use thiserror::Error;

use heat_common::consts::MAX_ZONES;

use super::pid::PidController;

/// Cascade call rejected before any stage ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CascadeError {
    /// Input slices disagree in length.
    #[error(
        "cascade length mismatch: {stages} stages, {setpoints} setpoints, \
         {feedback} feedback values, {outputs} outputs"
    )]
    LengthMismatch {
        stages: usize,
        setpoints: usize,
        feedback: usize,
        outputs: usize,
    },
    /// More stages than [`MAX_ZONES`].
    #[error("cascade capacity ({0}) exceeded")]
    TooManyStages(usize),
}

/// Update `stages` in order.
///
/// `outputs[i] = stages[i].update(setpoints[i], feedback[i])`, then
/// `setpoints[i + 1] += outputs[i] * coupling`. `setpoints` is modified in
/// place. All slices must have the same length; on mismatch nothing is
/// touched.
pub fn cascade_update(
    stages: &mut [PidController],
    setpoints: &mut [f64],
    feedback: &[f64],
    outputs: &mut [f64],
    coupling: f64,
) -> Result<(), CascadeError> {
    let n = stages.len();
    if setpoints.len() != n || feedback.len() != n || outputs.len() != n {
        return Err(CascadeError::LengthMismatch {
            stages: n,
            setpoints: setpoints.len(),
            feedback: feedback.len(),
            outputs: outputs.len(),
        });
    }

    for i in 0..n {
        outputs[i] = stages[i].update(setpoints[i], feedback[i]);
        if let Some(next) = setpoints.get_mut(i + 1) {
            *next += outputs[i] * coupling;
        }
    }
    Ok(())
}

/// Owned chain of up to [`MAX_ZONES`] controllers sharing one coupling
/// factor.
#[derive(Debug, Clone, Default)]
pub struct PidCascade {
    stages: Vec<PidController, MAX_ZONES>,
    coupling_factor: f64,
}

impl PidCascade {
    /// Empty cascade.
    pub fn new(coupling_factor: f64) -> Self {
        Self {
            stages: Vec::new(),
            coupling_factor,
        }
    }

    /// Append a stage at the end of the chain.
    pub fn push(&mut self, stage: PidController) -> Result<(), CascadeError> {
        self.stages
            .push(stage)
            .map_err(|_| CascadeError::TooManyStages(MAX_ZONES))
    }

    /// Run [`cascade_update`] over the owned stages.
    pub fn update(
        &mut self,
        setpoints: &mut [f64],
        feedback: &[f64],
        outputs: &mut [f64],
    ) -> Result<(), CascadeError> {
        cascade_update(
            &mut self.stages,
            setpoints,
            feedback,
            outputs,
            self.coupling_factor,
        )
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// True when no stage has been pushed.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Stage at `index`.
    pub fn stage(&self, index: usize) -> Option<&PidController> {
        self.stages.get(index)
    }

    /// Mutable stage at `index`.
    pub fn stage_mut(&mut self, index: usize) -> Option<&mut PidController> {
        self.stages.get_mut(index)
    }

    /// All stages in chain order.
    pub fn stages(&self) -> &[PidController] {
        &self.stages
    }

    /// Reset every stage.
    pub fn reset_all(&mut self) {
        self.stages.iter_mut().for_each(PidController::reset);
    }

    /// Coupling factor `c`.
    pub fn coupling_factor(&self) -> f64 {
        self.coupling_factor
    }

    /// Replace the coupling factor.
    pub fn set_coupling_factor(&mut self, coupling: f64) {
        self.coupling_factor = coupling;
    }
}
