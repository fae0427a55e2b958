//! Control engine root.
//!
//! Discrete PID stages and their cascaded update. Each term is disabled by
//! setting its gain to zero.

pub mod cascade;
pub mod pid;

pub use cascade::{CascadeError, PidCascade, cascade_update};
pub use pid::{PidConfigError, PidController, PidGains, PidParams, PidState};
