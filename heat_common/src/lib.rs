//! Heater Common Library
//!
//! This crate provides shared constants and configuration loading utilities
//! for all heater control workspace crates.
//!
//! # Module Structure
//!
//! - [`consts`] - System-wide limits and defaults
//! - [`config`] - Configuration loading traits and the top-level `HeaterConfig`
//! - [`sensor`] - Sensor bus layout
//! - [`control`] - Control zone tuning
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use heat_common::consts::MAX_SENSORS;
//! use heat_common::config::{ConfigLoader, HeaterConfig};
//! ```

pub mod config;
pub mod consts;
pub mod control;
pub mod prelude;
pub mod sensor;
