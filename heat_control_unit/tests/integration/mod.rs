//! Integration test modules.

mod cascade;
mod control_accuracy;
mod control_cycle;
