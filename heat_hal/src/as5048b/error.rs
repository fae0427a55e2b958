//! Sensor driver error types.

use thiserror::Error;

use super::register::{RefreshSpan, Register};
use crate::bus::{BusAddress, BusError};

/// Position in the zero-calibration sequence where a bus failure struck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationStep {
    /// Writing zero into the zero-position registers.
    ClearZero,
    /// Reading the raw angle after clearing.
    ReadAngle,
    /// Writing the raw angle back as the new zero.
    WriteZero,
}

/// Error types for sensor driver operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SensorError {
    /// Driver constructed without a bus handle.
    #[error("no bus handle bound to the driver")]
    MissingBus,

    /// Slot index beyond the device table.
    #[error("slot {slot} out of range (capacity {capacity})")]
    SlotOutOfRange {
        /// Requested slot.
        slot: usize,
        /// Table capacity.
        capacity: usize,
    },

    /// Every slot is already assigned.
    #[error("device table full ({capacity} devices)")]
    TableFull {
        /// Table capacity.
        capacity: usize,
    },

    /// Slot already holds a device.
    #[error("slot {0} already assigned")]
    SlotOccupied(usize),

    /// Another slot already uses this address.
    #[error("address {0} already registered")]
    DuplicateAddress(BusAddress),

    /// Address does not fit in 7 bits.
    #[error("address {0:#04x} exceeds 7 bits")]
    InvalidAddress(u8),

    /// Slot is empty.
    #[error("no device registered in slot {0}")]
    NoDevice(usize),

    /// Bus scan found fewer live devices than registered.
    #[error("bus scan found {found} of {expected} expected devices")]
    ScanIncomplete {
        /// Live devices found.
        found: usize,
        /// Registered device count.
        expected: usize,
    },

    /// Direct register access failed.
    #[error("bus error at {address} accessing {register:?}: {source}")]
    Bus {
        /// Device address.
        address: BusAddress,
        /// First register of the access.
        register: Register,
        /// Transport failure.
        source: BusError,
    },

    /// Register refresh stopped at `span`; earlier spans were committed.
    #[error("register refresh failed on {span:?} span: {source}")]
    Refresh {
        /// Span that failed.
        span: RefreshSpan,
        /// Transport failure.
        source: BusError,
    },

    /// Zero calibration interrupted; the device zero position is undefined
    /// until the full sequence is re-run.
    #[error("zero calibration interrupted at {step:?}, device left uncalibrated: {source}")]
    Calibration {
        /// Step that failed.
        step: CalibrationStep,
        /// Transport failure.
        source: BusError,
    },
}

impl SensorError {
    /// True for failures caused by the bus rather than by the caller.
    pub fn is_bus_failure(&self) -> bool {
        matches!(
            self,
            Self::Bus { .. } | Self::Refresh { .. } | Self::Calibration { .. }
        )
    }
}
