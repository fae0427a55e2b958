//! Register bus seam and error types.
//!
//! This module defines:
//! - `SensorBus` trait - Blocking transport consumed by sensor drivers
//! - `BusError` enum - Transport failures
//! - `BusAddress` - Validated 7-bit device address
//!
//! The driver never talks to hardware directly. Every register access is
//! a register-address `transmit` followed by either a `receive` (read) or a
//! second `transmit` carrying the data (write).

use std::fmt;

use heat_common::consts::MAX_I2C_ADDR;
use thiserror::Error;

/// Error types for bus transactions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BusError {
    /// Addressed device did not acknowledge.
    #[error("no acknowledge from device")]
    Nack,

    /// Transaction did not complete within the transport's max wait.
    #[error("bus transaction timed out")]
    Timeout,

    /// Lost arbitration to another master.
    #[error("bus arbitration lost")]
    ArbitrationLoss,

    /// Any other transport-specific failure.
    #[error("bus failure: {0}")]
    Other(String),
}

/// 7-bit logical device address.
///
/// Transports that expect the 8-bit wire form (address in bits 7..1) call
/// [`BusAddress::wire`] once at their own boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BusAddress(u8);

impl BusAddress {
    /// Validate a 7-bit address.
    pub const fn new(raw: u8) -> Option<Self> {
        if raw <= MAX_I2C_ADDR {
            Some(Self(raw))
        } else {
            None
        }
    }

    /// The 7-bit address.
    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// 8-bit wire form (`address << 1`, R/W bit clear).
    #[inline]
    pub const fn wire(self) -> u8 {
        self.0 << 1
    }
}

impl fmt::Display for BusAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}

impl TryFrom<u8> for BusAddress {
    type Error = u8;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        Self::new(raw).ok_or(raw)
    }
}

/// Blocking register-bus transport.
///
/// Implementations own timeout semantics: each call returns once the
/// transaction completed, failed, or hit the transport's max wait.
/// There is no mid-transaction cancellation.
pub trait SensorBus {
    /// Write `bytes` to the device at `address`.
    fn transmit(&mut self, address: BusAddress, bytes: &[u8]) -> Result<(), BusError>;

    /// Fill `buffer` from the device at `address`.
    fn receive(&mut self, address: BusAddress, buffer: &mut [u8]) -> Result<(), BusError>;

    /// Liveness check: `Ok` if a device acknowledges `address`.
    fn probe(&mut self, address: BusAddress) -> Result<(), BusError>;
}

impl<B: SensorBus + ?Sized> SensorBus for &mut B {
    fn transmit(&mut self, address: BusAddress, bytes: &[u8]) -> Result<(), BusError> {
        (**self).transmit(address, bytes)
    }

    fn receive(&mut self, address: BusAddress, buffer: &mut [u8]) -> Result<(), BusError> {
        (**self).receive(address, buffer)
    }

    fn probe(&mut self, address: BusAddress) -> Result<(), BusError> {
        (**self).probe(address)
    }
}
