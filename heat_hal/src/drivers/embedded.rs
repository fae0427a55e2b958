//! `embedded-hal` I²C adapter.
//!
//! Wraps any blocking `embedded_hal::i2c::I2c` peripheral as a
//! [`SensorBus`]. `embedded-hal` takes 7-bit addresses, so
//! [`BusAddress::get`] is passed through unshifted.

use embedded_hal::i2c::{ErrorKind, I2c};

use crate::bus::{BusAddress, BusError, SensorBus};

/// `SensorBus` over an `embedded-hal` I²C peripheral.
pub struct EmbeddedI2cBus<I> {
    i2c: I,
}

impl<I: I2c> EmbeddedI2cBus<I> {
    /// Wrap a configured peripheral.
    pub fn new(i2c: I) -> Self {
        Self { i2c }
    }

    /// Release the peripheral.
    pub fn release(self) -> I {
        self.i2c
    }
}

impl<I: I2c> SensorBus for EmbeddedI2cBus<I> {
    fn transmit(&mut self, address: BusAddress, bytes: &[u8]) -> Result<(), BusError> {
        self.i2c.write(address.get(), bytes).map_err(map_error)
    }

    fn receive(&mut self, address: BusAddress, buffer: &mut [u8]) -> Result<(), BusError> {
        self.i2c.read(address.get(), buffer).map_err(map_error)
    }

    fn probe(&mut self, address: BusAddress) -> Result<(), BusError> {
        // Zero-length write: address phase only.
        self.i2c.write(address.get(), &[]).map_err(map_error)
    }
}

fn map_error<E: embedded_hal::i2c::Error>(err: E) -> BusError {
    match err.kind() {
        ErrorKind::NoAcknowledge(_) => BusError::Nack,
        ErrorKind::ArbitrationLoss => BusError::ArbitrationLoss,
        other => BusError::Other(format!("{other:?}")),
    }
}
