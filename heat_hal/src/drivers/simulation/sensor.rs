//! Register-level model of one AS5048B.
//!
//! The sensor keeps a 256-byte register file with an auto-incrementing
//! pointer. A one-byte transmit sets the pointer; the following transmit
//! writes data from there, the following receive reads from there. Only
//! the programming-control, address and zero-position registers are
//! writable. Angle registers report the mechanical angle minus the
//! zero-position offset, modulo one revolution.

use crate::as5048b::register::{LOW_MASK, RAW_MAX, RAW_RANGE, Register, combine, split};

/// Simulated AS5048B register file.
#[derive(Debug, Clone)]
pub struct SimulatedSensor {
    regs: [u8; 256],
    pointer: u8,
    /// Register selected by an address-only transmit, awaiting data or a read.
    pending: Option<u8>,
    /// Mechanical angle before the zero offset is applied.
    mechanical_raw: u16,
}

impl Default for SimulatedSensor {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedSensor {
    /// Sensor at angle 0 with a healthy field (AGC mid-range, OCF set).
    pub fn new() -> Self {
        let mut sensor = Self {
            regs: [0; 256],
            pointer: 0,
            pending: None,
            mechanical_raw: 0,
        };
        sensor.set_gain_control(0x80);
        sensor.set_diagnostics(0x01);
        sensor.set_magnitude(0x1000);
        sensor.sync_angle();
        sensor
    }

    /// Builder: mechanical angle.
    pub fn with_angle_raw(mut self, raw: u16) -> Self {
        self.set_angle_raw(raw);
        self
    }

    /// Set the mechanical angle [counts].
    pub fn set_angle_raw(&mut self, raw: u16) {
        self.mechanical_raw = raw & RAW_MAX;
        self.sync_angle();
    }

    /// Set the mechanical angle [deg], wrapped to one revolution.
    pub fn set_angle_degrees(&mut self, degrees: f64) {
        let counts = (degrees.rem_euclid(360.0) * RAW_RANGE / 360.0).round() as u32;
        self.set_angle_raw((counts % 16384) as u16);
    }

    /// Mechanical angle [counts].
    pub fn mechanical_raw(&self) -> u16 {
        self.mechanical_raw
    }

    /// Set the 14-bit magnitude.
    pub fn set_magnitude(&mut self, raw: u16) {
        let (high, low) = split(raw & RAW_MAX);
        self.regs[Register::MagnitudeHigh as usize] = high;
        self.regs[Register::MagnitudeLow as usize] = low;
    }

    /// Set the diagnostics register (4 bits kept).
    pub fn set_diagnostics(&mut self, bits: u8) {
        self.regs[Register::Diag as usize] = bits & 0x0F;
    }

    /// Set the AGC register.
    pub fn set_gain_control(&mut self, value: u8) {
        self.regs[Register::Agc as usize] = value;
    }

    /// Set the programming-control register (7 bits kept).
    pub fn set_programming_control(&mut self, value: u8) {
        self.regs[Register::ProgCtrl as usize] = value & 0x7F;
    }

    /// Current 14-bit zero-position offset.
    pub fn zero_position(&self) -> u16 {
        combine(
            self.regs[Register::ZeroPosHigh as usize],
            self.regs[Register::ZeroPosLow as usize],
        )
    }

    /// Angle the device reports, after the zero offset.
    pub fn reported_angle_raw(&self) -> u16 {
        self.mechanical_raw.wrapping_sub(self.zero_position()) & RAW_MAX
    }

    /// Raw register byte.
    pub fn register(&self, reg: Register) -> u8 {
        self.regs[reg as usize]
    }

    /// True when the next transmit is interpreted as a register address.
    pub(crate) fn expects_register(&self) -> bool {
        self.pending.is_none()
    }

    /// Drop a register selection left over from an interrupted access.
    pub(crate) fn abort(&mut self) {
        self.pending = None;
    }

    pub(crate) fn write(&mut self, bytes: &[u8]) {
        let data = match self.pending.take() {
            Some(reg) => {
                self.pointer = reg;
                bytes
            }
            None => {
                let Some((&reg, rest)) = bytes.split_first() else {
                    return;
                };
                self.pointer = reg;
                if rest.is_empty() {
                    self.pending = Some(reg);
                    return;
                }
                rest
            }
        };
        for &byte in data {
            self.store(self.pointer, byte);
            self.pointer = self.pointer.wrapping_add(1);
        }
        self.sync_angle();
    }

    pub(crate) fn read(&mut self, buffer: &mut [u8]) {
        if let Some(reg) = self.pending.take() {
            self.pointer = reg;
        }
        for byte in buffer {
            *byte = self.regs[self.pointer as usize];
            self.pointer = self.pointer.wrapping_add(1);
        }
    }

    fn store(&mut self, reg: u8, value: u8) {
        let masked = match reg {
            r if r == Register::ProgCtrl as u8 => value & 0x7F,
            r if r == Register::I2cAddr as u8 => value & 0x1F,
            r if r == Register::ZeroPosHigh as u8 => value,
            r if r == Register::ZeroPosLow as u8 => value & LOW_MASK,
            _ => return,
        };
        self.regs[reg as usize] = masked;
    }

    fn sync_angle(&mut self) {
        let (high, low) = split(self.reported_angle_raw());
        self.regs[Register::AngleHigh as usize] = high;
        self.regs[Register::AngleLow as usize] = low;
    }
}
