//! AS5048B register map and cached register snapshot.
//!
//! 14-bit quantities (angle, magnitude, zero position) are split across two
//! registers: the high register carries bits 13..6, the low register carries
//! bits 5..0 in its six least significant bits.

use std::f64::consts::PI;

/// Mask of the 6-bit low half of a 14-bit value.
pub const LOW_MASK: u8 = 0x3F;

/// Largest 14-bit raw value.
pub const RAW_MAX: u16 = 0x3FFF;

/// Counts per revolution.
pub const RAW_RANGE: f64 = 16384.0;

const DIAG_MASK: u8 = 0x0F;
const ADDRESS_MASK: u8 = 0x1F;
const PROG_CTRL_MASK: u8 = 0x7F;

/// Register addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Register {
    /// OTP programming control.
    ProgCtrl = 0x03,
    /// Programmable bus address bits.
    I2cAddr = 0x15,
    /// Zero position bits 13..6.
    ZeroPosHigh = 0x16,
    /// Zero position bits 5..0.
    ZeroPosLow = 0x17,
    /// Automatic gain control.
    Agc = 0xFA,
    /// Diagnostic flags.
    Diag = 0xFB,
    /// Magnitude bits 13..6.
    MagnitudeHigh = 0xFC,
    /// Magnitude bits 5..0.
    MagnitudeLow = 0xFD,
    /// Angle bits 13..6.
    AngleHigh = 0xFE,
    /// Angle bits 5..0.
    AngleLow = 0xFF,
}

impl From<Register> for u8 {
    fn from(reg: Register) -> u8 {
        reg as u8
    }
}

/// Rebuild a 14-bit value from its high byte and 6-bit low remainder.
#[inline]
pub const fn combine(high: u8, low: u8) -> u16 {
    ((high as u16) << 6) | (low & LOW_MASK) as u16
}

/// Split a 14-bit value into `(high, low)` register bytes.
#[inline]
pub const fn split(raw: u16) -> (u8, u8) {
    (((raw >> 6) & 0xFF) as u8, (raw as u8) & LOW_MASK)
}

/// Degrees to radians.
#[inline]
pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

/// One contiguous read issued by a register refresh.
///
/// Refresh issues the spans in [`RefreshSpan::ORDER`]; a failure leaves the
/// spans after it untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshSpan {
    /// `0x03`, 1 byte.
    ProgrammingControl,
    /// `0x15..=0x17`, 3 bytes: address bits, zero position high/low.
    AddressZeroPosition,
    /// `0xFA..=0xFF`, 6 bytes: gain, diagnostics, magnitude, angle.
    GainMagnitudeAngle,
}

impl RefreshSpan {
    /// Issue order.
    pub const ORDER: [Self; 3] = [
        Self::ProgrammingControl,
        Self::AddressZeroPosition,
        Self::GainMagnitudeAngle,
    ];

    /// Longest span in bytes.
    pub const MAX_LEN: usize = 6;

    /// First register of the span.
    pub const fn start(self) -> Register {
        match self {
            Self::ProgrammingControl => Register::ProgCtrl,
            Self::AddressZeroPosition => Register::I2cAddr,
            Self::GainMagnitudeAngle => Register::Agc,
        }
    }

    /// Number of consecutive registers read.
    pub const fn len(self) -> usize {
        match self {
            Self::ProgrammingControl => 1,
            Self::AddressZeroPosition => 3,
            Self::GainMagnitudeAngle => 6,
        }
    }
}

/// 4-bit diagnostic flags, passed through without interpretation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Diagnostics(u8);

impl Diagnostics {
    /// Wrap a register value, keeping the low 4 bits.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & DIAG_MASK)
    }

    /// Raw 4-bit mask.
    pub const fn bits(self) -> u8 {
        self.0
    }
}

/// 14-bit angle reading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Angle(u16);

impl Angle {
    /// Wrap a raw count, keeping the low 14 bits.
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw & RAW_MAX)
    }

    /// Rebuild from the angle high/low registers.
    pub const fn from_registers(high: u8, low: u8) -> Self {
        Self(combine(high, low))
    }

    /// Raw count in `[0, 16383]`.
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// `raw * 360 / 16384`, in `[0, 360)`.
    pub fn degrees(self) -> f64 {
        f64::from(self.0) * 360.0 / RAW_RANGE
    }

    /// Degrees converted with π/180.
    pub fn radians(self) -> f64 {
        degrees_to_radians(self.degrees())
    }
}

/// Cached copy of one device's registers.
///
/// Fields are stored as the device reports them, masked to their bit width.
/// Only a register refresh mutates a snapshot, one span at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegisterSnapshot {
    prog_ctrl: u8,
    bus_address: u8,
    zero_pos_high: u8,
    zero_pos_low: u8,
    gain_control: u8,
    diagnostics: u8,
    magnitude_high: u8,
    magnitude_low: u8,
    angle_high: u8,
    angle_low: u8,
}

impl RegisterSnapshot {
    /// 7-bit programming control byte.
    pub const fn programming_control(&self) -> u8 {
        self.prog_ctrl
    }

    /// 5-bit programmable address field.
    pub const fn bus_address_bits(&self) -> u8 {
        self.bus_address
    }

    /// 14-bit zero-position offset.
    pub const fn zero_position(&self) -> u16 {
        combine(self.zero_pos_high, self.zero_pos_low)
    }

    /// 8-bit automatic gain control value.
    pub const fn gain_control(&self) -> u8 {
        self.gain_control
    }

    /// 4-bit diagnostic flags.
    pub const fn diagnostics(&self) -> Diagnostics {
        Diagnostics::from_bits(self.diagnostics)
    }

    /// 14-bit magnitude.
    pub const fn magnitude(&self) -> u16 {
        combine(self.magnitude_high, self.magnitude_low)
    }

    /// 14-bit angle.
    pub const fn angle(&self) -> Angle {
        Angle::from_registers(self.angle_high, self.angle_low)
    }

    /// Commit the bytes of one completed span.
    ///
    /// `bytes` must hold exactly `span.len()` bytes.
    pub(crate) fn apply_span(&mut self, span: RefreshSpan, bytes: &[u8]) {
        debug_assert_eq!(bytes.len(), span.len());
        match span {
            RefreshSpan::ProgrammingControl => {
                self.prog_ctrl = bytes[0] & PROG_CTRL_MASK;
            }
            RefreshSpan::AddressZeroPosition => {
                self.bus_address = bytes[0] & ADDRESS_MASK;
                self.zero_pos_high = bytes[1];
                self.zero_pos_low = bytes[2] & LOW_MASK;
            }
            RefreshSpan::GainMagnitudeAngle => {
                self.gain_control = bytes[0];
                self.diagnostics = bytes[1] & DIAG_MASK;
                self.magnitude_high = bytes[2];
                self.magnitude_low = bytes[3] & LOW_MASK;
                self.angle_high = bytes[4];
                self.angle_low = bytes[5] & LOW_MASK;
            }
        }
    }
}
