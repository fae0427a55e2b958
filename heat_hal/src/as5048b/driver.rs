//! AS5048B driver context.
//!
//! `As5048bDriver` owns the bus handle and a fixed table of sensor slots.
//! All operations are blocking and single-owner (`&mut self`); callers that
//! share one bus across loops serialize access outside the driver.

use heat_common::consts::{MAX_I2C_ADDR, MAX_SENSORS};
use tracing::{debug, info, trace, warn};

use super::error::{CalibrationStep, SensorError};
use super::register::{Angle, Diagnostics, RefreshSpan, Register, RegisterSnapshot, split};
use crate::bus::{BusAddress, BusError, SensorBus};

/// Outcome of the liveness probe issued by [`As5048bDriver::add_device`].
///
/// The slot is recorded either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStatus {
    /// Device acknowledged its address.
    Responsive,
    /// No acknowledge; the registration stands.
    Unresponsive,
}

/// Result of the last register refresh of a device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RefreshStatus {
    /// No refresh attempted since registration.
    #[default]
    Never,
    /// All spans read.
    Fresh,
    /// Refresh stopped at `span`; later spans hold last-good values.
    Failed {
        /// Span that failed.
        span: RefreshSpan,
    },
}

/// Bus scan summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanReport {
    /// Devices assigned to slots.
    pub found: usize,
    /// Addresses probed before the scan stopped.
    pub probed: usize,
}

/// One registered sensor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorDevice {
    address: BusAddress,
    registers: RegisterSnapshot,
    status: RefreshStatus,
}

impl SensorDevice {
    fn new(address: BusAddress) -> Self {
        Self {
            address,
            registers: RegisterSnapshot::default(),
            status: RefreshStatus::Never,
        }
    }

    /// Bus address.
    pub fn address(&self) -> BusAddress {
        self.address
    }

    /// Cached registers.
    pub fn registers(&self) -> &RegisterSnapshot {
        &self.registers
    }

    /// Outcome of the last refresh.
    pub fn status(&self) -> RefreshStatus {
        self.status
    }
}

/// Driver context for up to [`MAX_SENSORS`] AS5048B sensors on one bus.
pub struct As5048bDriver<B: SensorBus> {
    bus: B,
    slots: [Option<SensorDevice>; MAX_SENSORS],
    count: usize,
}

impl<B: SensorBus> As5048bDriver<B> {
    /// Bind a bus handle with an empty device table.
    pub fn new(bus: B) -> Self {
        Self {
            bus,
            slots: std::array::from_fn(|_| None),
            count: 0,
        }
    }

    /// Bind an optional bus handle.
    ///
    /// # Errors
    /// `SensorError::MissingBus` if `bus` is `None`.
    pub fn try_new(bus: Option<B>) -> Result<Self, SensorError> {
        bus.map(Self::new).ok_or(SensorError::MissingBus)
    }

    /// Table capacity.
    pub const fn capacity(&self) -> usize {
        MAX_SENSORS
    }

    /// Registered devices.
    pub fn device_count(&self) -> usize {
        self.count
    }

    /// Registered device in `slot`.
    pub fn device(&self, slot: usize) -> Result<&SensorDevice, SensorError> {
        self.slots
            .get(slot)
            .ok_or(SensorError::SlotOutOfRange {
                slot,
                capacity: MAX_SENSORS,
            })?
            .as_ref()
            .ok_or(SensorError::NoDevice(slot))
    }

    /// Registered devices with their slot index, in slot order.
    pub fn devices(&self) -> impl Iterator<Item = (usize, &SensorDevice)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, dev)| dev.as_ref().map(|d| (slot, d)))
    }

    /// Shared bus handle.
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Mutable bus handle.
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Tear down the context and return the bus handle.
    pub fn into_bus(self) -> B {
        self.bus
    }

    /// Register a sensor at `slot` and probe it.
    ///
    /// The slot is assigned and counted before the probe; a silent device
    /// returns `Ok(ProbeStatus::Unresponsive)` and stays registered.
    ///
    /// # Errors
    /// Capacity, slot and address violations. Nothing is mutated on error.
    pub fn add_device(&mut self, slot: usize, address: u8) -> Result<ProbeStatus, SensorError> {
        if slot >= MAX_SENSORS {
            return Err(SensorError::SlotOutOfRange {
                slot,
                capacity: MAX_SENSORS,
            });
        }
        if self.count >= MAX_SENSORS {
            return Err(SensorError::TableFull {
                capacity: MAX_SENSORS,
            });
        }
        let address = BusAddress::new(address).ok_or(SensorError::InvalidAddress(address))?;
        if self.slots[slot].is_some() {
            return Err(SensorError::SlotOccupied(slot));
        }
        if self.devices().any(|(_, d)| d.address == address) {
            return Err(SensorError::DuplicateAddress(address));
        }

        self.slots[slot] = Some(SensorDevice::new(address));
        self.count += 1;
        debug!("Sensor slot {} assigned to {}", slot, address);

        match self.bus.probe(address) {
            Ok(()) => Ok(ProbeStatus::Responsive),
            Err(e) => {
                warn!(
                    "Sensor {} (slot {}) did not answer probe: {}. Registration kept.",
                    address, slot, e
                );
                Ok(ProbeStatus::Unresponsive)
            }
        }
    }

    /// Discover live devices and reassign registered slots.
    ///
    /// Probes 0..=127 in ascending order until as many devices answer as are
    /// registered, then assigns them to the occupied slots in slot order.
    /// Reassigned slots start with an empty snapshot.
    ///
    /// # Errors
    /// `SensorError::ScanIncomplete` if too few devices answer; the table is
    /// left unchanged.
    pub fn scan(&mut self) -> Result<ScanReport, SensorError> {
        let expected = self.count;
        let mut found: heapless::Vec<BusAddress, MAX_SENSORS> = heapless::Vec::new();
        let mut probed = 0;

        for raw in 0..=MAX_I2C_ADDR {
            if found.len() >= expected {
                break;
            }
            let Some(address) = BusAddress::new(raw) else {
                break;
            };
            probed += 1;
            if self.bus.probe(address).is_ok() {
                trace!("Scan: device answered at {}", address);
                if found.push(address).is_err() {
                    break;
                }
            }
        }

        if found.len() < expected {
            warn!(
                "Bus scan found {} of {} expected sensors",
                found.len(),
                expected
            );
            return Err(SensorError::ScanIncomplete {
                found: found.len(),
                expected,
            });
        }

        for (device, &address) in self.slots.iter_mut().flatten().zip(found.iter()) {
            *device = SensorDevice::new(address);
        }
        info!("Bus scan assigned {} sensors after {} probes", found.len(), probed);

        Ok(ScanReport {
            found: found.len(),
            probed,
        })
    }

    /// Re-read the cached registers of `slot`.
    ///
    /// Spans are read in [`RefreshSpan::ORDER`] and committed one by one.
    /// The first failing span stops the refresh: completed spans keep their
    /// new values, later spans keep their previous ones.
    ///
    /// # Errors
    /// `SensorError::Refresh` naming the failing span.
    pub fn refresh(&mut self, slot: usize) -> Result<(), SensorError> {
        self.device(slot)?;
        let Self { bus, slots, .. } = self;
        let Some(device) = slots[slot].as_mut() else {
            return Err(SensorError::NoDevice(slot));
        };

        for span in RefreshSpan::ORDER {
            let mut buf = [0u8; RefreshSpan::MAX_LEN];
            let bytes = &mut buf[..span.len()];
            if let Err(source) = read_registers(bus, device.address, span.start(), bytes) {
                device.status = RefreshStatus::Failed { span };
                warn!(
                    "Register refresh of {} failed on {:?}: {}",
                    device.address, span, source
                );
                return Err(SensorError::Refresh { span, source });
            }
            trace!("Refresh {} {:?}: {:02x?}", device.address, span, bytes);
            device.registers.apply_span(span, bytes);
        }

        device.status = RefreshStatus::Fresh;
        Ok(())
    }

    /// Make the current physical position read as zero.
    ///
    /// Clears the zero-position registers, reads the raw angle, writes it
    /// back as the new zero. The sequence is not atomic and is never retried
    /// or rolled back here.
    ///
    /// Returns the raw angle stored as zero. The cached snapshot is not
    /// touched; call [`refresh`](Self::refresh) to observe the new offset.
    ///
    /// # Errors
    /// `SensorError::Calibration` with the failing step. The device must be
    /// recalibrated from the first step.
    pub fn calibrate_zero(&mut self, slot: usize) -> Result<Angle, SensorError> {
        let address = self.device(slot)?.address;
        let fail = |step: CalibrationStep| {
            move |source: BusError| {
                warn!(
                    "Zero calibration of {} failed at {:?}: {}",
                    address, step, source
                );
                SensorError::Calibration { step, source }
            }
        };

        write_registers(&mut self.bus, address, Register::ZeroPosHigh, &[0, 0])
            .map_err(fail(CalibrationStep::ClearZero))?;

        let mut raw = [0u8; 2];
        read_registers(&mut self.bus, address, Register::AngleHigh, &mut raw)
            .map_err(fail(CalibrationStep::ReadAngle))?;
        let zero = Angle::from_registers(raw[0], raw[1]);

        let (high, low) = split(zero.raw());
        write_registers(&mut self.bus, address, Register::ZeroPosHigh, &[high, low])
            .map_err(fail(CalibrationStep::WriteZero))?;

        info!(
            "Sensor {} zeroed at raw {} ({:.3} deg)",
            address,
            zero.raw(),
            zero.degrees()
        );
        Ok(zero)
    }

    /// Read the angle registers directly, bypassing the snapshot.
    ///
    /// # Errors
    /// `SensorError::Bus` on transport failure.
    pub fn read_angle(&mut self, slot: usize) -> Result<Angle, SensorError> {
        let address = self.device(slot)?.address;
        let mut raw = [0u8; 2];
        read_registers(&mut self.bus, address, Register::AngleHigh, &mut raw).map_err(
            |source| SensorError::Bus {
                address,
                register: Register::AngleHigh,
                source,
            },
        )?;
        Ok(Angle::from_registers(raw[0], raw[1]))
    }

    /// Angle in degrees, `[0, 360)`.
    pub fn angle_degrees(&mut self, slot: usize) -> Result<f64, SensorError> {
        self.read_angle(slot).map(Angle::degrees)
    }

    /// Angle in radians, `[0, 2π)`.
    pub fn angle_radians(&mut self, slot: usize) -> Result<f64, SensorError> {
        self.read_angle(slot).map(Angle::radians)
    }

    /// Refresh, then return the 14-bit magnitude.
    pub fn magnitude(&mut self, slot: usize) -> Result<u16, SensorError> {
        self.refresh(slot)?;
        Ok(self.device(slot)?.registers.magnitude())
    }

    /// Refresh, then return the diagnostic flags.
    pub fn diagnostics(&mut self, slot: usize) -> Result<Diagnostics, SensorError> {
        self.refresh(slot)?;
        Ok(self.device(slot)?.registers.diagnostics())
    }
}

/// Register read: address phase, then receive.
fn read_registers<B: SensorBus + ?Sized>(
    bus: &mut B,
    address: BusAddress,
    start: Register,
    buf: &mut [u8],
) -> Result<(), BusError> {
    bus.transmit(address, &[start.into()])?;
    bus.receive(address, buf)
}

/// Register write: address phase, then data phase.
fn write_registers<B: SensorBus + ?Sized>(
    bus: &mut B,
    address: BusAddress,
    start: Register,
    data: &[u8],
) -> Result<(), BusError> {
    bus.transmit(address, &[start.into()])?;
    bus.transmit(address, data)
}
