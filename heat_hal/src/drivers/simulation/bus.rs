//! Simulated register bus.
//!
//! `SimulatedBus` implements [`SensorBus`] over a set of
//! [`SimulatedSensor`]s keyed by address, records every transaction, and
//! injects faults on demand.

use std::collections::{BTreeMap, BTreeSet};

use tracing::trace;

use super::sensor::SimulatedSensor;
use crate::as5048b::register::Register;
use crate::bus::{BusAddress, BusError, SensorBus};

/// One recorded bus transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transaction {
    /// Write of `bytes`.
    Transmit {
        /// Target address.
        address: BusAddress,
        /// Bytes written.
        bytes: Vec<u8>,
    },
    /// Read of `len` bytes.
    Receive {
        /// Target address.
        address: BusAddress,
        /// Bytes requested.
        len: usize,
    },
    /// Liveness probe.
    Probe {
        /// Target address.
        address: BusAddress,
    },
}

/// Fault injection plan.
#[derive(Debug, Clone, Default)]
struct FaultPlan {
    /// Register-address transmits to these registers are NACKed.
    registers: BTreeSet<u8>,
    /// Probes to these addresses are NACKed even if a sensor is attached.
    probes: BTreeSet<u8>,
    /// After this many successful transactions every transaction times out.
    budget: Option<usize>,
}

/// In-memory bus hosting simulated sensors.
#[derive(Debug, Clone, Default)]
pub struct SimulatedBus {
    sensors: BTreeMap<u8, SimulatedSensor>,
    faults: FaultPlan,
    log: Vec<Transaction>,
    completed: usize,
}

impl SimulatedBus {
    /// Empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a sensor at a 7-bit address, replacing any previous one.
    pub fn attach(&mut self, address: u8, sensor: SimulatedSensor) {
        self.sensors.insert(address, sensor);
    }

    /// Sensor at `address`.
    pub fn sensor(&self, address: u8) -> Option<&SimulatedSensor> {
        self.sensors.get(&address)
    }

    /// Mutable sensor at `address`.
    pub fn sensor_mut(&mut self, address: u8) -> Option<&mut SimulatedSensor> {
        self.sensors.get_mut(&address)
    }

    /// NACK every register-address phase selecting `reg`.
    pub fn fail_register(&mut self, reg: Register) {
        self.faults.registers.insert(reg.into());
    }

    /// NACK probes of `address`.
    pub fn fail_probe(&mut self, address: u8) {
        self.faults.probes.insert(address);
    }

    /// Let `count` more transactions succeed, then time out all others.
    pub fn fail_after(&mut self, count: usize) {
        self.faults.budget = Some(self.completed + count);
    }

    /// Remove all injected faults.
    pub fn clear_faults(&mut self) {
        self.faults = FaultPlan::default();
    }

    /// Transactions recorded so far.
    pub fn log(&self) -> &[Transaction] {
        &self.log
    }

    /// Forget recorded transactions.
    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    fn check_budget(&self) -> Result<(), BusError> {
        match self.faults.budget {
            Some(limit) if self.completed >= limit => Err(BusError::Timeout),
            _ => Ok(()),
        }
    }

    /// Count a successful transaction. A failed one ends the access, so the
    /// target forgets any half-finished register selection.
    fn finish(
        &mut self,
        address: BusAddress,
        result: Result<(), BusError>,
    ) -> Result<(), BusError> {
        match result {
            Ok(()) => self.completed += 1,
            Err(_) => {
                if let Some(sensor) = self.sensors.get_mut(&address.get()) {
                    sensor.abort();
                }
            }
        }
        result
    }
}

impl SensorBus for SimulatedBus {
    fn transmit(&mut self, address: BusAddress, bytes: &[u8]) -> Result<(), BusError> {
        self.log.push(Transaction::Transmit {
            address,
            bytes: bytes.to_vec(),
        });
        trace!("sim tx {} {:02x?}", address, bytes);

        let result = self.check_budget().and_then(|()| {
            let sensor = self
                .sensors
                .get_mut(&address.get())
                .ok_or(BusError::Nack)?;
            if sensor.expects_register()
                && bytes
                    .first()
                    .is_some_and(|reg| self.faults.registers.contains(reg))
            {
                return Err(BusError::Nack);
            }
            sensor.write(bytes);
            Ok(())
        });
        self.finish(address, result)
    }

    fn receive(&mut self, address: BusAddress, buffer: &mut [u8]) -> Result<(), BusError> {
        self.log.push(Transaction::Receive {
            address,
            len: buffer.len(),
        });

        let result = self.check_budget().and_then(|()| {
            let sensor = self
                .sensors
                .get_mut(&address.get())
                .ok_or(BusError::Nack)?;
            sensor.read(buffer);
            Ok(())
        });
        trace!("sim rx {} {:02x?}", address, buffer);
        self.finish(address, result)
    }

    fn probe(&mut self, address: BusAddress) -> Result<(), BusError> {
        self.log.push(Transaction::Probe { address });

        let result = self.check_budget().and_then(|()| {
            if self.faults.probes.contains(&address.get())
                || !self.sensors.contains_key(&address.get())
            {
                return Err(BusError::Nack);
            }
            Ok(())
        });
        self.finish(address, result)
    }
}
