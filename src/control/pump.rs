//! Circulation pump with maintenance-run bookkeeping.
//!
//! A pump that sits idle for weeks will seize. While commanded off, the
//! idle time accumulates; once it exceeds the maintenance interval the
//! `maintenance_due` flag is raised. A later continuous run longer than
//! the activation time clears it. Each threshold crossing is reported
//! exactly once until the opposite threshold is crossed.
//!
//! The pump never forces its own activation — whether anything acts on the
//! flag is the consumer's decision.

use crate::app::ports::DigitalIoPort;

use super::actuator::Actuator;

/// One-shot notifications from [`Pump::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpNotice {
    /// Idle long enough that a keep-fresh run is due.
    MaintenanceNeeded,
    /// A sufficiently long run completed; the flag is cleared.
    MaintenanceCleared,
}

pub struct Pump {
    output: Actuator,
    activation_ms: u32,
    maintenance_ms: u32,
    maintenance_due: bool,
}

impl Pump {
    pub fn new(pin: u8, activation_ms: u32, maintenance_ms: u32) -> Self {
        Self {
            output: Actuator::new("pump", pin),
            activation_ms,
            maintenance_ms,
            maintenance_due: false,
        }
    }

    pub fn set_on(&mut self, now_ms: u32, io: &mut impl DigitalIoPort) -> bool {
        self.output.set_on(now_ms, io)
    }

    pub fn set_off(&mut self, now_ms: u32, io: &mut impl DigitalIoPort) -> bool {
        self.output.set_off(now_ms, io)
    }

    pub fn is_on(&self) -> bool {
        self.output.is_on()
    }

    pub fn is_off(&self) -> bool {
        self.output.is_off()
    }

    /// Continuous time in the current commanded state.
    pub fn since_transition(&self, now_ms: u32) -> u32 {
        self.output.since_transition(now_ms)
    }

    pub fn maintenance_due(&self) -> bool {
        self.maintenance_due
    }

    /// Run once per control tick; returns a notice on a threshold crossing.
    pub fn update(&mut self, now_ms: u32) -> Option<PumpNotice> {
        let elapsed = self.output.since_transition(now_ms);
        if self.output.is_on() {
            if elapsed >= self.activation_ms && self.maintenance_due {
                self.maintenance_due = false;
                return Some(PumpNotice::MaintenanceCleared);
            }
        } else if elapsed >= self.maintenance_ms && !self.maintenance_due {
            self.maintenance_due = true;
            return Some(PumpNotice::MaintenanceNeeded);
        }
        None
    }
}
