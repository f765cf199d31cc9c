//! Commandable boolean output with transition-timestamp tracking.
//!
//! The building block under the zone valves, the circulation pump and the
//! boiler relay. It tracks *commanded* state only — whether the hardware
//! actually moved is the owner's problem (see [`Valve`](super::valve::Valve)).
//!
//! `set_on`/`set_off` are idempotent: commanding the current state is a
//! no-op and does not disturb the transition timer. On an actual change the
//! output pin is written, the timer resets, and the call returns `true` so
//! the owner can emit a state-change report.

use crate::app::ports::DigitalIoPort;

pub struct Actuator {
    name: &'static str,
    pin: u8,
    commanded: bool,
    transition_at_ms: u32,
}

impl Actuator {
    pub fn new(name: &'static str, pin: u8) -> Self {
        Self {
            name,
            pin,
            commanded: false,
            transition_at_ms: 0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn pin(&self) -> u8 {
        self.pin
    }

    /// Command the output on. Returns `true` only on an actual transition.
    pub fn set_on(&mut self, now_ms: u32, io: &mut impl DigitalIoPort) -> bool {
        self.set(true, now_ms, io)
    }

    /// Command the output off. Returns `true` only on an actual transition.
    pub fn set_off(&mut self, now_ms: u32, io: &mut impl DigitalIoPort) -> bool {
        self.set(false, now_ms, io)
    }

    fn set(&mut self, level: bool, now_ms: u32, io: &mut impl DigitalIoPort) -> bool {
        if self.commanded == level {
            return false;
        }
        self.commanded = level;
        self.transition_at_ms = now_ms;
        io.write(self.pin, level);
        true
    }

    /// Commanded (not physical) state.
    pub fn is_on(&self) -> bool {
        self.commanded
    }

    pub fn is_off(&self) -> bool {
        !self.commanded
    }

    /// Milliseconds since the last accepted transition.
    /// Wraparound-safe: elapsed-since-reset, never an absolute timestamp.
    pub fn since_transition(&self, now_ms: u32) -> u32 {
        now_ms.wrapping_sub(self.transition_at_ms)
    }
}
