//! Motorised zone valve with travel supervision.
//!
//! The valve relay is a plain [`Actuator`]; an open-position microswitch
//! (debounced — these contacts chatter while the gear train settles) tells
//! us where the mechanism actually is. `update()` derives the position
//! state every tick as a pure function of
//! `{commanded state, sensed position, elapsed since commanded transition}`.
//!
//! A valve that has not confirmed its commanded direction within the travel
//! budget is flagged stuck (`FailedClosed` when it should have opened,
//! `FailedOpen` when it should have closed). The flag persists tick after
//! tick and clears itself the moment the microswitch finally agrees —
//! there is no timeout-triggered re-command, ever. Commanding the opposite
//! direction mid-travel is accepted; the machine settles once the
//! mechanism physically responds.

use crate::app::ports::DigitalIoPort;

use super::actuator::Actuator;
use super::debounce::DebouncedInput;

/// Physical position state derived by [`Valve::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValvePosition {
    /// Commanded open, microswitch confirms open.
    Open,
    /// Commanded closed, microswitch confirms closed.
    Closed,
    /// Commanded open, still travelling (within the travel budget).
    Opening,
    /// Commanded closed, still travelling.
    Closing,
    /// Commanded closed, but the mechanism is stuck open.
    FailedOpen,
    /// Commanded open, but the mechanism is stuck closed.
    FailedClosed,
}

pub struct Valve {
    output: Actuator,
    limit_switch: DebouncedInput,
    switch_pin: u8,
    travel_ms: u32,
    position: ValvePosition,
}

impl Valve {
    pub fn new(valve_pin: u8, switch_pin: u8, travel_ms: u32) -> Self {
        Self {
            output: Actuator::new("valve", valve_pin),
            // Assume closed at power-on; the first ticks correct this.
            limit_switch: DebouncedInput::new(false),
            switch_pin,
            travel_ms,
            position: ValvePosition::Closed,
        }
    }

    /// Command the valve to open. Returns `true` on an actual transition.
    pub fn set_on(&mut self, now_ms: u32, io: &mut impl DigitalIoPort) -> bool {
        self.output.set_on(now_ms, io)
    }

    /// Command the valve to close. Returns `true` on an actual transition.
    pub fn set_off(&mut self, now_ms: u32, io: &mut impl DigitalIoPort) -> bool {
        self.output.set_off(now_ms, io)
    }

    /// Sample the limit switch and re-derive the position state.
    /// Must run once per control tick. Returns the transition, if any.
    pub fn update(
        &mut self,
        now_ms: u32,
        io: &mut impl DigitalIoPort,
    ) -> Option<(ValvePosition, ValvePosition)> {
        let raw = io.read(self.switch_pin);
        let sensed_open = self.limit_switch.update(raw);
        let elapsed = self.output.since_transition(now_ms);

        let next = if self.output.is_on() {
            if sensed_open {
                ValvePosition::Open
            } else if elapsed >= self.travel_ms {
                ValvePosition::FailedClosed
            } else {
                ValvePosition::Opening
            }
        } else if !sensed_open {
            ValvePosition::Closed
        } else if elapsed >= self.travel_ms {
            ValvePosition::FailedOpen
        } else {
            ValvePosition::Closing
        };

        if next == self.position {
            return None;
        }
        let from = self.position;
        self.position = next;
        Some((from, next))
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn position(&self) -> ValvePosition {
        self.position
    }

    /// Commanded open and physically confirmed open.
    pub fn is_open(&self) -> bool {
        self.position == ValvePosition::Open
    }

    /// Commanded closed and physically confirmed closed.
    pub fn is_closed(&self) -> bool {
        self.position == ValvePosition::Closed
    }

    pub fn failed_open(&self) -> bool {
        self.position == ValvePosition::FailedOpen
    }

    pub fn failed_closed(&self) -> bool {
        self.position == ValvePosition::FailedClosed
    }

    /// Still travelling towards open.
    pub fn is_opening(&self) -> bool {
        self.position == ValvePosition::Opening
    }

    /// Debounced physical position, regardless of command. This is what
    /// pump demand keys on — a valve left open during cooldown still needs
    /// circulation.
    pub fn limit_open(&self) -> bool {
        self.limit_switch.state()
    }

    /// Commanded (relay) state.
    pub fn is_commanded_on(&self) -> bool {
        self.output.is_on()
    }
}
