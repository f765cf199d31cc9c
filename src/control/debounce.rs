//! Agreement-counting debounce filter for noisy digital contacts.
//!
//! Valve limit microswitches and mechanical thermostat contacts bounce for
//! several control ticks around every transition. The filter only accepts a
//! new level once the raw signal has disagreed with the latched level for
//! more than [`DEBOUNCE_THRESHOLD`] consecutive samples, which rejects
//! contact chatter without adding a fixed delay beyond ~6 tick periods.
//!
//! Purely advisory state — there is no failure mode and nothing to report.

/// Consecutive disagreeing samples tolerated before the latch flips.
/// The flip happens on the sample that pushes the counter past this value,
/// i.e. the 6th consecutive disagreeing read.
pub const DEBOUNCE_THRESHOLD: u8 = 5;

/// A latched boolean fed one raw sample per control tick.
#[derive(Debug, Clone)]
pub struct DebouncedInput {
    state: bool,
    agree_counter: u8,
}

impl DebouncedInput {
    /// Start with the given latched level (what the contact is assumed to
    /// read at power-on, before any samples arrive).
    pub fn new(initial: bool) -> Self {
        Self {
            state: initial,
            agree_counter: 0,
        }
    }

    /// Feed one raw sample and return the (possibly updated) latched state.
    pub fn update(&mut self, raw: bool) -> bool {
        if raw == self.state {
            self.agree_counter = 0;
        } else {
            self.agree_counter += 1;
            if self.agree_counter > DEBOUNCE_THRESHOLD {
                self.state = raw;
                self.agree_counter = 0;
            }
        }
        self.state
    }

    /// The latched state, without feeding a sample.
    pub fn state(&self) -> bool {
        self.state
    }
}
