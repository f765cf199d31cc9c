//! Monotonic time adapter.
//!
//! Provides the [`ClockPort`] millisecond counter that every elapsed-time
//! comparison in the control core keys on.
//!
//! - **`espidf` feature** — wraps `esp_timer_get_time()` from the ESP-IDF
//!   high-resolution timer (microsecond precision, monotonic).
//! - **host** — uses `std::time::Instant` for testing and simulation.
//!
//! The `u32` millisecond counter wraps every ~49.7 days; consumers use
//! elapsed-since-reset arithmetic (`wrapping_sub`), so wrap is harmless.

use crate::app::ports::ClockPort;

pub struct MonotonicClock {
    #[cfg(not(feature = "espidf"))]
    start: std::time::Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(feature = "espidf"))]
            start: std::time::Instant::now(),
        }
    }
}

impl ClockPort for MonotonicClock {
    #[cfg(feature = "espidf")]
    fn now_ms(&self) -> u32 {
        // SAFETY: esp_timer_get_time is a plain monotonic counter read.
        ((unsafe { esp_idf_svc::sys::esp_timer_get_time() }) / 1_000) as u32
    }

    #[cfg(not(feature = "espidf"))]
    fn now_ms(&self) -> u32 {
        self.start.elapsed().as_millis() as u32
    }
}
