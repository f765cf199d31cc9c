//! GPIO adapter — bridges raw pins to the [`DigitalIoPort`] trait.
//!
//! The relay board is active-low (drive LOW to energise) and the valve
//! microswitches / thermostat contacts sit behind pull-ups (contact closed
//! reads LOW). The adapter owns both inversions, so everything above it
//! speaks logical levels: `true` = "commanded active" / "contact closed".
//!
//! ## Dual-target design
//!
//! With the `espidf` feature: drives real GPIO via the ESP-IDF sys calls.
//! On host: an in-memory pin map with setters for simulation and tests.

use crate::app::ports::DigitalIoPort;

// ───────────────────────────────────────────────────────────────
// ESP-IDF GPIO
// ───────────────────────────────────────────────────────────────

#[cfg(feature = "espidf")]
pub use esp_impl::EspGpioAdapter;

#[cfg(feature = "espidf")]
mod esp_impl {
    use super::DigitalIoPort;
    use crate::error::{Error, Result};
    use esp_idf_svc::sys::{
        gpio_config, gpio_config_t, gpio_get_level, gpio_set_level,
        gpio_mode_t_GPIO_MODE_INPUT, gpio_mode_t_GPIO_MODE_OUTPUT,
        gpio_pullup_t_GPIO_PULLUP_ENABLE, ESP_OK,
    };

    /// Real-GPIO adapter. Relay outputs are active-low; pulled-up inputs
    /// read logically true when the contact closes (electrical LOW).
    pub struct EspGpioAdapter;

    impl EspGpioAdapter {
        /// Configure the given pins. Outputs are parked in the inactive
        /// (electrically HIGH) state before the mode switch so relays
        /// never chatter at boot.
        pub fn new(output_pins: &[u8], input_pins: &[u8]) -> Result<Self> {
            for &pin in output_pins {
                // SAFETY: single-threaded init, pin numbers come from the
                // validated config.
                unsafe {
                    gpio_set_level(pin as i32, 1);
                }
                Self::configure(pin, false)?;
            }
            for &pin in input_pins {
                Self::configure(pin, true)?;
            }
            Ok(Self)
        }

        fn configure(pin: u8, input: bool) -> Result<()> {
            let cfg = gpio_config_t {
                pin_bit_mask: 1u64 << pin,
                mode: if input {
                    gpio_mode_t_GPIO_MODE_INPUT
                } else {
                    gpio_mode_t_GPIO_MODE_OUTPUT
                },
                pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
                ..Default::default()
            };
            // SAFETY: cfg is a fully initialised gpio_config_t.
            if unsafe { gpio_config(&cfg) } != ESP_OK {
                return Err(Error::Init("gpio_config failed"));
            }
            Ok(())
        }
    }

    impl DigitalIoPort for EspGpioAdapter {
        fn read(&mut self, pin: u8) -> bool {
            // Pull-up contact: LOW = closed = logical true.
            // SAFETY: plain register read on a configured input pin.
            unsafe { gpio_get_level(pin as i32) == 0 }
        }

        fn write(&mut self, pin: u8, level: bool) {
            // Active-low relay: LOW = energised.
            // SAFETY: plain register write on a configured output pin.
            unsafe {
                gpio_set_level(pin as i32, u32::from(!level));
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Host simulation
// ───────────────────────────────────────────────────────────────

/// In-memory pin map for host-side simulation. Inputs are injected with
/// [`set_input`](SimGpioAdapter::set_input); output writes are recorded
/// and readable back.
#[cfg(not(feature = "espidf"))]
#[derive(Default)]
pub struct SimGpioAdapter {
    levels: std::collections::HashMap<u8, bool>,
}

#[cfg(not(feature = "espidf"))]
impl SimGpioAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drive a simulated input pin (logical level).
    pub fn set_input(&mut self, pin: u8, level: bool) {
        self.levels.insert(pin, level);
    }

    /// Last logical level written to an output pin (false if untouched).
    pub fn output(&self, pin: u8) -> bool {
        *self.levels.get(&pin).unwrap_or(&false)
    }
}

#[cfg(not(feature = "espidf"))]
impl DigitalIoPort for SimGpioAdapter {
    fn read(&mut self, pin: u8) -> bool {
        *self.levels.get(&pin).unwrap_or(&false)
    }

    fn write(&mut self, pin: u8, level: bool) {
        self.levels.insert(pin, level);
    }
}
