//! Port traits — the hexagonal boundary between control logic and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ HeatingSystem (domain)
//! ```
//!
//! Driven adapters (GPIO, clock, MQTT, log sink, NVS) implement these
//! traits. The [`HeatingSystem`](super::service::HeatingSystem) and the
//! control-layer components consume them via generics, so the domain core
//! never touches hardware directly.

use crate::config::HeatingConfig;

// ───────────────────────────────────────────────────────────────
// Digital I/O port (raw pins, both directions)
// ───────────────────────────────────────────────────────────────

/// Pin-level digital I/O. `level = true` is the *logical* active level
/// ("valve commanded open", "contact closed") — electrical polarity
/// (active-low relay boards, pull-ups) is the adapter's concern.
pub trait DigitalIoPort {
    fn read(&mut self, pin: u8) -> bool;
    fn write(&mut self, pin: u8, level: bool);
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic milliseconds since boot, truncated to `u32`.
///
/// The counter wraps roughly every 49.7 days; all consumers compute
/// elapsed time with `wrapping_sub` against a stored reset point and never
/// compare absolute values.
pub trait ClockPort {
    fn now_ms(&self) -> u32;
}

// ───────────────────────────────────────────────────────────────
// Message bus port (MQTT-style)
// ───────────────────────────────────────────────────────────────

/// Outbound half of the command/confirmation bus.
///
/// Inbound delivery is not a trait method: the transport adapter hands
/// `(topic, payload)` pairs to the main loop, which forwards them to
/// [`HeatingSystem::handle_message`](super::service::HeatingSystem::handle_message)
/// strictly between control ticks. Delivery failures are the adapter's to
/// log and swallow — the control core never blocks on the bus.
pub trait MessageBusPort {
    fn subscribe(&mut self, topic: &str);
    fn publish(&mut self, topic: &str, payload: &str, retained: bool);
}

// ───────────────────────────────────────────────────────────────
// State reporter port (domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits one structured [`AppEvent`](super::events::AppEvent)
/// per zone/valve/pump/boiler state change through this port. Adapters
/// decide how it is rendered or stored (serial log, display, telemetry).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists the heating configuration.
///
/// Implementations MUST validate before persisting — a bad interlock delay
/// or valve travel time is rejected with [`ConfigError::ValidationFailed`],
/// not silently clamped.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    /// Returns [`HeatingConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<HeatingConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &HeatingConfig) -> Result<(), ConfigError>;
}

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// No config found in storage (first boot).
    NotFound,
    /// Stored config failed integrity / deserialization check.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
