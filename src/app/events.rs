//! Outbound application events.
//!
//! The control core emits exactly one of these per observable state change
//! (zone demand state, valve position, pump maintenance flag, shared
//! boiler/pump command) through the [`EventSink`](super::ports::EventSink)
//! port. Adapters on the other side decide what to do with them — render a
//! log line, drive a display, feed telemetry.

use crate::control::valve::ValvePosition;
use crate::control::zone::{DemandState, ZoneName};

/// Structured events emitted by the control core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The system finished construction and subscribed its zone topics.
    Started { zones: usize },

    /// A zone's demand state machine transitioned.
    ZoneStateChanged {
        zone: ZoneName,
        from: DemandState,
        to: DemandState,
    },

    /// A zone accepted an external command (emitted after the confirmation
    /// echo is on the bus, before the next tick observes the new state).
    CommandAccepted {
        zone: ZoneName,
        payload: &'static str,
    },

    /// A valve's position supervision moved to a new state. Failed
    /// positions arrive through here too — they are states, not errors.
    ValvePositionChanged {
        zone: ZoneName,
        from: ValvePosition,
        to: ValvePosition,
    },

    /// The shared boiler was commanded on or off.
    BoilerCommanded(bool),

    /// The shared circulation pump was commanded on or off.
    PumpCommanded(bool),

    /// The pump maintenance-due flag was raised (`true`) or cleared.
    PumpMaintenance(bool),
}
