//! Log-based state reporter adapter.
//!
//! Implements [`EventSink`] by writing one human-readable line per state
//! change to the logger (UART / USB-CDC in production). A display or
//! telemetry adapter would implement the same trait.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::control::valve::ValvePosition;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { zones } => {
                info!("START | {zones} zone(s)");
            }
            AppEvent::ZoneStateChanged { zone, from, to } => {
                info!("ZONE  | {zone}: {from:?} -> {to:?}");
            }
            AppEvent::CommandAccepted { zone, payload } => {
                info!("CMD   | {zone}: {payload:?}");
            }
            AppEvent::ValvePositionChanged { zone, from, to } => {
                // Stuck valves get a louder line; they clear themselves
                // only when the microswitch finally agrees.
                if matches!(to, ValvePosition::FailedOpen | ValvePosition::FailedClosed) {
                    warn!("VALVE | {zone}: {from:?} -> {to:?} (mechanism stuck)");
                } else {
                    info!("VALVE | {zone}: {from:?} -> {to:?}");
                }
            }
            AppEvent::BoilerCommanded(on) => {
                info!("BOILER| {}", if *on { "on" } else { "off" });
            }
            AppEvent::PumpCommanded(on) => {
                info!("PUMP  | {}", if *on { "on" } else { "off" });
            }
            AppEvent::PumpMaintenance(due) => {
                if *due {
                    warn!("PUMP  | maintenance run due");
                } else {
                    info!("PUMP  | maintenance cleared");
                }
            }
        }
    }
}
