//! Heating system service — the hexagonal core.
//!
//! [`HeatingSystem`] owns the shared boiler relay and circulation pump,
//! aggregates all zones, and arbitrates the shared actuators with the
//! pump-before-boiler interlock. It exposes a clean, hardware-agnostic
//! API; all I/O flows through port traits injected at call sites, making
//! the entire service testable with mock adapters.
//!
//! ```text
//!  DigitalIoPort ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                    │      HeatingSystem        │
//!  MessageBusPort ◀──│  Zones · Valves · Pump    │
//!                    └──────────────────────────┘
//! ```
//!
//! Single-threaded and tick-driven: `tick()` must run at a steady cadence;
//! inbound bus messages are applied through [`handle_message`] strictly
//! between ticks, so a command fully applies (state mutated, confirmation
//! echoed) before the next tick observes it.
//!
//! [`handle_message`]: HeatingSystem::handle_message

use core::fmt::Write as _;

use log::{debug, info, warn};

use crate::config::HeatingConfig;
use crate::control::pump::{Pump, PumpNotice};
use crate::control::zone::{Zone, TOPIC_PREFIX};
use crate::control::actuator::Actuator;

use super::commands::ZoneCommand;
use super::events::AppEvent;
use super::ports::{DigitalIoPort, EventSink, MessageBusPort};

/// Retained announcement topics for the shared actuators.
pub const BOILER_TOPIC: &str = "heating/boiler_pub";
pub const PUMP_TOPIC: &str = "heating/pump_pub";

pub struct HeatingSystem {
    boiler: Actuator,
    pump: Pump,
    zones: Vec<Zone>,
    /// Interlock reference: when the pump was last commanded on by the
    /// arbitration below. Only meaningful while the pump is on.
    pump_started_at: u32,
    interlock_ms: u32,
}

impl HeatingSystem {
    /// Build the system from static configuration. Zones keep their
    /// configuration order for update and routing.
    pub fn new(config: &HeatingConfig) -> Self {
        let zones = config
            .zones
            .iter()
            .map(|z| Zone::new(z, config.valve_travel_ms, config.cooldown_ms()))
            .collect();
        Self {
            boiler: Actuator::new("boiler", config.boiler_pin),
            pump: Pump::new(
                config.pump_pin,
                config.pump_activation_ms,
                config.pump_maintenance_ms,
            ),
            zones,
            pump_started_at: 0,
            interlock_ms: config.boiler_interlock_ms,
        }
    }

    /// Subscribe every zone's command topic. Call once at startup, after
    /// the bus connection is up.
    pub fn subscribe_zones(&self, bus: &mut impl MessageBusPort, sink: &mut impl EventSink) {
        for zone in &self.zones {
            bus.subscribe(&zone.command_topic());
        }
        sink.emit(&AppEvent::Started {
            zones: self.zones.len(),
        });
        info!("heating system up, {} zone(s) subscribed", self.zones.len());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// One full control cycle: update every zone, then arbitrate the
    /// shared boiler and pump.
    pub fn tick(
        &mut self,
        now_ms: u32,
        io: &mut impl DigitalIoPort,
        bus: &mut impl MessageBusPort,
        sink: &mut impl EventSink,
    ) {
        for zone in &mut self.zones {
            zone.update(now_ms, io, sink);
        }

        if let Some(notice) = self.pump.update(now_ms) {
            let due = matches!(notice, PumpNotice::MaintenanceNeeded);
            if due {
                warn!("pump idle too long, maintenance run due");
            } else {
                info!("pump maintenance cleared");
            }
            sink.emit(&AppEvent::PumpMaintenance(due));
        }

        let boiler_required = self.zones.iter().any(Zone::boiler_required);
        let pump_required = self.zones.iter().any(Zone::pump_required);

        if self.boiler.is_on() && !boiler_required {
            self.command_boiler(false, now_ms, io, bus, sink);
        }

        if !pump_required {
            if self.pump.is_on() {
                self.command_pump(false, now_ms, io, bus, sink);
            }
        } else if boiler_required
            && self.pump.is_on()
            && now_ms.wrapping_sub(self.pump_started_at) >= self.interlock_ms
            && self.boiler.is_off()
        {
            self.command_boiler(true, now_ms, io, bus, sink);
        } else if self.pump.is_off() {
            self.pump_started_at = now_ms;
            self.command_pump(true, now_ms, io, bus, sink);
        }
    }

    // ── Message routing ───────────────────────────────────────

    /// Dispatch an inbound bus message. The topic must match a zone's
    /// command topic exactly — no prefix matching across zones.
    /// Unrecognised topics and payloads are dropped silently.
    pub fn handle_message(
        &mut self,
        topic: &str,
        payload: &str,
        now_ms: u32,
        io: &mut impl DigitalIoPort,
        bus: &mut impl MessageBusPort,
        sink: &mut impl EventSink,
    ) {
        let Some(name) = topic.strip_prefix(TOPIC_PREFIX) else {
            debug!("ignoring message on foreign topic {topic}");
            return;
        };
        let Some(zone) = self.zones.iter_mut().find(|z| z.name().as_str() == name) else {
            debug!("no zone for topic {topic}");
            return;
        };
        match ZoneCommand::parse(payload) {
            Some(cmd) => {
                info!("zone {name}: command {payload:?}");
                zone.handle_command(cmd, now_ms, io, bus, sink);
            }
            None => debug!("zone {name}: unrecognised payload {payload:?}"),
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn zone(&self, name: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.name().as_str() == name)
    }

    pub fn boiler_on(&self) -> bool {
        self.boiler.is_on()
    }

    pub fn pump_on(&self) -> bool {
        self.pump.is_on()
    }

    pub fn pump_maintenance_due(&self) -> bool {
        self.pump.maintenance_due()
    }

    /// One human-readable line per zone, for the periodic status log.
    pub fn status_summary(&self) -> String {
        let mut out = String::new();
        for zone in &self.zones {
            let _ = writeln!(
                out,
                "{}: {:?}; valve {:?}",
                zone.name(),
                zone.state(),
                zone.valve().position()
            );
        }
        let _ = write!(
            out,
            "boiler {}; pump {}",
            if self.boiler.is_on() { "on" } else { "off" },
            if self.pump.is_on() { "on" } else { "off" },
        );
        out
    }

    // ── Internal ──────────────────────────────────────────────

    fn command_boiler(
        &mut self,
        on: bool,
        now_ms: u32,
        io: &mut impl DigitalIoPort,
        bus: &mut impl MessageBusPort,
        sink: &mut impl EventSink,
    ) {
        let changed = if on {
            self.boiler.set_on(now_ms, io)
        } else {
            self.boiler.set_off(now_ms, io)
        };
        if changed {
            info!("boiler {}", if on { "on" } else { "off" });
            bus.publish(BOILER_TOPIC, if on { "on" } else { "off" }, true);
            sink.emit(&AppEvent::BoilerCommanded(on));
        }
    }

    fn command_pump(
        &mut self,
        on: bool,
        now_ms: u32,
        io: &mut impl DigitalIoPort,
        bus: &mut impl MessageBusPort,
        sink: &mut impl EventSink,
    ) {
        let changed = if on {
            self.pump.set_on(now_ms, io)
        } else {
            self.pump.set_off(now_ms, io)
        };
        if changed {
            info!("pump {}", if on { "on" } else { "off" });
            bus.publish(PUMP_TOPIC, if on { "on" } else { "off" }, true);
            sink.emit(&AppEvent::PumpCommanded(on));
        }
    }
}
