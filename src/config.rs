//! System configuration parameters.
//!
//! All tunable timing constants and the static zone table. Values can be
//! overridden via NVS; the defaults mirror the installed plant (motorised
//! valves that travel in ~10 s, a 30-minute cooldown circulation).

use serde::{Deserialize, Serialize};

use crate::control::zone::ZoneName;

/// Per-zone wiring: one valve relay, its limit microswitch, and an optional
/// room thermostat contact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneConfig {
    /// Unique zone name — doubles as the MQTT routing key
    /// (`heating/<name>`). Matched exactly, case-sensitive.
    pub name: ZoneName,
    /// Digital output driving the valve relay.
    pub valve_pin: u8,
    /// Digital input from the valve's open-position microswitch.
    pub valve_switch_pin: u8,
    /// Digital input from the room thermostat, if the zone has one.
    pub thermostat_pin: Option<u8>,
}

/// Core heating configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatingConfig {
    // --- Valve supervision ---
    /// Worst-case valve travel time (ms). A valve that has not confirmed
    /// its commanded position after this long is flagged stuck.
    /// Generous: the installed valves typically travel in ~10 s.
    pub valve_travel_ms: u32,

    // --- Pump maintenance ---
    /// Continuous on-time (ms) that counts as a completed maintenance run.
    pub pump_activation_ms: u32,
    /// Idle time (ms) after which a maintenance run is due, to keep the
    /// pump from seizing during the summer months.
    pub pump_maintenance_ms: u32,

    // --- Zone cooldown ---
    /// After heat demand ends, keep circulating this long (seconds) to
    /// dissipate residual boiler heat before the valve may close.
    pub cooldown_secs: u32,

    // --- Safety interlock ---
    /// The boiler may only fire once the pump has been continuously
    /// commanded on this long (ms).
    pub boiler_interlock_ms: u32,

    // --- Shared actuators ---
    /// Digital output driving the boiler demand relay.
    pub boiler_pin: u8,
    /// Digital output driving the circulation pump relay.
    pub pump_pin: u8,

    // --- Timing ---
    /// Control loop tick period (ms).
    pub control_loop_interval_ms: u32,

    // --- Zones ---
    /// Configuration order is update order; names must be unique.
    pub zones: Vec<ZoneConfig>,
}

fn zone(name: &str, valve_pin: u8, valve_switch_pin: u8, thermostat_pin: Option<u8>) -> ZoneConfig {
    ZoneConfig {
        name: ZoneName::try_from(name).unwrap_or_default(),
        valve_pin,
        valve_switch_pin,
        thermostat_pin,
    }
}

impl Default for HeatingConfig {
    fn default() -> Self {
        use crate::pins;
        Self {
            valve_travel_ms: 30_000,
            pump_activation_ms: 5_000,
            pump_maintenance_ms: 1_300_000,
            cooldown_secs: 1_800,
            boiler_interlock_ms: 10_000,
            boiler_pin: pins::BOILER_GPIO,
            pump_pin: pins::PUMP_GPIO,
            control_loop_interval_ms: 50,
            zones: vec![
                zone(
                    "living",
                    pins::VALVE_LIVING_GPIO,
                    pins::VALVE_SWITCH_LIVING_GPIO,
                    Some(pins::THERMOSTAT_LIVING_GPIO),
                ),
                zone(
                    "study",
                    pins::VALVE_STUDY_GPIO,
                    pins::VALVE_SWITCH_STUDY_GPIO,
                    None,
                ),
                zone(
                    "bathroom",
                    pins::VALVE_BATHROOM_GPIO,
                    pins::VALVE_SWITCH_BATHROOM_GPIO,
                    Some(pins::THERMOSTAT_BATHROOM_GPIO),
                ),
            ],
        }
    }
}

impl HeatingConfig {
    /// Range-check every field. Used by `ConfigPort::save` implementations
    /// before anything is persisted.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.valve_travel_ms == 0 {
            return Err("valve_travel_ms must be non-zero");
        }
        if self.boiler_interlock_ms == 0 {
            return Err("boiler_interlock_ms must be non-zero");
        }
        if self.control_loop_interval_ms == 0 {
            return Err("control_loop_interval_ms must be non-zero");
        }
        if self.pump_maintenance_ms <= self.pump_activation_ms {
            return Err("pump_maintenance_ms must exceed pump_activation_ms");
        }
        if self.zones.is_empty() {
            return Err("at least one zone is required");
        }
        for (i, z) in self.zones.iter().enumerate() {
            if z.name.is_empty() {
                return Err("zone name must be non-empty");
            }
            if self.zones[..i].iter().any(|other| other.name == z.name) {
                return Err("zone names must be unique");
            }
        }
        Ok(())
    }

    /// Cooldown duration in milliseconds (the state machines compare ms).
    pub fn cooldown_ms(&self) -> u32 {
        self.cooldown_secs.saturating_mul(1_000)
    }
}
