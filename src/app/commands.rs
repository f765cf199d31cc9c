//! Inbound zone commands.
//!
//! Commands arrive as MQTT payloads on `heating/<zoneName>` and are matched
//! by exact, case-sensitive string comparison. Anything else is a silent
//! no-op — unrecognised payloads are dropped without a report.

/// Actions the outside world can request of a single zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneCommand {
    /// `"on"` — request heat.
    On,
    /// `"off"` — end heat demand, circulating through the cooldown phase.
    Off,
    /// `"inhibit"` — cool down, then hold the zone suppressed.
    Inhibit,
    /// `"uninhibit"` — lift a previous inhibit.
    Uninhibit,
}

impl ZoneCommand {
    /// Parse a raw payload. Exact match only; `None` means "ignore".
    pub fn parse(payload: &str) -> Option<Self> {
        match payload {
            "on" => Some(Self::On),
            "off" => Some(Self::Off),
            "inhibit" => Some(Self::Inhibit),
            "uninhibit" => Some(Self::Uninhibit),
            _ => None,
        }
    }

    /// The wire payload for this command (used for the confirmation echo).
    pub fn payload(self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
            Self::Inhibit => "inhibit",
            Self::Uninhibit => "uninhibit",
        }
    }
}
