//! GPIO pin assignments for the heating controller board.
//!
//! Single source of truth — the default [`HeatingConfig`](crate::config)
//! zone table references this module rather than hard-coding pin numbers.
//! Change a pin here and it propagates everywhere.
//!
//! All relay outputs drive an active-low relay board; the hardware adapter
//! inverts polarity, so everything above it speaks logical levels.

// ---------------------------------------------------------------------------
// Shared actuators
// ---------------------------------------------------------------------------

/// Boiler demand relay.
pub const BOILER_GPIO: u8 = 12;
/// Circulation pump relay.
pub const PUMP_GPIO: u8 = 13;

// ---------------------------------------------------------------------------
// Zone valves (relay output + open-position microswitch input)
// ---------------------------------------------------------------------------

pub const VALVE_LIVING_GPIO: u8 = 25;
pub const VALVE_SWITCH_LIVING_GPIO: u8 = 26;

pub const VALVE_STUDY_GPIO: u8 = 27;
pub const VALVE_SWITCH_STUDY_GPIO: u8 = 14;

pub const VALVE_BATHROOM_GPIO: u8 = 32;
pub const VALVE_SWITCH_BATHROOM_GPIO: u8 = 33;

// ---------------------------------------------------------------------------
// Thermostat contacts (pull-up inputs; contact closed = demand heat)
// ---------------------------------------------------------------------------

pub const THERMOSTAT_LIVING_GPIO: u8 = 34;
pub const THERMOSTAT_BATHROOM_GPIO: u8 = 35;
