//! Per-zone heat-demand state machine.
//!
//! A zone owns one motorised [`Valve`] and optionally watches a room
//! thermostat contact. Demand can come from the thermostat or from
//! external commands on the message bus; the machine reconciles commanded
//! demand against physical valve feedback every tick.
//!
//! ```text
//!            request()                 valve Open
//!   Off ────────────────▶ Requested ──────────────▶ On
//!    ▲                                               │
//!    │ valve closed                     cooldown     │ request_cooldown()
//!    ├────────────── ShutDownRequested  timer up     ▼
//!    │                        ▲    ◀───────────── CoolDownRequested
//!    │ valve closed           │ shortcut when the valve never opened
//!    └── CoolDown*Requested ──┘
//!         (WithInhibit variant parks in Inhibited instead of Off)
//! ```
//!
//! Cooldown keeps water circulating through the still-open valve after
//! heat demand ends, dissipating residual boiler heat before closure.
//! Inhibit suppresses new demand until explicitly lifted.

use core::fmt::Write as _;

use crate::app::commands::ZoneCommand;
use crate::app::events::AppEvent;
use crate::app::ports::{DigitalIoPort, EventSink, MessageBusPort};
use crate::config::ZoneConfig;

use super::debounce::DebouncedInput;
use super::valve::Valve;

/// Zone names double as MQTT routing keys; fixed capacity, no heap.
pub type ZoneName = heapless::String<24>;

/// Topic buffer: `heating/` + name + `_pub` fits comfortably.
pub type Topic = heapless::String<40>;

/// All zone topics live under this prefix.
pub const TOPIC_PREFIX: &str = "heating/";

/// Suffix of the retained confirmation topic for each zone.
pub const CONFIRM_SUFFIX: &str = "_pub";

/// Demand state of a single zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemandState {
    /// Idle, no demand. The initial state.
    Off,
    /// Idle and suppressed: new demand is refused until `uninhibit()`.
    Inhibited,
    /// Heat demanded, valve commanded open, waiting for confirmation.
    Requested,
    /// Valve commanded closed, waiting for confirmation, then `Off`.
    ShutDownRequested,
    /// Demand ended; circulating residual heat until the cooldown timer
    /// expires, then closing towards `Off`.
    CoolDownRequested,
    /// Same as cooldown, but parks in `Inhibited` when done.
    CoolDownWithInhibitRequested,
    /// Valve confirmed open; this zone counts towards boiler demand.
    On,
}

struct Thermostat {
    pin: u8,
    contact: DebouncedInput,
}

pub struct Zone {
    name: ZoneName,
    valve: Valve,
    thermostat: Option<Thermostat>,
    state: DemandState,
    cooldown_started_at: u32,
    cooldown_ms: u32,
    /// Whether the valve actually reached `Open` during the current heat
    /// cycle. Gates the cooldown shortcut: no point circulating through a
    /// valve that never opened. Cleared when the zone returns to idle.
    valve_opened: bool,
}

impl Zone {
    pub fn new(cfg: &ZoneConfig, valve_travel_ms: u32, cooldown_ms: u32) -> Self {
        Self {
            name: cfg.name.clone(),
            valve: Valve::new(cfg.valve_pin, cfg.valve_switch_pin, valve_travel_ms),
            thermostat: cfg.thermostat_pin.map(|pin| Thermostat {
                pin,
                contact: DebouncedInput::new(false),
            }),
            state: DemandState::Off,
            cooldown_started_at: 0,
            cooldown_ms,
            valve_opened: false,
        }
    }

    pub fn name(&self) -> &ZoneName {
        &self.name
    }

    pub fn state(&self) -> DemandState {
        self.state
    }

    pub fn valve(&self) -> &Valve {
        &self.valve
    }

    /// The topic this zone listens on: `heating/<name>`.
    pub fn command_topic(&self) -> Topic {
        let mut t = Topic::new();
        let _ = write!(t, "{}{}", TOPIC_PREFIX, self.name);
        t
    }

    /// The retained confirmation topic: `heating/<name>_pub`.
    pub fn confirm_topic(&self) -> Topic {
        let mut t = Topic::new();
        let _ = write!(t, "{}{}{}", TOPIC_PREFIX, self.name, CONFIRM_SUFFIX);
        t
    }

    // ── Operations ────────────────────────────────────────────

    /// Request heat. Refused while `Inhibited`; otherwise commands the
    /// valve open and moves to `Requested` (idempotent).
    pub fn request(&mut self, now_ms: u32, io: &mut impl DigitalIoPort, sink: &mut impl EventSink) {
        if self.state == DemandState::Inhibited || self.state == DemandState::Requested {
            return;
        }
        self.valve.set_on(now_ms, io);
        self.set_state(DemandState::Requested, sink);
    }

    /// Unconditionally command the valve closed and wait for confirmation.
    pub fn request_shutdown(
        &mut self,
        now_ms: u32,
        io: &mut impl DigitalIoPort,
        sink: &mut impl EventSink,
    ) {
        self.valve.set_off(now_ms, io);
        self.set_state(DemandState::ShutDownRequested, sink);
    }

    /// End heat demand through the cooldown phase. Shortcuts straight to
    /// shutdown when the valve never reached `Open` this cycle.
    pub fn request_cooldown(
        &mut self,
        now_ms: u32,
        io: &mut impl DigitalIoPort,
        sink: &mut impl EventSink,
    ) {
        if !self.valve_opened {
            self.request_shutdown(now_ms, io, sink);
            return;
        }
        self.cooldown_started_at = now_ms;
        self.set_state(DemandState::CoolDownRequested, sink);
    }

    /// Cooldown, but park in `Inhibited` once the valve has closed.
    pub fn request_cooldown_with_inhibit(
        &mut self,
        now_ms: u32,
        io: &mut impl DigitalIoPort,
        sink: &mut impl EventSink,
    ) {
        self.request_cooldown(now_ms, io, sink);
        // Overwrite whichever branch fired; the timer restarts so a stale
        // timestamp can never hold the zone out of Inhibited.
        self.cooldown_started_at = now_ms;
        self.set_state(DemandState::CoolDownWithInhibitRequested, sink);
    }

    /// Lift an inhibit. Only effective from `Inhibited`.
    pub fn uninhibit(&mut self, sink: &mut impl EventSink) {
        if self.state == DemandState::Inhibited {
            self.set_state(DemandState::Off, sink);
        }
    }

    // ── External commands ─────────────────────────────────────

    /// Apply one bus command. The confirmation echo is published *before*
    /// the state mutation so it is on the wire before the new state is
    /// externally observable.
    pub fn handle_command(
        &mut self,
        cmd: ZoneCommand,
        now_ms: u32,
        io: &mut impl DigitalIoPort,
        bus: &mut impl MessageBusPort,
        sink: &mut impl EventSink,
    ) {
        bus.publish(&self.confirm_topic(), cmd.payload(), true);
        sink.emit(&AppEvent::CommandAccepted {
            zone: self.name.clone(),
            payload: cmd.payload(),
        });
        match cmd {
            ZoneCommand::On => self.request(now_ms, io, sink),
            ZoneCommand::Off => self.request_cooldown(now_ms, io, sink),
            ZoneCommand::Inhibit => self.request_cooldown_with_inhibit(now_ms, io, sink),
            ZoneCommand::Uninhibit => self.uninhibit(sink),
        }
    }

    // ── Per-tick reconciliation ───────────────────────────────

    /// One control tick: thermostat first, then valve supervision, then
    /// timer/feedback reconciliation.
    pub fn update(&mut self, now_ms: u32, io: &mut impl DigitalIoPort, sink: &mut impl EventSink) {
        self.process_thermostat(now_ms, io, sink);

        if let Some((from, to)) = self.valve.update(now_ms, io) {
            sink.emit(&AppEvent::ValvePositionChanged {
                zone: self.name.clone(),
                from,
                to,
            });
        }

        if self.valve.is_open() {
            self.valve_opened = true;
        }

        match self.state {
            DemandState::CoolDownRequested | DemandState::CoolDownWithInhibitRequested => {
                if now_ms.wrapping_sub(self.cooldown_started_at) > self.cooldown_ms {
                    self.valve.set_off(now_ms, io);
                }
                if !self.valve.is_commanded_on() && self.valve.is_closed() {
                    let idle = if self.state == DemandState::CoolDownWithInhibitRequested {
                        DemandState::Inhibited
                    } else {
                        DemandState::Off
                    };
                    self.set_state(idle, sink);
                }
            }
            DemandState::Requested => {
                if self.valve.is_open() {
                    self.set_state(DemandState::On, sink);
                }
            }
            DemandState::ShutDownRequested => {
                if !self.valve.is_commanded_on() && self.valve.is_closed() {
                    self.set_state(DemandState::Off, sink);
                }
            }
            _ => {}
        }
    }

    fn process_thermostat(
        &mut self,
        now_ms: u32,
        io: &mut impl DigitalIoPort,
        sink: &mut impl EventSink,
    ) {
        let Some(t) = self.thermostat.as_mut() else {
            return;
        };
        let raw = io.read(t.pin);
        let demand = t.contact.update(raw);

        if demand
            && !matches!(
                self.state,
                DemandState::Requested | DemandState::On | DemandState::CoolDownWithInhibitRequested
            )
        {
            self.request(now_ms, io, sink);
        } else if !demand && self.state == DemandState::On {
            self.request_cooldown(now_ms, io, sink);
        }
    }

    // ── Derived queries ───────────────────────────────────────

    /// Whether the zone counts as "no heat demand". `Inhibited` counts as
    /// off for demand purposes (it still refuses `request()`).
    pub fn is_off(&self) -> bool {
        !matches!(self.state, DemandState::Requested | DemandState::On)
    }

    /// Only a zone whose valve has confirmed open demands the boiler.
    pub fn boiler_required(&self) -> bool {
        self.state == DemandState::On
    }

    /// Circulation is needed while the valve is *physically* open —
    /// including residual-open during cooldown and a valve stuck open.
    pub fn pump_required(&self) -> bool {
        self.valve.limit_open()
    }

    fn set_state(&mut self, to: DemandState, sink: &mut impl EventSink) {
        if to == self.state {
            return;
        }
        let from = self.state;
        self.state = to;
        if matches!(to, DemandState::Off | DemandState::Inhibited) {
            self.valve_opened = false;
        }
        sink.emit(&AppEvent::ZoneStateChanged {
            zone: self.name.clone(),
            from,
            to,
        });
    }
}
