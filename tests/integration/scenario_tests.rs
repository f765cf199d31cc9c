//! End-to-end scenarios against a small plant model.
//!
//! The plant mirrors each valve's microswitch from its relay output after
//! a synthetic travel delay, so whole heat cycles play out exactly as they
//! would against real pipework.

use crate::mock_hw::{EventLog, MockBus, MockIo};

use hydrozone::app::events::AppEvent;
use hydrozone::app::service::HeatingSystem;
use hydrozone::config::{HeatingConfig, ZoneConfig};
use hydrozone::control::zone::{DemandState, ZoneName};

const TICK_MS: u32 = 50;

/// Synthetic valve travel used by the plant model.
const PLANT_TRAVEL_MS: u32 = 1_500;

struct PlantValve {
    valve_pin: u8,
    switch_pin: u8,
    last_level: bool,
    changed_at: u32,
    /// A seized mechanism: the microswitch never follows the relay.
    stuck: bool,
}

struct Plant {
    valves: Vec<PlantValve>,
}

impl Plant {
    fn new(config: &HeatingConfig) -> Self {
        Self {
            valves: config
                .zones
                .iter()
                .map(|z| PlantValve {
                    valve_pin: z.valve_pin,
                    switch_pin: z.valve_switch_pin,
                    last_level: false,
                    changed_at: 0,
                    stuck: false,
                })
                .collect(),
        }
    }

    fn stick(&mut self, index: usize) {
        self.valves[index].stuck = true;
    }

    fn unstick(&mut self, index: usize) {
        self.valves[index].stuck = false;
    }

    fn step(&mut self, now_ms: u32, io: &mut MockIo) {
        for v in &mut self.valves {
            let level = io.get(v.valve_pin);
            if level != v.last_level {
                v.last_level = level;
                v.changed_at = now_ms;
            }
            if !v.stuck && now_ms.wrapping_sub(v.changed_at) >= PLANT_TRAVEL_MS {
                io.set(v.switch_pin, level);
            }
        }
    }
}

fn one_zone_config() -> HeatingConfig {
    let mut config = HeatingConfig::default();
    config.cooldown_secs = 3;
    config.zones = vec![ZoneConfig {
        name: ZoneName::try_from("living").unwrap(),
        valve_pin: 25,
        valve_switch_pin: 26,
        thermostat_pin: None,
    }];
    config
}

struct Rig {
    system: HeatingSystem,
    plant: Plant,
    io: MockIo,
    bus: MockBus,
    sink: EventLog,
    now_ms: u32,
}

impl Rig {
    fn new(config: &HeatingConfig) -> Self {
        let mut system = HeatingSystem::new(config);
        let mut bus = MockBus::new();
        let mut sink = EventLog::new();
        system.subscribe_zones(&mut bus, &mut sink);
        Self {
            system,
            plant: Plant::new(config),
            io: MockIo::new(),
            bus,
            sink,
            now_ms: 0,
        }
    }

    fn send(&mut self, topic: &str, payload: &str) {
        self.system.handle_message(
            topic,
            payload,
            self.now_ms,
            &mut self.io,
            &mut self.bus,
            &mut self.sink,
        );
    }

    fn run_until(&mut self, t_ms: u32) {
        while self.now_ms < t_ms {
            self.plant.step(self.now_ms, &mut self.io);
            self.system
                .tick(self.now_ms, &mut self.io, &mut self.bus, &mut self.sink);
            self.now_ms += TICK_MS;
        }
    }

    fn state(&self, name: &str) -> DemandState {
        self.system.zone(name).unwrap().state()
    }
}

#[test]
fn full_heat_cycle_over_the_bus() {
    let config = one_zone_config();
    let mut rig = Rig::new(&config);

    // "on": valve opens, pump follows, boiler after the interlock.
    rig.run_until(1_000);
    rig.send("heating/living", "on");
    assert_eq!(rig.bus.last_retained("heating/living_pub"), Some("on"));
    assert_eq!(rig.state("living"), DemandState::Requested);

    rig.run_until(4_000);
    assert_eq!(rig.state("living"), DemandState::On);
    assert!(rig.system.pump_on());
    assert!(!rig.system.boiler_on(), "interlock still running");

    rig.run_until(16_000);
    assert!(rig.system.boiler_on());

    // "off": boiler drops at once, pump rides out the cooldown, then the
    // valve closes and everything goes quiet.
    rig.send("heating/living", "off");
    assert_eq!(rig.bus.last_retained("heating/living_pub"), Some("off"));
    rig.run_until(16_100);
    assert!(!rig.system.boiler_on());
    assert!(rig.system.pump_on());
    assert_eq!(rig.state("living"), DemandState::CoolDownRequested);

    rig.run_until(30_000);
    assert_eq!(rig.state("living"), DemandState::Off);
    assert!(!rig.system.pump_on());
    assert_eq!(rig.bus.last_retained("heating/boiler_pub"), Some("off"));
    assert_eq!(rig.bus.last_retained("heating/pump_pub"), Some("off"));

    // Ordering: echo before the state change; pump up before boiler up;
    // boiler down before pump down.
    let echo = rig
        .sink
        .position(|e| matches!(e, AppEvent::CommandAccepted { payload: "on", .. }))
        .unwrap();
    let requested = rig
        .sink
        .position(|e| {
            matches!(
                e,
                AppEvent::ZoneStateChanged {
                    to: DemandState::Requested,
                    ..
                }
            )
        })
        .unwrap();
    assert!(echo < requested);

    let pump_up = rig
        .sink
        .position(|e| matches!(e, AppEvent::PumpCommanded(true)))
        .unwrap();
    let boiler_up = rig
        .sink
        .position(|e| matches!(e, AppEvent::BoilerCommanded(true)))
        .unwrap();
    let boiler_down = rig
        .sink
        .position(|e| matches!(e, AppEvent::BoilerCommanded(false)))
        .unwrap();
    let pump_down = rig
        .sink
        .position(|e| matches!(e, AppEvent::PumpCommanded(false)))
        .unwrap();
    assert!(pump_up < boiler_up);
    assert!(boiler_up < boiler_down);
    assert!(boiler_down < pump_down);
}

#[test]
fn thermostat_runs_a_cycle_without_any_bus_traffic() {
    let mut config = one_zone_config();
    config.zones[0].thermostat_pin = Some(34);
    let mut rig = Rig::new(&config);

    // Contact closes: the zone heats itself.
    rig.io.set(34, true);
    rig.run_until(20_000);
    assert_eq!(rig.state("living"), DemandState::On);
    assert!(rig.system.boiler_on());

    // No command traffic, only the shared-actuator announcements.
    assert!(rig.bus.payloads_for("heating/living_pub").is_empty());
    assert_eq!(rig.bus.last_retained("heating/boiler_pub"), Some("on"));

    // Contact opens: cooldown, then quiet.
    rig.io.set(34, false);
    rig.run_until(45_000);
    assert_eq!(rig.state("living"), DemandState::Off);
    assert!(!rig.system.boiler_on());
    assert!(!rig.system.pump_on());
}

#[test]
fn inhibited_zone_ignores_thermostat_demand() {
    let mut config = one_zone_config();
    config.zones[0].thermostat_pin = Some(34);
    let mut rig = Rig::new(&config);

    rig.send("heating/living", "inhibit");
    rig.run_until(2_000);
    assert_eq!(rig.state("living"), DemandState::Inhibited);

    rig.io.set(34, true);
    rig.run_until(10_000);
    assert_eq!(rig.state("living"), DemandState::Inhibited);
    assert!(!rig.system.pump_on());
    assert!(!rig.system.boiler_on());

    // Until the inhibit is lifted.
    rig.send("heating/living", "uninhibit");
    rig.run_until(25_000);
    assert_eq!(rig.state("living"), DemandState::On);
    assert!(rig.system.boiler_on());
}

#[test]
fn seized_valve_blocks_heat_until_it_frees_up() {
    let config = one_zone_config();
    let mut rig = Rig::new(&config);
    rig.plant.stick(0);

    rig.send("heating/living", "on");
    // Travel budget expires with no confirmation: flagged, no heat.
    rig.run_until(config.valve_travel_ms + 5_000);
    assert!(rig.system.zone("living").unwrap().valve().failed_closed());
    assert_eq!(rig.state("living"), DemandState::Requested);
    assert!(!rig.system.pump_on());
    assert!(!rig.system.boiler_on());
    assert!(rig.sink.contains(|e| {
        matches!(
            e,
            AppEvent::ValvePositionChanged {
                to: hydrozone::control::valve::ValvePosition::FailedClosed,
                ..
            }
        )
    }));

    // Mechanism frees up: recovery is sensor-driven, no re-command needed.
    rig.plant.unstick(0);
    let freed_at = rig.now_ms;
    rig.run_until(freed_at + 15_000);
    assert_eq!(rig.state("living"), DemandState::On);
    assert!(rig.system.pump_on());
    assert!(rig.system.boiler_on());
}
