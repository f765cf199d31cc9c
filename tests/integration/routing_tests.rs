//! Message routing: bus topics in, confirmation echoes out.
//!
//! Verifies exact-match topic dispatch, the retained confirmation echo,
//! and that foreign or malformed traffic is dropped without side effects.

use crate::mock_hw::{EventLog, MockBus, MockIo};

use hydrozone::app::service::HeatingSystem;
use hydrozone::config::HeatingConfig;
use hydrozone::control::zone::DemandState;

fn make() -> (HeatingSystem, MockIo, MockBus, EventLog) {
    let config = HeatingConfig::default();
    let mut system = HeatingSystem::new(&config);
    let mut bus = MockBus::new();
    let mut sink = EventLog::new();
    system.subscribe_zones(&mut bus, &mut sink);
    (system, MockIo::new(), bus, sink)
}

#[test]
fn startup_subscribes_every_zone_topic() {
    let (_, _, bus, sink) = make();
    assert_eq!(
        bus.subscribed,
        vec!["heating/living", "heating/study", "heating/bathroom"]
    );
    assert!(sink.contains(
        |e| matches!(e, hydrozone::app::events::AppEvent::Started { zones: 3 })
    ));
}

#[test]
fn command_reaches_exactly_the_named_zone() {
    let (mut system, mut io, mut bus, mut sink) = make();
    system.handle_message("heating/study", "on", 0, &mut io, &mut bus, &mut sink);

    assert_eq!(system.zone("study").unwrap().state(), DemandState::Requested);
    assert_eq!(system.zone("living").unwrap().state(), DemandState::Off);
    assert_eq!(system.zone("bathroom").unwrap().state(), DemandState::Off);
}

#[test]
fn accepted_command_is_echoed_retained() {
    let (mut system, mut io, mut bus, mut sink) = make();
    system.handle_message("heating/study", "on", 0, &mut io, &mut bus, &mut sink);
    assert_eq!(bus.last_retained("heating/study_pub"), Some("on"));

    system.handle_message("heating/study", "off", 100, &mut io, &mut bus, &mut sink);
    assert_eq!(bus.last_retained("heating/study_pub"), Some("off"));
}

#[test]
fn foreign_and_near_miss_topics_are_dropped() {
    let (mut system, mut io, mut bus, mut sink) = make();
    let before = bus.published.len();

    for topic in ["other/study", "heating/stud", "heating/study2", "heating/"] {
        system.handle_message(topic, "on", 0, &mut io, &mut bus, &mut sink);
    }

    assert_eq!(bus.published.len(), before, "no echo for dropped traffic");
    for zone in system.zones() {
        assert_eq!(zone.state(), DemandState::Off);
    }
}

#[test]
fn payload_matching_is_exact_and_case_sensitive() {
    let (mut system, mut io, mut bus, mut sink) = make();
    let before = bus.published.len();

    for payload in ["ON", "On", " on", "on ", "", "boost"] {
        system.handle_message("heating/study", payload, 0, &mut io, &mut bus, &mut sink);
    }

    assert_eq!(bus.published.len(), before);
    assert_eq!(system.zone("study").unwrap().state(), DemandState::Off);
}

#[test]
fn inhibit_and_uninhibit_round_trip_over_the_bus() {
    let (mut system, mut io, mut bus, mut sink) = make();

    system.handle_message("heating/living", "inhibit", 0, &mut io, &mut bus, &mut sink);
    // Valve never opened, so the shortcut closes straight towards idle.
    for t in (0..1_000).step_by(50) {
        system.tick(t, &mut io, &mut bus, &mut sink);
    }
    assert_eq!(system.zone("living").unwrap().state(), DemandState::Inhibited);

    // Demand while inhibited is echoed but refused.
    system.handle_message("heating/living", "on", 2_000, &mut io, &mut bus, &mut sink);
    assert_eq!(bus.last_retained("heating/living_pub"), Some("on"));
    assert_eq!(system.zone("living").unwrap().state(), DemandState::Inhibited);

    system.handle_message("heating/living", "uninhibit", 3_000, &mut io, &mut bus, &mut sink);
    assert_eq!(system.zone("living").unwrap().state(), DemandState::Off);
    system.handle_message("heating/living", "on", 4_000, &mut io, &mut bus, &mut sink);
    assert_eq!(system.zone("living").unwrap().state(), DemandState::Requested);
}
