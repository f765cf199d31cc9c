//! Mock adapters for integration tests.
//!
//! In-memory stand-ins for GPIO, the message bus and the event sink.
//! Everything is recorded so tests can assert on the full history without
//! touching real hardware or a broker.

use std::collections::HashMap;

use hydrozone::app::events::AppEvent;
use hydrozone::app::ports::{DigitalIoPort, EventSink, MessageBusPort};

// ── MockIo ────────────────────────────────────────────────────

/// Logical pin map. Inputs are driven with [`set`](MockIo::set); outputs
/// written by the system are readable back with [`get`](MockIo::get).
#[derive(Default)]
pub struct MockIo {
    levels: HashMap<u8, bool>,
}

#[allow(dead_code)]
impl MockIo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, pin: u8, level: bool) {
        self.levels.insert(pin, level);
    }

    pub fn get(&self, pin: u8) -> bool {
        *self.levels.get(&pin).unwrap_or(&false)
    }
}

impl DigitalIoPort for MockIo {
    fn read(&mut self, pin: u8) -> bool {
        *self.levels.get(&pin).unwrap_or(&false)
    }

    fn write(&mut self, pin: u8, level: bool) {
        self.levels.insert(pin, level);
    }
}

// ── MockBus ───────────────────────────────────────────────────

/// Records every subscribe and publish.
#[derive(Default)]
pub struct MockBus {
    pub subscribed: Vec<String>,
    pub published: Vec<(String, String, bool)>,
}

#[allow(dead_code)]
impl MockBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// All payloads published to `topic`, in order.
    pub fn payloads_for(&self, topic: &str) -> Vec<&str> {
        self.published
            .iter()
            .filter(|(t, _, _)| t == topic)
            .map(|(_, p, _)| p.as_str())
            .collect()
    }

    /// Most recent retained payload on `topic`.
    pub fn last_retained(&self, topic: &str) -> Option<&str> {
        self.published
            .iter()
            .rev()
            .find(|(t, _, retained)| *retained && t == topic)
            .map(|(_, p, _)| p.as_str())
    }
}

impl MessageBusPort for MockBus {
    fn subscribe(&mut self, topic: &str) {
        self.subscribed.push(topic.into());
    }

    fn publish(&mut self, topic: &str, payload: &str, retained: bool) {
        self.published.push((topic.into(), payload.into(), retained));
    }
}

// ── EventLog ──────────────────────────────────────────────────

/// Event sink that keeps every emitted event for later inspection.
#[derive(Default)]
pub struct EventLog {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the first event matching `pred`, if any.
    pub fn position<F: Fn(&AppEvent) -> bool>(&self, pred: F) -> Option<usize> {
        self.events.iter().position(|e| pred(e))
    }

    pub fn contains<F: Fn(&AppEvent) -> bool>(&self, pred: F) -> bool {
        self.events.iter().any(|e| pred(e))
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
