//! Message bus adapter.
//!
//! Implements [`MessageBusPort`] over the ESP-IDF MQTT client when built
//! with the `espidf` feature. Inbound messages are forwarded through a
//! channel and drained by the main loop strictly *between* control ticks,
//! which keeps command handling synchronous and non-re-entrant with
//! `HeatingSystem::tick()`.
//!
//! On host builds an in-memory bus stands in, with injection hooks for
//! the simulator and tests.

use crate::app::ports::MessageBusPort;

// ───────────────────────────────────────────────────────────────
// ESP-IDF MQTT
// ───────────────────────────────────────────────────────────────

#[cfg(feature = "espidf")]
pub use esp_impl::EspMqttBus;

#[cfg(feature = "espidf")]
mod esp_impl {
    use super::MessageBusPort;
    use crate::error::{CommsError, Error, Result};
    use esp_idf_svc::mqtt::client::{EspMqttClient, EventPayload, MqttClientConfiguration, QoS};
    use log::warn;
    use std::sync::mpsc;

    /// MQTT-backed bus. Publish/subscribe failures are logged and
    /// swallowed — the control loop never blocks on the broker.
    pub struct EspMqttBus {
        client: EspMqttClient<'static>,
    }

    impl EspMqttBus {
        /// Connect to the broker and spawn the connection pump. Returns
        /// the bus plus the receiver the main loop drains for inbound
        /// `(topic, payload)` pairs.
        pub fn connect(
            broker_url: &str,
            client_id: &str,
        ) -> Result<(Self, mpsc::Receiver<(String, String)>)> {
            let conf = MqttClientConfiguration {
                client_id: Some(client_id),
                ..Default::default()
            };
            let (client, mut connection) = EspMqttClient::new(broker_url, &conf)
                .map_err(|_| Error::Comms(CommsError::MqttConnectFailed))?;

            let (tx, rx) = mpsc::channel();
            std::thread::Builder::new()
                .name("mqtt-rx".into())
                .stack_size(8 * 1024)
                .spawn(move || {
                    while let Ok(event) = connection.next() {
                        if let EventPayload::Received {
                            topic: Some(topic),
                            data,
                            ..
                        } = event.payload()
                        {
                            match core::str::from_utf8(data) {
                                Ok(payload) => {
                                    let _ = tx.send((topic.to_string(), payload.to_string()));
                                }
                                Err(_) => warn!("dropping non-UTF8 payload on {topic}"),
                            }
                        }
                    }
                })
                .map_err(|_| Error::Comms(CommsError::MqttConnectFailed))?;

            Ok((Self { client }, rx))
        }
    }

    impl MessageBusPort for EspMqttBus {
        fn subscribe(&mut self, topic: &str) {
            if self.client.subscribe(topic, QoS::AtLeastOnce).is_err() {
                warn!("subscribe failed for {topic}");
            }
        }

        fn publish(&mut self, topic: &str, payload: &str, retained: bool) {
            if self
                .client
                .publish(topic, QoS::AtLeastOnce, retained, payload.as_bytes())
                .is_err()
            {
                warn!("publish failed for {topic}");
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Host simulation
// ───────────────────────────────────────────────────────────────

/// In-memory bus for simulation and tests: records subscriptions and
/// publishes, and lets the caller inject inbound messages.
#[cfg(not(feature = "espidf"))]
#[derive(Default)]
pub struct SimBus {
    pub subscribed: Vec<String>,
    pub published: Vec<(String, String, bool)>,
    inbound: std::collections::VecDeque<(String, String)>,
}

#[cfg(not(feature = "espidf"))]
impl SimBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an inbound message, as if the broker delivered it.
    pub fn inject(&mut self, topic: &str, payload: &str) {
        self.inbound.push_back((topic.into(), payload.into()));
    }

    /// Drain one pending inbound message (FIFO).
    pub fn next_inbound(&mut self) -> Option<(String, String)> {
        self.inbound.pop_front()
    }

    /// Most recent retained payload published to `topic`.
    pub fn last_retained(&self, topic: &str) -> Option<&str> {
        self.published
            .iter()
            .rev()
            .find(|(t, _, retained)| *retained && t == topic)
            .map(|(_, p, _)| p.as_str())
    }
}

#[cfg(not(feature = "espidf"))]
impl MessageBusPort for SimBus {
    fn subscribe(&mut self, topic: &str) {
        self.subscribed.push(topic.into());
    }

    fn publish(&mut self, topic: &str, payload: &str, retained: bool) {
        self.published.push((topic.into(), payload.into(), retained));
    }
}
