//! Hydrozone firmware — main entry point.
//!
//! Hexagonal architecture, tick-driven execution.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  EspGpioAdapter   MonotonicClock   EspMqttBus                │
//! │  (DigitalIoPort)  (ClockPort)      (MessageBusPort)          │
//! │  LogEventSink     NvsConfigStore                             │
//! │  (EventSink)      (ConfigPort)                               │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ────────────────        │
//! │                                                              │
//! │  ┌──────────────────────────────────────────────────────┐    │
//! │  │           HeatingSystem (pure logic)                 │    │
//! │  │  Zones · Valves · Pump · Boiler interlock            │    │
//! │  └──────────────────────────────────────────────────────┘    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Without the `espidf` feature this binary runs a host-side simulation:
//! same control core, in-memory adapters, synthetic valve travel.
#![deny(unused_must_use)]

use anyhow::Result;

#[cfg(feature = "espidf")]
fn main() -> Result<()> {
    esp_impl::run()
}

#[cfg(feature = "espidf")]
mod esp_impl {
    use anyhow::{Context, Result};
    use log::{info, warn};
    use std::time::Duration;

    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::nvs::EspDefaultNvsPartition;
    use esp_idf_svc::wifi::{BlockingWifi, ClientConfiguration, Configuration, EspWifi};

    use hydrozone::adapters::hardware::EspGpioAdapter;
    use hydrozone::adapters::log_sink::LogEventSink;
    use hydrozone::adapters::mqtt::EspMqttBus;
    use hydrozone::adapters::nvs::NvsConfigStore;
    use hydrozone::adapters::time::MonotonicClock;
    use hydrozone::app::ports::{ClockPort, ConfigPort};
    use hydrozone::app::service::HeatingSystem;
    use hydrozone::config::HeatingConfig;

    const WIFI_SSID: &str = match option_env!("HYDROZONE_WIFI_SSID") {
        Some(s) => s,
        None => "",
    };
    const WIFI_PASS: &str = match option_env!("HYDROZONE_WIFI_PASS") {
        Some(s) => s,
        None => "",
    };
    const BROKER_URL: &str = match option_env!("HYDROZONE_BROKER_URL") {
        Some(s) => s,
        None => "mqtt://192.168.1.10:1883",
    };

    /// Status summary cadence in control ticks (roughly one minute at the
    /// default 50 ms tick).
    const STATUS_EVERY_TICKS: u32 = 1_200;

    pub fn run() -> Result<()> {
        // ── 1. ESP-IDF bootstrap ──────────────────────────────
        esp_idf_svc::sys::link_patches();
        esp_idf_logger::init()?;

        info!("hydrozone v{}", env!("CARGO_PKG_VERSION"));

        // ── 2. Config from NVS (or defaults) ──────────────────
        let nvs_partition = EspDefaultNvsPartition::take().context("NVS partition")?;
        let config = match NvsConfigStore::new(nvs_partition.clone()) {
            Ok(store) => match store.load() {
                Ok(cfg) => {
                    info!("config loaded from NVS");
                    cfg
                }
                Err(e) => {
                    warn!("config load failed ({e}), using defaults");
                    HeatingConfig::default()
                }
            },
            Err(e) => {
                warn!("NVS init failed ({e}), running with defaults");
                HeatingConfig::default()
            }
        };
        config.validate().map_err(anyhow::Error::msg)?;

        // ── 3. GPIO ───────────────────────────────────────────
        let mut output_pins = vec![config.boiler_pin, config.pump_pin];
        let mut input_pins = Vec::new();
        for zone in &config.zones {
            output_pins.push(zone.valve_pin);
            input_pins.push(zone.valve_switch_pin);
            if let Some(pin) = zone.thermostat_pin {
                input_pins.push(pin);
            }
        }
        let mut io = EspGpioAdapter::new(&output_pins, &input_pins)?;

        // ── 4. WiFi + MQTT ────────────────────────────────────
        let peripherals = Peripherals::take().context("peripherals")?;
        let sysloop = EspSystemEventLoop::take().context("event loop")?;
        let mut wifi = BlockingWifi::wrap(
            EspWifi::new(peripherals.modem, sysloop.clone(), Some(nvs_partition))?,
            sysloop,
        )?;
        wifi.set_configuration(&Configuration::Client(ClientConfiguration {
            ssid: WIFI_SSID.try_into().unwrap_or_default(),
            password: WIFI_PASS.try_into().unwrap_or_default(),
            ..Default::default()
        }))?;
        wifi.start()?;
        wifi.connect()?;
        wifi.wait_netif_up()?;
        info!("WiFi up");

        let (mut bus, inbound) = EspMqttBus::connect(BROKER_URL, "hydrozone")?;

        // ── 5. Control core ───────────────────────────────────
        let clock = MonotonicClock::new();
        let mut sink = LogEventSink::new();
        let mut system = HeatingSystem::new(&config);
        system.subscribe_zones(&mut bus, &mut sink);

        // ── 6. Control loop ───────────────────────────────────
        // Inbound commands are drained between ticks, so a command fully
        // applies before the next tick observes it.
        let mut ticks: u32 = 0;
        loop {
            while let Ok((topic, payload)) = inbound.try_recv() {
                system.handle_message(
                    &topic,
                    &payload,
                    clock.now_ms(),
                    &mut io,
                    &mut bus,
                    &mut sink,
                );
            }

            system.tick(clock.now_ms(), &mut io, &mut bus, &mut sink);

            ticks = ticks.wrapping_add(1);
            if ticks % STATUS_EVERY_TICKS == 0 {
                info!("status:\n{}", system.status_summary());
            }

            std::thread::sleep(Duration::from_millis(
                u64::from(config.control_loop_interval_ms),
            ));
        }
    }
}

#[cfg(not(feature = "espidf"))]
fn main() -> Result<()> {
    sim::run()
}

/// Host-side simulation: the full control core against in-memory adapters.
/// Valve microswitches follow the commanded level after a synthetic travel
/// delay, so the whole demand → valve → pump → interlock → boiler chain
/// plays out on the console in accelerated time.
#[cfg(not(feature = "espidf"))]
mod sim {
    use anyhow::Result;
    use log::info;

    use hydrozone::adapters::hardware::SimGpioAdapter;
    use hydrozone::adapters::log_sink::LogEventSink;
    use hydrozone::adapters::mqtt::SimBus;
    use hydrozone::app::service::HeatingSystem;
    use hydrozone::config::HeatingConfig;

    /// Synthetic valve travel: the microswitch confirms 1.5 s after the
    /// relay changes level.
    const SIM_TRAVEL_MS: u32 = 1_500;

    /// Mirrors one valve's microswitch input from its relay output.
    struct ValveModel {
        valve_pin: u8,
        switch_pin: u8,
        last_level: bool,
        changed_at: u32,
    }

    impl ValveModel {
        fn step(&mut self, now_ms: u32, io: &mut SimGpioAdapter) {
            let level = io.output(self.valve_pin);
            if level != self.last_level {
                self.last_level = level;
                self.changed_at = now_ms;
            }
            if now_ms.wrapping_sub(self.changed_at) >= SIM_TRAVEL_MS {
                io.set_input(self.switch_pin, level);
            }
        }
    }

    pub fn run() -> Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .init();

        let mut config = HeatingConfig::default();
        // Compress the slow timers so the full story fits a short run.
        config.cooldown_secs = 20;
        config.valve_travel_ms = 5_000;

        let mut io = SimGpioAdapter::new();
        let mut bus = SimBus::new();
        let mut sink = LogEventSink::new();
        let mut system = HeatingSystem::new(&config);
        system.subscribe_zones(&mut bus, &mut sink);

        let mut valves: Vec<ValveModel> = config
            .zones
            .iter()
            .map(|z| ValveModel {
                valve_pin: z.valve_pin,
                switch_pin: z.valve_switch_pin,
                last_level: false,
                changed_at: 0,
            })
            .collect();

        let tick_ms = config.control_loop_interval_ms;
        let mut now_ms: u32 = 0;

        // Scripted day: switch the study on, let the boiler fire, then
        // switch it off and ride out the cooldown.
        let script: &[(u32, &str, &str)] = &[
            (1_000, "heating/study", "on"),
            (40_000, "heating/study", "off"),
        ];
        let mut next_cue = 0;

        while now_ms < 80_000 {
            while next_cue < script.len() && script[next_cue].0 <= now_ms {
                let (_, topic, payload) = script[next_cue];
                info!(">>> {topic} <- {payload:?}");
                system.handle_message(topic, payload, now_ms, &mut io, &mut bus, &mut sink);
                next_cue += 1;
            }

            for valve in &mut valves {
                valve.step(now_ms, &mut io);
            }
            system.tick(now_ms, &mut io, &mut bus, &mut sink);

            if now_ms % 10_000 == 0 && now_ms > 0 {
                info!("t={}s\n{}", now_ms / 1_000, system.status_summary());
            }
            now_ms += tick_ms;
        }

        info!("simulation done:\n{}", system.status_summary());
        Ok(())
    }
}
