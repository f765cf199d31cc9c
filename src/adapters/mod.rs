//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements       | Connects to                   |
//! |------------|------------------|-------------------------------|
//! | `hardware` | DigitalIoPort    | ESP32 GPIO / in-memory sim    |
//! | `time`     | ClockPort        | esp_timer / `std::time`       |
//! | `mqtt`     | MessageBusPort   | ESP-IDF MQTT / in-memory bus  |
//! | `log_sink` | EventSink        | Serial log output             |
//! | `nvs`      | ConfigPort       | NVS / in-memory store         |

pub mod hardware;
pub mod log_sink;
pub mod mqtt;
pub mod nvs;
pub mod time;
