//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements      | Connects to                  |
//! |---------------|-----------------|------------------------------|
//! | `config_file` | ConfigPort      | JSON file (SPIFFS on board)  |
//! | `log_sink`    | EventSink       | `log` facade                 |
//! | `time`        | Clock, DelayNs  | ESP32 system timer / Instant |
//! | `udp`         | DatagramSocket  | lwIP / host UDP socket       |
//! | `uart`        | ActuatorLink    | ESP32 UART → DFPlayer        |
//! | `wifi`        | -               | ESP-IDF Wi-Fi STA            |

pub mod config_file;
pub mod log_sink;
pub mod time;
#[cfg(feature = "espidf")]
pub mod uart;
pub mod udp;
#[cfg(feature = "espidf")]
pub mod wifi;
