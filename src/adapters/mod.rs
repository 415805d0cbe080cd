//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter    | Implements   | Connects to                 |
//! |------------|--------------|-----------------------------|
//! | `log_sink` | EventSink    | `log` facade                |
//! | `mqtt`     | EventSink    | MQTT broker (feature)       |
//! | `time`     | TimePort     | monotonic + local clock     |
//!
//! The opener relay (`OpenerPort`) and the database file (`FilterStore`)
//! live next to their domain code in `drivers::opener` and `access`.

pub mod log_sink;
#[cfg(feature = "mqtt")]
pub mod mqtt;
pub mod time;
