//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements   | Connects to                 |
//! |------------|--------------|-----------------------------|
//! | `display`  | DisplayPort  | 4-digit 7-segment module    |
//! | `hardware` | InputPort    | ESP32 GPIO inputs           |
//! |            | OutputPort   | Relays and indicator lamps  |
//! |            | DisplayPort  | (delegates to `display`)    |
//! | `log_sink` | EventSink    | Serial log output           |
//! | `nvs`      | ConfigPort   | NVS / in-memory store       |
//! |            | StoragePort  |                             |
//! | `time`     | -            | ESP32 system timer          |

pub mod display;
pub mod hardware;
pub mod log_sink;
pub mod nvs;
pub mod time;
