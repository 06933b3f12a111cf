//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements    | Connects to                   |
//! |------------|---------------|-------------------------------|
//! | `console`  | DashboardPort | Serial console (stdin / log)  |
//! | `hardware` | SensorPort    | DHT11 over GPIO               |
//! |            | RelayPort     | Relay output GPIO             |
//! | `log_sink` | EventSink     | Serial log output             |
//! | `time`     | ClockPort     | System wall clock             |

pub mod console;
pub mod hardware;
pub mod log_sink;
pub mod time;
