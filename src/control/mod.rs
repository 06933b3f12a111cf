//! Control decision logic: pure state, no I/O.

pub mod state;

pub use state::{ControlState, RelayStatus, Transition};
