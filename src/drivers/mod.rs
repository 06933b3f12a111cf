//! Relay driver and one-shot GPIO initialisation.

pub mod hw_init;
pub mod relay;

pub use relay::{ActiveLevel, RelayDriver};
