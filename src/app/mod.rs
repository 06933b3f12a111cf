//! Application core: relay control logic, zero I/O.
//!
//! The schedule/override rules live in [`service::Controller`].  All
//! interaction with hardware, the clock and the operator happens through
//! the **port traits** in [`ports`], keeping this layer testable without
//! real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
