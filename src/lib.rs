//! HydroVerde relay controller library.
//!
//! Schedule-driven relay control with manual override and a live climate
//! readout.  Exposes the pure-logic modules for integration testing; all
//! ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod drivers;
pub mod error;
pub mod pins;
pub mod refresh;
pub mod schedule;
pub mod sensors;
