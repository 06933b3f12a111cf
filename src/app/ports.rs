//! Port traits: the hexagonal boundary between control logic and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Controller / RefreshLoop
//! ```
//!
//! Driven adapters (relay, sensor, clock, dashboard, event sink) implement
//! these traits.  The [`Controller`](super::service::Controller) and the
//! [`RefreshLoop`](crate::refresh::RefreshLoop) consume them via generics,
//! so the domain core never touches hardware directly.

use core::time::Duration;

use chrono::NaiveDateTime;

use crate::error::ActuatorError;
use crate::sensors::SensorSample;

use super::commands::AppCommand;
use super::events::{AppEvent, Confirmation, DashboardView};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port for the climate sensor.
pub trait SensorPort {
    /// Take one reading.  A failed or absent sensor yields an empty
    /// sample; it is never an error for the caller.
    fn read(&mut self) -> SensorSample;
}

// ───────────────────────────────────────────────────────────────
// Relay port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the single relay channel.
///
/// Both switching calls are idempotent: repeating one leaves the relay
/// where it is.
pub trait RelayPort {
    /// Drive the line to the released (OFF) level.
    fn initialize(&mut self) -> Result<(), ActuatorError>;

    /// Energise the relay.
    fn turn_on(&mut self) -> Result<(), ActuatorError>;

    /// Release the relay.
    fn turn_off(&mut self) -> Result<(), ActuatorError>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Local wall clock plus a blocking sleep.
pub trait ClockPort {
    /// Current local date and time.
    fn now(&self) -> NaiveDateTime;

    /// Block the calling thread for `duration`.
    fn sleep(&mut self, duration: Duration);
}

// ───────────────────────────────────────────────────────────────
// Dashboard port (driving + driven: operator ↔ domain)
// ───────────────────────────────────────────────────────────────

/// The operator-facing surface.
pub trait DashboardPort {
    /// Present the current view.
    fn render(&mut self, view: &DashboardView);

    /// Non-blocking: the next pending operator command, if any.
    fn poll_command(&mut self) -> Option<AppCommand>;

    /// Show a short-lived confirmation for a handled command.
    fn confirm(&mut self, confirmation: &Confirmation);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`]s through this port.  Adapters
/// decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}
