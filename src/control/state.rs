//! Relay control state: schedule window, commanded status, override flag.
//!
//! `ControlState` is a plain value.  Each transition consumes a state and
//! returns a [`Transition`]: the next state plus the relay drive (if any)
//! needed to reach it.  The [`Controller`] owns exactly one state, performs
//! the drive, and commits the next state only once the drive succeeded.
//!
//! [`Controller`]: crate::app::service::Controller

use core::fmt;

use chrono::NaiveTime;

use crate::schedule::ScheduleWindow;

/// Last commanded state of the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RelayStatus {
    /// Released, the safe power-on default.
    #[default]
    Off,
    On,
}

impl RelayStatus {
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

impl From<bool> for RelayStatus {
    fn from(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

impl fmt::Display for RelayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On => f.write_str("ON"),
            Self::Off => f.write_str("OFF"),
        }
    }
}

/// `{Off, On} × {override}` plus the active window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlState {
    pub window: ScheduleWindow,
    pub status: RelayStatus,
    /// While set, schedule decisions are computed but not applied.
    pub manual_override: bool,
}

impl ControlState {
    /// Fresh process state: relay off, schedule in control.
    pub fn new(window: ScheduleWindow) -> Self {
        Self {
            window,
            status: RelayStatus::Off,
            manual_override: false,
        }
    }

    /// What the schedule alone asks for at `now`.
    pub fn scheduled_status(&self, now: NaiveTime) -> RelayStatus {
        RelayStatus::from(self.window.is_active_at(now))
    }

    /// The status a tick at `now` must apply, or `None` if the tick is a
    /// no-op (override active, or relay already matches the schedule).
    pub fn reconcile(&self, now: NaiveTime) -> Option<RelayStatus> {
        if self.manual_override {
            return None;
        }
        let scheduled = self.scheduled_status(now);
        (scheduled != self.status).then_some(scheduled)
    }

    /// Periodic re-evaluation.
    pub fn tick(self, now: NaiveTime) -> Transition {
        match self.reconcile(now) {
            Some(target) => Transition::drive(self.with_status(target), target),
            None => Transition::hold(self),
        }
    }

    /// Manual ON/OFF.  Always drives, even when already in `target`.
    pub fn manual(self, target: RelayStatus) -> Transition {
        let next = Self {
            manual_override: true,
            ..self.with_status(target)
        };
        Transition::drive(next, target)
    }

    /// Clear the override.  The next tick reconciles.
    pub fn resume(self) -> Transition {
        Transition::hold(Self {
            manual_override: false,
            ..self
        })
    }

    /// Swap the window, clear the override and re-sync at `now`.
    pub fn update_schedule(self, window: ScheduleWindow, now: NaiveTime) -> Transition {
        Self {
            window,
            manual_override: false,
            ..self
        }
        .tick(now)
    }

    fn with_status(self, status: RelayStatus) -> Self {
        Self { status, ..self }
    }
}

/// Result of one transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct Transition {
    pub next: ControlState,
    /// Relay call required before `next` becomes true.
    pub drive: Option<RelayStatus>,
}

impl Transition {
    fn hold(next: ControlState) -> Self {
        Self { next, drive: None }
    }

    fn drive(next: ControlState, target: RelayStatus) -> Self {
        Self {
            next,
            drive: Some(target),
        }
    }
}
