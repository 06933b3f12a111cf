//! Outbound application events, confirmations and the dashboard view.
//!
//! The [`Controller`](super::service::Controller) emits [`AppEvent`]s
//! through the [`EventSink`](super::ports::EventSink) port and returns a
//! [`Confirmation`] for every handled command.  Adapters on the other side
//! decide how to present them.

use chrono::{NaiveDateTime, NaiveTime};

use crate::control::RelayStatus;
use crate::schedule::ScheduleWindow;
use crate::sensors::SensorReading;

/// What caused a relay transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchCause {
    Schedule,
    Manual,
}

/// Structured events emitted by the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppEvent {
    /// The controller has started (carries initial state).
    Started {
        status: RelayStatus,
        window: ScheduleWindow,
    },

    /// The relay was driven to a new state.
    RelaySwitched {
        from: RelayStatus,
        to: RelayStatus,
        cause: SwitchCause,
        at: NaiveTime,
    },

    /// A manual command took over; the schedule is suspended.
    OverrideEngaged(RelayStatus),

    /// Schedule control was resumed by the operator.
    ScheduleResumed,

    /// The schedule window was replaced.
    ScheduleUpdated {
        window: ScheduleWindow,
        override_cleared: bool,
    },
}

/// Operator-facing acknowledgement of a handled command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    ManualOn,
    ManualOff,
    ScheduleResumed,
    ScheduleUpdated { override_cleared: bool },
}

impl Confirmation {
    pub fn message(&self) -> &'static str {
        match self {
            Self::ManualOn => "Relay manually turned ON.",
            Self::ManualOff => "Relay manually turned OFF.",
            Self::ScheduleResumed => "Returning to automated schedule control!",
            Self::ScheduleUpdated {
                override_cleared: true,
            } => "Schedule updated! Resuming automated control.",
            Self::ScheduleUpdated {
                override_cleared: false,
            } => "Schedule updated successfully!",
        }
    }

    /// Schedule changes get a longer on-screen pause.
    pub fn is_schedule_update(&self) -> bool {
        matches!(self, Self::ScheduleUpdated { .. })
    }
}

/// Everything the dashboard shows in one refresh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashboardView {
    pub updated_at: NaiveDateTime,
    pub status: RelayStatus,
    pub manual_override: bool,
    pub window: ScheduleWindow,
    pub reading: SensorReading,
}

impl DashboardView {
    /// Banner shown while the schedule is suspended.
    pub fn override_banner(&self) -> Option<&'static str> {
        self.manual_override
            .then_some("Manual override is active. The schedule is currently paused.")
    }
}
