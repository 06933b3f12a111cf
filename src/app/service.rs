//! Controller: the hexagonal core.
//!
//! [`Controller`] owns the single [`ControlState`] and is the only writer to
//! the relay.  Every transition is computed as a pure value by
//! [`ControlState`], applied through the [`RelayPort`], and committed only
//! after the driver call succeeds.
//!
//! ```text
//!  Tick / AppCommand ──▶ ┌──────────────────────┐ ──▶ EventSink
//!                        │      Controller       │
//!        RelayPort ◀──── │  ControlState (owned) │
//!                        └──────────────────────┘
//! ```

use chrono::NaiveTime;
use log::{debug, info};

use crate::control::{ControlState, RelayStatus, Transition};
use crate::error::ActuatorError;
use crate::schedule::ScheduleWindow;

use super::commands::AppCommand;
use super::events::{AppEvent, Confirmation, SwitchCause};
use super::ports::{EventSink, RelayPort};

/// Result of a periodic tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Manual override active; nothing evaluated against the relay.
    Overridden,
    /// Relay already matches the schedule.
    Unchanged,
    /// The relay was switched to the carried state.
    Switched(RelayStatus),
}

pub struct Controller {
    state: ControlState,
    tick_count: u64,
}

impl Controller {
    /// Relay assumed OFF (the driver's initialised state), schedule in
    /// control.
    pub fn new(window: ScheduleWindow) -> Self {
        Self {
            state: ControlState::new(window),
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started {
            status: self.state.status,
            window: self.state.window,
        });
        info!(
            "Controller started: relay {}, schedule {}",
            self.state.status, self.state.window
        );
    }

    // ── Periodic evaluation ───────────────────────────────────

    /// Reconcile the relay with the schedule at `now`.  A no-op while the
    /// manual override is set.
    pub fn tick(
        &mut self,
        now: NaiveTime,
        relay: &mut impl RelayPort,
        sink: &mut impl EventSink,
    ) -> Result<TickOutcome, ActuatorError> {
        self.tick_count += 1;
        if self.state.manual_override {
            debug!("tick {}: override active, schedule paused", self.tick_count);
            return Ok(TickOutcome::Overridden);
        }
        let transition = self.state.tick(now);
        match self.apply(transition, SwitchCause::Schedule, now, relay, sink)? {
            Some(to) => Ok(TickOutcome::Switched(to)),
            None => Ok(TickOutcome::Unchanged),
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Apply an operator command and return the confirmation to show.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        now: NaiveTime,
        relay: &mut impl RelayPort,
        sink: &mut impl EventSink,
    ) -> Result<Confirmation, ActuatorError> {
        match cmd {
            AppCommand::Manual(target) => {
                let transition = self.state.manual(target);
                self.apply(transition, SwitchCause::Manual, now, relay, sink)?;
                sink.emit(&AppEvent::OverrideEngaged(target));
                Ok(match target {
                    RelayStatus::On => Confirmation::ManualOn,
                    RelayStatus::Off => Confirmation::ManualOff,
                })
            }
            AppCommand::ResumeSchedule => {
                let transition = self.state.resume();
                self.apply(transition, SwitchCause::Schedule, now, relay, sink)?;
                sink.emit(&AppEvent::ScheduleResumed);
                Ok(Confirmation::ScheduleResumed)
            }
            AppCommand::UpdateSchedule(window) => {
                let override_cleared = self.state.manual_override;
                self.tick_count += 1;
                let transition = self.state.update_schedule(window, now);
                self.apply(transition, SwitchCause::Schedule, now, relay, sink)?;
                sink.emit(&AppEvent::ScheduleUpdated {
                    window,
                    override_cleared,
                });
                Ok(Confirmation::ScheduleUpdated { override_cleared })
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> ControlState {
        self.state
    }

    pub fn status(&self) -> RelayStatus {
        self.state.status
    }

    pub fn manual_override(&self) -> bool {
        self.state.manual_override
    }

    pub fn window(&self) -> ScheduleWindow {
        self.state.window
    }

    /// Ticks evaluated since startup, including the one implied by a
    /// schedule update.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    // ── Internal ──────────────────────────────────────────────

    /// Drive the relay if the transition asks for it, then commit.
    /// Returns the driven state.
    fn apply(
        &mut self,
        transition: Transition,
        cause: SwitchCause,
        now: NaiveTime,
        relay: &mut impl RelayPort,
        sink: &mut impl EventSink,
    ) -> Result<Option<RelayStatus>, ActuatorError> {
        let from = self.state.status;
        if let Some(to) = transition.drive {
            match to {
                RelayStatus::On => relay.turn_on()?,
                RelayStatus::Off => relay.turn_off()?,
            }
            sink.emit(&AppEvent::RelaySwitched {
                from,
                to,
                cause,
                at: now,
            });
        }
        self.state = transition.next;
        Ok(transition.drive)
    }
}
