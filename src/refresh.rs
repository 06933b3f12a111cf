//! Refresh loop: the single control thread.
//!
//! Each cycle runs to completion in a fixed order:
//!
//! ```text
//!  read sensor ─▶ tick controller ─▶ render ─▶ wait (poll commands)
//!       ▲                                            │
//!       └──────── interval elapsed / command ────────┘
//! ```
//!
//! The wait is sliced so the dashboard can be polled for commands.  A
//! command short-circuits the cycle: it is applied at once, confirmed,
//! followed by a short pause, and the next cycle starts immediately.

use core::convert::Infallible;
use core::time::Duration;

use chrono::NaiveDateTime;
use log::{debug, trace};

use crate::app::events::{Confirmation, DashboardView};
use crate::app::ports::{ClockPort, DashboardPort, EventSink, RelayPort, SensorPort};
use crate::app::service::Controller;
use crate::config::SystemConfig;
use crate::error::Error;
use crate::sensors::SensorReading;

/// Shortest command poll slice; a zero slice would never finish the wait.
const MIN_POLL: Duration = Duration::from_millis(1);

/// Loop timing, taken from [`SystemConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTiming {
    interval: Duration,
    poll: Duration,
    confirm_pause: Duration,
    schedule_confirm_pause: Duration,
}

impl RefreshTiming {
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Never shorter than 1 ms.
    pub fn poll(&self) -> Duration {
        self.poll
    }

    /// Pause after showing `confirmation`.
    pub fn pause_for(&self, confirmation: &Confirmation) -> Duration {
        if confirmation.is_schedule_update() {
            self.schedule_confirm_pause
        } else {
            self.confirm_pause
        }
    }
}

impl Default for RefreshTiming {
    fn default() -> Self {
        Self::from(&SystemConfig::default())
    }
}

impl From<&SystemConfig> for RefreshTiming {
    fn from(config: &SystemConfig) -> Self {
        Self {
            interval: config.refresh_interval(),
            poll: config.command_poll().max(MIN_POLL),
            confirm_pause: config.confirm_pause(),
            schedule_confirm_pause: config.schedule_confirm_pause(),
        }
    }
}

/// How a cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The full interval elapsed.
    Completed,
    /// A command was handled; the wait was cut short.
    Restarted(Confirmation),
}

pub struct RefreshLoop {
    controller: Controller,
    reading: SensorReading,
    timing: RefreshTiming,
    cycles: u64,
}

impl RefreshLoop {
    pub fn new(controller: Controller, timing: RefreshTiming) -> Self {
        Self {
            controller,
            reading: SensorReading::default(),
            timing,
            cycles: 0,
        }
    }

    /// Run one cycle.  Only a relay failure is an error.
    pub fn run_cycle(
        &mut self,
        hw: &mut (impl SensorPort + RelayPort),
        clock: &mut impl ClockPort,
        ui: &mut impl DashboardPort,
        sink: &mut impl EventSink,
    ) -> Result<CycleOutcome, Error> {
        self.cycles += 1;

        // 1. Sensor (best effort)
        let sample = hw.read();
        self.reading.update(sample);

        // 2. Control tick
        let now = clock.now();
        let outcome = self.controller.tick(now.time(), hw, sink)?;
        trace!("cycle {}: {:?}", self.cycles, outcome);

        // 3. Render
        ui.render(&self.view(now));

        // 4. Wait, watching for commands
        let mut waited = Duration::ZERO;
        while waited < self.timing.interval {
            if let Some(cmd) = ui.poll_command() {
                debug!("cycle {}: command {:?}", self.cycles, cmd);
                let at = clock.now().time();
                let confirmation = self.controller.handle_command(cmd, at, hw, sink)?;
                ui.confirm(&confirmation);
                clock.sleep(self.timing.pause_for(&confirmation));
                return Ok(CycleOutcome::Restarted(confirmation));
            }
            let slice = self.timing.poll.min(self.timing.interval - waited);
            clock.sleep(slice);
            waited += slice;
        }
        Ok(CycleOutcome::Completed)
    }

    /// Cycle forever.  Returns only when the relay can no longer be driven.
    pub fn run(
        &mut self,
        hw: &mut (impl SensorPort + RelayPort),
        clock: &mut impl ClockPort,
        ui: &mut impl DashboardPort,
        sink: &mut impl EventSink,
    ) -> Result<Infallible, Error> {
        loop {
            self.run_cycle(hw, clock, ui, sink)?;
        }
    }

    /// Current view, stamped `updated_at`.
    pub fn view(&self, updated_at: NaiveDateTime) -> DashboardView {
        DashboardView {
            updated_at,
            status: self.controller.status(),
            manual_override: self.controller.manual_override(),
            window: self.controller.window(),
            reading: self.reading,
        }
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn reading(&self) -> SensorReading {
        self.reading
    }

    pub fn timing(&self) -> RefreshTiming {
        self.timing
    }

    /// Cycles started since construction.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }
}
