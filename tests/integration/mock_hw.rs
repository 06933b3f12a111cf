//! Mock adapters for integration tests.
//!
//! Records every relay call, replays scripted sensor samples and operator
//! commands, and runs a fake clock that only advances when slept on, so a
//! whole refresh cycle executes instantly.

use std::collections::VecDeque;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use embedded_hal::digital::ErrorKind;
use hydroverde::app::commands::AppCommand;
use hydroverde::app::events::{AppEvent, Confirmation, DashboardView};
use hydroverde::app::ports::{ClockPort, DashboardPort, EventSink, RelayPort, SensorPort};
use hydroverde::error::ActuatorError;
use hydroverde::sensors::SensorSample;

// ── Relay call record ─────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayCall {
    Initialize,
    TurnOn,
    TurnOff,
}

// ── MockHardware ──────────────────────────────────────────────

#[derive(Default)]
pub struct MockHardware {
    pub calls: Vec<RelayCall>,
    pub samples: VecDeque<SensorSample>,
    pub reads: usize,
    /// Fail every relay write from now on.
    pub broken: bool,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_samples(samples: impl IntoIterator<Item = SensorSample>) -> Self {
        Self {
            samples: samples.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn switch_calls(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, RelayCall::TurnOn | RelayCall::TurnOff))
            .count()
    }

    pub fn last_call(&self) -> Option<RelayCall> {
        self.calls.last().copied()
    }

    fn record(&mut self, call: RelayCall) -> Result<(), ActuatorError> {
        if self.broken {
            return Err(ActuatorError::GpioWriteFailed(ErrorKind::Other));
        }
        self.calls.push(call);
        Ok(())
    }
}

impl RelayPort for MockHardware {
    fn initialize(&mut self) -> Result<(), ActuatorError> {
        self.record(RelayCall::Initialize)
    }

    fn turn_on(&mut self) -> Result<(), ActuatorError> {
        self.record(RelayCall::TurnOn)
    }

    fn turn_off(&mut self) -> Result<(), ActuatorError> {
        self.record(RelayCall::TurnOff)
    }
}

impl SensorPort for MockHardware {
    fn read(&mut self) -> SensorSample {
        self.reads += 1;
        self.samples.pop_front().unwrap_or_default()
    }
}

// ── FakeClock ─────────────────────────────────────────────────

pub struct FakeClock {
    pub now: NaiveDateTime,
    pub slept: Vec<Duration>,
}

#[allow(dead_code)]
impl FakeClock {
    pub fn at(h: u32, m: u32) -> Self {
        let now = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(h, m, 0).unwrap());
        Self {
            now,
            slept: Vec::new(),
        }
    }

    pub fn total_slept(&self) -> Duration {
        self.slept.iter().sum()
    }

    pub fn set_time(&mut self, h: u32, m: u32) {
        self.now = self
            .now
            .date()
            .and_time(NaiveTime::from_hms_opt(h, m, 0).unwrap());
    }
}

impl ClockPort for FakeClock {
    fn now(&self) -> NaiveDateTime {
        self.now
    }

    fn sleep(&mut self, duration: Duration) {
        self.slept.push(duration);
        self.now += chrono::Duration::from_std(duration).unwrap();
    }
}

// ── ScriptedDashboard ─────────────────────────────────────────

/// Hands out queued commands, each on a given poll number (1-based,
/// counted across the whole test).
#[derive(Default)]
pub struct ScriptedDashboard {
    pub script: VecDeque<(usize, AppCommand)>,
    pub polls: usize,
    pub views: Vec<DashboardView>,
    pub confirmations: Vec<Confirmation>,
}

#[allow(dead_code)]
impl ScriptedDashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn command_on_poll(mut self, poll: usize, cmd: AppCommand) -> Self {
        self.script.push_back((poll, cmd));
        self
    }

    pub fn last_view(&self) -> &DashboardView {
        self.views.last().unwrap()
    }
}

impl DashboardPort for ScriptedDashboard {
    fn render(&mut self, view: &DashboardView) {
        self.views.push(*view);
    }

    fn poll_command(&mut self) -> Option<AppCommand> {
        self.polls += 1;
        match self.script.front() {
            Some(&(at, cmd)) if at <= self.polls => {
                self.script.pop_front();
                Some(cmd)
            }
            _ => None,
        }
    }

    fn confirm(&mut self, confirmation: &Confirmation) {
        self.confirmations.push(*confirmation);
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}
