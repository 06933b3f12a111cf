//! Refresh loop cycles with a fake clock: ordering, timing and the
//! command short-circuit.

use std::time::Duration;

use chrono::NaiveTime;
use hydroverde::app::commands::AppCommand;
use hydroverde::app::events::Confirmation;
use hydroverde::app::service::Controller;
use hydroverde::config::SystemConfig;
use hydroverde::control::RelayStatus;
use hydroverde::error::Error;
use hydroverde::refresh::{CycleOutcome, RefreshLoop, RefreshTiming};
use hydroverde::schedule::ScheduleWindow;
use hydroverde::sensors::SensorSample;

use crate::mock_hw::{FakeClock, MockHardware, RecordingSink, RelayCall, ScriptedDashboard};

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn refresh_loop() -> RefreshLoop {
    RefreshLoop::new(
        Controller::new(ScheduleWindow::new(t(9, 0), t(17, 0))),
        RefreshTiming::default(),
    )
}

#[test]
fn full_cycle_reads_ticks_renders_then_waits_the_interval() {
    let mut rl = refresh_loop();
    let mut hw = MockHardware::with_samples([SensorSample {
        temperature_c: Some(24.0),
        humidity_pct: Some(55.0),
    }]);
    let mut clock = FakeClock::at(10, 0);
    let mut ui = ScriptedDashboard::new();
    let mut sink = RecordingSink::default();

    let outcome = rl
        .run_cycle(&mut hw, &mut clock, &mut ui, &mut sink)
        .unwrap();

    assert_eq!(outcome, CycleOutcome::Completed);
    assert_eq!(hw.reads, 1);
    assert_eq!(hw.calls, vec![RelayCall::TurnOn]);

    // The render saw the post-tick state and the fresh reading.
    let view = ui.last_view();
    assert_eq!(view.status, RelayStatus::On);
    assert_eq!(view.reading.temperature().to_string(), "24.0°C");
    assert_eq!(view.reading.humidity().to_string(), "55.0%");

    assert_eq!(clock.total_slept(), Duration::from_secs(5));
    assert_eq!(ui.polls, 50);
}

#[test]
fn unvalidated_zero_poll_still_finishes_the_wait() {
    let config = SystemConfig {
        command_poll_ms: 0,
        refresh_interval_ms: 10,
        ..Default::default()
    };
    let mut rl = RefreshLoop::new(
        Controller::new(ScheduleWindow::new(t(9, 0), t(17, 0))),
        RefreshTiming::from(&config),
    );
    let mut hw = MockHardware::new();
    let mut clock = FakeClock::at(10, 0);
    let mut ui = ScriptedDashboard::new();
    let mut sink = RecordingSink::default();

    let outcome = rl
        .run_cycle(&mut hw, &mut clock, &mut ui, &mut sink)
        .unwrap();

    assert_eq!(outcome, CycleOutcome::Completed);
    assert_eq!(clock.total_slept(), Duration::from_millis(10));
    assert_eq!(ui.polls, 10);
}

#[test]
fn failed_read_keeps_previous_values() {
    let mut rl = refresh_loop();
    let mut hw = MockHardware::with_samples([
        SensorSample {
            temperature_c: Some(19.5),
            humidity_pct: Some(40.0),
        },
        SensorSample::default(),
    ]);
    let mut clock = FakeClock::at(20, 0);
    let mut ui = ScriptedDashboard::new();
    let mut sink = RecordingSink::default();

    rl.run_cycle(&mut hw, &mut clock, &mut ui, &mut sink).unwrap();
    rl.run_cycle(&mut hw, &mut clock, &mut ui, &mut sink).unwrap();

    assert_eq!(ui.views.len(), 2);
    assert_eq!(ui.views[1].reading.temperature().to_string(), "19.5°C");
}

#[test]
fn no_sensor_shows_not_available() {
    let mut rl = refresh_loop();
    let mut hw = MockHardware::new();
    let mut clock = FakeClock::at(20, 0);
    let mut ui = ScriptedDashboard::new();
    let mut sink = RecordingSink::default();

    rl.run_cycle(&mut hw, &mut clock, &mut ui, &mut sink).unwrap();

    assert_eq!(ui.last_view().reading.temperature().to_string(), "N/A");
    assert_eq!(ui.last_view().reading.humidity().to_string(), "N/A");
}

#[test]
fn manual_command_cuts_the_wait_short() {
    let mut rl = refresh_loop();
    let mut hw = MockHardware::new();
    let mut clock = FakeClock::at(10, 0);
    let mut ui = ScriptedDashboard::new().command_on_poll(3, AppCommand::Manual(RelayStatus::Off));
    let mut sink = RecordingSink::default();

    let outcome = rl
        .run_cycle(&mut hw, &mut clock, &mut ui, &mut sink)
        .unwrap();

    assert_eq!(outcome, CycleOutcome::Restarted(Confirmation::ManualOff));
    assert_eq!(ui.confirmations, vec![Confirmation::ManualOff]);
    // Two poll slices, then the confirmation pause.
    assert_eq!(
        clock.slept,
        vec![
            Duration::from_millis(100),
            Duration::from_millis(100),
            Duration::from_secs(1)
        ]
    );
    assert_eq!(hw.calls, vec![RelayCall::TurnOn, RelayCall::TurnOff]);

    // The next cycle renders the override and leaves the relay alone.
    rl.run_cycle(&mut hw, &mut clock, &mut ui, &mut sink).unwrap();
    assert!(ui.last_view().manual_override);
    assert_eq!(ui.last_view().status, RelayStatus::Off);
    assert_eq!(hw.switch_calls(), 2);
}

#[test]
fn schedule_update_pauses_longer() {
    let mut rl = refresh_loop();
    let mut hw = MockHardware::new();
    let mut clock = FakeClock::at(10, 0);
    let window = ScheduleWindow::new(t(11, 0), t(12, 0));
    let mut ui = ScriptedDashboard::new().command_on_poll(1, AppCommand::UpdateSchedule(window));
    let mut sink = RecordingSink::default();

    let outcome = rl
        .run_cycle(&mut hw, &mut clock, &mut ui, &mut sink)
        .unwrap();

    assert_eq!(
        outcome,
        CycleOutcome::Restarted(Confirmation::ScheduleUpdated {
            override_cleared: false
        })
    );
    assert_eq!(clock.slept, vec![Duration::from_secs(2)]);
    // 10:00 is outside the new window: on by the tick, off by the update.
    assert_eq!(hw.calls, vec![RelayCall::TurnOn, RelayCall::TurnOff]);
    assert_eq!(rl.controller().window(), window);
}

#[test]
fn resume_reconciles_on_the_next_cycle() {
    let mut rl = refresh_loop();
    let mut hw = MockHardware::new();
    let mut clock = FakeClock::at(20, 0);
    let mut ui = ScriptedDashboard::new()
        .command_on_poll(1, AppCommand::Manual(RelayStatus::On))
        .command_on_poll(2, AppCommand::ResumeSchedule);
    let mut sink = RecordingSink::default();

    let first = rl.run_cycle(&mut hw, &mut clock, &mut ui, &mut sink).unwrap();
    assert_eq!(first, CycleOutcome::Restarted(Confirmation::ManualOn));
    let second = rl.run_cycle(&mut hw, &mut clock, &mut ui, &mut sink).unwrap();
    assert_eq!(second, CycleOutcome::Restarted(Confirmation::ScheduleResumed));

    // Resume itself drove nothing; the relay is still on.
    assert_eq!(hw.calls, vec![RelayCall::TurnOn]);
    assert_eq!(ui.last_view().status, RelayStatus::On);

    rl.run_cycle(&mut hw, &mut clock, &mut ui, &mut sink).unwrap();
    assert_eq!(hw.calls, vec![RelayCall::TurnOn, RelayCall::TurnOff]);
    assert!(!ui.last_view().manual_override);
    assert_eq!(rl.cycles(), 3);
}

#[test]
fn relay_failure_ends_the_cycle_with_an_error() {
    let mut rl = refresh_loop();
    let mut hw = MockHardware::new();
    hw.broken = true;
    let mut clock = FakeClock::at(10, 0);
    let mut ui = ScriptedDashboard::new();
    let mut sink = RecordingSink::default();

    let err = rl
        .run_cycle(&mut hw, &mut clock, &mut ui, &mut sink)
        .unwrap_err();
    assert!(matches!(err, Error::Actuator(_)));
    assert!(ui.views.is_empty());
}
