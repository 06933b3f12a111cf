//! Controller scenarios against the mock relay.

use chrono::NaiveTime;
use hydroverde::app::commands::AppCommand;
use hydroverde::app::events::{AppEvent, Confirmation, SwitchCause};
use hydroverde::app::service::{Controller, TickOutcome};
use hydroverde::control::RelayStatus;
use hydroverde::schedule::ScheduleWindow;

use crate::mock_hw::{MockHardware, RecordingSink, RelayCall};

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn nine_to_five() -> ScheduleWindow {
    ScheduleWindow::new(t(9, 0), t(17, 0))
}

#[test]
fn tick_inside_window_turns_relay_on_once() {
    let mut c = Controller::new(nine_to_five());
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::default();

    assert_eq!(
        c.tick(t(10, 0), &mut hw, &mut sink).unwrap(),
        TickOutcome::Switched(RelayStatus::On)
    );
    assert_eq!(c.status(), RelayStatus::On);
    assert_eq!(hw.calls, vec![RelayCall::TurnOn]);

    // Same instant again: nothing more to do.
    c.tick(t(10, 0), &mut hw, &mut sink).unwrap();
    assert_eq!(hw.switch_calls(), 1);
}

#[test]
fn manual_off_inside_window_sticks() {
    let mut c = Controller::new(nine_to_five());
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::default();
    c.tick(t(10, 0), &mut hw, &mut sink).unwrap();

    let confirmation = c
        .handle_command(AppCommand::Manual(RelayStatus::Off), t(10, 0), &mut hw, &mut sink)
        .unwrap();
    assert_eq!(confirmation, Confirmation::ManualOff);
    assert!(c.manual_override());
    assert_eq!(c.status(), RelayStatus::Off);
    assert_eq!(hw.last_call(), Some(RelayCall::TurnOff));

    for minute in 0..30 {
        assert_eq!(
            c.tick(t(10, minute), &mut hw, &mut sink).unwrap(),
            TickOutcome::Overridden
        );
    }
    assert_eq!(c.status(), RelayStatus::Off);
    assert_eq!(hw.switch_calls(), 2);
}

#[test]
fn overnight_window_switches_at_both_edges() {
    let mut c = Controller::new(ScheduleWindow::new(t(22, 0), t(6, 0)));
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::default();

    c.tick(t(21, 59), &mut hw, &mut sink).unwrap();
    assert_eq!(c.status(), RelayStatus::Off);
    c.tick(t(22, 0), &mut hw, &mut sink).unwrap();
    assert_eq!(c.status(), RelayStatus::On);
    c.tick(t(3, 0), &mut hw, &mut sink).unwrap();
    assert_eq!(c.status(), RelayStatus::On);
    c.tick(t(6, 0), &mut hw, &mut sink).unwrap();
    assert_eq!(c.status(), RelayStatus::Off);
    assert_eq!(hw.calls, vec![RelayCall::TurnOn, RelayCall::TurnOff]);
}

#[test]
fn update_schedule_resyncs_without_waiting_for_a_tick() {
    let mut c = Controller::new(nine_to_five());
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::default();
    c.handle_command(AppCommand::Manual(RelayStatus::On), t(12, 0), &mut hw, &mut sink)
        .unwrap();

    let confirmation = c
        .handle_command(
            AppCommand::UpdateSchedule(ScheduleWindow::new(t(13, 0), t(14, 0))),
            t(12, 0),
            &mut hw,
            &mut sink,
        )
        .unwrap();

    assert_eq!(
        confirmation,
        Confirmation::ScheduleUpdated {
            override_cleared: true
        }
    );
    assert_eq!(
        confirmation.message(),
        "Schedule updated! Resuming automated control."
    );
    assert!(!c.manual_override());
    assert_eq!(c.status(), RelayStatus::Off);
    assert_eq!(hw.calls, vec![RelayCall::TurnOn, RelayCall::TurnOff]);
    assert_eq!(c.window(), ScheduleWindow::new(t(13, 0), t(14, 0)));
}

#[test]
fn empty_window_keeps_relay_off() {
    let mut c = Controller::new(ScheduleWindow::new(t(8, 0), t(8, 0)));
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::default();
    for h in 0..24 {
        c.tick(t(h, 0), &mut hw, &mut sink).unwrap();
    }
    assert!(hw.calls.is_empty());
    assert_eq!(c.status(), RelayStatus::Off);
}

#[test]
fn events_describe_each_transition() {
    let mut c = Controller::new(nine_to_five());
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::default();

    c.start(&mut sink);
    c.tick(t(9, 0), &mut hw, &mut sink).unwrap();
    c.handle_command(AppCommand::Manual(RelayStatus::Off), t(9, 5), &mut hw, &mut sink)
        .unwrap();
    c.handle_command(AppCommand::ResumeSchedule, t(9, 6), &mut hw, &mut sink)
        .unwrap();

    assert_eq!(
        sink.events,
        vec![
            AppEvent::Started {
                status: RelayStatus::Off,
                window: nine_to_five(),
            },
            AppEvent::RelaySwitched {
                from: RelayStatus::Off,
                to: RelayStatus::On,
                cause: SwitchCause::Schedule,
                at: t(9, 0),
            },
            AppEvent::RelaySwitched {
                from: RelayStatus::On,
                to: RelayStatus::Off,
                cause: SwitchCause::Manual,
                at: t(9, 5),
            },
            AppEvent::OverrideEngaged(RelayStatus::Off),
            AppEvent::ScheduleResumed,
        ]
    );
}

#[test]
fn relay_failure_surfaces_and_state_is_kept() {
    let mut c = Controller::new(nine_to_five());
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::default();
    hw.broken = true;

    assert!(c.tick(t(10, 0), &mut hw, &mut sink).is_err());
    assert_eq!(c.status(), RelayStatus::Off);

    hw.broken = false;
    assert_eq!(
        c.tick(t(10, 0), &mut hw, &mut sink).unwrap(),
        TickOutcome::Switched(RelayStatus::On)
    );
}
