//! Fuzz target: `AppCommand::from_str`
//!
//! Feeds arbitrary console lines to the command parser and checks that it
//! never panics and that every accepted schedule command carries valid
//! times of day.
//!
//! cargo fuzz run fuzz_command_parser

#![no_main]

use chrono::Timelike;
use hydroverde::app::commands::AppCommand;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(line) = core::str::from_utf8(data) else {
        return;
    };
    if let Ok(AppCommand::UpdateSchedule(w)) = line.parse::<AppCommand>() {
        assert!(w.start.nanosecond() < 1_000_000_000, "leap second accepted");
        assert!(w.end.nanosecond() < 1_000_000_000, "leap second accepted");
    }
});
