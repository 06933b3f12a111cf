//! Inbound operator commands.
//!
//! Commands arrive as text lines from the dashboard and are parsed with
//! [`str::parse`]:
//!
//! ```text
//! on | off | resume | schedule HH:MM[:SS] HH:MM[:SS]
//! ```
//!
//! Keywords are case-insensitive.

use core::fmt;
use core::str::FromStr;

use chrono::NaiveTime;

use crate::control::RelayStatus;
use crate::schedule::{ScheduleWindow, is_time_of_day};

/// Commands the dashboard can send into the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Force the relay on or off and suspend the schedule.
    Manual(RelayStatus),

    /// Hand control back to the schedule.
    ResumeSchedule,

    /// Replace the schedule window and resume schedule control.
    UpdateSchedule(ScheduleWindow),
}

/// Why a command line was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandParseError {
    Empty,
    Unknown,
    MissingArgument,
    UnexpectedArgument,
    InvalidTime,
}

impl fmt::Display for CommandParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty command"),
            Self::Unknown => write!(f, "unknown command (try on, off, resume, schedule)"),
            Self::MissingArgument => write!(f, "usage: schedule HH:MM HH:MM"),
            Self::UnexpectedArgument => write!(f, "unexpected argument"),
            Self::InvalidTime => write!(f, "invalid time of day"),
        }
    }
}

impl std::error::Error for CommandParseError {}

/// Parse `HH:MM:SS` or `HH:MM` (24 h).
pub fn parse_time_of_day(s: &str) -> Result<NaiveTime, CommandParseError> {
    let time = NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|_| CommandParseError::InvalidTime)?;
    if !is_time_of_day(time) {
        return Err(CommandParseError::InvalidTime);
    }
    Ok(time)
}

impl FromStr for AppCommand {
    type Err = CommandParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let keyword = words.next().ok_or(CommandParseError::Empty)?;

        let cmd = if keyword.eq_ignore_ascii_case("on") {
            Self::Manual(RelayStatus::On)
        } else if keyword.eq_ignore_ascii_case("off") {
            Self::Manual(RelayStatus::Off)
        } else if keyword.eq_ignore_ascii_case("resume") {
            Self::ResumeSchedule
        } else if keyword.eq_ignore_ascii_case("schedule") {
            let start = words.next().ok_or(CommandParseError::MissingArgument)?;
            let end = words.next().ok_or(CommandParseError::MissingArgument)?;
            Self::UpdateSchedule(ScheduleWindow::new(
                parse_time_of_day(start)?,
                parse_time_of_day(end)?,
            ))
        } else {
            return Err(CommandParseError::Unknown);
        };

        if words.next().is_some() {
            return Err(CommandParseError::UnexpectedArgument);
        }
        Ok(cmd)
    }
}
