//! Daily schedule window and its evaluator.
//!
//! A [`ScheduleWindow`] is a recurring `start..end` time-of-day range during
//! which the relay should be energised.  Windows with `start > end` wrap
//! across midnight:
//!
//! ```text
//!  same-day   09:00 ──────── 17:00
//!  00:00 ─────[##############)──────────── 24:00
//!
//!  overnight  22:00 ──▶ 06:00
//!  00:00 ##########)──────────────[######## 24:00
//! ```

use core::fmt;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Is the relay scheduled to be on at `now` for the window `start..end`?
///
/// * `start < end`: on iff `start <= now < end`.
/// * `start > end`: overnight, on iff `now >= start || now < end`.
/// * `start == end`: empty window, always off.
pub fn is_scheduled_on(now: NaiveTime, start: NaiveTime, end: NaiveTime) -> bool {
    if start < end {
        now >= start && now < end
    } else if start > end {
        now >= start || now < end
    } else {
        false
    }
}

/// `false` for a leap second (`HH:MM:60`), which chrono can represent but
/// no schedule bound may name.
pub fn is_time_of_day(t: NaiveTime) -> bool {
    t.nanosecond() < 1_000_000_000
}

/// A daily recurring on-window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleWindow {
    /// Time of day the relay switches on.
    pub start: NaiveTime,
    /// Time of day the relay switches off (exclusive).
    pub end: NaiveTime,
}

impl ScheduleWindow {
    pub const fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Build a window from whole hours and minutes.  `None` if either
    /// time-of-day is out of range.
    pub fn from_hm(start: (u32, u32), end: (u32, u32)) -> Option<Self> {
        Some(Self {
            start: NaiveTime::from_hms_opt(start.0, start.1, 0)?,
            end: NaiveTime::from_hms_opt(end.0, end.1, 0)?,
        })
    }

    /// Whether the relay should be on at `now`.
    pub fn is_active_at(&self, now: NaiveTime) -> bool {
        is_scheduled_on(now, self.start, self.end)
    }

    pub fn is_overnight(&self) -> bool {
        self.start > self.end
    }

    /// Both bounds are plain times of day.
    pub fn is_valid(&self) -> bool {
        is_time_of_day(self.start) && is_time_of_day(self.end)
    }

    /// `start == end`: never on.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl Default for ScheduleWindow {
    /// 05:30 to 09:30, the factory watering window.
    fn default() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(5, 30, 0).unwrap_or(NaiveTime::MIN),
            end: NaiveTime::from_hms_opt(9, 30, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

impl fmt::Display for ScheduleWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}
