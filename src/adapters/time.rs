//! Wall-clock adapter.
//!
//! - **`target_os = "espidf"`**: `gettimeofday` + `localtime_r`, so the
//!   schedule follows whatever timezone `TZ` is set to.
//! - **`not(target_os = "espidf")`**: `chrono::Local`.
//!
//! Sleeping is a plain thread sleep on both targets; on ESP-IDF that
//! yields to FreeRTOS.

use core::cell::Cell;
use core::time::Duration;

use chrono::NaiveDateTime;

use crate::app::ports::ClockPort;

/// System clock for the refresh loop.
#[derive(Debug, Default)]
pub struct SystemClock {
    /// Set once the "clock not synced" warning has been logged.
    #[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
    warned_unsynced: Cell<bool>,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClockPort for SystemClock {
    #[cfg(target_os = "espidf")]
    fn now(&self) -> NaiveDateTime {
        use chrono::NaiveDate;
        use core::ptr;

        let mut tv = esp_idf_svc::sys::timeval {
            tv_sec: 0,
            tv_usec: 0,
        };
        // SAFETY: plain libc call writing into a stack value.
        if unsafe { esp_idf_svc::sys::gettimeofday(&mut tv, ptr::null_mut()) } != 0 {
            return NaiveDateTime::default();
        }
        // Anything before 2020-01-01 means SNTP never ran.
        const EPOCH_2020: i64 = 1_577_836_800;
        if tv.tv_sec < EPOCH_2020 && !self.warned_unsynced.replace(true) {
            log::warn!("clock: wall time not synced, schedule runs on time since boot");
        }
        let secs = tv.tv_sec as esp_idf_svc::sys::time_t;
        // SAFETY: `tm` is plain data; localtime_r fills it or returns null.
        let mut tm: esp_idf_svc::sys::tm = unsafe { core::mem::zeroed() };
        if unsafe { esp_idf_svc::sys::localtime_r(&secs, &mut tm) }.is_null() {
            return NaiveDateTime::default();
        }
        NaiveDate::from_ymd_opt(tm.tm_year + 1900, (tm.tm_mon + 1) as u32, tm.tm_mday as u32)
            .and_then(|d| d.and_hms_opt(tm.tm_hour as u32, tm.tm_min as u32, tm.tm_sec as u32))
            .unwrap_or_default()
    }

    #[cfg(not(target_os = "espidf"))]
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
