//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (UART / USB-CDC in production).

use log::{info, warn};

use crate::app::events::{AppEvent, SwitchCause};
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { status, window } => {
                info!("START | relay={} | schedule {}", status, window);
            }
            AppEvent::RelaySwitched {
                from,
                to,
                cause,
                at,
            } => {
                let by = match cause {
                    SwitchCause::Schedule => "schedule",
                    SwitchCause::Manual => "operator",
                };
                info!(
                    "RELAY | Relay turned {} by {} at {} (was {})",
                    to,
                    by,
                    at.format("%H:%M:%S"),
                    from
                );
            }
            AppEvent::OverrideEngaged(status) => {
                warn!("OVERRIDE | relay held {}; schedule paused", status);
            }
            AppEvent::ScheduleResumed => {
                info!("OVERRIDE | cleared; schedule back in control");
            }
            AppEvent::ScheduleUpdated {
                window,
                override_cleared,
            } => {
                info!(
                    "SCHEDULE | now {}{}",
                    window,
                    if *override_cleared {
                        " (override cleared)"
                    } else {
                        ""
                    }
                );
            }
        }
    }
}
