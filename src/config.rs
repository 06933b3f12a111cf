//! System configuration parameters
//!
//! All tunable parameters for the HydroVerde controller.  Nothing is
//! persisted: the firmware boots from [`SystemConfig::default`], optionally
//! overridden by a JSON document baked in at build time.

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::pins;
use crate::schedule::ScheduleWindow;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Relay ---
    /// GPIO driving the relay module.
    pub relay_gpio: i32,
    /// `true` if the relay energises on a LOW line.
    pub relay_active_low: bool,

    // --- Sensor ---
    /// GPIO carrying the DHT11 data line.
    pub sensor_gpio: i32,

    // --- Schedule ---
    /// Initial daily on-window.
    pub schedule: ScheduleWindow,

    // --- Timing ---
    /// Refresh loop period (milliseconds)
    pub refresh_interval_ms: u32,
    /// How often the console is polled for commands while waiting (milliseconds)
    pub command_poll_ms: u32,
    /// Pause after a manual or resume confirmation (milliseconds)
    pub confirm_pause_ms: u32,
    /// Pause after a schedule update confirmation (milliseconds)
    pub schedule_confirm_pause_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Relay
            relay_gpio: pins::RELAY_GPIO,
            relay_active_low: pins::RELAY_ACTIVE_LOW,

            // Sensor
            sensor_gpio: pins::DHT_GPIO,

            // Schedule
            schedule: ScheduleWindow::default(),

            // Timing
            refresh_interval_ms: 5000,      // 0.2 Hz
            command_poll_ms: 100,
            confirm_pause_ms: 1000,
            schedule_confirm_pause_ms: 2000,
        }
    }
}

impl SystemConfig {
    /// Parse an override document and validate it.  Missing fields keep
    /// their defaults.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: Self =
            serde_json::from_str(json).map_err(|_| Error::Config("malformed config JSON"))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the refresh loop or hardware layer cannot honour.
    pub fn validate(&self) -> Result<(), Error> {
        if self.relay_gpio < 0 || self.relay_gpio > pins::MAX_GPIO {
            return Err(Error::Config("relay_gpio out of range"));
        }
        if self.sensor_gpio < 0 || self.sensor_gpio > pins::MAX_GPIO {
            return Err(Error::Config("sensor_gpio out of range"));
        }
        if self.relay_gpio == self.sensor_gpio {
            return Err(Error::Config("relay and sensor share a GPIO"));
        }
        if !self.schedule.is_valid() {
            return Err(Error::Config("schedule bound is not a time of day"));
        }
        if self.refresh_interval_ms == 0 {
            return Err(Error::Config("refresh_interval_ms must be non-zero"));
        }
        if self.command_poll_ms == 0 {
            return Err(Error::Config("command_poll_ms must be non-zero"));
        }
        if self.command_poll_ms > self.refresh_interval_ms {
            return Err(Error::Config(
                "command_poll_ms must not exceed refresh_interval_ms",
            ));
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.refresh_interval_ms))
    }

    pub fn command_poll(&self) -> Duration {
        Duration::from_millis(u64::from(self.command_poll_ms))
    }

    pub fn confirm_pause(&self) -> Duration {
        Duration::from_millis(u64::from(self.confirm_pause_ms))
    }

    pub fn schedule_confirm_pause(&self) -> Duration {
        Duration::from_millis(u64::from(self.schedule_confirm_pause_ms))
    }
}
