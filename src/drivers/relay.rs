//! Single-channel relay driver.
//!
//! Drives one output line through any embedded-hal [`OutputPin`].  Most
//! opto-isolated relay boards energise on a LOW input, so the active level
//! is configurable.
//!
//! This driver is a dumb actuator: it switches when told and remembers what
//! it last wrote.  Deciding *when* to switch belongs to the
//! [`Controller`](crate::app::service::Controller).

use embedded_hal::digital::{Error as _, OutputPin};
use log::debug;

use crate::control::RelayStatus;
use crate::error::ActuatorError;

/// Line level that energises the relay coil.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveLevel {
    High,
    Low,
}

impl ActiveLevel {
    pub fn from_active_low(active_low: bool) -> Self {
        if active_low { Self::Low } else { Self::High }
    }

    /// Line level (`true` = HIGH) for the requested coil state.
    pub fn level_for(self, energised: bool) -> bool {
        match self {
            Self::High => energised,
            Self::Low => !energised,
        }
    }
}

pub struct RelayDriver<P> {
    pin: P,
    active: ActiveLevel,
    status: RelayStatus,
}

impl<P: OutputPin> RelayDriver<P> {
    /// Wrap a configured pin.  Nothing is written until [`initialize`].
    ///
    /// [`initialize`]: Self::initialize
    pub fn new(pin: P, active: ActiveLevel) -> Self {
        Self {
            pin,
            active,
            status: RelayStatus::Off,
        }
    }

    /// Force the released state.
    pub fn initialize(&mut self) -> Result<(), ActuatorError> {
        self.drive(RelayStatus::Off)
    }

    pub fn turn_on(&mut self) -> Result<(), ActuatorError> {
        self.drive(RelayStatus::On)
    }

    pub fn turn_off(&mut self) -> Result<(), ActuatorError> {
        self.drive(RelayStatus::Off)
    }

    /// Last state successfully written to the line.
    pub fn status(&self) -> RelayStatus {
        self.status
    }

    pub fn active_level(&self) -> ActiveLevel {
        self.active
    }

    // Always re-asserts the line, even when `target` matches the cached
    // status, so a repeated command also corrects a line disturbed
    // elsewhere.
    fn drive(&mut self, target: RelayStatus) -> Result<(), ActuatorError> {
        let high = self.active.level_for(target.is_on());
        let result = if high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        result.map_err(|e| ActuatorError::GpioWriteFailed(e.kind()))?;
        debug!("relay: {} (line {})", target, if high { "HIGH" } else { "LOW" });
        self.status = target;
        Ok(())
    }

    /// Give the pin back.
    pub fn release(self) -> P {
        self.pin
    }
}
