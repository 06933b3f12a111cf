//! Unified error types for the HydroVerde firmware.
//!
//! A single `Error` enum for everything that can stop the firmware: relay
//! writes, peripheral setup and configuration.  Sensor faults have their
//! own [`SensorError`] and stay inside the sensor subsystem, which degrades
//! to empty samples instead of failing.  All variants are `Copy`.

use core::fmt;

use embedded_hal::digital::ErrorKind;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Fatal firmware errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A relay command failed.
    Actuator(ActuatorError),
    /// Peripheral initialisation failed.
    Init(HwInitError),
    /// Configuration is invalid or could not be parsed.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Init(e) => write!(f, "init: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// A protocol phase did not complete in time (glitch or device absent).
    Timeout,
    /// The frame checksum did not match the payload.
    Checksum { expected: u8, actual: u8 },
    /// Reading is outside the physically plausible range.
    OutOfRange,
    /// The data line could not be driven or sampled.
    Gpio(ErrorKind),
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timed out waiting for sensor"),
            Self::Checksum { expected, actual } => {
                write!(f, "checksum mismatch (expected 0x{expected:02x}, got 0x{actual:02x})")
            }
            Self::OutOfRange => write!(f, "reading out of range"),
            Self::Gpio(kind) => write!(f, "GPIO error ({kind:?})"),
        }
    }
}

impl std::error::Error for SensorError {}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// GPIO set failed.
    GpioWriteFailed(ErrorKind),
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioWriteFailed(kind) => write!(f, "GPIO write failed ({kind:?})"),
        }
    }
}

impl std::error::Error for ActuatorError {}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Initialisation errors
// ---------------------------------------------------------------------------

/// Errors during one-shot peripheral initialisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    /// `gpio_config` rejected the pin (carries the ESP-IDF return code).
    GpioConfigFailed(i32),
    /// The pin number does not exist on this chip.
    InvalidPin(i32),
}

impl fmt::Display for HwInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={rc})"),
            Self::InvalidPin(pin) => write!(f, "GPIO {pin} does not exist"),
        }
    }
}

impl std::error::Error for HwInitError {}

impl From<HwInitError> for Error {
    fn from(e: HwInitError) -> Self {
        Self::Init(e)
    }
}
