//! GPIO pin assignments for the HydroVerde controller board.
//!
//! [`SystemConfig`] defaults for the factory wiring are taken from here.
//!
//! [`SystemConfig`]: crate::config::SystemConfig

// ---------------------------------------------------------------------------
// Relay module (opto-isolated, active LOW)
// ---------------------------------------------------------------------------

/// Digital output driving the relay coil input.
/// LOW = relay energised (pump/light on), HIGH = released.
pub const RELAY_GPIO: i32 = 17;
/// The relay board energises on a LOW input.
pub const RELAY_ACTIVE_LOW: bool = true;

// ---------------------------------------------------------------------------
// DHT11 temperature / humidity sensor
// ---------------------------------------------------------------------------

/// Single-wire data line, open-drain with pull-up.
pub const DHT_GPIO: i32 = 4;

/// Highest GPIO number on the ESP32-S3.
pub const MAX_GPIO: i32 = 48;
