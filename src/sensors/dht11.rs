//! DHT11 temperature / humidity sensor (single-wire, bit-banged).
//!
//! ## Protocol
//!
//! ```text
//!  host start      sensor response        bit "0"        bit "1"
//!  ▔▔╲______╱▔▔▔▔╲________╱▔▔▔▔▔▔▔▔╲_____╱▔▔▔╲_____╱▔▔▔▔▔▔▔▔╲ ...
//!     ≥18 ms  20-40µs  80 µs     80 µs   50 µs 26µs 50 µs  70 µs
//! ```
//!
//! 40 bits follow the response, MSB first:
//! `[rh_int, rh_dec, t_int, t_dec, checksum]`.  The checksum is the low
//! byte of the sum of the first four bytes.  Bit 7 of `t_dec` flags a
//! negative temperature on newer parts.
//!
//! The line must be open-drain with a pull-up: the driver releases it by
//! writing HIGH and then samples it as an input.
//!
//! Pulse widths are measured against a free-running microsecond counter
//! ([`PulseTimer`]), not by counting delay steps, so GPIO and call
//! overhead inside the polling loop do not skew the 0/1 decision.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::error::SensorError;

/// Host start signal length.
const START_LOW_MS: u32 = 18;
/// Longest any single protocol phase may last before the read is abandoned.
const PHASE_TIMEOUT_US: u32 = 100;
/// High pulses longer than this encode a `1`.
const ONE_THRESHOLD_US: u32 = 40;

const HUMIDITY_RANGE: core::ops::RangeInclusive<f32> = 0.0..=100.0;
const TEMPERATURE_RANGE: core::ops::RangeInclusive<f32> = -40.0..=80.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dht11Measurement {
    pub temperature_c: f32,
    pub humidity_pct: f32,
}

/// Validate and decode a raw 5-byte frame.
pub fn decode_frame(frame: [u8; 5]) -> Result<Dht11Measurement, SensorError> {
    let expected = frame[..4].iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    if expected != frame[4] {
        return Err(SensorError::Checksum {
            expected,
            actual: frame[4],
        });
    }

    let humidity_pct = f32::from(frame[0]) + f32::from(frame[1]) / 10.0;
    let magnitude = f32::from(frame[2]) + f32::from(frame[3] & 0x7f) / 10.0;
    let temperature_c = if frame[3] & 0x80 == 0 {
        magnitude
    } else {
        -magnitude
    };

    if !HUMIDITY_RANGE.contains(&humidity_pct) || !TEMPERATURE_RANGE.contains(&temperature_c) {
        return Err(SensorError::OutOfRange);
    }

    Ok(Dht11Measurement {
        temperature_c,
        humidity_pct,
    })
}

/// Delay source plus a monotonic microsecond counter.
pub trait PulseTimer: DelayNs {
    fn now_us(&mut self) -> u64;
}

/// `esp_timer` timestamps with `Ets` busy-wait delays.
#[cfg(target_os = "espidf")]
#[derive(Debug, Clone, Copy, Default)]
pub struct EspPulseTimer;

#[cfg(target_os = "espidf")]
impl DelayNs for EspPulseTimer {
    fn delay_ns(&mut self, ns: u32) {
        esp_idf_hal::delay::Ets.delay_ns(ns);
    }
}

#[cfg(target_os = "espidf")]
impl PulseTimer for EspPulseTimer {
    fn now_us(&mut self) -> u64 {
        // SAFETY: reads the high-resolution timer; no preconditions.
        let us = unsafe { esp_idf_sys::esp_timer_get_time() };
        u64::try_from(us).unwrap_or(0)
    }
}

fn gpio_err<E: embedded_hal::digital::Error>(e: E) -> SensorError {
    SensorError::Gpio(e.kind())
}

/// Bit-banging DHT11 driver over any open-drain embedded-hal pin.
pub struct Dht11<P, T> {
    pin: P,
    timer: T,
}

impl<P, T> Dht11<P, T>
where
    P: InputPin + OutputPin,
    T: PulseTimer,
{
    pub fn new(pin: P, timer: T) -> Self {
        Self { pin, timer }
    }

    /// Perform one full transaction.  Takes ~25 ms, dominated by the
    /// start signal.
    pub fn read(&mut self) -> Result<Dht11Measurement, SensorError> {
        let frame = self.read_frame()?;
        decode_frame(frame)
    }

    fn read_frame(&mut self) -> Result<[u8; 5], SensorError> {
        self.pin.set_low().map_err(gpio_err)?;
        self.timer.delay_ms(START_LOW_MS);
        self.pin.set_high().map_err(gpio_err)?;

        // Sensor acknowledges: pulls low, then high, then starts bit 0.
        self.wait_while(true)?;
        self.wait_while(false)?;
        self.wait_while(true)?;

        let mut frame = [0u8; 5];
        for bit in 0..40 {
            self.wait_while(false)?;
            let high_us = self.wait_while(true)?;
            if high_us > ONE_THRESHOLD_US {
                frame[bit / 8] |= 0x80 >> (bit % 8);
            }
        }
        Ok(frame)
    }

    /// Spin while the line reads `level`; returns the time spent in µs.
    fn wait_while(&mut self, level: bool) -> Result<u32, SensorError> {
        let started = self.timer.now_us();
        loop {
            let elapsed_us = self.timer.now_us().saturating_sub(started);
            let elapsed_us = u32::try_from(elapsed_us).unwrap_or(u32::MAX);
            if self.pin.is_high().map_err(gpio_err)? != level {
                return Ok(elapsed_us);
            }
            if elapsed_us >= PHASE_TIMEOUT_US {
                return Err(SensorError::Timeout);
            }
            self.timer.delay_us(1);
        }
    }

    /// Give the pin and timer back.
    pub fn release(self) -> (P, T) {
        (self.pin, self.timer)
    }
}
