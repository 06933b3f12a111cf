//! Sensor subsystem: the DHT11 driver and the best-effort [`ClimateSensor`]
//! wrapper the refresh loop reads through.
//!
//! Sensor trouble never reaches the control loop as an error.  A failed
//! read yields an empty [`SensorSample`], and [`SensorReading`] keeps the
//! last good value of each field.

pub mod dht11;

use core::fmt;

use embedded_hal::digital::{InputPin, OutputPin};
use log::{info, warn};

use dht11::{Dht11, PulseTimer};

/// One read attempt.  `None` fields were not obtained.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SensorSample {
    pub temperature_c: Option<f32>,
    pub humidity_pct: Option<f32>,
}

impl SensorSample {
    pub fn is_empty(&self) -> bool {
        self.temperature_c.is_none() && self.humidity_pct.is_none()
    }
}

/// Latest known climate values, as displayed.
///
/// Fields start as `None` and are only ever replaced by a newer `Some`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SensorReading {
    pub temperature_c: Option<f32>,
    pub humidity_pct: Option<f32>,
}

impl SensorReading {
    /// Merge a sample: each present field overwrites, absent ones keep the
    /// previous value.
    pub fn update(&mut self, sample: SensorSample) {
        if let Some(t) = sample.temperature_c {
            self.temperature_c = Some(t);
        }
        if let Some(h) = sample.humidity_pct {
            self.humidity_pct = Some(h);
        }
    }

    pub fn temperature(&self) -> Labelled {
        Labelled(self.temperature_c, "°C")
    }

    pub fn humidity(&self) -> Labelled {
        Labelled(self.humidity_pct, "%")
    }
}

/// A display value with unit, rendered as `N/A` when unknown.
#[derive(Debug, Clone, Copy)]
pub struct Labelled(Option<f32>, &'static str);

impl fmt::Display for Labelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{:.1}{}", v, self.1),
            None => f.write_str("N/A"),
        }
    }
}

/// DHT11 wrapper that tolerates a missing or flaky device.
///
/// Built with `None` when the data line could not be initialised; every
/// read then returns an empty sample without touching hardware.
pub struct ClimateSensor<P, D> {
    driver: Option<Dht11<P, D>>,
    consecutive_failures: u32,
}

impl<P, D> ClimateSensor<P, D>
where
    P: InputPin + OutputPin,
    D: PulseTimer,
{
    pub fn new(driver: Option<Dht11<P, D>>) -> Self {
        if driver.is_none() {
            warn!("Climate sensor unavailable; readings will show N/A");
        }
        Self {
            driver,
            consecutive_failures: 0,
        }
    }

    pub fn is_present(&self) -> bool {
        self.driver.is_some()
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn read(&mut self) -> SensorSample {
        let Some(dht) = self.driver.as_mut() else {
            return SensorSample::default();
        };
        match dht.read() {
            Ok(m) => {
                if self.consecutive_failures > 0 {
                    info!(
                        "DHT11 recovered after {} failed reads",
                        self.consecutive_failures
                    );
                }
                self.consecutive_failures = 0;
                SensorSample {
                    temperature_c: Some(m.temperature_c),
                    humidity_pct: Some(m.humidity_pct),
                }
            }
            Err(e) => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                warn!(
                    "DHT11 read failed ({} in a row): {}",
                    self.consecutive_failures, e
                );
                SensorSample::default()
            }
        }
    }
}
