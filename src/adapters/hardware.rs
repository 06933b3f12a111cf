//! Hardware adapter: bridges the relay driver and climate sensor to the
//! domain port traits.
//!
//! Owns the [`RelayDriver`] and [`ClimateSensor`], exposing them through
//! [`RelayPort`] and [`SensorPort`].  Generic over the pin and timer types,
//! so the same adapter runs on ESP-IDF [`GpioLine`]s and on host mocks.
//!
//! [`GpioLine`]: crate::drivers::hw_init::GpioLine

use embedded_hal::digital::{InputPin, OutputPin};

use crate::app::ports::{RelayPort, SensorPort};
use crate::control::RelayStatus;
use crate::drivers::RelayDriver;
use crate::error::ActuatorError;
use crate::sensors::dht11::PulseTimer;
use crate::sensors::{ClimateSensor, SensorSample};

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<R, S, D> {
    relay: RelayDriver<R>,
    sensor: ClimateSensor<S, D>,
}

impl<R, S, D> HardwareAdapter<R, S, D>
where
    R: OutputPin,
    S: InputPin + OutputPin,
    D: PulseTimer,
{
    pub fn new(relay: RelayDriver<R>, sensor: ClimateSensor<S, D>) -> Self {
        Self { relay, sensor }
    }

    /// Last state written to the relay line.
    pub fn relay_status(&self) -> RelayStatus {
        self.relay.status()
    }

    pub fn sensor_present(&self) -> bool {
        self.sensor.is_present()
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<R, S, D> SensorPort for HardwareAdapter<R, S, D>
where
    R: OutputPin,
    S: InputPin + OutputPin,
    D: PulseTimer,
{
    fn read(&mut self) -> SensorSample {
        self.sensor.read()
    }
}

// ── RelayPort implementation ──────────────────────────────────

impl<R, S, D> RelayPort for HardwareAdapter<R, S, D>
where
    R: OutputPin,
    S: InputPin + OutputPin,
    D: PulseTimer,
{
    fn initialize(&mut self) -> Result<(), ActuatorError> {
        self.relay.initialize()
    }

    fn turn_on(&mut self) -> Result<(), ActuatorError> {
        self.relay.turn_on()
    }

    fn turn_off(&mut self) -> Result<(), ActuatorError> {
        self.relay.turn_off()
    }
}
