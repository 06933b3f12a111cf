//! One-shot GPIO initialisation for the relay and sensor lines.
//!
//! Each line is configured at most once per process.  The first call to
//! [`init_relay_line`] / [`init_sensor_line`] configures the pin with raw
//! ESP-IDF sys calls and caches the outcome, success or failure; later
//! calls return the cached handle (or the cached error) without touching
//! the hardware again.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: real `gpio_config` / `gpio_set_level` / `gpio_get_level`.
//! On host/test: a per-pin level table in memory.  Open-drain lines read
//! back whatever was last written, idling HIGH like a pulled-up bus.

use std::sync::OnceLock;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use log::{info, warn};

#[cfg(target_os = "espidf")]
use esp_idf_sys::*;

use crate::drivers::relay::ActiveLevel;
use crate::error::HwInitError;
use crate::pins;

// ── Line handle ───────────────────────────────────────────────

/// A configured GPIO.  Only obtainable from the init functions below, so
/// holding one proves the pin was set up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpioLine {
    pin: i32,
}

impl GpioLine {
    pub fn pin(&self) -> i32 {
        self.pin
    }
}

impl ErrorType for GpioLine {
    type Error = core::convert::Infallible;
}

impl OutputPin for GpioLine {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        gpio_write(self.pin, false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        gpio_write(self.pin, true);
        Ok(())
    }
}

impl InputPin for GpioLine {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(gpio_read(self.pin))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!gpio_read(self.pin))
    }
}

// ── Memoised init ─────────────────────────────────────────────

static RELAY_LINE: OnceLock<Result<GpioLine, HwInitError>> = OnceLock::new();
static SENSOR_LINE: OnceLock<Result<GpioLine, HwInitError>> = OnceLock::new();

/// Configure the relay pin as a push-pull output, parked at its released
/// level before the output driver is enabled.
pub fn init_relay_line(pin: i32, active: ActiveLevel) -> Result<GpioLine, HwInitError> {
    let line = *RELAY_LINE.get_or_init(|| {
        let idle_high = active.level_for(false);
        configure_output(pin, idle_high)?;
        info!("hw_init: relay on GPIO{} ({:?}), released", pin, active);
        Ok(GpioLine { pin })
    });
    warn_if_rebound("relay", pin, &line);
    line
}

/// Configure the DHT11 data pin as open-drain with pull-up, released HIGH.
pub fn init_sensor_line(pin: i32) -> Result<GpioLine, HwInitError> {
    let line = *SENSOR_LINE.get_or_init(|| {
        configure_open_drain(pin)?;
        info!("hw_init: DHT11 data line on GPIO{}", pin);
        Ok(GpioLine { pin })
    });
    warn_if_rebound("sensor", pin, &line);
    line
}

fn warn_if_rebound(what: &str, pin: i32, line: &Result<GpioLine, HwInitError>) {
    if let Ok(l) = line {
        if l.pin != pin {
            warn!(
                "hw_init: {} already bound to GPIO{}, ignoring GPIO{}",
                what, l.pin, pin
            );
        }
    }
}

fn check_pin(pin: i32) -> Result<(), HwInitError> {
    if (0..=pins::MAX_GPIO).contains(&pin) {
        Ok(())
    } else {
        Err(HwInitError::InvalidPin(pin))
    }
}

// ── ESP-IDF backend ───────────────────────────────────────────

#[cfg(target_os = "espidf")]
fn configure_output(pin: i32, idle_high: bool) -> Result<(), HwInitError> {
    check_pin(pin)?;
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pin,
        mode: gpio_mode_t_GPIO_MODE_OUTPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    // SAFETY: called once per pin from the OnceLock initialiser; the
    // output latch is written before the driver is enabled so the relay
    // never glitches to its active level.
    unsafe {
        gpio_set_level(pin, u32::from(idle_high));
        let ret = gpio_config(&cfg);
        if ret != ESP_OK as i32 {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
        gpio_set_level(pin, u32::from(idle_high));
    }
    Ok(())
}

#[cfg(target_os = "espidf")]
fn configure_open_drain(pin: i32) -> Result<(), HwInitError> {
    check_pin(pin)?;
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pin,
        mode: gpio_mode_t_GPIO_MODE_INPUT_OUTPUT_OD,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    // SAFETY: called once per pin from the OnceLock initialiser.
    unsafe {
        let ret = gpio_config(&cfg);
        if ret != ESP_OK as i32 {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
        gpio_set_level(pin, 1);
    }
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: pin was configured by one of the init functions above.
    unsafe {
        gpio_set_level(pin, u32::from(high));
    }
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: register read on a configured pin.
    (unsafe { gpio_get_level(pin) }) != 0
}

// ── Host simulation ───────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
mod sim {
    use core::sync::atomic::{AtomicBool, AtomicUsize};

    pub const PIN_COUNT: usize = crate::pins::MAX_GPIO as usize + 1;

    pub static LEVELS: [AtomicBool; PIN_COUNT] = [const { AtomicBool::new(true) }; PIN_COUNT];
    pub static CONFIGURE_CALLS: AtomicUsize = AtomicUsize::new(0);
}

#[cfg(not(target_os = "espidf"))]
fn configure_output(pin: i32, idle_high: bool) -> Result<(), HwInitError> {
    use core::sync::atomic::Ordering;
    check_pin(pin)?;
    sim::CONFIGURE_CALLS.fetch_add(1, Ordering::Relaxed);
    gpio_write(pin, idle_high);
    info!("hw_init(sim): GPIO{} output", pin);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
fn configure_open_drain(pin: i32) -> Result<(), HwInitError> {
    use core::sync::atomic::Ordering;
    check_pin(pin)?;
    sim::CONFIGURE_CALLS.fetch_add(1, Ordering::Relaxed);
    gpio_write(pin, true);
    info!("hw_init(sim): GPIO{} open-drain", pin);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(pin: i32, high: bool) {
    use core::sync::atomic::Ordering;
    if let Some(level) = usize::try_from(pin).ok().and_then(|i| sim::LEVELS.get(i)) {
        level.store(high, Ordering::Relaxed);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(pin: i32) -> bool {
    use core::sync::atomic::Ordering;
    usize::try_from(pin)
        .ok()
        .and_then(|i| sim::LEVELS.get(i))
        .is_none_or(|level| level.load(Ordering::Relaxed))
}

/// Number of pin configurations performed so far (simulation only).
#[cfg(not(target_os = "espidf"))]
pub fn sim_configure_calls() -> usize {
    sim::CONFIGURE_CALLS.load(core::sync::atomic::Ordering::Relaxed)
}
