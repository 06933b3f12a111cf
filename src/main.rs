//! HydroVerde Firmware: Main Entry Point
//!
//! Hexagonal architecture driven by a single cooperative refresh loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter    ConsoleDashboard   LogEventSink  SystemClock│
//! │  (Sensor + Relay)   (DashboardPort)    (EventSink)   (Clock)   │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │   RefreshLoop ─▶ Controller ─▶ ControlState (pure)      │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```

use anyhow::Result;
use log::{error, info, warn};

use hydroverde::adapters::console::ConsoleDashboard;
use hydroverde::adapters::hardware::HardwareAdapter;
use hydroverde::adapters::log_sink::LogEventSink;
use hydroverde::adapters::time::SystemClock;
use hydroverde::app::ports::RelayPort;
use hydroverde::app::service::Controller;
use hydroverde::config::SystemConfig;
use hydroverde::drivers::hw_init;
use hydroverde::drivers::{ActiveLevel, RelayDriver};
use hydroverde::error::Error;
use hydroverde::refresh::{RefreshLoop, RefreshTiming};
use hydroverde::sensors::ClimateSensor;
use hydroverde::sensors::dht11::{Dht11, EspPulseTimer};

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  HydroVerde v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration (defaults or build-time override) ───
    let config = match option_env!("HYDROVERDE_CONFIG") {
        Some(json) => {
            info!("Config: applying build-time override");
            SystemConfig::from_json(json)?
        }
        None => {
            let config = SystemConfig::default();
            config.validate()?;
            config
        }
    };
    match serde_json::to_string(&config) {
        Ok(json) => info!("Config: {}", json),
        Err(_) => warn!("Config: could not serialise for display"),
    }

    // ── 3. Relay (mandatory) ──────────────────────────────────
    let active = ActiveLevel::from_active_low(config.relay_active_low);
    let relay_line = hw_init::init_relay_line(config.relay_gpio, active)
        .map_err(Error::from)
        .inspect_err(|e| error!("Relay init failed: {}, halting", e))?;
    let relay = RelayDriver::new(relay_line, active);

    // ── 4. Climate sensor (optional) ─────────────────────────
    let dht = match hw_init::init_sensor_line(config.sensor_gpio) {
        Ok(line) => Some(Dht11::new(line, EspPulseTimer)),
        Err(e) => {
            error!("DHT11 init failed: {}, continuing without climate readings", e);
            None
        }
    };

    // ── 5. Construct adapters ─────────────────────────────────
    let mut hw = HardwareAdapter::new(relay, ClimateSensor::new(dht));
    hw.initialize()
        .map_err(Error::from)
        .inspect_err(|e| error!("Relay could not be released: {}, halting", e))?;
    let mut clock = SystemClock::new();
    let mut dashboard = ConsoleDashboard::stdin()?;
    let mut log_sink = LogEventSink::new();

    // ── 6. Controller + refresh loop ──────────────────────────
    let mut controller = Controller::new(config.schedule);
    controller.start(&mut log_sink);
    let mut refresh = RefreshLoop::new(controller, RefreshTiming::from(&config));

    info!("System ready. Entering refresh loop.");

    let Err(e) = refresh.run(&mut hw, &mut clock, &mut dashboard, &mut log_sink);
    error!("Relay control lost: {}, halting", e);
    Err(e.into())
}
