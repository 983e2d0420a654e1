//! Oil transfer station firmware entry point.
//!
//! Hexagonal architecture driven by a fixed-rate polling loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter        LogEventSink   NvsAdapter   Esp32Time  │
//! │  (Input+Output+Display) (EventSink)    (Config+NVS) (clock)    │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              StationService (pure logic)               │    │
//! │  │  FSM · Safety · Flow debounce · Reset · Volume         │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::{Ets, FreeRtos};
use esp_idf_hal::gpio::PinDriver;
use esp_idf_hal::peripherals::Peripherals;
use log::{info, warn};

use oilstation::adapters::display::SegmentDisplay;
use oilstation::adapters::hardware::{HardwareAdapter, OutputLines};
use oilstation::adapters::log_sink::LogEventSink;
use oilstation::adapters::nvs::NvsAdapter;
use oilstation::adapters::time::Esp32TimeAdapter;
use oilstation::app::service::StationService;
use oilstation::config::load_or_restore;
use oilstation::drivers::hw_init;
use oilstation::drivers::indicator::IndicatorLed;
use oilstation::drivers::relay::RelayDriver;
use oilstation::drivers::tm1637::Tm1637;
use oilstation::pins;
use oilstation::sensors::button::FillButton;
use oilstation::sensors::flow::FlowMeter;
use oilstation::sensors::level::LevelSwitch;
use oilstation::sensors::InputLines;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Oil Station v{}                  ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Park every output before anything else runs ────────
    if let Err(e) = hw_init::init_peripherals() {
        anyhow::bail!("HAL init failed: {e}");
    }

    // ── 3. Load config from NVS (or defaults) ─────────────────
    let mut nvs = match NvsAdapter::new() {
        Ok(n) => n,
        Err(e) => {
            warn!("NVS init failed ({}), volume will not survive a reboot", e);
            NvsAdapter::default()
        }
    };
    let config = load_or_restore(&nvs);

    // ── 4. Construct adapters ─────────────────────────────────
    let peripherals = Peripherals::take()?;
    let clk = PinDriver::output(peripherals.pins.gpio17)?;
    // The chip pulls DIO low for its ACK, so the line is never driven high.
    let dio = PinDriver::input_output_od(peripherals.pins.gpio18)?;
    let display = SegmentDisplay::new(Tm1637::new(clk, dio, Ets, config.display_brightness));

    let inputs = InputLines::new(
        FlowMeter::new(pins::FLOW_PULSE_GPIO),
        FillButton::new(pins::FILL_BUTTON_GPIO),
        LevelSwitch::low(pins::LOW_LEVEL_GPIO),
        LevelSwitch::full(pins::FULL_LEVEL_GPIO),
    );
    let outputs = OutputLines {
        relay_a: RelayDriver::new(pins::PUMP_RELAY_A_GPIO),
        relay_b: RelayDriver::new(pins::PUMP_RELAY_B_GPIO),
        led_a: IndicatorLed::new(pins::PUMP_LED_A_GPIO),
        led_b: IndicatorLed::new(pins::PUMP_LED_B_GPIO),
        low_lamp: IndicatorLed::new(pins::LOW_INDICATOR_GPIO),
        under_hood: config
            .under_hood_indicator
            .then(|| IndicatorLed::new(pins::UNDER_HOOD_FULL_GPIO)),
    };
    let mut hw = HardwareAdapter::new(inputs, outputs, display);

    let mut log_sink = LogEventSink::new();
    let clock = Esp32TimeAdapter::new();

    // ── 5. Construct app service ──────────────────────────────
    let mut app = StationService::new(config);
    app.start(clock.now_ms(), &mut hw, &nvs, &mut log_sink);

    info!("System ready. Entering control loop.");

    // ── 6. Control loop ───────────────────────────────────────
    loop {
        let wait_ms = app.tick(clock.now_ms(), &mut hw, &mut nvs, &mut log_sink);
        FreeRtos::delay_ms(wait_ms);
    }
}
