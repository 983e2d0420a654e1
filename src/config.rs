//! Station configuration parameters
//!
//! All tunable parameters for the oil transfer station.
//! Values can be overridden via NVS (non-volatile storage).

use log::warn;
use serde::{Deserialize, Serialize};

use crate::app::ports::{ConfigError, ConfigPort};
use crate::drivers::tm1637::MAX_BRIGHTNESS;

/// Core station configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationConfig {
    // --- Timing ---
    /// Idle control loop interval (milliseconds)
    pub tick_interval_ms: u32,
    /// Loop interval while a fill cycle is running (milliseconds)
    pub fill_poll_interval_ms: u32,

    // --- Flow meter ---
    /// Settle window a rising flow edge must survive to count (milliseconds)
    pub flow_debounce_ms: u32,

    // --- Pumps ---
    /// Run time without a counted pulse before switching pumps (milliseconds)
    pub pump_swap_timeout_ms: u32,

    // --- Reset sequence ---
    /// Button hold needed to zero the volume counter (seconds)
    pub reset_hold_secs: u8,
    /// Number of all-zero / blank cycles shown after a reset
    pub flash_cycles: u8,
    /// Duration of each half of a flash cycle (milliseconds)
    pub flash_half_period_ms: u32,

    // --- Outputs ---
    /// Drive the under-hood "tank full" lamp
    pub under_hood_indicator: bool,
    /// Display brightness (0-7)
    pub display_brightness: u8,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            // Timing
            tick_interval_ms: 100,
            fill_poll_interval_ms: 10,

            // Flow meter
            flow_debounce_ms: 200,

            // Pumps
            pump_swap_timeout_ms: 60_000,

            // Reset sequence
            reset_hold_secs: 5,
            flash_cycles: 3,
            flash_half_period_ms: 500,

            // Outputs
            under_hood_indicator: true,
            display_brightness: 7,
        }
    }
}

impl StationConfig {
    /// Range-check every field. The first offending field is named in the
    /// error.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks: [(bool, &'static str); 9] = [
            (
                (10..=1000).contains(&self.tick_interval_ms),
                "tick_interval_ms outside 10..=1000",
            ),
            (
                (1..=self.tick_interval_ms).contains(&self.fill_poll_interval_ms),
                "fill_poll_interval_ms outside 1..=tick_interval_ms",
            ),
            (
                (20..=2000).contains(&self.flow_debounce_ms),
                "flow_debounce_ms outside 20..=2000",
            ),
            (
                self.fill_poll_interval_ms < self.flow_debounce_ms,
                "fill_poll_interval_ms not below flow_debounce_ms",
            ),
            (
                (5_000..=600_000).contains(&self.pump_swap_timeout_ms),
                "pump_swap_timeout_ms outside 5000..=600000",
            ),
            (
                (1..=30).contains(&self.reset_hold_secs),
                "reset_hold_secs outside 1..=30",
            ),
            (
                (1..=10).contains(&self.flash_cycles),
                "flash_cycles outside 1..=10",
            ),
            (
                (100..=2000).contains(&self.flash_half_period_ms),
                "flash_half_period_ms outside 100..=2000",
            ),
            (
                self.display_brightness <= MAX_BRIGHTNESS,
                "display_brightness above 7",
            ),
        ];

        match checks.iter().find(|(ok, _)| !ok) {
            Some(&(_, why)) => Err(ConfigError::ValidationFailed(why)),
            None => Ok(()),
        }
    }
}

/// Load the stored config, falling back to defaults.
///
/// A record that is corrupt or out of range is overwritten with the
/// defaults so the next boot loads cleanly. A storage fault leaves the
/// record alone.
pub fn load_or_restore(port: &impl ConfigPort) -> StationConfig {
    match port.load() {
        Ok(cfg) => cfg,
        Err(e @ (ConfigError::Corrupted | ConfigError::ValidationFailed(_))) => {
            warn!("Stored config rejected ({e}), restoring defaults");
            let defaults = StationConfig::default();
            if let Err(e) = port.save(&defaults) {
                warn!("Restoring default config failed: {e}");
            }
            defaults
        }
        Err(e) => {
            warn!("Config load failed ({e}), using defaults");
            StationConfig::default()
        }
    }
}
