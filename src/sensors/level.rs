//! Float-type level switches on the oil tank.
//!
//! The two switches are wired with opposite senses:
//!
//! | Switch | Raw HIGH means | Logical `true` means |
//! |--------|----------------|----------------------|
//! | low    | oil low        | oil low              |
//! | full   | *not* full     | tank full            |
//!
//! With the inputs pulled down, a disconnected full switch therefore reads
//! as "full" and keeps the pumps off.

use crate::drivers::hw_init;
use crate::error::SensorError;

/// Low-level switch drives its line HIGH when oil is low.
pub const LOW_LEVEL_ACTIVE_LOW: bool = false;
/// Full-level switch pulls its line LOW when the tank is full.
pub const FULL_LEVEL_ACTIVE_LOW: bool = true;

pub struct LevelSwitch {
    gpio: i32,
    active_low: bool,
}

impl LevelSwitch {
    pub fn new(gpio: i32, active_low: bool) -> Self {
        Self { gpio, active_low }
    }

    /// Low-oil switch on `gpio`.
    pub fn low(gpio: i32) -> Self {
        Self::new(gpio, LOW_LEVEL_ACTIVE_LOW)
    }

    /// Tank-full switch on `gpio`.
    pub fn full(gpio: i32) -> Self {
        Self::new(gpio, FULL_LEVEL_ACTIVE_LOW)
    }

    /// `true` when the switch reports its condition.
    pub fn read(&self) -> Result<bool, SensorError> {
        hw_init::gpio_read(self.gpio).map(|raw| raw ^ self.active_low)
    }
}
