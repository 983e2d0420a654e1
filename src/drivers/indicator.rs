//! Single-colour indicator lamp driver (pump LEDs, low-oil and under-hood
//! lamps). Active HIGH.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the GPIO via hw_init.
//! On host/test: writes the simulated level table.

use crate::drivers::hw_init;
use crate::error::ActuatorError;

pub struct IndicatorLed {
    gpio: i32,
}

impl IndicatorLed {
    pub fn new(gpio: i32) -> Self {
        Self { gpio }
    }

    pub fn set(&mut self, on: bool) -> Result<(), ActuatorError> {
        hw_init::gpio_write(self.gpio, on)
    }
}
