//! Fill button.
//!
//! Momentary switch to 3V3 with the input pulled down: HIGH = pressed.
//! No debounce here. The control loop only looks at the held level, and the
//! reset countdown needs a multi-second hold anyway.

use crate::drivers::hw_init;
use crate::error::SensorError;

pub struct FillButton {
    gpio: i32,
}

impl FillButton {
    pub fn new(gpio: i32) -> Self {
        Self { gpio }
    }

    pub fn is_pressed(&self) -> Result<bool, SensorError> {
        hw_init::gpio_read(self.gpio)
    }
}
