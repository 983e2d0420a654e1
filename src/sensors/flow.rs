//! Flow meter pulse line.
//!
//! The meter pulls its output HIGH once per unit of oil. This driver only
//! samples the level; edge detection and debouncing live in
//! [`control::flow`](crate::control::flow).

use crate::drivers::hw_init;
use crate::error::SensorError;

pub struct FlowMeter {
    gpio: i32,
}

impl FlowMeter {
    pub fn new(gpio: i32) -> Self {
        Self { gpio }
    }

    /// Current level of the pulse line.
    pub fn read(&self) -> Result<bool, SensorError> {
        hw_init::gpio_read(self.gpio)
    }
}
