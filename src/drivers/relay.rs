//! Pump relay driver.
//!
//! The relay board energises a coil when its input is pulled LOW, so the
//! electrical level is the inverse of the requested state. That inversion
//! happens here and nowhere else.
//!
//! ## Safety contract
//!
//! Both pumps must never be energised together and neither may run with the
//! tank full. Enforced by the safety gate; this driver is a dumb actuator.

use crate::drivers::hw_init;
use crate::error::ActuatorError;

/// Relay inputs are active-low: LOW = energised.
pub const RELAY_ACTIVE_LOW: bool = true;

/// GPIO level that puts a relay in the requested state.
#[inline]
pub const fn relay_level(on: bool) -> bool {
    on ^ RELAY_ACTIVE_LOW
}

pub struct RelayDriver {
    gpio: i32,
}

impl RelayDriver {
    /// Wrap an output pin. The relay is assumed parked off by `hw_init`.
    pub fn new(gpio: i32) -> Self {
        Self { gpio }
    }

    pub fn set(&mut self, on: bool) -> Result<(), ActuatorError> {
        hw_init::gpio_write(self.gpio, relay_level(on))
    }
}
