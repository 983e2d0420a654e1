//! One-shot GPIO initialisation and raw line access.
//!
//! Configures input pulls and output directions using raw ESP-IDF sys
//! calls. Called once from `main()` before the control loop starts.
//! Relay lines are parked de-energised before they are switched to output
//! so the pumps never twitch at boot.
//!
//! On host builds the pins are backed by an in-memory level table so the
//! drivers above can be exercised without hardware.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use crate::error::{ActuatorError, SensorError};

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    GpioLevelFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::GpioLevelFailed(rc) => write!(f, "GPIO initial level failed (rc={})", rc),
        }
    }
}

/// Number of GPIOs on the ESP32-S3.
pub const GPIO_COUNT: usize = 49;

fn pin_index(pin: i32) -> Option<usize> {
    usize::try_from(pin).ok().filter(|&i| i < GPIO_COUNT)
}

#[cfg(target_os = "espidf")]
use log::info;

use crate::drivers::relay::RELAY_ACTIVE_LOW;
use crate::pins;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the control loop; single-threaded.
    unsafe {
        init_gpio_inputs()?;
        init_gpio_outputs()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    for &pin in &pins::RELAY_GPIOS {
        sim::store(pin, RELAY_ACTIVE_LOW);
    }
    for &pin in &pins::LAMP_GPIOS {
        sim::store(pin, false);
    }
    log::info!("hw_init(sim): outputs parked, hardware init skipped");
    Ok(())
}

// ── GPIO Inputs ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), HwInitError> {
    for &pin in &pins::INPUT_GPIOS {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_ENABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
    }

    info!("hw_init: GPIO inputs configured (pull-down)");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> Result<bool, SensorError> {
    if pin_index(pin).is_none() {
        return Err(SensorError::NotConnected);
    }
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin; safe to call from main context.
    Ok((unsafe { gpio_get_level(pin) }) != 0)
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(pin: i32) -> Result<bool, SensorError> {
    sim::load(pin).ok_or(SensorError::NotConnected)
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    let parked = pins::RELAY_GPIOS
        .iter()
        .map(|&pin| (pin, RELAY_ACTIVE_LOW))
        .chain(pins::LAMP_GPIOS.iter().map(|&pin| (pin, false)));

    for (pin, level) in parked {
        // Latch the safe level first so enabling the driver cannot glitch.
        let ret = unsafe { gpio_set_level(pin, u32::from(level)) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::GpioLevelFailed(ret));
        }
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
    }

    info!("hw_init: GPIO outputs configured, relays parked off");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) -> Result<(), ActuatorError> {
    if pin_index(pin).is_none() {
        return Err(ActuatorError::GpioWriteFailed);
    }
    // SAFETY: gpio_set_level writes to an already-configured output pin;
    // pin was configured during init_gpio_outputs(). Main-loop only.
    let ret = unsafe { gpio_set_level(pin, u32::from(high)) };
    if ret == ESP_OK as i32 {
        Ok(())
    } else {
        Err(ActuatorError::GpioWriteFailed)
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(pin: i32, high: bool) -> Result<(), ActuatorError> {
    if sim::store(pin, high) {
        Ok(())
    } else {
        Err(ActuatorError::GpioWriteFailed)
    }
}

// ── Host simulation ───────────────────────────────────────────

/// Drive a simulated input level (host builds only).
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_level(pin: i32, high: bool) {
    sim::store(pin, high);
}

/// Observe a simulated output level (host builds only).
#[cfg(not(target_os = "espidf"))]
pub fn sim_level(pin: i32) -> Option<bool> {
    sim::load(pin)
}

#[cfg(not(target_os = "espidf"))]
mod sim {
    use core::sync::atomic::{AtomicBool, Ordering};

    use super::{pin_index, GPIO_COUNT};

    static LEVELS: [AtomicBool; GPIO_COUNT] = [const { AtomicBool::new(false) }; GPIO_COUNT];

    pub(super) fn store(pin: i32, high: bool) -> bool {
        match pin_index(pin) {
            Some(i) => {
                LEVELS[i].store(high, Ordering::Release);
                true
            }
            None => false,
        }
    }

    pub(super) fn load(pin: i32) -> Option<bool> {
        pin_index(pin).map(|i| LEVELS[i].load(Ordering::Acquire))
    }
}
