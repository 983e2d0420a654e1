//! Unified error types for the oil station firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! control loop's error handling uniform. All variants are `Copy` so they can
//! be passed through the sampler, safety gate and service without allocation.

use core::fmt;

use crate::app::ports::StorageError;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An input line could not be read.
    Sensor(SensorError),
    /// A relay or indicator line could not be driven.
    Actuator(ActuatorError),
    /// The counter store rejected a read or write.
    Storage(StorageError),
    /// The 4-digit display bus failed.
    Display(DisplayError),
    /// A safety interlock was violated.
    Safety(SafetyFault),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::Display(e) => write!(f, "display: {e}"),
            Self::Safety(e) => write!(f, "safety: {e}"),
        }
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// GPIO read returned an error.
    GpioReadFailed,
    /// The line is not wired on this board revision.
    NotConnected,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioReadFailed => write!(f, "GPIO read failed"),
            Self::NotConnected => write!(f, "line not connected"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// GPIO write returned an error.
    GpioWriteFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Display errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayError {
    /// Driving the clock or data line failed.
    Bus,
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus => write!(f, "display bus write failed"),
        }
    }
}

impl From<DisplayError> for Error {
    fn from(e: DisplayError) -> Self {
        Self::Display(e)
    }
}

// ---------------------------------------------------------------------------
// Safety faults
// ---------------------------------------------------------------------------

/// Safety faults are accumulated in a bitfield by the safety gate so that
/// simultaneous faults can be tracked and individually cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SafetyFault {
    /// Both pump relays were requested at once.
    PumpConflict = 0b0000_0001,
    /// A pump was requested while the tank reads full.
    PumpWhileFull = 0b0000_0010,
}

impl SafetyFault {
    /// Return the bitmask for this fault.
    pub const fn mask(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for SafetyFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PumpConflict => write!(f, "both pumps requested"),
            Self::PumpWhileFull => write!(f, "pump requested with tank full"),
        }
    }
}

impl From<SafetyFault> for Error {
    fn from(e: SafetyFault) -> Self {
        Self::Safety(e)
    }
}
