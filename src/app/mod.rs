//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the business rules for the oil station: fill-cycle
//! orchestration, the press-and-hold reset gesture, volume accounting and
//! safety gating. All interaction with hardware happens through **port
//! traits** defined in [`ports`], keeping this layer fully testable without
//! real peripherals.

pub mod events;
pub mod ports;
pub mod service;
