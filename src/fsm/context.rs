//! Shared mutable context threaded through every FSM handler.
//!
//! `FillContext` is the single struct that pump state handlers read from
//! and write to.  It contains the latest input snapshot, the requested
//! pump outputs, the millisecond clock, and configuration.  Think of it as
//! the "blackboard" in a blackboard architecture.

use crate::config::StationConfig;
use crate::ticks::{elapsed_ms, ticks_diff};

// ---------------------------------------------------------------------------
// Input snapshot (read-only to state handlers; written by the line sampler)
// ---------------------------------------------------------------------------

/// A point-in-time snapshot of every logical input line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    /// Flow meter pulse line is high.
    pub flow_high: bool,
    /// Fill button is pressed.
    pub fill_pressed: bool,
    /// Oil level is low.
    pub oil_low: bool,
    /// Tank is full.
    pub tank_full: bool,
}

// ---------------------------------------------------------------------------
// Pump commands (written by state handlers; consumed by the service)
// ---------------------------------------------------------------------------

/// Pump relay and pump LED requests, applied through the safety gate
/// after each tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpCommands {
    pub pump_a: bool,
    pub pump_b: bool,
    pub led_a: bool,
    pub led_b: bool,
}

impl PumpCommands {
    /// All pumps and pump LEDs off: safe default.
    pub fn all_off() -> Self {
        Self::default()
    }

    /// Pump A and its LED on, B off.
    pub fn only_a() -> Self {
        Self {
            pump_a: true,
            led_a: true,
            ..Self::default()
        }
    }

    /// Pump B and its LED on, A off.
    pub fn only_b() -> Self {
        Self {
            pump_b: true,
            led_b: true,
            ..Self::default()
        }
    }

    /// `true` if either relay is requested.
    pub fn any_pump(&self) -> bool {
        self.pump_a || self.pump_b
    }
}

// ---------------------------------------------------------------------------
// FillContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct FillContext {
    // -- Timing --
    /// Current millisecond clock (wrapping).  Updated before each FSM tick.
    pub now_ms: u32,
    /// Last confirmed flow pulse or last pump switch.
    pub flow_clock_ms: u32,
    /// Clock value when the current state was entered.
    pub state_entered_ms: u32,

    // -- Inputs --
    pub inputs: InputSnapshot,

    // -- Outputs --
    pub commands: PumpCommands,

    // -- Configuration --
    pub config: StationConfig,
}

impl FillContext {
    pub fn new(config: StationConfig) -> Self {
        Self {
            now_ms: 0,
            flow_clock_ms: 0,
            state_entered_ms: 0,
            inputs: InputSnapshot::default(),
            commands: PumpCommands::all_off(),
            config,
        }
    }

    /// Restart the flow timeout clock at the current time.
    pub fn reset_flow_clock(&mut self) {
        self.flow_clock_ms = self.now_ms;
    }

    /// Signed milliseconds since the last pulse or pump switch.
    pub fn ms_since_flow(&self) -> i32 {
        ticks_diff(self.now_ms, self.flow_clock_ms)
    }

    /// Milliseconds spent in the current state.
    pub fn ms_in_state(&self) -> u32 {
        elapsed_ms(self.now_ms, self.state_entered_ms)
    }

    /// `true` once the pump swap timeout has been strictly exceeded.
    pub fn flow_timed_out(&self) -> bool {
        i64::from(self.ms_since_flow()) > i64::from(self.config.pump_swap_timeout_ms)
    }
}
