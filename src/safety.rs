//! Pump output safety gate.
//!
//! Every pump request from the FSM passes through [`SafetySupervisor::gate`]
//! before it reaches a relay. The gate holds two interlocks:
//!
//! - never both pumps at once ([`SafetyFault::PumpConflict`])
//! - no pump while the tank reads full ([`SafetyFault::PumpWhileFull`])
//!
//! A tripped interlock forces every pump output off for that tick.
//!
//! ## Fault lifecycle
//!
//! 1. A request violates an interlock.
//! 2. The supervisor sets the corresponding bit and logs it once.
//! 3. The gated output is all-off.
//! 4. Each tick the supervisor re-evaluates. When the condition clears, it
//!    unsets the bit.
//!
//! This approach supports **multiple simultaneous faults**.

use crate::error::{Error, SafetyFault};
use crate::fsm::context::{InputSnapshot, PumpCommands};
use log::{error, info};

/// Result of gating one pump request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateOutcome {
    /// What may actually be applied to the relays and pump LEDs.
    pub commands: PumpCommands,
    /// Fault bits that were raised by this evaluation.
    pub raised: u8,
}

/// Safety supervisor.
#[derive(Debug, Default)]
pub struct SafetySupervisor {
    /// Current fault bitmask.
    faults: u8,
}

impl SafetySupervisor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check `requested` against the interlocks.
    pub fn gate(&mut self, requested: PumpCommands, inputs: &InputSnapshot) -> GateOutcome {
        let before = self.faults;

        self.eval_fault(
            SafetyFault::PumpConflict,
            requested.pump_a && requested.pump_b,
        );
        self.eval_fault(
            SafetyFault::PumpWhileFull,
            requested.any_pump() && inputs.tank_full,
        );

        let commands = if self.faults == 0 {
            requested
        } else {
            PumpCommands::all_off()
        };

        GateOutcome {
            commands,
            raised: self.faults & !before,
        }
    }

    /// Current fault bitmask.
    pub fn faults(&self) -> u8 {
        self.faults
    }

    // ── Internal ──────────────────────────────────────────────────

    /// Set or clear a fault bit based on a boolean condition.
    fn eval_fault(&mut self, fault: SafetyFault, condition: bool) {
        if condition {
            if self.faults & fault.mask() == 0 {
                error!("SAFETY FAULT SET: {}", Error::from(fault));
            }
            self.faults |= fault.mask();
        } else {
            if self.faults & fault.mask() != 0 {
                info!("SAFETY FAULT CLEARED: {fault}");
            }
            self.faults &= !fault.mask();
        }
    }
}
