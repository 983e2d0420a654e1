//! Concrete state handler functions and table builder.
//!
//! Each state is defined by three plain `fn` pointers: no closures, no
//! dynamic dispatch, no heap.  This is the classic embedded C FSM pattern
//! expressed in safe Rust.
//!
//! ```text
//!  STOPPED ──[oil low + fill button]──▶ PUMP_A   (forced by the service)
//!                                        │   ▲
//!                         [no pulse > timeout]
//!                                        ▼   │
//!                                       PUMP_B
//!
//!  PUMP_A / PUMP_B ──[tank full]──▶ STOPPED
//! ```

use super::context::{FillContext, PumpCommands};
use super::{StateDescriptor, StateId};
use log::info;

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0: Stopped
        StateDescriptor {
            id: StateId::Stopped,
            name: "Stopped",
            on_enter: Some(stopped_enter),
            on_exit: None,
            on_update: stopped_update,
        },
        // Index 1: PumpA
        StateDescriptor {
            id: StateId::PumpA,
            name: "PumpA",
            on_enter: Some(pump_a_enter),
            on_exit: Some(pump_exit),
            on_update: pump_a_update,
        },
        // Index 2: PumpB
        StateDescriptor {
            id: StateId::PumpB,
            name: "PumpB",
            on_enter: Some(pump_b_enter),
            on_exit: Some(pump_exit),
            on_update: pump_b_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  STOPPED state
// ═══════════════════════════════════════════════════════════════════════════

fn stopped_enter(ctx: &mut FillContext) {
    ctx.commands = PumpCommands::all_off();
    info!("STOPPED: both pumps de-energised");
}

fn stopped_update(_ctx: &mut FillContext) -> Option<StateId> {
    // Leaving Stopped is the service's decision (low oil + fill button).
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  PUMP_A / PUMP_B: one pump driving, the other idle
// ═══════════════════════════════════════════════════════════════════════════

fn pump_a_enter(ctx: &mut FillContext) {
    ctx.commands = PumpCommands::only_a();
    ctx.reset_flow_clock();
    info!("PUMP_A: running, swap after {} ms without flow", ctx.config.pump_swap_timeout_ms);
}

fn pump_b_enter(ctx: &mut FillContext) {
    ctx.commands = PumpCommands::only_b();
    ctx.reset_flow_clock();
    info!("PUMP_B: running, swap after {} ms without flow", ctx.config.pump_swap_timeout_ms);
}

fn pump_exit(ctx: &mut FillContext) {
    ctx.commands = PumpCommands::all_off();
    info!("PUMP: stopped after {} ms run time", ctx.ms_in_state());
}

fn pump_a_update(ctx: &mut FillContext) -> Option<StateId> {
    pump_update(ctx, StateId::PumpB)
}

fn pump_b_update(ctx: &mut FillContext) -> Option<StateId> {
    pump_update(ctx, StateId::PumpA)
}

fn pump_update(ctx: &mut FillContext, other: StateId) -> Option<StateId> {
    // Exit: tank reached full level
    if ctx.inputs.tank_full {
        info!("PUMP: tank full, ending fill cycle");
        return Some(StateId::Stopped);
    }

    // No confirmed pulse for longer than the timeout → hand over
    if ctx.flow_timed_out() {
        info!(
            "PUMP: no flow for {} ms, switching to {:?}",
            ctx.ms_since_flow(),
            other
        );
        return Some(other);
    }

    None
}
