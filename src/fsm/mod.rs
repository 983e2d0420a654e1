//! Function-pointer finite state machine engine for the pump pair.
//!
//! Classic embedded FSM pattern ported to Rust:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  StateTable                                              │
//! │  ┌─────────┬───────────┬──────────┬───────────────────┐  │
//! │  │ StateId │ on_enter  │ on_exit  │ on_update         │  │
//! │  ├─────────┼───────────┼──────────┼───────────────────┤  │
//! │  │ Stopped │ fn(ctx)   │ -        │ fn(ctx)->Option<> │  │
//! │  │ PumpA   │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option<> │  │
//! │  │ PumpB   │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option<> │  │
//! │  └─────────┴───────────┴──────────┴───────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Each tick the engine calls `on_update` for the **current** state.
//! If it returns `Some(next_id)`, the engine runs `on_exit` for the
//! current state, then `on_enter` for the next, and updates the
//! current pointer.  All functions receive `&mut FillContext` which
//! holds input readings, pump commands, config, and timing.
//!
//! A fill cycle is started from outside with
//! [`Fsm::force_transition`]`(StateId::PumpA, ..)`; it ends when an
//! update handler returns `Stopped`.

pub mod context;
pub mod states;

use context::FillContext;
use log::info;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Enumeration of all pump controller states.
/// Must stay in sync with the state table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateId {
    Stopped = 0,
    PumpA = 1,
    PumpB = 2,
}

impl StateId {
    /// Total number of states: used to size the table array.
    pub const COUNT: usize = 3;

    /// `true` for the states that drive a pump.
    pub fn is_pumping(self) -> bool {
        !matches!(self, Self::Stopped)
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
/// These run exactly once on each state transition.
pub type StateActionFn = fn(&mut FillContext);

/// Signature for the per-tick update handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateUpdateFn = fn(&mut FillContext) -> Option<StateId>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single FSM state.
/// Stored in a fixed-size array: no heap, no `dyn`.
pub struct StateDescriptor {
    pub id: StateId,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
///
/// Owns the state table (array of [`StateDescriptor`]); the mutable
/// [`FillContext`] is threaded through every handler call by the owner.
pub struct Fsm {
    /// Fixed-size table indexed by `StateId as usize`.
    table: [StateDescriptor; StateId::COUNT],
    /// Index of the currently active state.
    current: usize,
}

impl Fsm {
    /// Construct a new FSM with the given state table, starting in `initial`.
    pub fn new(table: [StateDescriptor; StateId::COUNT], initial: StateId) -> Self {
        Self {
            table,
            current: initial as usize,
        }
    }

    /// Run the initial `on_enter` for the starting state.
    /// Call once after construction, before the first `tick()`.
    pub fn start(&mut self, ctx: &mut FillContext) {
        info!("FSM starting in state: {}", self.table[self.current].name);
        ctx.state_entered_ms = ctx.now_ms;
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance the FSM by one tick.
    ///
    /// 1. Call `on_update` for the current state.
    /// 2. If it returns `Some(next)`, execute the transition:
    ///    `on_exit(current)` → update pointer → `on_enter(next)`.
    ///
    /// Returns the state that was entered, if any.
    pub fn tick(&mut self, ctx: &mut FillContext) -> Option<StateId> {
        let next = (self.table[self.current].on_update)(ctx);

        if let Some(next_id) = next {
            self.transition(next_id, ctx);
        }
        next
    }

    /// Force an immediate transition (used to start a fill cycle, or by the
    /// service to drop back to `Stopped`).  No-op if already in `next`.
    pub fn force_transition(&mut self, next: StateId, ctx: &mut FillContext) {
        if next as usize != self.current {
            self.transition(next, ctx);
        }
    }

    /// The current state's identity.
    pub fn current_state(&self) -> StateId {
        self.table[self.current].id
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: StateId, ctx: &mut FillContext) {
        let next_idx = next_id as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        // Exit current state
        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        // Update pointer and timing
        self.current = next_idx;
        ctx.state_entered_ms = ctx.now_ms;

        // Enter new state
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
