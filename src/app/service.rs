//! Application service: the hexagonal core.
//!
//! [`StationService`] owns the FSM, the safety supervisor, the flow
//! debouncer, the reset sequencer and the volume counter. It exposes a
//! hardware-agnostic API: all I/O flows through port traits injected at
//! call sites, so the whole controller runs against mock adapters in tests.
//!
//! ```text
//!   InputPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                 │        StationService         │
//!  OutputPort ◀── │  FSM · Safety · Flow · Reset  │ ◀─▶ StoragePort
//! DisplayPort ◀── └──────────────────────────────┘
//! ```

use log::info;

use crate::config::StationConfig;
use crate::control::flow::FlowCounter;
use crate::control::reset::{FlashFrame, ResetAction, ResetSequencer};
use crate::control::volume::VolumeCounter;
use crate::fsm::context::{FillContext, InputSnapshot, PumpCommands};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};
use crate::safety::SafetySupervisor;
use crate::sensors::LineSampler;

use super::events::AppEvent;
use super::ports::{
    DisplayPort, EventSink, InputPort, OutputLine, OutputPort, SEGMENTS_ALL_ZERO, SEGMENTS_BLANK,
    StoragePort,
};

// ───────────────────────────────────────────────────────────────
// StationService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct StationService {
    fsm: Fsm,
    ctx: FillContext,
    safety: SafetySupervisor,
    sampler: LineSampler,
    flow: FlowCounter,
    reset: ResetSequencer,
    volume: VolumeCounter,
    /// Pump outputs actually applied on the last tick (after gating).
    applied: PumpCommands,
    oil_was_low: bool,
}

impl StationService {
    /// Construct the service from configuration.
    ///
    /// Does **not** touch hardware or storage: call [`start`](Self::start) next.
    pub fn new(config: StationConfig) -> Self {
        let flow = FlowCounter::new(config.flow_debounce_ms);
        let reset = ResetSequencer::new(&config);
        let ctx = FillContext::new(config);
        let fsm = Fsm::new(build_state_table(), StateId::Stopped);

        Self {
            fsm,
            ctx,
            safety: SafetySupervisor::new(),
            sampler: LineSampler::new(),
            flow,
            reset,
            volume: VolumeCounter::default(),
            applied: PumpCommands::all_off(),
            oil_was_low: false,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Park every output, load the persisted volume and show it.
    pub fn start(
        &mut self,
        now_ms: u32,
        hw: &mut (impl OutputPort + DisplayPort),
        store: &impl StoragePort,
        sink: &mut impl EventSink,
    ) {
        self.ctx.now_ms = now_ms;
        self.fsm.start(&mut self.ctx);
        hw.all_off();
        self.applied = PumpCommands::all_off();

        self.volume = VolumeCounter::load(store);
        hw.show_number(display_value(self.volume.value()));
        sink.emit(&AppEvent::Started {
            volume: self.volume.value(),
        });
        info!("StationService started in {:?}", self.fsm.current_state());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control cycle: sample inputs → indicators → fill cycle or
    /// reset gesture → safety gate → outputs.
    ///
    /// `hw` satisfies all three hardware ports, which avoids a double
    /// mutable borrow while keeping the port boundary explicit.
    ///
    /// Returns how long the caller should wait before the next tick: the
    /// fast fill-poll interval while pumping, the idle interval otherwise.
    pub fn tick(
        &mut self,
        now_ms: u32,
        hw: &mut (impl InputPort + OutputPort + DisplayPort),
        store: &mut impl StoragePort,
        sink: &mut impl EventSink,
    ) -> u32 {
        self.ctx.now_ms = now_ms;

        // 1. Inputs
        let inputs = self.sampler.sample(hw);
        self.ctx.inputs = inputs;

        // 2. A volume write that failed earlier gets another attempt.
        match self.volume.flush(store) {
            Some(Ok(())) => sink.emit(&AppEvent::PersistRecovered {
                volume: self.volume.value(),
            }),
            // Still failing; reported when it started.
            Some(Err(_)) | None => {}
        }

        // 3. Level indicators
        self.update_indicators(&inputs, hw, sink);

        // 4. Fill cycle, or the idle-time button gesture
        if self.fsm.current_state().is_pumping() {
            self.run_fill(now_ms, &inputs, hw, store, sink);
        } else {
            self.run_idle(now_ms, &inputs, hw, store, sink);
        }

        // 5. Safety gate, then the pump outputs
        let outcome = self.safety.gate(self.ctx.commands, &inputs);
        if outcome.raised != 0 {
            sink.emit(&AppEvent::SafetyFault(self.safety.faults()));
        }
        apply_pumps(outcome.commands, hw);
        self.applied = outcome.commands;

        if self.fsm.current_state().is_pumping() {
            self.ctx.config.fill_poll_interval_ms
        } else {
            self.ctx.config.tick_interval_ms
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current in-memory dispensed volume.
    pub fn volume(&self) -> u32 {
        self.volume.value()
    }

    /// `true` if the last volume write failed and is awaiting retry.
    pub fn volume_unsaved(&self) -> bool {
        self.volume.is_unsaved()
    }

    /// Current FSM state.
    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    /// Pump outputs applied on the last tick.
    pub fn commands(&self) -> PumpCommands {
        self.applied
    }

    /// Inputs sampled on the last tick.
    pub fn inputs(&self) -> InputSnapshot {
        self.ctx.inputs
    }

    /// Current active fault bitmask (0 = no faults).
    pub fn fault_flags(&self) -> u8 {
        self.safety.faults()
    }

    // ── Internal ──────────────────────────────────────────────

    fn update_indicators(
        &mut self,
        inputs: &InputSnapshot,
        hw: &mut impl OutputPort,
        sink: &mut impl EventSink,
    ) {
        hw.write_line(OutputLine::LowIndicator, inputs.oil_low);
        if self.ctx.config.under_hood_indicator {
            hw.write_line(OutputLine::UnderHoodFull, inputs.tank_full);
        }
        if inputs.oil_low && !self.oil_was_low {
            sink.emit(&AppEvent::LowOil);
        }
        self.oil_was_low = inputs.oil_low;
    }

    /// Emit an event when a write changes whether the volume is on flash.
    fn report_persist(&self, was_unsaved: bool, saved: bool, sink: &mut impl EventSink) {
        let volume = self.volume.value();
        match (was_unsaved, saved) {
            (false, false) => sink.emit(&AppEvent::PersistFailed { volume }),
            (true, true) => sink.emit(&AppEvent::PersistRecovered { volume }),
            _ => {}
        }
    }

    fn run_fill(
        &mut self,
        now_ms: u32,
        inputs: &InputSnapshot,
        hw: &mut impl DisplayPort,
        store: &mut impl StoragePort,
        sink: &mut impl EventSink,
    ) {
        if self.flow.poll(inputs.flow_high, now_ms) {
            self.ctx.reset_flow_clock();
            let was_unsaved = self.volume.is_unsaved();
            let saved = self.volume.increment(store).is_ok();
            self.report_persist(was_unsaved, saved, sink);
            hw.show_number(display_value(self.volume.value()));
            sink.emit(&AppEvent::PulseCounted(self.volume.value()));
        }

        let from = self.fsm.current_state();
        match self.fsm.tick(&mut self.ctx) {
            Some(StateId::Stopped) => {
                self.flow.clear_pending();
                hw.show_number(display_value(self.volume.value()));
                sink.emit(&AppEvent::OilFull {
                    volume: self.volume.value(),
                });
            }
            Some(to) => sink.emit(&AppEvent::PumpSwitched { from, to }),
            None => {}
        }
    }

    fn run_idle(
        &mut self,
        now_ms: u32,
        inputs: &InputSnapshot,
        hw: &mut impl DisplayPort,
        store: &mut impl StoragePort,
        sink: &mut impl EventSink,
    ) {
        let trigger = inputs.fill_pressed && !inputs.oil_low;
        match self.reset.step(trigger, now_ms) {
            ResetAction::None => {}
            ResetAction::Started(remaining) => {
                hw.show_number(remaining);
                sink.emit(&AppEvent::CountdownStarted {
                    hold_secs: self.ctx.config.reset_hold_secs,
                });
            }
            ResetAction::Countdown(remaining) => hw.show_number(remaining),
            ResetAction::Cancelled => {
                hw.show_number(display_value(self.volume.value()));
                sink.emit(&AppEvent::CountdownCancelled {
                    volume: self.volume.value(),
                });
            }
            ResetAction::Expired => {
                let was_unsaved = self.volume.is_unsaved();
                let saved = self.volume.reset(store).is_ok();
                self.report_persist(was_unsaved, saved, sink);
                hw.show_number(0);
                sink.emit(&AppEvent::VolumeReset {
                    hold_secs: self.ctx.config.reset_hold_secs,
                });
            }
            ResetAction::Flash(FlashFrame::Zeros) => hw.show_segments(SEGMENTS_ALL_ZERO),
            ResetAction::Flash(FlashFrame::Blank) => hw.show_segments(SEGMENTS_BLANK),
            ResetAction::FlashDone => {
                hw.show_number(display_value(self.volume.value()));
                sink.emit(&AppEvent::FlashFinished);
            }
        }

        // A full tank never starts a cycle; it would stop on the next tick.
        let wants_fill = inputs.oil_low && inputs.fill_pressed && !inputs.tank_full;
        if wants_fill && !self.reset.is_flashing() {
            self.fsm.force_transition(StateId::PumpA, &mut self.ctx);
            sink.emit(&AppEvent::PumpEngaged);
        }
    }
}

/// Drive the pump relays and their LEDs. Lines being switched off are
/// written before lines being switched on, so a swap never overlaps.
fn apply_pumps(cmds: PumpCommands, hw: &mut impl OutputPort) {
    let lines = [
        (OutputLine::PumpRelayA, cmds.pump_a),
        (OutputLine::PumpRelayB, cmds.pump_b),
        (OutputLine::PumpLedA, cmds.led_a),
        (OutputLine::PumpLedB, cmds.led_b),
    ];
    for (line, on) in lines.iter().filter(|(_, on)| !on) {
        hw.write_line(*line, *on);
    }
    for (line, on) in lines.iter().filter(|(_, on)| *on) {
        hw.write_line(*line, *on);
    }
}

/// The display takes a signed value; counts beyond `i32` saturate.
fn display_value(volume: u32) -> i32 {
    i32::try_from(volume).unwrap_or(i32::MAX)
}
