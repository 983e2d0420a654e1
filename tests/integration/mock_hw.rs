//! Mock adapters for integration tests.
//!
//! Records every output write and display frame so tests can assert on the
//! full command history without touching real GPIO registers. Inputs are
//! plain fields the test scripts between ticks.

use oilstation::app::events::AppEvent;
use oilstation::app::ports::{
    DisplayPort, EventSink, InputLine, InputPort, OutputLine, OutputPort, StorageError,
    StoragePort,
};
use oilstation::app::service::StationService;
use oilstation::config::StationConfig;
use oilstation::error::SensorError;
use std::collections::HashMap;

// ── Display frames ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    Number(i32),
    Segments([u8; 4]),
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub flow: bool,
    pub button: bool,
    pub low: bool,
    pub full: bool,
    /// Reads of this line fail while set.
    pub failing: Option<InputLine>,
    pub writes: Vec<(OutputLine, bool)>,
    pub frames: Vec<Frame>,
    levels: HashMap<OutputLine, bool>,
    /// Latched if both relays were ever energised at once.
    pub overlap_seen: bool,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            flow: false,
            button: false,
            low: false,
            full: false,
            failing: None,
            writes: Vec::new(),
            frames: Vec::new(),
            levels: HashMap::new(),
            overlap_seen: false,
        }
    }

    pub fn level(&self, line: OutputLine) -> bool {
        self.levels.get(&line).copied().unwrap_or(false)
    }

    pub fn was_written(&self, line: OutputLine) -> bool {
        self.writes.iter().any(|(l, _)| *l == line)
    }

    /// `true` if `line` was ever switched on.
    pub fn was_written_on(&self, line: OutputLine) -> bool {
        self.writes.iter().any(|(l, on)| *l == line && *on)
    }

    pub fn last_frame(&self) -> Option<Frame> {
        self.frames.last().copied()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl InputPort for MockHardware {
    fn read_line(&mut self, line: InputLine) -> Result<bool, SensorError> {
        if self.failing == Some(line) {
            return Err(SensorError::GpioReadFailed);
        }
        Ok(match line {
            InputLine::FlowPulse => self.flow,
            InputLine::FillButton => self.button,
            InputLine::LowLevel => self.low,
            InputLine::FullLevel => self.full,
        })
    }
}

impl OutputPort for MockHardware {
    fn write_line(&mut self, line: OutputLine, on: bool) {
        self.writes.push((line, on));
        self.levels.insert(line, on);
        if self.level(OutputLine::PumpRelayA) && self.level(OutputLine::PumpRelayB) {
            self.overlap_seen = true;
        }
    }
}

impl DisplayPort for MockHardware {
    fn show_number(&mut self, value: i32) {
        self.frames.push(Frame::Number(value));
    }

    fn show_segments(&mut self, segments: [u8; 4]) {
        self.frames.push(Frame::Segments(segments));
    }
}

// ── MockStore ─────────────────────────────────────────────────

pub struct MockStore {
    store: HashMap<String, Vec<u8>>,
    /// Every write is rejected with `StorageError::Full` while set.
    pub fail_writes: bool,
    pub write_count: usize,
}

#[allow(dead_code)]
impl MockStore {
    pub fn new() -> Self {
        Self {
            store: HashMap::new(),
            fail_writes: false,
            write_count: 0,
        }
    }

    pub fn with_record(namespace: &str, key: &str, data: &[u8]) -> Self {
        let mut s = Self::new();
        s.store.insert(format!("{}::{}", namespace, key), data.to_vec());
        s
    }

    pub fn text(&self, namespace: &str, key: &str) -> Option<String> {
        self.store
            .get(&format!("{}::{}", namespace, key))
            .map(|v| String::from_utf8_lossy(v).into_owned())
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StoragePort for MockStore {
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        match self.store.get(&format!("{}::{}", namespace, key)) {
            Some(v) => {
                let n = v.len().min(buf.len());
                buf[..n].copy_from_slice(&v[..n]);
                Ok(n)
            }
            None => Err(StorageError::NotFound),
        }
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Full);
        }
        self.write_count += 1;
        self.store
            .insert(format!("{}::{}", namespace, key), data.to_vec());
        Ok(())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Harness ───────────────────────────────────────────────────

/// A started service plus its mocks and a simulated clock.
pub struct Rig {
    pub app: StationService,
    pub hw: MockHardware,
    pub store: MockStore,
    pub sink: RecordingSink,
    pub now: u32,
}

#[allow(dead_code)]
impl Rig {
    pub fn new(config: StationConfig, store: MockStore) -> Self {
        Self::starting_at(config, store, 0)
    }

    pub fn starting_at(config: StationConfig, store: MockStore, now: u32) -> Self {
        let mut rig = Self {
            app: StationService::new(config),
            hw: MockHardware::new(),
            store,
            sink: RecordingSink::new(),
            now,
        };
        rig.app
            .start(rig.now, &mut rig.hw, &rig.store, &mut rig.sink);
        rig
    }

    /// Run one tick at the current time and advance the clock by `step_ms`.
    pub fn step(&mut self, step_ms: u32) {
        self.app
            .tick(self.now, &mut self.hw, &mut self.store, &mut self.sink);
        self.now = self.now.wrapping_add(step_ms);
    }

    /// Run ticks every `step_ms` for `total_ms`.
    pub fn run(&mut self, total_ms: u32, step_ms: u32) {
        for _ in 0..total_ms / step_ms {
            self.step(step_ms);
        }
    }

    /// Hold the flow line high for `high_ms`, then low for `low_ms`.
    pub fn pulse(&mut self, high_ms: u32, low_ms: u32) {
        self.hw.flow = true;
        self.run(high_ms, 10);
        self.hw.flow = false;
        self.run(low_ms, 10);
    }
}
