//! Sensor subsystem: input line drivers, the aggregating [`InputLines`]
//! hub, and the fault-tolerant [`LineSampler`].
//!
//! The hub owns every input driver and answers per-line reads for the
//! hardware adapter. The sampler sits on the domain side of the
//! [`InputPort`] and produces an [`InputSnapshot`] each tick that gets
//! written into `FillContext.inputs`.

pub mod button;
pub mod flow;
pub mod level;

use log::{info, warn};

use crate::app::ports::{InputLine, InputPort};
use crate::error::{Error, SensorError};
use crate::fsm::context::InputSnapshot;
use button::FillButton;
use flow::FlowMeter;
use level::LevelSwitch;

/// Aggregates all input drivers.
pub struct InputLines {
    pub flow: FlowMeter,
    pub button: FillButton,
    pub low_level: LevelSwitch,
    pub full_level: LevelSwitch,
}

impl InputLines {
    /// Construct a new hub.  Pass in pre-built drivers (built in main
    /// where pin ownership is established).
    pub fn new(
        flow: FlowMeter,
        button: FillButton,
        low_level: LevelSwitch,
        full_level: LevelSwitch,
    ) -> Self {
        Self {
            flow,
            button,
            low_level,
            full_level,
        }
    }

    /// Logical level of one input line.
    pub fn read(&self, line: InputLine) -> Result<bool, SensorError> {
        match line {
            InputLine::FlowPulse => self.flow.read(),
            InputLine::FillButton => self.button.is_pressed(),
            InputLine::LowLevel => self.low_level.read(),
            InputLine::FullLevel => self.full_level.read(),
        }
    }
}

/// Samples every input line once per tick.
///
/// Individual read failures are logged once and the previous good value is
/// retained: a single flaky line must not crash the control loop.
///
/// Until the full switch has been read once it is reported as full, so a
/// switch that is unreadable from boot can never let a fill start.
#[derive(Debug)]
pub struct LineSampler {
    last: InputSnapshot,
    /// Bit per `InputLine::ALL` index, set while that line is failing.
    faulted: u8,
}

impl LineSampler {
    pub fn new() -> Self {
        Self {
            last: InputSnapshot {
                tank_full: true,
                ..InputSnapshot::default()
            },
            faulted: 0,
        }
    }

    /// Read all lines, substituting the last known value on failure.
    pub fn sample(&mut self, port: &mut impl InputPort) -> InputSnapshot {
        for (idx, line) in InputLine::ALL.into_iter().enumerate() {
            let bit = 1u8 << idx;
            match port.read_line(line) {
                Ok(level) => {
                    if self.faulted & bit != 0 {
                        info!("{:?} readable again", line);
                        self.faulted &= !bit;
                    }
                    self.store(line, level);
                }
                Err(e) => {
                    if self.faulted & bit == 0 {
                        warn!("{:?}: {}, holding last value", line, Error::from(e));
                        self.faulted |= bit;
                    }
                }
            }
        }
        self.last
    }

    fn store(&mut self, line: InputLine, level: bool) {
        match line {
            InputLine::FlowPulse => self.last.flow_high = level,
            InputLine::FillButton => self.last.fill_pressed = level,
            InputLine::LowLevel => self.last.oil_low = level,
            InputLine::FullLevel => self.last.tank_full = level,
        }
    }
}

impl Default for LineSampler {
    fn default() -> Self {
        Self::new()
    }
}
