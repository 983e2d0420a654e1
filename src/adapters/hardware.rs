//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the [`InputLines`] hub, every output driver and the display,
//! exposing them through [`InputPort`], [`OutputPort`] and
//! [`DisplayPort`].  This is the only module in the system that touches
//! actual hardware.  On non-espidf targets, the underlying drivers use
//! cfg-gated simulation stubs.

use log::warn;

use crate::app::ports::{DisplayPort, InputLine, InputPort, OutputLine, OutputPort};
use crate::drivers::indicator::IndicatorLed;
use crate::drivers::relay::RelayDriver;
use crate::error::{ActuatorError, Error, SensorError};
use crate::sensors::InputLines;

use super::display::{SegmentDisplay, SegmentWriter};

/// Every driven output line on the board.
pub struct OutputLines {
    pub relay_a: RelayDriver,
    pub relay_b: RelayDriver,
    pub led_a: IndicatorLed,
    pub led_b: IndicatorLed,
    pub low_lamp: IndicatorLed,
    /// `None` when the under-hood lamp is disabled in config.
    pub under_hood: Option<IndicatorLed>,
}

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<W> {
    inputs: InputLines,
    outputs: OutputLines,
    display: SegmentDisplay<W>,
}

impl<W: SegmentWriter> HardwareAdapter<W> {
    pub fn new(inputs: InputLines, outputs: OutputLines, display: SegmentDisplay<W>) -> Self {
        Self {
            inputs,
            outputs,
            display,
        }
    }

    /// Last frame latched into the display.
    pub fn last_frame(&self) -> Option<[u8; 4]> {
        self.display.last_frame()
    }

    fn drive(&mut self, line: OutputLine, on: bool) -> Result<(), ActuatorError> {
        let out = &mut self.outputs;
        match line {
            OutputLine::PumpRelayA => out.relay_a.set(on),
            OutputLine::PumpRelayB => out.relay_b.set(on),
            OutputLine::PumpLedA => out.led_a.set(on),
            OutputLine::PumpLedB => out.led_b.set(on),
            OutputLine::LowIndicator => out.low_lamp.set(on),
            OutputLine::UnderHoodFull => match out.under_hood.as_mut() {
                Some(lamp) => lamp.set(on),
                None => Ok(()),
            },
        }
    }
}

// ── InputPort implementation ──────────────────────────────────

impl<W: SegmentWriter> InputPort for HardwareAdapter<W> {
    fn read_line(&mut self, line: InputLine) -> Result<bool, SensorError> {
        self.inputs.read(line)
    }
}

// ── OutputPort implementation ─────────────────────────────────

impl<W: SegmentWriter> OutputPort for HardwareAdapter<W> {
    fn write_line(&mut self, line: OutputLine, on: bool) {
        if let Err(e) = self.drive(line, on) {
            warn!("{:?}: {}", line, Error::from(e));
        }
    }
}

// ── DisplayPort implementation ────────────────────────────────

impl<W: SegmentWriter> DisplayPort for HardwareAdapter<W> {
    fn show_number(&mut self, value: i32) {
        self.display.show_number(value);
    }

    fn show_segments(&mut self, segments: [u8; 4]) {
        self.display.show_segments(segments);
    }
}
