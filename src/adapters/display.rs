//! Numeric display adapter.
//!
//! Turns numbers into 7-segment frames and pushes them through a
//! [`SegmentWriter`] (the TM1637 bus on the device, a recorder in tests).
//! Bus faults are logged and otherwise ignored: a dark display must never
//! stall the control loop.

use log::warn;

use crate::app::ports::DisplayPort;
use crate::error::{DisplayError, Error};

/// Anything that can latch four raw segment bytes.
pub trait SegmentWriter {
    fn write_segments(&mut self, segments: [u8; 4]) -> Result<(), DisplayError>;
}

/// Segment patterns for 0-9 (bit 0 = segment a … bit 6 = segment g).
const DIGITS: [u8; 10] = [0x3F, 0x06, 0x5B, 0x4F, 0x66, 0x6D, 0x7D, 0x07, 0x7F, 0x6F];
/// Segment g alone.
const MINUS: u8 = 0x40;

/// Smallest and largest values that fit four digits.
pub const DISPLAY_MIN: i32 = -999;
pub const DISPLAY_MAX: i32 = 9999;

/// Render `value` right-justified with leading blanks. Out-of-range values
/// are clamped to `-999..=9999`.
pub fn encode_number(value: i32) -> [u8; 4] {
    let value = value.clamp(DISPLAY_MIN, DISPLAY_MAX);
    let negative = value < 0;
    let mut n = value.unsigned_abs();

    let mut frame = [0u8; 4];
    let mut pos = frame.len();
    loop {
        pos -= 1;
        frame[pos] = DIGITS[(n % 10) as usize];
        n /= 10;
        if n == 0 {
            break;
        }
    }
    if negative {
        frame[pos - 1] = MINUS;
    }
    frame
}

/// [`DisplayPort`] over a raw segment writer.
pub struct SegmentDisplay<W> {
    writer: W,
    last: Option<[u8; 4]>,
}

impl<W: SegmentWriter> SegmentDisplay<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last: None }
    }

    /// Last frame successfully written.
    pub fn last_frame(&self) -> Option<[u8; 4]> {
        self.last
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    fn write(&mut self, segments: [u8; 4]) {
        match self.writer.write_segments(segments) {
            Ok(()) => self.last = Some(segments),
            Err(e) => {
                self.last = None;
                warn!("{}", Error::from(e));
            }
        }
    }
}

impl<W: SegmentWriter> DisplayPort for SegmentDisplay<W> {
    fn show_number(&mut self, value: i32) {
        self.write(encode_number(value));
    }

    fn show_segments(&mut self, segments: [u8; 4]) {
        self.write(segments);
    }
}
