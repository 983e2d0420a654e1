//! Press-and-hold reset of the volume counter.
//!
//! Holding the fill button while the oil level is *not* low starts a
//! countdown on the display. If the hold lasts `reset_hold_secs`, the
//! counter is zeroed and a confirmation flash (all-zero frame, blank frame,
//! repeated `flash_cycles` times) is played. Releasing the button or the
//! oil going low first cancels the countdown.
//!
//! ```text
//!   Idle ──[trigger]──▶ Counting ──[remaining ≤ 0]──▶ Flashing ──[done]──▶ Idle
//!     ▲                    │
//!     └───[trigger lost]───┘
//! ```
//!
//! The sequencer is a pure step function: it owns no hardware and returns a
//! [`ResetAction`] for the caller to carry out.

use crate::config::StationConfig;
use crate::ticks::elapsed_ms;

/// Which raw frame a flash step shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashFrame {
    Zeros,
    Blank,
}

/// What the caller must do after a [`ResetSequencer::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetAction {
    None,
    /// A new hold began; show the initial countdown value.
    Started(i32),
    /// The remaining whole seconds changed; show them.
    Countdown(i32),
    /// The hold was released early; redisplay the unchanged volume.
    Cancelled,
    /// The hold completed; zero and persist the volume, show 0.
    Expired,
    /// Show a confirmation flash frame.
    Flash(FlashFrame),
    /// The flash finished; redisplay the volume.
    FlashDone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Counting { started_ms: u32, shown: i32 },
    Flashing { started_ms: u32, shown_frame: Option<u32> },
}

/// Countdown and confirmation-flash sequencer.
#[derive(Debug, Clone)]
pub struct ResetSequencer {
    hold_secs: i32,
    flash_frames: u32,
    half_period_ms: u32,
    phase: Phase,
}

impl ResetSequencer {
    pub fn new(config: &StationConfig) -> Self {
        Self {
            hold_secs: i32::from(config.reset_hold_secs),
            flash_frames: u32::from(config.flash_cycles) * 2,
            half_period_ms: config.flash_half_period_ms.max(1),
            phase: Phase::Idle,
        }
    }

    /// Advance the sequencer. `trigger` is "button held and oil not low".
    pub fn step(&mut self, trigger: bool, now_ms: u32) -> ResetAction {
        match self.phase {
            Phase::Idle => {
                if !trigger {
                    return ResetAction::None;
                }
                self.phase = Phase::Counting {
                    started_ms: now_ms,
                    shown: self.hold_secs,
                };
                ResetAction::Started(self.hold_secs)
            }
            Phase::Counting { started_ms, shown } => {
                if !trigger {
                    self.phase = Phase::Idle;
                    return ResetAction::Cancelled;
                }
                let remaining = self.remaining(started_ms, now_ms);
                if remaining <= 0 {
                    self.phase = Phase::Flashing {
                        started_ms: now_ms,
                        shown_frame: None,
                    };
                    return ResetAction::Expired;
                }
                if remaining == shown {
                    return ResetAction::None;
                }
                self.phase = Phase::Counting {
                    started_ms,
                    shown: remaining,
                };
                ResetAction::Countdown(remaining)
            }
            Phase::Flashing {
                started_ms,
                shown_frame,
            } => {
                // The button is ignored until the flash has played out.
                let frame = elapsed_ms(now_ms, started_ms) / self.half_period_ms;
                if frame >= self.flash_frames {
                    self.phase = Phase::Idle;
                    return ResetAction::FlashDone;
                }
                if shown_frame == Some(frame) {
                    return ResetAction::None;
                }
                self.phase = Phase::Flashing {
                    started_ms,
                    shown_frame: Some(frame),
                };
                if frame % 2 == 0 {
                    ResetAction::Flash(FlashFrame::Zeros)
                } else {
                    ResetAction::Flash(FlashFrame::Blank)
                }
            }
        }
    }

    /// `true` while the confirmation flash is playing.
    pub fn is_flashing(&self) -> bool {
        matches!(self.phase, Phase::Flashing { .. })
    }

    /// Whole seconds left: `hold - floor(elapsed / 1000)`, never below zero.
    fn remaining(&self, started_ms: u32, now_ms: u32) -> i32 {
        let whole_secs = (elapsed_ms(now_ms, started_ms) / 1000).min(i32::MAX as u32) as i32;
        (self.hold_secs - whole_secs).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq() -> ResetSequencer {
        ResetSequencer::new(&StationConfig::default())
    }

    #[test]
    fn idle_without_trigger() {
        let mut s = seq();
        assert_eq!(s.step(false, 0), ResetAction::None);
        assert_eq!(s.step(false, 10_000), ResetAction::None);
    }

    #[test]
    fn countdown_shows_each_second_once() {
        let mut s = seq();
        assert_eq!(s.step(true, 0), ResetAction::Started(5));
        assert_eq!(s.step(true, 100), ResetAction::None);
        assert_eq!(s.step(true, 999), ResetAction::None);
        assert_eq!(s.step(true, 1_000), ResetAction::Countdown(4));
        assert_eq!(s.step(true, 2_000), ResetAction::Countdown(3));
        assert_eq!(s.step(true, 3_000), ResetAction::Countdown(2));
        assert_eq!(s.step(true, 4_000), ResetAction::Countdown(1));
    }

    #[test]
    fn shows_one_just_before_expiry() {
        let mut s = seq();
        s.step(true, 0);
        assert_eq!(s.step(true, 4_999), ResetAction::Countdown(1));
        assert_eq!(s.step(true, 5_000), ResetAction::Expired);
        assert!(s.is_flashing());
    }

    #[test]
    fn late_tick_still_expires() {
        let mut s = seq();
        s.step(true, 0);
        assert_eq!(s.step(true, 7_300), ResetAction::Expired);
    }

    #[test]
    fn release_cancels() {
        let mut s = seq();
        s.step(true, 0);
        s.step(true, 2_500);
        assert_eq!(s.step(false, 2_600), ResetAction::Cancelled);
        assert_eq!(s.step(false, 2_650), ResetAction::None);
        assert_eq!(s.step(true, 2_700), ResetAction::Started(5));
    }

    #[test]
    fn flash_plays_zero_blank_three_times() {
        let mut s = seq();
        s.step(true, 0);
        assert_eq!(s.step(true, 5_000), ResetAction::Expired);

        let mut frames = Vec::new();
        let mut t = 5_000;
        loop {
            t += 100;
            match s.step(true, t) {
                ResetAction::Flash(f) => frames.push(f),
                ResetAction::FlashDone => break,
                ResetAction::None => {}
                other => panic!("unexpected action {other:?}"),
            }
        }
        assert_eq!(
            frames,
            [
                FlashFrame::Zeros,
                FlashFrame::Blank,
                FlashFrame::Zeros,
                FlashFrame::Blank,
                FlashFrame::Zeros,
                FlashFrame::Blank,
            ]
        );
        assert_eq!(t, 8_000);
        assert!(!s.is_flashing());
    }

    #[test]
    fn flash_ignores_trigger_changes() {
        let mut s = seq();
        s.step(true, 0);
        s.step(true, 5_000);
        assert_eq!(s.step(false, 5_010), ResetAction::Flash(FlashFrame::Zeros));
        assert_eq!(s.step(true, 5_600), ResetAction::Flash(FlashFrame::Blank));
        assert!(s.is_flashing());
    }

    #[test]
    fn countdown_across_clock_wrap() {
        let mut s = seq();
        let start = u32::MAX - 499;
        s.step(true, start);
        assert_eq!(s.step(true, 500), ResetAction::Countdown(4));
        assert_eq!(s.step(true, 4_500), ResetAction::Expired);
    }
}
