//! Debounced flow meter pulse detection.
//!
//! The flow meter raises its output once per unit of dispensed oil. A
//! pulse counts only if the line goes 0→1 and then still reads 1 when the
//! settle window has passed; any low sample inside the window discards the
//! edge as noise.
//!
//! ```text
//!  level   ___|‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾|___     ___|‾‾‾|_____
//!             ^ armed        ^ confirmed           ^ armed, rejected
//!             |<- settle_ms ->|
//! ```
//!
//! The detector is sampled; it never sleeps. Only one pulse is confirmed per
//! rising edge, the next one needs a low sample first.

use crate::ticks::has_elapsed;

/// Rising-edge debouncer for the flow meter line.
#[derive(Debug, Clone)]
pub struct FlowCounter {
    settle_ms: u32,
    last_level: bool,
    /// Timestamp of the rising edge currently being confirmed.
    pending_since: Option<u32>,
}

impl FlowCounter {
    pub fn new(settle_ms: u32) -> Self {
        Self {
            settle_ms,
            last_level: false,
            pending_since: None,
        }
    }

    /// Feed one sample. Returns `true` exactly when a pulse is confirmed.
    pub fn poll(&mut self, level: bool, now_ms: u32) -> bool {
        let was = self.last_level;
        self.last_level = level;

        if let Some(since) = self.pending_since {
            if !level {
                self.pending_since = None;
                return false;
            }
            return self.try_confirm(since, now_ms);
        }

        if level && !was {
            self.pending_since = Some(now_ms);
            return self.try_confirm(now_ms, now_ms);
        }

        false
    }

    /// Drop any half-confirmed edge (fill cycle ended).
    pub fn clear_pending(&mut self) {
        self.pending_since = None;
    }

    fn try_confirm(&mut self, since: u32, now_ms: u32) -> bool {
        if has_elapsed(now_ms, since, self.settle_ms) {
            self.pending_since = None;
            true
        } else {
            false
        }
    }
}
