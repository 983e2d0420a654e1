//! Outbound application events.
//!
//! The [`StationService`](super::service::StationService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on
//! the other side decide what to do with them: log to serial, record in a
//! test, etc.

use crate::fsm::StateId;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The service has started (carries the loaded volume).
    Started { volume: u32 },

    /// The low-level switch just reported low oil.
    LowOil,

    /// A fill cycle began on pump A.
    PumpEngaged,

    /// No flow for the swap timeout; the other pump took over.
    PumpSwitched { from: StateId, to: StateId },

    /// A debounced flow pulse was counted (carries the new volume).
    PulseCounted(u32),

    /// The tank reached full and the fill cycle ended.
    OilFull { volume: u32 },

    /// A press-and-hold reset countdown started.
    CountdownStarted { hold_secs: u8 },

    /// The countdown was abandoned before it expired.
    CountdownCancelled { volume: u32 },

    /// The hold completed and the volume was zeroed.
    VolumeReset { hold_secs: u8 },

    /// The post-reset confirmation flash finished.
    FlashFinished,

    /// Writing the volume to storage failed; it stays in memory and is
    /// retried every tick. Emitted once per outage.
    PersistFailed { volume: u32 },

    /// A write succeeded after an earlier failure.
    PersistRecovered { volume: u32 },

    /// One or more safety interlocks tripped.
    SafetyFault(u8),
}
