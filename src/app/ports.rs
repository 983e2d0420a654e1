//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ StationService (domain)
//! ```
//!
//! Driven adapters (input lines, relays and indicators, the 4-digit display,
//! storage, event sinks) implement these traits. The
//! [`StationService`](super::service::StationService) consumes them via
//! generics, so the domain core never touches hardware directly.
//!
//! All line values crossing these ports are **logical**: `true` means
//! "asserted" for inputs and "on/energised" for outputs. Electrical polarity
//! is resolved inside the drivers.

use crate::config::StationConfig;
use crate::error::SensorError;

// ───────────────────────────────────────────────────────────────
// Line identities
// ───────────────────────────────────────────────────────────────

/// Logical digital inputs of the station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputLine {
    /// Flow meter pulse output (high while a pulse is present).
    FlowPulse,
    /// Manual fill button (asserted while pressed).
    FillButton,
    /// Low-level switch (asserted when oil is low).
    LowLevel,
    /// Full-level switch (asserted when the tank is full).
    FullLevel,
}

impl InputLine {
    pub const ALL: [Self; 4] = [
        Self::FlowPulse,
        Self::FillButton,
        Self::LowLevel,
        Self::FullLevel,
    ];
}

/// Logical digital outputs of the station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputLine {
    PumpRelayA,
    PumpRelayB,
    PumpLedA,
    PumpLedB,
    LowIndicator,
    /// Optional under-hood "tank full" lamp.
    UnderHoodFull,
}

impl OutputLine {
    pub const ALL: [Self; 6] = [
        Self::PumpRelayA,
        Self::PumpRelayB,
        Self::PumpLedA,
        Self::PumpLedB,
        Self::LowIndicator,
        Self::UnderHoodFull,
    ];
}

// ───────────────────────────────────────────────────────────────
// Input port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to sample one input line.
pub trait InputPort {
    /// Read the logical level of `line`.
    fn read_line(&mut self, line: InputLine) -> Result<bool, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Output port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to switch relays and lamps.
pub trait OutputPort {
    /// Drive `line` to the logical state `on`.
    fn write_line(&mut self, line: OutputLine, on: bool);

    /// Switch every output off: safe state.
    fn all_off(&mut self) {
        for line in OutputLine::ALL {
            self.write_line(line, false);
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Display port (driven adapter: domain → 4-digit display)
// ───────────────────────────────────────────────────────────────

/// Raw frame with a `0` in every digit.
pub const SEGMENTS_ALL_ZERO: [u8; 4] = [0x3F; 4];
/// Raw frame with every segment dark.
pub const SEGMENTS_BLANK: [u8; 4] = [0x00; 4];

/// The 4-digit numeric display.
pub trait DisplayPort {
    /// Render `value` right-justified.
    fn show_number(&mut self, value: i32);

    /// Write a raw frame, one segment byte per digit (left to right).
    fn show_segments(&mut self, segments: [u8; 4]);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists station configuration.
///
/// Values are range-checked in both directions: an out-of-range record is
/// neither written nor returned. Invalid ranges are rejected with
/// [`ConfigError::ValidationFailed`], not silently clamped.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    /// Returns [`StationConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<StationConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &StationConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Storage port (driven adapter: domain ↔ NVS / flash)
// ───────────────────────────────────────────────────────────────

/// Persistent key-value byte storage.
///
/// Write operations MUST be atomic: no partial writes on power loss.
/// The ESP-IDF NVS API guarantees this natively; the in-memory simulation
/// achieves it trivially.
pub trait StoragePort {
    /// Read a value. Returns the number of bytes written to `buf`.
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError>;

    /// Write a value atomically.
    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

/// Errors from [`StoragePort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Requested key does not exist.
    NotFound,
    /// Storage partition is full.
    Full,
    /// Generic I/O error.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "key not found"),
            Self::Full => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
