//! Persistent dispensed-volume counter.
//!
//! The counter is stored as decimal ASCII text in a single record so the
//! value can be read back with any NVS tool. Every mutation is written
//! through immediately; a failed write leaves the in-memory value
//! authoritative and marks it unsaved so [`VolumeCounter::flush`] retries.
//! Only the first failure and the eventual recovery are logged.

use core::fmt::Write as _;

use heapless::String;
use log::{error, info, warn};

use crate::app::ports::{StorageError, StoragePort};

/// NVS namespace of the volume record.
pub const VOLUME_NAMESPACE: &str = "oil";
/// NVS key of the volume record.
pub const VOLUME_KEY: &str = "volume";

/// Longest decimal rendering of a `u32`.
const MAX_DIGITS: usize = 10;

/// Read buffer for the record: the digits plus room for stray whitespace.
/// A read that fills it may have been cut short.
const RECORD_BUF: usize = 16;

/// Dispensed volume in flow pulses.
#[derive(Debug, Clone, Default)]
pub struct VolumeCounter {
    value: u32,
    unsaved: bool,
}

impl VolumeCounter {
    /// Load the counter, falling back to 0 when the record is missing,
    /// unreadable or not a non-negative decimal number.
    pub fn load(store: &impl StoragePort) -> Self {
        let mut buf = [0u8; RECORD_BUF];
        let value = match store.read(VOLUME_NAMESPACE, VOLUME_KEY, &mut buf) {
            Ok(len) if len >= buf.len() => {
                warn!("Volume record longer than {RECORD_BUF} bytes, starting from 0");
                0
            }
            Ok(len) => parse_volume(&buf[..len]).unwrap_or_else(|| {
                warn!("Volume record is not a valid count, starting from 0");
                0
            }),
            Err(StorageError::NotFound) => {
                info!("No volume record, starting from 0");
                0
            }
            Err(e) => {
                warn!("Volume record unreadable ({e}), starting from 0");
                0
            }
        };
        info!("Loaded oil volume: {value}");
        Self {
            value,
            unsaved: false,
        }
    }

    /// Current in-memory count.
    pub fn value(&self) -> u32 {
        self.value
    }

    /// `true` if the last write to storage failed.
    pub fn is_unsaved(&self) -> bool {
        self.unsaved
    }

    /// Count one confirmed pulse and persist it.
    pub fn increment(&mut self, store: &mut impl StoragePort) -> Result<u32, StorageError> {
        self.value = self.value.saturating_add(1);
        self.persist(store).map(|()| self.value)
    }

    /// Zero the counter and persist it.
    pub fn reset(&mut self, store: &mut impl StoragePort) -> Result<(), StorageError> {
        self.value = 0;
        self.persist(store)
    }

    /// Retry a write that failed earlier. `None` when nothing is pending.
    pub fn flush(&mut self, store: &mut impl StoragePort) -> Option<Result<(), StorageError>> {
        self.unsaved.then(|| self.persist(store))
    }

    fn persist(&mut self, store: &mut impl StoragePort) -> Result<(), StorageError> {
        let text = format_volume(self.value);
        let result = store.write(VOLUME_NAMESPACE, VOLUME_KEY, text.as_bytes());
        match (&result, self.unsaved) {
            (Err(e), false) => error!("Failed to persist volume {}: {e}, will retry", self.value),
            (Ok(()), true) => info!("Volume {} persisted after earlier failure", self.value),
            _ => {}
        }
        self.unsaved = result.is_err();
        result
    }
}

/// Parse a stored record. Surrounding whitespace is tolerated; anything
/// else that is not a non-negative decimal integer yields `None`.
pub fn parse_volume(bytes: &[u8]) -> Option<u32> {
    let text = core::str::from_utf8(bytes).ok()?;
    let text = text.trim_matches(|c: char| c.is_ascii_whitespace() || c == '\0');
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Render a count as decimal text.
pub fn format_volume(value: u32) -> String<MAX_DIGITS> {
    let mut s = String::new();
    // Ten digits always fit a u32.
    let _ = write!(s, "{value}");
    s
}
