//! Wraparound-safe millisecond tick arithmetic.
//!
//! The station clock is a free-running `u32` millisecond counter that wraps
//! every ~49.7 days. Every elapsed-time comparison in the firmware goes
//! through these helpers so that an overflow between two samples still
//! yields the correct signed difference.

/// Signed difference `later - earlier` in milliseconds, correct across one
/// counter wrap. Differences beyond ±`i32::MAX` are not representable.
#[inline]
pub const fn ticks_diff(later: u32, earlier: u32) -> i32 {
    later.wrapping_sub(earlier) as i32
}

/// Milliseconds elapsed since `since`, clamped at zero when `since` lies
/// in the future.
#[inline]
pub const fn elapsed_ms(now: u32, since: u32) -> u32 {
    let d = ticks_diff(now, since);
    if d < 0 { 0 } else { d as u32 }
}

/// `true` once at least `period_ms` have passed since `since`.
#[inline]
pub const fn has_elapsed(now: u32, since: u32, period_ms: u32) -> bool {
    elapsed_ms(now, since) >= period_ms
}
