//! Timeout helpers used across the crate.
//!
//! These centralize the bounded waits of the RF interface switch and the
//! presence monitor so config defaults and tests express them the same way.

use std::time::Duration;

/// Bounded wait for a deactivate confirmation.
pub const DEFAULT_DEACTIVATE_TIMEOUT_MS: u64 = 1000;

/// Bounded wait for a select confirmation.
pub const DEFAULT_SELECT_TIMEOUT_MS: u64 = 1000;

/// Pause between select retries.
pub const DEFAULT_SELECT_RETRY_BACKOFF_MS: u64 = 500;

/// Presence monitor poll interval.
pub const DEFAULT_PRESENCE_INTERVAL_MS: u64 = 125;

/// Response window for the polite sleep frame sent before a reselect.
pub const DEFAULT_SLEEP_FRAME_WINDOW_MS: u64 = 4;

/// Convert milliseconds to Duration.
pub fn ms(ms: u64) -> Duration {
    Duration::from_millis(ms)
}
