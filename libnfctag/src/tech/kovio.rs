// libnfctag/src/tech/kovio.rs

use std::time::{Duration, Instant};

use crate::constants::KOVIO_DEDUP_WINDOW_MS;

/// Last Kovio activation seen, used to mask the controller reporting the
/// same barcode twice.
#[derive(Debug, Clone, Default)]
pub struct KovioDedupState {
    last_uid: Vec<u8>,
    last_time: Option<Instant>,
}

impl KovioDedupState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an activation attempt and report whether it repeats the
    /// previous one within the de-dup window.
    pub fn observe(&mut self, uid: &[u8], now: Instant) -> bool {
        let window = Duration::from_millis(KOVIO_DEDUP_WINDOW_MS);
        let duplicate = self.last_uid.len() == uid.len()
            && self.last_uid == uid
            && self
                .last_time
                .is_some_and(|t| now.saturating_duration_since(t) < window);

        self.last_uid = uid.to_vec();
        self.last_time = Some(now);
        duplicate
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
