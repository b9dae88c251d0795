//! Retry policy values and the "retry until success or exhausted"
//! combinator used by the interface reselect and the Mifare dual-key
//! format.

use std::thread;
use std::time::Duration;

/// Outcome of a single attempt.
#[derive(Debug)]
pub enum Attempt<T, E> {
    /// Stop with a value.
    Done(T),
    /// Transient failure; try again if attempts remain.
    Retry(E),
    /// Terminal failure; do not try again.
    Abort(E),
}

/// Max attempts (including the first) and the pause between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts,
            backoff,
        }
    }

    /// One attempt, no retries.
    pub const fn once() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Run `op` until it returns `Done`/`Abort` or attempts run out. The
    /// attempt index starts at 0. The last `Retry` error is returned when
    /// the policy is exhausted.
    pub fn run<T, E>(&self, mut op: impl FnMut(u32) -> Attempt<T, E>) -> Result<T, E> {
        let max = self.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            match op(attempt) {
                Attempt::Done(v) => return Ok(v),
                Attempt::Abort(e) => return Err(e),
                Attempt::Retry(e) => {
                    attempt += 1;
                    if attempt >= max {
                        return Err(e);
                    }
                    log::debug!("retrying, attempt {}/{}", attempt + 1, max);
                    if !self.backoff.is_zero() {
                        thread::sleep(self.backoff);
                    }
                }
            }
        }
    }
}
