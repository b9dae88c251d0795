//! Utilities for libnfctag: small, reusable helpers used across the crate.
//!
//! Hex formatting for log output, millisecond/timeout helpers, the retry
//! policy combinator and poison-tolerant lock helpers.

pub mod hex;
pub mod retry;
pub mod sync;
pub mod timeout;

pub use hex::*;
pub use retry::{Attempt, RetryPolicy};
pub use timeout::*;
