// libnfctag/src/lib.rs

//! libnfctag
//!
//! Tag-side control plane for NCI-based NFC controllers: interprets
//! discovery and activation notifications, picks which tag to activate,
//! switches RF interfaces, and runs blocking read/write/transceive and
//! presence-check operations against the tag in the field.

pub mod config;
pub mod constants;
pub mod controller;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod mifare;
pub mod observer;
pub mod prelude;
pub mod tag;
pub mod tech;
pub mod test_support;
pub mod types;
pub mod utils;

// Re-export common types at crate root so `crate::Error`, `crate::Result`,
// and the newtypes in `types` are available for consumers and for
// convenient `prelude` re-exports.
pub use crate::error::*;
pub use crate::types::*;

pub use prelude::*;
