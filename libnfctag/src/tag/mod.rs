// libnfctag/src/tag/mod.rs
//! Everything known about the tag currently in the field.

pub mod ndef;
pub mod state;
pub mod summary;
pub mod timeouts;

pub use ndef::{NdefCache, NdefCapability, NdefInfo};
pub use state::ActiveTagState;
pub use summary::TagSummary;
pub use timeouts::TransceiveTimeoutTable;
