// libnfctag/src/discovery/mod.rs
//! Discovery-cycle bookkeeping and the policy choosing which discovered
//! endpoint to activate.

pub mod selection;
pub mod set;

pub use selection::{MultiTagInfo, SelectionPolicy, interface_for_protocol};
pub use set::DiscoverySet;
