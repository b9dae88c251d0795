// libnfctag/src/prelude.rs

pub use crate::config::{EngineConfig, EngineConfigBuilder};
pub use crate::controller::{Command, CommandSink, ControllerEvent, EventHandler, MockController};
pub use crate::discovery::{DiscoverySet, SelectionPolicy};
pub use crate::engine::{PresenceMonitor, PresenceOutcome, SwitchState, TagEngine};
pub use crate::mifare::{MifareClassic, MifareExtension};
pub use crate::observer::TagObserver;
pub use crate::tag::{NdefCapability, NdefInfo, TagSummary};
pub use crate::tech::{ActivationParams, RfTechParams, TechnologyInterpreter, TechnologyRecord};
pub use crate::{
    ActivationState, DeactivationKind, DiscoveryHandle, Error, NciVersion, PresenceCheckAlgorithm,
    ProtocolKind, Result, RfInterface, RfMode, Status, TechnologyKind, Uid,
};

// Re-export small utilities for convenience
pub use crate::utils::{RetryPolicy, bytes_to_hex, bytes_to_hex_spaced, ms};
