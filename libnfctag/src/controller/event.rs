// libnfctag/src/controller/event.rs

use crate::tech::{ActivationParams, RfTechParams};
use crate::types::{DeactivationKind, DiscoveryHandle, NdefFlags, ProtocolKind, RfInterface, Status};

/// Already-decoded notification from the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    DiscoveryResult {
        protocol: ProtocolKind,
        handle: DiscoveryHandle,
        params: RfTechParams,
        more_follows: bool,
    },
    Activated {
        protocol: ProtocolKind,
        handle: DiscoveryHandle,
        params: RfTechParams,
        interface: RfInterface,
        activation: ActivationParams,
    },
    Deactivated {
        kind: DeactivationKind,
    },
    /// Confirmation of a select command. A failure here does not mean the
    /// tag is gone.
    SelectResult {
        status: Status,
    },
    /// NDEF payload chunk, delivered before `ReadComplete`.
    NdefData {
        bytes: Vec<u8>,
    },
    ReadComplete {
        status: Status,
    },
    WriteComplete {
        status: Status,
    },
    FormatComplete {
        status: Status,
    },
    ReadOnlyComplete {
        status: Status,
    },
    NdefDetect {
        status: Status,
        max_size: u32,
        current_size: u32,
        flags: NdefFlags,
    },
    PresenceCheckResult {
        status: Status,
    },
    /// Raw frame response; `Status::Continue` means more chunks follow.
    DataReceived {
        status: Status,
        bytes: Vec<u8>,
    },
    RfInterfaceTimeout,
}

impl ControllerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ControllerEvent::DiscoveryResult { .. } => "discovery_result",
            ControllerEvent::Activated { .. } => "activated",
            ControllerEvent::Deactivated { .. } => "deactivated",
            ControllerEvent::SelectResult { .. } => "select_result",
            ControllerEvent::NdefData { .. } => "ndef_data",
            ControllerEvent::ReadComplete { .. } => "read_complete",
            ControllerEvent::WriteComplete { .. } => "write_complete",
            ControllerEvent::FormatComplete { .. } => "format_complete",
            ControllerEvent::ReadOnlyComplete { .. } => "read_only_complete",
            ControllerEvent::NdefDetect { .. } => "ndef_detect",
            ControllerEvent::PresenceCheckResult { .. } => "presence_check_result",
            ControllerEvent::DataReceived { .. } => "data_received",
            ControllerEvent::RfInterfaceTimeout => "rf_interface_timeout",
        }
    }
}
