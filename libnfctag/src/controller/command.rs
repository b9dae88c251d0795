// libnfctag/src/controller/command.rs

use crate::types::{DiscoveryHandle, PresenceCheckAlgorithm, ProtocolKind, RfInterface};

/// Requests the engine hands to the controller stack. Outcomes arrive
/// later as [`ControllerEvent`](crate::controller::ControllerEvent)s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    StartDiscovery,
    StopDiscovery,
    Select {
        handle: DiscoveryHandle,
        protocol: ProtocolKind,
        interface: RfInterface,
    },
    Deactivate {
        to_sleep: bool,
    },
    ReadNdef,
    WriteNdef(Vec<u8>),
    DetectNdef,
    Format,
    SetReadOnly {
        hard: bool,
    },
    PresenceCheck(PresenceCheckAlgorithm),
    SendRawFrame(Vec<u8>),
    /// Mifare Classic extension request.
    Mifare(MifareCommand),
}

/// Requests served by the controller's Mifare Classic extension. They
/// complete through the same events as their generic counterparts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MifareCommand {
    Init,
    ReadNdef,
    WriteNdef(Vec<u8>),
    DetectNdef,
    Format { key: [u8; 6] },
    SetReadOnly { key: [u8; 6] },
    PresenceCheck,
    Transceive(Vec<u8>),
}

impl Command {
    /// Short name used in logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Command::StartDiscovery => "start_discovery",
            Command::StopDiscovery => "stop_discovery",
            Command::Select { .. } => "select",
            Command::Deactivate { .. } => "deactivate",
            Command::ReadNdef => "read_ndef",
            Command::WriteNdef(_) => "write_ndef",
            Command::DetectNdef => "detect_ndef",
            Command::Format => "format",
            Command::SetReadOnly { .. } => "set_read_only",
            Command::PresenceCheck(_) => "presence_check",
            Command::SendRawFrame(_) => "send_raw_frame",
            Command::Mifare(m) => m.name(),
        }
    }
}

impl MifareCommand {
    pub fn name(&self) -> &'static str {
        match self {
            MifareCommand::Init => "mifare_init",
            MifareCommand::ReadNdef => "mifare_read_ndef",
            MifareCommand::WriteNdef(_) => "mifare_write_ndef",
            MifareCommand::DetectNdef => "mifare_detect_ndef",
            MifareCommand::Format { .. } => "mifare_format",
            MifareCommand::SetReadOnly { .. } => "mifare_set_read_only",
            MifareCommand::PresenceCheck => "mifare_presence_check",
            MifareCommand::Transceive(_) => "mifare_transceive",
        }
    }
}
