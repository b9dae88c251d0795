// libnfctag/src/types.rs

use std::convert::TryFrom;
use std::time::Duration;

use derive_more::{Display, From};

use crate::Error;
use crate::constants::*;

/// RF discovery id assigned by the controller to a discovered endpoint.
#[derive(Debug, Display, From, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiscoveryHandle(u8);

impl DiscoveryHandle {
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    pub fn as_u8(&self) -> u8 {
        self.0
    }
}

/// Tag identifier (NFCID1, NFCID0, NFCID2, NFC-V UID or Kovio barcode).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Uid(Vec<u8>);

impl Uid {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_hex(&self) -> String {
        crate::utils::bytes_to_hex(&self.0)
    }
}

/// Felica IDm (NFCID2), the first 8 bytes of SENSF_RES.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Idm([u8; 8]);

impl Idm {
    pub fn from_bytes(bytes: [u8; 8]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        crate::utils::bytes_to_hex(self.as_bytes())
    }
}

impl TryFrom<&[u8]> for Idm {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        <[u8; 8]>::try_from(bytes)
            .map(Self)
            .map_err(|_| Error::Validation(format!("IDm must be 8 bytes, got {}", bytes.len())))
    }
}

/// Felica system code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SystemCode(u16);

impl SystemCode {
    pub const FELICA_LITE: Self = Self(FELICA_LITE_SYSTEM_CODE);

    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    pub fn as_u16(&self) -> u16 {
        self.0
    }

    pub fn from_be_bytes(bytes: [u8; 2]) -> Self {
        Self(u16::from_be_bytes(bytes))
    }
}

/// Completion / acceptance status reported by the controller stack.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Status {
    #[display(fmt = "ok")]
    Ok,
    #[display(fmt = "failed")]
    Failed,
    #[display(fmt = "rejected")]
    Rejected,
    #[display(fmt = "timeout")]
    Timeout,
    /// More data follows (chunked data exchange).
    #[display(fmt = "continue")]
    Continue,
    #[display(fmt = "other({:#04x})", _0)]
    Other(u8),
}

impl Status {
    pub fn is_ok(&self) -> bool {
        matches!(self, Status::Ok)
    }
}

/// Flags returned with an NDEF detection result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NdefFlags(u8);

impl NdefFlags {
    pub const READ_ONLY: u8 = 0x01;
    pub const FORMATTED: u8 = 0x02;
    pub const SUPPORTED: u8 = 0x04;
    /// Unable to tell whether the tag is NDEF capable.
    pub const UNKNOWN: u8 = 0x08;
    /// The tag supports the format operation.
    pub const FORMATABLE: u8 = 0x10;

    pub const fn new(bits: u8) -> Self {
        Self(bits)
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn contains(&self, flag: u8) -> bool {
        self.0 & flag == flag
    }

    pub fn read_only(&self) -> bool {
        self.contains(Self::READ_ONLY)
    }

    pub fn formatable(&self) -> bool {
        self.contains(Self::FORMATABLE)
    }

    pub fn unknown(&self) -> bool {
        self.contains(Self::UNKNOWN)
    }
}

/// Application-visible technology.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TechnologyKind {
    #[display(fmt = "ISO14443-3A")]
    Iso14443_3A,
    #[display(fmt = "ISO14443-3B")]
    Iso14443_3B,
    #[display(fmt = "ISO14443-4")]
    Iso14443_4,
    #[display(fmt = "Felica")]
    Felica,
    #[display(fmt = "ISO15693")]
    Iso15693,
    #[display(fmt = "MifareUltralight")]
    MifareUltralight,
    #[display(fmt = "MifareClassic")]
    MifareClassic,
    #[display(fmt = "KovioBarcode")]
    KovioBarcode,
    #[display(fmt = "Unknown")]
    Unknown,
}

impl TechnologyKind {
    pub const ALL: [TechnologyKind; 9] = [
        TechnologyKind::Iso14443_3A,
        TechnologyKind::Iso14443_3B,
        TechnologyKind::Iso14443_4,
        TechnologyKind::Felica,
        TechnologyKind::Iso15693,
        TechnologyKind::MifareUltralight,
        TechnologyKind::MifareClassic,
        TechnologyKind::KovioBarcode,
        TechnologyKind::Unknown,
    ];

    /// Position in [`TechnologyKind::ALL`].
    pub fn index(self) -> usize {
        match self {
            TechnologyKind::Iso14443_3A => 0,
            TechnologyKind::Iso14443_3B => 1,
            TechnologyKind::Iso14443_4 => 2,
            TechnologyKind::Felica => 3,
            TechnologyKind::Iso15693 => 4,
            TechnologyKind::MifareUltralight => 5,
            TechnologyKind::MifareClassic => 6,
            TechnologyKind::KovioBarcode => 7,
            TechnologyKind::Unknown => 8,
        }
    }

    /// Default transceive timeout. These encode RF protocol timing and
    /// must not be changed casually.
    pub fn default_timeout(self) -> Duration {
        let ms = match self {
            TechnologyKind::Iso14443_3A => NFC_A_TIMEOUT_MS,
            TechnologyKind::Iso14443_3B => NFC_B_TIMEOUT_MS,
            TechnologyKind::Iso14443_4 => ISO_DEP_TIMEOUT_MS,
            TechnologyKind::Felica => FELICA_TIMEOUT_MS,
            TechnologyKind::Iso15693 => NFC_V_TIMEOUT_MS,
            TechnologyKind::MifareUltralight => MIFARE_ULTRALIGHT_TIMEOUT_MS,
            TechnologyKind::MifareClassic => MIFARE_CLASSIC_TIMEOUT_MS,
            TechnologyKind::KovioBarcode => KOVIO_TIMEOUT_MS,
            TechnologyKind::Unknown => UNKNOWN_TIMEOUT_MS,
        };
        Duration::from_millis(ms)
    }

    /// Largest raw frame accepted by `transceive` for this technology.
    pub fn max_transceive_len(self) -> usize {
        match self {
            TechnologyKind::Iso14443_3A => MAX_TRANSCEIVE_NFC_A,
            TechnologyKind::Iso14443_3B => MAX_TRANSCEIVE_NFC_B,
            TechnologyKind::Iso14443_4 => MAX_TRANSCEIVE_ISO_DEP,
            TechnologyKind::Felica => MAX_TRANSCEIVE_FELICA,
            TechnologyKind::Iso15693 => MAX_TRANSCEIVE_NFC_V,
            TechnologyKind::MifareUltralight | TechnologyKind::MifareClassic => {
                MAX_TRANSCEIVE_MIFARE
            }
            TechnologyKind::KovioBarcode | TechnologyKind::Unknown => 0,
        }
    }
}

/// Controller-level RF protocol.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProtocolKind {
    #[display(fmt = "T1T")]
    T1t,
    #[display(fmt = "T2T")]
    T2t,
    #[display(fmt = "T3T")]
    T3t,
    #[display(fmt = "ISO-DEP")]
    IsoDep,
    #[display(fmt = "T5T")]
    T5t,
    #[display(fmt = "Mifare")]
    Mifare,
    #[display(fmt = "Kovio")]
    Kovio,
    #[display(fmt = "NFC-DEP")]
    NfcDep,
    #[display(fmt = "Unknown({:#04x})", _0)]
    Unknown(u8),
}

impl ProtocolKind {
    /// Map an NCI RF protocol value.
    pub fn from_nci(value: u8) -> Self {
        match value {
            0x01 => ProtocolKind::T1t,
            0x02 => ProtocolKind::T2t,
            0x03 => ProtocolKind::T3t,
            0x04 => ProtocolKind::IsoDep,
            0x05 => ProtocolKind::NfcDep,
            0x06 => ProtocolKind::T5t,
            0x80 => ProtocolKind::Mifare,
            0x8A => ProtocolKind::Kovio,
            other => ProtocolKind::Unknown(other),
        }
    }

    pub fn to_nci(self) -> u8 {
        match self {
            ProtocolKind::T1t => 0x01,
            ProtocolKind::T2t => 0x02,
            ProtocolKind::T3t => 0x03,
            ProtocolKind::IsoDep => 0x04,
            ProtocolKind::NfcDep => 0x05,
            ProtocolKind::T5t => 0x06,
            ProtocolKind::Mifare => 0x80,
            ProtocolKind::Kovio => 0x8A,
            ProtocolKind::Unknown(v) => v,
        }
    }
}

/// Controller-side data exchange interface.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RfInterface {
    Frame,
    IsoDep,
    Mifare,
    NfcDep,
}

/// NCI RF technology and mode.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RfMode {
    PollA,
    PollAActive,
    PollB,
    PollBPrime,
    PollF,
    PollFActive,
    PollV,
    PollKovio,
    ListenA,
    ListenAActive,
    ListenB,
    ListenBPrime,
    ListenF,
    ListenFActive,
    ListenV,
    #[display(fmt = "Unknown({:#04x})", _0)]
    Unknown(u8),
}

impl RfMode {
    pub fn from_nci(value: u8) -> Self {
        match value {
            0x00 => RfMode::PollA,
            0x01 => RfMode::PollB,
            0x02 => RfMode::PollF,
            0x03 => RfMode::PollAActive,
            0x05 => RfMode::PollFActive,
            0x06 => RfMode::PollV,
            0x74 => RfMode::PollBPrime,
            0x77 => RfMode::PollKovio,
            0x80 => RfMode::ListenA,
            0x81 => RfMode::ListenB,
            0x82 => RfMode::ListenF,
            0x83 => RfMode::ListenAActive,
            0x85 => RfMode::ListenFActive,
            0x86 => RfMode::ListenV,
            0xF4 => RfMode::ListenBPrime,
            other => RfMode::Unknown(other),
        }
    }

    /// NFC-A family, passive or active, poll or listen.
    pub fn is_nfc_a(self) -> bool {
        matches!(
            self,
            RfMode::PollA | RfMode::PollAActive | RfMode::ListenA | RfMode::ListenAActive
        )
    }

    /// NFC-B family including B-Prime.
    pub fn is_nfc_b(self) -> bool {
        matches!(
            self,
            RfMode::PollB | RfMode::PollBPrime | RfMode::ListenB | RfMode::ListenBPrime
        )
    }

    pub fn is_poll_f(self) -> bool {
        matches!(self, RfMode::PollF | RfMode::PollFActive)
    }

    pub fn is_poll_a(self) -> bool {
        matches!(self, RfMode::PollA | RfMode::PollAActive)
    }
}

/// Global activation state of the tag in the field.
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActivationState {
    #[default]
    Idle,
    Sleep,
    Active,
}

/// Kind of deactivation reported by the controller.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeactivationKind {
    Idle,
    Sleep,
}

/// Presence check method requested from the controller.
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PresenceCheckAlgorithm {
    #[default]
    Default,
    IBlock,
    SleepWakeup,
    IsoDepNak,
}

/// NCI version spoken by the controller.
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NciVersion {
    #[display(fmt = "1.0")]
    V1_0,
    #[default]
    #[display(fmt = "2.0")]
    V2_0,
}
