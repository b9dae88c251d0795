// libnfctag/src/tag/ndef.rs

use crate::types::{NdefFlags, Status};

/// What an NDEF detection said about the tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NdefCapability {
    /// NDEF formatted.
    Ndef,
    /// Not formatted, but the tag can be.
    Formatable,
    /// The technology has no NDEF mapping.
    NotNdef,
    Unknown,
}

/// Result of `check_ndef`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NdefInfo {
    pub max_size: u32,
    pub current_size: u32,
    pub read_only: bool,
    pub capability: NdefCapability,
}

impl NdefInfo {
    pub fn from_detection(status: Status, max_size: u32, current_size: u32, flags: NdefFlags) -> Self {
        let capability = match status {
            Status::Ok => NdefCapability::Ndef,
            Status::Failed if flags.formatable() && !flags.unknown() => NdefCapability::Formatable,
            _ => NdefCapability::Unknown,
        };
        Self {
            max_size,
            current_size,
            read_only: flags.read_only(),
            capability,
        }
    }

    /// Barcode-style tags: nothing to read or write.
    pub fn not_ndef() -> Self {
        Self {
            max_size: 0,
            current_size: 0,
            read_only: true,
            capability: NdefCapability::NotNdef,
        }
    }

    pub fn ndef_capable(&self) -> bool {
        self.capability == NdefCapability::Ndef
    }
}

/// NDEF detection result kept for the current activation.
#[derive(Debug, Clone, Default)]
pub struct NdefCache {
    info: Option<NdefInfo>,
}

impl NdefCache {
    pub fn store(&mut self, info: NdefInfo) {
        self.info = Some(info);
    }

    pub fn clear(&mut self) {
        self.info = None;
    }

    pub fn get(&self) -> Option<&NdefInfo> {
        self.info.as_ref()
    }

    /// Bytes of NDEF content known to be on the tag; 0 when none was
    /// detected.
    pub fn readable_size(&self) -> u32 {
        match &self.info {
            Some(info) if info.ndef_capable() => info.current_size,
            _ => 0,
        }
    }

    pub fn is_not_ndef(&self) -> bool {
        matches!(&self.info, Some(info) if info.capability == NdefCapability::NotNdef)
    }

    /// Detection failed on a tag that can be formatted.
    pub fn needs_format(&self) -> bool {
        matches!(&self.info, Some(info) if info.capability == NdefCapability::Formatable)
    }

    pub(crate) fn note_written(&mut self, len: u32) {
        let info = self.info.get_or_insert(NdefInfo {
            max_size: 0,
            current_size: 0,
            read_only: false,
            capability: NdefCapability::Ndef,
        });
        info.capability = NdefCapability::Ndef;
        info.current_size = len;
    }

    pub(crate) fn note_formatted(&mut self) {
        if let Some(info) = self.info.as_mut() {
            info.capability = NdefCapability::Ndef;
            info.current_size = 0;
        }
    }

    pub(crate) fn note_read_only(&mut self) {
        if let Some(info) = self.info.as_mut() {
            info.read_only = true;
        }
    }
}
