// libnfctag/src/tech/record.rs

use crate::tech::params::RfTechParams;
use crate::types::{DiscoveryHandle, ProtocolKind, RfMode, SystemCode, TechnologyKind, Uid};

/// One technology identity of a discovered or activated tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TechnologyRecord {
    pub technology: TechnologyKind,
    pub handle: DiscoveryHandle,
    pub protocol: ProtocolKind,
    pub raw_params: RfTechParams,
}

impl TechnologyRecord {
    pub fn new(
        technology: TechnologyKind,
        handle: DiscoveryHandle,
        protocol: ProtocolKind,
        raw_params: RfTechParams,
    ) -> Self {
        Self {
            technology,
            handle,
            protocol,
            raw_params,
        }
    }

    pub fn mode(&self) -> RfMode {
        self.raw_params.mode
    }

    pub fn is_nfc_dep(&self) -> bool {
        self.protocol == ProtocolKind::NfcDep
    }

    /// SAK of NFC-A bearing records.
    pub fn sak(&self) -> Option<u8> {
        self.raw_params.sak()
    }

    pub fn uid(&self) -> Uid {
        self.raw_params.uid()
    }

    /// Felica record whose reported system codes include Felica Lite.
    pub fn is_felica_lite(&self) -> bool {
        self.technology == TechnologyKind::Felica
            && self.raw_params.has_system_code(SystemCode::FELICA_LITE)
    }

    /// (handle, protocol) pair identifying the selectable endpoint.
    pub fn endpoint(&self) -> (DiscoveryHandle, ProtocolKind) {
        (self.handle, self.protocol)
    }
}
