// libnfctag/src/discovery/selection.rs

use log::{debug, error};

use crate::discovery::set::DiscoverySet;
use crate::tech::TechnologyRecord;
use crate::types::{DiscoveryHandle, ProtocolKind, RfInterface};

/// Which discovered endpoint to activate first, and which next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectionPolicy {
    /// Peer-to-peer is enabled locally.
    pub p2p_enabled: bool,
    /// Reader-only mode never picks a peer-to-peer endpoint.
    pub reader_only: bool,
}

/// Multi-tag bookkeeping for a finished discovery cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MultiTagInfo {
    /// Competing physical endpoints, not counting a P2P record that shares
    /// the field with tags.
    pub candidates: u32,
    pub has_p2p: bool,
    pub multiprotocol: bool,
}

impl SelectionPolicy {
    pub fn new(p2p_enabled: bool, reader_only: bool) -> Self {
        Self {
            p2p_enabled,
            reader_only,
        }
    }

    fn p2p_allowed(&self) -> bool {
        self.p2p_enabled && !self.reader_only
    }

    /// First non-P2P record, unless a P2P endpoint is present and allowed.
    pub fn select_first<'a>(&self, set: &'a DiscoverySet) -> Option<&'a TechnologyRecord> {
        if set.has_p2p() && self.p2p_allowed() {
            if let Some(p2p) = self.select_p2p(set) {
                return Some(p2p);
            }
        }
        let first = set.records().iter().find(|r| !r.is_nfc_dep());
        if first.is_none() {
            debug!("no selectable tag among {} records", set.len());
        }
        first
    }

    /// Among NFC-DEP records prefer Poll-F over Poll-A.
    pub fn select_p2p<'a>(&self, set: &'a DiscoverySet) -> Option<&'a TechnologyRecord> {
        let mut nfc_a = None;
        for record in set.records().iter().filter(|r| r.is_nfc_dep()) {
            if record.mode().is_poll_f() {
                return Some(record);
            }
            if nfc_a.is_none() && record.mode().is_poll_a() {
                nfc_a = Some(record);
            }
        }
        if nfc_a.is_none() {
            error!("cannot find P2P");
        }
        nfc_a
    }

    /// Next non-P2P record after `previous`, scanning circularly. `None`
    /// when nothing but the previous endpoint (or P2P) is left.
    pub fn select_next<'a>(
        &self,
        set: &'a DiscoverySet,
        previous: (DiscoveryHandle, ProtocolKind),
    ) -> Option<&'a TechnologyRecord> {
        let len = set.len();
        if len == 0 {
            return None;
        }
        let start = set
            .position(previous.0, previous.1)
            .map_or(0, |i| (i + 1) % len);
        (0..len)
            .map(|offset| &set.records()[(start + offset) % len])
            .find(|r| r.endpoint() != previous && !r.is_nfc_dep())
    }

    pub fn multi_tag_info(&self, set: &DiscoverySet) -> MultiTagInfo {
        let has_p2p = set.has_p2p();
        let mut candidates = set.notification_count();
        if has_p2p && candidates > 1 {
            candidates -= 1;
        }
        MultiTagInfo {
            candidates,
            has_p2p,
            multiprotocol: candidates > 1,
        }
    }
}

/// RF interface a protocol is selected with.
pub fn interface_for_protocol(protocol: ProtocolKind) -> RfInterface {
    match protocol {
        ProtocolKind::IsoDep => RfInterface::IsoDep,
        ProtocolKind::Mifare => RfInterface::Mifare,
        ProtocolKind::NfcDep => RfInterface::NfcDep,
        _ => RfInterface::Frame,
    }
}
