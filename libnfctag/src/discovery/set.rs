// libnfctag/src/discovery/set.rs

use log::warn;

use crate::constants::MAX_DISCOVERY_RECORDS;
use crate::tech::TechnologyRecord;
use crate::types::{DiscoveryHandle, ProtocolKind};

/// Records accumulated during one RF discovery cycle, in notification
/// order.
#[derive(Debug, Clone, Default)]
pub struct DiscoverySet {
    records: Vec<TechnologyRecord>,
    notification_count: u32,
}

impl DiscoverySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything from the previous cycle.
    pub fn clear(&mut self) {
        self.records.clear();
        self.notification_count = 0;
    }

    /// Add the records produced by one discovery notification. Records past
    /// the controller's reporting limit are dropped with a warning.
    pub fn add_notification(&mut self, records: Vec<TechnologyRecord>) {
        self.notification_count += 1;
        for record in records {
            if self.records.len() >= MAX_DISCOVERY_RECORDS {
                warn!(
                    "discovery set full ({} records), dropping {} handle={}",
                    MAX_DISCOVERY_RECORDS, record.technology, record.handle
                );
                continue;
            }
            self.records.push(record);
        }
    }

    pub fn records(&self) -> &[TechnologyRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&TechnologyRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of discovery notifications seen this cycle.
    pub fn notification_count(&self) -> u32 {
        self.notification_count
    }

    pub fn has_p2p(&self) -> bool {
        self.records.iter().any(|r| r.is_nfc_dep())
    }

    pub fn position(&self, handle: DiscoveryHandle, protocol: ProtocolKind) -> Option<usize> {
        self.records
            .iter()
            .position(|r| r.endpoint() == (handle, protocol))
    }

    /// Records reported for `handle` under a protocol other than
    /// `protocol`; the extra faces of a combi-tag.
    pub fn other_protocols_of(
        &self,
        handle: DiscoveryHandle,
        protocol: ProtocolKind,
    ) -> impl Iterator<Item = &TechnologyRecord> {
        self.records
            .iter()
            .filter(move |r| r.handle == handle && r.protocol != protocol)
    }
}
