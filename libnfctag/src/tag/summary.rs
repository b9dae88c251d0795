// libnfctag/src/tag/summary.rs

use crate::constants::RANDOM_UID_PREFIX;
use crate::tag::state::ActiveTagState;
use crate::tech::TechParams;
use crate::types::{DiscoveryHandle, ProtocolKind, TechnologyKind, Uid};

/// What the lifecycle observer is told about an arriving tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagSummary {
    pub technologies: Vec<TechnologyKind>,
    pub handles: Vec<DiscoveryHandle>,
    pub protocols: Vec<ProtocolKind>,
    pub uid: Uid,
    pub felica_lite: bool,
    pub t1t_max_message_size: u32,
    pub multiprotocol: bool,
    /// The UID is regenerated on every activation.
    pub dynamic_uid: bool,
}

impl TagSummary {
    pub fn from_state(state: &ActiveTagState) -> Self {
        let records = state.records();
        let first = records.first();
        let dynamic_uid = first.is_some_and(|r| match &r.raw_params.tech {
            TechParams::NfcA(a) => a.nfcid1.first() == Some(&RANDOM_UID_PREFIX),
            TechParams::NfcB(_) => true,
            _ => false,
        });
        Self {
            technologies: records.iter().map(|r| r.technology).collect(),
            handles: records.iter().map(|r| r.handle).collect(),
            protocols: records.iter().map(|r| r.protocol).collect(),
            uid: first.map(|r| r.uid()).unwrap_or_default(),
            felica_lite: records.iter().any(|r| r.is_felica_lite()),
            t1t_max_message_size: state.t1t_max_message_size(),
            multiprotocol: state.multiprotocol(),
            dynamic_uid,
        }
    }
}
