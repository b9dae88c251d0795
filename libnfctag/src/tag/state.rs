// libnfctag/src/tag/state.rs

use crate::discovery::MultiTagInfo;
use crate::tech::{ActivationParams, TechnologyRecord, t1t_max_message_size};
use crate::types::{ActivationState, DiscoveryHandle, ProtocolKind, RfInterface, TechnologyKind};

/// The activated tag.
///
/// While `activation_state` is `Active` the record list is non-empty and
/// `selected_record_index` points into it.
#[derive(Debug, Clone)]
pub struct ActiveTagState {
    records: Vec<TechnologyRecord>,
    activation_state: ActivationState,
    current_interface: RfInterface,
    selected_record_index: usize,
    multiprotocol: bool,
    discovery_notification_count: u32,
    activation_params: ActivationParams,
    t1t_max_message_size: u32,
}

impl Default for ActiveTagState {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            activation_state: ActivationState::Idle,
            current_interface: RfInterface::Frame,
            selected_record_index: 0,
            multiprotocol: false,
            discovery_notification_count: 0,
            activation_params: ActivationParams::None,
            t1t_max_message_size: 0,
        }
    }
}

impl ActiveTagState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a freshly activated tag. `records` must be non-empty.
    pub(crate) fn activate(
        &mut self,
        records: Vec<TechnologyRecord>,
        interface: RfInterface,
        activation: ActivationParams,
        multi: MultiTagInfo,
    ) {
        let is_t1t = records.first().map(|r| r.protocol) == Some(ProtocolKind::T1t);
        self.t1t_max_message_size = if is_t1t {
            t1t_max_message_size(&activation)
        } else {
            0
        };
        self.records = records;
        self.activation_state = ActivationState::Active;
        self.current_interface = interface;
        self.selected_record_index = 0;
        self.multiprotocol = multi.multiprotocol;
        self.discovery_notification_count = multi.candidates;
        self.activation_params = activation;
    }

    /// Full deactivation: back to Idle with no records.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn records(&self) -> &[TechnologyRecord] {
        &self.records
    }

    pub fn selected(&self) -> Option<&TechnologyRecord> {
        self.records.get(self.selected_record_index)
    }

    pub fn selected_index(&self) -> usize {
        self.selected_record_index
    }

    pub(crate) fn select_index(&mut self, index: usize) -> bool {
        if index < self.records.len() {
            self.selected_record_index = index;
            true
        } else {
            false
        }
    }

    pub fn technology(&self) -> Option<TechnologyKind> {
        self.selected().map(|r| r.technology)
    }

    pub fn protocol(&self) -> Option<ProtocolKind> {
        self.selected().map(|r| r.protocol)
    }

    pub fn handle(&self) -> Option<DiscoveryHandle> {
        self.selected().map(|r| r.handle)
    }

    /// Protocol the tag was activated with, independent of which record
    /// the application connected to.
    pub fn activated_protocol(&self) -> Option<ProtocolKind> {
        self.records.first().map(|r| r.protocol)
    }

    pub fn has_technology(&self, tech: TechnologyKind) -> bool {
        self.records.iter().any(|r| r.technology == tech)
    }

    pub fn activation_state(&self) -> ActivationState {
        self.activation_state
    }

    pub(crate) fn set_activation_state(&mut self, state: ActivationState) {
        self.activation_state = state;
    }

    pub fn is_active(&self) -> bool {
        self.activation_state == ActivationState::Active
    }

    pub fn current_interface(&self) -> RfInterface {
        self.current_interface
    }

    pub(crate) fn set_interface(&mut self, interface: RfInterface) {
        self.current_interface = interface;
    }

    pub fn multiprotocol(&self) -> bool {
        self.multiprotocol
    }

    pub fn discovery_notification_count(&self) -> u32 {
        self.discovery_notification_count
    }

    pub fn activation_params(&self) -> &ActivationParams {
        &self.activation_params
    }

    /// Type-1 max NDEF message size; 0 for other tags or unknown variants.
    pub fn t1t_max_message_size(&self) -> u32 {
        self.t1t_max_message_size
    }
}
