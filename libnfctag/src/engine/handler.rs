// libnfctag/src/engine/handler.rs
//! Controller event handling. Runs on the controller event thread.

use log::{debug, error, warn};

use crate::controller::{ControllerEvent, EventHandler};
use crate::discovery::interface_for_protocol;
use crate::engine::TagEngine;
use crate::engine::signal::WaitError;
use crate::tag::{NdefInfo, TagSummary};
use crate::tech::{ActivationParams, RfTechParams, iso_dep_timeout, merge_combi_sak};
use crate::types::{
    ActivationState, DeactivationKind, DiscoveryHandle, NdefFlags, ProtocolKind, RfInterface,
    Status, TechnologyKind,
};
use crate::utils::sync::lock;

impl EventHandler for TagEngine {
    fn handle_event(&self, event: ControllerEvent) {
        #[cfg(feature = "diagnostics")]
        log::trace!("event {:?}", event);

        match event {
            ControllerEvent::DiscoveryResult {
                protocol,
                handle,
                params,
                more_follows,
            } => self.on_discovery_result(protocol, handle, &params, more_follows),
            ControllerEvent::Activated {
                protocol,
                handle,
                params,
                interface,
                activation,
            } => self.on_activated(protocol, handle, &params, interface, activation),
            ControllerEvent::Deactivated { kind } => self.on_deactivated(kind),
            ControllerEvent::SelectResult { status } => {
                if status.is_ok() {
                    debug!("select accepted, awaiting activation");
                } else if !self.signals.select.complete(status) {
                    warn!("select failed: status={}", status);
                }
            }
            ControllerEvent::NdefData { bytes } => {
                lock(&self.state).read_buffer.extend_from_slice(&bytes);
            }
            ControllerEvent::ReadComplete { status } => {
                self.signals.read.complete(status);
            }
            ControllerEvent::WriteComplete { status } => {
                self.signals.write.complete(status);
            }
            ControllerEvent::FormatComplete { status } => {
                self.signals.format.complete(status);
            }
            ControllerEvent::ReadOnlyComplete { status } => {
                self.signals.read_only.complete(status);
            }
            ControllerEvent::NdefDetect {
                status,
                max_size,
                current_size,
                flags,
            } => self.on_ndef_detect(status, max_size, current_size, flags),
            ControllerEvent::PresenceCheckResult { status } => {
                self.signals.presence.complete(status);
            }
            ControllerEvent::DataReceived { status, bytes } => self.on_data(status, bytes),
            ControllerEvent::RfInterfaceTimeout => {
                warn!("RF interface timeout");
                lock(&self.state).rx_buffer.clear();
                self.signals.transceive.fail(WaitError::TimedOut);
            }
        }
    }
}

impl TagEngine {
    fn on_discovery_result(
        &self,
        protocol: ProtocolKind,
        handle: DiscoveryHandle,
        params: &RfTechParams,
        more_follows: bool,
    ) {
        let pick = {
            let mut st = lock(&self.state);
            if !st.discovery_cycle_open {
                st.discovery.clear();
                st.discovery_cycle_open = true;
            }
            let records = st.interpreter.interpret(protocol, handle, params, None);
            st.discovery.add_notification(records);
            if more_follows {
                return;
            }
            st.discovery_cycle_open = false;
            let info = self.policy.multi_tag_info(&st.discovery);
            debug!(
                "discovery complete: {} records, {} candidates, p2p={}",
                st.discovery.len(),
                info.candidates,
                info.has_p2p
            );
            self.policy.select_first(&st.discovery).map(|r| r.endpoint())
        };

        let Some((handle, protocol)) = pick else {
            warn!("discovery reported nothing selectable");
            return;
        };
        let interface = interface_for_protocol(protocol);
        debug!("selecting handle={} protocol={} interface={}", handle, protocol, interface);
        if let Err(e) = self.sink.select(handle, protocol, interface) {
            error!("select of handle {} failed: {}", handle, e);
        }
    }

    fn on_activated(
        &self,
        protocol: ProtocolKind,
        handle: DiscoveryHandle,
        params: &RfTechParams,
        interface: RfInterface,
        activation: ActivationParams,
    ) {
        let (summary, notify, mifare) = {
            let mut st = lock(&self.state);
            if st.reselecting {
                st.tag.set_interface(interface);
                st.tag.set_activation_state(ActivationState::Active);
                drop(st);
                debug!("reactivated on {} interface", interface);
                self.signals.select.complete(Status::Ok);
                return;
            }

            let mut records = st
                .interpreter
                .interpret(protocol, handle, params, Some(&activation));
            if records.is_empty() {
                debug!("ignoring repeated activation of handle {}", handle);
                return;
            }
            let combi: Vec<_> = st
                .discovery
                .other_protocols_of(handle, protocol)
                .filter(|r| !r.is_nfc_dep())
                .cloned()
                .collect();
            if !combi.is_empty() {
                debug!("combi-tag: {} more record(s) on handle {}", combi.len(), handle);
                records.extend(combi);
                merge_combi_sak(&mut records);
            }

            if protocol == ProtocolKind::IsoDep {
                if let Some(fwt) = iso_dep_timeout(params, &activation) {
                    debug!("ISO-DEP timeout from FWI: {:?}", fwt);
                    lock(&self.timeouts).set(TechnologyKind::Iso14443_4, fwt);
                }
            }

            let info = self.policy.multi_tag_info(&st.discovery);
            st.tag.activate(records, interface, activation, info);
            st.ndef.clear();
            st.kovio_deactivation_deferred = false;
            st.rx_buffer.clear();
            st.read_buffer.clear();

            let notify = !st.arrival_notified;
            st.arrival_notified = true;
            let mifare = st.tag.has_technology(TechnologyKind::MifareClassic);
            (TagSummary::from_state(&st.tag), notify, mifare)
        };

        debug!(
            "activated handle={} protocol={} interface={} techs={:?}",
            handle, protocol, interface, summary.technologies
        );
        if mifare {
            if let Err(e) = self.mifare.init(&*self.sink) {
                warn!("mifare init failed: {}", e);
            }
        }
        if notify {
            self.observer.on_tag_arrived(&summary);
        }
        // Completes a pending select of the next co-located tag.
        if self.signals.select.is_armed() {
            self.signals.select.complete(Status::Ok);
        }
    }

    pub(crate) fn on_deactivated(&self, kind: DeactivationKind) {
        match kind {
            DeactivationKind::Sleep => {
                lock(&self.state)
                    .tag
                    .set_activation_state(ActivationState::Sleep);
                debug!("tag asleep");
                self.signals.deactivate.complete(DeactivationKind::Sleep);
            }
            DeactivationKind::Idle => {
                {
                    let mut st = lock(&self.state);
                    let kovio = st.tag.is_active() && st.tag.protocol() == Some(ProtocolKind::Kovio);
                    if kovio && !self.signals.deactivate.is_armed() {
                        debug!("deferring Kovio deactivation until the next presence check");
                        st.kovio_deactivation_deferred = true;
                        return;
                    }
                    st.discovery.clear();
                    st.discovery_cycle_open = false;
                }
                self.process_idle_deactivation();
            }
        }
    }

    /// Tear down the activation and wake everybody waiting on the tag.
    pub(crate) fn process_idle_deactivation(&self) {
        debug!("tag deactivated to idle");
        self.reset_after_deactivation();
        self.signals.deactivate.complete(DeactivationKind::Idle);
        self.signals.fail_all(WaitError::TagLost);
    }

    fn on_ndef_detect(&self, status: Status, max_size: u32, current_size: u32, flags: NdefFlags) {
        let info = {
            let mut st = lock(&self.state);
            let mut info = NdefInfo::from_detection(status, max_size, current_size, flags);
            if !status.is_ok() && st.tag.protocol() == Some(ProtocolKind::T1t) {
                info.max_size = st.tag.t1t_max_message_size();
            }
            st.ndef.store(info);
            info
        };
        debug!("ndef detect: status={} {:?}", status, info);
        self.signals.ndef_detect.complete(info);
    }

    fn on_data(&self, status: Status, bytes: Vec<u8>) {
        let mut st = lock(&self.state);
        if status == Status::Continue {
            st.rx_buffer.extend_from_slice(&bytes);
            return;
        }
        let mut data = std::mem::take(&mut st.rx_buffer);
        data.extend_from_slice(&bytes);
        drop(st);

        #[cfg(feature = "diagnostics")]
        log::trace!("rx {}", crate::utils::hex_preview(&data, 32));

        if !self.signals.transceive.complete((status, data)) {
            debug!("unsolicited data, status={}", status);
        }
    }
}
