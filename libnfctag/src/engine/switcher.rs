// libnfctag/src/engine/switcher.rs
//! RF interface reselection and the operations built on it.

use log::{debug, info, warn};

use crate::constants::{ISO_DEP_DESELECT, T2T_SLP_REQ};
use crate::discovery::interface_for_protocol;
use crate::engine::TagEngine;
use crate::engine::lock::RfToken;
use crate::engine::signal::WaitError;
use crate::types::{
    ActivationState, DiscoveryHandle, NciVersion, ProtocolKind, RfInterface, Status,
    TechnologyKind,
};
use crate::utils::sync::lock;
use crate::utils::Attempt;
use crate::{Error, Result};

/// Progress of the last interface switch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SwitchState {
    #[default]
    Idle,
    DeactivatingToSleep,
    AwaitingSleepConfirm,
    Reselecting,
    AwaitingSelectConfirm,
    Active,
    Failed(SwitchFailure),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchFailure {
    TagLost,
    SelectError,
}

impl TagEngine {
    fn set_switch_state(&self, next: SwitchState) {
        let mut st = lock(&self.state);
        if st.switch_state != next {
            debug!("switch {:?} -> {:?}", st.switch_state, next);
            st.switch_state = next;
        }
    }

    /// Handle, protocol and interface of the selected record; `TagLost`
    /// unless the tag is active.
    fn selected_endpoint(&self) -> Result<(DiscoveryHandle, ProtocolKind, RfInterface)> {
        let st = lock(&self.state);
        match st.tag.selected() {
            Some(r) if st.tag.is_active() => Ok((r.handle, r.protocol, st.tag.current_interface())),
            _ => Err(Error::TagLost),
        }
    }

    /// Switch to `target` if the tag's protocol has more than one
    /// interface and it is not already selected.
    pub(crate) fn switch_interface(&self, token: &RfToken<'_>, target: RfInterface) -> Result<()> {
        let (_, protocol, current) = self.selected_endpoint()?;
        if !matches!(protocol, ProtocolKind::IsoDep | ProtocolKind::Mifare) {
            return Ok(());
        }
        if current == target {
            return Ok(());
        }
        self.reselect(token, target)
    }

    /// Deactivate to sleep and select the tag again on `target`.
    pub(crate) fn reselect(&self, token: &RfToken<'_>, target: RfInterface) -> Result<()> {
        let (handle, protocol, current) = self.selected_endpoint()?;
        info!("reselecting handle={} {} -> {}", handle, current, target);
        lock(&self.state).reselecting = true;

        let result = self.run_reselect(token, handle, protocol, current, target);

        lock(&self.state).reselecting = false;
        match &result {
            Ok(()) => self.set_switch_state(SwitchState::Active),
            Err(e) => {
                let failure = match e {
                    Error::SelectError(_) | Error::Command { .. } => SwitchFailure::SelectError,
                    _ => SwitchFailure::TagLost,
                };
                warn!("reselect to {} failed: {}", target, e);
                self.set_switch_state(SwitchState::Failed(failure));
                if self.activation_state() == ActivationState::Sleep {
                    // Do not leave the tag parked in sleep.
                    if let Err(e) = self.sink.deactivate(false) {
                        warn!("deactivate after failed reselect: {}", e);
                    }
                }
            }
        }
        result
    }

    fn run_reselect(
        &self,
        token: &RfToken<'_>,
        handle: DiscoveryHandle,
        protocol: ProtocolKind,
        current: RfInterface,
        target: RfInterface,
    ) -> Result<()> {
        if self.config.nci_version == NciVersion::V1_0 {
            let frame: Option<&[u8]> = match protocol {
                ProtocolKind::T2t if current == RfInterface::Frame => Some(&T2T_SLP_REQ[..]),
                ProtocolKind::IsoDep if current == RfInterface::IsoDep && target == RfInterface::Frame => {
                    Some(&ISO_DEP_DESELECT[..])
                }
                _ => None,
            };
            if let Some(frame) = frame {
                self.send_sleep_frame(token, frame);
            }
        }

        self.set_switch_state(SwitchState::DeactivatingToSleep);
        self.signals.deactivate.arm();
        if let Err(e) = self.sink.deactivate(true) {
            self.signals.deactivate.disarm();
            warn!("deactivate to sleep not accepted: {}", e);
            return Err(Error::TagLost);
        }
        self.set_switch_state(SwitchState::AwaitingSleepConfirm);
        if let Err(e) = self.signals.deactivate.wait(Some(self.config.deactivate_timeout)) {
            warn!("no sleep confirmation: {:?}", e);
            return Err(Error::TagLost);
        }
        if self.activation_state() != ActivationState::Sleep {
            warn!("tag did not go to sleep");
            return Err(Error::TagLost);
        }

        self.config.select_retry.run(|attempt| {
            if attempt > 0 {
                warn!("select attempt {} of {}", attempt + 1, self.config.select_retry.max_attempts);
            }
            if self.activation_state() == ActivationState::Idle {
                return Attempt::Abort(Error::TagLost);
            }
            self.set_switch_state(SwitchState::Reselecting);
            self.signals.select.arm();
            if let Err(e) = self.sink.select(handle, protocol, target) {
                self.signals.select.disarm();
                warn!("select not accepted: {}", e);
                return Attempt::Abort(e);
            }
            self.set_switch_state(SwitchState::AwaitingSelectConfirm);
            match self.signals.select.wait(Some(self.config.select_timeout)) {
                Ok(Status::Ok) if self.is_active() => Attempt::Done(()),
                Ok(Status::Ok) => Attempt::Abort(Error::TagLost),
                Ok(status) => Attempt::Retry(Error::SelectError(status)),
                Err(WaitError::TimedOut) => {
                    warn!("no select confirmation");
                    Attempt::Abort(Error::TagLost)
                }
                Err(_) => Attempt::Abort(Error::TagLost),
            }
        })
        .map_err(|e| match e {
            // Exhausted retries mean the tag is gone for the caller.
            Error::SelectError(status) if self.activation_state() != ActivationState::Active => {
                debug!("select retries exhausted, last status={}", status);
                Error::TagLost
            }
            other => other,
        })
        .and_then(|()| {
            if self.is_active() {
                Ok(())
            } else {
                Err(Error::TagLost)
            }
        })
    }

    /// Best-effort protocol-level sleep before the deactivate; the tag
    /// normally does not answer, so the short window always runs out.
    fn send_sleep_frame(&self, _token: &RfToken<'_>, frame: &[u8]) {
        debug!("sending sleep frame {}", crate::utils::bytes_to_hex(frame));
        self.signals.transceive.arm();
        if let Err(e) = self.sink.send_raw_frame(frame) {
            self.signals.transceive.disarm();
            debug!("sleep frame not accepted: {}", e);
            return;
        }
        let _ = self.signals.transceive.wait(Some(self.config.sleep_frame_window));
        lock(&self.state).rx_buffer.clear();
    }

    /// Reselect the current interface without the "already selected"
    /// shortcut; recovers tags from HALT after a NACK.
    pub(crate) fn reconnect_locked(&self, token: &RfToken<'_>) -> Result<()> {
        let (_, protocol, current) = self.selected_endpoint()?;
        match protocol {
            ProtocolKind::IsoDep => self.reselect(token, current),
            ProtocolKind::T2t => self.reselect(token, RfInterface::Frame),
            ProtocolKind::Mifare => self.reselect(token, RfInterface::Mifare),
            ProtocolKind::Kovio => {
                debug!("Kovio tags cannot be reselected; reporting success");
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Re-select the activated tag on its current interface.
    pub fn reconnect(&self) -> Result<()> {
        let token = self.rf_lock.acquire();
        self.reconnect_locked(&token)
    }

    /// Make technology `index` of the activated tag the one operations
    /// target, switching the RF interface when that technology needs it.
    pub fn connect(&self, index: usize) -> Result<()> {
        let token = self.rf_lock.acquire();
        let (protocol, tech) = {
            let mut st = lock(&self.state);
            if !st.tag.is_active() {
                return Err(Error::TagLost);
            }
            if !st.tag.select_index(index) {
                return Err(Error::InvalidTechIndex(index));
            }
            match st.tag.selected() {
                Some(r) => (r.protocol, r.technology),
                None => return Err(Error::InvalidTechIndex(index)),
            }
        };
        let target = match (protocol, tech) {
            (ProtocolKind::IsoDep, TechnologyKind::Iso14443_3A | TechnologyKind::Iso14443_3B) => {
                RfInterface::Frame
            }
            (ProtocolKind::IsoDep, _) => RfInterface::IsoDep,
            (ProtocolKind::Mifare, _) => RfInterface::Mifare,
            _ => RfInterface::Frame,
        };
        debug!("connect index={} tech={} target={}", index, tech, target);
        self.switch_interface(&token, target)
    }

    /// Put the current tag to sleep and select the next co-located one.
    /// Returns `false` when there is no other candidate.
    pub fn select_next_tag(&self) -> Result<bool> {
        let _token = self.rf_lock.acquire();
        let next = {
            let st = lock(&self.state);
            let previous = match st.tag.records().first() {
                Some(r) if st.tag.is_active() => r.endpoint(),
                _ => return Err(Error::TagLost),
            };
            self.policy
                .select_next(&st.discovery, previous)
                .map(|r| r.endpoint())
        };
        let Some((handle, protocol)) = next else {
            debug!("no other tag to select");
            return Ok(false);
        };

        self.signals.deactivate.arm();
        if let Err(e) = self.sink.deactivate(true) {
            self.signals.deactivate.disarm();
            return Err(e);
        }
        self.signals
            .deactivate
            .wait(Some(self.config.deactivate_timeout))?;
        if self.activation_state() != ActivationState::Sleep {
            return Err(Error::TagLost);
        }

        let notify = std::mem::take(&mut lock(&self.state).arrival_notified);
        if notify {
            self.observer.on_tag_departed();
        }
        info!("selecting next tag handle={} protocol={}", handle, protocol);
        self.signals.select.arm();
        let outcome = match self
            .sink
            .select(handle, protocol, interface_for_protocol(protocol))
        {
            Ok(()) => self.signals.select.wait(Some(self.config.select_timeout)),
            Err(e) => {
                self.signals.select.disarm();
                warn!("select of next tag not accepted: {}", e);
                Err(WaitError::Aborted)
            }
        };
        match outcome {
            Ok(Status::Ok) if self.is_active() => Ok(true),
            other => {
                warn!("next tag handle={} not activated: {:?}", handle, other);
                // Nothing is active; drop back to idle so discovery restarts.
                if let Err(e) = self.sink.deactivate(false) {
                    warn!("deactivate after failed select: {}", e);
                }
                self.process_idle_deactivation();
                Err(Error::TagLost)
            }
        }
    }
}
