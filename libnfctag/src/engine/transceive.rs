// libnfctag/src/engine/transceive.rs
//! Blocking data-exchange operations against the activated tag.

use std::time::Duration;

use log::{debug, info, warn};

use crate::constants::{
    EMPTY_NDEF_MESSAGE, MIFARE_KEY_DEFAULT, MIFARE_KEY_MAD, MIFARE_KEY_NDEF, T2T_ACK,
};
use crate::engine::TagEngine;
use crate::engine::lock::RfToken;
use crate::engine::signal::Signal;
use crate::tag::NdefInfo;
use crate::types::{ProtocolKind, Status, TechnologyKind};
use crate::utils::sync::lock;
use crate::utils::{Attempt, RetryPolicy};
use crate::{Error, Result};

impl TagEngine {
    /// Protocol and technology of the selected record, or `TagLost`.
    fn active_target(&self) -> Result<(ProtocolKind, TechnologyKind)> {
        let st = lock(&self.state);
        match st.tag.selected() {
            Some(r) if st.tag.is_active() => Ok((r.protocol, r.technology)),
            _ => Err(Error::TagLost),
        }
    }

    /// Protocol of the selected record, refusing technologies without an
    /// NDEF mapping.
    fn ndef_target(&self, operation: &'static str) -> Result<ProtocolKind> {
        let (protocol, tech) = self.active_target()?;
        if protocol == ProtocolKind::Kovio || lock(&self.state).ndef.is_not_ndef() {
            return Err(Error::UnsupportedOperation(format!(
                "{} on {} tag without NDEF",
                operation, tech
            )));
        }
        Ok(protocol)
    }

    /// Arm `signal`, submit with `send`, wait for the controller's status.
    fn exchange(
        &self,
        operation: &'static str,
        signal: &Signal<Status>,
        send: impl FnOnce() -> Result<()>,
    ) -> Result<Status> {
        signal.arm();
        if let Err(e) = send() {
            signal.disarm();
            warn!("{} not accepted: {}", operation, e);
            return Err(e);
        }
        let status = signal.wait(None)?;
        debug!("{} completed: status={}", operation, status);
        Ok(status)
    }

    fn expect_ok(operation: &'static str, status: Status) -> Result<()> {
        if status.is_ok() {
            Ok(())
        } else {
            Err(Error::OperationFailed { operation, status })
        }
    }

    /// Send a raw frame and return the tag's response.
    ///
    /// `timeout` overrides the per-technology timeout for this call. A
    /// Type-2 NACK or a Mifare response that fails validation triggers a
    /// reconnect and yields an empty response.
    pub fn transceive(&self, frame: &[u8], timeout: Option<Duration>) -> Result<Vec<u8>> {
        let token = self.rf_lock.acquire();
        let (protocol, tech) = self.active_target()?;
        let max = tech.max_transceive_len();
        if frame.len() > max {
            return Err(Error::UnsupportedOperation(format!(
                "{} byte frame exceeds {} limit of {}",
                frame.len(),
                tech,
                max
            )));
        }
        let timeout = timeout.unwrap_or_else(|| self.get_timeout(tech));

        #[cfg(feature = "diagnostics")]
        log::trace!("tx {}", crate::utils::hex_preview(frame, 32));

        lock(&self.state).rx_buffer.clear();
        self.signals.transceive.arm();
        let sent = if protocol == ProtocolKind::Mifare {
            self.mifare.transceive(&*self.sink, frame)
        } else {
            self.sink.send_raw_frame(frame)
        };
        if let Err(e) = sent {
            self.signals.transceive.disarm();
            return Err(e);
        }
        let (status, response) = match self.signals.transceive.wait(Some(timeout)) {
            Ok(r) => r,
            Err(e) => {
                warn!("transceive on {} ended with {:?}", tech, e);
                return Err(Error::TagLost);
            }
        };
        if !self.is_active() {
            return Err(Error::TagLost);
        }
        Self::expect_ok("transceive", status)?;

        if protocol == ProtocolKind::T2t && response.len() == 1 && response[0] != T2T_ACK {
            warn!("T2T NACK {:#04x}, reconnecting", response[0]);
            self.reconnect_locked(&token)?;
            return Ok(Vec::new());
        }
        if protocol == ProtocolKind::Mifare && !response.is_empty() {
            return match self.mifare.validate_response(&response) {
                Ok(data) => Ok(data),
                Err(e) => {
                    warn!("{}, reconnecting", e);
                    self.reconnect_locked(&token)?;
                    Ok(Vec::new())
                }
            };
        }
        Ok(response)
    }

    /// Read the NDEF message found by the last [`check_ndef`](Self::check_ndef).
    /// Empty when no NDEF content was detected.
    pub fn read(&self) -> Result<Vec<u8>> {
        let _token = self.rf_lock.acquire();
        let (protocol, _) = self.active_target()?;
        {
            let mut st = lock(&self.state);
            if st.ndef.readable_size() == 0 {
                debug!("no NDEF content detected, nothing to read");
                return Ok(Vec::new());
            }
            st.read_buffer.clear();
        }
        let status = self.exchange("read", &self.signals.read, || {
            if protocol == ProtocolKind::Mifare {
                self.mifare.read_ndef(&*self.sink)
            } else {
                self.sink.read_ndef()
            }
        })?;
        Self::expect_ok("read", status)?;
        Ok(std::mem::take(&mut lock(&self.state).read_buffer))
    }

    /// Write an NDEF message. An empty payload erases the tag by writing
    /// a single empty record. Formats first when detection showed an
    /// unformatted but formattable tag.
    pub fn write(&self, payload: &[u8]) -> Result<()> {
        let token = self.rf_lock.acquire();
        let protocol = self.ndef_target("write")?;
        if lock(&self.state).ndef.needs_format() {
            info!("tag not NDEF formatted, formatting before write");
            self.format_locked(&token)?;
        }
        let message = if payload.is_empty() {
            &EMPTY_NDEF_MESSAGE[..]
        } else {
            payload
        };
        let status = self.exchange("write", &self.signals.write, || {
            if protocol == ProtocolKind::Mifare {
                self.mifare.write_ndef(&*self.sink, message)
            } else {
                self.sink.write_ndef(message)
            }
        })?;
        Self::expect_ok("write", status)?;
        lock(&self.state).ndef.note_written(message.len() as u32);
        Ok(())
    }

    /// Detect NDEF content and capabilities.
    pub fn check_ndef(&self) -> Result<NdefInfo> {
        let token = self.rf_lock.acquire();
        let (protocol, _) = self.active_target()?;
        if protocol == ProtocolKind::Kovio {
            let info = NdefInfo::not_ndef();
            lock(&self.state).ndef.store(info);
            return Ok(info);
        }
        // Keeps the presence monitor off the controller while detecting.
        let _slot = self.claim_presence_slot();

        let mifare = protocol == ProtocolKind::Mifare;
        if mifare {
            self.reconnect_locked(&token)?;
        }
        self.signals.ndef_detect.arm();
        let sent = if mifare {
            self.mifare.check_ndef(&*self.sink)
        } else {
            self.sink.detect_ndef()
        };
        if let Err(e) = sent {
            self.signals.ndef_detect.disarm();
            return Err(e);
        }
        let info = self.signals.ndef_detect.wait(None)?;
        if mifare {
            self.reconnect_locked(&token)?;
        }
        Ok(info)
    }

    /// Format the tag for NDEF.
    pub fn format(&self) -> Result<()> {
        let token = self.rf_lock.acquire();
        self.format_locked(&token)
    }

    pub(crate) fn format_locked(&self, token: &RfToken<'_>) -> Result<()> {
        let protocol = self.ndef_target("format")?;
        if protocol == ProtocolKind::Mifare {
            let keys = [MIFARE_KEY_MAD, MIFARE_KEY_DEFAULT];
            RetryPolicy::new(keys.len() as u32, Duration::ZERO).run(|attempt| {
                if attempt > 0 {
                    // A failed authentication leaves the tag halted.
                    if let Err(e) = self.reconnect_locked(token) {
                        return Attempt::Abort(e);
                    }
                }
                let key = &keys[attempt as usize];
                let result = self
                    .exchange("format", &self.signals.format, || {
                        self.mifare.format(&*self.sink, key)
                    })
                    .and_then(|status| Self::expect_ok("format", status));
                match result {
                    Ok(()) => Attempt::Done(()),
                    Err(Error::TagLost) => Attempt::Abort(Error::TagLost),
                    Err(e) => {
                        warn!("mifare format with key {} failed: {}", attempt, e);
                        Attempt::Retry(e)
                    }
                }
            })?;
        } else {
            let status = self.exchange("format", &self.signals.format, || self.sink.format())?;
            Self::expect_ok("format", status)?;
        }

        if protocol == ProtocolKind::IsoDep {
            self.reconnect_locked(token)?;
        }
        lock(&self.state).ndef.note_formatted();
        Ok(())
    }

    /// Make the tag read-only: hard lock, falling back to a soft lock
    /// when the controller rejects the hard one.
    pub fn make_read_only(&self) -> Result<()> {
        let _token = self.rf_lock.acquire();
        let protocol = self.ndef_target("make_read_only")?;
        if protocol == ProtocolKind::Mifare {
            let status = self.exchange("make_read_only", &self.signals.read_only, || {
                self.mifare.set_read_only(&*self.sink, &MIFARE_KEY_NDEF)
            })?;
            Self::expect_ok("make_read_only", status)?;
        } else {
            let status = self.exchange("make_read_only", &self.signals.read_only, || {
                self.sink.set_read_only(true)
            })?;
            let status = if status == Status::Rejected {
                info!("hard lock rejected, trying soft lock");
                self.exchange("make_read_only", &self.signals.read_only, || {
                    self.sink.set_read_only(false)
                })?
            } else {
                status
            };
            Self::expect_ok("make_read_only", status)?;
        }
        lock(&self.state).ndef.note_read_only();
        Ok(())
    }

    /// Deactivate the tag to idle. A no-op when nothing is activated;
    /// never waits longer than the deactivate timeout.
    pub fn disconnect(&self) -> Result<()> {
        let _token = self.rf_lock.acquire();
        {
            let st = lock(&self.state);
            if st.tag.records().is_empty() {
                debug!("disconnect: no tag");
                return Ok(());
            }
        }
        self.signals.deactivate.arm();
        match self.sink.deactivate(false) {
            Ok(()) => {
                if let Err(e) = self.signals.deactivate.wait(Some(self.config.deactivate_timeout)) {
                    warn!("disconnect: no deactivation confirmation ({:?})", e);
                }
            }
            Err(e) => {
                self.signals.deactivate.disarm();
                warn!("disconnect: deactivate not accepted: {}", e);
            }
        }
        if !lock(&self.state).tag.records().is_empty() {
            self.process_idle_deactivation();
        }
        Ok(())
    }
}
