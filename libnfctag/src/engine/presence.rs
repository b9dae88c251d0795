// libnfctag/src/engine/presence.rs
//! Presence checking and the monitor loop that polls it.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, info, warn};

use crate::engine::TagEngine;
use crate::types::{ActivationState, ProtocolKind};
use crate::utils::sync::{lock, wait_timeout};

/// Generation counter bumped on every full deactivation, so the monitor
/// can wait for "the tag went away" with a timeout.
#[derive(Debug, Default)]
pub(crate) struct DepartureNotice {
    generation: Mutex<u64>,
    cv: Condvar,
}

impl DepartureNotice {
    pub fn notify(&self) {
        *lock(&self.generation) += 1;
        self.cv.notify_all();
    }

    pub fn generation(&self) -> u64 {
        *lock(&self.generation)
    }

    /// True if a departure was signalled after `since` within `timeout`.
    pub fn wait_for_change(&self, since: u64, timeout: Duration) -> bool {
        let mut generation = lock(&self.generation);
        if *generation != since {
            return true;
        }
        let (g, _) = wait_timeout(&self.cv, generation, timeout);
        generation = g;
        *generation != since
    }
}

/// Why the presence loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceOutcome {
    /// A presence check reported the tag gone.
    Absent,
    /// The tag was deactivated by someone else.
    Deactivated,
    Stopped,
}

impl TagEngine {
    /// Whether the activated tag is still in the field.
    ///
    /// Reports present without asking the controller while another
    /// operation owns the RF interface, unless the tag is already gone.
    pub fn presence_check(&self) -> bool {
        // Taken before looking at the state so a concurrent reselect
        // cannot be mistaken for a departure.
        let Some(_token) = self.rf_lock.try_acquire() else {
            debug!("RF interface busy, assuming tag present");
            return self.activation_state() != ActivationState::Idle;
        };
        let (protocol, kovio_deferred) = {
            let st = lock(&self.state);
            if !st.tag.is_active() {
                return false;
            }
            (st.tag.protocol(), st.kovio_deactivation_deferred)
        };
        if protocol == Some(ProtocolKind::Kovio) {
            // No presence command for Kovio barcodes; finish any deferred
            // deactivation now.
            debug!("Kovio tag: reporting absent (deferred={})", kovio_deferred);
            self.process_idle_deactivation();
            return false;
        }

        let Some(_slot) = self.claim_presence_slot() else {
            debug!("presence check already in progress");
            return true;
        };

        self.signals.presence.arm();
        let sent = if protocol == Some(ProtocolKind::Mifare) && self.config.legacy_mifare_reader {
            self.mifare.presence_check(&*self.sink)
        } else {
            self.sink.presence_check(self.config.presence_check_algorithm)
        };
        if let Err(e) = sent {
            self.signals.presence.disarm();
            warn!("presence check not accepted: {}", e);
            return false;
        }
        match self.signals.presence.wait(None) {
            Ok(status) => {
                if !status.is_ok() {
                    info!("presence check failed: status={}", status);
                }
                status.is_ok()
            }
            Err(e) => {
                debug!("presence check ended with {:?}", e);
                false
            }
        }
    }

    /// Poll presence until the tag is gone, it is deactivated elsewhere,
    /// or `stop` is set. A tag found absent is disconnected, which also
    /// tells the observer it departed.
    pub fn run_presence_loop(&self, stop: &AtomicBool) -> PresenceOutcome {
        let interval = self.config.presence_check_interval;
        let outcome = loop {
            if stop.load(Ordering::Acquire) {
                break PresenceOutcome::Stopped;
            }
            match self.activation_state() {
                ActivationState::Idle => break PresenceOutcome::Deactivated,
                // Mid-reselect or cycling to another tag.
                ActivationState::Sleep => {
                    thread::sleep(interval);
                    continue;
                }
                ActivationState::Active => {}
            }
            let generation = self.departure.generation();
            if !self.presence_check() {
                // Another operation put the tag to sleep between our state
                // read and the check.
                if self.activation_state() == ActivationState::Sleep {
                    continue;
                }
                break PresenceOutcome::Absent;
            }
            if self.departure.wait_for_change(generation, interval) {
                break PresenceOutcome::Deactivated;
            }
        };
        debug!("presence loop ended: {:?}", outcome);
        if outcome != PresenceOutcome::Stopped {
            if let Err(e) = self.disconnect() {
                warn!("disconnect after presence loop: {}", e);
            }
        }
        outcome
    }
}

/// Background thread running [`TagEngine::run_presence_loop`].
#[derive(Debug)]
pub struct PresenceMonitor {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<PresenceOutcome>>,
}

impl PresenceMonitor {
    pub fn spawn(engine: Arc<TagEngine>) -> io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let handle = thread::Builder::new()
            .name("nfc-presence".into())
            .spawn(move || engine.run_presence_loop(&flag))?;
        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(|h| h.is_finished())
    }

    /// Wait for the loop to end on its own.
    pub fn join(mut self) -> Option<PresenceOutcome> {
        self.handle.take().and_then(|h| h.join().ok())
    }

    /// Ask the loop to stop and wait for it; it notices within one poll
    /// interval.
    pub fn stop(mut self) -> Option<PresenceOutcome> {
        self.stop.store(true, Ordering::Release);
        self.handle.take().and_then(|h| h.join().ok())
    }
}

impl Drop for PresenceMonitor {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
    }
}
