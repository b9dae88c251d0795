// libnfctag/src/engine/mod.rs
//! The tag engine: turns controller events into "the tag in the field"
//! and exposes blocking operations against it.
//!
//! Controller events arrive on one thread through [`EventHandler`];
//! application threads call the blocking operations, which arm a
//! completion signal, submit a command and wait. Operations that can
//! change the RF interface or tear down the activation hold the
//! [`RfInterfaceLock`] for their whole duration.

pub mod handler;
pub mod lock;
pub mod presence;
pub mod signal;
pub mod switcher;
pub mod transceive;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, info};

use crate::config::EngineConfig;
use crate::controller::CommandSink;
use crate::discovery::{DiscoverySet, SelectionPolicy};
use crate::mifare::{MifareClassic, MifareExtension};
use crate::observer::{LogObserver, TagObserver};
use crate::tag::{ActiveTagState, NdefCache, NdefInfo, TagSummary, TransceiveTimeoutTable};
use crate::tech::{TechnologyInterpreter, TechnologyRecord};
use crate::types::{ActivationState, ProtocolKind, RfInterface, TechnologyKind};
use crate::utils::sync::lock;
use crate::Result;

pub use lock::{RfInterfaceLock, RfToken};
pub use presence::{PresenceMonitor, PresenceOutcome};
pub use signal::WaitError;
pub use switcher::{SwitchFailure, SwitchState};

use presence::DepartureNotice;
use signal::Signals;

/// Mutable engine state, guarded by one mutex. Never held across a
/// command submission or a wait.
#[derive(Debug, Default)]
pub(crate) struct EngineState {
    pub tag: ActiveTagState,
    pub discovery: DiscoverySet,
    pub interpreter: TechnologyInterpreter,
    pub ndef: NdefCache,
    /// A discovery cycle is being reported; the next result extends it.
    pub discovery_cycle_open: bool,
    /// An interface reselect owns the next activation.
    pub reselecting: bool,
    pub switch_state: SwitchState,
    pub arrival_notified: bool,
    pub kovio_deactivation_deferred: bool,
    pub rx_buffer: Vec<u8>,
    pub read_buffer: Vec<u8>,
}

pub struct TagEngine {
    config: EngineConfig,
    policy: SelectionPolicy,
    sink: Arc<dyn CommandSink>,
    mifare: Arc<dyn MifareClassic>,
    observer: Arc<dyn TagObserver>,
    rf_lock: RfInterfaceLock,
    state: Mutex<EngineState>,
    timeouts: Mutex<TransceiveTimeoutTable>,
    signals: Signals,
    departure: DepartureNotice,
    presence_slot: AtomicBool,
}

impl std::fmt::Debug for TagEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagEngine")
            .field("config", &self.config)
            .field("state", &*lock(&self.state))
            .finish_non_exhaustive()
    }
}

/// Helper to construct a [`TagEngine`] with optional collaborators.
pub struct TagEngineBuilder {
    sink: Arc<dyn CommandSink>,
    config: EngineConfig,
    mifare: Option<Arc<dyn MifareClassic>>,
    observer: Option<Arc<dyn TagObserver>>,
}

impl TagEngineBuilder {
    pub fn new(sink: Arc<dyn CommandSink>) -> Self {
        Self {
            sink,
            config: EngineConfig::default(),
            mifare: None,
            observer: None,
        }
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn mifare(mut self, mifare: Arc<dyn MifareClassic>) -> Self {
        self.mifare = Some(mifare);
        self
    }

    pub fn observer(mut self, observer: Arc<dyn TagObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Validate the configuration and build the engine. The caller still
    /// has to route controller events to it.
    pub fn build(self) -> Result<Arc<TagEngine>> {
        self.config.validate()?;
        Ok(Arc::new(TagEngine {
            policy: self.config.selection_policy(),
            config: self.config,
            sink: self.sink,
            mifare: self.mifare.unwrap_or_else(|| Arc::new(MifareExtension)),
            observer: self.observer.unwrap_or_else(|| Arc::new(LogObserver)),
            rf_lock: RfInterfaceLock::new(),
            state: Mutex::new(EngineState::default()),
            timeouts: Mutex::new(TransceiveTimeoutTable::new()),
            signals: Signals::new(),
            departure: DepartureNotice::default(),
            presence_slot: AtomicBool::new(false),
        }))
    }
}

/// Releases the presence-check slot on drop.
pub(crate) struct PresenceSlot<'a>(&'a AtomicBool);

impl Drop for PresenceSlot<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl TagEngine {
    pub fn builder(sink: Arc<dyn CommandSink>) -> TagEngineBuilder {
        TagEngineBuilder::new(sink)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn activation_state(&self) -> ActivationState {
        lock(&self.state).tag.activation_state()
    }

    pub fn is_active(&self) -> bool {
        lock(&self.state).tag.is_active()
    }

    pub fn current_interface(&self) -> RfInterface {
        lock(&self.state).tag.current_interface()
    }

    pub fn technology(&self) -> Option<TechnologyKind> {
        lock(&self.state).tag.technology()
    }

    pub fn protocol(&self) -> Option<ProtocolKind> {
        lock(&self.state).tag.protocol()
    }

    /// Technology records of the activated tag.
    pub fn technologies(&self) -> Vec<TechnologyRecord> {
        lock(&self.state).tag.records().to_vec()
    }

    pub fn discovery_records(&self) -> Vec<TechnologyRecord> {
        lock(&self.state).discovery.records().to_vec()
    }

    pub fn tag_summary(&self) -> Option<TagSummary> {
        let st = lock(&self.state);
        if st.tag.records().is_empty() {
            return None;
        }
        Some(TagSummary::from_state(&st.tag))
    }

    /// Cached result of the last NDEF detection on this activation.
    pub fn ndef_info(&self) -> Option<NdefInfo> {
        lock(&self.state).ndef.get().copied()
    }

    pub fn t1t_max_message_size(&self) -> u32 {
        lock(&self.state).tag.t1t_max_message_size()
    }

    pub fn switch_state(&self) -> SwitchState {
        lock(&self.state).switch_state
    }

    pub fn set_timeout(&self, tech: TechnologyKind, timeout: Duration) {
        lock(&self.timeouts).set(tech, timeout);
    }

    pub fn get_timeout(&self, tech: TechnologyKind) -> Duration {
        lock(&self.timeouts).get(tech)
    }

    pub fn start_discovery(&self) -> Result<()> {
        {
            let mut st = lock(&self.state);
            st.discovery.clear();
            st.discovery_cycle_open = false;
        }
        self.sink.start_discovery()
    }

    pub fn stop_discovery(&self) -> Result<()> {
        let result = self.sink.stop_discovery();
        let mut st = lock(&self.state);
        st.discovery.clear();
        st.discovery_cycle_open = false;
        result
    }

    /// Wake every outstanding waiter with a failure and forget the tag.
    /// Used on stack shutdown or a fatal transport error.
    pub fn abort(&self) {
        info!("aborting all pending tag operations");
        self.signals.fail_all(WaitError::Aborted);
        {
            let mut st = lock(&self.state);
            st.discovery.clear();
            st.discovery_cycle_open = false;
            st.interpreter.reset();
        }
        self.reset_after_deactivation();
    }

    /// Full deactivation bookkeeping: idempotent.
    pub(crate) fn reset_after_deactivation(&self) {
        let notify = {
            let mut st = lock(&self.state);
            st.tag.reset();
            st.ndef.clear();
            st.reselecting = false;
            st.kovio_deactivation_deferred = false;
            st.rx_buffer.clear();
            st.read_buffer.clear();
            std::mem::take(&mut st.arrival_notified)
        };
        lock(&self.timeouts).reset();
        self.departure.notify();
        if notify {
            debug!("tag departed");
            self.observer.on_tag_departed();
        }
    }

    pub(crate) fn claim_presence_slot(&self) -> Option<PresenceSlot<'_>> {
        self.presence_slot
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| PresenceSlot(&self.presence_slot))
    }
}
