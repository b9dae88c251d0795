//! Test support helpers intended for use by unit and integration tests.
//!
//! These helpers centralize MockController wiring: a simulated tag that
//! answers the engine's commands the way a controller would, an observer
//! that records lifecycle callbacks, and fixture builders.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::config::EngineConfig;
use crate::controller::{Command, ControllerEvent, EventHandler, MifareCommand, MockController};
use crate::engine::TagEngine;
use crate::observer::TagObserver;
use crate::tag::TagSummary;
use crate::tech::{ActivationParams, RfTechParams};
use crate::types::{
    DeactivationKind, DiscoveryHandle, NdefFlags, ProtocolKind, RfInterface, RfMode, Status,
};
use crate::utils::sync::lock;
use crate::Result;

/// What the simulated controller reports for each command.
#[derive(Debug, Clone)]
pub struct SimulatedTag {
    pub protocol: ProtocolKind,
    pub handle: DiscoveryHandle,
    pub params: RfTechParams,
    pub activation: ActivationParams,
    /// Number of upcoming selects answered with a failed select result.
    pub select_failures: u32,
    /// Report the tag gone instead of confirming sleep.
    pub lost_on_sleep: bool,
    /// Raw frame responses, consumed in order; none left means no answer.
    pub responses: VecDeque<Vec<u8>>,
    /// Split every raw response into chunks of this size.
    pub chunk: Option<usize>,
    /// NDEF message on the tag; `None` means unformatted.
    pub ndef: Option<Vec<u8>>,
    pub ndef_max_size: u32,
    pub formatable: bool,
    pub format_status: Status,
    /// Mifare key that authenticates for format.
    pub mifare_key: [u8; 6],
    pub hard_lock_rejected: bool,
    pub present: bool,
}

impl SimulatedTag {
    pub fn new(protocol: ProtocolKind, handle: u8, params: RfTechParams) -> Self {
        Self {
            protocol,
            handle: DiscoveryHandle::new(handle),
            params,
            activation: ActivationParams::None,
            select_failures: 0,
            lost_on_sleep: false,
            responses: VecDeque::new(),
            chunk: None,
            ndef: Some(Vec::new()),
            ndef_max_size: 137,
            formatable: true,
            format_status: Status::Ok,
            mifare_key: crate::constants::MIFARE_KEY_DEFAULT,
            hard_lock_rejected: false,
            present: true,
        }
    }

    pub fn activated_event(&self, interface: RfInterface) -> ControllerEvent {
        ControllerEvent::Activated {
            protocol: self.protocol,
            handle: self.handle,
            params: self.params.clone(),
            interface,
            activation: self.activation.clone(),
        }
    }

    fn data(&self, bytes: Vec<u8>) -> Vec<ControllerEvent> {
        let Some(size) = self.chunk.filter(|s| *s > 0 && bytes.len() > *s) else {
            return vec![ControllerEvent::DataReceived {
                status: Status::Ok,
                bytes,
            }];
        };
        let chunks: Vec<_> = bytes.chunks(size).map(<[u8]>::to_vec).collect();
        let last = chunks.len() - 1;
        chunks
            .into_iter()
            .enumerate()
            .map(|(i, bytes)| ControllerEvent::DataReceived {
                status: if i == last { Status::Ok } else { Status::Continue },
                bytes,
            })
            .collect()
    }

    fn detect(&self) -> ControllerEvent {
        match &self.ndef {
            Some(msg) => ControllerEvent::NdefDetect {
                status: Status::Ok,
                max_size: self.ndef_max_size,
                current_size: msg.len() as u32,
                flags: NdefFlags::new(NdefFlags::SUPPORTED | NdefFlags::FORMATTED),
            },
            None => {
                let flags = if self.formatable {
                    NdefFlags::FORMATABLE
                } else {
                    NdefFlags::UNKNOWN
                };
                ControllerEvent::NdefDetect {
                    status: Status::Failed,
                    max_size: 0,
                    current_size: 0,
                    flags: NdefFlags::new(flags),
                }
            }
        }
    }

    /// Events a controller would report for `command`.
    pub fn respond(&mut self, command: &Command) -> Vec<ControllerEvent> {
        match command {
            Command::Deactivate { to_sleep: true } if self.lost_on_sleep => {
                vec![ControllerEvent::Deactivated {
                    kind: DeactivationKind::Idle,
                }]
            }
            Command::Deactivate { to_sleep } => vec![ControllerEvent::Deactivated {
                kind: if *to_sleep {
                    DeactivationKind::Sleep
                } else {
                    DeactivationKind::Idle
                },
            }],
            Command::Select { interface, .. } => {
                if self.select_failures > 0 {
                    self.select_failures -= 1;
                    return vec![ControllerEvent::SelectResult {
                        status: Status::Failed,
                    }];
                }
                vec![
                    ControllerEvent::SelectResult { status: Status::Ok },
                    self.activated_event(*interface),
                ]
            }
            Command::SendRawFrame(_) | Command::Mifare(MifareCommand::Transceive(_)) => {
                match self.responses.pop_front() {
                    Some(bytes) => self.data(bytes),
                    None => Vec::new(),
                }
            }
            Command::DetectNdef | Command::Mifare(MifareCommand::DetectNdef) => vec![self.detect()],
            Command::ReadNdef | Command::Mifare(MifareCommand::ReadNdef) => {
                let msg = self.ndef.clone().unwrap_or_default();
                vec![
                    ControllerEvent::NdefData { bytes: msg },
                    ControllerEvent::ReadComplete { status: Status::Ok },
                ]
            }
            Command::WriteNdef(bytes) | Command::Mifare(MifareCommand::WriteNdef(bytes)) => {
                let status = if self.ndef.is_some() {
                    self.ndef = Some(bytes.clone());
                    Status::Ok
                } else {
                    Status::Failed
                };
                vec![ControllerEvent::WriteComplete { status }]
            }
            Command::Format => {
                if self.format_status.is_ok() {
                    self.ndef = Some(Vec::new());
                }
                vec![ControllerEvent::FormatComplete {
                    status: self.format_status,
                }]
            }
            Command::Mifare(MifareCommand::Format { key }) => {
                let status = if *key == self.mifare_key {
                    self.ndef = Some(Vec::new());
                    Status::Ok
                } else {
                    Status::Failed
                };
                vec![ControllerEvent::FormatComplete { status }]
            }
            Command::SetReadOnly { hard: true } if self.hard_lock_rejected => {
                vec![ControllerEvent::ReadOnlyComplete {
                    status: Status::Rejected,
                }]
            }
            Command::SetReadOnly { .. } | Command::Mifare(MifareCommand::SetReadOnly { .. }) => {
                vec![ControllerEvent::ReadOnlyComplete { status: Status::Ok }]
            }
            Command::PresenceCheck(_) | Command::Mifare(MifareCommand::PresenceCheck) => {
                let status = if self.present {
                    Status::Ok
                } else {
                    Status::Failed
                };
                vec![ControllerEvent::PresenceCheckResult { status }]
            }
            Command::StartDiscovery
            | Command::StopDiscovery
            | Command::Mifare(MifareCommand::Init) => Vec::new(),
        }
    }
}

/// Observer recording every lifecycle callback.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub arrived: Mutex<Vec<TagSummary>>,
    departed: AtomicUsize,
}

impl RecordingObserver {
    pub fn arrivals(&self) -> usize {
        lock(&self.arrived).len()
    }

    pub fn departures(&self) -> usize {
        self.departed.load(Ordering::SeqCst)
    }

    pub fn last_arrival(&self) -> Option<TagSummary> {
        lock(&self.arrived).last().cloned()
    }
}

impl TagObserver for RecordingObserver {
    fn on_tag_arrived(&self, summary: &TagSummary) {
        lock(&self.arrived).push(summary.clone());
    }

    fn on_tag_departed(&self) {
        self.departed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Engine, controller and observer wired together around a simulated tag.
pub struct Harness {
    pub engine: Arc<TagEngine>,
    pub controller: Arc<MockController>,
    pub observer: Arc<RecordingObserver>,
    pub tag: Arc<Mutex<SimulatedTag>>,
}

impl Harness {
    pub fn new(tag: SimulatedTag, config: EngineConfig) -> Result<Self> {
        let tag = Arc::new(Mutex::new(tag));
        let sim = Arc::clone(&tag);
        let controller = Arc::new(MockController::with_responder(move |cmd| {
            lock(&sim).respond(cmd)
        }));
        let observer = Arc::new(RecordingObserver::default());
        let engine = TagEngine::builder(controller.clone())
            .config(config)
            .observer(observer.clone())
            .build()?;
        let handler: Arc<dyn EventHandler> = engine.clone();
        controller.attach(&handler);
        Ok(Self {
            engine,
            controller,
            observer,
            tag,
        })
    }

    /// Deliver the activation notification for the simulated tag.
    pub fn activate(&self, interface: RfInterface) {
        let event = lock(&self.tag).activated_event(interface);
        self.controller.inject(event);
    }

    pub fn with_tag<R>(&self, f: impl FnOnce(&mut SimulatedTag) -> R) -> R {
        f(&mut lock(&self.tag))
    }
}

/// Config with short select backoff so retry tests stay fast.
#[doc(hidden)]
pub fn fast_config() -> EngineConfig {
    EngineConfig::builder()
        .select_retry(crate::utils::RetryPolicy::new(
            crate::config::DEFAULT_SELECT_ATTEMPTS,
            std::time::Duration::from_millis(1),
        ))
        .presence_check_interval(std::time::Duration::from_millis(5))
        .build()
        .unwrap_or_default()
}

#[doc(hidden)]
pub fn nfc_a_params(atqa: [u8; 2], uid: &[u8], sak: u8) -> RfTechParams {
    RfTechParams::nfc_a(RfMode::PollA, atqa, uid.to_vec(), sak)
}

#[doc(hidden)]
pub fn iso_dep_tag(handle: u8) -> SimulatedTag {
    let mut tag = SimulatedTag::new(
        ProtocolKind::IsoDep,
        handle,
        nfc_a_params([0x44, 0x03], &[0x04, 0x52, 0x21, 0x8A, 0x3C, 0x5B, 0x80], 0x20),
    );
    tag.activation = ActivationParams::IsoDepA {
        ats: vec![0x75, 0x77, 0x81, 0x02, 0x80],
    };
    tag
}

#[doc(hidden)]
pub fn t2t_tag(handle: u8) -> SimulatedTag {
    SimulatedTag::new(
        ProtocolKind::T2t,
        handle,
        nfc_a_params([0x44, 0x00], &[0x04, 0xA1, 0xB2, 0xC3, 0xD4, 0xE5, 0x80], 0x00),
    )
}

#[doc(hidden)]
pub fn mifare_classic_tag(handle: u8) -> SimulatedTag {
    SimulatedTag::new(
        ProtocolKind::Mifare,
        handle,
        nfc_a_params([0x04, 0x00], &[0xDE, 0xAD, 0xBE, 0xEF], 0x08),
    )
}

#[doc(hidden)]
pub fn kovio_tag(handle: u8) -> SimulatedTag {
    SimulatedTag::new(ProtocolKind::Kovio, handle, RfTechParams::kovio(vec![0x5A; 16]))
}
