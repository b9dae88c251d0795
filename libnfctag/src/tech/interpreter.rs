// libnfctag/src/tech/interpreter.rs
//! Turn one discovery or activation notification into technology records.
//!
//! Interpretation never fails: a notification the interpreter cannot make
//! sense of (unknown protocol, parameter block of the wrong technology)
//! is logged and becomes a single `Unknown` record, so one malformed
//! notification cannot block co-located valid tags.

use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::constants::*;
use crate::tech::kovio::KovioDedupState;
use crate::tech::params::{ActivationParams, NfcAParams, RfTechParams, TechParams};
use crate::tech::record::TechnologyRecord;
use crate::types::{DiscoveryHandle, ProtocolKind, TechnologyKind};

/// SAK values announcing a Mifare Classic (1K, 4K, Mini-like) core.
const MIFARE_CLASSIC_SAKS: [u8; 3] = [0x01, 0x08, 0x18];

/// SAK values of Ultralight family tags (complete UID / cascade bit).
const MIFARE_ULTRALIGHT_SAKS: [u8; 2] = [0x00, 0x04];
const MIFARE_ULTRALIGHT_ATQA: [u8; 2] = [0x44, 0x00];

#[derive(Debug, Default)]
pub struct TechnologyInterpreter {
    kovio: KovioDedupState,
}

impl TechnologyInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interpret a notification. `activation` is `Some` for activation
    /// notifications and `None` for discovery results.
    pub fn interpret(
        &mut self,
        protocol: ProtocolKind,
        handle: DiscoveryHandle,
        params: &RfTechParams,
        activation: Option<&ActivationParams>,
    ) -> Vec<TechnologyRecord> {
        self.interpret_at(protocol, handle, params, activation, Instant::now())
    }

    /// Same as [`interpret`](Self::interpret) with an explicit clock, for
    /// the Kovio de-dup window.
    pub fn interpret_at(
        &mut self,
        protocol: ProtocolKind,
        handle: DiscoveryHandle,
        params: &RfTechParams,
        activation: Option<&ActivationParams>,
        now: Instant,
    ) -> Vec<TechnologyRecord> {
        #[cfg(feature = "diagnostics")]
        log::trace!("interpret {} handle={} params={:?}", protocol, handle, params);

        let is_activation = activation.is_some();
        let record = |technology, protocol| {
            TechnologyRecord::new(technology, handle, protocol, params.clone())
        };

        let mut records = match protocol {
            ProtocolKind::T1t => match params.nfc_a_params() {
                Some(_) => vec![record(TechnologyKind::Iso14443_3A, protocol)],
                None => return vec![anomaly(protocol, handle, params)],
            },
            ProtocolKind::T2t => match params.nfc_a_params() {
                Some(a) => {
                    let mut v = vec![record(TechnologyKind::Iso14443_3A, protocol)];
                    if is_mifare_ultralight(a) {
                        v.push(record(TechnologyKind::MifareUltralight, protocol));
                    } else if MIFARE_CLASSIC_SAKS.contains(&a.sel_res) {
                        v.push(record(TechnologyKind::MifareClassic, ProtocolKind::Mifare));
                    }
                    v
                }
                None => return vec![anomaly(protocol, handle, params)],
            },
            ProtocolKind::T3t => match params.tech {
                TechParams::NfcF(_) => vec![record(TechnologyKind::Felica, protocol)],
                _ => return vec![anomaly(protocol, handle, params)],
            },
            ProtocolKind::IsoDep => {
                let mut v = vec![record(TechnologyKind::Iso14443_4, protocol)];
                if params.mode.is_nfc_a() {
                    v.push(record(TechnologyKind::Iso14443_3A, protocol));
                } else if params.mode.is_nfc_b() {
                    v.push(record(TechnologyKind::Iso14443_3B, protocol));
                }
                v
            }
            ProtocolKind::T5t => match params.tech {
                TechParams::NfcV(_) => vec![record(TechnologyKind::Iso15693, protocol)],
                _ => return vec![anomaly(protocol, handle, params)],
            },
            ProtocolKind::Kovio => match &params.tech {
                TechParams::Kovio(k) => {
                    if is_activation && self.kovio.observe(&k.uid, now) {
                        debug!(
                            "suppressing repeated Kovio activation uid={}",
                            crate::utils::bytes_to_hex(&k.uid)
                        );
                        return Vec::new();
                    }
                    vec![record(TechnologyKind::KovioBarcode, protocol)]
                }
                _ => return vec![anomaly(protocol, handle, params)],
            },
            ProtocolKind::Mifare => match params.nfc_a_params() {
                Some(_) => vec![record(TechnologyKind::MifareClassic, protocol)],
                None => return vec![anomaly(protocol, handle, params)],
            },
            // Peer-to-peer endpoints carry no tag technology; the selection
            // policy recognises them by protocol.
            ProtocolKind::NfcDep => vec![record(TechnologyKind::Unknown, protocol)],
            ProtocolKind::Unknown(_) => return vec![anomaly(protocol, handle, params)],
        };

        merge_combi_sak(&mut records);
        records
    }

    /// Forget Kovio history; used when the engine is torn down.
    pub fn reset(&mut self) {
        self.kovio.reset();
    }
}

fn anomaly(
    protocol: ProtocolKind,
    handle: DiscoveryHandle,
    params: &RfTechParams,
) -> TechnologyRecord {
    warn!(
        "cannot interpret protocol {} (handle {}, mode {}); recording as unknown",
        protocol, handle, params.mode
    );
    TechnologyRecord::new(TechnologyKind::Unknown, handle, protocol, params.clone())
}

fn is_mifare_ultralight(a: &NfcAParams) -> bool {
    a.sens_res == MIFARE_ULTRALIGHT_ATQA && MIFARE_ULTRALIGHT_SAKS.contains(&a.sel_res)
}

fn bears_nfc_a_sak(record: &TechnologyRecord) -> bool {
    matches!(
        record.protocol,
        ProtocolKind::T1t | ProtocolKind::T2t | ProtocolKind::Mifare | ProtocolKind::IsoDep
    ) && record.sak().is_some()
}

/// OR together the SAK of every ISO14443-3A bearing record and write the
/// merged value back into each, so capability checks see the whole
/// combi-tag rather than one facet of it.
pub fn merge_combi_sak(records: &mut [TechnologyRecord]) {
    let saks: Vec<u8> = records
        .iter()
        .filter(|r| bears_nfc_a_sak(r))
        .filter_map(|r| r.sak())
        .collect();
    if saks.len() < 2 {
        return;
    }
    let merged = saks.iter().fold(0u8, |acc, s| acc | s);
    for r in records.iter_mut().filter(|r| bears_nfc_a_sak(r)) {
        r.raw_params.set_sak(merged);
    }
}

/// ISO-DEP frame waiting time for an FWI in `[MIN_FWI, MAX_FWI]`.
pub fn fwt_from_fwi(fwi: u8) -> Option<Duration> {
    if !(MIN_FWI..=MAX_FWI).contains(&fwi) {
        return None;
    }
    Some(Duration::from_millis((1u64 << (fwi - MIN_FWI)) * FWT_BASE_MS))
}

/// Transceive timeout derived from an NFC-A ISO-DEP activation, or `None`
/// to keep the default.
pub fn iso_dep_timeout(params: &RfTechParams, activation: &ActivationParams) -> Option<Duration> {
    if !params.mode.is_nfc_a() {
        return None;
    }
    let fwi = activation.fwi()?;
    let fwt = fwt_from_fwi(fwi);
    if fwt.is_none() {
        debug!("FWI {} outside [{}, {}], keeping default", fwi, MIN_FWI, MAX_FWI);
    }
    fwt
}

/// Max NDEF message size of a Type-1 tag from its header ROM; 0 for an
/// unknown variant.
pub fn t1t_max_message_size(activation: &ActivationParams) -> u32 {
    let ActivationParams::T1t { hr } = activation else {
        return 0;
    };
    match hr[0] {
        T1T_HR0_TOPAZ96 => T1T_TOPAZ96_MAX_MESSAGE_SIZE,
        T1T_HR0_TOPAZ512 => T1T_TOPAZ512_MAX_MESSAGE_SIZE,
        other => {
            warn!("unknown T1T variant HR0={:#04x}", other);
            0
        }
    }
}
