// libnfctag/src/tech/params.rs

use std::convert::TryFrom;

use crate::types::{Idm, RfMode, SystemCode, Uid};

/// NFC-A poll parameters (SENS_RES = ATQA, SEL_RES = SAK).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NfcAParams {
    pub sens_res: [u8; 2],
    pub nfcid1: Vec<u8>,
    pub sel_res: u8,
}

/// NFC-B poll parameters. `sensb_res` starts after the 0x50 response
/// code, so bytes 0..4 are the NFCID0 (PUPI).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NfcBParams {
    pub sensb_res: Vec<u8>,
}

/// NFC-F poll parameters. `sensf_res` starts with the NFCID2 (IDm),
/// followed by the PMm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NfcFParams {
    pub bit_rate: u8,
    pub sensf_res: Vec<u8>,
    pub system_codes: Vec<SystemCode>,
}

impl NfcFParams {
    pub fn idm(&self) -> Option<Idm> {
        self.sensf_res.get(..8).and_then(|b| Idm::try_from(b).ok())
    }
}

/// NFC-V (ISO15693) inventory parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NfcVParams {
    pub flags: u8,
    pub dsfid: u8,
    pub afi: u8,
    pub uid: [u8; 8],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KovioParams {
    pub uid: Vec<u8>,
}

/// Technology-tagged raw parameter block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TechParams {
    NfcA(NfcAParams),
    NfcB(NfcBParams),
    NfcF(NfcFParams),
    NfcV(NfcVParams),
    Kovio(KovioParams),
    /// Parameter block this crate does not decode.
    Opaque(Vec<u8>),
}

/// Raw RF technology parameters as reported by the controller, together
/// with the technology and mode they were reported under. Only the
/// technology interpreter looks inside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RfTechParams {
    pub mode: RfMode,
    pub tech: TechParams,
}

impl RfTechParams {
    pub fn nfc_a(mode: RfMode, sens_res: [u8; 2], nfcid1: Vec<u8>, sel_res: u8) -> Self {
        Self {
            mode,
            tech: TechParams::NfcA(NfcAParams {
                sens_res,
                nfcid1,
                sel_res,
            }),
        }
    }

    pub fn nfc_b(mode: RfMode, sensb_res: Vec<u8>) -> Self {
        Self {
            mode,
            tech: TechParams::NfcB(NfcBParams { sensb_res }),
        }
    }

    pub fn nfc_f(mode: RfMode, sensf_res: Vec<u8>, system_codes: Vec<SystemCode>) -> Self {
        Self {
            mode,
            tech: TechParams::NfcF(NfcFParams {
                bit_rate: 1,
                sensf_res,
                system_codes,
            }),
        }
    }

    pub fn nfc_v(uid: [u8; 8], dsfid: u8, afi: u8) -> Self {
        Self {
            mode: RfMode::PollV,
            tech: TechParams::NfcV(NfcVParams {
                flags: 0,
                dsfid,
                afi,
                uid,
            }),
        }
    }

    pub fn kovio(uid: Vec<u8>) -> Self {
        Self {
            mode: RfMode::PollKovio,
            tech: TechParams::Kovio(KovioParams { uid }),
        }
    }

    pub fn opaque(mode: RfMode, bytes: Vec<u8>) -> Self {
        Self {
            mode,
            tech: TechParams::Opaque(bytes),
        }
    }

    pub(crate) fn nfc_a_params(&self) -> Option<&NfcAParams> {
        match &self.tech {
            TechParams::NfcA(a) => Some(a),
            _ => None,
        }
    }

    pub(crate) fn sak(&self) -> Option<u8> {
        self.nfc_a_params().map(|a| a.sel_res)
    }

    pub(crate) fn set_sak(&mut self, sak: u8) {
        if let TechParams::NfcA(a) = &mut self.tech {
            a.sel_res = sak;
        }
    }

    /// Identifier carried by the parameter block, empty when unknown.
    pub(crate) fn uid(&self) -> Uid {
        let bytes = match &self.tech {
            TechParams::NfcA(a) => a.nfcid1.clone(),
            TechParams::NfcB(b) => b.sensb_res.iter().take(4).copied().collect(),
            TechParams::NfcF(f) => f.idm().map(|idm| idm.as_bytes().to_vec()).unwrap_or_default(),
            // NFC-V UIDs are reported LSB first.
            TechParams::NfcV(v) => v.uid.iter().rev().copied().collect(),
            TechParams::Kovio(k) => k.uid.clone(),
            TechParams::Opaque(_) => Vec::new(),
        };
        Uid::from_bytes(bytes)
    }

    pub(crate) fn has_system_code(&self, code: SystemCode) -> bool {
        match &self.tech {
            TechParams::NfcF(f) => f.system_codes.contains(&code),
            _ => false,
        }
    }
}

/// Protocol-specific activation parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ActivationParams {
    #[default]
    None,
    /// RATS response (ATS) without the length byte.
    IsoDepA { ats: Vec<u8> },
    IsoDepB { attrib_res: Vec<u8> },
    /// Type-1 header ROM bytes.
    T1t { hr: [u8; 2] },
    NfcDep { atr: Vec<u8> },
}

impl ActivationParams {
    /// Frame waiting integer from the ATS TB(1) byte, when present.
    pub(crate) fn fwi(&self) -> Option<u8> {
        let ActivationParams::IsoDepA { ats } = self else {
            return None;
        };
        let t0 = *ats.first()?;
        if t0 & 0x20 == 0 {
            return None;
        }
        // TA(1) precedes TB(1) when present.
        let pos = if t0 & 0x10 != 0 { 2 } else { 1 };
        ats.get(pos).map(|tb| tb >> 4)
    }
}
