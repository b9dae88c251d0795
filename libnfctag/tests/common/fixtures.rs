// fixtures.rs: commonly used notification parameters and events

use libnfctag::controller::ControllerEvent;
use libnfctag::tech::{ActivationParams, RfTechParams};
use libnfctag::types::{DiscoveryHandle, ProtocolKind, RfMode, SystemCode};

pub fn ultralight_params(uid_tail: u8) -> RfTechParams {
    RfTechParams::nfc_a(
        RfMode::PollA,
        [0x44, 0x00],
        vec![0x04, 0x11, 0x22, 0x33, 0x44, 0x55, uid_tail],
        0x00,
    )
}

pub fn iso_dep_a_params() -> RfTechParams {
    RfTechParams::nfc_a(
        RfMode::PollA,
        [0x44, 0x03],
        vec![0x04, 0x52, 0x21, 0x8A, 0x3C, 0x5B, 0x80],
        0x20,
    )
}

pub fn classic_params() -> RfTechParams {
    RfTechParams::nfc_a(
        RfMode::PollA,
        [0x44, 0x03],
        vec![0x04, 0x52, 0x21, 0x8A, 0x3C, 0x5B, 0x80],
        0x08,
    )
}

pub fn felica_params() -> RfTechParams {
    let mut sensf = hex::decode("012E4CDEADBEEF010203").unwrap();
    sensf.extend_from_slice(&hex::decode("0102030405060708").unwrap());
    RfTechParams::nfc_f(RfMode::PollF, sensf, vec![SystemCode::FELICA_LITE])
}

/// Passive NFC-F peer advertising NFC-DEP.
pub fn p2p_f_params() -> RfTechParams {
    RfTechParams::nfc_f(RfMode::PollF, vec![0x01, 0xFE, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06], vec![])
}

pub fn discovery(protocol: ProtocolKind, handle: u8, params: RfTechParams, more: bool) -> ControllerEvent {
    ControllerEvent::DiscoveryResult {
        protocol,
        handle: DiscoveryHandle::new(handle),
        params,
        more_follows: more,
    }
}

/// ATS with FWI 14 in TB(1).
pub fn ats_fwi_14() -> ActivationParams {
    ActivationParams::IsoDepA {
        ats: vec![0x75, 0x77, 0xE1, 0x02, 0x80],
    }
}
