#[path = "../common/mod.rs"]
mod common;

use libnfctag::constants::{MIFARE_KEY_DEFAULT, MIFARE_KEY_MAD, MIFARE_KEY_NDEF};
use libnfctag::controller::{Command, MifareCommand};
use libnfctag::tag::NdefCapability;
use libnfctag::test_support::mifare_classic_tag;
use libnfctag::types::{RfInterface, TechnologyKind};

#[test]
fn activation_initialises_mifare_extension() {
    let h = common::helpers::activated(mifare_classic_tag(3), RfInterface::Mifare);
    assert_eq!(h.engine.technology(), Some(TechnologyKind::MifareClassic));
    assert_eq!(h.controller.count("mifare_init"), 1);
}

#[test]
fn check_ndef_reconnects_around_detection() {
    let h = common::helpers::activated(mifare_classic_tag(3), RfInterface::Mifare);
    let info = h.engine.check_ndef().unwrap();
    assert_eq!(info.capability, NdefCapability::Ndef);
    assert_eq!(h.controller.count("mifare_detect_ndef"), 1);
    assert_eq!(h.controller.count("select"), 2);
    assert!(h.engine.is_active());
}

#[test]
fn format_falls_back_to_default_key() {
    let mut tag = mifare_classic_tag(3);
    tag.ndef = None;
    let h = common::helpers::activated(tag, RfInterface::Mifare);

    h.engine.format().unwrap();
    let formats: Vec<_> = h
        .controller
        .sent()
        .into_iter()
        .filter(|c| matches!(c, Command::Mifare(MifareCommand::Format { .. })))
        .collect();
    assert_eq!(
        formats,
        vec![
            Command::Mifare(MifareCommand::Format { key: MIFARE_KEY_MAD }),
            Command::Mifare(MifareCommand::Format {
                key: MIFARE_KEY_DEFAULT
            }),
        ]
    );
    // A failed key halts the tag; it is reselected before the retry.
    assert_eq!(h.controller.count("select"), 1);
}

#[test]
fn format_fails_when_no_key_matches() {
    let mut tag = mifare_classic_tag(3);
    tag.ndef = None;
    tag.mifare_key = [0x11; 6];
    let h = common::helpers::activated(tag, RfInterface::Mifare);
    assert!(h.engine.format().is_err());
    assert_eq!(h.controller.count("mifare_format"), 2);
}

#[test]
fn make_read_only_uses_ndef_key() {
    let h = common::helpers::activated(mifare_classic_tag(3), RfInterface::Mifare);
    h.engine.make_read_only().unwrap();
    assert!(h.controller.sent().contains(&Command::Mifare(MifareCommand::SetReadOnly {
        key: MIFARE_KEY_NDEF
    })));
}

#[test]
fn transceive_strips_status_byte() {
    let h = common::helpers::activated(mifare_classic_tag(3), RfInterface::Mifare);
    h.with_tag(|t| t.responses.push_back(vec![0x01, 0x02, 0x03, 0x00]));
    let rsp = h.engine.transceive(&[0x30, 0x04], None).unwrap();
    assert_eq!(rsp, vec![0x01, 0x02, 0x03]);
    assert_eq!(h.controller.count("mifare_transceive"), 1);
}

#[test]
fn invalid_response_reconnects() {
    let h = common::helpers::activated(mifare_classic_tag(3), RfInterface::Mifare);
    h.with_tag(|t| t.responses.push_back(vec![0x01, 0x02, 0x03, 0x04]));
    let rsp = h.engine.transceive(&[0x30, 0x04], None).unwrap();
    assert!(rsp.is_empty());
    assert_eq!(h.controller.count("select"), 1);
    assert!(h.engine.is_active());
}
