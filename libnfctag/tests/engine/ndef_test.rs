#[path = "../common/mod.rs"]
mod common;

use libnfctag::controller::Command;
use libnfctag::tag::NdefCapability;
use libnfctag::test_support::{SimulatedTag, iso_dep_tag, t2t_tag};
use libnfctag::tech::ActivationParams;
use libnfctag::types::{ProtocolKind, RfInterface};
use libnfctag::Error;

#[test]
fn check_then_write_then_read() -> anyhow::Result<()> {
    let h = common::helpers::activated(iso_dep_tag(1), RfInterface::IsoDep);

    let info = h.engine.check_ndef()?;
    assert_eq!(info.capability, NdefCapability::Ndef);
    assert_eq!(info.max_size, 137);
    assert_eq!(info.current_size, 0);
    assert!(h.engine.read()?.is_empty());
    assert_eq!(h.controller.count("read_ndef"), 0);

    let message = hex::decode("d1010b5402656e68656c6c6f")?;
    h.engine.write(&message)?;
    assert_eq!(h.engine.ndef_info().map(|i| i.current_size), Some(12));
    assert_eq!(h.engine.read()?, message);
    assert_eq!(h.controller.count("read_ndef"), 1);
    Ok(())
}

#[test]
fn empty_write_erases_with_empty_record() {
    let h = common::helpers::activated(t2t_tag(1), RfInterface::Frame);
    h.engine.check_ndef().unwrap();
    h.engine.write(&[]).unwrap();
    assert!(h
        .controller
        .sent()
        .contains(&Command::WriteNdef(vec![0xD0, 0x00, 0x00])));
    assert_eq!(h.with_tag(|t| t.ndef.clone()), Some(vec![0xD0, 0x00, 0x00]));
}

#[test]
fn write_formats_unformatted_tag_first() {
    let mut tag = t2t_tag(1);
    tag.ndef = None;
    let h = common::helpers::activated(tag, RfInterface::Frame);

    let info = h.engine.check_ndef().unwrap();
    assert_eq!(info.capability, NdefCapability::Formatable);

    h.engine.write(b"\xD1\x01\x01T\x00").unwrap();
    let names: Vec<_> = h.controller.sent().iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["detect_ndef", "format", "write_ndef"]);
}

#[test]
fn write_to_non_formatable_tag_fails() {
    let mut tag = t2t_tag(1);
    tag.ndef = None;
    tag.formatable = false;
    let h = common::helpers::activated(tag, RfInterface::Frame);

    assert_eq!(
        h.engine.check_ndef().unwrap().capability,
        NdefCapability::Unknown
    );
    let err = h.engine.write(b"abc").unwrap_err();
    assert!(matches!(
        err,
        Error::OperationFailed {
            operation: "write",
            ..
        }
    ));
}

#[test]
fn format_of_iso_dep_tag_reconnects() {
    let h = common::helpers::activated(iso_dep_tag(1), RfInterface::IsoDep);
    h.engine.format().unwrap();
    assert_eq!(h.controller.count("format"), 1);
    assert_eq!(h.controller.count("select"), 1);
    assert_eq!(h.engine.current_interface(), RfInterface::IsoDep);
}

#[test]
fn make_read_only_falls_back_to_soft_lock() {
    let mut tag = t2t_tag(1);
    tag.hard_lock_rejected = true;
    let h = common::helpers::activated(tag, RfInterface::Frame);
    h.engine.check_ndef().unwrap();

    h.engine.make_read_only().unwrap();
    let sent = h.controller.sent();
    assert!(sent.contains(&Command::SetReadOnly { hard: true }));
    assert!(sent.contains(&Command::SetReadOnly { hard: false }));
    assert!(h.engine.ndef_info().unwrap().read_only);
}

#[test]
fn t1t_detect_failure_reports_header_size() {
    let mut tag = SimulatedTag::new(
        ProtocolKind::T1t,
        1,
        libnfctag::test_support::nfc_a_params([0x0C, 0x00], &[0x01, 0x02, 0x03, 0x04], 0x00),
    );
    tag.activation = ActivationParams::T1t { hr: [0x11, 0x48] };
    tag.ndef = None;
    let h = common::helpers::activated(tag, RfInterface::Frame);

    assert_eq!(h.engine.t1t_max_message_size(), 90);
    let info = h.engine.check_ndef().unwrap();
    assert_eq!(info.max_size, 90);
    assert_eq!(h.observer.last_arrival().unwrap().t1t_max_message_size, 90);
}
