#[path = "../common/mod.rs"]
mod common;

use libnfctag::controller::ControllerEvent;
use libnfctag::tag::NdefCapability;
use libnfctag::test_support::kovio_tag;
use libnfctag::types::{DeactivationKind, RfInterface, TechnologyKind};
use libnfctag::Error;

#[test]
fn kovio_barcode_is_not_ndef() {
    let h = common::helpers::activated(kovio_tag(1), RfInterface::Frame);
    assert_eq!(h.engine.technology(), Some(TechnologyKind::KovioBarcode));
    let info = h.engine.check_ndef().unwrap();
    assert_eq!(info.capability, NdefCapability::NotNdef);
    assert!(h.controller.sent().is_empty());
}

#[test]
fn ndef_updates_are_refused_on_barcode() {
    let h = common::helpers::activated(kovio_tag(1), RfInterface::Frame);
    h.engine.check_ndef().unwrap();

    assert!(matches!(h.engine.write(b"hello"), Err(Error::UnsupportedOperation(_))));
    assert!(matches!(h.engine.format(), Err(Error::UnsupportedOperation(_))));
    assert!(matches!(
        h.engine.make_read_only(),
        Err(Error::UnsupportedOperation(_))
    ));
    assert!(h.controller.sent().is_empty());
    assert!(h.engine.is_active());
}

#[test]
fn write_is_refused_without_prior_detection() {
    let h = common::helpers::activated(kovio_tag(1), RfInterface::Frame);
    assert!(matches!(h.engine.write(b""), Err(Error::UnsupportedOperation(_))));
    assert_eq!(h.controller.count("write_ndef"), 0);
}

#[test]
fn repeated_activation_is_suppressed() {
    let h = common::helpers::activated(kovio_tag(1), RfInterface::Frame);
    h.activate(RfInterface::Frame);
    assert_eq!(h.observer.arrivals(), 1);
}

#[test]
fn presence_check_reports_absent_and_deactivates() {
    let h = common::helpers::activated(kovio_tag(1), RfInterface::Frame);
    assert!(!h.engine.presence_check());
    assert!(!h.engine.is_active());
    assert_eq!(h.observer.departures(), 1);
    assert_eq!(h.controller.count("presence_check"), 0);
}

#[test]
fn unrequested_idle_deactivation_is_deferred() {
    let h = common::helpers::activated(kovio_tag(1), RfInterface::Frame);
    h.controller.inject(ControllerEvent::Deactivated {
        kind: DeactivationKind::Idle,
    });
    assert!(h.engine.is_active());
    assert_eq!(h.observer.departures(), 0);

    // Our own disconnect is honoured.
    h.engine.disconnect().unwrap();
    assert!(!h.engine.is_active());
    assert_eq!(h.observer.departures(), 1);
}

#[test]
fn reconnect_is_a_no_op() {
    let h = common::helpers::activated(kovio_tag(1), RfInterface::Frame);
    h.engine.reconnect().unwrap();
    assert!(h.controller.sent().is_empty());
}
