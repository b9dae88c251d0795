#[path = "../common/mod.rs"]
mod common;

use std::time::Duration;

use libnfctag::controller::ControllerEvent;
use libnfctag::engine::{PresenceMonitor, PresenceOutcome};
use libnfctag::test_support::{iso_dep_tag, mifare_classic_tag};
use libnfctag::types::{DeactivationKind, RfInterface};
use serial_test::serial;

#[test]
fn present_tag_passes_check() {
    let h = common::helpers::activated(iso_dep_tag(1), RfInterface::IsoDep);
    assert!(h.engine.presence_check());
    assert_eq!(h.controller.count("presence_check"), 1);
}

#[test]
fn absent_tag_fails_check() {
    let h = common::helpers::activated(iso_dep_tag(1), RfInterface::IsoDep);
    h.with_tag(|t| t.present = false);
    assert!(!h.engine.presence_check());
}

#[test]
fn legacy_mifare_reader_uses_mifare_path() {
    let h = common::helpers::activated(mifare_classic_tag(1), RfInterface::Mifare);
    assert!(h.engine.presence_check());
    assert_eq!(h.controller.count("mifare_presence_check"), 1);
    assert_eq!(h.controller.count("presence_check"), 0);
}

#[test]
#[serial]
fn monitor_disconnects_departed_tag() {
    let h = common::helpers::activated(iso_dep_tag(1), RfInterface::IsoDep);
    let monitor = PresenceMonitor::spawn(h.engine.clone()).unwrap();

    assert!(common::helpers::wait_until(Duration::from_secs(2), || {
        h.controller.count("presence_check") >= 2
    }));
    h.with_tag(|t| t.present = false);

    assert_eq!(monitor.join(), Some(PresenceOutcome::Absent));
    assert!(!h.engine.is_active());
    assert_eq!(h.controller.count("deactivate"), 1);
    assert_eq!(h.observer.departures(), 1);
}

#[test]
#[serial]
fn monitor_ends_when_tag_deactivated_elsewhere() {
    let h = common::helpers::activated(iso_dep_tag(1), RfInterface::IsoDep);
    let monitor = PresenceMonitor::spawn(h.engine.clone()).unwrap();

    h.controller.inject(ControllerEvent::Deactivated {
        kind: DeactivationKind::Idle,
    });
    // A check in flight when the tag goes away reports it absent instead.
    let outcome = monitor.join();
    assert!(matches!(
        outcome,
        Some(PresenceOutcome::Deactivated | PresenceOutcome::Absent)
    ));
    assert_eq!(h.controller.count("deactivate"), 0);
    assert_eq!(h.observer.departures(), 1);
}

#[test]
#[serial]
fn stopped_monitor_leaves_tag_active() {
    let h = common::helpers::activated(iso_dep_tag(1), RfInterface::IsoDep);
    let monitor = PresenceMonitor::spawn(h.engine.clone()).unwrap();
    assert!(!monitor.is_finished());

    assert_eq!(monitor.stop(), Some(PresenceOutcome::Stopped));
    assert!(h.engine.is_active());
    assert_eq!(h.controller.count("deactivate"), 0);
}
