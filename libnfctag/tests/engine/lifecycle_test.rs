#[path = "../common/mod.rs"]
mod common;

use std::time::Duration;

use libnfctag::controller::ControllerEvent;
use libnfctag::test_support::{Harness, fast_config, iso_dep_tag, t2t_tag};
use libnfctag::types::{
    ActivationState, DeactivationKind, ProtocolKind, RfInterface, TechnologyKind,
};
use serial_test::serial;

#[test]
fn discovery_selects_and_activates_single_tag() {
    common::helpers::init_logger();
    let h = Harness::new(iso_dep_tag(1), fast_config()).unwrap();
    h.engine.start_discovery().unwrap();
    h.controller.inject(common::fixtures::discovery(
        ProtocolKind::IsoDep,
        1,
        common::fixtures::iso_dep_a_params(),
        false,
    ));

    assert_eq!(h.controller.count("start_discovery"), 1);
    assert_eq!(h.controller.count("select"), 1);
    assert!(h.engine.is_active());
    assert_eq!(h.engine.current_interface(), RfInterface::IsoDep);
    assert_eq!(h.engine.protocol(), Some(ProtocolKind::IsoDep));

    let summary = h.observer.last_arrival().unwrap();
    assert_eq!(
        summary.technologies,
        vec![TechnologyKind::Iso14443_4, TechnologyKind::Iso14443_3A]
    );
    assert_eq!(summary.uid.to_hex(), "0452218a3c5b80");
    assert!(!summary.multiprotocol);
    assert_eq!(h.observer.arrivals(), 1);
}

#[test]
fn iso_dep_activation_sets_timeout_from_fwi() {
    common::helpers::init_logger();
    let mut tag = iso_dep_tag(1);
    tag.activation = common::fixtures::ats_fwi_14();
    let h = Harness::new(tag, fast_config()).unwrap();
    h.activate(RfInterface::IsoDep);
    assert_eq!(
        h.engine.get_timeout(TechnologyKind::Iso14443_4),
        Duration::from_millis(4944)
    );

    // Timeouts return to defaults once the tag is gone.
    h.engine.disconnect().unwrap();
    assert_eq!(
        h.engine.get_timeout(TechnologyKind::Iso14443_4),
        TechnologyKind::Iso14443_4.default_timeout()
    );
}

#[test]
fn disconnect_twice_is_idempotent() {
    let h = common::helpers::activated(t2t_tag(2), RfInterface::Frame);

    h.engine.disconnect().unwrap();
    assert_eq!(h.engine.activation_state(), ActivationState::Idle);
    assert!(h.engine.technologies().is_empty());
    assert_eq!(h.observer.departures(), 1);

    h.engine.disconnect().unwrap();
    assert_eq!(h.controller.count("deactivate"), 1);
    assert_eq!(h.observer.departures(), 1);
}

#[test]
fn unsolicited_idle_deactivation_resets_state() {
    let h = common::helpers::activated(t2t_tag(2), RfInterface::Frame);
    h.controller.inject(ControllerEvent::Deactivated {
        kind: DeactivationKind::Idle,
    });
    assert!(!h.engine.is_active());
    assert!(h.engine.tag_summary().is_none());
    assert!(h.engine.ndef_info().is_none());
    assert_eq!(h.observer.departures(), 1);

    // Nothing left to tear down.
    h.engine.disconnect().unwrap();
    assert_eq!(h.controller.count("deactivate"), 0);
}

#[test]
fn operations_without_tag_report_tag_lost() {
    common::helpers::init_logger();
    let h = Harness::new(t2t_tag(1), fast_config()).unwrap();
    assert!(h.engine.transceive(&[0x30, 0x00], None).unwrap_err().is_tag_lost());
    assert!(h.engine.read().unwrap_err().is_tag_lost());
    assert!(h.engine.check_ndef().unwrap_err().is_tag_lost());
    assert!(h.engine.connect(0).unwrap_err().is_tag_lost());
    assert!(!h.engine.presence_check());
    assert!(h.controller.sent().is_empty());
}

#[test]
#[serial]
fn abort_wakes_blocked_transceive() {
    let h = common::helpers::activated(t2t_tag(1), RfInterface::Frame);
    let engine = h.engine.clone();
    let worker = std::thread::spawn(move || engine.transceive(&[0x30, 0x04], Some(Duration::from_secs(5))));

    assert!(common::helpers::wait_until(Duration::from_secs(2), || {
        h.controller.count("send_raw_frame") == 1
    }));
    h.engine.abort();

    let err = worker.join().unwrap().unwrap_err();
    assert!(err.is_tag_lost());
    assert!(!h.engine.is_active());
    assert_eq!(h.observer.departures(), 1);
}
