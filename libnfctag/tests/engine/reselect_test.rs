#[path = "../common/mod.rs"]
mod common;

use libnfctag::controller::Command;
use libnfctag::engine::{SwitchFailure, SwitchState};
use libnfctag::test_support::{Harness, iso_dep_tag, t2t_tag};
use libnfctag::types::{ActivationState, NciVersion, RfInterface, TechnologyKind};
use libnfctag::{EngineConfig, Error, RetryPolicy};

#[test]
fn connect_switches_iso_dep_tag_to_frame_interface() {
    let h = common::helpers::activated(iso_dep_tag(1), RfInterface::IsoDep);

    // Index 1 is the ISO14443-3A identity of the ISO-DEP tag.
    h.engine.connect(1).unwrap();
    assert_eq!(h.engine.technology(), Some(TechnologyKind::Iso14443_3A));
    assert_eq!(h.engine.current_interface(), RfInterface::Frame);
    assert_eq!(h.engine.switch_state(), SwitchState::Active);
    assert_eq!(h.controller.count("deactivate"), 1);
    assert_eq!(h.controller.count("select"), 1);

    // Back to ISO-DEP.
    h.engine.connect(0).unwrap();
    assert_eq!(h.engine.current_interface(), RfInterface::IsoDep);
    assert_eq!(h.controller.count("select"), 2);

    // Already there: no reselect.
    h.engine.connect(0).unwrap();
    assert_eq!(h.controller.count("select"), 2);
    assert_eq!(h.observer.arrivals(), 1);
}

#[test]
fn connect_rejects_out_of_range_index() {
    let h = common::helpers::activated(iso_dep_tag(1), RfInterface::IsoDep);
    let err = h.engine.connect(5).unwrap_err();
    assert!(matches!(err, Error::InvalidTechIndex(5)));
    assert!(h.controller.sent().is_empty());
}

#[test]
fn select_failures_within_budget_recover() {
    let mut tag = iso_dep_tag(1);
    tag.select_failures = 3;
    let h = common::helpers::activated(tag, RfInterface::IsoDep);

    h.engine.connect(1).unwrap();
    assert_eq!(h.controller.count("select"), 4);
    assert!(h.engine.is_active());
    assert_eq!(h.engine.current_interface(), RfInterface::Frame);
}

#[test]
fn select_retries_are_bounded() {
    let mut tag = iso_dep_tag(1);
    tag.select_failures = 10;
    let h = common::helpers::activated(tag, RfInterface::IsoDep);

    let err = h.engine.connect(1).unwrap_err();
    assert!(err.is_tag_lost());
    // First attempt plus three retries, never a fifth.
    assert_eq!(h.controller.count("select"), 4);
    assert_eq!(
        h.engine.switch_state(),
        SwitchState::Failed(SwitchFailure::TagLost)
    );

    // The tag is not left asleep.
    let last = h.controller.sent().pop().unwrap();
    assert_eq!(last, Command::Deactivate { to_sleep: false });
    assert_eq!(h.engine.activation_state(), ActivationState::Idle);
    assert_eq!(h.observer.departures(), 1);
}

#[test]
fn tag_gone_instead_of_sleep_is_tag_lost() {
    let mut tag = iso_dep_tag(1);
    tag.lost_on_sleep = true;
    let h = common::helpers::activated(tag, RfInterface::IsoDep);

    assert!(h.engine.connect(1).unwrap_err().is_tag_lost());
    assert_eq!(h.controller.count("select"), 0);
    assert!(!h.engine.is_active());
}

#[test]
fn rejected_select_command_is_a_select_error() {
    let h = common::helpers::activated(iso_dep_tag(1), RfInterface::IsoDep);
    h.controller.reject("select");

    let err = h.engine.connect(1).unwrap_err();
    assert!(matches!(err, Error::Command { command: "select", .. }));
    assert_eq!(
        h.engine.switch_state(),
        SwitchState::Failed(SwitchFailure::SelectError)
    );
}

#[test]
fn nci_1_0_sends_deselect_before_leaving_iso_dep() {
    common::helpers::init_logger();
    let config = EngineConfig::builder()
        .nci_version(NciVersion::V1_0)
        .select_retry(RetryPolicy::once())
        .build()
        .unwrap();
    let h = Harness::new(iso_dep_tag(1), config).unwrap();
    h.activate(RfInterface::IsoDep);

    h.engine.connect(1).unwrap();
    let sent = h.controller.sent();
    assert_eq!(sent[0], Command::SendRawFrame(vec![0xC2]));
    assert_eq!(sent[1], Command::Deactivate { to_sleep: true });
}

#[test]
fn nci_2_0_skips_sleep_frame() {
    let h = common::helpers::activated(t2t_tag(1), RfInterface::Frame);
    h.engine.reconnect().unwrap();
    assert_eq!(h.controller.count("send_raw_frame"), 0);
    assert_eq!(h.controller.count("select"), 1);
    assert!(h.engine.is_active());
}
