#[path = "../common/mod.rs"]
mod common;

use libnfctag::config::EngineConfig;
use libnfctag::controller::{Command, ControllerEvent};
use libnfctag::types::{
    ActivationState, DeactivationKind, DiscoveryHandle, ProtocolKind, RfInterface, TechnologyKind,
};
use libnfctag::Error;
use serial_test::serial;

#[test]
#[serial]
fn select_next_tag_cycles_through_field() {
    let a = common::fixtures::ultralight_params(0x01);
    let b = common::fixtures::ultralight_params(0x02);
    let (engine, controller, observer) = common::helpers::multi_tag_engine(vec![
        (1, ProtocolKind::T2t, a.clone()),
        (2, ProtocolKind::T2t, b.clone()),
    ]);

    engine.start_discovery().unwrap();
    controller.inject(common::fixtures::discovery(ProtocolKind::T2t, 1, a, true));
    controller.inject(common::fixtures::discovery(ProtocolKind::T2t, 2, b, false));

    assert!(engine.is_active());
    let first = engine.tag_summary().unwrap();
    assert_eq!(first.handles[0], DiscoveryHandle::new(1));
    assert!(first.multiprotocol);
    assert_eq!(engine.discovery_records().len(), 4);

    assert!(engine.select_next_tag().unwrap());
    let second = engine.tag_summary().unwrap();
    assert_eq!(second.handles[0], DiscoveryHandle::new(2));
    assert_eq!(observer.arrivals(), 2);
    assert_eq!(observer.departures(), 1);

    let sent = controller.sent();
    assert_eq!(
        sent.iter().filter(|c| c.name() == "select").count(),
        2
    );
    assert!(sent.contains(&Command::Deactivate { to_sleep: true }));

    // Wraps back around to the first tag.
    assert!(engine.select_next_tag().unwrap());
    assert_eq!(
        engine.tag_summary().unwrap().handles[0],
        DiscoveryHandle::new(1)
    );
}

#[test]
#[serial]
fn failed_select_of_next_tag_returns_to_idle() {
    let a = common::fixtures::ultralight_params(0x01);
    let b = common::fixtures::ultralight_params(0x02);
    // Only tag 1 answers selects.
    let (engine, controller, observer) =
        common::helpers::multi_tag_engine(vec![(1, ProtocolKind::T2t, a.clone())]);

    engine.start_discovery().unwrap();
    controller.inject(common::fixtures::discovery(ProtocolKind::T2t, 1, a, true));
    controller.inject(common::fixtures::discovery(ProtocolKind::T2t, 2, b, false));
    assert!(engine.is_active());

    assert!(matches!(engine.select_next_tag(), Err(Error::TagLost)));
    assert_eq!(engine.activation_state(), ActivationState::Idle);
    assert!(engine.tag_summary().is_none());
    assert_eq!(observer.arrivals(), 1);
    assert_eq!(observer.departures(), 1);

    let sent = controller.sent();
    assert_eq!(sent.iter().filter(|c| c.name() == "select").count(), 2);
    assert_eq!(sent.last(), Some(&Command::Deactivate { to_sleep: false }));
}

#[test]
fn single_tag_has_no_next() {
    let a = common::fixtures::ultralight_params(0x01);
    let (engine, controller, _) =
        common::helpers::multi_tag_engine(vec![(1, ProtocolKind::T2t, a.clone())]);
    controller.inject(common::fixtures::discovery(ProtocolKind::T2t, 1, a, false));

    assert!(!engine.select_next_tag().unwrap());
    assert!(engine.is_active());
    assert_eq!(controller.count("deactivate"), 0);
}

#[test]
fn combi_tag_merges_records_and_sak() {
    let iso = common::fixtures::iso_dep_a_params();
    let classic = common::fixtures::classic_params();
    let (engine, controller, observer) = common::helpers::multi_tag_engine(vec![
        (1, ProtocolKind::IsoDep, iso.clone()),
    ]);
    controller.inject(common::fixtures::discovery(ProtocolKind::IsoDep, 1, iso, true));
    controller.inject(common::fixtures::discovery(ProtocolKind::Mifare, 1, classic, false));

    assert_eq!(engine.current_interface(), RfInterface::IsoDep);
    let records = engine.technologies();
    let techs: Vec<_> = records.iter().map(|r| r.technology).collect();
    assert_eq!(
        techs,
        vec![
            TechnologyKind::Iso14443_4,
            TechnologyKind::Iso14443_3A,
            TechnologyKind::MifareClassic
        ]
    );
    assert!(records.iter().all(|r| r.sak() == Some(0x28)));
    assert_eq!(controller.count("mifare_init"), 1);
    assert_eq!(observer.arrivals(), 1);
}

#[test]
fn peer_alongside_tag_is_not_counted_as_second_tag() {
    let a = common::fixtures::ultralight_params(0x01);
    let (engine, controller, _) =
        common::helpers::multi_tag_engine(vec![(1, ProtocolKind::T2t, a.clone())]);
    controller.inject(common::fixtures::discovery(ProtocolKind::T2t, 1, a, true));
    controller.inject(common::fixtures::discovery(
        ProtocolKind::NfcDep,
        2,
        common::fixtures::p2p_f_params(),
        false,
    ));

    let summary = engine.tag_summary().unwrap();
    assert_eq!(summary.handles[0], DiscoveryHandle::new(1));
    assert!(!summary.multiprotocol);
}

#[test]
fn p2p_peer_then_iso_dep_tag_on_rediscovery() {
    let iso = common::fixtures::iso_dep_a_params();
    let peer = common::fixtures::p2p_f_params();
    let config = EngineConfig::builder().p2p_enabled(true).build().unwrap();
    let (engine, controller, _) = common::helpers::multi_tag_engine_with(
        config,
        vec![
            (1, ProtocolKind::IsoDep, iso.clone()),
            (2, ProtocolKind::NfcDep, peer.clone()),
        ],
    );

    engine.start_discovery().unwrap();
    controller.inject(common::fixtures::discovery(ProtocolKind::IsoDep, 1, iso.clone(), true));
    controller.inject(common::fixtures::discovery(ProtocolKind::NfcDep, 2, peer, false));
    assert_eq!(engine.protocol(), Some(ProtocolKind::NfcDep));
    assert_eq!(engine.current_interface(), RfInterface::NfcDep);

    // The peer link goes away; the next cycle only sees the ISO-DEP tag.
    controller.inject(ControllerEvent::Deactivated {
        kind: DeactivationKind::Idle,
    });
    assert!(engine.discovery_records().is_empty());
    controller.inject(common::fixtures::discovery(ProtocolKind::IsoDep, 1, iso, false));

    assert_eq!(engine.protocol(), Some(ProtocolKind::IsoDep));
    assert_eq!(engine.current_interface(), RfInterface::IsoDep);
    assert_eq!(
        controller.sent().last(),
        Some(&Command::Select {
            handle: DiscoveryHandle::new(1),
            protocol: ProtocolKind::IsoDep,
            interface: RfInterface::IsoDep,
        })
    );
}
