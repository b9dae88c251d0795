#[path = "../common/mod.rs"]
mod common;

use libnfctag::discovery::{DiscoverySet, SelectionPolicy};
use libnfctag::tech::TechnologyInterpreter;
use libnfctag::types::{DiscoveryHandle, ProtocolKind, RfMode, TechnologyKind};
use libnfctag::RfTechParams;
use proptest::prelude::*;

fn collect(notifications: &[(ProtocolKind, u8, RfTechParams)]) -> DiscoverySet {
    let mut interpreter = TechnologyInterpreter::new();
    let mut set = DiscoverySet::new();
    for (protocol, handle, params) in notifications {
        set.add_notification(interpreter.interpret(
            *protocol,
            DiscoveryHandle::new(*handle),
            params,
            None,
        ));
    }
    set
}

#[test]
fn p2p_peer_wins_when_enabled() {
    let set = collect(&[
        (ProtocolKind::T2t, 1, common::fixtures::ultralight_params(1)),
        (ProtocolKind::NfcDep, 2, common::fixtures::p2p_f_params()),
    ]);
    let enabled = SelectionPolicy::new(true, false);
    assert_eq!(
        enabled.select_first(&set).map(|r| r.endpoint()),
        Some((DiscoveryHandle::new(2), ProtocolKind::NfcDep))
    );

    let disabled = SelectionPolicy::new(false, false);
    assert_eq!(
        disabled.select_first(&set).map(|r| r.endpoint()),
        Some((DiscoveryHandle::new(1), ProtocolKind::T2t))
    );

    let info = enabled.multi_tag_info(&set);
    assert!(info.has_p2p);
    assert_eq!(info.candidates, 1);
}

#[test]
fn reader_only_mode_never_picks_peer() {
    let set = collect(&[
        (ProtocolKind::NfcDep, 2, common::fixtures::p2p_f_params()),
        (ProtocolKind::T3t, 3, common::fixtures::felica_params()),
    ]);
    let policy = SelectionPolicy::new(true, true);
    assert_eq!(
        policy.select_first(&set).map(|r| r.protocol),
        Some(ProtocolKind::T3t)
    );
}

#[test]
fn felica_lite_is_flagged() {
    let set = collect(&[(ProtocolKind::T3t, 3, common::fixtures::felica_params())]);
    let record = set.get(0).unwrap();
    assert_eq!(record.technology, TechnologyKind::Felica);
    assert!(record.is_felica_lite());
    assert_eq!(record.uid().to_hex(), "012e4cdeadbeef01");
}

fn protocol_strategy() -> impl Strategy<Value = ProtocolKind> {
    prop_oneof![
        Just(ProtocolKind::T2t),
        Just(ProtocolKind::IsoDep),
        Just(ProtocolKind::Mifare),
        Just(ProtocolKind::NfcDep),
    ]
}

proptest! {
    // Cycling through the set visits every non-peer endpoint other than
    // the current one and never returns a peer.
    #[test]
    fn select_next_skips_current_and_peers(
        protocols in proptest::collection::vec(protocol_strategy(), 1..8),
        current in 0usize..8,
    ) {
        let notifications: Vec<_> = protocols
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let params = RfTechParams::nfc_a(RfMode::PollA, [0x04, 0x00], vec![i as u8, 1, 2, 3], 0x20);
                (*p, i as u8 + 1, params)
            })
            .collect();
        let set = collect(&notifications);
        let current = set.records()[current % set.len()].endpoint();
        let policy = SelectionPolicy::new(false, false);

        match policy.select_next(&set, current) {
            Some(next) => {
                prop_assert!(!next.is_nfc_dep());
                prop_assert_ne!(next.endpoint(), current);
            }
            None => {
                prop_assert!(set
                    .records()
                    .iter()
                    .all(|r| r.is_nfc_dep() || r.endpoint() == current));
            }
        }
    }
}
