//! End-to-end tests for the spanning-tree controller.
//!
//! These drive [`SpanningTreeOrch`] through its event handlers the way the
//! discovery and switch collaborators would, then check the resulting link
//! states and MAC tables.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sdn_types::{Dpid, MacAddress, PortNo};
use std::collections::{BTreeSet, HashSet, VecDeque};
use stpd::spanning_tree::reachable_switches;
use stpd::{
    LinkDiscoveryEvent, SpanningTreeOrch, StpConfig, StpError, SwitchEventHandler, SwitchRole,
    Topology, UnknownPacketSourceEvent,
};

fn dpid(n: u64) -> Dpid {
    Dpid::new(n)
}

fn port(n: u16) -> PortNo {
    PortNo::new(n)
}

fn orch_with(switches: &[u64]) -> SpanningTreeOrch {
    let mut orch = SpanningTreeOrch::new(StpConfig::default());
    for s in switches {
        orch.on_switch_connected(dpid(*s)).unwrap();
    }
    orch
}

fn discover(orch: &mut SpanningTreeOrch, a: u64, pa: u16, b: u64, pb: u16) {
    orch.on_link_discovery(&LinkDiscoveryEvent::new(dpid(a), port(pa), dpid(b), port(pb)))
        .unwrap();
}

/// Switches reachable from `start` using active links only.
fn active_component(topology: &Topology, start: Dpid) -> BTreeSet<Dpid> {
    let mut seen = BTreeSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(current) = queue.pop_front() {
        for link in topology.links_of(current).filter(|l| l.is_active()) {
            if seen.insert(link.neighbor()) {
                queue.push_back(link.neighbor());
            }
        }
    }
    seen
}

#[test]
fn test_three_switch_line_scenario() {
    let mut orch = orch_with(&[1, 2, 3]);
    discover(&mut orch, 1, 1, 2, 1);
    discover(&mut orch, 2, 2, 3, 1);

    assert_eq!(orch.root(), Some(dpid(1)));
    assert_eq!(
        orch.topology().active_edges(),
        vec![
            (dpid(1), port(1), dpid(2), port(1)),
            (dpid(2), port(2), dpid(3), port(1)),
        ]
    );
    for link in orch.topology().links() {
        assert!(link.is_active(), "{} should be active", link);
    }

    let mac: MacAddress = "aa:bb:00:00:00:00".parse().unwrap();
    orch.on_unknown_packet_source(&UnknownPacketSourceEvent::new(dpid(3), mac, port(5)))
        .unwrap();

    let topology = orch.topology();
    assert_eq!(topology.lookup_switch(dpid(3)).unwrap().mac_location(&mac), Some(port(5)));
    // Switch 2 learns the port facing 3, switch 1 the port facing 2.
    assert_eq!(topology.lookup_switch(dpid(2)).unwrap().mac_location(&mac), Some(port(2)));
    assert_eq!(topology.lookup_switch(dpid(1)).unwrap().mac_location(&mac), Some(port(1)));
}

#[test]
fn test_unreachable_switch_untouched() {
    let mut orch = orch_with(&[1, 2, 3, 4]);
    discover(&mut orch, 1, 1, 2, 1);
    discover(&mut orch, 2, 2, 3, 1);

    let outcome = orch.rebuild_spanning_tree(None).unwrap();
    assert_eq!(outcome.switches, 3);

    let lonely = orch.topology().lookup_switch(dpid(4)).unwrap();
    assert!(lonely.links().is_empty());
    assert!(lonely.mac_table().is_empty());
}

#[test]
fn test_unknown_endpoint_does_not_mutate() {
    let mut orch = orch_with(&[1, 2]);
    discover(&mut orch, 1, 1, 2, 1);
    let before = orch.snapshot();

    let err = orch
        .on_link_discovery(&LinkDiscoveryEvent::new(dpid(1), port(2), dpid(99), port(1)))
        .unwrap_err();

    assert_eq!(err, StpError::unknown_switch(SwitchRole::Remote, dpid(99)));
    assert_eq!(orch.snapshot(), before);
}

#[test]
fn test_rediscovery_keeps_single_pair() {
    let mut orch = orch_with(&[1, 2]);
    discover(&mut orch, 1, 1, 2, 1);
    discover(&mut orch, 2, 1, 1, 1);
    discover(&mut orch, 1, 1, 2, 1);

    assert_eq!(orch.topology().link_count(), 2);
    assert_eq!(orch.stats().links_discovered, 1);
    assert_eq!(orch.topology().active_edges().len(), 1);
}

#[test]
fn test_ring_keeps_one_blocked_link() {
    let mut orch = orch_with(&[1, 2, 3, 4]);
    discover(&mut orch, 1, 1, 2, 1);
    discover(&mut orch, 2, 2, 3, 1);
    discover(&mut orch, 3, 2, 4, 1);
    discover(&mut orch, 4, 2, 1, 2);

    let topology = orch.topology();
    assert_eq!(topology.active_edges().len(), 3);
    let blocked: Vec<String> = topology
        .links()
        .filter(|l| !l.is_active())
        .map(|l| l.to_string())
        .collect();
    // 3 is two hops from 1 both ways; the path via 2 was discovered first.
    assert_eq!(blocked, vec!["3[2] -> 4[1]", "4[1] -> 3[2]"]);
}

#[test]
fn test_lower_dpid_joining_moves_root() {
    let mut orch = orch_with(&[5, 6, 7, 2]);
    discover(&mut orch, 5, 1, 6, 1);
    discover(&mut orch, 6, 2, 7, 1);
    discover(&mut orch, 7, 2, 5, 2);
    assert_eq!(orch.root(), Some(dpid(5)));
    assert!(!orch.topology().link_at_port(dpid(6), port(2)).unwrap().is_active());

    discover(&mut orch, 2, 1, 6, 3);
    assert_eq!(orch.root(), Some(dpid(2)));

    // Tree is now rooted at 2 through 6; 6-7 is the shortest way to 7.
    let topology = orch.topology();
    assert_eq!(active_component(topology, dpid(2)).len(), 4);
    assert_eq!(topology.active_edges().len(), 3);
    assert!(topology.link_at_port(dpid(6), port(2)).unwrap().is_active());
    assert!(!topology.link_at_port(dpid(7), port(2)).unwrap().is_active());
}

/// Random multigraph over `n` switches, as (a, b) index pairs.
fn topology_strategy() -> impl Strategy<Value = (u64, Vec<(u64, u64)>)> {
    (2u64..9).prop_flat_map(|n| {
        let edges = prop::collection::vec((1..=n, 1..=n), 0..20);
        (Just(n), edges)
    })
}

/// Applies edges with fresh port numbers per switch.
fn apply(n: u64, edges: &[(u64, u64)]) -> SpanningTreeOrch {
    let switches: Vec<u64> = (1..=n).map(|i| i * 10).collect();
    let mut orch = orch_with(&switches);
    let mut next_port = vec![1u16; n as usize + 1];
    for (a, b) in edges {
        if a == b {
            continue;
        }
        let pa = next_port[*a as usize];
        next_port[*a as usize] += 1;
        let pb = next_port[*b as usize];
        next_port[*b as usize] += 1;
        discover(&mut orch, a * 10, pa, b * 10, pb);
    }
    orch
}

proptest! {
    #[test]
    fn prop_active_links_form_spanning_tree((n, edges) in topology_strategy()) {
        let orch = apply(n, &edges);
        let topology = orch.topology();

        prop_assert!(topology.asymmetric_links().is_empty());

        if let Some(root) = orch.root() {
            let component = reachable_switches(topology, root);
            let active = active_component(topology, root);
            prop_assert_eq!(active.len(), component.len());
            prop_assert_eq!(topology.active_edges().len(), component.len() - 1);
        } else {
            prop_assert_eq!(topology.active_links().count(), 0);
        }
    }

    #[test]
    fn prop_rebuild_is_idempotent((n, edges) in topology_strategy()) {
        let mut orch = apply(n, &edges);
        let before = orch.topology().active_edges();
        let outcome = orch.rebuild_spanning_tree(None).unwrap();
        prop_assert!(outcome.is_unchanged());
        prop_assert_eq!(orch.topology().active_edges(), before);
    }

    #[test]
    fn prop_root_is_minimum_linked_switch((n, edges) in topology_strategy()) {
        let orch = apply(n, &edges);
        let linked: Option<u64> = edges
            .iter()
            .filter(|(a, b)| a != b)
            .flat_map(|(a, b)| [*a, *b])
            .min();
        prop_assert_eq!(orch.root(), linked.map(|m| dpid(m * 10)));
    }

    #[test]
    fn prop_mac_reaches_active_component((n, edges) in topology_strategy(), origin in 1u64..9) {
        let mut orch = apply(n, &edges);
        let origin = dpid((origin.min(n)) * 10);
        let mac: MacAddress = "02:00:00:00:00:01".parse().unwrap();
        let host_port = port(1000);

        orch.on_unknown_packet_source(&UnknownPacketSourceEvent::new(origin, mac, host_port))
            .unwrap();

        let topology = orch.topology();
        let reached = active_component(topology, origin);
        let learned: HashSet<Dpid> = topology
            .switches()
            .filter(|s| s.mac_location(&mac).is_some())
            .map(|s| s.dpid())
            .collect();
        prop_assert_eq!(learned, reached.iter().copied().collect::<HashSet<_>>());

        // Every other switch points at the active link leading toward origin.
        for dpid in reached.iter().filter(|d| **d != origin) {
            let learned_port = topology.lookup_switch(*dpid).unwrap().mac_location(&mac).unwrap();
            let link = topology.link_at_port(*dpid, learned_port).unwrap();
            prop_assert!(link.is_active());
        }
    }
}
