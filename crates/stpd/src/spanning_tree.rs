//! Spanning-tree construction.
//!
//! A rebuild always recomputes the whole tree of the root's connected
//! component:
//!
//! 1. Sweep every link (active or not) breadth-first from the start switch
//!    to find the switches in scope.
//! 2. Mirror that subgraph into [`DijkstraNode`]s.
//! 3. Compute best predecessors toward the start switch.
//! 4. For every switch with a predecessor, the first link facing it (and its
//!    reverse) is a tree link.
//! 5. Every other link in scope is deactivated.
//!
//! Switches outside the component are not touched.

use crate::dijkstra::{find_shortest_paths, DijkstraNode};
use crate::topology::{LinkId, Topology};
use log::debug;
use sdn_types::Dpid;
use std::collections::{BTreeSet, HashSet, VecDeque};

/// Summary of one rebuild.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RebuildOutcome {
    /// Switch the tree was computed from, if the rebuild ran.
    pub start: Option<Dpid>,
    /// Switches in the start switch's component.
    pub switches: usize,
    /// Cables in the resulting tree.
    pub tree_links: usize,
    /// Link pairs switched on by this rebuild (one handle per pair).
    pub activated: Vec<LinkId>,
    /// Link pairs switched off by this rebuild (one handle per pair).
    pub deactivated: Vec<LinkId>,
}

impl RebuildOutcome {
    /// True if no link changed state.
    pub fn is_unchanged(&self) -> bool {
        self.activated.is_empty() && self.deactivated.is_empty()
    }
}

/// Switches transitively linked to `start`, in breadth-first discovery order.
///
/// Link state is ignored; inactive links count as connections.
pub fn reachable_switches(topology: &Topology, start: Dpid) -> Vec<Dpid> {
    if !topology.contains_switch(start) {
        return Vec::new();
    }

    let mut order = Vec::new();
    let mut seen = BTreeSet::from([start]);
    let mut queue = VecDeque::from([start]);

    while let Some(dpid) = queue.pop_front() {
        order.push(dpid);
        for link in topology.links_of(dpid) {
            if seen.insert(link.neighbor()) {
                queue.push_back(link.neighbor());
            }
        }
    }

    order
}

/// Recomputes the spanning tree from `start` and applies it to the links.
///
/// With no start switch, or one that is no longer registered, nothing
/// happens.
pub fn rebuild(topology: &mut Topology, start: Option<Dpid>) -> RebuildOutcome {
    let Some(start) = start.filter(|s| topology.contains_switch(*s)) else {
        return RebuildOutcome::default();
    };

    let scope = reachable_switches(topology, start);
    let nodes: Vec<DijkstraNode<Dpid>> = scope
        .iter()
        .map(|dpid| {
            let neighbors = topology.links_of(*dpid).map(|l| l.neighbor()).collect();
            DijkstraNode::new(*dpid, neighbors)
        })
        .collect();
    let paths = find_shortest_paths(start, &nodes);

    let mut best: HashSet<LinkId> = HashSet::new();
    for dpid in &scope {
        let Some(Some(predecessor)) = paths.get(dpid) else {
            continue;
        };
        // Parallel cables to the predecessor: only the oldest joins the tree.
        if let Some(link) = topology
            .links_of(*dpid)
            .find(|l| l.neighbor() == *predecessor)
        {
            best.insert(link.id());
            best.insert(link.reverse());
        }
    }

    let in_scope: Vec<(LinkId, bool)> = scope
        .iter()
        .flat_map(|dpid| topology.links_of(*dpid))
        .map(|l| (l.id(), l.is_active()))
        .collect();

    let mut outcome = RebuildOutcome {
        start: Some(start),
        switches: scope.len(),
        tree_links: best.len() / 2,
        ..Default::default()
    };

    for (id, was_active) in in_scope {
        let wanted = best.contains(&id);
        if was_active == wanted {
            continue;
        }
        // The reverse shares the flag, so each pair is changed (and
        // recorded) once.
        if topology.set_pair_active(id, wanted) {
            if wanted {
                outcome.activated.push(id);
            } else {
                outcome.deactivated.push(id);
            }
        }
    }

    debug!(
        "Spanning tree from {}: {} switches, {} tree links, {} activated, {} deactivated",
        start,
        outcome.switches,
        outcome.tree_links,
        outcome.activated.len(),
        outcome.deactivated.len()
    );

    outcome
}
