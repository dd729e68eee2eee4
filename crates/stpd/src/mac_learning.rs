//! MAC-location propagation along active links.

use crate::error::{StpError, StpResult, SwitchRole};
use crate::topology::Topology;
use log::{debug, warn};
use sdn_types::{Dpid, MacAddress, PortNo};
use std::collections::HashSet;

/// Result of teaching one MAC location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeachOutcome {
    /// Every switch that learned the binding and the port it learned, in
    /// the order they were taught.
    pub taught: Vec<(Dpid, PortNo)>,
    /// Times a switch was reached twice; always zero while the active links
    /// form a tree.
    pub revisits: usize,
}

/// Teaches `switch` that `mac` is behind `port`, then teaches every switch
/// reachable over active links where to find it.
///
/// A neighbor learns the port of the reverse link, i.e. the port facing the
/// switch that taught it. The link the binding arrived on is never followed
/// back. A visited set bounds the walk even if the active links ever stop
/// forming a tree.
pub fn teach(
    topology: &mut Topology,
    switch: Dpid,
    mac: MacAddress,
    port: PortNo,
) -> StpResult<TeachOutcome> {
    if !topology.contains_switch(switch) {
        return Err(StpError::unknown_switch(SwitchRole::Reporting, switch));
    }

    let mut outcome = TeachOutcome::default();
    let mut visited: HashSet<Dpid> = HashSet::new();
    let mut pending = vec![(switch, port)];

    while let Some((dpid, in_port)) = pending.pop() {
        if !visited.insert(dpid) {
            warn!(
                "Active links revisit switch {} while teaching {}; not a tree",
                dpid, mac
            );
            outcome.revisits += 1;
            continue;
        }

        debug!("Teaching switch {} to find {} at port {}", dpid, mac, in_port);
        if let Some(node) = topology.lookup_switch_mut(dpid) {
            node.learn_mac_location(mac, in_port);
        }
        outcome.taught.push((dpid, in_port));

        let next: Vec<(Dpid, PortNo)> = topology
            .links_of(dpid)
            .filter(|link| link.is_active() && link.port() != in_port)
            .map(|link| (link.neighbor(), link.neighbor_port()))
            .collect();
        // Reversed so neighbors are visited in discovery order.
        pending.extend(next.into_iter().rev());
    }

    Ok(outcome)
}
