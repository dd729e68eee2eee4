//! Serializable view of the topology for dumps and debugging.

use super::graph::Topology;
use sdn_types::{Dpid, MacAddress, PortNo};
use serde::Serialize;
use std::collections::BTreeMap;

/// Point-in-time copy of the controller's view of the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopologySnapshot {
    pub root: Option<Dpid>,
    pub switches: Vec<SwitchSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwitchSnapshot {
    pub dpid: Dpid,
    pub links: Vec<LinkSnapshot>,
    pub mac_table: BTreeMap<MacAddress, PortNo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkSnapshot {
    pub port: PortNo,
    pub neighbor: Dpid,
    pub neighbor_port: PortNo,
    pub active: bool,
}

impl TopologySnapshot {
    /// Captures `topology` together with the current root.
    pub fn capture(topology: &Topology, root: Option<Dpid>) -> Self {
        let switches = topology
            .switches()
            .map(|switch| SwitchSnapshot {
                dpid: switch.dpid(),
                links: topology
                    .links_of(switch.dpid())
                    .map(|link| LinkSnapshot {
                        port: link.port(),
                        neighbor: link.neighbor(),
                        neighbor_port: link.neighbor_port(),
                        active: link.is_active(),
                    })
                    .collect(),
                mac_table: switch
                    .mac_table()
                    .iter()
                    .map(|(mac, port)| (*mac, *port))
                    .collect(),
            })
            .collect();

        Self { root, switches }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_serializes_to_json() {
        let mut topology = Topology::new();
        topology.connect_switch(Dpid::new(1));
        topology.connect_switch(Dpid::new(2));
        let pair = topology
            .add_link(Dpid::new(1), PortNo::new(1), Dpid::new(2), PortNo::new(2))
            .unwrap();
        topology.set_pair_active(pair.forward, true);
        topology
            .lookup_switch_mut(Dpid::new(2))
            .unwrap()
            .learn_mac_location("aa:bb:00:00:00:01".parse().unwrap(), PortNo::new(2));

        let snapshot = TopologySnapshot::capture(&topology, Some(Dpid::new(1)));
        let json = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(json["root"], 1);
        assert_eq!(json["switches"][0]["links"][0]["neighbor"], 2);
        assert_eq!(json["switches"][0]["links"][0]["active"], true);
        assert_eq!(json["switches"][1]["mac_table"]["aa:bb:00:00:00:01"], 2);
    }
}
