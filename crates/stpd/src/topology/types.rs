//! Switch and link types.

use sdn_types::{Dpid, MacAddress, PortNo};
use std::collections::HashMap;
use std::fmt;

/// Handle of a directed link inside a [`Topology`](super::Topology).
///
/// Handles are never reused, so a stale handle simply fails to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkId(pub(crate) u64);

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "link#{}", self.0)
    }
}

/// One direction of a switch-to-switch link:
/// `switch[port] -> neighbor[neighbor_port]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub(crate) id: LinkId,
    pub(crate) switch: Dpid,
    pub(crate) port: PortNo,
    pub(crate) neighbor: Dpid,
    pub(crate) neighbor_port: PortNo,
    pub(crate) reverse: LinkId,
    pub(crate) active: bool,
}

impl Link {
    pub fn id(&self) -> LinkId {
        self.id
    }

    /// Switch owning this direction.
    pub fn switch(&self) -> Dpid {
        self.switch
    }

    /// Local port on the owning switch.
    pub fn port(&self) -> PortNo {
        self.port
    }

    pub fn neighbor(&self) -> Dpid {
        self.neighbor
    }

    pub fn neighbor_port(&self) -> PortNo {
        self.neighbor_port
    }

    /// The link on the neighbor pointing back at this switch and port.
    pub fn reverse(&self) -> LinkId {
        self.reverse
    }

    /// True while the link is part of the spanning tree.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// True if this link goes from `switch[port]` to `neighbor[neighbor_port]`.
    pub fn connects(&self, switch: Dpid, port: PortNo, neighbor: Dpid, neighbor_port: PortNo) -> bool {
        self.switch == switch
            && self.port == port
            && self.neighbor == neighbor
            && self.neighbor_port == neighbor_port
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] -> {}[{}]",
            self.switch, self.port, self.neighbor, self.neighbor_port
        )
    }
}

/// A connected switch, its outgoing links and its MAC table.
#[derive(Debug, Clone)]
pub struct SwitchNode {
    dpid: Dpid,
    /// Outgoing links in discovery order
    pub(crate) links: Vec<LinkId>,
    mac_table: HashMap<MacAddress, PortNo>,
}

impl SwitchNode {
    pub(crate) fn new(dpid: Dpid) -> Self {
        Self {
            dpid,
            links: Vec::new(),
            mac_table: HashMap::new(),
        }
    }

    pub fn dpid(&self) -> Dpid {
        self.dpid
    }

    /// Outgoing link handles, oldest first.
    pub fn links(&self) -> &[LinkId] {
        &self.links
    }

    /// Records where `mac` can be reached, replacing any previous binding.
    ///
    /// Returns the previous port if the binding changed.
    pub fn learn_mac_location(&mut self, mac: MacAddress, port: PortNo) -> Option<PortNo> {
        self.mac_table.insert(mac, port).filter(|prev| *prev != port)
    }

    /// Port through which `mac` is reachable, if learned.
    pub fn mac_location(&self, mac: &MacAddress) -> Option<PortNo> {
        self.mac_table.get(mac).copied()
    }

    pub fn mac_table(&self) -> &HashMap<MacAddress, PortNo> {
        &self.mac_table
    }
}
