//! Inbound events delivered by discovery and switch collaborators.

use sdn_types::{Dpid, MacAddress, PortNo};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A neighbor-discovery probe sent from `local_switch[local_port]` arrived
/// at `remote_switch[remote_port]` (or vice versa).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDiscoveryEvent {
    pub local_switch: Dpid,
    pub local_port: PortNo,
    pub remote_switch: Dpid,
    pub remote_port: PortNo,
}

impl LinkDiscoveryEvent {
    pub fn new(local_switch: Dpid, local_port: PortNo, remote_switch: Dpid, remote_port: PortNo) -> Self {
        Self {
            local_switch,
            local_port,
            remote_switch,
            remote_port,
        }
    }
}

/// A switch saw a packet whose source MAC it has no table entry for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnknownPacketSourceEvent {
    pub switch: Dpid,
    pub source_mac: MacAddress,
    pub ingress_port: PortNo,
}

impl UnknownPacketSourceEvent {
    pub fn new(switch: Dpid, source_mac: MacAddress, ingress_port: PortNo) -> Self {
        Self {
            switch,
            source_mac,
            ingress_port,
        }
    }
}

/// Every event the controller reacts to.
///
/// The serialized form is one JSON object per event, tagged by `event`:
///
/// ```json
/// {"event":"switch_connected","switch":1}
/// {"event":"link_discovery","local_switch":1,"local_port":1,"remote_switch":2,"remote_port":1}
/// {"event":"unknown_packet_source","switch":2,"source_mac":"aa:bb:00:00:00:01","ingress_port":5}
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ControllerEvent {
    SwitchConnected { switch: Dpid },
    SwitchDisconnected { switch: Dpid },
    LinkDiscovery(LinkDiscoveryEvent),
    UnknownPacketSource(UnknownPacketSourceEvent),
}

impl ControllerEvent {
    /// Short name used in logs and stats.
    pub fn kind(&self) -> &'static str {
        match self {
            ControllerEvent::SwitchConnected { .. } => "switch_connected",
            ControllerEvent::SwitchDisconnected { .. } => "switch_disconnected",
            ControllerEvent::LinkDiscovery(_) => "link_discovery",
            ControllerEvent::UnknownPacketSource(_) => "unknown_packet_source",
        }
    }
}

impl fmt::Display for ControllerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerEvent::SwitchConnected { switch } => write!(f, "switch {} connected", switch),
            ControllerEvent::SwitchDisconnected { switch } => {
                write!(f, "switch {} disconnected", switch)
            }
            ControllerEvent::LinkDiscovery(e) => write!(
                f,
                "link {}[{}] -> {}[{}]",
                e.local_switch, e.local_port, e.remote_switch, e.remote_port
            ),
            ControllerEvent::UnknownPacketSource(e) => write!(
                f,
                "{} seen at switch {} port {}",
                e.source_mac, e.switch, e.ingress_port
            ),
        }
    }
}

impl From<LinkDiscoveryEvent> for ControllerEvent {
    fn from(event: LinkDiscoveryEvent) -> Self {
        ControllerEvent::LinkDiscovery(event)
    }
}

impl From<UnknownPacketSourceEvent> for ControllerEvent {
    fn from(event: UnknownPacketSourceEvent) -> Self {
        ControllerEvent::UnknownPacketSource(event)
    }
}
