//! Topology graph storage and mutation.

use super::types::{Link, LinkId, SwitchNode};
use crate::error::{StpError, StpResult, SwitchRole};
use log::debug;
use sdn_types::{Dpid, PortNo};
use std::collections::{BTreeMap, HashMap};

/// What `add_link` did with a discovered edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkChange {
    /// A new link pair was created.
    Created,
    /// The same edge was already known; nothing changed.
    Unchanged,
    /// One or both ports were bound to a different far end; the stale pairs
    /// were removed and a new pair created.
    Replaced,
}

/// Handles of both directions of a link plus what happened to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddLinkResult {
    /// `local[local_port] -> remote[remote_port]`
    pub forward: LinkId,
    /// `remote[remote_port] -> local[local_port]`
    pub reverse: LinkId,
    pub change: LinkChange,
}

/// All known switches and links.
///
/// Switches are kept ordered by [`Dpid`]; each switch keeps its outgoing
/// links in discovery order. Links are stored once, keyed by [`LinkId`], so
/// resolving a reverse link is a single map lookup.
#[derive(Debug, Default)]
pub struct Topology {
    switches: BTreeMap<Dpid, SwitchNode>,
    links: HashMap<LinkId, Link>,
    next_link_id: u64,
}

impl Topology {
    /// Creates an empty topology.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a newly connected switch.
    ///
    /// Returns false if the switch was already registered.
    pub fn connect_switch(&mut self, dpid: Dpid) -> bool {
        if self.switches.contains_key(&dpid) {
            return false;
        }
        self.switches.insert(dpid, SwitchNode::new(dpid));
        true
    }

    /// Removes a switch together with every link touching it.
    pub fn disconnect_switch(&mut self, dpid: Dpid) -> Option<SwitchNode> {
        let link_ids = self.switches.get(&dpid)?.links.clone();
        for id in link_ids {
            self.remove_pair(id);
        }
        self.switches.remove(&dpid)
    }

    pub fn lookup_switch(&self, dpid: Dpid) -> Option<&SwitchNode> {
        self.switches.get(&dpid)
    }

    pub(crate) fn lookup_switch_mut(&mut self, dpid: Dpid) -> Option<&mut SwitchNode> {
        self.switches.get_mut(&dpid)
    }

    pub fn contains_switch(&self, dpid: Dpid) -> bool {
        self.switches.contains_key(&dpid)
    }

    /// Registered switch identifiers in ascending order.
    pub fn switch_ids(&self) -> impl Iterator<Item = Dpid> + '_ {
        self.switches.keys().copied()
    }

    pub fn switches(&self) -> impl Iterator<Item = &SwitchNode> {
        self.switches.values()
    }

    pub fn switch_count(&self) -> usize {
        self.switches.len()
    }

    /// Number of directed links (twice the number of cables).
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn link(&self, id: LinkId) -> Option<&Link> {
        self.links.get(&id)
    }

    /// One direction only; lets tests break the paired-state invariant.
    #[cfg(test)]
    pub(crate) fn link_mut(&mut self, id: LinkId) -> Option<&mut Link> {
        self.links.get_mut(&id)
    }

    /// Resolves the reverse direction of `id`.
    pub fn reverse_of(&self, id: LinkId) -> Option<&Link> {
        self.links.get(&id).and_then(|link| self.links.get(&link.reverse))
    }

    /// Outgoing links of a switch in discovery order.
    pub fn links_of(&self, dpid: Dpid) -> impl Iterator<Item = &Link> + '_ {
        self.switches
            .get(&dpid)
            .into_iter()
            .flat_map(|switch| switch.links.iter())
            .filter_map(|id| self.links.get(id))
    }

    /// All directed links, ordered by switch then discovery order.
    pub fn links(&self) -> impl Iterator<Item = &Link> + '_ {
        self.switches.keys().flat_map(|dpid| self.links_of(*dpid))
    }

    /// Directed links currently in the spanning tree.
    pub fn active_links(&self) -> impl Iterator<Item = &Link> + '_ {
        self.links().filter(|link| link.active)
    }

    /// Active cables as `(low switch, port, high switch, port)` tuples.
    ///
    /// Each cable appears once, with the smaller endpoint first.
    pub fn active_edges(&self) -> Vec<(Dpid, PortNo, Dpid, PortNo)> {
        let mut edges: Vec<_> = self
            .active_links()
            .filter(|l| (l.switch, l.port) < (l.neighbor, l.neighbor_port))
            .map(|l| (l.switch, l.port, l.neighbor, l.neighbor_port))
            .collect();
        edges.sort();
        edges
    }

    /// Link leaving `dpid` through `port`, if any.
    pub fn link_at_port(&self, dpid: Dpid, port: PortNo) -> Option<&Link> {
        self.links_of(dpid).find(|link| link.port == port)
    }

    /// True if `port` on `dpid` faces another switch.
    pub fn is_link_port(&self, dpid: Dpid, port: PortNo) -> bool {
        self.link_at_port(dpid, port).is_some()
    }

    /// Records a discovered link in both directions.
    ///
    /// Fails without touching the graph if either switch is unknown.
    /// Rediscovering a known edge, from either end, is a no-op. If one of
    /// the two ports was previously linked somewhere else, that stale pair
    /// is replaced.
    pub fn add_link(
        &mut self,
        local: Dpid,
        local_port: PortNo,
        remote: Dpid,
        remote_port: PortNo,
    ) -> StpResult<AddLinkResult> {
        if !self.switches.contains_key(&local) {
            return Err(StpError::unknown_switch(SwitchRole::Local, local));
        }
        if !self.switches.contains_key(&remote) {
            return Err(StpError::unknown_switch(SwitchRole::Remote, remote));
        }
        if local == remote && local_port == remote_port {
            return Err(StpError::InvalidLink {
                switch: local,
                port: local_port,
                reason: "port linked to itself".to_string(),
            });
        }

        if let Some(existing) = self.link_at_port(local, local_port) {
            if existing.connects(local, local_port, remote, remote_port) {
                return Ok(AddLinkResult {
                    forward: existing.id,
                    reverse: existing.reverse,
                    change: LinkChange::Unchanged,
                });
            }
        }

        let stale: Vec<LinkId> = [
            self.link_at_port(local, local_port).map(|l| l.id),
            self.link_at_port(remote, remote_port).map(|l| l.id),
        ]
        .into_iter()
        .flatten()
        .collect();
        let change = if stale.is_empty() {
            LinkChange::Created
        } else {
            LinkChange::Replaced
        };
        for id in stale {
            if let Some(link) = self.remove_pair(id) {
                debug!("Replacing stale link {}", link);
            }
        }

        let forward = self.allocate_link_id();
        let reverse = self.allocate_link_id();
        self.insert_link(Link {
            id: forward,
            switch: local,
            port: local_port,
            neighbor: remote,
            neighbor_port: remote_port,
            reverse,
            active: false,
        });
        self.insert_link(Link {
            id: reverse,
            switch: remote,
            port: remote_port,
            neighbor: local,
            neighbor_port: local_port,
            reverse: forward,
            active: false,
        });

        Ok(AddLinkResult {
            forward,
            reverse,
            change,
        })
    }

    /// Sets the active flag on a link and its reverse together.
    ///
    /// Returns true if the flag changed.
    pub fn set_pair_active(&mut self, id: LinkId, active: bool) -> bool {
        let Some(reverse) = self.links.get(&id).map(|l| l.reverse) else {
            return false;
        };
        let mut changed = false;
        for link_id in [id, reverse] {
            if let Some(link) = self.links.get_mut(&link_id) {
                changed |= link.active != active;
                link.active = active;
            }
        }
        changed
    }

    /// Returns every link whose active flag differs from its reverse's.
    pub fn asymmetric_links(&self) -> Vec<LinkId> {
        self.links
            .values()
            .filter(|link| {
                self.links
                    .get(&link.reverse)
                    .map_or(true, |rev| rev.active != link.active || rev.reverse != link.id)
            })
            .map(|link| link.id)
            .collect()
    }

    fn allocate_link_id(&mut self) -> LinkId {
        let id = LinkId(self.next_link_id);
        self.next_link_id += 1;
        id
    }

    fn insert_link(&mut self, link: Link) {
        if let Some(switch) = self.switches.get_mut(&link.switch) {
            switch.links.push(link.id);
        }
        self.links.insert(link.id, link);
    }

    /// Removes a link and its reverse. Returns the removed link.
    fn remove_pair(&mut self, id: LinkId) -> Option<Link> {
        let link = self.links.remove(&id)?;
        let reverse = self.links.remove(&link.reverse);
        for removed in std::iter::once(&link).chain(reverse.as_ref()) {
            if let Some(switch) = self.switches.get_mut(&removed.switch) {
                switch.links.retain(|l| *l != removed.id);
            }
        }
        Some(link)
    }
}
