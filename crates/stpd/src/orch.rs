//! SpanningTreeOrch - event handling for the spanning-tree controller.
//!
//! The orch owns the topology and the root selector; it is the only path
//! through which either is mutated. Events arrive either directly through
//! the [`SwitchEventHandler`] methods or queued via [`SpanningTreeOrch::enqueue`]
//! and drained by [`Orch::do_task`].

use crate::config::{LinkPortLearning, StpConfig};
use crate::error::{StpError, StpResult, SwitchRole};
use crate::events::{ControllerEvent, LinkDiscoveryEvent, UnknownPacketSourceEvent};
use crate::mac_learning::{self, TeachOutcome};
use crate::root::RootSelector;
use crate::spanning_tree::{self, RebuildOutcome};
use crate::topology::{LinkChange, LinkId, Topology, TopologySnapshot};
use async_trait::async_trait;
use log::{debug, error, info, warn};
use sdn_orch_common::{Consumer, ConsumerConfig, Orch, TaskError, TaskResult, TaskStatus};
use sdn_types::{Dpid, MacAddress, PortNo};
use std::sync::Arc;

/// Typed entry points for switch events, one method per event kind.
///
/// A switch representation is bound to its handler when it connects; the
/// handler then receives that switch's discovery and packet-source events.
pub trait SwitchEventHandler {
    /// Builds and registers the representation of a newly connected switch.
    fn on_switch_connected(&mut self, switch: Dpid) -> StpResult<()>;

    /// Drops a switch and every link touching it.
    fn on_switch_disconnected(&mut self, switch: Dpid) -> StpResult<()>;

    /// Records a discovered link and recomputes the spanning tree.
    fn on_link_discovery(&mut self, event: &LinkDiscoveryEvent) -> StpResult<()>;

    /// Learns where a packet source lives and propagates it along the tree.
    fn on_unknown_packet_source(&mut self, event: &UnknownPacketSourceEvent) -> StpResult<()>;
}

/// Outbound notifications for the switch abstraction (flow programming).
pub trait SwitchCallbacks: Send + Sync {
    /// A port facing another switch joined (`active`) or left the tree.
    fn on_link_state_changed(&self, switch: Dpid, port: PortNo, active: bool);

    /// A switch learned that `mac` is reachable through `port`.
    fn on_mac_learned(&self, switch: Dpid, mac: MacAddress, port: PortNo);
}

/// Spanning-tree orchestrator statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StpOrchStats {
    pub switches_connected: u64,
    pub switches_disconnected: u64,
    pub links_discovered: u64,
    pub links_replaced: u64,
    pub rebuilds: u64,
    pub links_activated: u64,
    pub links_deactivated: u64,
    pub macs_taught: u64,
    /// Sources ignored by the link-port policy or because they are group
    /// addresses.
    pub packet_sources_suppressed: u64,
    pub events_rejected: u64,
    /// Non-empty `do_task()` passes.
    pub event_batches: u64,
}

/// Spanning-tree orchestrator.
pub struct SpanningTreeOrch {
    config: StpConfig,
    stats: StpOrchStats,
    callbacks: Option<Arc<dyn SwitchCallbacks>>,
    topology: Topology,
    root: RootSelector,
    events: Consumer<ControllerEvent>,
}

impl SpanningTreeOrch {
    /// Creates a new orchestrator with an empty topology.
    pub fn new(config: StpConfig) -> Self {
        let events = Consumer::new(
            ConsumerConfig::new("CONTROLLER_EVENTS").with_batch_size(config.batch_size),
        );
        Self {
            config,
            stats: StpOrchStats::default(),
            callbacks: None,
            topology: Topology::new(),
            root: RootSelector::new(),
            events,
        }
    }

    /// Sets callbacks.
    pub fn set_callbacks(&mut self, callbacks: Arc<dyn SwitchCallbacks>) {
        self.callbacks = Some(callbacks);
    }

    pub fn config(&self) -> &StpConfig {
        &self.config
    }

    /// Gets statistics.
    pub fn stats(&self) -> &StpOrchStats {
        &self.stats
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Current spanning-tree root.
    pub fn root(&self) -> Option<Dpid> {
        self.root.root()
    }

    /// Captures the current topology, link states and MAC tables.
    pub fn snapshot(&self) -> TopologySnapshot {
        TopologySnapshot::capture(&self.topology, self.root.root())
    }

    /// Queues an event for the next `do_task()`.
    pub fn enqueue(&mut self, event: ControllerEvent) {
        self.events.push(event);
    }

    /// Dispatches one event to its typed handler.
    pub fn handle_event(&mut self, event: &ControllerEvent) -> StpResult<()> {
        match event {
            ControllerEvent::SwitchConnected { switch } => self.on_switch_connected(*switch),
            ControllerEvent::SwitchDisconnected { switch } => self.on_switch_disconnected(*switch),
            ControllerEvent::LinkDiscovery(e) => self.on_link_discovery(e),
            ControllerEvent::UnknownPacketSource(e) => self.on_unknown_packet_source(e),
        }
    }

    /// Recomputes the spanning tree from `start`, or from the root when
    /// `start` is `None`.
    ///
    /// Fails with [`StpError::InvariantViolation`] if any link's active flag
    /// disagrees with its reverse's once the rebuild is done.
    pub fn rebuild_spanning_tree(&mut self, start: Option<Dpid>) -> StpResult<RebuildOutcome> {
        let start = start.or(self.root.root());
        if let Some(s) = start {
            if !self.topology.contains_switch(s) {
                warn!("Spanning tree start switch {} is not connected; skipping rebuild", s);
            }
        }

        let outcome = spanning_tree::rebuild(&mut self.topology, start);
        if outcome.start.is_some() {
            self.stats.rebuilds += 1;
            self.stats.links_activated += outcome.activated.len() as u64;
            self.stats.links_deactivated += outcome.deactivated.len() as u64;
            self.notify_link_changes(&outcome.activated, true);
            self.notify_link_changes(&outcome.deactivated, false);
        }

        let asymmetric = self.topology.asymmetric_links();
        if let Some(first) = asymmetric.first().and_then(|id| self.topology.link(*id)) {
            return Err(StpError::InvariantViolation(format!(
                "{} link(s) disagree with their reverse after rebuild, first {}",
                asymmetric.len(),
                first
            )));
        }
        Ok(outcome)
    }

    /// Teaches `switch` where `mac` is and propagates it along active links.
    ///
    /// The walk always completes; a switch reached twice means the active
    /// links contain a cycle and is reported as [`StpError::InvariantViolation`].
    pub fn teach_mac_location(
        &mut self,
        switch: Dpid,
        mac: MacAddress,
        port: PortNo,
    ) -> StpResult<TeachOutcome> {
        let outcome = mac_learning::teach(&mut self.topology, switch, mac, port)?;
        self.stats.macs_taught += outcome.taught.len() as u64;
        if let Some(callbacks) = &self.callbacks {
            for (dpid, learned_port) in &outcome.taught {
                callbacks.on_mac_learned(*dpid, mac, *learned_port);
            }
        }
        if outcome.revisits > 0 {
            return Err(StpError::InvariantViolation(format!(
                "teaching {} from switch {} revisited {} switch(es); active links are not a tree",
                mac, switch, outcome.revisits
            )));
        }
        Ok(outcome)
    }

    fn notify_link_changes(&self, pairs: &[LinkId], active: bool) {
        for id in pairs {
            let Some(link) = self.topology.link(*id) else {
                continue;
            };
            info!(
                "{} link {}",
                if active { "Activated" } else { "Deactivated" },
                link
            );
            if let Some(callbacks) = &self.callbacks {
                callbacks.on_link_state_changed(link.switch(), link.port(), active);
                callbacks.on_link_state_changed(link.neighbor(), link.neighbor_port(), active);
            }
        }
    }

    /// Runs one event and maps the result onto a task status.
    fn process_event(&mut self, event: ControllerEvent) -> TaskResult<()> {
        self.handle_event(&event).map_err(|e| match e {
            StpError::UnknownSwitch { .. } | StpError::InvalidLink { .. } => {
                TaskError::invalid_entry(e.to_string())
            }
            StpError::InvariantViolation(_) => TaskError::internal(e.to_string()),
        })
    }
}

impl SwitchEventHandler for SpanningTreeOrch {
    fn on_switch_connected(&mut self, switch: Dpid) -> StpResult<()> {
        if self.topology.connect_switch(switch) {
            info!("Switch {} connected", switch);
            self.stats.switches_connected += 1;
        } else {
            debug!("Switch {} already connected", switch);
        }
        Ok(())
    }

    fn on_switch_disconnected(&mut self, switch: Dpid) -> StpResult<()> {
        let removed = self
            .topology
            .disconnect_switch(switch)
            .ok_or(StpError::unknown_switch(SwitchRole::Reporting, switch))?;
        info!(
            "Switch {} disconnected ({} links removed)",
            switch,
            removed.links().len()
        );
        self.stats.switches_disconnected += 1;

        if self.config.rebuild_on_disconnect {
            self.rebuild_spanning_tree(None)?;
        }
        Ok(())
    }

    fn on_link_discovery(&mut self, event: &LinkDiscoveryEvent) -> StpResult<()> {
        let result = self.topology.add_link(
            event.local_switch,
            event.local_port,
            event.remote_switch,
            event.remote_port,
        )?;

        debug!(
            "Discovered link from {}[{}] to {}[{}] ({:?})",
            event.local_switch, event.local_port, event.remote_switch, event.remote_port, result.change
        );
        match result.change {
            LinkChange::Created => self.stats.links_discovered += 1,
            LinkChange::Replaced => {
                self.stats.links_discovered += 1;
                self.stats.links_replaced += 1;
            }
            LinkChange::Unchanged => {}
        }

        if self.root.observe_link(event.local_switch, event.remote_switch) {
            if let Some(root) = self.root.root() {
                info!("Spanning tree root is now switch {}", root);
            }
        }

        debug!("Topology changed; calculating full spanning tree");
        self.rebuild_spanning_tree(None)?;
        Ok(())
    }

    fn on_unknown_packet_source(&mut self, event: &UnknownPacketSourceEvent) -> StpResult<()> {
        if !self.topology.contains_switch(event.switch) {
            return Err(StpError::unknown_switch(SwitchRole::Reporting, event.switch));
        }

        if event.source_mac.is_multicast() {
            debug!(
                "Ignoring group source {} on switch {} port {}",
                event.source_mac, event.switch, event.ingress_port
            );
            self.stats.packet_sources_suppressed += 1;
            return Ok(());
        }

        if self.config.link_port_learning == LinkPortLearning::Suppress
            && self.topology.is_link_port(event.switch, event.ingress_port)
        {
            debug!(
                "Ignoring {} on switch {} link port {}",
                event.source_mac, event.switch, event.ingress_port
            );
            self.stats.packet_sources_suppressed += 1;
            return Ok(());
        }

        info!(
            "Learned that {} can be found at switch {} port {}",
            event.source_mac, event.switch, event.ingress_port
        );
        self.teach_mac_location(event.switch, event.source_mac, event.ingress_port)?;
        Ok(())
    }
}

#[async_trait]
impl Orch for SpanningTreeOrch {
    fn name(&self) -> &str {
        "SpanningTreeOrch"
    }

    async fn do_task(&mut self) {
        let batch = self.events.pop_batch();
        if batch.is_empty() {
            return;
        }
        self.stats.event_batches += 1;

        for event in batch {
            let kind = event.kind();
            let description = event.to_string();
            let status = match self.process_event(event) {
                Ok(()) => TaskStatus::Success,
                Err(e) => {
                    error!("Failed to handle {} ({}): {}", kind, description, e);
                    e.to_status()
                }
            };
            if status.is_failure() {
                self.stats.events_rejected += 1;
            }
        }
    }

    fn has_pending_tasks(&self) -> bool {
        self.events.has_pending()
    }

    fn dump_pending_tasks(&self) -> Vec<String> {
        self.events.dump()
    }
}
