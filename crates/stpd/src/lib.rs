//! # stpd - Spanning-tree SDN controller
//!
//! Keeps a set of interconnected switches loop-free by maintaining a
//! spanning tree over the discovered physical topology, and propagates
//! learned host locations (MAC-to-port bindings) only along the links that
//! are part of that tree.
//!
//! ## Responsibilities
//! - Topology maintenance from link-discovery notifications
//! - Full spanning-tree recomputation rooted at the lowest datapath ID
//! - Link activation/deactivation derived from the computed tree
//! - MAC-location propagation along active links
//!
//! ## Event flow
//!
//! ```text
//! LinkDiscovery ──► Topology::add_link ──► RootSelector ──► spanning_tree::rebuild
//! UnknownPacketSource ──► mac_learning::teach (active links only)
//! ```
//!
//! Events are processed one at a time by [`StpDaemon`], which owns the
//! [`SpanningTreeOrch`] exclusively.

pub mod config;
pub mod daemon;
pub mod dijkstra;
pub mod error;
pub mod events;
pub mod mac_learning;
pub mod orch;
pub mod root;
pub mod spanning_tree;
pub mod topology;

pub use config::{ConfigError, LinkPortLearning, StpConfig};
pub use daemon::{EventSender, StpDaemon};
pub use error::{StpError, StpResult, SwitchRole};
pub use events::{ControllerEvent, LinkDiscoveryEvent, UnknownPacketSourceEvent};
pub use orch::{SpanningTreeOrch, StpOrchStats, SwitchCallbacks, SwitchEventHandler};
pub use root::RootSelector;
pub use spanning_tree::RebuildOutcome;
pub use topology::{Link, LinkChange, LinkId, SwitchNode, Topology, TopologySnapshot};
