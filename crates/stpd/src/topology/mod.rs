//! Topology graph: switches, directed links and their reverse pairing.
//!
//! Every physical cable is stored as two [`Link`]s, one per direction, that
//! name each other through [`Link::reverse`]. Both halves always carry the
//! same active flag; [`Topology::set_pair_active`] is the only way to change
//! it.

mod graph;
mod snapshot;
mod types;

pub use graph::{AddLinkResult, LinkChange, Topology};
pub use snapshot::{LinkSnapshot, SwitchSnapshot, TopologySnapshot};
pub use types::{Link, LinkId, SwitchNode};
