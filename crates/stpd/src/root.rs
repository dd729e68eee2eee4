//! Root selection policy.

use sdn_types::Dpid;

/// Tracks the spanning-tree root: the smallest [`Dpid`] seen in any
/// discovered link.
///
/// The root only ever moves to a smaller identifier. It is not reset when
/// the root switch disconnects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RootSelector {
    root: Option<Dpid>,
}

impl RootSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current root, or `None` before the first link was observed.
    pub fn root(&self) -> Option<Dpid> {
        self.root
    }

    /// Considers both endpoints of a discovered link as root candidates.
    ///
    /// Returns true if the root changed.
    pub fn observe_link(&mut self, local: Dpid, remote: Dpid) -> bool {
        let candidate = local.min(remote);
        match self.root {
            Some(current) if current <= candidate => false,
            _ => {
                self.root = Some(candidate);
                true
            }
        }
    }
}
