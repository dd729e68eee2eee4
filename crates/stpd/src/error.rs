//! Error types for the spanning-tree controller.

use sdn_types::{Dpid, PortNo};
use std::fmt;
use thiserror::Error;

/// Result type alias for controller operations.
pub type StpResult<T> = Result<T, StpError>;

/// Which side of an event named a switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchRole {
    /// The switch that reported a discovered link.
    Local,
    /// The far end of a discovered link.
    Remote,
    /// The switch that reported a packet or lifecycle event.
    Reporting,
}

impl fmt::Display for SwitchRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwitchRole::Local => write!(f, "local"),
            SwitchRole::Remote => write!(f, "remote"),
            SwitchRole::Reporting => write!(f, "reporting"),
        }
    }
}

/// Errors raised while handling controller events.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StpError {
    /// An event named a switch that is not registered.
    #[error("Received event for unknown {role} switch: {dpid}")]
    UnknownSwitch {
        /// Which endpoint of the event was unknown.
        role: SwitchRole,
        /// The identifier that failed to resolve.
        dpid: Dpid,
    },

    /// A discovered link cannot be represented (e.g. a port linked to itself).
    #[error("Invalid link {switch}[{port}]: {reason}")]
    InvalidLink {
        /// Switch reporting the link.
        switch: Dpid,
        /// Port on that switch.
        port: PortNo,
        /// Why the link was rejected.
        reason: String,
    },

    /// Internal state broke one of the topology invariants.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

impl StpError {
    /// Creates an unknown switch error.
    pub fn unknown_switch(role: SwitchRole, dpid: Dpid) -> Self {
        Self::UnknownSwitch { role, dpid }
    }

    /// Returns true if the error is a reference to an unregistered switch.
    pub fn is_unknown_switch(&self) -> bool {
        matches!(self, StpError::UnknownSwitch { .. })
    }
}
