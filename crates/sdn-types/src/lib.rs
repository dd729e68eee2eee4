//! Common types for the spanning-tree SDN controller.
//!
//! This crate provides type-safe representations of the identifiers that
//! flow between the controller and its switches:
//!
//! - [`Dpid`]: 64-bit OpenFlow datapath identifiers
//! - [`PortNo`]: switch port numbers
//! - [`MacAddress`]: 48-bit Ethernet MAC addresses

mod dpid;
mod mac;
mod port;

pub use dpid::Dpid;
pub use mac::MacAddress;
pub use port::PortNo;

/// Common error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid MAC address format: {0}")]
    InvalidMacAddress(String),

    #[error("invalid datapath ID: {0}")]
    InvalidDpid(String),

    #[error("invalid port number: {0}")]
    InvalidPortNo(String),
}
