//! OpenFlow datapath identifier.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 64-bit datapath identifier naming one switch.
///
/// Ordering is numeric; the switch with the smallest `Dpid` becomes the
/// spanning-tree root.
///
/// # Examples
///
/// ```
/// use sdn_types::Dpid;
///
/// let a: Dpid = "7".parse().unwrap();
/// let b: Dpid = "0x7".parse().unwrap();
/// let c: Dpid = "00:00:00:00:00:00:00:07".parse().unwrap();
/// assert_eq!(a, b);
/// assert_eq!(b, c);
/// assert!(Dpid::new(1) < a);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "DpidRepr", into = "u64")]
pub struct Dpid(u64);

impl Dpid {
    /// Creates a datapath identifier from its numeric value.
    pub const fn new(value: u64) -> Self {
        Dpid(value)
    }

    /// Returns the numeric value.
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Dpid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Dpid {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidDpid(s.to_string());
        let trimmed = s.trim();

        if trimmed.contains(':') {
            let parts: Vec<&str> = trimmed.split(':').collect();
            if parts.len() != 8 {
                return Err(invalid());
            }
            let mut value = 0u64;
            for part in parts {
                if part.is_empty() || part.len() > 2 {
                    return Err(invalid());
                }
                let byte = u8::from_str_radix(part, 16).map_err(|_| invalid())?;
                value = (value << 8) | u64::from(byte);
            }
            return Ok(Dpid(value));
        }

        let value = match trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            Some(hex) => u64::from_str_radix(hex, 16),
            None => trimmed.parse::<u64>(),
        };
        value.map(Dpid).map_err(|_| invalid())
    }
}

impl From<u64> for Dpid {
    fn from(value: u64) -> Self {
        Dpid(value)
    }
}

impl From<Dpid> for u64 {
    fn from(dpid: Dpid) -> u64 {
        dpid.0
    }
}

/// Accepts either a JSON number or any of the string forms.
#[derive(Deserialize)]
#[serde(untagged)]
enum DpidRepr {
    Number(u64),
    Text(String),
}

impl TryFrom<DpidRepr> for Dpid {
    type Error = ParseError;

    fn try_from(repr: DpidRepr) -> Result<Self, Self::Error> {
        match repr {
            DpidRepr::Number(value) => Ok(Dpid(value)),
            DpidRepr::Text(text) => text.parse(),
        }
    }
}
