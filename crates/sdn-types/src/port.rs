//! Switch port numbers.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A port number local to one switch.
///
/// Port numbers are only meaningful together with the [`Dpid`](crate::Dpid)
/// of the switch they belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortNo(u16);

impl PortNo {
    /// Creates a port number.
    pub const fn new(port: u16) -> Self {
        PortNo(port)
    }

    /// Returns the numeric value.
    pub const fn as_u16(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for PortNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PortNo {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u16>()
            .map(PortNo)
            .map_err(|_| ParseError::InvalidPortNo(s.to_string()))
    }
}

impl From<u16> for PortNo {
    fn from(port: u16) -> Self {
        PortNo(port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("5".parse::<PortNo>().unwrap(), PortNo::new(5));
        assert_eq!(" 48 ".parse::<PortNo>().unwrap().as_u16(), 48);
        assert!("65536".parse::<PortNo>().is_err());
        assert!("eth0".parse::<PortNo>().is_err());
    }

    #[test]
    fn test_serde_is_plain_number() {
        assert_eq!(serde_json::to_string(&PortNo::new(7)).unwrap(), "7");
        let port: PortNo = serde_json::from_str("7").unwrap();
        assert_eq!(port, PortNo::new(7));
    }
}
