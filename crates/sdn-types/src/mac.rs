//! MAC address type learned from packet sources.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 48-bit Ethernet MAC address.
///
/// Host locations are keyed by MAC address in every switch's MAC table.
///
/// # Examples
///
/// ```
/// use sdn_types::MacAddress;
///
/// let mac: MacAddress = "aa:bb:00:00:00:01".parse().unwrap();
/// assert_eq!(mac.to_string(), "aa:bb:00:00:00:01");
///
/// let same: MacAddress = "AA-BB-00-00-00-01".parse().unwrap();
/// assert_eq!(mac, same);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    /// Creates a new MAC address from raw bytes.
    pub const fn new(bytes: [u8; 6]) -> Self {
        MacAddress(bytes)
    }

    /// Returns the raw bytes of the MAC address.
    pub const fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }

    /// Returns true if the group bit of the first octet is set.
    ///
    /// Broadcast is a group address too. A group address never identifies
    /// a single host.
    pub const fn is_multicast(&self) -> bool {
        self.0[0] & 0x01 != 0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}

impl FromStr for MacAddress {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let separator = if s.contains(':') { ':' } else { '-' };

        let mut bytes = [0u8; 6];
        let mut count = 0;
        for part in s.split(separator) {
            if count == bytes.len() || part.is_empty() || part.len() > 2 {
                return Err(ParseError::InvalidMacAddress(s.to_string()));
            }
            bytes[count] = u8::from_str_radix(part, 16)
                .map_err(|_| ParseError::InvalidMacAddress(s.to_string()))?;
            count += 1;
        }

        if count != bytes.len() {
            return Err(ParseError::InvalidMacAddress(s.to_string()));
        }

        Ok(MacAddress(bytes))
    }
}

impl TryFrom<String> for MacAddress {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<MacAddress> for String {
    fn from(mac: MacAddress) -> String {
        mac.to_string()
    }
}

impl From<[u8; 6]> for MacAddress {
    fn from(bytes: [u8; 6]) -> Self {
        MacAddress(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_colon_and_hyphen() {
        let colon: MacAddress = "aa:bb:cc:dd:ee:ff".parse().unwrap();
        let hyphen: MacAddress = "AA-BB-CC-DD-EE-FF".parse().unwrap();
        assert_eq!(colon, hyphen);
        assert_eq!(colon.as_bytes(), &[0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]);
    }

    #[test]
    fn test_display_is_lowercase() {
        let mac = MacAddress::new([0x00, 0x1B, 0x21, 0x0A, 0x00, 0x05]);
        assert_eq!(mac.to_string(), "00:1b:21:0a:00:05");
    }

    #[test]
    fn test_rejects_short_forms() {
        assert!("AA:BB".parse::<MacAddress>().is_err());
        assert!("00:11:22:33:44".parse::<MacAddress>().is_err());
        assert!("00:11:22:33:44:55:66".parse::<MacAddress>().is_err());
        assert!("00:11::33:44:55".parse::<MacAddress>().is_err());
        assert!("001:1:22:33:44:55".parse::<MacAddress>().is_err());
        assert!("zz:11:22:33:44:55".parse::<MacAddress>().is_err());
    }

    #[test]
    fn test_group_addresses() {
        assert!(MacAddress::new([0xff; 6]).is_multicast());
        assert!("01:00:5e:00:00:01".parse::<MacAddress>().unwrap().is_multicast());

        let host: MacAddress = "00:11:22:33:44:55".parse().unwrap();
        assert!(!host.is_multicast());
        // Locally administered, still unicast.
        assert!(!"02:00:00:00:00:01".parse::<MacAddress>().unwrap().is_multicast());
    }

    #[test]
    fn test_serde_uses_string_form() {
        let mac: MacAddress = "aa:bb:00:00:00:01".parse().unwrap();
        let json = serde_json::to_string(&mac).unwrap();
        assert_eq!(json, "\"aa:bb:00:00:00:01\"");

        let back: MacAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mac);
        assert!(serde_json::from_str::<MacAddress>("\"aa:bb\"").is_err());
    }
}
