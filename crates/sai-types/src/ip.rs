//! IP prefixes with a canonical text form.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

/// An IP prefix: address plus mask length, with host bits cleared.
///
/// Clearing the host bits at construction makes the `addr/len` text form
/// canonical, so two spellings of the same route always produce the same
/// entry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IpPrefix {
    addr: IpAddr,
    mask_len: u8,
}

impl IpPrefix {
    /// Builds a prefix, truncating the address to the mask length.
    ///
    /// Returns `None` if the mask length exceeds the address width.
    pub fn new(addr: IpAddr, mask_len: u8) -> Option<IpPrefix> {
        let max = match addr {
            IpAddr::V4(_) => 32,
            IpAddr::V6(_) => 128,
        };
        if mask_len > max {
            return None;
        }
        let addr = match addr {
            IpAddr::V4(v4) => {
                let raw = u32::from(v4);
                let masked = if mask_len == 0 {
                    0
                } else {
                    raw & (u32::MAX << (32 - u32::from(mask_len)))
                };
                IpAddr::V4(masked.into())
            }
            IpAddr::V6(v6) => {
                let raw = u128::from(v6);
                let masked = if mask_len == 0 {
                    0
                } else {
                    raw & (u128::MAX << (128 - u32::from(mask_len)))
                };
                IpAddr::V6(masked.into())
            }
        };
        Some(IpPrefix { addr, mask_len })
    }

    pub fn addr(&self) -> IpAddr {
        self.addr
    }

    pub fn mask_len(&self) -> u8 {
        self.mask_len
    }

    pub fn is_ipv4(&self) -> bool {
        self.addr.is_ipv4()
    }
}

impl fmt::Display for IpPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.mask_len)
    }
}

impl FromStr for IpPrefix {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr, len) = s
            .split_once('/')
            .ok_or_else(|| ParseError::InvalidIpPrefix(s.to_string()))?;
        let addr: IpAddr = addr
            .parse()
            .map_err(|_| ParseError::InvalidIpPrefix(s.to_string()))?;
        let mask_len: u8 = len
            .parse()
            .map_err(|_| ParseError::InvalidIpPrefix(s.to_string()))?;
        IpPrefix::new(addr, mask_len).ok_or_else(|| ParseError::InvalidIpPrefix(s.to_string()))
    }
}

impl TryFrom<String> for IpPrefix {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<IpPrefix> for String {
    fn from(prefix: IpPrefix) -> String {
        prefix.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_bits_cleared() {
        let prefix: IpPrefix = "10.1.2.3/24".parse().unwrap();
        assert_eq!(prefix.to_string(), "10.1.2.0/24");

        let prefix: IpPrefix = "2001:db8::1/64".parse().unwrap();
        assert_eq!(prefix.to_string(), "2001:db8::/64");
    }

    #[test]
    fn test_round_trip() {
        for text in ["0.0.0.0/0", "192.168.0.0/16", "2001:db8::/32", "10.0.0.1/32"] {
            let prefix: IpPrefix = text.parse().unwrap();
            assert_eq!(prefix.to_string().parse::<IpPrefix>().unwrap(), prefix);
        }
    }

    #[test]
    fn test_rejects_bad_forms() {
        assert!("10.0.0.0".parse::<IpPrefix>().is_err());
        assert!("10.0.0.0/33".parse::<IpPrefix>().is_err());
        assert!("2001:db8::/129".parse::<IpPrefix>().is_err());
        assert!("banana/8".parse::<IpPrefix>().is_err());
    }
}
