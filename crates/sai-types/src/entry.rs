//! Structural keys for entry-keyed objects.
//!
//! Routes, neighbors, and FDB entries are addressed by these keys rather
//! than by object ids. The `Display` form of each key is the canonical
//! serialization used both on the bus and in the library's local indices.

use crate::{IpPrefix, MacAddress, ObjectId, ParseError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

/// Key of a unicast route: owning virtual router plus destination prefix.
///
/// Canonical form: `<vr-id>:<addr>/<len>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteEntry {
    pub vr_id: ObjectId,
    pub destination: IpPrefix,
}

impl RouteEntry {
    pub fn new(vr_id: ObjectId, destination: IpPrefix) -> Self {
        RouteEntry { vr_id, destination }
    }
}

impl fmt::Display for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.vr_id, self.destination)
    }
}

impl FromStr for RouteEntry {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (vr, rest) = s
            .split_once(':')
            .ok_or_else(|| ParseError::InvalidEntryKey(s.to_string()))?;
        Ok(RouteEntry {
            vr_id: vr.parse()?,
            destination: rest.parse()?,
        })
    }
}

/// Key of a neighbor: router interface plus neighbor IP.
///
/// Canonical form: `<rif-id>:<ip>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NeighborEntry {
    pub rif_id: ObjectId,
    pub ip: IpAddr,
}

impl NeighborEntry {
    pub fn new(rif_id: ObjectId, ip: IpAddr) -> Self {
        NeighborEntry { rif_id, ip }
    }
}

impl fmt::Display for NeighborEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.rif_id, self.ip)
    }
}

impl FromStr for NeighborEntry {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (rif, rest) = s
            .split_once(':')
            .ok_or_else(|| ParseError::InvalidEntryKey(s.to_string()))?;
        let ip: IpAddr = rest
            .parse()
            .map_err(|_| ParseError::InvalidIpAddress(rest.to_string()))?;
        Ok(NeighborEntry {
            rif_id: rif.parse()?,
            ip,
        })
    }
}

/// Key of a forwarding-database entry: MAC plus VLAN.
///
/// Canonical form: `<mac>:<vlan>`; the VLAN id is the last colon-separated
/// field since the MAC itself contains colons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FdbEntry {
    pub mac: MacAddress,
    pub vlan_id: u16,
}

impl FdbEntry {
    pub fn new(mac: MacAddress, vlan_id: u16) -> Self {
        FdbEntry { mac, vlan_id }
    }
}

impl fmt::Display for FdbEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.mac, self.vlan_id)
    }
}

impl FromStr for FdbEntry {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (mac, vlan) = s
            .rsplit_once(':')
            .ok_or_else(|| ParseError::InvalidEntryKey(s.to_string()))?;
        let vlan_id: u16 = vlan
            .parse()
            .map_err(|_| ParseError::InvalidEntryKey(s.to_string()))?;
        Ok(FdbEntry {
            mac: mac.parse()?,
            vlan_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ObjectType;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_route_entry_round_trip() {
        let entry = RouteEntry::new(
            ObjectId::pack(ObjectType::VirtualRouter, 7),
            "10.1.0.0/16".parse().unwrap(),
        );
        let text = entry.to_string();
        assert_eq!(text.parse::<RouteEntry>().unwrap(), entry);
    }

    #[test]
    fn test_neighbor_entry_round_trip_v4_and_v6() {
        for ip in ["10.0.0.1", "2001:db8::1"] {
            let entry = NeighborEntry::new(
                ObjectId::pack(ObjectType::RouterInterface, 3),
                ip.parse().unwrap(),
            );
            assert_eq!(entry.to_string().parse::<NeighborEntry>().unwrap(), entry);
        }
    }

    #[test]
    fn test_fdb_entry_round_trip() {
        let entry = FdbEntry::new("00:11:22:33:44:55".parse().unwrap(), 100);
        assert_eq!(entry.to_string(), "00:11:22:33:44:55:100");
        assert_eq!(entry.to_string().parse::<FdbEntry>().unwrap(), entry);
    }

    #[test]
    fn test_rejects_malformed_keys() {
        assert!("not-a-key".parse::<RouteEntry>().is_err());
        assert!("0001:10.0.0.0/8".parse::<RouteEntry>().is_err());
        assert!("0006000000000001:banana".parse::<NeighborEntry>().is_err());
        assert!("00:11:22:33:44:55".parse::<FdbEntry>().is_err());
    }
}
