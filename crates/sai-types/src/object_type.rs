//! The closed enumeration of switch object kinds.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kinds of switch objects known to the adapter.
///
/// The discriminant is the value packed into the upper bits of a virtual
/// object id, so it must never change for an existing kind.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectType {
    Null = 0,
    Port = 1,
    Lag = 2,
    VirtualRouter = 3,
    NextHop = 4,
    NextHopGroup = 5,
    RouterInterface = 6,
    AclTable = 7,
    AclEntry = 8,
    AclCounter = 9,
    Hostif = 10,
    Mirror = 11,
    Samplepacket = 12,
    Stp = 13,
    TrapGroup = 14,
    Policer = 15,
    Wred = 16,
    QosMap = 17,
    Queue = 18,
    Scheduler = 19,
    SchedulerGroup = 20,
    BufferPool = 21,
    BufferProfile = 22,
    Hash = 23,
    Udf = 24,
    Tunnel = 25,
    TunnelMap = 26,
    TunnelTermTableEntry = 27,
    FdbEntry = 28,
    Switch = 29,
    Trap = 30,
    UserDefinedTrap = 31,
    NeighborEntry = 32,
    RouteEntry = 33,
    Vlan = 34,
    VlanMember = 35,
    LagMember = 36,
}

impl ObjectType {
    /// All kinds except `Null`, in discriminant order.
    pub const ALL: [ObjectType; 36] = [
        ObjectType::Port,
        ObjectType::Lag,
        ObjectType::VirtualRouter,
        ObjectType::NextHop,
        ObjectType::NextHopGroup,
        ObjectType::RouterInterface,
        ObjectType::AclTable,
        ObjectType::AclEntry,
        ObjectType::AclCounter,
        ObjectType::Hostif,
        ObjectType::Mirror,
        ObjectType::Samplepacket,
        ObjectType::Stp,
        ObjectType::TrapGroup,
        ObjectType::Policer,
        ObjectType::Wred,
        ObjectType::QosMap,
        ObjectType::Queue,
        ObjectType::Scheduler,
        ObjectType::SchedulerGroup,
        ObjectType::BufferPool,
        ObjectType::BufferProfile,
        ObjectType::Hash,
        ObjectType::Udf,
        ObjectType::Tunnel,
        ObjectType::TunnelMap,
        ObjectType::TunnelTermTableEntry,
        ObjectType::FdbEntry,
        ObjectType::Switch,
        ObjectType::Trap,
        ObjectType::UserDefinedTrap,
        ObjectType::NeighborEntry,
        ObjectType::RouteEntry,
        ObjectType::Vlan,
        ObjectType::VlanMember,
        ObjectType::LagMember,
    ];

    /// Converts a raw discriminant back into a kind.
    pub fn from_u16(raw: u16) -> Option<ObjectType> {
        ObjectType::ALL
            .iter()
            .copied()
            .find(|t| *t as u16 == raw)
            .or(if raw == 0 { Some(ObjectType::Null) } else { None })
    }

    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// The canonical kind name used in bus keys.
    pub const fn name(self) -> &'static str {
        match self {
            ObjectType::Null => "null",
            ObjectType::Port => "port",
            ObjectType::Lag => "lag",
            ObjectType::VirtualRouter => "virtual-router",
            ObjectType::NextHop => "next-hop",
            ObjectType::NextHopGroup => "next-hop-group",
            ObjectType::RouterInterface => "router-interface",
            ObjectType::AclTable => "acl-table",
            ObjectType::AclEntry => "acl-entry",
            ObjectType::AclCounter => "acl-counter",
            ObjectType::Hostif => "host-interface",
            ObjectType::Mirror => "mirror",
            ObjectType::Samplepacket => "samplepacket",
            ObjectType::Stp => "stp",
            ObjectType::TrapGroup => "trap-group",
            ObjectType::Policer => "policer",
            ObjectType::Wred => "wred",
            ObjectType::QosMap => "qos-map",
            ObjectType::Queue => "queue",
            ObjectType::Scheduler => "scheduler",
            ObjectType::SchedulerGroup => "scheduler-group",
            ObjectType::BufferPool => "buffer-pool",
            ObjectType::BufferProfile => "buffer-profile",
            ObjectType::Hash => "hash",
            ObjectType::Udf => "udf",
            ObjectType::Tunnel => "tunnel",
            ObjectType::TunnelMap => "tunnel-map",
            ObjectType::TunnelTermTableEntry => "tunnel-term-table-entry",
            ObjectType::FdbEntry => "fdb-entry",
            ObjectType::Switch => "switch",
            ObjectType::Trap => "trap",
            ObjectType::UserDefinedTrap => "user-defined-trap",
            ObjectType::NeighborEntry => "neighbor-entry",
            ObjectType::RouteEntry => "route-entry",
            ObjectType::Vlan => "vlan",
            ObjectType::VlanMember => "vlan-member",
            ObjectType::LagMember => "lag-member",
        }
    }

    /// Returns true for kinds addressed by a structural key instead of an id.
    pub const fn is_entry_keyed(self) -> bool {
        matches!(
            self,
            ObjectType::RouteEntry | ObjectType::NeighborEntry | ObjectType::FdbEntry
        )
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ObjectType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectType::ALL
            .iter()
            .copied()
            .find(|t| t.name() == s)
            .ok_or_else(|| ParseError::InvalidObjectType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discriminant_round_trip() {
        for kind in ObjectType::ALL {
            assert_eq!(ObjectType::from_u16(kind.as_u16()), Some(kind));
        }
        assert_eq!(ObjectType::from_u16(0), Some(ObjectType::Null));
        assert_eq!(ObjectType::from_u16(999), None);
    }

    #[test]
    fn test_name_round_trip() {
        for kind in ObjectType::ALL {
            assert_eq!(kind.name().parse::<ObjectType>().unwrap(), kind);
        }
        assert!("no-such-kind".parse::<ObjectType>().is_err());
    }

    #[test]
    fn test_entry_keyed() {
        assert!(ObjectType::RouteEntry.is_entry_keyed());
        assert!(ObjectType::NeighborEntry.is_entry_keyed());
        assert!(ObjectType::FdbEntry.is_entry_keyed());
        assert!(!ObjectType::NextHop.is_entry_keyed());
    }
}
