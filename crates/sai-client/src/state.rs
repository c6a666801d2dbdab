//! The library's advisory view of what exists.
//!
//! Authoritative state lives behind the daemon; these indices exist to
//! reject obvious violations (dangling references, double removes, key
//! collisions) before anything reaches the bus.

use crate::refs::ReferenceTracker;
use sai_types::ObjectId;
use std::collections::HashSet;

/// The VLAN that exists from switch bring-up and can never be removed.
pub const DEFAULT_VLAN_ID: u16 = 1;

/// Per-kind existence indices, discovered defaults, and reference counts.
#[derive(Debug, Default)]
pub struct LibraryState {
    pub switch_present: bool,

    pub virtual_routers: HashSet<ObjectId>,
    pub router_interfaces: HashSet<ObjectId>,
    pub next_hops: HashSet<ObjectId>,
    pub next_hop_groups: HashSet<ObjectId>,
    pub lags: HashSet<ObjectId>,
    pub lag_members: HashSet<ObjectId>,
    pub ports: HashSet<ObjectId>,
    pub vlan_members: HashSet<ObjectId>,
    pub policers: HashSet<ObjectId>,
    pub trap_groups: HashSet<ObjectId>,
    pub hostifs: HashSet<ObjectId>,
    pub tunnels: HashSet<ObjectId>,
    pub tunnel_maps: HashSet<ObjectId>,
    pub tunnel_terms: HashSet<ObjectId>,

    pub vlans: HashSet<u16>,

    /// Entry-keyed kinds, indexed by canonical key string.
    pub routes: HashSet<String>,
    pub neighbors: HashSet<String>,
    pub fdb_entries: HashSet<String>,

    /// Defaults discovered via the first switch get; null until then.
    pub default_virtual_router: ObjectId,
    pub cpu_port: ObjectId,
    pub default_trap_group: ObjectId,

    pub refs: ReferenceTracker,
}

impl LibraryState {
    pub fn new() -> Self {
        let mut state = LibraryState::default();
        state.reset();
        state
    }

    /// Flushes every index and repopulates the objects that exist on a
    /// fresh switch: the default VLAN and the switch itself. Discovered
    /// defaults are forgotten and must be re-learned via switch get.
    pub fn reset(&mut self) {
        self.virtual_routers.clear();
        self.router_interfaces.clear();
        self.next_hops.clear();
        self.next_hop_groups.clear();
        self.lags.clear();
        self.lag_members.clear();
        self.ports.clear();
        self.vlan_members.clear();
        self.policers.clear();
        self.trap_groups.clear();
        self.hostifs.clear();
        self.tunnels.clear();
        self.tunnel_maps.clear();
        self.tunnel_terms.clear();
        self.vlans.clear();
        self.routes.clear();
        self.neighbors.clear();
        self.fdb_entries.clear();
        self.refs.clear();

        self.vlans.insert(DEFAULT_VLAN_ID);
        self.switch_present = true;

        self.default_virtual_router = ObjectId::NULL;
        self.cpu_port = ObjectId::NULL;
        self.default_trap_group = ObjectId::NULL;
    }

    /// A virtual-router reference is valid if user-created or equal to the
    /// discovered default.
    pub fn is_virtual_router(&self, oid: ObjectId) -> bool {
        self.virtual_routers.contains(&oid)
            || (!self.default_virtual_router.is_null() && oid == self.default_virtual_router)
    }

    /// A port reference is valid for user-visible ports and the CPU port.
    pub fn is_port(&self, oid: ObjectId) -> bool {
        self.ports.contains(&oid) || (!self.cpu_port.is_null() && oid == self.cpu_port)
    }

    pub fn is_trap_group(&self, oid: ObjectId) -> bool {
        self.trap_groups.contains(&oid)
            || (!self.default_trap_group.is_null() && oid == self.default_trap_group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sai_types::ObjectType;

    #[test]
    fn test_reset_populates_defaults() {
        let state = LibraryState::new();
        assert!(state.switch_present);
        assert!(state.vlans.contains(&DEFAULT_VLAN_ID));
        assert!(state.default_virtual_router.is_null());
        assert!(state.cpu_port.is_null());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut state = LibraryState::new();
        state.next_hops.insert(ObjectId::pack(ObjectType::NextHop, 1));
        state.vlans.insert(100);
        state.routes.insert("x".to_string());
        state.default_virtual_router = ObjectId::pack(ObjectType::VirtualRouter, 1);

        state.reset();
        assert!(state.next_hops.is_empty());
        assert!(state.routes.is_empty());
        assert_eq!(state.vlans.len(), 1);
        assert!(state.default_virtual_router.is_null());
    }

    #[test]
    fn test_default_reference_checks() {
        let mut state = LibraryState::new();
        let vr = ObjectId::pack(ObjectType::VirtualRouter, 9);
        assert!(!state.is_virtual_router(vr));

        state.default_virtual_router = vr;
        assert!(state.is_virtual_router(vr));

        let port = ObjectId::pack(ObjectType::Port, 1);
        assert!(!state.is_port(port));
        state.cpu_port = port;
        assert!(state.is_port(port));
    }
}
