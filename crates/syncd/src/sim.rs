//! An in-memory stand-in for the vendor SDK.
//!
//! Models just enough hardware to exercise the adapter: default objects
//! created at bring-up (CPU port, front-panel ports with lane lists, the
//! default virtual router, VLAN, and trap group), attribute storage per
//! object, and the buffer-overflow contract on list gets. Tests also use
//! it to inject notifications.

use crate::sdk::VendorSdk;
use sai_attr::events::Notification;
use sai_attr::ids::{port_attr, switch_attr};
use sai_attr::{Attribute, Value};
use sai_types::{FdbEntry, NeighborEntry, ObjectId, ObjectType, RouteEntry, Status};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Real ids are opaque; the simulator brands its own with a fixed prefix so
/// they are recognizable in logs and can never collide with packed
/// virtual ids.
const RID_BASE: u64 = 0x5600_0000_0000_0000;

const LANES_PER_PORT: u32 = 4;

struct SimObject {
    kind: ObjectType,
    attrs: HashMap<u32, Value>,
}

pub struct SimSdk {
    next_rid: u64,
    objects: HashMap<ObjectId, SimObject>,
    vlans: HashSet<u16>,
    routes: HashMap<String, HashMap<u32, Value>>,
    neighbors: HashMap<String, HashMap<u32, Value>>,
    fdb_entries: HashMap<String, HashMap<u32, Value>>,
    switch_attrs: HashMap<u32, Value>,
    traps: HashMap<u32, HashMap<u32, Value>>,
    cpu_port: ObjectId,
    default_virtual_router: ObjectId,
    default_trap_group: ObjectId,
    ports: Vec<ObjectId>,
    pending: Vec<Notification>,
}

impl SimSdk {
    /// Brings up a switch with `port_count` front-panel ports.
    pub fn new(port_count: usize) -> Self {
        let mut sim = SimSdk {
            next_rid: 0,
            objects: HashMap::new(),
            vlans: HashSet::new(),
            routes: HashMap::new(),
            neighbors: HashMap::new(),
            fdb_entries: HashMap::new(),
            switch_attrs: HashMap::new(),
            traps: HashMap::new(),
            cpu_port: ObjectId::NULL,
            default_virtual_router: ObjectId::NULL,
            default_trap_group: ObjectId::NULL,
            ports: Vec::new(),
            pending: Vec::new(),
        };

        sim.cpu_port = sim.insert_object(ObjectType::Port, HashMap::new());
        for index in 0..port_count {
            let lanes: Vec<u32> = (0..LANES_PER_PORT)
                .map(|lane| index as u32 * LANES_PER_PORT + lane)
                .collect();
            let mut attrs = HashMap::new();
            attrs.insert(port_attr::HW_LANE_LIST, Value::U32List(lanes));
            attrs.insert(port_attr::OPER_STATUS, Value::S32(1));
            let port = sim.insert_object(ObjectType::Port, attrs);
            sim.ports.push(port);
        }
        sim.default_virtual_router = sim.insert_object(ObjectType::VirtualRouter, HashMap::new());
        sim.default_trap_group = sim.insert_object(ObjectType::TrapGroup, HashMap::new());
        sim.vlans.insert(1);

        sim.switch_attrs
            .insert(switch_attr::CPU_PORT, Value::ObjectId(sim.cpu_port));
        sim.switch_attrs.insert(
            switch_attr::DEFAULT_VIRTUAL_ROUTER_ID,
            Value::ObjectId(sim.default_virtual_router),
        );
        sim.switch_attrs.insert(
            switch_attr::DEFAULT_TRAP_GROUP,
            Value::ObjectId(sim.default_trap_group),
        );
        sim.switch_attrs
            .insert(switch_attr::PORT_LIST, Value::ObjectList(sim.ports.clone()));
        sim.switch_attrs
            .insert(switch_attr::PORT_NUMBER, Value::U32(port_count as u32));
        sim
    }

    pub fn cpu_port(&self) -> ObjectId {
        self.cpu_port
    }

    pub fn default_virtual_router(&self) -> ObjectId {
        self.default_virtual_router
    }

    pub fn ports(&self) -> &[ObjectId] {
        &self.ports
    }

    pub fn vlans(&self) -> &HashSet<u16> {
        &self.vlans
    }

    /// Canonical keys of every route installed, in real-id space.
    pub fn route_keys(&self) -> Vec<String> {
        self.routes.keys().cloned().collect()
    }

    /// Real ids of the live objects of `kind`.
    pub fn objects_of(&self, kind: ObjectType) -> Vec<ObjectId> {
        self.objects
            .iter()
            .filter(|(_, o)| o.kind == kind)
            .map(|(rid, _)| *rid)
            .collect()
    }

    /// Queues an event for the next [`VendorSdk::drain_notifications`].
    pub fn raise(&mut self, notification: Notification) {
        self.pending.push(notification);
    }

    fn insert_object(&mut self, kind: ObjectType, attrs: HashMap<u32, Value>) -> ObjectId {
        self.next_rid += 1;
        let rid = ObjectId::from_raw(RID_BASE | self.next_rid);
        self.objects.insert(rid, SimObject { kind, attrs });
        rid
    }
}

/// Copies stored values into the caller's slots, honoring the overflow
/// contract: a list slot smaller than the stored list gets the stored
/// value anyway (so counts serialize correctly) and flips the status.
fn fill_attrs(stored: &HashMap<u32, Value>, attrs: &mut [Attribute]) -> Status {
    let mut status = Status::Success;
    for attr in attrs.iter_mut() {
        // attributes never written keep the caller's value
        let Some(value) = stored.get(&attr.id) else {
            continue;
        };
        if let (Some(capacity), Some(actual)) = (list_len(&attr.value), list_len(value)) {
            if capacity < actual {
                status = Status::BufferOverflow;
            }
        }
        attr.value = value.clone();
    }
    status
}

fn list_len(value: &Value) -> Option<usize> {
    match value {
        Value::ObjectList(l) => Some(l.len()),
        Value::U32List(l) => Some(l.len()),
        Value::S32List(l) => Some(l.len()),
        Value::QosMapList(l) => Some(l.len()),
        Value::TunnelMapList(l) => Some(l.len()),
        _ => None,
    }
}

fn store_attrs(attrs: &[Attribute]) -> HashMap<u32, Value> {
    attrs.iter().map(|a| (a.id, a.value.clone())).collect()
}

impl VendorSdk for SimSdk {
    fn object_type_query(&self, rid: ObjectId) -> ObjectType {
        self.objects
            .get(&rid)
            .map(|o| o.kind)
            .unwrap_or(ObjectType::Null)
    }

    fn create(&mut self, kind: ObjectType, attrs: &[Attribute]) -> Result<ObjectId, Status> {
        let rid = self.insert_object(kind, store_attrs(attrs));
        debug!(%rid, %kind, "sim created object");
        Ok(rid)
    }

    fn remove(&mut self, kind: ObjectType, rid: ObjectId) -> Status {
        match self.objects.get(&rid) {
            Some(object) if object.kind == kind => {
                self.objects.remove(&rid);
                Status::Success
            }
            _ => Status::ItemNotFound,
        }
    }

    fn set(&mut self, kind: ObjectType, rid: ObjectId, attr: &Attribute) -> Status {
        match self.objects.get_mut(&rid) {
            Some(object) if object.kind == kind => {
                object.attrs.insert(attr.id, attr.value.clone());
                Status::Success
            }
            _ => Status::ItemNotFound,
        }
    }

    fn get(&mut self, kind: ObjectType, rid: ObjectId, attrs: &mut [Attribute]) -> Status {
        match self.objects.get(&rid) {
            Some(object) if object.kind == kind => fill_attrs(&object.attrs, attrs),
            _ => Status::ItemNotFound,
        }
    }

    fn create_vlan(&mut self, vlan_id: u16) -> Status {
        if self.vlans.insert(vlan_id) {
            Status::Success
        } else {
            Status::ItemAlreadyExists
        }
    }

    fn remove_vlan(&mut self, vlan_id: u16) -> Status {
        if self.vlans.remove(&vlan_id) {
            Status::Success
        } else {
            Status::ItemNotFound
        }
    }

    fn set_vlan(&mut self, vlan_id: u16, _attr: &Attribute) -> Status {
        if self.vlans.contains(&vlan_id) {
            Status::Success
        } else {
            Status::ItemNotFound
        }
    }

    fn get_vlan(&mut self, vlan_id: u16, _attrs: &mut [Attribute]) -> Status {
        if self.vlans.contains(&vlan_id) {
            Status::Success
        } else {
            Status::ItemNotFound
        }
    }

    fn create_route(&mut self, entry: &RouteEntry, attrs: &[Attribute]) -> Status {
        self.routes.insert(entry.to_string(), store_attrs(attrs));
        Status::Success
    }

    fn remove_route(&mut self, entry: &RouteEntry) -> Status {
        match self.routes.remove(&entry.to_string()) {
            Some(_) => Status::Success,
            None => Status::ItemNotFound,
        }
    }

    fn set_route(&mut self, entry: &RouteEntry, attr: &Attribute) -> Status {
        match self.routes.get_mut(&entry.to_string()) {
            Some(stored) => {
                stored.insert(attr.id, attr.value.clone());
                Status::Success
            }
            None => Status::ItemNotFound,
        }
    }

    fn get_route(&mut self, entry: &RouteEntry, attrs: &mut [Attribute]) -> Status {
        match self.routes.get(&entry.to_string()) {
            Some(stored) => fill_attrs(stored, attrs),
            None => Status::ItemNotFound,
        }
    }

    fn create_neighbor(&mut self, entry: &NeighborEntry, attrs: &[Attribute]) -> Status {
        self.neighbors.insert(entry.to_string(), store_attrs(attrs));
        Status::Success
    }

    fn remove_neighbor(&mut self, entry: &NeighborEntry) -> Status {
        match self.neighbors.remove(&entry.to_string()) {
            Some(_) => Status::Success,
            None => Status::ItemNotFound,
        }
    }

    fn set_neighbor(&mut self, entry: &NeighborEntry, attr: &Attribute) -> Status {
        match self.neighbors.get_mut(&entry.to_string()) {
            Some(stored) => {
                stored.insert(attr.id, attr.value.clone());
                Status::Success
            }
            None => Status::ItemNotFound,
        }
    }

    fn get_neighbor(&mut self, entry: &NeighborEntry, attrs: &mut [Attribute]) -> Status {
        match self.neighbors.get(&entry.to_string()) {
            Some(stored) => fill_attrs(stored, attrs),
            None => Status::ItemNotFound,
        }
    }

    fn create_fdb_entry(&mut self, entry: &FdbEntry, attrs: &[Attribute]) -> Status {
        self.fdb_entries.insert(entry.to_string(), store_attrs(attrs));
        Status::Success
    }

    fn remove_fdb_entry(&mut self, entry: &FdbEntry) -> Status {
        match self.fdb_entries.remove(&entry.to_string()) {
            Some(_) => Status::Success,
            None => Status::ItemNotFound,
        }
    }

    fn set_fdb_entry(&mut self, entry: &FdbEntry, attr: &Attribute) -> Status {
        match self.fdb_entries.get_mut(&entry.to_string()) {
            Some(stored) => {
                stored.insert(attr.id, attr.value.clone());
                Status::Success
            }
            None => Status::ItemNotFound,
        }
    }

    fn get_fdb_entry(&mut self, entry: &FdbEntry, attrs: &mut [Attribute]) -> Status {
        match self.fdb_entries.get(&entry.to_string()) {
            Some(stored) => fill_attrs(stored, attrs),
            None => Status::ItemNotFound,
        }
    }

    fn set_switch(&mut self, attr: &Attribute) -> Status {
        self.switch_attrs.insert(attr.id, attr.value.clone());
        Status::Success
    }

    fn get_switch(&mut self, attrs: &mut [Attribute]) -> Status {
        fill_attrs(&self.switch_attrs, attrs)
    }

    fn set_trap(&mut self, trap_id: u32, attr: &Attribute) -> Status {
        self.traps
            .entry(trap_id)
            .or_default()
            .insert(attr.id, attr.value.clone());
        Status::Success
    }

    fn get_trap(&mut self, trap_id: u32, attrs: &mut [Attribute]) -> Status {
        match self.traps.get(&trap_id) {
            Some(stored) => fill_attrs(stored, attrs),
            None => Status::ItemNotFound,
        }
    }

    fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bring_up_defaults() {
        let sim = SimSdk::new(4);
        assert_eq!(sim.ports().len(), 4);
        assert!(!sim.cpu_port().is_null());
        assert!(!sim.default_virtual_router().is_null());
        assert!(sim.vlans().contains(&1));
        assert_eq!(sim.object_type_query(sim.cpu_port()), ObjectType::Port);
    }

    #[test]
    fn test_create_remove_round_trip() {
        let mut sim = SimSdk::new(1);
        let rid = sim.create(ObjectType::VirtualRouter, &[]).unwrap();
        assert_eq!(sim.object_type_query(rid), ObjectType::VirtualRouter);
        assert_eq!(sim.remove(ObjectType::VirtualRouter, rid), Status::Success);
        assert_eq!(sim.remove(ObjectType::VirtualRouter, rid), Status::ItemNotFound);
    }

    #[test]
    fn test_lane_list_overflow_contract() {
        let mut sim = SimSdk::new(1);
        let port = sim.ports()[0];

        let mut attrs = [Attribute::new(port_attr::HW_LANE_LIST, Value::U32List(vec![]))];
        assert_eq!(
            sim.get(ObjectType::Port, port, &mut attrs),
            Status::BufferOverflow
        );
        // the value carries the real count even on overflow
        assert_eq!(
            attrs[0].value,
            Value::U32List(vec![0, 1, 2, 3])
        );

        let mut attrs = [Attribute::new(
            port_attr::HW_LANE_LIST,
            Value::U32List(vec![0; 4]),
        )];
        assert_eq!(sim.get(ObjectType::Port, port, &mut attrs), Status::Success);
    }

    #[test]
    fn test_vlan_duplicate() {
        let mut sim = SimSdk::new(1);
        assert_eq!(sim.create_vlan(100), Status::Success);
        assert_eq!(sim.create_vlan(100), Status::ItemAlreadyExists);
        assert_eq!(sim.remove_vlan(100), Status::Success);
        assert_eq!(sim.remove_vlan(100), Status::ItemNotFound);
    }
}
