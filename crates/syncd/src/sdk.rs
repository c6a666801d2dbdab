//! The contracted surface of the vendor SDK.
//!
//! Only this trait is contracted; the concrete SDK (or the simulator in
//! [`crate::sim`]) lives behind it. All object ids crossing this boundary
//! are real ids; translation happens in the dispatcher before any call
//! lands here.

use sai_attr::events::Notification;
use sai_attr::Attribute;
use sai_types::{FdbEntry, NeighborEntry, ObjectId, ObjectType, RouteEntry, Status};

pub trait VendorSdk: Send {
    /// Returns the kind of a real id, or `Null` if the SDK does not know it.
    fn object_type_query(&self, rid: ObjectId) -> ObjectType;

    // generic object surface

    fn create(&mut self, kind: ObjectType, attrs: &[Attribute]) -> Result<ObjectId, Status>;

    fn remove(&mut self, kind: ObjectType, rid: ObjectId) -> Status;

    fn set(&mut self, kind: ObjectType, rid: ObjectId, attr: &Attribute) -> Status;

    /// Fills `attrs` in place. List-valued attributes whose provided
    /// capacity is too small yield `BUFFER_OVERFLOW` with correct counts.
    fn get(&mut self, kind: ObjectType, rid: ObjectId, attrs: &mut [Attribute]) -> Status;

    // vlans are keyed by number

    fn create_vlan(&mut self, vlan_id: u16) -> Status;

    fn remove_vlan(&mut self, vlan_id: u16) -> Status;

    fn set_vlan(&mut self, vlan_id: u16, attr: &Attribute) -> Status;

    fn get_vlan(&mut self, vlan_id: u16, attrs: &mut [Attribute]) -> Status;

    // entry-keyed surfaces; embedded parent ids are real ids

    fn create_route(&mut self, entry: &RouteEntry, attrs: &[Attribute]) -> Status;

    fn remove_route(&mut self, entry: &RouteEntry) -> Status;

    fn set_route(&mut self, entry: &RouteEntry, attr: &Attribute) -> Status;

    fn get_route(&mut self, entry: &RouteEntry, attrs: &mut [Attribute]) -> Status;

    fn create_neighbor(&mut self, entry: &NeighborEntry, attrs: &[Attribute]) -> Status;

    fn remove_neighbor(&mut self, entry: &NeighborEntry) -> Status;

    fn set_neighbor(&mut self, entry: &NeighborEntry, attr: &Attribute) -> Status;

    fn get_neighbor(&mut self, entry: &NeighborEntry, attrs: &mut [Attribute]) -> Status;

    fn create_fdb_entry(&mut self, entry: &FdbEntry, attrs: &[Attribute]) -> Status;

    fn remove_fdb_entry(&mut self, entry: &FdbEntry) -> Status;

    fn set_fdb_entry(&mut self, entry: &FdbEntry, attr: &Attribute) -> Status;

    fn get_fdb_entry(&mut self, entry: &FdbEntry, attrs: &mut [Attribute]) -> Status;

    // the switch itself and traps carry no object id

    fn set_switch(&mut self, attr: &Attribute) -> Status;

    fn get_switch(&mut self, attrs: &mut [Attribute]) -> Status;

    fn set_trap(&mut self, trap_id: u32, attr: &Attribute) -> Status;

    fn get_trap(&mut self, trap_id: u32, attrs: &mut [Attribute]) -> Status;

    /// Hands back events the SDK raised since the last drain. Object ids in
    /// the payloads are real ids; the dispatcher rewrites them.
    fn drain_notifications(&mut self) -> Vec<Notification> {
        Vec::new()
    }
}
