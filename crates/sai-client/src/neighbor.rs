//! Neighbor entry operations.

use crate::client::{check_gettable, find_attr, SaiClient};
use crate::refs::{RefTarget, KEY_REF};
use sai_attr::ids::neighbor_attr;
use sai_attr::Attribute;
use sai_types::{NeighborEntry, ObjectType, SaiResult, Status};
use tracing::{debug, warn};

const SETTABLE: &[u32] = &[
    neighbor_attr::DST_MAC_ADDRESS,
    neighbor_attr::PACKET_ACTION,
    neighbor_attr::NO_HOST_ROUTE,
    neighbor_attr::META_DATA,
];

impl SaiClient {
    pub fn create_neighbor_entry(
        &self,
        entry: &NeighborEntry,
        attrs: &[Attribute],
    ) -> SaiResult<()> {
        let mut state = self.inner.state.lock().unwrap();

        if !state.router_interfaces.contains(&entry.rif_id) {
            warn!(rif_id = %entry.rif_id, "router interface is missing");
            return Err(Status::InvalidParameter);
        }
        if find_attr(attrs, neighbor_attr::DST_MAC_ADDRESS).is_none() {
            warn!("missing destination mac attribute");
            return Err(Status::MandatoryAttributeMissing);
        }

        let key = entry.to_string();
        if state.neighbors.contains(&key) {
            warn!(%key, "neighbor already exists");
            return Err(Status::ItemAlreadyExists);
        }

        self.inner
            .push_create(ObjectType::NeighborEntry, &key, attrs)?;
        debug!(%key, "inserting neighbor to local state");
        state.neighbors.insert(key.clone());
        state
            .refs
            .acquire(&key, KEY_REF, vec![RefTarget::Object(entry.rif_id)]);
        Ok(())
    }

    pub fn remove_neighbor_entry(&self, entry: &NeighborEntry) -> SaiResult<()> {
        let mut state = self.inner.state.lock().unwrap();
        let key = entry.to_string();
        if !state.neighbors.contains(&key) {
            warn!(%key, "neighbor is missing");
            return Err(Status::InvalidParameter);
        }

        self.inner.push_remove(ObjectType::NeighborEntry, &key)?;
        debug!(%key, "erasing neighbor from local state");
        state.neighbors.remove(&key);
        state.refs.release_holder(&key);
        Ok(())
    }

    pub fn set_neighbor_attribute(&self, entry: &NeighborEntry, attr: &Attribute) -> SaiResult<()> {
        let state = self.inner.state.lock().unwrap();
        let key = entry.to_string();
        if !state.neighbors.contains(&key) {
            warn!(%key, "neighbor is missing");
            return Err(Status::InvalidParameter);
        }
        if !SETTABLE.contains(&attr.id) {
            warn!(id = attr.id, "setting attribute id is not supported");
            return Err(Status::InvalidParameter);
        }
        self.inner.push_set(ObjectType::NeighborEntry, &key, attr)
    }

    pub fn get_neighbor_attribute(
        &self,
        entry: &NeighborEntry,
        attrs: &mut [Attribute],
    ) -> SaiResult<()> {
        let state = self.inner.state.lock().unwrap();
        let key = entry.to_string();
        if !state.neighbors.contains(&key) {
            warn!(%key, "neighbor is missing");
            return Err(Status::InvalidParameter);
        }
        check_gettable(attrs, SETTABLE)?;
        self.inner
            .get_attributes(ObjectType::NeighborEntry, &key, attrs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support;
    use crate::next_hop::test_fixtures;
    use sai_attr::Value;
    use sai_types::ObjectId;
    use pretty_assertions::assert_eq;

    fn mac_attr() -> Attribute {
        Attribute::new(
            neighbor_attr::DST_MAC_ADDRESS,
            Value::Mac("00:11:22:33:44:55".parse().unwrap()),
        )
    }

    #[test]
    fn test_create_requires_existing_rif_and_mac() {
        let (client, bus) = test_support::client();
        let ghost_rif = ObjectId::pack(ObjectType::RouterInterface, 0xdead);
        let entry = NeighborEntry::new(ghost_rif, "10.0.0.1".parse().unwrap());

        assert_eq!(
            client.create_neighbor_entry(&entry, &[mac_attr()]),
            Err(Status::InvalidParameter)
        );
        assert_eq!(test_support::next_request(&bus), None);

        let rif = test_fixtures::loopback_rif(&client);
        let entry = NeighborEntry::new(rif, "10.0.0.1".parse().unwrap());
        assert_eq!(
            client.create_neighbor_entry(&entry, &[]),
            Err(Status::MandatoryAttributeMissing)
        );
        client.create_neighbor_entry(&entry, &[mac_attr()]).unwrap();
    }

    #[test]
    fn test_duplicate_key_is_already_exists() {
        let (client, _bus) = test_support::client();
        let rif = test_fixtures::loopback_rif(&client);
        let entry = NeighborEntry::new(rif, "10.0.0.1".parse().unwrap());

        client.create_neighbor_entry(&entry, &[mac_attr()]).unwrap();
        assert_eq!(
            client.create_neighbor_entry(&entry, &[mac_attr()]),
            Err(Status::ItemAlreadyExists)
        );

        // the same ip under a different rif is a different key
        let other_rif = test_fixtures::loopback_rif(&client);
        let other = NeighborEntry::new(other_rif, "10.0.0.1".parse().unwrap());
        client.create_neighbor_entry(&other, &[mac_attr()]).unwrap();
    }

    #[test]
    fn test_remove_releases_rif() {
        let (client, _bus) = test_support::client();
        let rif = test_fixtures::loopback_rif(&client);
        let entry = NeighborEntry::new(rif, "10.0.0.9".parse().unwrap());
        client.create_neighbor_entry(&entry, &[mac_attr()]).unwrap();

        assert_eq!(client.remove_router_interface(rif), Err(Status::ObjectInUse));
        client.remove_neighbor_entry(&entry).unwrap();
        client.remove_router_interface(rif).unwrap();
    }

    #[test]
    fn test_set_whitelist() {
        let (client, _bus) = test_support::client();
        let rif = test_fixtures::loopback_rif(&client);
        let entry = NeighborEntry::new(rif, "10.0.0.2".parse().unwrap());
        client.create_neighbor_entry(&entry, &[mac_attr()]).unwrap();

        client
            .set_neighbor_attribute(
                &entry,
                &Attribute::new(neighbor_attr::NO_HOST_ROUTE, Value::Bool(true)),
            )
            .unwrap();

        assert_eq!(
            client.set_neighbor_attribute(&entry, &Attribute::new(0xff, Value::U32(0))),
            Err(Status::InvalidParameter)
        );
    }
}
