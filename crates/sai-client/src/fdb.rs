//! Forwarding-database entry operations.

use crate::client::{check_gettable, find_attr, SaiClient};
use crate::refs::{RefTarget, KEY_REF};
use sai_attr::ids::fdb_attr;
use sai_attr::Attribute;
use sai_types::{FdbEntry, ObjectType, SaiResult, Status};
use tracing::{debug, warn};

const SETTABLE: &[u32] = &[fdb_attr::PACKET_ACTION, fdb_attr::META_DATA];

const GETTABLE: &[u32] = &[
    fdb_attr::TYPE,
    fdb_attr::PORT_ID,
    fdb_attr::PACKET_ACTION,
    fdb_attr::META_DATA,
];

impl SaiClient {
    pub fn create_fdb_entry(&self, entry: &FdbEntry, attrs: &[Attribute]) -> SaiResult<()> {
        let mut state = self.inner.state.lock().unwrap();

        if !state.vlans.contains(&entry.vlan_id) {
            warn!(vlan_id = entry.vlan_id, "vlan is missing");
            return Err(Status::InvalidParameter);
        }
        if find_attr(attrs, fdb_attr::TYPE).is_none() {
            warn!("missing type attribute");
            return Err(Status::MandatoryAttributeMissing);
        }
        if find_attr(attrs, fdb_attr::PACKET_ACTION).is_none() {
            warn!("missing packet action attribute");
            return Err(Status::MandatoryAttributeMissing);
        }
        let port_id = match find_attr(attrs, fdb_attr::PORT_ID) {
            Some(attr) => attr.value.as_oid().ok_or(Status::InvalidParameter)?,
            None => {
                warn!("missing port id attribute");
                return Err(Status::MandatoryAttributeMissing);
            }
        };
        let port_ok = match port_id.object_type() {
            ObjectType::Port => state.is_port(port_id),
            ObjectType::Lag => state.lags.contains(&port_id),
            _ => false,
        };
        if !port_ok {
            warn!(%port_id, "port or lag is missing");
            return Err(Status::InvalidParameter);
        }

        let key = entry.to_string();
        if state.fdb_entries.contains(&key) {
            warn!(%key, "fdb entry already exists");
            return Err(Status::ItemAlreadyExists);
        }

        self.inner.push_create(ObjectType::FdbEntry, &key, attrs)?;
        debug!(%key, "inserting fdb entry to local state");
        state.fdb_entries.insert(key.clone());
        state
            .refs
            .acquire(&key, KEY_REF, vec![RefTarget::Vlan(entry.vlan_id)]);
        state
            .refs
            .acquire(&key, fdb_attr::PORT_ID, vec![RefTarget::Object(port_id)]);
        Ok(())
    }

    pub fn remove_fdb_entry(&self, entry: &FdbEntry) -> SaiResult<()> {
        let mut state = self.inner.state.lock().unwrap();
        let key = entry.to_string();
        if !state.fdb_entries.contains(&key) {
            warn!(%key, "fdb entry is missing");
            return Err(Status::InvalidParameter);
        }

        self.inner.push_remove(ObjectType::FdbEntry, &key)?;
        debug!(%key, "erasing fdb entry from local state");
        state.fdb_entries.remove(&key);
        state.refs.release_holder(&key);
        Ok(())
    }

    pub fn set_fdb_entry_attribute(&self, entry: &FdbEntry, attr: &Attribute) -> SaiResult<()> {
        let state = self.inner.state.lock().unwrap();
        let key = entry.to_string();
        if !state.fdb_entries.contains(&key) {
            warn!(%key, "fdb entry is missing");
            return Err(Status::InvalidParameter);
        }
        if !SETTABLE.contains(&attr.id) {
            warn!(id = attr.id, "setting attribute id is not supported");
            return Err(Status::InvalidParameter);
        }
        self.inner.push_set(ObjectType::FdbEntry, &key, attr)
    }

    pub fn get_fdb_entry_attribute(
        &self,
        entry: &FdbEntry,
        attrs: &mut [Attribute],
    ) -> SaiResult<()> {
        let state = self.inner.state.lock().unwrap();
        let key = entry.to_string();
        if !state.fdb_entries.contains(&key) {
            warn!(%key, "fdb entry is missing");
            return Err(Status::InvalidParameter);
        }
        check_gettable(attrs, GETTABLE)?;
        self.inner.get_attributes(ObjectType::FdbEntry, &key, attrs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support;
    use crate::state::DEFAULT_VLAN_ID;
    use sai_attr::Value;
    use sai_types::ObjectId;
    use pretty_assertions::assert_eq;

    fn full_attrs(port: ObjectId) -> Vec<Attribute> {
        vec![
            Attribute::new(fdb_attr::TYPE, Value::S32(0)),
            Attribute::oid(fdb_attr::PORT_ID, port),
            Attribute::new(fdb_attr::PACKET_ACTION, Value::S32(1)),
        ]
    }

    fn entry(vlan_id: u16) -> FdbEntry {
        FdbEntry::new("00:aa:bb:cc:dd:ee".parse().unwrap(), vlan_id)
    }

    #[test]
    fn test_create_requires_all_mandatory_attributes() {
        let (client, bus) = test_support::client();
        let port = ObjectId::pack(ObjectType::Port, 1);
        client.inner.state.lock().unwrap().ports.insert(port);

        assert_eq!(
            client.create_fdb_entry(&entry(DEFAULT_VLAN_ID), &[]),
            Err(Status::MandatoryAttributeMissing)
        );
        assert_eq!(test_support::next_request(&bus), None);

        client
            .create_fdb_entry(&entry(DEFAULT_VLAN_ID), &full_attrs(port))
            .unwrap();
        let message = test_support::next_request(&bus).unwrap();
        assert_eq!(message.key, format!("fdb-entry:{}", entry(DEFAULT_VLAN_ID)));
    }

    #[test]
    fn test_duplicate_and_remove() {
        let (client, _bus) = test_support::client();
        let port = ObjectId::pack(ObjectType::Port, 1);
        client.inner.state.lock().unwrap().ports.insert(port);

        let fdb = entry(DEFAULT_VLAN_ID);
        client.create_fdb_entry(&fdb, &full_attrs(port)).unwrap();
        assert_eq!(
            client.create_fdb_entry(&fdb, &full_attrs(port)),
            Err(Status::ItemAlreadyExists)
        );

        client.remove_fdb_entry(&fdb).unwrap();
        assert_eq!(client.remove_fdb_entry(&fdb), Err(Status::InvalidParameter));
    }

    #[test]
    fn test_create_rejects_unknown_vlan_or_port() {
        let (client, _bus) = test_support::client();
        let port = ObjectId::pack(ObjectType::Port, 1);

        // vlan 999 does not exist
        assert_eq!(
            client.create_fdb_entry(&entry(999), &full_attrs(port)),
            Err(Status::InvalidParameter)
        );
        // port not on the port list
        assert_eq!(
            client.create_fdb_entry(&entry(DEFAULT_VLAN_ID), &full_attrs(port)),
            Err(Status::InvalidParameter)
        );
    }
}
