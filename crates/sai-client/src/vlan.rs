//! VLAN and VLAN member operations.
//!
//! VLANs are identified by their `u16` number end to end; the bus object
//! ref is the decimal number, not a virtual id.

use crate::client::{check_gettable, find_attr, SaiClient};
use crate::refs::RefTarget;
use crate::state::DEFAULT_VLAN_ID;
use sai_attr::ids::{vlan_attr, vlan_member_attr};
use sai_attr::Attribute;
use sai_types::{ObjectId, ObjectType, SaiResult, Status};
use tracing::{debug, warn};

const MINIMUM_VLAN_ID: u16 = 1;
const MAXIMUM_VLAN_ID: u16 = 4094;

const SETTABLE: &[u32] = &[
    vlan_attr::MAX_LEARNED_ADDRESSES,
    vlan_attr::STP_INSTANCE,
    vlan_attr::LEARN_DISABLE,
    vlan_attr::META_DATA,
];

const GETTABLE: &[u32] = &[
    vlan_attr::MAX_LEARNED_ADDRESSES,
    vlan_attr::STP_INSTANCE,
    vlan_attr::LEARN_DISABLE,
    vlan_attr::META_DATA,
    vlan_attr::MEMBER_LIST,
];

const MEMBER_SETTABLE: &[u32] = &[vlan_member_attr::TAGGING_MODE];

const MEMBER_GETTABLE: &[u32] = &[
    vlan_member_attr::VLAN_ID,
    vlan_member_attr::PORT_ID,
    vlan_member_attr::TAGGING_MODE,
];

fn vlan_ref(vlan_id: u16) -> String {
    vlan_id.to_string()
}

impl SaiClient {
    pub fn create_vlan(&self, vlan_id: u16) -> SaiResult<()> {
        let mut state = self.inner.state.lock().unwrap();
        if state.vlans.contains(&vlan_id) {
            warn!(vlan_id, "vlan already exists");
            return Err(Status::InvalidParameter);
        }
        if !(MINIMUM_VLAN_ID..=MAXIMUM_VLAN_ID).contains(&vlan_id) {
            warn!(vlan_id, "invalid vlan number");
            return Err(Status::InvalidParameter);
        }

        self.inner
            .push_create(ObjectType::Vlan, &vlan_ref(vlan_id), &[])?;
        debug!(vlan_id, "inserting vlan to local state");
        state.vlans.insert(vlan_id);
        Ok(())
    }

    pub fn remove_vlan(&self, vlan_id: u16) -> SaiResult<()> {
        let mut state = self.inner.state.lock().unwrap();
        if vlan_id == DEFAULT_VLAN_ID {
            warn!(vlan_id, "default vlan can't be removed");
            return Err(Status::InvalidParameter);
        }
        if !state.vlans.contains(&vlan_id) {
            warn!(vlan_id, "vlan is missing");
            return Err(Status::InvalidParameter);
        }
        if state.refs.in_use(RefTarget::Vlan(vlan_id)) {
            warn!(vlan_id, "vlan is referenced");
            return Err(Status::ObjectInUse);
        }

        self.inner
            .push_remove(ObjectType::Vlan, &vlan_ref(vlan_id))?;
        debug!(vlan_id, "erasing vlan from local state");
        state.vlans.remove(&vlan_id);
        Ok(())
    }

    pub fn set_vlan_attribute(&self, vlan_id: u16, attr: &Attribute) -> SaiResult<()> {
        let state = self.inner.state.lock().unwrap();
        if !state.vlans.contains(&vlan_id) {
            warn!(vlan_id, "vlan is missing");
            return Err(Status::InvalidParameter);
        }
        if !SETTABLE.contains(&attr.id) {
            warn!(id = attr.id, "setting attribute id is not supported");
            return Err(Status::InvalidParameter);
        }
        self.inner
            .push_set(ObjectType::Vlan, &vlan_ref(vlan_id), attr)
    }

    pub fn get_vlan_attribute(&self, vlan_id: u16, attrs: &mut [Attribute]) -> SaiResult<()> {
        let state = self.inner.state.lock().unwrap();
        if !state.vlans.contains(&vlan_id) {
            warn!(vlan_id, "vlan is missing");
            return Err(Status::InvalidParameter);
        }
        check_gettable(attrs, GETTABLE)?;
        self.inner
            .get_attributes(ObjectType::Vlan, &vlan_ref(vlan_id), attrs)
    }

    pub fn create_vlan_member(&self, attrs: &[Attribute]) -> SaiResult<ObjectId> {
        let mut state = self.inner.state.lock().unwrap();

        let vlan_id = match find_attr(attrs, vlan_member_attr::VLAN_ID) {
            Some(attr) => attr.value.as_u16().ok_or(Status::InvalidParameter)?,
            None => {
                warn!("missing vlan id attribute");
                return Err(Status::MandatoryAttributeMissing);
            }
        };
        if !state.vlans.contains(&vlan_id) {
            warn!(vlan_id, "vlan is missing");
            return Err(Status::InvalidParameter);
        }

        let port_id = match find_attr(attrs, vlan_member_attr::PORT_ID) {
            Some(attr) => attr.value.as_oid().ok_or(Status::InvalidParameter)?,
            None => {
                warn!("missing port id attribute");
                return Err(Status::MandatoryAttributeMissing);
            }
        };
        if port_id.object_type() != ObjectType::Port || !state.is_port(port_id) {
            warn!(%port_id, "port is missing");
            return Err(Status::InvalidParameter);
        }

        let member_id = self.inner.allocate_vid(ObjectType::VlanMember)?;
        self.inner
            .push_create(ObjectType::VlanMember, &member_id.to_string(), attrs)?;
        debug!(%member_id, "inserting vlan member to local state");
        state.vlan_members.insert(member_id);
        let holder = member_id.to_string();
        state
            .refs
            .acquire(&holder, vlan_member_attr::VLAN_ID, vec![RefTarget::Vlan(vlan_id)]);
        state
            .refs
            .acquire(&holder, vlan_member_attr::PORT_ID, vec![RefTarget::Object(port_id)]);
        Ok(member_id)
    }

    pub fn remove_vlan_member(&self, member_id: ObjectId) -> SaiResult<()> {
        let mut state = self.inner.state.lock().unwrap();
        if !state.vlan_members.contains(&member_id) {
            warn!(%member_id, "vlan member is missing");
            return Err(Status::InvalidParameter);
        }

        self.inner
            .push_remove(ObjectType::VlanMember, &member_id.to_string())?;
        debug!(%member_id, "erasing vlan member from local state");
        state.vlan_members.remove(&member_id);
        state.refs.release_holder(&member_id.to_string());
        Ok(())
    }

    pub fn set_vlan_member_attribute(
        &self,
        member_id: ObjectId,
        attr: &Attribute,
    ) -> SaiResult<()> {
        let state = self.inner.state.lock().unwrap();
        if !state.vlan_members.contains(&member_id) {
            warn!(%member_id, "vlan member is missing");
            return Err(Status::InvalidParameter);
        }
        if !MEMBER_SETTABLE.contains(&attr.id) {
            warn!(id = attr.id, "setting attribute id is not supported");
            return Err(Status::InvalidParameter);
        }
        self.inner
            .push_set(ObjectType::VlanMember, &member_id.to_string(), attr)
    }

    pub fn get_vlan_member_attribute(
        &self,
        member_id: ObjectId,
        attrs: &mut [Attribute],
    ) -> SaiResult<()> {
        let state = self.inner.state.lock().unwrap();
        if !state.vlan_members.contains(&member_id) {
            warn!(%member_id, "vlan member is missing");
            return Err(Status::InvalidParameter);
        }
        check_gettable(attrs, MEMBER_GETTABLE)?;
        self.inner
            .get_attributes(ObjectType::VlanMember, &member_id.to_string(), attrs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support;
    use sai_attr::Value;
    use sai_bus::ops;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_create_validates_range_and_duplicates() {
        let (client, bus) = test_support::client();

        assert_eq!(client.create_vlan(0), Err(Status::InvalidParameter));
        assert_eq!(client.create_vlan(4095), Err(Status::InvalidParameter));
        // vlan 1 exists from bring-up
        assert_eq!(client.create_vlan(1), Err(Status::InvalidParameter));
        assert_eq!(test_support::next_request(&bus), None);

        client.create_vlan(100).unwrap();
        let message = test_support::next_request(&bus).unwrap();
        assert_eq!(message.key, "vlan:100");
        assert_eq!(message.op, ops::OP_CREATE);

        assert_eq!(client.create_vlan(100), Err(Status::InvalidParameter));
    }

    #[test]
    fn test_default_vlan_cannot_be_removed() {
        let (client, bus) = test_support::client();
        assert_eq!(client.remove_vlan(DEFAULT_VLAN_ID), Err(Status::InvalidParameter));
        assert_eq!(test_support::next_request(&bus), None);
    }

    #[test]
    fn test_remove_vlan() {
        let (client, bus) = test_support::client();
        client.create_vlan(200).unwrap();
        test_support::next_request(&bus);

        client.remove_vlan(200).unwrap();
        let message = test_support::next_request(&bus).unwrap();
        assert_eq!(message.op, ops::OP_REMOVE);
        assert_eq!(message.key, "vlan:200");
        assert!(!client.inner.state.lock().unwrap().vlans.contains(&200));
    }

    #[test]
    fn test_vlan_member_lifecycle_and_refcount() {
        let (client, bus) = test_support::client();
        client.create_vlan(300).unwrap();
        let port = ObjectId::pack(ObjectType::Port, 5);
        client.inner.state.lock().unwrap().ports.insert(port);

        let member = client
            .create_vlan_member(&[
                Attribute::new(vlan_member_attr::VLAN_ID, Value::U16(300)),
                Attribute::oid(vlan_member_attr::PORT_ID, port),
            ])
            .unwrap();
        assert_eq!(member.object_type(), ObjectType::VlanMember);

        // vlan referenced by member: remove refused
        assert_eq!(client.remove_vlan(300), Err(Status::ObjectInUse));

        client.remove_vlan_member(member).unwrap();
        client.remove_vlan(300).unwrap();

        // drain: vlan create, member create, member remove, vlan remove
        let ops_seen: Vec<String> = std::iter::from_fn(|| test_support::next_request(&bus))
            .map(|m| m.op)
            .collect();
        assert_eq!(ops_seen, vec!["create", "create", "remove", "remove"]);
    }

    #[test]
    fn test_vlan_member_requires_existing_vlan_and_port() {
        let (client, _bus) = test_support::client();
        let port = ObjectId::pack(ObjectType::Port, 5);

        assert_eq!(
            client.create_vlan_member(&[Attribute::oid(vlan_member_attr::PORT_ID, port)]),
            Err(Status::MandatoryAttributeMissing)
        );
        assert_eq!(
            client.create_vlan_member(&[
                Attribute::new(vlan_member_attr::VLAN_ID, Value::U16(999)),
                Attribute::oid(vlan_member_attr::PORT_ID, port),
            ]),
            Err(Status::InvalidParameter)
        );
        // port of the wrong kind is rejected by the vid's type bits
        let not_a_port = ObjectId::pack(ObjectType::Lag, 5);
        assert_eq!(
            client.create_vlan_member(&[
                Attribute::new(vlan_member_attr::VLAN_ID, Value::U16(DEFAULT_VLAN_ID)),
                Attribute::oid(vlan_member_attr::PORT_ID, not_a_port),
            ]),
            Err(Status::InvalidParameter)
        );
    }
}
