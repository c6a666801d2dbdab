//! Next hop group operations.

use crate::client::{check_gettable, find_attr, SaiClient};
use crate::refs::RefTarget;
use sai_attr::enums::NextHopGroupType;
use sai_attr::ids::next_hop_group_attr;
use sai_attr::Attribute;
use sai_types::{ObjectId, ObjectType, SaiResult, Status};
use std::collections::HashSet;
use tracing::{debug, warn};

const GETTABLE: &[u32] = &[
    next_hop_group_attr::NEXT_HOP_COUNT,
    next_hop_group_attr::TYPE,
    next_hop_group_attr::NEXT_HOP_LIST,
];

impl SaiClient {
    pub fn create_next_hop_group(&self, attrs: &[Attribute]) -> SaiResult<ObjectId> {
        let mut state = self.inner.state.lock().unwrap();

        match find_attr(attrs, next_hop_group_attr::TYPE) {
            Some(attr) => {
                let raw = attr.value.as_s32().ok_or(Status::InvalidParameter)?;
                if NextHopGroupType::from_i32(raw).is_none() {
                    warn!(raw, "invalid type attribute value");
                    return Err(Status::InvalidParameter);
                }
            }
            None => {
                warn!("missing type attribute");
                return Err(Status::MandatoryAttributeMissing);
            }
        }

        let next_hops = match find_attr(attrs, next_hop_group_attr::NEXT_HOP_LIST) {
            Some(attr) => attr
                .value
                .as_object_list()
                .ok_or(Status::InvalidParameter)?,
            None => {
                warn!("missing next hop list attribute");
                return Err(Status::MandatoryAttributeMissing);
            }
        };
        if next_hops.is_empty() {
            warn!("next hop list cannot be empty");
            return Err(Status::InvalidParameter);
        }

        let mut seen = HashSet::new();
        for next_hop in next_hops {
            if !state.next_hops.contains(next_hop) {
                warn!(%next_hop, "next hop is missing");
                return Err(Status::InvalidParameter);
            }
            if !seen.insert(*next_hop) {
                warn!(%next_hop, "duplicated next hop on list");
                return Err(Status::InvalidParameter);
            }
        }

        let group_id = self.inner.allocate_vid(ObjectType::NextHopGroup)?;
        self.inner
            .push_create(ObjectType::NextHopGroup, &group_id.to_string(), attrs)?;
        debug!(%group_id, "inserting next hop group to local state");
        state.next_hop_groups.insert(group_id);
        state.refs.acquire(
            &group_id.to_string(),
            next_hop_group_attr::NEXT_HOP_LIST,
            next_hops.iter().copied().map(RefTarget::Object).collect(),
        );
        Ok(group_id)
    }

    pub fn remove_next_hop_group(&self, group_id: ObjectId) -> SaiResult<()> {
        let mut state = self.inner.state.lock().unwrap();
        if !state.next_hop_groups.contains(&group_id) {
            warn!(%group_id, "next hop group is missing");
            return Err(Status::InvalidParameter);
        }
        if state.refs.in_use(RefTarget::Object(group_id)) {
            warn!(%group_id, "next hop group is referenced");
            return Err(Status::ObjectInUse);
        }

        self.inner
            .push_remove(ObjectType::NextHopGroup, &group_id.to_string())?;
        debug!(%group_id, "erasing next hop group from local state");
        state.next_hop_groups.remove(&group_id);
        state.refs.release_holder(&group_id.to_string());
        Ok(())
    }

    pub fn set_next_hop_group_attribute(
        &self,
        group_id: ObjectId,
        attr: &Attribute,
    ) -> SaiResult<()> {
        let state = self.inner.state.lock().unwrap();
        if !state.next_hop_groups.contains(&group_id) {
            warn!(%group_id, "next hop group is missing");
            return Err(Status::InvalidParameter);
        }
        warn!(id = attr.id, "setting attribute id is not supported");
        Err(Status::InvalidParameter)
    }

    pub fn get_next_hop_group_attribute(
        &self,
        group_id: ObjectId,
        attrs: &mut [Attribute],
    ) -> SaiResult<()> {
        let state = self.inner.state.lock().unwrap();
        if !state.next_hop_groups.contains(&group_id) {
            warn!(%group_id, "next hop group is missing");
            return Err(Status::InvalidParameter);
        }
        check_gettable(attrs, GETTABLE)?;
        self.inner
            .get_attributes(ObjectType::NextHopGroup, &group_id.to_string(), attrs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support;
    use crate::next_hop::test_fixtures;
    use sai_attr::Value;
    use pretty_assertions::assert_eq;

    fn group_attrs(next_hops: Vec<ObjectId>) -> Vec<Attribute> {
        vec![
            Attribute::new(
                next_hop_group_attr::TYPE,
                Value::S32(NextHopGroupType::Ecmp.as_i32()),
            ),
            Attribute::new(next_hop_group_attr::NEXT_HOP_LIST, Value::ObjectList(next_hops)),
        ]
    }

    #[test]
    fn test_empty_next_hop_list_rejected() {
        let (client, bus) = test_support::client();
        assert_eq!(
            client.create_next_hop_group(&group_attrs(vec![])),
            Err(Status::InvalidParameter)
        );
        assert_eq!(test_support::next_request(&bus), None);
    }

    #[test]
    fn test_duplicate_next_hop_rejected() {
        let (client, _bus) = test_support::client();
        let rif = test_fixtures::loopback_rif(&client);
        let next_hop = test_fixtures::ip_next_hop(&client, rif, "10.0.0.1");

        assert_eq!(
            client.create_next_hop_group(&group_attrs(vec![next_hop, next_hop])),
            Err(Status::InvalidParameter)
        );
    }

    #[test]
    fn test_create_remove_and_refcounts() {
        let (client, _bus) = test_support::client();
        let rif = test_fixtures::loopback_rif(&client);
        let hop_a = test_fixtures::ip_next_hop(&client, rif, "10.0.0.1");
        let hop_b = test_fixtures::ip_next_hop(&client, rif, "10.0.0.2");

        let group = client
            .create_next_hop_group(&group_attrs(vec![hop_a, hop_b]))
            .unwrap();
        assert_eq!(group.object_type(), ObjectType::NextHopGroup);

        // members are pinned while the group exists
        assert_eq!(client.remove_next_hop(hop_a), Err(Status::ObjectInUse));

        client.remove_next_hop_group(group).unwrap();
        client.remove_next_hop(hop_a).unwrap();
        client.remove_next_hop(hop_b).unwrap();
    }

    #[test]
    fn test_unknown_next_hop_rejected() {
        let (client, _bus) = test_support::client();
        let ghost = ObjectId::pack(ObjectType::NextHop, 0xdead);
        assert_eq!(
            client.create_next_hop_group(&group_attrs(vec![ghost])),
            Err(Status::InvalidParameter)
        );
    }
}
