//! Virtual router operations.

use crate::client::{check_gettable, SaiClient};
use crate::refs::RefTarget;
use sai_attr::ids::virtual_router_attr;
use sai_attr::Attribute;
use sai_types::{ObjectId, ObjectType, SaiResult, Status};
use tracing::{debug, warn};

const SETTABLE: &[u32] = &[
    virtual_router_attr::ADMIN_V4_STATE,
    virtual_router_attr::ADMIN_V6_STATE,
    virtual_router_attr::SRC_MAC_ADDRESS,
    virtual_router_attr::VIOLATION_TTL1_ACTION,
    virtual_router_attr::VIOLATION_IP_OPTIONS,
];

impl SaiClient {
    pub fn create_virtual_router(&self, attrs: &[Attribute]) -> SaiResult<ObjectId> {
        let mut state = self.inner.state.lock().unwrap();
        for attr in attrs {
            if !SETTABLE.contains(&attr.id) {
                warn!(id = attr.id, "unsupported virtual router attribute");
                return Err(Status::InvalidParameter);
            }
        }

        let vr_id = self.inner.allocate_vid(ObjectType::VirtualRouter)?;
        self.inner
            .push_create(ObjectType::VirtualRouter, &vr_id.to_string(), attrs)?;
        debug!(%vr_id, "inserting virtual router to local state");
        state.virtual_routers.insert(vr_id);
        Ok(vr_id)
    }

    pub fn remove_virtual_router(&self, vr_id: ObjectId) -> SaiResult<()> {
        let mut state = self.inner.state.lock().unwrap();
        if !state.virtual_routers.contains(&vr_id) {
            if !state.default_virtual_router.is_null() && vr_id == state.default_virtual_router {
                warn!(%vr_id, "default virtual router cannot be removed");
            } else {
                warn!(%vr_id, "virtual router is missing");
            }
            return Err(Status::InvalidParameter);
        }
        if state.refs.in_use(RefTarget::Object(vr_id)) {
            warn!(%vr_id, "virtual router is referenced");
            return Err(Status::ObjectInUse);
        }

        self.inner
            .push_remove(ObjectType::VirtualRouter, &vr_id.to_string())?;
        debug!(%vr_id, "erasing virtual router from local state");
        state.virtual_routers.remove(&vr_id);
        state.refs.release_holder(&vr_id.to_string());
        Ok(())
    }

    pub fn set_virtual_router_attribute(&self, vr_id: ObjectId, attr: &Attribute) -> SaiResult<()> {
        let state = self.inner.state.lock().unwrap();
        if !state.is_virtual_router(vr_id) {
            warn!(%vr_id, "virtual router is missing");
            return Err(Status::InvalidParameter);
        }
        if !SETTABLE.contains(&attr.id) {
            warn!(id = attr.id, "setting attribute id is not supported");
            return Err(Status::InvalidParameter);
        }
        self.inner
            .push_set(ObjectType::VirtualRouter, &vr_id.to_string(), attr)
    }

    pub fn get_virtual_router_attribute(
        &self,
        vr_id: ObjectId,
        attrs: &mut [Attribute],
    ) -> SaiResult<()> {
        let state = self.inner.state.lock().unwrap();
        if !state.is_virtual_router(vr_id) {
            warn!(%vr_id, "virtual router is missing");
            return Err(Status::InvalidParameter);
        }
        check_gettable(attrs, SETTABLE)?;
        self.inner
            .get_attributes(ObjectType::VirtualRouter, &vr_id.to_string(), attrs)
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
    fn test_create_then_remove() {
        let (client, bus) = test_support::client();

        let vr_id = client.create_virtual_router(&[]).unwrap();
        assert_eq!(vr_id.object_type(), ObjectType::VirtualRouter);
        assert!(client.inner.state.lock().unwrap().virtual_routers.contains(&vr_id));

        let message = test_support::next_request(&bus).unwrap();
        assert_eq!(message.op, ops::OP_CREATE);
        assert_eq!(message.key, format!("virtual-router:{vr_id}"));

        client.remove_virtual_router(vr_id).unwrap();
        assert!(client.inner.state.lock().unwrap().virtual_routers.is_empty());

        let message = test_support::next_request(&bus).unwrap();
        assert_eq!(message.op, ops::OP_REMOVE);
        assert_eq!(message.key, format!("virtual-router:{vr_id}"));
    }

    #[test]
    fn test_remove_missing_is_rejected_without_bus_traffic() {
        let (client, bus) = test_support::client();
        let ghost = ObjectId::pack(ObjectType::VirtualRouter, 0xdead);
        assert_eq!(client.remove_virtual_router(ghost), Err(Status::InvalidParameter));
        assert_eq!(test_support::next_request(&bus), None);
    }

    #[test]
    fn test_default_virtual_router_cannot_be_removed() {
        let (client, bus) = test_support::client();
        let default_vr = ObjectId::pack(ObjectType::VirtualRouter, 1);
        client.inner.state.lock().unwrap().default_virtual_router = default_vr;

        assert_eq!(
            client.remove_virtual_router(default_vr),
            Err(Status::InvalidParameter)
        );
        assert_eq!(test_support::next_request(&bus), None);
    }

    #[test]
    fn test_set_checks_virtual_router_index() {
        let (client, _bus) = test_support::client();
        let vr_id = client.create_virtual_router(&[]).unwrap();

        let attr = Attribute::new(virtual_router_attr::ADMIN_V4_STATE, Value::Bool(true));
        client.set_virtual_router_attribute(vr_id, &attr).unwrap();

        let ghost = ObjectId::pack(ObjectType::VirtualRouter, 0xdead);
        assert_eq!(
            client.set_virtual_router_attribute(ghost, &attr),
            Err(Status::InvalidParameter)
        );
    }

    #[test]
    fn test_set_on_default_virtual_router_is_allowed() {
        let (client, _bus) = test_support::client();
        let default_vr = ObjectId::pack(ObjectType::VirtualRouter, 7);
        client.inner.state.lock().unwrap().default_virtual_router = default_vr;

        let attr = Attribute::new(virtual_router_attr::ADMIN_V6_STATE, Value::Bool(false));
        client
            .set_virtual_router_attribute(default_vr, &attr)
            .unwrap();
    }
}
