//! Router interface operations.

use crate::client::{check_gettable, find_attr, SaiClient};
use crate::refs::{RefTarget, KEY_REF};
use sai_attr::enums::RouterInterfaceType;
use sai_attr::ids::router_interface_attr;
use sai_attr::Attribute;
use sai_types::{ObjectId, ObjectType, SaiResult, Status};
use tracing::{debug, warn};

const SETTABLE: &[u32] = &[
    router_interface_attr::SRC_MAC_ADDRESS,
    router_interface_attr::ADMIN_V4_STATE,
    router_interface_attr::ADMIN_V6_STATE,
    router_interface_attr::MTU,
];

const GETTABLE: &[u32] = &[
    router_interface_attr::VIRTUAL_ROUTER_ID,
    router_interface_attr::TYPE,
    router_interface_attr::PORT_ID,
    router_interface_attr::VLAN_ID,
    router_interface_attr::SRC_MAC_ADDRESS,
    router_interface_attr::ADMIN_V4_STATE,
    router_interface_attr::ADMIN_V6_STATE,
    router_interface_attr::MTU,
];

impl SaiClient {
    pub fn create_router_interface(&self, attrs: &[Attribute]) -> SaiResult<ObjectId> {
        let mut state = self.inner.state.lock().unwrap();

        let vr_id = match find_attr(attrs, router_interface_attr::VIRTUAL_ROUTER_ID) {
            Some(attr) => attr.value.as_oid().ok_or(Status::InvalidParameter)?,
            None => {
                warn!("missing virtual router id attribute");
                return Err(Status::MandatoryAttributeMissing);
            }
        };
        if !state.is_virtual_router(vr_id) {
            warn!(%vr_id, "virtual router is missing");
            return Err(Status::InvalidParameter);
        }

        let rif_type = match find_attr(attrs, router_interface_attr::TYPE) {
            Some(attr) => {
                let raw = attr.value.as_s32().ok_or(Status::InvalidParameter)?;
                RouterInterfaceType::from_i32(raw).ok_or_else(|| {
                    warn!(raw, "invalid router interface type");
                    Status::InvalidParameter
                })?
            }
            None => {
                warn!("missing type attribute");
                return Err(Status::MandatoryAttributeMissing);
            }
        };

        let mut refs: Vec<(u32, Vec<RefTarget>)> = vec![(KEY_REF, vec![RefTarget::Object(vr_id)])];
        match rif_type {
            RouterInterfaceType::Port => {
                let port_id = match find_attr(attrs, router_interface_attr::PORT_ID) {
                    Some(attr) => attr.value.as_oid().ok_or(Status::InvalidParameter)?,
                    None => {
                        warn!("missing port id attribute");
                        return Err(Status::MandatoryAttributeMissing);
                    }
                };
                match port_id.object_type() {
                    ObjectType::Port if state.is_port(port_id) => {}
                    ObjectType::Lag if state.lags.contains(&port_id) => {}
                    _ => {
                        warn!(%port_id, "port or lag is missing");
                        return Err(Status::InvalidParameter);
                    }
                }
                refs.push((router_interface_attr::PORT_ID, vec![RefTarget::Object(port_id)]));
            }
            RouterInterfaceType::Vlan => {
                let vlan_id = match find_attr(attrs, router_interface_attr::VLAN_ID) {
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
                refs.push((router_interface_attr::VLAN_ID, vec![RefTarget::Vlan(vlan_id)]));
            }
            RouterInterfaceType::Loopback => {}
        }

        let rif_id = self.inner.allocate_vid(ObjectType::RouterInterface)?;
        self.inner
            .push_create(ObjectType::RouterInterface, &rif_id.to_string(), attrs)?;
        debug!(%rif_id, "inserting router interface to local state");
        state.router_interfaces.insert(rif_id);
        let holder = rif_id.to_string();
        for (attr, targets) in refs {
            state.refs.acquire(&holder, attr, targets);
        }
        Ok(rif_id)
    }

    pub fn remove_router_interface(&self, rif_id: ObjectId) -> SaiResult<()> {
        let mut state = self.inner.state.lock().unwrap();
        if !state.router_interfaces.contains(&rif_id) {
            warn!(%rif_id, "router interface is missing");
            return Err(Status::InvalidParameter);
        }
        if state.refs.in_use(RefTarget::Object(rif_id)) {
            warn!(%rif_id, "router interface is referenced");
            return Err(Status::ObjectInUse);
        }

        self.inner
            .push_remove(ObjectType::RouterInterface, &rif_id.to_string())?;
        debug!(%rif_id, "erasing router interface from local state");
        state.router_interfaces.remove(&rif_id);
        state.refs.release_holder(&rif_id.to_string());
        Ok(())
    }

    pub fn set_router_interface_attribute(
        &self,
        rif_id: ObjectId,
        attr: &Attribute,
    ) -> SaiResult<()> {
        let state = self.inner.state.lock().unwrap();
        if !state.router_interfaces.contains(&rif_id) {
            warn!(%rif_id, "router interface is missing");
            return Err(Status::InvalidParameter);
        }
        // create-only attributes cannot be rewritten
        if !SETTABLE.contains(&attr.id) {
            warn!(id = attr.id, "setting attribute id is not supported");
            return Err(Status::InvalidParameter);
        }
        self.inner
            .push_set(ObjectType::RouterInterface, &rif_id.to_string(), attr)
    }

    pub fn get_router_interface_attribute(
        &self,
        rif_id: ObjectId,
        attrs: &mut [Attribute],
    ) -> SaiResult<()> {
        let state = self.inner.state.lock().unwrap();
        if !state.router_interfaces.contains(&rif_id) {
            warn!(%rif_id, "router interface is missing");
            return Err(Status::InvalidParameter);
        }
        check_gettable(attrs, GETTABLE)?;
        self.inner
            .get_attributes(ObjectType::RouterInterface, &rif_id.to_string(), attrs)
    }
}
