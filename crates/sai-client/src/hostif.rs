//! Host interface, trap group, and trap operations.

use crate::client::{check_gettable, find_attr, SaiClient};
use crate::refs::RefTarget;
use sai_attr::enums::HostifType;
use sai_attr::ids::{hostif_attr, trap_attr, trap_group_attr, user_defined_trap_attr};
use sai_attr::Attribute;
use sai_types::{ObjectId, ObjectType, SaiResult, Status};
use tracing::{debug, warn};

/// Maximum host interface name length including the terminator byte.
const HOSTIF_NAME_SIZE: usize = 16;

const TRAP_GROUP_SETTABLE: &[u32] = &[
    trap_group_attr::ADMIN_STATE,
    trap_group_attr::QUEUE,
    trap_group_attr::POLICER,
];

const TRAP_GROUP_GETTABLE: &[u32] = &[
    trap_group_attr::ADMIN_STATE,
    trap_group_attr::PRIO,
    trap_group_attr::QUEUE,
    trap_group_attr::POLICER,
];

const TRAP_SETTABLE: &[u32] = &[
    trap_attr::TRAP_ACTION,
    trap_attr::TRAP_PRIORITY,
    trap_attr::TRAP_CHANNEL,
    trap_attr::FD,
    trap_attr::TRAP_GROUP,
];

const USER_TRAP_SETTABLE: &[u32] = &[
    user_defined_trap_attr::TRAP_CHANNEL,
    user_defined_trap_attr::FD,
    user_defined_trap_attr::TRAP_GROUP,
];

const HOSTIF_GETTABLE: &[u32] = &[
    hostif_attr::TYPE,
    hostif_attr::RIF_OR_PORT_ID,
    hostif_attr::NAME,
    hostif_attr::OPER_STATUS,
];

/// Traps are addressed by their trap id, carried as a null-kind object ref.
fn trap_ref(trap_id: u32) -> String {
    ObjectId::from_raw(u64::from(trap_id)).to_string()
}

impl SaiClient {
    pub fn create_hostif_trap_group(&self, attrs: &[Attribute]) -> SaiResult<ObjectId> {
        let mut state = self.inner.state.lock().unwrap();

        let mut policer_ref = None;
        if let Some(attr) = find_attr(attrs, trap_group_attr::POLICER) {
            let policer_id = attr.value.as_oid().ok_or(Status::InvalidParameter)?;
            if !policer_id.is_null() {
                if !state.policers.contains(&policer_id) {
                    warn!(%policer_id, "policer is missing");
                    return Err(Status::InvalidParameter);
                }
                policer_ref = Some(policer_id);
            }
        }

        let group_id = self.inner.allocate_vid(ObjectType::TrapGroup)?;
        self.inner
            .push_create(ObjectType::TrapGroup, &group_id.to_string(), attrs)?;
        debug!(%group_id, "inserting trap group to local state");
        state.trap_groups.insert(group_id);
        if let Some(policer_id) = policer_ref {
            state.refs.acquire(
                &group_id.to_string(),
                trap_group_attr::POLICER,
                vec![RefTarget::Object(policer_id)],
            );
        }
        Ok(group_id)
    }

    pub fn remove_hostif_trap_group(&self, group_id: ObjectId) -> SaiResult<()> {
        let mut state = self.inner.state.lock().unwrap();
        if !state.trap_groups.contains(&group_id) {
            warn!(%group_id, "trap group is missing");
            return Err(Status::InvalidParameter);
        }
        if state.refs.in_use(RefTarget::Object(group_id)) {
            warn!(%group_id, "trap group is referenced");
            return Err(Status::ObjectInUse);
        }

        self.inner
            .push_remove(ObjectType::TrapGroup, &group_id.to_string())?;
        debug!(%group_id, "erasing trap group from local state");
        state.trap_groups.remove(&group_id);
        state.refs.release_holder(&group_id.to_string());
        Ok(())
    }

    pub fn set_hostif_trap_group_attribute(
        &self,
        group_id: ObjectId,
        attr: &Attribute,
    ) -> SaiResult<()> {
        let mut state = self.inner.state.lock().unwrap();
        if !state.trap_groups.contains(&group_id) {
            warn!(%group_id, "trap group is missing");
            return Err(Status::InvalidParameter);
        }
        if !TRAP_GROUP_SETTABLE.contains(&attr.id) {
            warn!(id = attr.id, "setting attribute id is not supported");
            return Err(Status::InvalidParameter);
        }
        if attr.id == trap_group_attr::POLICER {
            let policer_id = attr.value.as_oid().ok_or(Status::InvalidParameter)?;
            if !policer_id.is_null() && !state.policers.contains(&policer_id) {
                warn!(%policer_id, "policer is missing");
                return Err(Status::InvalidParameter);
            }
            self.inner
                .push_set(ObjectType::TrapGroup, &group_id.to_string(), attr)?;
            state.refs.acquire(
                &group_id.to_string(),
                trap_group_attr::POLICER,
                vec![RefTarget::Object(policer_id)],
            );
            return Ok(());
        }
        self.inner
            .push_set(ObjectType::TrapGroup, &group_id.to_string(), attr)
    }

    pub fn get_hostif_trap_group_attribute(
        &self,
        group_id: ObjectId,
        attrs: &mut [Attribute],
    ) -> SaiResult<()> {
        let state = self.inner.state.lock().unwrap();
        if !state.is_trap_group(group_id) {
            warn!(%group_id, "trap group is missing");
            return Err(Status::InvalidParameter);
        }
        check_gettable(attrs, TRAP_GROUP_GETTABLE)?;
        self.inner
            .get_attributes(ObjectType::TrapGroup, &group_id.to_string(), attrs)
    }

    pub fn set_trap_attribute(&self, trap_id: u32, attr: &Attribute) -> SaiResult<()> {
        let state = self.inner.state.lock().unwrap();
        if !TRAP_SETTABLE.contains(&attr.id) {
            warn!(id = attr.id, "setting attribute id is not supported");
            return Err(Status::InvalidParameter);
        }
        if attr.id == trap_attr::TRAP_GROUP {
            let group_id = attr.value.as_oid().ok_or(Status::InvalidParameter)?;
            if !group_id.is_null() && !state.is_trap_group(group_id) {
                warn!(%group_id, "trap group is missing");
                return Err(Status::InvalidParameter);
            }
        }
        self.inner
            .push_set(ObjectType::Trap, &trap_ref(trap_id), attr)
    }

    pub fn get_trap_attribute(&self, trap_id: u32, attrs: &mut [Attribute]) -> SaiResult<()> {
        let _state = self.inner.state.lock().unwrap();
        check_gettable(attrs, TRAP_SETTABLE)?;
        self.inner
            .get_attributes(ObjectType::Trap, &trap_ref(trap_id), attrs)
    }

    pub fn set_user_defined_trap_attribute(&self, trap_id: u32, attr: &Attribute) -> SaiResult<()> {
        let state = self.inner.state.lock().unwrap();
        if !USER_TRAP_SETTABLE.contains(&attr.id) {
            warn!(id = attr.id, "setting attribute id is not supported");
            return Err(Status::InvalidParameter);
        }
        if attr.id == user_defined_trap_attr::TRAP_GROUP {
            let group_id = attr.value.as_oid().ok_or(Status::InvalidParameter)?;
            if !group_id.is_null() && !state.is_trap_group(group_id) {
                warn!(%group_id, "trap group is missing");
                return Err(Status::InvalidParameter);
            }
        }
        self.inner
            .push_set(ObjectType::UserDefinedTrap, &trap_ref(trap_id), attr)
    }

    pub fn get_user_defined_trap_attribute(
        &self,
        trap_id: u32,
        attrs: &mut [Attribute],
    ) -> SaiResult<()> {
        let _state = self.inner.state.lock().unwrap();
        check_gettable(attrs, USER_TRAP_SETTABLE)?;
        self.inner
            .get_attributes(ObjectType::UserDefinedTrap, &trap_ref(trap_id), attrs)
    }

    pub fn create_hostif(&self, attrs: &[Attribute]) -> SaiResult<ObjectId> {
        let mut state = self.inner.state.lock().unwrap();

        let hostif_type = match find_attr(attrs, hostif_attr::TYPE) {
            Some(attr) => {
                let raw = attr.value.as_s32().ok_or(Status::InvalidParameter)?;
                HostifType::from_i32(raw).ok_or_else(|| {
                    warn!(raw, "invalid host interface type");
                    Status::InvalidParameter
                })?
            }
            None => {
                warn!("missing type attribute");
                return Err(Status::MandatoryAttributeMissing);
            }
        };

        let mut refs: Vec<(u32, Vec<RefTarget>)> = Vec::new();
        match hostif_type {
            HostifType::Netdev => {
                let rif_or_port = match find_attr(attrs, hostif_attr::RIF_OR_PORT_ID) {
                    Some(attr) => attr.value.as_oid().ok_or(Status::InvalidParameter)?,
                    None => {
                        warn!("missing rif or port id attribute");
                        return Err(Status::MandatoryAttributeMissing);
                    }
                };
                if !state.is_port(rif_or_port) && !state.router_interfaces.contains(&rif_or_port) {
                    warn!(%rif_or_port, "rif or port is missing");
                    return Err(Status::InvalidParameter);
                }
                refs.push((hostif_attr::RIF_OR_PORT_ID, vec![RefTarget::Object(rif_or_port)]));
            }
            HostifType::Fd => {
                if find_attr(attrs, hostif_attr::NAME).is_none() {
                    warn!("missing name attribute");
                    return Err(Status::MandatoryAttributeMissing);
                }
            }
        }

        if let Some(attr) = find_attr(attrs, hostif_attr::NAME) {
            let name = attr.value.as_char_data().ok_or(Status::InvalidParameter)?;
            validate_hostif_name(name)?;
        }

        let hostif_id = self.inner.allocate_vid(ObjectType::Hostif)?;
        self.inner
            .push_create(ObjectType::Hostif, &hostif_id.to_string(), attrs)?;
        debug!(%hostif_id, "inserting host interface to local state");
        state.hostifs.insert(hostif_id);
        let holder = hostif_id.to_string();
        for (attr, targets) in refs {
            state.refs.acquire(&holder, attr, targets);
        }
        Ok(hostif_id)
    }

    pub fn remove_hostif(&self, hostif_id: ObjectId) -> SaiResult<()> {
        let mut state = self.inner.state.lock().unwrap();
        if !state.hostifs.contains(&hostif_id) {
            warn!(%hostif_id, "host interface is missing");
            return Err(Status::InvalidParameter);
        }

        self.inner
            .push_remove(ObjectType::Hostif, &hostif_id.to_string())?;
        debug!(%hostif_id, "erasing host interface from local state");
        state.hostifs.remove(&hostif_id);
        state.refs.release_holder(&hostif_id.to_string());
        Ok(())
    }

    pub fn set_hostif_attribute(&self, hostif_id: ObjectId, attr: &Attribute) -> SaiResult<()> {
        let state = self.inner.state.lock().unwrap();
        if !state.hostifs.contains(&hostif_id) {
            warn!(%hostif_id, "host interface is missing");
            return Err(Status::InvalidParameter);
        }
        if attr.id != hostif_attr::OPER_STATUS {
            warn!(id = attr.id, "setting attribute id is not supported");
            return Err(Status::InvalidParameter);
        }
        self.inner
            .push_set(ObjectType::Hostif, &hostif_id.to_string(), attr)
    }

    pub fn get_hostif_attribute(
        &self,
        hostif_id: ObjectId,
        attrs: &mut [Attribute],
    ) -> SaiResult<()> {
        let state = self.inner.state.lock().unwrap();
        if !state.hostifs.contains(&hostif_id) {
            warn!(%hostif_id, "host interface is missing");
            return Err(Status::InvalidParameter);
        }
        check_gettable(attrs, HOSTIF_GETTABLE)?;
        self.inner
            .get_attributes(ObjectType::Hostif, &hostif_id.to_string(), attrs)
    }
}

/// Names must fit the kernel buffer with its terminator and be printable
/// ASCII throughout.
fn validate_hostif_name(name: &str) -> SaiResult<()> {
    if name.is_empty() || name.len() > HOSTIF_NAME_SIZE - 1 {
        warn!(name, "invalid host interface name length");
        return Err(Status::InvalidParameter);
    }
    if !name.bytes().all(|b| (0x20..=0x7e).contains(&b)) {
        warn!(name, "host interface name must be printable ascii");
        return Err(Status::InvalidParameter);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support;
    use crate::policer::test_fixtures;
    use sai_attr::Value;
    use pretty_assertions::assert_eq;

    fn fd_hostif_attrs(name: &str) -> Vec<Attribute> {
        vec![
            Attribute::new(hostif_attr::TYPE, Value::S32(HostifType::Fd.as_i32())),
            Attribute::new(hostif_attr::NAME, Value::CharData(name.to_string())),
        ]
    }

    #[test]
    fn test_trap_group_policer_must_exist() {
        let (client, bus) = test_support::client();
        let ghost = ObjectId::pack(ObjectType::Policer, 0xdead);
        assert_eq!(
            client.create_hostif_trap_group(&[Attribute::oid(trap_group_attr::POLICER, ghost)]),
            Err(Status::InvalidParameter)
        );
        assert_eq!(test_support::next_request(&bus), None);

        // a null policer reference is fine
        client
            .create_hostif_trap_group(&[Attribute::oid(trap_group_attr::POLICER, ObjectId::NULL)])
            .unwrap();
    }

    #[test]
    fn test_trap_group_pins_policer() {
        let (client, _bus) = test_support::client();
        let policer = test_fixtures::packets_policer(&client);
        let group = client
            .create_hostif_trap_group(&[Attribute::oid(trap_group_attr::POLICER, policer)])
            .unwrap();

        assert_eq!(client.remove_policer(policer), Err(Status::ObjectInUse));
        client.remove_hostif_trap_group(group).unwrap();
        client.remove_policer(policer).unwrap();
    }

    #[test]
    fn test_trap_group_set_policer_swaps_reference() {
        let (client, _bus) = test_support::client();
        let old = test_fixtures::packets_policer(&client);
        let new = test_fixtures::packets_policer(&client);
        let group = client
            .create_hostif_trap_group(&[Attribute::oid(trap_group_attr::POLICER, old)])
            .unwrap();

        client
            .set_hostif_trap_group_attribute(group, &Attribute::oid(trap_group_attr::POLICER, new))
            .unwrap();
        client.remove_policer(old).unwrap();
        assert_eq!(client.remove_policer(new), Err(Status::ObjectInUse));
    }

    #[test]
    fn test_trap_set_validates_trap_group() {
        let (client, _bus) = test_support::client();
        let ghost = ObjectId::pack(ObjectType::TrapGroup, 0xdead);
        assert_eq!(
            client.set_trap_attribute(7, &Attribute::oid(trap_attr::TRAP_GROUP, ghost)),
            Err(Status::InvalidParameter)
        );

        let group = client.create_hostif_trap_group(&[]).unwrap();
        client
            .set_trap_attribute(7, &Attribute::oid(trap_attr::TRAP_GROUP, group))
            .unwrap();
    }

    #[test]
    fn test_hostif_name_validation() {
        let (client, _bus) = test_support::client();

        client.create_hostif(&fd_hostif_attrs("sw0")).unwrap();
        assert_eq!(
            client.create_hostif(&fd_hostif_attrs("")),
            Err(Status::InvalidParameter)
        );
        assert_eq!(
            client.create_hostif(&fd_hostif_attrs("a-name-that-is-too-long")),
            Err(Status::InvalidParameter)
        );
        assert_eq!(
            client.create_hostif(&fd_hostif_attrs("tab\tname")),
            Err(Status::InvalidParameter)
        );
    }

    #[test]
    fn test_netdev_requires_rif_or_port() {
        let (client, _bus) = test_support::client();
        let attrs = vec![Attribute::new(
            hostif_attr::TYPE,
            Value::S32(HostifType::Netdev.as_i32()),
        )];
        assert_eq!(
            client.create_hostif(&attrs),
            Err(Status::MandatoryAttributeMissing)
        );

        let ghost = ObjectId::pack(ObjectType::Port, 0xdead);
        let mut attrs = attrs;
        attrs.push(Attribute::oid(hostif_attr::RIF_OR_PORT_ID, ghost));
        assert_eq!(client.create_hostif(&attrs), Err(Status::InvalidParameter));

        let port = ObjectId::pack(ObjectType::Port, 1);
        client.inner.state.lock().unwrap().ports.insert(port);
        attrs.pop();
        attrs.push(Attribute::oid(hostif_attr::RIF_OR_PORT_ID, port));
        attrs.push(Attribute::new(
            hostif_attr::NAME,
            Value::CharData("swp1".to_string()),
        ));
        client.create_hostif(&attrs).unwrap();
    }
}
