//! Switch attribute operations and default-object discovery.

use crate::client::{check_gettable, find_attr, SaiClient};
use sai_attr::enums::{HashAlgorithm, PacketAction, SwitchingMode};
use sai_attr::ids::switch_attr;
use sai_attr::Attribute;
use sai_types::{ObjectId, ObjectType, SaiResult, Status};
use tracing::{error, info, warn};

/// The switch is not yet an addressable object; requests use the null ref.
fn switch_ref() -> String {
    ObjectId::NULL.to_string()
}

const GETTABLE: &[u32] = &[
    switch_attr::PORT_NUMBER,
    switch_attr::PORT_LIST,
    switch_attr::PORT_MAX_MTU,
    switch_attr::CPU_PORT,
    switch_attr::MAX_VIRTUAL_ROUTERS,
    switch_attr::FDB_TABLE_SIZE,
    switch_attr::OPER_STATUS,
    switch_attr::MAX_TEMP,
    switch_attr::DEFAULT_STP_INST_ID,
    switch_attr::DEFAULT_VIRTUAL_ROUTER_ID,
    switch_attr::DEFAULT_TRAP_GROUP,
    switch_attr::ECMP_HASH,
    switch_attr::LAG_HASH,
    switch_attr::SWITCHING_MODE,
    switch_attr::BCAST_CPU_FLOOD_ENABLE,
    switch_attr::MCAST_CPU_FLOOD_ENABLE,
    switch_attr::SRC_MAC_ADDRESS,
    switch_attr::MAX_LEARNED_ADDRESSES,
    switch_attr::FDB_AGING_TIME,
    switch_attr::FDB_UNICAST_MISS_ACTION,
    switch_attr::FDB_BROADCAST_MISS_ACTION,
    switch_attr::FDB_MULTICAST_MISS_ACTION,
    switch_attr::ECMP_DEFAULT_HASH_ALGORITHM,
    switch_attr::ECMP_DEFAULT_HASH_SEED,
    switch_attr::ECMP_DEFAULT_SYMMETRIC_HASH,
    switch_attr::LAG_DEFAULT_HASH_ALGORITHM,
    switch_attr::LAG_DEFAULT_HASH_SEED,
    switch_attr::LAG_DEFAULT_SYMMETRIC_HASH,
    switch_attr::COUNTER_REFRESH_INTERVAL,
];

impl SaiClient {
    pub fn set_switch_attribute(&self, attr: &Attribute) -> SaiResult<()> {
        let state = self.inner.state.lock().unwrap();
        if !state.switch_present {
            warn!("switch is missing");
            return Err(Status::InvalidParameter);
        }
        validate_switch_set(attr)?;
        self.inner
            .push_set(ObjectType::Switch, &switch_ref(), attr)
    }

    /// Gets switch attributes and records discovered default objects.
    ///
    /// The CPU port, default virtual router, default trap group, and port
    /// list can only be learned through this call. A second discovery that
    /// disagrees with the first is a protocol bug and fails the call.
    pub fn get_switch_attribute(&self, attrs: &mut [Attribute]) -> SaiResult<()> {
        let mut state = self.inner.state.lock().unwrap();
        if !state.switch_present {
            warn!("switch is missing");
            return Err(Status::InvalidParameter);
        }
        check_gettable(attrs, GETTABLE)?;

        self.inner
            .get_attributes(ObjectType::Switch, &switch_ref(), attrs)?;

        if let Some(attr) = find_attr(attrs, switch_attr::CPU_PORT) {
            if let Some(cpu_port) = attr.value.as_oid() {
                if !state.cpu_port.is_null() && state.cpu_port != cpu_port {
                    error!(previous = %state.cpu_port, current = %cpu_port, "cpu port id changed");
                    return Err(Status::Failure);
                }
                state.cpu_port = cpu_port;
                info!(%cpu_port, "got cpu port id");
            }
        }

        if let Some(attr) = find_attr(attrs, switch_attr::DEFAULT_VIRTUAL_ROUTER_ID) {
            if let Some(vr_id) = attr.value.as_oid() {
                if !state.default_virtual_router.is_null() && state.default_virtual_router != vr_id
                {
                    error!(
                        previous = %state.default_virtual_router,
                        current = %vr_id,
                        "default virtual router id changed"
                    );
                    return Err(Status::Failure);
                }
                state.default_virtual_router = vr_id;
                info!(%vr_id, "got default virtual router id");
            }
        }

        if let Some(attr) = find_attr(attrs, switch_attr::DEFAULT_TRAP_GROUP) {
            if let Some(trap_group) = attr.value.as_oid() {
                if !state.default_trap_group.is_null() && state.default_trap_group != trap_group {
                    error!(
                        previous = %state.default_trap_group,
                        current = %trap_group,
                        "default trap group id changed"
                    );
                    return Err(Status::Failure);
                }
                state.default_trap_group = trap_group;
            }
        }

        if let Some(attr) = find_attr(attrs, switch_attr::PORT_LIST) {
            if let Some(ports) = attr.value.as_object_list() {
                if state.ports.is_empty() {
                    state.ports.extend(ports.iter().copied());
                    info!(count = ports.len(), "got port list");
                } else {
                    for port in ports {
                        if !state.ports.contains(port) {
                            error!(%port, "port was not on the previous list");
                            return Err(Status::Failure);
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

fn validate_switch_set(attr: &Attribute) -> SaiResult<()> {
    match attr.id {
        switch_attr::SWITCHING_MODE => {
            let raw = attr.value.as_s32().ok_or(Status::InvalidParameter)?;
            if SwitchingMode::from_i32(raw).is_none() {
                warn!(raw, "invalid switching mode value");
                return Err(Status::InvalidParameter);
            }
        }
        switch_attr::FDB_UNICAST_MISS_ACTION
        | switch_attr::FDB_BROADCAST_MISS_ACTION
        | switch_attr::FDB_MULTICAST_MISS_ACTION => {
            let raw = attr.value.as_s32().ok_or(Status::InvalidParameter)?;
            if PacketAction::from_i32(raw).is_none() {
                warn!(raw, "invalid packet action value");
                return Err(Status::InvalidParameter);
            }
        }
        switch_attr::ECMP_DEFAULT_HASH_ALGORITHM | switch_attr::LAG_DEFAULT_HASH_ALGORITHM => {
            let raw = attr.value.as_s32().ok_or(Status::InvalidParameter)?;
            if HashAlgorithm::from_i32(raw).is_none() {
                warn!(raw, "invalid hash algorithm value");
                return Err(Status::InvalidParameter);
            }
        }
        switch_attr::BCAST_CPU_FLOOD_ENABLE
        | switch_attr::MCAST_CPU_FLOOD_ENABLE
        | switch_attr::SRC_MAC_ADDRESS
        | switch_attr::MAX_LEARNED_ADDRESSES
        | switch_attr::FDB_AGING_TIME
        | switch_attr::ECMP_DEFAULT_HASH_SEED
        | switch_attr::ECMP_DEFAULT_SYMMETRIC_HASH
        | switch_attr::LAG_DEFAULT_HASH_SEED
        | switch_attr::LAG_DEFAULT_SYMMETRIC_HASH
        | switch_attr::COUNTER_REFRESH_INTERVAL
        | switch_attr::PORT_BREAKOUT => {}
        id if id >= switch_attr::CUSTOM_RANGE_BASE => {}
        id => {
            warn!(id, "setting attribute id is not supported");
            return Err(Status::InvalidParameter);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support;
    use sai_attr::Value;
    use sai_bus::{ops, Bus, BusMessage, BusQueue};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_set_validates_enum_ranges() {
        let (client, bus) = test_support::client();

        let bad = Attribute::new(switch_attr::SWITCHING_MODE, Value::S32(42));
        assert_eq!(client.set_switch_attribute(&bad), Err(Status::InvalidParameter));
        assert_eq!(test_support::next_request(&bus), None);

        let good = Attribute::new(
            switch_attr::SWITCHING_MODE,
            Value::S32(SwitchingMode::StoreAndForward.as_i32()),
        );
        client.set_switch_attribute(&good).unwrap();
        let message = test_support::next_request(&bus).unwrap();
        assert_eq!(message.op, ops::OP_SET);
        assert_eq!(message.key, "switch:0000000000000000");
    }

    #[test]
    fn test_set_rejects_read_only_attribute() {
        let (client, bus) = test_support::client();
        let attr = Attribute::oid(switch_attr::CPU_PORT, ObjectId::NULL);
        assert_eq!(client.set_switch_attribute(&attr), Err(Status::InvalidParameter));
        assert_eq!(test_support::next_request(&bus), None);
    }

    #[test]
    fn test_get_discovers_defaults_and_rejects_mismatch() {
        let (client, bus) = test_support::client();
        let cpu_port = ObjectId::pack(ObjectType::Port, 99);

        // stage the daemon's reply before issuing the get
        let reply = sai_attr::codec::serialize_attrs(
            ObjectType::Switch,
            &[Attribute::oid(switch_attr::CPU_PORT, cpu_port)],
            false,
        )
        .unwrap();
        bus.push(
            BusQueue::GetResponse,
            BusMessage::new(Status::Success.to_wire(), ops::OP_GET_RESPONSE, reply),
        )
        .unwrap();

        let mut attrs = [Attribute::oid(switch_attr::CPU_PORT, ObjectId::NULL)];
        client.get_switch_attribute(&mut attrs).unwrap();
        assert_eq!(attrs[0].value, Value::ObjectId(cpu_port));
        assert_eq!(client.inner.state.lock().unwrap().cpu_port, cpu_port);

        // a second discovery returning a different id is a protocol bug
        let other = ObjectId::pack(ObjectType::Port, 100);
        let reply = sai_attr::codec::serialize_attrs(
            ObjectType::Switch,
            &[Attribute::oid(switch_attr::CPU_PORT, other)],
            false,
        )
        .unwrap();
        bus.push(
            BusQueue::GetResponse,
            BusMessage::new(Status::Success.to_wire(), ops::OP_GET_RESPONSE, reply),
        )
        .unwrap();

        let mut attrs = [Attribute::oid(switch_attr::CPU_PORT, ObjectId::NULL)];
        assert_eq!(client.get_switch_attribute(&mut attrs), Err(Status::Failure));
    }
}
