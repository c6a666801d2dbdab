//! Port attribute operations.
//!
//! Ports are discovered via the switch port list; they are never created
//! or removed through this API.

use crate::client::{check_gettable, SaiClient};
use sai_attr::enums::FdbLearningMode;
use sai_attr::ids::port_attr;
use sai_attr::Attribute;
use sai_types::{ObjectId, ObjectType, SaiResult, Status};
use tracing::warn;

/// Speeds the hardware family actually supports, in Mb/s.
const SUPPORTED_SPEEDS: &[u32] = &[1_000, 10_000, 25_000, 40_000, 50_000, 100_000];

const GETTABLE: &[u32] = &[
    port_attr::TYPE,
    port_attr::OPER_STATUS,
    port_attr::HW_LANE_LIST,
    port_attr::SPEED,
    port_attr::ADMIN_STATE,
    port_attr::PORT_VLAN_ID,
    port_attr::FDB_LEARNING,
    port_attr::MTU,
];

impl SaiClient {
    pub fn set_port_attribute(&self, port_id: ObjectId, attr: &Attribute) -> SaiResult<()> {
        let state = self.inner.state.lock().unwrap();
        if !state.is_port(port_id) {
            warn!(%port_id, "port is missing");
            return Err(Status::InvalidParameter);
        }

        match attr.id {
            port_attr::SPEED => {
                let speed = attr.value.as_u32().ok_or(Status::InvalidParameter)?;
                if !SUPPORTED_SPEEDS.contains(&speed) {
                    warn!(speed, "unsupported port speed");
                    return Err(Status::InvalidParameter);
                }
            }
            port_attr::PORT_VLAN_ID => {
                let vlan_id = attr.value.as_u16().ok_or(Status::InvalidParameter)?;
                if !state.vlans.contains(&vlan_id) {
                    warn!(vlan_id, "vlan is missing");
                    return Err(Status::InvalidParameter);
                }
            }
            port_attr::FDB_LEARNING => {
                let raw = attr.value.as_s32().ok_or(Status::InvalidParameter)?;
                if FdbLearningMode::from_i32(raw).is_none() {
                    warn!(raw, "invalid fdb learning mode");
                    return Err(Status::InvalidParameter);
                }
            }
            port_attr::ADMIN_STATE
            | port_attr::MTU
            | port_attr::QOS_DSCP_TO_TC_MAP
            | port_attr::QOS_TC_TO_QUEUE_MAP
            | port_attr::QOS_TC_TO_PRIORITY_GROUP_MAP
            | port_attr::QOS_PFC_PRIORITY_TO_PRIORITY_GROUP_MAP
            | port_attr::QOS_PFC_PRIORITY_TO_QUEUE_MAP
            | port_attr::PRIORITY_FLOW_CONTROL => {}
            id => {
                warn!(id, "setting attribute id is not supported");
                return Err(Status::InvalidParameter);
            }
        }

        self.inner
            .push_set(ObjectType::Port, &port_id.to_string(), attr)
    }

    pub fn get_port_attribute(&self, port_id: ObjectId, attrs: &mut [Attribute]) -> SaiResult<()> {
        let state = self.inner.state.lock().unwrap();
        if !state.is_port(port_id) {
            warn!(%port_id, "port is missing");
            return Err(Status::InvalidParameter);
        }
        check_gettable(attrs, GETTABLE)?;
        self.inner
            .get_attributes(ObjectType::Port, &port_id.to_string(), attrs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support;
    use crate::state::DEFAULT_VLAN_ID;
    use sai_attr::Value;
    use pretty_assertions::assert_eq;

    fn known_port(client: &SaiClient) -> ObjectId {
        let port = ObjectId::pack(ObjectType::Port, 1);
        client.inner.state.lock().unwrap().ports.insert(port);
        port
    }

    #[test]
    fn test_set_rejects_unknown_port() {
        let (client, bus) = test_support::client();
        let ghost = ObjectId::pack(ObjectType::Port, 0xdead);
        assert_eq!(
            client.set_port_attribute(
                ghost,
                &Attribute::new(port_attr::ADMIN_STATE, Value::Bool(true))
            ),
            Err(Status::InvalidParameter)
        );
        assert_eq!(test_support::next_request(&bus), None);
    }

    #[test]
    fn test_speed_whitelist() {
        let (client, _bus) = test_support::client();
        let port = known_port(&client);

        assert_eq!(
            client.set_port_attribute(port, &Attribute::new(port_attr::SPEED, Value::U32(12_345))),
            Err(Status::InvalidParameter)
        );
        client
            .set_port_attribute(port, &Attribute::new(port_attr::SPEED, Value::U32(100_000)))
            .unwrap();
    }

    #[test]
    fn test_port_vlan_must_exist() {
        let (client, _bus) = test_support::client();
        let port = known_port(&client);

        assert_eq!(
            client.set_port_attribute(
                port,
                &Attribute::new(port_attr::PORT_VLAN_ID, Value::U16(999))
            ),
            Err(Status::InvalidParameter)
        );
        client
            .set_port_attribute(
                port,
                &Attribute::new(port_attr::PORT_VLAN_ID, Value::U16(DEFAULT_VLAN_ID)),
            )
            .unwrap();
    }

    #[test]
    fn test_fdb_learning_mode_range() {
        let (client, _bus) = test_support::client();
        let port = known_port(&client);

        assert_eq!(
            client.set_port_attribute(
                port,
                &Attribute::new(port_attr::FDB_LEARNING, Value::S32(99))
            ),
            Err(Status::InvalidParameter)
        );
        client
            .set_port_attribute(
                port,
                &Attribute::new(
                    port_attr::FDB_LEARNING,
                    Value::S32(FdbLearningMode::Hw.as_i32()),
                ),
            )
            .unwrap();
    }
}
