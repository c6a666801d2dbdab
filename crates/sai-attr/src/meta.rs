//! Per-(kind, attribute) serialization-type metadata.
//!
//! The codec, the object-id rewriter, and the daemon's translation pass are
//! all driven by this single lookup. A missing entry means the attribute is
//! unknown to the adapter: a user error at the library boundary, a fatal
//! protocol error at the daemon boundary.

use crate::ids::*;
use crate::{CodecError, Value};
use sai_types::ObjectType;

/// How an attribute value is represented on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SerializationType {
    Bool,
    U8,
    U16,
    U32,
    U64,
    S32,
    S64,
    Mac,
    Ipv4,
    Ipv6,
    IpAddress,
    IpPrefix,
    CharData,
    ObjectId,
    ObjectList,
    U32List,
    S32List,
    AclFieldData,
    AclFieldObjectId,
    AclFieldObjectList,
    AclActionData,
    AclActionObjectId,
    AclActionObjectList,
    PortBreakout,
    QosMapList,
    TunnelMapList,
}

impl SerializationType {
    /// Returns true for types whose value carries an element count.
    pub fn is_list(self) -> bool {
        matches!(
            self,
            SerializationType::ObjectList
                | SerializationType::U32List
                | SerializationType::S32List
                | SerializationType::AclFieldObjectList
                | SerializationType::AclActionObjectList
                | SerializationType::PortBreakout
                | SerializationType::QosMapList
                | SerializationType::TunnelMapList
        )
    }

    /// Returns true if `value` carries the variant this type requires.
    pub fn matches(self, value: &Value) -> bool {
        use SerializationType as T;
        match (self, value) {
            (T::Bool, Value::Bool(_)) => true,
            (T::U8, Value::U8(_)) => true,
            (T::U16, Value::U16(_)) => true,
            (T::U32, Value::U32(_)) => true,
            (T::U64, Value::U64(_)) => true,
            (T::S32, Value::S32(_)) => true,
            (T::S64, Value::S64(_)) => true,
            (T::Mac, Value::Mac(_)) => true,
            (T::Ipv4, Value::Ipv4(_)) => true,
            (T::Ipv6, Value::Ipv6(_)) => true,
            (T::IpAddress, Value::IpAddress(_)) => true,
            (T::IpPrefix, Value::IpPrefix(_)) => true,
            (T::CharData, Value::CharData(_)) => true,
            (T::ObjectId, Value::ObjectId(_)) => true,
            (T::ObjectList, Value::ObjectList(_)) => true,
            (T::U32List, Value::U32List(_)) => true,
            (T::S32List, Value::S32List(_)) => true,
            (T::AclFieldData, Value::AclField(f)) => matches!(f.data, crate::AclData::U64(_)),
            (T::AclFieldObjectId, Value::AclField(f)) => {
                matches!(f.data, crate::AclData::ObjectId(_))
            }
            (T::AclFieldObjectList, Value::AclField(f)) => {
                matches!(f.data, crate::AclData::ObjectList(_))
            }
            (T::AclActionData, Value::AclAction(a)) => {
                matches!(a.parameter, crate::AclData::U64(_))
            }
            (T::AclActionObjectId, Value::AclAction(a)) => {
                matches!(a.parameter, crate::AclData::ObjectId(_))
            }
            (T::AclActionObjectList, Value::AclAction(a)) => {
                matches!(a.parameter, crate::AclData::ObjectList(_))
            }
            (T::PortBreakout, Value::PortBreakout(_)) => true,
            (T::QosMapList, Value::QosMapList(_)) => true,
            (T::TunnelMapList, Value::TunnelMapList(_)) => true,
            _ => false,
        }
    }
}

/// Looks up the serialization type of `(kind, attr_id)`.
pub fn serialization_type(kind: ObjectType, id: u32) -> Option<SerializationType> {
    use SerializationType as T;
    let ty = match kind {
        ObjectType::Switch => match id {
            switch_attr::PORT_NUMBER => T::U32,
            switch_attr::PORT_LIST => T::ObjectList,
            switch_attr::PORT_MAX_MTU => T::U32,
            switch_attr::CPU_PORT => T::ObjectId,
            switch_attr::MAX_VIRTUAL_ROUTERS => T::U32,
            switch_attr::FDB_TABLE_SIZE => T::U32,
            switch_attr::OPER_STATUS => T::S32,
            switch_attr::MAX_TEMP => T::S32,
            switch_attr::DEFAULT_STP_INST_ID => T::ObjectId,
            switch_attr::DEFAULT_VIRTUAL_ROUTER_ID => T::ObjectId,
            switch_attr::DEFAULT_TRAP_GROUP => T::ObjectId,
            switch_attr::ECMP_HASH | switch_attr::LAG_HASH => T::ObjectId,
            switch_attr::SWITCHING_MODE => T::S32,
            switch_attr::BCAST_CPU_FLOOD_ENABLE | switch_attr::MCAST_CPU_FLOOD_ENABLE => T::Bool,
            switch_attr::SRC_MAC_ADDRESS => T::Mac,
            switch_attr::MAX_LEARNED_ADDRESSES => T::U32,
            switch_attr::FDB_AGING_TIME => T::U32,
            switch_attr::FDB_UNICAST_MISS_ACTION
            | switch_attr::FDB_BROADCAST_MISS_ACTION
            | switch_attr::FDB_MULTICAST_MISS_ACTION => T::S32,
            switch_attr::ECMP_DEFAULT_HASH_ALGORITHM | switch_attr::LAG_DEFAULT_HASH_ALGORITHM => {
                T::S32
            }
            switch_attr::ECMP_DEFAULT_HASH_SEED | switch_attr::LAG_DEFAULT_HASH_SEED => T::U32,
            switch_attr::ECMP_DEFAULT_SYMMETRIC_HASH | switch_attr::LAG_DEFAULT_SYMMETRIC_HASH => {
                T::Bool
            }
            switch_attr::COUNTER_REFRESH_INTERVAL => T::U32,
            switch_attr::PORT_BREAKOUT => T::PortBreakout,
            id if id >= switch_attr::CUSTOM_RANGE_BASE => T::S32,
            _ => return None,
        },
        ObjectType::Port => match id {
            port_attr::TYPE | port_attr::OPER_STATUS | port_attr::FDB_LEARNING => T::S32,
            port_attr::HW_LANE_LIST => T::U32List,
            port_attr::SPEED | port_attr::MTU => T::U32,
            port_attr::ADMIN_STATE => T::Bool,
            port_attr::PORT_VLAN_ID => T::U16,
            port_attr::QOS_DSCP_TO_TC_MAP
            | port_attr::QOS_TC_TO_QUEUE_MAP
            | port_attr::QOS_TC_TO_PRIORITY_GROUP_MAP
            | port_attr::QOS_PFC_PRIORITY_TO_PRIORITY_GROUP_MAP
            | port_attr::QOS_PFC_PRIORITY_TO_QUEUE_MAP => T::ObjectId,
            port_attr::PRIORITY_FLOW_CONTROL => T::U8,
            _ => return None,
        },
        ObjectType::VirtualRouter => match id {
            virtual_router_attr::ADMIN_V4_STATE | virtual_router_attr::ADMIN_V6_STATE => T::Bool,
            virtual_router_attr::SRC_MAC_ADDRESS => T::Mac,
            virtual_router_attr::VIOLATION_TTL1_ACTION
            | virtual_router_attr::VIOLATION_IP_OPTIONS => T::S32,
            _ => return None,
        },
        ObjectType::RouterInterface => match id {
            router_interface_attr::VIRTUAL_ROUTER_ID | router_interface_attr::PORT_ID => {
                T::ObjectId
            }
            router_interface_attr::TYPE => T::S32,
            router_interface_attr::VLAN_ID => T::U16,
            router_interface_attr::SRC_MAC_ADDRESS => T::Mac,
            router_interface_attr::ADMIN_V4_STATE | router_interface_attr::ADMIN_V6_STATE => {
                T::Bool
            }
            router_interface_attr::MTU => T::U32,
            _ => return None,
        },
        ObjectType::NextHop => match id {
            next_hop_attr::TYPE => T::S32,
            next_hop_attr::IP => T::IpAddress,
            next_hop_attr::ROUTER_INTERFACE_ID | next_hop_attr::TUNNEL_ID => T::ObjectId,
            _ => return None,
        },
        ObjectType::NextHopGroup => match id {
            next_hop_group_attr::NEXT_HOP_COUNT => T::U32,
            next_hop_group_attr::TYPE => T::S32,
            next_hop_group_attr::NEXT_HOP_LIST => T::ObjectList,
            _ => return None,
        },
        ObjectType::RouteEntry => match id {
            route_attr::PACKET_ACTION => T::S32,
            route_attr::TRAP_PRIORITY => T::U8,
            route_attr::NEXT_HOP_ID => T::ObjectId,
            route_attr::META_DATA => T::U32,
            _ => return None,
        },
        ObjectType::NeighborEntry => match id {
            neighbor_attr::DST_MAC_ADDRESS => T::Mac,
            neighbor_attr::PACKET_ACTION => T::S32,
            neighbor_attr::NO_HOST_ROUTE => T::Bool,
            neighbor_attr::META_DATA => T::U32,
            _ => return None,
        },
        ObjectType::FdbEntry => match id {
            fdb_attr::TYPE | fdb_attr::PACKET_ACTION => T::S32,
            fdb_attr::PORT_ID => T::ObjectId,
            fdb_attr::META_DATA => T::U32,
            _ => return None,
        },
        ObjectType::Vlan => match id {
            vlan_attr::MAX_LEARNED_ADDRESSES => T::U32,
            vlan_attr::STP_INSTANCE => T::ObjectId,
            vlan_attr::LEARN_DISABLE => T::Bool,
            vlan_attr::META_DATA => T::U32,
            vlan_attr::MEMBER_LIST => T::ObjectList,
            _ => return None,
        },
        ObjectType::VlanMember => match id {
            vlan_member_attr::VLAN_ID => T::U16,
            vlan_member_attr::PORT_ID => T::ObjectId,
            vlan_member_attr::TAGGING_MODE => T::S32,
            _ => return None,
        },
        ObjectType::Lag => match id {
            lag_attr::PORT_LIST => T::ObjectList,
            _ => return None,
        },
        ObjectType::LagMember => match id {
            lag_member_attr::LAG_ID | lag_member_attr::PORT_ID => T::ObjectId,
            lag_member_attr::EGRESS_DISABLE | lag_member_attr::INGRESS_DISABLE => T::Bool,
            _ => return None,
        },
        ObjectType::Policer => match id {
            policer_attr::METER_TYPE
            | policer_attr::MODE
            | policer_attr::COLOR_SOURCE
            | policer_attr::GREEN_PACKET_ACTION
            | policer_attr::YELLOW_PACKET_ACTION
            | policer_attr::RED_PACKET_ACTION => T::S32,
            policer_attr::CBS | policer_attr::CIR | policer_attr::PBS | policer_attr::PIR => {
                T::U64
            }
            policer_attr::ENABLE_COUNTER_LIST => T::S32List,
            _ => return None,
        },
        ObjectType::TrapGroup => match id {
            trap_group_attr::ADMIN_STATE => T::Bool,
            trap_group_attr::PRIO | trap_group_attr::QUEUE => T::U32,
            trap_group_attr::POLICER => T::ObjectId,
            _ => return None,
        },
        ObjectType::Trap => match id {
            trap_attr::TRAP_ACTION | trap_attr::TRAP_CHANNEL => T::S32,
            trap_attr::TRAP_PRIORITY => T::U32,
            trap_attr::FD | trap_attr::TRAP_GROUP => T::ObjectId,
            _ => return None,
        },
        ObjectType::UserDefinedTrap => match id {
            user_defined_trap_attr::TRAP_CHANNEL => T::S32,
            user_defined_trap_attr::FD | user_defined_trap_attr::TRAP_GROUP => T::ObjectId,
            _ => return None,
        },
        ObjectType::Hostif => match id {
            hostif_attr::TYPE => T::S32,
            hostif_attr::RIF_OR_PORT_ID => T::ObjectId,
            hostif_attr::NAME => T::CharData,
            hostif_attr::OPER_STATUS => T::Bool,
            _ => return None,
        },
        ObjectType::TunnelMap => match id {
            tunnel_map_attr::TYPE => T::S32,
            tunnel_map_attr::MAP_TO_VALUE_LIST => T::TunnelMapList,
            _ => return None,
        },
        ObjectType::Tunnel => match id {
            tunnel_attr::TYPE
            | tunnel_attr::ENCAP_TTL_MODE
            | tunnel_attr::ENCAP_DSCP_MODE
            | tunnel_attr::ENCAP_ECN_MODE
            | tunnel_attr::DECAP_ECN_MODE
            | tunnel_attr::DECAP_TTL_MODE
            | tunnel_attr::DECAP_DSCP_MODE => T::S32,
            tunnel_attr::UNDERLAY_INTERFACE | tunnel_attr::OVERLAY_INTERFACE => T::ObjectId,
            tunnel_attr::ENCAP_SRC_IP => T::IpAddress,
            tunnel_attr::ENCAP_TTL_VAL | tunnel_attr::ENCAP_DSCP_VAL => T::U8,
            tunnel_attr::ENCAP_GRE_KEY_VALID => T::Bool,
            tunnel_attr::ENCAP_GRE_KEY => T::U32,
            tunnel_attr::ENCAP_MAPPERS | tunnel_attr::DECAP_MAPPERS => T::ObjectList,
            _ => return None,
        },
        ObjectType::TunnelTermTableEntry => match id {
            tunnel_term_attr::VR_ID | tunnel_term_attr::ACTION_TUNNEL_ID => T::ObjectId,
            tunnel_term_attr::TYPE | tunnel_term_attr::TUNNEL_TYPE => T::S32,
            tunnel_term_attr::DST_IP | tunnel_term_attr::SRC_IP => T::IpAddress,
            _ => return None,
        },
        ObjectType::QosMap => match id {
            qos_map_attr::TYPE => T::S32,
            qos_map_attr::MAP_TO_VALUE_LIST => T::QosMapList,
            _ => return None,
        },
        ObjectType::AclTable => match id {
            acl_table_attr::STAGE => T::S32,
            acl_table_attr::PRIORITY | acl_table_attr::SIZE => T::U32,
            _ => return None,
        },
        ObjectType::AclEntry => match id {
            acl_entry_attr::TABLE_ID => T::ObjectId,
            acl_entry_attr::PRIORITY => T::U32,
            acl_entry_attr::ADMIN_STATE => T::Bool,
            acl_entry_attr::FIELD_SRC_IP => T::AclFieldData,
            acl_entry_attr::FIELD_IN_PORTS => T::AclFieldObjectList,
            acl_entry_attr::FIELD_SRC_PORT => T::AclFieldObjectId,
            acl_entry_attr::ACTION_REDIRECT | acl_entry_attr::ACTION_SET_POLICER => {
                T::AclActionObjectId
            }
            acl_entry_attr::ACTION_MIRROR_INGRESS => T::AclActionObjectList,
            acl_entry_attr::ACTION_PACKET_ACTION => T::AclActionData,
            _ => return None,
        },
        ObjectType::AclCounter => match id {
            acl_counter_attr::TABLE_ID => T::ObjectId,
            acl_counter_attr::PACKETS | acl_counter_attr::BYTES => T::U64,
            _ => return None,
        },
        ObjectType::BufferPool => match id {
            buffer_pool_attr::TYPE | buffer_pool_attr::TH_MODE => T::S32,
            buffer_pool_attr::SIZE => T::U64,
            _ => return None,
        },
        ObjectType::BufferProfile => match id {
            buffer_profile_attr::POOL_ID => T::ObjectId,
            buffer_profile_attr::BUFFER_SIZE => T::U64,
            buffer_profile_attr::TH_MODE => T::S32,
            _ => return None,
        },
        ObjectType::Scheduler => match id {
            scheduler_attr::SCHEDULING_TYPE | scheduler_attr::SHAPER_TYPE => T::S32,
            scheduler_attr::SCHEDULING_WEIGHT => T::U8,
            scheduler_attr::MIN_BANDWIDTH_RATE | scheduler_attr::MAX_BANDWIDTH_RATE => T::U64,
            _ => return None,
        },
        ObjectType::Wred => match id {
            wred_attr::GREEN_ENABLE => T::Bool,
            wred_attr::GREEN_MIN_THRESHOLD | wred_attr::GREEN_MAX_THRESHOLD => T::U32,
            wred_attr::ECN_MARK_MODE => T::S32,
            _ => return None,
        },
        ObjectType::Mirror => match id {
            mirror_attr::TYPE => T::S32,
            mirror_attr::MONITOR_PORT => T::ObjectId,
            mirror_attr::TC => T::U8,
            _ => return None,
        },
        ObjectType::Udf => match id {
            udf_attr::MATCH_ID => T::ObjectId,
            udf_attr::BASE => T::S32,
            udf_attr::OFFSET => T::U16,
            _ => return None,
        },
        ObjectType::Queue => match id {
            queue_attr::TYPE => T::S32,
            queue_attr::WRED_PROFILE_ID
            | queue_attr::BUFFER_PROFILE_ID
            | queue_attr::SCHEDULER_PROFILE_ID => T::ObjectId,
            _ => return None,
        },
        ObjectType::SchedulerGroup => match id {
            scheduler_group_attr::CHILD_COUNT => T::U32,
            scheduler_group_attr::CHILD_LIST => T::ObjectList,
            scheduler_group_attr::PORT_ID => T::ObjectId,
            scheduler_group_attr::LEVEL => T::U8,
            _ => return None,
        },
        ObjectType::Samplepacket => match id {
            samplepacket_attr::SAMPLE_RATE => T::U32,
            samplepacket_attr::TYPE => T::S32,
            _ => return None,
        },
        ObjectType::Stp => match id {
            stp_attr::VLAN_LIST => T::U32List,
            _ => return None,
        },
        ObjectType::Hash => match id {
            hash_attr::NATIVE_FIELD_LIST => T::S32List,
            hash_attr::UDF_GROUP_LIST => T::ObjectList,
            _ => return None,
        },
        ObjectType::Null => return None,
    };
    Some(ty)
}

/// Like [`serialization_type`], but surfaces a [`CodecError`] for misses.
pub fn require_serialization_type(kind: ObjectType, id: u32) -> Result<SerializationType, CodecError> {
    serialization_type(kind, id).ok_or(CodecError::UnknownAttribute { kind, id })
}
