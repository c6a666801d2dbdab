//! Attribute id constants, one module per object kind.
//!
//! Ids are `u32` and appear on the wire in hex, so like the object-kind
//! discriminants they must never change once assigned.

pub mod switch_attr {
    // read-only
    pub const PORT_NUMBER: u32 = 0;
    pub const PORT_LIST: u32 = 1;
    pub const PORT_MAX_MTU: u32 = 2;
    pub const CPU_PORT: u32 = 3;
    pub const MAX_VIRTUAL_ROUTERS: u32 = 4;
    pub const FDB_TABLE_SIZE: u32 = 5;
    pub const OPER_STATUS: u32 = 6;
    pub const MAX_TEMP: u32 = 7;
    pub const DEFAULT_STP_INST_ID: u32 = 8;
    pub const DEFAULT_VIRTUAL_ROUTER_ID: u32 = 9;
    pub const DEFAULT_TRAP_GROUP: u32 = 10;
    pub const ECMP_HASH: u32 = 11;
    pub const LAG_HASH: u32 = 12;
    // read-write
    pub const SWITCHING_MODE: u32 = 13;
    pub const BCAST_CPU_FLOOD_ENABLE: u32 = 14;
    pub const MCAST_CPU_FLOOD_ENABLE: u32 = 15;
    pub const SRC_MAC_ADDRESS: u32 = 16;
    pub const MAX_LEARNED_ADDRESSES: u32 = 17;
    pub const FDB_AGING_TIME: u32 = 18;
    pub const FDB_UNICAST_MISS_ACTION: u32 = 19;
    pub const FDB_BROADCAST_MISS_ACTION: u32 = 20;
    pub const FDB_MULTICAST_MISS_ACTION: u32 = 21;
    pub const ECMP_DEFAULT_HASH_ALGORITHM: u32 = 22;
    pub const ECMP_DEFAULT_HASH_SEED: u32 = 23;
    pub const ECMP_DEFAULT_SYMMETRIC_HASH: u32 = 24;
    pub const LAG_DEFAULT_HASH_ALGORITHM: u32 = 25;
    pub const LAG_DEFAULT_HASH_SEED: u32 = 26;
    pub const LAG_DEFAULT_SYMMETRIC_HASH: u32 = 27;
    pub const COUNTER_REFRESH_INTERVAL: u32 = 28;
    pub const PORT_BREAKOUT: u32 = 29;
    /// Start of the vendor-specific attribute range (diag shell lives here).
    pub const CUSTOM_RANGE_BASE: u32 = 0x1000_0000;
}

pub mod port_attr {
    pub const TYPE: u32 = 0;
    pub const OPER_STATUS: u32 = 1;
    pub const HW_LANE_LIST: u32 = 2;
    pub const SPEED: u32 = 3;
    pub const ADMIN_STATE: u32 = 4;
    pub const PORT_VLAN_ID: u32 = 5;
    pub const FDB_LEARNING: u32 = 6;
    pub const MTU: u32 = 7;
    pub const QOS_DSCP_TO_TC_MAP: u32 = 8;
    pub const QOS_TC_TO_QUEUE_MAP: u32 = 9;
    pub const QOS_TC_TO_PRIORITY_GROUP_MAP: u32 = 10;
    pub const QOS_PFC_PRIORITY_TO_PRIORITY_GROUP_MAP: u32 = 11;
    pub const QOS_PFC_PRIORITY_TO_QUEUE_MAP: u32 = 12;
    pub const PRIORITY_FLOW_CONTROL: u32 = 13;
}

pub mod virtual_router_attr {
    pub const ADMIN_V4_STATE: u32 = 0;
    pub const ADMIN_V6_STATE: u32 = 1;
    pub const SRC_MAC_ADDRESS: u32 = 2;
    pub const VIOLATION_TTL1_ACTION: u32 = 3;
    pub const VIOLATION_IP_OPTIONS: u32 = 4;
}

pub mod router_interface_attr {
    pub const VIRTUAL_ROUTER_ID: u32 = 0;
    pub const TYPE: u32 = 1;
    pub const PORT_ID: u32 = 2;
    pub const VLAN_ID: u32 = 3;
    pub const SRC_MAC_ADDRESS: u32 = 4;
    pub const ADMIN_V4_STATE: u32 = 5;
    pub const ADMIN_V6_STATE: u32 = 6;
    pub const MTU: u32 = 7;
}

pub mod next_hop_attr {
    pub const TYPE: u32 = 0;
    pub const IP: u32 = 1;
    pub const ROUTER_INTERFACE_ID: u32 = 2;
    pub const TUNNEL_ID: u32 = 3;
}

pub mod next_hop_group_attr {
    pub const NEXT_HOP_COUNT: u32 = 0;
    pub const TYPE: u32 = 1;
    pub const NEXT_HOP_LIST: u32 = 2;
}

pub mod route_attr {
    pub const PACKET_ACTION: u32 = 0;
    pub const TRAP_PRIORITY: u32 = 1;
    pub const NEXT_HOP_ID: u32 = 2;
    pub const META_DATA: u32 = 3;
}

pub mod neighbor_attr {
    pub const DST_MAC_ADDRESS: u32 = 0;
    pub const PACKET_ACTION: u32 = 1;
    pub const NO_HOST_ROUTE: u32 = 2;
    pub const META_DATA: u32 = 3;
}

pub mod fdb_attr {
    pub const TYPE: u32 = 0;
    pub const PORT_ID: u32 = 1;
    pub const PACKET_ACTION: u32 = 2;
    pub const META_DATA: u32 = 3;
}

pub mod vlan_attr {
    pub const MAX_LEARNED_ADDRESSES: u32 = 0;
    pub const STP_INSTANCE: u32 = 1;
    pub const LEARN_DISABLE: u32 = 2;
    pub const META_DATA: u32 = 3;
    pub const MEMBER_LIST: u32 = 4;
}

pub mod vlan_member_attr {
    pub const VLAN_ID: u32 = 0;
    pub const PORT_ID: u32 = 1;
    pub const TAGGING_MODE: u32 = 2;
}

pub mod lag_attr {
    pub const PORT_LIST: u32 = 0;
}

pub mod lag_member_attr {
    pub const LAG_ID: u32 = 0;
    pub const PORT_ID: u32 = 1;
    pub const EGRESS_DISABLE: u32 = 2;
    pub const INGRESS_DISABLE: u32 = 3;
}

pub mod policer_attr {
    pub const METER_TYPE: u32 = 0;
    pub const MODE: u32 = 1;
    pub const COLOR_SOURCE: u32 = 2;
    pub const CBS: u32 = 3;
    pub const CIR: u32 = 4;
    pub const PBS: u32 = 5;
    pub const PIR: u32 = 6;
    pub const GREEN_PACKET_ACTION: u32 = 7;
    pub const YELLOW_PACKET_ACTION: u32 = 8;
    pub const RED_PACKET_ACTION: u32 = 9;
    pub const ENABLE_COUNTER_LIST: u32 = 10;
}

pub mod trap_group_attr {
    pub const ADMIN_STATE: u32 = 0;
    pub const PRIO: u32 = 1;
    pub const QUEUE: u32 = 2;
    pub const POLICER: u32 = 3;
}

pub mod trap_attr {
    pub const TRAP_ACTION: u32 = 0;
    pub const TRAP_PRIORITY: u32 = 1;
    pub const TRAP_CHANNEL: u32 = 2;
    pub const FD: u32 = 3;
    pub const TRAP_GROUP: u32 = 4;
}

pub mod user_defined_trap_attr {
    pub const TRAP_CHANNEL: u32 = 0;
    pub const FD: u32 = 1;
    pub const TRAP_GROUP: u32 = 2;
}

pub mod hostif_attr {
    pub const TYPE: u32 = 0;
    pub const RIF_OR_PORT_ID: u32 = 1;
    pub const NAME: u32 = 2;
    pub const OPER_STATUS: u32 = 3;
}

pub mod tunnel_map_attr {
    pub const TYPE: u32 = 0;
    pub const MAP_TO_VALUE_LIST: u32 = 1;
}

pub mod tunnel_attr {
    pub const TYPE: u32 = 0;
    pub const UNDERLAY_INTERFACE: u32 = 1;
    pub const OVERLAY_INTERFACE: u32 = 2;
    pub const ENCAP_SRC_IP: u32 = 3;
    pub const ENCAP_TTL_MODE: u32 = 4;
    pub const ENCAP_TTL_VAL: u32 = 5;
    pub const ENCAP_DSCP_MODE: u32 = 6;
    pub const ENCAP_DSCP_VAL: u32 = 7;
    pub const ENCAP_GRE_KEY_VALID: u32 = 8;
    pub const ENCAP_GRE_KEY: u32 = 9;
    pub const ENCAP_ECN_MODE: u32 = 10;
    pub const ENCAP_MAPPERS: u32 = 11;
    pub const DECAP_ECN_MODE: u32 = 12;
    pub const DECAP_MAPPERS: u32 = 13;
    pub const DECAP_TTL_MODE: u32 = 14;
    pub const DECAP_DSCP_MODE: u32 = 15;
}

pub mod tunnel_term_attr {
    pub const VR_ID: u32 = 0;
    pub const TYPE: u32 = 1;
    pub const DST_IP: u32 = 2;
    pub const SRC_IP: u32 = 3;
    pub const TUNNEL_TYPE: u32 = 4;
    pub const ACTION_TUNNEL_ID: u32 = 5;
}

pub mod qos_map_attr {
    pub const TYPE: u32 = 0;
    pub const MAP_TO_VALUE_LIST: u32 = 1;
}

pub mod acl_table_attr {
    pub const STAGE: u32 = 0;
    pub const PRIORITY: u32 = 1;
    pub const SIZE: u32 = 2;
}

pub mod acl_entry_attr {
    pub const TABLE_ID: u32 = 0;
    pub const PRIORITY: u32 = 1;
    pub const ADMIN_STATE: u32 = 2;
    pub const FIELD_SRC_IP: u32 = 3;
    pub const FIELD_IN_PORTS: u32 = 4;
    pub const FIELD_SRC_PORT: u32 = 5;
    pub const ACTION_REDIRECT: u32 = 6;
    pub const ACTION_MIRROR_INGRESS: u32 = 7;
    pub const ACTION_SET_POLICER: u32 = 8;
    pub const ACTION_PACKET_ACTION: u32 = 9;
}

pub mod acl_counter_attr {
    pub const TABLE_ID: u32 = 0;
    pub const PACKETS: u32 = 1;
    pub const BYTES: u32 = 2;
}

pub mod buffer_pool_attr {
    pub const TYPE: u32 = 0;
    pub const SIZE: u32 = 1;
    pub const TH_MODE: u32 = 2;
}

pub mod buffer_profile_attr {
    pub const POOL_ID: u32 = 0;
    pub const BUFFER_SIZE: u32 = 1;
    pub const TH_MODE: u32 = 2;
}

pub mod scheduler_attr {
    pub const SCHEDULING_TYPE: u32 = 0;
    pub const SCHEDULING_WEIGHT: u32 = 1;
    pub const SHAPER_TYPE: u32 = 2;
    pub const MIN_BANDWIDTH_RATE: u32 = 3;
    pub const MAX_BANDWIDTH_RATE: u32 = 4;
}

pub mod wred_attr {
    pub const GREEN_ENABLE: u32 = 0;
    pub const GREEN_MIN_THRESHOLD: u32 = 1;
    pub const GREEN_MAX_THRESHOLD: u32 = 2;
    pub const ECN_MARK_MODE: u32 = 3;
}

pub mod mirror_attr {
    pub const TYPE: u32 = 0;
    pub const MONITOR_PORT: u32 = 1;
    pub const TC: u32 = 2;
}

pub mod udf_attr {
    pub const MATCH_ID: u32 = 0;
    pub const BASE: u32 = 1;
    pub const OFFSET: u32 = 2;
}

pub mod queue_attr {
    pub const TYPE: u32 = 0;
    pub const WRED_PROFILE_ID: u32 = 1;
    pub const BUFFER_PROFILE_ID: u32 = 2;
    pub const SCHEDULER_PROFILE_ID: u32 = 3;
}

pub mod scheduler_group_attr {
    pub const CHILD_COUNT: u32 = 0;
    pub const CHILD_LIST: u32 = 1;
    pub const PORT_ID: u32 = 2;
    pub const LEVEL: u32 = 3;
}

pub mod samplepacket_attr {
    pub const SAMPLE_RATE: u32 = 0;
    pub const TYPE: u32 = 1;
}

pub mod stp_attr {
    pub const VLAN_LIST: u32 = 0;
}

pub mod hash_attr {
    pub const NATIVE_FIELD_LIST: u32 = 0;
    pub const UDF_GROUP_LIST: u32 = 1;
}
