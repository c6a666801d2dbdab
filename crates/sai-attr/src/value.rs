//! The attribute value union.

use sai_types::{IpPrefix, MacAddress, ObjectId};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// A single attribute: id plus typed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub id: u32,
    pub value: Value,
}

impl Attribute {
    pub fn new(id: u32, value: Value) -> Self {
        Attribute { id, value }
    }

    /// Convenience for object-id attributes.
    pub fn oid(id: u32, oid: ObjectId) -> Self {
        Attribute::new(id, Value::ObjectId(oid))
    }
}

/// Tagged attribute value.
///
/// The variant an attribute must carry is dictated by
/// [`crate::meta::serialization_type`]; this is a closed set, matched
/// exhaustively by the codec and the object-id rewriter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    S32(i32),
    S64(i64),
    Mac(MacAddress),
    Ipv4(Ipv4Addr),
    Ipv6(Ipv6Addr),
    IpAddress(IpAddr),
    IpPrefix(IpPrefix),
    CharData(String),
    ObjectId(ObjectId),
    ObjectList(Vec<ObjectId>),
    U32List(Vec<u32>),
    S32List(Vec<i32>),
    AclField(AclFieldValue),
    AclAction(AclActionValue),
    PortBreakout(PortBreakoutValue),
    QosMapList(Vec<QosMapEntry>),
    TunnelMapList(Vec<TunnelMapEntry>),
}

impl Value {
    /// Returns the embedded object id for `ObjectId` values.
    pub fn as_oid(&self) -> Option<ObjectId> {
        match self {
            Value::ObjectId(oid) => Some(*oid),
            _ => None,
        }
    }

    pub fn as_object_list(&self) -> Option<&[ObjectId]> {
        match self {
            Value::ObjectList(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Value::U32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u16(&self) -> Option<u16> {
        match self {
            Value::U16(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_s32(&self) -> Option<i32> {
        match self {
            Value::S32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_char_data(&self) -> Option<&str> {
        match self {
            Value::CharData(s) => Some(s),
            _ => None,
        }
    }
}

/// Payload of an ACL field: either a scalar with mask or an object reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AclData {
    U64(u64),
    ObjectId(ObjectId),
    ObjectList(Vec<ObjectId>),
}

/// ACL match field: enable flag, data, and mask.
///
/// The mask only applies to scalar data; it is carried (as zero) for object
/// forms so the wire shape stays uniform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AclFieldValue {
    pub enable: bool,
    pub data: AclData,
    pub mask: u64,
}

/// ACL action: enable flag plus parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AclActionValue {
    pub enable: bool,
    pub parameter: AclData,
}

/// Port breakout request: mode plus the ports being split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortBreakoutValue {
    pub mode: i32,
    pub port_list: Vec<ObjectId>,
}

/// One mapping of a QoS map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QosMapEntry {
    pub key: u32,
    pub value: u32,
}

/// One mapping of a tunnel map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TunnelMapEntry {
    pub map_type: i32,
    pub key: u32,
    pub value: u32,
}
