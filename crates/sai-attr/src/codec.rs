//! Canonical textual serialization of attribute lists.
//!
//! Field names are the attribute id in hex; value encodings are fixed per
//! serialization type. List values carry their element count
//! (`count:item,item`); serializing with `counts_only` emits only the count,
//! and deserializing that form materializes a list of `count` zeroed
//! elements, the shape a `BUFFER_OVERFLOW` reply promises (count
//! trustworthy, contents not).

use crate::meta::{require_serialization_type, SerializationType};
use crate::{
    AclActionValue, AclData, AclFieldValue, Attribute, CodecError, PortBreakoutValue, QosMapEntry,
    TunnelMapEntry, Value,
};
use sai_types::{IpPrefix, MacAddress, ObjectId, ObjectType};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// A serialized attribute field: `(hex attribute id, value text)`.
pub type FieldValue = (String, String);

/// Serializes an attribute list against the metadata of `kind`.
///
/// With `counts_only` set, list-valued attributes emit only their element
/// counts; scalar attributes serialize normally.
pub fn serialize_attrs(
    kind: ObjectType,
    attrs: &[Attribute],
    counts_only: bool,
) -> Result<Vec<FieldValue>, CodecError> {
    attrs
        .iter()
        .map(|attr| {
            let ty = require_serialization_type(kind, attr.id)?;
            if !ty.matches(&attr.value) {
                return Err(CodecError::TypeMismatch { kind, id: attr.id });
            }
            Ok((format!("{:x}", attr.id), serialize_value(&attr.value, counts_only)))
        })
        .collect()
}

/// Deserializes a field list back into typed attributes.
pub fn deserialize_attrs(
    kind: ObjectType,
    fields: &[FieldValue],
) -> Result<Vec<Attribute>, CodecError> {
    fields
        .iter()
        .map(|(name, text)| {
            let id = u32::from_str_radix(name, 16).map_err(|_| CodecError::Malformed {
                text: name.clone(),
            })?;
            let ty = require_serialization_type(kind, id)?;
            Ok(Attribute::new(id, deserialize_value(ty, text)?))
        })
        .collect()
}

/// Serializes a single value to its canonical text form.
pub fn serialize_value(value: &Value, counts_only: bool) -> String {
    match value {
        Value::Bool(v) => v.to_string(),
        Value::U8(v) => format!("{v:x}"),
        Value::U16(v) => format!("{v:x}"),
        Value::U32(v) => format!("{v:x}"),
        Value::U64(v) => format!("{v:x}"),
        Value::S32(v) => format!("{:x}", *v as u32),
        Value::S64(v) => format!("{:x}", *v as u64),
        Value::Mac(v) => v.to_string(),
        Value::Ipv4(v) => v.to_string(),
        Value::Ipv6(v) => v.to_string(),
        Value::IpAddress(v) => v.to_string(),
        Value::IpPrefix(v) => v.to_string(),
        Value::CharData(v) => v.clone(),
        Value::ObjectId(v) => v.to_string(),
        Value::ObjectList(list) => serialize_list(list, counts_only, |o| o.to_string()),
        Value::U32List(list) => serialize_list(list, counts_only, |v| format!("{v:x}")),
        Value::S32List(list) => serialize_list(list, counts_only, |v| format!("{:x}", *v as u32)),
        Value::AclField(field) => format!(
            "{}.{}.{:x}",
            field.enable,
            serialize_acl_data(&field.data, counts_only),
            field.mask
        ),
        Value::AclAction(action) => format!(
            "{}.{}",
            action.enable,
            serialize_acl_data(&action.parameter, counts_only)
        ),
        Value::PortBreakout(breakout) => format!(
            "{:x}.{}",
            breakout.mode as u32,
            serialize_list(&breakout.port_list, counts_only, |o| o.to_string())
        ),
        Value::QosMapList(list) => {
            serialize_pair_list(list, counts_only, |e| format!("{:x}.{:x}", e.key, e.value))
        }
        Value::TunnelMapList(list) => serialize_pair_list(list, counts_only, |e| {
            format!("{:x}.{:x}.{:x}", e.map_type as u32, e.key, e.value)
        }),
    }
}

/// Deserializes a single value of the given serialization type.
pub fn deserialize_value(ty: SerializationType, text: &str) -> Result<Value, CodecError> {
    use SerializationType as T;
    let value = match ty {
        T::Bool => Value::Bool(parse_bool(text)?),
        T::U8 => Value::U8(parse_hex(text)? as u8),
        T::U16 => Value::U16(parse_hex(text)? as u16),
        T::U32 => Value::U32(parse_hex(text)? as u32),
        T::U64 => Value::U64(parse_hex(text)?),
        T::S32 => Value::S32(parse_hex(text)? as u32 as i32),
        T::S64 => Value::S64(parse_hex(text)? as i64),
        T::Mac => Value::Mac(parse_as::<MacAddress>(text)?),
        T::Ipv4 => Value::Ipv4(parse_as::<Ipv4Addr>(text)?),
        T::Ipv6 => Value::Ipv6(parse_as::<Ipv6Addr>(text)?),
        T::IpAddress => Value::IpAddress(parse_as::<IpAddr>(text)?),
        T::IpPrefix => Value::IpPrefix(parse_as::<IpPrefix>(text)?),
        T::CharData => Value::CharData(text.to_string()),
        T::ObjectId => Value::ObjectId(parse_as::<ObjectId>(text)?),
        T::ObjectList => Value::ObjectList(parse_list(text, ObjectId::NULL, parse_as)?),
        T::U32List => Value::U32List(parse_list(text, 0u32, |s| Ok(parse_hex(s)? as u32))?),
        T::S32List => {
            Value::S32List(parse_list(text, 0i32, |s| Ok(parse_hex(s)? as u32 as i32))?)
        }
        T::AclFieldData | T::AclFieldObjectId | T::AclFieldObjectList => {
            let (enable, rest) = split_dot(text)?;
            let (data, mask) = rest.rsplit_once('.').ok_or_else(|| malformed(text))?;
            Value::AclField(AclFieldValue {
                enable: parse_bool(enable)?,
                data: deserialize_acl_data(ty, data)?,
                mask: parse_hex(mask)?,
            })
        }
        T::AclActionData | T::AclActionObjectId | T::AclActionObjectList => {
            let (enable, parameter) = split_dot(text)?;
            Value::AclAction(AclActionValue {
                enable: parse_bool(enable)?,
                parameter: deserialize_acl_data(ty, parameter)?,
            })
        }
        T::PortBreakout => {
            let (mode, ports) = split_dot(text)?;
            Value::PortBreakout(PortBreakoutValue {
                mode: parse_hex(mode)? as u32 as i32,
                port_list: parse_list(ports, ObjectId::NULL, parse_as)?,
            })
        }
        T::QosMapList => Value::QosMapList(parse_pair_list(
            text,
            QosMapEntry { key: 0, value: 0 },
            |item| {
                let (key, value) = item.split_once('.').ok_or_else(|| malformed(item))?;
                Ok(QosMapEntry {
                    key: parse_hex(key)? as u32,
                    value: parse_hex(value)? as u32,
                })
            },
        )?),
        T::TunnelMapList => Value::TunnelMapList(parse_pair_list(
            text,
            TunnelMapEntry { map_type: 0, key: 0, value: 0 },
            |item| {
                let mut parts = item.splitn(3, '.');
                let map_type = parts.next().ok_or_else(|| malformed(item))?;
                let key = parts.next().ok_or_else(|| malformed(item))?;
                let value = parts.next().ok_or_else(|| malformed(item))?;
                Ok(TunnelMapEntry {
                    map_type: parse_hex(map_type)? as u32 as i32,
                    key: parse_hex(key)? as u32,
                    value: parse_hex(value)? as u32,
                })
            },
        )?),
    };
    Ok(value)
}

fn serialize_acl_data(data: &AclData, counts_only: bool) -> String {
    match data {
        AclData::U64(v) => format!("{v:x}"),
        AclData::ObjectId(oid) => oid.to_string(),
        AclData::ObjectList(list) => serialize_list(list, counts_only, |o| o.to_string()),
    }
}

fn deserialize_acl_data(ty: SerializationType, text: &str) -> Result<AclData, CodecError> {
    use SerializationType as T;
    match ty {
        T::AclFieldData | T::AclActionData => Ok(AclData::U64(parse_hex(text)?)),
        T::AclFieldObjectId | T::AclActionObjectId => Ok(AclData::ObjectId(parse_as(text)?)),
        T::AclFieldObjectList | T::AclActionObjectList => {
            Ok(AclData::ObjectList(parse_list(text, ObjectId::NULL, parse_as)?))
        }
        _ => Err(malformed(text)),
    }
}

fn serialize_list<T>(items: &[T], counts_only: bool, f: impl Fn(&T) -> String) -> String {
    if counts_only {
        return format!("{}:", items.len());
    }
    let body: Vec<String> = items.iter().map(f).collect();
    format!("{}:{}", items.len(), body.join(","))
}

fn serialize_pair_list<T>(items: &[T], counts_only: bool, f: impl Fn(&T) -> String) -> String {
    if counts_only {
        return format!("{}:", items.len());
    }
    let body: Vec<String> = items.iter().map(f).collect();
    format!("{}:{}", items.len(), body.join(";"))
}

fn parse_list<T: Clone>(
    text: &str,
    zero: T,
    parse: impl Fn(&str) -> Result<T, CodecError>,
) -> Result<Vec<T>, CodecError> {
    parse_counted(text, ',', zero, parse)
}

fn parse_pair_list<T: Clone>(
    text: &str,
    zero: T,
    parse: impl Fn(&str) -> Result<T, CodecError>,
) -> Result<Vec<T>, CodecError> {
    parse_counted(text, ';', zero, parse)
}

fn parse_counted<T: Clone>(
    text: &str,
    separator: char,
    zero: T,
    parse: impl Fn(&str) -> Result<T, CodecError>,
) -> Result<Vec<T>, CodecError> {
    let (count, body) = text.split_once(':').ok_or_else(|| malformed(text))?;
    let count: usize = count.parse().map_err(|_| malformed(text))?;
    if body.is_empty() {
        // counts-only form: the count is valid, the contents are not
        return Ok(vec![zero; count]);
    }
    let items: Vec<T> = body
        .split(separator)
        .map(|item| parse(item))
        .collect::<Result<_, _>>()?;
    if items.len() != count {
        return Err(malformed(text));
    }
    Ok(items)
}

fn split_dot(text: &str) -> Result<(&str, &str), CodecError> {
    text.split_once('.').ok_or_else(|| malformed(text))
}

fn parse_bool(text: &str) -> Result<bool, CodecError> {
    match text {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(malformed(text)),
    }
}

fn parse_hex(text: &str) -> Result<u64, CodecError> {
    u64::from_str_radix(text, 16).map_err(|_| malformed(text))
}

fn parse_as<T: std::str::FromStr>(text: &str) -> Result<T, CodecError> {
    text.parse().map_err(|_| malformed(text))
}

fn malformed(text: &str) -> CodecError {
    CodecError::Malformed {
        text: text.to_string(),
    }
}
