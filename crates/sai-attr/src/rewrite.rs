//! Object-id rewriting across an attribute list.
//!
//! The daemon runs every inbound mutation through a virtual→real rewrite
//! and every outbound get result through the reverse. The walker visits the
//! same variants in both directions: plain object ids, object lists, and
//! the object-carrying ACL field/action and port-breakout containers.

use crate::meta::{require_serialization_type, SerializationType};
use crate::{AclData, Attribute, CodecError, Value};
use sai_types::{ObjectId, ObjectType};
use thiserror::Error;

/// Failure of a rewrite pass: either unknown metadata or a failed
/// translation (with the translator's own error).
#[derive(Debug, Error)]
pub enum RewriteError<E: std::error::Error> {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Translate(E),
}

/// Rewrites every object-id-valued field of `attrs` through `translate`.
///
/// Null ids are passed to the translator like any other; translators are
/// expected to map null to null.
pub fn rewrite_object_ids<E: std::error::Error>(
    kind: ObjectType,
    attrs: &mut [Attribute],
    translate: &mut dyn FnMut(ObjectId) -> Result<ObjectId, E>,
) -> Result<(), RewriteError<E>> {
    for attr in attrs.iter_mut() {
        let ty = require_serialization_type(kind, attr.id)?;
        match (ty, &mut attr.value) {
            (SerializationType::ObjectId, Value::ObjectId(oid)) => {
                *oid = translate(*oid).map_err(RewriteError::Translate)?;
            }
            (SerializationType::ObjectList, Value::ObjectList(list)) => {
                rewrite_list(list, translate)?;
            }
            (
                SerializationType::AclFieldObjectId | SerializationType::AclFieldObjectList,
                Value::AclField(field),
            ) => rewrite_acl_data(&mut field.data, translate)?,
            (
                SerializationType::AclActionObjectId | SerializationType::AclActionObjectList,
                Value::AclAction(action),
            ) => rewrite_acl_data(&mut action.parameter, translate)?,
            (SerializationType::PortBreakout, Value::PortBreakout(breakout)) => {
                rewrite_list(&mut breakout.port_list, translate)?;
            }
            _ => {}
        }
    }
    Ok(())
}

fn rewrite_list<E: std::error::Error>(
    list: &mut [ObjectId],
    translate: &mut dyn FnMut(ObjectId) -> Result<ObjectId, E>,
) -> Result<(), RewriteError<E>> {
    for oid in list.iter_mut() {
        *oid = translate(*oid).map_err(RewriteError::Translate)?;
    }
    Ok(())
}

fn rewrite_acl_data<E: std::error::Error>(
    data: &mut AclData,
    translate: &mut dyn FnMut(ObjectId) -> Result<ObjectId, E>,
) -> Result<(), RewriteError<E>> {
    match data {
        AclData::U64(_) => Ok(()),
        AclData::ObjectId(oid) => {
            *oid = translate(*oid).map_err(RewriteError::Translate)?;
            Ok(())
        }
        AclData::ObjectList(list) => rewrite_list(list, translate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::*;
    use crate::{AclActionValue, AclFieldValue, PortBreakoutValue};
    use std::convert::Infallible;

    fn bump(oid: ObjectId) -> Result<ObjectId, Infallible> {
        Ok(ObjectId::from_raw(oid.as_raw() + 1))
    }

    #[test]
    fn test_rewrites_plain_oid_and_list() {
        let mut attrs = vec![
            Attribute::oid(next_hop_attr::ROUTER_INTERFACE_ID, ObjectId::from_raw(10)),
            Attribute::new(next_hop_attr::TYPE, Value::S32(0)),
        ];
        rewrite_object_ids(ObjectType::NextHop, &mut attrs, &mut bump).unwrap();
        assert_eq!(attrs[0].value, Value::ObjectId(ObjectId::from_raw(11)));
        assert_eq!(attrs[1].value, Value::S32(0));

        let mut attrs = vec![Attribute::new(
            next_hop_group_attr::NEXT_HOP_LIST,
            Value::ObjectList(vec![ObjectId::from_raw(1), ObjectId::from_raw(2)]),
        )];
        rewrite_object_ids(ObjectType::NextHopGroup, &mut attrs, &mut bump).unwrap();
        assert_eq!(
            attrs[0].value,
            Value::ObjectList(vec![ObjectId::from_raw(2), ObjectId::from_raw(3)])
        );
    }

    #[test]
    fn test_rewrites_nested_containers() {
        let mut attrs = vec![
            Attribute::new(
                acl_entry_attr::FIELD_IN_PORTS,
                Value::AclField(AclFieldValue {
                    enable: true,
                    data: AclData::ObjectList(vec![ObjectId::from_raw(5)]),
                    mask: 0,
                }),
            ),
            Attribute::new(
                acl_entry_attr::ACTION_REDIRECT,
                Value::AclAction(AclActionValue {
                    enable: true,
                    parameter: AclData::ObjectId(ObjectId::from_raw(7)),
                }),
            ),
        ];
        rewrite_object_ids(ObjectType::AclEntry, &mut attrs, &mut bump).unwrap();
        assert_eq!(
            attrs[0].value,
            Value::AclField(AclFieldValue {
                enable: true,
                data: AclData::ObjectList(vec![ObjectId::from_raw(6)]),
                mask: 0,
            })
        );
        assert_eq!(
            attrs[1].value,
            Value::AclAction(AclActionValue {
                enable: true,
                parameter: AclData::ObjectId(ObjectId::from_raw(8)),
            })
        );

        let mut attrs = vec![Attribute::new(
            switch_attr::PORT_BREAKOUT,
            Value::PortBreakout(PortBreakoutValue {
                mode: 1,
                port_list: vec![ObjectId::from_raw(20)],
            }),
        )];
        rewrite_object_ids(ObjectType::Switch, &mut attrs, &mut bump).unwrap();
        assert_eq!(
            attrs[0].value,
            Value::PortBreakout(PortBreakoutValue {
                mode: 1,
                port_list: vec![ObjectId::from_raw(21)],
            })
        );
    }

    #[test]
    fn test_scalar_acl_data_untouched() {
        let mut attrs = vec![Attribute::new(
            acl_entry_attr::FIELD_SRC_IP,
            Value::AclField(AclFieldValue {
                enable: true,
                data: AclData::U64(0xff),
                mask: 0xff,
            }),
        )];
        rewrite_object_ids(ObjectType::AclEntry, &mut attrs, &mut bump).unwrap();
        assert_eq!(
            attrs[0].value,
            Value::AclField(AclFieldValue {
                enable: true,
                data: AclData::U64(0xff),
                mask: 0xff,
            })
        );
    }

    #[test]
    fn test_unknown_attribute_fails() {
        let mut attrs = vec![Attribute::new(0xbeef, Value::U32(0))];
        let result = rewrite_object_ids(ObjectType::NextHop, &mut attrs, &mut bump);
        assert!(matches!(result, Err(RewriteError::Codec(_))));
    }

    #[test]
    fn test_translator_error_propagates() {
        #[derive(Debug, Error)]
        #[error("missing")]
        struct Missing;

        let mut attrs = vec![Attribute::oid(
            next_hop_attr::ROUTER_INTERFACE_ID,
            ObjectId::from_raw(10),
        )];
        let result = rewrite_object_ids(ObjectType::NextHop, &mut attrs, &mut |_| {
            Err::<ObjectId, _>(Missing)
        });
        assert!(matches!(result, Err(RewriteError::Translate(Missing))));
    }
}
