//! Attribute model and codec.
//!
//! Every switch object carries a list of `(id, value)` attributes whose
//! value variant is determined by per-(kind, id) metadata. This crate owns:
//!
//! - [`Value`] / [`Attribute`]: the tagged value union and attribute pair
//! - [`meta::serialization_type`]: the metadata lookup driving the codec
//! - [`codec`]: canonical textual serialization of attribute lists,
//!   including the counts-only form used on `BUFFER_OVERFLOW`
//! - [`rewrite`]: the walker that rewrites every object-id-valued field in
//!   an attribute list through a caller-supplied translation
//! - [`events`]: asynchronous notification payloads and their wire codecs
//!
//! The codec round-trips: `deserialize(serialize(a)) == a` for every
//! well-typed attribute.

pub mod codec;
pub mod enums;
pub mod events;
pub mod ids;
pub mod meta;
pub mod rewrite;
mod value;

pub use meta::SerializationType;
pub use value::{
    AclActionValue, AclData, AclFieldValue, Attribute, PortBreakoutValue, QosMapEntry,
    TunnelMapEntry, Value,
};

use sai_types::ObjectType;
use thiserror::Error;

/// Errors from attribute metadata lookups and the textual codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("no metadata for attribute {id:#x} of {kind}")]
    UnknownAttribute { kind: ObjectType, id: u32 },

    #[error("attribute {id:#x} of {kind} does not match its serialization type")]
    TypeMismatch { kind: ObjectType, id: u32 },

    #[error("malformed value: {text}")]
    Malformed { text: String },
}
