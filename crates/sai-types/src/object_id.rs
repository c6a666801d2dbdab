//! 64-bit object identifiers.

use crate::{ObjectType, ParseError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of low bits holding the allocation counter of a virtual id.
const COUNTER_BITS: u32 = 48;
const COUNTER_MASK: u64 = (1 << COUNTER_BITS) - 1;

/// A 64-bit switch object identifier.
///
/// The same representation is used for both address spaces: virtual ids
/// minted by the library (kind in the upper 16 bits, monotonic counter in
/// the lower 48) and real ids produced by the vendor SDK (opaque). Which
/// space a value belongs to is a property of where it came from; only the
/// daemon's translator crosses between them.
///
/// The canonical text form is 16 lowercase hex characters.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectId(u64);

impl ObjectId {
    /// The reserved "no object" id.
    pub const NULL: ObjectId = ObjectId(0);

    pub const fn from_raw(raw: u64) -> Self {
        ObjectId(raw)
    }

    pub const fn as_raw(self) -> u64 {
        self.0
    }

    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Packs a virtual id from a kind and an allocation counter.
    ///
    /// The counter is masked to 48 bits; the shared-store counter would take
    /// longer than the hardware's lifetime to overflow it.
    pub const fn pack(kind: ObjectType, counter: u64) -> Self {
        ObjectId(((kind as u64) << COUNTER_BITS) | (counter & COUNTER_MASK))
    }

    /// Extracts the kind encoded in a virtual id.
    ///
    /// Pure bit extraction; for ids minted by [`ObjectId::pack`] this always
    /// matches the kind passed at creation. Unknown upper bits decode as
    /// [`ObjectType::Null`].
    pub fn object_type(self) -> ObjectType {
        ObjectType::from_u16((self.0 >> COUNTER_BITS) as u16).unwrap_or(ObjectType::Null)
    }

    /// Extracts the allocation counter of a virtual id.
    pub const fn counter(self) -> u64 {
        self.0 & COUNTER_MASK
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        ObjectId::NULL
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "oid:{:016x}", self.0)
    }
}

impl FromStr for ObjectId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 16 {
            return Err(ParseError::InvalidObjectId(s.to_string()));
        }
        u64::from_str_radix(s, 16)
            .map(ObjectId)
            .map_err(|_| ParseError::InvalidObjectId(s.to_string()))
    }
}

impl TryFrom<String> for ObjectId {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ObjectId> for String {
    fn from(oid: ObjectId) -> String {
        oid.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pack_preserves_kind_and_counter() {
        for kind in ObjectType::ALL {
            let oid = ObjectId::pack(kind, 0x1234_5678_9abc);
            assert_eq!(oid.object_type(), kind);
            assert_eq!(oid.counter(), 0x1234_5678_9abc);
        }
    }

    #[test]
    fn test_counter_masked_to_48_bits() {
        let oid = ObjectId::pack(ObjectType::Port, u64::MAX);
        assert_eq!(oid.object_type(), ObjectType::Port);
        assert_eq!(oid.counter(), (1 << 48) - 1);
    }

    #[test]
    fn test_null() {
        assert!(ObjectId::NULL.is_null());
        assert_eq!(ObjectId::NULL.object_type(), ObjectType::Null);
        assert!(!ObjectId::pack(ObjectType::Vlan, 1).is_null());
    }

    #[test]
    fn test_text_round_trip() {
        let oid = ObjectId::pack(ObjectType::NextHop, 0x42);
        let text = oid.to_string();
        assert_eq!(text.len(), 16);
        assert_eq!(text.parse::<ObjectId>().unwrap(), oid);
    }

    #[test]
    fn test_parse_rejects_bad_forms() {
        assert!("".parse::<ObjectId>().is_err());
        assert!("1234".parse::<ObjectId>().is_err());
        assert!("zzzzzzzzzzzzzzzz".parse::<ObjectId>().is_err());
        assert!("00040000000000010".parse::<ObjectId>().is_err());
    }
}
