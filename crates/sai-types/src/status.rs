//! Status codes crossing the bus.

use crate::ParseError;
use std::fmt;
use std::str::FromStr;

/// Result type for operations that surface a [`Status`] to the caller.
pub type SaiResult<T> = Result<T, Status>;

/// Operation status codes.
///
/// These cross the bus verbatim (decimal `i32`), so the discriminants are
/// part of the wire contract.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Success = 0,
    Failure = -1,
    NotSupported = -2,
    NoMemory = -3,
    InsufficientResources = -4,
    InvalidParameter = -5,
    ItemAlreadyExists = -6,
    ItemNotFound = -7,
    BufferOverflow = -8,
    InvalidVlanId = -11,
    Uninitialized = -12,
    TableFull = -13,
    MandatoryAttributeMissing = -14,
    NotImplemented = -15,
    ObjectInUse = -17,
}

impl Status {
    pub fn from_raw(raw: i32) -> Status {
        match raw {
            0 => Status::Success,
            -2 => Status::NotSupported,
            -3 => Status::NoMemory,
            -4 => Status::InsufficientResources,
            -5 => Status::InvalidParameter,
            -6 => Status::ItemAlreadyExists,
            -7 => Status::ItemNotFound,
            -8 => Status::BufferOverflow,
            -11 => Status::InvalidVlanId,
            -12 => Status::Uninitialized,
            -13 => Status::TableFull,
            -14 => Status::MandatoryAttributeMissing,
            -15 => Status::NotImplemented,
            -17 => Status::ObjectInUse,
            _ => Status::Failure,
        }
    }

    pub const fn as_raw(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        self == Status::Success
    }

    /// Converts to a `Result`, mapping `Success` to `Ok(())`.
    pub fn into_result(self) -> SaiResult<()> {
        if self.is_success() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// The decimal wire form used as a get-response key and view reply.
    pub fn to_wire(self) -> String {
        self.as_raw().to_string()
    }

    pub fn from_wire(s: &str) -> Result<Status, ParseError> {
        s.parse::<i32>()
            .map(Status::from_raw)
            .map_err(|_| ParseError::InvalidStatus(s.to_string()))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Success => "SUCCESS",
            Status::Failure => "FAILURE",
            Status::NotSupported => "NOT_SUPPORTED",
            Status::NoMemory => "NO_MEMORY",
            Status::InsufficientResources => "INSUFFICIENT_RESOURCES",
            Status::InvalidParameter => "INVALID_PARAMETER",
            Status::ItemAlreadyExists => "ITEM_ALREADY_EXISTS",
            Status::ItemNotFound => "ITEM_NOT_FOUND",
            Status::BufferOverflow => "BUFFER_OVERFLOW",
            Status::InvalidVlanId => "INVALID_VLAN_ID",
            Status::Uninitialized => "UNINITIALIZED",
            Status::TableFull => "TABLE_FULL",
            Status::MandatoryAttributeMissing => "MANDATORY_ATTRIBUTE_MISSING",
            Status::NotImplemented => "NOT_IMPLEMENTED",
            Status::ObjectInUse => "OBJECT_IN_USE",
        };
        f.write_str(s)
    }
}

impl std::error::Error for Status {}

impl FromStr for Status {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::from_wire(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_round_trip() {
        for status in [
            Status::Success,
            Status::Failure,
            Status::InvalidParameter,
            Status::ItemAlreadyExists,
            Status::BufferOverflow,
            Status::MandatoryAttributeMissing,
            Status::NotImplemented,
            Status::ObjectInUse,
        ] {
            assert_eq!(Status::from_raw(status.as_raw()), status);
        }
    }

    #[test]
    fn test_unknown_raw_is_failure() {
        assert_eq!(Status::from_raw(-999), Status::Failure);
    }

    #[test]
    fn test_wire_round_trip() {
        let status = Status::BufferOverflow;
        assert_eq!(Status::from_wire(&status.to_wire()).unwrap(), status);
        assert!(Status::from_wire("not-a-status").is_err());
    }

    #[test]
    fn test_into_result() {
        assert!(Status::Success.into_result().is_ok());
        assert_eq!(
            Status::InvalidParameter.into_result(),
            Err(Status::InvalidParameter)
        );
    }
}
