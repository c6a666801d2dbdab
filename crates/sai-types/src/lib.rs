//! Core types shared by the client library and the sync daemon.
//!
//! This crate defines the data model both sides of the bus agree on:
//!
//! - [`ObjectType`]: the closed enumeration of switch object kinds
//! - [`ObjectId`]: a 64-bit object identifier; virtual ids carry their kind
//!   in the upper bits
//! - [`Status`]: the status codes every operation returns
//! - [`MacAddress`], [`IpPrefix`]: address types with canonical text forms
//! - [`RouteEntry`], [`NeighborEntry`], [`FdbEntry`]: structural keys for
//!   entry-keyed objects
//!
//! All textual encodings here are canonical: parsing the output of `Display`
//! yields the original value, and the lexical form is stable across restarts
//! so it can be used as a persistent hash key.

mod entry;
mod ip;
mod mac;
mod object_id;
mod object_type;
mod status;

pub use entry::{FdbEntry, NeighborEntry, RouteEntry};
pub use ip::IpPrefix;
pub use mac::MacAddress;
pub use object_id::ObjectId;
pub use object_type::ObjectType;
pub use status::{SaiResult, Status};

use thiserror::Error;

/// Errors from parsing canonical textual forms.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid object type name: {0}")]
    InvalidObjectType(String),

    #[error("invalid object id: {0}")]
    InvalidObjectId(String),

    #[error("invalid MAC address: {0}")]
    InvalidMacAddress(String),

    #[error("invalid IP address: {0}")]
    InvalidIpAddress(String),

    #[error("invalid IP prefix: {0}")]
    InvalidIpPrefix(String),

    #[error("invalid entry key: {0}")]
    InvalidEntryKey(String),

    #[error("invalid status code: {0}")]
    InvalidStatus(String),
}
