//! Client half of the split SAI adapter.
//!
//! [`SaiClient`] presents the full switch API to an application while
//! owning no hardware: every entry point validates its arguments against a
//! local state index, marshals the operation onto the bus, and (for gets
//! and view transitions) blocks until the daemon replies.
//!
//! Virtual object ids are minted here, from the shared store's monotonic
//! counter with the object kind packed into the upper bits; real ids never
//! cross into this crate.
//!
//! # Locking
//!
//! A single coarse API lock (the [`state`](state::LibraryState) mutex)
//! serializes all entry points and notification delivery. Gets hold it
//! while awaiting the response, which intentionally serializes outstanding
//! gets: the get-response queue carries no request id. A separate lifecycle
//! lock guards switch initialization and shutdown.

mod client;
mod fdb;
mod hostif;
mod lag;
mod neighbor;
mod next_hop;
mod next_hop_group;
mod notifications;
mod policer;
mod port;
mod refs;
mod route;
mod router_interface;
mod state;
mod switch;
mod tunnel;
mod virtual_router;
mod vlan;

pub use client::{SaiClient, ViewTransition};
pub use notifications::NotificationHandlers;
pub use refs::{RefTarget, ReferenceTracker};
pub use state::{LibraryState, DEFAULT_VLAN_ID};
