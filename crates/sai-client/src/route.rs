//! Route entry operations.
//!
//! Routes are entry-keyed: the canonical `(virtual router, prefix)` string
//! is both the local index key and the bus object ref.

use crate::client::{check_gettable, find_attr, SaiClient};
use crate::refs::{RefTarget, KEY_REF};
use crate::state::LibraryState;
use sai_attr::codec::serialize_attrs;
use sai_attr::ids::route_attr;
use sai_attr::Attribute;
use sai_types::{ObjectId, ObjectType, RouteEntry, SaiResult, Status};
use tracing::{debug, warn};

const SETTABLE: &[u32] = &[route_attr::TRAP_PRIORITY, route_attr::META_DATA];

const GETTABLE: &[u32] = &[
    route_attr::PACKET_ACTION,
    route_attr::TRAP_PRIORITY,
    route_attr::NEXT_HOP_ID,
    route_attr::META_DATA,
];

/// Checks the entry's virtual router and any `NEXT_HOP_ID` target against
/// the local indices, returning the referenced next-hop target if present.
fn validate_route_references(
    state: &LibraryState,
    entry: &RouteEntry,
    attrs: &[Attribute],
) -> SaiResult<Option<ObjectId>> {
    if !state.is_virtual_router(entry.vr_id) {
        warn!(vr_id = %entry.vr_id, "virtual router is missing");
        return Err(Status::InvalidParameter);
    }

    let Some(attr) = find_attr(attrs, route_attr::NEXT_HOP_ID) else {
        return Ok(None);
    };
    let next_hop = attr.value.as_oid().ok_or(Status::InvalidParameter)?;
    let valid = match next_hop.object_type() {
        ObjectType::NextHop => state.next_hops.contains(&next_hop),
        ObjectType::NextHopGroup => state.next_hop_groups.contains(&next_hop),
        ObjectType::RouterInterface => state.router_interfaces.contains(&next_hop),
        // punting straight to the CPU is legal
        ObjectType::Port => state.is_port(next_hop),
        _ => false,
    };
    if !valid {
        warn!(%next_hop, "next hop is missing");
        return Err(Status::InvalidParameter);
    }
    Ok(Some(next_hop))
}

impl SaiClient {
    pub fn create_route(&self, entry: &RouteEntry, attrs: &[Attribute]) -> SaiResult<()> {
        let mut state = self.inner.state.lock().unwrap();

        let next_hop = validate_route_references(&state, entry, attrs)?;
        let key = entry.to_string();
        if state.routes.contains(&key) {
            warn!(%key, "route already exists");
            return Err(Status::ItemAlreadyExists);
        }

        self.inner.push_create(ObjectType::RouteEntry, &key, attrs)?;
        debug!(%key, "inserting route to local state");
        state.routes.insert(key.clone());
        state
            .refs
            .acquire(&key, KEY_REF, vec![RefTarget::Object(entry.vr_id)]);
        if let Some(next_hop) = next_hop {
            state
                .refs
                .acquire(&key, route_attr::NEXT_HOP_ID, vec![RefTarget::Object(next_hop)]);
        }
        Ok(())
    }

    /// Creates several routes as one batch.
    ///
    /// Every entry is fully validated first (virtual router, next-hop
    /// target, attribute list, key uniqueness), under one hold of the API
    /// lock; nothing is marshalled unless the whole batch passes, so a
    /// rejected batch leaves no partial state.
    pub fn create_routes(&self, entries: &[(RouteEntry, Vec<Attribute>)]) -> SaiResult<()> {
        let mut state = self.inner.state.lock().unwrap();

        let mut keys = std::collections::HashSet::new();
        let mut next_hops = Vec::with_capacity(entries.len());
        for (entry, attrs) in entries {
            let next_hop = validate_route_references(&state, entry, attrs)?;
            // catch malformed attribute lists before anything is sent
            serialize_attrs(ObjectType::RouteEntry, attrs, false).map_err(|e| {
                warn!(error = %e, "attribute list rejected");
                Status::InvalidParameter
            })?;
            let key = entry.to_string();
            if state.routes.contains(&key) || !keys.insert(key.clone()) {
                warn!(%key, "route already exists");
                return Err(Status::ItemAlreadyExists);
            }
            next_hops.push(next_hop);
        }

        for ((entry, attrs), next_hop) in entries.iter().zip(next_hops) {
            let key = entry.to_string();
            self.inner.push_create(ObjectType::RouteEntry, &key, attrs)?;
            debug!(%key, "inserting route to local state");
            state.routes.insert(key.clone());
            state
                .refs
                .acquire(&key, KEY_REF, vec![RefTarget::Object(entry.vr_id)]);
            if let Some(next_hop) = next_hop {
                state
                    .refs
                    .acquire(&key, route_attr::NEXT_HOP_ID, vec![RefTarget::Object(next_hop)]);
            }
        }
        Ok(())
    }

    pub fn remove_route(&self, entry: &RouteEntry) -> SaiResult<()> {
        let mut state = self.inner.state.lock().unwrap();
        let key = entry.to_string();
        if !state.routes.contains(&key) {
            warn!(%key, "route is missing");
            return Err(Status::InvalidParameter);
        }

        self.inner.push_remove(ObjectType::RouteEntry, &key)?;
        debug!(%key, "erasing route from local state");
        state.routes.remove(&key);
        state.refs.release_holder(&key);
        Ok(())
    }

    pub fn set_route_attribute(&self, entry: &RouteEntry, attr: &Attribute) -> SaiResult<()> {
        let state = self.inner.state.lock().unwrap();
        let key = entry.to_string();
        if !state.routes.contains(&key) {
            warn!(%key, "route is missing");
            return Err(Status::InvalidParameter);
        }
        if !SETTABLE.contains(&attr.id) {
            warn!(id = attr.id, "setting attribute id is not supported");
            return Err(Status::InvalidParameter);
        }
        self.inner.push_set(ObjectType::RouteEntry, &key, attr)
    }

    pub fn get_route_attribute(
        &self,
        entry: &RouteEntry,
        attrs: &mut [Attribute],
    ) -> SaiResult<()> {
        let state = self.inner.state.lock().unwrap();
        let key = entry.to_string();
        if !state.routes.contains(&key) {
            warn!(%key, "route is missing");
            return Err(Status::InvalidParameter);
        }
        check_gettable(attrs, GETTABLE)?;
        self.inner.get_attributes(ObjectType::RouteEntry, &key, attrs)
    }
}
