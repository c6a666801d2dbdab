//! Reference counting across the object graph.
//!
//! Router interfaces point at virtual routers and ports; next hops at
//! router interfaces; routes at next hops or groups. Removing a target that
//! something still points at would leave a dangling reference behind the
//! daemon, so creates and sets acquire references and removes refuse while
//! a target's count is non-zero.

use sai_types::ObjectId;
use std::collections::HashMap;

/// Something a reference can point at: an object id or a VLAN number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefTarget {
    Object(ObjectId),
    Vlan(u16),
}

/// Sentinel attribute id for references embedded in an entry key
/// (a route's virtual router, a neighbor's router interface).
pub const KEY_REF: u32 = u32::MAX;

/// Per-target reference counts plus the per-holder bookkeeping needed to
/// release them symmetrically.
///
/// A holder is identified by its canonical string (object id hex or entry
/// key). Re-acquiring the same `(holder, attr)` slot first releases the
/// previous targets, so a `set` replacing a reference swaps the counts
/// rather than leaking one.
#[derive(Debug, Default)]
pub struct ReferenceTracker {
    counts: HashMap<RefTarget, u64>,
    held: HashMap<String, HashMap<u32, Vec<RefTarget>>>,
}

impl ReferenceTracker {
    pub fn new() -> Self {
        ReferenceTracker::default()
    }

    /// Records that `holder` references `targets` through attribute `attr`,
    /// releasing whatever that slot previously held.
    ///
    /// Null object ids are ignored.
    pub fn acquire(&mut self, holder: &str, attr: u32, targets: Vec<RefTarget>) {
        let targets: Vec<RefTarget> = targets
            .into_iter()
            .filter(|t| !matches!(t, RefTarget::Object(oid) if oid.is_null()))
            .collect();

        let slot = self
            .held
            .entry(holder.to_string())
            .or_default()
            .insert(attr, targets.clone());
        if let Some(previous) = slot {
            for target in previous {
                self.decrement(target);
            }
        }
        for target in targets {
            *self.counts.entry(target).or_default() += 1;
        }
    }

    /// Releases every reference `holder` acquired.
    pub fn release_holder(&mut self, holder: &str) {
        if let Some(slots) = self.held.remove(holder) {
            for (_, targets) in slots {
                for target in targets {
                    self.decrement(target);
                }
            }
        }
    }

    pub fn count(&self, target: RefTarget) -> u64 {
        self.counts.get(&target).copied().unwrap_or(0)
    }

    pub fn in_use(&self, target: RefTarget) -> bool {
        self.count(target) > 0
    }

    pub fn clear(&mut self) {
        self.counts.clear();
        self.held.clear();
    }

    fn decrement(&mut self, target: RefTarget) {
        if let Some(count) = self.counts.get_mut(&target) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.counts.remove(&target);
            }
        }
    }
}
