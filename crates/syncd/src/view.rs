//! Candidate/applied view compilation.
//!
//! During init view the dispatcher records mutations here instead of
//! calling the SDK; apply view diffs the candidate against what is
//! currently applied and yields the minimum operation sequence. Both views
//! hold library-space (virtual-id) values; translation happens when the
//! resulting operations execute, which is why the plan must create an
//! object before anything that references it: executing a create rewrites
//! its object-id attributes, and a reference to a not-yet-bound virtual id
//! is fatal.

use sai_attr::Attribute;
use sai_types::ObjectType;
use std::cmp::Reverse;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct ViewObject {
    pub kind: ObjectType,
    pub object_ref: String,
    /// True when the view itself created the object; false when the view
    /// only holds sets against an object that pre-exists behind the daemon.
    pub created: bool,
    pub attrs: BTreeMap<u32, sai_attr::Value>,
}

/// One compiled configuration, keyed by `"<kind-name>:<object-ref>"`.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    objects: BTreeMap<String, ViewObject>,
}

/// An operation the diff wants executed.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewOp {
    Create {
        kind: ObjectType,
        object_ref: String,
        attrs: Vec<Attribute>,
    },
    Remove {
        kind: ObjectType,
        object_ref: String,
    },
    Set {
        kind: ObjectType,
        object_ref: String,
        attr: Attribute,
    },
}

fn view_key(kind: ObjectType, object_ref: &str) -> String {
    format!("{}:{}", kind.name(), object_ref)
}

/// Creation-order tier of a kind. A kind only ever references kinds in
/// strictly lower tiers, so creating tier by tier (and removing in the
/// reverse order) keeps every object reference bound when it is rewritten.
fn dependency_rank(kind: ObjectType) -> u8 {
    match kind {
        ObjectType::Null
        | ObjectType::Switch
        | ObjectType::Port
        | ObjectType::Lag
        | ObjectType::Vlan
        | ObjectType::VirtualRouter
        | ObjectType::Policer
        | ObjectType::QosMap
        | ObjectType::TunnelMap
        | ObjectType::BufferPool
        | ObjectType::Scheduler
        | ObjectType::Wred
        | ObjectType::Hash
        | ObjectType::Stp
        | ObjectType::Samplepacket
        | ObjectType::AclTable
        | ObjectType::Udf
        | ObjectType::Trap
        | ObjectType::UserDefinedTrap => 0,
        ObjectType::VlanMember
        | ObjectType::LagMember
        | ObjectType::RouterInterface
        | ObjectType::TrapGroup
        | ObjectType::BufferProfile
        | ObjectType::Mirror
        | ObjectType::SchedulerGroup
        | ObjectType::AclCounter
        | ObjectType::FdbEntry => 1,
        ObjectType::Tunnel
        | ObjectType::NeighborEntry
        | ObjectType::Hostif
        | ObjectType::Queue => 2,
        ObjectType::NextHop | ObjectType::TunnelTermTableEntry => 3,
        ObjectType::NextHopGroup => 4,
        ObjectType::RouteEntry | ObjectType::AclEntry => 5,
    }
}

fn op_rank(op: &ViewOp) -> u8 {
    match op {
        ViewOp::Create { kind, .. } | ViewOp::Remove { kind, .. } | ViewOp::Set { kind, .. } => {
            dependency_rank(*kind)
        }
    }
}

impl ViewState {
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn record_create(&mut self, kind: ObjectType, object_ref: &str, attrs: &[Attribute]) {
        self.objects.insert(
            view_key(kind, object_ref),
            ViewObject {
                kind,
                object_ref: object_ref.to_string(),
                created: true,
                attrs: attrs.iter().map(|a| (a.id, a.value.clone())).collect(),
            },
        );
    }

    pub fn record_set(&mut self, kind: ObjectType, object_ref: &str, attrs: &[Attribute]) {
        let object = self
            .objects
            .entry(view_key(kind, object_ref))
            .or_insert_with(|| ViewObject {
                kind,
                object_ref: object_ref.to_string(),
                created: false,
                attrs: BTreeMap::new(),
            });
        for attr in attrs {
            object.attrs.insert(attr.id, attr.value.clone());
        }
    }

    pub fn record_remove(&mut self, kind: ObjectType, object_ref: &str) {
        self.objects.remove(&view_key(kind, object_ref));
    }

    /// Computes the operations taking `current` to `candidate`.
    ///
    /// Removals come first, dependents before the objects they reference;
    /// then creations, referenced objects before their referrers; then
    /// attribute rewrites, after every target they might point at exists.
    pub fn diff(current: &ViewState, candidate: &ViewState) -> Vec<ViewOp> {
        let mut removes: Vec<ViewOp> = current
            .objects
            .iter()
            .filter(|(key, _)| !candidate.objects.contains_key(*key))
            .map(|(_, object)| ViewOp::Remove {
                kind: object.kind,
                object_ref: object.object_ref.clone(),
            })
            .collect();
        removes.sort_by_key(|op| Reverse(op_rank(op)));

        let mut creates = Vec::new();
        let mut sets = Vec::new();
        for (key, object) in &candidate.objects {
            match current.objects.get(key) {
                None if object.created => creates.push(ViewOp::Create {
                    kind: object.kind,
                    object_ref: object.object_ref.clone(),
                    attrs: object
                        .attrs
                        .iter()
                        .map(|(id, value)| Attribute::new(*id, value.clone()))
                        .collect(),
                }),
                None => {
                    // sets against a pre-existing object
                    for (id, value) in &object.attrs {
                        sets.push(ViewOp::Set {
                            kind: object.kind,
                            object_ref: object.object_ref.clone(),
                            attr: Attribute::new(*id, value.clone()),
                        });
                    }
                }
                Some(existing) => {
                    for (id, value) in &object.attrs {
                        if existing.attrs.get(id) != Some(value) {
                            sets.push(ViewOp::Set {
                                kind: object.kind,
                                object_ref: object.object_ref.clone(),
                                attr: Attribute::new(*id, value.clone()),
                            });
                        }
                    }
                }
            }
        }
        creates.sort_by_key(op_rank);

        let mut ops = removes;
        ops.append(&mut creates);
        ops.append(&mut sets);
        ops
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sai_attr::ids::vlan_attr;
    use sai_attr::Value;

    fn kind_of(op: &ViewOp) -> ObjectType {
        match op {
            ViewOp::Create { kind, .. } | ViewOp::Remove { kind, .. } | ViewOp::Set { kind, .. } => {
                *kind
            }
        }
    }

    #[test]
    fn test_identical_views_produce_no_ops() {
        let mut view = ViewState::default();
        view.record_create(ObjectType::Vlan, "100", &[]);
        assert!(ViewState::diff(&view.clone(), &view).is_empty());
    }

    #[test]
    fn test_diff_creates_and_removes() {
        let mut current = ViewState::default();
        current.record_create(ObjectType::Vlan, "100", &[]);

        let mut candidate = ViewState::default();
        candidate.record_create(ObjectType::Vlan, "200", &[]);

        let ops = ViewState::diff(&current, &candidate);
        assert_eq!(
            ops,
            vec![
                ViewOp::Remove { kind: ObjectType::Vlan, object_ref: "100".to_string() },
                ViewOp::Create {
                    kind: ObjectType::Vlan,
                    object_ref: "200".to_string(),
                    attrs: vec![],
                },
            ]
        );
    }

    #[test]
    fn test_creates_ordered_by_reference_dependency() {
        let current = ViewState::default();

        // recorded so that lexical key order would put every referrer
        // before the object it references
        let mut candidate = ViewState::default();
        candidate.record_create(ObjectType::NextHop, "nh", &[]);
        candidate.record_create(ObjectType::NextHopGroup, "nhg", &[]);
        candidate.record_create(ObjectType::RouteEntry, "route", &[]);
        candidate.record_create(ObjectType::RouterInterface, "rif", &[]);
        candidate.record_create(ObjectType::VirtualRouter, "vr", &[]);

        let kinds: Vec<ObjectType> = ViewState::diff(&current, &candidate)
            .iter()
            .map(kind_of)
            .collect();
        assert_eq!(
            kinds,
            vec![
                ObjectType::VirtualRouter,
                ObjectType::RouterInterface,
                ObjectType::NextHop,
                ObjectType::NextHopGroup,
                ObjectType::RouteEntry,
            ]
        );
    }

    #[test]
    fn test_removes_drop_dependents_first() {
        let mut current = ViewState::default();
        current.record_create(ObjectType::VirtualRouter, "vr", &[]);
        current.record_create(ObjectType::RouterInterface, "rif", &[]);
        current.record_create(ObjectType::NextHop, "nh", &[]);

        let candidate = ViewState::default();

        let kinds: Vec<ObjectType> = ViewState::diff(&current, &candidate)
            .iter()
            .map(kind_of)
            .collect();
        assert_eq!(
            kinds,
            vec![
                ObjectType::NextHop,
                ObjectType::RouterInterface,
                ObjectType::VirtualRouter,
            ]
        );
    }

    #[test]
    fn test_sets_come_after_creates() {
        let current = ViewState::default();

        let mut candidate = ViewState::default();
        // a set against a pre-existing trap referencing a created group
        candidate.record_set(
            ObjectType::Trap,
            "0000000000000007",
            &[Attribute::new(0, Value::S32(0))],
        );
        candidate.record_create(ObjectType::TrapGroup, "group", &[]);

        let ops = ViewState::diff(&current, &candidate);
        assert!(matches!(ops[0], ViewOp::Create { .. }));
        assert!(matches!(ops[1], ViewOp::Set { .. }));
    }

    #[test]
    fn test_diff_emits_sets_for_changed_attributes() {
        let mut current = ViewState::default();
        current.record_create(
            ObjectType::Vlan,
            "100",
            &[Attribute::new(vlan_attr::LEARN_DISABLE, Value::Bool(false))],
        );

        let mut candidate = ViewState::default();
        candidate.record_create(
            ObjectType::Vlan,
            "100",
            &[Attribute::new(vlan_attr::LEARN_DISABLE, Value::Bool(true))],
        );

        let ops = ViewState::diff(&current, &candidate);
        assert_eq!(
            ops,
            vec![ViewOp::Set {
                kind: ObjectType::Vlan,
                object_ref: "100".to_string(),
                attr: Attribute::new(vlan_attr::LEARN_DISABLE, Value::Bool(true)),
            }]
        );
    }

    #[test]
    fn test_sets_against_pre_existing_objects_stay_sets() {
        let current = ViewState::default();

        let mut candidate = ViewState::default();
        candidate.record_set(
            ObjectType::Vlan,
            "1",
            &[Attribute::new(vlan_attr::LEARN_DISABLE, Value::Bool(true))],
        );

        let ops = ViewState::diff(&current, &candidate);
        assert_eq!(ops.len(), 1);
        assert!(matches!(ops[0], ViewOp::Set { .. }));
    }

    #[test]
    fn test_remove_in_candidate_drops_object() {
        let mut candidate = ViewState::default();
        candidate.record_create(ObjectType::Vlan, "100", &[]);
        candidate.record_remove(ObjectType::Vlan, "100");
        assert!(candidate.is_empty());
    }
}
