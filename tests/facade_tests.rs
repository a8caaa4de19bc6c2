//! End-to-end tests through the `corral` facade
//!
//! Exercises the re-exported surface the way an embedding application would:
//! build a registry, derive restrictions, and push values through the
//! collection family, including JSON ingestion.

use corral::{
    Band, ClassDef, LexicographicList, PriorityQueue, RestrictedSet, Restrictions, SetConfig,
    Strictness, TaggedUnion, TypeRegistry, TypeTag, Value,
};
use serde_json::json;
use std::rc::Rc;

fn registry() -> Rc<TypeRegistry> {
    let mut registry = TypeRegistry::new();
    registry
        .register_class(ClassDef::new("Job").method("describe", |inst, _| {
            Ok(inst.field("label").cloned().unwrap_or(Value::Null))
        }))
        .unwrap();
    Rc::new(registry)
}

#[test]
fn test_json_ingestion_into_restricted_set() {
    let registry = registry();
    let records = Restrictions::new(
        &[TypeTag::Record],
        &[],
        Strictness::Lenient,
        registry,
    )
    .unwrap();
    let mut set = RestrictedSet::new(records, SetConfig::default());

    let parsed = Value::from_json(json!({"kind": "record", "n": 1}));
    assert!(set.add(parsed).unwrap().is_some());
    // Scalars from JSON are filtered by the record-only predicate
    assert!(set.add(Value::from_json(json!(42))).unwrap().is_none());
    assert_eq!(set.len(), 1);
}

#[test]
fn test_event_dispatch_shape() {
    // The event-system contract: a priority queue of handler names with
    // banded queries and payload deletion.
    let handlers = Restrictions::new(
        &[TypeTag::Str],
        &[],
        Strictness::Strict,
        registry(),
    )
    .unwrap();
    let mut queue = PriorityQueue::new(handlers);
    queue.push(Value::Str("audit".into()), 10).unwrap();
    queue.push(Value::Str("validate".into()), 0).unwrap();
    queue.push(Value::Str("persist".into()), 5).unwrap();

    assert_eq!(queue.pop().unwrap(), Some(Value::Str("validate".into())));
    assert_eq!(queue.index(5, Band::Higher).len(), 2);
    assert!(queue.delete(&Value::Str("audit".into())).unwrap());
    assert_eq!(queue.len(), 1);
}

#[test]
fn test_tagged_union_round_trip() {
    let flexible = Restrictions::default_for(registry(), Strictness::Strict);
    let mut union = TaggedUnion::new(flexible);
    union.set(Value::Bool(true)).unwrap();
    assert_eq!(union.get_type(), TypeTag::Bool);
    union.set(Value::from_json(json!([1, 2, 3]))).unwrap();
    assert_eq!(union.get_type(), TypeTag::Seq);
}

#[test]
fn test_lexicographic_list_facade() {
    let mut list = LexicographicList::strings_only(registry(), Strictness::Strict);
    list.push(vec![
        Value::Str("gamma".into()),
        Value::Str("alpha".into()),
        Value::Str("beta".into()),
    ])
    .unwrap();
    assert_eq!(list.pop().unwrap(), Some(Value::Str("alpha".into())));
    assert_eq!(list.bottom().unwrap(), Some(&Value::Str("gamma".into())));
}
