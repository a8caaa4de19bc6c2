//! Priority queue banding, ordering, and idempotence scenarios
//!
//! Exercises the rank corpus {0, 2, 2, 4, 6} with distinct payloads h1..h5
//! (h2 and h3 share rank 2), plus the sorted-list comparator surface.

use corral_collections::{Band, Comparator, Priority, PriorityQueue, Restrictions, SortedList};
use corral_core::{Error, Strictness, TypeRegistry, TypeTag, Value};
use std::rc::Rc;

// ============================================================================
// Test Helpers
// ============================================================================

fn string_restrictions(strictness: Strictness) -> Restrictions {
    Restrictions::new(
        &[TypeTag::Str],
        &[],
        strictness,
        Rc::new(TypeRegistry::new()),
    )
    .unwrap()
}

fn corpus() -> PriorityQueue {
    let mut queue = PriorityQueue::new(string_restrictions(Strictness::Strict));
    queue
        .push_many(vec![
            (Value::Str("h1".into()), 0),
            (Value::Str("h2".into()), 2),
            (Value::Str("h3".into()), 2),
            (Value::Str("h4".into()), 4),
            (Value::Str("h5".into()), 6),
        ])
        .unwrap();
    queue
}

fn names(values: &[Value]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect()
}

// ============================================================================
// Banding
// ============================================================================

#[test]
fn test_equal_band_returns_ties_in_insertion_order() {
    let queue = corpus();
    assert_eq!(names(&queue.index(2, Band::Equal)), vec!["h2", "h3"]);
}

#[test]
fn test_higher_band_is_rank_gte_query() {
    let queue = corpus();
    assert_eq!(names(&queue.index(3, Band::Higher)), vec!["h4", "h5"]);
    assert_eq!(
        names(&queue.index(0, Band::Higher)),
        vec!["h1", "h2", "h3", "h4", "h5"]
    );
}

#[test]
fn test_lower_band_is_rank_lte_query() {
    let queue = corpus();
    assert_eq!(names(&queue.index(1, Band::Lower)), vec!["h1"]);
    assert_eq!(names(&queue.index(2, Band::Lower)), vec!["h1", "h2", "h3"]);
}

#[test]
fn test_index_range_matches_band_intersection() {
    let queue = corpus();
    let range = queue.index_range(2, 4).unwrap();
    let higher = queue.index(2, Band::Higher);
    let lower = queue.index(4, Band::Lower);
    for payload in &range {
        assert!(higher.contains(payload));
        assert!(lower.contains(payload));
    }
    assert_eq!(names(&range), vec!["h2", "h3", "h4"]);
}

// ============================================================================
// Ordering and consumption
// ============================================================================

#[test]
fn test_pop_consumes_in_rank_then_insertion_order() {
    let mut queue = corpus();
    let mut drained = Vec::new();
    while let Some(payload) = queue.pop().ok().flatten() {
        drained.push(payload.as_str().unwrap().to_string());
    }
    assert_eq!(drained, vec!["h1", "h2", "h3", "h4", "h5"]);
}

#[test]
fn test_top_and_bottom_peek_without_removal() {
    let queue = corpus();
    assert_eq!(queue.top().unwrap(), Some(&Value::Str("h1".into())));
    assert_eq!(queue.bottom().unwrap(), Some(&Value::Str("h5".into())));
    assert_eq!(queue.len(), 5);
}

#[test]
fn test_wrappers_expose_rank_and_payload() {
    let queue = corpus();
    let ranks: Vec<i64> = queue.iter().map(Priority::rank).collect();
    assert_eq!(ranks, vec![0, 2, 2, 4, 6]);
}

// ============================================================================
// Deletion
// ============================================================================

#[test]
fn test_delete_priority_idempotent() {
    let mut queue = corpus();
    assert_eq!(queue.delete_priority(2), 2);
    assert_eq!(queue.delete_priority(2), 0);
    assert_eq!(names(&queue.index(0, Band::Higher)), vec!["h1", "h4", "h5"]);
}

#[test]
fn test_delete_payload_then_strict_miss() {
    let mut queue = corpus();
    assert!(queue.delete(&Value::Str("h4".into())).unwrap());
    assert!(matches!(
        queue.delete(&Value::Str("h4".into())).unwrap_err(),
        Error::NotFound(_)
    ));
}

// ============================================================================
// SortedList comparator injection
// ============================================================================

#[test]
fn test_sorted_list_with_length_comparator() {
    let by_len: Comparator = Rc::new(|a: &Value, b: &Value| {
        let la = a.as_str().map(str::len).unwrap_or(0);
        let lb = b.as_str().map(str::len).unwrap_or(0);
        la.cmp(&lb)
    });
    let mut list = SortedList::new(string_restrictions(Strictness::Strict), by_len);
    list.push(vec![
        Value::Str("aaa".into()),
        Value::Str("a".into()),
        Value::Str("aa".into()),
    ])
    .unwrap();
    let lens: Vec<usize> = list.iter().map(|v| v.as_str().unwrap().len()).collect();
    assert_eq!(lens, vec![1, 2, 3]);
    assert_eq!(list.top().unwrap(), Some(&Value::Str("a".into())));
}

#[test]
fn test_sorted_list_stable_for_comparator_ties() {
    let by_len: Comparator = Rc::new(|a: &Value, b: &Value| {
        let la = a.as_str().map(str::len).unwrap_or(0);
        let lb = b.as_str().map(str::len).unwrap_or(0);
        la.cmp(&lb)
    });
    let mut list = SortedList::new(string_restrictions(Strictness::Strict), by_len);
    list.push(vec![
        Value::Str("bb".into()),
        Value::Str("cc".into()),
        Value::Str("aa".into()),
    ])
    .unwrap();
    // All ties under the length comparator: insertion order preserved
    let seen: Vec<&str> = list.iter().map(|v| v.as_str().unwrap()).collect();
    assert_eq!(seen, vec!["bb", "cc", "aa"]);
}
