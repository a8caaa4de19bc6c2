//! Rank-ordered priority queue with banded queries
//!
//! Each element is a [`Priority`] pair wrapping a payload with a rank. Lower
//! rank means higher urgency: `pop` removes the lowest-ranked payload. The
//! queue re-sorts with a **stable** sort after every push batch, so payloads
//! sharing a rank keep insertion order — the documented tie-break.
//!
//! Banded queries select payloads relative to a query rank:
//! - `Equal`: rank == query
//! - `Higher`: rank >= query (ties included; directionally *less* urgent)
//! - `Lower`: rank <= query

use crate::restrictions::Restrictions;
use corral_core::{Error, Result, Value};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// A payload wrapped with its ordering rank
#[derive(Debug, Clone, PartialEq)]
pub struct Priority {
    payload: Value,
    rank: i64,
}

impl Priority {
    /// Pair a payload with a rank
    pub fn new(payload: Value, rank: i64) -> Self {
        Self { payload, rank }
    }

    /// The wrapped payload
    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// The ordering rank (lower = popped first)
    pub fn rank(&self) -> i64 {
        self.rank
    }

    /// Unwrap into the payload
    pub fn into_payload(self) -> Value {
        self.payload
    }
}

/// Band selector for rank queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Band {
    /// Exactly the query rank
    Equal,
    /// Rank greater than or equal to the query (ties included)
    Higher,
    /// Rank less than or equal to the query (ties included)
    Lower,
}

/// Priority-ordered queue of admitted payloads
///
/// Invariant: elements are sorted by rank ascending after every mutating
/// operation that can break order; equal ranks keep insertion order.
#[derive(Debug, Clone)]
pub struct PriorityQueue {
    elements: Vec<Priority>,
    restrictions: Restrictions,
}

impl PriorityQueue {
    /// Create an empty queue gated by the given predicate
    pub fn new(restrictions: Restrictions) -> Self {
        Self {
            elements: Vec::new(),
            restrictions,
        }
    }

    /// The predicate gating payloads
    pub fn restrictions(&self) -> &Restrictions {
        &self.restrictions
    }

    /// Push one payload at a rank; returns the new size
    ///
    /// # Errors
    /// [`Error::Untypeable`] (always), [`Error::RestrictionViolation`]
    /// (strict); lenient rejection skips the payload.
    pub fn push(&mut self, payload: Value, rank: i64) -> Result<usize> {
        self.push_many(vec![(payload, rank)])
    }

    /// Push a batch, re-sorting once after all pushes in the call
    ///
    /// Admission is screened per payload before any mutation: strict fails
    /// the whole call on the first inadmissible payload; lenient skips it.
    ///
    /// # Errors
    /// As for [`PriorityQueue::push`].
    pub fn push_many(&mut self, entries: Vec<(Value, i64)>) -> Result<usize> {
        let strict = self.restrictions.strictness().is_strict();
        let mut admitted = Vec::new();
        for (payload, rank) in entries {
            let (classified, ok) = self.restrictions.admit_value(&payload)?;
            if ok {
                admitted.push(Priority::new(payload, rank));
            } else if strict {
                return Err(self.restrictions.violation(&classified));
            } else {
                debug!(
                    target: "corral::priority_queue",
                    kind = %classified,
                    rank,
                    "lenient push skipped inadmissible payload"
                );
            }
        }
        if !admitted.is_empty() {
            self.elements.extend(admitted);
            self.sort();
        }
        Ok(self.elements.len())
    }

    fn sort(&mut self) {
        trace!(target: "corral::priority_queue", len = self.elements.len(), "stable sort pass");
        // Stable: equal ranks keep insertion order
        self.elements.sort_by_key(Priority::rank);
    }

    /// The most urgent (lowest-ranked) payload, without removing it
    ///
    /// # Errors
    /// [`Error::EmptyCollection`] when strict and empty.
    pub fn top(&self) -> Result<Option<&Value>> {
        match self.elements.first() {
            Some(element) => Ok(Some(element.payload())),
            None if self.restrictions.strictness().is_strict() => {
                Err(Error::EmptyCollection("top"))
            }
            None => Ok(None),
        }
    }

    /// The least urgent (highest-ranked) payload, without removing it
    ///
    /// # Errors
    /// [`Error::EmptyCollection`] when strict and empty.
    pub fn bottom(&self) -> Result<Option<&Value>> {
        match self.elements.last() {
            Some(element) => Ok(Some(element.payload())),
            None if self.restrictions.strictness().is_strict() => {
                Err(Error::EmptyCollection("bottom"))
            }
            None => Ok(None),
        }
    }

    /// Remove and return the most urgent payload — the payload, not the
    /// [`Priority`] wrapper
    ///
    /// # Errors
    /// [`Error::EmptyCollection`] when strict and empty.
    pub fn pop(&mut self) -> Result<Option<Value>> {
        if self.elements.is_empty() {
            if self.restrictions.strictness().is_strict() {
                return Err(Error::EmptyCollection("pop"));
            }
            return Ok(None);
        }
        Ok(Some(self.elements.remove(0).into_payload()))
    }

    /// Payloads in the requested band relative to `rank`, in queue order
    pub fn index(&self, rank: i64, band: Band) -> Vec<Value> {
        self.elements
            .iter()
            .filter(|element| match band {
                Band::Equal => element.rank() == rank,
                Band::Higher => element.rank() >= rank,
                Band::Lower => element.rank() <= rank,
            })
            .map(|element| element.payload().clone())
            .collect()
    }

    /// Payloads whose rank lies in `[min, max]`, both ends inclusive,
    /// deduplicated
    ///
    /// Equivalent to intersecting the `Higher(min)` and `Lower(max)` bands.
    ///
    /// # Errors
    /// [`Error::InvalidRange`] when `min > max`.
    pub fn index_range(&self, min: i64, max: i64) -> Result<Vec<Value>> {
        if min > max {
            return Err(Error::InvalidRange(format!(
                "rank range [{min}, {max}] is inverted"
            )));
        }
        let mut out: Vec<Value> = Vec::new();
        for element in &self.elements {
            if element.rank() >= min
                && element.rank() <= max
                && !out.contains(element.payload())
            {
                out.push(element.payload().clone());
            }
        }
        Ok(out)
    }

    /// Remove the first element whose payload equals `payload`; no re-sort
    /// needed
    ///
    /// # Errors
    /// [`Error::NotFound`] when strict and nothing matches.
    pub fn delete(&mut self, payload: &Value) -> Result<bool> {
        match self
            .elements
            .iter()
            .position(|element| element.payload() == payload)
        {
            Some(index) => {
                self.elements.remove(index);
                Ok(true)
            }
            None if self.restrictions.strictness().is_strict() => {
                Err(Error::NotFound(payload.describe()))
            }
            None => Ok(false),
        }
    }

    /// Remove every element with exactly the given rank, returning the count
    /// removed
    ///
    /// Idempotent: a second call with the same rank removes nothing and
    /// returns zero rather than erroring.
    pub fn delete_priority(&mut self, rank: i64) -> usize {
        let before = self.elements.len();
        self.elements.retain(|element| element.rank() != rank);
        before - self.elements.len()
    }

    /// Structurally disabled: would break the sort invariant
    ///
    /// # Errors
    /// Always [`Error::UnsupportedOperation`].
    pub fn exchange(&mut self) -> Result<()> {
        Err(Error::UnsupportedOperation {
            operation: "exchange",
            collection: "PriorityQueue",
            reason: "would break the sort invariant",
        })
    }

    /// Structurally disabled: would break the sort invariant
    ///
    /// # Errors
    /// Always [`Error::UnsupportedOperation`].
    pub fn roll(&mut self, _positions: i64) -> Result<()> {
        Err(Error::UnsupportedOperation {
            operation: "roll",
            collection: "PriorityQueue",
            reason: "would break the sort invariant",
        })
    }

    /// Number of queued elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True when empty
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Remove all elements
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Iterate the [`Priority`] wrappers in queue order
    pub fn iter(&self) -> impl Iterator<Item = &Priority> {
        self.elements.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corral_core::{Strictness, TypeRegistry, TypeTag};
    use std::rc::Rc;

    fn str_queue(strictness: Strictness) -> PriorityQueue {
        let restrictions = Restrictions::new(
            &[TypeTag::Str],
            &[],
            strictness,
            Rc::new(TypeRegistry::new()),
        )
        .unwrap();
        PriorityQueue::new(restrictions)
    }

    fn handles() -> PriorityQueue {
        // Ranks {0,2,2,4,6} with distinct payloads h1..h5
        let mut queue = str_queue(Strictness::Strict);
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

    fn payload_strs(values: &[Value]) -> Vec<&str> {
        values.iter().map(|v| v.as_str().unwrap()).collect()
    }

    #[test]
    fn test_pop_returns_lowest_rank_payload() {
        let mut queue = str_queue(Strictness::Strict);
        queue.push(Value::Str("late".into()), 9).unwrap();
        queue.push(Value::Str("early".into()), 1).unwrap();
        assert_eq!(queue.pop().unwrap(), Some(Value::Str("early".into())));
        assert_eq!(queue.pop().unwrap(), Some(Value::Str("late".into())));
    }

    #[test]
    fn test_rank_order_invariant_after_pushes() {
        let mut queue = str_queue(Strictness::Strict);
        for (name, rank) in [("a", 5), ("b", 1), ("c", 3), ("d", 2)] {
            queue.push(Value::Str(name.into()), rank).unwrap();
        }
        let ranks: Vec<i64> = queue.iter().map(Priority::rank).collect();
        let mut sorted = ranks.clone();
        sorted.sort();
        assert_eq!(ranks, sorted);
    }

    #[test]
    fn test_equal_rank_keeps_insertion_order() {
        let queue = handles();
        let equal = queue.index(2, Band::Equal);
        assert_eq!(payload_strs(&equal), vec!["h2", "h3"]);

        // Still holds after unrelated pushes re-sort the queue
        let mut queue = queue;
        queue.push(Value::Str("h6".into()), 1).unwrap();
        queue.push(Value::Str("h7".into()), 2).unwrap();
        let equal = queue.index(2, Band::Equal);
        assert_eq!(payload_strs(&equal), vec!["h2", "h3", "h7"]);
    }

    #[test]
    fn test_banded_queries() {
        let queue = handles();
        assert_eq!(payload_strs(&queue.index(3, Band::Higher)), vec!["h4", "h5"]);
        assert_eq!(payload_strs(&queue.index(1, Band::Lower)), vec!["h1"]);
        assert_eq!(
            payload_strs(&queue.index(2, Band::Higher)),
            vec!["h2", "h3", "h4", "h5"]
        );
        assert!(queue.index(7, Band::Equal).is_empty());
    }

    #[test]
    fn test_index_range_inclusive_and_validated() {
        let queue = handles();
        assert_eq!(
            payload_strs(&queue.index_range(2, 4).unwrap()),
            vec!["h2", "h3", "h4"]
        );
        assert_eq!(
            payload_strs(&queue.index_range(0, 6).unwrap()),
            vec!["h1", "h2", "h3", "h4", "h5"]
        );
        assert!(matches!(
            queue.index_range(4, 2).unwrap_err(),
            Error::InvalidRange(_)
        ));
    }

    #[test]
    fn test_index_range_deduplicates_payloads() {
        let mut queue = str_queue(Strictness::Strict);
        queue.push(Value::Str("dup".into()), 1).unwrap();
        queue.push(Value::Str("dup".into()), 2).unwrap();
        assert_eq!(payload_strs(&queue.index_range(0, 5).unwrap()), vec!["dup"]);
    }

    #[test]
    fn test_delete_removes_first_payload_match() {
        let mut queue = handles();
        assert!(queue.delete(&Value::Str("h3".into())).unwrap());
        assert_eq!(queue.len(), 4);
        assert!(queue.index(2, Band::Equal).len() == 1);
    }

    #[test]
    fn test_delete_priority_is_idempotent() {
        let mut queue = handles();
        assert_eq!(queue.delete_priority(2), 2);
        assert_eq!(queue.delete_priority(2), 0);
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn test_admission_gating() {
        let mut strict = str_queue(Strictness::Strict);
        assert!(matches!(
            strict.push(Value::Int(1), 0).unwrap_err(),
            Error::RestrictionViolation { .. }
        ));
        assert!(strict.is_empty());

        let mut lenient = str_queue(Strictness::Lenient);
        let size = lenient
            .push_many(vec![(Value::Str("ok".into()), 1), (Value::Int(1), 0)])
            .unwrap();
        assert_eq!(size, 1);
    }

    #[test]
    fn test_strict_batch_push_is_all_or_nothing() {
        let mut queue = str_queue(Strictness::Strict);
        let err = queue
            .push_many(vec![(Value::Str("ok".into()), 1), (Value::Int(1), 0)])
            .unwrap_err();
        assert!(matches!(err, Error::RestrictionViolation { .. }));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_exchange_and_roll_disabled() {
        let mut queue = handles();
        assert!(matches!(
            queue.exchange().unwrap_err(),
            Error::UnsupportedOperation { .. }
        ));
        assert!(matches!(
            queue.roll(2).unwrap_err(),
            Error::UnsupportedOperation { .. }
        ));
        assert_eq!(queue.len(), 5);
    }

    #[test]
    fn test_empty_queue_strict_vs_lenient() {
        let mut strict = str_queue(Strictness::Strict);
        assert!(matches!(
            strict.pop().unwrap_err(),
            Error::EmptyCollection("pop")
        ));
        let mut lenient = str_queue(Strictness::Lenient);
        assert_eq!(lenient.pop().unwrap(), None);
        assert_eq!(lenient.top().unwrap(), None);
        assert_eq!(lenient.bottom().unwrap(), None);
    }
}
