//! Comparator-injected sorted list
//!
//! The general form of the sorted family: elements are admitted through a
//! [`Restrictions`] predicate and kept ascending under an injected total
//! order. `top` is the least element, `bottom` the greatest; `pop` removes
//! and returns `top`.

use crate::restrictions::Restrictions;
use corral_core::{Error, Result, Value};
use std::cmp::Ordering;
use std::rc::Rc;
use tracing::{debug, trace};

/// Injected two-way total order over values
pub type Comparator = Rc<dyn Fn(&Value, &Value) -> Ordering>;

/// An always-sorted list of admitted values
///
/// Invariant: after every mutating operation that can break order, the
/// elements are sorted ascending by the comparator. The sort is stable, so
/// comparator-equal elements keep insertion order.
#[derive(Clone)]
pub struct SortedList {
    elements: Vec<Value>,
    restrictions: Restrictions,
    compare: Comparator,
}

impl SortedList {
    /// Create an empty list with an injected comparator
    pub fn new(restrictions: Restrictions, compare: Comparator) -> Self {
        Self {
            elements: Vec::new(),
            restrictions,
            compare,
        }
    }

    /// The predicate gating this list
    pub fn restrictions(&self) -> &Restrictions {
        &self.restrictions
    }

    /// Push a batch of values, re-sorting once after the batch
    ///
    /// Admission is checked per element **before any mutation**: under strict
    /// restrictions one inadmissible element fails the whole call; under
    /// lenient restrictions inadmissible elements are skipped. Returns the
    /// new size.
    ///
    /// # Errors
    /// [`Error::Untypeable`] (always), [`Error::RestrictionViolation`]
    /// (strict).
    pub fn push(&mut self, values: impl IntoIterator<Item = Value>) -> Result<usize> {
        let admitted = self.screen(values)?;
        if !admitted.is_empty() {
            self.elements.extend(admitted);
            self.sort();
        }
        Ok(self.elements.len())
    }

    /// Admission-screen a batch without mutating
    fn screen(&self, values: impl IntoIterator<Item = Value>) -> Result<Vec<Value>> {
        let strict = self.restrictions.strictness().is_strict();
        let mut admitted = Vec::new();
        for value in values {
            let (classified, ok) = self.restrictions.admit_value(&value)?;
            if ok {
                admitted.push(value);
            } else if strict {
                return Err(self.restrictions.violation(&classified));
            } else {
                debug!(
                    target: "corral::sorted",
                    kind = %classified,
                    "lenient push skipped inadmissible value"
                );
            }
        }
        Ok(admitted)
    }

    fn sort(&mut self) {
        trace!(target: "corral::sorted", len = self.elements.len(), "stable sort pass");
        let compare = self.compare.clone();
        self.elements.sort_by(|a, b| compare(a, b));
    }

    /// The least element, without removing it
    ///
    /// # Errors
    /// [`Error::EmptyCollection`] when strict and empty; lenient returns
    /// `Ok(None)`.
    pub fn top(&self) -> Result<Option<&Value>> {
        match self.elements.first() {
            Some(value) => Ok(Some(value)),
            None if self.restrictions.strictness().is_strict() => {
                Err(Error::EmptyCollection("top"))
            }
            None => Ok(None),
        }
    }

    /// The greatest element, without removing it
    ///
    /// # Errors
    /// [`Error::EmptyCollection`] when strict and empty.
    pub fn bottom(&self) -> Result<Option<&Value>> {
        match self.elements.last() {
            Some(value) => Ok(Some(value)),
            None if self.restrictions.strictness().is_strict() => {
                Err(Error::EmptyCollection("bottom"))
            }
            None => Ok(None),
        }
    }

    /// Remove and return the least element
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
        // Removal of the minimum never creates disorder
        Ok(Some(self.elements.remove(0)))
    }

    /// Element at a position in sorted order
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.elements.get(index)
    }

    /// Replace the element at `index`, re-sorting afterwards
    ///
    /// # Errors
    /// [`Error::InvalidRange`] for an out-of-bounds index;
    /// [`Error::RestrictionViolation`]/[`Error::Untypeable`] per admission
    /// (strict); lenient inadmissible replacement is a no-op returning
    /// `Ok(false)`.
    pub fn set(&mut self, index: usize, value: Value) -> Result<bool> {
        if index >= self.elements.len() {
            return Err(Error::InvalidRange(format!(
                "index {index} out of bounds for length {}",
                self.elements.len()
            )));
        }
        let (classified, ok) = self.restrictions.admit_value(&value)?;
        if !ok {
            if self.restrictions.strictness().is_strict() {
                return Err(self.restrictions.violation(&classified));
            }
            return Ok(false);
        }
        self.elements[index] = value;
        self.sort();
        Ok(true)
    }

    /// Remove the first element equal to `value`; no re-sort needed
    ///
    /// # Errors
    /// [`Error::NotFound`] when strict and nothing matches; lenient returns
    /// `Ok(false)`.
    pub fn delete(&mut self, value: &Value) -> Result<bool> {
        match self.elements.iter().position(|stored| stored == value) {
            Some(index) => {
                self.elements.remove(index);
                Ok(true)
            }
            None if self.restrictions.strictness().is_strict() => {
                Err(Error::NotFound(value.describe()))
            }
            None => Ok(false),
        }
    }

    /// Re-insert a copy of the least element, returning the new size
    ///
    /// No invariant risk: duplicating the minimum keeps order (stable sort
    /// places the copy beside the original).
    ///
    /// # Errors
    /// [`Error::EmptyCollection`] when strict and empty; lenient on empty
    /// returns the unchanged size.
    pub fn duplicate(&mut self) -> Result<usize> {
        match self.elements.first().cloned() {
            Some(value) => {
                self.elements.push(value);
                self.sort();
                Ok(self.elements.len())
            }
            None if self.restrictions.strictness().is_strict() => {
                Err(Error::EmptyCollection("duplicate"))
            }
            None => Ok(0),
        }
    }

    /// Structurally disabled: swapping the two top elements would violate
    /// the sort invariant
    ///
    /// # Errors
    /// Always [`Error::UnsupportedOperation`].
    pub fn exchange(&mut self) -> Result<()> {
        Err(Error::UnsupportedOperation {
            operation: "exchange",
            collection: "SortedList",
            reason: "would break the sort invariant",
        })
    }

    /// Structurally disabled: rotating elements would violate the sort
    /// invariant
    ///
    /// # Errors
    /// Always [`Error::UnsupportedOperation`].
    pub fn roll(&mut self, _positions: i64) -> Result<()> {
        Err(Error::UnsupportedOperation {
            operation: "roll",
            collection: "SortedList",
            reason: "would break the sort invariant",
        })
    }

    /// Number of elements
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

    /// Iterate in ascending comparator order
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.elements.iter()
    }
}

impl std::fmt::Debug for SortedList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SortedList")
            .field("elements", &self.elements)
            .field("restrictions", &self.restrictions)
            .finish()
    }
}
