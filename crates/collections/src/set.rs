//! Insertion-ordered identity sets
//!
//! ## Design Principles
//!
//! 1. **Identity-tagged membership**: every insert mints an opaque
//!    [`Identity`] from a per-set monotonic counter. Identities are never
//!    reused, and iteration follows insertion order because the backing map is
//!    keyed by them.
//! 2. **Uniqueness is a policy, not a guarantee of the container**: with
//!    `unique = false` the set degrades to an identity-keyed bag; with
//!    `unique = true` inserts of an equal element are rejected per the
//!    strictness policy.
//! 3. **Algebra over values**: `union`/`intersection`/`difference` operate on
//!    element sequences (first operand's order preserved), normalize their
//!    variadic inputs through [`SetInput`], and deduplicate their result.
//!
//! The element type is generic: the restriction engine itself stores its
//! allowed tags in a `Set<TypeTag>` and its allowed classes in a
//! `Set<String>`, keeping the set a dumb container beneath the predicate
//! logic.

use corral_core::{Error, Result, Strictness, TypeTag, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;
use xxhash_rust::xxh3::xxh3_64;

/// Opaque, stable handle minted by [`Set::add`]
///
/// Enables later removal independent of value equality. Identities are
/// per-set, monotonically increasing, and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identity(u64);

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "id#{}", self.0)
    }
}

/// Element requirements for set storage: cloneable, comparable, and content
/// fingerprintable
pub trait Element: Clone + PartialEq {
    /// Content fingerprint; equal elements fingerprint equal
    fn fingerprint(&self) -> u64;

    /// Short description for error messages
    fn describe(&self) -> String;
}

impl Element for Value {
    fn fingerprint(&self) -> u64 {
        Value::fingerprint(self)
    }

    fn describe(&self) -> String {
        Value::describe(self)
    }
}

impl Element for TypeTag {
    fn fingerprint(&self) -> u64 {
        xxh3_64(&[self.as_code()])
    }

    fn describe(&self) -> String {
        self.name().to_string()
    }
}

impl Element for String {
    fn fingerprint(&self) -> u64 {
        xxh3_64(self.as_bytes())
    }

    fn describe(&self) -> String {
        self.clone()
    }
}

/// Set construction options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetConfig {
    /// Reject (strict) or deduplicate (lenient) equal elements on insert
    pub unique: bool,
    /// Raise vs. swallow on uniqueness and removal violations
    pub strictness: Strictness,
}

impl Default for SetConfig {
    fn default() -> Self {
        Self {
            unique: true,
            strictness: Strictness::Lenient,
        }
    }
}

/// Normalized input to the variadic algebraic operations
///
/// `union`/`intersection`/`difference` accept a mixture of sets, raw
/// sequences, and single elements; everything is normalized to a value
/// sequence before combining.
#[derive(Debug, Clone)]
pub enum SetInput<T: Element> {
    /// A whole set (contributes its elements in insertion order)
    Collection(Set<T>),
    /// A raw sequence
    Sequence(Vec<T>),
    /// A single element
    Single(T),
}

impl<T: Element> SetInput<T> {
    fn into_values(self) -> Vec<T> {
        match self {
            SetInput::Collection(set) => set.values(),
            SetInput::Sequence(values) => values,
            SetInput::Single(value) => vec![value],
        }
    }
}

impl<T: Element> From<Set<T>> for SetInput<T> {
    fn from(set: Set<T>) -> Self {
        SetInput::Collection(set)
    }
}

impl<T: Element> From<Vec<T>> for SetInput<T> {
    fn from(values: Vec<T>) -> Self {
        SetInput::Sequence(values)
    }
}

impl<T: Element> From<T> for SetInput<T> {
    fn from(value: T) -> Self {
        SetInput::Single(value)
    }
}

/// Insertion-ordered collection with identity-tagged membership
#[derive(Debug, Clone)]
pub struct Set<T: Element> {
    data: BTreeMap<Identity, T>,
    next_id: u64,
    config: SetConfig,
}

impl<T: Element> Default for Set<T> {
    fn default() -> Self {
        Self::new(SetConfig::default())
    }
}

impl<T: Element> Set<T> {
    /// Create an empty set
    pub fn new(config: SetConfig) -> Self {
        Self {
            data: BTreeMap::new(),
            next_id: 0,
            config,
        }
    }

    /// Create a set from an initial sequence
    ///
    /// # Errors
    /// Under `unique` + strict, a duplicate in the input fails the whole
    /// construction (no partially-populated set).
    pub fn from_values(values: impl IntoIterator<Item = T>, config: SetConfig) -> Result<Self> {
        let values: Vec<T> = values.into_iter().collect();
        if config.unique && config.strictness.is_strict() {
            for (i, value) in values.iter().enumerate() {
                if values[..i].contains(value) {
                    return Err(Error::DuplicateValue(value.describe()));
                }
            }
        }
        let mut set = Self::new(config);
        for value in values {
            // Cannot fail: strict duplicates were screened above
            let _ = set.add(value)?;
        }
        Ok(set)
    }

    /// The set's configuration
    pub fn config(&self) -> SetConfig {
        self.config
    }

    /// Insert a value, returning its identity
    ///
    /// Under `unique`, inserting an element equal to a stored one is a
    /// violation: strict raises [`Error::DuplicateValue`]; lenient performs
    /// **no insert** and returns the existing element's identity — one
    /// deterministic contract for duplicate adds.
    pub fn add(&mut self, value: T) -> Result<Identity> {
        if self.config.unique {
            if let Some(existing) = self.identifier_of(&value) {
                if self.config.strictness.is_strict() {
                    return Err(Error::DuplicateValue(value.describe()));
                }
                debug!(target: "corral::set", id = %existing, "duplicate add deduplicated");
                return Ok(existing);
            }
        }
        let id = Identity(self.next_id);
        self.next_id += 1;
        self.data.insert(id, value);
        Ok(id)
    }

    /// Remove the first element equal to `value`
    ///
    /// Strict + absent raises [`Error::NotFound`]; lenient + absent returns
    /// `Ok(false)`.
    pub fn remove(&mut self, value: &T) -> Result<bool> {
        match self.identifier_of(value) {
            Some(id) => {
                self.data.remove(&id);
                Ok(true)
            }
            None if self.config.strictness.is_strict() => {
                Err(Error::NotFound(value.describe()))
            }
            None => {
                debug!(target: "corral::set", "lenient remove of absent value");
                Ok(false)
            }
        }
    }

    /// Remove by the identity returned from [`Set::add`]; always safe
    pub fn remove_by_identifier(&mut self, id: Identity) -> bool {
        self.data.remove(&id).is_some()
    }

    /// True if an equal element is stored
    pub fn contains(&self, value: &T) -> bool {
        self.identifier_of(value).is_some()
    }

    /// The identity of the first element equal to `value`
    pub fn identifier_of(&self, value: &T) -> Option<Identity> {
        self.data
            .iter()
            .find(|(_, stored)| *stored == value)
            .map(|(id, _)| *id)
    }

    /// Look up an element by identity
    pub fn get(&self, id: Identity) -> Option<&T> {
        self.data.get(&id)
    }

    /// Number of stored elements
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Remove all elements (identities are not reset and never reused)
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Iterate elements in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.values()
    }

    /// Clone elements out in insertion order
    pub fn values(&self) -> Vec<T> {
        self.data.values().cloned().collect()
    }

    /// Fold over elements in insertion order
    pub fn fold<A>(&self, init: A, mut f: impl FnMut(A, &T) -> A) -> A {
        self.iter().fold(init, |acc, v| f(acc, v))
    }

    /// Map every element into a new deduplicated set with the same config
    pub fn map_values(&self, f: impl Fn(&T) -> T) -> Set<T> {
        let mut out = Set::new(SetConfig {
            unique: true,
            strictness: Strictness::Lenient,
        });
        for value in self.iter() {
            // Lenient unique set: add never fails
            let _ = out.add(f(value));
        }
        out.config = self.config;
        out
    }

    /// Keep only elements satisfying the predicate (new set, same config)
    pub fn filter(&self, pred: impl Fn(&T) -> bool) -> Set<T> {
        let mut out = Set::new(SetConfig {
            unique: true,
            strictness: Strictness::Lenient,
        });
        for value in self.iter() {
            if pred(value) {
                let _ = out.add(value.clone());
            }
        }
        out.config = self.config;
        out
    }

    /// Content-derived fingerprint: equal sets (as value sets, order- and
    /// multiplicity-independent) produce the same string. Cache-keying, not
    /// security.
    pub fn fingerprint(&self) -> String {
        let mut prints: Vec<u64> = self.iter().map(Element::fingerprint).collect();
        prints.sort_unstable();
        prints.dedup();
        let mut buf = Vec::with_capacity(prints.len() * 8);
        for p in prints {
            buf.extend_from_slice(&p.to_le_bytes());
        }
        format!("{:016x}", xxh3_64(&buf))
    }

    // ---- algebra ------------------------------------------------------

    /// Union of the inputs: first operand's order, then unseen elements of
    /// the rest; deduplicated
    pub fn union(inputs: impl IntoIterator<Item = SetInput<T>>) -> Set<T> {
        let mut out = Set::new(SetConfig::default());
        for input in inputs {
            for value in input.into_values() {
                let _ = out.add(value);
            }
        }
        out
    }

    /// Intersection: elements of the first operand present in every other
    /// operand; first operand's order; deduplicated
    pub fn intersection(inputs: impl IntoIterator<Item = SetInput<T>>) -> Set<T> {
        let mut iter = inputs.into_iter();
        let first = match iter.next() {
            Some(input) => input.into_values(),
            None => return Set::new(SetConfig::default()),
        };
        let rest: Vec<Vec<T>> = iter.map(SetInput::into_values).collect();
        let mut out = Set::new(SetConfig::default());
        for value in first {
            if rest.iter().all(|seq| seq.contains(&value)) {
                let _ = out.add(value);
            }
        }
        out
    }

    /// Difference: elements of the first operand absent from every other
    /// operand; first operand's order; deduplicated
    pub fn difference(inputs: impl IntoIterator<Item = SetInput<T>>) -> Set<T> {
        let mut iter = inputs.into_iter();
        let first = match iter.next() {
            Some(input) => input.into_values(),
            None => return Set::new(SetConfig::default()),
        };
        let rest: Vec<Vec<T>> = iter.map(SetInput::into_values).collect();
        let mut out = Set::new(SetConfig::default());
        for value in first {
            if rest.iter().all(|seq| !seq.contains(&value)) {
                let _ = out.add(value);
            }
        }
        out
    }

    /// True if every element of `a` is an element of `b`
    pub fn subset(a: &Set<T>, b: &Set<T>) -> bool {
        a.iter().all(|value| b.contains(value))
    }

    /// True if `a` and `b` hold the same elements (as value sets, order- and
    /// multiplicity-independent)
    pub fn equal(a: &Set<T>, b: &Set<T>) -> bool {
        Set::subset(a, b) && Set::subset(b, a)
    }
}
