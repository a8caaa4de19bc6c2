//! Sets gated by an admission predicate
//!
//! A [`RestrictedSet`] is a [`Set<Value>`] whose every insert first passes
//! through a [`Restrictions`] predicate. The predicate is fixed at
//! construction: swapping admissible types mid-life would leave the question
//! of now-invalid members unanswered, so the API simply does not allow it.
//! (The single-slot [`crate::TaggedUnion`] does allow swapping, because one
//! slot is trivially re-validated.)

use crate::restrictions::Restrictions;
use crate::set::{Identity, Set, SetConfig};
use corral_core::{Error, Result, TypeTag, Value};
use tracing::debug;

/// A set whose every mutation is gated by a [`Restrictions`] predicate
///
/// Invariant: every stored element satisfies the predicate. Admission
/// strictness comes from the predicate; uniqueness strictness comes from the
/// set config.
#[derive(Debug, Clone)]
pub struct RestrictedSet {
    inner: Set<Value>,
    restrictions: Restrictions,
}

impl RestrictedSet {
    /// Create an empty restricted set
    pub fn new(restrictions: Restrictions, config: SetConfig) -> Self {
        Self {
            inner: Set::new(config),
            restrictions,
        }
    }

    /// Create from an initial sequence, validating every element up front
    ///
    /// Strict: any inadmissible element fails the whole construction — no
    /// partially-populated set. Lenient: inadmissible elements are skipped.
    /// An unclassifiable element always fails; there is no lenient fallback
    /// for untypeable input.
    ///
    /// # Errors
    /// [`Error::Untypeable`], [`Error::RestrictionViolation`] (strict), or a
    /// uniqueness error surfaced by the inner set.
    pub fn from_values(
        values: impl IntoIterator<Item = Value>,
        restrictions: Restrictions,
        config: SetConfig,
    ) -> Result<Self> {
        let strict = restrictions.strictness().is_strict();
        let mut admitted = Vec::new();
        for value in values {
            let (classified, ok) = restrictions.admit_value(&value)?;
            if ok {
                admitted.push(value);
            } else if strict {
                return Err(restrictions.violation(&classified));
            } else {
                debug!(
                    target: "corral::restricted_set",
                    kind = %classified,
                    "lenient construction skipped inadmissible element"
                );
            }
        }
        let inner = Set::from_values(admitted, config)?;
        Ok(Self {
            inner,
            restrictions,
        })
    }

    /// The predicate gating this set
    pub fn restrictions(&self) -> &Restrictions {
        &self.restrictions
    }

    /// Insert a value after admission
    ///
    /// Strict rejection raises [`Error::RestrictionViolation`]; lenient
    /// rejection returns `Ok(None)` without mutating. Accepted values
    /// delegate to [`Set::add`], so the duplicate contract of the inner set
    /// applies unchanged.
    ///
    /// # Errors
    /// [`Error::Untypeable`] (always), [`Error::RestrictionViolation`]
    /// (strict), [`Error::DuplicateValue`] (strict unique inner set).
    pub fn add(&mut self, value: Value) -> Result<Option<Identity>> {
        let (classified, ok) = self.restrictions.admit_value(&value)?;
        if !ok {
            if self.restrictions.strictness().is_strict() {
                return Err(self.restrictions.violation(&classified));
            }
            debug!(
                target: "corral::restricted_set",
                kind = %classified,
                "lenient add rejected inadmissible value"
            );
            return Ok(None);
        }
        self.inner.add(value).map(Some)
    }

    /// Remove the first element equal to `value` (see [`Set::remove`])
    ///
    /// # Errors
    /// [`Error::NotFound`] when the inner set is strict and nothing matches.
    pub fn remove(&mut self, value: &Value) -> Result<bool> {
        self.inner.remove(value)
    }

    /// Remove by identity; always safe
    pub fn remove_by_identifier(&mut self, id: Identity) -> bool {
        self.inner.remove_by_identifier(id)
    }

    /// True if an equal element is stored
    pub fn contains(&self, value: &Value) -> bool {
        self.inner.contains(value)
    }

    /// Number of stored elements
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// True when empty
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Remove all elements
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Iterate elements in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.inner.iter()
    }

    /// Clone elements out in insertion order
    pub fn values(&self) -> Vec<Value> {
        self.inner.values()
    }

    /// Content fingerprint of the stored elements (see [`Set::fingerprint`])
    pub fn fingerprint(&self) -> String {
        self.inner.fingerprint()
    }

    /// Invoke a registered native method on every element
    ///
    /// A capability-invocation helper: it is only sound when the restriction
    /// pins a single class (allowed tags exactly `{TypedObject}`, exactly one
    /// allowed class), which guarantees every element exposes the method
    /// surface of that class.
    ///
    /// # Errors
    /// [`Error::UnsupportedOperation`] unless a single class is pinned;
    /// [`Error::NotFound`] if the class does not define the method; any error
    /// the method itself raises.
    pub fn map_members(&self, method: &str, args: &[Value]) -> Result<Vec<Value>> {
        let tags = self.restrictions.allowed_tags();
        let single_class = self.restrictions.allowed_classes().len() == 1;
        if !(single_class && tags == vec![TypeTag::TypedObject]) {
            return Err(Error::UnsupportedOperation {
                operation: "map_members",
                collection: "RestrictedSet",
                reason: "restriction must pin exactly one class",
            });
        }
        let registry = self.restrictions.registry().clone();
        let mut out = Vec::with_capacity(self.len());
        for value in self.iter() {
            // Admission pinned TypedObject, so every element is an instance
            let instance = value.as_instance().ok_or_else(|| Error::Untypeable(
                format!("non-instance element {} in class-pinned set", value.describe()),
            ))?;
            out.push(registry.invoke(instance, method, args)?);
        }
        Ok(out)
    }
}
