//! Single-slot tagged value holder
//!
//! A [`TaggedUnion`] holds at most one value, tracks the value's live
//! [`TypeTag`], and gates every `set` through a [`Restrictions`] predicate.
//!
//! Invariants:
//! - the tracked classification always matches the held value (`Null` when
//!   empty);
//! - whenever a value is held, it satisfies the active restrictions;
//! - a failed `set` leaves both value and classification untouched.

use crate::restrictions::Restrictions;
use corral_core::{Classification, Result, TypeTag, Value};
use tracing::debug;

/// A single-slot value holder whose admissible contents are defined by a
/// [`Restrictions`] predicate
#[derive(Debug, Clone)]
pub struct TaggedUnion {
    value: Option<Value>,
    current: Classification,
    restrictions: Restrictions,
}

impl TaggedUnion {
    /// Create an empty union in the null-tag state
    pub fn new(restrictions: Restrictions) -> Self {
        Self {
            value: None,
            current: Classification::of(TypeTag::Null),
            restrictions,
        }
    }

    /// Create a union holding an initial value
    ///
    /// # Errors
    /// As for [`TaggedUnion::set`]; strict rejection fails construction.
    pub fn with_value(value: Value, restrictions: Restrictions) -> Result<Self> {
        let mut union = Self::new(restrictions);
        union.set(value)?;
        Ok(union)
    }

    /// Store a value, atomically updating the tracked classification
    ///
    /// Returns `Ok(true)` on success. A lenient inadmissible value is
    /// swallowed: `Ok(false)`, nothing changes. Both the value and the
    /// classification update together or not at all.
    ///
    /// # Errors
    /// [`corral_core::Error::Untypeable`] for an unclassifiable value
    /// (always fatal); [`corral_core::Error::RestrictionViolation`] for a
    /// strict rejection.
    pub fn set(&mut self, value: Value) -> Result<bool> {
        let (classified, ok) = self.restrictions.admit_value(&value)?;
        if !ok {
            if self.restrictions.strictness().is_strict() {
                return Err(self.restrictions.violation(&classified));
            }
            debug!(
                target: "corral::tagged_union",
                kind = %classified,
                "lenient set rejected inadmissible value"
            );
            return Ok(false);
        }
        self.value = Some(value);
        self.current = classified;
        Ok(true)
    }

    /// The held value, if any
    pub fn get(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Take the held value out, resetting to the null-tag state
    pub fn take(&mut self) -> Option<Value> {
        self.current = Classification::of(TypeTag::Null);
        self.value.take()
    }

    /// Empty the union, resetting to the null-tag state
    pub fn clear(&mut self) {
        self.take();
    }

    /// True when no value is held
    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }

    /// The live classification's tag (`Null` when empty)
    pub fn get_type(&self) -> TypeTag {
        self.current.tag
    }

    /// The held typed object's class name, when the live tag is `TypedObject`
    pub fn class_name(&self) -> Option<&str> {
        self.current.class_name.as_deref()
    }

    /// The active predicate
    pub fn restrictions(&self) -> &Restrictions {
        &self.restrictions
    }

    /// Swap the predicate
    ///
    /// Allowed here, unlike on [`crate::RestrictedSet`], because there is only
    /// one slot to re-validate. The swap fails — and nothing changes — when
    /// the currently held value is inadmissible under the incoming predicate;
    /// the union is never force-cleared.
    ///
    /// # Errors
    /// [`corral_core::Error::RestrictionViolation`] when the held value is
    /// inadmissible under `restrictions`.
    pub fn set_restrictions(&mut self, restrictions: Restrictions) -> Result<()> {
        if let Some(value) = &self.value {
            let (classified, ok) = restrictions.admit_value(value)?;
            if !ok {
                return Err(restrictions.violation(&classified));
            }
        }
        self.restrictions = restrictions;
        Ok(())
    }
}
