//! The admission predicate
//!
//! A [`Restrictions`] instance decides which classified kinds — and, for typed
//! objects, which classes — may enter a collection. It owns two sets:
//!
//! - `allowed_tags: Set<TypeTag>` — the admissible kinds
//! - `allowed_classes: Set<String>` — the admissible classes when
//!   `TypedObject` is allowed, with subclass/implementor matching
//!
//! ## The basic-or-typed rule
//!
//! After every mutation the two sets are re-synchronized:
//!
//! - `TypedObject` is present in `allowed_tags` **iff** `allowed_classes` is
//!   non-empty.
//! - `Record` and `TypedObject` are mutually exclusive: adding one evicts the
//!   other (a typed-object admission subsumes generic records).
//!
//! Admission itself is a pure predicate; under strict checking malformed
//! input (an unclassifiable value, an unresolvable class name) raises instead
//! of answering `false`.

use crate::set::{Set, SetConfig};
use corral_core::{Classification, Error, Result, Strictness, TypeRegistry, TypeTag, Value};
use std::rc::Rc;
use tracing::debug;

/// A single admission question, collapsed from the duck-typed inputs of
/// dynamic hosts: a raw value (classified internally), a pre-classified tag,
/// or a class name
#[derive(Debug, Clone)]
pub enum AdmissionQuery<'a> {
    /// A raw value; classified against the predicate's registry
    Value(&'a Value),
    /// A pre-classified tag
    Tag(TypeTag),
    /// A class name (asks "would a typed object of this class be admitted?")
    Class(&'a str),
}

impl<'a> From<&'a Value> for AdmissionQuery<'a> {
    fn from(value: &'a Value) -> Self {
        AdmissionQuery::Value(value)
    }
}

impl From<TypeTag> for AdmissionQuery<'_> {
    fn from(tag: TypeTag) -> Self {
        AdmissionQuery::Tag(tag)
    }
}

impl<'a> From<&'a str> for AdmissionQuery<'a> {
    fn from(class: &'a str) -> Self {
        AdmissionQuery::Class(class)
    }
}

/// The open admission seam: anything that can gate a collection
///
/// [`Restrictions`] is the canonical implementation; future collection types
/// can gate on any implementor.
pub trait Admission {
    /// True if the queried kind would be admitted
    fn admits(&self, query: AdmissionQuery<'_>) -> bool;
}

/// Policy object deciding which kinds and classes are admissible
#[derive(Clone)]
pub struct Restrictions {
    allowed_tags: Set<TypeTag>,
    allowed_classes: Set<String>,
    strictness: Strictness,
    registry: Rc<TypeRegistry>,
}

impl Restrictions {
    /// Build a predicate from initial tags and classes
    ///
    /// The basic-or-typed rule is applied once construction succeeds, so a
    /// non-empty class list implies `TypedObject` (and evicts `Record`).
    ///
    /// # Errors
    /// [`Error::UndefinedClass`] if any class name does not resolve in the
    /// registry; nothing is constructed.
    pub fn new(
        tags: &[TypeTag],
        classes: &[&str],
        strictness: Strictness,
        registry: Rc<TypeRegistry>,
    ) -> Result<Self> {
        for class in classes {
            if !registry.resolves(class) {
                return Err(Error::UndefinedClass((*class).to_string()));
            }
        }
        let set_config = SetConfig {
            unique: true,
            strictness: Strictness::Lenient,
        };
        let mut allowed_tags = Set::new(set_config);
        for tag in tags {
            let _ = allowed_tags.add(*tag);
        }
        let mut allowed_classes = Set::new(set_config);
        for class in classes {
            let _ = allowed_classes.add((*class).to_string());
        }
        let mut this = Self {
            allowed_tags,
            allowed_classes,
            strictness,
            registry,
        };
        // Classes were given explicitly, so typed-object admission wins over
        // any Record tag in the initial list.
        if !this.allowed_classes.is_empty() {
            let _ = this.allowed_tags.remove(&TypeTag::Record);
        }
        this.synchronize();
        Ok(this)
    }

    /// Convenience predicate admitting every kind except `TypedObject`
    pub fn default_for(registry: Rc<TypeRegistry>, strictness: Strictness) -> Self {
        let set_config = SetConfig {
            unique: true,
            strictness: Strictness::Lenient,
        };
        let mut allowed_tags = Set::new(set_config);
        for tag in TypeTag::ALL {
            if tag != TypeTag::TypedObject {
                let _ = allowed_tags.add(tag);
            }
        }
        Self {
            allowed_tags,
            allowed_classes: Set::new(set_config),
            strictness,
            registry,
        }
    }

    /// The predicate's strictness
    pub fn strictness(&self) -> Strictness {
        self.strictness
    }

    /// The shared type registry
    pub fn registry(&self) -> &Rc<TypeRegistry> {
        &self.registry
    }

    /// Currently allowed tags, in insertion order
    pub fn allowed_tags(&self) -> Vec<TypeTag> {
        self.allowed_tags.values()
    }

    /// Currently allowed classes, in insertion order
    pub fn allowed_classes(&self) -> Vec<String> {
        self.allowed_classes.values()
    }

    // ---- admission ----------------------------------------------------

    /// Answer an admission query; malformed input answers `false`
    pub fn is_allowed<'a>(&self, query: impl Into<AdmissionQuery<'a>>) -> bool {
        self.decide(query.into()).unwrap_or(false)
    }

    /// Answer an admission query; malformed input raises
    ///
    /// # Errors
    /// [`Error::Untypeable`] for an unclassifiable value;
    /// [`Error::UndefinedClass`] for an unresolvable class-name query.
    pub fn is_allowed_strict<'a>(&self, query: impl Into<AdmissionQuery<'a>>) -> Result<bool> {
        self.decide(query.into())
    }

    /// Classify a value and answer admission in one step, for collections
    /// that need the classification too
    pub(crate) fn admit_value(&self, value: &Value) -> Result<(Classification, bool)> {
        let classified = self.registry.classify(value)?;
        let ok = self.admits_classification(&classified);
        Ok((classified, ok))
    }

    fn decide(&self, query: AdmissionQuery<'_>) -> Result<bool> {
        match query {
            AdmissionQuery::Value(value) => {
                let classified = self.registry.classify(value)?;
                Ok(self.admits_classification(&classified))
            }
            AdmissionQuery::Tag(tag) => Ok(self.tag_allowed(tag)),
            AdmissionQuery::Class(class) => {
                if !self.registry.resolves(class) {
                    return Err(Error::UndefinedClass(class.to_string()));
                }
                Ok(self.allowed_tags.contains(&TypeTag::TypedObject)
                    && self.class_allowed(class))
            }
        }
    }

    fn admits_classification(&self, classified: &Classification) -> bool {
        match (&classified.tag, &classified.class_name) {
            (TypeTag::TypedObject, Some(class)) => {
                self.allowed_tags.contains(&TypeTag::TypedObject) && self.class_allowed(class)
            }
            (tag, _) => self.tag_allowed(*tag),
        }
    }

    fn tag_allowed(&self, tag: TypeTag) -> bool {
        if self.allowed_tags.contains(&tag) {
            return true;
        }
        // An allowed Callable admits both function-like kinds
        matches!(tag, TypeTag::Closure | TypeTag::NamedFunction)
            && self.allowed_tags.contains(&TypeTag::Callable)
    }

    fn class_allowed(&self, class: &str) -> bool {
        self.allowed_classes.contains(&class.to_string())
            || self
                .allowed_classes
                .iter()
                .any(|allowed| self.registry.is_subtype(class, allowed))
    }

    /// Build the violation error for a rejected classification
    pub(crate) fn violation(&self, classified: &Classification) -> Error {
        Error::RestrictionViolation {
            found: classified.to_string(),
            allowed: self.describe_allowed(),
        }
    }

    fn describe_allowed(&self) -> String {
        let mut parts: Vec<String> = self
            .allowed_tags
            .iter()
            .map(|tag| tag.name().to_string())
            .collect();
        for class in self.allowed_classes.iter() {
            parts.push(format!("typed-object({class})"));
        }
        if parts.is_empty() {
            "nothing".to_string()
        } else {
            parts.join(", ")
        }
    }

    // ---- mutation -----------------------------------------------------

    /// Allow an additional tag
    ///
    /// Adding `Record` evicts `TypedObject` and clears the allowed classes;
    /// adding `TypedObject` evicts `Record` but only takes effect once a
    /// class is allowed (the basic-or-typed rule keeps the tag out until
    /// then).
    pub fn add_allowed_type(&mut self, tag: TypeTag) {
        match tag {
            TypeTag::Record => {
                self.allowed_classes.clear();
                let _ = self.allowed_tags.remove(&TypeTag::TypedObject);
                let _ = self.allowed_tags.add(TypeTag::Record);
            }
            TypeTag::TypedObject => {
                let _ = self.allowed_tags.remove(&TypeTag::Record);
                if !self.allowed_classes.is_empty() {
                    let _ = self.allowed_tags.add(TypeTag::TypedObject);
                } else {
                    debug!(
                        target: "corral::restrictions",
                        "typed-object tag deferred until a class is allowed"
                    );
                }
            }
            other => {
                let _ = self.allowed_tags.add(other);
            }
        }
        self.synchronize();
    }

    /// Disallow a tag; removing `TypedObject` also clears the allowed classes
    pub fn remove_allowed_type(&mut self, tag: TypeTag) -> bool {
        let removed = self.allowed_tags.remove(&tag).unwrap_or(false);
        if tag == TypeTag::TypedObject {
            self.allowed_classes.clear();
        }
        self.synchronize();
        removed
    }

    /// Allow a class (implies `TypedObject`, evicting `Record`)
    ///
    /// # Errors
    /// [`Error::UndefinedClass`] if the name does not resolve.
    pub fn add_allowed_class(&mut self, class: &str) -> Result<()> {
        if !self.registry.resolves(class) {
            return Err(Error::UndefinedClass(class.to_string()));
        }
        let _ = self.allowed_classes.add(class.to_string());
        let _ = self.allowed_tags.remove(&TypeTag::Record);
        self.synchronize();
        Ok(())
    }

    /// Disallow a class; when the last class goes, `TypedObject` goes with it
    pub fn remove_allowed_class(&mut self, class: &str) -> bool {
        let removed = self
            .allowed_classes
            .remove(&class.to_string())
            .unwrap_or(false);
        self.synchronize();
        removed
    }

    /// Replace the allowed tags wholesale; validate-then-commit
    ///
    /// # Errors
    /// [`Error::InvalidRange`] if the new list contains both `Record` and
    /// `TypedObject` (mutually exclusive); nothing is mutated on failure.
    pub fn set_allowed_types(&mut self, tags: &[TypeTag]) -> Result<()> {
        let has_record = tags.contains(&TypeTag::Record);
        let has_typed = tags.contains(&TypeTag::TypedObject);
        if has_record && has_typed {
            return Err(Error::InvalidRange(
                "record and typed-object are mutually exclusive in an allowed-tag set".into(),
            ));
        }
        let mut fresh = Set::new(SetConfig {
            unique: true,
            strictness: Strictness::Lenient,
        });
        for tag in tags {
            let _ = fresh.add(*tag);
        }
        self.allowed_tags = fresh;
        if has_record {
            self.allowed_classes.clear();
        }
        self.synchronize();
        Ok(())
    }

    /// Replace the allowed classes wholesale; validate-then-commit
    ///
    /// # Errors
    /// [`Error::UndefinedClass`] on the first unresolvable name; nothing is
    /// mutated on failure.
    pub fn set_allowed_classes(&mut self, classes: &[&str]) -> Result<()> {
        for class in classes {
            if !self.registry.resolves(class) {
                return Err(Error::UndefinedClass((*class).to_string()));
            }
        }
        let mut fresh = Set::new(SetConfig {
            unique: true,
            strictness: Strictness::Lenient,
        });
        for class in classes {
            let _ = fresh.add((*class).to_string());
        }
        self.allowed_classes = fresh;
        if !classes.is_empty() {
            let _ = self.allowed_tags.remove(&TypeTag::Record);
        }
        self.synchronize();
        Ok(())
    }

    /// Re-establish the basic-or-typed invariant after a mutation
    fn synchronize(&mut self) {
        if self.allowed_classes.is_empty() {
            let _ = self.allowed_tags.remove(&TypeTag::TypedObject);
        } else {
            let _ = self.allowed_tags.add(TypeTag::TypedObject);
            let _ = self.allowed_tags.remove(&TypeTag::Record);
        }
    }

    /// Structural equality: same allowed-tag set and allowed-class set,
    /// order-independent; strictness and registry are configuration, not
    /// identity
    pub fn compare(a: &Restrictions, b: &Restrictions) -> bool {
        Set::equal(&a.allowed_tags, &b.allowed_tags)
            && Set::equal(&a.allowed_classes, &b.allowed_classes)
    }
}

impl PartialEq for Restrictions {
    fn eq(&self, other: &Self) -> bool {
        Restrictions::compare(self, other)
    }
}

impl Admission for Restrictions {
    fn admits(&self, query: AdmissionQuery<'_>) -> bool {
        self.is_allowed(query)
    }
}

impl std::fmt::Debug for Restrictions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Restrictions")
            .field("allowed_tags", &self.allowed_tags.values())
            .field("allowed_classes", &self.allowed_classes.values())
            .field("strictness", &self.strictness)
            .finish()
    }
}
