//! Lexicographically sorted string list
//!
//! The string specialization of the sorted family: elements are kept in
//! byte-wise (codepoint) ascending order. The comparison itself is exposed as
//! [`LexicographicList::cmp`], which refuses operands the list's restrictions
//! do not admit.

use crate::restrictions::Restrictions;
use corral_core::{Error, Result, Strictness, TypeRegistry, TypeTag, Value};
use std::cmp::Ordering;
use std::rc::Rc;
use tracing::{debug, trace};

/// An always-sorted list of strings in byte-wise order
///
/// Invariant: elements are sorted ascending after every mutating operation
/// that can break order; equal strings keep insertion order (stable sort).
#[derive(Debug, Clone)]
pub struct LexicographicList {
    elements: Vec<Value>,
    restrictions: Restrictions,
}

impl LexicographicList {
    /// Create an empty list gated by the given predicate (normally
    /// string-only)
    pub fn new(restrictions: Restrictions) -> Self {
        Self {
            elements: Vec::new(),
            restrictions,
        }
    }

    /// Convenience constructor with a string-only predicate
    pub fn strings_only(registry: Rc<TypeRegistry>, strictness: Strictness) -> Self {
        // Str-only tag lists carry no class names, so this cannot fail
        let restrictions = Restrictions::new(&[TypeTag::Str], &[], strictness, registry)
            .expect("string-only restrictions carry no class names");
        Self::new(restrictions)
    }

    /// The predicate gating this list
    pub fn restrictions(&self) -> &Restrictions {
        &self.restrictions
    }

    /// Compare two operands in byte-wise string order
    ///
    /// # Errors
    /// [`Error::Untypeable`] if an operand cannot be classified;
    /// [`Error::TypeMismatch`] if an operand is not admitted by the list's
    /// restrictions or is not a string.
    pub fn cmp(&self, a: &Value, b: &Value) -> Result<Ordering> {
        let left = self.string_operand(a)?;
        let right = self.string_operand(b)?;
        Ok(left.cmp(right))
    }

    fn string_operand<'a>(&self, value: &'a Value) -> Result<&'a str> {
        let (classified, ok) = self.restrictions.admit_value(value)?;
        if !ok {
            return Err(Error::TypeMismatch {
                expected: "an admitted string".to_string(),
                found: classified.to_string(),
            });
        }
        value.as_str().ok_or_else(|| Error::TypeMismatch {
            expected: "str".to_string(),
            found: classified.to_string(),
        })
    }

    /// Push a batch of strings, re-sorting once after the batch
    ///
    /// Admission is screened per element before any mutation: strict fails
    /// the whole call on the first inadmissible element; lenient skips it. A
    /// non-string element is a [`Error::TypeMismatch`] regardless of
    /// strictness — the sort order is undefined for non-strings.
    ///
    /// # Errors
    /// [`Error::Untypeable`], [`Error::TypeMismatch`],
    /// [`Error::RestrictionViolation`] (strict).
    pub fn push(&mut self, values: impl IntoIterator<Item = Value>) -> Result<usize> {
        let strict = self.restrictions.strictness().is_strict();
        let mut admitted = Vec::new();
        for value in values {
            let (classified, ok) = self.restrictions.admit_value(&value)?;
            if !ok {
                if strict {
                    return Err(self.restrictions.violation(&classified));
                }
                debug!(
                    target: "corral::lexicographic",
                    kind = %classified,
                    "lenient push skipped inadmissible value"
                );
                continue;
            }
            if value.as_str().is_none() {
                return Err(Error::TypeMismatch {
                    expected: "str".to_string(),
                    found: classified.to_string(),
                });
            }
            admitted.push(value);
        }
        if !admitted.is_empty() {
            self.elements.extend(admitted);
            self.sort();
        }
        Ok(self.elements.len())
    }

    fn sort(&mut self) {
        trace!(target: "corral::lexicographic", len = self.elements.len(), "stable sort pass");
        // Every stored element is a string; admission enforced it at push
        self.elements
            .sort_by(|a, b| a.as_str().unwrap_or("").cmp(b.as_str().unwrap_or("")));
    }

    /// The lexicographically least string, without removing it
    ///
    /// # Errors
    /// [`Error::EmptyCollection`] when strict and empty.
    pub fn top(&self) -> Result<Option<&Value>> {
        match self.elements.first() {
            Some(value) => Ok(Some(value)),
            None if self.restrictions.strictness().is_strict() => {
                Err(Error::EmptyCollection("top"))
            }
            None => Ok(None),
        }
    }

    /// The lexicographically greatest string, without removing it
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

    /// Remove and return the least string
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
        Ok(Some(self.elements.remove(0)))
    }

    /// Remove the first element equal to `value`; no re-sort needed
    ///
    /// # Errors
    /// [`Error::NotFound`] when strict and nothing matches.
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

    /// Re-insert a copy of the least string, returning the new size
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

    /// Structurally disabled: would break the sort invariant
    ///
    /// # Errors
    /// Always [`Error::UnsupportedOperation`].
    pub fn exchange(&mut self) -> Result<()> {
        Err(Error::UnsupportedOperation {
            operation: "exchange",
            collection: "LexicographicList",
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
            collection: "LexicographicList",
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

    /// Iterate in ascending byte-wise order
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.elements.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(strictness: Strictness) -> LexicographicList {
        LexicographicList::strings_only(Rc::new(TypeRegistry::new()), strictness)
    }

    fn strs(values: &[&str]) -> Vec<Value> {
        values.iter().map(|s| Value::Str((*s).to_string())).collect()
    }

    #[test]
    fn test_push_sorts_lexicographically() {
        let mut lex = list(Strictness::Strict);
        lex.push(strs(&["pear", "apple", "plum"])).unwrap();
        lex.push(strs(&["banana"])).unwrap();
        let seen: Vec<&str> = lex.iter().map(|v| v.as_str().unwrap()).collect();
        assert_eq!(seen, vec!["apple", "banana", "pear", "plum"]);
    }

    #[test]
    fn test_byte_order_is_case_sensitive() {
        let mut lex = list(Strictness::Strict);
        lex.push(strs(&["apple", "Banana"])).unwrap();
        // Uppercase sorts before lowercase in byte order
        assert_eq!(lex.top().unwrap(), Some(&Value::Str("Banana".into())));
    }

    #[test]
    fn test_cmp_checks_admission() {
        let lex = list(Strictness::Strict);
        assert_eq!(
            lex.cmp(&Value::Str("a".into()), &Value::Str("b".into()))
                .unwrap(),
            Ordering::Less
        );
        assert!(matches!(
            lex.cmp(&Value::Str("a".into()), &Value::Int(1)).unwrap_err(),
            Error::TypeMismatch { .. }
        ));
    }

    #[test]
    fn test_non_string_push_rejected() {
        let mut strict = list(Strictness::Strict);
        assert!(matches!(
            strict.push(vec![Value::Int(1)]).unwrap_err(),
            Error::RestrictionViolation { .. }
        ));

        let mut lenient = list(Strictness::Lenient);
        let size = lenient
            .push(vec![Value::Str("ok".into()), Value::Int(1)])
            .unwrap();
        assert_eq!(size, 1);
    }

    #[test]
    fn test_top_bottom_pop() {
        let mut lex = list(Strictness::Strict);
        lex.push(strs(&["m", "a", "z"])).unwrap();
        assert_eq!(lex.top().unwrap(), Some(&Value::Str("a".into())));
        assert_eq!(lex.bottom().unwrap(), Some(&Value::Str("z".into())));
        assert_eq!(lex.pop().unwrap(), Some(Value::Str("a".into())));
        assert_eq!(lex.len(), 2);
    }

    #[test]
    fn test_duplicate_reinserts_top() {
        let mut lex = list(Strictness::Strict);
        lex.push(strs(&["b", "a"])).unwrap();
        assert_eq!(lex.duplicate().unwrap(), 3);
        let seen: Vec<&str> = lex.iter().map(|v| v.as_str().unwrap()).collect();
        assert_eq!(seen, vec!["a", "a", "b"]);
    }

    #[test]
    fn test_exchange_and_roll_disabled() {
        let mut lex = list(Strictness::Lenient);
        lex.push(strs(&["a", "b"])).unwrap();
        assert!(matches!(
            lex.exchange().unwrap_err(),
            Error::UnsupportedOperation { .. }
        ));
        assert!(matches!(
            lex.roll(-1).unwrap_err(),
            Error::UnsupportedOperation { .. }
        ));
    }

    #[test]
    fn test_empty_strict_vs_lenient() {
        let mut strict = list(Strictness::Strict);
        assert!(matches!(
            strict.pop().unwrap_err(),
            Error::EmptyCollection("pop")
        ));
        assert!(matches!(
            strict.duplicate().unwrap_err(),
            Error::EmptyCollection("duplicate")
        ));
        let mut lenient = list(Strictness::Lenient);
        assert_eq!(lenient.pop().unwrap(), None);
        assert_eq!(lenient.duplicate().unwrap(), 0);
    }

    #[test]
    fn test_delete() {
        let mut lex = list(Strictness::Lenient);
        lex.push(strs(&["a", "b", "a"])).unwrap();
        assert!(lex.delete(&Value::Str("a".into())).unwrap());
        assert_eq!(lex.len(), 2);
        assert!(!lex.delete(&Value::Str("zzz".into())).unwrap());
    }
}
