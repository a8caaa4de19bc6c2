//! Value classification
//!
//! `TypeRegistry::classify` maps every [`Value`] to exactly one
//! [`Classification`], or fails with [`Error::Untypeable`] for values the
//! registry cannot account for. Classification is pure and deterministic.
//!
//! ## Precedence
//!
//! The check order below is a contract, not an accident of branch layout.
//! Where a value could satisfy more than one kind, the earlier rule wins:
//!
//! 1. `Null`, `Bool`, `Int`, `Float` map directly.
//! 2. A `Str` whose contents name a **registered function** classifies as
//!    `NamedFunction`, superseding `Str`.
//! 3. Any other `Str` classifies as `Str`.
//! 4. `Seq` and `Record` map directly.
//! 5. An `Instance` of a registered class classifies as `TypedObject` carrying
//!    the concrete class name. An instance of an unregistered class is
//!    **untypeable** — classification signals rather than defaulting to
//!    `Record`.
//! 6. `Handle` and `Closure` map directly.
//!
//! `Callable` is never emitted: function-like values classify as `Closure` or
//! `NamedFunction`, and an allowed `Callable` tag admits either at the
//! restriction layer.

use crate::error::{Error, Result};
use crate::registry::TypeRegistry;
use crate::tag::{Classification, TypeTag};
use crate::value::Value;

impl TypeRegistry {
    /// Classify a value against this registry
    ///
    /// # Errors
    /// [`Error::Untypeable`] for an instance of an unregistered class.
    pub fn classify(&self, value: &Value) -> Result<Classification> {
        match value {
            Value::Null => Ok(Classification::of(TypeTag::Null)),
            Value::Bool(_) => Ok(Classification::of(TypeTag::Bool)),
            Value::Int(_) => Ok(Classification::of(TypeTag::Int)),
            Value::Float(_) => Ok(Classification::of(TypeTag::Float)),
            // NamedFunction supersedes Str (precedence rule 2)
            Value::Str(s) if self.is_function(s) => {
                Ok(Classification::of(TypeTag::NamedFunction))
            }
            Value::Str(_) => Ok(Classification::of(TypeTag::Str)),
            Value::Seq(_) => Ok(Classification::of(TypeTag::Seq)),
            Value::Record(_) => Ok(Classification::of(TypeTag::Record)),
            Value::Instance(inst) => {
                if self.resolves(inst.class()) {
                    Ok(Classification::typed_object(inst.class()))
                } else {
                    Err(Error::Untypeable(format!(
                        "instance of unregistered class `{}`",
                        inst.class()
                    )))
                }
            }
            Value::Handle(_) => Ok(Classification::of(TypeTag::Handle)),
            Value::Closure(_) => Ok(Classification::of(TypeTag::Closure)),
        }
    }

    /// Classify and return just the tag
    pub fn classify_tag(&self, value: &Value) -> Result<TypeTag> {
        self.classify(value).map(|c| c.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ClassDef;
    use crate::value::{Closure, Handle, Instance};
    use std::collections::BTreeMap;

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.register_class(ClassDef::new("Dog")).unwrap();
        registry.register_function("strlen");
        registry
    }

    #[test]
    fn test_scalar_classification() {
        let r = registry();
        assert_eq!(r.classify_tag(&Value::Null).unwrap(), TypeTag::Null);
        assert_eq!(r.classify_tag(&Value::Bool(true)).unwrap(), TypeTag::Bool);
        assert_eq!(r.classify_tag(&Value::Int(3)).unwrap(), TypeTag::Int);
        assert_eq!(r.classify_tag(&Value::Float(1.5)).unwrap(), TypeTag::Float);
    }

    #[test]
    fn test_named_function_supersedes_str() {
        let r = registry();
        assert_eq!(
            r.classify_tag(&Value::Str("strlen".into())).unwrap(),
            TypeTag::NamedFunction
        );
        assert_eq!(
            r.classify_tag(&Value::Str("not_a_function".into())).unwrap(),
            TypeTag::Str
        );
    }

    #[test]
    fn test_container_classification() {
        let r = registry();
        assert_eq!(
            r.classify_tag(&Value::Seq(vec![Value::Int(1)])).unwrap(),
            TypeTag::Seq
        );
        assert_eq!(
            r.classify_tag(&Value::Record(BTreeMap::new())).unwrap(),
            TypeTag::Record
        );
    }

    #[test]
    fn test_instance_carries_class_name() {
        let r = registry();
        let classified = r.classify(&Value::Instance(Instance::new("Dog"))).unwrap();
        assert_eq!(classified.tag, TypeTag::TypedObject);
        assert_eq!(classified.class_name.as_deref(), Some("Dog"));
    }

    #[test]
    fn test_unregistered_instance_is_untypeable() {
        let r = registry();
        let err = r
            .classify(&Value::Instance(Instance::new("Ghost")))
            .unwrap_err();
        assert!(matches!(err, Error::Untypeable(_)));
    }

    #[test]
    fn test_function_like_values_never_classify_callable() {
        let r = registry();
        assert_eq!(
            r.classify_tag(&Value::Closure(Closure::new(|_| Ok(Value::Null))))
                .unwrap(),
            TypeTag::Closure
        );
        assert_eq!(
            r.classify_tag(&Value::Str("strlen".into())).unwrap(),
            TypeTag::NamedFunction
        );
    }

    #[test]
    fn test_handle_classification() {
        let r = registry();
        assert_eq!(
            r.classify_tag(&Value::Handle(Handle(7))).unwrap(),
            TypeTag::Handle
        );
    }
}
