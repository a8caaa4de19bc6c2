//! Type tags and classification results
//!
//! This module defines:
//! - TypeTag: closed, payload-free discriminator for every classifiable kind
//! - Classification: the output of classification (tag plus concrete class
//!   name when the tag is `TypedObject`)
//!
//! ## Tag codes
//!
//! Each tag carries a stable byte code (`as_code`/`from_code`) so restriction
//! configurations can be persisted or transported by callers that need it.
//! An unknown code or name fails with [`Error::InvalidRange`] — the
//! enumeration is closed.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed classification of a runtime value's kind
///
/// `Callable` is admission-only: the classifier never emits it, but an
/// allowed-tag set containing `Callable` admits both `Closure` and
/// `NamedFunction` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TypeTag {
    /// The null value
    Null = 0x00,
    /// Boolean
    Bool = 0x01,
    /// 64-bit signed integer
    Int = 0x02,
    /// 64-bit IEEE-754 float
    Float = 0x03,
    /// UTF-8 string
    Str = 0x04,
    /// Ordered sequence of values
    Seq = 0x05,
    /// Plain record (string keys to values, no class)
    Record = 0x06,
    /// Instance of a registered class; classification carries the class name
    TypedObject = 0x07,
    /// Opaque resource handle
    Handle = 0x08,
    /// First-class function value
    Closure = 0x09,
    /// String naming a registered function
    NamedFunction = 0x0A,
    /// Admission-only: admits both `Closure` and `NamedFunction`
    Callable = 0x0B,
}

impl TypeTag {
    /// All tags, in code order
    pub const ALL: [TypeTag; 12] = [
        TypeTag::Null,
        TypeTag::Bool,
        TypeTag::Int,
        TypeTag::Float,
        TypeTag::Str,
        TypeTag::Seq,
        TypeTag::Record,
        TypeTag::TypedObject,
        TypeTag::Handle,
        TypeTag::Closure,
        TypeTag::NamedFunction,
        TypeTag::Callable,
    ];

    /// Convert to the stable byte code
    pub fn as_code(&self) -> u8 {
        *self as u8
    }

    /// Create from a byte code
    ///
    /// # Errors
    /// Returns [`Error::InvalidRange`] for codes outside the closed enumeration.
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0x00 => Ok(TypeTag::Null),
            0x01 => Ok(TypeTag::Bool),
            0x02 => Ok(TypeTag::Int),
            0x03 => Ok(TypeTag::Float),
            0x04 => Ok(TypeTag::Str),
            0x05 => Ok(TypeTag::Seq),
            0x06 => Ok(TypeTag::Record),
            0x07 => Ok(TypeTag::TypedObject),
            0x08 => Ok(TypeTag::Handle),
            0x09 => Ok(TypeTag::Closure),
            0x0A => Ok(TypeTag::NamedFunction),
            0x0B => Ok(TypeTag::Callable),
            other => Err(Error::InvalidRange(format!(
                "no type tag with code 0x{other:02x}"
            ))),
        }
    }

    /// The tag's canonical lower-case name
    pub fn name(&self) -> &'static str {
        match self {
            TypeTag::Null => "null",
            TypeTag::Bool => "bool",
            TypeTag::Int => "int",
            TypeTag::Float => "float",
            TypeTag::Str => "str",
            TypeTag::Seq => "seq",
            TypeTag::Record => "record",
            TypeTag::TypedObject => "typed-object",
            TypeTag::Handle => "handle",
            TypeTag::Closure => "closure",
            TypeTag::NamedFunction => "named-function",
            TypeTag::Callable => "callable",
        }
    }

    /// True for the function-like kinds admitted by an allowed `Callable` tag
    pub fn is_callable_kind(&self) -> bool {
        matches!(
            self,
            TypeTag::Closure | TypeTag::NamedFunction | TypeTag::Callable
        )
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TypeTag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        TypeTag::ALL
            .iter()
            .find(|tag| tag.name() == s)
            .copied()
            .ok_or_else(|| Error::InvalidRange(format!("no type tag named `{s}`")))
    }
}

/// The result of classifying a value: a tag plus, for typed objects, the
/// nearest concrete class name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Classification {
    /// The classified kind
    pub tag: TypeTag,
    /// The concrete class name; `Some` iff `tag == TypeTag::TypedObject`
    pub class_name: Option<String>,
}

impl Classification {
    /// Classification of a non-object kind
    pub fn of(tag: TypeTag) -> Self {
        debug_assert!(tag != TypeTag::TypedObject);
        Self {
            tag,
            class_name: None,
        }
    }

    /// Classification of a typed object
    pub fn typed_object(class_name: impl Into<String>) -> Self {
        Self {
            tag: TypeTag::TypedObject,
            class_name: Some(class_name.into()),
        }
    }
}

// Display as "typed-object(ClassName)" or the bare tag name.
impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.class_name {
            Some(class) => write!(f, "{}({})", self.tag, class),
            None => write!(f, "{}", self.tag),
        }
    }
}
