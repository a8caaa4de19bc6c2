//! The dynamic value model
//!
//! This module defines [`Value`], the element type stored by every corral
//! collection, plus its object-like payloads ([`Instance`], [`Handle`],
//! [`Closure`]).
//!
//! ## Equality rules
//!
//! - Different kinds are NEVER equal: `Int(1) != Float(1.0)`.
//! - `Float` follows IEEE-754: `NaN != NaN`, `-0.0 == 0.0`.
//! - Scalars, sequences, and records compare by value.
//! - Instances compare by **identity** (their [`InstanceId`]), never by field
//!   contents: two instances of the same class with equal fields are distinct.
//! - Closures compare by pointer identity; clones of the same closure are equal.
//!
//! ## Fingerprints
//!
//! [`Value::fingerprint`] is an xxh3 content hash over a canonical encoding,
//! used by sets as a cache key. Values that compare equal fingerprint equal;
//! the hash is not a security boundary.

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use uuid::Uuid;
use xxhash_rust::xxh3::xxh3_64;

/// Unique identity of an [`Instance`]
///
/// A wrapper around a UUID v4. Instance equality is identity equality on this
/// id, so cloning a `Value::Instance` yields an equal value while constructing
/// a fresh instance with identical fields does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstanceId(Uuid);

impl InstanceId {
    /// Create a new random id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The raw UUID bytes
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An instance of a user-defined class
///
/// The class name is resolved against a [`crate::TypeRegistry`] at
/// classification time; an instance of an unregistered class is untypeable.
#[derive(Debug, Clone)]
pub struct Instance {
    id: InstanceId,
    class: String,
    fields: BTreeMap<String, Value>,
}

impl Instance {
    /// Create a fresh instance of the named class with no fields
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            id: InstanceId::new(),
            class: class.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Create a fresh instance with initial fields
    pub fn with_fields(
        class: impl Into<String>,
        fields: impl IntoIterator<Item = (String, Value)>,
    ) -> Self {
        Self {
            id: InstanceId::new(),
            class: class.into(),
            fields: fields.into_iter().collect(),
        }
    }

    /// The instance's stable identity
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// The declared class name
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Read a field
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Write a field, returning the previous value if any
    pub fn set_field(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(name.into(), value)
    }

    /// Iterate fields in key order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

// Identity equality: same instance, not same shape.
impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// Opaque resource handle
///
/// Stands in for externally managed resources (file descriptors, connection
/// slots). Equality is on the raw id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Handle(pub u64);

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handle#{}", self.0)
    }
}

/// A first-class function value
///
/// Wraps an `Rc` callable; clones share the underlying function and compare
/// equal (pointer identity). Holding closures makes [`Value`] `!Send`, which
/// matches the single-threaded, externally-synchronized model of this library.
#[derive(Clone)]
pub struct Closure(Rc<ClosureFn>);

type ClosureFn = dyn Fn(&[Value]) -> Result<Value>;

impl Closure {
    /// Wrap a Rust closure
    pub fn new(f: impl Fn(&[Value]) -> Result<Value> + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Invoke the closure
    pub fn call(&self, args: &[Value]) -> Result<Value> {
        (self.0)(args)
    }

    /// The underlying pointer, for identity comparison and fingerprinting
    fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl PartialEq for Closure {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Closure(0x{:x})", self.addr())
    }
}

/// Canonical corral value
///
/// See the module docs for equality and fingerprint rules.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null value (a legitimate storable element, distinct from "absent")
    Null,
    /// Boolean
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point (IEEE-754)
    Float(f64),
    /// UTF-8 string
    Str(String),
    /// Ordered sequence of values
    Seq(Vec<Value>),
    /// Plain record with string keys
    Record(BTreeMap<String, Value>),
    /// Instance of a user-defined class
    Instance(Instance),
    /// Opaque resource handle
    Handle(Handle),
    /// First-class function value
    Closure(Closure),
}

impl Value {
    /// The value's kind as a string (for messages; classification proper lives
    /// on [`crate::TypeRegistry`])
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Seq(_) => "seq",
            Value::Record(_) => "record",
            Value::Instance(_) => "instance",
            Value::Handle(_) => "handle",
            Value::Closure(_) => "closure",
        }
    }

    /// True for `Value::Null`
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Extract a bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extract an integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Extract a float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Extract a string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Extract a sequence
    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(items) => Some(items),
            _ => None,
        }
    }

    /// Extract a record
    pub fn as_record(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Record(fields) => Some(fields),
            _ => None,
        }
    }

    /// Extract an instance
    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Value::Instance(inst) => Some(inst),
            _ => None,
        }
    }

    /// Extract a handle
    pub fn as_handle(&self) -> Option<Handle> {
        match self {
            Value::Handle(h) => Some(*h),
            _ => None,
        }
    }

    /// Extract a closure
    pub fn as_closure(&self) -> Option<&Closure> {
        match self {
            Value::Closure(c) => Some(c),
            _ => None,
        }
    }

    /// Content fingerprint (xxh3 over a canonical encoding)
    ///
    /// Equal values fingerprint equal. Records hash fields in key order;
    /// instances hash their identity; closures hash their pointer.
    pub fn fingerprint(&self) -> u64 {
        let mut buf = Vec::with_capacity(16);
        self.write_canonical(&mut buf);
        xxh3_64(&buf)
    }

    fn write_canonical(&self, buf: &mut Vec<u8>) {
        match self {
            Value::Null => buf.push(0x00),
            Value::Bool(b) => {
                buf.push(0x01);
                buf.push(*b as u8);
            }
            Value::Int(i) => {
                buf.push(0x02);
                buf.extend_from_slice(&i.to_le_bytes());
            }
            Value::Float(f) => {
                buf.push(0x03);
                // -0.0 == 0.0, so both must encode identically
                let normalized = if *f == 0.0 { 0.0f64 } else { *f };
                buf.extend_from_slice(&normalized.to_bits().to_le_bytes());
            }
            Value::Str(s) => {
                buf.push(0x04);
                buf.extend_from_slice(&(s.len() as u64).to_le_bytes());
                buf.extend_from_slice(s.as_bytes());
            }
            Value::Seq(items) => {
                buf.push(0x05);
                buf.extend_from_slice(&(items.len() as u64).to_le_bytes());
                for item in items {
                    item.write_canonical(buf);
                }
            }
            Value::Record(fields) => {
                buf.push(0x06);
                buf.extend_from_slice(&(fields.len() as u64).to_le_bytes());
                for (key, value) in fields {
                    buf.extend_from_slice(&(key.len() as u64).to_le_bytes());
                    buf.extend_from_slice(key.as_bytes());
                    value.write_canonical(buf);
                }
            }
            Value::Instance(inst) => {
                buf.push(0x07);
                buf.extend_from_slice(inst.id().as_bytes());
            }
            Value::Handle(h) => {
                buf.push(0x08);
                buf.extend_from_slice(&h.0.to_le_bytes());
            }
            Value::Closure(c) => {
                buf.push(0x09);
                buf.extend_from_slice(&(c.addr() as u64).to_le_bytes());
            }
        }
    }

    /// A short human-readable description for error messages
    pub fn describe(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(b) => format!("bool({b})"),
            Value::Int(i) => format!("int({i})"),
            Value::Float(f) => format!("float({f})"),
            Value::Str(s) if s.chars().count() <= 32 => format!("str({s:?})"),
            Value::Str(s) => format!("str({:?}...)", s.chars().take(32).collect::<String>()),
            Value::Seq(items) => format!("seq(len={})", items.len()),
            Value::Record(fields) => format!("record(len={})", fields.len()),
            Value::Instance(inst) => format!("instance({})", inst.class()),
            Value::Handle(h) => h.to_string(),
            Value::Closure(c) => format!("{c:?}"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Seq(items)
    }
}

impl From<Instance> for Value {
    fn from(inst: Instance) -> Self {
        Value::Instance(inst)
    }
}

impl From<Handle> for Value {
    fn from(h: Handle) -> Self {
        Value::Handle(h)
    }
}

impl From<Closure> for Value {
    fn from(c: Closure) -> Self {
        Value::Closure(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_different_kinds_never_equal() {
        assert_ne!(Value::Int(1), Value::Float(1.0));
        assert_ne!(Value::Str("1".into()), Value::Int(1));
        assert_ne!(Value::Null, Value::Bool(false));
    }

    #[test]
    fn test_float_ieee_semantics() {
        assert_ne!(Value::Float(f64::NAN), Value::Float(f64::NAN));
        assert_eq!(Value::Float(-0.0), Value::Float(0.0));
    }

    #[test]
    fn test_instance_identity_equality() {
        let a = Instance::new("Dog");
        let b = Instance::new("Dog");
        assert_ne!(Value::Instance(a.clone()), Value::Instance(b));
        assert_eq!(Value::Instance(a.clone()), Value::Instance(a));
    }

    #[test]
    fn test_closure_pointer_equality() {
        let c = Closure::new(|_| Ok(Value::Null));
        let d = Closure::new(|_| Ok(Value::Null));
        assert_eq!(Value::Closure(c.clone()), Value::Closure(c.clone()));
        assert_ne!(Value::Closure(c), Value::Closure(d));
    }

    #[test]
    fn test_closure_call() {
        let double = Closure::new(|args| match args.first() {
            Some(Value::Int(i)) => Ok(Value::Int(i * 2)),
            _ => Err(Error::TypeMismatch {
                expected: "int".into(),
                found: "other".into(),
            }),
        });
        assert_eq!(double.call(&[Value::Int(21)]).unwrap(), Value::Int(42));
        assert!(double.call(&[Value::Null]).is_err());
    }

    #[test]
    fn test_fingerprint_equal_values_agree() {
        let a = Value::Seq(vec![Value::Int(1), Value::Str("x".into())]);
        let b = Value::Seq(vec![Value::Int(1), Value::Str("x".into())]);
        assert_eq!(a.fingerprint(), b.fingerprint());

        // -0.0 == 0.0 must fingerprint identically
        assert_eq!(
            Value::Float(-0.0).fingerprint(),
            Value::Float(0.0).fingerprint()
        );
    }

    #[test]
    fn test_fingerprint_distinguishes_kinds() {
        assert_ne!(Value::Int(1).fingerprint(), Value::Float(1.0).fingerprint());
        assert_ne!(Value::Null.fingerprint(), Value::Bool(false).fingerprint());
    }

    #[test]
    fn test_record_field_order_does_not_matter() {
        let mut a = BTreeMap::new();
        a.insert("x".to_string(), Value::Int(1));
        a.insert("y".to_string(), Value::Int(2));
        let mut b = BTreeMap::new();
        b.insert("y".to_string(), Value::Int(2));
        b.insert("x".to_string(), Value::Int(1));
        assert_eq!(Value::Record(a.clone()), Value::Record(b.clone()));
        assert_eq!(
            Value::Record(a).fingerprint(),
            Value::Record(b).fingerprint()
        );
    }

    #[test]
    fn test_instance_fields() {
        let mut dog = Instance::new("Dog");
        assert!(dog.field("name").is_none());
        dog.set_field("name", Value::Str("Rex".into()));
        assert_eq!(dog.field("name"), Some(&Value::Str("Rex".into())));
    }
}
