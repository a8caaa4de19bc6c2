//! Corral - typed, restriction-gated collections for dynamically shaped data
//!
//! Corral provides a runtime value classifier and a family of collections
//! whose membership is gated by an admission predicate: sets with identity
//! handles, a single-slot tagged union, and always-sorted lists with banded
//! priority queries.
//!
//! # Quick Start
//!
//! ```
//! use corral::{
//!     PriorityQueue, Restrictions, Strictness, TypeRegistry, TypeTag, Value,
//! };
//! use std::rc::Rc;
//!
//! # fn main() -> corral::Result<()> {
//! let registry = Rc::new(TypeRegistry::new());
//! let strings = Restrictions::new(&[TypeTag::Str], &[], Strictness::Strict, registry)?;
//!
//! let mut queue = PriorityQueue::new(strings);
//! queue.push(Value::Str("flush".into()), 5)?;
//! queue.push(Value::Str("urgent".into()), 0)?;
//!
//! assert_eq!(queue.pop()?, Some(Value::Str("urgent".into())));
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! Classification and the value model live in `corral-core`; the collection
//! family lives in `corral-collections`. This crate re-exports the public
//! surface of both. All collections assume exclusive single-writer access;
//! none are internally synchronized.

// Re-export the public API from the member crates
pub use corral_collections::*;
pub use corral_core::*;
