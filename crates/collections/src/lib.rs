//! Restriction-gated collections for corral
//!
//! This crate builds the collection family on top of `corral-core`'s value
//! model and classifier:
//! - [`Set`]: insertion-ordered identity set with uniqueness policy and
//!   algebraic operations
//! - [`Restrictions`]: the admission predicate (allowed tags + allowed
//!   classes with subclass matching)
//! - [`RestrictedSet`]: a set whose every insert is gated by a predicate
//! - [`TaggedUnion`]: a single-slot value holder tracking its live type
//! - [`SortedList`], [`PriorityQueue`], [`LexicographicList`]: always-sorted
//!   collections with banded and range queries
//!
//! All collections are single-writer, not internally synchronized; callers
//! embedding them in a concurrent host must provide external mutual exclusion.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod restricted_set;
pub mod restrictions;
pub mod set;
pub mod sorted;
pub mod tagged_union;

pub use restricted_set::RestrictedSet;
pub use restrictions::{Admission, AdmissionQuery, Restrictions};
pub use set::{Element, Identity, Set, SetConfig, SetInput};
pub use sorted::lexicographic::LexicographicList;
pub use sorted::list::{Comparator, SortedList};
pub use sorted::priority::{Band, Priority, PriorityQueue};
pub use tagged_union::TaggedUnion;
