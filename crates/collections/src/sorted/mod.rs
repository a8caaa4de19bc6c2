//! Always-sorted collections
//!
//! Three variants share one discipline: every mutator that can break order
//! ends with a **stable** sort pass, so iteration always yields
//! non-decreasing comparator order and equal elements keep insertion order.
//!
//! - [`list::SortedList`]: comparator-injected general form
//! - [`priority::PriorityQueue`]: rank-ascending queue with banded queries
//! - [`lexicographic::LexicographicList`]: byte-wise string ordering
//!
//! `exchange` and `roll` — stack-style reordering operations — are
//! structurally disabled on all three: they would silently violate the sort
//! invariant, so they fail with `UnsupportedOperation` instead of leaving
//! undefined behavior.

pub mod lexicographic;
pub mod list;
pub mod priority;
