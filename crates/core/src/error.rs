//! Error types for corral
//!
//! This module defines all error kinds used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Every fallible operation is all-or-nothing: when one of these errors is
//! returned, the receiver performed no partial mutation. Operations running
//! under [`crate::Strictness::Lenient`] swallow the recoverable kinds
//! (`RestrictionViolation`, `DuplicateValue`, `NotFound`, `EmptyCollection`)
//! and report an absent sentinel instead; `Untypeable` is never swallowed —
//! there is no sensible lenient fallback for an unclassifiable value.

use thiserror::Error;

/// Result type alias for corral operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for corral collections and classification
#[derive(Debug, Error)]
pub enum Error {
    /// A value could not be classified at all. Always fatal to the operation.
    #[error("value cannot be classified: {0}")]
    Untypeable(String),

    /// A requested tag, index, or rank lies outside a closed enumeration or
    /// valid numeric range.
    #[error("out of range: {0}")]
    InvalidRange(String),

    /// A referenced class or interface name does not resolve in the registry.
    #[error("undefined class or interface: {0}")]
    UndefinedClass(String),

    /// A value is classifiable but not admissible under the active restrictions.
    #[error("value of kind `{found}` is not admitted (allowed: {allowed})")]
    RestrictionViolation {
        /// Human-readable description of the rejected value's classification
        found: String,
        /// Human-readable description of the admissible kinds
        allowed: String,
    },

    /// An operation requiring at least one element found none.
    #[error("`{0}` requires a non-empty collection")]
    EmptyCollection(&'static str),

    /// Removal or lookup by value or identity found nothing to act on.
    #[error("not found: {0}")]
    NotFound(String),

    /// An operation is structurally disabled for this collection variant.
    #[error("`{operation}` is not supported on {collection}: {reason}")]
    UnsupportedOperation {
        /// The disabled operation
        operation: &'static str,
        /// The collection variant refusing it
        collection: &'static str,
        /// Why the variant refuses it
        reason: &'static str,
    },

    /// Uniqueness violated on insert.
    #[error("duplicate value rejected by unique set: {0}")]
    DuplicateValue(String),

    /// An operand's classified kind does not match what the operation requires.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// The required kind
        expected: String,
        /// The kind actually found
        found: String,
    },

    /// JSON conversion error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
