//! Strictness policy
//!
//! Every fallible collection operation runs under a [`Strictness`] chosen at
//! construction (or overridden per call where the API allows it):
//!
//! - **Strict**: the operation returns the corresponding [`crate::Error`] and
//!   performs no partial mutation.
//! - **Lenient**: the operation swallows the condition and returns an explicit
//!   absent sentinel — `Option::None` for value-shaped results, `false` or `0`
//!   for count-shaped results.
//!
//! The sentinel is never [`crate::Value::Null`]: null is a legitimately
//! storable element, so value-shaped results always carry stored elements
//! inside `Some`.

use serde::{Deserialize, Serialize};

/// Raise-on-violation vs. swallow-and-return-sentinel policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Strictness {
    /// Violations raise the corresponding error; no partial mutation.
    Strict,
    /// Violations are swallowed; the operation reports an absent sentinel.
    #[default]
    Lenient,
}

impl Strictness {
    /// True when violations should raise
    pub fn is_strict(self) -> bool {
        matches!(self, Strictness::Strict)
    }

    /// True when violations should be swallowed
    pub fn is_lenient(self) -> bool {
        matches!(self, Strictness::Lenient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_lenient() {
        assert!(Strictness::default().is_lenient());
        assert!(!Strictness::default().is_strict());
    }
}
