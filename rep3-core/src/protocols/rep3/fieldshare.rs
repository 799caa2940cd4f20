//! Replicated shared field elements.

use serde::{Deserialize, Serialize};

/// A replicated share of a field element: the two of the three additive
/// shares this party is entitled to hold. For party `k` and a triple
/// `(s0, s1, s2)`, `a = s_{k+1}` and `b = s_{k+2}` (indices mod 3), so the
/// `b` component of each party equals the `a` component of the next one.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rep3FieldShare {
    /// The first held additive share.
    pub a: u64,
    /// The second held additive share.
    pub b: u64,
}

impl Rep3FieldShare {
    /// Constructs the type from two additive shares.
    pub fn new(a: u64, b: u64) -> Self {
        Self { a, b }
    }

    /// Unwraps the type into two additive shares.
    pub fn ab(self) -> (u64, u64) {
        (self.a, self.b)
    }
}
