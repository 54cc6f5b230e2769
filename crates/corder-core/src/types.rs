//! Canonical core types used across the corder workspace.
//!
//! These are re-exported at the crate root so other crates can import via
//! `corder_core::GroupSize`, `corder_core::Rank`, etc.

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A nonzero residue of Z/nZ as stored in an ordering.
pub type Element = u32;

/// 0-based lexicographic position of an ordering among permutations of `{1,…,n-1}`.
pub type Rank = u64;

/// Largest group size whose search space `(n-1)!` fits in a [`Rank`].
pub const MAX_GROUP_SIZE: u32 = 21;

/// Modulus `n` of the search domain Z/nZ.
///
/// Validated once on construction (`1 ≤ n ≤ MAX_GROUP_SIZE`) and immutable
/// afterwards, so every downstream factorial and rank computation stays in
/// range.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "u32", into = "u32")]
pub struct GroupSize(u32);

impl GroupSize {
    /// Validate and wrap a group size.
    ///
    /// # Errors
    /// Returns an error if `n == 0` or `n > MAX_GROUP_SIZE`.
    pub fn new(n: u32) -> Result<Self> {
        ensure!(n >= 1, "group size must be positive (got {n})");
        ensure!(
            n <= MAX_GROUP_SIZE,
            "group size {n} is too large: (n-1)! must fit in 64 bits (max n = {MAX_GROUP_SIZE})"
        );
        Ok(Self(n))
    }

    /// The modulus `n`.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Length of an ordering for this group (`n - 1`; the leading 0 is implicit).
    #[inline]
    #[must_use]
    pub const fn ordering_len(self) -> usize {
        (self.0 - 1) as usize
    }

    /// The residue `n / 2` (integer division), only allowed as the final partial sum.
    #[inline]
    #[must_use]
    pub const fn half(self) -> u32 {
        self.0 / 2
    }

    /// Size of the full search space, `(n-1)!`.
    #[inline]
    #[must_use]
    pub fn search_space(self) -> Rank {
        crate::factorial(self.0 - 1)
    }

    /// Ascending ordering `(1, 2, …, n-1)`, i.e. rank 0.
    #[must_use]
    pub fn ascending(self) -> Vec<Element> {
        (1..self.0).collect()
    }
}

impl TryFrom<u32> for GroupSize {
    type Error = anyhow::Error;

    fn try_from(n: u32) -> Result<Self> {
        Self::new(n)
    }
}

impl From<GroupSize> for u32 {
    fn from(g: GroupSize) -> Self {
        g.0
    }
}

impl fmt::Display for GroupSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Z/{}Z", self.0)
    }
}

/// Render an ordering as comma-separated text (no trailing newline).
#[must_use]
pub fn format_ordering(ordering: &[Element]) -> String {
    let mut out = String::with_capacity(ordering.len() * 3);
    for (i, e) in ordering.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&e.to_string());
    }
    out
}
