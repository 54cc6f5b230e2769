//! Constructive-ordering predicate over Z/nZ.
//!
//! An ordering `(a_1, …, a_{n-1})` (with an implicit leading 0) is
//! *constructive* when its partial sums `a_1, a_1+a_2, …` taken mod n
//!
//! - never repeat,
//! - never return to 0, and
//! - hit `n / 2` only at the final position.
//!
//! [`Verifier`] keeps its seen-set between calls so hot loops do not
//! allocate per ordering; [`is_constructive`] is the one-shot form.
//!
//! The `n / 2` test uses integer division for odd `n` too.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used
)]

use crate::{Element, GroupSize};

/// Reusable checker for one group size.
#[derive(Clone, Debug)]
pub struct Verifier {
    n: u64,
    half: u64,
    seen: Vec<bool>,
}

impl Verifier {
    /// Create a verifier for orderings of `group`.
    #[must_use]
    pub fn new(group: GroupSize) -> Self {
        let n = u64::from(group.get());
        Self {
            n,
            half: n / 2,
            seen: vec![false; n as usize],
        }
    }

    /// Whether `ordering` (length `n - 1`) is a constructive ordering.
    pub fn check(&mut self, ordering: &[Element]) -> bool {
        debug_assert_eq!(ordering.len() + 1, self.seen.len(), "ordering length must be n-1");
        self.seen.fill(false);

        let last = ordering.len().saturating_sub(1);
        let mut total: u64 = 0;
        for (i, &e) in ordering.iter().enumerate() {
            total = (total + u64::from(e)) % self.n;
            let slot = total as usize;
            if self.seen[slot] || total == 0 || (total == self.half && i != last) {
                return false;
            }
            self.seen[slot] = true;
        }
        true
    }
}

/// One-shot form of [`Verifier::check`].
#[must_use]
pub fn is_constructive(ordering: &[Element], group: GroupSize) -> bool {
    Verifier::new(group).check(ordering)
}

/// Negate every element mod n.
///
/// Partial sums of the result are the negated partial sums of the input, so
/// the map preserves constructiveness. For `n > 2` a constructive ordering
/// starting with `k < n/2` maps to one starting with `n - k > n/2`; this is
/// the 2-to-1 correspondence the halved search relies on.
#[must_use]
pub fn mirror(ordering: &[Element], group: GroupSize) -> Vec<Element> {
    let n = group.get();
    ordering.iter().map(|&e| (n - e % n) % n).collect()
}
