//! Small factorials over `u64`.

use crate::Rank;

/// Largest `k` such that `k!` fits in a `u64`.
pub const MAX_FACTORIAL_ARG: u32 = 20;

/// `k!`, or `None` if it does not fit in a `u64`.
#[inline]
#[must_use]
pub const fn checked_factorial(k: u32) -> Option<Rank> {
    let mut acc: Rank = 1;
    let mut i: u32 = 2;
    while i <= k {
        acc = match acc.checked_mul(i as Rank) {
            Some(v) => v,
            None => return None,
        };
        i += 1;
    }
    Some(acc)
}

/// `k!` for `k <= MAX_FACTORIAL_ARG`.
///
/// # Panics
/// Panics if `k > MAX_FACTORIAL_ARG`; callers validate group sizes up front.
#[inline]
#[must_use]
pub fn factorial(k: u32) -> Rank {
    assert!(
        k <= MAX_FACTORIAL_ARG,
        "factorial: {k}! overflows u64 (max argument {MAX_FACTORIAL_ARG})"
    );
    FACTORIALS[k as usize]
}

const FACTORIALS: [Rank; MAX_FACTORIAL_ARG as usize + 1] = {
    let mut t = [1; MAX_FACTORIAL_ARG as usize + 1];
    let mut i = 1;
    while i < t.len() {
        t[i] = t[i - 1] * i as Rank;
        i += 1;
    }
    t
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_values() {
        assert_eq!(factorial(0), 1);
        assert_eq!(factorial(1), 1);
        assert_eq!(factorial(2), 2);
        assert_eq!(factorial(5), 120);
        assert_eq!(factorial(20), 2_432_902_008_176_640_000);
    }

    #[test]
    fn table_matches_checked() {
        for k in 0..=MAX_FACTORIAL_ARG {
            assert_eq!(checked_factorial(k), Some(factorial(k)), "k = {k}");
        }
        assert_eq!(checked_factorial(MAX_FACTORIAL_ARG + 1), None);
    }

    #[test]
    #[should_panic(expected = "overflows u64")]
    fn rejects_overflowing_argument() {
        let _ = factorial(21);
    }
}
