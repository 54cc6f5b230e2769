//! Rank ↔ ordering bijection through the factorial number system.
//!
//! An ordering of `{1,…,m}` is identified by its 0-based rank in
//! lexicographic order. [`unrank`] expands a rank into the ordering a worker
//! starts from; [`rank`] is its inverse (Lehmer code).
//!
//! The expansion works over the pool `{0,1,…,m}`: the leading digit of any
//! rank below `m!` is zero, so the first element picked is always `0`, which
//! is then dropped, leaving the ordering of the nonzero residues.

use crate::{factorial, Element, Rank, MAX_FACTORIAL_ARG};
use anyhow::{ensure, Result};

/// Mixed-radix digits of `rank` with radices `m!, (m-1)!, …, 1!`.
///
/// Digit `i` lies in `[0, m - i]`, and digit 0 is zero whenever `rank < m!`.
///
/// # Panics
/// Panics if `m > MAX_FACTORIAL_ARG`.
#[must_use]
pub fn factorial_digits(m: u32, rank: Rank) -> Vec<usize> {
    let mut rem = rank;
    (0..m)
        .map(|i| {
            let radix = factorial(m - i);
            let d = rem / radix;
            rem -= d * radix;
            d as usize
        })
        .collect()
}

/// The `rank`-th lexicographic ordering of `{1,…,m}`.
///
/// # Errors
/// Returns an error if `m > MAX_FACTORIAL_ARG` or `rank >= m!`.
pub fn try_unrank(m: u32, rank: Rank) -> Result<Vec<Element>> {
    ensure!(
        m <= MAX_FACTORIAL_ARG,
        "unrank: ordering length {m} exceeds {MAX_FACTORIAL_ARG}"
    );
    let space = factorial(m);
    ensure!(rank < space, "unrank: rank {rank} out of range [0, {space})");

    let digits = factorial_digits(m, rank);
    let mut pool: Vec<Element> = (0..=m).collect();
    let mut perm = Vec::with_capacity(pool.len());
    for d in digits {
        perm.push(pool.remove(d));
    }
    // Exactly one element is left in the pool.
    perm.append(&mut pool);

    debug_assert_eq!(perm.first(), Some(&0));
    perm.remove(0);
    Ok(perm)
}

/// Infallible [`try_unrank`].
///
/// # Panics
/// Panics if `rank >= m!` or `m > MAX_FACTORIAL_ARG`.
#[must_use]
pub fn unrank(m: u32, rank: Rank) -> Vec<Element> {
    match try_unrank(m, rank) {
        Ok(v) => v,
        Err(e) => panic!("{e}"),
    }
}

/// Lexicographic rank of a permutation of `{1,…,len}`.
///
/// Distinct values of any kind are accepted; only their relative order
/// matters.
///
/// # Panics
/// Panics if `ordering.len() > MAX_FACTORIAL_ARG + 1`.
#[must_use]
pub fn rank(ordering: &[Element]) -> Rank {
    let len = ordering.len();
    let mut r: Rank = 0;
    for (i, &e) in ordering.iter().enumerate() {
        let smaller_after = ordering[i + 1..].iter().filter(|&&x| x < e).count() as Rank;
        r += smaller_after * factorial((len - 1 - i) as u32);
    }
    r
}
