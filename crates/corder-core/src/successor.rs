//! In-place lexicographic successor.

/// Step `perm` to the next permutation in lexicographic order.
///
/// Returns `false` when `perm` was the last permutation (non-increasing); in
/// that case it is reset to ascending order. Slices of length 0 or 1 are
/// unchanged and always return `false`.
pub fn advance<T: Ord>(perm: &mut [T]) -> bool {
    let len = perm.len();
    if len < 2 {
        return false;
    }

    // Start of the longest non-increasing suffix.
    let mut i = len - 1;
    while i > 0 && perm[i - 1] >= perm[i] {
        i -= 1;
    }
    if i == 0 {
        perm.reverse();
        return false;
    }

    let pivot = i - 1;
    // The suffix is non-increasing, so the rightmost element above the pivot
    // is the smallest one above it.
    let mut j = len - 1;
    while perm[j] <= perm[pivot] {
        j -= 1;
    }
    perm.swap(pivot, j);
    perm[i..].reverse();
    true
}
