//! corder-core — the combinatorial engine behind the constructive-ordering search.
//!
//! This crate is pure and allocation-light:
//! - [`factorial`] and friends for small `n!`,
//! - [`unrank`]/[`rank`]: the factorial-number-system bijection between ranks
//!   and orderings of `{1,…,n-1}`,
//! - [`advance`]: in-place lexicographic successor,
//! - [`Verifier`]/[`is_constructive`]: the constructive-ordering predicate and
//!   the [`mirror`] map behind the symmetry halving.
//!
//! ```rust
//! use corder_core::{advance, is_constructive, unrank, GroupSize};
//!
//! let z4 = GroupSize::new(4)?;
//! let mut ord = unrank(3, 0); // (1, 2, 3)
//! let mut found = 0;
//! loop {
//!     if is_constructive(&ord, z4) {
//!         found += 1;
//!     }
//!     if !advance(&mut ord) {
//!         break;
//!     }
//! }
//! assert_eq!(found, 2);
//! # Ok::<(), anyhow::Error>(())
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::cast_possible_truncation,
    clippy::doc_markdown
)]

/// Small factorials (`k <= 20`).
pub mod factorial;
/// Factorial-base rank/unrank.
pub mod rank;
/// Lexicographic successor.
pub mod successor;
/// Core types (`GroupSize`, `Rank`, `Element`).
pub mod types;
/// Constructive-ordering verifier and mirror map.
pub mod verify;

pub use factorial::*;
pub use rank::*;
pub use successor::*;
pub use types::*;
pub use verify::*;

/// Commonly-used items for quick imports.
pub mod prelude {
    pub use crate::{
        advance, is_constructive, mirror, rank, unrank, Element, GroupSize, Rank, Verifier,
    };
}
