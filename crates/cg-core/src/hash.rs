//! Fx hash set alias.
//!
//! The catalogue tracks ingested files by short string keys, where the Fx
//! hash from `rustc-hash` outperforms SipHash. Keys never come from untrusted
//! input.
//!
//! # Examples
//!
//! ```
//! use cg_core::{FxHashSet, fx_hash_set};
//!
//! let mut ingested: FxHashSet<&str> = fx_hash_set();
//! assert!(ingested.insert("typings/a_modules.cg_core.d.ts"));
//! assert!(!ingested.insert("typings/a_modules.cg_core.d.ts"));
//! ```

/// A [`HashSet`](std::collections::HashSet) using the Fx hash algorithm.
pub type FxHashSet<V> = rustc_hash::FxHashSet<V>;

/// Creates a new empty [`FxHashSet`].
#[inline]
#[must_use]
pub fn fx_hash_set<V>() -> FxHashSet<V> {
    FxHashSet::default()
}
