//! Refresh statistics with atomic counters.
//!
//! [`RefreshStats`] is shared between the rayon workers of a refresh and the
//! caller. All counters use [`Relaxed`](std::sync::atomic::Ordering::Relaxed)
//! ordering; the numbers are informational only.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Atomic counters for catalogue refreshes.
///
/// The advisor resets the counters at the start of every refresh.
///
/// # Examples
///
/// ```
/// use cg_catalog::RefreshStats;
///
/// let stats = RefreshStats::new();
/// stats.add_discovered(3);
/// stats.increment_skipped();
/// stats.record_ingested(12);
///
/// let snap = stats.snapshot();
/// assert_eq!(snap.discovered, 3);
/// assert_eq!(snap.declarations, 12);
/// ```
#[derive(Debug, Default)]
pub struct RefreshStats {
    /// Declaration files reported by the source.
    discovered: AtomicU64,
    /// Files skipped because they were already ingested.
    skipped: AtomicU64,
    /// Files whose declarations were added to the catalogue.
    ingested: AtomicU64,
    /// Declarations added to the catalogue by ingested files.
    declarations: AtomicU64,
    /// Files that could not be read.
    errors: AtomicU64,
}

impl RefreshStats {
    /// Creates a new [`RefreshStats`] with all counters at zero.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds to the discovered files counter.
    #[inline]
    pub fn add_discovered(&self, count: u64) {
        self.discovered.fetch_add(count, Ordering::Relaxed);
    }

    /// Increments the skipped files counter.
    #[inline]
    pub fn increment_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Adds to the skipped files counter.
    #[inline]
    pub fn add_skipped(&self, count: u64) {
        self.skipped.fetch_add(count, Ordering::Relaxed);
    }

    /// Records one ingested file carrying `declarations` declarations.
    #[inline]
    pub fn record_ingested(&self, declarations: u64) {
        self.ingested.fetch_add(1, Ordering::Relaxed);
        self.declarations.fetch_add(declarations, Ordering::Relaxed);
    }

    /// Increments the error counter.
    #[inline]
    pub fn increment_errors(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns a point-in-time snapshot of all counters.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            discovered: self.discovered.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            ingested: self.ingested.load(Ordering::Relaxed),
            declarations: self.declarations.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }

    /// Resets all counters to zero.
    pub fn reset(&self) {
        self.discovered.store(0, Ordering::Relaxed);
        self.skipped.store(0, Ordering::Relaxed);
        self.ingested.store(0, Ordering::Relaxed);
        self.declarations.store(0, Ordering::Relaxed);
        self.errors.store(0, Ordering::Relaxed);
    }
}

/// A point-in-time copy of [`RefreshStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Declaration files reported by the source.
    pub discovered: u64,
    /// Files skipped because they were already ingested.
    pub skipped: u64,
    /// Files whose declarations were added to the catalogue.
    pub ingested: u64,
    /// Declarations added to the catalogue by ingested files.
    pub declarations: u64,
    /// Files that could not be read.
    pub errors: u64,
}

impl StatsSnapshot {
    /// Files that still need ingesting: neither ingested, skipped nor failed.
    ///
    /// ```
    /// use cg_catalog::StatsSnapshot;
    ///
    /// let snap = StatsSnapshot {
    ///     discovered: 10,
    ///     skipped: 4,
    ///     ingested: 5,
    ///     declarations: 40,
    ///     errors: 1,
    /// };
    /// assert_eq!(snap.pending(), 0);
    /// ```
    #[inline]
    #[must_use]
    pub const fn pending(&self) -> u64 {
        self.discovered
            .saturating_sub(self.skipped + self.ingested + self.errors)
    }
}
