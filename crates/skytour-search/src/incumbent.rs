// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Shared Incumbent (Best Tour Holder)
//!
//! A concurrent container for the best tour discovered so far by any thread.
//! It exposes a fast, lock-free upper bound via an atomic and stores the actual
//! `Tour` behind a `Mutex` as the source of truth.
//!
//! ## Motivation
//!
//! - Fast checks: a cheap atomic upper bound short-circuits attempts to install
//!   obviously worse candidates without locking.
//! - Correctness by locking: the authoritative incumbent is protected by a
//!   `Mutex`, so cost and tour are always replaced together.
//! - Ceiling: an optional initial bound caps what may ever be installed; a tour
//!   that does not beat it is rejected even when nothing is installed yet.
//!
//! ## Highlights
//!
//! - `try_install(&Tour) -> bool` installs strictly better candidates,
//!   updating both the snapshot and the atomic upper bound.
//! - `snapshot() -> Option<Tour>` returns a cloned snapshot of the current
//!   incumbent (if any).
//! - `upper_bound() -> f64` for quick reads; `f64::INFINITY` means "no bound".
//! - Atomic reads/writes use `Ordering::Relaxed`; the mutex provides the
//!   correctness guarantee.
//!
//! ## Usage
//!
//! ```rust
//! use skytour_search::incumbent::SharedIncumbent;
//! use skytour_model::{index::NodeIndex, tour::Tour};
//!
//! let inc = SharedIncumbent::new();
//! let candidate = Tour::new(100.0, vec![NodeIndex::new(0), NodeIndex::new(1), NodeIndex::new(0)]);
//!
//! assert!(inc.try_install(&candidate));
//! assert_eq!(inc.upper_bound(), 100.0);
//! assert!(inc.snapshot().is_some());
//! ```

use skytour_model::tour::Tour;
use std::sync::{
    Mutex, MutexGuard, PoisonError,
    atomic::{AtomicU64, Ordering},
};

/// A concurrent holder for the best (incumbent) tour found during search.
///
/// This structure maintains:
/// - an `AtomicU64` holding the bit pattern of the `f64` upper bound for fast,
///   lock-free reads, and
/// - a `Mutex<Option<Tour>>` for the actual tour, which is the source of truth.
///
/// The upper bound starts at the ceiling passed to `with_upper_bound`
/// (`f64::INFINITY` for `new`) and only ever decreases.
#[derive(Debug)]
pub struct SharedIncumbent {
    /// `f64::to_bits` of the current upper bound.
    upper_bound: AtomicU64,

    /// The initial ceiling. Candidates must beat it even before the first install.
    ceiling: f64,

    /// The incumbent tour, protected by a mutex for safe concurrent access.
    tour: Mutex<Option<Tour>>,
}

impl Default for SharedIncumbent {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SharedIncumbent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Incumbent(upper_bound: {})", self.upper_bound())
    }
}

impl SharedIncumbent {
    /// Creates a new shared incumbent with no tour installed and no ceiling.
    #[inline]
    pub fn new() -> Self {
        Self::with_upper_bound(f64::INFINITY)
    }

    /// Creates a new shared incumbent whose upper bound starts at `ceiling`.
    ///
    /// # Panics
    ///
    /// Panics if `ceiling` is NaN or negative.
    #[inline]
    pub fn with_upper_bound(ceiling: f64) -> Self {
        assert!(
            ceiling >= 0.0,
            "called `SharedIncumbent::with_upper_bound` with an invalid ceiling: {}",
            ceiling
        );

        SharedIncumbent {
            upper_bound: AtomicU64::new(ceiling.to_bits()),
            ceiling,
            tour: Mutex::new(None),
        }
    }

    /// Returns the current upper bound.
    #[inline]
    pub fn upper_bound(&self) -> f64 {
        f64::from_bits(self.upper_bound.load(Ordering::Relaxed))
    }

    /// Returns a snapshot of the current incumbent tour, if any.
    #[inline]
    pub fn snapshot(&self) -> Option<Tour> {
        self.lock().clone()
    }

    /// Attempts to install the given candidate tour as the new incumbent.
    /// Returns `true` if the candidate was installed, `false` otherwise.
    pub fn try_install(&self, candidate: &Tour) -> bool {
        let candidate_cost = candidate.cost();

        // We are minimizing, so lower is better.
        if candidate_cost >= self.upper_bound() {
            return false;
        }

        let mut guard = self.lock();
        // Another thread may have installed a better tour while we waited.
        // Compare against the value under the lock, not the hint read earlier.
        let current = guard.as_ref().map_or(self.ceiling, Tour::cost);
        if candidate_cost >= current {
            return false;
        }

        *guard = Some(candidate.clone());
        self.upper_bound
            .store(candidate_cost.to_bits(), Ordering::Relaxed);

        true
    }

    #[inline]
    fn lock(&self) -> MutexGuard<'_, Option<Tour>> {
        // The slot is only ever replaced wholesale, so a poisoned value is intact.
        self.tour.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
