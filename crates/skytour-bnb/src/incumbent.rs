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

//! Incumbent management for branch-and-bound
//!
//! Declares `IncumbentStore`, a minimal interface to read/update the best
//! known tour cost (upper bound) and publish new tours during search. This
//! abstracts over local (single-threaded) and shared (portfolio) use.
//!
//! Implementations
//! - `NoSharedIncumbent`: local only. `initial_upper_bound` is the caller's
//!   ceiling (`+inf` by default), `tighten(x) = x`, and `on_solution_found`
//!   is a no-op.
//! - `SharedIncumbentAdapter<'a>`: wraps `skytour_search::incumbent::SharedIncumbent`;
//!   `initial_upper_bound()` mirrors the shared value, `tighten(x)` returns
//!   `min(shared, x)`, and `on_solution_found` attempts installation.

use skytour_model::tour::Tour;
use skytour_search::incumbent::SharedIncumbent;

/// Trait for managing incumbent tours in a branch-and-bound solver.
pub trait IncumbentStore {
    /// Returns the initial upper bound for the search.
    fn initial_upper_bound(&self) -> f64;
    /// Synchronizes the current local best cost with the backing store.
    fn tighten(&self, current_local_best: f64) -> f64;
    /// Notifies the backing that a new improving tour has been found.
    fn on_solution_found(&self, tour: &Tour);
}

/// An `IncumbentStore` that keeps the bound local to one solver.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoSharedIncumbent {
    upper_bound: f64,
}

impl Default for NoSharedIncumbent {
    fn default() -> Self {
        Self::new()
    }
}

impl NoSharedIncumbent {
    /// Creates a store without a bound.
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            upper_bound: f64::INFINITY,
        }
    }

    /// Creates a store whose initial bound is `upper_bound`. Only tours
    /// strictly cheaper than it are accepted.
    ///
    /// # Panics
    ///
    /// In debug builds, this function will panic if `upper_bound` is NaN.
    #[inline(always)]
    pub fn with_upper_bound(upper_bound: f64) -> Self {
        debug_assert!(
            !upper_bound.is_nan(),
            "called `NoSharedIncumbent::with_upper_bound` with a NaN bound"
        );
        Self { upper_bound }
    }
}

impl IncumbentStore for NoSharedIncumbent {
    #[inline(always)]
    fn initial_upper_bound(&self) -> f64 {
        self.upper_bound
    }

    #[inline(always)]
    fn tighten(&self, current_local_best: f64) -> f64 {
        current_local_best
    }

    #[inline(always)]
    fn on_solution_found(&self, _: &Tour) {}
}

/// An `IncumbentStore` that shares the incumbent between solver instances
/// through a `SharedIncumbent`.
#[repr(transparent)]
#[derive(Debug, Clone)]
pub struct SharedIncumbentAdapter<'a> {
    inner: &'a SharedIncumbent,
}

impl<'a> SharedIncumbentAdapter<'a> {
    #[inline(always)]
    pub fn new(inner: &'a SharedIncumbent) -> Self {
        Self { inner }
    }
}

impl IncumbentStore for SharedIncumbentAdapter<'_> {
    #[inline(always)]
    fn initial_upper_bound(&self) -> f64 {
        self.inner.upper_bound()
    }

    #[inline(always)]
    fn tighten(&self, current_local_best: f64) -> f64 {
        self.inner.upper_bound().min(current_local_best)
    }

    #[inline(always)]
    fn on_solution_found(&self, tour: &Tour) {
        self.inner.try_install(tour);
    }
}
