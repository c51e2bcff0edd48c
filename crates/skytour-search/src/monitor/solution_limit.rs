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

//! # Solution Count Monitor
//!
//! Tracks the number of improving tours discovered using a shared `AtomicU64`
//! counter and optionally terminates the search once a global limit is
//! reached. Several monitors (one per portfolio thread) can share the counter.

use crate::monitor::search_monitor::{SearchCommand, SearchMonitor};
use skytour_model::{matrix::CostMatrix, tour::Tour};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counts solutions in a shared counter and stops the search at an optional limit.
#[derive(Debug)]
pub struct SolutionLimitMonitor<'a> {
    solutions_found: &'a AtomicU64,
    solution_limit: Option<u64>,
}

impl<'a> SolutionLimitMonitor<'a> {
    /// Creates a monitor that terminates once `solution_limit` tours were found.
    #[inline]
    pub fn with_limit(solutions_found: &'a AtomicU64, solution_limit: u64) -> Self {
        Self {
            solutions_found,
            solution_limit: Some(solution_limit),
        }
    }

    /// Creates a monitor that only counts.
    #[inline]
    pub fn without_limit(solutions_found: &'a AtomicU64) -> Self {
        Self {
            solutions_found,
            solution_limit: None,
        }
    }

    #[inline]
    fn reached_limit(&self) -> bool {
        self.solution_limit
            .is_some_and(|limit| self.solutions_found.load(Ordering::Relaxed) >= limit)
    }
}

impl SearchMonitor for SolutionLimitMonitor<'_> {
    fn name(&self) -> &str {
        "SolutionLimitMonitor"
    }

    fn on_enter_search(&mut self, _matrix: &CostMatrix) {}

    fn on_exit_search(&mut self) {}

    fn on_solution_found(&mut self, _tour: &Tour) {
        self.solutions_found.fetch_add(1, Ordering::Relaxed);
    }

    fn on_step(&mut self) {}

    fn search_command(&self) -> SearchCommand {
        if self.reached_limit() {
            SearchCommand::Terminate("global solution limit reached".to_string())
        } else {
            SearchCommand::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SolutionLimitMonitor;
    use crate::monitor::search_monitor::{SearchCommand, SearchMonitor};
    use skytour_model::{index::NodeIndex, tour::Tour};
    use std::sync::atomic::{AtomicU64, Ordering};

    fn dummy_tour(cost: f64) -> Tour {
        Tour::new(cost, vec![NodeIndex::new(0), NodeIndex::new(1), NodeIndex::new(0)])
    }

    #[test]
    fn test_continue_before_limit_and_terminate_at_limit() {
        let counter = AtomicU64::new(0);
        let mut monitor = SolutionLimitMonitor::with_limit(&counter, 3);

        assert!(matches!(monitor.search_command(), SearchCommand::Continue));
        monitor.on_solution_found(&dummy_tour(10.0));
        monitor.on_solution_found(&dummy_tour(9.0));
        assert!(matches!(monitor.search_command(), SearchCommand::Continue));

        monitor.on_solution_found(&dummy_tour(8.0));
        assert!(matches!(
            monitor.search_command(),
            SearchCommand::Terminate(ref msg) if msg == "global solution limit reached"
        ));
    }

    #[test]
    fn test_shared_counter_across_monitors() {
        let counter = AtomicU64::new(0);
        let mut a = SolutionLimitMonitor::with_limit(&counter, 2);
        let mut b = SolutionLimitMonitor::with_limit(&counter, 2);

        a.on_solution_found(&dummy_tour(5.0));
        assert!(matches!(b.search_command(), SearchCommand::Continue));
        b.on_solution_found(&dummy_tour(4.0));

        assert!(matches!(a.search_command(), SearchCommand::Terminate(_)));
        assert!(matches!(b.search_command(), SearchCommand::Terminate(_)));
        assert_eq!(counter.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_without_limit_only_counts() {
        let counter = AtomicU64::new(0);
        let mut monitor = SolutionLimitMonitor::without_limit(&counter);
        for i in 0..100 {
            monitor.on_solution_found(&dummy_tour(i as f64));
        }
        assert_eq!(counter.load(Ordering::Relaxed), 100);
        assert!(matches!(monitor.search_command(), SearchCommand::Continue));
    }
}
