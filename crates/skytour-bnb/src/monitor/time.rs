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

//! Time limit monitor for tree search
//!
//! `TimeLimitMonitor` implements `TreeSearchMonitor` and enforces a wall-clock
//! time budget for the search. It resets its clock at the start, checks the
//! elapsed time at masked expansion counts, and signals termination once the
//! configured limit is reached.
//!
//! Construct with `new(limit)` to poll the clock at every expansion, or with
//! `with_clock_check_mask(limit, mask)` to trade precision for throughput.

use crate::{
    monitor::tree_search_monitor::{PruneReason, TreeSearchMonitor},
    route::PartialRoute,
    stats::BnbSolverStatistics,
};
use skytour_model::{matrix::CostMatrix, tour::Tour};
use skytour_search::monitor::search_monitor::SearchCommand;
use std::time::{Duration, Instant};

/// A tree search monitor that enforces a time limit on the search process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeLimitMonitor {
    start_time: Instant,
    time_limit: Duration,
    clock_check_mask: u64,
}

impl TimeLimitMonitor {
    /// Default mask: the clock is read at every expansion.
    const DEFAULT_CLOCK_CHECK_MASK: u64 = 0;

    /// Creates a new `TimeLimitMonitor` with the specified time limit.
    #[inline]
    pub fn new(time_limit: Duration) -> Self {
        Self::with_clock_check_mask(time_limit, Self::DEFAULT_CLOCK_CHECK_MASK)
    }

    /// Creates a new `TimeLimitMonitor` that only reads the clock when
    /// `nodes_expanded & clock_check_mask == 0`.
    #[inline]
    pub fn with_clock_check_mask(time_limit: Duration, clock_check_mask: u64) -> Self {
        Self {
            start_time: Instant::now(),
            time_limit,
            clock_check_mask,
        }
    }

    #[inline]
    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }

    /// Returns the time since the search started.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

impl TreeSearchMonitor for TimeLimitMonitor {
    fn name(&self) -> &str {
        "TimeLimitMonitor"
    }

    fn on_enter_search(&mut self, _matrix: &CostMatrix, _statistics: &BnbSolverStatistics) {
        self.start_time = Instant::now();
    }

    fn on_exit_search(&mut self, _statistics: &BnbSolverStatistics) {}

    #[inline(always)]
    fn search_command(
        &mut self,
        _route: &PartialRoute,
        statistics: &BnbSolverStatistics,
    ) -> SearchCommand {
        if (statistics.nodes_expanded & self.clock_check_mask) == 0
            && self.start_time.elapsed() >= self.time_limit
        {
            return SearchCommand::Terminate("time limit reached".to_string());
        }
        SearchCommand::Continue
    }

    fn on_expand(&mut self, _route: &PartialRoute, _statistics: &BnbSolverStatistics) {}

    fn on_prune(
        &mut self,
        _route: &PartialRoute,
        _reason: PruneReason,
        _statistics: &BnbSolverStatistics,
    ) {
    }

    fn on_children_enqueued(
        &mut self,
        _route: &PartialRoute,
        _count: usize,
        _statistics: &BnbSolverStatistics,
    ) {
    }

    fn on_solution_found(&mut self, _tour: &Tour, _statistics: &BnbSolverStatistics) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use skytour_model::index::NodeIndex;

    fn route() -> PartialRoute {
        PartialRoute::root(NodeIndex::new(0), 2)
    }

    fn stats(nodes_expanded: u64) -> BnbSolverStatistics {
        BnbSolverStatistics {
            nodes_expanded,
            ..Default::default()
        }
    }

    #[test]
    fn test_zero_budget_terminates_on_first_poll() {
        let mut monitor = TimeLimitMonitor::new(Duration::ZERO);
        assert_eq!(
            monitor.search_command(&route(), &stats(1)),
            SearchCommand::Terminate("time limit reached".to_string())
        );
    }

    #[test]
    fn test_continues_before_time_limit() {
        let mut monitor = TimeLimitMonitor::new(Duration::from_secs(3600));
        assert_eq!(
            monitor.search_command(&route(), &stats(7)),
            SearchCommand::Continue
        );
        assert_eq!(monitor.time_limit(), Duration::from_secs(3600));
    }

    #[test]
    fn test_mask_skips_clock_reads() {
        let mut monitor = TimeLimitMonitor::with_clock_check_mask(Duration::ZERO, 0b11);
        assert_eq!(
            monitor.search_command(&route(), &stats(3)),
            SearchCommand::Continue
        );
        assert!(matches!(
            monitor.search_command(&route(), &stats(4)),
            SearchCommand::Terminate(_)
        ));
    }

    #[test]
    fn test_enter_search_restarts_the_clock() {
        let mut monitor = TimeLimitMonitor::new(Duration::from_millis(200));
        std::thread::sleep(Duration::from_millis(250));
        let m = CostMatrix::from_rows(["A"], vec![vec![f64::INFINITY]]).unwrap();
        monitor.on_enter_search(&m, &stats(0));
        assert!(monitor.elapsed() < Duration::from_millis(200));
        assert_eq!(
            monitor.search_command(&route(), &stats(1)),
            SearchCommand::Continue
        );
    }
}
