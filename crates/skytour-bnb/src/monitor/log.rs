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

//! Progress logging for tree search
//!
//! `LogTreeSearchMonitor` reports search progress through the `log` facade:
//! a header when the search starts, a periodic `info!` line while it runs,
//! a `debug!` line per improving tour and a summary at exit. The clock is
//! only read when `nodes_expanded & clock_check_mask == 0`.

use crate::{
    monitor::tree_search_monitor::{PruneReason, TreeSearchMonitor},
    route::PartialRoute,
    stats::BnbSolverStatistics,
};
use skytour_model::{
    matrix::{Complexity, CostMatrix},
    tour::Tour,
};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct LogTreeSearchMonitor {
    start_time: Instant,
    last_log_time: Instant,
    log_interval: Duration,
    clock_check_mask: u64,
    best_cost: Option<f64>,
    complexity: Option<Complexity>,
}

impl LogTreeSearchMonitor {
    pub fn new(log_interval: Duration, clock_check_mask: u64) -> Self {
        Self {
            start_time: Instant::now(),
            last_log_time: Instant::now(),
            log_interval,
            clock_check_mask,
            best_cost: None,
            complexity: None,
        }
    }

    /// Returns the cost of the best tour seen during the current search.
    #[inline]
    pub fn best_cost(&self) -> Option<f64> {
        self.best_cost
    }

    #[inline(always)]
    fn log_line(&mut self, route: &PartialRoute, stats: &BnbSolverStatistics) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.start_time).as_secs_f32();

        let best = match self.best_cost {
            Some(cost) => format!("{}", cost),
            None => "inf".to_string(),
        };
        let coverage = self
            .complexity
            .map(|c| c.coverage(stats.nodes_expanded))
            .unwrap_or(0.0);

        log::info!(
            "{:<9} | {:<14} | {:<7} | {:<14} | {:<14} | {:<10} | {:.4}%",
            format!("{:.1}s", elapsed),
            stats.nodes_expanded,
            route.depth(),
            best,
            route.cost(),
            stats.prunings_total(),
            coverage
        );

        self.last_log_time = now;
    }
}

impl Default for LogTreeSearchMonitor {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 4095)
    }
}

impl std::fmt::Display for LogTreeSearchMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LogTreeSearchMonitor(log_interval: {}s, clock_check_mask: {})",
            self.log_interval.as_secs(),
            self.clock_check_mask
        )
    }
}

impl TreeSearchMonitor for LogTreeSearchMonitor {
    fn name(&self) -> &str {
        "LogTreeSearchMonitor"
    }

    fn on_enter_search(&mut self, matrix: &CostMatrix, _statistics: &BnbSolverStatistics) {
        self.start_time = Instant::now();
        self.last_log_time = self.start_time;
        self.best_cost = None;
        let complexity = matrix.complexity();
        self.complexity = Some(complexity);

        log::info!(
            "search over {} airports, tree size {}",
            matrix.num_nodes(),
            complexity
        );
        log::info!(
            "{:<9} | {:<14} | {:<7} | {:<14} | {:<14} | {:<10} | {}",
            "Elapsed",
            "Nodes",
            "Depth",
            "Best Cost",
            "Route Cost",
            "Pruned",
            "Coverage"
        );
    }

    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics) {
        log::info!(
            "search finished: {} nodes expanded, {} tours found in {:.2?}",
            statistics.nodes_expanded,
            statistics.solutions_found,
            self.start_time.elapsed()
        );
    }

    fn on_expand(&mut self, route: &PartialRoute, statistics: &BnbSolverStatistics) {
        if (statistics.nodes_expanded & self.clock_check_mask) == 0
            && self.last_log_time.elapsed() >= self.log_interval
        {
            self.log_line(route, statistics);
        }
    }

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

    fn on_solution_found(&mut self, tour: &Tour, statistics: &BnbSolverStatistics) {
        self.best_cost = Some(tour.cost());
        log::debug!(
            "improving tour with cost {} after {} nodes",
            tour.cost(),
            statistics.nodes_expanded
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skytour_model::index::NodeIndex;

    #[test]
    fn test_tracks_best_cost_and_resets_on_enter() {
        let inf = f64::INFINITY;
        let m = CostMatrix::from_rows(["A", "B"], vec![vec![inf, 1.0], vec![2.0, inf]]).unwrap();
        let stats = BnbSolverStatistics::default();
        let mut monitor = LogTreeSearchMonitor::new(Duration::ZERO, 0);

        monitor.on_enter_search(&m, &stats);
        assert_eq!(monitor.best_cost(), None);

        let tour = Tour::new(3.0, vec![NodeIndex::new(0), NodeIndex::new(1), NodeIndex::new(0)]);
        monitor.on_solution_found(&tour, &stats);
        monitor.on_expand(&PartialRoute::root(NodeIndex::new(0), 2), &stats);
        assert_eq!(monitor.best_cost(), Some(3.0));

        monitor.on_enter_search(&m, &stats);
        assert_eq!(monitor.best_cost(), None);
    }

    #[test]
    fn test_display() {
        let monitor = LogTreeSearchMonitor::default();
        assert_eq!(
            monitor.to_string(),
            "LogTreeSearchMonitor(log_interval: 1s, clock_check_mask: 4095)"
        );
    }
}
