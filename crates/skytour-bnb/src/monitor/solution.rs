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

//! Solution limit monitor for tree search
//!
//! `SolutionLimitMonitor` implements `TreeSearchMonitor` and stops the search
//! once a configured number of improving tours has been found. It reads the
//! solver statistics and stays unobtrusive otherwise.

use crate::{
    monitor::tree_search_monitor::{PruneReason, TreeSearchMonitor},
    route::PartialRoute,
    stats::BnbSolverStatistics,
};
use skytour_model::{matrix::CostMatrix, tour::Tour};
use skytour_search::monitor::search_monitor::SearchCommand;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolutionLimitMonitor {
    solution_limit: u64,
}

impl SolutionLimitMonitor {
    /// Creates a new `SolutionLimitMonitor` with the specified solution limit.
    #[inline]
    pub fn new(solution_limit: u64) -> Self {
        Self { solution_limit }
    }

    #[inline]
    pub fn solution_limit(&self) -> u64 {
        self.solution_limit
    }
}

impl TreeSearchMonitor for SolutionLimitMonitor {
    fn name(&self) -> &str {
        "SolutionLimitMonitor"
    }

    fn on_enter_search(&mut self, _matrix: &CostMatrix, _statistics: &BnbSolverStatistics) {}

    fn on_exit_search(&mut self, _statistics: &BnbSolverStatistics) {}

    #[inline(always)]
    fn search_command(
        &mut self,
        _route: &PartialRoute,
        statistics: &BnbSolverStatistics,
    ) -> SearchCommand {
        if statistics.solutions_found >= self.solution_limit {
            return SearchCommand::Terminate("solution limit reached".to_string());
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
