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

use std::time::Duration;

/// Statistics collected during the execution of the Skytour-BnB solver.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BnbSolverStatistics {
    /// Total partial routes popped from the frontier, pruned ones included.
    pub nodes_expanded: u64,
    /// Total child routes pushed onto the frontier.
    pub children_generated: u64,
    /// The deepest level reached in the tree (edges travelled).
    pub max_depth: u64,
    /// Pruned because the accumulated cost met or exceeded the bound.
    pub prunings_bound: u64,
    /// Full permutations discarded for lack of an edge back to the start.
    pub prunings_no_return: u64,
    /// Routes without any reachable unvisited airport.
    pub prunings_dead_end: u64,
    /// Total improving tours found during the search.
    pub solutions_found: u64,
    /// The largest number of routes the frontier held at once.
    pub frontier_peak: u64,
    /// Total time spent in the solver.
    pub time_total: Duration,
}

impl BnbSolverStatistics {
    #[inline]
    pub fn on_node_expanded(&mut self) {
        self.nodes_expanded = self.nodes_expanded.saturating_add(1);
    }

    #[inline]
    pub fn on_children_generated(&mut self, count: u64) {
        self.children_generated = self.children_generated.saturating_add(count);
    }

    #[inline]
    pub fn on_depth_update(&mut self, depth: u64) {
        self.max_depth = self.max_depth.max(depth);
    }

    #[inline]
    pub fn on_frontier_size(&mut self, size: u64) {
        self.frontier_peak = self.frontier_peak.max(size);
    }

    /// Records a pruning event caused by the cost bound (either local or shared).
    #[inline]
    pub fn on_pruning_bound(&mut self) {
        self.prunings_bound = self.prunings_bound.saturating_add(1);
    }

    #[inline]
    pub fn on_pruning_no_return(&mut self) {
        self.prunings_no_return = self.prunings_no_return.saturating_add(1);
    }

    #[inline]
    pub fn on_pruning_dead_end(&mut self) {
        self.prunings_dead_end = self.prunings_dead_end.saturating_add(1);
    }

    #[inline]
    pub fn on_solution_found(&mut self) {
        self.solutions_found = self.solutions_found.saturating_add(1);
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }

    /// Returns the total number of pruned routes.
    #[inline]
    pub fn prunings_total(&self) -> u64 {
        self.prunings_bound
            .saturating_add(self.prunings_no_return)
            .saturating_add(self.prunings_dead_end)
    }
}

impl std::fmt::Display for BnbSolverStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Skytour-BnB Solver Statistics:")?;
        writeln!(f, "  Nodes expanded:       {}", self.nodes_expanded)?;
        writeln!(f, "  Children generated:   {}", self.children_generated)?;
        writeln!(f, "  Max depth reached:    {}", self.max_depth)?;
        writeln!(f, "  Frontier peak:        {}", self.frontier_peak)?;
        writeln!(f, "  Prunings (bound):     {}", self.prunings_bound)?;
        writeln!(f, "  Prunings (no return): {}", self.prunings_no_return)?;
        writeln!(f, "  Prunings (dead end):  {}", self.prunings_dead_end)?;
        writeln!(f, "  Solutions found:      {}", self.solutions_found)?;
        writeln!(f, "  Total time:           {:.2?}", self.time_total)?;
        Ok(())
    }
}
