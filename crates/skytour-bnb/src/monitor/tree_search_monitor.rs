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

//! Tree search monitoring interface
//!
//! Declares the `TreeSearchMonitor` trait and `PruneReason` for observing and
//! controlling branch-and-bound. Callbacks track the solver lifecycle, and a
//! monitor can influence execution via `SearchCommand` (default: Continue).
//!
//! Lifecycle highlights
//! - enter -> expand -> {prune | search_command -> {solution | children}} -> exit
//! - `search_command` is polled once per expansion, after the bound check.
//! - `BnbSolverStatistics` is provided to every callback for telemetry.
//!
//! Design notes
//! - Methods take `&mut self`; monitors are assumed single-threaded.
//! - Keep callbacks lightweight; avoid blocking I/O in hot paths.

use crate::{route::PartialRoute, stats::BnbSolverStatistics};
use skytour_model::{matrix::CostMatrix, tour::Tour};
use skytour_search::monitor::search_monitor::SearchCommand;

/// Reasons for pruning a partial route.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PruneReason {
    /// The accumulated cost meets or exceeds the current bound.
    BoundDominated,
    /// Every airport is visited but there is no edge back to the start.
    NoReturnEdge,
    /// No unvisited airport is reachable from the current one.
    DeadEnd,
}

impl std::fmt::Display for PruneReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PruneReason::BoundDominated => write!(f, "BoundDominated"),
            PruneReason::NoReturnEdge => write!(f, "NoReturnEdge"),
            PruneReason::DeadEnd => write!(f, "DeadEnd"),
        }
    }
}

/// Trait for monitoring and controlling the search process of the solver.
pub trait TreeSearchMonitor {
    /// Returns the name of the monitor.
    fn name(&self) -> &str;
    /// Called when the search starts.
    fn on_enter_search(&mut self, matrix: &CostMatrix, statistics: &BnbSolverStatistics);
    /// Called when the search ends.
    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics);
    /// Called to determine the next action of the search.
    fn search_command(
        &mut self,
        _route: &PartialRoute,
        _statistics: &BnbSolverStatistics,
    ) -> SearchCommand {
        SearchCommand::Continue
    }
    /// Called for every route popped from the frontier.
    fn on_expand(&mut self, route: &PartialRoute, statistics: &BnbSolverStatistics);
    /// Called when a route is pruned.
    fn on_prune(
        &mut self,
        route: &PartialRoute,
        reason: PruneReason,
        statistics: &BnbSolverStatistics,
    );
    /// Called when the children of a route are pushed onto the frontier.
    fn on_children_enqueued(
        &mut self,
        route: &PartialRoute,
        count: usize,
        statistics: &BnbSolverStatistics,
    );
    /// Called when a new improving tour is found.
    fn on_solution_found(&mut self, tour: &Tour, statistics: &BnbSolverStatistics);
}

impl std::fmt::Debug for dyn TreeSearchMonitor + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}

impl std::fmt::Display for dyn TreeSearchMonitor + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}
