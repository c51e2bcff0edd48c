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

//! # Portfolio-Orchestrated Solver
//!
//! Runs several engines on the same instance in parallel threads. They share
//! one incumbent, so a tour found by any thread tightens the bound of all
//! others.
//!
//! ## Highlights
//!
//! - Portfolio execution:
//!   - Spawn each `PortfolioSolver` in a thread using `std::thread::scope`.
//!   - Build a `CompositeMonitor` per thread with interrupt, solution-limit,
//!     and optional time-limit monitors.
//! - Shared state:
//!   - A fresh `SharedIncumbent` per solve, capped by the optional initial bound.
//!   - Global counter (`AtomicU64`) for solutions found; `AtomicBool` stop signal.
//! - Early stop:
//!   - The first thread that exhausts its search space has proven the shared
//!     incumbent optimal (or that nothing beats the bound), so it signals the
//!     others to stop.
//! - Outcome construction:
//!   - Optimal > Infeasible when any thread exhausted its space;
//!     otherwise Feasible > Unknown.
//!
//! ## Usage
//!
//! ```rust
//! use skytour_bnb::{portfolio::BnbPortfolioSolver, strategy::SearchStrategy};
//! use skytour_model::{index::NodeIndex, matrix::CostMatrix};
//! use skytour_solver::solver::SolverBuilder;
//!
//! let inf = f64::INFINITY;
//! let m = CostMatrix::from_rows(["A", "B"], vec![vec![inf, 5.0], vec![7.0, inf]]).unwrap();
//!
//! let mut solver = SolverBuilder::new()
//!     .with_time_limit(std::time::Duration::from_secs(5))
//!     .add_solver(BnbPortfolioSolver::new(SearchStrategy::DepthFirst))
//!     .add_solver(BnbPortfolioSolver::new(SearchStrategy::BestFirst))
//!     .build();
//!
//! let outcome = solver.solve(&m, NodeIndex::new(0));
//! assert!(outcome.is_optimal());
//! ```

use skytour_model::{index::NodeIndex, matrix::CostMatrix, tour::Tour};
use skytour_search::{
    incumbent::SharedIncumbent,
    monitor::{
        composite::CompositeMonitor, interrupt::InterruptMonitor,
        solution_limit::SolutionLimitMonitor, time_limit::TimeLimitMonitor,
    },
    portfolio::{PortfolioSolver, PortfolioSolverContext, PortfolioSolverResult},
    report::RouteReport,
    result::{SolverOutcome, SolverResult, TerminationReason},
    stats::{SolverStatistics, SolverStatisticsBuilder},
};
use std::{
    sync::atomic::{AtomicBool, AtomicU64, Ordering},
    time::{Duration, Instant},
};

/// The name portfolio reports are filed under.
pub const PORTFOLIO_NAME: &str = "portfolio";

pub struct Solver<'a> {
    portfolio_solver: Vec<Box<dyn PortfolioSolver + 'a>>,
    global_solution_count: AtomicU64,
    /// Shared flag to signal all solvers to stop once one has exhausted its space.
    stop_signal: AtomicBool,
    solution_limit: Option<u64>,
    time_limit: Option<Duration>,
    initial_bound: f64,
}

impl<'a> Solver<'a> {
    #[inline]
    pub fn add_solver<S>(&mut self, solver: S)
    where
        S: PortfolioSolver + 'a,
    {
        self.portfolio_solver.push(Box::new(solver));
    }

    #[inline]
    pub fn add_solver_boxed(&mut self, solver: Box<dyn PortfolioSolver + 'a>) {
        self.portfolio_solver.push(solver);
    }

    #[inline]
    pub fn num_solvers(&self) -> usize {
        self.portfolio_solver.len()
    }

    #[inline]
    pub fn solution_limit(&self) -> Option<u64> {
        self.solution_limit
    }

    #[inline]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    #[inline]
    pub fn initial_bound(&self) -> f64 {
        self.initial_bound
    }

    /// Races all portfolio solvers on `matrix` from `start`.
    ///
    /// # Panics
    ///
    /// Panics if no portfolio solver was added or if `start` is not a node
    /// of `matrix`.
    pub fn solve(&mut self, matrix: &CostMatrix, start: NodeIndex) -> SolverOutcome {
        assert!(
            !self.portfolio_solver.is_empty(),
            "called `Solver::solve` with no portfolio solvers added"
        );
        assert!(
            start.get() < matrix.num_nodes(),
            "called `Solver::solve` with start node out of bounds: the len is {} but the index is {}",
            matrix.num_nodes(),
            start.get()
        );

        let start_time = Instant::now();

        self.stop_signal.store(false, Ordering::Relaxed);
        self.global_solution_count.store(0, Ordering::Relaxed);
        let incumbent = SharedIncumbent::with_upper_bound(self.initial_bound);

        let results = self.run_portfolio_parallel(matrix, start, &incumbent);
        self.construct_outcome(start_time, &incumbent, results)
    }

    /// Races the portfolio and renders the outcome as a `RouteReport`.
    pub fn solve_report(&mut self, matrix: &CostMatrix, start: NodeIndex) -> RouteReport {
        let outcome = self.solve(matrix, start);
        RouteReport::from_result(
            PORTFOLIO_NAME,
            matrix,
            start,
            &outcome.result,
            &outcome.reason,
            outcome.statistics.solve_duration,
            outcome.statistics.nodes_expanded,
        )
    }

    fn run_portfolio_parallel(
        &mut self,
        matrix: &CostMatrix,
        start: NodeIndex,
        incumbent: &SharedIncumbent,
    ) -> Vec<PortfolioSolverResult> {
        let solution_limit = self.solution_limit;
        let time_limit = self.time_limit;
        let global_solution_count = &self.global_solution_count;
        let stop_signal = &self.stop_signal;

        let mut results = Vec::with_capacity(self.portfolio_solver.len());

        std::thread::scope(|scope| {
            let mut handles = Vec::with_capacity(self.portfolio_solver.len());

            for solver in &mut self.portfolio_solver {
                let handle = scope.spawn(move || {
                    let mut monitor = CompositeMonitor::with_capacity(3);
                    monitor.add_monitor(InterruptMonitor::new(stop_signal));
                    monitor.add_monitor(match solution_limit {
                        Some(limit) => SolutionLimitMonitor::with_limit(global_solution_count, limit),
                        None => SolutionLimitMonitor::without_limit(global_solution_count),
                    });
                    if let Some(limit) = time_limit {
                        monitor.add_monitor(TimeLimitMonitor::with_clock_check_mask(limit, 0));
                    }

                    let ctx =
                        PortfolioSolverContext::new(matrix, start, incumbent, &mut monitor, stop_signal);
                    let result = solver.invoke(ctx);

                    if !result.termination_reason().is_aborted() {
                        log::info!(
                            "portfolio solver '{}' exhausted its search space ({}), signaling stop",
                            solver.name(),
                            result.termination_reason()
                        );
                        stop_signal.store(true, Ordering::Relaxed);
                    }

                    result
                });
                handles.push(handle);
            }

            for handle in handles {
                match handle.join() {
                    Ok(result) => results.push(result),
                    Err(panic) => std::panic::resume_unwind(panic),
                }
            }
        });

        results
    }

    /// The cheapest tour among all thread results and the shared incumbent.
    fn find_best_tour(
        results: &[PortfolioSolverResult],
        incumbent: &SharedIncumbent,
    ) -> Option<Tour> {
        let snapshot = incumbent.snapshot();
        results
            .iter()
            .filter_map(|r| r.result().tour())
            .chain(snapshot.as_ref())
            .min_by(|a, b| a.cost().total_cmp(&b.cost()))
            .cloned()
    }

    fn build_statistics(
        &self,
        start_time: Instant,
        results: &[PortfolioSolverResult],
    ) -> SolverStatistics {
        SolverStatisticsBuilder::new()
            .solutions_found(self.global_solution_count.load(Ordering::Relaxed))
            .nodes_expanded(results.iter().map(PortfolioSolverResult::nodes_expanded).sum())
            .used_threads(results.len())
            .solve_duration(start_time.elapsed())
            .build()
    }

    fn construct_outcome(
        &self,
        start_time: Instant,
        incumbent: &SharedIncumbent,
        results: Vec<PortfolioSolverResult>,
    ) -> SolverOutcome {
        let stats = self.build_statistics(start_time, &results);
        let best_tour = Self::find_best_tour(&results, incumbent);

        // A thread that exhausted its space has pruned only against real
        // tours or the ceiling, so its proof covers the whole portfolio.
        let proven = results
            .iter()
            .any(|r| !r.termination_reason().is_aborted());

        match (proven, best_tour) {
            (true, Some(tour)) => SolverOutcome::new(
                SolverResult::Optimal(tour),
                TerminationReason::OptimalityProven,
                stats,
            ),
            (true, None) => SolverOutcome::new(
                SolverResult::Infeasible,
                TerminationReason::InfeasibilityProven,
                stats,
            ),
            (false, Some(tour)) => SolverOutcome::new(
                SolverResult::Feasible(tour),
                TerminationReason::Aborted(Self::determine_abort_reason(&results)),
                stats,
            ),
            (false, None) => SolverOutcome::new(
                SolverResult::Unknown,
                TerminationReason::Aborted(Self::determine_abort_reason(&results)),
                stats,
            ),
        }
    }

    fn determine_abort_reason(results: &[PortfolioSolverResult]) -> String {
        results
            .iter()
            .find_map(|res| match res.termination_reason() {
                TerminationReason::Aborted(msg) => Some(msg.clone()),
                _ => None,
            })
            .unwrap_or_else(|| "search stopped without proof".to_string())
    }
}

impl std::fmt::Debug for Solver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Solver")
            .field(
                "portfolio_solver",
                &self
                    .portfolio_solver
                    .iter()
                    .map(|s| s.name())
                    .collect::<Vec<_>>(),
            )
            .field("solution_limit", &self.solution_limit)
            .field("time_limit", &self.time_limit)
            .field("initial_bound", &self.initial_bound)
            .finish()
    }
}

pub struct SolverBuilder<'a> {
    portfolio_solver: Vec<Box<dyn PortfolioSolver + 'a>>,
    solution_limit: Option<u64>,
    time_limit: Option<Duration>,
    initial_bound: f64,
}

impl Default for SolverBuilder<'_> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> SolverBuilder<'a> {
    #[inline]
    pub fn new() -> Self {
        Self {
            portfolio_solver: Vec::new(),
            solution_limit: None,
            time_limit: None,
            initial_bound: f64::INFINITY,
        }
    }

    #[inline]
    pub fn with_solution_limit(mut self, limit: u64) -> Self {
        self.solution_limit = Some(limit);
        self
    }

    #[inline]
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Caps the race: only tours strictly cheaper than `bound` are accepted.
    ///
    /// # Panics
    ///
    /// Panics if `bound` is NaN or negative.
    #[inline]
    pub fn with_initial_bound(mut self, bound: f64) -> Self {
        assert!(
            bound >= 0.0,
            "called `SolverBuilder::with_initial_bound` with an invalid bound: {}",
            bound
        );
        self.initial_bound = bound;
        self
    }

    #[inline]
    pub fn add_solver<S>(mut self, solver: S) -> Self
    where
        S: PortfolioSolver + 'a,
    {
        self.portfolio_solver.push(Box::new(solver));
        self
    }

    #[inline]
    pub fn add_solver_boxed(mut self, solver: Box<dyn PortfolioSolver + 'a>) -> Self {
        self.portfolio_solver.push(solver);
        self
    }

    #[inline]
    pub fn build(self) -> Solver<'a> {
        Solver {
            portfolio_solver: self.portfolio_solver,
            global_solution_count: AtomicU64::new(0),
            stop_signal: AtomicBool::new(false),
            solution_limit: self.solution_limit,
            time_limit: self.time_limit,
            initial_bound: self.initial_bound,
        }
    }
}
