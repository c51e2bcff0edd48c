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

//! # Route Solver
//!
//! The validated entry point of the exact solver. A `RouteSolver` is built
//! from a cost matrix, a start label, a strategy, a time budget and an
//! optional initial bound; `solve` runs one branch-and-bound search and
//! returns the `RouteReport`.
//!
//! ## Highlights
//!
//! - Construction resolves the start label and rejects an unknown start, a
//!   non-positive (or NaN) time budget and a negative (or NaN) bound. The
//!   start never silently defaults to the first airport.
//! - A time budget of `+inf` disables the clock; otherwise the clock is
//!   polled at every expansion.
//! - The bound is a hard ceiling: if no tour is strictly cheaper, the report
//!   says there is no route.
//! - Every `solve` starts from a clean slate, so one solver can be reused.

use crate::{
    bnb::BnbSolver,
    monitor::{
        composite::CompositeTreeSearchMonitor, no_op::NoOperationMonitor,
        time::TimeLimitMonitor, tree_search_monitor::TreeSearchMonitor,
    },
    result::BnbSolverOutcome,
    strategy::SearchStrategy,
};
use skytour_model::{index::NodeIndex, matrix::CostMatrix};
use skytour_search::report::RouteReport;
use std::time::Duration;
use thiserror::Error;

/// The time budget used when none is configured.
pub const DEFAULT_TIME_BUDGET_SECS: f64 = 60.0;

/// Errors raised while configuring a `RouteSolver`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    #[error("start airport `{0}` is not part of the cost matrix")]
    UnknownStart(String),
    #[error("time budget must be a positive number of seconds, got {0}")]
    InvalidTimeBudget(f64),
    #[error("initial bound must be a non-negative cost, got {0}")]
    InvalidBound(f64),
}

/// Step-by-step configuration of a `RouteSolver`.
#[derive(Debug, Clone)]
pub struct RouteSolverBuilder<'m, 's> {
    matrix: &'m CostMatrix,
    start_label: &'s str,
    strategy: SearchStrategy,
    time_budget_secs: f64,
    initial_bound: Option<f64>,
}

impl<'m, 's> RouteSolverBuilder<'m, 's> {
    #[inline]
    pub fn new(matrix: &'m CostMatrix, start_label: &'s str) -> Self {
        Self {
            matrix,
            start_label,
            strategy: SearchStrategy::default(),
            time_budget_secs: DEFAULT_TIME_BUDGET_SECS,
            initial_bound: None,
        }
    }

    #[inline]
    pub fn strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the wall-clock budget in seconds; `f64::INFINITY` means no limit.
    #[inline]
    pub fn time_budget_secs(mut self, time_budget_secs: f64) -> Self {
        self.time_budget_secs = time_budget_secs;
        self
    }

    /// Sets the initial upper bound; `None` means `+inf`.
    #[inline]
    pub fn initial_bound(mut self, initial_bound: Option<f64>) -> Self {
        self.initial_bound = initial_bound;
        self
    }

    /// Validates the configuration and builds the solver.
    ///
    /// # Errors
    ///
    /// - `SolverError::UnknownStart` if the start label is not in the matrix.
    /// - `SolverError::InvalidTimeBudget` if the budget is NaN or not positive.
    /// - `SolverError::InvalidBound` if the bound is NaN or negative.
    pub fn build(self) -> Result<RouteSolver<'m>, SolverError> {
        let start = self
            .matrix
            .index_of(self.start_label)
            .ok_or_else(|| SolverError::UnknownStart(self.start_label.to_string()))?;

        let budget = self.time_budget_secs;
        if budget.is_nan() || budget <= 0.0 {
            return Err(SolverError::InvalidTimeBudget(budget));
        }
        // Budgets too large for a `Duration` are as good as no limit.
        let time_budget = Duration::try_from_secs_f64(budget).ok();

        let initial_bound = match self.initial_bound {
            None => f64::INFINITY,
            Some(bound) if bound.is_nan() || bound < 0.0 => {
                return Err(SolverError::InvalidBound(bound));
            }
            Some(bound) => bound,
        };

        Ok(RouteSolver {
            matrix: self.matrix,
            start,
            strategy: self.strategy,
            time_budget,
            initial_bound,
            engine: BnbSolver::preallocated(self.matrix.num_nodes()),
        })
    }
}

/// An exact solver bound to one matrix, start airport and configuration.
#[derive(Debug, Clone)]
pub struct RouteSolver<'m> {
    matrix: &'m CostMatrix,
    start: NodeIndex,
    strategy: SearchStrategy,
    time_budget: Option<Duration>,
    initial_bound: f64,
    engine: BnbSolver,
}

impl<'m> RouteSolver<'m> {
    /// Creates a validated solver.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use skytour_bnb::{route_solver::RouteSolver, strategy::SearchStrategy};
    /// # use skytour_model::matrix::CostMatrix;
    ///
    /// let inf = f64::INFINITY;
    /// let m = CostMatrix::from_rows(["A", "B"], vec![vec![inf, 5.0], vec![7.0, inf]]).unwrap();
    /// let mut solver = RouteSolver::new(&m, "A", SearchStrategy::BestFirst, 10.0, None).unwrap();
    /// let report = solver.solve();
    /// assert_eq!(report.cost(), 12.0);
    /// assert_eq!(report.route(), "A -> B -> A");
    /// ```
    ///
    /// # Errors
    ///
    /// See `RouteSolverBuilder::build`.
    pub fn new(
        matrix: &'m CostMatrix,
        start_label: &str,
        strategy: SearchStrategy,
        time_budget_secs: f64,
        initial_bound: Option<f64>,
    ) -> Result<Self, SolverError> {
        RouteSolverBuilder::new(matrix, start_label)
            .strategy(strategy)
            .time_budget_secs(time_budget_secs)
            .initial_bound(initial_bound)
            .build()
    }

    /// Starts a builder with the default strategy, budget and no bound.
    #[inline]
    pub fn builder<'s>(matrix: &'m CostMatrix, start_label: &'s str) -> RouteSolverBuilder<'m, 's> {
        RouteSolverBuilder::new(matrix, start_label)
    }

    #[inline]
    pub fn matrix(&self) -> &'m CostMatrix {
        self.matrix
    }

    #[inline]
    pub fn start(&self) -> NodeIndex {
        self.start
    }

    #[inline]
    pub fn strategy(&self) -> SearchStrategy {
        self.strategy
    }

    /// Returns the time budget, `None` if the search is not time-limited.
    #[inline]
    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget
    }

    #[inline]
    pub fn initial_bound(&self) -> f64 {
        self.initial_bound
    }

    /// Runs one search and returns its report.
    #[inline]
    pub fn solve(&mut self) -> RouteReport {
        self.solve_with_monitor(NoOperationMonitor::new())
    }

    /// Runs one search with an additional monitor and returns its report.
    pub fn solve_with_monitor<M>(&mut self, monitor: M) -> RouteReport
    where
        M: TreeSearchMonitor,
    {
        let outcome = self.run(monitor);
        RouteReport::from_result(
            self.strategy.name(),
            self.matrix,
            self.start,
            outcome.result(),
            outcome.termination_reason(),
            outcome.statistics().time_total,
            outcome.statistics().nodes_expanded,
        )
    }

    /// Runs one search and returns the raw outcome with full statistics.
    pub fn run<M>(&mut self, monitor: M) -> BnbSolverOutcome
    where
        M: TreeSearchMonitor,
    {
        let mut composite = CompositeTreeSearchMonitor::with_capacity(2);
        if let Some(time_budget) = self.time_budget {
            composite.add_monitor(TimeLimitMonitor::new(time_budget));
        }
        composite.add_monitor(monitor);

        log::debug!(
            "solving from {} with {} (time budget: {:?}, bound: {})",
            self.matrix.label(self.start),
            self.strategy,
            self.time_budget,
            self.initial_bound
        );
        let outcome = self.engine.solve_with_upper_bound(
            self.matrix,
            self.start,
            self.strategy,
            composite,
            self.initial_bound,
        );
        log::debug!("{}", outcome.statistics());
        outcome
    }
}
