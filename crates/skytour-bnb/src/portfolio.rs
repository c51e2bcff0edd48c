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

//! Branch-and-bound as a portfolio engine.
//!
//! `BnbPortfolioSolver` runs one `SearchStrategy` against the shared
//! incumbent of a portfolio race. The race-wide monitor is adapted through
//! `WrapperMonitor`, so interrupt and time-limit signals reach the tree search.

use crate::{
    bnb::BnbSolver, monitor::wrapper::WrapperMonitor, strategy::SearchStrategy,
};
use skytour_search::portfolio::{PortfolioSolver, PortfolioSolverContext, PortfolioSolverResult};

#[derive(Clone, Debug)]
pub struct BnbPortfolioSolver {
    strategy: SearchStrategy,
    inner: BnbSolver,
    name: String,
}

impl BnbPortfolioSolver {
    #[inline]
    pub fn new(strategy: SearchStrategy) -> Self {
        Self::with_engine(strategy, BnbSolver::new())
    }

    #[inline]
    pub fn preallocated(strategy: SearchStrategy, num_nodes: usize) -> Self {
        Self::with_engine(strategy, BnbSolver::preallocated(num_nodes))
    }

    #[inline]
    fn with_engine(strategy: SearchStrategy, inner: BnbSolver) -> Self {
        Self {
            strategy,
            inner,
            name: format!("BnbPortfolioSolver({})", strategy),
        }
    }

    #[inline]
    pub fn strategy(&self) -> SearchStrategy {
        self.strategy
    }

    #[inline]
    pub fn inner(&self) -> &BnbSolver {
        &self.inner
    }
}

impl PortfolioSolver for BnbPortfolioSolver {
    fn invoke<'a>(&mut self, context: PortfolioSolverContext<'a>) -> PortfolioSolverResult {
        let monitor = WrapperMonitor::new(context.monitor);
        let outcome = self.inner.solve_with_incumbent(
            context.matrix,
            context.start,
            self.strategy,
            monitor,
            context.incumbent,
        );

        outcome.into()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skytour_model::{index::NodeIndex, matrix::CostMatrix};
    use skytour_search::{
        incumbent::SharedIncumbent,
        monitor::{interrupt::InterruptMonitor, time_limit::TimeLimitMonitor},
        result::{SolverResult, TerminationReason},
    };
    use std::{sync::atomic::AtomicBool, time::Duration};

    fn four_cities() -> CostMatrix {
        let inf = f64::INFINITY;
        CostMatrix::from_rows(
            ["A", "B", "C", "D"],
            vec![
                vec![inf, 10.0, 15.0, 20.0],
                vec![10.0, inf, 35.0, 25.0],
                vec![15.0, 35.0, inf, 30.0],
                vec![20.0, 25.0, 30.0, inf],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_portfolio_bnb_solver_finds_optimal_tour() {
        let m = four_cities();
        for strategy in SearchStrategy::ALL {
            let mut solver = BnbPortfolioSolver::preallocated(strategy, m.num_nodes());
            let incumbent = SharedIncumbent::new();
            let stop = AtomicBool::new(false);
            let mut monitor = TimeLimitMonitor::new(Duration::from_secs(60));
            let context = PortfolioSolverContext::new(
                &m,
                NodeIndex::new(0),
                &incumbent,
                &mut monitor,
                &stop,
            );

            let result = solver.invoke(context);
            match result.result() {
                SolverResult::Optimal(tour) => assert_eq!(tour.cost(), 80.0),
                other => panic!("expected an optimal tour, got {}", other),
            }
            assert_eq!(
                result.termination_reason(),
                &TerminationReason::OptimalityProven
            );
            assert!(result.nodes_expanded() >= 1);
            assert_eq!(incumbent.upper_bound(), 80.0);
        }
    }

    #[test]
    fn test_portfolio_bnb_solver_honours_stop_flag() {
        let m = four_cities();
        let mut solver = BnbPortfolioSolver::new(SearchStrategy::BestFirst);
        let incumbent = SharedIncumbent::new();
        let stop = AtomicBool::new(true);
        let mut monitor = InterruptMonitor::new(&stop);
        let context =
            PortfolioSolverContext::new(&m, NodeIndex::new(0), &incumbent, &mut monitor, &stop);

        let result = solver.invoke(context);
        assert_eq!(result.result(), &SolverResult::Unknown);
        assert_eq!(
            result.termination_reason(),
            &TerminationReason::Aborted("Interrupt signal received".to_string())
        );
        assert_eq!(result.nodes_expanded(), 1);
    }

    #[test]
    fn test_name_includes_strategy() {
        let solver = BnbPortfolioSolver::new(SearchStrategy::BreadthFirst);
        assert_eq!(solver.name(), "BnbPortfolioSolver(breadth-first)");
        assert_eq!(solver.strategy(), SearchStrategy::BreadthFirst);
    }
}
