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

//! Branch-and-Bound solver for the airport tour problem.
//!
//! This module implements a stateful search engine that enumerates closed
//! tours from a start airport while pruning every partial route whose
//! accumulated cost already meets or exceeds the best known tour. The
//! `BnbSolver` owns one frontier per strategy plus a child buffer and reuses
//! their capacity across solves; a fast `reset` clears per-run state.
//!
//! A search session object encapsulates per-run state, statistics and timing.
//! Each expansion pops one route, counts it, checks it against the bound,
//! polls the monitor for a stop request and then either closes the tour or
//! pushes its children in increasing airport order. Exhausting the frontier
//! proves the best tour optimal, or proves that none exists below the bound.

use crate::{
    frontier::{
        Frontier, best_first::BestFirstFrontier, breadth_first::BreadthFirstFrontier,
        depth_first::DepthFirstFrontier,
    },
    incumbent::{IncumbentStore, NoSharedIncumbent, SharedIncumbentAdapter},
    monitor::tree_search_monitor::{PruneReason, TreeSearchMonitor},
    result::BnbSolverOutcome,
    route::PartialRoute,
    stats::BnbSolverStatistics,
    strategy::SearchStrategy,
};
use skytour_model::{index::NodeIndex, matrix::CostMatrix, tour::Tour};
use skytour_search::{
    incumbent::SharedIncumbent, monitor::search_monitor::SearchCommand,
    result::TerminationReason,
};

/// An exact branch-and-bound solver for closed airport tours.
///
/// This is the execution engine only; the order in which open routes are
/// expanded is chosen per solve with a `SearchStrategy`.
#[derive(Clone, Debug, Default)]
pub struct BnbSolver {
    depth_first: DepthFirstFrontier,
    breadth_first: BreadthFirstFrontier,
    best_first: BestFirstFrontier,
    children: Vec<PartialRoute>,
}

impl BnbSolver {
    /// Create a new solver instance.
    #[inline]
    pub fn new() -> Self {
        Self {
            depth_first: DepthFirstFrontier::new(),
            breadth_first: BreadthFirstFrontier::new(),
            best_first: BestFirstFrontier::new(),
            children: Vec::new(),
        }
    }

    /// Create a new solver instance with room for the children of one
    /// expansion over `num_nodes` airports.
    #[inline]
    pub fn preallocated(num_nodes: usize) -> Self {
        Self {
            depth_first: DepthFirstFrontier::with_capacity(num_nodes * num_nodes),
            breadth_first: BreadthFirstFrontier::with_capacity(num_nodes),
            best_first: BestFirstFrontier::with_capacity(num_nodes),
            children: Vec::with_capacity(num_nodes),
        }
    }

    /// Solve the tour from `start` over `matrix` with the given strategy.
    /// This variant has no bound and does not share its incumbent.
    #[inline]
    pub fn solve<S>(
        &mut self,
        matrix: &CostMatrix,
        start: NodeIndex,
        strategy: SearchStrategy,
        monitor: S,
    ) -> BnbSolverOutcome
    where
        S: TreeSearchMonitor,
    {
        let backing = NoSharedIncumbent::new();
        self.solve_internal(matrix, start, strategy, monitor, backing)
    }

    /// Solve with an initial upper bound. Only tours strictly cheaper than
    /// `upper_bound` are accepted, so a bound below the optimum yields an
    /// infeasible outcome.
    ///
    /// # Panics
    ///
    /// In debug builds, this function will panic if `upper_bound` is NaN.
    #[inline]
    pub fn solve_with_upper_bound<S>(
        &mut self,
        matrix: &CostMatrix,
        start: NodeIndex,
        strategy: SearchStrategy,
        monitor: S,
        upper_bound: f64,
    ) -> BnbSolverOutcome
    where
        S: TreeSearchMonitor,
    {
        let backing = NoSharedIncumbent::with_upper_bound(upper_bound);
        self.solve_internal(matrix, start, strategy, monitor, backing)
    }

    /// Solve while synchronizing the bound with other solver instances
    /// through `incumbent`. Branches that cannot beat the shared best tour
    /// are pruned, and every improving tour is offered to it.
    #[inline]
    pub fn solve_with_incumbent<S>(
        &mut self,
        matrix: &CostMatrix,
        start: NodeIndex,
        strategy: SearchStrategy,
        monitor: S,
        incumbent: &SharedIncumbent,
    ) -> BnbSolverOutcome
    where
        S: TreeSearchMonitor,
    {
        let backing = SharedIncumbentAdapter::new(incumbent);
        self.solve_internal(matrix, start, strategy, monitor, backing)
    }

    /// Internal solve method that takes an `IncumbentStore`,
    /// which is usually either a `NoSharedIncumbent` or a `SharedIncumbentAdapter`.
    ///
    /// # Panics
    ///
    /// Panics if `start` is not a node of `matrix`.
    #[inline(always)]
    fn solve_internal<S, I>(
        &mut self,
        matrix: &CostMatrix,
        start: NodeIndex,
        strategy: SearchStrategy,
        mut monitor: S,
        backing: I,
    ) -> BnbSolverOutcome
    where
        S: TreeSearchMonitor,
        I: IncumbentStore,
    {
        assert!(
            start.get() < matrix.num_nodes(),
            "called `BnbSolver::solve` with start node out of bounds: the len is {} but the index is {}",
            matrix.num_nodes(),
            start.get()
        );

        let children = &mut self.children;
        let res = match strategy {
            SearchStrategy::DepthFirst => BnbSolverSearchSession::new(
                matrix,
                start,
                &mut self.depth_first,
                children,
                &mut monitor,
                backing,
            )
            .run(),
            SearchStrategy::BreadthFirst => BnbSolverSearchSession::new(
                matrix,
                start,
                &mut self.breadth_first,
                children,
                &mut monitor,
                backing,
            )
            .run(),
            SearchStrategy::BestFirst => BnbSolverSearchSession::new(
                matrix,
                start,
                &mut self.best_first,
                children,
                &mut monitor,
                backing,
            )
            .run(),
        };
        self.reset();
        res
    }

    /// Clear the frontiers and the child buffer.
    ///
    /// # Note
    ///
    /// This does not deallocate any memory, but only resets the logical state.
    #[inline]
    fn reset(&mut self) {
        self.depth_first.clear();
        self.breadth_first.clear();
        self.best_first.clear();
        self.children.clear();
    }
}

/// A search session for the solver.
/// This struct encapsulates the state and logic
/// of a single search run.
struct BnbSolverSearchSession<'a, F, S, I>
where
    F: Frontier,
    S: TreeSearchMonitor,
    I: IncumbentStore,
{
    matrix: &'a CostMatrix,
    start: NodeIndex,
    frontier: &'a mut F,
    children: &'a mut Vec<PartialRoute>,
    monitor: &'a mut S,
    incumbent: I,
    best_cost: f64,
    best_tour: Option<Tour>,
    stats: BnbSolverStatistics,
    start_time: std::time::Instant,
}

impl<F, S, I> std::fmt::Display for BnbSolverSearchSession<'_, F, S, I>
where
    F: Frontier,
    S: TreeSearchMonitor,
    I: IncumbentStore,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tour_str = match &self.best_tour {
            Some(tour) => format!("Tour(cost: {})", tour.cost()),
            None => "No tour found".to_string(),
        };
        write!(
            f,
            "SearchSession(frontier: {}, best_cost: {}, best_tour: {}, stats: {})",
            self.frontier.name(),
            self.best_cost,
            tour_str,
            self.stats
        )
    }
}

impl<'a, F, S, I> BnbSolverSearchSession<'a, F, S, I>
where
    F: Frontier,
    S: TreeSearchMonitor,
    I: IncumbentStore,
{
    /// Create a new search session.
    #[inline]
    fn new(
        matrix: &'a CostMatrix,
        start: NodeIndex,
        frontier: &'a mut F,
        children: &'a mut Vec<PartialRoute>,
        monitor: &'a mut S,
        incumbent: I,
    ) -> Self {
        let best_cost = incumbent.initial_upper_bound();

        Self {
            matrix,
            start,
            frontier,
            children,
            monitor,
            incumbent,
            best_cost,
            best_tour: None,
            stats: BnbSolverStatistics::default(),
            start_time: std::time::Instant::now(),
        }
    }

    /// Run the search session.
    #[inline]
    fn run(mut self) -> BnbSolverOutcome {
        self.monitor.on_enter_search(self.matrix, &self.stats);

        self.frontier
            .push(PartialRoute::root(self.start, self.matrix.num_nodes()));
        self.stats.on_frontier_size(1);

        let termination_reason = loop {
            let Some(route) = self.frontier.pop() else {
                break if self.best_tour.is_some() {
                    TerminationReason::OptimalityProven
                } else {
                    TerminationReason::InfeasibilityProven
                };
            };

            self.stats.on_node_expanded();
            self.stats.on_depth_update(route.depth() as u64);
            self.monitor.on_expand(&route, &self.stats);

            self.best_cost = self.incumbent.tighten(self.best_cost);
            if route.cost() >= self.best_cost {
                self.stats.on_pruning_bound();
                self.monitor
                    .on_prune(&route, PruneReason::BoundDominated, &self.stats);
                continue;
            }

            if let SearchCommand::Terminate(msg) = self.monitor.search_command(&route, &self.stats)
            {
                break TerminationReason::Aborted(msg);
            }

            if route.is_complete() {
                self.close_route(route);
            } else {
                self.expand_route(&route);
            }
        };

        self.stats.set_total_time(self.start_time.elapsed());
        self.monitor.on_exit_search(&self.stats);
        self.finalize_result(termination_reason)
    }

    /// Finalize the solver result based on the best tour found
    /// and the termination reason.
    #[inline]
    fn finalize_result(self, reason: TerminationReason) -> BnbSolverOutcome {
        match (reason, self.best_tour) {
            (TerminationReason::OptimalityProven, Some(tour)) => {
                BnbSolverOutcome::optimal(tour, self.stats)
            }
            (TerminationReason::Aborted(msg), tour) => {
                BnbSolverOutcome::aborted(tour, msg, self.stats)
            }
            (_, _) => BnbSolverOutcome::infeasible(self.stats),
        }
    }

    /// Close a route that visits every airport.
    ///
    /// The edge back to the start must exist; the tour replaces the
    /// incumbent only if it is strictly cheaper.
    #[inline(always)]
    fn close_route(&mut self, route: PartialRoute) {
        // A single airport is its own tour; its diagonal is never looked up.
        let closing = if route.num_visited() == 1 {
            0.0
        } else {
            match self
                .matrix
                .cost(route.current(), self.start)
                .into_option()
            {
                Some(cost) => cost,
                None => {
                    self.stats.on_pruning_no_return();
                    self.monitor
                        .on_prune(&route, PruneReason::NoReturnEdge, &self.stats);
                    return;
                }
            }
        };

        let total = route.cost() + closing;
        if total < self.best_cost {
            let tour = route.into_tour(closing);
            self.best_cost = total;
            self.incumbent.on_solution_found(&tour);
            self.stats.on_solution_found();
            self.monitor.on_solution_found(&tour, &self.stats);
            log::debug!(
                "new incumbent {} after {} nodes",
                tour.render(self.matrix),
                self.stats.nodes_expanded
            );
            self.best_tour = Some(tour);
        } else {
            self.stats.on_pruning_bound();
            self.monitor
                .on_prune(&route, PruneReason::BoundDominated, &self.stats);
        }
    }

    /// Push one child per reachable unvisited airport, in increasing index order.
    #[inline(always)]
    fn expand_route(&mut self, route: &PartialRoute) {
        debug_assert!(
            self.children.is_empty(),
            "called `BnbSolverSearchSession::expand_route` with a non-empty child buffer"
        );

        let current = route.current();
        for (next, edge) in self.matrix.row(current).iter().enumerate() {
            let next = NodeIndex::new(next);
            if route.is_visited(next) {
                continue;
            }
            if let Some(cost) = edge.into_option() {
                self.children.push(route.extend(next, cost));
            }
        }

        let count = self.children.len();
        if count == 0 {
            self.stats.on_pruning_dead_end();
            self.monitor
                .on_prune(route, PruneReason::DeadEnd, &self.stats);
            return;
        }

        self.frontier.push_children(self.children);
        self.stats.on_children_generated(count as u64);
        self.stats.on_frontier_size(self.frontier.len() as u64);
        self.monitor
            .on_children_enqueued(route, count, &self.stats);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::{
        no_op::NoOperationMonitor, solution::SolutionLimitMonitor, time::TimeLimitMonitor,
    };
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use skytour_model::{cost::EdgeCost, matrix::CostMatrixBuilder};
    use skytour_search::result::SolverResult;
    use std::time::Duration;

    fn n(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    /// A -> B -> D -> C -> A: 10 + 25 + 30 + 15 = 80
    /// A -> C -> D -> B -> A: 15 + 30 + 25 + 10 = 80
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

    fn random_matrix(rng: &mut ChaCha8Rng, num_nodes: usize, missing: f64) -> CostMatrix {
        let labels: Vec<String> = (0..num_nodes).map(|i| format!("N{}", i)).collect();
        let mut builder = CostMatrixBuilder::new(labels);
        for from in 0..num_nodes {
            for to in 0..num_nodes {
                if from == to || rng.random_bool(missing) {
                    continue;
                }
                let cost = rng.random_range(1..100) as f64;
                builder.set_cost(n(from), n(to), EdgeCost::some(cost));
            }
        }
        builder.build().unwrap()
    }

    fn permute(items: &mut Vec<usize>, k: usize, visit: &mut dyn FnMut(&[usize])) {
        if k == items.len() {
            visit(items);
            return;
        }
        for i in k..items.len() {
            items.swap(k, i);
            permute(items, k + 1, visit);
            items.swap(k, i);
        }
    }

    /// Minimum closed tour cost by enumerating every permutation.
    fn brute_force(matrix: &CostMatrix, start: usize) -> Option<f64> {
        if matrix.num_nodes() == 1 {
            return Some(0.0);
        }
        let mut rest: Vec<usize> = (0..matrix.num_nodes()).filter(|&i| i != start).collect();
        let mut best: Option<f64> = None;
        permute(&mut rest, 0, &mut |perm: &[usize]| {
            let mut nodes = vec![n(start)];
            nodes.extend(perm.iter().map(|&i| n(i)));
            nodes.push(n(start));
            if let Some(cost) = matrix.path_cost(&nodes).into_option() {
                best = Some(best.map_or(cost, |b: f64| b.min(cost)));
            }
        });
        best
    }

    fn optimal_tour(outcome: &BnbSolverOutcome) -> &Tour {
        match outcome.result() {
            SolverResult::Optimal(tour) => tour,
            other => panic!("expected an optimal tour, got {}", other),
        }
    }

    #[test]
    fn test_four_cities_from_a_all_strategies() {
        let m = four_cities();
        let mut solver = BnbSolver::new();

        for strategy in SearchStrategy::ALL {
            let outcome = solver.solve(&m, n(0), strategy, NoOperationMonitor::new());
            let tour = optimal_tour(&outcome);
            assert_eq!(tour.cost(), 80.0, "strategy {}", strategy);
            assert_eq!(tour.render(&m), "A -> B -> D -> C -> A", "strategy {}", strategy);
            assert!(outcome.statistics().nodes_expanded >= 1);
            assert_eq!(
                outcome.termination_reason(),
                &TerminationReason::OptimalityProven
            );
        }
    }

    #[test]
    fn test_four_cities_from_c() {
        let m = four_cities();
        let mut solver = BnbSolver::new();

        for strategy in SearchStrategy::ALL {
            let outcome = solver.solve(&m, n(2), strategy, NoOperationMonitor::new());
            let tour = optimal_tour(&outcome);
            assert_eq!(tour.cost(), 80.0);
            assert_eq!(tour.start(), n(2));
            assert_eq!(tour.nodes().last(), Some(&n(2)));
            assert_eq!(tour.nodes().len(), 5);
        }
    }

    #[test]
    fn test_strategies_agree_with_brute_force() {
        let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
        let mut solver = BnbSolver::preallocated(7);

        for round in 0..60 {
            let num_nodes = 2 + round % 6;
            let missing = if round % 3 == 0 { 0.0 } else { 0.3 };
            let m = random_matrix(&mut rng, num_nodes, missing);
            let start = rng.random_range(0..num_nodes);
            let expected = brute_force(&m, start);

            for strategy in SearchStrategy::ALL {
                let outcome = solver.solve(&m, n(start), strategy, NoOperationMonitor::new());
                let found = outcome.tour().map(Tour::cost);
                assert_eq!(
                    found, expected,
                    "round {} ({} nodes, start {}) with {}",
                    round, num_nodes, start, strategy
                );
                if expected.is_none() {
                    assert!(matches!(outcome.result(), SolverResult::Infeasible));
                }
            }
        }
    }

    #[test]
    fn test_returned_tour_is_a_hamiltonian_cycle() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let m = random_matrix(&mut rng, 7, 0.0);
        let mut solver = BnbSolver::new();

        for strategy in SearchStrategy::ALL {
            let outcome = solver.solve(&m, n(3), strategy, NoOperationMonitor::new());
            let tour = optimal_tour(&outcome);
            let nodes = tour.nodes();
            assert_eq!(nodes.len(), 8);
            assert_eq!(nodes[0], n(3));
            assert_eq!(nodes[7], n(3));

            let mut inner: Vec<usize> = nodes[..7].iter().map(|v| v.get()).collect();
            inner.sort_unstable();
            assert_eq!(inner, (0..7).collect::<Vec<_>>());
            assert_eq!(m.path_cost(nodes).raw(), tour.cost());
        }
    }

    #[test]
    fn test_bound_acts_as_hard_ceiling() {
        let m = four_cities();
        let mut solver = BnbSolver::new();

        for strategy in SearchStrategy::ALL {
            let tight = solver.solve_with_upper_bound(
                &m,
                n(0),
                strategy,
                NoOperationMonitor::new(),
                75.0,
            );
            assert!(matches!(tight.result(), SolverResult::Infeasible));
            assert_eq!(
                tight.termination_reason(),
                &TerminationReason::InfeasibilityProven
            );

            let equal = solver.solve_with_upper_bound(
                &m,
                n(0),
                strategy,
                NoOperationMonitor::new(),
                80.0,
            );
            assert!(matches!(equal.result(), SolverResult::Infeasible));

            let loose = solver.solve_with_upper_bound(
                &m,
                n(0),
                strategy,
                NoOperationMonitor::new(),
                81.0,
            );
            assert_eq!(optimal_tour(&loose).cost(), 80.0);
        }
    }

    #[test]
    fn test_bound_reduces_expansions() {
        let m = four_cities();
        let mut solver = BnbSolver::new();

        let free = solver.solve(&m, n(0), SearchStrategy::BreadthFirst, NoOperationMonitor::new());
        let bounded = solver.solve_with_upper_bound(
            &m,
            n(0),
            SearchStrategy::BreadthFirst,
            NoOperationMonitor::new(),
            10.0,
        );
        assert!(bounded.statistics().nodes_expanded < free.statistics().nodes_expanded);
    }

    #[test]
    fn test_start_without_outgoing_edges_is_infeasible() {
        let inf = f64::INFINITY;
        let m = CostMatrix::from_rows(
            ["A", "B", "C"],
            vec![
                vec![inf, inf, inf],
                vec![1.0, inf, 1.0],
                vec![1.0, 1.0, inf],
            ],
        )
        .unwrap();
        let mut solver = BnbSolver::new();

        for strategy in SearchStrategy::ALL {
            let outcome = solver.solve(&m, n(0), strategy, NoOperationMonitor::new());
            assert!(matches!(outcome.result(), SolverResult::Infeasible));
            assert_eq!(outcome.statistics().nodes_expanded, 1);
            assert_eq!(outcome.statistics().prunings_dead_end, 1);
        }
    }

    #[test]
    fn test_full_permutation_without_return_edge_is_discarded() {
        let inf = f64::INFINITY;
        let m = CostMatrix::from_rows(["A", "B"], vec![vec![inf, 4.0], vec![inf, inf]]).unwrap();
        let mut solver = BnbSolver::new();

        for strategy in SearchStrategy::ALL {
            let outcome = solver.solve(&m, n(0), strategy, NoOperationMonitor::new());
            assert!(matches!(outcome.result(), SolverResult::Infeasible));
            assert_eq!(outcome.statistics().prunings_no_return, 1);
            assert_eq!(outcome.statistics().nodes_expanded, 2);
        }
    }

    #[test]
    fn test_single_airport_tour_costs_nothing() {
        let m = CostMatrix::from_rows(["A"], vec![vec![f64::INFINITY]]).unwrap();
        let mut solver = BnbSolver::new();

        for strategy in SearchStrategy::ALL {
            let outcome = solver.solve(&m, n(0), strategy, NoOperationMonitor::new());
            let tour = optimal_tour(&outcome);
            assert_eq!(tour.cost(), 0.0);
            assert_eq!(tour.nodes(), &[n(0)]);
            assert_eq!(tour.render(&m), "A");
            assert_eq!(outcome.statistics().nodes_expanded, 1);
        }
    }

    #[test]
    fn test_zero_time_budget_aborts_after_first_expansion() {
        let m = four_cities();
        let mut solver = BnbSolver::new();

        for strategy in SearchStrategy::ALL {
            let outcome = solver.solve(
                &m,
                n(0),
                strategy,
                TimeLimitMonitor::new(Duration::ZERO),
            );
            assert!(matches!(outcome.result(), SolverResult::Unknown));
            assert_eq!(
                outcome.termination_reason(),
                &TerminationReason::Aborted("time limit reached".to_string())
            );
            assert_eq!(outcome.statistics().nodes_expanded, 1);
        }
    }

    #[test]
    fn test_abort_after_first_tour_keeps_it_as_feasible() {
        let m = four_cities();
        let mut solver = BnbSolver::new();

        let outcome = solver.solve(
            &m,
            n(0),
            SearchStrategy::DepthFirst,
            SolutionLimitMonitor::new(1),
        );
        match outcome.result() {
            SolverResult::Feasible(tour) => {
                assert_eq!(tour.render(&m), "A -> B -> C -> D -> A");
                assert_eq!(tour.cost(), 95.0);
            }
            other => panic!("expected a feasible tour, got {}", other),
        }
        assert!(outcome.termination_reason().is_aborted());
    }

    #[test]
    fn test_depth_first_finds_tours_in_index_order() {
        let m = four_cities();
        let mut solver = BnbSolver::new();
        let outcome = solver.solve(&m, n(0), SearchStrategy::DepthFirst, NoOperationMonitor::new());

        // A-B-C-D-A (95), then A-B-D-C-A (80); nothing later beats 80.
        assert_eq!(outcome.statistics().solutions_found, 2);
    }

    #[test]
    fn test_shared_incumbent_receives_the_optimum() {
        let m = four_cities();
        let shared = SharedIncumbent::with_upper_bound(100.0);
        let mut solver = BnbSolver::new();

        let outcome = solver.solve_with_incumbent(
            &m,
            n(0),
            SearchStrategy::BestFirst,
            NoOperationMonitor::new(),
            &shared,
        );
        assert_eq!(optimal_tour(&outcome).cost(), 80.0);
        assert_eq!(shared.upper_bound(), 80.0);
        assert_eq!(shared.snapshot().map(|t| t.cost()), Some(80.0));
    }

    #[test]
    fn test_shared_bound_prunes_everything_when_already_optimal() {
        let m = four_cities();
        let shared = SharedIncumbent::new();
        let known = Tour::new(80.0, vec![n(0), n(2), n(3), n(1), n(0)]);
        assert!(shared.try_install(&known));

        let mut solver = BnbSolver::new();
        let outcome = solver.solve_with_incumbent(
            &m,
            n(0),
            SearchStrategy::DepthFirst,
            NoOperationMonitor::new(),
            &shared,
        );
        assert!(outcome.tour().is_none());
        assert_eq!(outcome.statistics().solutions_found, 0);
        assert_eq!(shared.snapshot(), Some(known));
    }

    #[test]
    fn test_solver_is_reusable_and_clean_after_solve() {
        let m = four_cities();
        let mut solver = BnbSolver::preallocated(m.num_nodes());

        let first = solver.solve(&m, n(0), SearchStrategy::BreadthFirst, NoOperationMonitor::new());
        let second = solver.solve(&m, n(0), SearchStrategy::BreadthFirst, NoOperationMonitor::new());
        assert_eq!(first.tour(), second.tour());
        assert_eq!(
            first.statistics().nodes_expanded,
            second.statistics().nodes_expanded
        );

        let aborted = solver.solve(
            &m,
            n(0),
            SearchStrategy::BreadthFirst,
            TimeLimitMonitor::new(Duration::ZERO),
        );
        assert!(aborted.termination_reason().is_aborted());
        assert!(solver.depth_first.is_empty());
        assert!(solver.breadth_first.is_empty());
        assert!(solver.best_first.is_empty());
        assert!(solver.children.is_empty());
    }

    #[test]
    #[should_panic(expected = "called `BnbSolver::solve` with start node out of bounds")]
    fn test_out_of_bounds_start_panics() {
        let m = four_cities();
        let mut solver = BnbSolver::new();
        let _ = solver.solve(&m, n(4), SearchStrategy::DepthFirst, NoOperationMonitor::new());
    }
}
