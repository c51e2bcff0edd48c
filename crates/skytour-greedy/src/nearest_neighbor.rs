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

//! # Nearest Neighbour
//!
//! Builds a tour from the start airport by always flying to the cheapest
//! unvisited airport that has an edge from the current one. Ties go to the
//! lowest index.
//!
//! ## Behavior
//!
//! - If no unvisited airport is reachable, the report carries the partial
//!   route followed by `[incomplete route]` and a cost of `+inf`.
//! - After the last airport, a missing edge back to the start yields the
//!   full route followed by `[no return to <start>]` and a cost of `+inf`.
//! - `nodes_expanded` counts the construction steps, one per row scanned.
//! - A complete tour is reported as `feasible`; a failed construction proves
//!   nothing and is reported as `unknown`.

use fixedbitset::FixedBitSet;
use skytour_model::{
    index::NodeIndex,
    matrix::CostMatrix,
    tour::{ROUTE_SEPARATOR, Tour},
};
use skytour_search::report::{RouteReport, RouteStatus};
use std::time::Instant;
use thiserror::Error;

/// The name the baseline reports under.
pub const SOLVER_NAME: &str = "nearest-neighbor";

/// Marker appended when the construction gets stuck.
pub const INCOMPLETE_MARKER: &str = "[incomplete route]";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GreedyError {
    #[error("start airport `{0}` is not part of the cost matrix")]
    UnknownStart(String),
}

/// The nearest-neighbour baseline for one matrix and start airport.
#[derive(Debug, Clone)]
pub struct NearestNeighbor<'m> {
    matrix: &'m CostMatrix,
    start: NodeIndex,
}

impl<'m> NearestNeighbor<'m> {
    /// Creates the baseline, resolving `start_label` against the matrix.
    ///
    /// # Errors
    ///
    /// Returns `GreedyError::UnknownStart` if the label is not in the matrix.
    pub fn new(matrix: &'m CostMatrix, start_label: &str) -> Result<Self, GreedyError> {
        let start = matrix
            .index_of(start_label)
            .ok_or_else(|| GreedyError::UnknownStart(start_label.to_string()))?;
        Ok(Self { matrix, start })
    }

    #[inline]
    pub fn start(&self) -> NodeIndex {
        self.start
    }

    /// Returns the cheapest unvisited successor of `from`, if any.
    #[inline]
    fn nearest_unvisited(&self, from: NodeIndex, visited: &FixedBitSet) -> Option<(NodeIndex, f64)> {
        let mut best: Option<(NodeIndex, f64)> = None;
        for (j, edge) in self.matrix.row(from).iter().enumerate() {
            if visited.contains(j) {
                continue;
            }
            let Some(cost) = edge.into_option() else {
                continue;
            };
            // Strict comparison keeps the lowest index on ties.
            if best.is_none_or(|(_, best_cost)| cost < best_cost) {
                best = Some((NodeIndex::new(j), cost));
            }
        }
        best
    }

    /// Runs the construction and returns its report.
    pub fn solve(&self) -> RouteReport {
        let started = Instant::now();
        let matrix = self.matrix;
        let num_nodes = matrix.num_nodes();

        let mut visited = FixedBitSet::with_capacity(num_nodes);
        visited.insert(self.start.get());
        let mut path = Vec::with_capacity(num_nodes + 1);
        path.push(self.start);
        let mut cost = 0.0;
        let mut current = self.start;
        let mut steps = 0u64;

        for _ in 1..num_nodes {
            steps += 1;
            let Some((next, edge_cost)) = self.nearest_unvisited(current, &visited) else {
                log::debug!(
                    "nearest neighbour stuck at {} after {} airports",
                    matrix.label(current),
                    path.len()
                );
                let route = format!(
                    "{}{}{}",
                    self.render_labels(&path),
                    ROUTE_SEPARATOR,
                    INCOMPLETE_MARKER
                );
                return RouteReport::new(
                    SOLVER_NAME,
                    RouteStatus::Unknown,
                    f64::INFINITY,
                    route,
                    started.elapsed(),
                    steps,
                );
            };
            visited.insert(next.get());
            path.push(next);
            cost += edge_cost;
            current = next;
        }

        if num_nodes > 1 {
            let Some(closing) = matrix.cost(current, self.start).into_option() else {
                let route = format!(
                    "{}{}{}",
                    self.render_labels(&path),
                    ROUTE_SEPARATOR,
                    no_return_marker(matrix.label(self.start))
                );
                return RouteReport::new(
                    SOLVER_NAME,
                    RouteStatus::Unknown,
                    f64::INFINITY,
                    route,
                    started.elapsed(),
                    steps,
                );
            };
            cost += closing;
            path.push(self.start);
        }

        let tour = Tour::new(cost, path);
        RouteReport::new(
            SOLVER_NAME,
            RouteStatus::Feasible,
            tour.cost(),
            tour.render(matrix),
            started.elapsed(),
            steps,
        )
    }

    fn render_labels(&self, path: &[NodeIndex]) -> String {
        path.iter()
            .map(|&node| self.matrix.label(node))
            .collect::<Vec<_>>()
            .join(ROUTE_SEPARATOR)
    }
}

/// Marker appended when the last airport has no edge back to `start_label`.
#[inline]
pub fn no_return_marker(start_label: &str) -> String {
    format!("[no return to {}]", start_label)
}

#[cfg(test)]
mod tests {
    use super::*;

    const INF: f64 = f64::INFINITY;

    fn four_cities() -> CostMatrix {
        CostMatrix::from_rows(
            ["A", "B", "C", "D"],
            vec![
                vec![INF, 10.0, 15.0, 20.0],
                vec![10.0, INF, 35.0, 25.0],
                vec![15.0, 35.0, INF, 30.0],
                vec![20.0, 25.0, 30.0, INF],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_builds_nearest_neighbour_tour() {
        let m = four_cities();
        let report = NearestNeighbor::new(&m, "A").unwrap().solve();
        // A -> B (10) -> D (25) -> C (30) -> A (15)
        assert_eq!(report.route(), "A -> B -> D -> C -> A");
        assert_eq!(report.cost(), 80.0);
        assert_eq!(report.status(), RouteStatus::Feasible);
        assert_eq!(report.solver(), SOLVER_NAME);
        assert_eq!(report.nodes_expanded(), 3);
    }

    #[test]
    fn test_ties_go_to_lowest_index() {
        let m = CostMatrix::from_rows(
            ["A", "B", "C"],
            vec![
                vec![INF, 5.0, 5.0],
                vec![1.0, INF, 1.0],
                vec![1.0, 1.0, INF],
            ],
        )
        .unwrap();
        let report = NearestNeighbor::new(&m, "A").unwrap().solve();
        assert_eq!(report.route(), "A -> B -> C -> A");
        assert_eq!(report.cost(), 7.0);
    }

    #[test]
    fn test_greedy_can_be_worse_than_optimum() {
        // Greedy takes A -> B (1) and then pays 100 for B -> C; the optimum
        // A -> C -> B -> A costs 3 + 1 + 1.
        let m = CostMatrix::from_rows(
            ["A", "B", "C"],
            vec![
                vec![INF, 1.0, 3.0],
                vec![1.0, INF, 100.0],
                vec![1.0, 1.0, INF],
            ],
        )
        .unwrap();
        let report = NearestNeighbor::new(&m, "A").unwrap().solve();
        assert_eq!(report.route(), "A -> B -> C -> A");
        assert_eq!(report.cost(), 102.0);
    }

    #[test]
    fn test_stuck_construction_reports_incomplete_route() {
        let m = CostMatrix::from_rows(
            ["A", "B", "C"],
            vec![
                vec![INF, 1.0, INF],
                vec![1.0, INF, INF],
                vec![1.0, 1.0, INF],
            ],
        )
        .unwrap();
        let report = NearestNeighbor::new(&m, "A").unwrap().solve();
        assert!(report.cost().is_infinite());
        assert_eq!(report.route(), "A -> B -> [incomplete route]");
        assert_eq!(report.status(), RouteStatus::Unknown);
        assert!(!report.has_route());
        assert_eq!(report.nodes_expanded(), 2);
    }

    #[test]
    fn test_missing_return_edge_is_marked() {
        let m = CostMatrix::from_rows(
            ["A", "B", "C"],
            vec![
                vec![INF, 1.0, 2.0],
                vec![INF, INF, 1.0],
                vec![INF, 1.0, INF],
            ],
        )
        .unwrap();
        let report = NearestNeighbor::new(&m, "A").unwrap().solve();
        assert!(report.cost().is_infinite());
        assert_eq!(report.route(), "A -> B -> C -> [no return to A]");
        assert_eq!(report.status(), RouteStatus::Unknown);
    }

    #[test]
    fn test_single_airport() {
        let m = CostMatrix::from_rows(["A"], vec![vec![INF]]).unwrap();
        let report = NearestNeighbor::new(&m, "A").unwrap().solve();
        assert_eq!(report.route(), "A");
        assert_eq!(report.cost(), 0.0);
        assert_eq!(report.nodes_expanded(), 0);
    }

    #[test]
    fn test_unknown_start_is_rejected() {
        let m = four_cities();
        let err = NearestNeighbor::new(&m, "X").unwrap_err();
        assert_eq!(err, GreedyError::UnknownStart("X".to_string()));
    }

    #[test]
    fn test_start_other_than_first_airport() {
        let m = four_cities();
        let greedy = NearestNeighbor::new(&m, "C").unwrap();
        assert_eq!(greedy.start(), NodeIndex::new(2));
        let report = greedy.solve();
        // C -> A (15) -> B (10) -> D (25) -> C (30)
        assert_eq!(report.route(), "C -> A -> B -> D -> C");
        assert_eq!(report.cost(), 80.0);
    }
}
