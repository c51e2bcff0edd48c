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

//! # Route Report
//!
//! The record every solve ends with: the best cost, the rendered route (or a
//! human-readable explanation of why there is none), the elapsed wall-clock
//! time and the number of nodes the engine expanded. Engines build it once at
//! termination; front ends print it or serialise it with `serde`.
//!
//! ## Highlights
//!
//! - `RouteReport::from_result` turns any `SolverResult` into a report, so the
//!   exact engine and the portfolio share one rendering path.
//! - An infinite cost means "no route" and serialises as `null`.
//! - A route cut short by a stop request says so, distinct from a proven
//!   absence of any cycle.

use crate::result::{SolverResult, TerminationReason};
use serde::{Serialize, Serializer};
use skytour_model::{index::NodeIndex, matrix::CostMatrix};
use std::time::Duration;

/// The message used when no closed route exists from `start_label`.
#[inline]
pub fn no_route_message(start_label: &str) -> String {
    format!("No complete route found starting from {}", start_label)
}

/// Coarse classification of a report.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteStatus {
    /// The route is proven to be of minimum cost.
    Optimal,
    /// A route was found, but its optimality is not proven.
    Feasible,
    /// No closed route exists below the bound.
    Infeasible,
    /// The search stopped before it found a route or proved there is none.
    Unknown,
}

impl RouteStatus {
    /// Returns `true` if a report with this status carries a route.
    #[inline]
    pub fn has_route(&self) -> bool {
        matches!(self, RouteStatus::Optimal | RouteStatus::Feasible)
    }
}

impl From<&SolverResult> for RouteStatus {
    fn from(result: &SolverResult) -> Self {
        match result {
            SolverResult::Optimal(_) => RouteStatus::Optimal,
            SolverResult::Feasible(_) => RouteStatus::Feasible,
            SolverResult::Infeasible => RouteStatus::Infeasible,
            SolverResult::Unknown => RouteStatus::Unknown,
        }
    }
}

impl std::fmt::Display for RouteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteStatus::Optimal => write!(f, "optimal"),
            RouteStatus::Feasible => write!(f, "feasible"),
            RouteStatus::Infeasible => write!(f, "infeasible"),
            RouteStatus::Unknown => write!(f, "unknown"),
        }
    }
}

fn serialize_cost<S>(cost: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if cost.is_finite() {
        serializer.serialize_f64(*cost)
    } else {
        serializer.serialize_none()
    }
}

/// The outcome of one solve, ready to print or serialise.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RouteReport {
    solver: String,
    status: RouteStatus,
    #[serde(serialize_with = "serialize_cost")]
    cost: f64,
    route: String,
    elapsed_seconds: f64,
    nodes_expanded: u64,
}

impl RouteReport {
    /// Constructs a report from its parts.
    #[inline]
    pub fn new<N, R>(
        solver: N,
        status: RouteStatus,
        cost: f64,
        route: R,
        elapsed: Duration,
        nodes_expanded: u64,
    ) -> Self
    where
        N: Into<String>,
        R: Into<String>,
    {
        Self {
            solver: solver.into(),
            status,
            cost,
            route: route.into(),
            elapsed_seconds: elapsed.as_secs_f64(),
            nodes_expanded,
        }
    }

    /// Builds the report for a finished search.
    ///
    /// A result with a tour renders it through the matrix labels. Without a
    /// tour the cost is `+inf` and the route field explains why.
    pub fn from_result<N>(
        solver: N,
        matrix: &CostMatrix,
        start: NodeIndex,
        result: &SolverResult,
        reason: &TerminationReason,
        elapsed: Duration,
        nodes_expanded: u64,
    ) -> Self
    where
        N: Into<String>,
    {
        let status = RouteStatus::from(result);
        match result.tour() {
            Some(tour) => Self::new(
                solver,
                status,
                tour.cost(),
                tour.render(matrix),
                elapsed,
                nodes_expanded,
            ),
            None => {
                let message = no_route_message(matrix.label(start));
                let route = match reason {
                    TerminationReason::Aborted(why) => {
                        format!("{} before the search stopped ({})", message, why)
                    }
                    _ => message,
                };
                Self::new(
                    solver,
                    status,
                    f64::INFINITY,
                    route,
                    elapsed,
                    nodes_expanded,
                )
            }
        }
    }

    /// Returns the name of the engine that produced the report.
    #[inline]
    pub fn solver(&self) -> &str {
        &self.solver
    }

    #[inline]
    pub fn status(&self) -> RouteStatus {
        self.status
    }

    /// Returns the route cost, `+inf` if there is no route.
    #[inline]
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Returns the rendered route or the explanation why there is none.
    #[inline]
    pub fn route(&self) -> &str {
        &self.route
    }

    #[inline]
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_seconds
    }

    #[inline]
    pub fn nodes_expanded(&self) -> u64 {
        self.nodes_expanded
    }

    /// Returns `true` if the report carries a closed route.
    #[inline]
    pub fn has_route(&self) -> bool {
        self.cost.is_finite()
    }
}

impl std::fmt::Display for RouteReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} ({}):", self.solver, self.status)?;
        if self.cost.is_finite() {
            writeln!(f, "  Cost:                {}", self.cost)?;
        } else {
            writeln!(f, "  Cost:                inf")?;
        }
        writeln!(f, "  Route:               {}", self.route)?;
        writeln!(f, "  Elapsed:             {:.6}s", self.elapsed_seconds)?;
        writeln!(f, "  Nodes expanded:      {}", self.nodes_expanded)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skytour_model::tour::Tour;

    fn matrix() -> CostMatrix {
        let inf = f64::INFINITY;
        CostMatrix::from_rows(
            ["A", "B", "C"],
            vec![
                vec![inf, 1.0, 2.0],
                vec![1.0, inf, 3.0],
                vec![2.0, 3.0, inf],
            ],
        )
        .unwrap()
    }

    fn n(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    #[test]
    fn test_from_optimal_result_renders_route() {
        let m = matrix();
        let tour = Tour::new(6.0, vec![n(0), n(1), n(2), n(0)]);
        let report = RouteReport::from_result(
            "depth-first",
            &m,
            n(0),
            &SolverResult::Optimal(tour),
            &TerminationReason::OptimalityProven,
            Duration::from_millis(5),
            7,
        );

        assert_eq!(report.solver(), "depth-first");
        assert_eq!(report.status(), RouteStatus::Optimal);
        assert_eq!(report.cost(), 6.0);
        assert_eq!(report.route(), "A -> B -> C -> A");
        assert_eq!(report.nodes_expanded(), 7);
        assert!((report.elapsed_seconds() - 0.005).abs() < 1e-9);
        assert!(report.has_route());
    }

    #[test]
    fn test_infeasible_result_reports_message() {
        let m = matrix();
        let report = RouteReport::from_result(
            "best-first",
            &m,
            n(2),
            &SolverResult::Infeasible,
            &TerminationReason::InfeasibilityProven,
            Duration::ZERO,
            1,
        );

        assert!(report.cost().is_infinite());
        assert_eq!(report.route(), "No complete route found starting from C");
        assert_eq!(report.status(), RouteStatus::Infeasible);
        assert!(!report.has_route());
    }

    #[test]
    fn test_aborted_without_tour_mentions_stop_reason() {
        let m = matrix();
        let report = RouteReport::from_result(
            "breadth-first",
            &m,
            n(0),
            &SolverResult::Unknown,
            &TerminationReason::Aborted("time limit reached".to_string()),
            Duration::ZERO,
            3,
        );

        assert_eq!(
            report.route(),
            "No complete route found starting from A before the search stopped (time limit reached)"
        );
        assert_eq!(report.status(), RouteStatus::Unknown);
    }

    #[test]
    fn test_json_writes_infinite_cost_as_null() {
        let report = RouteReport::new(
            "nearest-neighbor",
            RouteStatus::Unknown,
            f64::INFINITY,
            "A -> [incomplete route]",
            Duration::ZERO,
            1,
        );
        let json: serde_json::Value = serde_json::to_value(&report).unwrap();

        assert!(json["cost"].is_null());
        assert_eq!(json["status"], "unknown");
        assert_eq!(json["nodes_expanded"], 1);
    }

    #[test]
    fn test_json_writes_finite_cost_as_number() {
        let report = RouteReport::new(
            "depth-first",
            RouteStatus::Optimal,
            80.0,
            "A -> B -> D -> C -> A",
            Duration::ZERO,
            12,
        );
        let json: serde_json::Value = serde_json::to_value(&report).unwrap();

        assert_eq!(json["cost"], 80.0);
        assert_eq!(json["route"], "A -> B -> D -> C -> A");
        assert_eq!(json["solver"], "depth-first");
    }

    #[test]
    fn test_display_prints_inf_for_missing_route() {
        let report = RouteReport::new(
            "depth-first",
            RouteStatus::Infeasible,
            f64::INFINITY,
            no_route_message("A"),
            Duration::ZERO,
            1,
        );
        let text = report.to_string();

        assert!(text.starts_with("depth-first (infeasible):"));
        assert!(text.contains("Cost:                inf"));
        assert!(text.contains("Nodes expanded:      1"));
    }
}
