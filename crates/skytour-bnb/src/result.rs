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

use crate::stats::BnbSolverStatistics;
use skytour_model::tour::Tour;
use skytour_search::{
    portfolio::PortfolioSolverResult,
    result::{SolverResult, TerminationReason},
};

/// Result of the solver after termination.
#[derive(Debug, Clone)]
pub struct BnbSolverOutcome {
    result: SolverResult,
    termination_reason: TerminationReason,
    statistics: BnbSolverStatistics,
}

impl BnbSolverOutcome {
    #[inline]
    pub fn optimal(tour: Tour, statistics: BnbSolverStatistics) -> Self {
        Self {
            result: SolverResult::Optimal(tour),
            termination_reason: TerminationReason::OptimalityProven,
            statistics,
        }
    }

    #[inline]
    pub fn infeasible(statistics: BnbSolverStatistics) -> Self {
        Self {
            result: SolverResult::Infeasible,
            termination_reason: TerminationReason::InfeasibilityProven,
            statistics,
        }
    }

    /// An aborted search. Without a tour nothing has been proven, so the
    /// result is `Unknown`.
    #[inline]
    pub fn aborted<R>(tour: Option<Tour>, reason: R, statistics: BnbSolverStatistics) -> Self
    where
        R: Into<String>,
    {
        let termination_reason = TerminationReason::Aborted(reason.into());

        let result = match tour {
            Some(tour) => SolverResult::Feasible(tour),
            None => SolverResult::Unknown,
        };

        Self {
            result,
            termination_reason,
            statistics,
        }
    }

    /// Returns the solver result.
    #[inline]
    pub fn result(&self) -> &SolverResult {
        &self.result
    }

    /// Returns the termination reason.
    #[inline]
    pub fn termination_reason(&self) -> &TerminationReason {
        &self.termination_reason
    }

    /// Returns the solver statistics.
    #[inline]
    pub fn statistics(&self) -> &BnbSolverStatistics {
        &self.statistics
    }

    /// Returns the best tour found, if any.
    #[inline]
    pub fn tour(&self) -> Option<&Tour> {
        self.result.tour()
    }
}

impl std::fmt::Display for BnbSolverOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Result:      {}", self.result)?;
        writeln!(f, "Termination: {}", self.termination_reason)?;
        write!(f, "{}", self.statistics)
    }
}

impl From<BnbSolverOutcome> for PortfolioSolverResult {
    fn from(val: BnbSolverOutcome) -> Self {
        let nodes_expanded = val.statistics.nodes_expanded;
        let result = match val.termination_reason {
            TerminationReason::OptimalityProven => {
                assert!(
                    matches!(val.result, SolverResult::Optimal(_)),
                    "called `BnbSolverOutcome::into()` with inconsistent state: termination reason is OptimalityProven but result is not Optimal"
                );
                if let SolverResult::Optimal(tour) = val.result {
                    PortfolioSolverResult::optimal(tour)
                } else {
                    PortfolioSolverResult::infeasible()
                }
            }
            TerminationReason::InfeasibilityProven => PortfolioSolverResult::infeasible(),
            TerminationReason::Aborted(reason) => match val.result {
                SolverResult::Feasible(tour) => PortfolioSolverResult::aborted(Some(tour), reason),
                _ => PortfolioSolverResult::aborted(None, reason),
            },
        };
        result.with_nodes_expanded(nodes_expanded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skytour_model::index::NodeIndex;

    fn stats(nodes_expanded: u64) -> BnbSolverStatistics {
        BnbSolverStatistics {
            nodes_expanded,
            ..Default::default()
        }
    }

    fn tour(cost: f64) -> Tour {
        Tour::new(
            cost,
            vec![NodeIndex::new(0), NodeIndex::new(1), NodeIndex::new(0)],
        )
    }

    #[test]
    fn test_into_portfolio_optimal_keeps_tour_and_nodes() {
        let outcome = BnbSolverOutcome::optimal(tour(12.0), stats(9));
        let portfolio: PortfolioSolverResult = outcome.into();

        assert_eq!(portfolio.result(), &SolverResult::Optimal(tour(12.0)));
        assert_eq!(
            portfolio.termination_reason(),
            &TerminationReason::OptimalityProven
        );
        assert_eq!(portfolio.nodes_expanded(), 9);
    }

    #[test]
    fn test_into_portfolio_infeasible_maps_correctly() {
        let outcome = BnbSolverOutcome::infeasible(stats(1));
        let portfolio: PortfolioSolverResult = outcome.into();

        assert!(matches!(portfolio.result(), SolverResult::Infeasible));
        assert!(matches!(
            portfolio.termination_reason(),
            TerminationReason::InfeasibilityProven
        ));
    }

    #[test]
    fn test_into_portfolio_aborted_no_tour_maps_to_unknown_with_reason() {
        let outcome = BnbSolverOutcome::aborted::<&str>(None, "time limit reached", stats(3));
        let portfolio: PortfolioSolverResult = outcome.into();

        assert!(matches!(portfolio.result(), SolverResult::Unknown));
        match portfolio.termination_reason() {
            TerminationReason::Aborted(msg) => assert_eq!(msg, "time limit reached"),
            _ => panic!("expected Aborted termination reason"),
        }
        assert_eq!(portfolio.nodes_expanded(), 3);
    }

    #[test]
    fn test_into_portfolio_aborted_with_tour_is_feasible() {
        let outcome = BnbSolverOutcome::aborted(Some(tour(30.0)), "interrupted", stats(5));
        assert_eq!(outcome.tour().map(Tour::cost), Some(30.0));

        let portfolio: PortfolioSolverResult = outcome.into();
        assert_eq!(portfolio.result(), &SolverResult::Feasible(tour(30.0)));
    }

    #[test]
    #[should_panic(expected = "termination reason is OptimalityProven but result is not Optimal")]
    fn test_into_portfolio_optimality_invariant_panics_on_inconsistent_state() {
        let inconsistent = BnbSolverOutcome {
            result: SolverResult::Infeasible,
            termination_reason: TerminationReason::OptimalityProven,
            statistics: stats(0),
        };
        let _portfolio: PortfolioSolverResult = inconsistent.into();
    }
}
