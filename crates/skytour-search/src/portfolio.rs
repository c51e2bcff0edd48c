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

//! # Portfolio Solving
//!
//! The contract between the portfolio orchestrator and the engines it races.
//! Each engine receives a `PortfolioSolverContext` borrowing the instance, the
//! shared incumbent, a monitor and the global stop flag, and returns a
//! `PortfolioSolverResult`.

use crate::{
    incumbent::SharedIncumbent,
    monitor::search_monitor::SearchMonitor,
    result::{SolverResult, TerminationReason},
};
use skytour_model::{index::NodeIndex, matrix::CostMatrix, tour::Tour};
use std::sync::atomic::AtomicBool;

pub struct PortfolioSolverContext<'a> {
    pub matrix: &'a CostMatrix,
    pub start: NodeIndex,
    pub incumbent: &'a SharedIncumbent,
    pub monitor: &'a mut dyn SearchMonitor,
    pub stop: &'a AtomicBool,
}

impl<'a> PortfolioSolverContext<'a> {
    #[inline(always)]
    pub fn new(
        matrix: &'a CostMatrix,
        start: NodeIndex,
        incumbent: &'a SharedIncumbent,
        monitor: &'a mut dyn SearchMonitor,
        stop: &'a AtomicBool,
    ) -> Self {
        Self {
            matrix,
            start,
            incumbent,
            monitor,
            stop,
        }
    }
}

impl std::fmt::Debug for PortfolioSolverContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioSolverContext")
            .field("matrix", &self.matrix)
            .field("start", &self.start)
            .field("incumbent", &self.incumbent)
            .field("monitor", &self.monitor.name())
            .field("stop", &self.stop)
            .finish()
    }
}

impl std::fmt::Display for PortfolioSolverContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PortfolioSolverContext(matrix: {}, start: {}, monitor: {})",
            self.matrix,
            self.start,
            self.monitor.name(),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioSolverResult {
    result: SolverResult,
    termination_reason: TerminationReason,
    nodes_expanded: u64,
}

impl PortfolioSolverResult {
    #[inline]
    pub fn optimal(tour: Tour) -> Self {
        Self {
            result: SolverResult::Optimal(tour),
            termination_reason: TerminationReason::OptimalityProven,
            nodes_expanded: 0,
        }
    }

    #[inline]
    pub fn infeasible() -> Self {
        Self {
            result: SolverResult::Infeasible,
            termination_reason: TerminationReason::InfeasibilityProven,
            nodes_expanded: 0,
        }
    }

    /// An aborted run. Without a tour nothing has been proven, so the result
    /// is `Unknown`.
    #[inline]
    pub fn aborted<R>(tour: Option<Tour>, reason: R) -> Self
    where
        R: Into<String>,
    {
        let result = match tour {
            Some(tour) => SolverResult::Feasible(tour),
            None => SolverResult::Unknown,
        };

        Self {
            result,
            termination_reason: TerminationReason::Aborted(reason.into()),
            nodes_expanded: 0,
        }
    }

    /// Attaches the number of nodes the engine expanded.
    #[inline]
    pub fn with_nodes_expanded(mut self, nodes_expanded: u64) -> Self {
        self.nodes_expanded = nodes_expanded;
        self
    }

    #[inline]
    pub fn result(&self) -> &SolverResult {
        &self.result
    }

    #[inline]
    pub fn termination_reason(&self) -> &TerminationReason {
        &self.termination_reason
    }

    #[inline]
    pub fn nodes_expanded(&self) -> u64 {
        self.nodes_expanded
    }
}

impl std::fmt::Display for PortfolioSolverResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PortfolioSolverResult(result: {}, termination_reason: {})",
            self.result, self.termination_reason
        )
    }
}

/// An engine that can take part in a portfolio race.
pub trait PortfolioSolver: Send {
    fn invoke<'a>(&mut self, context: PortfolioSolverContext<'a>) -> PortfolioSolverResult;
    fn name(&self) -> &str;
}
