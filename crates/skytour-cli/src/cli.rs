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

//! Command-line arguments and the run loop of the `skytour` binary.
//!
//! Loads a cost matrix, runs the exact solver (one strategy, or the
//! portfolio race of all three) and the nearest-neighbour baseline, and
//! prints both reports as text or JSON.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use serde::Serialize;
use skytour_bnb::{
    monitor::log::LogTreeSearchMonitor,
    portfolio::BnbPortfolioSolver,
    route_solver::{DEFAULT_TIME_BUDGET_SECS, RouteSolver},
    strategy::SearchStrategy,
};
use skytour_greedy::nearest_neighbor::NearestNeighbor;
use skytour_model::loading::MatrixLoader;
use skytour_search::report::RouteReport;
use skytour_solver::solver::SolverBuilder;
use std::{io::Write, path::PathBuf};

#[derive(Parser, Debug)]
#[command(name = "skytour")]
#[command(about = "Exact minimum-cost round trip over an airport cost matrix", long_about = None)]
pub struct Cli {
    /// Cost matrix CSV (labelled header row, `inf` for missing edges)
    #[arg(short, long)]
    pub matrix: PathBuf,

    /// Label of the start airport
    #[arg(short, long)]
    pub start: String,

    /// Search order: depth-first, breadth-first or best-first
    #[arg(long, default_value = "depth-first")]
    pub strategy: String,

    /// Wall-clock budget in seconds (`inf` disables it)
    #[arg(short, long, default_value_t = DEFAULT_TIME_BUDGET_SECS)]
    pub time_limit: f64,

    /// Initial upper bound; only tours strictly cheaper are reported
    #[arg(short, long)]
    pub budget: Option<f64>,

    /// Race all three strategies in parallel over a shared incumbent
    #[arg(long)]
    pub portfolio: bool,

    /// Skip the nearest-neighbour baseline
    #[arg(long)]
    pub no_baseline: bool,

    /// Print the reports as JSON
    #[arg(long)]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl std::fmt::Display for Cli {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "matrix={} start={} strategy={} time_limit={} budget={} portfolio={} baseline={}",
            self.matrix.display(),
            self.start,
            self.strategy,
            self.time_limit,
            self.budget.map_or_else(|| "none".to_string(), |b| b.to_string()),
            self.portfolio,
            !self.no_baseline
        )
    }
}

/// What the binary prints.
#[derive(Debug, Serialize)]
pub struct Output {
    pub exact: RouteReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline: Option<RouteReport>,
}

impl Output {
    /// Relative excess of the baseline over the exact cost, in percent.
    pub fn baseline_gap(&self) -> Option<f64> {
        let baseline = self.baseline.as_ref()?;
        if !self.exact.has_route() || !baseline.has_route() || self.exact.cost() <= 0.0 {
            return None;
        }
        Some((baseline.cost() - self.exact.cost()) / self.exact.cost() * 100.0)
    }
}

impl std::fmt::Display for Output {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.exact)?;
        if let Some(baseline) = &self.baseline {
            writeln!(f)?;
            write!(f, "{}", baseline)?;
        }
        if let Some(gap) = self.baseline_gap() {
            writeln!(f)?;
            writeln!(f, "Baseline gap:          {:.2}%", gap)?;
        }
        Ok(())
    }
}

/// Runs the exact solver described by `route_solver` as a portfolio race.
fn solve_portfolio(route_solver: &RouteSolver<'_>) -> RouteReport {
    let matrix = route_solver.matrix();
    let mut builder = SearchStrategy::ALL.into_iter().fold(
        SolverBuilder::new().with_initial_bound(route_solver.initial_bound()),
        |builder, strategy| {
            builder.add_solver(BnbPortfolioSolver::preallocated(strategy, matrix.num_nodes()))
        },
    );
    if let Some(limit) = route_solver.time_budget() {
        builder = builder.with_time_limit(limit);
    }
    builder.build().solve_report(matrix, route_solver.start())
}

/// Loads the matrix, solves, and writes the reports to `out`.
pub fn run<W: Write>(args: &Cli, out: &mut W) -> Result<()> {
    let matrix = MatrixLoader::new()
        .from_path(&args.matrix)
        .with_context(|| format!("failed to load cost matrix from {}", args.matrix.display()))?;
    log::info!(
        "loaded {} airports, search space {}",
        matrix.num_nodes(),
        matrix.complexity()
    );

    let strategy = SearchStrategy::from_name_or_default(&args.strategy);
    let mut route_solver =
        RouteSolver::new(&matrix, &args.start, strategy, args.time_limit, args.budget)
            .context("invalid solver configuration")?;

    let exact = if args.portfolio {
        solve_portfolio(&route_solver)
    } else if log::log_enabled!(log::Level::Info) {
        route_solver.solve_with_monitor(LogTreeSearchMonitor::default())
    } else {
        route_solver.solve()
    };

    let baseline = if args.no_baseline {
        None
    } else {
        let greedy = NearestNeighbor::new(&matrix, &args.start)
            .context("invalid baseline configuration")?;
        Some(greedy.solve())
    };

    let output = Output { exact, baseline };
    if args.json {
        serde_json::to_writer_pretty(&mut *out, &output).context("failed to write JSON")?;
        writeln!(out)?;
    } else {
        write!(out, "{}", output)?;
    }

    Ok(())
}
