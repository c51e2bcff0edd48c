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

//! Skytour-BnB: exact branch-and-bound for the airport tour problem
//!
//! Enumerates Hamiltonian cycles from a start airport over a `CostMatrix`,
//! pruning every partial route whose accumulated cost already meets or
//! exceeds the best complete tour known so far. The traversal order is a
//! pluggable `Frontier`: depth-first, breadth-first or best-first.
//!
//! Core flow
//! - Provide a `skytour_model::matrix::CostMatrix` and a start node.
//! - Pick a `strategy::SearchStrategy`.
//! - Optionally set an upper bound, a shared incumbent, and monitors.
//! - Run `bnb::BnbSolver` directly, use the `route_solver::RouteSolver`
//!   facade for a `RouteReport`, or integrate via `portfolio`.
//!
//! Design highlights
//! - Every branch owns its partial route; children are copies of the parent
//!   extended by one airport.
//! - The best-known cost and tour live in the search session and are only
//!   replaced together on a strict improvement.
//! - Monitors observe and control the search (time limits, logging) without
//!   touching the loop.
//!
//! Assumptions and guarantees
//! - Edge costs are non-negative, so a partial route that reaches the bound
//!   can never complete below it.
//! - Exhausting the frontier proves optimality (or infeasibility below the
//!   bound) for every strategy.
//!
//! Module map
//! - `bnb`: the solver engine and session orchestration.
//! - `frontier`: the three open-list disciplines.
//! - `monitor`: tree-search monitors (time, log, composite, wrappers).
//! - `portfolio`: adapter to the `skytour_search` portfolio API.
//! - `result`: solver outcomes with termination reasons.
//! - `route`: the per-branch partial route state.
//! - `route_solver`: validated construction and the `RouteReport` facade.
//! - `stats`: lightweight counters/timing.
//! - `strategy`: the closed set of search orders.

pub mod bnb;
pub mod frontier;
mod incumbent;
pub mod monitor;
pub mod portfolio;
pub mod result;
pub mod route;
pub mod route_solver;
pub mod stats;
pub mod strategy;
