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

//! Monitoring combinators for tree search
//!
//! Provides `CompositeTreeSearchMonitor`, a fan-out monitor that forwards every
//! event to its children. This lets you mix logging, time limits and
//! early-stopping without coupling them to the solver.
//!
//! Behavior
//! - Events are dispatched to child monitors in insertion order.
//! - `search_command` short-circuits on the first non-`Continue` response;
//!   put stricter stop conditions first.
//! - Other callbacks always fan out to all children.

use crate::{
    monitor::tree_search_monitor::{PruneReason, TreeSearchMonitor},
    route::PartialRoute,
    stats::BnbSolverStatistics,
};
use skytour_model::{matrix::CostMatrix, tour::Tour};
use skytour_search::monitor::search_monitor::SearchCommand;

/// A tree search monitor that aggregates multiple monitors and forwards events to all of them.
pub struct CompositeTreeSearchMonitor<'a> {
    monitors: Vec<Box<dyn TreeSearchMonitor + 'a>>,
}

impl Default for CompositeTreeSearchMonitor<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> CompositeTreeSearchMonitor<'a> {
    /// Creates a new empty `CompositeTreeSearchMonitor`.
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            monitors: Vec::new(),
        }
    }

    /// Creates a new `CompositeTreeSearchMonitor` with the specified capacity.
    #[inline(always)]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            monitors: Vec::with_capacity(capacity),
        }
    }

    /// Adds a new monitor to the composite monitor.
    #[inline(always)]
    pub fn add_monitor<M>(&mut self, monitor: M)
    where
        M: TreeSearchMonitor + 'a,
    {
        self.monitors.push(Box::new(monitor));
    }

    /// Adds a boxed monitor to the composite monitor.
    #[inline(always)]
    pub fn add_monitor_boxed(&mut self, monitor: Box<dyn TreeSearchMonitor + 'a>) {
        self.monitors.push(monitor);
    }

    /// Returns a slice of the monitors contained in the composite monitor.
    #[inline(always)]
    pub fn monitors(&self) -> &[Box<dyn TreeSearchMonitor + 'a>] {
        &self.monitors
    }

    /// Clears all monitors from the composite monitor.
    #[inline(always)]
    pub fn clear(&mut self) {
        self.monitors.clear();
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

impl std::fmt::Debug for CompositeTreeSearchMonitor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeTreeSearchMonitor")
            .field("monitors", &self.monitors)
            .finish()
    }
}

impl<'a> FromIterator<Box<dyn TreeSearchMonitor + 'a>> for CompositeTreeSearchMonitor<'a> {
    #[inline(always)]
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn TreeSearchMonitor + 'a>>,
    {
        Self {
            monitors: iter.into_iter().collect(),
        }
    }
}

impl TreeSearchMonitor for CompositeTreeSearchMonitor<'_> {
    #[inline(always)]
    fn name(&self) -> &str {
        "CompositeTreeSearchMonitor"
    }

    #[inline(always)]
    fn on_enter_search(&mut self, matrix: &CostMatrix, statistics: &BnbSolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_enter_search(matrix, statistics);
        }
    }

    #[inline(always)]
    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_exit_search(statistics);
        }
    }

    #[inline(always)]
    fn search_command(
        &mut self,
        route: &PartialRoute,
        statistics: &BnbSolverStatistics,
    ) -> SearchCommand {
        for monitor in &mut self.monitors {
            let cmd = monitor.search_command(route, statistics);
            if !matches!(cmd, SearchCommand::Continue) {
                return cmd;
            }
        }
        SearchCommand::Continue
    }

    #[inline(always)]
    fn on_expand(&mut self, route: &PartialRoute, statistics: &BnbSolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_expand(route, statistics);
        }
    }

    #[inline(always)]
    fn on_prune(
        &mut self,
        route: &PartialRoute,
        reason: PruneReason,
        statistics: &BnbSolverStatistics,
    ) {
        for monitor in &mut self.monitors {
            monitor.on_prune(route, reason, statistics);
        }
    }

    #[inline(always)]
    fn on_children_enqueued(
        &mut self,
        route: &PartialRoute,
        count: usize,
        statistics: &BnbSolverStatistics,
    ) {
        for monitor in &mut self.monitors {
            monitor.on_children_enqueued(route, count, statistics);
        }
    }

    #[inline(always)]
    fn on_solution_found(&mut self, tour: &Tour, statistics: &BnbSolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_solution_found(tour, statistics);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skytour_model::index::NodeIndex;
    use std::{cell::Cell, rc::Rc};

    struct Recorder {
        name: &'static str,
        expands: Rc<Cell<u64>>,
        commands: Rc<Cell<u64>>,
        terminate: bool,
    }

    impl TreeSearchMonitor for Recorder {
        fn name(&self) -> &str {
            self.name
        }
        fn on_enter_search(&mut self, _matrix: &CostMatrix, _statistics: &BnbSolverStatistics) {}
        fn on_exit_search(&mut self, _statistics: &BnbSolverStatistics) {}
        fn search_command(
            &mut self,
            _route: &PartialRoute,
            _statistics: &BnbSolverStatistics,
        ) -> SearchCommand {
            self.commands.set(self.commands.get() + 1);
            if self.terminate {
                SearchCommand::Terminate(format!("{} says stop", self.name))
            } else {
                SearchCommand::Continue
            }
        }
        fn on_expand(&mut self, _route: &PartialRoute, _statistics: &BnbSolverStatistics) {
            self.expands.set(self.expands.get() + 1);
        }
        fn on_prune(
            &mut self,
            _route: &PartialRoute,
            _reason: PruneReason,
            _statistics: &BnbSolverStatistics,
        ) {
        }
        fn on_children_enqueued(
            &mut self,
            _route: &PartialRoute,
            _count: usize,
            _statistics: &BnbSolverStatistics,
        ) {
        }
        fn on_solution_found(&mut self, _tour: &Tour, _statistics: &BnbSolverStatistics) {}
    }

    fn recorder(name: &'static str, terminate: bool) -> (Recorder, Rc<Cell<u64>>, Rc<Cell<u64>>) {
        let expands = Rc::new(Cell::new(0));
        let commands = Rc::new(Cell::new(0));
        (
            Recorder {
                name,
                expands: Rc::clone(&expands),
                commands: Rc::clone(&commands),
                terminate,
            },
            expands,
            commands,
        )
    }

    #[test]
    fn test_events_fan_out_to_every_monitor() {
        let (a, a_expands, _) = recorder("a", false);
        let (b, b_expands, _) = recorder("b", false);
        let mut composite = CompositeTreeSearchMonitor::with_capacity(2);
        composite.add_monitor(a);
        composite.add_monitor_boxed(Box::new(b));
        assert_eq!(composite.len(), 2);

        let route = PartialRoute::root(NodeIndex::new(0), 3);
        let stats = BnbSolverStatistics::default();
        composite.on_expand(&route, &stats);
        composite.on_expand(&route, &stats);

        assert_eq!(a_expands.get(), 2);
        assert_eq!(b_expands.get(), 2);
        assert_eq!(
            composite.search_command(&route, &stats),
            SearchCommand::Continue
        );
    }

    #[test]
    fn test_first_terminate_short_circuits() {
        let (a, _, a_commands) = recorder("a", true);
        let (b, _, b_commands) = recorder("b", true);
        let mut composite: CompositeTreeSearchMonitor =
            vec![Box::new(a) as Box<dyn TreeSearchMonitor>, Box::new(b)]
                .into_iter()
                .collect();

        let route = PartialRoute::root(NodeIndex::new(0), 3);
        let stats = BnbSolverStatistics::default();
        assert_eq!(
            composite.search_command(&route, &stats),
            SearchCommand::Terminate("a says stop".to_string())
        );
        assert_eq!(a_commands.get(), 1);
        assert_eq!(b_commands.get(), 0);
    }

    #[test]
    fn test_clear_and_empty() {
        let mut composite = CompositeTreeSearchMonitor::new();
        assert!(composite.is_empty());
        composite.add_monitor(crate::monitor::no_op::NoOperationMonitor::new());
        assert_eq!(composite.monitors()[0].name(), "NoOperationMonitor");
        composite.clear();
        assert!(composite.is_empty());
    }
}
