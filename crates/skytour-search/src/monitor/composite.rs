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

use crate::monitor::{
    index::MonitorIndex,
    search_monitor::{SearchCommand, SearchMonitor},
};
use skytour_model::{matrix::CostMatrix, tour::Tour};

/// A composite monitor that aggregates multiple monitors and forwards events to all of them.
pub struct CompositeMonitor<'a> {
    monitors: Vec<Box<dyn SearchMonitor + 'a>>,
}

impl std::fmt::Debug for CompositeMonitor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeMonitor")
            .field("monitors", &self.monitor_names())
            .finish()
    }
}

impl std::fmt::Display for CompositeMonitor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CompositeMonitor([{}])", self.monitor_names())
    }
}

impl Default for CompositeMonitor<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> CompositeMonitor<'a> {
    /// Creates a new empty `CompositeMonitor`.
    #[inline]
    pub fn new() -> CompositeMonitor<'a> {
        CompositeMonitor {
            monitors: Vec::new(),
        }
    }

    /// Creates a new `CompositeMonitor` with the specified capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> CompositeMonitor<'a> {
        CompositeMonitor {
            monitors: Vec::with_capacity(capacity),
        }
    }

    /// Adds a new monitor to the composite monitor.
    #[inline]
    pub fn add_monitor<M>(&mut self, monitor: M)
    where
        M: SearchMonitor + 'a,
    {
        self.monitors.push(Box::new(monitor));
    }

    /// Adds a new boxed monitor to the composite monitor.
    #[inline]
    pub fn add_monitor_boxed(&mut self, monitor: Box<dyn SearchMonitor + 'a>) {
        self.monitors.push(monitor);
    }

    /// Returns the number of monitors in the composite monitor.
    #[inline]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    /// Returns `true` if the composite monitor contains no monitors.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }

    /// Returns a reference to the monitor at the specified index.
    ///
    /// # Panics
    ///
    /// Panics if `monitor_index` is out of bounds.
    #[inline]
    pub fn monitor(&self, monitor_index: MonitorIndex) -> &(dyn SearchMonitor + 'a) {
        let index = monitor_index.get();
        debug_assert!(
            index < self.monitors.len(),
            "called `CompositeMonitor::monitor` with monitor index out of bounds: the len is {} but the index is {}",
            self.monitors.len(),
            index
        );

        self.monitors[index].as_ref()
    }

    fn monitor_names(&self) -> String {
        self.monitors
            .iter()
            .map(|m| m.name())
            .collect::<Vec<&str>>()
            .join(", ")
    }
}

impl<'a> FromIterator<Box<dyn SearchMonitor + 'a>> for CompositeMonitor<'a> {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn SearchMonitor + 'a>>,
    {
        CompositeMonitor {
            monitors: iter.into_iter().collect(),
        }
    }
}

impl SearchMonitor for CompositeMonitor<'_> {
    fn name(&self) -> &str {
        "CompositeMonitor"
    }

    fn on_enter_search(&mut self, matrix: &CostMatrix) {
        for monitor in &mut self.monitors {
            monitor.on_enter_search(matrix);
        }
    }

    fn on_exit_search(&mut self) {
        for monitor in &mut self.monitors {
            monitor.on_exit_search();
        }
    }

    fn on_solution_found(&mut self, tour: &Tour) {
        for monitor in &mut self.monitors {
            monitor.on_solution_found(tour);
        }
    }

    fn on_step(&mut self) {
        for monitor in &mut self.monitors {
            monitor.on_step();
        }
    }

    fn search_command(&self) -> SearchCommand {
        // Plain loop: this runs once per expansion.
        for monitor in &self.monitors {
            if let SearchCommand::Terminate(reason) = monitor.search_command() {
                return SearchCommand::Terminate(reason);
            }
        }
        SearchCommand::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::interrupt::InterruptMonitor;
    use std::cell::Cell;
    use std::rc::Rc;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct CountingMonitor {
        name: &'static str,
        steps: Rc<Cell<u64>>,
        solutions: Rc<Cell<u64>>,
        terminate: bool,
    }

    impl SearchMonitor for CountingMonitor {
        fn name(&self) -> &str {
            self.name
        }
        fn on_enter_search(&mut self, _matrix: &CostMatrix) {}
        fn on_exit_search(&mut self) {}
        fn on_solution_found(&mut self, _tour: &Tour) {
            self.solutions.set(self.solutions.get() + 1);
        }
        fn on_step(&mut self) {
            self.steps.set(self.steps.get() + 1);
        }
        fn search_command(&self) -> SearchCommand {
            if self.terminate {
                SearchCommand::Terminate(format!("{} says stop", self.name))
            } else {
                SearchCommand::Continue
            }
        }
    }

    fn counting(name: &'static str, terminate: bool) -> (CountingMonitor, Rc<Cell<u64>>, Rc<Cell<u64>>) {
        let steps = Rc::new(Cell::new(0));
        let solutions = Rc::new(Cell::new(0));
        (
            CountingMonitor {
                name,
                steps: Rc::clone(&steps),
                solutions: Rc::clone(&solutions),
                terminate,
            },
            steps,
            solutions,
        )
    }

    #[test]
    fn test_events_are_forwarded_to_all_monitors() {
        let (a, a_steps, a_solutions) = counting("a", false);
        let (b, b_steps, b_solutions) = counting("b", false);

        let mut composite = CompositeMonitor::with_capacity(2);
        composite.add_monitor(a);
        composite.add_monitor_boxed(Box::new(b));
        assert_eq!(composite.len(), 2);
        assert!(!composite.is_empty());

        composite.on_step();
        composite.on_step();
        let tour = Tour::new(0.0, vec![skytour_model::index::NodeIndex::new(0)]);
        composite.on_solution_found(&tour);

        assert_eq!(a_steps.get(), 2);
        assert_eq!(b_steps.get(), 2);
        assert_eq!(a_solutions.get(), 1);
        assert_eq!(b_solutions.get(), 1);
        assert_eq!(composite.search_command(), SearchCommand::Continue);
    }

    #[test]
    fn test_first_terminate_wins() {
        let (a, _, _) = counting("a", false);
        let (b, _, _) = counting("b", true);
        let (c, _, _) = counting("c", true);

        let composite: CompositeMonitor = vec![
            Box::new(a) as Box<dyn SearchMonitor>,
            Box::new(b),
            Box::new(c),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            composite.search_command(),
            SearchCommand::Terminate("b says stop".to_string())
        );
    }

    #[test]
    fn test_interrupt_inside_composite() {
        let flag = AtomicBool::new(false);
        let mut composite = CompositeMonitor::new();
        composite.add_monitor(InterruptMonitor::new(&flag));
        assert_eq!(composite.search_command(), SearchCommand::Continue);

        flag.store(true, Ordering::Relaxed);
        assert!(matches!(composite.search_command(), SearchCommand::Terminate(_)));
    }

    #[test]
    fn test_monitor_lookup_and_formatting() {
        let (a, _, _) = counting("alpha", false);
        let (b, _, _) = counting("beta", false);
        let mut composite = CompositeMonitor::default();
        composite.add_monitor(a);
        composite.add_monitor(b);

        assert_eq!(composite.monitor(MonitorIndex::new(1)).name(), "beta");
        assert_eq!(composite.to_string(), "CompositeMonitor([alpha, beta])");
        assert!(format!("{:?}", composite).contains("alpha, beta"));
    }
}
