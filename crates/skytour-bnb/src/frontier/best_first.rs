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

use crate::{frontier::Frontier, route::PartialRoute};
use std::{cmp::Ordering, collections::BinaryHeap};

/// Heap entry that turns the max-heap into a min-heap on
/// `PartialRoute::best_first_cmp`.
#[derive(Clone, Debug)]
struct MinEntry(PartialRoute);

impl PartialEq for MinEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MinEntry {}

impl PartialOrd for MinEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MinEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other.0.best_first_cmp(&self.0)
    }
}

/// A priority frontier that always yields the cheapest open route.
#[derive(Clone, Debug, Default)]
pub struct BestFirstFrontier {
    heap: BinaryHeap<MinEntry>,
}

impl BestFirstFrontier {
    #[inline]
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
        }
    }

    /// Creates a frontier able to hold `capacity` routes without reallocating.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
        }
    }

    /// Returns the cost of the cheapest open route.
    #[inline]
    pub fn peek_cost(&self) -> Option<f64> {
        self.heap.peek().map(|entry| entry.0.cost())
    }
}

impl Frontier for BestFirstFrontier {
    #[inline]
    fn name(&self) -> &str {
        "BestFirstFrontier"
    }

    #[inline]
    fn push(&mut self, route: PartialRoute) {
        self.heap.push(MinEntry(route));
    }

    #[inline]
    fn push_children(&mut self, children: &mut Vec<PartialRoute>) {
        self.heap.extend(children.drain(..).map(MinEntry));
    }

    #[inline]
    fn pop(&mut self) -> Option<PartialRoute> {
        self.heap.pop().map(|entry| entry.0)
    }

    #[inline]
    fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    fn clear(&mut self) {
        self.heap.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skytour_model::index::NodeIndex;

    fn n(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    #[test]
    fn test_pops_cheapest_first() {
        let root = PartialRoute::root(n(0), 4);
        let mut frontier = BestFirstFrontier::new();
        let mut children = vec![
            root.extend(n(1), 9.0),
            root.extend(n(2), 1.0),
            root.extend(n(3), 5.0),
        ];
        frontier.push_children(&mut children);
        assert!(children.is_empty());
        assert_eq!(frontier.peek_cost(), Some(1.0));

        let costs: Vec<_> = std::iter::from_fn(|| frontier.pop())
            .map(|r| r.cost())
            .collect();
        assert_eq!(costs, vec![1.0, 5.0, 9.0]);
    }

    #[test]
    fn test_ties_broken_by_current_node_then_path() {
        let root = PartialRoute::root(n(0), 4);
        let mut frontier = BestFirstFrontier::with_capacity(4);
        frontier.push(root.extend(n(3), 2.0));
        frontier.push(root.extend(n(2), 1.0).extend(n(1), 1.0));
        frontier.push(root.extend(n(1), 2.0));

        assert_eq!(frontier.pop().unwrap().path(), &[n(0), n(1)]);
        assert_eq!(frontier.pop().unwrap().path(), &[n(0), n(2), n(1)]);
        assert_eq!(frontier.pop().unwrap().path(), &[n(0), n(3)]);
    }

    #[test]
    fn test_clear() {
        let mut frontier = BestFirstFrontier::new();
        frontier.push(PartialRoute::root(n(0), 2));
        frontier.clear();
        assert!(frontier.is_empty());
        assert_eq!(frontier.peek_cost(), None);
    }
}
