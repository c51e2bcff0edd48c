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
use std::collections::VecDeque;

/// A FIFO frontier.
#[derive(Clone, Debug, Default)]
pub struct BreadthFirstFrontier {
    queue: VecDeque<PartialRoute>,
}

impl BreadthFirstFrontier {
    #[inline]
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Creates a frontier able to hold `capacity` routes without reallocating.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(capacity),
        }
    }
}

impl Frontier for BreadthFirstFrontier {
    #[inline]
    fn name(&self) -> &str {
        "BreadthFirstFrontier"
    }

    #[inline]
    fn push(&mut self, route: PartialRoute) {
        self.queue.push_back(route);
    }

    #[inline]
    fn push_children(&mut self, children: &mut Vec<PartialRoute>) {
        self.queue.extend(children.drain(..));
    }

    #[inline]
    fn pop(&mut self) -> Option<PartialRoute> {
        self.queue.pop_front()
    }

    #[inline]
    fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    fn clear(&mut self) {
        self.queue.clear();
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
    fn test_levels_are_exhausted_in_order() {
        let root = PartialRoute::root(n(0), 4);
        let mut frontier = BreadthFirstFrontier::new();
        let mut children = vec![root.extend(n(1), 1.0), root.extend(n(2), 1.0)];
        frontier.push_children(&mut children);
        assert!(children.is_empty());

        let first = frontier.pop().unwrap();
        assert_eq!(first.current(), n(1));
        let mut grandchildren = vec![first.extend(n(3), 1.0)];
        frontier.push_children(&mut grandchildren);

        assert_eq!(frontier.pop().unwrap().path(), &[n(0), n(2)]);
        assert_eq!(frontier.pop().unwrap().path(), &[n(0), n(1), n(3)]);
        assert!(frontier.pop().is_none());
    }

    #[test]
    fn test_len_and_clear() {
        let mut frontier = BreadthFirstFrontier::with_capacity(4);
        frontier.push(PartialRoute::root(n(0), 2));
        frontier.push(PartialRoute::root(n(1), 2));
        assert_eq!(frontier.len(), 2);
        frontier.clear();
        assert!(frontier.is_empty());
    }
}
