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

//! Partial routes
//!
//! A `PartialRoute` is the state of one open branch: the airports visited so
//! far (starting at the start airport), the accumulated cost and a visited
//! set. Branches never share state; `extend` produces a fresh copy so that
//! siblings are independent no matter in which order a frontier pops them.

use fixedbitset::FixedBitSet;
use skytour_model::{index::NodeIndex, tour::Tour};
use smallvec::SmallVec;
use std::cmp::Ordering;

/// Inline capacity of a route path. Instances solved exactly rarely exceed it.
const INLINE_PATH_CAPACITY: usize = 16;

/// The visited sequence of a partial route.
pub type RoutePath = SmallVec<[NodeIndex; INLINE_PATH_CAPACITY]>;

/// One open branch of the search tree.
#[derive(Clone, Debug, PartialEq)]
pub struct PartialRoute {
    cost: f64,
    path: RoutePath,
    visited: FixedBitSet,
}

impl PartialRoute {
    /// Creates the root route that only contains `start`.
    ///
    /// # Panics
    ///
    /// Panics if `start` is not a node of an instance with `num_nodes` nodes.
    pub fn root(start: NodeIndex, num_nodes: usize) -> Self {
        assert!(
            start.get() < num_nodes,
            "called `PartialRoute::root` with start node out of bounds: the len is {} but the index is {}",
            num_nodes,
            start.get()
        );

        let mut visited = FixedBitSet::with_capacity(num_nodes);
        visited.insert(start.get());
        let mut path = RoutePath::new();
        path.push(start);

        Self {
            cost: 0.0,
            path,
            visited,
        }
    }

    /// Returns the accumulated cost of the travelled edges.
    #[inline]
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Returns the visited airports in travel order.
    #[inline]
    pub fn path(&self) -> &[NodeIndex] {
        &self.path
    }

    #[inline]
    pub fn start(&self) -> NodeIndex {
        self.path[0]
    }

    /// Returns the airport the route currently ends at.
    #[inline]
    pub fn current(&self) -> NodeIndex {
        self.path[self.path.len() - 1]
    }

    /// Returns the number of visited airports, including the start.
    #[inline]
    pub fn num_visited(&self) -> usize {
        self.path.len()
    }

    /// Returns the number of travelled edges.
    #[inline]
    pub fn depth(&self) -> usize {
        self.path.len() - 1
    }

    /// Returns the number of airports of the instance.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.visited.len()
    }

    /// Returns `true` once every airport has been visited.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.path.len() == self.visited.len()
    }

    /// Returns `true` if `node` is already on the route.
    #[inline]
    pub fn is_visited(&self, node: NodeIndex) -> bool {
        self.visited.contains(node.get())
    }

    /// Returns a copy of this route extended by `next` over an edge of cost
    /// `edge_cost`.
    ///
    /// # Panics
    ///
    /// In debug builds, this function will panic if `next` is out of bounds
    /// or already visited.
    #[inline]
    pub fn extend(&self, next: NodeIndex, edge_cost: f64) -> PartialRoute {
        debug_assert!(
            next.get() < self.visited.len(),
            "called `PartialRoute::extend` with node index out of bounds: the len is {} but the index is {}",
            self.visited.len(),
            next.get()
        );
        debug_assert!(
            !self.is_visited(next),
            "called `PartialRoute::extend` with already visited node: {}",
            next
        );

        let mut child = self.clone();
        child.cost += edge_cost;
        child.path.push(next);
        child.visited.insert(next.get());
        child
    }

    /// Closes the route back to the start and turns it into a `Tour`.
    ///
    /// A single-airport route closes onto itself without travelling.
    ///
    /// # Panics
    ///
    /// Panics if the resulting cost is not finite.
    pub fn into_tour(self, closing_cost: f64) -> Tour {
        let start = self.start();
        let cost = self.cost + closing_cost;
        let mut nodes = self.path.into_vec();
        if nodes.len() > 1 {
            nodes.push(start);
        }
        Tour::new(cost, nodes)
    }

    /// The order in which a best-first frontier pops routes: cheaper first,
    /// then by current airport, then by path.
    #[inline]
    pub fn best_first_cmp(&self, other: &PartialRoute) -> Ordering {
        self.cost
            .total_cmp(&other.cost)
            .then_with(|| self.current().cmp(&other.current()))
            .then_with(|| self.path.cmp(&other.path))
    }
}

impl std::fmt::Display for PartialRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PartialRoute(cost: {}, path: [", self.cost)?;
        for (i, node) in self.path.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", node.get())?;
        }
        write!(f, "])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    #[test]
    fn test_root_contains_only_start() {
        let root = PartialRoute::root(n(2), 4);
        assert_eq!(root.cost(), 0.0);
        assert_eq!(root.path(), &[n(2)]);
        assert_eq!(root.start(), n(2));
        assert_eq!(root.current(), n(2));
        assert_eq!(root.num_visited(), 1);
        assert_eq!(root.depth(), 0);
        assert_eq!(root.num_nodes(), 4);
        assert!(root.is_visited(n(2)));
        assert!(!root.is_visited(n(0)));
        assert!(!root.is_complete());
    }

    #[test]
    #[should_panic(expected = "called `PartialRoute::root` with start node out of bounds")]
    fn test_root_rejects_out_of_bounds_start() {
        let _ = PartialRoute::root(n(4), 4);
    }

    #[test]
    fn test_extend_copies_and_leaves_parent_untouched() {
        let root = PartialRoute::root(n(0), 3);
        let a = root.extend(n(1), 10.0);
        let b = root.extend(n(2), 15.0);

        assert_eq!(root.path(), &[n(0)]);
        assert_eq!(root.cost(), 0.0);
        assert!(!root.is_visited(n(1)));

        assert_eq!(a.path(), &[n(0), n(1)]);
        assert_eq!(a.cost(), 10.0);
        assert!(a.is_visited(n(1)));
        assert!(!a.is_visited(n(2)));

        assert_eq!(b.path(), &[n(0), n(2)]);
        assert_eq!(b.cost(), 15.0);
    }

    #[test]
    fn test_into_tour_closes_the_cycle() {
        let route = PartialRoute::root(n(0), 3)
            .extend(n(2), 2.0)
            .extend(n(1), 3.0);
        assert!(route.is_complete());

        let tour = route.into_tour(1.0);
        assert_eq!(tour.cost(), 6.0);
        assert_eq!(tour.nodes(), &[n(0), n(2), n(1), n(0)]);
    }

    #[test]
    fn test_single_node_route_closes_onto_itself() {
        let route = PartialRoute::root(n(0), 1);
        assert!(route.is_complete());

        let tour = route.into_tour(0.0);
        assert_eq!(tour.cost(), 0.0);
        assert_eq!(tour.nodes(), &[n(0)]);
    }

    #[test]
    fn test_best_first_order() {
        let root = PartialRoute::root(n(0), 4);
        let cheap = root.extend(n(3), 5.0);
        let dear = root.extend(n(1), 7.0);
        let tie_low = root.extend(n(1), 5.0);

        assert_eq!(cheap.best_first_cmp(&dear), Ordering::Less);
        assert_eq!(tie_low.best_first_cmp(&cheap), Ordering::Less);
        assert_eq!(cheap.best_first_cmp(&cheap.clone()), Ordering::Equal);

        let via_one = tie_low.extend(n(2), 0.0);
        let via_three = cheap.extend(n(2), 0.0);
        assert_eq!(via_one.best_first_cmp(&via_three), Ordering::Less);
    }

    #[test]
    fn test_display() {
        let route = PartialRoute::root(n(0), 3).extend(n(1), 2.5);
        assert_eq!(route.to_string(), "PartialRoute(cost: 2.5, path: [0, 1])");
    }
}
