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

use crate::{index::NodeIndex, matrix::CostMatrix};

/// The separator placed between labels when a tour is rendered.
pub const ROUTE_SEPARATOR: &str = " -> ";

/// A closed tour together with its total cost.
///
/// `nodes` starts and ends at the start node, so a tour over `N >= 2` nodes
/// holds `N + 1` entries. The degenerate single-node instance is stored as
/// the lone start node.
#[derive(Clone, Debug, PartialEq)]
pub struct Tour {
    cost: f64,
    nodes: Vec<NodeIndex>,
}

impl Tour {
    /// Constructs a new `Tour`.
    ///
    /// # Panics
    ///
    /// Panics if `nodes` is empty, if a multi-node tour is not closed, or if
    /// `cost` is not a finite non-negative value.
    pub fn new(cost: f64, nodes: Vec<NodeIndex>) -> Self {
        assert!(
            !nodes.is_empty(),
            "called `Tour::new` with an empty node sequence"
        );
        assert!(
            nodes.len() == 1 || nodes.first() == nodes.last(),
            "called `Tour::new` with an open node sequence: starts at {:?} but ends at {:?}",
            nodes.first(),
            nodes.last()
        );
        assert!(
            cost.is_finite() && cost >= 0.0,
            "called `Tour::new` with an invalid cost: {}",
            cost
        );

        Self { cost, nodes }
    }

    /// Returns the total cost of the tour.
    #[inline]
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Returns the visited nodes, start to start.
    #[inline]
    pub fn nodes(&self) -> &[NodeIndex] {
        &self.nodes
    }

    /// Returns the start node.
    #[inline]
    pub fn start(&self) -> NodeIndex {
        self.nodes[0]
    }

    /// Returns the number of edges travelled.
    #[inline]
    pub fn num_legs(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Renders the tour as node labels joined by `" -> "`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use skytour_model::{matrix::CostMatrix, tour::Tour, index::NodeIndex};
    ///
    /// let inf = f64::INFINITY;
    /// let m = CostMatrix::from_rows(["A", "B"], vec![vec![inf, 5.0], vec![7.0, inf]]).unwrap();
    /// let tour = Tour::new(12.0, vec![NodeIndex::new(0), NodeIndex::new(1), NodeIndex::new(0)]);
    /// assert_eq!(tour.render(&m), "A -> B -> A");
    /// ```
    pub fn render(&self, matrix: &CostMatrix) -> String {
        self.nodes
            .iter()
            .map(|&node| matrix.label(node))
            .collect::<Vec<_>>()
            .join(ROUTE_SEPARATOR)
    }
}

impl std::fmt::Display for Tour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tour(cost: {}, nodes: [", self.cost)?;
        for (i, node) in self.nodes.iter().enumerate() {
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
    fn test_new_and_accessors() {
        let tour = Tour::new(80.0, vec![n(0), n(1), n(3), n(2), n(0)]);
        assert_eq!(tour.cost(), 80.0);
        assert_eq!(tour.start(), n(0));
        assert_eq!(tour.num_legs(), 4);
        assert_eq!(tour.nodes().len(), 5);
    }

    #[test]
    fn test_single_node_tour() {
        let tour = Tour::new(0.0, vec![n(2)]);
        assert_eq!(tour.num_legs(), 0);
        assert_eq!(tour.start(), n(2));
    }

    #[test]
    #[should_panic(expected = "called `Tour::new` with an empty node sequence")]
    fn test_new_panics_on_empty() {
        let _ = Tour::new(0.0, Vec::new());
    }

    #[test]
    #[should_panic(expected = "called `Tour::new` with an open node sequence")]
    fn test_new_panics_on_open_sequence() {
        let _ = Tour::new(5.0, vec![n(0), n(1)]);
    }

    #[test]
    #[should_panic(expected = "called `Tour::new` with an invalid cost")]
    fn test_new_panics_on_infinite_cost() {
        let _ = Tour::new(f64::INFINITY, vec![n(0), n(1), n(0)]);
    }

    #[test]
    fn test_render_single_node() {
        let m = CostMatrix::from_rows(["GRU"], vec![vec![0.0]]).unwrap();
        assert_eq!(Tour::new(0.0, vec![n(0)]).render(&m), "GRU");
    }

    #[test]
    fn test_display() {
        let tour = Tour::new(12.5, vec![n(0), n(1), n(0)]);
        assert_eq!(format!("{}", tour), "Tour(cost: 12.5, nodes: [0, 1, 0])");
    }
}
