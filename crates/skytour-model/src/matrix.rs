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

use crate::{cost::EdgeCost, index::NodeIndex};
use rustc_hash::FxHashMap;

/// Errors raised while validating a cost matrix.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MatrixError {
    #[error("cost matrix has no nodes")]
    Empty,
    #[error("cost matrix is not square: row {row} has {found} entries but {expected} were expected")]
    NotSquare {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("node label `{0}` appears more than once")]
    DuplicateLabel(String),
    #[error("column labels do not match row labels: `{0}` has no matching row")]
    LabelMismatch(String),
    #[error("edge {from} -> {to} has negative cost {value}")]
    NegativeCost {
        from: String,
        to: String,
        value: f64,
    },
    #[error("edge {from} -> {to} has invalid cost {value}")]
    InvalidCost {
        from: String,
        to: String,
        value: f64,
    },
}

#[inline(always)]
fn flatten_index(num_nodes: usize, from: NodeIndex, to: NodeIndex) -> usize {
    from.get() * num_nodes + to.get()
}

/// The size of the route search tree rooted at a start node.
///
/// A tour over `N` nodes fixes the start, so level `k` of the tree holds
/// `(N-1)! / (N-1-k)!` partial routes. Summed over all levels this overflows
/// every integer type well before the instance gets interesting, so the value
/// is kept in **logarithmic space** (`log10`).
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, PartialOrd)]
pub struct Complexity {
    log_val: f64,
}

impl Complexity {
    /// Calculates the tree size for a tour over `num_nodes` nodes.
    pub fn new(num_nodes: usize) -> Self {
        // Level 0 is the lone start node, log10(1) = 0.
        let mut current_level_log = 0.0;
        let mut total_sum_log = 0.0;

        let log10_add = |a: f64, b: f64| -> f64 {
            let max = a.max(b);
            let min = a.min(b);
            max + (1.0 + 10.0_f64.powf(min - max)).log10()
        };

        let remaining = num_nodes.saturating_sub(1);
        for k in 1..=remaining {
            // Nodes still to choose from at depth k.
            let branching = (remaining - k + 1) as f64;
            current_level_log += branching.log10();
            total_sum_log = log10_add(total_sum_log, current_level_log);
        }

        Complexity {
            log_val: total_sum_log,
        }
    }

    /// Returns the percentage of the tree that was expanded.
    /// Trees too large to represent as `f64` report `0.0`.
    pub fn coverage(&self, nodes_expanded: u64) -> f64 {
        if self.log_val > 15.0 {
            return 0.0;
        }

        let total_size = 10.0_f64.powf(self.log_val);
        (nodes_expanded as f64 / total_size) * 100.0
    }

    /// Returns the exponent (order of magnitude).
    #[inline]
    pub fn exponent(&self) -> u64 {
        self.log_val.floor() as u64
    }

    /// Returns the mantissa (coefficient).
    #[inline]
    pub fn mantissa(&self) -> f64 {
        let fractional_part = self.log_val - self.log_val.floor();
        10.0_f64.powf(fractional_part)
    }

    /// Returns the raw log10 value.
    #[inline]
    pub fn raw(&self) -> f64 {
        self.log_val
    }
}

impl std::fmt::Display for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} × 10^{}", self.mantissa(), self.exponent())
    }
}

impl std::fmt::Debug for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Complexity(log10={:.4})", self.log_val)
    }
}

/// The immutable, validated travel-cost matrix over a set of labelled nodes.
///
/// - `labels[node]`: the display label of each node.
/// - `costs[from * num_nodes + to]`: the directed edge cost, `EdgeCost::none()` if
///   there is no edge.
///
/// Every stored cost is either a finite non-negative value or absent. The diagonal
/// is stored but never traversed by a tour over two or more nodes.
///
/// Construction:
/// - Use `CostMatrixBuilder` and call `CostMatrixBuilder::build`, or
///   `CostMatrix::from_rows` for dense input.
#[derive(Clone)]
pub struct CostMatrix {
    labels: Vec<String>,
    index_of: FxHashMap<String, NodeIndex>,
    costs: Vec<EdgeCost>,
}

impl CostMatrix {
    /// Builds a matrix from labels and dense rows of raw costs.
    ///
    /// `f64::INFINITY` marks a missing edge.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use skytour_model::matrix::CostMatrix;
    ///
    /// let inf = f64::INFINITY;
    /// let m = CostMatrix::from_rows(
    ///     ["A", "B"],
    ///     vec![vec![inf, 5.0], vec![7.0, inf]],
    /// ).unwrap();
    /// assert_eq!(m.num_nodes(), 2);
    /// ```
    pub fn from_rows<I, S>(labels: I, rows: Vec<Vec<f64>>) -> Result<Self, MatrixError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut builder = CostMatrixBuilder::new(labels);
        let n = builder.num_nodes();

        if rows.len() != n {
            return Err(MatrixError::NotSquare {
                row: rows.len().min(n),
                expected: n,
                found: rows.len(),
            });
        }

        for (from, row) in rows.into_iter().enumerate() {
            if row.len() != n {
                return Err(MatrixError::NotSquare {
                    row: from,
                    expected: n,
                    found: row.len(),
                });
            }
            for (to, value) in row.into_iter().enumerate() {
                builder.set_cost(NodeIndex::new(from), NodeIndex::new(to), EdgeCost::from_raw(value));
            }
        }

        builder.build()
    }

    /// Returns the number of nodes in the matrix.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.labels.len()
    }

    /// Returns the labels of all nodes in index order.
    #[inline]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Returns the label of a node.
    ///
    /// # Panics
    ///
    /// Panics if `node` is out of bounds.
    #[inline]
    pub fn label(&self, node: NodeIndex) -> &str {
        let index = node.get();
        debug_assert!(
            index < self.num_nodes(),
            "called `CostMatrix::label` with node index out of bounds: the len is {} but the index is {}",
            self.num_nodes(),
            index
        );

        &self.labels[index]
    }

    /// Returns the index of the node with the given label.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use skytour_model::matrix::CostMatrixBuilder;
    ///
    /// let m = CostMatrixBuilder::new(["GRU", "BSB"]).build().unwrap();
    /// assert_eq!(m.index_of("BSB").map(|i| i.get()), Some(1));
    /// assert!(m.index_of("REC").is_none());
    /// ```
    #[inline]
    pub fn index_of(&self, label: &str) -> Option<NodeIndex> {
        self.index_of.get(label).copied()
    }

    /// Returns the directed cost of the edge `from -> to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn cost(&self, from: NodeIndex, to: NodeIndex) -> EdgeCost {
        debug_assert!(
            from.get() < self.num_nodes(),
            "called `CostMatrix::cost` with origin index out of bounds: the len is {} but the index is {}",
            self.num_nodes(),
            from.get()
        );
        debug_assert!(
            to.get() < self.num_nodes(),
            "called `CostMatrix::cost` with destination index out of bounds: the len is {} but the index is {}",
            self.num_nodes(),
            to.get()
        );

        self.costs[flatten_index(self.num_nodes(), from, to)]
    }

    /// Returns all outgoing costs of `from`, indexed by destination.
    #[inline]
    pub fn row(&self, from: NodeIndex) -> &[EdgeCost] {
        let n = self.num_nodes();
        let start = from.get() * n;
        &self.costs[start..start + n]
    }

    /// Returns the size of the route search tree for this matrix.
    #[inline]
    pub fn complexity(&self) -> Complexity {
        Complexity::new(self.num_nodes())
    }

    /// Sums the edge costs along `nodes`, `EdgeCost::none()` if any leg is missing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use skytour_model::{matrix::CostMatrix, index::NodeIndex};
    ///
    /// let inf = f64::INFINITY;
    /// let m = CostMatrix::from_rows(["A", "B"], vec![vec![inf, 5.0], vec![7.0, inf]]).unwrap();
    /// let path = [NodeIndex::new(0), NodeIndex::new(1), NodeIndex::new(0)];
    /// assert_eq!(m.path_cost(&path).raw(), 12.0);
    /// ```
    pub fn path_cost(&self, nodes: &[NodeIndex]) -> EdgeCost {
        let mut total = 0.0;
        for leg in nodes.windows(2) {
            let cost = self.cost(leg[0], leg[1]);
            if cost.is_none() {
                return EdgeCost::none();
            }
            total += cost.raw();
        }
        EdgeCost::from_raw(total)
    }
}

impl std::fmt::Debug for CostMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CostMatrix")
            .field("labels", &self.labels)
            .field("costs", &self.costs)
            .finish()
    }
}

impl std::fmt::Display for CostMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CostMatrix(num_nodes: {})", self.num_nodes())
    }
}

/// Mutable staging area for a `CostMatrix`.
///
/// The builder starts **disconnected**: every edge is absent until set. An
/// instance with no edges is valid and simply has no tour.
#[derive(Clone)]
pub struct CostMatrixBuilder {
    labels: Vec<String>,
    costs: Vec<EdgeCost>,
}

impl CostMatrixBuilder {
    /// Creates a builder for the given node labels with no edges.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use skytour_model::matrix::CostMatrixBuilder;
    ///
    /// let builder = CostMatrixBuilder::new(["A", "B", "C"]);
    /// assert_eq!(builder.num_nodes(), 3);
    /// ```
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        let n = labels.len();
        CostMatrixBuilder {
            labels,
            costs: vec![EdgeCost::none(); n * n],
        }
    }

    /// Returns the number of nodes.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.labels.len()
    }

    /// Sets the directed cost of `from -> to`. Values are validated by `build`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn set_cost(&mut self, from: NodeIndex, to: NodeIndex, cost: EdgeCost) -> &mut Self {
        debug_assert!(
            from.get() < self.num_nodes(),
            "called `CostMatrixBuilder::set_cost` with origin index out of bounds: the len is {} but the index is {}",
            self.num_nodes(),
            from.get()
        );
        debug_assert!(
            to.get() < self.num_nodes(),
            "called `CostMatrixBuilder::set_cost` with destination index out of bounds: the len is {} but the index is {}",
            self.num_nodes(),
            to.get()
        );

        let flat_index = flatten_index(self.num_nodes(), from, to);
        self.costs[flat_index] = cost;
        self
    }

    /// Sets the same cost in both directions.
    #[inline]
    pub fn set_symmetric_cost(&mut self, a: NodeIndex, b: NodeIndex, cost: EdgeCost) -> &mut Self {
        self.set_cost(a, b, cost).set_cost(b, a, cost)
    }

    /// Validates the staged data and builds the `CostMatrix`.
    ///
    /// # Errors
    ///
    /// - `MatrixError::Empty` if there are no nodes.
    /// - `MatrixError::DuplicateLabel` if two nodes share a label.
    /// - `MatrixError::NegativeCost` / `MatrixError::InvalidCost` for costs that are
    ///   negative, NaN or `-inf`.
    pub fn build(self) -> Result<CostMatrix, MatrixError> {
        let n = self.num_nodes();
        if n == 0 {
            return Err(MatrixError::Empty);
        }

        let mut index_of = FxHashMap::with_capacity_and_hasher(n, Default::default());
        for (i, label) in self.labels.iter().enumerate() {
            if index_of.insert(label.clone(), NodeIndex::new(i)).is_some() {
                return Err(MatrixError::DuplicateLabel(label.clone()));
            }
        }

        for (flat_index, cost) in self.costs.iter().enumerate() {
            let value = cost.raw();
            if value.is_nan() || value == f64::NEG_INFINITY {
                return Err(MatrixError::InvalidCost {
                    from: self.labels[flat_index / n].clone(),
                    to: self.labels[flat_index % n].clone(),
                    value,
                });
            }
            if value < 0.0 {
                return Err(MatrixError::NegativeCost {
                    from: self.labels[flat_index / n].clone(),
                    to: self.labels[flat_index % n].clone(),
                    value,
                });
            }
        }

        Ok(CostMatrix {
            labels: self.labels,
            index_of,
            costs: self.costs,
        })
    }
}

impl std::fmt::Debug for CostMatrixBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CostMatrixBuilder")
            .field("labels", &self.labels)
            .field("costs", &self.costs)
            .finish()
    }
}

impl std::fmt::Display for CostMatrixBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CostMatrixBuilder(num_nodes: {})", self.num_nodes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INF: f64 = f64::INFINITY;

    fn n(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    fn four_cities() -> CostMatrix {
        CostMatrix::from_rows(
            ["A", "B", "C", "D"],
            vec![
                vec![INF, 10.0, 15.0, 20.0],
                vec![10.0, INF, 35.0, 25.0],
                vec![15.0, 35.0, INF, 30.0],
                vec![20.0, 25.0, 30.0, INF],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_from_rows_and_accessors() {
        let m = four_cities();
        assert_eq!(m.num_nodes(), 4);
        assert_eq!(m.labels(), &["A", "B", "C", "D"]);
        assert_eq!(m.label(n(2)), "C");
        assert_eq!(m.index_of("D"), Some(n(3)));
        assert_eq!(m.cost(n(0), n(1)).raw(), 10.0);
        assert_eq!(m.cost(n(3), n(2)).raw(), 30.0);
        assert!(m.cost(n(1), n(1)).is_none());
        assert_eq!(m.row(n(1)).len(), 4);
        assert_eq!(m.row(n(1))[3].raw(), 25.0);
    }

    #[test]
    fn test_builder_is_disconnected_by_default() {
        let m = CostMatrixBuilder::new(["X", "Y"]).build().unwrap();
        assert!(m.cost(n(0), n(1)).is_none());
        assert!(m.cost(n(1), n(0)).is_none());
    }

    #[test]
    fn test_builder_set_cost_and_symmetric() {
        let mut b = CostMatrixBuilder::new(["X", "Y", "Z"]);
        b.set_cost(n(0), n(2), EdgeCost::some(4.0));
        b.set_symmetric_cost(n(0), n(1), EdgeCost::some(2.0));

        let m = b.build().unwrap();
        assert_eq!(m.cost(n(0), n(2)).raw(), 4.0);
        assert!(m.cost(n(2), n(0)).is_none());
        assert_eq!(m.cost(n(0), n(1)).raw(), 2.0);
        assert_eq!(m.cost(n(1), n(0)).raw(), 2.0);
    }

    #[test]
    fn test_empty_is_rejected() {
        let labels: [&str; 0] = [];
        assert_eq!(CostMatrixBuilder::new(labels).build().unwrap_err(), MatrixError::Empty);
    }

    #[test]
    fn test_duplicate_label_is_rejected() {
        let err = CostMatrixBuilder::new(["A", "B", "A"]).build().unwrap_err();
        assert_eq!(err, MatrixError::DuplicateLabel("A".to_string()));
    }

    #[test]
    fn test_not_square_is_rejected() {
        let err = CostMatrix::from_rows(["A", "B"], vec![vec![0.0, 1.0], vec![1.0]]).unwrap_err();
        assert_eq!(
            err,
            MatrixError::NotSquare {
                row: 1,
                expected: 2,
                found: 1
            }
        );

        let err = CostMatrix::from_rows(["A", "B"], vec![vec![0.0, 1.0]]).unwrap_err();
        assert!(matches!(err, MatrixError::NotSquare { expected: 2, found: 1, .. }));
    }

    #[test]
    fn test_negative_and_invalid_costs_are_rejected() {
        let err = CostMatrix::from_rows(["A", "B"], vec![vec![0.0, -1.0], vec![1.0, 0.0]])
            .unwrap_err();
        assert!(matches!(err, MatrixError::NegativeCost { ref from, ref to, .. } if from == "A" && to == "B"));

        let err = CostMatrix::from_rows(["A", "B"], vec![vec![0.0, 1.0], vec![f64::NAN, 0.0]])
            .unwrap_err();
        assert!(matches!(err, MatrixError::InvalidCost { ref from, .. } if from == "B"));

        let err = CostMatrix::from_rows(
            ["A", "B"],
            vec![vec![0.0, f64::NEG_INFINITY], vec![1.0, 0.0]],
        )
        .unwrap_err();
        assert!(matches!(err, MatrixError::InvalidCost { .. }));
    }

    #[test]
    fn test_path_cost() {
        let m = four_cities();
        let tour = [n(0), n(1), n(3), n(2), n(0)];
        assert_eq!(m.path_cost(&tour).raw(), 80.0);

        let broken = [n(0), n(0)];
        assert!(m.path_cost(&broken).is_none());

        assert_eq!(m.path_cost(&[n(0)]).raw(), 0.0);
    }

    #[test]
    fn test_display_and_debug() {
        let m = four_cities();
        assert_eq!(format!("{}", m), "CostMatrix(num_nodes: 4)");
        assert!(format!("{:?}", m).contains("labels"));

        let b = CostMatrixBuilder::new(["A"]);
        assert_eq!(format!("{}", b), "CostMatrixBuilder(num_nodes: 1)");
        assert!(format!("{:?}", b).contains("CostMatrixBuilder"));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(MatrixError::Empty.to_string(), "cost matrix has no nodes");
        assert_eq!(
            MatrixError::DuplicateLabel("GRU".into()).to_string(),
            "node label `GRU` appears more than once"
        );
    }

    #[test]
    fn test_complexity_small_trees() {
        // Single node: only the root.
        let c1 = Complexity::new(1);
        assert_eq!(c1.raw(), 0.0);
        assert!((c1.mantissa() - 1.0).abs() < 1e-12);

        // Four nodes: 1 + 3 + 6 + 6 = 16 tree nodes.
        let c4 = Complexity::new(4);
        assert!((10.0_f64.powf(c4.raw()) - 16.0).abs() < 1e-9, "was {}", c4.raw());
        assert_eq!(c4.exponent(), 1);
        assert!((c4.coverage(8) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_complexity_grows_and_saturates_coverage() {
        assert!(Complexity::new(6) > Complexity::new(5));
        let huge = Complexity::new(40);
        assert_eq!(huge.coverage(1_000), 0.0);
        assert!(format!("{}", huge).contains("× 10^"));
        assert!(format!("{:?}", huge).starts_with("Complexity(log10="));
    }
}
