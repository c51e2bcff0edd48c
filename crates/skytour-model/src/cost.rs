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

/// An edge cost that may be absent.
///
/// Instead of `Option<f64>`, absence is encoded as `f64::INFINITY`. This keeps the
/// cost matrix a flat array of plain floats, and an absent edge naturally compares
/// greater than every real cost, so the pruning test `cost >= best` needs no branch
/// for missing edges.
///
/// Encoding:
/// - Finite non-negative values represent a concrete travel cost.
/// - `+inf` represents "no edge".
///
/// Negative and NaN values are never stored; `CostMatrixBuilder` rejects them.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, PartialOrd)]
pub struct EdgeCost(f64);

impl EdgeCost {
    const NONE_SENTINEL: f64 = f64::INFINITY;

    /// The cost of not moving at all.
    pub const ZERO: EdgeCost = EdgeCost(0.0);

    /// Creates an `EdgeCost` from an `Option<f64>`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use skytour_model::cost::EdgeCost;
    ///
    /// let some_cost = EdgeCost::from_option(Some(12.5));
    /// assert!(some_cost.is_some());
    /// assert_eq!(some_cost.raw(), 12.5);
    /// ```
    #[inline]
    pub fn from_option(value: Option<f64>) -> Self {
        match value {
            Some(v) => EdgeCost::some(v),
            None => EdgeCost::none(),
        }
    }

    /// Creates an `EdgeCost` from a raw value without validation.
    /// `+inf` is treated as `None`.
    #[inline]
    pub const fn from_raw(value: f64) -> Self {
        EdgeCost(value)
    }

    /// Creates an `EdgeCost` representing a concrete cost.
    ///
    /// # Panics
    ///
    /// This function will panic if the provided value is negative, NaN or infinite.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use skytour_model::cost::EdgeCost;
    ///
    /// let cost = EdgeCost::some(30.0);
    /// assert_eq!(cost.into_option(), Some(30.0));
    /// ```
    pub fn some(value: f64) -> Self {
        assert!(
            value.is_finite() && value >= 0.0,
            "called `EdgeCost::some` with a value that is not a finite non-negative cost: {}",
            value
        );

        EdgeCost(value)
    }

    /// Creates an `EdgeCost` representing a missing edge.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use skytour_model::cost::EdgeCost;
    ///
    /// let missing = EdgeCost::none();
    /// assert!(missing.is_none());
    /// assert_eq!(missing.raw(), f64::INFINITY);
    /// ```
    #[inline]
    pub const fn none() -> Self {
        EdgeCost(Self::NONE_SENTINEL)
    }

    /// Checks if the edge is missing.
    #[inline]
    pub fn is_none(&self) -> bool {
        self.0 == Self::NONE_SENTINEL
    }

    /// Checks if the edge exists.
    #[inline]
    pub fn is_some(&self) -> bool {
        !self.is_none()
    }

    /// Returns the raw value, `+inf` for a missing edge.
    #[inline]
    pub const fn raw(&self) -> f64 {
        self.0
    }

    /// Converts the `EdgeCost` back into an `Option<f64>`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use skytour_model::cost::EdgeCost;
    ///
    /// assert_eq!(EdgeCost::some(4.0).into_option(), Some(4.0));
    /// assert_eq!(EdgeCost::none().into_option(), None);
    /// ```
    #[inline]
    pub fn into_option(&self) -> Option<f64> {
        if self.is_none() { None } else { Some(self.0) }
    }

    /// Returns the cost, or `default` if the edge is missing.
    #[inline]
    pub fn unwrap_or(&self, default: f64) -> f64 {
        if self.is_none() { default } else { self.0 }
    }
}

impl Default for EdgeCost {
    fn default() -> Self {
        EdgeCost::none()
    }
}

impl std::fmt::Debug for EdgeCost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "EdgeCost(None)")
        } else {
            write!(f, "EdgeCost(Some({:?}))", self.0)
        }
    }
}

impl std::fmt::Display for EdgeCost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "inf")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl From<Option<f64>> for EdgeCost {
    #[inline]
    fn from(value: Option<f64>) -> Self {
        EdgeCost::from_option(value)
    }
}

impl From<EdgeCost> for Option<f64> {
    #[inline]
    fn from(val: EdgeCost) -> Self {
        val.into_option()
    }
}
