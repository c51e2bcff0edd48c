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

//! # Skytour Model
//!
//! **The domain model for the skytour exact airport tour solver.**
//!
//! This crate defines the data the solving engines (`skytour_bnb`, `skytour_greedy`)
//! consume and produce. It is the interchange layer between the matrix file written by
//! the upstream route pipeline and the search.
//!
//! ## Architecture
//!
//! * **`index`**: Strongly-typed `NodeIndex` so airport indices cannot be confused with depths or counters.
//! * **`cost`**: `EdgeCost`, a transparent `f64` with `+inf` as the "no edge" sentinel.
//! * **`matrix`**: The immutable `CostMatrix` and its validating `CostMatrixBuilder`.
//! * **`tour`**: A closed cycle together with its total cost.
//! * **`loading`**: Reads the labelled CSV matrix file.
//!
//! ## Design Philosophy
//!
//! 1.  **Type Safety**: Node indices are distinct types.
//! 2.  **Memory Layout**: Costs are stored row-major in one flat vector.
//! 3.  **Fail-Fast**: The builder rejects negative, NaN and non-square input so the search never sees it.

pub mod cost;
pub mod index;
pub mod loading;
pub mod matrix;
pub mod tour;
