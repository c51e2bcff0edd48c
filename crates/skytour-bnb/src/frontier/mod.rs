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

//! Frontiers
//!
//! The open list of the branch-and-bound. A frontier decides which partial
//! route is expanded next and is the only thing that differs between the
//! search strategies.
//!
//! Components
//! - `depth_first`: LIFO stack; children are pushed in reverse so the lowest
//!   index is popped first, reproducing the order of a recursive search.
//! - `breadth_first`: FIFO queue.
//! - `best_first`: min-heap on `(cost, current airport, path)`.
//!
//! Notes
//! - Children are always handed over in increasing airport order.
//! - `clear` keeps the allocated capacity for the next solve.

pub mod best_first;
pub mod breadth_first;
pub mod depth_first;

use crate::route::PartialRoute;

/// An open list of partial routes.
pub trait Frontier {
    /// Returns the name of the frontier.
    fn name(&self) -> &str;
    /// Adds a single route.
    fn push(&mut self, route: PartialRoute);
    /// Moves all `children` of one expansion into the frontier, leaving the
    /// buffer empty. `children` is ordered by increasing airport index.
    fn push_children(&mut self, children: &mut Vec<PartialRoute>);
    /// Removes and returns the next route to expand.
    fn pop(&mut self) -> Option<PartialRoute>;
    /// Returns the number of open routes.
    fn len(&self) -> usize;
    /// Returns `true` if no route is open.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Removes every open route.
    fn clear(&mut self);
}

impl std::fmt::Debug for dyn Frontier + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Frontier({}, len: {})", self.name(), self.len())
    }
}

impl std::fmt::Display for dyn Frontier + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Frontier({})", self.name())
    }
}
