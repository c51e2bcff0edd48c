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

/// A LIFO frontier.
#[derive(Clone, Debug, Default)]
pub struct DepthFirstFrontier {
    stack: Vec<PartialRoute>,
}

impl DepthFirstFrontier {
    #[inline]
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    /// Creates a frontier able to hold `capacity` routes without reallocating.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            stack: Vec::with_capacity(capacity),
        }
    }
}

impl Frontier for DepthFirstFrontier {
    #[inline]
    fn name(&self) -> &str {
        "DepthFirstFrontier"
    }

    #[inline]
    fn push(&mut self, route: PartialRoute) {
        self.stack.push(route);
    }

    #[inline]
    fn push_children(&mut self, children: &mut Vec<PartialRoute>) {
        // Reversed, so the lowest airport index ends up on top.
        self.stack.extend(children.drain(..).rev());
    }

    #[inline]
    fn pop(&mut self) -> Option<PartialRoute> {
        self.stack.pop()
    }

    #[inline]
    fn len(&self) -> usize {
        self.stack.len()
    }

    #[inline]
    fn clear(&mut self) {
        self.stack.clear();
    }
}
