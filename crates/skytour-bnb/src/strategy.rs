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

//! Search strategies
//!
//! The closed set of orders in which the branch-and-bound explores partial
//! routes. All three are exact: they only differ in which open branch is
//! expanded next, and therefore in how quickly a good bound is found.
//!
//! Selection
//! - `FromStr` is strict and rejects unknown names.
//! - `SearchStrategy::from_name_or_default` is permissive: an unknown name
//!   logs a warning and falls back to depth-first.

use thiserror::Error;

/// The order in which open partial routes are expanded.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum SearchStrategy {
    /// Deepest route first; neighbours in increasing index order.
    #[default]
    DepthFirst,
    /// All routes of depth `k` before any route of depth `k + 1`.
    BreadthFirst,
    /// Lowest accumulated cost first.
    BestFirst,
}

/// Error returned when parsing an unknown strategy name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown search strategy `{0}` (expected one of: depth-first, breadth-first, best-first)")]
pub struct ParseStrategyError(pub String);

impl SearchStrategy {
    /// Every strategy, in declaration order.
    pub const ALL: [SearchStrategy; 3] = [
        SearchStrategy::DepthFirst,
        SearchStrategy::BreadthFirst,
        SearchStrategy::BestFirst,
    ];

    /// Returns the canonical name of the strategy.
    #[inline]
    pub const fn name(&self) -> &'static str {
        match self {
            SearchStrategy::DepthFirst => "depth-first",
            SearchStrategy::BreadthFirst => "breadth-first",
            SearchStrategy::BestFirst => "best-first",
        }
    }

    /// Resolves `name`, falling back to depth-first for anything unknown.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use skytour_bnb::strategy::SearchStrategy;
    ///
    /// assert_eq!(SearchStrategy::from_name_or_default("best-first"), SearchStrategy::BestFirst);
    /// assert_eq!(SearchStrategy::from_name_or_default("zigzag"), SearchStrategy::DepthFirst);
    /// ```
    pub fn from_name_or_default(name: &str) -> Self {
        match name.parse() {
            Ok(strategy) => strategy,
            Err(err) => {
                log::warn!("{}; falling back to {}", err, SearchStrategy::default());
                SearchStrategy::default()
            }
        }
    }
}

impl std::str::FromStr for SearchStrategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SearchStrategy::ALL
            .into_iter()
            .find(|strategy| strategy.name() == s)
            .ok_or_else(|| ParseStrategyError(s.to_string()))
    }
}

impl std::fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip_through_from_str() {
        for strategy in SearchStrategy::ALL {
            assert_eq!(strategy.name().parse::<SearchStrategy>(), Ok(strategy));
        }
    }

    #[test]
    fn test_from_str_is_case_sensitive_and_strict() {
        assert!("Depth-First".parse::<SearchStrategy>().is_err());
        assert!("dfs".parse::<SearchStrategy>().is_err());
        assert_eq!(
            "".parse::<SearchStrategy>(),
            Err(ParseStrategyError(String::new()))
        );
    }

    #[test]
    fn test_unknown_name_falls_back_to_depth_first() {
        assert_eq!(
            SearchStrategy::from_name_or_default("breadth first"),
            SearchStrategy::DepthFirst
        );
        assert_eq!(
            SearchStrategy::from_name_or_default("breadth-first"),
            SearchStrategy::BreadthFirst
        );
    }

    #[test]
    fn test_default_and_display() {
        assert_eq!(SearchStrategy::default(), SearchStrategy::DepthFirst);
        assert_eq!(SearchStrategy::BestFirst.to_string(), "best-first");
    }

    #[test]
    fn test_error_message_lists_known_names() {
        let err = "zigzag".parse::<SearchStrategy>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown search strategy `zigzag` (expected one of: depth-first, breadth-first, best-first)"
        );
    }
}
