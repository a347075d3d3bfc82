// Copyright (c) 2025 The Capstan Authors.
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

//! The outcome of one enumeration-tree traversal.

use crate::candidate::Candidate;
use crate::stats::SearchStatistics;

/// How a search ended and what it produced.
#[derive(Clone, Debug)]
pub enum SearchResult {
    /// The tree was exhausted and the incumbent is the optimum.
    Optimal(Candidate),
    /// The root relaxation admitted no feasible point.
    RootInfeasible,
    /// The tree was exhausted without ever installing an incumbent.
    NoIntegerSolution,
    /// The cancellation signal fired; carries the incumbent found so far,
    /// if any.
    Cancelled(Option<Candidate>),
}

impl std::fmt::Display for SearchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchResult::Optimal(candidate) => match candidate.objective() {
                Some(z) => write!(f, "Optimal(z: {})", z),
                None => write!(f, "Optimal"),
            },
            SearchResult::RootInfeasible => write!(f, "RootInfeasible"),
            SearchResult::NoIntegerSolution => write!(f, "NoIntegerSolution"),
            SearchResult::Cancelled(Some(_)) => write!(f, "Cancelled(with incumbent)"),
            SearchResult::Cancelled(None) => write!(f, "Cancelled(no incumbent)"),
        }
    }
}

/// A [`SearchResult`] together with the run's statistics.
#[derive(Clone, Debug)]
pub struct SearchOutcome {
    result: SearchResult,
    statistics: SearchStatistics,
}

impl SearchOutcome {
    #[inline]
    pub(crate) fn new(result: SearchResult, statistics: SearchStatistics) -> Self {
        Self { result, statistics }
    }

    /// The search result.
    #[inline]
    pub fn result(&self) -> &SearchResult {
        &self.result
    }

    /// Consumes the outcome, yielding the result.
    #[inline]
    pub fn into_result(self) -> SearchResult {
        self.result
    }

    /// The run's aggregate counters.
    #[inline]
    pub fn statistics(&self) -> &SearchStatistics {
        &self.statistics
    }
}

impl std::fmt::Display for SearchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} — {}", self.result, self.statistics)
    }
}
