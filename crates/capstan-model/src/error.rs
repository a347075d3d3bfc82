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

//! The user-visible failure taxonomy of a solve.
//!
//! These are terminal outcomes returned to the caller. Expected subproblem
//! failures (an infeasible or singular node relaxation) are absorbed by the
//! enumeration engine and never surface here; programmer errors (dimension
//! mismatches, foreign variable handles) panic instead.

use crate::solution::Solution;
use thiserror::Error;

/// Why a solve did not produce an optimal solution.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SolveError {
    /// The root LP relaxation has no feasible point.
    #[error("initial relaxation is not feasible")]
    InitialRelaxationInfeasible,

    /// The traversal completed without ever installing an incumbent.
    #[error("no integer feasible solution found")]
    NoIntegerFeasibleSolution,

    /// A lookup by variable name failed.
    #[error("variable `{0}` not found")]
    VariableNotFound(String),

    /// The cancellation signal fired before the traversal completed.
    ///
    /// Carries the best incumbent found so far, if any.
    #[error("solve was cancelled before completion")]
    Cancelled { best: Option<Solution> },

    /// The LP relaxation is unbounded below.
    #[error("problem is unbounded")]
    Unbounded,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            SolveError::InitialRelaxationInfeasible.to_string(),
            "initial relaxation is not feasible"
        );
        assert_eq!(
            SolveError::NoIntegerFeasibleSolution.to_string(),
            "no integer feasible solution found"
        );
        assert_eq!(
            SolveError::VariableNotFound("x9".to_string()).to_string(),
            "variable `x9` not found"
        );
    }

    #[test]
    fn test_cancelled_carries_partial_incumbent() {
        let best = Solution::new(3.0, vec![("x".to_string(), 3.0)]);
        let err = SolveError::Cancelled {
            best: Some(best.clone()),
        };
        match err {
            SolveError::Cancelled { best: Some(s) } => assert_eq!(s, best),
            other => panic!("expected Cancelled with incumbent, got {:?}", other),
        }
    }
}
