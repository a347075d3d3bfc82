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

//! Candidate solutions flowing from the solver workers back to the decision
//! loop.

use crate::subproblem::SubProblem;
use capstan_lp::{LpFailure, LpSolution};
use fixedbitset::FixedBitSet;
use nalgebra::DVector;
use std::sync::Arc;

/// Checks whether every integrality-constrained entry of `x` is within
/// `tolerance` of an integer.
pub fn is_integer_feasible(x: &DVector<f64>, integrality: &FixedBitSet, tolerance: f64) -> bool {
    integrality
        .ones()
        .all(|j| (x[j] - x[j].round()).abs() <= tolerance)
}

/// The outcome of solving one subproblem's LP relaxation, paired with the
/// subproblem that produced it. Read-only downstream of the worker.
#[derive(Clone, Debug)]
pub struct Candidate {
    subproblem: Arc<SubProblem>,
    outcome: Result<LpSolution, LpFailure>,
}

impl Candidate {
    #[inline]
    pub fn new(subproblem: Arc<SubProblem>, outcome: Result<LpSolution, LpFailure>) -> Self {
        Self {
            subproblem,
            outcome,
        }
    }

    /// The subproblem this candidate was solved from.
    #[inline]
    pub fn subproblem(&self) -> &SubProblem {
        &self.subproblem
    }

    /// The raw backend outcome.
    #[inline]
    pub fn outcome(&self) -> &Result<LpSolution, LpFailure> {
        &self.outcome
    }

    /// The relaxation optimum, if the backend succeeded.
    #[inline]
    pub fn objective(&self) -> Option<f64> {
        self.outcome.as_ref().ok().map(|s| s.objective)
    }

    /// The relaxation solution vector, if the backend succeeded.
    #[inline]
    pub fn x(&self) -> Option<&DVector<f64>> {
        self.outcome.as_ref().ok().map(|s| &s.x)
    }

    /// Whether this candidate satisfies all integrality constraints of its
    /// subproblem within `tolerance`. A failed candidate is never feasible.
    pub fn is_integer_feasible(&self, tolerance: f64) -> bool {
        match &self.outcome {
            Ok(solution) => {
                is_integer_feasible(&solution.x, self.subproblem.integrality(), tolerance)
            }
            Err(_) => false,
        }
    }
}

impl std::fmt::Display for Candidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.outcome {
            Ok(solution) => write!(
                f,
                "Candidate(subproblem: {}, z: {})",
                self.subproblem.id(),
                solution.objective
            ),
            Err(failure) => write!(
                f,
                "Candidate(subproblem: {}, failed: {})",
                self.subproblem.id(),
                failure
            ),
        }
    }
}
