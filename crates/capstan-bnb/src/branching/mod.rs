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

//! Branching rules: which integer variable to split on.
//!
//! Each rule is a pure function over the relaxation solution and the
//! subproblem's metadata. All rules share one contract: they return an index
//! whose integrality bit is set, provided at least one such index exists —
//! the decision logic guarantees this by testing integer feasibility before
//! branching.
//!
//! Provided rules:
//! - `max_fun`: arg-max `|c_j|` over the mask (the default).
//! - `most_infeasible`: fractional part closest to one half.
//! - `naive`: cyclic scan starting after the last branched variable.

pub mod max_fun;
pub mod most_infeasible;
pub mod naive;

use crate::subproblem::SubProblem;
use nalgebra::DVector;

/// The selectable branching rules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BranchRule {
    /// Branch on the integer variable with the largest absolute objective
    /// coefficient.
    #[default]
    MaxFun,
    /// Branch on the integer variable whose fractional part is closest to
    /// one half.
    MostInfeasible,
    /// Cycle through the integer variables, starting after the variable the
    /// parent branched on.
    Naive,
}

impl std::fmt::Display for BranchRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BranchRule::MaxFun => write!(f, "MaxFun"),
            BranchRule::MostInfeasible => write!(f, "MostInfeasible"),
            BranchRule::Naive => write!(f, "Naive"),
        }
    }
}

/// Selects the variable to branch on according to the subproblem's rule.
pub fn select_branch_variable(x: &DVector<f64>, subproblem: &SubProblem) -> usize {
    match subproblem.branch_rule() {
        BranchRule::MaxFun => max_fun::select(subproblem.c(), subproblem.integrality()),
        BranchRule::MostInfeasible => most_infeasible::select(x, subproblem.integrality()),
        BranchRule::Naive => naive::select(subproblem),
    }
}
