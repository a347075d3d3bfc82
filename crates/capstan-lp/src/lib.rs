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

//! # Capstan LP
//!
//! **The continuous LP backend contract of the Capstan solver, plus a dense
//! Simplex implementation.**
//!
//! The branch-and-bound engine treats the continuous solver as a black box:
//! it hands over a standard-form program
//!
//! ```text
//! minimize    c^T x
//! subject to  A x = b
//!             x >= 0
//! ```
//!
//! and receives either an optimum with its solution vector or a typed
//! failure. Everything the engine does — pruning, branching, incumbent
//! tracking — depends only on this contract, never on backend internals.
//!
//! The bundled [`DenseSimplex`](simplex::DenseSimplex) is a two-phase dense
//! tableau implementation with Bland's anti-cycling rule; it is adequate for
//! the dense, moderately sized programs the engine produces.

pub mod simplex;

pub use simplex::DenseSimplex;

use nalgebra::{DMatrix, DVector};
use thiserror::Error;

/// An optimal solution to a standard-form linear program.
#[derive(Clone, Debug, PartialEq)]
pub struct LpSolution {
    /// The optimal objective value `c^T x`.
    pub objective: f64,
    /// The optimal decision vector, one entry per column of `A`.
    pub x: DVector<f64>,
}

/// Why a continuous solve failed.
///
/// `Infeasible` and `Singular` are expected during branch-and-bound and
/// prune the node that produced them; the remaining variants are fatal to
/// the enclosing solve.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum LpFailure {
    /// The feasible region is empty.
    #[error("linear program is infeasible")]
    Infeasible,

    /// The basis matrix broke down numerically.
    #[error("constraint matrix is singular")]
    Singular,

    /// The objective is unbounded below on the feasible region.
    #[error("linear program is unbounded")]
    Unbounded,

    /// Any other numerical failure.
    #[error("numerical failure: {0}")]
    Numerical(String),
}

/// The contract between the enumeration engine and its continuous backend.
///
/// Implementations must be safe to invoke from several solver workers at
/// once; the engine shares one backend reference across its worker pool.
pub trait LinearSolver {
    /// Solves `min c^T x` subject to `A x = b`, `x >= 0`.
    fn solve(
        &self,
        c: &DVector<f64>,
        a: &DMatrix<f64>,
        b: &DVector<f64>,
    ) -> Result<LpSolution, LpFailure>;
}
