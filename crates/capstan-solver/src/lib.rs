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

//! # Capstan Solver
//!
//! **The public entry point of the Capstan MILP solver.**
//!
//! Build a [`Problem`] with the fluent model API, then hand it to a
//! [`Solver`]:
//!
//! ```rust
//! use capstan_solver::{Cancellation, Problem, Solver};
//!
//! let mut problem = Problem::new();
//! let x1 = problem.add_variable("x1").coefficient(-1.0).id();
//! let x2 = problem.add_variable("x2").coefficient(-2.0).integer().id();
//! problem
//!     .add_constraint()
//!     .term(1.0, x1)
//!     .term(2.0, x2)
//!     .less_than_or_equal_to(7.5);
//!
//! let solution = Solver::new()
//!     .solve(&problem, &Cancellation::none())
//!     .expect("program has an integer optimum");
//! assert!(solution.objective() <= 0.0);
//! ```
//!
//! The pipeline behind `solve`: a reversible presolve over a deep copy of
//! the problem, lowering to standard equality form, the concurrent
//! branch-and-bound engine of `capstan_bnb`, and a postsolve pass that
//! restores the caller's variable layout.

pub mod presolve;
pub mod solver;

pub use capstan_bnb::{
    BnbDecision, BranchRule, CancelHandle, Cancellation, DotTreeMonitor, LogMonitor, NoOpMonitor,
    SearchMonitor,
};
pub use capstan_lp::{DenseSimplex, LinearSolver, LpFailure, LpSolution};
pub use capstan_model::{Problem, SolveError, Solution};
pub use presolve::Presolver;
pub use solver::Solver;
