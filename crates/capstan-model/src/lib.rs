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

//! # Capstan Model
//!
//! **The core domain model for the Capstan MILP solver.**
//!
//! This crate defines the data structures used to describe a mixed-integer
//! linear program and its solution. It is the data interchange layer between
//! problem definition (user input) and the solving engine (`capstan_bnb`).
//!
//! ## Architecture
//!
//! The crate separates **construction** from **solving**:
//!
//! * **`problem`**: the mutable [`Problem`](problem::Problem) with fluent
//!   variable and constraint handles.
//! * **`variable`** / **`constraint`**: the building blocks, plus the
//!   strongly-typed [`VariableId`](variable::VariableId) handle that prevents
//!   raw-index mix-ups.
//! * **`milp`**: the immutable numeric form `(c, A, b, G, h, integrality)`
//!   consumed by the engine, with eager shape validation.
//! * **`solution`**: the output format, a declaration-ordered name-to-value
//!   map plus the objective.
//! * **`error`**: the terminal failure taxonomy of a solve.

pub mod constraint;
pub mod error;
pub mod milp;
pub mod problem;
pub mod solution;
pub mod variable;

pub use constraint::{Constraint, ConstraintKind};
pub use error::SolveError;
pub use milp::MilpProblem;
pub use problem::Problem;
pub use solution::Solution;
pub use variable::{Variable, VariableId};
