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

//! # Fluent MILP Problem Construction
//!
//! The mutable, user-facing half of the model crate. A [`Problem`] is built
//! incrementally: variables are declared with fluent [`VariableRef`] handles,
//! constraints with fluent [`ConstraintRef`] handles, and the optimization
//! sense is toggled between minimization (the default) and maximization.
//!
//! ## Usage
//!
//! ```rust
//! use capstan_model::problem::Problem;
//!
//! let mut problem = Problem::new();
//! let x1 = problem.add_variable("x1").coefficient(-1.0).id();
//! let x2 = problem.add_variable("x2").coefficient(-2.0).integer().id();
//!
//! problem
//!     .add_constraint()
//!     .term(-1.0, x1)
//!     .term(2.0, x2)
//!     .equal_to(4.0);
//! ```
//!
//! ## Fail-fast validation
//!
//! Construction errors are programmer errors and panic eagerly: duplicate
//! variable names and constraint terms referencing a handle outside the
//! problem are rejected at the call site, never deferred to solve time.

use crate::constraint::{Constraint, ConstraintKind};
use crate::variable::{Variable, VariableId};

/// The abstract representation of a mixed-integer linear program.
///
/// Minimizes by default.
#[derive(Clone, Debug, Default)]
pub struct Problem {
    maximize: bool,
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
}

impl Problem {
    /// Creates an empty, minimizing problem.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a new variable and returns a fluent handle to configure it.
    ///
    /// Defaults: objective coefficient `0`, continuous, bounds `[0, +inf)`.
    ///
    /// # Panics
    ///
    /// Panics if a variable with the same name has already been declared.
    pub fn add_variable(&mut self, name: impl Into<String>) -> VariableRef<'_> {
        let name = name.into();
        assert!(
            !self.variables.iter().any(|v| v.name() == name),
            "variable `{}` has already been declared in this problem",
            name
        );

        let index = self.variables.len();
        self.variables.push(Variable::new(name));
        VariableRef {
            problem: self,
            index,
        }
    }

    /// Adds a new constraint and returns a fluent handle to populate it.
    pub fn add_constraint(&mut self) -> ConstraintRef<'_> {
        let index = self.constraints.len();
        self.constraints.push(Constraint::new());
        ConstraintRef {
            problem: self,
            index,
        }
    }

    /// Switches the optimization sense to maximization.
    ///
    /// Maximization is implemented by negating all objective coefficients
    /// before solving; the final objective value is re-negated for return.
    #[inline]
    pub fn maximize(&mut self) {
        self.maximize = true;
    }

    /// Switches the optimization sense to minimization (the default).
    #[inline]
    pub fn minimize(&mut self) {
        self.maximize = false;
    }

    /// Whether this problem maximizes its objective.
    #[inline]
    pub fn is_maximize(&self) -> bool {
        self.maximize
    }

    /// All declared variables, in declaration order.
    #[inline]
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// All added constraints, in insertion order.
    #[inline]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// The number of declared variables.
    #[inline]
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// The number of added constraints.
    #[inline]
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Looks up a variable handle by name.
    pub fn variable_by_name(&self, name: &str) -> Option<VariableId> {
        self.variables
            .iter()
            .position(|v| v.name() == name)
            .map(VariableId::new)
    }
}

impl std::fmt::Display for Problem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sense = if self.maximize { "maximize" } else { "minimize" };
        writeln!(
            f,
            "Problem ({}, {} variables, {} constraints)",
            sense,
            self.variables.len(),
            self.constraints.len()
        )?;
        for v in &self.variables {
            writeln!(f, "  {}", v)?;
        }
        for c in &self.constraints {
            writeln!(f, "  {}", c)?;
        }
        Ok(())
    }
}

/// A fluent handle to a freshly declared variable.
#[derive(Debug)]
pub struct VariableRef<'a> {
    problem: &'a mut Problem,
    index: usize,
}

impl VariableRef<'_> {
    /// Sets the coefficient of the variable in the objective function.
    #[inline]
    pub fn coefficient(self, coefficient: f64) -> Self {
        self.problem.variables[self.index].set_coefficient(coefficient);
        self
    }

    /// Constrains the variable to integer values.
    #[inline]
    pub fn integer(self) -> Self {
        self.problem.variables[self.index].set_integer();
        self
    }

    /// Sets the inclusive upper bound of the variable.
    #[inline]
    pub fn upper_bound(self, bound: f64) -> Self {
        self.problem.variables[self.index].set_upper_bound(bound);
        self
    }

    /// Sets the inclusive lower bound of the variable.
    ///
    /// Bounds at or below zero are subsumed by the universal non-negativity
    /// constraint.
    #[inline]
    pub fn lower_bound(self, bound: f64) -> Self {
        self.problem.variables[self.index].set_lower_bound(bound);
        self
    }

    /// Returns the handle identifying this variable within its problem.
    #[inline]
    pub fn id(&self) -> VariableId {
        VariableId::new(self.index)
    }
}

/// A fluent handle to a freshly added constraint.
#[derive(Debug)]
pub struct ConstraintRef<'a> {
    problem: &'a mut Problem,
    index: usize,
}

impl ConstraintRef<'_> {
    /// Appends a weighted term `coefficient * variable` to the constraint.
    ///
    /// # Panics
    ///
    /// Panics if the variable handle does not belong to this problem.
    pub fn term(self, coefficient: f64, variable: VariableId) -> Self {
        assert!(
            variable.get() < self.problem.variables.len(),
            "constraint term references variable {} which is not declared in this problem",
            variable
        );
        self.problem.constraints[self.index].push_term(variable, coefficient);
        self
    }

    /// Finalizes the constraint as an equality with the given right-hand side.
    #[inline]
    pub fn equal_to(self, rhs: f64) {
        self.problem.constraints[self.index].finalize(ConstraintKind::Equal, rhs);
    }

    /// Finalizes the constraint as `lhs <= rhs`.
    #[inline]
    pub fn less_than_or_equal_to(self, rhs: f64) {
        self.problem.constraints[self.index].finalize(ConstraintKind::LessOrEqual, rhs);
    }
}
