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

//! # Presolve and Postsolve
//!
//! Reversible, problem-preserving simplifications applied before the
//! branch-and-bound engine sees the problem, plus the inverse transformations
//! that restore a solution to the caller's original variable layout.
//!
//! The presolver never touches the caller's [`Problem`]: it works on its own
//! deep copy of the problem data. Every simplification that changes the
//! variable layout pushes an undo closure onto a stack; postsolve pops the
//! stack in LIFO order, so each closure sees the vector exactly as its
//! operation left it.
//!
//! Pipeline:
//!
//! 1. A fixed-point loop over the user-level operations, in pass order
//!    fixed-variable elimination, implicit-zero detection, empty-constraint
//!    removal, duplicate-constraint removal, until a full pass changes
//!    nothing.
//! 2. Lowering to the numeric form (bounds become inequality rows, a
//!    maximization negates the objective).
//! 3. Standard-form conversion (slack variables; pushes the undoer that
//!    truncates them away).
//! 4. Empty-row and empty-column elimination on the standard-form matrix.
//!
//! Infeasibility discovered anywhere in the pipeline — an unsatisfiable
//! empty constraint, contradictory duplicate equalities, a zero row with a
//! nonzero right-hand side — is reported as
//! [`SolveError::InitialRelaxationInfeasible`] without ever invoking the LP
//! backend.

use capstan_bnb::standard_form::convert_to_equalities;
use capstan_bnb::{BranchRule, SubProblem};
use capstan_model::{ConstraintKind, MilpProblem, Problem, SolveError, Solution};
use fixedbitset::FixedBitSet;
use nalgebra::{DMatrix, DVector};
use std::collections::BTreeMap;

/// An inverse operation: maps a raw solution vector back one presolve step.
type Undoer = Box<dyn FnOnce(Vec<f64>) -> Vec<f64>>;

#[derive(Clone, Debug)]
struct WorkVariable {
    coefficient: f64,
    integer: bool,
    lower: f64,
    upper: f64,
}

#[derive(Clone, Debug)]
struct WorkConstraint {
    /// `(variable position, coefficient)` pairs against the current variable
    /// list.
    terms: Vec<(usize, f64)>,
    kind: ConstraintKind,
    rhs: f64,
}

/// The presolver's private, mutable copy of a problem.
#[derive(Clone, Debug)]
pub struct ReducedProblem {
    maximize: bool,
    variables: Vec<WorkVariable>,
    constraints: Vec<WorkConstraint>,
}

impl ReducedProblem {
    fn from_problem(problem: &Problem) -> Self {
        let variables = problem
            .variables()
            .iter()
            .map(|v| WorkVariable {
                coefficient: v.coefficient(),
                integer: v.is_integer(),
                lower: v.lower_bound(),
                upper: v.upper_bound(),
            })
            .collect();
        let constraints = problem
            .constraints()
            .iter()
            .map(|c| WorkConstraint {
                terms: c
                    .terms()
                    .iter()
                    .map(|&(variable, coefficient)| (variable.get(), coefficient))
                    .collect(),
                kind: c.kind(),
                rhs: c.rhs(),
            })
            .collect();
        Self {
            maximize: problem.is_maximize(),
            variables,
            constraints,
        }
    }

    /// The number of variables that survived presolving so far.
    #[inline]
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// The number of constraints that survived presolving so far.
    #[inline]
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Canonical term multiset of a constraint: coefficients summed per
    /// variable position.
    fn canonical_terms(constraint: &WorkConstraint) -> BTreeMap<usize, f64> {
        let mut canonical = BTreeMap::new();
        for &(position, coefficient) in &constraint.terms {
            *canonical.entry(position).or_insert(0.0) += coefficient;
        }
        canonical
    }
}

/// Applies reversible simplifications and records how to undo them.
///
/// One presolver serves exactly one solve: `presolve` and `to_root` push
/// undoers, `postsolve` consumes them.
#[derive(Default)]
pub struct Presolver {
    undoers: Vec<Undoer>,
    objective_offset: f64,
}

impl Presolver {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs the user-level simplification loop on a deep copy of `problem`.
    pub fn presolve(&mut self, problem: &Problem) -> Result<ReducedProblem, SolveError> {
        let mut work = ReducedProblem::from_problem(problem);
        loop {
            let mut changed = false;
            changed |= self.eliminate_fixed_variables(&mut work);
            changed |= Self::detect_implicit_zeros(&mut work)?;
            changed |= Self::drop_empty_constraints(&mut work)?;
            changed |= Self::drop_duplicate_constraints(&mut work)?;
            if !changed {
                return Ok(work);
            }
        }
    }

    /// Removes every variable whose bounds pin it to a single value. The
    /// fixed value is folded into the right-hand sides of the constraints
    /// that mention the variable and into the objective offset.
    fn eliminate_fixed_variables(&mut self, work: &mut ReducedProblem) -> bool {
        let fixed: Vec<(usize, f64)> = work
            .variables
            .iter()
            .enumerate()
            .filter(|(_, v)| v.lower == v.upper)
            .map(|(position, v)| (position, v.lower))
            .collect();
        if fixed.is_empty() {
            return false;
        }

        let mut is_fixed = vec![false; work.variables.len()];
        let mut fixed_value = vec![0.0; work.variables.len()];
        for &(position, value) in &fixed {
            is_fixed[position] = true;
            fixed_value[position] = value;
            self.objective_offset += work.variables[position].coefficient * value;
        }

        let mut remap = vec![usize::MAX; work.variables.len()];
        let mut next = 0;
        for (position, &gone) in is_fixed.iter().enumerate() {
            if !gone {
                remap[position] = next;
                next += 1;
            }
        }

        for constraint in &mut work.constraints {
            let mut kept = Vec::with_capacity(constraint.terms.len());
            for &(position, coefficient) in &constraint.terms {
                if is_fixed[position] {
                    // b_i := b_i - a_ij * x_j
                    constraint.rhs -= coefficient * fixed_value[position];
                } else {
                    kept.push((remap[position], coefficient));
                }
            }
            constraint.terms = kept;
        }

        let variables = std::mem::take(&mut work.variables);
        work.variables = variables
            .into_iter()
            .enumerate()
            .filter(|&(position, _)| !is_fixed[position])
            .map(|(_, variable)| variable)
            .collect();

        self.undoers.push(Box::new(move |mut x: Vec<f64>| {
            // Positions are pre-pass indices; ascending insertion rebuilds
            // the pre-pass layout.
            for &(position, value) in &fixed {
                x.insert(position, value);
            }
            x
        }));

        true
    }

    /// A constraint with right-hand side zero and only non-negative
    /// coefficients forces every variable it mentions with a positive
    /// coefficient to zero. The bounds are tightened on the working copy so
    /// the next fixed-variable pass eliminates them.
    fn detect_implicit_zeros(work: &mut ReducedProblem) -> Result<bool, SolveError> {
        let mut zeroed = Vec::new();
        for constraint in &work.constraints {
            if constraint.rhs != 0.0 || constraint.terms.is_empty() {
                continue;
            }
            if constraint.terms.iter().all(|&(_, coefficient)| coefficient >= 0.0) {
                for &(position, coefficient) in &constraint.terms {
                    if coefficient > 0.0 {
                        zeroed.push(position);
                    }
                }
            }
        }

        let mut changed = false;
        for position in zeroed {
            let variable = &mut work.variables[position];
            if variable.lower > 0.0 {
                // The variable cannot reach zero, so the constraint cannot
                // be satisfied at all.
                return Err(SolveError::InitialRelaxationInfeasible);
            }
            if variable.lower != 0.0 || variable.upper != 0.0 {
                variable.lower = 0.0;
                variable.upper = 0.0;
                changed = true;
            }
        }
        Ok(changed)
    }

    /// Drops constraints without any remaining terms. An empty constraint
    /// that cannot hold proves infeasibility before any LP call.
    fn drop_empty_constraints(work: &mut ReducedProblem) -> Result<bool, SolveError> {
        for constraint in &work.constraints {
            if !constraint.terms.is_empty() {
                continue;
            }
            let satisfied = match constraint.kind {
                ConstraintKind::Equal => constraint.rhs == 0.0,
                ConstraintKind::LessOrEqual => constraint.rhs >= 0.0,
            };
            if !satisfied {
                return Err(SolveError::InitialRelaxationInfeasible);
            }
        }

        let before = work.constraints.len();
        work.constraints.retain(|constraint| !constraint.terms.is_empty());
        Ok(work.constraints.len() != before)
    }

    /// Collapses constraints sharing the same term multiset and kind.
    /// Inequalities keep the tighter (smaller) right-hand side; equalities
    /// with different right-hand sides are contradictory.
    fn drop_duplicate_constraints(work: &mut ReducedProblem) -> Result<bool, SolveError> {
        let canonical: Vec<BTreeMap<usize, f64>> = work
            .constraints
            .iter()
            .map(ReducedProblem::canonical_terms)
            .collect();

        let count = work.constraints.len();
        let mut removed = vec![false; count];

        for i in 0..count {
            if removed[i] {
                continue;
            }
            for j in (i + 1)..count {
                if removed[j]
                    || work.constraints[i].kind != work.constraints[j].kind
                    || canonical[i] != canonical[j]
                {
                    continue;
                }
                match work.constraints[i].kind {
                    ConstraintKind::Equal => {
                        if work.constraints[i].rhs == work.constraints[j].rhs {
                            removed[j] = true;
                        } else {
                            return Err(SolveError::InitialRelaxationInfeasible);
                        }
                    }
                    ConstraintKind::LessOrEqual => {
                        if work.constraints[i].rhs <= work.constraints[j].rhs {
                            removed[j] = true;
                        } else {
                            removed[i] = true;
                            break;
                        }
                    }
                }
            }
        }

        if removed.iter().any(|&r| r) {
            let mut index = 0;
            work.constraints.retain(|_| {
                let keep = !removed[index];
                index += 1;
                keep
            });
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Lowers the reduced problem to its numeric form: equalities into
    /// `A`/`b`, inequalities into `G`/`h`, a finite upper bound into a
    /// `+x_j <= u` row, a positive lower bound into a `-x_j <= -l` row.
    /// Maximization negates the objective here.
    fn lower(work: &ReducedProblem) -> MilpProblem {
        let n = work.variables.len();

        let mut c = DVector::zeros(n);
        let mut integrality = FixedBitSet::with_capacity(n);
        for (position, variable) in work.variables.iter().enumerate() {
            c[position] = if work.maximize {
                -variable.coefficient
            } else {
                variable.coefficient
            };
            if variable.integer {
                integrality.insert(position);
            }
        }

        let mut a_data: Vec<f64> = Vec::new();
        let mut b_data: Vec<f64> = Vec::new();
        let mut g_data: Vec<f64> = Vec::new();
        let mut h_data: Vec<f64> = Vec::new();

        for constraint in &work.constraints {
            let mut row = vec![0.0; n];
            for &(position, coefficient) in &constraint.terms {
                row[position] += coefficient;
            }
            match constraint.kind {
                ConstraintKind::Equal => {
                    a_data.extend_from_slice(&row);
                    b_data.push(constraint.rhs);
                }
                ConstraintKind::LessOrEqual => {
                    g_data.extend_from_slice(&row);
                    h_data.push(constraint.rhs);
                }
            }
        }

        for (position, variable) in work.variables.iter().enumerate() {
            if variable.upper.is_finite() {
                let mut row = vec![0.0; n];
                row[position] = 1.0;
                g_data.extend_from_slice(&row);
                h_data.push(variable.upper);
            }
            // A bound at or below zero is subsumed by non-negativity.
            if variable.lower > 0.0 {
                let mut row = vec![0.0; n];
                row[position] = -1.0;
                g_data.extend_from_slice(&row);
                h_data.push(-variable.lower);
            }
        }

        let a = (!b_data.is_empty()).then(|| DMatrix::from_row_slice(b_data.len(), n, &a_data));
        let b = (!b_data.is_empty()).then(|| DVector::from_vec(b_data));
        let g = (!h_data.is_empty()).then(|| DMatrix::from_row_slice(h_data.len(), n, &g_data));
        let h = (!h_data.is_empty()).then(|| DVector::from_vec(h_data));

        MilpProblem {
            c,
            a,
            b,
            g,
            h,
            integrality,
        }
    }

    /// Lowers the reduced problem, folds inequalities into standard form,
    /// and eliminates empty rows and empty columns of the resulting matrix.
    ///
    /// Returns `Ok(None)` when no constraint rows remain at all: the
    /// program then optimizes every surviving variable at zero — or is
    /// unbounded when some objective coefficient is negative.
    pub fn to_root(
        &mut self,
        work: &ReducedProblem,
        branch_rule: BranchRule,
    ) -> Result<Option<SubProblem>, SolveError> {
        let milp = Self::lower(work);

        if milp.a.is_none() && milp.g.is_none() {
            if milp.c.iter().any(|&coefficient| coefficient < 0.0) {
                return Err(SolveError::Unbounded);
            }
            return Ok(None);
        }
        milp.validate();

        let original_width = milp.c.len();
        let (mut c, mut a, mut b, mut integrality) = match (&milp.g, &milp.h) {
            (Some(g), Some(h)) => {
                let (c_new, a_new, b_new) =
                    convert_to_equalities(&milp.c, milp.a.as_ref(), milp.b.as_ref(), g, h);
                let mut mask = milp.integrality.clone();
                mask.grow(c_new.len());
                self.undoers.push(Box::new(move |mut x: Vec<f64>| {
                    x.truncate(original_width);
                    x
                }));
                (c_new, a_new, b_new, mask)
            }
            _ => (
                milp.c,
                milp.a.expect("validated problem without G carries A"),
                milp.b.expect("validated problem without G carries b"),
                milp.integrality,
            ),
        };

        // Empty-row elimination: a zero row with a nonzero right-hand side
        // is a contradiction; with a zero right-hand side it is vacuous.
        let keep_rows: Vec<usize> = (0..a.nrows())
            .filter(|&i| a.row(i).iter().any(|&value| value != 0.0))
            .collect();
        for i in 0..a.nrows() {
            if a.row(i).iter().all(|&value| value == 0.0) && b[i] != 0.0 {
                return Err(SolveError::InitialRelaxationInfeasible);
            }
        }
        if keep_rows.is_empty() {
            if c.iter().any(|&coefficient| coefficient < 0.0) {
                return Err(SolveError::Unbounded);
            }
            return Ok(None);
        }
        if keep_rows.len() != a.nrows() {
            a = a.select_rows(keep_rows.iter());
            b = b.select_rows(keep_rows.iter());
        }

        // Empty-column elimination: a variable that appears in no constraint
        // and has no objective weight can be dropped; postsolve reinserts it
        // at zero, which every bound that survived lowering admits.
        let dropped_columns: Vec<usize> = (0..a.ncols())
            .filter(|&j| c[j] == 0.0 && a.column(j).iter().all(|&value| value == 0.0))
            .collect();
        if !dropped_columns.is_empty() {
            let kept_columns: Vec<usize> = (0..a.ncols())
                .filter(|j| !dropped_columns.contains(j))
                .collect();
            a = a.select_columns(kept_columns.iter());
            c = c.select_rows(kept_columns.iter());

            let mut mask = FixedBitSet::with_capacity(kept_columns.len());
            for (new_position, &old_position) in kept_columns.iter().enumerate() {
                if integrality.contains(old_position) {
                    mask.insert(new_position);
                }
            }
            integrality = mask;

            self.undoers.push(Box::new(move |mut x: Vec<f64>| {
                for &position in &dropped_columns {
                    x.insert(position, 0.0);
                }
                x
            }));
        }

        Ok(Some(SubProblem::root(
            c,
            Some(a),
            Some(b),
            None,
            None,
            integrality,
            branch_rule,
        )))
    }

    /// Applies the undo stack in LIFO order and assembles the user-facing
    /// solution: values keyed and ordered by declaration, the objective
    /// re-negated under maximization and shifted by the contributions of the
    /// eliminated fixed variables.
    pub fn postsolve(self, x: &DVector<f64>, objective: f64, problem: &Problem) -> Solution {
        let Presolver {
            undoers,
            objective_offset,
        } = self;

        let mut values: Vec<f64> = x.iter().copied().collect();
        for undoer in undoers.into_iter().rev() {
            values = undoer(values);
        }
        assert_eq!(
            values.len(),
            problem.num_variables(),
            "postsolve must restore the original variable count"
        );

        let objective = if problem.is_maximize() {
            -objective
        } else {
            objective
        } + objective_offset;

        Solution::new(
            objective,
            problem
                .variables()
                .iter()
                .map(|variable| variable.name().to_string())
                .zip(values),
        )
    }
}
