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

//! # Subproblems of the Enumeration Tree
//!
//! A [`SubProblem`] is one node of the branch-and-bound tree: the numeric
//! program of its parent plus exactly one additional bound constraint per
//! level of depth. Subproblems are plain values — parent linkage is by
//! integer id, consumed only by the instrumentation layer, so the tree never
//! materializes as a linked structure.
//!
//! ## Sharing and the copy-on-branch invariant
//!
//! The large read-only arrays (`c`, `A`, `b`, `G`, `h`, the integrality
//! mask) are shared between parent and children through `Arc`s; no holder
//! ever mutates them. The branch-and-bound constraint list is the one piece
//! of per-node state: every child receives its own freshly cloned list with
//! one constraint appended. Several workers may hold the parent while
//! children are being built — copying the list instead of sharing it is what
//! makes that safe without a lock.

use crate::branching::BranchRule;
use crate::standard_form::convert_to_equalities;
use capstan_lp::{LinearSolver, LpFailure, LpSolution};
use fixedbitset::FixedBitSet;
use nalgebra::{DMatrix, DVector};
use smallvec::SmallVec;
use std::sync::Arc;

/// One bound constraint added by a branching step, in `<=` form:
/// `direction * x[variable] <= bound` with `direction` either `+1` or `-1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BnbConstraint {
    /// The index of the variable that was branched on.
    pub variable: usize,
    /// `+1.0` for the floor branch, `-1.0` for the ceiling branch.
    pub direction: f64,
    /// Right-hand side of the `<=` constraint.
    pub bound: f64,
}

impl std::fmt::Display for BnbConstraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}*x{} <= {}", self.direction, self.variable, self.bound)
    }
}

/// One node of the branch-and-bound enumeration tree.
///
/// Immutable after creation. The root carries id `0` and, by convention, its
/// own id as parent.
#[derive(Clone, Debug)]
pub struct SubProblem {
    id: u64,
    parent: u64,

    c: Arc<DVector<f64>>,
    a: Option<Arc<DMatrix<f64>>>,
    b: Option<Arc<DVector<f64>>>,
    g: Option<Arc<DMatrix<f64>>>,
    h: Option<Arc<DVector<f64>>>,

    integrality: Arc<FixedBitSet>,
    branch_rule: BranchRule,

    bnb_constraints: SmallVec<[BnbConstraint; 8]>,
}

impl SubProblem {
    /// Creates the root subproblem of an enumeration tree.
    ///
    /// # Panics
    ///
    /// Panics when the shapes are inconsistent, when a matrix arrives without
    /// its right-hand side (or vice versa), or when both constraint blocks
    /// are absent.
    pub fn root(
        c: DVector<f64>,
        a: Option<DMatrix<f64>>,
        b: Option<DVector<f64>>,
        g: Option<DMatrix<f64>>,
        h: Option<DVector<f64>>,
        integrality: FixedBitSet,
        branch_rule: BranchRule,
    ) -> Self {
        let n = c.len();
        assert_eq!(
            integrality.len(),
            n,
            "integrality mask length {} is not the same as the number of variables {}",
            integrality.len(),
            n
        );
        assert!(
            a.is_some() || g.is_some(),
            "no constraint matrices provided: at least one of A and G must be present"
        );
        match (&a, &b) {
            (Some(a), Some(b)) => {
                assert_eq!(a.nrows(), b.len(), "rows of A must match the length of b");
                assert_eq!(a.ncols(), n, "columns of A must match the number of variables");
            }
            (None, None) => {}
            _ => panic!("A matrix and b vector must be provided together"),
        }
        match (&g, &h) {
            (Some(g), Some(h)) => {
                assert_eq!(g.nrows(), h.len(), "rows of G must match the length of h");
                assert_eq!(g.ncols(), n, "columns of G must match the number of variables");
            }
            (None, None) => {}
            _ => panic!("G matrix and h vector must be provided together"),
        }

        Self {
            id: 0,
            parent: 0,
            c: Arc::new(c),
            a: a.map(Arc::new),
            b: b.map(Arc::new),
            g: g.map(Arc::new),
            h: h.map(Arc::new),
            integrality: Arc::new(integrality),
            branch_rule,
            bnb_constraints: SmallVec::new(),
        }
    }

    /// The unique identifier of this node.
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The identifier of the node this one was branched from.
    #[inline]
    pub fn parent(&self) -> u64 {
        self.parent
    }

    /// The objective coefficients.
    #[inline]
    pub fn c(&self) -> &DVector<f64> {
        &self.c
    }

    /// The integrality mask; set bits mark integer-constrained variables.
    #[inline]
    pub fn integrality(&self) -> &FixedBitSet {
        &self.integrality
    }

    /// The branching rule this subtree was configured with.
    #[inline]
    pub fn branch_rule(&self) -> BranchRule {
        self.branch_rule
    }

    /// The bound constraints accumulated along the path from the root, in
    /// insertion order.
    #[inline]
    pub fn bnb_constraints(&self) -> &[BnbConstraint] {
        &self.bnb_constraints
    }

    /// The number of decision variables of this node's program.
    #[inline]
    pub fn num_variables(&self) -> usize {
        self.c.len()
    }

    /// Whether any variable carries an integrality constraint.
    #[inline]
    pub fn has_integer_variables(&self) -> bool {
        self.integrality.count_ones(..) > 0
    }

    /// Assembles the effective inequality system of this node: the original
    /// `G`/`h` rows (on top) stacked with one row per branch-and-bound
    /// constraint (below, in insertion order).
    ///
    /// Returns `None` when the node has neither original inequalities nor
    /// branch-and-bound constraints; when only the original block exists, a
    /// fresh copy of it is returned.
    pub fn combine_inequalities(&self) -> Option<(DMatrix<f64>, DVector<f64>)> {
        let n = self.c.len();

        if self.bnb_constraints.is_empty() {
            return match (&self.g, &self.h) {
                (Some(g), Some(h)) => Some((g.as_ref().clone(), h.as_ref().clone())),
                _ => None,
            };
        }

        let original_rows = self.g.as_ref().map_or(0, |g| g.nrows());
        let bnb_rows = self.bnb_constraints.len();
        let mut combined = DMatrix::zeros(original_rows + bnb_rows, n);
        let mut rhs = DVector::zeros(original_rows + bnb_rows);

        if let (Some(g), Some(h)) = (&self.g, &self.h) {
            combined.view_mut((0, 0), (original_rows, n)).copy_from(g.as_ref());
            rhs.rows_mut(0, original_rows).copy_from(h.as_ref());
        }
        for (i, constraint) in self.bnb_constraints.iter().enumerate() {
            combined[(original_rows + i, constraint.variable)] = constraint.direction;
            rhs[original_rows + i] = constraint.bound;
        }

        Some((combined, rhs))
    }

    /// Solves the LP relaxation of this node with the given backend.
    ///
    /// Inequalities (original and branch-and-bound) are folded into equality
    /// form with per-node slack variables; the slack entries are truncated
    /// from the returned vector so it matches this node's variable count.
    pub fn solve_relaxation<S: LinearSolver>(&self, backend: &S) -> Result<LpSolution, LpFailure> {
        match self.combine_inequalities() {
            Some((g, h)) => {
                let (c_new, a_new, b_new) = convert_to_equalities(
                    &self.c,
                    self.a.as_deref(),
                    self.b.as_deref(),
                    &g,
                    &h,
                );
                let mut solution = backend.solve(&c_new, &a_new, &b_new)?;
                if solution.x.len() != self.c.len() {
                    solution.x = solution.x.rows(0, self.c.len()).into_owned();
                }
                Ok(solution)
            }
            None => {
                let a = self
                    .a
                    .as_ref()
                    .expect("subproblem without inequalities must carry an equality block");
                let b = self
                    .b
                    .as_ref()
                    .expect("subproblem without inequalities must carry an equality block");
                backend.solve(&self.c, a, b)
            }
        }
    }

    /// Builds a child node that inherits everything from this one and adds
    /// the single constraint `direction * x[variable] <= bound`.
    ///
    /// The constraint list is deeply copied; the large arrays are shared.
    ///
    /// # Panics
    ///
    /// Panics when `variable` is not integrality-constrained — branch
    /// constraints on continuous variables violate a tree invariant.
    pub fn child(&self, id: u64, variable: usize, direction: f64, bound: f64) -> SubProblem {
        assert!(
            self.integrality.contains(variable),
            "branched on variable {} which carries no integrality constraint",
            variable
        );

        let mut bnb_constraints = self.bnb_constraints.clone();
        bnb_constraints.push(BnbConstraint {
            variable,
            direction,
            bound,
        });

        SubProblem {
            id,
            parent: self.id,
            c: Arc::clone(&self.c),
            a: self.a.clone(),
            b: self.b.clone(),
            g: self.g.clone(),
            h: self.h.clone(),
            integrality: Arc::clone(&self.integrality),
            branch_rule: self.branch_rule,
            bnb_constraints,
        }
    }
}

impl std::fmt::Display for SubProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SubProblem(id: {}, parent: {}, variables: {}, depth: {})",
            self.id,
            self.parent,
            self.c.len(),
            self.bnb_constraints.len()
        )
    }
}
