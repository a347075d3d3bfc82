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

//! A two-phase dense tableau Simplex with Bland's anti-cycling rule.
//!
//! Phase 1 minimizes the sum of one artificial variable per row to find a
//! basic feasible solution; a positive phase-1 optimum proves infeasibility.
//! Phase 2 optimizes the actual objective over the original columns, with
//! artificial columns barred from entering the basis.

use crate::{LinearSolver, LpFailure, LpSolution};
use nalgebra::{DMatrix, DVector};

/// Residual tolerance below which a phase-1 optimum counts as feasible.
const FEASIBILITY_TOL: f64 = 1e-7;

/// A dense two-phase tableau Simplex solver.
#[derive(Clone, Debug, PartialEq)]
pub struct DenseSimplex {
    /// Pivoting tolerance: entries with magnitude at or below this are
    /// treated as zero.
    tol: f64,
    /// Upper bound on pivots per phase.
    max_iterations: usize,
}

impl Default for DenseSimplex {
    fn default() -> Self {
        Self::new()
    }
}

impl DenseSimplex {
    #[inline]
    pub fn new() -> Self {
        Self {
            tol: 1e-9,
            max_iterations: 10_000,
        }
    }

    /// Overrides the pivoting tolerance.
    #[inline]
    pub fn with_tolerance(tol: f64) -> Self {
        Self {
            tol,
            max_iterations: 10_000,
        }
    }
}

/// The mutable tableau state of one solve.
///
/// Layout: `m` constraint rows over `n` original columns, `m` artificial
/// columns, and a trailing right-hand-side column. The objective row is kept
/// separately and updated by the same pivots.
struct Tableau {
    t: DMatrix<f64>,
    obj: DVector<f64>,
    basis: Vec<usize>,
    n: usize,
    m: usize,
}

impl Tableau {
    /// Total number of structural plus artificial columns.
    #[inline]
    fn width(&self) -> usize {
        self.n + self.m
    }

    /// Pivots on `(row, col)`: normalizes the pivot row and eliminates the
    /// pivot column from all other rows and from the objective row.
    fn pivot(&mut self, row: usize, col: usize) {
        let width = self.width();
        let p = self.t[(row, col)];
        debug_assert!(p.abs() > 0.0, "pivot element must be nonzero");

        for j in 0..=width {
            self.t[(row, j)] /= p;
        }
        for i in 0..self.m {
            if i == row {
                continue;
            }
            let factor = self.t[(i, col)];
            if factor != 0.0 {
                for j in 0..=width {
                    self.t[(i, j)] -= factor * self.t[(row, j)];
                }
            }
        }
        let factor = self.obj[col];
        if factor != 0.0 {
            for j in 0..=width {
                self.obj[j] -= factor * self.t[(row, j)];
            }
        }
        self.basis[row] = col;
    }

    /// Runs pivots until no entering column remains among the first
    /// `allowed_cols` columns. Bland's rule throughout: the entering column
    /// is the lowest-index one with a negative reduced cost, and ratio-test
    /// ties leave the basis at the lowest basic index.
    fn optimize(
        &mut self,
        allowed_cols: usize,
        tol: f64,
        max_iterations: usize,
    ) -> Result<(), LpFailure> {
        let width = self.width();
        for _ in 0..max_iterations {
            let entering = (0..allowed_cols).find(|&j| self.obj[j] < -tol);
            let col = match entering {
                Some(col) => col,
                None => return Ok(()),
            };

            let mut leaving: Option<usize> = None;
            let mut best_ratio = f64::INFINITY;
            for i in 0..self.m {
                let p = self.t[(i, col)];
                if p > tol {
                    let ratio = self.t[(i, width)] / p;
                    let better = match leaving {
                        None => true,
                        Some(prev) => {
                            ratio < best_ratio
                                || (ratio == best_ratio && self.basis[i] < self.basis[prev])
                        }
                    };
                    if better {
                        leaving = Some(i);
                        best_ratio = ratio;
                    }
                }
            }

            let row = match leaving {
                Some(row) => row,
                None => return Err(LpFailure::Unbounded),
            };
            self.pivot(row, col);

            if !self.obj[width].is_finite() {
                return Err(LpFailure::Singular);
            }
        }
        Err(LpFailure::Numerical(
            "simplex iteration limit reached".to_string(),
        ))
    }
}

impl LinearSolver for DenseSimplex {
    fn solve(
        &self,
        c: &DVector<f64>,
        a: &DMatrix<f64>,
        b: &DVector<f64>,
    ) -> Result<LpSolution, LpFailure> {
        let m = a.nrows();
        let n = a.ncols();
        assert_eq!(
            c.len(),
            n,
            "objective vector length {} does not match the number of columns {}",
            c.len(),
            n
        );
        assert_eq!(
            b.len(),
            m,
            "right-hand side length {} does not match the number of rows {}",
            b.len(),
            m
        );
        assert!(m > 0, "constraint matrix must have at least one row");
        assert!(n > 0, "constraint matrix must have at least one column");

        let width = n + m;
        let mut tableau = Tableau {
            t: DMatrix::zeros(m, width + 1),
            obj: DVector::zeros(width + 1),
            basis: (n..width).collect(),
            n,
            m,
        };

        // Rows are normalized to a non-negative right-hand side so the
        // artificial basis starts feasible.
        for i in 0..m {
            let sign = if b[i] < 0.0 { -1.0 } else { 1.0 };
            for j in 0..n {
                tableau.t[(i, j)] = sign * a[(i, j)];
            }
            tableau.t[(i, n + i)] = 1.0;
            tableau.t[(i, width)] = sign * b[i];
        }

        // Phase-1 reduced costs: cost 1 on artificials, zeroed out over the
        // basic (artificial) columns.
        for j in 0..=width {
            let mut column_sum = 0.0;
            for i in 0..m {
                column_sum += tableau.t[(i, j)];
            }
            let cost = if j >= n && j < width { 1.0 } else { 0.0 };
            tableau.obj[j] = cost - column_sum;
        }

        tableau.optimize(width, self.tol, self.max_iterations)?;

        let phase_one_value = -tableau.obj[width];
        if phase_one_value > FEASIBILITY_TOL {
            return Err(LpFailure::Infeasible);
        }

        // Drive artificials that linger in the basis at level zero out where
        // a structural pivot exists; rows without one are redundant and keep
        // their artificial, which phase 2 can never grow again.
        for i in 0..m {
            if tableau.basis[i] >= n {
                let col = (0..n)
                    .filter(|&j| tableau.t[(i, j)].abs() > self.tol)
                    .max_by(|&a, &b| {
                        tableau.t[(i, a)]
                            .abs()
                            .total_cmp(&tableau.t[(i, b)].abs())
                    });
                if let Some(col) = col {
                    tableau.pivot(i, col);
                }
            }
        }

        // Phase-2 reduced costs for the actual objective (artificials cost 0).
        let cost = |j: usize| if j < n { c[j] } else { 0.0 };
        for j in 0..=width {
            let mut basic_sum = 0.0;
            for i in 0..m {
                basic_sum += cost(tableau.basis[i]) * tableau.t[(i, j)];
            }
            let direct = if j < width { cost(j) } else { 0.0 };
            tableau.obj[j] = direct - basic_sum;
        }

        tableau.optimize(n, self.tol, self.max_iterations)?;

        let mut x = DVector::zeros(n);
        for i in 0..m {
            if tableau.basis[i] < n {
                x[tableau.basis[i]] = tableau.t[(i, width)].max(0.0);
            }
        }

        let objective = c.dot(&x);
        if !objective.is_finite() || x.iter().any(|v| !v.is_finite()) {
            return Err(LpFailure::Singular);
        }

        Ok(LpSolution { objective, x })
    }
}
