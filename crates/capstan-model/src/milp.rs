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

//! The numeric MILP representation handed to the solving engine.
//!
//! This is the interchange format between problem construction and the
//! branch-and-bound engine:
//!
//! ```text
//! minimize    c^T x
//! subject to  A x  = b
//!             G x <= h
//!             x >= 0
//! ```
//!
//! with a designated subset of the variables constrained to integer values.
//! Either constraint block may be absent, but not both.

use fixedbitset::FixedBitSet;
use nalgebra::{DMatrix, DVector};

/// The concrete numeric form of a mixed-integer linear program.
#[derive(Clone, Debug, PartialEq)]
pub struct MilpProblem {
    /// Objective coefficients, one per variable.
    pub c: DVector<f64>,
    /// Equality constraint matrix, if any equality constraints exist.
    pub a: Option<DMatrix<f64>>,
    /// Equality right-hand sides, row-aligned with `a`.
    pub b: Option<DVector<f64>>,
    /// Inequality constraint matrix, if any inequality constraints exist.
    pub g: Option<DMatrix<f64>>,
    /// Inequality right-hand sides, row-aligned with `g`.
    pub h: Option<DVector<f64>>,
    /// Which variables carry an integrality constraint. Same order as `c`.
    pub integrality: FixedBitSet,
}

impl MilpProblem {
    /// The number of decision variables.
    #[inline]
    pub fn num_variables(&self) -> usize {
        self.c.len()
    }

    /// Asserts the shape invariants of the problem.
    ///
    /// # Panics
    ///
    /// Panics on any dimension mismatch, on a dangling matrix/vector pair,
    /// or when both constraint blocks are absent. Inconsistent shapes are
    /// programmer errors and abort the solve.
    pub fn validate(&self) {
        let n = self.c.len();

        assert!(
            self.a.is_some() || self.g.is_some(),
            "no constraint matrices provided: at least one of A and G must be present"
        );
        assert_eq!(
            self.integrality.len(),
            n,
            "integrality mask length {} does not match the number of variables {}",
            self.integrality.len(),
            n
        );

        match (&self.a, &self.b) {
            (Some(a), Some(b)) => {
                assert_eq!(
                    a.nrows(),
                    b.len(),
                    "number of rows in A ({}) is not equal to the length of b ({})",
                    a.nrows(),
                    b.len()
                );
                assert_eq!(
                    a.ncols(),
                    n,
                    "number of columns in A ({}) is not equal to the number of variables ({})",
                    a.ncols(),
                    n
                );
            }
            (None, None) => {}
            _ => panic!("A matrix and b vector must be provided together"),
        }

        match (&self.g, &self.h) {
            (Some(g), Some(h)) => {
                assert_eq!(
                    g.nrows(),
                    h.len(),
                    "number of rows in G ({}) is not equal to the length of h ({})",
                    g.nrows(),
                    h.len()
                );
                assert_eq!(
                    g.ncols(),
                    n,
                    "number of columns in G ({}) is not equal to the number of variables ({})",
                    g.ncols(),
                    n
                );
            }
            (None, None) => {}
            _ => panic!("G matrix and h vector must be provided together"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask(bits: &[bool]) -> FixedBitSet {
        let mut m = FixedBitSet::with_capacity(bits.len());
        for (i, &bit) in bits.iter().enumerate() {
            if bit {
                m.insert(i);
            }
        }
        m
    }

    #[test]
    fn test_validate_accepts_consistent_problem() {
        let problem = MilpProblem {
            c: DVector::from_vec(vec![-1.0, -2.0]),
            a: Some(DMatrix::from_row_slice(1, 2, &[1.0, 1.0])),
            b: Some(DVector::from_vec(vec![4.0])),
            g: Some(DMatrix::from_row_slice(1, 2, &[1.0, 0.0])),
            h: Some(DVector::from_vec(vec![2.0])),
            integrality: mask(&[false, true]),
        };
        problem.validate();
    }

    #[test]
    #[should_panic(expected = "at least one of A and G")]
    fn test_validate_rejects_missing_constraints() {
        let problem = MilpProblem {
            c: DVector::from_vec(vec![1.0]),
            a: None,
            b: None,
            g: None,
            h: None,
            integrality: mask(&[false]),
        };
        problem.validate();
    }

    #[test]
    #[should_panic(expected = "not equal to the length of b")]
    fn test_validate_rejects_row_mismatch() {
        let problem = MilpProblem {
            c: DVector::from_vec(vec![1.0, 2.0]),
            a: Some(DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 1.0])),
            b: Some(DVector::from_vec(vec![1.0])),
            g: None,
            h: None,
            integrality: mask(&[false, false]),
        };
        problem.validate();
    }

    #[test]
    #[should_panic(expected = "integrality mask length")]
    fn test_validate_rejects_mask_mismatch() {
        let problem = MilpProblem {
            c: DVector::from_vec(vec![1.0, 2.0]),
            a: Some(DMatrix::from_row_slice(1, 2, &[1.0, 1.0])),
            b: Some(DVector::from_vec(vec![1.0])),
            g: None,
            h: None,
            integrality: mask(&[false]),
        };
        problem.validate();
    }
}
