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

//! Conversion of general-form LPs to standard equality form.
//!
//! One non-negative slack variable per inequality row folds `G x <= h` into
//! the equality block, producing a program the continuous backend accepts:
//!
//! ```text
//! c' = [c | 0 .. 0]          (one zero per slack)
//! A' = [ A | 0 ]             (absent when A is absent)
//!      [ G | I ]
//! b' = [b | h]
//! ```
//!
//! Slack variables inherit the universal non-negativity constraint, carry a
//! zero objective coefficient, and are never integrality-constrained.

use nalgebra::{DMatrix, DVector};

/// Folds the inequality block into an equality-only program.
///
/// # Panics
///
/// Panics on any dimension mismatch between the inputs; inconsistent shapes
/// are programmer errors.
pub fn convert_to_equalities(
    c: &DVector<f64>,
    a: Option<&DMatrix<f64>>,
    b: Option<&DVector<f64>>,
    g: &DMatrix<f64>,
    h: &DVector<f64>,
) -> (DVector<f64>, DMatrix<f64>, DVector<f64>) {
    let n = c.len();
    let num_eq = b.map_or(0, |b| b.len());
    let num_ineq = h.len();

    assert_eq!(
        g.nrows(),
        num_ineq,
        "number of rows in G ({}) is not equal to the length of h ({})",
        g.nrows(),
        num_ineq
    );
    assert_eq!(
        g.ncols(),
        n,
        "number of columns in G ({}) is not equal to the number of variables ({})",
        g.ncols(),
        n
    );
    if let Some(a) = a {
        assert_eq!(
            a.nrows(),
            num_eq,
            "number of rows in A ({}) is not equal to the length of b ({})",
            a.nrows(),
            num_eq
        );
        assert_eq!(
            a.ncols(),
            n,
            "number of columns in A ({}) is not equal to the number of variables ({})",
            a.ncols(),
            n
        );
    } else {
        assert_eq!(num_eq, 0, "b vector is present while the A matrix is absent");
    }

    let new_vars = n + num_ineq;
    let new_rows = num_eq + num_ineq;

    let mut c_new = DVector::zeros(new_vars);
    c_new.rows_mut(0, n).copy_from(c);

    let mut b_new = DVector::zeros(new_rows);
    if let Some(b) = b {
        b_new.rows_mut(0, num_eq).copy_from(b);
    }
    b_new.rows_mut(num_eq, num_ineq).copy_from(h);

    let mut a_new = DMatrix::zeros(new_rows, new_vars);
    if let Some(a) = a {
        a_new.view_mut((0, 0), (num_eq, n)).copy_from(a);
    }
    a_new.view_mut((num_eq, 0), (num_ineq, n)).copy_from(g);
    for i in 0..num_ineq {
        a_new[(num_eq + i, n + i)] = 1.0;
    }

    (c_new, a_new, b_new)
}
