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

//! Cyclic branching over the integer variables.

use crate::subproblem::SubProblem;

/// With no prior branches, picks the first integrality-constrained index.
/// Otherwise scans forward from the variable the last branch constrained,
/// wrapping around, and picks the next constrained index encountered.
pub fn select(subproblem: &SubProblem) -> usize {
    let integrality = subproblem.integrality();

    match subproblem.bnb_constraints().last() {
        None => integrality
            .ones()
            .next()
            .expect("no integrality-constrained variable to branch on"),
        Some(last) => {
            let n = subproblem.num_variables();
            let mut cursor = last.variable;
            loop {
                cursor = if cursor + 1 >= n { 0 } else { cursor + 1 };
                if integrality.contains(cursor) {
                    return cursor;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branching::BranchRule;
    use fixedbitset::FixedBitSet;
    use nalgebra::{DMatrix, DVector};

    fn subproblem(bits: &[bool]) -> SubProblem {
        let n = bits.len();
        let mut mask = FixedBitSet::with_capacity(n);
        for (i, &bit) in bits.iter().enumerate() {
            if bit {
                mask.insert(i);
            }
        }
        SubProblem::root(
            DVector::zeros(n),
            Some(DMatrix::zeros(1, n)),
            Some(DVector::zeros(1)),
            None,
            None,
            mask,
            BranchRule::Naive,
        )
    }

    #[test]
    fn test_without_history_picks_first_constrained_index() {
        let root = subproblem(&[false, true, true]);
        assert_eq!(select(&root), 1);
    }

    #[test]
    fn test_advances_past_the_last_branched_variable() {
        let root = subproblem(&[true, false, true]);
        let child = root.child(1, 0, 1.0, 2.0);
        assert_eq!(select(&child), 2);
    }

    #[test]
    fn test_wraps_around_the_variable_vector() {
        let root = subproblem(&[true, false, true]);
        let child = root.child(1, 2, 1.0, 2.0);
        assert_eq!(select(&child), 0);
    }

    #[test]
    fn test_single_constrained_variable_cycles_to_itself() {
        let root = subproblem(&[false, true, false]);
        let child = root.child(1, 1, 1.0, 2.0);
        assert_eq!(select(&child), 1);
    }
}
