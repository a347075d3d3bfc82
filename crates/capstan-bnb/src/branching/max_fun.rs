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

//! Branch on the integer variable with the largest `|c_j|`.

use fixedbitset::FixedBitSet;
use nalgebra::DVector;

/// Picks the integrality-constrained index maximizing the absolute objective
/// coefficient. The comparison is `>=` so a constrained variable is selected
/// even when every coefficient is zero, and ties go to the highest index.
pub fn select(c: &DVector<f64>, integrality: &FixedBitSet) -> usize {
    let mut candidate = None;
    let mut candidate_value = 0.0;

    for j in integrality.ones() {
        let value = c[j].abs();
        if candidate.is_none() || value >= candidate_value {
            candidate = Some(j);
            candidate_value = value;
        }
    }

    candidate.expect("no integrality-constrained variable to branch on")
}
