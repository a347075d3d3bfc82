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

//! Branch on the variable whose fractional part is closest to one half.

use fixedbitset::FixedBitSet;
use nalgebra::DVector;

/// Picks the integrality-constrained index whose relaxation value has the
/// fractional part closest to `0.5` — the most fractional variable. The
/// comparison is `<=` so a constrained variable is selected even when all of
/// them are integral, and ties go to the highest index.
pub fn select(x: &DVector<f64>, integrality: &FixedBitSet) -> usize {
    let mut candidate = None;
    let mut candidate_distance = f64::INFINITY;

    for j in integrality.ones() {
        let fractional = x[j] - x[j].floor();
        let distance = (0.5 - fractional).abs();
        if distance <= candidate_distance {
            candidate = Some(j);
            candidate_distance = distance;
        }
    }

    candidate.expect("no integrality-constrained variable to branch on")
}
