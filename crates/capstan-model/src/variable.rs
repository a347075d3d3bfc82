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

//! Decision variables and their typed handles.

/// A strongly-typed handle to a variable registered with a [`Problem`].
///
/// The handle is only meaningful for the problem that issued it; using it
/// with a different problem is not detected and yields whichever variable
/// happens to occupy the same slot there.
///
/// [`Problem`]: crate::problem::Problem
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VariableId(usize);

impl VariableId {
    /// Creates a new variable handle from a raw index.
    #[inline]
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw index of this handle.
    #[inline]
    pub fn get(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for VariableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// A decision variable of a MILP problem.
///
/// Every variable carries an implicit non-negativity constraint; the lower
/// bound therefore defaults to `0` and the upper bound to `+inf`. A lower
/// bound at or below zero is subsumed by non-negativity and produces no
/// additional constraint row when the problem is lowered.
#[derive(Clone, Debug, PartialEq)]
pub struct Variable {
    name: String,
    coefficient: f64,
    integer: bool,
    lower: f64,
    upper: f64,
}

impl Variable {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            coefficient: 0.0,
            integer: false,
            lower: 0.0,
            upper: f64::INFINITY,
        }
    }

    /// The name this variable was declared with.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The coefficient of this variable in the objective function.
    #[inline]
    pub fn coefficient(&self) -> f64 {
        self.coefficient
    }

    /// Whether this variable is constrained to integer values.
    #[inline]
    pub fn is_integer(&self) -> bool {
        self.integer
    }

    /// The inclusive lower bound.
    #[inline]
    pub fn lower_bound(&self) -> f64 {
        self.lower
    }

    /// The inclusive upper bound.
    #[inline]
    pub fn upper_bound(&self) -> f64 {
        self.upper
    }

    pub(crate) fn set_coefficient(&mut self, coefficient: f64) {
        self.coefficient = coefficient;
    }

    pub(crate) fn set_integer(&mut self) {
        self.integer = true;
    }

    pub(crate) fn set_lower_bound(&mut self, bound: f64) {
        self.lower = bound;
    }

    pub(crate) fn set_upper_bound(&mut self, bound: f64) {
        self.upper = bound;
    }
}

impl std::fmt::Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = if self.integer { "int" } else { "cont" };
        write!(
            f,
            "{} ({}, coeff: {}, bounds: [{}, {}])",
            self.name, kind, self.coefficient, self.lower, self.upper
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_defaults() {
        let v = Variable::new("x1".to_string());
        assert_eq!(v.name(), "x1");
        assert_eq!(v.coefficient(), 0.0);
        assert!(!v.is_integer());
        assert_eq!(v.lower_bound(), 0.0);
        assert_eq!(v.upper_bound(), f64::INFINITY);
    }

    #[test]
    fn test_variable_id_roundtrip() {
        let id = VariableId::new(7);
        assert_eq!(id.get(), 7);
        assert_eq!(format!("{}", id), "x7");
    }
}
