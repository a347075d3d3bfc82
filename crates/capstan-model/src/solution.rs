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

//! The user-facing result of a solved problem.

use crate::error::SolveError;
use indexmap::IndexMap;

/// The optimal objective value and per-variable values of a solved problem.
///
/// Variable values are keyed by name and iterate in declaration order.
#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    objective: f64,
    values: IndexMap<String, f64>,
}

impl Solution {
    /// Assembles a solution from `(name, value)` pairs in declaration order.
    pub fn new(objective: f64, values: impl IntoIterator<Item = (String, f64)>) -> Self {
        Self {
            objective,
            values: values.into_iter().collect(),
        }
    }

    /// The optimal objective value.
    #[inline]
    pub fn objective(&self) -> f64 {
        self.objective
    }

    /// Retrieves the value of a decision variable by its name.
    pub fn value(&self, name: &str) -> Result<f64, SolveError> {
        self.values
            .get(name)
            .copied()
            .ok_or_else(|| SolveError::VariableNotFound(name.to_string()))
    }

    /// Iterates over `(name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(name, &value)| (name.as_str(), value))
    }

    /// The number of variables in this solution.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether this solution carries no variables.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solution (objective: {})", self.objective)?;
        for (name, value) in self.iter() {
            writeln!(f, "  {} = {}", name, value)?;
        }
        Ok(())
    }
}
