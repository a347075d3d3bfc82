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

//! Linear constraints over weighted sums of variables.

use crate::variable::VariableId;

/// The relation a constraint imposes on its weighted sum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    /// The weighted sum must equal the right-hand side.
    Equal,
    /// The weighted sum must not exceed the right-hand side.
    LessOrEqual,
}

impl std::fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConstraintKind::Equal => write!(f, "="),
            ConstraintKind::LessOrEqual => write!(f, "<="),
        }
    }
}

/// A single linear constraint: a weighted sum of variables related to a
/// right-hand side by [`ConstraintKind`].
///
/// A freshly added constraint is an equality with right-hand side `0` until
/// finalized through the fluent handle.
#[derive(Clone, Debug, PartialEq)]
pub struct Constraint {
    terms: Vec<(VariableId, f64)>,
    kind: ConstraintKind,
    rhs: f64,
}

impl Constraint {
    pub(crate) fn new() -> Self {
        Self {
            terms: Vec::new(),
            kind: ConstraintKind::Equal,
            rhs: 0.0,
        }
    }

    /// The weighted terms making up the left-hand side, in insertion order.
    #[inline]
    pub fn terms(&self) -> &[(VariableId, f64)] {
        &self.terms
    }

    /// The relation between left-hand side and right-hand side.
    #[inline]
    pub fn kind(&self) -> ConstraintKind {
        self.kind
    }

    /// The right-hand side value.
    #[inline]
    pub fn rhs(&self) -> f64 {
        self.rhs
    }

    pub(crate) fn push_term(&mut self, variable: VariableId, coefficient: f64) {
        self.terms.push((variable, coefficient));
    }

    pub(crate) fn finalize(&mut self, kind: ConstraintKind, rhs: f64) {
        self.kind = kind;
        self.rhs = rhs;
    }
}

impl std::fmt::Display for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, (variable, coefficient)) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            write!(f, "{}*{}", coefficient, variable)?;
        }
        write!(f, " {} {}", self.kind, self.rhs)
    }
}
