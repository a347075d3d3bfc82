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

//! The decisions the engine can take for a candidate solution.

/// What the decision loop concluded about one candidate.
///
/// Exactly one decision is made per candidate and reported to the
/// instrumentation sink.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BnbDecision {
    /// The node's relaxation has no feasible point; the node is pruned.
    SubproblemInfeasible,
    /// The node's relaxation broke down on a singular basis; the node is
    /// pruned.
    SubproblemSingular,
    /// The relaxation optimum cannot improve on the incumbent; the node is
    /// pruned.
    WorseThanIncumbent,
    /// Better than the incumbent but fractional; the node was split into two
    /// children.
    BetterBranching,
    /// Better than the incumbent and integer-feasible; the candidate became
    /// the new incumbent.
    BetterFeasible,
    /// The root relaxation was already integer-feasible; the search finished
    /// without branching.
    InitialRelaxationFeasible,
}

impl std::fmt::Display for BnbDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            BnbDecision::SubproblemInfeasible => "subproblem has no feasible solution",
            BnbDecision::SubproblemSingular => "subproblem contains a singular matrix",
            BnbDecision::WorseThanIncumbent => "worse than incumbent",
            BnbDecision::BetterBranching => "better than incumbent but fractional, so branching",
            BnbDecision::BetterFeasible => {
                "better than incumbent and feasible, so replacing incumbent"
            }
            BnbDecision::InitialRelaxationFeasible => "initial relaxation is feasible",
        };
        write!(f, "{}", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_human_readable() {
        assert_eq!(
            BnbDecision::WorseThanIncumbent.to_string(),
            "worse than incumbent"
        );
        assert_eq!(
            BnbDecision::SubproblemInfeasible.to_string(),
            "subproblem has no feasible solution"
        );
    }
}
