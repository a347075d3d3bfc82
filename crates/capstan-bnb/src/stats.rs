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

//! Aggregate counters describing one search run.

use crate::decision::BnbDecision;

/// What happened during one enumeration-tree traversal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStatistics {
    subproblems_enqueued: u64,
    candidates_decided: u64,
    incumbent_updates: u64,
    branches: u64,
    pruned_worse: u64,
    pruned_infeasible: u64,
    pruned_singular: u64,
}

impl SearchStatistics {
    /// The number of subproblems handed to the engine, the root included.
    #[inline]
    pub fn subproblems_enqueued(&self) -> u64 {
        self.subproblems_enqueued
    }

    /// The number of candidate solutions the decision loop processed.
    #[inline]
    pub fn candidates_decided(&self) -> u64 {
        self.candidates_decided
    }

    /// How often the incumbent was replaced by a strictly better candidate.
    #[inline]
    pub fn incumbent_updates(&self) -> u64 {
        self.incumbent_updates
    }

    /// The number of branching steps taken.
    #[inline]
    pub fn branches(&self) -> u64 {
        self.branches
    }

    /// Nodes pruned because they could not beat the incumbent.
    #[inline]
    pub fn pruned_worse(&self) -> u64 {
        self.pruned_worse
    }

    /// Nodes pruned because their relaxation was infeasible.
    #[inline]
    pub fn pruned_infeasible(&self) -> u64 {
        self.pruned_infeasible
    }

    /// Nodes pruned because their relaxation broke down on a singular basis.
    #[inline]
    pub fn pruned_singular(&self) -> u64 {
        self.pruned_singular
    }

    pub(crate) fn on_subproblem_enqueued(&mut self) {
        self.subproblems_enqueued += 1;
    }

    pub(crate) fn on_decision(&mut self, decision: BnbDecision) {
        self.candidates_decided += 1;
        match decision {
            BnbDecision::SubproblemInfeasible => self.pruned_infeasible += 1,
            BnbDecision::SubproblemSingular => self.pruned_singular += 1,
            BnbDecision::WorseThanIncumbent => self.pruned_worse += 1,
            BnbDecision::BetterBranching => self.branches += 1,
            BnbDecision::BetterFeasible | BnbDecision::InitialRelaxationFeasible => {
                self.incumbent_updates += 1
            }
        }
    }
}

impl std::fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchStatistics(enqueued: {}, decided: {}, branches: {}, incumbents: {}, \
             pruned worse/infeasible/singular: {}/{}/{})",
            self.subproblems_enqueued,
            self.candidates_decided,
            self.branches,
            self.incumbent_updates,
            self.pruned_worse,
            self.pruned_infeasible,
            self.pruned_singular
        )
    }
}
