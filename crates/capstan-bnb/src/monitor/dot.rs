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

//! # DOT Tree Recorder
//!
//! Records the enumeration tree as it is traversed and renders it as a
//! GraphViz DOT digraph: nodes colored by the decision taken, edges from
//! parent to child, subproblems that were enqueued but never decided (for
//! instance because the search was cancelled) rendered as unsolved.
//!
//! The recorder keeps its own graph keyed by subproblem id — it never holds
//! on to the subproblems themselves, so pruned nodes remain reclaimable.

use crate::candidate::Candidate;
use crate::decision::BnbDecision;
use crate::monitor::SearchMonitor;
use crate::subproblem::SubProblem;
use std::collections::BTreeMap;
use std::io;
use std::sync::Mutex;

/// One recorded node of the enumeration tree.
#[derive(Clone, Debug)]
struct TreeNode {
    parent: u64,
    objective: Option<f64>,
    decision: Option<BnbDecision>,
}

/// Records the enumeration tree and writes it as a DOT digraph.
#[derive(Debug, Default)]
pub struct DotTreeMonitor {
    nodes: Mutex<BTreeMap<u64, TreeNode>>,
}

impl DotTreeMonitor {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of subproblems seen so far.
    pub fn num_nodes(&self) -> usize {
        self.nodes.lock().unwrap().len()
    }

    /// The number of subproblems that received a decision.
    pub fn num_decided(&self) -> usize {
        self.nodes
            .lock()
            .unwrap()
            .values()
            .filter(|node| node.decision.is_some())
            .count()
    }

    /// Writes the recorded tree as a DOT digraph.
    pub fn write_dot<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        let nodes = self.nodes.lock().unwrap();

        writeln!(out, "digraph enumtree {{")?;
        writeln!(out, "node [fontname=Courier,shape=rectangle];")?;
        writeln!(out, "edge [color=Blue, style=dashed];")?;

        for (id, node) in nodes.iter() {
            let (color, tag) = match node.decision {
                Some(BnbDecision::BetterFeasible) => ("Green", "new incumbent!"),
                Some(BnbDecision::InitialRelaxationFeasible) => ("Green", "initial feasible"),
                Some(BnbDecision::SubproblemInfeasible) => ("Red", "infeasible"),
                Some(BnbDecision::SubproblemSingular) => ("Red", "singular"),
                Some(BnbDecision::WorseThanIncumbent) => ("Gray", "worse"),
                Some(BnbDecision::BetterBranching) => ("Black", "branching"),
                None => ("Pink", "unsolved"),
            };
            let label = match (node.decision.is_some(), node.objective) {
                (true, Some(z)) => format!("<Z={:.2} <BR /> id:{} <BR /> {} >", z, id, tag),
                (true, None) => format!("<id:{} <BR /> {} >", id, tag),
                (false, _) => "unsolved".to_string(),
            };
            writeln!(out, "{} [label={},color={}];", id, label, color)?;
        }

        for (id, node) in nodes.iter() {
            // The root's parent is itself by convention; skip the self-loop.
            if *id == node.parent {
                continue;
            }
            writeln!(out, "{} -> {} ;", node.parent, id)?;
        }

        writeln!(out, "}}")
    }
}

impl SearchMonitor for DotTreeMonitor {
    fn name(&self) -> &str {
        "DotTreeMonitor"
    }

    fn on_subproblem(&self, subproblem: &SubProblem) {
        let mut nodes = self.nodes.lock().unwrap();
        let previous = nodes.insert(
            subproblem.id(),
            TreeNode {
                parent: subproblem.parent(),
                objective: None,
                decision: None,
            },
        );
        assert!(
            previous.is_none(),
            "a node with id {} has already been recorded",
            subproblem.id()
        );
    }

    fn on_decision(&self, candidate: &Candidate, decision: BnbDecision) {
        let mut nodes = self.nodes.lock().unwrap();
        let node = nodes
            .get_mut(&candidate.subproblem().id())
            .unwrap_or_else(|| {
                panic!(
                    "decision for node {} which was never enqueued",
                    candidate.subproblem().id()
                )
            });
        node.objective = candidate.objective();
        node.decision = Some(decision);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branching::BranchRule;
    use capstan_lp::LpSolution;
    use fixedbitset::FixedBitSet;
    use nalgebra::{DMatrix, DVector};
    use std::sync::Arc;

    fn subproblem() -> Arc<SubProblem> {
        let mut mask = FixedBitSet::with_capacity(2);
        mask.insert(0);
        Arc::new(SubProblem::root(
            DVector::from_row_slice(&[1.0, 1.0]),
            Some(DMatrix::from_row_slice(1, 2, &[1.0, 1.0])),
            Some(DVector::from_row_slice(&[1.0])),
            None,
            None,
            mask,
            BranchRule::MaxFun,
        ))
    }

    fn candidate_for(subproblem: &Arc<SubProblem>, z: f64) -> Candidate {
        Candidate::new(
            Arc::clone(subproblem),
            Ok(LpSolution {
                objective: z,
                x: DVector::from_row_slice(&[0.5, 0.5]),
            }),
        )
    }

    #[test]
    fn test_nodes_and_edges_in_output() {
        let monitor = DotTreeMonitor::new();
        let root = subproblem();
        monitor.on_subproblem(&root);
        let child = Arc::new(root.child(1, 0, 1.0, 0.0));
        monitor.on_subproblem(&child);
        monitor.on_decision(&candidate_for(&root, -1.5), BnbDecision::BetterBranching);

        let mut out = Vec::new();
        monitor.write_dot(&mut out).unwrap();
        let dot = String::from_utf8(out).unwrap();

        assert!(dot.starts_with("digraph enumtree {"));
        assert!(dot.contains("branching"), "decided root must carry its tag");
        assert!(dot.contains("unsolved"), "undecided child must be unsolved");
        assert!(dot.contains("0 -> 1 ;"), "edge from parent to child");
        assert!(
            !dot.contains("0 -> 0"),
            "the root's self-loop must be skipped"
        );
    }

    #[test]
    #[should_panic(expected = "already been recorded")]
    fn test_duplicate_node_panics() {
        let monitor = DotTreeMonitor::new();
        let root = subproblem();
        monitor.on_subproblem(&root);
        monitor.on_subproblem(&root);
    }

    #[test]
    #[should_panic(expected = "never enqueued")]
    fn test_decision_for_unknown_node_panics() {
        let monitor = DotTreeMonitor::new();
        let root = subproblem();
        monitor.on_decision(&candidate_for(&root, 0.0), BnbDecision::WorseThanIncumbent);
    }

    #[test]
    fn test_decided_counter() {
        let monitor = DotTreeMonitor::new();
        let root = subproblem();
        monitor.on_subproblem(&root);
        assert_eq!(monitor.num_nodes(), 1);
        assert_eq!(monitor.num_decided(), 0);
        monitor.on_decision(&candidate_for(&root, 0.0), BnbDecision::WorseThanIncumbent);
        assert_eq!(monitor.num_decided(), 1);
    }
}
