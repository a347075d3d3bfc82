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

//! # The Enumeration Tree Engine
//!
//! Concurrent branch-and-bound traversal over a pool of LP solver workers.
//!
//! ## Why the queue is split
//!
//! Feeding subproblems to a worker pool over one bounded channel deadlocks:
//! every decided subproblem can spawn two children, so producers and
//! consumers of the same channel can fill it and wedge. The engine therefore
//! splits the path into an **inbox** (rendezvous hand-off for new
//! subproblems), an in-memory **unbounded buffer** owned by a dedicated
//! manager thread, and an **active** rendezvous channel feeding the workers.
//! The manager's select registers its outbound send only while the buffer is
//! non-empty — the optional-send technique that keeps the inbox drained at
//! all times.
//!
//! Candidate solutions travel back over a channel with capacity equal to the
//! worker count, and workers additionally select against the engine's
//! shutdown signal while posting, so a cancelled engine never strands a
//! worker mid-send.
//!
//! ## Single-writer incumbent
//!
//! The decision loop runs on the caller's thread and is the only reader and
//! writer of the incumbent; no lock is needed. A single `work_in_progress`
//! counter tracks outstanding subproblems: incremented at enqueue time,
//! incremented twice per branch before the parent's decrement, decremented
//! once per decided candidate — it never transiently hits zero while work
//! remains.

use crate::branching::select_branch_variable;
use crate::cancel::Cancellation;
use crate::candidate::Candidate;
use crate::decision::BnbDecision;
use crate::monitor::SearchMonitor;
use crate::result::{SearchOutcome, SearchResult};
use crate::stats::SearchStatistics;
use crate::subproblem::SubProblem;
use capstan_lp::{LinearSolver, LpFailure};
use crossbeam_channel::{bounded, select, Receiver, Select, Sender};
use nalgebra::DVector;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Tunables of one enumeration-tree traversal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchConfig {
    /// The number of parallel LP solver workers, `>= 1`. Each worker is a
    /// potentially concurrent Simplex run, so this is primarily a
    /// space-complexity knob.
    pub workers: usize,
    /// How far a value may sit from an integer and still count as integral.
    pub integrality_tolerance: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            workers: 1,
            integrality_tolerance: 1e-6,
        }
    }
}

/// The branch-and-bound scheduler.
///
/// Owns nothing but configuration and borrowed collaborators; all per-run
/// state lives in the search session, so one engine can run many searches.
pub struct EnumerationTree<'a, S, M> {
    backend: &'a S,
    monitor: &'a M,
    config: SearchConfig,
}

impl<'a, S, M> EnumerationTree<'a, S, M>
where
    S: LinearSolver + Sync,
    M: SearchMonitor,
{
    /// Creates an engine over the given backend and instrumentation sink.
    ///
    /// # Panics
    ///
    /// Panics when the configured worker count is zero.
    pub fn new(backend: &'a S, monitor: &'a M, config: SearchConfig) -> Self {
        assert!(
            config.workers >= 1,
            "number of workers may not be lower than one"
        );
        Self {
            backend,
            monitor,
            config,
        }
    }

    /// Runs the branch-and-bound search to exhaustion or cancellation.
    ///
    /// The root relaxation is solved synchronously before any worker is
    /// started: an infeasible root returns immediately, and a root that
    /// already satisfies all integrality constraints is returned without
    /// ever spawning the machinery.
    pub fn search(&self, root: SubProblem, cancellation: &Cancellation) -> SearchOutcome {
        let mut stats = SearchStatistics::default();

        let root = Arc::new(root);
        stats.on_subproblem_enqueued();
        self.monitor.on_subproblem(&root);

        let outcome = root.solve_relaxation(self.backend);
        let root_candidate = Candidate::new(Arc::clone(&root), outcome);

        match root_candidate.outcome() {
            Err(LpFailure::Infeasible) => {
                stats.on_decision(BnbDecision::SubproblemInfeasible);
                self.monitor
                    .on_decision(&root_candidate, BnbDecision::SubproblemInfeasible);
                return SearchOutcome::new(SearchResult::RootInfeasible, stats);
            }
            Err(LpFailure::Singular) => {
                stats.on_decision(BnbDecision::SubproblemSingular);
                self.monitor
                    .on_decision(&root_candidate, BnbDecision::SubproblemSingular);
                return SearchOutcome::new(SearchResult::RootInfeasible, stats);
            }
            Err(failure) => panic!("LP backend failed fatally on the root relaxation: {}", failure),
            Ok(_) => {}
        }

        if root_candidate.is_integer_feasible(self.config.integrality_tolerance) {
            stats.on_decision(BnbDecision::InitialRelaxationFeasible);
            self.monitor
                .on_decision(&root_candidate, BnbDecision::InitialRelaxationFeasible);
            return SearchOutcome::new(SearchResult::Optimal(root_candidate), stats);
        }

        self.run_search(root_candidate, cancellation, stats)
    }

    /// Spawns the buffer manager and worker pool, then drives the decision
    /// loop on the calling thread until the work counter drains or the
    /// cancellation signal fires.
    fn run_search(
        &self,
        root_candidate: Candidate,
        cancellation: &Cancellation,
        stats: SearchStatistics,
    ) -> SearchOutcome {
        let (inbox_tx, inbox_rx) = bounded::<Arc<SubProblem>>(0);
        let (active_tx, active_rx) = bounded::<Arc<SubProblem>>(0);
        let (candidate_tx, candidate_rx) = bounded::<Candidate>(self.config.workers);
        let (shutdown_tx, shutdown_rx) = bounded::<()>(0);

        let mut cancelled = false;

        let (incumbent, stats) = std::thread::scope(|scope| {
            {
                let shutdown = shutdown_rx.clone();
                scope.spawn(move || buffer_manager(inbox_rx, active_tx, shutdown));
            }
            for _ in 0..self.config.workers {
                let active = active_rx.clone();
                let posts = candidate_tx.clone();
                let shutdown = shutdown_rx.clone();
                let backend = self.backend;
                scope.spawn(move || solver_worker(backend, active, posts, shutdown));
            }
            // The threads hold their own clones; dropping the originals lets
            // disconnects propagate once the session shuts down.
            drop(active_rx);
            drop(candidate_tx);
            drop(shutdown_rx);

            let mut session = SearchSession {
                monitor: self.monitor,
                tolerance: self.config.integrality_tolerance,
                inbox: inbox_tx,
                work_in_progress: AtomicUsize::new(0),
                incumbent: None,
                next_id: 1,
                stats,
            };

            // The root was already solved; its candidate enters the normal
            // decision procedure and seeds the tree.
            session.decide(root_candidate);

            while session.work_in_progress.load(Ordering::Acquire) > 0 {
                select! {
                    recv(candidate_rx) -> message => {
                        let candidate = message
                            .expect("candidate channel closed while work is outstanding");
                        session.decide(candidate);
                        session.work_in_progress.fetch_sub(1, Ordering::AcqRel);
                    }
                    recv(cancellation.signal()) -> _ => {
                        cancelled = true;
                        break;
                    }
                }
            }

            let SearchSession {
                inbox,
                incumbent,
                stats,
                ..
            } = session;
            // Closing the inbox lets the buffer manager finish; closing the
            // shutdown channel releases it and any worker stuck posting a
            // candidate nobody will decide on.
            drop(inbox);
            drop(shutdown_tx);
            while candidate_rx.recv().is_ok() {}

            (incumbent, stats)
        });

        let result = if cancelled {
            SearchResult::Cancelled(incumbent)
        } else {
            match incumbent {
                Some(best) => SearchResult::Optimal(best),
                None => SearchResult::NoIntegerSolution,
            }
        };
        SearchOutcome::new(result, stats)
    }
}

/// The per-run state of the decision loop. Lives on the caller's thread;
/// nothing here is shared, which is what makes the incumbent lock-free.
struct SearchSession<'m, M> {
    monitor: &'m M,
    tolerance: f64,
    inbox: Sender<Arc<SubProblem>>,
    work_in_progress: AtomicUsize,
    incumbent: Option<Candidate>,
    next_id: u64,
    stats: SearchStatistics,
}

impl<M: SearchMonitor> SearchSession<'_, M> {
    /// Applies the decision rule to one candidate: prune, install as
    /// incumbent, or branch and resubmit.
    fn decide(&mut self, candidate: Candidate) {
        let decision = match candidate.outcome() {
            Err(LpFailure::Infeasible) => BnbDecision::SubproblemInfeasible,
            Err(LpFailure::Singular) => BnbDecision::SubproblemSingular,
            Err(failure) => panic!(
                "LP backend failed fatally on subproblem {}: {}",
                candidate.subproblem().id(),
                failure
            ),
            Ok(relaxation) => {
                let incumbent_objective = self
                    .incumbent
                    .as_ref()
                    .and_then(Candidate::objective)
                    .unwrap_or(f64::INFINITY);

                if incumbent_objective <= relaxation.objective {
                    BnbDecision::WorseThanIncumbent
                } else if candidate.is_integer_feasible(self.tolerance) {
                    BnbDecision::BetterFeasible
                } else {
                    self.branch(&candidate, &relaxation.x);
                    BnbDecision::BetterBranching
                }
            }
        };

        self.stats.on_decision(decision);
        self.monitor.on_decision(&candidate, decision);

        if decision == BnbDecision::BetterFeasible {
            self.incumbent = Some(candidate);
        }
    }

    /// Splits the candidate's subproblem on the selected variable:
    /// `x_j <= floor(v)` on one side, `x_j >= floor(v) + 1` (encoded as
    /// `-x_j <= -(floor(v) + 1)`) on the other.
    fn branch(&mut self, candidate: &Candidate, x: &DVector<f64>) {
        let subproblem = candidate.subproblem();
        let variable = select_branch_variable(x, subproblem);
        let value = x[variable].floor();

        let floor_child = subproblem.child(self.next_id, variable, 1.0, value);
        self.next_id += 1;
        let ceiling_child = subproblem.child(self.next_id, variable, -1.0, -(value + 1.0));
        self.next_id += 1;

        self.submit(Arc::new(floor_child));
        self.submit(Arc::new(ceiling_child));
    }

    /// Hands a subproblem to the buffer manager. The instrumentation sink
    /// sees it here, before any worker can reach it.
    fn submit(&mut self, subproblem: Arc<SubProblem>) {
        self.work_in_progress.fetch_add(1, Ordering::AcqRel);
        self.stats.on_subproblem_enqueued();
        self.monitor.on_subproblem(&subproblem);
        self.inbox
            .send(subproblem)
            .expect("buffer manager disappeared while the engine is running");
    }
}

/// Owns the unbounded in-memory buffer between the inbox and the workers.
///
/// The outbound send is registered with the select only while the buffer
/// holds something, so the inbox and the shutdown signal stay serviced at
/// all times.
fn buffer_manager(
    inbox: Receiver<Arc<SubProblem>>,
    active: Sender<Arc<SubProblem>>,
    shutdown: Receiver<()>,
) {
    let mut buffer: VecDeque<Arc<SubProblem>> = VecDeque::new();

    loop {
        let mut select = Select::new();
        let inbox_op = select.recv(&inbox);
        let shutdown_op = select.recv(&shutdown);
        let send_op = (!buffer.is_empty()).then(|| select.send(&active));

        let operation = select.select();
        let index = operation.index();

        if index == inbox_op {
            match operation.recv(&inbox) {
                Ok(subproblem) => buffer.push_back(subproblem),
                // The engine closed the inbox after a clean drain; nothing
                // outstanding remains.
                Err(_) => break,
            }
        } else if index == shutdown_op {
            // Cancellation: whatever is still buffered will never be solved.
            let _ = operation.recv(&shutdown);
            buffer.clear();
            break;
        } else if Some(index) == send_op {
            let next = buffer
                .pop_front()
                .expect("send operation enabled with an empty buffer");
            if operation.send(&active, next).is_err() {
                break;
            }
        }
    }
    // Dropping `active` here closes the worker feed.
}

/// One solver worker: receive a subproblem, run the backend on its
/// relaxation, post the candidate back. Posting also watches the shutdown
/// signal so a cancelled engine never wedges a worker.
fn solver_worker<S: LinearSolver>(
    backend: &S,
    active: Receiver<Arc<SubProblem>>,
    candidates: Sender<Candidate>,
    shutdown: Receiver<()>,
) {
    while let Ok(subproblem) = active.recv() {
        let outcome = subproblem.solve_relaxation(backend);
        let candidate = Candidate::new(subproblem, outcome);
        select! {
            send(candidates, candidate) -> result => {
                if result.is_err() {
                    return;
                }
            }
            recv(shutdown) -> _ => return,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branching::BranchRule;
    use crate::monitor::dot::DotTreeMonitor;
    use crate::monitor::no_op::NoOpMonitor;
    use capstan_lp::{DenseSimplex, LpSolution};
    use fixedbitset::FixedBitSet;
    use nalgebra::DMatrix;
    use std::sync::Mutex;
    use std::time::Duration;

    const TOL: f64 = 1e-6;

    fn mask(bits: &[bool]) -> FixedBitSet {
        let mut m = FixedBitSet::with_capacity(bits.len());
        for (i, &bit) in bits.iter().enumerate() {
            if bit {
                m.insert(i);
            }
        }
        m
    }

    fn config(workers: usize) -> SearchConfig {
        SearchConfig {
            workers,
            integrality_tolerance: 1e-6,
        }
    }

    /// minimize -x1 - 2*x2 subject to
    ///   -x1 + 2*x2 + x3 = 4
    ///  3*x1 +   x2 + x4 = 9
    fn scenario_no_integrality() -> SubProblem {
        SubProblem::root(
            DVector::from_row_slice(&[-1.0, -2.0, 0.0, 0.0]),
            Some(DMatrix::from_row_slice(
                2,
                4,
                &[-1.0, 2.0, 1.0, 0.0, 3.0, 1.0, 0.0, 1.0],
            )),
            Some(DVector::from_row_slice(&[4.0, 9.0])),
            None,
            None,
            mask(&[false; 4]),
            BranchRule::MaxFun,
        )
    }

    /// Same shape with fractional data and x2 integer-constrained.
    fn scenario_one_integer(rule: BranchRule) -> SubProblem {
        SubProblem::root(
            DVector::from_row_slice(&[-1.0, -2.0, 0.0, 0.0]),
            Some(DMatrix::from_row_slice(
                2,
                4,
                &[-1.0, 2.6, 1.0, 0.0, 3.0, 1.1, 0.0, 1.0],
            )),
            Some(DVector::from_row_slice(&[4.0, 9.0])),
            None,
            None,
            mask(&[false, true, false, false]),
            rule,
        )
    }

    fn optimal(outcome: SearchOutcome) -> Candidate {
        match outcome.into_result() {
            SearchResult::Optimal(candidate) => candidate,
            other => panic!("expected an optimal result, got {}", other),
        }
    }

    #[test]
    fn test_relaxation_is_returned_when_nothing_is_integral() {
        let backend = DenseSimplex::new();
        let monitor = NoOpMonitor::new();
        let engine = EnumerationTree::new(&backend, &monitor, config(1));

        let outcome = engine.search(scenario_no_integrality(), &Cancellation::none());
        assert_eq!(outcome.statistics().branches(), 0, "no branching may occur");

        let best = optimal(outcome);
        let x = best.x().expect("optimal candidate carries a solution");
        assert!((best.objective().unwrap() - -8.0).abs() < TOL);
        assert!((x[0] - 2.0).abs() < TOL);
        assert!((x[1] - 3.0).abs() < TOL);
    }

    #[test]
    fn test_single_integer_variable_is_branched_to_optimality() {
        let backend = DenseSimplex::new();
        let monitor = NoOpMonitor::new();
        let engine = EnumerationTree::new(&backend, &monitor, config(1));

        let outcome = engine.search(
            scenario_one_integer(BranchRule::MaxFun),
            &Cancellation::none(),
        );
        assert!(outcome.statistics().branches() >= 1, "the root is fractional");

        let best = optimal(outcome);
        let x = best.x().expect("optimal candidate carries a solution");
        assert!(
            (best.objective().unwrap() - -6.266_666_6).abs() < 1e-4,
            "z = {:?}",
            best.objective()
        );
        assert!((x[0] - 2.266_666_6).abs() < 1e-4);
        assert!((x[1] - 2.0).abs() < TOL);
        assert!((x[2] - 1.066_666_6).abs() < 1e-4);
        assert!(x[3].abs() < TOL);
    }

    #[test]
    fn test_all_branch_rules_reach_the_same_optimum() {
        for rule in [BranchRule::MaxFun, BranchRule::MostInfeasible, BranchRule::Naive] {
            let backend = DenseSimplex::new();
            let monitor = NoOpMonitor::new();
            let engine = EnumerationTree::new(&backend, &monitor, config(1));

            let outcome = engine.search(scenario_one_integer(rule), &Cancellation::none());
            let best = optimal(outcome);
            assert!(
                (best.objective().unwrap() - -6.266_666_6).abs() < 1e-4,
                "rule {} missed the optimum: {:?}",
                rule,
                best.objective()
            );
        }
    }

    #[test]
    fn test_inequality_root_with_integer_slack_pattern() {
        // minimize -x1 - 2*x2 + x3 subject to
        //  -2*x1 + 2.6*x2 + 2*x3 = 4
        //   6*x1 + 1.1*x2 +   x3 = 9
        //        -x1             <= -1        (x1 >= 1)
        // with x3 integer. The relaxation optimum already has x3 = 0.
        let backend = DenseSimplex::new();
        let monitor = NoOpMonitor::new();
        let engine = EnumerationTree::new(&backend, &monitor, config(1));

        let root = SubProblem::root(
            DVector::from_row_slice(&[-1.0, -2.0, 1.0]),
            Some(DMatrix::from_row_slice(
                2,
                3,
                &[-2.0, 2.6, 2.0, 6.0, 1.1, 1.0],
            )),
            Some(DVector::from_row_slice(&[4.0, 9.0])),
            Some(DMatrix::from_row_slice(1, 3, &[-1.0, 0.0, 0.0])),
            Some(DVector::from_row_slice(&[-1.0])),
            mask(&[false, false, true]),
            BranchRule::MaxFun,
        );

        let best = optimal(engine.search(root, &Cancellation::none()));
        let x = best.x().expect("optimal candidate carries a solution");
        assert!(
            (best.objective().unwrap() - -5.786_516_8).abs() < 1e-4,
            "z = {:?}",
            best.objective()
        );
        assert!((x[0] - 1.067_415_7).abs() < 1e-4);
        assert!((x[1] - 2.359_550_5).abs() < 1e-4);
        assert!(x[2].abs() < TOL);
    }

    #[test]
    fn test_root_infeasibility_is_reported_without_workers() {
        // x1 = -1 with x1 >= 0 is infeasible.
        let backend = DenseSimplex::new();
        let monitor = DotTreeMonitor::new();
        let engine = EnumerationTree::new(&backend, &monitor, config(1));

        let root = SubProblem::root(
            DVector::from_row_slice(&[1.0]),
            Some(DMatrix::from_row_slice(1, 1, &[1.0])),
            Some(DVector::from_row_slice(&[-1.0])),
            None,
            None,
            mask(&[false]),
            BranchRule::MaxFun,
        );

        let outcome = engine.search(root, &Cancellation::none());
        assert!(matches!(outcome.result(), SearchResult::RootInfeasible));
        assert_eq!(monitor.num_nodes(), 1, "only the root is ever enqueued");
    }

    #[test]
    fn test_no_integer_feasible_solution() {
        // 3*x = 2 forces x = 2/3; both branches (x <= 0 and x >= 1) are
        // infeasible, so the tree exhausts without an incumbent.
        let backend = DenseSimplex::new();
        let monitor = NoOpMonitor::new();
        let engine = EnumerationTree::new(&backend, &monitor, config(1));

        let root = SubProblem::root(
            DVector::from_row_slice(&[1.0]),
            Some(DMatrix::from_row_slice(1, 1, &[3.0])),
            Some(DVector::from_row_slice(&[2.0])),
            None,
            None,
            mask(&[true]),
            BranchRule::MaxFun,
        );

        let outcome = engine.search(root, &Cancellation::none());
        assert!(matches!(outcome.result(), SearchResult::NoIntegerSolution));
        assert_eq!(outcome.statistics().branches(), 1);
        assert_eq!(outcome.statistics().pruned_infeasible(), 2);
    }

    #[test]
    fn test_integer_feasible_root_returns_without_branching_for_every_rule() {
        // x1 = 1, x2 = 2: the relaxation is already integral.
        for rule in [BranchRule::MaxFun, BranchRule::MostInfeasible, BranchRule::Naive] {
            let backend = DenseSimplex::new();
            let monitor = NoOpMonitor::new();
            let engine = EnumerationTree::new(&backend, &monitor, config(1));

            let root = SubProblem::root(
                DVector::from_row_slice(&[1.0, 1.0]),
                Some(DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 1.0])),
                Some(DVector::from_row_slice(&[1.0, 2.0])),
                None,
                None,
                mask(&[true, true]),
                rule,
            );

            let outcome = engine.search(root, &Cancellation::none());
            assert_eq!(
                outcome.statistics().branches(),
                0,
                "rule {} must not branch on an integral root",
                rule
            );
            let best = optimal(outcome);
            assert!((best.objective().unwrap() - 3.0).abs() < TOL);
        }
    }

    /// Records every installed incumbent objective.
    struct IncumbentRecorder {
        objectives: Mutex<Vec<f64>>,
    }

    impl IncumbentRecorder {
        fn new() -> Self {
            Self {
                objectives: Mutex::new(Vec::new()),
            }
        }
    }

    impl SearchMonitor for IncumbentRecorder {
        fn name(&self) -> &str {
            "IncumbentRecorder"
        }

        fn on_subproblem(&self, _subproblem: &SubProblem) {}

        fn on_decision(&self, candidate: &Candidate, decision: BnbDecision) {
            if decision == BnbDecision::BetterFeasible {
                self.objectives
                    .lock()
                    .unwrap()
                    .push(candidate.objective().expect("feasible candidate has z"));
            }
        }
    }

    #[test]
    fn test_incumbent_objectives_strictly_decrease() {
        // minimize -x1 - x2 with x1, x2 integer, boxed by x_i <= 2.5. The
        // optimum is (2, 2); on the way there several incumbents may be
        // installed, each strictly better than the last.
        let backend = DenseSimplex::new();
        let monitor = IncumbentRecorder::new();
        let engine = EnumerationTree::new(&backend, &monitor, config(2));

        let root = SubProblem::root(
            DVector::from_row_slice(&[-1.0, -1.0]),
            None,
            None,
            Some(DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 1.0])),
            Some(DVector::from_row_slice(&[2.5, 2.5])),
            mask(&[true, true]),
            BranchRule::MostInfeasible,
        );

        let outcome = engine.search(root, &Cancellation::none());
        let best = optimal(outcome);
        assert!((best.objective().unwrap() - -4.0).abs() < TOL);

        let objectives = monitor.objectives.lock().unwrap();
        assert!(!objectives.is_empty(), "the optimum must have been installed");
        for pair in objectives.windows(2) {
            assert!(
                pair[1] < pair[0],
                "incumbent objective must strictly decrease: {:?}",
                *objectives
            );
        }
        assert!((objectives.last().unwrap() - -4.0).abs() < TOL);
    }

    #[test]
    fn test_worker_pool_reaches_the_same_optimum() {
        for workers in [1, 2, 4] {
            let backend = DenseSimplex::new();
            let monitor = NoOpMonitor::new();
            let engine = EnumerationTree::new(&backend, &monitor, config(workers));

            let outcome = engine.search(
                scenario_one_integer(BranchRule::MaxFun),
                &Cancellation::none(),
            );
            let best = optimal(outcome);
            assert!(
                (best.objective().unwrap() - -6.266_666_6).abs() < 1e-4,
                "{} workers missed the optimum",
                workers
            );
        }
    }

    /// A backend whose relaxations are always feasible and always fractional,
    /// producing an enumeration tree that never exhausts. Used to exercise
    /// cancellation: only the external deadline terminates this search.
    struct ForeverFractional;

    impl LinearSolver for ForeverFractional {
        fn solve(
            &self,
            c: &DVector<f64>,
            _a: &DMatrix<f64>,
            _b: &DVector<f64>,
        ) -> Result<LpSolution, LpFailure> {
            std::thread::sleep(Duration::from_millis(1));
            Ok(LpSolution {
                objective: -1.0,
                x: DVector::from_element(c.len(), 0.5),
            })
        }
    }

    fn endless_root() -> SubProblem {
        SubProblem::root(
            DVector::from_row_slice(&[1.0, 1.0, 1.0]),
            Some(DMatrix::from_row_slice(1, 3, &[1.0, 1.0, 1.0])),
            Some(DVector::from_row_slice(&[1.5])),
            None,
            None,
            mask(&[true, true, true]),
            BranchRule::Naive,
        )
    }

    #[test]
    fn test_deadline_cancellation_returns_without_incumbent() {
        let backend = ForeverFractional;
        let monitor = DotTreeMonitor::new();
        let engine = EnumerationTree::new(&backend, &monitor, config(2));

        let cancellation = Cancellation::deadline(Duration::from_millis(50));
        let outcome = engine.search(endless_root(), &cancellation);

        match outcome.result() {
            SearchResult::Cancelled(incumbent) => {
                assert!(incumbent.is_none(), "nothing integral is ever found")
            }
            other => panic!("expected cancellation, got {}", other),
        }
        assert!(monitor.num_nodes() >= 1, "the sink saw at least the root");
        assert!(monitor.num_decided() >= 1, "the sink saw at least one decision");
    }

    #[test]
    fn test_manual_cancellation_keeps_the_incumbent() {
        // A backend that alternates: first call yields an integral solution,
        // later calls stay fractional forever. The incumbent from the first
        // decision must survive cancellation.
        struct FeasibleThenFractional {
            calls: AtomicUsize,
        }

        impl LinearSolver for FeasibleThenFractional {
            fn solve(
                &self,
                c: &DVector<f64>,
                _a: &DMatrix<f64>,
                _b: &DVector<f64>,
            ) -> Result<LpSolution, LpFailure> {
                std::thread::sleep(Duration::from_millis(1));
                let call = self.calls.fetch_add(1, Ordering::Relaxed);
                if call == 0 {
                    // Fractional root so the machinery actually starts.
                    Ok(LpSolution {
                        objective: -1.0,
                        x: DVector::from_element(c.len(), 0.5),
                    })
                } else if call == 1 {
                    Ok(LpSolution {
                        objective: -2.0,
                        x: DVector::from_element(c.len(), 1.0),
                    })
                } else {
                    // Strictly better than the incumbent, so the tree keeps
                    // branching until the deadline fires.
                    Ok(LpSolution {
                        objective: -3.0,
                        x: DVector::from_element(c.len(), 0.5),
                    })
                }
            }
        }

        let backend = FeasibleThenFractional {
            calls: AtomicUsize::new(0),
        };
        let monitor = NoOpMonitor::new();
        let engine = EnumerationTree::new(&backend, &monitor, config(1));

        let cancellation = Cancellation::deadline(Duration::from_millis(50));
        let outcome = engine.search(endless_root(), &cancellation);

        match outcome.result() {
            SearchResult::Cancelled(Some(incumbent)) => {
                assert!((incumbent.objective().unwrap() - -2.0).abs() < TOL);
            }
            other => panic!("expected cancellation with an incumbent, got {}", other),
        }
    }

    #[test]
    #[should_panic(expected = "number of workers may not be lower than one")]
    fn test_zero_workers_panics() {
        let backend = DenseSimplex::new();
        let monitor = NoOpMonitor::new();
        let _ = EnumerationTree::new(
            &backend,
            &monitor,
            SearchConfig {
                workers: 0,
                integrality_tolerance: 1e-6,
            },
        );
    }
}
