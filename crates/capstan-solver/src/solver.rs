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

//! # The Solve Entry Point
//!
//! [`Solver`] wires the pipeline together: presolve the user problem, lower
//! it to a standard-form root subproblem, run the branch-and-bound engine,
//! and postsolve the incumbent back into the caller's variable layout.

use crate::presolve::Presolver;
use capstan_bnb::{
    BranchRule, Cancellation, EnumerationTree, NoOpMonitor, SearchConfig, SearchMonitor,
    SearchResult,
};
use capstan_lp::{DenseSimplex, LinearSolver};
use capstan_model::{Problem, SolveError, Solution};
use nalgebra::DVector;

/// Solves [`Problem`]s over a continuous LP backend.
///
/// Configured through a fluent builder style; defaults are one worker, the
/// `MaxFun` branching rule, and an integrality tolerance of `1e-6`.
pub struct Solver<S = DenseSimplex> {
    backend: S,
    workers: usize,
    branch_rule: BranchRule,
    integrality_tolerance: f64,
}

impl Default for Solver<DenseSimplex> {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver<DenseSimplex> {
    /// A solver over the bundled dense Simplex backend.
    pub fn new() -> Self {
        Self::with_backend(DenseSimplex::new())
    }
}

impl<S> Solver<S>
where
    S: LinearSolver + Sync,
{
    /// A solver over a caller-provided backend.
    pub fn with_backend(backend: S) -> Self {
        Self {
            backend,
            workers: 1,
            branch_rule: BranchRule::default(),
            integrality_tolerance: 1e-6,
        }
    }

    /// Sets the number of parallel solver workers (`>= 1`).
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Selects the branching rule.
    pub fn branch_rule(mut self, branch_rule: BranchRule) -> Self {
        self.branch_rule = branch_rule;
        self
    }

    /// Overrides the integrality tolerance.
    pub fn integrality_tolerance(mut self, tolerance: f64) -> Self {
        self.integrality_tolerance = tolerance;
        self
    }

    /// Solves the problem without instrumentation.
    pub fn solve(
        &self,
        problem: &Problem,
        cancellation: &Cancellation,
    ) -> Result<Solution, SolveError> {
        self.solve_with_monitor(problem, cancellation, &NoOpMonitor::new())
    }

    /// Solves the problem, reporting every subproblem and decision to the
    /// given instrumentation sink.
    pub fn solve_with_monitor<M: SearchMonitor>(
        &self,
        problem: &Problem,
        cancellation: &Cancellation,
        monitor: &M,
    ) -> Result<Solution, SolveError> {
        let mut presolver = Presolver::new();
        let reduced = presolver.presolve(problem)?;

        // Presolve may solve the whole program: every variable fixed, or
        // nothing left that a constraint touches.
        if reduced.num_variables() == 0 {
            return Ok(presolver.postsolve(&DVector::zeros(0), 0.0, problem));
        }
        let root = match presolver.to_root(&reduced, self.branch_rule)? {
            Some(root) => root,
            None => {
                let width = reduced.num_variables();
                return Ok(presolver.postsolve(&DVector::zeros(width), 0.0, problem));
            }
        };

        let config = SearchConfig {
            workers: self.workers,
            integrality_tolerance: self.integrality_tolerance,
        };
        let engine = EnumerationTree::new(&self.backend, monitor, config);
        let outcome = engine.search(root, cancellation);

        match outcome.into_result() {
            SearchResult::Optimal(best) => {
                let relaxation = best
                    .outcome()
                    .as_ref()
                    .expect("an optimal candidate carries a solution");
                Ok(presolver.postsolve(&relaxation.x, relaxation.objective, problem))
            }
            SearchResult::RootInfeasible => Err(SolveError::InitialRelaxationInfeasible),
            SearchResult::NoIntegerSolution => Err(SolveError::NoIntegerFeasibleSolution),
            SearchResult::Cancelled(best) => {
                let best = best.map(|incumbent| {
                    let relaxation = incumbent
                        .outcome()
                        .as_ref()
                        .expect("an incumbent carries a solution");
                    presolver.postsolve(&relaxation.x, relaxation.objective, problem)
                });
                Err(SolveError::Cancelled { best })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use capstan_bnb::DotTreeMonitor;
    use capstan_lp::{LpFailure, LpSolution};
    use nalgebra::DMatrix;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use std::time::Duration;

    const TOL: f64 = 1e-6;

    /// minimize -x1 - 2*x2 subject to
    ///   -x1 + 2*x2 + x3 = 4
    ///  3*x1 +   x2 + x4 = 9
    /// Optimal: z = -8 at x = (2, 3, 0, 0).
    #[test]
    fn test_two_equalities_without_integrality() {
        let mut problem = Problem::new();
        let x1 = problem.add_variable("x1").coefficient(-1.0).id();
        let x2 = problem.add_variable("x2").coefficient(-2.0).id();
        let x3 = problem.add_variable("x3").id();
        let x4 = problem.add_variable("x4").id();
        problem
            .add_constraint()
            .term(-1.0, x1)
            .term(2.0, x2)
            .term(1.0, x3)
            .equal_to(4.0);
        problem
            .add_constraint()
            .term(3.0, x1)
            .term(1.0, x2)
            .term(1.0, x4)
            .equal_to(9.0);

        let solution = Solver::new()
            .solve(&problem, &Cancellation::none())
            .expect("program is feasible and bounded");

        assert!((solution.objective() - -8.0).abs() < TOL);
        assert!((solution.value("x1").unwrap() - 2.0).abs() < TOL);
        assert!((solution.value("x2").unwrap() - 3.0).abs() < TOL);
        assert!(solution.value("x3").unwrap().abs() < TOL);
        assert!(solution.value("x4").unwrap().abs() < TOL);
    }

    /// Same shape with fractional data and x2 integer-constrained.
    /// Optimal: z ~ -6.2667 at x ~ (2.2667, 2, 1.0667, 0).
    #[test]
    fn test_one_integer_variable_via_equalities() {
        let mut problem = Problem::new();
        let x1 = problem.add_variable("x1").coefficient(-1.0).id();
        let x2 = problem.add_variable("x2").coefficient(-2.0).integer().id();
        let x3 = problem.add_variable("x3").id();
        let x4 = problem.add_variable("x4").id();
        problem
            .add_constraint()
            .term(-1.0, x1)
            .term(2.6, x2)
            .term(1.0, x3)
            .equal_to(4.0);
        problem
            .add_constraint()
            .term(3.0, x1)
            .term(1.1, x2)
            .term(1.0, x4)
            .equal_to(9.0);

        let solution = Solver::new()
            .solve(&problem, &Cancellation::none())
            .expect("program has an integer optimum");

        assert!((solution.objective() - -6.266_666_6).abs() < 1e-4);
        assert!((solution.value("x1").unwrap() - 2.266_666_6).abs() < 1e-4);
        assert!((solution.value("x2").unwrap() - 2.0).abs() < TOL);
        assert!((solution.value("x3").unwrap() - 1.066_666_6).abs() < 1e-4);
        assert!(solution.value("x4").unwrap().abs() < TOL);
    }

    /// Three variables, the third integer-constrained.
    /// Optimal: z ~ -6.8539 at x ~ (2.1348, 2.3596, 0).
    #[test]
    fn test_one_integer_variable_three_variables() {
        let mut problem = Problem::new();
        let x1 = problem.add_variable("x1").coefficient(-1.0).id();
        let x2 = problem.add_variable("x2").coefficient(-2.0).id();
        let x3 = problem.add_variable("x3").integer().id();
        problem
            .add_constraint()
            .term(-1.0, x1)
            .term(2.6, x2)
            .term(1.2, x3)
            .equal_to(4.0);
        problem
            .add_constraint()
            .term(3.0, x1)
            .term(1.1, x2)
            .term(1.6, x3)
            .equal_to(9.0);

        let solution = Solver::new()
            .solve(&problem, &Cancellation::none())
            .expect("program has an integer optimum");

        assert!((solution.objective() - -6.853_932_5).abs() < 1e-4);
        assert!((solution.value("x1").unwrap() - 2.134_831_4).abs() < 1e-4);
        assert!((solution.value("x2").unwrap() - 2.359_550_5).abs() < 1e-4);
        assert!(solution.value("x3").unwrap().abs() < TOL);
    }

    /// Adds an inequality (x1 >= 1) on top of an integer variable.
    /// Optimal: z ~ -5.7865 at x ~ (1.0674, 2.3596, 0).
    #[test]
    fn test_integer_plus_inequality() {
        let mut problem = Problem::new();
        let x1 = problem.add_variable("x1").coefficient(-1.0).id();
        let x2 = problem.add_variable("x2").coefficient(-2.0).id();
        let x3 = problem.add_variable("x3").coefficient(1.0).integer().id();
        problem
            .add_constraint()
            .term(-2.0, x1)
            .term(2.6, x2)
            .term(2.0, x3)
            .equal_to(4.0);
        problem
            .add_constraint()
            .term(6.0, x1)
            .term(1.1, x2)
            .term(1.0, x3)
            .equal_to(9.0);
        problem
            .add_constraint()
            .term(-1.0, x1)
            .less_than_or_equal_to(-1.0);

        let solution = Solver::new()
            .solve(&problem, &Cancellation::none())
            .expect("program has an integer optimum");

        assert!((solution.objective() - -5.786_516_8).abs() < 1e-4);
        assert!((solution.value("x1").unwrap() - 1.067_415_7).abs() < 1e-4);
        assert!((solution.value("x2").unwrap() - 2.359_550_5).abs() < 1e-4);
        assert!(solution.value("x3").unwrap().abs() < TOL);
    }

    /// A backend whose relaxations are always feasible, fractional, and
    /// improving, so only the deadline ends the search.
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

    #[test]
    fn test_cancellation_under_deadline() {
        let mut problem = Problem::new();
        let mut ids = Vec::new();
        for name in ["x1", "x2", "x3"] {
            ids.push(
                problem
                    .add_variable(name)
                    .coefficient(1.0)
                    .integer()
                    .id(),
            );
        }
        let constraint = problem.add_constraint();
        constraint
            .term(1.0, ids[0])
            .term(1.0, ids[1])
            .term(1.0, ids[2])
            .equal_to(1.5);

        let monitor = DotTreeMonitor::new();
        let result = Solver::with_backend(ForeverFractional)
            .workers(2)
            .solve_with_monitor(
                &problem,
                &Cancellation::deadline(Duration::from_millis(50)),
                &monitor,
            );

        match result {
            Err(SolveError::Cancelled { best }) => assert!(best.is_none()),
            other => panic!("expected cancellation, got {:?}", other),
        }
        assert!(monitor.num_nodes() >= 1, "sink saw at least one subproblem");
        assert!(monitor.num_decided() >= 1, "sink saw at least one decision");
    }

    /// Maximization must agree with minimizing the negated objective.
    #[test]
    fn test_maximization_round_trip() {
        let build = |maximize: bool| {
            let mut problem = Problem::new();
            if maximize {
                problem.maximize();
            }
            let sign = if maximize { 1.0 } else { -1.0 };
            let x1 = problem
                .add_variable("x1")
                .coefficient(sign * 1.0)
                .id();
            let x2 = problem
                .add_variable("x2")
                .coefficient(sign * 2.0)
                .integer()
                .id();
            let x3 = problem
                .add_variable("x3")
                .coefficient(sign * -1.0)
                .integer()
                .id();
            problem.add_constraint().term(1.0, x1).equal_to(5.0);
            problem.add_constraint().term(3.0, x2).equal_to(2.0);
            problem.add_constraint().term(1.0, x3).equal_to(2.0);
            problem
        };

        let maximized = Solver::new().solve(&build(true), &Cancellation::none());
        let minimized = Solver::new().solve(&build(false), &Cancellation::none());

        // 3*x2 = 2 admits no integer x2: both directions must agree on the
        // outcome, and any objectives they report must be negations of each
        // other.
        match (maximized, minimized) {
            (Ok(max), Ok(min)) => {
                assert!((max.objective() + min.objective()).abs() < TOL);
            }
            (Err(max), Err(min)) => assert_eq!(max, min),
            (max, min) => panic!("directions disagree: {:?} vs {:?}", max, min),
        }
    }

    #[test]
    fn test_feasible_maximization() {
        let mut problem = Problem::new();
        problem.maximize();
        let x1 = problem
            .add_variable("x1")
            .coefficient(1.0)
            .integer()
            .upper_bound(3.5)
            .id();
        let x2 = problem
            .add_variable("x2")
            .coefficient(2.0)
            .upper_bound(2.0)
            .id();
        let _ = (x1, x2);

        let solution = Solver::new()
            .solve(&problem, &Cancellation::none())
            .expect("boxed program has an optimum");

        assert!((solution.objective() - 7.0).abs() < TOL, "3 + 2*2");
        assert!((solution.value("x1").unwrap() - 3.0).abs() < TOL);
        assert!((solution.value("x2").unwrap() - 2.0).abs() < TOL);
    }

    /// A single variable whose only constraints are its bounds.
    #[test]
    fn test_single_variable_bound_optimum() {
        let mut problem = Problem::new();
        problem
            .add_variable("x")
            .coefficient(1.0)
            .upper_bound(5.0)
            .lower_bound(1.5);

        let solution = Solver::new()
            .solve(&problem, &Cancellation::none())
            .expect("boxed variable has an optimum");
        assert!((solution.objective() - 1.5).abs() < TOL);
        assert!((solution.value("x").unwrap() - 1.5).abs() < TOL);
    }

    #[test]
    fn test_infeasible_problem_is_reported() {
        let mut problem = Problem::new();
        let x = problem.add_variable("x").id();
        // x <= -1 contradicts non-negativity.
        problem.add_constraint().term(1.0, x).less_than_or_equal_to(-1.0);

        let result = Solver::new().solve(&problem, &Cancellation::none());
        assert_eq!(result.err(), Some(SolveError::InitialRelaxationInfeasible));
    }

    #[test]
    fn test_no_integer_feasible_solution_is_reported() {
        let mut problem = Problem::new();
        let x = problem.add_variable("x").integer().id();
        problem.add_constraint().term(3.0, x).equal_to(2.0);

        let result = Solver::new().solve(&problem, &Cancellation::none());
        assert_eq!(result.err(), Some(SolveError::NoIntegerFeasibleSolution));
    }

    #[test]
    fn test_solution_preserves_declaration_order() {
        let mut problem = Problem::new();
        let z = problem.add_variable("zulu").coefficient(1.0).id();
        let a = problem.add_variable("alpha").coefficient(1.0).id();
        problem
            .add_constraint()
            .term(1.0, z)
            .term(1.0, a)
            .equal_to(1.0);

        let solution = Solver::new()
            .solve(&problem, &Cancellation::none())
            .expect("program is feasible");
        let names: Vec<&str> = solution.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["zulu", "alpha"]);
    }

    /// Random boxed programs have a closed-form optimum: each variable sits
    /// at its upper bound when its coefficient is negative and at zero
    /// otherwise. Integer bounds make the relaxation optimum integral, so
    /// the integer-constrained variant must agree with it.
    #[test]
    fn test_randomized_box_programs_match_closed_form() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        for round in 0..25 {
            let num_vars = rng.gen_range(1..6);
            let mut problem = Problem::new();
            let mut expected = 0.0;

            for v in 0..num_vars {
                let coefficient = rng.gen_range(-3..=3) as f64;
                let upper = rng.gen_range(1..=5) as f64;
                let variable = problem
                    .add_variable(format!("x{}", v))
                    .coefficient(coefficient)
                    .upper_bound(upper);
                let variable = if rng.gen_bool(0.5) {
                    variable.integer()
                } else {
                    variable
                };
                let _ = variable.id();

                if coefficient < 0.0 {
                    expected += coefficient * upper;
                }
            }

            let solution = Solver::new()
                .workers(2)
                .solve(&problem, &Cancellation::none())
                .expect("boxed program is always feasible");
            assert!(
                (solution.objective() - expected).abs() < 1e-5,
                "round {}: expected {}, got {}",
                round,
                expected,
                solution.objective()
            );
        }
    }

    /// The solver must deliver identical optima regardless of worker count
    /// and branching rule.
    #[test]
    fn test_workers_and_rules_agree() {
        let build = || {
            let mut problem = Problem::new();
            let x1 = problem.add_variable("x1").coefficient(-1.0).id();
            let x2 = problem.add_variable("x2").coefficient(-2.0).integer().id();
            let x3 = problem.add_variable("x3").id();
            let x4 = problem.add_variable("x4").id();
            problem
                .add_constraint()
                .term(-1.0, x1)
                .term(2.6, x2)
                .term(1.0, x3)
                .equal_to(4.0);
            problem
                .add_constraint()
                .term(3.0, x1)
                .term(1.1, x2)
                .term(1.0, x4)
                .equal_to(9.0);
            problem
        };

        for rule in [
            BranchRule::MaxFun,
            BranchRule::MostInfeasible,
            BranchRule::Naive,
        ] {
            for workers in [1, 4] {
                let solution = Solver::new()
                    .workers(workers)
                    .branch_rule(rule)
                    .solve(&build(), &Cancellation::none())
                    .expect("program has an integer optimum");
                assert!(
                    (solution.objective() - -6.266_666_6).abs() < 1e-4,
                    "rule {} with {} workers missed the optimum",
                    rule,
                    workers
                );
            }
        }
    }

    #[test]
    fn test_manual_cancellation_handle() {
        let (cancellation, handle) = Cancellation::manual();
        handle.cancel();

        let mut problem = Problem::new();
        let mut ids = Vec::new();
        for name in ["a", "b", "c"] {
            ids.push(problem.add_variable(name).coefficient(1.0).integer().id());
        }
        problem
            .add_constraint()
            .term(1.0, ids[0])
            .term(1.0, ids[1])
            .term(1.0, ids[2])
            .equal_to(1.5);

        let result = Solver::with_backend(ForeverFractional).solve(&problem, &cancellation);
        match result {
            Err(SolveError::Cancelled { best }) => assert!(best.is_none()),
            other => panic!("expected cancellation, got {:?}", other),
        }
    }
}
