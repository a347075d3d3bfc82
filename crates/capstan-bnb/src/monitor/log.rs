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

//! A progress-logging monitor.
//!
//! Prints aligned progress lines at a configurable minimum interval, so a
//! long search stays observable without drowning stdout at every node.

use crate::candidate::Candidate;
use crate::decision::BnbDecision;
use crate::monitor::SearchMonitor;
use crate::subproblem::SubProblem;
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug)]
struct LogState {
    start: Instant,
    last_line: Option<Instant>,
    enqueued: u64,
    decided: u64,
    best_objective: Option<f64>,
}

/// Prints periodic progress lines for a running search.
#[derive(Debug)]
pub struct LogMonitor {
    interval: Duration,
    state: Mutex<LogState>,
}

impl Default for LogMonitor {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl LogMonitor {
    /// Creates a monitor that prints at most one line per `interval`.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            state: Mutex::new(LogState {
                start: Instant::now(),
                last_line: None,
                enqueued: 0,
                decided: 0,
                best_objective: None,
            }),
        }
    }

    fn log_line(&self, state: &mut LogState) {
        let now = Instant::now();
        let due = match state.last_line {
            None => true,
            Some(last) => now.duration_since(last) >= self.interval,
        };
        if !due {
            return;
        }

        if state.last_line.is_none() {
            println!(
                "{:<9} | {:<12} | {:<12} | {:<14}",
                "Elapsed", "Enqueued", "Decided", "Best Objective"
            );
            println!("{}", "-".repeat(56));
        }

        let best = match state.best_objective {
            Some(z) => format!("{:.6}", z),
            None => "Inf".to_string(),
        };
        println!(
            "{:<9} | {:<12} | {:<12} | {:<14}",
            format!("{:.1}s", now.duration_since(state.start).as_secs_f32()),
            state.enqueued,
            state.decided,
            best
        );
        state.last_line = Some(now);
    }
}

impl SearchMonitor for LogMonitor {
    fn name(&self) -> &str {
        "LogMonitor"
    }

    fn on_subproblem(&self, _subproblem: &SubProblem) {
        let mut state = self.state.lock().unwrap();
        state.enqueued += 1;
    }

    fn on_decision(&self, candidate: &Candidate, decision: BnbDecision) {
        let mut state = self.state.lock().unwrap();
        state.decided += 1;
        if matches!(
            decision,
            BnbDecision::BetterFeasible | BnbDecision::InitialRelaxationFeasible
        ) {
            state.best_objective = candidate.objective();
        }
        self.log_line(&mut state);
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

    #[test]
    fn test_counters_advance() {
        let monitor = LogMonitor::new(Duration::from_secs(3600));
        let subproblem = Arc::new(crate::subproblem::SubProblem::root(
            DVector::from_row_slice(&[1.0]),
            Some(DMatrix::from_row_slice(1, 1, &[1.0])),
            Some(DVector::from_row_slice(&[1.0])),
            None,
            None,
            FixedBitSet::with_capacity(1),
            BranchRule::MaxFun,
        ));
        monitor.on_subproblem(&subproblem);

        let candidate = Candidate::new(
            Arc::clone(&subproblem),
            Ok(LpSolution {
                objective: 1.0,
                x: DVector::from_row_slice(&[1.0]),
            }),
        );
        monitor.on_decision(&candidate, BnbDecision::BetterFeasible);

        let state = monitor.state.lock().unwrap();
        assert_eq!(state.enqueued, 1);
        assert_eq!(state.decided, 1);
        assert_eq!(state.best_objective, Some(1.0));
    }
}
