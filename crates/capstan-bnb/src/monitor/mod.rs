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

//! # Search Monitoring Interface
//!
//! A callback interface for observing the enumeration tree as it unfolds.
//! Monitors receive every subproblem at enqueue time and every decision the
//! engine takes, which is enough to reconstruct the whole tree without the
//! engine ever holding it in memory.
//!
//! ## Ordering guarantees
//!
//! - `on_subproblem(p)` is invoked exactly once per subproblem, before any
//!   worker can reach `p`.
//! - `on_decision(s, d)` is invoked exactly once per candidate solution, on
//!   the decision thread.
//!
//! Implementations must be internally thread-safe (`Send + Sync`); the
//! provided recorders serialize through a mutex.

pub mod dot;
pub mod log;
pub mod no_op;

use crate::candidate::Candidate;
use crate::decision::BnbDecision;
use crate::subproblem::SubProblem;

/// Receives the engine's instrumentation events.
pub trait SearchMonitor: Send + Sync {
    /// A short name identifying the monitor.
    fn name(&self) -> &str;

    /// A new subproblem entered the engine, before any worker can see it.
    fn on_subproblem(&self, subproblem: &SubProblem);

    /// A candidate solution was decided on.
    fn on_decision(&self, candidate: &Candidate, decision: BnbDecision);
}

impl std::fmt::Debug for dyn SearchMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SearchMonitor({})", self.name())
    }
}
