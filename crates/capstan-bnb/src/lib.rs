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

//! # Capstan BnB
//!
//! **The concurrent branch-and-bound enumeration engine of the Capstan MILP
//! solver.**
//!
//! This crate owns everything between a numeric root program and a decided
//! search outcome:
//!
//! * **`subproblem`**: tree nodes as plain values with copy-on-branch
//!   constraint lists and `Arc`-shared read-only arrays.
//! * **`standard_form`**: slack-variable conversion to equality form.
//! * **`branching`**: the selectable branching rules.
//! * **`engine`**: the scheduler — buffer manager, worker pool, and the
//!   single-writer decision loop on the caller's thread.
//! * **`cancel`**: cooperative cancellation (deadline or manual).
//! * **`monitor`**: the instrumentation sink, with no-op, logging, and DOT
//!   tree recorders.
//! * **`result`** / **`stats`**: what a traversal returns.

pub mod branching;
pub mod cancel;
pub mod candidate;
pub mod decision;
pub mod engine;
pub mod monitor;
pub mod result;
pub mod standard_form;
pub mod stats;
pub mod subproblem;

pub use branching::BranchRule;
pub use cancel::{CancelHandle, Cancellation};
pub use candidate::Candidate;
pub use decision::BnbDecision;
pub use engine::{EnumerationTree, SearchConfig};
pub use monitor::{dot::DotTreeMonitor, log::LogMonitor, no_op::NoOpMonitor, SearchMonitor};
pub use result::{SearchOutcome, SearchResult};
pub use stats::SearchStatistics;
pub use subproblem::{BnbConstraint, SubProblem};
