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

//! # Cooperative Cancellation
//!
//! A [`Cancellation`] is the external stop signal of a search: a deadline, a
//! manual trigger, or nothing. It is honored cooperatively — the decision
//! loop observes it at its next select, an in-flight LP call is never
//! interrupted.
//!
//! The signal is a selectable channel so the engine folds it into the same
//! `select!` that drains candidates. A deadline uses
//! [`crossbeam_channel::after`], which fires exactly once; the decision loop
//! is the signal's only consumer and breaks immediately, so the
//! one-shot nature is sufficient.

use crossbeam_channel::{after, bounded, never, Receiver, Sender};
use std::time::{Duration, Instant};

/// An external cancellation signal for one search.
///
/// Construct one per solve: a deadline channel starts ticking when the value
/// is created, not when the search starts.
#[derive(Clone, Debug)]
pub struct Cancellation {
    signal: Receiver<Instant>,
}

impl Cancellation {
    /// A signal that never fires: the search runs to exhaustion.
    pub fn none() -> Self {
        Self { signal: never() }
    }

    /// A signal that fires once the given duration has elapsed.
    pub fn deadline(timeout: Duration) -> Self {
        Self {
            signal: after(timeout),
        }
    }

    /// A manually triggered signal, paired with the handle that fires it.
    pub fn manual() -> (Self, CancelHandle) {
        let (sender, receiver) = bounded(1);
        (Self { signal: receiver }, CancelHandle { sender })
    }

    /// The underlying channel, for folding into a `select!`.
    #[inline]
    pub(crate) fn signal(&self) -> &Receiver<Instant> {
        &self.signal
    }
}

/// Fires the manual [`Cancellation`] it was created with.
#[derive(Clone, Debug)]
pub struct CancelHandle {
    sender: Sender<Instant>,
}

impl CancelHandle {
    /// Requests cancellation. Idempotent; later calls are no-ops.
    pub fn cancel(&self) {
        let _ = self.sender.try_send(Instant::now());
    }
}
