//! Highlight reverts.
//!
//! Every key strike lights its key immediately and schedules a revert to
//! the unlit strip a short, fixed time later.  Reverts are plain deadlines
//! checked by the owner each frame; nothing runs on a timer thread.
//!
//! Two policies:
//!
//! * [`RevertPolicy::Independent`] — each strike keeps its own revert.  A
//!   revert scheduled by an earlier strike still fires, even if a later
//!   strike re-lit the strip in the meantime.  All reverts draw the same
//!   unlit frame, so overlap is harmless.
//! * [`RevertPolicy::Coalesced`] — a strike cancels every pending revert
//!   before scheduling its own, so the strip stays lit until the last
//!   strike's delay has passed.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevertPolicy {
    #[default]
    Independent,
    Coalesced,
}

/// Pending revert deadlines, earliest first.
#[derive(Debug, Default)]
pub struct RevertSchedule {
    pending: BinaryHeap<Reverse<Instant>>,
    policy:  RevertPolicy,
}

impl RevertSchedule {
    pub fn new(policy: RevertPolicy) -> Self {
        RevertSchedule { pending: BinaryHeap::new(), policy }
    }

    pub fn policy(&self) -> RevertPolicy { self.policy }

    /// Schedule a revert `delay` after `now`.
    pub fn schedule(&mut self, now: Instant, delay: Duration) {
        if self.policy == RevertPolicy::Coalesced {
            self.pending.clear();
        }
        self.pending.push(Reverse(now + delay));
    }

    /// Remove every revert whose deadline is at or before `now` and return
    /// how many there were.
    pub fn fire_due(&mut self, now: Instant) -> usize {
        let mut fired = 0;
        while let Some(&Reverse(deadline)) = self.pending.peek() {
            if deadline > now { break; }
            self.pending.pop();
            fired += 1;
        }
        fired
    }

    /// Drop all pending reverts without firing them.
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn pending(&self) -> usize { self.pending.len() }

    /// Deadline of the next revert, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.peek().map(|r| r.0)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
