//! Virtual-clock timer queue for page-local delayed work.
//!
//! The queue never sleeps: callers advance its clock explicitly and pop the
//! tasks that came due, in due-time order (ties keep scheduling order).

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Duration;

struct Scheduled<T> {
    due: Duration,
    seq: u64,
    task: T,
}

impl<T> PartialEq for Scheduled<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<T> Eq for Scheduled<T> {}

impl<T> PartialOrd for Scheduled<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Scheduled<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.due, self.seq).cmp(&(other.due, other.seq))
    }
}

pub struct TimerQueue<T> {
    now: Duration,
    seq: u64,
    pending: BinaryHeap<Reverse<Scheduled<T>>>,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            seq: 0,
            pending: BinaryHeap::new(),
        }
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Schedules `task` to fire `delay` after the current virtual time.
    pub fn schedule(&mut self, delay: Duration, task: T) {
        let entry = Scheduled {
            due: self.now + delay,
            seq: self.seq,
            task,
        };
        self.seq += 1;
        self.pending.push(Reverse(entry));
    }

    /// Pops the earliest task due at or before `until`, moving the clock to its due time.
    pub fn pop_due(&mut self, until: Duration) -> Option<T> {
        let next_due = self.pending.peek().map(|Reverse(s)| s.due)?;
        if next_due > until {
            return None;
        }
        let Reverse(entry) = self.pending.pop()?;
        self.now = self.now.max(entry.due);
        Some(entry.task)
    }

    /// Moves the clock forward to `until` once all due tasks have been popped.
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    /// Drops pending tasks matching `pred`.
    pub fn cancel_where<F: Fn(&T) -> bool>(&mut self, pred: F) {
        let kept: Vec<_> = self
            .pending
            .drain()
            .filter(|Reverse(s)| !pred(&s.task))
            .collect();
        self.pending = kept.into_iter().collect();
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
