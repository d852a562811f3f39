use std::collections::VecDeque;

use crate::core::timebase::Tick;

/// Identifies one armed timer. The id is unique for the lifetime of the
/// queue; the generation records which round armed the timer so consumers
/// can drop callbacks that outlived their round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle {
    pub id: u64,
    pub generation: u64,
}

#[derive(Clone, Debug)]
pub struct TimerEntry<T> {
    pub deadline: Tick,
    pub handle: TimerHandle,
    pub payload: T,
}

/// Single-shot timer queue ordered by deadline, then by arming order.
///
/// Cancellation is by handle and removes the entry outright: a cancelled
/// timer can never fire. Firing is cooperative; the owner pops due entries
/// from its loop, which is the single serialization point for all state
/// mutation driven by timers.
pub struct TimerQueue<T> {
    entries: VecDeque<TimerEntry<T>>,
    next_id: u64,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
            next_id: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Arm a single-shot timer. Entries with equal deadlines fire in arming
    /// order (ids are monotonic).
    pub fn arm(&mut self, deadline: Tick, generation: u64, payload: T) -> TimerHandle {
        let handle = TimerHandle {
            id: self.next_id,
            generation,
        };
        self.next_id += 1;

        let entry = TimerEntry {
            deadline,
            handle,
            payload,
        };

        let push_back = matches!(
            self.entries.back(),
            Some(last) if last.deadline <= entry.deadline
        );
        if push_back || self.entries.is_empty() {
            self.entries.push_back(entry);
        } else {
            let insert_at = self
                .entries
                .iter()
                .position(|existing| existing.deadline > entry.deadline)
                .unwrap_or(self.entries.len());
            self.entries.insert(insert_at, entry);
        }
        debug_assert!(self.is_sorted());
        handle
    }

    fn is_sorted(&self) -> bool {
        self.entries
            .iter()
            .zip(self.entries.iter().skip(1))
            .all(|(a, b)| a.deadline <= b.deadline)
    }

    /// Remove an armed timer. Returns false if it already fired or was
    /// cancelled before.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.handle != handle);
        self.entries.len() != before
    }

    /// Pop the next entry whose deadline is at or before `now`, earliest
    /// first.
    pub fn pop_due(&mut self, now: Tick) -> Option<TimerEntry<T>> {
        match self.entries.front() {
            Some(front) if front.deadline <= now => self.entries.pop_front(),
            _ => None,
        }
    }

    pub fn next_deadline(&self) -> Option<Tick> {
        self.entries.front().map(|entry| entry.deadline)
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::TimerQueue;

    #[test]
    fn fires_in_deadline_then_arming_order() {
        let mut q = TimerQueue::new();
        q.arm(30, 0, "c");
        q.arm(10, 0, "a1");
        q.arm(10, 0, "a2");
        q.arm(20, 0, "b");

        let mut fired = Vec::new();
        while let Some(entry) = q.pop_due(30) {
            fired.push(entry.payload);
        }
        assert_eq!(fired, vec!["a1", "a2", "b", "c"]);
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut q = TimerQueue::new();
        let keep = q.arm(10, 0, "keep");
        let drop = q.arm(5, 0, "drop");

        assert!(q.cancel(drop));
        assert!(!q.cancel(drop));

        let entry = q.pop_due(100).expect("remaining timer");
        assert_eq!(entry.handle, keep);
        assert!(q.pop_due(100).is_none());
    }

    #[test]
    fn pop_due_respects_now() {
        let mut q = TimerQueue::new();
        q.arm(50, 0, ());
        assert!(q.pop_due(49).is_none());
        assert_eq!(q.next_deadline(), Some(50));
        assert!(q.pop_due(50).is_some());
        assert!(q.is_empty());
    }
}
