//! Cancellable deadline timers driven by an external monotonic clock

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;

use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Handle returned by [`TimerQueue::schedule`], used to cancel before firing
    pub struct TimerHandle;
}

#[derive(Debug, Clone)]
struct Timer<T> {
    deadline: Duration,
    payload: T,
}

/// Heap entry, ordered so the earliest deadline pops first
#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    handle: TimerHandle,
    deadline: Duration,
    /// Insertion order; breaks ties between equal deadlines
    seq: u64,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap
        (other.deadline, other.seq).cmp(&(self.deadline, self.seq))
    }
}

/// Pending timers, fired by polling with the current time
///
/// Nothing runs in the background: a timer only fires from [`TimerQueue::poll`].
/// Cancelled timers leave a stale heap entry behind, skipped when it surfaces.
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    timers: SlotMap<TimerHandle, Timer<T>>,
    queue: BinaryHeap<QueueEntry>,
    next_seq: u64,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            timers: SlotMap::with_key(),
            queue: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Schedules `payload` to fire once `now >= deadline`
    pub fn schedule(&mut self, deadline: Duration, payload: T) -> TimerHandle {
        let handle = self.timers.insert(Timer { deadline, payload });
        self.queue.push(QueueEntry {
            handle,
            deadline,
            seq: self.next_seq,
        });
        self.next_seq += 1;
        handle
    }

    /// Cancels a pending timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.timers.remove(handle).is_some()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.timers.contains_key(handle)
    }

    /// Earliest live deadline, if any timer is pending
    pub fn next_deadline(&mut self) -> Option<Duration> {
        while let Some(entry) = self.queue.peek() {
            if self.timers.contains_key(entry.handle) {
                return Some(entry.deadline);
            }
            self.queue.pop();
        }
        None
    }

    /// Removes and returns every due timer, earliest deadline first
    pub fn poll(&mut self, now: Duration) -> Vec<(TimerHandle, T)> {
        let mut due = Vec::new();
        while let Some(entry) = self.queue.peek() {
            if entry.deadline > now {
                break;
            }
            let handle = entry.handle;
            self.queue.pop();
            if let Some(timer) = self.timers.remove(handle) {
                due.push((handle, timer.payload));
            }
        }
        due
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn clear(&mut self) {
        self.timers.clear();
        self.queue.clear();
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
