use std::{cmp::Ordering, collections::BinaryHeap, time::Duration};

/// A queue of one-shot deferred actions driven by an external clock.
///
/// Actions are plain data: whoever drains the queue decides how to apply them. Actions due at
/// the same instant come out in the order they were scheduled.
#[derive(Debug)]
pub struct TimerQueue<T> {
    entries: BinaryHeap<Entry<T>>,
    next_sequence: u64,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self { entries: BinaryHeap::new(), next_sequence: 0 }
    }

    /// Schedule an action to fire at the given instant.
    pub fn schedule(&mut self, due: Duration, action: T) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.entries.push(Entry { due, sequence, action });
    }

    /// Remove and return every action due at or before `now` along with the instant it was
    /// due, in firing order.
    pub fn drain_due(&mut self, now: Duration) -> Vec<(Duration, T)> {
        let mut fired = Vec::new();
        while self.entries.peek().is_some_and(|entry| entry.due <= now) {
            if let Some(entry) = self.entries.pop() {
                fired.push((entry.due, entry.action));
            }
        }
        fired
    }

    /// The instant the next action is due, if any.
    pub fn next_due(&self) -> Option<Duration> {
        self.entries.peek().map(|entry| entry.due)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
struct Entry<T> {
    due: Duration,
    sequence: u64,
    action: T,
}

impl<T> Entry<T> {
    fn key(&self) -> (Duration, u64) {
        (self.due, self.sequence)
    }
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    // Reversed so the max-heap pops the earliest entry first.
    fn cmp(&self, other: &Self) -> Ordering {
        other.key().cmp(&self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn millis(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn fires_in_due_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(millis(30), "c");
        queue.schedule(millis(10), "a");
        queue.schedule(millis(20), "b");

        assert_eq!(queue.next_due(), Some(millis(10)));
        assert_eq!(queue.drain_due(millis(25)), vec![(millis(10), "a"), (millis(20), "b")]);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.drain_due(millis(90)), vec![(millis(30), "c")]);
        assert!(queue.is_empty());
    }

    #[test]
    fn ties_keep_schedule_order() {
        let mut queue = TimerQueue::new();
        for value in 0..5 {
            queue.schedule(millis(7), value);
        }
        let fired: Vec<_> = queue.drain_due(millis(7)).into_iter().map(|(_, value)| value).collect();
        assert_eq!(fired, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn nothing_due_yet() {
        let mut queue = TimerQueue::new();
        queue.schedule(millis(100), ());
        assert!(queue.drain_due(millis(99)).is_empty());
        assert_eq!(queue.len(), 1);
    }
}
