//! Binary min-heap of pending collision events.
//!
//! Array-backed, 0-based: the children of slot `k` are `2k + 1` and `2k + 2`,
//! its parent is `(k - 1) / 2`. There is no removal by key; stale entries stay
//! in the heap until popped and are filtered by generation counter.

use crate::core::CollisionEvent;
use crate::error::{Error, Result};

/// Priority queue of [`CollisionEvent`]s ordered by scheduled time.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    heap: Vec<CollisionEvent>,
}

impl EventQueue {
    /// Empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty queue with room for `capacity` events.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
        }
    }

    /// Number of queued events, stale ones included.
    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns true if no events are queued.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drop every queued event.
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    /// The earliest event, if any.
    #[inline]
    pub fn peek(&self) -> Option<&CollisionEvent> {
        self.heap.first()
    }

    /// Append `event` and swim it up to restore heap order. O(log n).
    pub fn insert(&mut self, event: CollisionEvent) {
        self.heap.push(event);
        self.swim(self.heap.len() - 1);
    }

    /// Remove and return the earliest event. O(log n).
    ///
    /// Errors with [`Error::EmptyQueue`] when there is nothing to extract.
    pub fn extract_min(&mut self) -> Result<CollisionEvent> {
        if self.heap.is_empty() {
            return Err(Error::EmptyQueue);
        }
        let min = self.heap.swap_remove(0);
        self.sink(0);
        Ok(min)
    }

    /// Checks that every parent orders at or before its children.
    pub fn is_heap_ordered(&self) -> bool {
        (1..self.heap.len()).all(|k| self.heap[(k - 1) / 2] <= self.heap[k])
    }

    /// Pending events in storage order (not sorted).
    pub fn iter(&self) -> impl Iterator<Item = &CollisionEvent> {
        self.heap.iter()
    }

    fn swim(&mut self, mut k: usize) {
        while k > 0 {
            let parent = (k - 1) / 2;
            if self.heap[parent] <= self.heap[k] {
                break;
            }
            self.heap.swap(parent, k);
            k = parent;
        }
    }

    fn sink(&mut self, mut k: usize) {
        let n = self.heap.len();
        loop {
            let left = 2 * k + 1;
            if left >= n {
                break;
            }
            let right = left + 1;
            let child = if right < n && self.heap[right] < self.heap[left] {
                right
            } else {
                left
            };
            if self.heap[k] <= self.heap[child] {
                break;
            }
            self.heap.swap(k, child);
            k = child;
        }
    }
}

impl Extend<CollisionEvent> for EventQueue {
    fn extend<T: IntoIterator<Item = CollisionEvent>>(&mut self, iter: T) {
        for event in iter {
            self.insert(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EventKind;

    fn wall_at(t: f64, i: u32) -> Result<CollisionEvent> {
        CollisionEvent::new(t, EventKind::Wall { i }, 0, None)
    }

    #[test]
    fn extract_from_empty_fails() {
        let mut q = EventQueue::new();
        assert!(matches!(q.extract_min(), Err(Error::EmptyQueue)));
        assert!(q.peek().is_none());
    }

    #[test]
    fn extracts_in_time_order() -> Result<()> {
        let mut q = EventQueue::new();
        for (i, t) in [5.0, 1.0, 4.0, 2.0, 3.0, 0.5].into_iter().enumerate() {
            q.insert(wall_at(t, i as u32)?);
            assert!(q.is_heap_ordered());
        }
        assert_eq!(q.len(), 6);
        assert_eq!(q.peek().map(|e| e.time_f64()), Some(0.5));

        let mut times = Vec::new();
        while !q.is_empty() {
            times.push(q.extract_min()?.time_f64());
            assert!(q.is_heap_ordered());
        }
        assert_eq!(times, vec![0.5, 1.0, 2.0, 3.0, 4.0, 5.0]);
        Ok(())
    }

    #[test]
    fn interleaved_inserts_and_extracts() -> Result<()> {
        let mut q = EventQueue::new();
        q.insert(wall_at(3.0, 0)?);
        q.insert(wall_at(1.0, 1)?);
        assert_eq!(q.extract_min()?.time_f64(), 1.0);
        q.insert(wall_at(2.0, 2)?);
        q.insert(wall_at(-1.0, 3)?);
        assert_eq!(q.extract_min()?.time_f64(), -1.0);
        assert_eq!(q.extract_min()?.time_f64(), 2.0);
        assert_eq!(q.extract_min()?.time_f64(), 3.0);
        assert!(q.extract_min().is_err());
        Ok(())
    }

    #[test]
    fn duplicate_times_are_all_returned() -> Result<()> {
        let mut q = EventQueue::new();
        q.extend((0..4).map(|i| wall_at(1.0, i)).collect::<Result<Vec<_>>>()?);
        let mut seen: Vec<u32> = Vec::new();
        while let Ok(e) = q.extract_min() {
            assert_eq!(e.time_f64(), 1.0);
            seen.push(e.kind.primary());
        }
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3]);
        Ok(())
    }
}
