//! A fixed-capacity FIFO of future handles.

use crate::handle::FutureHandle;

/// A bounded circular buffer of non-owning future references.
///
/// Mirrors the reference's `FutQue`: fixed capacity chosen at construction, strict FIFO
/// ordering, and no reallocation. Unlike the reference, a `push` that would overflow capacity
/// is reported to the caller instead of silently dropped (`DESIGN.md`, "silent full-queue
/// push").
pub struct ReadyQueue<V> {
    slots: Vec<Option<FutureHandle<V>>>,
    capacity: usize,
    len: usize,
    front: usize,
    back: usize,
}

/// Returned by [`ReadyQueue::push`] when the queue is already at capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueFull;

impl<V> ReadyQueue<V> {
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        ReadyQueue {
            slots,
            capacity,
            len: 0,
            front: 0,
            back: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Appends `future` to the tail. Errors with [`QueueFull`] if the queue is already at
    /// capacity, leaving the queue unchanged.
    pub fn push(&mut self, future: FutureHandle<V>) -> Result<(), QueueFull> {
        if self.len == self.capacity {
            return Err(QueueFull);
        }
        self.slots[self.back] = Some(future);
        self.back = (self.back + 1) % self.capacity.max(1);
        self.len += 1;
        Ok(())
    }

    /// Removes and returns the head of the queue, if any.
    pub fn pop(&mut self) -> Option<FutureHandle<V>> {
        if self.len == 0 {
            return None;
        }
        let future = self.slots[self.front].take();
        self.front = (self.front + 1) % self.capacity.max(1);
        self.len -= 1;
        future
    }
}
