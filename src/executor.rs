//! The single-threaded drive loop: ready queue, spawn, and run.

use std::ptr::NonNull;

use log::{debug, trace};
use thiserror::Error;

use crate::future::{Future, Poll};
use crate::handle::FutureHandle;
use crate::queue::ReadyQueue;
use crate::reactor::Reactor;
use crate::waker::Waker;

/// Failures the executor itself can report (distinct from a future's own `Poll::Failure`).
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// `spawn` or a wake would have pushed past the ready queue's fixed capacity.
    #[error("ready queue is at capacity ({0})")]
    QueueFull(usize),
}

/// A non-owning, `Copy` reference to an `Executor<V>`, used inside a [`Waker`].
pub struct ExecutorHandle<V>(NonNull<Executor<V>>);

impl<V> ExecutorHandle<V> {
    fn new(executor: &mut Executor<V>) -> Self {
        ExecutorHandle(NonNull::from(executor))
    }

    /// # Safety
    ///
    /// The executor this handle names must still be alive. Every `ExecutorHandle` in this
    /// crate is derived from `&mut Executor<V>` for the lifetime of a single `run()` call, so
    /// this always holds while a waker fires.
    pub(crate) unsafe fn as_mut(&self) -> &mut Executor<V> {
        &mut *self.0.as_ptr()
    }
}

impl<V> Clone for ExecutorHandle<V> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<V> Copy for ExecutorHandle<V> {}

/// Owns the ready queue and the reactor; drives user-supplied futures to completion.
pub struct Executor<V> {
    queue: ReadyQueue<V>,
    reactor: Reactor<V>,
}

impl<V> Executor<V> {
    /// Allocates a ready queue of `capacity` and a reactor bound to this executor.
    pub fn create(capacity: usize) -> Self {
        debug!("creating executor with capacity {}", capacity);
        Executor {
            queue: ReadyQueue::with_capacity(capacity),
            reactor: Reactor::create(),
        }
    }

    /// Marks `future` active and enqueues it. The precondition that `future` is not already
    /// active is a caller contract, not enforced here (matches the reference).
    pub fn spawn(&mut self, future: &mut dyn Future<V>) -> Result<(), ExecutorError> {
        trace!("spawning a future");
        future.set_active(true);
        // Safety: `future` is caller-owned and the caller guarantees it outlives its use
        // through this executor, per `FutureHandle`'s contract.
        let handle = unsafe { FutureHandle::new(future) };
        self.queue
            .push(handle)
            .map_err(|_| ExecutorError::QueueFull(self.queue.capacity()))
    }

    /// Builds a waker naming `future` on this executor.
    fn waker_for(&mut self, future: FutureHandle<V>) -> Waker<V> {
        Waker::new(ExecutorHandle::new(self), future)
    }

    /// Appends `future` to the ready queue. Called by a firing [`Waker`]; never by user code
    /// directly.
    pub(crate) fn wake(&mut self, future: FutureHandle<V>) -> Result<(), ExecutorError> {
        trace!("waking a future");
        self.queue
            .push(future)
            .map_err(|_| ExecutorError::QueueFull(self.queue.capacity()))
    }

    /// Drives every spawned future to completion.
    ///
    /// Alternates an inner drain of the ready queue (progressing each entry once) with an
    /// outer `reactor.poll()` that blocks until kernel readiness re-populates the queue.
    /// Returns once the queue is empty and the reactor has no outstanding registrations.
    pub fn run(&mut self) {
        debug!("running the executor");
        while !self.queue.is_empty() {
            while let Some(handle) = self.queue.pop() {
                let waker = self.waker_for(handle);
                // Safety: the drive loop is the sole place that dereferences queue entries,
                // and it never re-enters itself (reactor wakers only push to the queue).
                let future = unsafe { handle.as_mut() };
                let state = future.progress(&mut self.reactor, waker);
                trace!("future progressed to {:?}", state);
                if let Poll::Completed | Poll::Failure = state {
                    future.set_active(false);
                }
            }
            // `reactor.poll()` only collects the fired wakers; it does not invoke them. Firing
            // them here, after the borrow of `self.reactor` above has ended, keeps a waker's
            // reach back into `self.queue` from ever aliasing a live `&mut self.reactor`.
            let fired = self.reactor.poll();
            for waker in fired {
                waker.wake();
            }
        }
        debug!("executor run loop quiescent");
    }
}

impl<V> Drop for Executor<V> {
    /// Tears down the reactor. The reference's `executor_destroy` requires the queue be empty
    /// first; `run` only returns once it is, so there is nothing left to assert here beyond
    /// what `Reactor`'s own `Drop` already enforces.
    fn drop(&mut self) {
        debug!("destroying executor");
    }
}
