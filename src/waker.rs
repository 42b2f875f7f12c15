//! Wakers: cheap, copyable `(executor, future)` pairs.

use log::error;

use crate::executor::{Executor, ExecutorHandle, ExecutorError};
use crate::handle::FutureHandle;

/// Names a future and the executor that owns its ready queue.
///
/// Carries no ownership; invoking [`Waker::wake`] enqueues the named future on the named
/// executor. Cheap to copy and to store as a reactor registration's cookie.
pub struct Waker<V> {
    executor: ExecutorHandle<V>,
    future: FutureHandle<V>,
}

impl<V> Waker<V> {
    pub(crate) fn new(executor: ExecutorHandle<V>, future: FutureHandle<V>) -> Self {
        Waker { executor, future }
    }

    /// Re-enqueues the named future on the named executor's ready queue.
    ///
    /// If the queue is already at capacity the wake is lost and logged at `error!`, mirroring
    /// the executor's own `QueueFull` surfacing (`DESIGN.md`, "silent full-queue push").
    pub fn wake(&self) {
        // Safety: a `Waker` is only ever constructed from a live `&mut Executor<V>` for the
        // duration of a `run()` call (see `Executor::waker_for`), and wakers only fire from
        // within that same call (either synchronously during progress, or from the reactor's
        // dispatch inside `Executor::run`'s `poll()` step).
        let executor: &mut Executor<V> = unsafe { self.executor.as_mut() };
        if let Err(ExecutorError::QueueFull(capacity)) = executor.wake(self.future) {
            error!("dropped wake: ready queue full (capacity {})", capacity);
        }
    }
}

impl<V> Clone for Waker<V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for Waker<V> {}
