//! Sequential composition: run `fut1`, feed its result into `fut2`, resolve with `fut2`'s result.

use crate::future::{ErrCode, Future, FutureState, Poll, THEN_ERR_FUT1_FAILED, THEN_ERR_FUT2_FAILED};
use crate::handle::FutureHandle;
use crate::reactor::Reactor;
use crate::waker::Waker;

/// `fut2` is never progressed until `fut1` completes; `fut1`'s `ok` is copied into `fut2`'s
/// `arg` exactly once, right before `fut2`'s first progress.
pub struct ThenFuture<V> {
    state: FutureState<V>,
    fut1: FutureHandle<V>,
    fut2: FutureHandle<V>,
    fut1_completed: bool,
    terminal: bool,
}

/// Builds a future that progresses `fut1` to completion, then `fut2` with `fut1`'s output as
/// its input, resolving with `fut2`'s output.
///
/// # Safety
///
/// `fut1` and `fut2` must outlive the returned `ThenFuture` and every progress call on it, per
/// [`crate::handle::FutureHandle`]'s contract.
pub unsafe fn then<V>(fut1: &mut dyn Future<V>, fut2: &mut dyn Future<V>) -> ThenFuture<V> {
    ThenFuture {
        state: FutureState::new(),
        fut1: FutureHandle::new(fut1),
        fut2: FutureHandle::new(fut2),
        fut1_completed: false,
        terminal: false,
    }
}

impl<V> Future<V> for ThenFuture<V> {
    fn progress(&mut self, reactor: &mut Reactor<V>, waker: Waker<V>) -> Poll {
        debug_assert!(!self.terminal, "then future progressed after reaching a terminal state");

        if !self.fut1_completed {
            // Safety: `fut1` outlives `self` per `then`'s safety contract, and the drive loop
            // never re-enters `progress` for the same future.
            let fut1 = unsafe { self.fut1.as_mut() };
            match fut1.progress(reactor, waker) {
                Poll::Pending => return Poll::Pending,
                Poll::Failure => {
                    self.state.set_errcode(THEN_ERR_FUT1_FAILED);
                    self.terminal = true;
                    return Poll::Failure;
                }
                Poll::Completed => {
                    self.fut1_completed = true;
                    let ok = fut1.take_ok();
                    // Safety: see above.
                    unsafe { self.fut2.as_mut() }.set_arg(ok);
                }
            }
        }

        // Safety: see above.
        let fut2 = unsafe { self.fut2.as_mut() };
        match fut2.progress(reactor, waker) {
            Poll::Pending => Poll::Pending,
            Poll::Failure => {
                self.state.set_errcode(THEN_ERR_FUT2_FAILED);
                self.terminal = true;
                Poll::Failure
            }
            Poll::Completed => {
                let ok = fut2.take_ok();
                self.state.set_ok(ok);
                self.terminal = true;
                Poll::Completed
            }
        }
    }

    fn is_active(&self) -> bool {
        self.state.is_active()
    }

    fn set_active(&mut self, active: bool) {
        self.state.set_active(active);
    }

    fn set_arg(&mut self, arg: V) {
        self.state.set_arg(arg);
    }

    fn take_ok(&mut self) -> V {
        self.state.take_ok()
    }

    fn errcode(&self) -> ErrCode {
        self.state.errcode()
    }
}
