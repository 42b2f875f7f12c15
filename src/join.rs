//! Concurrent composition: run `fut1` and `fut2` in parallel, resolve once both finish.

use crate::future::{
    ErrCode, Future, FutureState, Poll, FUTURE_SUCCESS, JOIN_ERR_BOTH_FAILED, JOIN_ERR_FUT1_FAILED,
    JOIN_ERR_FUT2_FAILED,
};
use crate::handle::FutureHandle;
use crate::reactor::Reactor;
use crate::waker::Waker;

/// A child's terminal outcome, cached the moment it is first observed so the child is never
/// progressed again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChildState {
    Pending,
    Completed,
    Failure,
}

/// The snapshot of a child's `ok`/`errcode` taken at the moment it reached a terminal state.
pub struct ChildResult<V> {
    pub ok: Option<V>,
    pub errcode: ErrCode,
}

/// Both children are progressed (at most once each) on every outer progress call until both
/// have reached a terminal state.
pub struct JoinFuture<V> {
    state: FutureState<V>,
    fut1: FutureHandle<V>,
    fut2: FutureHandle<V>,
    fut1_state: ChildState,
    fut2_state: ChildState,
    result1: ChildResult<V>,
    result2: ChildResult<V>,
    terminal: bool,
}

/// Builds a future that progresses `fut1` and `fut2` concurrently and resolves once both have
/// reached a terminal state.
///
/// # Safety
///
/// `fut1` and `fut2` must outlive the returned `JoinFuture` and every progress call on it.
pub unsafe fn join<V>(fut1: &mut dyn Future<V>, fut2: &mut dyn Future<V>) -> JoinFuture<V> {
    JoinFuture {
        state: FutureState::new(),
        fut1: FutureHandle::new(fut1),
        fut2: FutureHandle::new(fut2),
        fut1_state: ChildState::Pending,
        fut2_state: ChildState::Pending,
        result1: ChildResult { ok: None, errcode: FUTURE_SUCCESS },
        result2: ChildResult { ok: None, errcode: FUTURE_SUCCESS },
        terminal: false,
    }
}

impl<V> JoinFuture<V> {
    /// The per-child results recorded at the moment each reached a terminal state. Lets a
    /// caller recover fut2's `ok` even though `self.ok` only carries fut1's (`DESIGN.md`,
    /// "join result combination").
    pub fn results(&self) -> (&ChildResult<V>, &ChildResult<V>) {
        (&self.result1, &self.result2)
    }
}

impl<V> Future<V> for JoinFuture<V> {
    fn progress(&mut self, reactor: &mut Reactor<V>, waker: Waker<V>) -> Poll {
        debug_assert!(!self.terminal, "join future progressed after reaching a terminal state");

        if self.fut1_state == ChildState::Pending {
            // Safety: `fut1` outlives `self` per `join`'s safety contract.
            let fut1 = unsafe { self.fut1.as_mut() };
            match fut1.progress(reactor, waker) {
                Poll::Pending => {}
                Poll::Completed => {
                    self.fut1_state = ChildState::Completed;
                    self.result1.ok = Some(fut1.take_ok());
                    self.result1.errcode = FUTURE_SUCCESS;
                }
                Poll::Failure => {
                    self.fut1_state = ChildState::Failure;
                    self.result1.errcode = fut1.errcode();
                }
            }
        }

        if self.fut2_state == ChildState::Pending {
            // Safety: see above, symmetric for `fut2`.
            let fut2 = unsafe { self.fut2.as_mut() };
            match fut2.progress(reactor, waker) {
                Poll::Pending => {}
                Poll::Completed => {
                    self.fut2_state = ChildState::Completed;
                    self.result2.ok = Some(fut2.take_ok());
                    self.result2.errcode = FUTURE_SUCCESS;
                }
                Poll::Failure => {
                    self.fut2_state = ChildState::Failure;
                    self.result2.errcode = fut2.errcode();
                }
            }
        }

        if self.fut1_state == ChildState::Pending || self.fut2_state == ChildState::Pending {
            return Poll::Pending;
        }

        self.terminal = true;
        match (self.fut1_state, self.fut2_state) {
            (ChildState::Failure, ChildState::Failure) => {
                self.state.set_errcode(JOIN_ERR_BOTH_FAILED);
                Poll::Failure
            }
            (ChildState::Failure, _) => {
                self.state.set_errcode(JOIN_ERR_FUT1_FAILED);
                Poll::Failure
            }
            (_, ChildState::Failure) => {
                self.state.set_errcode(JOIN_ERR_FUT2_FAILED);
                Poll::Failure
            }
            (ChildState::Completed, ChildState::Completed) => {
                // The reference's combination policy: fut1's `ok` wins. `results()` above
                // retains both.
                let ok = self.result1.ok.take().expect("fut1 completed without an ok value");
                self.state.set_ok(ok);
                Poll::Completed
            }
            (ChildState::Pending, _) | (_, ChildState::Pending) => unreachable!(),
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
