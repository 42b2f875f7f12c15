//! First-to-complete composition: run `fut1` and `fut2` concurrently, resolve with whichever
//! completes first; both failing is the only failure outcome.

use crate::future::{ErrCode, Future, FutureState, Poll};
use crate::handle::FutureHandle;
use crate::reactor::Reactor;
use crate::waker::Waker;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    None,
    CompletedFut1,
    CompletedFut2,
    FailedFut1,
    FailedFut2,
    FailedBoth,
}

/// A child marked `Failed` is never progressed again; a child marked `Completed` terminates the
/// select. Unlike [`crate::then::ThenFuture`] and [`crate::join::JoinFuture`], re-progressing a
/// `SelectFuture` past a terminal `Completed` or `FailedBoth` state is well-defined (§8,
/// "select idempotence of completion") rather than undefined, so `progress` has no terminal
/// assertion.
pub struct SelectFuture<V> {
    state: FutureState<V>,
    fut1: FutureHandle<V>,
    fut2: FutureHandle<V>,
    tag: Tag,
    fut1_errcode: ErrCode,
}

/// Builds a future that resolves as soon as either `fut1` or `fut2` completes, or as a failure
/// once both have failed.
///
/// # Safety
///
/// `fut1` and `fut2` must outlive the returned `SelectFuture` and every progress call on it.
pub unsafe fn select<V>(fut1: &mut dyn Future<V>, fut2: &mut dyn Future<V>) -> SelectFuture<V> {
    SelectFuture {
        state: FutureState::new(),
        fut1: FutureHandle::new(fut1),
        fut2: FutureHandle::new(fut2),
        tag: Tag::None,
        fut1_errcode: 0,
    }
}

impl<V> Future<V> for SelectFuture<V> {
    fn progress(&mut self, reactor: &mut Reactor<V>, waker: Waker<V>) -> Poll {
        if let Tag::CompletedFut1 | Tag::CompletedFut2 = self.tag {
            return Poll::Completed;
        }
        if self.tag == Tag::FailedBoth {
            self.state.set_errcode(self.fut1_errcode);
            return Poll::Failure;
        }

        if let Tag::None | Tag::FailedFut2 = self.tag {
            // Safety: `fut1` outlives `self` per `select`'s safety contract.
            let fut1 = unsafe { self.fut1.as_mut() };
            match fut1.progress(reactor, waker) {
                Poll::Pending => {}
                Poll::Completed => {
                    self.tag = Tag::CompletedFut1;
                    let ok = fut1.take_ok();
                    self.state.set_ok(ok);
                    return Poll::Completed;
                }
                Poll::Failure => {
                    self.fut1_errcode = fut1.errcode();
                    self.tag = if self.tag == Tag::FailedFut2 {
                        Tag::FailedBoth
                    } else {
                        Tag::FailedFut1
                    };
                }
            }
        }

        if let Tag::None | Tag::FailedFut1 = self.tag {
            // Safety: see above, symmetric for `fut2`.
            let fut2 = unsafe { self.fut2.as_mut() };
            match fut2.progress(reactor, waker) {
                Poll::Pending => {}
                Poll::Completed => {
                    self.tag = Tag::CompletedFut2;
                    let ok = fut2.take_ok();
                    self.state.set_ok(ok);
                    return Poll::Completed;
                }
                Poll::Failure => {
                    // select propagates fut1's errcode verbatim on a double failure (§9), so
                    // fut2's errcode is not recorded anywhere.
                    self.tag = if self.tag == Tag::FailedFut1 {
                        Tag::FailedBoth
                    } else {
                        Tag::FailedFut2
                    };
                }
            }
        }

        if self.tag == Tag::FailedBoth {
            self.state.set_errcode(self.fut1_errcode);
            return Poll::Failure;
        }

        Poll::Pending
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
