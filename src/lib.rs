//! A minimal cooperative asynchronous runtime: a poll-based future contract, three combinators
//! (`then`, `join`, `select`), a FIFO single-threaded executor, and a kernel-readiness reactor.
//!
//! This crate does not provide `async`/`await` sugar, leaf I/O futures, or a thread pool; it
//! provides the core the rest of a runtime is built on. Leaves are expected to embed a
//! [`FutureState`] and drive their own readiness via [`Reactor::register`]/[`Reactor::unregister`].
//!
//! # Example
//!
//! ```
//! use async_core::{Executor, Future, FutureState, Poll, Reactor, Waker};
//!
//! struct Immediate<V> {
//!     state: FutureState<V>,
//!     value: Option<V>,
//! }
//!
//! impl<V> Future<V> for Immediate<V> {
//!     fn progress(&mut self, _reactor: &mut Reactor<V>, _waker: Waker<V>) -> Poll {
//!         self.state.set_ok(self.value.take().unwrap());
//!         Poll::Completed
//!     }
//!     fn is_active(&self) -> bool { self.state.is_active() }
//!     fn set_active(&mut self, active: bool) { self.state.set_active(active) }
//!     fn set_arg(&mut self, arg: V) { self.state.set_arg(arg) }
//!     fn take_ok(&mut self) -> V { self.state.take_ok() }
//!     fn errcode(&self) -> i32 { self.state.errcode() }
//! }
//!
//! let mut fut: Immediate<i32> = Immediate { state: FutureState::new(), value: Some(7) };
//! let mut executor = Executor::create(16);
//! executor.spawn(&mut fut).unwrap();
//! executor.run();
//! ```

mod executor;
mod future;
mod handle;
mod join;
mod queue;
mod reactor;
mod select;
mod then;
mod waker;

pub use executor::{Executor, ExecutorError};
pub use future::{
    ErrCode, Future, FutureState, Poll, FUTURE_SUCCESS, JOIN_ERR_BOTH_FAILED, JOIN_ERR_FUT1_FAILED,
    JOIN_ERR_FUT2_FAILED, THEN_ERR_FUT1_FAILED, THEN_ERR_FUT2_FAILED,
};
pub use handle::FutureHandle;
pub use join::{join, ChildResult, JoinFuture};
pub use queue::{QueueFull, ReadyQueue};
pub use reactor::{Interest, Reactor, ReactorError, READABLE, WRITABLE};
pub use select::{select, SelectFuture};
pub use then::{then, ThenFuture};
pub use waker::Waker;
