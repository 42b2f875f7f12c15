//! The I/O reactor: blocks on kernel readiness and reports which wakers fired.
//!
//! Backed by `mio::Poll` rather than hand-rolled `libc::epoll_*` calls (`DESIGN.md`, "reactor
//! backend"); `mio` is the ecosystem's standard portable wrapper around epoll/kqueue/IOCP for
//! exactly this "register a descriptor, block until one is ready, dispatch by token" shape.

use std::os::unix::io::RawFd;
use std::time::Duration;

use log::{debug, error, trace};
use mio::unix::SourceFd;
use mio::{Events, Token};
use slab::Slab;
use thiserror::Error;

use crate::waker::Waker;

/// The interest mask passed through to the kernel readiness multiplexer.
///
/// The reactor does not interpret this value (§4.3); it is handed to `mio` verbatim.
pub type Interest = mio::Interest;

/// Interest in the descriptor becoming readable.
pub const READABLE: Interest = mio::Interest::READABLE;
/// Interest in the descriptor becoming writable.
pub const WRITABLE: Interest = mio::Interest::WRITABLE;

/// Maximum number of events drained from a single `poll()` call, mirroring the reference's
/// `MAX_EVENTS`.
const MAX_EVENTS: usize = 64;

/// Failures from the reactor's registration table.
#[derive(Debug, Error)]
pub enum ReactorError {
    /// Caller attempted to register an fd that already has a live registration.
    #[error("fd {0} is already registered")]
    DuplicateRegistration(RawFd),
    /// Caller attempted to unregister an fd with no live registration.
    #[error("fd {0} is not registered")]
    UnknownDescriptor(RawFd),
    /// The underlying kernel readiness handle reported an OS error.
    #[error("I/O error from the kernel readiness handle: {0}")]
    Io(#[from] std::io::Error),
}

/// Owns the kernel readiness handle and the registration table mapping descriptors to wakers.
///
/// Error conditions on a registered descriptor (the `error` interest named in §6) are reported
/// by the OS multiplexer unconditionally, independent of the requested [`Interest`]; there is no
/// separate constant to request them, matching `epoll`'s own behavior that `EPOLLERR`/`EPOLLHUP`
/// are always watched.
pub struct Reactor<V> {
    poll: mio::Poll,
    events: Events,
    registrations: Slab<(RawFd, Waker<V>)>,
    by_fd: std::collections::HashMap<RawFd, usize>,
}

impl<V> Reactor<V> {
    /// Acquires a kernel readiness handle. Fatal if the OS refuses (§7): this indicates the
    /// runtime cannot maintain its contract.
    pub fn create() -> Self {
        debug!("creating reactor");
        let poll = mio::Poll::new().unwrap_or_else(|e| {
            error!("failed to create kernel readiness handle: {}", e);
            panic!("failed to create kernel readiness handle: {}", e);
        });
        Reactor {
            poll,
            events: Events::with_capacity(MAX_EVENTS),
            registrations: Slab::new(),
            by_fd: std::collections::HashMap::new(),
        }
    }

    /// Number of descriptors currently registered.
    pub fn registered_count(&self) -> usize {
        self.registrations.len()
    }

    /// Registers `fd` for `interest`, storing `waker` as the per-registration cookie.
    ///
    /// Re-registering an fd that already has a live registration is a caller error, reported
    /// as [`ReactorError::DuplicateRegistration`] rather than silently overwritten (the
    /// reference leaves this unspecified; §4.3 calls it a caller error either way).
    pub fn register(&mut self, fd: RawFd, interest: Interest, waker: Waker<V>) -> Result<(), ReactorError> {
        trace!("registering fd {}", fd);
        if self.by_fd.contains_key(&fd) {
            return Err(ReactorError::DuplicateRegistration(fd));
        }
        let key = self.registrations.insert((fd, waker));
        if let Err(e) = self.poll.registry().register(&mut SourceFd(&fd), Token(key), interest) {
            self.registrations.remove(key);
            return Err(ReactorError::Io(e));
        }
        self.by_fd.insert(fd, key);
        Ok(())
    }

    /// Removes `fd`'s registration.
    pub fn unregister(&mut self, fd: RawFd) -> Result<(), ReactorError> {
        trace!("unregistering fd {}", fd);
        let key = self
            .by_fd
            .remove(&fd)
            .ok_or(ReactorError::UnknownDescriptor(fd))?;
        self.registrations.remove(key);
        self.poll.registry().deregister(&mut SourceFd(&fd))?;
        Ok(())
    }

    /// Blocks until at least one registered descriptor is ready, then returns the wakers whose
    /// descriptors fired. Returns an empty `Vec` immediately if nothing is registered, so the
    /// executor's drive loop can exit.
    ///
    /// Collects the fired wakers rather than invoking them itself: the caller holds this
    /// `Reactor` through `&mut Executor`'s `reactor` field, and a waker's firing reaches back
    /// into that same `Executor` through its raw pointer, so invocation has to happen after
    /// this borrow ends.
    ///
    /// A kernel error from the underlying `poll` call is fatal (§7): the reactor cannot
    /// maintain its contract once the readiness handle itself is broken.
    pub fn poll(&mut self) -> Vec<Waker<V>> {
        if self.registrations.is_empty() {
            trace!("no registered descriptors, skipping poll");
            return Vec::new();
        }
        if let Err(e) = self.poll.poll(&mut self.events, None::<Duration>) {
            error!("kernel readiness handle returned an error: {}", e);
            panic!("kernel readiness handle returned an error: {}", e);
        }
        let mut fired = Vec::new();
        for event in self.events.iter() {
            let key = event.token().0;
            if let Some((fd, waker)) = self.registrations.get(key) {
                trace!("descriptor {} ready", fd);
                fired.push(*waker);
            }
        }
        fired
    }
}

impl<V> Drop for Reactor<V> {
    fn drop(&mut self) {
        debug!("destroying reactor");
    }
}
