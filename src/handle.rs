//! Stable, non-owning references to futures.
//!
//! The executor's ready queue, the reactor's registration table, and every combinator's child
//! references all need to name a future without owning it (futures are caller-owned, see
//! `DESIGN.md`, "cyclic references"). This module is the one place that unsafe pointer
//! arithmetic lives; everything above it works with `FutureHandle<V>` as an opaque, `Copy`
//! value.

use std::ptr::NonNull;

use crate::future::Future;

/// A non-owning, `Copy` handle to a live `dyn Future<V>`.
///
/// # Safety contract
///
/// The future a `FutureHandle` points to must outlive every handle derived from it and every
/// use of those handles (spawning it, registering a waker that names it, holding it as a
/// combinator child). The runtime never deallocates the pointee; it is the caller's
/// responsibility to keep it alive for as long as it is reachable through the executor, the
/// reactor's registration table, or a combinator. This mirrors the reference implementation's
/// raw `Future*` pointers exactly; Rust does not make the aliasing implicit in a self-referential
/// runtime any safer than C does, so the contract is documented rather than enforced.
pub struct FutureHandle<V>(NonNull<dyn Future<V>>);

impl<V> FutureHandle<V> {
    /// Creates a handle to `future`.
    ///
    /// # Safety
    ///
    /// `future` must remain valid (not moved, not dropped) for as long as the returned handle,
    /// or any copy of it, may be dereferenced.
    pub unsafe fn new(future: &mut dyn Future<V>) -> Self {
        FutureHandle(NonNull::new_unchecked(future as *mut dyn Future<V>))
    }

    /// Dereferences the handle.
    ///
    /// # Safety
    ///
    /// The pointee must still be alive, per the contract on [`FutureHandle::new`]. Callers must
    /// also not alias this with another live `&mut` to the same future (the executor's
    /// single-threaded, non-reentrant drive loop upholds this: a future is progressed from
    /// exactly one call site at a time).
    #[allow(clippy::mut_from_ref)]
    pub unsafe fn as_mut(&self) -> &mut dyn Future<V> {
        &mut *self.0.as_ptr()
    }
}

impl<V> Clone for FutureHandle<V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for FutureHandle<V> {}

impl<V> PartialEq for FutureHandle<V> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<V> Eq for FutureHandle<V> {}

impl<V> std::fmt::Debug for FutureHandle<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FutureHandle({:p})", self.0.as_ptr())
    }
}
