//! Release policies: how an owned handle is given back.
//!
//! A release policy is the value a wrapper calls exactly once per owned
//! handle. It decides *how* a resource is released; *whether* a handle is
//! owned at all is the job of the wrapper's [`Sentinel`](crate::Sentinel).
//!
//! # Module Structure
//!
//! - [`memory`] - `Box` allocations (`BoxDelete`, `BoxSliceDelete`)
//! - [`func`] - closures as policies (`ReleaseFn`)
//! - [`task`] - aborting async tasks (`AbortTask`, `AbortJoin`)
//!
//! # Handle Resolution
//!
//! A wrapper is declared over a type parameter `H`, but stores the policy's
//! associated [`ReleasePolicy::Handle`]. Most policies use `H` itself; a
//! policy may instead name a different concrete handle, which lets a wrapper
//! be declared in terms of what it manages rather than how it is addressed:
//!
//! ```rust
//! use unique_rc::{ReleasePolicy, Resolved, UniqueRc};
//!
//! /// A file dialog event subscription.
//! struct DialogEvents;
//!
//! /// Unsubscribes a cookie from the dialog that issued it.
//! #[derive(Default)]
//! struct Unadvise {
//!     unadvised: Vec<u32>,
//! }
//!
//! impl ReleasePolicy<DialogEvents> for Unadvise {
//!     type Handle = u32;
//!
//!     fn release(&mut self, cookie: u32) {
//!         self.unadvised.push(cookie);
//!     }
//! }
//!
//! let subscription: UniqueRc<DialogEvents, Unadvise> = UniqueRc::new(12);
//! let cookie: Resolved<DialogEvents, Unadvise> = subscription.get();
//! assert_eq!(cookie, 12);
//! ```
//!
//! # Stock Implementations
//!
//! - `fn(H)` pointers are policies. They are never `Default`, so a wrapper
//!   using one must be given the function explicitly.
//! - `&mut D` borrows a policy owned elsewhere. Borrowed policies cannot be
//!   moved out of a live wrapper, so `take`, `assign_from` and `swap` are
//!   unavailable for them.

pub mod func;
pub mod memory;
pub mod task;

/// Releases a handle.
///
/// # Type Parameters
///
/// * `H` - The type the wrapper is declared over
///
/// # Requirements
///
/// `release` must not panic. It is only ever called with handles that the
/// wrapper's sentinel reports as owned, and at most once per handle.
pub trait ReleasePolicy<H> {
    /// The concrete handle type stored by wrappers using this policy.
    type Handle;

    /// Gives back the resource denoted by `handle`.
    fn release(&mut self, handle: Self::Handle);
}

/// The handle type a wrapper declared over `H` with policy `D` actually stores.
pub type Resolved<H, D> = <D as ReleasePolicy<H>>::Handle;

impl<H> ReleasePolicy<H> for fn(H) {
    type Handle = H;

    fn release(&mut self, handle: H) {
        (*self)(handle)
    }
}

impl<H, D> ReleasePolicy<H> for &mut D
where
    D: ReleasePolicy<H> + ?Sized,
{
    type Handle = D::Handle;

    fn release(&mut self, handle: Self::Handle) {
        (**self).release(handle)
    }
}
