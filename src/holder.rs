//! The storage cell shared by every ownership wrapper.
//!
//! A [`Holder`] binds one handle to one release policy and implements the
//! bookkeeping of the ownership state machine:
//!
//! ```text
//!            new(h) / reset(h)              reset(h2): release h, adopt h2
//!   Empty ---------------------> Owning  <-----------------------------+
//!     ^                            |  |                                |
//!     |   reset_empty / drop       |  +--------------------------------+
//!     +----------------------------+
//!     |   release / take (donor)   |
//!     +----------------------------+
//! ```
//!
//! Every transition out of `Owning` either calls the policy exactly once
//! (`reset`, drop) or hands the handle to someone else without calling it
//! (`release`, `take`, `assign_from`, `into_parts`).

use std::marker::PhantomData;
use std::mem::{self, ManuallyDrop};
use std::ptr;

use crate::capability::{MoveAssign, MoveConstruct, Swappable};
use crate::diagnostics;
use crate::policy::ReleasePolicy;
use crate::sentinel::Sentinel;

/// One handle plus the policy that releases it.
///
/// # Type Parameters
///
/// * `H` - The type the holder is declared over
/// * `D` - The release policy; `D::Handle` is what is stored
/// * `S` - The sentinel deciding which stored values are owned
pub struct Holder<H, D, S>
where
    D: ReleasePolicy<H>,
    S: Sentinel<D::Handle>,
{
    handle: D::Handle,
    policy: D,
    _marker: PhantomData<fn() -> (H, S)>,
}

impl<H, D, S> Holder<H, D, S>
where
    D: ReleasePolicy<H>,
    S: Sentinel<D::Handle>,
{
    /// Takes ownership of `handle` with a default-constructed policy.
    pub fn new(handle: D::Handle) -> Self
    where
        D: Default,
    {
        Self::with_policy(handle, D::default())
    }

    /// Takes ownership of `handle`, released later through `policy`.
    pub fn with_policy(handle: D::Handle, policy: D) -> Self {
        Holder {
            handle,
            policy,
            _marker: PhantomData,
        }
    }

    /// Creates a holder that owns nothing.
    pub fn empty_with(policy: D) -> Self {
        Self::with_policy(S::invalid().into(), policy)
    }

    /// The stored handle, owned or not.
    pub fn handle(&self) -> &D::Handle {
        &self.handle
    }

    pub(crate) fn handle_mut(&mut self) -> &mut D::Handle {
        &mut self.handle
    }

    /// The release policy.
    pub fn policy(&self) -> &D {
        &self.policy
    }

    /// The release policy, mutably.
    pub fn policy_mut(&mut self) -> &mut D {
        &mut self.policy
    }

    /// Returns true if the stored handle denotes a live resource.
    pub fn is_owned(&self) -> bool {
        S::is_owned(&self.handle)
    }

    /// Adopts `handle`, releasing the previously owned handle if any.
    ///
    /// The new handle is stored before the old one is released. Resetting to
    /// the handle already held (`h.reset(h.get())`) still releases it; this is
    /// reported by the diagnostics hooks and is the caller's responsibility.
    pub fn reset(&mut self, handle: D::Handle) {
        let old = mem::replace(&mut self.handle, handle);
        if S::is_owned(&old) {
            if S::same_handle(&old, &self.handle) {
                diagnostics::self_reset::<H, D>();
            }
            diagnostics::released::<H, D>();
            self.policy.release(old);
        }
    }

    /// Gives up ownership without releasing; the holder becomes empty.
    pub fn release(&mut self) -> D::Handle {
        mem::replace(&mut self.handle, S::invalid().into())
    }

    /// Exchanges handles and policies with `other`.
    pub fn swap(&mut self, other: &mut Self)
    where
        D: Swappable,
    {
        mem::swap(&mut self.handle, &mut other.handle);
        mem::swap(&mut self.policy, &mut other.policy);
    }

    /// Moves ownership and the policy into a new holder, leaving `self` empty.
    pub fn take(&mut self) -> Self
    where
        D: MoveConstruct,
    {
        let handle = self.release();
        Self::with_policy(handle, self.policy.move_construct())
    }

    /// Releases what `self` owns, then adopts `donor`'s handle and policy.
    ///
    /// `donor` is left empty.
    pub fn assign_from(&mut self, donor: &mut Self)
    where
        D: MoveAssign,
    {
        self.reset(donor.release());
        self.policy.move_assign(&mut donor.policy);
    }

    /// Dissolves the holder without releasing anything.
    pub fn into_parts(self) -> (D::Handle, D) {
        let this = ManuallyDrop::new(self);
        // SAFETY: `this` is never dropped or used again, so each field is
        // moved out exactly once.
        unsafe { (ptr::read(&this.handle), ptr::read(&this.policy)) }
    }
}

impl<H, D, S> Drop for Holder<H, D, S>
where
    D: ReleasePolicy<H>,
    S: Sentinel<D::Handle>,
{
    fn drop(&mut self) {
        if S::is_owned(&self.handle) {
            let handle = self.release();
            diagnostics::released::<H, D>();
            self.policy.release(handle);
        }
    }
}

impl<H, D, S> std::fmt::Debug for Holder<H, D, S>
where
    D: ReleasePolicy<H>,
    D::Handle: std::fmt::Debug,
    S: Sentinel<D::Handle>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Holder")
            .field("handle", &self.handle)
            .field("owned", &self.is_owned())
            .field("policy", &std::any::type_name::<D>())
            .finish()
    }
}
