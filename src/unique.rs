//! The single-owner wrapper.
//!
//! [`UniqueRc<H, D, S>`] owns at most one handle and releases it exactly once,
//! through its release policy `D`, when it is reset or dropped. Whether the
//! stored handle is owned is decided by the sentinel `S`.
//!
//! | Operation | Requires | Effect |
//! |-----------|----------|--------|
//! | `empty()`, `Default` | `D: Default` | empty wrapper |
//! | `new(h)` | `D: Default` | owns `h` |
//! | `with_policy(h, d)` | - | owns `h`, released through `d` |
//! | `reset(h)` | - | releases the old handle if owned, adopts `h` |
//! | `release()` | - | returns the handle without releasing it |
//! | `take()` | `D: MoveConstruct` | moves ownership out, leaves `self` empty |
//! | `assign_from(&mut w)` | `D: MoveAssign` | releases own handle, takes `w`'s |
//! | `swap(&mut w)` | both | exchanges handles and policies |
//! | `get()` | handle is `Copy` | the stored handle |
//!
//! # Example
//!
//! ```rust
//! use unique_rc::sentinel::InvalidHandleValue;
//! use unique_rc::testing::Counting;
//! use unique_rc::{Null, UniqueRc};
//!
//! type Fd = UniqueRc<i32, Counting, InvalidHandleValue>;
//!
//! let closes = Counting::new();
//! let mut fd = Fd::with_policy(3, closes.clone());
//! assert_eq!(fd.get(), 3);
//!
//! fd.reset(4);
//! assert_eq!(closes.count(), 1);
//!
//! fd.reset_empty();
//! assert!(fd == Null);
//! assert_eq!(fd.get(), -1);
//! assert_eq!(closes.count(), 2);
//! ```
//!
//! Hashing requires a hashable handle:
//!
//! ```rust,compile_fail
//! use std::collections::HashSet;
//! use unique_rc::{ReleasePolicy, UniqueRc};
//!
//! #[derive(Default, PartialEq, Eq)]
//! struct Fence(u32);
//!
//! #[derive(Default)]
//! struct Signal;
//!
//! impl ReleasePolicy<Fence> for Signal {
//!     type Handle = Fence;
//!     fn release(&mut self, _fence: Fence) {}
//! }
//!
//! let mut fences = HashSet::new();
//! fences.insert(UniqueRc::<Fence, Signal>::new(Fence(1)));
//! ```
//!
//! Function-pointer policies have no default value, so there is no empty
//! wrapper without one:
//!
//! ```rust,compile_fail
//! use unique_rc::UniqueRc;
//!
//! let closer: UniqueRc<i32, fn(i32)> = UniqueRc::empty();
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Deref, DerefMut};

use crate::capability::{MoveAssign, MoveConstruct, Swappable};
use crate::error::InvalidHandle;
use crate::holder::Holder;
use crate::policy::memory::{BoxDelete, BoxPtr};
use crate::policy::ReleasePolicy;
use crate::sentinel::{DefaultSentinel, Null, NullSentinel, Sentinel};

/// Owns one handle and releases it exactly once.
///
/// # Type Parameters
///
/// * `H` - The declared handle type; the stored type is `D::Handle`
/// * `D` - The release policy
/// * `S` - The sentinel; defaults to the handle's default value
pub struct UniqueRc<H, D, S = DefaultSentinel>
where
    D: ReleasePolicy<H>,
    S: Sentinel<D::Handle>,
{
    holder: Holder<H, D, S>,
}

/// Owns a single `Box` allocation.
///
/// Dereferencing an empty `UniquePtr` panics.
pub type UniquePtr<T, D = BoxDelete<T>> = UniqueRc<BoxPtr<T>, D, NullSentinel>;

impl<H, D, S> UniqueRc<H, D, S>
where
    D: ReleasePolicy<H>,
    S: Sentinel<D::Handle>,
{
    /// Creates a wrapper that owns nothing.
    pub fn empty() -> Self
    where
        D: Default,
    {
        Self::empty_with(D::default())
    }

    /// Creates a wrapper that owns nothing but carries `policy`.
    pub fn empty_with(policy: D) -> Self {
        UniqueRc {
            holder: Holder::empty_with(policy),
        }
    }

    /// Takes ownership of `handle`.
    pub fn new(handle: D::Handle) -> Self
    where
        D: Default,
    {
        Self::with_policy(handle, D::default())
    }

    /// Takes ownership of `handle`, to be released through `policy`.
    pub fn with_policy(handle: D::Handle, policy: D) -> Self {
        UniqueRc {
            holder: Holder::with_policy(handle, policy),
        }
    }

    /// Takes ownership of `handle`, rejecting one the sentinel reports as unowned.
    pub fn try_new(handle: D::Handle) -> Result<Self, InvalidHandle<D::Handle>>
    where
        D: Default,
    {
        Self::try_with_policy(handle, D::default())
    }

    /// Like [`try_new`](Self::try_new) with an explicit policy.
    ///
    /// On error `policy` is dropped and the handle is returned inside the error.
    pub fn try_with_policy(
        handle: D::Handle,
        policy: D,
    ) -> Result<Self, InvalidHandle<D::Handle>> {
        if S::is_owned(&handle) {
            Ok(Self::with_policy(handle, policy))
        } else {
            Err(InvalidHandle::new(handle))
        }
    }

    /// The value an empty wrapper stores.
    pub fn invalid() -> D::Handle {
        S::invalid().into()
    }

    /// Returns a copy of the stored handle, owned or not.
    pub fn get(&self) -> D::Handle
    where
        D::Handle: Copy,
    {
        *self.holder.handle()
    }

    /// Borrows the stored handle.
    pub fn as_handle(&self) -> &D::Handle {
        self.holder.handle()
    }

    /// The release policy.
    pub fn policy(&self) -> &D {
        self.holder.policy()
    }

    /// The release policy, mutably.
    pub fn policy_mut(&mut self) -> &mut D {
        self.holder.policy_mut()
    }

    /// Returns true if the wrapper owns a live resource.
    pub fn is_owned(&self) -> bool {
        self.holder.is_owned()
    }

    /// Gives up ownership without releasing the resource.
    ///
    /// The wrapper is left empty; the caller becomes responsible for the
    /// returned handle.
    pub fn release(&mut self) -> D::Handle {
        self.holder.release()
    }

    /// Releases the owned resource, if any, and takes ownership of `handle`.
    ///
    /// Resetting to the handle already owned releases it anyway and leaves
    /// the wrapper holding a dead handle. With the `tracing` feature this is
    /// logged as a warning; with `strict-self-reset` it panics in debug builds.
    pub fn reset(&mut self, handle: D::Handle) {
        self.holder.reset(handle)
    }

    /// Releases the owned resource, if any, leaving the wrapper empty.
    pub fn reset_empty(&mut self) {
        self.holder.reset(Self::invalid())
    }

    /// Moves ownership into a new wrapper and leaves `self` empty.
    pub fn take(&mut self) -> Self
    where
        D: MoveConstruct,
    {
        UniqueRc {
            holder: self.holder.take(),
        }
    }

    /// Releases the owned resource, then takes over `donor`'s handle and policy.
    pub fn assign_from(&mut self, donor: &mut Self)
    where
        D: MoveAssign,
    {
        self.holder.assign_from(&mut donor.holder)
    }

    /// Exchanges handles and policies.
    pub fn swap(&mut self, other: &mut Self)
    where
        D: Swappable,
    {
        self.holder.swap(&mut other.holder)
    }

    /// Dissolves the wrapper without releasing anything.
    pub fn into_parts(self) -> (D::Handle, D) {
        self.holder.into_parts()
    }

    /// Builds a wrapper from a related instantiation with the same sentinel.
    ///
    /// The handle and the policy are converted with `Into`. An empty source
    /// yields an empty wrapper holding this type's own invalid value. Sources
    /// with a different sentinel go through
    /// [`try_convert_from`](Self::try_convert_from).
    ///
    /// ```rust
    /// use unique_rc::testing::Counting;
    /// use unique_rc::UniqueRc;
    ///
    /// let narrow: UniqueRc<u16, Counting> = UniqueRc::new(7);
    /// let wide: UniqueRc<u32, Counting> = UniqueRc::convert_from(narrow);
    /// assert_eq!(wide.get(), 7u32);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `S` reports an owned source handle as unowned once it has
    /// been converted, since the wrapper could never release it.
    pub fn convert_from<H2, D2>(other: UniqueRc<H2, D2, S>) -> Self
    where
        D2: ReleasePolicy<H2> + Into<D>,
        S: Sentinel<D2::Handle>,
        D2::Handle: Into<D::Handle>,
    {
        match Self::try_convert_from(other) {
            Ok(converted) => converted,
            Err(err) => panic!("conversion dropped ownership: {}", err),
        }
    }

    /// Builds a wrapper from a related instantiation with any sentinel.
    ///
    /// Fails when the source owns a handle that converts to a value `S`
    /// treats as unowned. The converted handle is then returned inside the
    /// error and the policy is dropped without releasing anything.
    ///
    /// ```rust
    /// use unique_rc::sentinel::InvalidHandleValue;
    /// use unique_rc::testing::Counting;
    /// use unique_rc::UniqueRc;
    ///
    /// // Descriptor 0 is valid, but 0 is the invalid value of the target.
    /// let stdin: UniqueRc<i32, Counting, InvalidHandleValue> = UniqueRc::new(0);
    /// let err = UniqueRc::<i64, Counting>::try_convert_from(stdin).unwrap_err();
    /// assert_eq!(err.into_handle(), 0);
    /// ```
    pub fn try_convert_from<H2, D2, S2>(
        other: UniqueRc<H2, D2, S2>,
    ) -> Result<Self, InvalidHandle<D::Handle>>
    where
        D2: ReleasePolicy<H2> + Into<D>,
        S2: Sentinel<D2::Handle>,
        D2::Handle: Into<D::Handle>,
    {
        let owned = other.is_owned();
        let (handle, policy) = other.into_parts();
        if owned {
            Self::try_with_policy(handle.into(), policy.into())
        } else {
            Ok(Self::empty_with(policy.into()))
        }
    }

    /// Converts into a related instantiation; see [`convert_from`](Self::convert_from).
    pub fn convert<H2, D2>(self) -> UniqueRc<H2, D2, S>
    where
        D: Into<D2>,
        D2: ReleasePolicy<H2>,
        S: Sentinel<D2::Handle>,
        D::Handle: Into<D2::Handle>,
    {
        UniqueRc::convert_from(self)
    }

    /// Releases the owned resource, then takes over a converted `other`.
    ///
    /// # Panics
    ///
    /// Under the same condition as [`convert_from`](Self::convert_from).
    pub fn assign_converted<H2, D2>(&mut self, other: UniqueRc<H2, D2, S>)
    where
        D2: ReleasePolicy<H2> + Into<D>,
        S: Sentinel<D2::Handle>,
        D2::Handle: Into<D::Handle>,
    {
        self.reset_empty();
        *self = Self::convert_from(other);
    }
}

impl<H, D, S> Default for UniqueRc<H, D, S>
where
    D: ReleasePolicy<H> + Default,
    S: Sentinel<D::Handle>,
{
    fn default() -> Self {
        Self::empty()
    }
}

impl<T, D> UniqueRc<BoxPtr<T>, D, NullSentinel>
where
    D: ReleasePolicy<BoxPtr<T>, Handle = BoxPtr<T>>,
{
    /// Takes ownership of a boxed value.
    pub fn from_box(boxed: Box<T>) -> Self
    where
        D: Default,
    {
        Self::new(BoxPtr::from_box(boxed))
    }

    /// The raw address; null when empty.
    pub fn as_ptr(&self) -> *mut T {
        self.as_handle().as_ptr()
    }

    /// Borrows the pointee, or `None` when empty.
    pub fn as_ref(&self) -> Option<&T> {
        self.as_handle().as_ref()
    }

    /// Mutably borrows the pointee, or `None` when empty.
    pub fn as_mut(&mut self) -> Option<&mut T> {
        self.holder.handle_mut().as_mut()
    }

    /// Gives the allocation back as a `Box`, or `None` when empty.
    pub fn into_box(self) -> Option<Box<T>> {
        self.into_parts().0.into_box()
    }
}

impl<T, D> Deref for UniqueRc<BoxPtr<T>, D, NullSentinel>
where
    D: ReleasePolicy<BoxPtr<T>, Handle = BoxPtr<T>>,
{
    type Target = T;

    fn deref(&self) -> &T {
        match self.as_ref() {
            Some(value) => value,
            None => panic!(
                "dereferenced an empty UniquePtr<{}>",
                std::any::type_name::<T>()
            ),
        }
    }
}

impl<T, D> DerefMut for UniqueRc<BoxPtr<T>, D, NullSentinel>
where
    D: ReleasePolicy<BoxPtr<T>, Handle = BoxPtr<T>>,
{
    fn deref_mut(&mut self) -> &mut T {
        match self.as_mut() {
            Some(value) => value,
            None => panic!(
                "dereferenced an empty UniquePtr<{}>",
                std::any::type_name::<T>()
            ),
        }
    }
}

impl<T, D> fmt::Pointer for UniqueRc<BoxPtr<T>, D, NullSentinel>
where
    D: ReleasePolicy<BoxPtr<T>, Handle = BoxPtr<T>>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Pointer::fmt(self.as_handle(), f)
    }
}

// Comparisons look at the stored handles only, across any two instantiations
// whose handles compare.

impl<H, D, S, H2, D2, S2> PartialEq<UniqueRc<H2, D2, S2>> for UniqueRc<H, D, S>
where
    D: ReleasePolicy<H>,
    S: Sentinel<D::Handle>,
    D2: ReleasePolicy<H2>,
    S2: Sentinel<D2::Handle>,
    D::Handle: PartialEq<D2::Handle>,
{
    fn eq(&self, other: &UniqueRc<H2, D2, S2>) -> bool {
        self.as_handle() == other.as_handle()
    }
}

impl<H, D, S> Eq for UniqueRc<H, D, S>
where
    D: ReleasePolicy<H>,
    S: Sentinel<D::Handle>,
    D::Handle: Eq,
{
}

impl<H, D, S, H2, D2, S2> PartialOrd<UniqueRc<H2, D2, S2>> for UniqueRc<H, D, S>
where
    D: ReleasePolicy<H>,
    S: Sentinel<D::Handle>,
    D2: ReleasePolicy<H2>,
    S2: Sentinel<D2::Handle>,
    D::Handle: PartialOrd<D2::Handle>,
{
    fn partial_cmp(&self, other: &UniqueRc<H2, D2, S2>) -> Option<Ordering> {
        self.as_handle().partial_cmp(other.as_handle())
    }
}

impl<H, D, S> Ord for UniqueRc<H, D, S>
where
    D: ReleasePolicy<H>,
    S: Sentinel<D::Handle>,
    D::Handle: Ord,
{
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_handle().cmp(other.as_handle())
    }
}

impl<H, D, S> PartialEq<Null> for UniqueRc<H, D, S>
where
    D: ReleasePolicy<H>,
    S: Sentinel<D::Handle>,
{
    fn eq(&self, _: &Null) -> bool {
        !self.is_owned()
    }
}

impl<H, D, S> PartialEq<UniqueRc<H, D, S>> for Null
where
    D: ReleasePolicy<H>,
    S: Sentinel<D::Handle>,
{
    fn eq(&self, other: &UniqueRc<H, D, S>) -> bool {
        !other.is_owned()
    }
}

impl<H, D, S> PartialOrd<Null> for UniqueRc<H, D, S>
where
    D: ReleasePolicy<H>,
    S: Sentinel<D::Handle>,
    D::Handle: From<Null> + PartialOrd,
{
    fn partial_cmp(&self, _: &Null) -> Option<Ordering> {
        self.as_handle().partial_cmp(&D::Handle::from(Null))
    }
}

impl<H, D, S> PartialOrd<UniqueRc<H, D, S>> for Null
where
    D: ReleasePolicy<H>,
    S: Sentinel<D::Handle>,
    D::Handle: From<Null> + PartialOrd,
{
    fn partial_cmp(&self, other: &UniqueRc<H, D, S>) -> Option<Ordering> {
        D::Handle::from(Null).partial_cmp(other.as_handle())
    }
}

impl<H, D, S> Hash for UniqueRc<H, D, S>
where
    D: ReleasePolicy<H>,
    S: Sentinel<D::Handle>,
    D::Handle: Hash,
{
    fn hash<St: Hasher>(&self, state: &mut St) {
        self.as_handle().hash(state)
    }
}

impl<H, D, S> fmt::Display for UniqueRc<H, D, S>
where
    D: ReleasePolicy<H>,
    S: Sentinel<D::Handle>,
    D::Handle: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_handle(), f)
    }
}

impl<H, D, S> fmt::Debug for UniqueRc<H, D, S>
where
    D: ReleasePolicy<H>,
    S: Sentinel<D::Handle>,
    D::Handle: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UniqueRc")
            .field("handle", self.as_handle())
            .field("owned", &self.is_owned())
            .field("policy", &std::any::type_name::<D>())
            .finish()
    }
}
