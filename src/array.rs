//! The array-owning wrapper.
//!
//! [`UniqueArray<T>`] owns a contiguous run of `T` through a [`SlicePtr<T>`]
//! handle. It shares the holder and state machine of
//! [`UniqueRc`](crate::UniqueRc), but is a separate type: it indexes instead
//! of dereferencing, and it never converts to or from a single-object
//! wrapper.
//!
//! # Example
//!
//! ```rust
//! use unique_rc::{Null, UniqueArray};
//!
//! let mut samples: UniqueArray<u16> = (1..=4).collect();
//! samples[0] = 10;
//! assert_eq!(samples.len(), 4);
//! assert_eq!(samples.get(3), Some(&4));
//! assert_eq!(samples.get(4), None);
//!
//! samples.reset(vec![7, 8]);
//! assert_eq!(samples.as_slice(), Some(&[7, 8][..]));
//!
//! samples.reset_empty();
//! assert!(samples == Null);
//! ```
//!
//! Single-element dereference does not exist:
//!
//! ```rust,compile_fail
//! use unique_rc::UniqueArray;
//!
//! let samples: UniqueArray<u16> = UniqueArray::from(vec![1, 2]);
//! let first: u16 = *samples;
//! ```
//!
//! Element types must match exactly:
//!
//! ```rust,compile_fail
//! use unique_rc::UniqueArray;
//!
//! let bytes: UniqueArray<u8> = UniqueArray::from(vec![1, 2]);
//! let words: UniqueArray<u16> = UniqueArray::convert_from(bytes);
//! ```
//!
//! The sentinel is kept across conversions, so an owned array never becomes
//! one its new wrapper would ignore:
//!
//! ```rust,compile_fail
//! use unique_rc::policy::memory::{BoxSliceDelete, SlicePtr};
//! use unique_rc::sentinel::Sentinel;
//! use unique_rc::UniqueArray;
//!
//! struct ShortIsEmpty;
//!
//! impl Sentinel<SlicePtr<u8>> for ShortIsEmpty {
//!     type Invalid = SlicePtr<u8>;
//!     fn invalid() -> SlicePtr<u8> {
//!         SlicePtr::null()
//!     }
//!     fn is_owned(handle: &SlicePtr<u8>) -> bool {
//!         handle.len() > 1
//!     }
//! }
//!
//! let short: UniqueArray<u8, BoxSliceDelete<u8>, ShortIsEmpty> =
//!     UniqueArray::with_policy(SlicePtr::from(vec![1, 2]), BoxSliceDelete::new());
//! let plain: UniqueArray<u8> = UniqueArray::convert_from(short);
//! ```
//!
//! Arrays and single objects do not convert into each other:
//!
//! ```rust,compile_fail
//! use unique_rc::{UniqueArray, UniquePtr};
//!
//! let single: UniquePtr<u8> = UniquePtr::from_box(Box::new(1));
//! let array: UniqueArray<u8> = UniqueArray::convert_from(single);
//! ```
//!
//! ```rust,compile_fail
//! use unique_rc::{UniqueArray, UniquePtr};
//!
//! let array: UniqueArray<u8> = UniqueArray::from(vec![1]);
//! let single: UniquePtr<u8> = UniquePtr::convert_from(array);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Index, IndexMut};

use crate::capability::{MoveAssign, MoveConstruct, Swappable};
use crate::error::InvalidHandle;
use crate::holder::Holder;
use crate::policy::memory::{BoxSliceDelete, SlicePtr};
use crate::policy::ReleasePolicy;
use crate::sentinel::{Null, NullSentinel, Sentinel};

/// Owns one heap array and releases it exactly once.
pub struct UniqueArray<T, D = BoxSliceDelete<T>, S = NullSentinel>
where
    D: ReleasePolicy<SlicePtr<T>, Handle = SlicePtr<T>>,
    S: Sentinel<SlicePtr<T>>,
{
    holder: Holder<SlicePtr<T>, D, S>,
}

impl<T, D, S> UniqueArray<T, D, S>
where
    D: ReleasePolicy<SlicePtr<T>, Handle = SlicePtr<T>>,
    S: Sentinel<SlicePtr<T>>,
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
        UniqueArray {
            holder: Holder::empty_with(policy),
        }
    }

    /// Takes ownership of the array behind `handle`.
    pub fn new(handle: SlicePtr<T>) -> Self
    where
        D: Default,
    {
        Self::with_policy(handle, D::default())
    }

    /// Takes ownership of `handle`, to be released through `policy`.
    pub fn with_policy(handle: SlicePtr<T>, policy: D) -> Self {
        UniqueArray {
            holder: Holder::with_policy(handle, policy),
        }
    }

    /// Takes ownership of a boxed slice.
    pub fn from_boxed_slice(elements: Box<[T]>) -> Self
    where
        D: Default,
    {
        Self::new(SlicePtr::from_boxed_slice(elements))
    }

    /// Takes ownership of `handle`, rejecting one the sentinel reports as unowned.
    pub fn try_from_slice_ptr(handle: SlicePtr<T>) -> Result<Self, InvalidHandle<SlicePtr<T>>>
    where
        D: Default,
    {
        if S::is_owned(&handle) {
            Ok(Self::new(handle))
        } else {
            Err(InvalidHandle::new(handle))
        }
    }

    /// Borrows the stored handle.
    pub fn as_handle(&self) -> &SlicePtr<T> {
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

    /// Returns true if the wrapper owns an array.
    pub fn is_owned(&self) -> bool {
        self.holder.is_owned()
    }

    /// Gives up ownership without releasing the array.
    pub fn release(&mut self) -> SlicePtr<T> {
        self.holder.release()
    }

    /// Releases the owned array, if any, and takes ownership of `elements`.
    ///
    /// Accepts a [`SlicePtr`], a `Box<[T]>`, a `Vec<T>` or [`Null`].
    pub fn reset(&mut self, elements: impl Into<SlicePtr<T>>) {
        self.holder.reset(elements.into())
    }

    /// Releases the owned array, if any, leaving the wrapper empty.
    pub fn reset_empty(&mut self) {
        self.holder.reset(S::invalid().into())
    }

    /// Moves ownership into a new wrapper and leaves `self` empty.
    pub fn take(&mut self) -> Self
    where
        D: MoveConstruct,
    {
        UniqueArray {
            holder: self.holder.take(),
        }
    }

    /// Releases the owned array, then takes over `donor`'s array and policy.
    pub fn assign_from(&mut self, donor: &mut Self)
    where
        D: MoveAssign,
    {
        self.holder.assign_from(&mut donor.holder)
    }

    /// Exchanges arrays and policies.
    pub fn swap(&mut self, other: &mut Self)
    where
        D: Swappable,
    {
        self.holder.swap(&mut other.holder)
    }

    /// Dissolves the wrapper without releasing anything.
    pub fn into_parts(self) -> (SlicePtr<T>, D) {
        self.holder.into_parts()
    }

    /// Gives the array back as a boxed slice, or `None` when empty.
    pub fn into_boxed_slice(self) -> Option<Box<[T]>> {
        self.into_parts().0.into_boxed_slice()
    }

    /// Builds a wrapper from one with the same element type and a related policy.
    ///
    /// The sentinel stays the same, so an owned source stays owned.
    pub fn convert_from<D2>(other: UniqueArray<T, D2, S>) -> Self
    where
        D2: ReleasePolicy<SlicePtr<T>, Handle = SlicePtr<T>> + Into<D>,
    {
        let owned = other.is_owned();
        let (handle, policy) = other.into_parts();
        if owned {
            Self::with_policy(handle, policy.into())
        } else {
            Self::empty_with(policy.into())
        }
    }

    /// Number of elements; zero when empty.
    pub fn len(&self) -> usize {
        self.as_handle().len()
    }

    /// Returns true if there are no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrows the elements, or `None` when empty.
    pub fn as_slice(&self) -> Option<&[T]> {
        self.as_handle().as_slice()
    }

    /// Mutably borrows the elements, or `None` when empty.
    pub fn as_mut_slice(&mut self) -> Option<&mut [T]> {
        self.holder.handle_mut().as_mut_slice()
    }

    /// The element at `index`, or `None` when empty or out of range.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice()?.get(index)
    }

    /// The element at `index`, mutably.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.as_mut_slice()?.get_mut(index)
    }

    /// Iterates over the elements; yields nothing when empty.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().unwrap_or(&[]).iter()
    }
}

impl<T, D, S> Default for UniqueArray<T, D, S>
where
    D: ReleasePolicy<SlicePtr<T>, Handle = SlicePtr<T>> + Default,
    S: Sentinel<SlicePtr<T>>,
{
    fn default() -> Self {
        Self::empty()
    }
}

impl<T, D, S> From<Vec<T>> for UniqueArray<T, D, S>
where
    D: ReleasePolicy<SlicePtr<T>, Handle = SlicePtr<T>> + Default,
    S: Sentinel<SlicePtr<T>>,
{
    fn from(elements: Vec<T>) -> Self {
        Self::new(SlicePtr::from(elements))
    }
}

impl<T, D, S> From<Box<[T]>> for UniqueArray<T, D, S>
where
    D: ReleasePolicy<SlicePtr<T>, Handle = SlicePtr<T>> + Default,
    S: Sentinel<SlicePtr<T>>,
{
    fn from(elements: Box<[T]>) -> Self {
        Self::from_boxed_slice(elements)
    }
}

impl<T, D, S> FromIterator<T> for UniqueArray<T, D, S>
where
    D: ReleasePolicy<SlicePtr<T>, Handle = SlicePtr<T>> + Default,
    S: Sentinel<SlicePtr<T>>,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<T>>())
    }
}

impl<'a, T, D, S> IntoIterator for &'a UniqueArray<T, D, S>
where
    D: ReleasePolicy<SlicePtr<T>, Handle = SlicePtr<T>>,
    S: Sentinel<SlicePtr<T>>,
{
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, D, S> Index<usize> for UniqueArray<T, D, S>
where
    D: ReleasePolicy<SlicePtr<T>, Handle = SlicePtr<T>>,
    S: Sentinel<SlicePtr<T>>,
{
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.as_slice() {
            Some(elements) => &elements[index],
            None => panic!("indexed an empty UniqueArray at {}", index),
        }
    }
}

impl<T, D, S> IndexMut<usize> for UniqueArray<T, D, S>
where
    D: ReleasePolicy<SlicePtr<T>, Handle = SlicePtr<T>>,
    S: Sentinel<SlicePtr<T>>,
{
    fn index_mut(&mut self, index: usize) -> &mut T {
        match self.as_mut_slice() {
            Some(elements) => &mut elements[index],
            None => panic!("indexed an empty UniqueArray at {}", index),
        }
    }
}

impl<T, D, S, D2, S2> PartialEq<UniqueArray<T, D2, S2>> for UniqueArray<T, D, S>
where
    D: ReleasePolicy<SlicePtr<T>, Handle = SlicePtr<T>>,
    S: Sentinel<SlicePtr<T>>,
    D2: ReleasePolicy<SlicePtr<T>, Handle = SlicePtr<T>>,
    S2: Sentinel<SlicePtr<T>>,
{
    fn eq(&self, other: &UniqueArray<T, D2, S2>) -> bool {
        self.as_handle() == other.as_handle()
    }
}

impl<T, D, S> Eq for UniqueArray<T, D, S>
where
    D: ReleasePolicy<SlicePtr<T>, Handle = SlicePtr<T>>,
    S: Sentinel<SlicePtr<T>>,
{
}

impl<T, D, S, D2, S2> PartialOrd<UniqueArray<T, D2, S2>> for UniqueArray<T, D, S>
where
    D: ReleasePolicy<SlicePtr<T>, Handle = SlicePtr<T>>,
    S: Sentinel<SlicePtr<T>>,
    D2: ReleasePolicy<SlicePtr<T>, Handle = SlicePtr<T>>,
    S2: Sentinel<SlicePtr<T>>,
{
    fn partial_cmp(&self, other: &UniqueArray<T, D2, S2>) -> Option<Ordering> {
        Some(self.as_handle().cmp(other.as_handle()))
    }
}

impl<T, D, S> Ord for UniqueArray<T, D, S>
where
    D: ReleasePolicy<SlicePtr<T>, Handle = SlicePtr<T>>,
    S: Sentinel<SlicePtr<T>>,
{
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_handle().cmp(other.as_handle())
    }
}

impl<T, D, S> PartialEq<Null> for UniqueArray<T, D, S>
where
    D: ReleasePolicy<SlicePtr<T>, Handle = SlicePtr<T>>,
    S: Sentinel<SlicePtr<T>>,
{
    fn eq(&self, _: &Null) -> bool {
        !self.is_owned()
    }
}

impl<T, D, S> PartialEq<UniqueArray<T, D, S>> for Null
where
    D: ReleasePolicy<SlicePtr<T>, Handle = SlicePtr<T>>,
    S: Sentinel<SlicePtr<T>>,
{
    fn eq(&self, other: &UniqueArray<T, D, S>) -> bool {
        !other.is_owned()
    }
}

impl<T, D, S> Hash for UniqueArray<T, D, S>
where
    D: ReleasePolicy<SlicePtr<T>, Handle = SlicePtr<T>>,
    S: Sentinel<SlicePtr<T>>,
{
    fn hash<St: Hasher>(&self, state: &mut St) {
        self.as_handle().hash(state)
    }
}

impl<T, D, S> fmt::Pointer for UniqueArray<T, D, S>
where
    D: ReleasePolicy<SlicePtr<T>, Handle = SlicePtr<T>>,
    S: Sentinel<SlicePtr<T>>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Pointer::fmt(self.as_handle(), f)
    }
}

impl<T, D, S> fmt::Debug for UniqueArray<T, D, S>
where
    T: fmt::Debug,
    D: ReleasePolicy<SlicePtr<T>, Handle = SlicePtr<T>>,
    S: Sentinel<SlicePtr<T>>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UniqueArray")
            .field("elements", &self.as_slice())
            .field("policy", &std::any::type_name::<D>())
            .finish()
    }
}
