//! Heap allocations as owned handles.
//!
//! [`BoxPtr<T>`] and [`SlicePtr<T>`] are raw pointer handles that remember
//! they came from a `Box`. They are deliberately not `Clone`, so safe code can
//! never end up with two handles to one allocation. Neither type frees
//! anything on drop: dropping a non-null one outside a wrapper leaks it.
//!
//! | Handle | Policy | Wrapper |
//! |--------|--------|---------|
//! | `BoxPtr<T>` | [`BoxDelete<T>`] | [`UniquePtr<T>`](crate::UniquePtr) |
//! | `SlicePtr<T>` | [`BoxSliceDelete<T>`] | [`UniqueArray<T>`](crate::UniqueArray) |
//!
//! # Example
//!
//! ```rust
//! use unique_rc::UniquePtr;
//!
//! let mut name: UniquePtr<String> = UniquePtr::from_box(Box::new("dc".to_string()));
//! name.push_str("-saved");
//! assert_eq!(*name, "dc-saved");
//!
//! let back = name.into_box().unwrap();
//! assert_eq!(back.len(), 8);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ptr;

use crate::capability::{MoveAssign, MoveConstruct};
use crate::policy::ReleasePolicy;
use crate::sentinel::{Null, NullSentinel, Sentinel};

/// A possibly-null pointer to a single `Box` allocation.
pub struct BoxPtr<T> {
    ptr: *mut T,
}

// SAFETY: a non-null BoxPtr is the sole owner of its allocation, like Box<T>.
unsafe impl<T: Send> Send for BoxPtr<T> {}
// SAFETY: shared access only hands out &T.
unsafe impl<T: Sync> Sync for BoxPtr<T> {}

impl<T> BoxPtr<T> {
    /// The null handle.
    pub const fn null() -> Self {
        BoxPtr {
            ptr: ptr::null_mut(),
        }
    }

    /// Takes over the allocation of `boxed`.
    pub fn from_box(boxed: Box<T>) -> Self {
        BoxPtr {
            ptr: Box::into_raw(boxed),
        }
    }

    /// Adopts a raw pointer.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or come from `Box::into_raw`, and no other owner of
    /// the allocation may free it.
    pub unsafe fn from_raw(ptr: *mut T) -> Self {
        BoxPtr { ptr }
    }

    /// Returns true for the null handle.
    pub fn is_null(&self) -> bool {
        self.ptr.is_null()
    }

    /// The raw address, without giving up ownership.
    pub fn as_ptr(&self) -> *mut T {
        self.ptr
    }

    /// Borrows the pointee, or `None` if null.
    pub fn as_ref(&self) -> Option<&T> {
        // SAFETY: non-null pointers are live Box allocations owned by self.
        unsafe { self.ptr.as_ref() }
    }

    /// Mutably borrows the pointee, or `None` if null.
    pub fn as_mut(&mut self) -> Option<&mut T> {
        // SAFETY: as above, and &mut self guarantees exclusivity.
        unsafe { self.ptr.as_mut() }
    }

    /// Gives the raw pointer back to the caller, who becomes responsible for it.
    pub fn into_raw(self) -> *mut T {
        self.ptr
    }

    /// Turns the handle back into a `Box`, or `None` if null.
    pub fn into_box(self) -> Option<Box<T>> {
        if self.ptr.is_null() {
            None
        } else {
            // SAFETY: non-null pointers come from Box::into_raw and are
            // consumed here exactly once.
            Some(unsafe { Box::from_raw(self.ptr) })
        }
    }
}

impl<T> Default for BoxPtr<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T> From<Box<T>> for BoxPtr<T> {
    fn from(boxed: Box<T>) -> Self {
        Self::from_box(boxed)
    }
}

impl<T> From<Null> for BoxPtr<T> {
    fn from(_: Null) -> Self {
        Self::null()
    }
}

impl<T> PartialEq for BoxPtr<T> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.ptr, other.ptr)
    }
}

impl<T> Eq for BoxPtr<T> {}

impl<T> PartialOrd for BoxPtr<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for BoxPtr<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ptr.cmp(&other.ptr)
    }
}

impl<T> Hash for BoxPtr<T> {
    fn hash<S: Hasher>(&self, state: &mut S) {
        self.ptr.hash(state);
    }
}

impl<T> fmt::Debug for BoxPtr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BoxPtr").field(&self.ptr).finish()
    }
}

impl<T> fmt::Pointer for BoxPtr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Pointer::fmt(&self.ptr, f)
    }
}

/// A possibly-null pointer to a `Box<[T]>` allocation.
pub struct SlicePtr<T> {
    ptr: *mut [T],
}

// SAFETY: a non-null SlicePtr is the sole owner of its allocation, like Box<[T]>.
unsafe impl<T: Send> Send for SlicePtr<T> {}
// SAFETY: shared access only hands out &[T].
unsafe impl<T: Sync> Sync for SlicePtr<T> {}

impl<T> SlicePtr<T> {
    /// The null handle.
    pub fn null() -> Self {
        SlicePtr {
            ptr: ptr::slice_from_raw_parts_mut(ptr::null_mut(), 0),
        }
    }

    /// Takes over the allocation of `boxed`.
    pub fn from_boxed_slice(boxed: Box<[T]>) -> Self {
        SlicePtr {
            ptr: Box::into_raw(boxed),
        }
    }

    /// Adopts a raw slice pointer.
    ///
    /// # Safety
    ///
    /// `ptr` must have a null data pointer or come from `Box::<[T]>::into_raw`,
    /// and no other owner of the allocation may free it.
    pub unsafe fn from_raw(ptr: *mut [T]) -> Self {
        SlicePtr { ptr }
    }

    /// Returns true for the null handle.
    pub fn is_null(&self) -> bool {
        self.ptr.is_null()
    }

    /// Number of elements; zero for the null handle.
    pub fn len(&self) -> usize {
        if self.is_null() {
            0
        } else {
            self.ptr.len()
        }
    }

    /// Returns true if there are no elements (including the null handle).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The raw slice pointer, without giving up ownership.
    pub fn as_ptr(&self) -> *mut [T] {
        self.ptr
    }

    /// Borrows the elements, or `None` if null.
    pub fn as_slice(&self) -> Option<&[T]> {
        if self.is_null() {
            None
        } else {
            // SAFETY: non-null pointers are live Box<[T]> allocations owned by self.
            Some(unsafe { &*self.ptr })
        }
    }

    /// Mutably borrows the elements, or `None` if null.
    pub fn as_mut_slice(&mut self) -> Option<&mut [T]> {
        if self.is_null() {
            None
        } else {
            // SAFETY: as above, and &mut self guarantees exclusivity.
            Some(unsafe { &mut *self.ptr })
        }
    }

    /// Gives the raw pointer back to the caller, who becomes responsible for it.
    pub fn into_raw(self) -> *mut [T] {
        self.ptr
    }

    /// Turns the handle back into a `Box<[T]>`, or `None` if null.
    pub fn into_boxed_slice(self) -> Option<Box<[T]>> {
        if self.is_null() {
            None
        } else {
            // SAFETY: non-null pointers come from Box::into_raw and are
            // consumed here exactly once.
            Some(unsafe { Box::from_raw(self.ptr) })
        }
    }

    fn address(&self) -> (*mut T, usize) {
        (self.ptr.cast::<T>(), self.len())
    }
}

impl<T> Default for SlicePtr<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T> From<Box<[T]>> for SlicePtr<T> {
    fn from(boxed: Box<[T]>) -> Self {
        Self::from_boxed_slice(boxed)
    }
}

impl<T> From<Vec<T>> for SlicePtr<T> {
    fn from(elements: Vec<T>) -> Self {
        Self::from_boxed_slice(elements.into_boxed_slice())
    }
}

impl<T> From<Null> for SlicePtr<T> {
    fn from(_: Null) -> Self {
        Self::null()
    }
}

impl<T> PartialEq for SlicePtr<T> {
    fn eq(&self, other: &Self) -> bool {
        self.address() == other.address()
    }
}

impl<T> Eq for SlicePtr<T> {}

impl<T> PartialOrd for SlicePtr<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for SlicePtr<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.address().cmp(&other.address())
    }
}

impl<T> Hash for SlicePtr<T> {
    fn hash<S: Hasher>(&self, state: &mut S) {
        self.address().hash(state);
    }
}

impl<T> fmt::Debug for SlicePtr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlicePtr")
            .field("ptr", &self.ptr.cast::<T>())
            .field("len", &self.len())
            .finish()
    }
}

impl<T> fmt::Pointer for SlicePtr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Pointer::fmt(&self.ptr.cast::<T>(), f)
    }
}

impl<T> Sentinel<BoxPtr<T>> for NullSentinel {
    type Invalid = Null;

    fn invalid() -> Null {
        Null
    }

    fn is_owned(handle: &BoxPtr<T>) -> bool {
        !handle.is_null()
    }

    fn same_handle(current: &BoxPtr<T>, incoming: &BoxPtr<T>) -> bool {
        current == incoming
    }
}

impl<T> Sentinel<SlicePtr<T>> for NullSentinel {
    type Invalid = Null;

    fn invalid() -> Null {
        Null
    }

    fn is_owned(handle: &SlicePtr<T>) -> bool {
        !handle.is_null()
    }

    fn same_handle(current: &SlicePtr<T>, incoming: &SlicePtr<T>) -> bool {
        current == incoming
    }
}

/// Frees a single `Box` allocation.
pub struct BoxDelete<T>(PhantomData<fn() -> T>);

impl<T> BoxDelete<T> {
    /// Create the policy.
    pub const fn new() -> Self {
        BoxDelete(PhantomData)
    }
}

impl<T> ReleasePolicy<BoxPtr<T>> for BoxDelete<T> {
    type Handle = BoxPtr<T>;

    fn release(&mut self, handle: BoxPtr<T>) {
        drop(handle.into_box());
    }
}

/// Frees a `Box<[T]>` allocation.
pub struct BoxSliceDelete<T>(PhantomData<fn() -> T>);

impl<T> BoxSliceDelete<T> {
    /// Create the policy.
    pub const fn new() -> Self {
        BoxSliceDelete(PhantomData)
    }
}

impl<T> ReleasePolicy<SlicePtr<T>> for BoxSliceDelete<T> {
    type Handle = SlicePtr<T>;

    fn release(&mut self, handle: SlicePtr<T>) {
        drop(handle.into_boxed_slice());
    }
}

macro_rules! zero_sized_policy {
    ($name:ident) => {
        impl<T> Default for $name<T> {
            fn default() -> Self {
                Self::new()
            }
        }

        impl<T> Clone for $name<T> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<T> Copy for $name<T> {}

        impl<T> fmt::Debug for $name<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}<{}>", stringify!($name), std::any::type_name::<T>())
            }
        }

        impl<T> MoveConstruct for $name<T> {
            fn move_construct(&mut self) -> Self {
                *self
            }
        }

        impl<T> MoveAssign for $name<T> {
            fn move_assign(&mut self, _source: &mut Self) {}
        }
    };
}

zero_sized_policy!(BoxDelete);
zero_sized_policy!(BoxSliceDelete);
