//! Invalid-sentinel resolution for owned handles.
//!
//! Every wrapper in this crate stores a handle value at all times, even when
//! it owns nothing. The value it stores while empty is the *invalid
//! sentinel*, and the question "does this handle denote a live resource?" is
//! answered by the sentinel's `is_owned` predicate. Both are supplied by a
//! [`Sentinel`] implementation chosen as a type parameter of the wrapper, so
//! one wrapper type serves pointers, OS handles and composite records alike.
//!
//! | Sentinel | Handle types | Invalid value | Owned when |
//! |----------|--------------|---------------|------------|
//! | [`DefaultSentinel`] | `H: Default + PartialEq` | `H::default()` | `h != H::default()` |
//! | [`NullSentinel`] | raw pointers, [`BoxPtr`], [`SlicePtr`] | null ([`Null`]) | non-null |
//! | [`InvalidHandleValue`] | `H: From<i8> + PartialEq` | `-1` | `h != -1` |
//! | [`OptionSentinel`] | `Option<T>` | `None` | `is_some()` |
//!
//! Composite handles implement [`Sentinel`] themselves:
//!
//! ```rust
//! use unique_rc::sentinel::Sentinel;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
//! struct SavedDc {
//!     dc: usize,
//!     state: i32,
//! }
//!
//! struct SavedDcSentinel;
//!
//! impl Sentinel<SavedDc> for SavedDcSentinel {
//!     type Invalid = SavedDc;
//!
//!     fn invalid() -> SavedDc {
//!         SavedDc::default()
//!     }
//!
//!     // Restoring needs both the context and a saved state.
//!     fn is_owned(handle: &SavedDc) -> bool {
//!         handle.dc != 0 && handle.state != 0
//!     }
//! }
//!
//! assert!(!SavedDcSentinel::is_owned(&SavedDc { dc: 7, state: 0 }));
//! assert!(SavedDcSentinel::is_owned(&SavedDc { dc: 7, state: 2 }));
//! ```
//!
//! [`BoxPtr`]: crate::policy::memory::BoxPtr
//! [`SlicePtr`]: crate::policy::memory::SlicePtr

use std::ptr;

/// The "no resource" literal.
///
/// `Null` plays the role of a null pointer constant: it converts into every
/// pointer-like handle of this crate, and every wrapper compares equal to it
/// exactly when it owns nothing.
///
/// ```rust
/// use unique_rc::{Null, UniqueRc};
/// use unique_rc::testing::Counting;
///
/// let empty: UniqueRc<u32, Counting> = UniqueRc::empty();
/// assert!(empty == Null);
///
/// let owning: UniqueRc<u32, Counting> = UniqueRc::new(3);
/// assert!(owning != Null);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Null;

/// Supplies the invalid sentinel and the ownership predicate for a handle type.
///
/// # Type Parameters
///
/// * `H` - The resolved handle type stored by the wrapper
///
/// # Requirements
///
/// `invalid()` and `is_owned()` must not panic, and `is_owned(&invalid().into())`
/// must be `false`.
pub trait Sentinel<H> {
    /// The type of the sentinel value. May differ from `H` (see [`Null`]).
    type Invalid: Into<H>;

    /// Returns the value stored by an empty wrapper.
    fn invalid() -> Self::Invalid;

    /// Returns true if `handle` denotes a live resource.
    fn is_owned(handle: &H) -> bool;

    /// Returns true if two handles denote the same resource.
    ///
    /// Only consulted to detect self-reset (`w.reset(w.get())`). The default
    /// never reports a match, which disables the check for handle types that
    /// cannot be compared.
    fn same_handle(_current: &H, _incoming: &H) -> bool {
        false
    }
}

/// Sentinel is the handle type's default value.
///
/// This is the default sentinel of [`UniqueRc`](crate::UniqueRc). It covers
/// integer handles where zero means "none" and structured handles whose
/// default-constructed state is the empty state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DefaultSentinel;

impl<H: Default + PartialEq> Sentinel<H> for DefaultSentinel {
    type Invalid = H;

    fn invalid() -> H {
        H::default()
    }

    fn is_owned(handle: &H) -> bool {
        *handle != H::default()
    }

    fn same_handle(current: &H, incoming: &H) -> bool {
        current == incoming
    }
}

/// Sentinel is the null pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NullSentinel;

impl<T> Sentinel<*mut T> for NullSentinel {
    type Invalid = *mut T;

    fn invalid() -> *mut T {
        ptr::null_mut()
    }

    fn is_owned(handle: &*mut T) -> bool {
        !handle.is_null()
    }

    fn same_handle(current: &*mut T, incoming: &*mut T) -> bool {
        ptr::eq(*current, *incoming)
    }
}

impl<T> Sentinel<*const T> for NullSentinel {
    type Invalid = *const T;

    fn invalid() -> *const T {
        ptr::null()
    }

    fn is_owned(handle: &*const T) -> bool {
        !handle.is_null()
    }

    fn same_handle(current: &*const T, incoming: &*const T) -> bool {
        ptr::eq(*current, *incoming)
    }
}

/// Sentinel is `-1`, i.e. the all-ones bit pattern.
///
/// Matches OS interfaces that report failure with `-1`: POSIX descriptors and
/// the Windows `INVALID_HANDLE_VALUE` returned by `CreateFile`. Zero is a
/// valid, owned handle under this sentinel.
///
/// ```rust
/// use unique_rc::sentinel::{InvalidHandleValue, Sentinel};
///
/// assert!(<InvalidHandleValue as Sentinel<i32>>::is_owned(&0));
/// assert!(!<InvalidHandleValue as Sentinel<isize>>::is_owned(&-1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct InvalidHandleValue;

impl<H: From<i8> + PartialEq> Sentinel<H> for InvalidHandleValue {
    type Invalid = H;

    fn invalid() -> H {
        H::from(-1)
    }

    fn is_owned(handle: &H) -> bool {
        *handle != H::from(-1)
    }

    fn same_handle(current: &H, incoming: &H) -> bool {
        current == incoming
    }
}

/// Sentinel is `None`.
///
/// For handle types with no spare "invalid" value of their own, such as task
/// handles, which are stored as `Option<T>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OptionSentinel;

impl<T> Sentinel<Option<T>> for OptionSentinel {
    type Invalid = Option<T>;

    fn invalid() -> Option<T> {
        None
    }

    fn is_owned(handle: &Option<T>) -> bool {
        handle.is_some()
    }
}
