//! Move capabilities of release policies.
//!
//! Moving a whole wrapper by value (`let b = a;`) is always possible: the
//! source is consumed and nothing is left behind. Moving ownership *out of a
//! live place* is different. The donor wrapper keeps existing and must keep a
//! usable policy, so the policy itself has to be movable in that sense.
//!
//! A policy opts into these operations by implementing capability traits.
//! Which operations a wrapper exposes is then decided at compile time, purely
//! from those traits:
//!
//! | Policy implements | `take` (move-construct) | `assign_from` (move-assign) | `swap` |
//! |-------------------|-------------------------|-----------------------------|--------|
//! | [`MoveConstruct`] + [`MoveAssign`] | yes | yes | yes |
//! | [`MoveConstruct`] only | yes | no | no |
//! | [`MoveAssign`] only | no | yes | no |
//! | neither | no | no | no |
//!
//! `std::mem::swap`, `mem::replace` and `mem::take` work on any two wrappers
//! of one type regardless of this table. They relocate whole wrappers, handle
//! and policy together, and leave no moved-from donor behind, so each handle
//! still has exactly one owner. The table only governs operations that leave
//! a live, empty donor in place.
//!
//! A missing capability is a compile error, never a runtime fallback:
//!
//! ```rust,compile_fail
//! use unique_rc::{ReleasePolicy, UniqueRc};
//!
//! // Holds a registration that cannot be duplicated or handed over.
//! #[derive(Default)]
//! struct Unregister;
//!
//! impl ReleasePolicy<u32> for Unregister {
//!     type Handle = u32;
//!     fn release(&mut self, _id: u32) {}
//! }
//!
//! let mut registration: UniqueRc<u32, Unregister> = UniqueRc::new(1);
//! let moved = registration.take(); // Unregister is not MoveConstruct
//! ```
//!
//! A construct-only policy supports `take` but not `assign_from`:
//!
//! ```rust,compile_fail
//! use unique_rc::{movable_policy, ReleasePolicy, UniqueRc};
//!
//! #[derive(Clone, Default)]
//! struct Restore;
//!
//! impl ReleasePolicy<u32> for Restore {
//!     type Handle = u32;
//!     fn release(&mut self, _state: u32) {}
//! }
//!
//! movable_policy!(Restore: construct);
//!
//! let mut saved: UniqueRc<u32, Restore> = UniqueRc::new(1);
//! let mut newer: UniqueRc<u32, Restore> = UniqueRc::new(2);
//! saved.assign_from(&mut newer); // Restore is not MoveAssign
//! ```
//!
//! nor `swap`:
//!
//! ```rust,compile_fail
//! use unique_rc::{movable_policy, ReleasePolicy, UniqueRc};
//!
//! #[derive(Clone, Default)]
//! struct Restore;
//!
//! impl ReleasePolicy<u32> for Restore {
//!     type Handle = u32;
//!     fn release(&mut self, _state: u32) {}
//! }
//!
//! movable_policy!(Restore: construct);
//!
//! let mut saved: UniqueRc<u32, Restore> = UniqueRc::new(1);
//! let mut newer: UniqueRc<u32, Restore> = UniqueRc::new(2);
//! saved.swap(&mut newer); // Restore is not Swappable
//! ```
//!
//! An assign-only policy supports `assign_from` but not `take`:
//!
//! ```rust,compile_fail
//! use unique_rc::{movable_policy, ReleasePolicy, UniqueRc};
//!
//! #[derive(Clone, Default)]
//! struct Unadvise;
//!
//! impl ReleasePolicy<u32> for Unadvise {
//!     type Handle = u32;
//!     fn release(&mut self, _cookie: u32) {}
//! }
//!
//! movable_policy!(Unadvise: assign);
//!
//! let mut cookie: UniqueRc<u32, Unadvise> = UniqueRc::new(1);
//! let moved = cookie.take(); // Unadvise is not MoveConstruct
//! ```
//!
//! nor `swap`:
//!
//! ```rust,compile_fail
//! use unique_rc::{movable_policy, ReleasePolicy, UniqueRc};
//!
//! #[derive(Clone, Default)]
//! struct Unadvise;
//!
//! impl ReleasePolicy<u32> for Unadvise {
//!     type Handle = u32;
//!     fn release(&mut self, _cookie: u32) {}
//! }
//!
//! movable_policy!(Unadvise: assign);
//!
//! let mut cookie: UniqueRc<u32, Unadvise> = UniqueRc::new(1);
//! let mut other: UniqueRc<u32, Unadvise> = UniqueRc::new(2);
//! cookie.swap(&mut other); // Unadvise is not Swappable
//! ```
//!
//! The same policies compile for the operations they do support:
//!
//! ```rust
//! use unique_rc::{movable_policy, ReleasePolicy, UniqueRc};
//!
//! #[derive(Clone, Default)]
//! struct Restore;
//! impl ReleasePolicy<u32> for Restore {
//!     type Handle = u32;
//!     fn release(&mut self, _state: u32) {}
//! }
//! movable_policy!(Restore: construct);
//!
//! #[derive(Clone, Default)]
//! struct Unadvise;
//! impl ReleasePolicy<u32> for Unadvise {
//!     type Handle = u32;
//!     fn release(&mut self, _cookie: u32) {}
//! }
//! movable_policy!(Unadvise: assign);
//!
//! let mut saved: UniqueRc<u32, Restore> = UniqueRc::new(1);
//! let moved = saved.take();
//! assert_eq!(moved.get(), 1);
//!
//! let mut cookie: UniqueRc<u32, Unadvise> = UniqueRc::new(1);
//! let mut newer: UniqueRc<u32, Unadvise> = UniqueRc::new(2);
//! cookie.assign_from(&mut newer);
//! assert_eq!(cookie.get(), 2);
//! assert!(!newer.is_owned());
//! ```
//!
//! For `Clone` policies the [`movable_policy!`](crate::movable_policy) macro
//! declares capabilities in one line.

use crate::policy::ReleasePolicy;

/// Policies that can be moved out of a live wrapper.
///
/// `move_construct` produces the policy for the new owner. `self` stays with
/// the donor, which is left empty but must remain droppable.
pub trait MoveConstruct: Sized {
    /// Moves this policy out, leaving `self` in its moved-from state.
    fn move_construct(&mut self) -> Self;
}

/// Policies that can be reassigned from another live wrapper's policy.
pub trait MoveAssign {
    /// Replaces `self` with the policy moved out of `source`.
    fn move_assign(&mut self, source: &mut Self);
}

/// Policies supporting both in-place moves, and therefore `swap`.
///
/// Implemented automatically; never implement it directly.
pub trait Swappable: MoveConstruct + MoveAssign {}

impl<T: MoveConstruct + MoveAssign> Swappable for T {}

/// Declares move capabilities for a `Clone` policy.
///
/// # Example
///
/// ```rust
/// use unique_rc::{movable_policy, ReleasePolicy, UniqueRc};
///
/// #[derive(Clone, Default)]
/// struct Close;
///
/// impl ReleasePolicy<i32> for Close {
///     type Handle = i32;
///     fn release(&mut self, _fd: i32) {}
/// }
///
/// movable_policy!(Close);
///
/// let mut first: UniqueRc<i32, Close> = UniqueRc::new(3);
/// let second = first.take();
/// assert!(!first.is_owned());
/// assert_eq!(second.get(), 3);
/// ```
///
/// Capabilities can be granted selectively:
///
/// ```rust
/// # use unique_rc::movable_policy;
/// #[derive(Clone)]
/// struct Restore;
/// movable_policy!(Restore: construct);
///
/// #[derive(Clone)]
/// struct Unadvise;
/// movable_policy!(Unadvise: assign);
/// ```
#[macro_export]
macro_rules! movable_policy {
    (@impl $ty:ty, construct) => {
        impl $crate::capability::MoveConstruct for $ty {
            fn move_construct(&mut self) -> Self {
                ::core::clone::Clone::clone(self)
            }
        }
    };
    (@impl $ty:ty, assign) => {
        impl $crate::capability::MoveAssign for $ty {
            fn move_assign(&mut self, source: &mut Self) {
                ::core::clone::Clone::clone_from(self, source)
            }
        }
    };
    ($ty:ty: $($capability:ident),+ $(,)?) => {
        $( $crate::movable_policy!(@impl $ty, $capability); )+
    };
    ($ty:ty) => {
        $crate::movable_policy!($ty: construct, assign);
    };
}

impl<H> MoveConstruct for fn(H) {
    fn move_construct(&mut self) -> Self {
        *self
    }
}

impl<H> MoveAssign for fn(H) {
    fn move_assign(&mut self, source: &mut Self) {
        *self = *source;
    }
}

/// Compile-time check that policy `D` supports `take`.
pub const fn assert_move_construct<H, D: ReleasePolicy<H> + MoveConstruct>() {}

/// Compile-time check that policy `D` supports `assign_from`.
pub const fn assert_move_assign<H, D: ReleasePolicy<H> + MoveAssign>() {}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Both(u8);
    crate::movable_policy!(Both);

    #[derive(Clone, Debug, PartialEq)]
    struct ConstructOnly(u8);
    crate::movable_policy!(ConstructOnly: construct);

    #[derive(Clone, Debug, PartialEq)]
    struct AssignOnly(u8);
    crate::movable_policy!(AssignOnly: assign);

    impl<H> ReleasePolicy<H> for Both {
        type Handle = H;
        fn release(&mut self, _handle: H) {}
    }

    impl<H> ReleasePolicy<H> for ConstructOnly {
        type Handle = H;
        fn release(&mut self, _handle: H) {}
    }

    impl<H> ReleasePolicy<H> for AssignOnly {
        type Handle = H;
        fn release(&mut self, _handle: H) {}
    }

    #[test]
    fn macro_move_construct_clones_state() {
        let mut donor = ConstructOnly(7);
        let moved = donor.move_construct();
        assert_eq!(moved, ConstructOnly(7));
        assert_eq!(donor, ConstructOnly(7));
    }

    #[test]
    fn macro_move_assign_copies_from_source() {
        let mut target = AssignOnly(1);
        let mut source = AssignOnly(2);
        target.move_assign(&mut source);
        assert_eq!(target, AssignOnly(2));
    }

    #[test]
    fn function_pointers_move_both_ways() {
        fn first(_: u8) {}
        fn second(_: u8) {}

        let mut target: fn(u8) = first;
        let mut source: fn(u8) = second;
        target.move_assign(&mut source);
        let moved = target.move_construct();
        assert_eq!(moved as usize, second as fn(u8) as usize);
    }

    // Type-level checks
    fn _assert_swappable<T: Swappable>() {}

    #[test]
    fn capability_selection() {
        assert_move_construct::<u8, Both>();
        assert_move_assign::<u8, Both>();
        _assert_swappable::<Both>();

        assert_move_construct::<u8, ConstructOnly>();
        assert_move_assign::<u8, AssignOnly>();

        assert_move_construct::<u8, fn(u8)>();
        assert_move_assign::<u8, fn(u8)>();
    }
}
