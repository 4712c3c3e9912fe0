//! Testing utilities for code that owns handles.
//!
//! This module provides release policies that observe instead of releasing,
//! assertion macros for wrapper state, and (behind the `proptest` feature)
//! generators for random operation sequences.
//!
//! # Examples
//!
//! ## Counting releases
//!
//! ```rust
//! use unique_rc::testing::Counting;
//! use unique_rc::UniqueRc;
//!
//! let counting = Counting::new();
//! {
//!     let mut handle: UniqueRc<u32, Counting> = UniqueRc::with_policy(1, counting.clone());
//!     handle.reset(2);
//! }
//! assert_eq!(counting.count(), 2);
//! ```
//!
//! ## Assertion Macros
//!
//! ```rust
//! use unique_rc::testing::Counting;
//! use unique_rc::{assert_empty, assert_owns, UniqueRc};
//!
//! let mut handle: UniqueRc<u32, Counting> = UniqueRc::new(5);
//! assert_owns!(handle, 5);
//!
//! handle.reset_empty();
//! assert_empty!(handle);
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::capability::{MoveAssign, MoveConstruct};
use crate::policy::ReleasePolicy;

/// A shared count of release calls.
///
/// Clones observe the same count.
#[derive(Debug, Clone, Default)]
pub struct ReleaseCounter(Arc<AtomicUsize>);

impl ReleaseCounter {
    /// Create a counter starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of release calls observed so far.
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// A policy that counts release calls and otherwise does nothing.
///
/// `Clone` shares the counter; `Default` starts a fresh one.
#[derive(Debug, Clone, Default)]
pub struct Counting {
    counter: ReleaseCounter,
}

impl Counting {
    /// Create a policy with a fresh counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a policy reporting to an existing counter.
    pub fn with_counter(counter: ReleaseCounter) -> Self {
        Counting { counter }
    }

    /// Number of release calls observed so far.
    pub fn count(&self) -> usize {
        self.counter.count()
    }

    /// The shared counter.
    pub fn counter(&self) -> &ReleaseCounter {
        &self.counter
    }
}

impl<H> ReleasePolicy<H> for Counting {
    type Handle = H;

    fn release(&mut self, _handle: H) {
        self.counter.record();
    }
}

crate::movable_policy!(Counting);

/// A policy that keeps every released handle, in release order.
///
/// `Clone` shares the record.
#[derive(Debug)]
pub struct Recording<H> {
    released: Arc<Mutex<Vec<H>>>,
}

impl<H> Recording<H> {
    /// Create a policy with an empty record.
    pub fn new() -> Self {
        Recording {
            released: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// The handles released so far.
    pub fn released(&self) -> Vec<H>
    where
        H: Clone,
    {
        self.released
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of release calls observed so far.
    pub fn count(&self) -> usize {
        self.released
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl<H> Default for Recording<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Clone for Recording<H> {
    fn clone(&self) -> Self {
        Recording {
            released: Arc::clone(&self.released),
        }
    }
}

impl<H> ReleasePolicy<H> for Recording<H> {
    type Handle = H;

    fn release(&mut self, handle: H) {
        self.released
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(handle);
    }
}

impl<H> MoveConstruct for Recording<H> {
    fn move_construct(&mut self) -> Self {
        self.clone()
    }
}

impl<H> MoveAssign for Recording<H> {
    fn move_assign(&mut self, source: &mut Self) {
        self.released = Arc::clone(&source.released);
    }
}

/// A policy that ignores every handle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoOp;

impl<H> ReleasePolicy<H> for NoOp {
    type Handle = H;

    fn release(&mut self, _handle: H) {}
}

crate::movable_policy!(NoOp);

/// Assert that a wrapper owns a resource, optionally a specific handle.
///
/// # Example
///
/// ```rust
/// use unique_rc::testing::NoOp;
/// use unique_rc::{assert_owns, UniqueRc};
///
/// let handle: UniqueRc<i64, NoOp> = UniqueRc::new(9);
/// assert_owns!(handle);
/// assert_owns!(handle, 9);
/// ```
#[macro_export]
macro_rules! assert_owns {
    ($wrapper:expr) => {
        if !$wrapper.is_owned() {
            panic!("Expected an owning wrapper, got an empty one");
        }
    };
    ($wrapper:expr, $handle:expr) => {{
        let wrapper = &$wrapper;
        $crate::assert_owns!(wrapper);
        assert_eq!(*wrapper.as_handle(), $handle);
    }};
}

/// Assert that a wrapper owns nothing.
///
/// # Example
///
/// ```rust
/// use unique_rc::testing::NoOp;
/// use unique_rc::{assert_empty, UniqueRc};
///
/// let handle: UniqueRc<u8, NoOp> = UniqueRc::empty();
/// assert_empty!(handle);
/// ```
#[macro_export]
macro_rules! assert_empty {
    ($wrapper:expr) => {
        if $wrapper.is_owned() {
            panic!(
                "Expected an empty wrapper, got one owning {:?}",
                $wrapper.as_handle()
            );
        }
    };
}

#[cfg(feature = "proptest")]
pub use self::strategies::{Op, Slot};

/// Random operation sequences over a pair of wrappers.
#[cfg(feature = "proptest")]
pub mod strategies {
    use proptest::prelude::*;

    /// One of two wrappers under test.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Slot {
        /// The first wrapper.
        First,
        /// The second wrapper.
        Second,
    }

    impl Slot {
        /// The other wrapper.
        pub fn other(self) -> Slot {
            match self {
                Slot::First => Slot::Second,
                Slot::Second => Slot::First,
            }
        }
    }

    /// An ownership operation applied to one slot (or both, for `Swap`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Op {
        /// Reset the slot to a freshly acquired handle.
        Acquire(Slot),
        /// Reset the slot to nothing.
        ResetEmpty(Slot),
        /// Release the slot's handle without cleanup.
        Release(Slot),
        /// Replace the other slot with a wrapper taken from this one.
        Take(Slot),
        /// Move-assign the other slot into this one.
        AssignFrom(Slot),
        /// Exchange the two slots.
        Swap,
    }

    impl Arbitrary for Slot {
        type Parameters = ();
        type Strategy = BoxedStrategy<Self>;

        fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
            prop_oneof![Just(Slot::First), Just(Slot::Second)].boxed()
        }
    }

    impl Arbitrary for Op {
        type Parameters = ();
        type Strategy = BoxedStrategy<Self>;

        fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
            prop_oneof![
                3 => any::<Slot>().prop_map(Op::Acquire),
                1 => any::<Slot>().prop_map(Op::ResetEmpty),
                1 => any::<Slot>().prop_map(Op::Release),
                1 => any::<Slot>().prop_map(Op::Take),
                1 => any::<Slot>().prop_map(Op::AssignFrom),
                1 => Just(Op::Swap),
            ]
            .boxed()
        }
    }

    /// Sequences of up to `max_len` operations.
    pub fn ops(max_len: usize) -> impl Strategy<Value = Vec<Op>> {
        prop::collection::vec(any::<Op>(), 0..max_len)
    }

    /// Handles that are owned under the default sentinel.
    pub fn owned_handle() -> impl Strategy<Value = u32> {
        1..=u32::MAX
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UniqueRc;

    #[test]
    fn counting_clones_share_a_counter() {
        let counting = Counting::new();
        let mut clone = counting.clone();
        ReleasePolicy::<u8>::release(&mut clone, 1);
        assert_eq!(counting.count(), 1);
        assert_eq!(Counting::default().count(), 0);
    }

    #[test]
    fn counting_with_counter() {
        let counter = ReleaseCounter::new();
        {
            let _a: UniqueRc<u8, Counting> =
                UniqueRc::with_policy(1, Counting::with_counter(counter.clone()));
            let _b: UniqueRc<u8, Counting> =
                UniqueRc::with_policy(2, Counting::with_counter(counter.clone()));
        }
        assert_eq!(counter.count(), 2);
    }

    #[test]
    fn recording_keeps_release_order() {
        let recording = Recording::new();
        {
            let mut handle: UniqueRc<&str, Recording<&str>> =
                UniqueRc::with_policy("first", recording.clone());
            handle.reset("second");
        }
        assert_eq!(recording.released(), vec!["first", "second"]);
        assert_eq!(recording.count(), 2);
    }

    #[test]
    fn no_op_policy_is_zero_sized() {
        assert_eq!(std::mem::size_of::<NoOp>(), 0);
        let _handle: UniqueRc<u16, NoOp> = UniqueRc::new(4);
    }

    #[test]
    fn assert_owns_macro() {
        let handle: UniqueRc<u32, NoOp> = UniqueRc::new(3);
        assert_owns!(handle);
        assert_owns!(handle, 3);
    }

    #[test]
    fn assert_empty_macro() {
        let handle: UniqueRc<u32, NoOp> = UniqueRc::empty();
        assert_empty!(handle);
    }

    #[test]
    #[should_panic(expected = "Expected an owning wrapper")]
    fn assert_owns_panics_on_empty() {
        let handle: UniqueRc<u32, NoOp> = UniqueRc::empty();
        assert_owns!(handle);
    }

    #[test]
    #[should_panic(expected = "Expected an empty wrapper, got one owning 8")]
    fn assert_empty_panics_on_owning() {
        let handle: UniqueRc<u32, NoOp> = UniqueRc::new(8);
        assert_empty!(handle);
    }

    #[cfg(feature = "proptest")]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn owned_handles_are_owned(handle in strategies::owned_handle()) {
                let wrapper: UniqueRc<u32, NoOp> = UniqueRc::new(handle);
                prop_assert!(wrapper.is_owned());
            }

            #[test]
            fn slot_other_is_an_involution(slot in any::<Slot>()) {
                prop_assert_eq!(slot.other().other(), slot);
                prop_assert_ne!(slot.other(), slot);
            }

            #[test]
            fn ops_respect_length(ops in strategies::ops(16)) {
                prop_assert!(ops.len() < 16);
            }
        }
    }
}
