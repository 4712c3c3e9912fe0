//! Closures as release policies.

use std::fmt;

use crate::capability::{MoveAssign, MoveConstruct};
use crate::policy::ReleasePolicy;

/// A release policy backed by a closure.
///
/// The closure is state owned by the wrapper, so a wrapper using `ReleaseFn`
/// cannot be default-constructed and must be given the policy explicitly.
/// In-place moves (`take`, `assign_from`, `swap`) are available when the
/// closure is `Clone`.
///
/// # Example
///
/// ```rust
/// use unique_rc::policy::func::{release_fn, ReleaseFn};
/// use unique_rc::UniqueRc;
/// use std::cell::RefCell;
///
/// let closed = RefCell::new(Vec::new());
/// {
///     let log = |fd: i32| closed.borrow_mut().push(fd);
///     let _fd: UniqueRc<i32, ReleaseFn<_>> = UniqueRc::with_policy(4, release_fn(log));
/// }
/// assert_eq!(*closed.borrow(), vec![4]);
/// ```
#[derive(Clone, Copy)]
pub struct ReleaseFn<F>(F);

/// Wraps `f` as a release policy.
pub fn release_fn<F>(f: F) -> ReleaseFn<F> {
    ReleaseFn(f)
}

impl<F> ReleaseFn<F> {
    /// Unwraps the closure.
    pub fn into_inner(self) -> F {
        self.0
    }
}

impl<H, F> ReleasePolicy<H> for ReleaseFn<F>
where
    F: FnMut(H),
{
    type Handle = H;

    fn release(&mut self, handle: H) {
        (self.0)(handle)
    }
}

impl<F: Clone> MoveConstruct for ReleaseFn<F> {
    fn move_construct(&mut self) -> Self {
        self.clone()
    }
}

impl<F: Clone> MoveAssign for ReleaseFn<F> {
    fn move_assign(&mut self, source: &mut Self) {
        self.clone_from(source);
    }
}

impl<F> fmt::Debug for ReleaseFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ReleaseFn")
            .field(&std::any::type_name::<F>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UniqueRc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn closure_runs_once_per_owned_handle() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let policy = release_fn(move |_: u32| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        {
            let mut guard: UniqueRc<u32, ReleaseFn<_>> = UniqueRc::with_policy(1, policy);
            guard.reset(2);
            guard.reset_empty();
            guard.reset_empty();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn clone_closures_can_be_taken() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let policy = release_fn(move |_: u8| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let mut donor: UniqueRc<u8, ReleaseFn<_>> = UniqueRc::with_policy(5, policy);
        let taken = donor.take();
        drop(donor);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        drop(taken);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn debug_names_the_closure_type() {
        fn close(_: i32) {}
        let policy = release_fn(close as fn(i32));
        assert!(format!("{:?}", policy).starts_with("ReleaseFn"));
        let _f: fn(i32) = policy.into_inner();
    }
}
