//! Aborting asynchronous tasks when their owner goes away.
//!
//! A task handle is a resource like any other: whoever holds it is expected
//! to stop the task once it is no longer wanted. Task handles have no spare
//! "invalid" value, so these policies store `Option<handle>` and pair with
//! [`OptionSentinel`].
//!
//! | Policy | Handle | Feature |
//! |--------|--------|---------|
//! | [`AbortTask`] | `Option<futures::future::AbortHandle>` | always |
//! | `AbortJoin` | `Option<tokio::task::JoinHandle<T>>` | `async` |
//!
//! # Example
//!
//! ```rust
//! use futures::future::{self, Aborted};
//! use unique_rc::policy::task::abortable;
//!
//! # tokio_test::block_on(async {
//! let (task, guard) = abortable(future::pending::<()>());
//! drop(guard);
//! assert_eq!(task.await, Err(Aborted));
//! # });
//! ```

use futures::future::{AbortHandle, Abortable};

use crate::policy::ReleasePolicy;
use crate::sentinel::OptionSentinel;
use crate::UniqueRc;

/// Aborts a `futures` abortable task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AbortTask;

impl ReleasePolicy<AbortHandle> for AbortTask {
    type Handle = Option<AbortHandle>;

    fn release(&mut self, handle: Option<AbortHandle>) {
        if let Some(handle) = handle {
            handle.abort();
        }
    }
}

crate::movable_policy!(AbortTask);

/// Owns an [`AbortHandle`]; dropping or resetting the guard aborts the task.
pub type TaskGuard = UniqueRc<AbortHandle, AbortTask, OptionSentinel>;

/// Makes `future` abortable and returns it with the guard that aborts it.
///
/// Releasing the guard (`guard.release()`) detaches the task: it then runs to
/// completion regardless of what happens to the guard.
pub fn abortable<Fut>(future: Fut) -> (Abortable<Fut>, TaskGuard)
where
    Fut: std::future::Future,
{
    let (task, handle) = futures::future::abortable(future);
    (task, TaskGuard::new(Some(handle)))
}

#[cfg(feature = "async")]
pub use self::tokio_tasks::{spawn_guarded, AbortJoin, JoinGuard};

#[cfg(feature = "async")]
mod tokio_tasks {
    use tokio::task::JoinHandle;

    use crate::policy::ReleasePolicy;
    use crate::sentinel::OptionSentinel;
    use crate::UniqueRc;

    /// Aborts a spawned tokio task.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct AbortJoin;

    impl<T> ReleasePolicy<JoinHandle<T>> for AbortJoin {
        type Handle = Option<JoinHandle<T>>;

        fn release(&mut self, handle: Option<JoinHandle<T>>) {
            if let Some(handle) = handle {
                handle.abort();
            }
        }
    }

    crate::movable_policy!(AbortJoin);

    /// Owns a tokio [`JoinHandle`]; dropping or resetting the guard aborts the task.
    pub type JoinGuard<T> = UniqueRc<JoinHandle<T>, AbortJoin, OptionSentinel>;

    /// Spawns `future` on the current runtime and guards the resulting task.
    ///
    /// # Example
    ///
    /// ```rust
    /// use unique_rc::policy::task::spawn_guarded;
    ///
    /// # tokio_test::block_on(async {
    /// let mut guard = spawn_guarded(async { 6 * 7 });
    /// let handle = guard.release().unwrap();
    /// assert_eq!(handle.await.unwrap(), 42);
    /// # });
    /// ```
    pub fn spawn_guarded<F>(future: F) -> JoinGuard<F::Output>
    where
        F: std::future::Future + Send + 'static,
        F::Output: Send + 'static,
    {
        JoinGuard::new(Some(tokio::spawn(future)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::{self, Aborted};

    #[test]
    fn dropping_the_guard_aborts() {
        let (task, guard) = abortable(future::pending::<()>());
        assert!(guard.is_owned());
        drop(guard);
        assert_eq!(futures::executor::block_on(task), Err(Aborted));
    }

    #[test]
    fn released_guard_detaches_the_task() {
        let (task, mut guard) = abortable(future::ready(5));
        let handle = guard.release();
        assert!(handle.is_some());
        drop(guard);
        assert_eq!(futures::executor::block_on(task), Ok(5));
    }

    #[test]
    fn reset_aborts_the_previous_task() {
        let (first, mut guard) = abortable(future::pending::<()>());
        let (second, mut second_guard) = abortable(future::ready(()));

        guard.reset(second_guard.release());
        assert_eq!(futures::executor::block_on(first), Err(Aborted));

        drop(guard);
        // Never polled before the abort.
        assert_eq!(futures::executor::block_on(second), Err(Aborted));
    }

    #[test]
    fn empty_guard_equals_null() {
        let guard = TaskGuard::empty();
        assert!(guard == crate::Null);
        assert!(guard.as_handle().is_none());
    }

    #[cfg(feature = "async")]
    mod tokio_tests {
        use super::super::*;

        #[tokio::test]
        async fn dropping_join_guard_aborts_the_task() {
            let (tx, rx) = tokio::sync::oneshot::channel::<()>();
            let guard = spawn_guarded(async move {
                let _tx = tx;
                futures::future::pending::<()>().await;
            });

            drop(guard);
            // The sender is dropped when the aborted task is torn down.
            assert!(rx.await.is_err());
        }

        #[tokio::test]
        async fn released_join_guard_can_be_awaited() {
            let mut guard = spawn_guarded(async { "done" });
            let handle = guard.release().unwrap();
            assert_eq!(handle.await.unwrap(), "done");
            assert!(!guard.is_owned());
        }
    }
}
