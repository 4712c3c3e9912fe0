//! # unique-rc
//!
//! Single-owner wrappers for resources that are not memory.
//!
//! A file descriptor, an OS handle, a subscription cookie, a task, a saved
//! device-context state: each is a plain value that some code must hand back
//! exactly once. [`UniqueRc`] generalizes the unique-pointer idiom to all of
//! them. It pairs a handle with
//!
//! - a **release policy** ([`ReleasePolicy`]) that knows how to give the
//!   handle back, and
//! - a **sentinel** ([`Sentinel`]) that knows which value means "nothing
//!   owned" (null, `-1`, the default value, `None`, ...).
//!
//! The wrapper releases its handle when reset or dropped, and never twice.
//! Moving ownership out of a live wrapper (`take`, `assign_from`, `swap`) is
//! available only when the policy declares the matching [capability](capability).
//!
//! ## Quick Example
//!
//! ```rust
//! use unique_rc::sentinel::InvalidHandleValue;
//! use unique_rc::{movable_policy, Null, ReleasePolicy, UniqueRc};
//!
//! #[derive(Clone, Default)]
//! struct Close;
//!
//! impl ReleasePolicy<i32> for Close {
//!     type Handle = i32;
//!
//!     fn release(&mut self, fd: i32) {
//!         println!("close({})", fd);
//!     }
//! }
//!
//! movable_policy!(Close);
//!
//! type Fd = UniqueRc<i32, Close, InvalidHandleValue>;
//!
//! let mut log = Fd::new(3);
//! let moved = log.take();
//! assert!(log == Null);
//! assert_eq!(moved.get(), 3);
//! // close(3) runs when `moved` goes out of scope
//! ```
//!
//! ## Features
//!
//! | Feature | Effect |
//! |---------|--------|
//! | `tracing` | emits `tracing` events on release and on self-reset |
//! | `async` | tokio task guards ([`policy::task::AbortJoin`](policy::task)) |
//! | `proptest` | operation-sequence strategies in [`testing`] |
//! | `strict-self-reset` | self-reset panics in debug builds |

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod array;
pub mod capability;
mod diagnostics;
pub mod error;
pub mod holder;
pub mod policy;
pub mod sentinel;
pub mod testing;
pub mod unique;

// Re-exports
pub use array::UniqueArray;
pub use capability::{MoveAssign, MoveConstruct, Swappable};
pub use error::InvalidHandle;
pub use holder::Holder;
pub use policy::memory::{BoxDelete, BoxPtr, BoxSliceDelete, SlicePtr};
pub use policy::{ReleasePolicy, Resolved};
pub use sentinel::{DefaultSentinel, InvalidHandleValue, Null, NullSentinel, OptionSentinel, Sentinel};
pub use unique::{UniquePtr, UniqueRc};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::capability::{MoveAssign, MoveConstruct};
    pub use crate::policy::ReleasePolicy;
    pub use crate::sentinel::{Null, Sentinel};
    pub use crate::{UniqueArray, UniquePtr, UniqueRc};
}
