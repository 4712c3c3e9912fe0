//! Logging and self-reset reporting.
//!
//! Feature-gated behind `tracing` and `strict-self-reset`. Without either
//! feature every hook here is an empty inline function.

#[cfg(any(feature = "tracing", feature = "strict-self-reset"))]
use std::any::type_name;

/// Log target for all events emitted by this crate.
#[cfg(feature = "tracing")]
const TARGET: &str = "unique_rc";

/// An owned handle is about to be passed to its policy.
#[inline]
pub(crate) fn released<H, D>() {
    #[cfg(feature = "tracing")]
    tracing::trace!(
        target: TARGET,
        handle = type_name::<H>(),
        policy = type_name::<D>(),
        "releasing owned handle"
    );
}

/// A wrapper was reset to the handle it already owns.
///
/// The old value is still released before the new one is adopted, so the
/// wrapper now holds a handle whose resource is gone.
#[inline]
pub(crate) fn self_reset<H, D>() {
    #[cfg(feature = "strict-self-reset")]
    if cfg!(debug_assertions) {
        panic!(
            "self-reset of a `{}` handle: the resource was released and then re-adopted",
            type_name::<H>()
        );
    }

    #[cfg(feature = "tracing")]
    tracing::warn!(
        target: TARGET,
        handle = type_name::<H>(),
        policy = type_name::<D>(),
        "self-reset: handle released and re-adopted"
    );
}
