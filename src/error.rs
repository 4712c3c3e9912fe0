//! Error types for fallible construction.

/// Error returned when a wrapper is asked to own a handle its sentinel
/// reports as unowned.
///
/// The rejected handle is carried back to the caller, so nothing is lost or
/// released on the error path.
///
/// # Examples
///
/// ```rust
/// use unique_rc::sentinel::InvalidHandleValue;
/// use unique_rc::testing::Counting;
/// use unique_rc::UniqueRc;
///
/// type Fd = UniqueRc<i32, Counting, InvalidHandleValue>;
///
/// let err = Fd::try_new(-1).unwrap_err();
/// assert_eq!(*err.handle(), -1);
///
/// let fd = Fd::try_new(0).unwrap();
/// assert!(fd.is_owned());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidHandle<H> {
    handle: H,
}

impl<H> InvalidHandle<H> {
    /// Create a new InvalidHandle error.
    pub fn new(handle: H) -> Self {
        Self { handle }
    }

    /// Get a reference to the rejected handle.
    pub fn handle(&self) -> &H {
        &self.handle
    }

    /// Extract the rejected handle.
    pub fn into_handle(self) -> H {
        self.handle
    }
}

impl<H> std::fmt::Display for InvalidHandle<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "`{}` handle does not denote an owned resource",
            std::any::type_name::<H>()
        )
    }
}

impl<H: std::fmt::Debug> std::error::Error for InvalidHandle<H> {}
