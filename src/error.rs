//! Errors reported by the panel driver.

/// Failure of a driver operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error<E> {
    /// The bus or a control line reported an error.
    Interface(E),
    /// The busy line did not release within the timeout set by `Config::busy_timeout_ms`. Never
    /// returned when no timeout is configured.
    BusyTimeout,
}

impl<E> From<E> for Error<E> {
    fn from(e: E) -> Self {
        Error::Interface(e)
    }
}

impl<E: core::fmt::Debug> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Interface(e) => write!(f, "display interface error: {:?}", e),
            Error::BusyTimeout => f.write_str("timed out waiting for the busy line to release"),
        }
    }
}

#[cfg(feature = "std")]
impl<E: core::fmt::Debug> std::error::Error for Error<E> {}
