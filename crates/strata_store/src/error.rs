//! Error types for store operations.

use std::{fmt, sync::Arc};

/// An error from a store operation.
///
/// This is an opaque error type that can wrap any underlying error from a
/// store implementation. The error is cheaply cloneable so that a single
/// failure can be shared with every caller collapsed onto one in-flight
/// fetch. Use [`std::error::Error::source()`] or [`Error::source_as`] to
/// access the underlying cause.
///
/// # Example
///
/// ```
/// use strata_store::Error;
///
/// let error = Error::message("operation failed");
/// assert_eq!(error.to_string(), "operation failed");
/// ```
#[derive(Clone)]
pub struct Error {
    message: Arc<str>,
    source: Option<Arc<dyn std::error::Error + Send + Sync + 'static>>,
}

impl Error {
    /// Creates a new error from a plain message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Arc::from(message.into()),
            source: None,
        }
    }

    /// Creates a new error that wraps an underlying cause.
    ///
    /// The cause stays reachable through [`std::error::Error::source()`], so
    /// callers can still match on the original error type.
    pub fn with_source(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self {
            message: Arc::from(source.to_string()),
            source: Some(Arc::new(source)),
        }
    }

    /// Attempts to downcast the underlying cause to a concrete error type.
    ///
    /// # Examples
    ///
    /// ```
    /// use strata_store::Error;
    ///
    /// let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
    /// let error = Error::with_source(io);
    /// assert!(error.source_as::<std::io::Error>().is_some());
    /// ```
    #[must_use]
    pub fn source_as<T: std::error::Error + 'static>(&self) -> Option<&T> {
        self.source.as_deref()?.downcast_ref::<T>()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("message", &self.message)
            .field("source", &self.source)
            .finish()
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|source| &**source as &(dyn std::error::Error + 'static))
    }
}

/// A specialized [`Result`] type for store operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_contains_message() {
        let error = Error::message("display test");
        assert!(format!("{error}").contains("display test"));
    }

    #[test]
    fn debug_contains_cause_message() {
        let io = std::io::Error::other("root cause");
        let error = Error::with_source(io);
        let debug_str = format!("{error:?}");
        assert!(
            debug_str.contains("root cause"),
            "debug output should contain the cause message, got: {debug_str}"
        );
    }

    #[test]
    fn source_is_preserved() {
        let io = std::io::Error::other("io failure");
        let error = Error::with_source(io);

        let source = std::error::Error::source(&error).expect("source should be present");
        assert!(format!("{source}").contains("io failure"));
        assert!(error.source_as::<std::io::Error>().is_some());
    }

    #[test]
    fn clones_share_the_same_cause() {
        let error = Error::with_source(std::io::Error::other("shared"));
        let clone = error.clone();
        assert_eq!(format!("{error}"), format!("{clone}"));
        assert!(clone.source_as::<std::io::Error>().is_some());
    }

    #[test]
    fn result_type_alias_propagates_errors() {
        fn returns_err() -> Result<i32> {
            Err(Error::message("expected failure"))
        }

        let err = returns_err().expect_err("should return an error");
        assert!(format!("{err}").contains("expected failure"));
    }
}
