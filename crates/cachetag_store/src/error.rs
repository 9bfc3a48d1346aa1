// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Error types for response store operations.

use std::fmt;

/// Classifies a [`StoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    /// The backing store failed or could not be reached.
    Unavailable,
    /// The operation did not complete within the configured bound.
    Timeout,
}

impl fmt::Display for StoreErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => f.write_str("unavailable"),
            Self::Timeout => f.write_str("timed out"),
        }
    }
}

/// An error from a response store operation.
///
/// A lookup miss is *not* an error; stores report misses as `Ok(None)`. This
/// type covers backend failures ([`StoreErrorKind::Unavailable`]) and bounded
/// timeouts ([`StoreErrorKind::Timeout`]). Use [`std::error::Error::source()`]
/// to access the underlying cause if needed.
///
/// # Example
///
/// ```
/// use cachetag_store::{StoreError, StoreErrorKind};
///
/// let error = StoreError::unavailable("connection refused");
/// assert_eq!(error.kind(), StoreErrorKind::Unavailable);
/// ```
#[ohno::error]
#[display("response store {kind}")]
pub struct StoreError {
    kind: StoreErrorKind,
}

impl StoreError {
    /// Creates an error signaling that the backing store failed.
    ///
    /// # Examples
    ///
    /// ```
    /// use cachetag_store::StoreError;
    ///
    /// let error = StoreError::unavailable("connection refused");
    /// ```
    pub fn unavailable(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::caused_by(StoreErrorKind::Unavailable, cause)
    }

    /// Creates an error signaling that the operation exceeded its time bound.
    ///
    /// # Examples
    ///
    /// ```
    /// use cachetag_store::StoreError;
    ///
    /// let error = StoreError::timeout("future timed out");
    /// ```
    pub fn timeout(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::caused_by(StoreErrorKind::Timeout, cause)
    }

    /// Returns the kind of this error.
    #[must_use]
    pub fn kind(&self) -> StoreErrorKind {
        self.kind
    }
}

/// A tag rejected at the API boundary.
///
/// Raised by [`Tag::new`](crate::Tag::new) for empty strings and strings
/// containing whitespace or control characters. This is a programming-error
/// class: callers should fix the tag source rather than retry.
#[ohno::error]
#[display("invalid cache tag: {tag}")]
pub struct InvalidTag {
    tag: String,
}

impl InvalidTag {
    pub(crate) fn rejected(tag: impl Into<String>) -> Self {
        Self::new(tag)
    }

    /// Returns the offending tag text.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

/// A specialized [`Result`] type for response store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_reports_kind_and_cause() {
        let error = StoreError::unavailable("connection refused");
        assert_eq!(error.kind(), StoreErrorKind::Unavailable);
        let display = format!("{error}");
        assert!(
            display.contains("unavailable"),
            "display should name the kind, got: {display}"
        );
    }

    #[test]
    fn timeout_reports_kind() {
        let error = StoreError::timeout("future timed out");
        assert_eq!(error.kind(), StoreErrorKind::Timeout);
    }

    #[test]
    fn store_error_debug_contains_cause_message() {
        let error = StoreError::unavailable("disk on fire");
        let debug_str = format!("{error:?}");
        assert!(
            debug_str.contains("disk on fire"),
            "debug output should contain the cause message, got: {debug_str}"
        );
    }

    #[test]
    fn invalid_tag_keeps_offending_text() {
        let error = InvalidTag::rejected("bad tag");
        assert_eq!(error.tag(), "bad tag");
        assert!(format!("{error}").contains("bad tag"));
    }

    #[test]
    fn result_type_alias_propagates_errors() {
        fn returns_err() -> Result<i32> {
            Err(StoreError::unavailable("expected failure"))
        }

        let err = returns_err().expect_err("should return an error");
        assert_eq!(err.kind(), StoreErrorKind::Unavailable);
    }
}
