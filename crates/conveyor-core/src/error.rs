//! Errors raised by the predicate parser and the URL canonicalizer.

use thiserror::Error;

/// Errors that can occur while parsing predicates or canonicalizing URLs.
///
/// Both variants are all-or-nothing: no partially populated predicate or URL
/// is ever handed back alongside them.
///
/// # Examples
///
/// ```
/// use conveyor_core::{CoreError, VersionPredicate};
///
/// let err = VersionPredicate::parse("(>=1.0)").unwrap_err();
/// assert!(matches!(err, CoreError::InvalidPredicate { .. }));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// No project name could be matched at the start of the predicate
    #[error("Bad predicate \"{predicate}\"")]
    InvalidPredicate { predicate: String },

    /// No normalization path produced an acceptable URL
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Helper for creating invalid predicate errors
    pub fn invalid_predicate(predicate: impl Into<String>) -> Self {
        Self::InvalidPredicate {
            predicate: predicate.into(),
        }
    }

    /// Helper for creating invalid URL errors
    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }
}
