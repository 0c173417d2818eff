use std::path::PathBuf;
use thiserror::Error;

/// Error types for the conveyor converter.
///
/// Wraps core parsing failures and adds the I/O, configuration and record
/// shape errors that only occur at the process boundary.
///
/// # Examples
///
/// ```
/// use conveyor::error::{ConveyorError, Result};
///
/// fn require_name(name: Option<&str>) -> Result<&str> {
///     name.ok_or(ConveyorError::MissingField { field: "name" })
/// }
///
/// assert!(require_name(None).is_err());
/// ```
#[derive(Error, Debug)]
pub enum ConveyorError {
    #[error(transparent)]
    Core(#[from] conveyor_core::CoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to load configuration from {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("release is missing required field '{field}'")]
    MissingField { field: &'static str },

    #[error("do not understand the type returned for release files: {kind}")]
    UnexpectedFiles { kind: &'static str },
}

/// Convenience type alias for `Result<T, ConveyorError>`.
pub type Result<T> = std::result::Result<T, ConveyorError>;
