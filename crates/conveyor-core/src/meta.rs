//! Splitting of `requires_dist`-style metadata strings.

use crate::comparator::Operator;
use crate::error::Result;
use crate::predicate::{Clause, VersionPredicate};
use serde::Serialize;

/// Structured form of a `"<predicate>; <environment-marker>"` string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetaRecord {
    /// Project name
    pub name: String,
    /// Clauses re-rendered as a comma-separated string (`==` is implied)
    pub version: String,
    /// Environment marker after the first `;`, or empty
    pub environment: String,
}

/// Splits a metadata string into name, version and environment marker.
///
/// # Errors
///
/// Propagates [`crate::CoreError::InvalidPredicate`] when the part before the
/// first `;` has no project name.
///
/// # Examples
///
/// ```
/// use conveyor_core::split_meta;
///
/// let record = split_meta("six (>=1.4); python_version=='2.7'").unwrap();
/// assert_eq!(record.name, "six");
/// assert_eq!(record.version, ">=1.4");
/// assert_eq!(record.environment, "python_version=='2.7'");
/// ```
pub fn split_meta(meta: &str) -> Result<MetaRecord> {
    let (requirement, environment) = match meta.split_once(';') {
        Some((requirement, environment)) => (requirement, environment.trim()),
        None => (meta, ""),
    };

    let predicate = VersionPredicate::parse(requirement.trim())?;

    Ok(MetaRecord {
        name: predicate.name().to_string(),
        version: render_version(predicate.clauses()),
        environment: environment.to_string(),
    })
}

/// Renders clauses as `op+literal` joined by commas, omitting `==`.
pub fn render_version(clauses: &[Clause]) -> String {
    clauses
        .iter()
        .map(|clause| match clause.operator {
            Operator::Eq => clause.literal.clone(),
            op => format!("{}{}", op, clause.literal),
        })
        .collect::<Vec<_>>()
        .join(",")
}
