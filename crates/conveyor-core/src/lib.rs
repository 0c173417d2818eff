//! Core metadata handling for conveyor.
//!
//! This crate turns the free-text fields of package index metadata into
//! structured values for the synchronization process. Everything here is pure
//! and every public type is `Send + Sync`.
//!
//! # Architecture
//!
//! conveyor-core defines:
//! - **Comparator**: the closed [`Operator`] set with prefix-match semantics
//! - **Predicate**: [`VersionPredicate`] parsing and matching
//! - **Meta**: [`split_meta`] for `"<predicate>; <marker>"` strings
//! - **URI**: [`canonicalize`] into an accepted absolute [`CanonicalUrl`]
//! - **Normalize**: [`pop_normalized`] for placeholder-laden metadata maps
//!
//! # Examples
//!
//! ```
//! use conveyor_core::{VersionPredicate, canonicalize, split_meta};
//!
//! let predicate = VersionPredicate::parse("pkg (==1.2)").unwrap();
//! assert!(predicate.matches("1.2.3"));
//! assert!(!predicate.matches("1.3.0"));
//!
//! let record = split_meta("pkg (==1.0)").unwrap();
//! assert_eq!(record.version, "1.0");
//!
//! let url = canonicalize("pypi.org/simple/six/").unwrap();
//! assert_eq!(url.as_str(), "http://pypi.org/simple/six/");
//! ```

pub mod comparator;
pub mod error;
pub mod meta;
pub mod normalize;
pub mod predicate;
pub mod uri;

// Re-export commonly used types
pub use comparator::Operator;
pub use error::{CoreError, Result};
pub use meta::{MetaRecord, render_version, split_meta};
pub use normalize::{Blank, PLACEHOLDERS, pop_normalized, pop_normalized_json};
pub use predicate::{Clause, VersionPredicate};
pub use uri::{CanonicalUrl, UrlParts, canonicalize, is_acceptable};
