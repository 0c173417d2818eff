//! Comparison operators used by version predicates.
//!
//! Versions are compared as plain strings. Equality is a prefix test, so
//! `==1.2` accepts the whole `1.2*` family, and the inclusive operators accept
//! either a prefix match or the strict lexicographic order. This is coarser
//! than PEP 440 ordering.

use serde::Serialize;
use std::fmt;

/// One of the six comparison operators a clause may carry.
///
/// # Examples
///
/// ```
/// use conveyor_core::Operator;
///
/// assert!(Operator::Eq.evaluate("1.2.3", "1.2"));
/// assert!(Operator::Le.evaluate("1.2.9", "1.2"));
/// assert!(!Operator::Lt.evaluate("1.2.9", "1.2"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operator {
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
}

impl Operator {
    /// Probe order used when reading a clause.
    ///
    /// Two-character symbols come before their one-character prefixes.
    pub const PARSE_ORDER: [Self; 6] = [Self::Le, Self::Ge, Self::Lt, Self::Gt, Self::Ne, Self::Eq];

    /// Returns the textual symbol of the operator.
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Le => "<=",
            Self::Ge => ">=",
            Self::Eq => "==",
            Self::Ne => "!=",
        }
    }

    /// Checks `candidate` against `literal` under this operator.
    pub fn evaluate(self, candidate: &str, literal: &str) -> bool {
        let prefix = candidate.starts_with(literal);
        match self {
            Self::Lt => candidate < literal,
            Self::Gt => candidate > literal,
            Self::Le => prefix || candidate < literal,
            Self::Ge => prefix || candidate > literal,
            Self::Eq => prefix,
            Self::Ne => !prefix,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
