//! Version predicate parsing and matching.
//!
//! A predicate names a project and optionally constrains its version:
//!
//! ```text
//! Django (>=1.4,<1.5)
//! zope.interface (==3.8.0)
//! six
//! ```
//!
//! Parsing is a hand-written scanner: the longest name prefix is taken first,
//! the remainder is split on commas, and each piece is probed for a leading
//! comparator before falling back to a bare literal under `==`.

use crate::comparator::Operator;
use crate::error::{CoreError, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// One `(operator, version-literal)` pair of a predicate.
///
/// The literal is opaque and never parsed as a version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Clause {
    pub operator: Operator,
    pub literal: String,
}

impl Clause {
    pub fn new(operator: Operator, literal: impl Into<String>) -> Self {
        Self {
            operator,
            literal: literal.into(),
        }
    }

    /// Checks a candidate version against this clause.
    pub fn matches(&self, candidate: &str) -> bool {
        self.operator.evaluate(candidate, &self.literal)
    }
}

/// A parsed version predicate: `ProjectName (>ver1,ver2, ..)`.
///
/// # Examples
///
/// ```
/// use conveyor_core::{Operator, VersionPredicate};
///
/// let predicate = VersionPredicate::parse("Django (>=1.4,<1.5)").unwrap();
/// assert_eq!(predicate.name(), "Django");
/// assert_eq!(predicate.clauses()[0].operator, Operator::Ge);
/// assert!(predicate.matches("1.4.2"));
/// assert!(!predicate.matches("1.5"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionPredicate {
    source: String,
    name: String,
    clauses: Vec<Clause>,
}

impl VersionPredicate {
    /// Parses a predicate string.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidPredicate`] when the trimmed input does not
    /// start with a word character, i.e. no project name can be read.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let name_end = scan_name(trimmed).ok_or_else(|| CoreError::invalid_predicate(trimmed))?;
        let (name, rest) = trimmed.split_at(name_end);

        // The remainder stops at the end of the first line.
        let rest = rest.split('\n').next().unwrap_or_default().trim();
        let clause_list = rest
            .strip_prefix('(')
            .and_then(|inner| inner.strip_suffix(')'))
            .unwrap_or(rest);

        let clauses = clause_list
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(parse_clause)
            .collect();

        Ok(Self {
            source: raw.to_string(),
            name: name.trim().to_string(),
            clauses,
        })
    }

    /// Project name, trimmed and never empty.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Clauses in source order.
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Text the predicate was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Checks whether `candidate` satisfies every clause.
    ///
    /// A predicate without clauses accepts any version.
    pub fn matches(&self, candidate: &str) -> bool {
        self.clauses.iter().all(|clause| clause.matches(candidate))
    }
}

impl FromStr for VersionPredicate {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for VersionPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

const fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

const fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c')
}

/// Returns the byte length of the longest name prefix of `input`.
///
/// A name is a word character followed by a run of word characters, spaces
/// and hyphens, then any number of `.word*` groups.
fn scan_name(input: &str) -> Option<usize> {
    let mut chars = input.char_indices().peekable();
    let (_, first) = chars.next()?;
    if !is_word(first) {
        return None;
    }

    let mut end = first.len_utf8();
    while let Some(&(i, c)) = chars.peek() {
        if !(is_word(c) || is_space(c) || c == '-') {
            break;
        }
        end = i + c.len_utf8();
        chars.next();
    }

    while let Some(&(i, '.')) = chars.peek() {
        end = i + 1;
        chars.next();
        while let Some(&(i, c)) = chars.peek() {
            if !is_word(c) {
                break;
            }
            end = i + c.len_utf8();
            chars.next();
        }
    }

    Some(end)
}

/// Reads one trimmed, non-empty clause.
///
/// The first operator (in [`Operator::PARSE_ORDER`]) that prefixes the token
/// and leaves a non-empty, whitespace-free literal wins. Anything else is the
/// literal of an implicit `==`.
fn parse_clause(token: &str) -> Clause {
    Operator::PARSE_ORDER
        .into_iter()
        .find_map(|op| {
            let literal = token.strip_prefix(op.symbol())?.trim_start_matches(is_space);
            (!literal.is_empty() && !literal.contains(is_space)).then(|| Clause::new(op, literal))
        })
        .unwrap_or_else(|| Clause::new(Operator::Eq, token))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clauses(raw: &str) -> Vec<(&'static str, String)> {
        VersionPredicate::parse(raw)
            .unwrap()
            .clauses()
            .iter()
            .map(|c| (c.operator.symbol(), c.literal.clone()))
            .collect()
    }

    #[test]
    fn test_parse_bare_name() {
        let predicate = VersionPredicate::parse("pkg").unwrap();
        assert_eq!(predicate.name(), "pkg");
        assert!(predicate.clauses().is_empty());
    }

    #[test]
    fn test_bare_name_matches_anything() {
        let predicate = VersionPredicate::parse("pkg").unwrap();
        for version in ["", "0", "1.0", "2.0b1", "not-a-version"] {
            assert!(predicate.matches(version));
        }
    }

    #[test]
    fn test_parse_parenthesized_clauses() {
        let predicate = VersionPredicate::parse("Django (>=1.4,<1.5)").unwrap();
        assert_eq!(predicate.name(), "Django");
        assert_eq!(
            predicate.clauses(),
            &[Clause::new(Operator::Ge, "1.4"), Clause::new(Operator::Lt, "1.5")]
        );
    }

    #[test]
    fn test_parse_dotted_name() {
        let predicate = VersionPredicate::parse("zope.interface (==3.8.0)").unwrap();
        assert_eq!(predicate.name(), "zope.interface");
        assert_eq!(predicate.clauses(), &[Clause::new(Operator::Eq, "3.8.0")]);
    }

    #[test]
    fn test_parse_hyphenated_name_with_spaces() {
        let predicate = VersionPredicate::parse("  my-package  (>1.0)  ").unwrap();
        assert_eq!(predicate.name(), "my-package");
        assert_eq!(clauses("  my-package  (>1.0)  "), vec![(">", "1.0".into())]);
    }

    #[test]
    fn test_parse_unparenthesized_clauses() {
        assert_eq!(
            clauses("pkg >=1.0, !=1.3"),
            vec![(">=", "1.0".into()), ("!=", "1.3".into())]
        );
    }

    #[test]
    fn test_parse_whitespace_after_operator() {
        assert_eq!(clauses("pkg (>= 1.0)"), vec![(">=", "1.0".into())]);
    }

    #[test]
    fn test_parse_empty_parentheses() {
        let predicate = VersionPredicate::parse("pkg ()").unwrap();
        assert_eq!(predicate.name(), "pkg");
        assert!(predicate.clauses().is_empty());
    }

    #[test]
    fn test_parse_skips_blank_entries() {
        assert_eq!(
            clauses("pkg (>=1.0,, ,<2.0,)"),
            vec![(">=", "1.0".into()), ("<", "2.0".into())]
        );
    }

    #[test]
    fn test_parse_bare_literal_is_eq() {
        assert_eq!(clauses("pkg (1.0, 2.0)"), vec![("==", "1.0".into()), ("==", "2.0".into())]);
    }

    #[test]
    fn test_parse_unrecognized_operator_falls_back() {
        assert_eq!(clauses("pkg (~=1.4)"), vec![("==", "~=1.4".into())]);
        assert_eq!(clauses("pkg (>= 1.0 beta)"), vec![("==", ">= 1.0 beta".into())]);
        assert_eq!(clauses("pkg (==)"), vec![("==", "==".into())]);
    }

    #[test]
    fn test_parse_operator_probe_order() {
        // "<=" leaves nothing, "<" leaves "="
        assert_eq!(clauses("pkg (<=)"), vec![("<", "=".into())]);
    }

    #[test]
    fn test_parse_preserves_order_and_duplicates() {
        assert_eq!(
            clauses("pkg (<2.0,>=1.0,<2.0)"),
            vec![("<", "2.0".into()), (">=", "1.0".into()), ("<", "2.0".into())]
        );
    }

    #[test]
    fn test_parse_unclosed_parenthesis() {
        assert_eq!(clauses("pkg (>=1.0"), vec![("==", "(>=1.0".into())]);
    }

    #[test]
    fn test_name_stops_after_dotted_group() {
        let predicate = VersionPredicate::parse("zope.interface-extra").unwrap();
        assert_eq!(predicate.name(), "zope.interface");
        assert_eq!(clauses("zope.interface-extra"), vec![("==", "-extra".into())]);
    }

    #[test]
    fn test_remainder_stops_at_line_feed() {
        assert_eq!(clauses("pkg (>=1.0)\n(<2.0)"), vec![(">=", "1.0".into())]);
    }

    #[test]
    fn test_parse_invalid_predicates() {
        for raw in ["", "   ", "(>=1.0)", "-pkg", ">=1.0"] {
            let err = VersionPredicate::parse(raw).unwrap_err();
            assert!(matches!(err, CoreError::InvalidPredicate { .. }), "{raw:?}");
        }
    }

    #[test]
    fn test_from_str_and_display() {
        let predicate: VersionPredicate = " six (>=1.4) ".parse().unwrap();
        assert_eq!(predicate.to_string(), " six (>=1.4) ");
        assert_eq!(predicate.source(), " six (>=1.4) ");
    }

    #[test]
    fn test_match_eq_prefix() {
        let predicate = VersionPredicate::parse("pkg (==1.2)").unwrap();
        assert!(predicate.matches("1.2.3"));
        assert!(!predicate.matches("1.3.0"));
    }

    #[test]
    fn test_match_ne() {
        let predicate = VersionPredicate::parse("pkg (!=1.2)").unwrap();
        assert!(!predicate.matches("1.2.5"));
        assert!(predicate.matches("2.0"));
    }

    #[test]
    fn test_match_le() {
        assert!(VersionPredicate::parse("pkg (<=1.2)").unwrap().matches("1.2.9"));
        assert!(VersionPredicate::parse("pkg (<=1.0)").unwrap().matches("0.9"));
    }

    #[test]
    fn test_match_is_conjunction() {
        let predicate = VersionPredicate::parse("Django (>=1.4,<1.5)").unwrap();
        assert!(predicate.matches("1.4"));
        assert!(predicate.matches("1.4.20"));
        assert!(!predicate.matches("1.3.7"));
        assert!(!predicate.matches("1.5"));
    }
}
