//! URL canonicalization.
//!
//! Turns loosely written locations (`pypi.org/simple/six/`,
//! `http://EXAMPLE.com`, `bücher.de/pkg.tar.gz`) into absolute URLs that
//! satisfy a fixed acceptance pattern. This is narrower than RFC 3986:
//! only `http`, `https`, `ftp` and `ftps` URLs whose host is a
//! dotted domain, `localhost`, an IPv4 dotted quad or an IPv6 literal are
//! accepted.
//!
//! # Key Features
//!
//! - Missing scheme defaults to `http`
//! - Scheme-less `host/path` input is re-split so the host lands in the netloc
//! - Empty paths become `/`
//! - Non-ASCII hosts are retried in their IDNA (punycode) form

use crate::error::{CoreError, Result};
use once_cell::sync::Lazy;
use regex::bytes::{Regex, RegexBuilder};
use serde::Serialize;
use std::fmt;

/// Schemes for which joining emits `//` even when the netloc is empty.
const USES_NETLOC: &[&str] = &[
    "ftp", "http", "gopher", "nntp", "telnet", "imap", "wais", "file", "mms", "https", "shttp",
    "snews", "prospero", "rtsp", "rtspu", "rsync", "svn", "svn+ssh", "sftp", "nfs", "git",
    "git+ssh",
];

const ACCEPTANCE_PATTERN: &str = concat!(
    r"^(?:http|ftp)s?://",
    r"(?:(?:[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])?\.)+(?:[A-Z]{2,6}\.?|[A-Z0-9-]{2,}\.?)",
    r"|localhost",
    r"|\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}",
    r"|\[?[A-F0-9]*:[A-F0-9:]+\]?)",
    r"(?::\d+)?",
    r"(?:/?|[/?]\S+)$",
);

/// Compiled acceptance pattern.
///
/// Unicode is off so `\d`, `\S` and case folding keep their ASCII meaning;
/// non-ASCII bytes count as non-whitespace.
static ACCEPTANCE: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(ACCEPTANCE_PATTERN)
        .case_insensitive(true)
        .unicode(false)
        .build()
        .expect("acceptance pattern is a valid regex")
});

/// Checks a string against the acceptance pattern.
pub fn is_acceptable(url: &str) -> bool {
    ACCEPTANCE.is_match(url.as_bytes())
}

/// The five components of a split URL.
///
/// # Examples
///
/// ```
/// use conveyor_core::UrlParts;
///
/// let parts = UrlParts::split("HTTPS://example.com/a/b?x=1#top").unwrap();
/// assert_eq!(parts.scheme, "https");
/// assert_eq!(parts.netloc, "example.com");
/// assert_eq!(parts.path, "/a/b");
/// assert_eq!(parts.query, "x=1");
/// assert_eq!(parts.fragment, "top");
/// assert_eq!(parts.join(), "https://example.com/a/b?x=1#top");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParts {
    pub scheme: String,
    pub netloc: String,
    pub path: String,
    pub query: String,
    pub fragment: String,
}

impl UrlParts {
    /// Splits a URL into scheme, netloc, path, query and fragment.
    ///
    /// A prefix before the first `:` is only a scheme when it is made of
    /// scheme characters and what follows the colon is not a bare port
    /// number (`localhost:8000` has no scheme). `http` is always a scheme.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidUrl`] when the netloc has unbalanced
    /// IPv6 brackets.
    pub fn split(url: &str) -> Result<Self> {
        let mut parts = Self::default();
        let mut rest = url;

        if let Some(colon) = url.find(':')
            && colon > 0
        {
            let (candidate, after) = (&url[..colon], &url[colon + 1..]);
            let is_port = !after.is_empty() && after.bytes().all(|b| b.is_ascii_digit());
            if candidate == "http" || (candidate.chars().all(is_scheme_char) && !is_port) {
                parts.scheme = candidate.to_ascii_lowercase();
                rest = after;
            }
        }

        if let Some(after_slashes) = rest.strip_prefix("//") {
            let end = after_slashes
                .find(['/', '?', '#'])
                .unwrap_or(after_slashes.len());
            let netloc = &after_slashes[..end];
            if netloc.contains('[') != netloc.contains(']') {
                return Err(CoreError::invalid_url(url, "invalid IPv6 URL"));
            }
            parts.netloc = netloc.to_string();
            rest = &after_slashes[end..];
        }

        if let Some((before, fragment)) = rest.split_once('#') {
            parts.fragment = fragment.to_string();
            rest = before;
        }
        if let Some((before, query)) = rest.split_once('?') {
            parts.query = query.to_string();
            rest = before;
        }
        parts.path = rest.to_string();

        Ok(parts)
    }

    /// Joins the components back into a URL string.
    pub fn join(&self) -> String {
        let mut url = self.path.clone();

        if !self.netloc.is_empty()
            || (USES_NETLOC.contains(&self.scheme.as_str()) && !url.starts_with("//"))
        {
            if !url.is_empty() && !url.starts_with('/') {
                url.insert(0, '/');
            }
            url = format!("//{}{}", self.netloc, url);
        }
        if !self.scheme.is_empty() {
            url = format!("{}:{}", self.scheme, url);
        }
        if !self.query.is_empty() {
            url.push('?');
            url.push_str(&self.query);
        }
        if !self.fragment.is_empty() {
            url.push('#');
            url.push_str(&self.fragment);
        }

        url
    }
}

const fn is_scheme_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')
}

/// An absolute URL that satisfies the acceptance pattern.
///
/// Only [`canonicalize`] constructs values of this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CanonicalUrl(String);

impl CanonicalUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for CanonicalUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<CanonicalUrl> for String {
    fn from(url: CanonicalUrl) -> Self {
        url.0
    }
}

/// Normalizes `raw` into an absolute URL accepted by the acceptance pattern.
///
/// # Errors
///
/// Returns [`CoreError::InvalidUrl`] when neither the normalized string nor
/// its IDNA-encoded variant is acceptable, or when the host cannot be
/// IDNA-encoded.
///
/// # Examples
///
/// ```
/// use conveyor_core::canonicalize;
///
/// assert_eq!(
///     canonicalize("pypi.org/simple/six/").unwrap().as_str(),
///     "http://pypi.org/simple/six/"
/// );
/// assert_eq!(canonicalize("http://example.com").unwrap().as_str(), "http://example.com/");
/// assert!(canonicalize("").is_err());
/// ```
pub fn canonicalize(raw: &str) -> Result<CanonicalUrl> {
    let mut parts = UrlParts::split(raw)?;

    if parts.scheme.is_empty() {
        parts.scheme = "http".to_string();
    }

    if parts.netloc.is_empty() {
        // The path holds "host/path"; re-split so the host lands in the netloc.
        parts.netloc = std::mem::take(&mut parts.path);
        parts = UrlParts::split(&parts.join())?;
    }

    if parts.path.is_empty() {
        parts.path = "/".to_string();
    }

    let cleaned = parts.join();
    if is_acceptable(&cleaned) {
        return Ok(CanonicalUrl(cleaned));
    }

    if cleaned.is_empty() {
        return Err(CoreError::invalid_url(raw, "empty URL"));
    }

    let mut parts = UrlParts::split(&cleaned)?;
    parts.netloc =
        encode_netloc(&parts.netloc).map_err(|reason| CoreError::invalid_url(raw, reason))?;
    let encoded = parts.join();

    tracing::debug!(raw, encoded = %encoded, "retrying URL with IDNA-encoded host");

    if is_acceptable(&encoded) {
        Ok(CanonicalUrl(encoded))
    } else {
        Err(CoreError::invalid_url(raw, "does not match the acceptance pattern"))
    }
}

/// IDNA-encodes the host part of a netloc, keeping user-info and port.
///
/// Only the ASCII-compatible encoding is applied: numeric hosts stay numeric
/// and percent escapes stay escaped, so the acceptance pattern still decides.
fn encode_netloc(netloc: &str) -> std::result::Result<String, String> {
    let (userinfo, hostport) = match netloc.rsplit_once('@') {
        Some((userinfo, hostport)) => (Some(userinfo), hostport),
        None => (None, netloc),
    };
    let (host, port) = split_port(hostport);

    // IPv6 literals are already ASCII and are not domain names.
    let encoded = if host.is_empty() || host.starts_with('[') {
        host.to_string()
    } else {
        idna::domain_to_ascii(host)
            .map_err(|_| format!("host '{host}' cannot be IDNA-encoded"))?
    };

    let mut netloc = String::with_capacity(netloc.len() + encoded.len());
    if let Some(userinfo) = userinfo {
        netloc.push_str(userinfo);
        netloc.push('@');
    }
    netloc.push_str(&encoded);
    if let Some(port) = port {
        netloc.push(':');
        netloc.push_str(port);
    }
    Ok(netloc)
}

/// Splits a trailing `:digits` port off a host, leaving IPv6 literals intact.
fn split_port(hostport: &str) -> (&str, Option<&str>) {
    let host_end = if hostport.starts_with('[') {
        hostport.find(']').map_or(hostport.len(), |i| i + 1)
    } else {
        hostport.rfind(':').unwrap_or(hostport.len())
    };

    match hostport[host_end..].strip_prefix(':') {
        Some(port) if port.bytes().all(|b| b.is_ascii_digit()) => {
            (&hostport[..host_end], Some(port))
        }
        _ => (hostport, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical(raw: &str) -> String {
        canonicalize(raw).unwrap().into_string()
    }

    #[test]
    fn test_split_full_url() {
        let parts = UrlParts::split("ftp://user@host.example.org:21/pub/file.tgz?a=b#frag").unwrap();
        assert_eq!(parts.scheme, "ftp");
        assert_eq!(parts.netloc, "user@host.example.org:21");
        assert_eq!(parts.path, "/pub/file.tgz");
        assert_eq!(parts.query, "a=b");
        assert_eq!(parts.fragment, "frag");
    }

    #[test]
    fn test_split_without_scheme() {
        let parts = UrlParts::split("pypi.org/simple/six/").unwrap();
        assert_eq!(parts.scheme, "");
        assert_eq!(parts.netloc, "");
        assert_eq!(parts.path, "pypi.org/simple/six/");
    }

    #[test]
    fn test_split_host_port_is_not_scheme() {
        let parts = UrlParts::split("localhost:8000").unwrap();
        assert_eq!(parts.scheme, "");
        assert_eq!(parts.path, "localhost:8000");
    }

    #[test]
    fn test_split_http_is_always_scheme() {
        let parts = UrlParts::split("http:80").unwrap();
        assert_eq!(parts.scheme, "http");
        assert_eq!(parts.path, "80");
    }

    #[test]
    fn test_split_lowercases_scheme() {
        assert_eq!(UrlParts::split("FTP://Host.COM").unwrap().scheme, "ftp");
    }

    #[test]
    fn test_split_fragment_before_query() {
        let parts = UrlParts::split("http://h.com/p#frag?notquery").unwrap();
        assert_eq!(parts.path, "/p");
        assert_eq!(parts.query, "");
        assert_eq!(parts.fragment, "frag?notquery");
    }

    #[test]
    fn test_split_unbalanced_brackets() {
        let err = UrlParts::split("http://[::1/path").unwrap_err();
        assert!(matches!(err, CoreError::InvalidUrl { .. }));
    }

    #[test]
    fn test_join_emits_netloc_for_known_schemes() {
        let parts = UrlParts {
            scheme: "http".into(),
            ..UrlParts::default()
        };
        assert_eq!(parts.join(), "http://");

        let parts = UrlParts {
            scheme: "mailto".into(),
            path: "someone@example.com".into(),
            ..UrlParts::default()
        };
        assert_eq!(parts.join(), "mailto:someone@example.com");
    }

    #[test]
    fn test_join_prefixes_relative_path() {
        let parts = UrlParts {
            scheme: "http".into(),
            netloc: "h.com".into(),
            path: "a/b".into(),
            ..UrlParts::default()
        };
        assert_eq!(parts.join(), "http://h.com/a/b");
    }

    #[test]
    fn test_canonicalize_scheme_less_host_and_path() {
        assert_eq!(canonical("pypi.org/simple/six/"), "http://pypi.org/simple/six/");
        assert_eq!(
            canonical("files.example.com/pkg.tar.gz"),
            "http://files.example.com/pkg.tar.gz"
        );
    }

    #[test]
    fn test_canonicalize_defaults_path() {
        assert_eq!(canonical("http://example.com"), "http://example.com/");
        assert_eq!(canonical("example.com"), "http://example.com/");
    }

    #[test]
    fn test_canonicalize_keeps_case() {
        assert_eq!(canonical("http://EXAMPLE.com"), "http://EXAMPLE.com/");
    }

    #[test]
    fn test_canonicalize_query_without_path() {
        assert_eq!(canonical("example.com?x=1"), "http://example.com/?x=1");
    }

    #[test]
    fn test_canonicalize_accepted_hosts() {
        assert_eq!(canonical("localhost:8000"), "http://localhost:8000/");
        assert_eq!(canonical("https://127.0.0.1:8443/x"), "https://127.0.0.1:8443/x");
        assert_eq!(canonical("http://[::1]:8080/"), "http://[::1]:8080/");
        assert_eq!(canonical("ftps://mirror.example.org/pub"), "ftps://mirror.example.org/pub");
    }

    #[test]
    fn test_canonicalize_rejects_other_schemes() {
        assert!(canonicalize("git://github.com/user/repo.git").is_err());
        assert!(canonicalize("mailto:someone@example.com").is_err());
    }

    #[test]
    fn test_canonicalize_empty() {
        let err = canonicalize("").unwrap_err();
        assert!(matches!(err, CoreError::InvalidUrl { .. }));
    }

    #[test]
    fn test_canonicalize_whitespace_in_path() {
        assert!(canonicalize("http://example.com/a b").is_err());
    }

    #[test]
    fn test_canonicalize_scheme_like_prefix_with_port() {
        // "example.com" reads as a scheme because "8080/path" is not a bare port.
        assert!(canonicalize("example.com:8080/path").is_err());
    }

    #[test]
    fn test_canonicalize_idna_host() {
        assert_eq!(canonical("http://bücher.de/pkg"), "http://xn--bcher-kva.de/pkg");
        assert_eq!(canonical("bücher.de"), "http://xn--bcher-kva.de/");
        assert_eq!(canonical("https://bücher.de:8443/"), "https://xn--bcher-kva.de:8443/");
    }

    #[test]
    fn test_idna_retry_leaves_ascii_hosts_alone() {
        for raw in [
            "1",
            "http://2130706433/",
            "http://0x7f.0.0.1/",
            "http://ex%61mple.com/",
        ] {
            let err = canonicalize(raw).unwrap_err();
            assert!(matches!(err, CoreError::InvalidUrl { .. }), "{raw}");
        }
        assert_eq!(encode_netloc("2130706433").unwrap(), "2130706433");
        assert_eq!(encode_netloc("ex%61mple.com").unwrap(), "ex%61mple.com");
        assert_eq!(encode_netloc("[::1]:8080").unwrap(), "[::1]:8080");
    }

    #[test]
    fn test_canonicalize_unencodable_host() {
        let err = canonicalize("http://bü cher.de/").unwrap_err();
        assert!(matches!(err, CoreError::InvalidUrl { .. }));
    }

    #[test]
    fn test_encode_netloc_keeps_userinfo_and_port() {
        assert_eq!(
            encode_netloc("user@bücher.de:21").unwrap(),
            "user@xn--bcher-kva.de:21"
        );
        assert_eq!(encode_netloc("").unwrap(), "");
    }

    #[test]
    fn test_split_port() {
        assert_eq!(split_port("host.com:80"), ("host.com", Some("80")));
        assert_eq!(split_port("host.com"), ("host.com", None));
        assert_eq!(split_port("[::1]:80"), ("[::1]", Some("80")));
        assert_eq!(split_port("[::1]"), ("[::1]", None));
    }

    #[test]
    fn test_acceptance_pattern() {
        assert!(is_acceptable("http://example.com/"));
        assert!(is_acceptable("HTTPS://Example.COM"));
        assert!(is_acceptable("http://localhost/"));
        assert!(!is_acceptable("http:///"));
        assert!(!is_acceptable("http://example/"));
        assert!(!is_acceptable("http://exa_mple.com/"));
    }

    #[test]
    fn test_canonical_url_serializes_as_string() {
        let url = canonicalize("example.com").unwrap();
        assert_eq!(serde_json::to_string(&url).unwrap(), "\"http://example.com/\"");
        assert_eq!(url.to_string(), "http://example.com/");
    }
}
