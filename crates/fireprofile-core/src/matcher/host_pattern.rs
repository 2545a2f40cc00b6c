use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A domain pattern that a rule binds to a profile
///
/// Patterns are stored normalized: lowercase, no surrounding whitespace and
/// no trailing dot. Two rules with the same normalized pattern are the same
/// rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HostPattern {
    /// Exact hostname match
    Exact(String),
    /// Strict subdomains of the stored suffix (`*.example.com`)
    Wildcard(String),
}

impl HostPattern {
    /// Parse a pattern string into a HostPattern
    ///
    /// A leading `*.` makes the pattern a wildcard. The `*` is not accepted
    /// anywhere else.
    pub fn parse(pattern: &str) -> crate::Result<Self> {
        let invalid = |reason: &str| Error::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        let normalized = normalize_host(pattern);
        if normalized.is_empty() {
            return Err(invalid("pattern is empty"));
        }

        let (is_wildcard, host) = match normalized.strip_prefix("*.") {
            Some(suffix) => (true, suffix),
            None => (false, normalized.as_str()),
        };

        validate_host(host).map_err(invalid)?;
        if is_wildcard && host.starts_with('[') {
            return Err(invalid("an IP literal has no subdomains"));
        }

        if is_wildcard {
            Ok(HostPattern::Wildcard(host.to_string()))
        } else {
            Ok(HostPattern::Exact(host.to_string()))
        }
    }

    /// Check if a hostname matches this pattern (case-insensitive)
    pub fn matches(&self, hostname: &str) -> bool {
        self.specificity(&normalize_host(hostname)).is_some()
    }

    /// Length of the host suffix covered by this pattern, `None` if it does
    /// not match. `host` must already be normalized.
    pub fn specificity(&self, host: &str) -> Option<usize> {
        match self {
            HostPattern::Exact(pattern) => (host == pattern).then_some(pattern.len()),
            HostPattern::Wildcard(suffix) => {
                let label = host.strip_suffix(suffix.as_str())?.strip_suffix('.')?;
                (!label.is_empty()).then_some(suffix.len() + 1)
            }
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, HostPattern::Wildcard(_))
    }
}

impl fmt::Display for HostPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostPattern::Exact(host) => f.write_str(host),
            HostPattern::Wildcard(suffix) => write!(f, "*.{}", suffix),
        }
    }
}

impl TryFrom<String> for HostPattern {
    type Error = Error;

    fn try_from(value: String) -> crate::Result<Self> {
        HostPattern::parse(&value)
    }
}

impl From<HostPattern> for String {
    fn from(pattern: HostPattern) -> Self {
        pattern.to_string()
    }
}

/// Lowercase a host and strip surrounding whitespace and one trailing dot
pub fn normalize_host(host: &str) -> String {
    let host = host.trim().to_lowercase();
    match host.strip_suffix('.') {
        Some(stripped) => stripped.to_string(),
        None => host,
    }
}

fn validate_host(host: &str) -> std::result::Result<(), &'static str> {
    if host.is_empty() {
        return Err("missing host after '*.'");
    }
    if host.contains('*') {
        return Err("wildcard is only allowed as a leading '*.'");
    }

    // Colons only appear inside a bracketed IPv6 literal, never as a port
    if let Some(literal) = host.strip_prefix('[').and_then(|h| h.strip_suffix(']')) {
        let allowed = |c: char| c.is_ascii_hexdigit() || matches!(c, ':' | '.');
        if !literal.contains(':') || !literal.chars().all(allowed) {
            return Err("invalid IPv6 literal");
        }
        return Ok(());
    }

    if host.split('.').any(str::is_empty) {
        return Err("empty label");
    }
    if host.contains(':') {
        return Err("port is not part of a host pattern");
    }
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.');
    if !host.chars().all(allowed) {
        return Err("unexpected character");
    }
    Ok(())
}
