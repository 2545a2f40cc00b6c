mod host_pattern;

pub use host_pattern::{HostPattern, normalize_host};

use crate::config::{Config, DomainRule, Profile};
use crate::{Error, Result};
use url::Url;

/// Outcome of matching a URL against the rule set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// The most specific matching rule and the profile it routes to
    Matched {
        rule: &'a DomainRule,
        profile: &'a Profile,
    },
    /// No rule covers the host; the caller should ask the user
    NoMatch { host: String },
}

impl Resolution<'_> {
    pub fn profile_id(&self) -> Option<&str> {
        match self {
            Resolution::Matched { profile, .. } => Some(&profile.id),
            Resolution::NoMatch { .. } => None,
        }
    }
}

/// Extract the normalized host from a URL
///
/// The host must itself be a valid exact pattern, so that a choice the user
/// asks to remember can always be stored as a rule.
pub fn extract_host(url: &str) -> Result<String> {
    let invalid = |reason: String| Error::InvalidUrl {
        url: url.to_string(),
        reason,
    };

    let parsed = Url::parse(url.trim()).map_err(|e| invalid(e.to_string()))?;
    let host = parsed
        .host_str()
        .map(normalize_host)
        .filter(|h| !h.is_empty())
        .ok_or_else(|| invalid("URL has no host".to_string()))?;

    match HostPattern::parse(&host) {
        Ok(HostPattern::Exact(_)) => Ok(host),
        Ok(HostPattern::Wildcard(_)) | Err(_) => {
            Err(invalid(format!("host '{}' is not a routable hostname", host)))
        }
    }
}

/// Resolve which profile a URL should open in
///
/// The rule whose pattern covers the longest suffix of the host wins, so an
/// exact rule always beats a wildcard for the same host. Equal specificity
/// cannot happen for distinct normalized patterns; if it ever does, the
/// lexicographically smallest pattern is chosen.
pub fn resolve<'a>(config: &'a Config, url: &str) -> Result<Resolution<'a>> {
    let host = extract_host(url)?;

    let best = config
        .rules()
        .filter_map(|rule| rule.pattern.specificity(&host).map(|len| (len, rule)))
        .max_by(|(len_a, a), (len_b, b)| len_a.cmp(len_b).then_with(|| b.pattern.cmp(&a.pattern)));

    let Some((specificity, rule)) = best else {
        tracing::debug!("No rule matches host {}", host);
        return Ok(Resolution::NoMatch { host });
    };

    let profile = config
        .profile(&rule.profile_id)
        .ok_or_else(|| Error::UnknownProfile(rule.profile_id.clone()))?;

    tracing::debug!(
        "Host {} matched rule {} (specificity {}) -> profile {}",
        host,
        rule.pattern,
        specificity,
        profile.id
    );

    Ok(Resolution::Matched { rule, profile })
}
