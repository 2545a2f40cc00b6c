use super::{Config, DomainRule, Profile};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// On-disk shape of the config file
#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigDocument {
    #[serde(default)]
    profiles: Vec<Profile>,
    #[serde(default)]
    rules: Vec<DomainRule>,
}

/// File written by the first FireProfile releases
///
/// Profiles were keyed by name with a shell command string, and a domain
/// routed itself and all of its subdomains.
#[derive(Debug, Deserialize)]
struct LegacyDocument {
    #[serde(default)]
    profiles: Vec<LegacyProfile>,
    domains: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct LegacyProfile {
    name: String,
    command: String,
}

/// Parse and validate config file contents
pub(crate) fn parse(content: &str) -> Result<Config> {
    let value: serde_json::Value = serde_json::from_str(content)?;

    if value.get("domains").is_some() {
        tracing::info!("Importing legacy config format");
        let legacy: LegacyDocument = serde_json::from_value(value)?;
        return from_legacy(legacy);
    }

    let document: ConfigDocument = serde_json::from_value(value)?;
    from_document(document)
}

/// Render a config as pretty JSON, profiles and rules in sorted order
pub(crate) fn render(config: &Config) -> Result<String> {
    let document = ConfigDocument {
        profiles: config.profiles().cloned().collect(),
        rules: config.rules().cloned().collect(),
    };
    let mut json = serde_json::to_string_pretty(&document)?;
    json.push('\n');
    Ok(json)
}

fn from_document(document: ConfigDocument) -> Result<Config> {
    let mut config = Config::default();

    for profile in document.profiles {
        config.insert_profile(profile)?;
    }
    for rule in document.rules {
        config.add_rule(&rule.pattern.to_string(), &rule.profile_id)?;
    }

    Ok(config)
}

fn from_legacy(legacy: LegacyDocument) -> Result<Config> {
    let mut config = Config::default();

    for profile in legacy.profiles {
        let command = shlex::split(&profile.command).ok_or_else(|| {
            Error::InvalidProfile(format!(
                "profile '{}' has an unterminated quote in its command",
                profile.name
            ))
        })?;
        config.insert_profile(Profile::new(profile.name.clone(), profile.name, command))?;
    }

    for (domain, profile_id) in legacy.domains {
        if config.profile(&profile_id).is_none() {
            tracing::warn!(
                "Skipping legacy rule {} -> {}: profile no longer exists",
                domain,
                profile_id
            );
            continue;
        }

        let wildcard = format!("*.{}", domain.trim());
        for pattern in [domain.as_str(), wildcard.as_str()] {
            match config.add_rule(pattern, &profile_id) {
                Ok(_) => {}
                Err(Error::InvalidPattern { pattern, reason }) => {
                    tracing::warn!("Skipping legacy rule {}: {}", pattern, reason);
                }
                Err(e) => return Err(e),
            }
        }
    }

    Ok(config)
}
