//! Profiles, domain rules and their persistence.
//!
//! [`Config`] is the validated in-memory rule set. It upholds the invariants
//! every other module relies on:
//! - profile ids are unique and every profile has a launchable command
//! - every rule references an existing profile
//! - no two rules share a normalized pattern
//!
//! [`ConfigStore`] ties a `Config` to its file and saves after every edit.

mod document;
mod store;

pub use store::ConfigStore;

use crate::matcher::HostPattern;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Token in a profile command that is replaced by the URL being opened
pub const URL_PLACEHOLDER: &str = "%u";

/// A named browser launch configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    /// Program followed by its arguments; may contain [`URL_PLACEHOLDER`]
    pub command: Vec<String>,
}

impl Profile {
    pub fn new(id: impl Into<String>, name: impl Into<String>, command: Vec<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            command,
        }
    }

    /// Check that the profile can be stored and launched
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::InvalidProfile("profile id is empty".to_string()));
        }
        if self.name.trim().is_empty() {
            return Err(Error::InvalidProfile(format!(
                "profile '{}' has an empty name",
                self.id
            )));
        }
        match self.command.first() {
            Some(program) if !program.trim().is_empty() => Ok(()),
            _ => Err(Error::InvalidProfile(format!(
                "profile '{}' has no command",
                self.id
            ))),
        }
    }

    /// Command rendered as a single shell-quoted line for display
    pub fn command_line(&self) -> String {
        shlex::try_join(self.command.iter().map(String::as_str))
            .unwrap_or_else(|_| self.command.join(" "))
    }
}

/// Binding of a domain pattern to a profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRule {
    pub pattern: HostPattern,
    #[serde(rename = "profileId")]
    pub profile_id: String,
}

/// Validated set of profiles and rules
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    profiles: BTreeMap<String, Profile>,
    rules: BTreeMap<HostPattern, DomainRule>,
}

impl Config {
    pub fn profiles(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.values()
    }

    pub fn profile(&self, id: &str) -> Option<&Profile> {
        self.profiles.get(id)
    }

    pub fn rules(&self) -> impl Iterator<Item = &DomainRule> {
        self.rules.values()
    }

    /// Look up a rule by pattern, normalizing the pattern first
    pub fn rule(&self, pattern: &str) -> Option<&DomainRule> {
        HostPattern::parse(pattern)
            .ok()
            .and_then(|pattern| self.rules.get(&pattern))
    }

    /// Rules that route to the given profile
    pub fn rules_for<'a>(&'a self, profile_id: &'a str) -> impl Iterator<Item = &'a DomainRule> {
        self.rules().filter(move |rule| rule.profile_id == profile_id)
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty() && self.rules.is_empty()
    }

    /// Add a new profile; ids must be unique
    pub fn insert_profile(&mut self, profile: Profile) -> Result<()> {
        profile.validate()?;
        if self.profiles.contains_key(&profile.id) {
            return Err(Error::DuplicateProfile(profile.id));
        }
        self.profiles.insert(profile.id.clone(), profile);
        Ok(())
    }

    /// Replace the name and command of an existing profile
    pub fn update_profile(&mut self, id: &str, name: String, command: Vec<String>) -> Result<()> {
        let updated = Profile::new(id, name, command);
        updated.validate()?;

        let profile = self
            .profiles
            .get_mut(id)
            .ok_or_else(|| Error::UnknownProfile(id.to_string()))?;
        *profile = updated;
        Ok(())
    }

    /// Delete a profile together with every rule that references it
    pub fn remove_profile(&mut self, id: &str) -> Result<(Profile, Vec<DomainRule>)> {
        let profile = self
            .profiles
            .remove(id)
            .ok_or_else(|| Error::UnknownProfile(id.to_string()))?;

        let mut removed = Vec::new();
        self.rules.retain(|_, rule| {
            if rule.profile_id == id {
                removed.push(rule.clone());
                false
            } else {
                true
            }
        });

        Ok((profile, removed))
    }

    /// Add a rule, refusing to silently re-route an existing pattern
    ///
    /// Adding a pattern that already routes to the same profile is a no-op.
    pub fn add_rule(&mut self, pattern: &str, profile_id: &str) -> Result<DomainRule> {
        let rule = self.new_rule(pattern, profile_id)?;

        if let Some(existing) = self.rules.get(&rule.pattern) {
            if existing.profile_id != rule.profile_id {
                return Err(Error::AmbiguousRule {
                    pattern: rule.pattern.to_string(),
                    existing: existing.profile_id.clone(),
                    requested: rule.profile_id,
                });
            }
            return Ok(existing.clone());
        }

        self.rules.insert(rule.pattern.clone(), rule.clone());
        Ok(rule)
    }

    /// Create or overwrite the rule for a pattern; returns the replaced rule
    pub fn set_rule(&mut self, pattern: &str, profile_id: &str) -> Result<Option<DomainRule>> {
        let rule = self.new_rule(pattern, profile_id)?;
        Ok(self.rules.insert(rule.pattern.clone(), rule))
    }

    pub fn remove_rule(&mut self, pattern: &str) -> Result<DomainRule> {
        let parsed = HostPattern::parse(pattern)?;
        self.rules
            .remove(&parsed)
            .ok_or_else(|| Error::UnknownRule(parsed.to_string()))
    }

    fn new_rule(&self, pattern: &str, profile_id: &str) -> Result<DomainRule> {
        let pattern = HostPattern::parse(pattern)?;
        if !self.profiles.contains_key(profile_id) {
            return Err(Error::UnknownProfile(profile_id.to_string()));
        }
        Ok(DomainRule {
            pattern,
            profile_id: profile_id.to_string(),
        })
    }
}
