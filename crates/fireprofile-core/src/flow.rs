//! Orchestration of a single URL-open request.
//!
//! ```text
//! Matching ──match──────────────────────────▶ Launch(profile)
//!    │
//!    └─no match──▶ AwaitingUserChoice ──pick──▶ Launch(profile)  (+ rule if remembered)
//!                         └──────────cancel──▶ Abort
//! ```
//!
//! An invalid URL fails in `Matching`; the user is never asked to pick a
//! profile for something that cannot be opened.

use crate::config::{ConfigStore, DomainRule, Profile};
use crate::matcher::{self, Resolution};
use crate::{Error, Result};

/// What the user picked in the selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Chosen { profile_id: String, remember: bool },
    Cancelled,
}

/// Asks the user which profile should open a host nobody has a rule for
pub trait ProfileSelector {
    /// Block until the user picks one of `profiles` or cancels
    fn prompt_for_profile(&mut self, host: &str, profiles: &[&Profile]) -> Result<Selection>;
}

impl<T: ProfileSelector + ?Sized> ProfileSelector for &mut T {
    fn prompt_for_profile(&mut self, host: &str, profiles: &[&Profile]) -> Result<Selection> {
        (**self).prompt_for_profile(host, profiles)
    }
}

/// Terminal state of the flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    Launch {
        profile: Profile,
        /// Rule written because the user asked to remember the choice
        remembered: Option<DomainRule>,
    },
    Abort,
}

enum FlowState {
    Matching,
    AwaitingUserChoice { host: String },
}

pub struct SelectionFlow<'a, S> {
    store: &'a mut ConfigStore,
    selector: S,
}

impl<'a, S: ProfileSelector> SelectionFlow<'a, S> {
    pub fn new(store: &'a mut ConfigStore, selector: S) -> Self {
        Self { store, selector }
    }

    /// Decide which profile opens `url`, asking the user when no rule applies
    pub fn run(&mut self, url: &str) -> Result<FlowOutcome> {
        let mut state = FlowState::Matching;

        loop {
            state = match state {
                FlowState::Matching => match matcher::resolve(self.store.config(), url)? {
                    Resolution::Matched { rule, profile } => {
                        tracing::info!("Rule {} selects profile {}", rule.pattern, profile.id);
                        return Ok(FlowOutcome::Launch {
                            profile: profile.clone(),
                            remembered: None,
                        });
                    }
                    Resolution::NoMatch { host } => FlowState::AwaitingUserChoice { host },
                },
                FlowState::AwaitingUserChoice { host } => return self.await_choice(&host),
            };
        }
    }

    fn await_choice(&mut self, host: &str) -> Result<FlowOutcome> {
        let profiles: Vec<&Profile> = self.store.config().profiles().collect();
        if profiles.is_empty() {
            return Err(Error::NoProfiles);
        }

        let (profile_id, remember) = match self.selector.prompt_for_profile(host, &profiles)? {
            Selection::Chosen {
                profile_id,
                remember,
            } => (profile_id, remember),
            Selection::Cancelled => {
                tracing::info!("Profile selection cancelled for {}", host);
                return Ok(FlowOutcome::Abort);
            }
        };

        let profile = self
            .store
            .config()
            .profile(&profile_id)
            .cloned()
            .ok_or(Error::UnknownProfile(profile_id))?;

        let remembered = if remember {
            let rule = self.store.add_rule(host, &profile.id)?;
            tracing::info!("Remembered {} -> {}", rule.pattern, rule.profile_id);
            Some(rule)
        } else {
            None
        };

        Ok(FlowOutcome::Launch {
            profile,
            remembered,
        })
    }
}
