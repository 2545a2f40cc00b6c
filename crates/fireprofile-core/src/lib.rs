pub mod config;
pub mod error;
pub mod flow;
pub mod matcher;

pub use config::{Config, ConfigStore, DomainRule, Profile};
pub use error::{Error, Result};
pub use flow::{FlowOutcome, ProfileSelector, Selection, SelectionFlow};
pub use matcher::{HostPattern, Resolution};
