//! `fireprofile <URL>`: route a URL to a profile and start the browser.

use crate::prompt::TerminalSelector;
use anyhow::{Result, bail};
use fireprofile_core::{ConfigStore, FlowOutcome, SelectionFlow};
use fireprofile_launcher::BrowserLauncher;
use std::path::Path;

pub fn execute(config_path: &Path, url: &str, dry_run: bool) -> Result<()> {
    let url = url.trim();
    let mut store = ConfigStore::open(config_path)?;

    let outcome = SelectionFlow::new(&mut store, TerminalSelector::stdio()).run(url)?;

    let profile = match outcome {
        FlowOutcome::Launch {
            profile,
            remembered,
        } => {
            if let Some(rule) = remembered {
                eprintln!(
                    "Saved rule {} -> {} in {}",
                    rule.pattern,
                    rule.profile_id,
                    store.path().display()
                );
            }
            profile
        }
        FlowOutcome::Abort => bail!("No profile selected, nothing was opened"),
    };

    let launcher = BrowserLauncher::new(&profile, url)?;

    if dry_run {
        println!("{}", launcher.command_line());
        return Ok(());
    }

    tracing::debug!("Opening {} in profile {}", url, profile.id);
    launcher.launch()?;
    Ok(())
}
