//! `fireprofile --config`: interactive editing of profiles and rules.

use crate::prompt::ConfigEditor;
use anyhow::Result;
use fireprofile_core::ConfigStore;
use std::io;
use std::path::Path;

pub fn execute(config_path: &Path) -> Result<()> {
    let mut store = ConfigStore::open(config_path)?;

    let stdin = io::stdin();
    ConfigEditor::new(&mut store, stdin.lock(), io::stdout()).run()?;

    tracing::debug!("Config editor closed");
    Ok(())
}
