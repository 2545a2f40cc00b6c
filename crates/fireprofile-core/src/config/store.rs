use super::{Config, DomainRule, Profile, document};
use crate::{Error, Result};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// File name of the config inside the user's home directory
const CONFIG_FILE_NAME: &str = ".fireprofile.json";

/// A [`Config`] bound to the file it was loaded from
///
/// Every mutating method validates the edit against a copy, writes the copy
/// to disk and only then replaces the in-memory config, so a failed save
/// leaves both unchanged.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    config: Config,
}

impl ConfigStore {
    /// Default config location (`~/.fireprofile.json`)
    pub fn default_path() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(CONFIG_FILE_NAME))
            .ok_or_else(|| {
                Error::config_load(
                    Path::new(CONFIG_FILE_NAME),
                    "Could not determine home directory",
                )
            })
    }

    /// Load the config at `path`
    ///
    /// A missing file yields an empty config. An unreadable or malformed file
    /// is an error: starting empty would lose the user's rules on next save.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        tracing::debug!("Reading config from: {}", path.display());

        let config = match fs::read_to_string(&path) {
            Ok(content) => document::parse(&content).map_err(|e| Error::config_load(&path, e))?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No config at {}, starting empty", path.display());
                Config::default()
            }
            Err(e) => return Err(Error::config_load(&path, e)),
        };

        tracing::debug!(
            "Loaded {} profile(s) and {} rule(s)",
            config.profiles().count(),
            config.rules().count()
        );

        Ok(Self { path, config })
    }

    /// Wrap an in-memory config without reading anything
    pub fn with_config(path: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            path: path.into(),
            config,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Write the current config to disk
    pub fn save(&self) -> Result<()> {
        write_atomic(&self.path, &self.config)
    }

    pub fn add_profile(&mut self, profile: Profile) -> Result<()> {
        self.mutate(|config| config.insert_profile(profile))
    }

    pub fn update_profile(&mut self, id: &str, name: String, command: Vec<String>) -> Result<()> {
        self.mutate(|config| config.update_profile(id, name, command))
    }

    /// Delete a profile and its rules; returns the rules that were removed
    pub fn remove_profile(&mut self, id: &str) -> Result<Vec<DomainRule>> {
        let removed = self.mutate(|config| config.remove_profile(id))?.1;
        if !removed.is_empty() {
            tracing::info!("Removed {} rule(s) along with profile {}", removed.len(), id);
        }
        Ok(removed)
    }

    pub fn add_rule(&mut self, pattern: &str, profile_id: &str) -> Result<DomainRule> {
        self.mutate(|config| config.add_rule(pattern, profile_id))
    }

    pub fn set_rule(&mut self, pattern: &str, profile_id: &str) -> Result<Option<DomainRule>> {
        self.mutate(|config| config.set_rule(pattern, profile_id))
    }

    pub fn remove_rule(&mut self, pattern: &str) -> Result<DomainRule> {
        self.mutate(|config| config.remove_rule(pattern))
    }

    fn mutate<T>(&mut self, edit: impl FnOnce(&mut Config) -> Result<T>) -> Result<T> {
        let mut next = self.config.clone();
        let output = edit(&mut next)?;
        write_atomic(&self.path, &next)?;
        self.config = next;
        Ok(output)
    }
}

fn write_atomic(path: &Path, config: &Config) -> Result<()> {
    tracing::debug!("Writing config to: {}", path.display());

    let json = document::render(config)?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let write = || -> std::io::Result<()> {
        fs::create_dir_all(dir)?;
        let mut file = tempfile::NamedTempFile::new_in(dir)?;
        file.write_all(json.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(path).map_err(|e| e.error)?;
        Ok(())
    };
    write().map_err(|source| Error::ConfigWrite {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!("Config saved to {}", path.display());
    Ok(())
}
