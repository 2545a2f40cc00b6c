use crate::{Error, Result};
use fireprofile_core::Profile;
use fireprofile_core::config::URL_PLACEHOLDER;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Starts a browser for one profile and URL without waiting for it
#[derive(Debug, Clone)]
pub struct BrowserLauncher {
    program: String,
    args: Vec<String>,
}

/// A spawned browser process the caller no longer owns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchHandle {
    pub pid: u32,
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl BrowserLauncher {
    /// Expand a profile's command template for `url`
    pub fn new(profile: &Profile, url: &str) -> Result<Self> {
        let argv = build_args(&profile.command, url);
        let mut argv = argv.into_iter();
        let program = argv
            .next()
            .filter(|program| !program.trim().is_empty())
            .ok_or_else(|| Error::EmptyCommand(profile.id.clone()))?;

        Ok(Self {
            program,
            args: argv.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Full command line as it would be executed, shell-quoted
    pub fn command_line(&self) -> String {
        let argv = std::iter::once(&self.program).chain(&self.args);
        shlex::try_join(argv.clone().map(String::as_str))
            .unwrap_or_else(|_| argv.cloned().collect::<Vec<_>>().join(" "))
    }

    /// Spawn the browser detached from this process
    ///
    /// Standard streams go to /dev/null and, on unix, the child gets its own
    /// process group so it survives the terminal that started it.
    pub fn launch(&self) -> Result<LaunchHandle> {
        let program = resolve_program(&self.program);

        let mut command = Command::new(&program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        let child = command.spawn().map_err(|source| Error::LaunchFailed {
            program: self.program.clone(),
            source,
        })?;

        let pid = child.id();
        tracing::info!("Launched {} (pid {})", program.display(), pid);

        Ok(LaunchHandle {
            pid,
            program,
            args: self.args.clone(),
        })
    }
}

/// Locate a bare program name on PATH
///
/// Paths are used as given. When the lookup fails the name is passed through
/// unchanged so the spawn reports the OS error.
fn resolve_program(program: &str) -> PathBuf {
    if program.chars().any(std::path::is_separator) {
        return PathBuf::from(program);
    }

    match which::which(program) {
        Ok(path) => {
            tracing::debug!("Resolved {} to {}", program, path.display());
            path
        }
        Err(e) => {
            tracing::debug!("Could not resolve {} on PATH: {}", program, e);
            PathBuf::from(program)
        }
    }
}

/// Substitute the URL into a command template
///
/// Every `%u` inside any token is replaced. Without a placeholder the URL is
/// appended as the last argument.
fn build_args(template: &[String], url: &str) -> Vec<String> {
    let mut substituted = false;
    let mut args: Vec<String> = template
        .iter()
        .map(|token| {
            if token.contains(URL_PLACEHOLDER) {
                substituted = true;
                token.replace(URL_PLACEHOLDER, url)
            } else {
                token.clone()
            }
        })
        .collect();

    if !substituted {
        args.push(url.to_string());
    }

    args
}
