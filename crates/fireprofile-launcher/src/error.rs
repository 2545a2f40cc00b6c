use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to launch '{program}': {source}")]
    LaunchFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Profile '{0}' has no command to launch")]
    EmptyCommand(String),
}

pub type Result<T> = std::result::Result<T, Error>;
