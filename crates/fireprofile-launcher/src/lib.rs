mod error;
mod launcher;

pub use error::{Error, Result};
pub use launcher::{BrowserLauncher, LaunchHandle};
