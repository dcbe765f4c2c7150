//! Opening websites, tracks and desktop apps

use crate::{Error, Result};

/// Opens a URL or application handle
pub trait Launcher {
    /// Open `target` with the platform handler
    ///
    /// # Errors
    ///
    /// Returns error if the platform refuses to open it
    fn open(&mut self, target: &str) -> Result<()>;
}

/// Delegates to the OS default handler (browser, shell)
#[derive(Debug, Default)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn open(&mut self, target: &str) -> Result<()> {
        tracing::debug!(target, "opening");
        open::that_detached(target).map_err(|e| Error::Launch(format!("{target}: {e}")))
    }
}
