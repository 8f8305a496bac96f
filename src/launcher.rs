use std::path::Path;
use tracing::debug;

pub trait Launcher {
    /// Open `dir` in the file browser without waiting for it.
    fn open_dir(&self, dir: &Path);
}

/// The desktop's default handler for directories (`xdg-open` on Linux).
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopLauncher;

impl Launcher for DesktopLauncher {
    fn open_dir(&self, dir: &Path) {
        debug!(?dir, "Opening file browser");
        if let Err(e) = open::that_detached(dir) {
            debug!("Failed to open {}: {e}", dir.display());
        }
    }
}
