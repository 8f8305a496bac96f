pub mod cli;
pub mod config;
pub mod crypt;
pub mod dialog;
pub mod error;
pub mod invocation;
pub mod launcher;
pub mod mounts;
pub mod toggler;

pub use error::{Result, ToggleError};
pub use invocation::Invocation;
pub use toggler::{MountToggler, Outcome};

use config::Tools;
use crypt::Gocryptfs;
use launcher::DesktopLauncher;
use mounts::ProcMounts;

/// Run one toggle against the real system: gocryptfs, the kernel mount
/// table, the desktop's dialogs and file browser.
pub fn toggle(inv: &Invocation, tools: &Tools) -> Result<Outcome> {
    let crypt = Gocryptfs::new(tools);
    let dialog = dialog::select(tools);
    MountToggler::new(&crypt, &ProcMounts, dialog.as_ref(), &DesktopLauncher).run(inv)
}
