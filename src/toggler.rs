//! The mount/unmount decision tree.
//!
//! A run re-reads the mount table, then either offers to unmount the target
//! or validates the source and keeps asking for a password until the mount
//! succeeds or the user gives up.

use std::path::Path;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::crypt::{CryptTool, ToolOutput};
use crate::dialog::Dialog;
use crate::error::{Result, ToggleError};
use crate::invocation::Invocation;
use crate::launcher::Launcher;
use crate::mounts::MountTable;

/// How a run that did not fail ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The target was mounted and has been unmounted.
    Unmounted,
    /// The target was mounted and the user chose to keep it.
    LeftMounted,
    Mounted { attempts: u32 },
    /// The user closed the password prompt.
    Cancelled { attempts: u32 },
}

enum Attempt {
    Prompting,
    /// The password is wiped once the attempt is over.
    Mounting(Zeroizing<String>),
    Mounted,
    Cancelled,
}

pub struct MountToggler<'a> {
    crypt: &'a dyn CryptTool,
    mounts: &'a dyn MountTable,
    dialog: &'a dyn Dialog,
    launcher: &'a dyn Launcher,
}

impl<'a> MountToggler<'a> {
    pub fn new(
        crypt: &'a dyn CryptTool,
        mounts: &'a dyn MountTable,
        dialog: &'a dyn Dialog,
        launcher: &'a dyn Launcher,
    ) -> Self {
        Self {
            crypt,
            mounts,
            dialog,
            launcher,
        }
    }

    pub fn run(&self, inv: &Invocation) -> Result<Outcome> {
        let Some(tool) = self.crypt.locate() else {
            let tool = self.crypt.name();
            self.dialog.error(&format!(
                "{tool} was not found in PATH.\nPlease install it first."
            ));
            return Err(ToggleError::ToolMissing { tool });
        };
        debug!(?tool, "Found encryption tool");

        if self.is_mounted(&inv.target_path) {
            self.unmount_flow(inv)
        } else {
            self.mount_flow(inv)
        }
    }

    fn is_mounted(&self, target: &Path) -> bool {
        match self.mounts.is_mount_point(target) {
            Ok(mounted) => mounted,
            Err(e) => {
                warn!("Could not read the mount table, assuming {target:?} is not mounted: {e}");
                false
            }
        }
    }

    fn unmount_flow(&self, inv: &Invocation) -> Result<Outcome> {
        let target = &inv.target_path;
        let question = format!("{} is already mounted.\nUnmount it?", target.display());
        if !self.dialog.confirm(&question) {
            info!(?target, "Unmount declined");
            return Ok(Outcome::LeftMounted);
        }
        let output = self
            .crypt
            .unmount(target)
            .unwrap_or_else(|e| ToolOutput::failed(-1, e.to_string()));
        if !output.success {
            let text = describe(&output);
            self.dialog
                .error(&format!("Unmounting {} failed:\n\n{text}", target.display()));
            return Err(ToggleError::UnmountFailure {
                target: target.clone(),
                output: text,
            });
        }
        info!(?target, "Unmounted");
        remove_if_empty(target);
        Ok(Outcome::Unmounted)
    }

    fn mount_flow(&self, inv: &Invocation) -> Result<Outcome> {
        let source = &inv.source_path;
        let target = &inv.target_path;

        let check = self
            .crypt
            .info(source)
            .unwrap_or_else(|e| ToolOutput::failed(-1, e.to_string()));
        if !check.success {
            let text = describe(&check);
            let tool = self.crypt.name();
            self.dialog.error(&format!(
                "{} does not exist or is not a valid {tool} directory.\n\n\
                 To create a new encrypted directory there, run:\n    \
                 mkdir -p {0}\n    {tool} -init {0}\n\n{text}",
                source.display()
            ));
            return Err(ToggleError::FormatInvalid {
                path: source.clone(),
                output: text,
            });
        }

        if let Err(e) = std::fs::create_dir_all(target) {
            debug!(?target, "Could not create mount point: {e}");
        }

        let prompt = format!(
            "Password for {}\nto be mounted on {}:",
            source.display(),
            target.display()
        );
        let mut attempts = 0;
        let mut state = Attempt::Prompting;
        loop {
            state = match state {
                Attempt::Prompting => match self.dialog.password(&prompt) {
                    Some(password) => Attempt::Mounting(Zeroizing::new(password)),
                    None => Attempt::Cancelled,
                },
                Attempt::Mounting(password) => {
                    attempts += 1;
                    self.try_mount(inv, &password)
                }
                Attempt::Mounted => {
                    info!(?target, attempts, "Mounted");
                    if inv.open_after_mount {
                        self.launcher.open_dir(target);
                    }
                    return Ok(Outcome::Mounted { attempts });
                }
                Attempt::Cancelled => {
                    info!(attempts, "Password entry cancelled");
                    remove_if_empty(target);
                    return Ok(Outcome::Cancelled { attempts });
                }
            };
        }
    }

    fn try_mount(&self, inv: &Invocation, password: &str) -> Attempt {
        let output = self
            .crypt
            .mount(
                &inv.source_path,
                &inv.target_path,
                password,
                inv.idle_minutes,
            )
            .unwrap_or_else(|e| ToolOutput::failed(-1, e.to_string()));
        if output.success {
            Attempt::Mounted
        } else {
            debug!(code = ?output.code, "Mount attempt failed");
            self.dialog
                .error(&format!("Mounting failed:\n\n{}", describe(&output)));
            Attempt::Prompting
        }
    }
}

/// The tool's own output, or its exit status when it printed nothing.
fn describe(output: &ToolOutput) -> String {
    if !output.text.is_empty() {
        return output.text.clone();
    }
    match output.code {
        Some(code) => format!("exited with status {code}"),
        None => "terminated by a signal".to_string(),
    }
}

/// Remove `dir` when it is an empty directory. Anything else is left alone.
fn remove_if_empty(dir: &Path) {
    if let Err(e) = std::fs::remove_dir(dir) {
        debug!(?dir, "Left mount point in place: {e}");
    }
}
