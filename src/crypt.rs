//! Wrapper around the external encryption tool and unmount facility.

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tracing::{debug, trace};
use zeroize::Zeroizing;

use crate::config::Tools;

/// Exit status and combined stdout/stderr of an external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub text: String,
}

impl ToolOutput {
    pub fn ok() -> Self {
        Self {
            success: true,
            code: Some(0),
            text: String::new(),
        }
    }

    pub fn failed(code: i32, text: impl Into<String>) -> Self {
        Self {
            success: false,
            code: Some(code),
            text: text.into(),
        }
    }
}

impl From<Output> for ToolOutput {
    fn from(output: Output) -> Self {
        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        text.truncate(text.trim_end().len());
        Self {
            success: output.status.success(),
            code: output.status.code(),
            text,
        }
    }
}

pub trait CryptTool {
    /// Program name, for messages.
    fn name(&self) -> String;
    /// Resolve the encryption tool on `PATH`.
    fn locate(&self) -> Option<PathBuf>;
    /// Check that `source` holds an encrypted filesystem.
    fn info(&self, source: &Path) -> io::Result<ToolOutput>;
    /// Mount `source` on `target`. The password never reaches the
    /// argument list.
    fn mount(
        &self,
        source: &Path,
        target: &Path,
        password: &str,
        idle_minutes: Option<u32>,
    ) -> io::Result<ToolOutput>;
    fn unmount(&self, target: &Path) -> io::Result<ToolOutput>;
}

/// gocryptfs for mounting, fusermount for unmounting.
#[derive(Debug, Clone)]
pub struct Gocryptfs {
    crypt: OsString,
    unmount: OsString,
}

impl Gocryptfs {
    pub fn new(tools: &Tools) -> Self {
        Self {
            crypt: tools.crypt.clone(),
            unmount: tools.unmount.clone(),
        }
    }

    fn mount_args(source: &Path, target: &Path, idle_minutes: Option<u32>) -> Vec<OsString> {
        let mut args = Vec::new();
        if let Some(minutes) = idle_minutes {
            args.push(OsString::from("-idle"));
            args.push(OsString::from(format!("{minutes}m")));
        }
        args.push(OsString::from("--"));
        args.push(source.into());
        args.push(target.into());
        args
    }
}

impl CryptTool for Gocryptfs {
    fn name(&self) -> String {
        self.crypt.to_string_lossy().into_owned()
    }

    fn locate(&self) -> Option<PathBuf> {
        which::which(&self.crypt).ok()
    }

    fn info(&self, source: &Path) -> io::Result<ToolOutput> {
        let mut cmd = Command::new(&self.crypt);
        cmd.arg("-info").arg(source);
        run(cmd, None)
    }

    fn mount(
        &self,
        source: &Path,
        target: &Path,
        password: &str,
        idle_minutes: Option<u32>,
    ) -> io::Result<ToolOutput> {
        let mut cmd = Command::new(&self.crypt);
        cmd.args(Self::mount_args(source, target, idle_minutes));
        let mut secret = Zeroizing::new(Vec::with_capacity(password.len() + 1));
        secret.extend_from_slice(password.as_bytes());
        secret.push(b'\n');
        run(cmd, Some(secret.as_slice()))
    }

    fn unmount(&self, target: &Path) -> io::Result<ToolOutput> {
        let mut cmd = Command::new(&self.unmount);
        cmd.arg("-u").arg(target);
        run(cmd, None)
    }
}

/// Run `cmd` to completion, feeding `input` to its stdin when given.
fn run(mut cmd: Command, input: Option<&[u8]>) -> io::Result<ToolOutput> {
    debug!(?cmd, "Running external command");
    cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
    cmd.stdin(if input.is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    });
    let mut child = cmd.spawn()?;
    if let Some(input) = input {
        // Dropping the handle closes the pipe so the child sees EOF.
        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(input) {
                // The child may exit without reading, its output says why.
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {}
                other => other?,
            }
        }
    }
    let output: ToolOutput = child.wait_with_output()?.into();
    trace!(success = output.success, code = ?output.code, "External command finished");
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn script(dir: &Path, name: &str, body: &str) -> OsString {
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.into_os_string()
    }

    #[test]
    fn mount_args_carry_idle_and_paths_only() {
        let args = Gocryptfs::mount_args(Path::new("/c"), Path::new("/p"), Some(15));
        assert_eq!(args, vec!["-idle", "15m", "--", "/c", "/p"]);
        let args = Gocryptfs::mount_args(Path::new("/c"), Path::new("/p"), None);
        assert_eq!(args, vec!["--", "/c", "/p"]);
    }

    #[test]
    fn output_is_combined_and_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let tools = Tools {
            crypt: script(dir.path(), "crypt", "echo out; echo err >&2; exit 3"),
            ..Tools::default()
        };
        let out = Gocryptfs::new(&tools).info(Path::new("/nowhere")).unwrap();
        assert!(!out.success);
        assert_eq!(out.code, Some(3));
        assert_eq!(out.text, "out\nerr");
    }

    #[test]
    fn password_goes_through_stdin() {
        let dir = tempfile::tempdir().unwrap();
        let tools = Tools {
            crypt: script(
                dir.path(),
                "crypt",
                "read pw; [ \"$pw\" = hunter2 ] || { echo \"Password incorrect.\"; exit 12; }\n\
                 for a in \"$@\"; do [ \"$a\" = hunter2 ] && exit 99; done\nexit 0",
            ),
            ..Tools::default()
        };
        let tool = Gocryptfs::new(&tools);
        let good = tool
            .mount(Path::new("/c"), Path::new("/p"), "hunter2", Some(1))
            .unwrap();
        assert!(good.success);
        let bad = tool
            .mount(Path::new("/c"), Path::new("/p"), "wrong", None)
            .unwrap();
        assert_eq!(bad.code, Some(12));
        assert_eq!(bad.text, "Password incorrect.");
    }

    #[test]
    fn unmount_passes_dash_u() {
        let dir = tempfile::tempdir().unwrap();
        let tools = Tools {
            unmount: script(dir.path(), "unmount", "[ \"$1\" = -u ] && [ \"$2\" = /p ]"),
            ..Tools::default()
        };
        assert!(Gocryptfs::new(&tools).unmount(Path::new("/p")).unwrap().success);
    }

    #[test]
    fn missing_tool_is_not_located() {
        let tools = Tools {
            crypt: "definitely-not-an-installed-crypt-tool".into(),
            ..Tools::default()
        };
        assert!(Gocryptfs::new(&tools).locate().is_none());
    }
}
