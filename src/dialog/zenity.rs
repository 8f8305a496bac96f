use std::ffi::OsString;
use std::io;
use std::process::{Command, Output, Stdio};
use tracing::{trace, warn};
use zeroize::Zeroize;

use super::Dialog;

/// Dialogs rendered by zenity (or anything with the same command line).
#[derive(Debug, Clone)]
pub struct Zenity {
    program: OsString,
}

impl Zenity {
    pub const TITLE: &'static str = "mounttool";

    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn show(&self, kind: &str, message: &str, extra: &[&str]) -> io::Result<Output> {
        let mut cmd = Command::new(&self.program);
        cmd.arg(kind)
            .arg(format!("--title={}", Self::TITLE))
            .arg(format!("--text={}", escape_markup(message)))
            .args(extra)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());
        trace!(kind, "Showing dialog");
        cmd.output()
    }
}

impl Dialog for Zenity {
    fn error(&self, message: &str) {
        if let Err(e) = self.show("--error", message, &[]) {
            warn!("Could not show error dialog ({e}): {message}");
        }
    }

    fn confirm(&self, message: &str) -> bool {
        match self.show("--question", message, &[]) {
            Ok(output) => output.status.success(),
            Err(e) => {
                warn!("Could not show question dialog: {e}");
                false
            }
        }
    }

    fn password(&self, message: &str) -> Option<String> {
        match self.show("--entry", message, &["--hide-text"]) {
            Ok(mut output) if output.status.success() => {
                let text = entry_text(&output.stdout);
                output.stdout.zeroize();
                Some(text)
            }
            Ok(_) => None,
            Err(e) => {
                warn!("Could not show password dialog: {e}");
                None
            }
        }
    }
}

/// Entry dialogs print the text followed by a single newline.
fn entry_text(stdout: &[u8]) -> String {
    let mut text = String::from_utf8_lossy(stdout).into_owned();
    if text.ends_with('\n') {
        text.pop();
    }
    text
}

/// `--text` is parsed as Pango markup; tool output must show up literally.
fn escape_markup(message: &str) -> String {
    let mut out = String::with_capacity(message.len());
    for c in message.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    fn fake_zenity(dir: &Path, body: &str) -> Zenity {
        let path = dir.join("zenity");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        Zenity::new(path)
    }

    #[test]
    fn markup_is_escaped() {
        assert_eq!(
            escape_markup("fusermount: <busy> & stuck"),
            "fusermount: &lt;busy&gt; &amp; stuck"
        );
    }

    #[test]
    fn entry_keeps_inner_whitespace() {
        assert_eq!(entry_text(b" pass word \n"), " pass word ");
        assert_eq!(entry_text(b""), "");
    }

    #[test]
    fn question_follows_exit_status() {
        let dir = tempfile::tempdir().unwrap();
        let yes = fake_zenity(dir.path(), "[ \"$1\" = --question ]");
        assert!(yes.confirm("Unmount?"));
        let dir = tempfile::tempdir().unwrap();
        let no = fake_zenity(dir.path(), "exit 1");
        assert!(!no.confirm("Unmount?"));
    }

    #[test]
    fn entry_returns_typed_text_or_cancel() {
        let dir = tempfile::tempdir().unwrap();
        let ok = fake_zenity(
            dir.path(),
            "for a in \"$@\"; do [ \"$a\" = --hide-text ] && { echo secret; exit 0; }; done; exit 5",
        );
        assert_eq!(ok.password("Password").as_deref(), Some("secret"));
        let dir = tempfile::tempdir().unwrap();
        let cancel = fake_zenity(dir.path(), "exit 1");
        assert_eq!(cancel.password("Password"), None);
    }

    #[test]
    fn missing_program_declines() {
        let zenity = Zenity::new("/nonexistent/zenity");
        assert!(!zenity.confirm("Unmount?"));
        assert_eq!(zenity.password("Password"), None);
        zenity.error("shown nowhere");
    }
}
