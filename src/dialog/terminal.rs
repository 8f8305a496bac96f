//! Text fallback for sessions without a graphical dialog utility.

use libc::{tcsetattr, STDIN_FILENO, TCSAFLUSH};
use std::io::{self, BufRead, Write};
use std::mem::MaybeUninit;
use tracing::warn;

use super::Dialog;

#[derive(Debug, Clone, Copy, Default)]
pub struct Terminal;

impl Terminal {
    fn prompt(message: &str) -> io::Result<()> {
        let mut stderr = io::stderr().lock();
        write!(stderr, "{message} ")?;
        stderr.flush()
    }

    /// Read one line from stdin, `None` on EOF.
    fn read_line() -> io::Result<Option<String>> {
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(trim_newline(line)))
    }

    /// Read one line with echo disabled when stdin is a terminal.
    fn getpass() -> io::Result<Option<String>> {
        let isatty = unsafe { libc::isatty(STDIN_FILENO) == 1 };
        if !isatty {
            return Self::read_line();
        }
        let mut old = MaybeUninit::<libc::termios>::uninit();
        if unsafe { libc::tcgetattr(STDIN_FILENO, old.as_mut_ptr()) } != 0 {
            return Err(io::Error::last_os_error());
        }
        let old = unsafe { old.assume_init() };
        let mut new = old;
        new.c_lflag &= !libc::ECHO;
        unsafe { tcsetattr(STDIN_FILENO, TCSAFLUSH, &new) };
        let line = Self::read_line();
        unsafe { tcsetattr(STDIN_FILENO, TCSAFLUSH, &old) };
        eprintln!();
        line
    }
}

impl Dialog for Terminal {
    fn error(&self, message: &str) {
        eprintln!("error: {message}");
    }

    fn confirm(&self, message: &str) -> bool {
        let answer = Self::prompt(&format!("{message} [y/N]")).and_then(|_| Self::read_line());
        match answer {
            Ok(Some(answer)) => is_yes(&answer),
            Ok(None) => false,
            Err(e) => {
                warn!("Could not read answer: {e}");
                false
            }
        }
    }

    fn password(&self, message: &str) -> Option<String> {
        match Self::prompt(message).and_then(|_| Self::getpass()) {
            Ok(password) => password,
            Err(e) => {
                warn!("Could not read password: {e}");
                None
            }
        }
    }
}

fn trim_newline(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[test]
fn test_is_yes() {
    assert!(is_yes("y"));
    assert!(is_yes(" YES "));
    assert!(!is_yes(""));
    assert!(!is_yes("n"));
    assert!(!is_yes("yep"));
}

#[test]
fn test_trim_newline() {
    assert_eq!(trim_newline("secret\n".into()), "secret");
    assert_eq!(trim_newline("secret\r\n".into()), "secret");
    assert_eq!(trim_newline("no newline".into()), "no newline");
    assert_eq!(trim_newline("\n".into()), "");
}
