//! Names of the external programs the toggler drives.

use std::ffi::OsString;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tools {
    /// Encryption tool, must understand `-info`, `-idle` and read the
    /// password from stdin.
    pub crypt: OsString,
    /// Unmount facility, invoked as `<unmount> -u <target>`.
    pub unmount: OsString,
    /// Dialog utility with zenity's command line. `terminal` forces the
    /// text fallback.
    pub dialog: OsString,
}

impl Tools {
    pub const DEFAULT_CRYPT: &'static str = "gocryptfs";
    pub const DEFAULT_UNMOUNT: &'static str = "fusermount";
    pub const DEFAULT_DIALOG: &'static str = "zenity";
    pub const TERMINAL_DIALOG: &'static str = "terminal";

    pub const CRYPT_ENV: &'static str = "MOUNTTOOL_CRYPT";
    pub const UNMOUNT_ENV: &'static str = "MOUNTTOOL_UNMOUNT";
    pub const DIALOG_ENV: &'static str = "MOUNTTOOL_DIALOG";

    pub fn uses_terminal_dialog(&self) -> bool {
        self.dialog == Self::TERMINAL_DIALOG
    }
}

impl Default for Tools {
    fn default() -> Self {
        Self {
            crypt: Self::DEFAULT_CRYPT.into(),
            unmount: Self::DEFAULT_UNMOUNT.into(),
            dialog: Self::DEFAULT_DIALOG.into(),
        }
    }
}
