use clap::error::ErrorKind;
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::config::Tools;
use crate::error::Result;
use crate::invocation::Invocation;

pub const USAGE: &str = "mounttool [-i mins] [-o] source_enc_dir target_mount_dir";

/// Mount an encrypted directory, or unmount it when it is already mounted.
#[derive(Parser, Debug)]
#[command(name = "mounttool", version, override_usage = USAGE)]
pub struct Cli {
    /// Unmount automatically after this many idle minutes
    #[arg(short = 'i', value_name = "mins", value_parser = clap::value_parser!(u32).range(1..))]
    pub idle_minutes: Option<u32>,
    /// Do not open the mounted directory in the file browser
    #[arg(short = 'o')]
    pub no_open: bool,
    #[arg(index = 1, value_name = "source_enc_dir")]
    pub source: PathBuf,
    #[arg(index = 2, value_name = "target_mount_dir")]
    pub target: PathBuf,
    /// Encryption tool
    #[arg(long, env = "MOUNTTOOL_CRYPT", default_value = "gocryptfs", hide_short_help = true)]
    pub crypt: OsString,
    /// Unmount helper, called as `<unmount> -u <target>`
    #[arg(long, env = "MOUNTTOOL_UNMOUNT", default_value = "fusermount", hide_short_help = true)]
    pub unmount: OsString,
    /// Dialog utility, or `terminal` for text prompts
    #[arg(long, env = "MOUNTTOOL_DIALOG", default_value = "zenity", hide_short_help = true)]
    pub dialog: OsString,
}

impl Cli {
    pub fn tools(&self) -> Tools {
        Tools {
            crypt: self.crypt.clone(),
            unmount: self.unmount.clone(),
            dialog: self.dialog.clone(),
        }
    }

    pub fn invocation(&self) -> Result<Invocation> {
        Invocation::new(&self.source, &self.target, self.idle_minutes, !self.no_open)
    }
}

/// Help and version requests are answered normally, every other parse
/// failure is a usage error.
pub fn is_usage_error(err: &clap::Error) -> bool {
    !matches!(
        err.kind(),
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
    )
}
