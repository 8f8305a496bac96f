//! Mount table lookups. The kernel's table is the only source of truth,
//! so every query reads it again.

use std::ffi::OsStr;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use tracing::trace;

pub trait MountTable {
    /// Whether `path` is currently the mount point of some filesystem.
    fn is_mount_point(&self, path: &Path) -> io::Result<bool>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProcMounts;

impl ProcMounts {
    pub const MOUNTS_FILE: &'static str = "/proc/self/mounts";
}

impl MountTable for ProcMounts {
    fn is_mount_point(&self, path: &Path) -> io::Result<bool> {
        // Mount points are arbitrary bytes, the table need not be UTF-8.
        let table = std::fs::read(Self::MOUNTS_FILE)?;
        let found = mount_points(&table).any(|mnt| mnt == path);
        trace!(?path, found, "Queried mount table");
        Ok(found)
    }
}

/// Mount point column of a `/proc/mounts` style table.
fn mount_points(table: &[u8]) -> impl Iterator<Item = PathBuf> + '_ {
    table
        .split(|&b| b == b'\n')
        .filter_map(|line| {
            line.split(|b| b.is_ascii_whitespace())
                .filter(|field| !field.is_empty())
                .nth(1)
        })
        .map(|field| PathBuf::from(OsStr::from_bytes(&unescape(field))))
}

/// Undo the octal escaping the kernel applies to space, tab, newline and
/// backslash in mount table fields.
fn unescape(field: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(field.len());
    let mut i = 0;
    while i < field.len() {
        if field[i] == b'\\' && i + 3 < field.len() && is_octal_escape(&field[i + 1..i + 4]) {
            let value = field[i + 1..i + 4]
                .iter()
                .fold(0u8, |acc, d| acc.wrapping_mul(8).wrapping_add(d - b'0'));
            out.push(value);
            i += 4;
        } else {
            out.push(field[i]);
            i += 1;
        }
    }
    out
}

fn is_octal_escape(digits: &[u8]) -> bool {
    digits.len() == 3 && digits[0] <= b'3' && digits.iter().all(|d| (b'0'..=b'7').contains(d))
}
