use std::path::{Component, Path, PathBuf};

use crate::error::{Result, ToggleError};
use tracing::trace;

/// Everything one run needs to know, fixed once the arguments are parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub source_path: PathBuf,
    pub target_path: PathBuf,
    pub idle_minutes: Option<u32>,
    pub open_after_mount: bool,
}

impl Invocation {
    pub fn new(
        source: impl AsRef<Path>,
        target: impl AsRef<Path>,
        idle_minutes: Option<u32>,
        open_after_mount: bool,
    ) -> Result<Self> {
        let source_path = resolve(source.as_ref())?;
        let target_path = resolve(target.as_ref())?;
        trace!(?source_path, ?target_path, "Resolved invocation paths");
        Ok(Self {
            source_path,
            target_path,
            idle_minutes,
            open_after_mount,
        })
    }
}

/// Absolute form of `path`. Existing paths are canonicalized, anything else
/// is joined onto the working directory and normalised lexically.
fn resolve(path: &Path) -> Result<PathBuf> {
    if path.as_os_str().is_empty() {
        return Err(ToggleError::Usage("empty path argument".into()));
    }
    let resolved = match path.canonicalize() {
        Ok(path) => path,
        Err(_) => {
            let absolute = std::path::absolute(path)
                .map_err(|e| ToggleError::Usage(format!("cannot resolve {path:?}: {e}")))?;
            normalize(&absolute)
        }
    };
    if resolved.as_os_str().is_empty() {
        return Err(ToggleError::Usage(format!("cannot resolve {path:?}")));
    }
    Ok(resolved)
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}
