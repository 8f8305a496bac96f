use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ToggleError {
    #[error("{0}")]
    Usage(String),
    #[error("The encryption tool {tool:?} was not found in PATH")]
    ToolMissing { tool: String },
    #[error("{path:?} is not a valid encrypted directory: {output}")]
    FormatInvalid { path: PathBuf, output: String },
    #[error("Failed to unmount {target:?}: {output}")]
    UnmountFailure { target: PathBuf, output: String },
}

impl ToggleError {
    /// Process exit status for this error. Every failure maps to 1,
    /// completed operations (including cancellations) exit 0.
    pub fn exit_code(&self) -> i32 {
        match self {
            ToggleError::Usage(_)
            | ToggleError::ToolMissing { .. }
            | ToggleError::FormatInvalid { .. }
            | ToggleError::UnmountFailure { .. } => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, ToggleError>;
