//! CLI error type and exit code mapping.

use covenant_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid manifest: {0}")]
    Json(#[from] serde_json::Error),

    #[error("class '{name}' is not declared in the manifest")]
    UnknownClass { name: String },

    #[error("contract '{name}' is not declared in the manifest")]
    UnknownContract { name: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl CliError {
    /// 2 = manifest semantic error, 3 = I/O or parse error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Io { .. } | CliError::Json(_) => 3,
            CliError::UnknownClass { .. }
            | CliError::UnknownContract { .. }
            | CliError::Core(_) => 2,
        }
    }
}
