//! CLI-specific error types and exit code mapping

use apiscan_core::error::{ApiScanError, ScanError};
use apiscan_scanner::ApiScannerError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to standard Unix exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// The batch could not start (output directory setup failed).
    #[error("scan aborted: {0}")]
    Aborted(String),

    /// Some artifacts were skipped and `--fail-on-skip` was given.
    #[error("{0} artifact(s) skipped")]
    Skipped(usize),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from apiscan-core.
    #[error("{0}")]
    Core(#[from] ApiScanError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                                  |
    /// |------|------------------------------------------|
    /// | 0    | Success                                  |
    /// | 1    | General / command error                  |
    /// | 2    | Configuration error                      |
    /// | 3    | Batch aborted (output directory error)   |
    /// | 4    | Artifacts skipped with `--fail-on-skip`  |
    /// | 10   | IO error                                 |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Core(ApiScanError::Config(_)) => 2,
            Self::Aborted(_) | Self::Core(ApiScanError::Scan(ScanError::Directory(_))) => 3,
            Self::Skipped(_) => 4,
            Self::Io(_) | Self::Core(ApiScanError::Io(_)) => 10,
            Self::JsonSerialize(_) | Self::Command(_) | Self::Core(_) => 1,
        }
    }
}

impl From<ApiScannerError> for CliError {
    fn from(e: ApiScannerError) -> Self {
        match e {
            ApiScannerError::Config { .. } => Self::Config(e.to_string()),
            ApiScannerError::Directory { .. } => Self::Aborted(e.to_string()),
            other => Self::Command(other.to_string()),
        }
    }
}
