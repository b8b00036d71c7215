//! Error types for release build operations.
//!
//! Every failure aborts the run; nothing here is retried. The only state an
//! error carries beyond its cause is whether it has already been printed.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for release build operations
pub type Result<T> = std::result::Result<T, BuildError>;

/// Main error type for all release build operations
#[derive(Error, Debug)]
pub enum BuildError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors without a known path
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// IO errors tied to a file or directory
    #[error("Failed {action} {}: {source}", .path.display())]
    Fs {
        /// What was being done (e.g. "reading")
        action: &'static str,
        /// Path involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization errors
    #[error("JSON error in {}: {source}", .path.display())]
    Json {
        /// File being parsed or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// TOML parsing errors
    #[error("TOML error in {}: {source}", .path.display())]
    Toml {
        /// Config file being parsed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: toml::de::Error,
    },

    /// Required manifest field is absent
    #[error("{} has no `{field}` field", .path.display())]
    MissingField {
        /// Manifest path
        path: PathBuf,
        /// Field name
        field: &'static str,
    },

    /// Release configuration is inconsistent
    #[error("Invalid release config: {reason}")]
    Config {
        /// Reason for the error
        reason: String,
    },

    /// Bundler errors
    #[error("Bundle {} failed: {source}", .output.display())]
    Bundle {
        /// Output path of the failing bundle
        output: PathBuf,
        /// Underlying bundler error
        #[source]
        source: crate::bundler::BundleError,
    },

    /// An error that has already been printed to stderr
    #[error("{0}")]
    Reported(Box<BuildError>),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}

impl BuildError {
    /// Build a path-aware IO error.
    pub fn fs(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Fs {
            action,
            path: path.into(),
            source,
        }
    }

    /// Mark this error as printed.
    ///
    /// Wrapping happens at most once: an already reported error is returned as is.
    pub fn into_reported(self) -> Self {
        match self {
            Self::Reported(_) => self,
            other => Self::Reported(Box::new(other)),
        }
    }

    /// Whether this error was already printed and must not be printed again.
    pub fn is_reported(&self) -> bool {
        matches!(self, Self::Reported(_))
    }
}

/// Attaches path context to `std::io::Result` values.
pub trait IoResultExt<T> {
    /// Convert the error into [`BuildError::Fs`] naming the action and path.
    fn fs_context(self, action: &'static str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn fs_context(self, action: &'static str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| BuildError::fs(action, path, e))
    }
}
