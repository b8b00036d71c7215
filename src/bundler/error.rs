//! Bundler failures.

use thiserror::Error;

/// Why a single bundle could not be built
#[derive(Error, Debug)]
pub enum BundleError {
    /// Bundler program could not be located
    #[error("bundler program `{program}` not found: {source}")]
    ProgramNotFound {
        /// Program name from the release config
        program: String,
        /// Lookup error
        #[source]
        source: which::Error,
    },

    /// Bundler process could not be started or talked to
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        /// Full command line
        command: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Bundler exited unsuccessfully
    #[error("`{command}` exited with {}{}", exit_code_text(.code), stderr_suffix(.stderr))]
    Failed {
        /// Full command line
        command: String,
        /// Exit code, if the process was not killed by a signal
        code: Option<i32>,
        /// Captured standard error
        stderr: String,
    },

    /// Bundler did not finish in time
    #[error("`{command}` timed out after {secs}s")]
    TimedOut {
        /// Full command line
        command: String,
        /// Timeout that elapsed
        secs: u64,
    },

    /// Preparing the output location failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn exit_code_text(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim_end();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("\n{trimmed}")
    }
}
