//! Release build driver library
//!
//! Drives a project's release build:
//! - cleans the distribution directory
//! - builds every configured bundle, one at a time, with a progress line each
//! - writes the publishable `package.json` and copies the readme
//! - refreshes the example block of the issue template
//!
//! It can be used both as a CLI tool and as a library dependency, with a
//! custom [`bundler::Bundler`] or [`issue_template::MarkdownFormatter`].

pub mod bundler;
pub mod cli;
pub mod config;
pub mod error;
pub mod issue_template;
pub mod manifest;
pub mod release;
pub mod utils;

// Re-export commonly used types
pub use error::{BuildError, CliError, Result};
