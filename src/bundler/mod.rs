//! Bundler seam and the bundle descriptors it consumes.
//!
//! The orchestrator only knows the [`Bundler`] trait. [`CommandBundler`] is
//! the production implementation that hands each descriptor to an external
//! build program; tests substitute their own.

mod command;
mod error;

pub use command::{CommandBundler, DEFAULT_BUNDLE_TIMEOUT};
pub use error::BundleError;

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::{Path, PathBuf};

/// One build target: where its artifact goes and what the bundler is told.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleConfig {
    /// Artifact path, relative to the distribution directory
    pub output: PathBuf,

    /// Bundler options, passed through untouched
    #[serde(default)]
    pub options: serde_json::Map<String, serde_json::Value>,
}

impl BundleConfig {
    /// Descriptor with no bundler options.
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
            options: serde_json::Map::new(),
        }
    }

    /// Label shown on the progress line.
    pub fn label(&self) -> String {
        self.output.display().to_string()
    }
}

/// Builds one bundle.
///
/// Implementations must not return before the artifact is fully written:
/// the orchestrator starts the next bundle as soon as this resolves.
pub trait Bundler {
    /// Build `config`, writing the artifact to `output`.
    fn bundle(
        &self,
        config: &BundleConfig,
        output: &Path,
    ) -> impl Future<Output = Result<(), BundleError>> + Send;
}
