//! Release configuration from `release.toml`.
//!
//! Holds the ordered bundle list plus the settings for the packaging and
//! issue-template steps. Everything except the bundle list has defaults, so
//! a minimal config is just a few `[[bundle]]` tables.

use crate::bundler::BundleConfig;
use crate::error::{BuildError, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

/// Default config file name, relative to the project root
pub const DEFAULT_CONFIG_FILE: &str = "release.toml";

/// Parsed `release.toml`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReleaseConfig {
    /// Distribution directory, relative to the project root
    #[serde(default = "default_dist_dir")]
    pub dist_dir: PathBuf,

    /// How bundles are built
    #[serde(default)]
    pub bundler: BundlerSettings,

    /// Build targets, in build order
    #[serde(default, rename = "bundle")]
    pub bundles: Vec<BundleConfig>,

    /// Publishable manifest settings
    #[serde(default)]
    pub package: PackageSettings,

    /// Issue template settings
    #[serde(default)]
    pub issue_template: TemplateSettings,
}

/// External bundler program
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BundlerSettings {
    /// Program and leading arguments; the output path is appended
    pub command: Vec<String>,

    /// Per-bundle timeout in seconds
    pub timeout_secs: u64,
}

impl Default for BundlerSettings {
    fn default() -> Self {
        Self {
            command: vec!["node".to_string(), "scripts/build/bundler.js".to_string()],
            timeout_secs: crate::bundler::DEFAULT_BUNDLE_TIMEOUT.as_secs(),
        }
    }
}

impl BundlerSettings {
    /// Timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Values forced into the published `package.json`
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackageSettings {
    /// Source manifest, relative to the project root
    pub manifest: PathBuf,

    /// Readme copied verbatim into the distribution directory
    pub readme: PathBuf,

    /// Executable entry point
    pub bin: String,

    /// `engines.node` constraint
    pub node_engine: String,

    /// The only script kept in the published manifest
    pub prepublish_only: String,

    /// Published file globs
    pub files: Vec<String>,
}

impl Default for PackageSettings {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from("package.json"),
            readme: PathBuf::from("README.md"),
            bin: "./bin-prettier.js".to_string(),
            node_engine: ">=4".to_string(),
            prepublish_only:
                "node -e \"assert.equal(require('.').version, require('..').version)\""
                    .to_string(),
            files: vec!["*.js".to_string()],
        }
    }
}

/// Regenerated example block of the issue template
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplateSettings {
    /// Template file, relative to the project root
    pub path: PathBuf,

    /// Everything after the last occurrence of this marker is regenerated
    pub marker: String,

    /// Placeholder used for both input and output snippets
    pub snippet: String,

    /// Playground link
    pub playground_url: String,

    /// Parser name, decides the code fence syntax
    pub parser: String,

    /// Example CLI flags as `(flag, enabled)` pairs
    pub flags: Vec<(String, bool)>,

    /// Append the "Expected behavior" section
    pub full: bool,
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from(".github/ISSUE_TEMPLATE.md"),
            marker: "-->".to_string(),
            snippet: "// code snippet".to_string(),
            playground_url: "https://prettier.io/playground/#.....".to_string(),
            parser: "babylon".to_string(),
            flags: vec![
                ("# Options (if any):".to_string(), true),
                ("--single-quote".to_string(), true),
            ],
            full: true,
        }
    }
}

fn default_dist_dir() -> PathBuf {
    PathBuf::from("dist")
}

impl ReleaseConfig {
    /// Load and validate the config file at `path`.
    pub async fn load(path: &Path) -> Result<Self> {
        let text = crate::utils::fs::read_to_string(path).await?;
        Self::parse(&text, path)
    }

    /// Parse and validate config text; `path` is only used in error messages.
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|source| BuildError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        log::debug!(
            "Loaded {} with {} bundle(s)",
            path.display(),
            config.bundles.len()
        );
        Ok(config)
    }

    /// Replace the distribution directory (CLI override).
    pub fn with_dist_dir(mut self, dist_dir: PathBuf) -> Result<Self> {
        self.dist_dir = dist_dir;
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if self.dist_dir.as_os_str().is_empty() || !is_nested_relative(&self.dist_dir) {
            return Err(invalid(format!(
                "dist_dir must be a relative path inside the project, got {:?}",
                self.dist_dir
            )));
        }

        if self.bundler.command.first().is_none_or(|p| p.is_empty()) {
            return Err(invalid("bundler.command must name a program".to_string()));
        }

        if self.bundler.timeout_secs == 0 {
            return Err(invalid("bundler.timeout_secs must be positive".to_string()));
        }

        if self.issue_template.marker.is_empty() {
            return Err(invalid("issue_template.marker must not be empty".to_string()));
        }

        let mut seen = HashSet::new();
        for bundle in &self.bundles {
            if !is_nested_relative(&bundle.output) {
                return Err(invalid(format!(
                    "bundle output {:?} must be a relative path inside dist_dir",
                    bundle.output
                )));
            }
            if !seen.insert(&bundle.output) {
                return Err(invalid(format!(
                    "bundle output {:?} is listed twice",
                    bundle.output
                )));
            }
        }

        Ok(())
    }
}

fn invalid(reason: String) -> BuildError {
    BuildError::Config { reason }
}

/// Relative, non-empty, and never climbs out with `..`.
fn is_nested_relative(path: &Path) -> bool {
    let mut normal = 0;
    for component in path.components() {
        match component {
            Component::Normal(_) => normal += 1,
            Component::CurDir => {}
            _ => return false,
        }
    }
    normal > 0
}
