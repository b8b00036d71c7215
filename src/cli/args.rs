//! Command line argument parsing and validation.

use crate::error::{BuildError, IoResultExt};
use clap::Parser;
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};

/// Release build driver
#[derive(Parser, Debug)]
#[command(
    name = "dist_release",
    version,
    about = "Builds the release bundles and prepares the publishable package",
    long_about = "Builds every bundle listed in release.toml, one at a time, into a freshly
cleaned distribution directory. Then writes the publishable package.json and README.md
next to the bundles and refreshes the example in the issue template.

Usage:
  dist_release
  dist_release --root ../prettier
  dist_release --config release.ci.toml --dist-dir build

Exit code 0 = every bundle built and the package was finalized."
)]
pub struct Args {
    /// Project root containing package.json
    #[arg(short = 'r', long, value_name = "DIR", default_value = ".", env = "DIST_RELEASE_ROOT")]
    pub root: PathBuf,

    /// Release config, relative to the project root
    #[arg(short = 'c', long, value_name = "PATH", default_value = crate::config::DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Override the distribution directory from the config
    #[arg(short = 'd', long, value_name = "DIR")]
    pub dist_dir: Option<PathBuf>,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.config.as_os_str().is_empty() {
            return Err("Config path cannot be empty".to_string());
        }

        if let Some(dist_dir) = &self.dist_dir {
            if dist_dir.as_os_str().is_empty() || dist_dir == Path::new(".") {
                return Err("Distribution directory cannot be the project root".to_string());
            }
        }

        Ok(())
    }

    /// Config path resolved against the project root.
    pub fn config_path(&self) -> PathBuf {
        self.root.join(&self.config)
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    root: PathBuf,
    config_path: PathBuf,
    dist_dir: Option<PathBuf>,
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl TryFrom<&Args> for RuntimeConfig {
    type Error = BuildError;

    /// Anchors the root to the current directory; the bundler runs inside it,
    /// so every path handed to it must be absolute.
    fn try_from(args: &Args) -> Result<Self, Self::Error> {
        let root = args
            .root
            .absolutize()
            .fs_context("resolving", &args.root)?
            .into_owned();
        Ok(Self {
            config_path: root.join(&args.config),
            root,
            dist_dir: args.dist_dir.clone(),
            output: super::OutputManager::new(),
        })
    }
}

impl RuntimeConfig {
    /// Project root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Release config file
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Distribution directory override
    pub fn dist_dir(&self) -> Option<&Path> {
        self.dist_dir.as_deref()
    }

    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }
}
