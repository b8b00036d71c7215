//! Command line interface for the release build.
//!
//! Parses arguments, loads `release.toml`, wires the external bundler into a
//! [`Release`](crate::release::Release) and runs it.

mod args;
mod output;

pub use args::{Args, RuntimeConfig};
pub use output::{
    DEFAULT_COLUMNS, DONE_TAG, FAIL_TAG, OutputManager, fill_width, fit_terminal,
    terminal_columns,
};

use crate::bundler::CommandBundler;
use crate::config::ReleaseConfig;
use crate::error::{BuildError, CliError, Result};
use crate::issue_template::PlaygroundMarkdown;
use crate::release::Release;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    let runtime_config = RuntimeConfig::try_from(&args)?;
    execute(&runtime_config).await
}

/// Run a release with already parsed arguments.
pub async fn execute(runtime_config: &RuntimeConfig) -> Result<i32> {
    let mut config = ReleaseConfig::load(runtime_config.config_path()).await?;
    if let Some(dist_dir) = runtime_config.dist_dir() {
        config = config.with_dist_dir(dist_dir.to_path_buf())?;
    }

    // Guaranteed non-empty by ReleaseConfig::validate
    let Some((program, rest)) = config.bundler.command.split_first() else {
        return Err(BuildError::Config {
            reason: "bundler.command must name a program".to_string(),
        });
    };
    let bundler = CommandBundler::new(
        program.clone(),
        rest.to_vec(),
        runtime_config.root().to_path_buf(),
    )
        .with_timeout(config.bundler.timeout());

    let release = Release::new(
        runtime_config.root().to_path_buf(),
        config,
        bundler,
        PlaygroundMarkdown,
        runtime_config.output().clone(),
    );
    let summary = release.run().await?;

    log::info!(
        "Release ready in {} ({} bundle(s), issue template {})",
        release.dist_dir().display(),
        summary.bundles.len(),
        if summary.template_changed {
            "updated"
        } else {
            "unchanged"
        }
    );
    Ok(0)
}
