//! Release orchestration: clean, bundle, finalize.
//!
//! The three phases run strictly in order and the bundles strictly one after
//! another. Bundles share the distribution directory and may share bundler
//! caches, so the next one starts only after the previous has finished.

use crate::bundler::{BundleConfig, Bundler};
use crate::cli::OutputManager;
use crate::config::ReleaseConfig;
use crate::error::{BuildError, Result};
use crate::issue_template::{self, MarkdownFormatter};
use crate::manifest::{self, DistManifest};
use crate::utils::fs;
use std::path::{Path, PathBuf};

/// What a successful run produced
#[derive(Debug, Clone)]
pub struct ReleaseSummary {
    /// Artifact paths, in build order
    pub bundles: Vec<PathBuf>,
    /// Manifest written to the distribution directory
    pub manifest: DistManifest,
    /// Whether the issue template content changed
    pub template_changed: bool,
}

/// One release build of a project.
#[derive(Debug)]
pub struct Release<B, F> {
    root: PathBuf,
    config: ReleaseConfig,
    bundler: B,
    formatter: F,
    output: OutputManager,
}

impl<B: Bundler, F: MarkdownFormatter> Release<B, F> {
    /// Creates a release for the project at `root`.
    pub fn new(
        root: PathBuf,
        config: ReleaseConfig,
        bundler: B,
        formatter: F,
        output: OutputManager,
    ) -> Self {
        Self {
            root,
            config,
            bundler,
            formatter,
            output,
        }
    }

    /// Absolute-or-root-relative distribution directory.
    pub fn dist_dir(&self) -> PathBuf {
        self.root.join(&self.config.dist_dir)
    }

    /// Runs every phase. The first failure stops the run.
    pub async fn run(&self) -> Result<ReleaseSummary> {
        self.clean().await?;

        self.output.section("Building packages")?;
        let mut bundles = Vec::with_capacity(self.config.bundles.len());
        for bundle in &self.config.bundles {
            bundles.push(self.create_bundle(bundle).await?);
        }
        log::info!("Built {} bundle(s)", bundles.len());

        let manifest = self.prepare_package().await?;
        let template_changed = self.update_issue_template().await?;

        Ok(ReleaseSummary {
            bundles,
            manifest,
            template_changed,
        })
    }

    /// Removes the distribution directory; a missing one is fine.
    pub async fn clean(&self) -> Result<()> {
        let dist_dir = self.dist_dir();
        log::debug!("Removing {}", dist_dir.display());
        fs::remove_dir_all(&dist_dir).await
    }

    /// Builds one bundle with a progress line.
    ///
    /// On failure the line ends in FAIL, the error is printed, and it is
    /// returned already marked as reported.
    pub async fn create_bundle(&self, bundle: &BundleConfig) -> Result<PathBuf> {
        let target = self.dist_dir().join(&bundle.output);
        self.output.label(&bundle.label())?;

        match self.bundler.bundle(bundle, &target).await {
            Ok(()) => {
                self.output.done()?;
                Ok(target)
            }
            Err(source) => {
                let err = BuildError::Bundle {
                    output: bundle.output.clone(),
                    source,
                };
                self.report(&err);
                Err(err.into_reported())
            }
        }
    }

    /// Writes the publishable manifest and readme.
    pub async fn prepare_package(&self) -> Result<DistManifest> {
        manifest::finalize_package(&self.root, &self.dist_dir(), &self.config.package).await
    }

    /// Refreshes the issue template from the manifest on disk.
    pub async fn update_issue_template(&self) -> Result<bool> {
        issue_template::update_issue_template(
            &self.root,
            &self.config.package.manifest,
            &self.config.issue_template,
            &self.formatter,
        )
        .await
    }

    /// Project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn report(&self, err: &BuildError) {
        // The bundle error matters more than a broken stdout
        if let Err(e) = self.output.fail() {
            log::warn!("Failed to write FAIL tag: {}", e);
        }
        if let Err(e) = self.output.error(err) {
            log::warn!("Failed to print bundle error: {}", e);
        }
    }
}
