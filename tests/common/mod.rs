//! Shared fixtures for release integration tests

#![allow(dead_code)]

use dist_release::bundler::{BundleConfig, BundleError, Bundler};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const TEMPLATE: &str = "<!--\n  BEFORE SUBMITTING AN ISSUE:\n  try the playground first.\n-->\n\nstale example for 0.0.1\n";

/// Lays out a minimal project: package.json, README.md and the issue template.
pub fn project(version: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    std::fs::write(
        root.join("package.json"),
        format!(
            r#"{{
  "name": "prettier",
  "version": "{version}",
  "bin": {{ "prettier": "./bin/prettier.js" }},
  "engines": {{ "node": ">=0.10" }},
  "dependencies": {{ "chalk": "2.1.0" }},
  "devDependencies": {{ "jest": "21.1.0" }},
  "scripts": {{ "test": "jest" }},
  "files": ["bin", "src"]
}}
"#
        ),
    )
    .unwrap();
    std::fs::write(root.join("README.md"), "# Prettier\n").unwrap();
    std::fs::create_dir_all(root.join(".github")).unwrap();
    std::fs::write(root.join(".github/ISSUE_TEMPLATE.md"), TEMPLATE).unwrap();
    dir
}

/// Bundler double: writes the descriptor to the output path and records calls.
#[derive(Clone, Default)]
pub struct RecordingBundler {
    events: Arc<Mutex<Vec<String>>>,
    fail_on: Option<PathBuf>,
    delay: Option<Duration>,
}

impl RecordingBundler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(mut self, output: &str) -> Self {
        self.fail_on = Some(PathBuf::from(output));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn record(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl Bundler for RecordingBundler {
    async fn bundle(&self, config: &BundleConfig, output: &Path) -> Result<(), BundleError> {
        let label = config.label();
        self.record(format!("start {label}"));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_on.as_deref() == Some(config.output.as_path()) {
            self.record(format!("fail {label}"));
            return Err(BundleError::Failed {
                command: format!("bundle {label}"),
                code: Some(1),
                stderr: "E: unexpected token".to_string(),
            });
        }

        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(output, serde_json::to_vec(config).unwrap()).await?;
        self.record(format!("end {label}"));
        Ok(())
    }
}
