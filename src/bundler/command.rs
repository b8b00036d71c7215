//! External bundler process execution.

use super::{BundleConfig, BundleError, Bundler};
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Timeout for a single bundle (10 minutes)
/// Minified bundles of large entry points can take several minutes
pub const DEFAULT_BUNDLE_TIMEOUT: Duration = Duration::from_secs(600);

/// Runs an external build program once per bundle.
///
/// The program is started from the project root as
/// `<command...> <absolute output path>` and receives the bundle descriptor
/// as JSON on stdin. Exit status 0 means the artifact was written.
#[derive(Debug, Clone)]
pub struct CommandBundler {
    program: String,
    args: Vec<String>,
    working_dir: PathBuf,
    timeout: Duration,
}

impl CommandBundler {
    /// Creates a command bundler.
    ///
    /// # Arguments
    ///
    /// * `program` - Executable name or path, resolved through `PATH`
    /// * `args` - Arguments placed before the output path
    /// * `working_dir` - Directory the program runs in
    pub fn new(program: String, args: Vec<String>, working_dir: PathBuf) -> Self {
        Self {
            program,
            args,
            working_dir,
            timeout: DEFAULT_BUNDLE_TIMEOUT,
        }
    }

    /// Overrides the per-bundle timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn command_line(&self, output: &Path) -> String {
        let mut parts = Vec::with_capacity(self.args.len() + 2);
        parts.push(self.program.clone());
        parts.extend(self.args.iter().cloned());
        parts.push(output.display().to_string());
        parts.join(" ")
    }

    fn resolve_program(&self) -> Result<PathBuf, BundleError> {
        // Relative paths like ./build.sh are resolved against the working dir, not PATH
        let candidate = Path::new(&self.program);
        if candidate.components().count() > 1 {
            // The child runs inside working_dir, so the path must not depend on our cwd
            let path = self.working_dir.join(candidate);
            return Ok(path.absolutize()?.into_owned());
        }

        which::which(&self.program).map_err(|source| BundleError::ProgramNotFound {
            program: self.program.clone(),
            source,
        })
    }
}

impl Bundler for CommandBundler {
    async fn bundle(&self, config: &BundleConfig, output: &Path) -> Result<(), BundleError> {
        let program = self.resolve_program()?;
        let output = output.absolutize()?.into_owned();
        let command = self.command_line(&output);
        log::debug!("Running bundler: {}", command);

        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let payload = serde_json::to_vec(config).map_err(|e| BundleError::Spawn {
            command: command.clone(),
            source: e.into(),
        })?;

        let mut child = Command::new(&program)
            .args(&self.args)
            .arg(&output)
            .current_dir(&self.working_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| BundleError::Spawn {
                command: command.clone(),
                source,
            })?;

        // Feeding stdin counts against the timeout: a bundler that never reads
        // it would otherwise block the write once the pipe buffer is full
        let stdin = child.stdin.take();
        let run = async move {
            let feed = async move {
                let Some(mut stdin) = stdin else {
                    return Ok(());
                };
                match stdin.write_all(&payload).await {
                    // A bundler that ignores its stdin may exit before reading it
                    Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
                    result => result,
                }
            };
            let (fed, finished) = tokio::join!(feed, child.wait_with_output());
            fed?;
            finished
        };

        let finished = match tokio::time::timeout(self.timeout, run).await {
            Ok(Ok(finished)) => finished,
            Ok(Err(source)) => return Err(BundleError::Spawn { command, source }),
            Err(_elapsed) => {
                // kill_on_drop reaps the child once the future is dropped
                return Err(BundleError::TimedOut {
                    command,
                    secs: self.timeout.as_secs(),
                });
            }
        };

        let stdout = String::from_utf8_lossy(&finished.stdout);
        for line in stdout.lines() {
            log::debug!("bundler: {}", line);
        }

        if finished.status.success() {
            Ok(())
        } else {
            Err(BundleError::Failed {
                command,
                code: finished.status.code(),
                stderr: String::from_utf8_lossy(&finished.stderr).into_owned(),
            })
        }
    }
}
