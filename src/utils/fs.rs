//! File system utilities for the release build.
//!
//! Thin async wrappers over `tokio::fs` that attach the path to every error
//! and make directory removal idempotent.

use crate::error::{BuildError, IoResultExt, Result};
use std::io;
use std::path::Path;
use tokio::fs;

/// Removes the directory and its contents if it exists.
pub async fn remove_dir_all(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()), // Idempotent
        Err(e) => Err(BuildError::fs("removing", path, e)),
    }
}

/// Reads a whole file as UTF-8 text.
pub async fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).await.fs_context("reading", path)
}

/// Writes `contents` to `path`, replacing the file and creating parent directories.
pub async fn write(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .fs_context("creating directory", parent)?;
    }
    fs::write(path, contents).await.fs_context("writing", path)
}

/// Copies a regular file from one path to another, creating any parent
/// directories of the destination path as necessary.
///
/// Fails if the source path is a directory or doesn't exist.
pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    let metadata = fs::metadata(from).await.fs_context("reading", from)?;
    if !metadata.is_file() {
        return Err(BuildError::fs(
            "copying",
            from,
            io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
        ));
    }
    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir)
            .await
            .fs_context("creating directory", dest_dir)?;
    }
    fs::copy(from, to).await.fs_context("copying to", to)?;
    Ok(())
}
