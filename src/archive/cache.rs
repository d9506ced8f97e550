//! Local clone cache for the remote archive
//!
//! The archive is cloned once into the cache directory and reused on later
//! runs. `reinit` wipes the cached clone and fetches a fresh one.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{info, warn};

use super::error::ArchiveError;
use super::git_archive::GitArchive;

/// Cached clone location of a remote archive
#[derive(Debug, Clone)]
pub struct ArchiveCache {
    url: String,
    path: PathBuf,
}

impl ArchiveCache {
    pub fn new(url: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            path: path.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens the cached clone, cloning it first when it is missing or when
    /// `reinit` is set.
    pub fn open_or_clone(&self, reinit: bool) -> Result<GitArchive, ArchiveError> {
        if self.path.is_dir() {
            if !reinit {
                info!(path = %self.path.display(), "using cached archive");
                return GitArchive::open(&self.path);
            }
            warn!(path = %self.path.display(), "removing cached archive for re-clone");
            std::fs::remove_dir_all(&self.path)?;
        }

        self.clone_archive()?;
        GitArchive::open(&self.path)
    }

    /// Clones through the `git` executable so that every transport the local
    /// git install supports (https, ssh, credential helpers) is available.
    fn clone_archive(&self) -> Result<(), ArchiveError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        info!(
            url = %self.url,
            path = %self.path.display(),
            "cloning archive repository, this can take a few minutes due to the long commit history"
        );

        let out = Command::new("git")
            .arg("clone")
            .arg("--quiet")
            .arg(&self.url)
            .arg(&self.path)
            .output()
            .map_err(|e| ArchiveError::CloneFailed {
                url: self.url.clone(),
                reason: format!("failed to run git: {e}"),
            })?;

        if !out.status.success() {
            return Err(ArchiveError::CloneFailed {
                url: self.url.clone(),
                reason: String::from_utf8_lossy(&out.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}
