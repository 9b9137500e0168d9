//! Materializes one dependency as a git repository under the mirror root.

use super::planner::Dependency;
use super::VCS_SUFFIX;
use crate::executor::{args, render_command, ProcessRunner};
use crate::{MirrorError, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Remote name used for shallow mirrors
const ORIGIN: &str = "origin";

/// Derive the mirror directory name from a repository URL.
///
/// Takes the last path segment and strips a trailing `.git`. Returns `None`
/// when the URL has no usable path segment. Two URLs ending in the same
/// segment map to the same directory.
pub fn mirror_directory_name(url: &str) -> Option<String> {
    let path = match url.split_once("://") {
        Some((_, rest)) => rest.split_once('/').map(|(_, path)| path).unwrap_or(""),
        None => match url.split_once(':') {
            // scp-like `git@host:org/repo.git`
            Some((host, path)) if !host.contains('/') => path,
            _ => url,
        },
    };

    let segment = path.split('/').filter(|s| !s.is_empty()).next_back()?;
    let name = segment.strip_suffix(VCS_SUFFIX).unwrap_or(segment);
    match name {
        "" | "." | ".." => None,
        _ => Some(name.to_string()),
    }
}

/// How a dependency ended up in the mirror root
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorKind {
    /// Directory was already present; nothing was fetched
    Existing,
    /// Depth-one fetch of the pinned revision, detached
    Pinned,
    /// Full clone of the default branch
    Cloned,
}

/// A dependency present in the mirror root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorOutcome {
    pub directory_name: String,
    pub path: PathBuf,
    pub kind: MirrorKind,
}

/// Clones dependencies into a mirror root
pub struct RepositoryMirror {
    runner: Arc<dyn ProcessRunner>,
    git_path: PathBuf,
    mirror_root: PathBuf,
    exact_revision: bool,
}

impl RepositoryMirror {
    pub fn new(runner: Arc<dyn ProcessRunner>, git_path: PathBuf, mirror_root: PathBuf) -> Self {
        Self {
            runner,
            git_path,
            mirror_root,
            exact_revision: true,
        }
    }

    /// Lock mirrors to the pinned revision when one is known
    pub fn with_exact_revision(mut self, exact_revision: bool) -> Self {
        self.exact_revision = exact_revision;
        self
    }

    /// Make sure `dependency` is present under the mirror root.
    ///
    /// An existing directory of the derived name is trusted as-is, whatever
    /// revision it holds. Any other entry of that name makes the clone fail
    /// and is left in place.
    pub async fn mirror(&self, dependency: &Dependency) -> Result<MirrorOutcome> {
        let directory_name =
            mirror_directory_name(&dependency.url).ok_or_else(|| MirrorError::UnnamedRepository {
                url: dependency.url.clone(),
            })?;
        let path = self.mirror_root.join(&directory_name);

        if path.is_dir() {
            info!("Already mirroring {}", dependency.url);
            return Ok(MirrorOutcome {
                directory_name,
                path,
                kind: MirrorKind::Existing,
            });
        }

        let kind = match (&dependency.revision, self.exact_revision) {
            (Some(revision), true) => {
                info!("Shallow cloning {} at {}", dependency.url, revision);
                std::fs::create_dir_all(&path)?;
                if let Err(err) = self.shallow_clone(&dependency.url, revision, &path).await {
                    self.discard_partial(&path);
                    return Err(err);
                }
                MirrorKind::Pinned
            }
            _ => {
                info!("Cloning {}", dependency.url);
                self.full_clone(&dependency.url, &directory_name).await?;
                MirrorKind::Cloned
            }
        };

        Ok(MirrorOutcome {
            directory_name,
            path,
            kind,
        })
    }

    async fn shallow_clone(&self, url: &str, revision: &str, directory: &Path) -> Result<()> {
        let steps = [
            args(["init"]),
            args(["remote", "add", ORIGIN, url]),
            args(["fetch", "--depth", "1", ORIGIN, revision]),
            args(["checkout", "--detach", revision]),
            args(["repack", "-a", "-d"]),
        ];
        for step in &steps {
            self.git(url, step, directory).await?;
        }
        Ok(())
    }

    async fn full_clone(&self, url: &str, directory_name: &str) -> Result<()> {
        let step = args(["clone", url, directory_name]);
        self.git(url, &step, &self.mirror_root).await
    }

    async fn git(&self, url: &str, step: &[String], working_dir: &Path) -> Result<()> {
        let clone_error = |reason: String| MirrorError::Clone {
            url: url.to_string(),
            step: render_command(&self.git_path, step),
            reason,
        };

        let status = self
            .runner
            .execute(&self.git_path, step, working_dir)
            .await
            .map_err(|e| clone_error(e.to_string()))?;

        if status.is_success() {
            Ok(())
        } else {
            Err(clone_error(status.describe()))
        }
    }

    fn discard_partial(&self, directory: &Path) {
        if let Err(e) = std::fs::remove_dir_all(directory) {
            warn!(
                "Failed to remove partial mirror {}: {}",
                directory.display(),
                e
            );
        }
    }
}
