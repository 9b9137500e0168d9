//! Refreshes every mirror already present under the mirror root.
//!
//! Works from the directory listing alone; the manifest is not consulted.
//! Each mirror is handled independently and a failure in one does not stop
//! the others.

use crate::executor::{args, render_command, ProcessRunner};
use crate::{MirrorError, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use walkdir::WalkDir;

/// Outcome of an update-all run
#[derive(Debug, Default)]
pub struct UpdateReport {
    pub updated: Vec<PathBuf>,
    pub failed: Vec<MirrorError>,
}

pub struct UpdateOrchestrator {
    runner: Arc<dyn ProcessRunner>,
    git_path: PathBuf,
    mirror_root: PathBuf,
}

impl UpdateOrchestrator {
    pub fn new(runner: Arc<dyn ProcessRunner>, git_path: PathBuf, mirror_root: PathBuf) -> Self {
        Self {
            runner,
            git_path,
            mirror_root,
        }
    }

    /// Immediate subdirectories of the mirror root, sorted by name.
    ///
    /// Symlinks to directories count as mirrors and are listed by their link
    /// path. Broken links are skipped with a warning.
    pub fn mirror_directories(&self) -> Result<Vec<PathBuf>> {
        let mut directories = Vec::new();
        for entry in WalkDir::new(&self.mirror_root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() > 0 => {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_default();
                    warn!("Skipping unreadable mirror entry {}: {}", path.display(), e);
                    continue;
                }
                Err(e) => {
                    return Err(MirrorError::Read {
                        path: self.mirror_root.clone(),
                        source: e.into(),
                    });
                }
            };
            if entry.file_type().is_dir() {
                directories.push(entry.into_path());
            }
        }
        Ok(directories)
    }

    pub async fn update_all(&self) -> Result<UpdateReport> {
        let mut report = UpdateReport::default();

        for directory in self.mirror_directories()? {
            let name = directory
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            info!("Updating {}", name);

            match self.update_one(&directory).await {
                Ok(()) => report.updated.push(directory),
                Err(err) => {
                    warn!("{}", err);
                    report.failed.push(err);
                }
            }
        }

        info!(
            updated = report.updated.len(),
            failed = report.failed.len(),
            "Finished updating mirrors"
        );
        Ok(report)
    }

    async fn update_one(&self, directory: &Path) -> Result<()> {
        // Drop local modifications first so the rebase cannot conflict with them
        self.git(directory, &args(["restore", ":/"])).await?;
        self.git(directory, &args(["pull", "--rebase"])).await
    }

    async fn git(&self, directory: &Path, step: &[String]) -> Result<()> {
        let update_error = |reason: String| MirrorError::Update {
            directory: directory.to_path_buf(),
            step: render_command(&self.git_path, step),
            reason,
        };

        let status = self
            .runner
            .execute(&self.git_path, step, directory)
            .await
            .map_err(|e| update_error(e.to_string()))?;

        if status.is_success() {
            Ok(())
        } else {
            Err(update_error(status.describe()))
        }
    }
}
