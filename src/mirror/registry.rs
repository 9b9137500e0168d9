use crate::executor::{args, ProcessRunner};
use crate::MirrorError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Outcome of registering every mirror for a run
#[derive(Debug, Default)]
pub struct RegistrationReport {
    pub registered: Vec<String>,
    pub failed: Vec<MirrorError>,
}

impl RegistrationReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Tells the package manager to resolve original URLs to local mirrors
pub struct MirrorRegistry {
    runner: Arc<dyn ProcessRunner>,
    swift_path: PathBuf,
    project_dir: PathBuf,
}

impl MirrorRegistry {
    pub fn new(runner: Arc<dyn ProcessRunner>, swift_path: PathBuf, project_dir: PathBuf) -> Self {
        Self {
            runner,
            swift_path,
            project_dir,
        }
    }

    /// Register a single `original -> mirror` mapping for the project
    pub async fn register(&self, original: &str, mirror: &Path) -> Result<(), MirrorError> {
        let mirror = mirror.to_string_lossy();
        let command = args([
            "package",
            "config",
            "set-mirror",
            "--original",
            original,
            "--mirror",
            &*mirror,
        ]);

        let registration_error = |reason: String| MirrorError::Registration {
            original: original.to_string(),
            reason,
        };

        let status = self
            .runner
            .execute(&self.swift_path, &command, &self.project_dir)
            .await
            .map_err(|e| registration_error(e.to_string()))?;

        if status.is_success() {
            Ok(())
        } else {
            Err(registration_error(status.describe()))
        }
    }

    /// Register every `original -> mirror` mapping in `originals`, once each.
    ///
    /// Failures are logged and collected into `report`; they never stop the run.
    pub async fn register_all(
        &self,
        originals: &BTreeMap<String, PathBuf>,
        report: &mut RegistrationReport,
    ) {
        for (original, mirror) in originals {
            match self.register(original, mirror).await {
                Ok(()) => {
                    info!("Registered mirror {} -> {}", original, mirror.display());
                    report.registered.push(original.clone());
                }
                Err(err) => {
                    warn!("{}", err);
                    report.failed.push(err);
                }
            }
        }
    }
}
