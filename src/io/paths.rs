use crate::manifest::RESOLVED_MANIFEST_FILE;
use std::path::{Path, PathBuf};

/// Project-local configuration directory SwiftPM reads mirrors from
const SWIFTPM_CONFIG_DIR: &str = ".swiftpm/configuration";

/// Host mirrors file name inside [`SWIFTPM_CONFIG_DIR`]
const HOST_MIRRORS_FILE: &str = "mirrors.json";

/// Container mirrors file, written at the project root
const CONTAINER_MIRRORS_FILE: &str = "docker-mirrors.json";

/// Fixed file locations for a Swift package project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    /// Project root (directory holding `Package.resolved`)
    pub project_root: PathBuf,
    /// Configuration directory (.swiftpm/configuration/)
    pub config_dir: PathBuf,
}

impl ProjectPaths {
    /// Create paths for a specific project directory
    pub fn for_project(project_root: &Path) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_dir: project_root.join(SWIFTPM_CONFIG_DIR),
        }
    }

    pub fn resolved_manifest(&self) -> PathBuf {
        self.project_root.join(RESOLVED_MANIFEST_FILE)
    }

    /// Mirrors file with host filesystem paths
    pub fn host_mirrors_file(&self) -> PathBuf {
        self.config_dir.join(HOST_MIRRORS_FILE)
    }

    /// Mirrors file with container mount paths
    pub fn container_mirrors_file(&self) -> PathBuf {
        self.project_root.join(CONTAINER_MIRRORS_FILE)
    }
}

/// Resolve `path` against `base` unless it is already absolute
pub fn absolutize(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
