use crate::io::paths::absolutize;
use crate::Result;
use clap::{ArgAction, Parser, ValueEnum};
use std::path::{Path, PathBuf};

pub const DEFAULT_GIT_PATH: &str = "/usr/bin/git";
pub const DEFAULT_SWIFT_PATH: &str = "/usr/bin/swift";
pub const DEFAULT_CONTAINER_MIRROR_ROOT: &str = "/app/external-deps/checkouts";

/// Utility for creating a local mirror of a Swift project's package dependencies
#[derive(Parser, Debug)]
#[command(name = "mirror-package")]
#[command(version)]
#[command(about = "Utility for creating a local mirror of a Swift project's package dependencies")]
#[command(
    long_about = "Clones every remote dependency pinned in Package.resolved into a mirror directory, registers the mirrors with SwiftPM and writes host and container mirrors.json files. With --update, refreshes the mirrors that already exist instead."
)]
pub struct Cli {
    /// Directory which will hold the local mirrors
    #[arg(short, long)]
    pub mirror_path: PathBuf,

    /// Path to the git executable
    #[arg(short, long, default_value = DEFAULT_GIT_PATH)]
    pub git_path: PathBuf,

    /// Path to the swift executable
    #[arg(short, long, default_value = DEFAULT_SWIFT_PATH)]
    pub swift_path: PathBuf,

    /// Use exact revisions only
    #[arg(short, long, default_value_t = true, action = ArgAction::Set)]
    pub with_sha: bool,

    /// Update all local mirrors in the mirror directory
    #[arg(short, long)]
    pub update: bool,

    /// Directory which will hold the local mirrors in a docker container
    #[arg(short, long, default_value = DEFAULT_CONTAINER_MIRROR_ROOT)]
    pub docker_mirror_path: PathBuf,

    /// Project directory containing Package.resolved (defaults to the current directory)
    #[arg(short, long)]
    pub project_dir: Option<PathBuf>,

    /// Set log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

/// Log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Settings for one run, with every directory resolved to an absolute path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorSettings {
    pub project_dir: PathBuf,
    pub mirror_root: PathBuf,
    pub git_path: PathBuf,
    pub swift_path: PathBuf,
    /// Lock mirrors to pinned revisions with a depth-one fetch
    pub exact_revision: bool,
    /// Mount point of the mirror root inside containers
    pub container_mirror_root: PathBuf,
    pub update: bool,
}

impl MirrorSettings {
    /// Settings with default executables for `project_dir` and `mirror_root`
    pub fn new(project_dir: PathBuf, mirror_root: PathBuf) -> Self {
        Self {
            project_dir,
            mirror_root,
            git_path: PathBuf::from(DEFAULT_GIT_PATH),
            swift_path: PathBuf::from(DEFAULT_SWIFT_PATH),
            exact_revision: true,
            container_mirror_root: PathBuf::from(DEFAULT_CONTAINER_MIRROR_ROOT),
            update: false,
        }
    }
}

impl Cli {
    /// Resolve relative directories against the current directory
    pub fn into_settings(self) -> Result<MirrorSettings> {
        let cwd = std::env::current_dir()?;
        Ok(self.into_settings_from(&cwd))
    }

    pub fn into_settings_from(self, cwd: &Path) -> MirrorSettings {
        let project_dir = self
            .project_dir
            .map(|dir| absolutize(&dir, cwd))
            .unwrap_or_else(|| cwd.to_path_buf());

        MirrorSettings {
            mirror_root: absolutize(&self.mirror_path, cwd),
            project_dir,
            git_path: self.git_path,
            swift_path: self.swift_path,
            exact_revision: self.with_sha,
            container_mirror_root: self.docker_mirror_path,
            update: self.update,
        }
    }
}
