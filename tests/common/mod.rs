//! Test helpers shared by the integration tests
//!
//! `FakeRunner` stands in for git and swift: it records every invocation,
//! reproduces the filesystem effects the workflow relies on (`git clone`
//! creates the destination, `git init` creates `.git`) and fails whichever
//! invocations a test selects.

#![allow(dead_code)]

use async_trait::async_trait;
use mirror_package::cli::MirrorSettings;
use mirror_package::executor::{ProcessRunner, RunStatus};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Once};

static INIT: Once = Once::new();

/// Initialize logging for tests (only once per test run)
pub fn init_test_logging() {
    INIT.call_once(|| {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_test_writer()
                    .with_target(true)
                    .with_level(true),
            )
            .with(tracing_subscriber::filter::EnvFilter::from_default_env())
            .try_init();
    });
}

pub const GIT: &str = "/usr/bin/git";
pub const SWIFT: &str = "/usr/bin/swift";

/// One recorded process invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
}

impl Invocation {
    pub fn is_git(&self) -> bool {
        self.program == Path::new(GIT)
    }

    pub fn is_swift(&self) -> bool {
        self.program == Path::new(SWIFT)
    }

    pub fn args_str(&self) -> Vec<&str> {
        self.args.iter().map(String::as_str).collect()
    }
}

type Rule = Box<dyn Fn(&Invocation) -> bool + Send + Sync>;

#[derive(Default)]
pub struct FakeRunner {
    invocations: Mutex<Vec<Invocation>>,
    failures: Vec<Rule>,
    spawn_errors: Vec<Rule>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exit with status 1 for invocations matching `rule`
    pub fn fail_when(mut self, rule: impl Fn(&Invocation) -> bool + Send + Sync + 'static) -> Self {
        self.failures.push(Box::new(rule));
        self
    }

    /// Refuse to spawn invocations matching `rule`
    pub fn spawn_error_when(
        mut self,
        rule: impl Fn(&Invocation) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.spawn_errors.push(Box::new(rule));
        self
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().unwrap().clone()
    }

    pub fn git_invocations(&self) -> Vec<Invocation> {
        self.invocations().into_iter().filter(|i| i.is_git()).collect()
    }

    pub fn swift_invocations(&self) -> Vec<Invocation> {
        self.invocations()
            .into_iter()
            .filter(|i| i.is_swift())
            .collect()
    }

    /// `--original` values passed to `swift package config set-mirror`
    pub fn registered_originals(&self) -> Vec<String> {
        self.swift_invocations()
            .iter()
            .filter_map(|i| {
                let position = i.args.iter().position(|a| a == "--original")?;
                i.args.get(position + 1).cloned()
            })
            .collect()
    }

    fn simulate(&self, invocation: &Invocation) {
        if !invocation.is_git() {
            return;
        }
        match invocation.args_str().as_slice() {
            ["clone", _, destination] => {
                fs::create_dir_all(invocation.working_dir.join(destination)).unwrap();
            }
            ["init"] => {
                fs::create_dir_all(invocation.working_dir.join(".git")).unwrap();
            }
            _ => {}
        }
    }
}

#[async_trait]
impl ProcessRunner for FakeRunner {
    async fn execute(
        &self,
        program: &Path,
        args: &[String],
        working_dir: &Path,
    ) -> std::io::Result<RunStatus> {
        let invocation = Invocation {
            program: program.to_path_buf(),
            args: args.to_vec(),
            working_dir: working_dir.to_path_buf(),
        };
        self.invocations.lock().unwrap().push(invocation.clone());

        if self.spawn_errors.iter().any(|rule| rule(&invocation)) {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "simulated spawn failure",
            ));
        }
        if self.failures.iter().any(|rule| rule(&invocation)) {
            return Ok(RunStatus::failure(1));
        }

        self.simulate(&invocation);
        Ok(RunStatus::success())
    }
}

/// Settings pointing at the fake git and swift paths
pub fn settings(project_dir: &Path, mirror_root: &Path) -> MirrorSettings {
    let mut settings = MirrorSettings::new(project_dir.to_path_buf(), mirror_root.to_path_buf());
    settings.git_path = PathBuf::from(GIT);
    settings.swift_path = PathBuf::from(SWIFT);
    settings
}

pub fn runner_handle(runner: &Arc<FakeRunner>) -> Arc<dyn ProcessRunner> {
    runner.clone()
}

/// Write a `Package.resolved` holding `pins` (a JSON array) into `project_dir`
pub fn write_manifest(project_dir: &Path, pins: serde_json::Value) {
    let manifest = serde_json::json!({
        "originHash": "0f3c9a",
        "pins": pins,
        "version": 3
    });
    fs::write(
        project_dir.join("Package.resolved"),
        serde_json::to_string_pretty(&manifest).unwrap(),
    )
    .unwrap();
}

pub fn remote_pin(identity: &str, location: &str, revision: Option<&str>) -> serde_json::Value {
    let mut state = serde_json::json!({ "version": "1.0.0" });
    if let Some(revision) = revision {
        state["revision"] = serde_json::Value::String(revision.to_string());
    }
    serde_json::json!({
        "identity": identity,
        "kind": "remoteSourceControl",
        "location": location,
        "state": state
    })
}

pub fn read_config(path: &Path) -> mirror_package::config::MirrorsConfig {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}
