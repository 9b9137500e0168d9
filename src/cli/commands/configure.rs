use super::CommandHandler;
use crate::cli::MirrorSettings;
use crate::config::MirrorsConfig;
use crate::executor::ProcessRunner;
use crate::io::ProjectPaths;
use crate::manifest::ResolvedManifest;
use crate::mirror::{
    expand_originals, MirrorOutcome, MirrorPlan, MirrorPlanner, MirrorRegistry,
    RegistrationReport, RepositoryMirror,
};
use crate::{MirrorError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Handler for the default mode: mirror, register and write configs
pub struct ConfigureCommand {
    settings: MirrorSettings,
    runner: Arc<dyn ProcessRunner>,
}

/// Everything a configure run produced
#[derive(Debug, Default)]
pub struct ConfigureReport {
    pub plan: MirrorPlan,
    pub outcomes: Vec<MirrorOutcome>,
    /// Dependency URL to mirror path, only for successful mirrors
    pub mirrors: BTreeMap<String, PathBuf>,
    /// URLs skipped because no directory name could be derived
    pub unnamed: Vec<String>,
    pub registration: RegistrationReport,
    pub host_config: PathBuf,
    pub container_config: PathBuf,
}

#[async_trait]
impl CommandHandler for ConfigureCommand {
    async fn execute(&self) -> Result<()> {
        let report = self.run().await?;
        if !report.registration.is_clean() {
            warn!(
                "{} mirror registrations failed; mirrors.json was still written",
                report.registration.failed.len()
            );
        }
        info!(
            mirrors = report.mirrors.len(),
            "Mirrors configured for {}",
            self.settings.project_dir.display()
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "configure"
    }
}

impl ConfigureCommand {
    pub fn new(settings: MirrorSettings, runner: Arc<dyn ProcessRunner>) -> Self {
        Self { settings, runner }
    }

    /// Run the whole configure workflow.
    ///
    /// A clone failure aborts before anything is registered or written;
    /// registration failures are only collected in the report.
    pub async fn run(&self) -> Result<ConfigureReport> {
        let paths = ProjectPaths::for_project(&self.settings.project_dir);

        debug!("Reading {}", paths.resolved_manifest().display());
        let manifest = ResolvedManifest::from_file(&paths.project_root)?;
        let plan = MirrorPlanner::plan(&manifest.pins);

        std::fs::create_dir_all(&self.settings.mirror_root)?;
        let repository = RepositoryMirror::new(
            self.runner.clone(),
            self.settings.git_path.clone(),
            self.settings.mirror_root.clone(),
        )
        .with_exact_revision(self.settings.exact_revision);

        let mut report = ConfigureReport {
            host_config: paths.host_mirrors_file(),
            container_config: paths.container_mirrors_file(),
            ..Default::default()
        };

        for dependency in &plan.dependencies {
            match repository.mirror(dependency).await {
                Ok(outcome) => {
                    report
                        .mirrors
                        .insert(dependency.url.clone(), outcome.path.clone());
                    report.outcomes.push(outcome);
                }
                Err(MirrorError::UnnamedRepository { url }) => {
                    warn!("Weird source repo URL, skipping: {}", url);
                    report.unnamed.push(url);
                }
                Err(err) => {
                    error!("{}", err);
                    return Err(err);
                }
            }
        }

        let registry = MirrorRegistry::new(
            self.runner.clone(),
            self.settings.swift_path.clone(),
            paths.project_root.clone(),
        );
        let originals =
            expand_originals(report.mirrors.iter().map(|(url, path)| (url, path.clone())));
        registry.register_all(&originals, &mut report.registration).await;

        MirrorsConfig::host(&report.mirrors).write_to(&report.host_config)?;
        MirrorsConfig::container(&report.mirrors, &self.settings.container_mirror_root)
            .write_to(&report.container_config)?;

        report.plan = plan;
        Ok(report)
    }
}
