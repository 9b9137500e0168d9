use super::CommandHandler;
use crate::cli::MirrorSettings;
use crate::executor::ProcessRunner;
use crate::mirror::{UpdateOrchestrator, UpdateReport};
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

/// Handler for `--update`: refresh every existing mirror
pub struct UpdateCommand {
    settings: MirrorSettings,
    runner: Arc<dyn ProcessRunner>,
}

#[async_trait]
impl CommandHandler for UpdateCommand {
    async fn execute(&self) -> Result<()> {
        let report = self.run().await?;
        if !report.failed.is_empty() {
            warn!(
                "{} of {} mirrors failed to update",
                report.failed.len(),
                report.failed.len() + report.updated.len()
            );
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "update"
    }
}

impl UpdateCommand {
    pub fn new(settings: MirrorSettings, runner: Arc<dyn ProcessRunner>) -> Self {
        Self { settings, runner }
    }

    pub async fn run(&self) -> Result<UpdateReport> {
        UpdateOrchestrator::new(
            self.runner.clone(),
            self.settings.git_path.clone(),
            self.settings.mirror_root.clone(),
        )
        .update_all()
        .await
    }
}
