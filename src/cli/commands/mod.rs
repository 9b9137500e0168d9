pub mod configure;
pub mod update;

use crate::Result;
use async_trait::async_trait;

pub use configure::{ConfigureCommand, ConfigureReport};
pub use update::UpdateCommand;

/// Common trait for all command handlers
#[async_trait]
pub trait CommandHandler {
    /// Execute the command
    async fn execute(&self) -> Result<()>;

    /// Get command name for logging
    fn name(&self) -> &'static str;
}
